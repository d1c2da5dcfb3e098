//! Flash image reduction for 128 KiB linker images.
//!
//! The linker pads its fixed-size image with 0xFF up to the CCFG block at
//! the very end of flash, so most of the file is empty space. This crate
//! drops that padding and reframes the image as a compact container of
//! two self-describing segments, the CCFG block and the trimmed code,
//! each tagged with the absolute flash offset where it must be
//! programmed.

mod image;
mod segment;

pub use image::{CCFG_OFFSET, CCFG_SIZE, IMAGE_SIZE, PADDING_BYTE, RawImage, ReduceError};
pub use segment::{Segment, encode_container};

/// Reduce a validated image into its container encoding.
///
/// The container carries the CCFG segment first, then the code segment
/// with its trailing padding removed.
pub fn reduce(image: &RawImage) -> Vec<u8> {
    segment::encode_container(&image.segments())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_concrete_image() {
        // 96 distinct code bytes, padding up to the CCFG, CCFG all 0xCC.
        let mut data = vec![PADDING_BYTE; IMAGE_SIZE];
        for i in 0..96 {
            data[i] = (0x11 + i) as u8;
        }
        for b in &mut data[CCFG_OFFSET..] {
            *b = 0xCC;
        }

        let image = RawImage::new(data).unwrap();
        let container = reduce(&image);

        // 8 + 88 byte CCFG record, then 8 + 96 byte code record.
        assert_eq!(container.len(), 200);

        assert_eq!(&container[..4], (CCFG_OFFSET as u32).to_le_bytes());
        assert_eq!(&container[4..8], (CCFG_SIZE as u32).to_le_bytes());
        assert!(container[8..96].iter().all(|&b| b == 0xCC));

        assert_eq!(&container[96..100], 0u32.to_le_bytes());
        assert_eq!(&container[100..104], 96u32.to_le_bytes());
        for i in 0..96 {
            assert_eq!(container[104 + i], (0x11 + i) as u8);
        }
    }

    #[test]
    fn test_reduce_all_padding_image() {
        let image = RawImage::new(vec![PADDING_BYTE; IMAGE_SIZE]).unwrap();
        let container = reduce(&image);

        // CCFG record plus an empty code record.
        assert_eq!(container.len(), 8 + CCFG_SIZE + 8);
        assert_eq!(&container[96..100], 0u32.to_le_bytes());
        assert_eq!(&container[100..104], 0u32.to_le_bytes());
    }
}
