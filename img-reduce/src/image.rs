//! Raw flash image handling: validation, CCFG extraction, padding trim.
//!
//! The linker always emits a full 128 KiB image: executable code from
//! offset 0, a long run of 0xFF padding (erased flash), and the 88-byte
//! CCFG configuration block occupying the last bytes of flash. Only the
//! code and the CCFG are worth programming; the padding between them is
//! what the reduction removes.

use std::io::Read;

use thiserror::Error;

use crate::segment::Segment;

/// Exact size of a raw linker image: 128 KiB of flash.
pub const IMAGE_SIZE: usize = 128 * 1024;

/// Size of the CCFG configuration block at the end of the image.
pub const CCFG_SIZE: usize = 88;

/// Absolute flash offset of the CCFG block.
pub const CCFG_OFFSET: usize = IMAGE_SIZE - CCFG_SIZE;

/// Fill value the linker writes into unused flash.
pub const PADDING_BYTE: u8 = 0xFF;

/// Padding is trimmed in whole 32-bit words, matching the granularity the
/// linker pads with.
const WORD_SIZE: usize = 4;

/// Hard ceiling on input reads, twice the expected image size.
const READ_LIMIT: usize = 2 * IMAGE_SIZE;

// The backward scan starts at the last whole word before the CCFG, so the
// CCFG boundary must stay word aligned if the constants above ever change.
const _: () = assert!(CCFG_OFFSET % WORD_SIZE == 0);

#[derive(Error, Debug)]
pub enum ReduceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image larger than {READ_LIMIT} bytes, refusing to read further")]
    ImageTooLarge,

    #[error("image is {0} bytes, expected exactly {IMAGE_SIZE}")]
    InvalidImageSize(usize),
}

/// A validated raw flash image of exactly [`IMAGE_SIZE`] bytes.
#[derive(Debug, Clone)]
pub struct RawImage {
    data: Vec<u8>,
}

impl RawImage {
    /// Validate a fully-read byte buffer as a raw flash image.
    ///
    /// Only a buffer of exactly [`IMAGE_SIZE`] bytes is accepted; anything
    /// else fails with [`ReduceError::InvalidImageSize`] carrying the
    /// observed size.
    pub fn new(data: Vec<u8>) -> Result<Self, ReduceError> {
        if data.len() != IMAGE_SIZE {
            return Err(ReduceError::InvalidImageSize(data.len()));
        }
        Ok(Self { data })
    }

    /// Read and validate a raw flash image from `reader`.
    ///
    /// At most one byte past twice the expected image size is consumed.
    /// A stream still producing data at that point cannot be a valid
    /// image, so it is cut off with [`ReduceError::ImageTooLarge`] before
    /// it can grow the buffer without bound.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReduceError> {
        let mut data = Vec::with_capacity(IMAGE_SIZE);
        reader.take(READ_LIMIT as u64 + 1).read_to_end(&mut data)?;
        if data.len() > READ_LIMIT {
            return Err(ReduceError::ImageTooLarge);
        }
        Self::new(data)
    }

    /// The CCFG configuration block at the end of the image.
    ///
    /// Always the last [`CCFG_SIZE`] bytes, whatever they contain. The
    /// block is opaque board configuration and is never interpreted.
    pub fn ccfg(&self) -> &[u8] {
        &self.data[CCFG_OFFSET..]
    }

    /// The code region preceding the CCFG block, padding included.
    pub fn code_region(&self) -> &[u8] {
        &self.data[..CCFG_OFFSET]
    }

    /// Length of the code region once the trailing padding run is removed.
    ///
    /// Whole 32-bit words equal to 0xFFFFFFFF are walked backward from the
    /// CCFG boundary; the code ends right after the last word holding any
    /// data. A fully padded region has length 0.
    pub fn code_len(&self) -> usize {
        let mut words = self.code_region().chunks_exact(WORD_SIZE);
        match words.rposition(|word| word != [PADDING_BYTE; WORD_SIZE]) {
            Some(last_data_word) => (last_data_word + 1) * WORD_SIZE,
            None => 0,
        }
    }

    /// Frame the image into its two flash segments, CCFG first.
    pub fn segments(&self) -> Vec<Segment> {
        let code_len = self.code_len();
        log::info!(
            "Reduced image: {} code bytes + {} CCFG bytes",
            code_len,
            CCFG_SIZE
        );

        vec![
            Segment::new(CCFG_OFFSET as u32, self.ccfg().to_vec()),
            Segment::new(0, self.code_region()[..code_len].to_vec()),
        ]
    }
}
