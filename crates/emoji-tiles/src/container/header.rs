//! Fixed-layout preamble of the array container.
//!
//! ```text
//! offset 0   6 bytes   magic  \x93 N U M P Y
//! offset 6   1 byte    major version
//! offset 7   1 byte    minor version
//! offset 8   u16 LE    metadata length      (major 1)
//!            u32 LE    metadata length      (major 2, 3)
//! offset 10 / 12       metadata text, then payload
//! ```

use super::error::FormatError;

/// Container signature.
pub const MAGIC: [u8; 6] = *b"\x93NUMPY";

/// Offset of the metadata length field.
const LENGTH_FIELD_OFFSET: usize = 8;

/// Parsed container preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Major format version (1, 2 or 3)
    pub major: u8,
    /// Minor format version (not interpreted)
    pub minor: u8,
    /// Length of the metadata text in bytes
    pub metadata_len: usize,
    /// Byte offset where the metadata text starts
    pub metadata_offset: usize,
}

impl ContainerHeader {
    /// Parse the preamble from the start of `bytes`.
    ///
    /// Validates the magic, the major version and that the metadata block
    /// lies entirely inside `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
            return Err(FormatError::BadMagic);
        }
        if bytes.len() < LENGTH_FIELD_OFFSET {
            return Err(FormatError::HeaderOutOfBounds {
                needed: LENGTH_FIELD_OFFSET,
                available: bytes.len(),
            });
        }

        let major = bytes[6];
        let minor = bytes[7];

        let field_width = match major {
            1 => 2,
            2 | 3 => 4,
            _ => return Err(FormatError::UnsupportedVersion { major, minor }),
        };
        let metadata_offset = LENGTH_FIELD_OFFSET + field_width;
        if bytes.len() < metadata_offset {
            return Err(FormatError::HeaderOutOfBounds {
                needed: metadata_offset,
                available: bytes.len(),
            });
        }

        let field = &bytes[LENGTH_FIELD_OFFSET..metadata_offset];
        let metadata_len = if field_width == 2 {
            u16::from_le_bytes([field[0], field[1]]) as usize
        } else {
            u32::from_le_bytes([field[0], field[1], field[2], field[3]]) as usize
        };

        let end = metadata_offset.saturating_add(metadata_len);
        if end > bytes.len() {
            return Err(FormatError::HeaderOutOfBounds {
                needed: end,
                available: bytes.len(),
            });
        }

        Ok(Self {
            major,
            minor,
            metadata_len,
            metadata_offset,
        })
    }

    /// Byte offset of the first payload byte.
    #[inline]
    pub fn payload_offset(&self) -> usize {
        self.metadata_offset + self.metadata_len
    }
}
