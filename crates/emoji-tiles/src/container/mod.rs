//! Array container decoding
//!
//! The container is the NumPy `.npy` layout: a fixed preamble
//! ([`ContainerHeader`]), a metadata dictionary ([`ArrayMetadata`]) and the
//! raw payload. [`Container::parse`] validates the first two and exposes a
//! view of the payload; [`Container::into_tiles`] checks the shape against
//! the expected tile edge and produces an owned [`TileSet`].
//!
//! # Example
//!
//! ```
//! use emoji_tiles::container::{decode_tiles, ContainerError, FormatError};
//!
//! let err = decode_tiles(b"GIF89a", 16).unwrap_err();
//! assert_eq!(err, ContainerError::Format(FormatError::BadMagic));
//! ```

mod convert;
mod error;
mod header;
mod metadata;

pub use convert::{looks_normalized, NORMALIZED_MAX, SCALE_SAMPLE_LEN};
pub use error::{ContainerError, FormatError};
pub use header::{ContainerHeader, MAGIC};
pub use metadata::{ArrayMetadata, Dtype, StorageOrder};

use crate::tiles::{TileGeometry, TileSet, CHANNELS};

/// A validated container borrowing its payload from the input buffer.
#[derive(Debug, Clone)]
pub struct Container<'a> {
    /// Preamble
    pub header: ContainerHeader,
    /// Typed metadata
    pub metadata: ArrayMetadata,
    payload: &'a [u8],
}

impl<'a> Container<'a> {
    /// Parse preamble and metadata.
    ///
    /// # Errors
    ///
    /// Any [`FormatError`] except the shape checks, which need the expected
    /// tile edge and happen in [`into_tiles`](Self::into_tiles).
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ContainerError> {
        let header = ContainerHeader::parse(bytes)?;
        let raw = &bytes[header.metadata_offset..header.payload_offset()];

        let text = std::str::from_utf8(raw).map_err(|e| FormatError::InvalidMetadata {
            position: e.valid_up_to(),
            reason: "metadata is not valid text".to_string(),
        })?;
        let metadata = ArrayMetadata::parse(text)?;

        if metadata.order == StorageOrder::ColumnMajor {
            return Err(FormatError::ColumnMajor.into());
        }

        Ok(Self {
            header,
            metadata,
            payload: &bytes[header.payload_offset()..],
        })
    }

    /// Raw payload bytes (everything after the metadata).
    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Validate the shape as `(count, edge, edge, 4)` and decode the
    /// payload into 8-bit RGBA tiles.
    ///
    /// Float payloads go through the global scale detection described in
    /// the `convert` module. Bytes past the end of the declared shape are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - [`FormatError::ShapeRank`] / [`FormatError::ShapeMismatch`]
    /// - [`ContainerError::Truncated`] if the payload is too short
    pub fn into_tiles(self, edge: usize) -> Result<TileSet, ContainerError> {
        let shape = &self.metadata.shape;
        if shape.len() != 4 {
            return Err(FormatError::ShapeRank(shape.len()).into());
        }
        if edge == 0 || shape[1] != edge || shape[2] != edge || shape[3] != CHANNELS {
            return Err(FormatError::ShapeMismatch {
                shape: shape.clone(),
                edge,
            }
            .into());
        }

        let geometry = TileGeometry::new(shape[0], edge);
        let needed = geometry
            .byte_len()
            .and_then(|n| n.checked_mul(self.metadata.dtype.item_size()))
            .unwrap_or(usize::MAX);
        if self.payload.len() < needed {
            return Err(ContainerError::Truncated {
                expected: needed,
                available: self.payload.len(),
            });
        }

        let data = &self.payload[..needed];
        let pixels = match self.metadata.dtype {
            Dtype::U8 => data.to_vec(),
            Dtype::F32Le => convert::f32le_to_bytes(data),
        };

        // Length matches by construction: needed / item_size == byte_len
        TileSet::new(geometry, pixels).ok_or(ContainerError::Truncated {
            expected: needed,
            available: self.payload.len(),
        })
    }
}

/// Parse `bytes` and decode its tiles in one step.
pub fn decode_tiles(bytes: &[u8], edge: usize) -> Result<TileSet, ContainerError> {
    Container::parse(bytes)?.into_tiles(edge)
}
