//! This module contains all key and marker encoding logic.

use dicm_core::header::{Key, Length, SequenceItemHeader, Tag};
use snafu::{Backtrace, Snafu};
use std::io::{self, Write};

pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

/// Module-level error type:
/// for errors which may occur while encoding keys and markers.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to write element tag: {}", source))]
    WriteTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write value representation: {}", source))]
    WriteVr {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write value length: {}", source))]
    WriteLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write item header: {}", source))]
    WriteItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write item delimiter: {}", source))]
    WriteItemDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write sequence delimiter: {}", source))]
    WriteSequenceDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
    /// Explicit VR transfer syntaxes need a value representation
    /// for every element.
    #[snafu(display("Element {} has no value representation", tag))]
    MissingVr { tag: Tag, backtrace: Backtrace },
    /// The value length does not fit in the 16-bit length field
    /// of the element's value representation.
    #[snafu(display("Length {} of element {} exceeds the 16-bit length field", len, tag))]
    LengthOverflow {
        tag: Tag,
        len: Length,
        backtrace: Backtrace,
    },
}

impl Error {
    /// The underlying I/O error, if this error was raised by the sink.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Error::WriteTag { source, .. }
            | Error::WriteVr { source, .. }
            | Error::WriteLength { source, .. }
            | Error::WriteItemHeader { source, .. }
            | Error::WriteItemDelimiter { source, .. }
            | Error::WriteSequenceDelimiter { source, .. } => Some(source),
            Error::MissingVr { .. } | Error::LengthOverflow { .. } => None,
        }
    }
}

/// Type alias for a result from this module.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Type trait for an encoder of keys and structural markers
/// in a specific transfer syntax.
pub trait Encode {
    /// Encode and write an element tag.
    fn encode_tag<W>(&self, to: &mut W, tag: Tag) -> Result<()>
    where
        W: ?Sized + Write;

    /// Encode and write a full element key:
    /// tag, value representation (explicit VR only) and value length.
    ///
    /// Returns the number of bytes written.
    fn encode_key<W>(&self, to: &mut W, key: &Key) -> Result<usize>
    where
        W: ?Sized + Write;

    /// Encode and write the value length field of the given key,
    /// including the reserved bytes before a 32-bit explicit VR length.
    ///
    /// Returns the number of bytes written.
    fn encode_value_length<W>(&self, to: &mut W, key: &Key) -> Result<usize>
    where
        W: ?Sized + Write;

    /// Encode and write an item header,
    /// with the given item length (which may be undefined).
    fn encode_item_header<W>(&self, to: &mut W, len: u32) -> Result<()>
    where
        W: ?Sized + Write;

    /// Encode and write an item delimiter.
    fn encode_item_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write;

    /// Encode and write a sequence delimiter.
    fn encode_sequence_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write;

    /// Encode and write any structural marker.
    /// Markers always take 8 bytes.
    fn encode_marker<W>(&self, to: &mut W, marker: SequenceItemHeader) -> Result<()>
    where
        W: ?Sized + Write,
    {
        match marker {
            SequenceItemHeader::Item { len } => self.encode_item_header(to, len.0),
            SequenceItemHeader::ItemDelimiter => self.encode_item_delimiter(to),
            SequenceItemHeader::SequenceDelimiter => self.encode_sequence_delimiter(to),
        }
    }
}
