//! This module contains all key and marker decoding logic.

use dicm_core::header::{Key, Length, SequenceItemHeader, SequenceItemHeaderError, Tag};
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{self, Read};

pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

/// Module-level error type:
/// for errors which may occur while decoding keys and markers.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to read the beginning (tag) of the header: {}", source))]
    ReadHeaderTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's element length field: {}", source))]
    ReadLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    /// The source ended in the middle of a header.
    #[snafu(display("Source ended after {} of {} header bytes", read, expected))]
    ShortRead {
        expected: usize,
        read: usize,
        backtrace: Backtrace,
    },
    /// The two bytes in place of the value representation
    /// are not upper case letters.
    #[snafu(display("Invalid value representation {:02X?} in element {}", bytes, tag))]
    InvalidVr {
        tag: Tag,
        bytes: [u8; 2],
        backtrace: Backtrace,
    },
    /// The two bytes between the value representation
    /// and a 32-bit value length are not zero.
    #[snafu(display("Non-zero reserved bytes {:02X?} in element {}", bytes, tag))]
    ReservedBytes {
        tag: Tag,
        bytes: [u8; 2],
        backtrace: Backtrace,
    },
    #[snafu(display("Bad sequence item header: {}", source))]
    BadSequenceHeader { source: SequenceItemHeaderError },
}

/// Type alias for a result from this module.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A decoded header: either a structural marker or a data element key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Header {
    /// An item start, item delimiter or sequence delimiter.
    Marker(SequenceItemHeader),
    /// The key of a data element.
    Element(Key),
}

/// Type trait for reading and decoding headers from a data source
/// in a specific transfer syntax.
pub trait Decode {
    /// Fetch and decode the next header from the given source.
    ///
    /// Returns `Ok(None)` if the source was exhausted
    /// before any byte of the header could be read.
    /// Otherwise, the header is returned along with
    /// the exact number of bytes consumed from the source.
    ///
    /// Headers in the delimiter group are always decoded as markers,
    /// never as element keys.
    fn decode_header<S>(&self, source: &mut S) -> Result<Option<(Header, usize)>>
    where
        S: ?Sized + Read;
}

/// Fill the buffer from the source, stopping early only when the source
/// reports the end of the stream.
/// Returns the number of bytes read.
pub fn read_fully<S>(source: &mut S, buf: &mut [u8]) -> io::Result<usize>
where
    S: ?Sized + Read,
{
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read the 8 bytes opening every header.
/// Returns `false` if the source was already exhausted.
pub(crate) fn read_header_start<S>(source: &mut S, buf: &mut [u8; 8]) -> Result<bool>
where
    S: ?Sized + Read,
{
    match read_fully(source, buf).context(ReadHeaderTagSnafu)? {
        0 => Ok(false),
        8 => Ok(true),
        read => ShortReadSnafu { expected: 8_usize, read }.fail(),
    }
}

/// Read the 32-bit length field following the reserved bytes
/// of a long-form explicit VR key.
pub(crate) fn read_long_length<S>(source: &mut S, buf: &mut [u8; 4]) -> Result<()>
where
    S: ?Sized + Read,
{
    match read_fully(source, buf).context(ReadLengthSnafu)? {
        4 => Ok(()),
        read => ShortReadSnafu {
            expected: 12_usize,
            read: 8 + read,
        }
        .fail(),
    }
}

/// Build a marker header from its raw tag and length.
pub(crate) fn marker(tag: Tag, len: u32) -> Result<Header> {
    SequenceItemHeader::new(tag, Length(len))
        .map(Header::Marker)
        .context(BadSequenceHeaderSnafu)
}
