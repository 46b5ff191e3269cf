//! Error types of the parser and emitter.

use crate::event::{Event, State};
use dicm_core::header::{InvalidKeyError, Key, Length, SequenceItemHeader, Tag};
use dicm_encoding::{decode, encode, TransferSyntax};
use snafu::{Backtrace, Snafu};
use std::io;

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The main error type of a parsing or emitting run.
///
/// Every error is terminal:
/// the run is aborted and can only be restarted
/// by binding a new source or sink.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Could not decode header"))]
    DecodeHeader {
        #[snafu(backtrace)]
        source: decode::Error,
    },
    #[snafu(display("Could not encode header"))]
    EncodeHeader {
        #[snafu(backtrace)]
        source: encode::Error,
    },
    #[snafu(display("Invalid element key"))]
    InvalidKey {
        #[snafu(backtrace)]
        source: InvalidKeyError,
    },
    /// The source holds no element at all.
    #[snafu(display("Empty document"))]
    EmptyDocument { backtrace: Backtrace },
    /// The source ended while a structural marker was still expected.
    #[snafu(display("Unexpected end of data in state {:?}", state))]
    UnexpectedEof { state: State, backtrace: Backtrace },
    #[snafu(display("Unexpected marker {:?} in state {:?}", marker, state))]
    UnexpectedMarker {
        marker: SequenceItemHeader,
        state: State,
        backtrace: Backtrace,
    },
    #[snafu(display("Unexpected element {} in state {:?}", tag, state))]
    UnexpectedElement {
        tag: Tag,
        state: State,
        backtrace: Backtrace,
    },
    /// The position in a scope went past its declared length.
    #[snafu(display(
        "{} length overrun: declared {} bytes but reached {}",
        scope,
        declared,
        position
    ))]
    LengthOverrun {
        scope: &'static str,
        declared: u32,
        position: u64,
        backtrace: Backtrace,
    },
    /// A scope was closed before reaching its declared length.
    #[snafu(display(
        "{} length mismatch: declared {} bytes but ended at {}",
        scope,
        declared,
        position
    ))]
    LengthMismatch {
        scope: &'static str,
        declared: u32,
        position: u64,
        backtrace: Backtrace,
    },
    /// The value of the key cannot be represented in the transfer syntax,
    /// such as encapsulated pixel data outside of an encapsulated syntax.
    #[snafu(display("Element {} cannot be represented in transfer syntax {}", key, ts))]
    UnclassifiedValue {
        key: Key,
        ts: TransferSyntax,
        backtrace: Backtrace,
    },
    #[snafu(display("Pixel data fragment of undefined length"))]
    UndefinedFragmentLength { backtrace: Backtrace },
    #[snafu(display("Odd item length {}", len))]
    OddItemLength { len: Length, backtrace: Backtrace },
    #[snafu(display("Nesting exceeds the maximum depth of {} levels", max_depth))]
    DepthLimit {
        max_depth: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read value bytes"))]
    ReadValue {
        source: io::Error,
        backtrace: Backtrace,
    },
    /// The source ended in the middle of a value.
    #[snafu(display("Source ended after {} of {} value bytes", read, expected))]
    ShortValue {
        expected: u64,
        read: u64,
        backtrace: Backtrace,
    },
    /// The caller moved on without consuming the whole value
    /// and unread values are not to be skipped.
    #[snafu(display("{} value bytes were left unread", remaining))]
    UnreadValue { remaining: u32, backtrace: Backtrace },
    #[snafu(display("Could not write value bytes"))]
    WriteValue {
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not flush the output"))]
    Flush {
        source: io::Error,
        backtrace: Backtrace,
    },
    /// The caller moved on before writing the whole value.
    #[snafu(display("Only {} of {} value bytes were written", written, len))]
    ValueIncomplete {
        written: u32,
        len: u32,
        backtrace: Backtrace,
    },
    /// The caller wrote more bytes than the declared value length.
    #[snafu(display("Writing {} value bytes exceeds the value length {}", attempted, len))]
    ValueOverflow {
        len: u32,
        attempted: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Fragment of {} bytes does not fit a 32-bit length", len))]
    FragmentTooLarge { len: usize, backtrace: Backtrace },
    #[snafu(display("Unexpected event {:?} in state {:?}", event, state))]
    UnexpectedEvent {
        event: Event,
        state: State,
        backtrace: Backtrace,
    },
    #[snafu(display("Cannot {} in state {:?}", operation, state))]
    InvalidState {
        operation: &'static str,
        state: State,
        backtrace: Backtrace,
    },
    #[snafu(display("No key was set before the key event"))]
    MissingKey { backtrace: Backtrace },
    #[snafu(display("No length was set before the fragment event"))]
    MissingLength { backtrace: Backtrace },
    #[snafu(display("No input source was set"))]
    NoInput { backtrace: Backtrace },
    #[snafu(display("No output sink was set"))]
    NoOutput { backtrace: Backtrace },
    /// A previous error aborted the run.
    #[snafu(display("The run was aborted by a previous error"))]
    Poisoned { backtrace: Backtrace },
}

/// The broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The data breaks the encoding rules:
    /// malformed keys, misplaced markers or inconsistent lengths.
    StructuralViolation,
    /// The source ended in the middle of a header or value.
    ShortRead,
    /// The sink accepted fewer bytes than requested.
    ShortWrite,
    /// The source ended before the first element.
    /// An end of data inside a sequence or item is a structural violation.
    UnexpectedEof,
    /// The API was used out of order.
    CallerMisuse,
    /// Any other failure reported by the source or sink.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DecodeHeader { source } => match source {
                decode::Error::ShortRead { .. } => ErrorKind::ShortRead,
                decode::Error::ReadHeaderTag { .. } | decode::Error::ReadLength { .. } => {
                    ErrorKind::Io
                }
                _ => ErrorKind::StructuralViolation,
            },
            Error::EncodeHeader { source } => match source.io_error() {
                Some(e) => io_kind(e),
                None => ErrorKind::StructuralViolation,
            },
            Error::ReadValue { .. } => ErrorKind::Io,
            Error::ShortValue { .. } => ErrorKind::ShortRead,
            Error::WriteValue { source, .. } | Error::Flush { source, .. } => io_kind(source),
            Error::EmptyDocument { .. } => ErrorKind::UnexpectedEof,
            Error::UnreadValue { .. }
            | Error::ValueIncomplete { .. }
            | Error::ValueOverflow { .. }
            | Error::FragmentTooLarge { .. }
            | Error::UnexpectedEvent { .. }
            | Error::InvalidState { .. }
            | Error::MissingKey { .. }
            | Error::MissingLength { .. }
            | Error::NoInput { .. }
            | Error::NoOutput { .. }
            | Error::Poisoned { .. } => ErrorKind::CallerMisuse,
            Error::InvalidKey { .. }
            | Error::UnexpectedEof { .. }
            | Error::UnexpectedMarker { .. }
            | Error::UnexpectedElement { .. }
            | Error::LengthOverrun { .. }
            | Error::LengthMismatch { .. }
            | Error::UnclassifiedValue { .. }
            | Error::UndefinedFragmentLength { .. }
            | Error::OddItemLength { .. }
            | Error::DepthLimit { .. } => ErrorKind::StructuralViolation,
        }
    }
}

fn io_kind(e: &io::Error) -> ErrorKind {
    if e.kind() == io::ErrorKind::WriteZero {
        ErrorKind::ShortWrite
    } else {
        ErrorKind::Io
    }
}
