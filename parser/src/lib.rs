#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]
//! This crate provides a streaming pull parser and push emitter
//! of DICOM-like data sets.
//!
//! - [`Parser`] reads a byte source and produces structural [`Event`]s:
//!   document, element key and value, sequence and item boundaries,
//!   and pixel data fragments.
//!   Value bytes are handed over in chunks, on request.
//! - [`Emitter`] takes the same events and writes them back,
//!   in any of the supported transfer syntaxes.
//!
//! Both are built on a stack of nesting levels,
//! one per sequence or fragment train entered,
//! which reconciles items and sequences of defined length
//! with those closed by delimiters.
//!
//! All APIs are based on synchronous I/O.
//! Logging goes through `tracing`.
//!
//! ```
//! use dicm_parser::{Emitter, Event, Key, Length, Parser, Tag, TransferSyntax, VR};
//! # fn main() -> Result<(), dicm_parser::Error> {
//! let ts = TransferSyntax::ExplicitVRLittleEndian;
//! let mut emitter = Emitter::from_sink(ts, Vec::new());
//! emitter.emit(Event::DocumentStart)?;
//! emitter.emit_key(Key::new(Tag(0x0010, 0x0010), VR::PN, Length(8)))?;
//! emitter.emit_value(b"DOE^JOHN")?;
//! emitter.emit(Event::DocumentEnd)?;
//! let bytes = emitter.into_inner().unwrap_or_default();
//!
//! let mut parser = Parser::from_source(ts, &bytes[..]);
//! assert_eq!(parser.next_event()?, Event::DocumentStart);
//! assert_eq!(parser.next_event()?, Event::Key);
//! assert_eq!(parser.key()?.tag, Tag(0x0010, 0x0010));
//! assert_eq!(parser.next_event()?, Event::Value);
//! let mut name = Vec::new();
//! parser.read_value_to_end(&mut name)?;
//! assert_eq!(name, b"DOE^JOHN");
//! assert_eq!(parser.next_event()?, Event::DocumentEnd);
//! # Ok(())
//! # }
//! ```

pub mod emitter;
pub mod error;
pub mod event;
mod level;
pub mod parser;

pub use dicm_core::header::{Key, Length, Tag, VR};
pub use dicm_encoding::TransferSyntax;
pub use emitter::{Emitter, EmitterOptions};
pub use error::{Error, ErrorKind, Result};
pub use event::{Event, State};
pub use parser::{Parser, ParserOptions, UnreadValueStrategy};
