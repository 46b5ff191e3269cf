#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]
//! Transfer syntax codecs of the dicm streaming codec.
//!
//! This crate provides the byte level encoding and decoding of element keys
//! and structural markers (item starts and delimiters)
//! for the four supported transfer syntaxes:
//!
//! - Implicit VR Little Endian;
//! - Explicit VR Little Endian;
//! - Explicit VR Big Endian;
//! - Explicit VR Little Endian with encapsulated pixel data fragments.
//!
//! The [transfer syntax specifier] selects one of them at run-time
//! and implements both [`Decode`] and [`Encode`] by dispatching to the
//! concrete codec.
//!
//! All APIs are based on synchronous I/O.
//!
//! [transfer syntax specifier]: ./transfer_syntax/index.html

pub mod decode;
pub mod encode;
pub mod transfer_syntax;

pub use byteordered::Endianness;
pub use decode::{Decode, Header};
pub use encode::Encode;
pub use transfer_syntax::{TransferSyntax, ValueKind};
