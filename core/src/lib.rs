#![crate_type = "lib"]
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]

//! This is the core library of dicm-rs, containing the primitive data types
//! shared by the codecs, the parser and the emitter.
//!
//! The current structure of this crate is as follows:
//!
//! - [`header`] comprises the data types describing an element key
//!   (tag, value representation and value length)
//!   and the structural markers delimiting items and sequences,
//!   along with the rules which make a key well formed.
//!
//! [`header`]: ./header/index.html

pub mod header;

pub use header::{InvalidKeyError, Key, Length, SequenceItemHeader, Tag, VR};
