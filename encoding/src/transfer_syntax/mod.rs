//! Module containing the transfer syntax specifier.
//!
//! A [`TransferSyntax`] is picked once per parsing or emitting run.
//! It dispatches key and marker coding to the concrete codec
//! of its variant, and decides how the value of a key is to be traversed
//! (see [`TransferSyntax::classify`]).

use crate::decode::explicit_be::ExplicitVRBigEndianDecoder;
use crate::decode::explicit_le::ExplicitVRLittleEndianDecoder;
use crate::decode::implicit_le::ImplicitVRLittleEndianDecoder;
use crate::decode::{self, Decode, Header};
use crate::encode::explicit_be::ExplicitVRBigEndianEncoder;
use crate::encode::explicit_le::ExplicitVRLittleEndianEncoder;
use crate::encode::implicit_le::ImplicitVRLittleEndianEncoder;
use crate::encode::{self, Encode};
use byteordered::Endianness;
use dicm_core::header::{Key, Tag};
use snafu::Snafu;
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// One of the supported transfer syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferSyntax {
    /// Implicit VR Little Endian
    ImplicitVRLittleEndian,
    /// Explicit VR Little Endian
    ExplicitVRLittleEndian,
    /// Explicit VR Big Endian
    ExplicitVRBigEndian,
    /// Explicit VR Little Endian,
    /// with pixel data encapsulated in fragments
    Encapsulated,
}

/// How the value of an element is laid out after its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A plain sequence of value bytes.
    Primitive,
    /// A sequence of items, each one a nested data set.
    Sequence,
    /// A train of pixel data fragments.
    Fragments,
}

/// Error type for an unrecognized transfer syntax name or UID.
#[derive(Debug, Snafu)]
#[snafu(display("Unknown transfer syntax `{}`", name))]
pub struct UnknownTransferSyntaxError {
    name: String,
}

impl TransferSyntax {
    /// All supported transfer syntaxes.
    pub const ALL: [TransferSyntax; 4] = [
        TransferSyntax::ImplicitVRLittleEndian,
        TransferSyntax::ExplicitVRLittleEndian,
        TransferSyntax::ExplicitVRBigEndian,
        TransferSyntax::Encapsulated,
    ];

    /// The short name of the transfer syntax.
    pub fn name(self) -> &'static str {
        match self {
            TransferSyntax::ImplicitVRLittleEndian => "ivrle_raw",
            TransferSyntax::ExplicitVRLittleEndian => "evrle_raw",
            TransferSyntax::ExplicitVRBigEndian => "evrbe_raw",
            TransferSyntax::Encapsulated => "evrle_encapsulated",
        }
    }

    /// The DICOM unique identifier of the transfer syntax.
    ///
    /// The encapsulated variant stands for any encapsulated transfer syntax
    /// and so has no single identifier.
    pub fn uid(self) -> Option<&'static str> {
        match self {
            TransferSyntax::ImplicitVRLittleEndian => Some("1.2.840.10008.1.2"),
            TransferSyntax::ExplicitVRLittleEndian => Some("1.2.840.10008.1.2.1"),
            TransferSyntax::ExplicitVRBigEndian => Some("1.2.840.10008.1.2.2"),
            TransferSyntax::Encapsulated => None,
        }
    }

    /// The byte order of keys and markers.
    pub fn endianness(self) -> Endianness {
        match self {
            TransferSyntax::ExplicitVRBigEndian => Endianness::Big,
            _ => Endianness::Little,
        }
    }

    /// Whether keys carry their value representation.
    pub fn is_explicit_vr(self) -> bool {
        self != TransferSyntax::ImplicitVRLittleEndian
    }

    /// Whether pixel data may be encapsulated in fragments.
    pub fn is_encapsulated(self) -> bool {
        self == TransferSyntax::Encapsulated
    }

    /// Decide how the value of the given key is laid out.
    ///
    /// In explicit VR, `SQ` opens a sequence and encapsulated pixel data
    /// opens a fragment train.
    /// In implicit VR, only an undefined length reveals a sequence.
    /// Returns `None` if the key cannot be represented in this transfer
    /// syntax: fragments outside of the encapsulated transfer syntax,
    /// or an undefined length on a primitive value.
    pub fn classify(self, key: &Key) -> Option<ValueKind> {
        if !self.is_explicit_vr() {
            return Some(if key.len.is_undefined() {
                ValueKind::Sequence
            } else {
                ValueKind::Primitive
            });
        }
        if key.is_encapsulated_pixel_data() {
            return if self.is_encapsulated() {
                Some(ValueKind::Fragments)
            } else {
                None
            };
        }
        if key.is_sequence() {
            Some(ValueKind::Sequence)
        } else if key.len.is_undefined() {
            None
        } else {
            Some(ValueKind::Primitive)
        }
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Obtain the transfer syntax by short name or by UID.
impl FromStr for TransferSyntax {
    type Err = UnknownTransferSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // UIDs may come padded with a trailing null character
        let s = s.trim_end_matches('\0');
        TransferSyntax::ALL
            .iter()
            .copied()
            .find(|ts| ts.name() == s || ts.uid() == Some(s))
            .ok_or_else(|| UnknownTransferSyntaxError { name: s.to_string() })
    }
}

impl Decode for TransferSyntax {
    fn decode_header<S>(&self, source: &mut S) -> decode::Result<Option<(Header, usize)>>
    where
        S: ?Sized + Read,
    {
        match self {
            TransferSyntax::ImplicitVRLittleEndian => {
                ImplicitVRLittleEndianDecoder.decode_header(source)
            }
            TransferSyntax::ExplicitVRLittleEndian | TransferSyntax::Encapsulated => {
                ExplicitVRLittleEndianDecoder.decode_header(source)
            }
            TransferSyntax::ExplicitVRBigEndian => ExplicitVRBigEndianDecoder.decode_header(source),
        }
    }
}

/// Forward an `Encode` method to the concrete encoder.
macro_rules! dispatch_encode {
    ($ts: expr, $method: ident ( $($arg: expr),* )) => {
        match $ts {
            TransferSyntax::ImplicitVRLittleEndian => {
                ImplicitVRLittleEndianEncoder.$method($($arg),*)
            }
            TransferSyntax::ExplicitVRLittleEndian | TransferSyntax::Encapsulated => {
                ExplicitVRLittleEndianEncoder.$method($($arg),*)
            }
            TransferSyntax::ExplicitVRBigEndian => ExplicitVRBigEndianEncoder.$method($($arg),*),
        }
    };
}

impl Encode for TransferSyntax {
    fn encode_tag<W>(&self, to: &mut W, tag: Tag) -> encode::Result<()>
    where
        W: ?Sized + Write,
    {
        dispatch_encode!(self, encode_tag(to, tag))
    }

    fn encode_key<W>(&self, to: &mut W, key: &Key) -> encode::Result<usize>
    where
        W: ?Sized + Write,
    {
        dispatch_encode!(self, encode_key(to, key))
    }

    fn encode_value_length<W>(&self, to: &mut W, key: &Key) -> encode::Result<usize>
    where
        W: ?Sized + Write,
    {
        dispatch_encode!(self, encode_value_length(to, key))
    }

    fn encode_item_header<W>(&self, to: &mut W, len: u32) -> encode::Result<()>
    where
        W: ?Sized + Write,
    {
        dispatch_encode!(self, encode_item_header(to, len))
    }

    fn encode_item_delimiter<W>(&self, to: &mut W) -> encode::Result<()>
    where
        W: ?Sized + Write,
    {
        dispatch_encode!(self, encode_item_delimiter(to))
    }

    fn encode_sequence_delimiter<W>(&self, to: &mut W) -> encode::Result<()>
    where
        W: ?Sized + Write,
    {
        dispatch_encode!(self, encode_sequence_delimiter(to))
    }
}
