//! Implicit VR Little Endian syntax transfer implementation

use crate::decode::{marker, read_header_start, Decode, Header, Result};
use byteordered::byteorder::{ByteOrder, LittleEndian};
use dicm_core::header::{Key, Length, Tag};
use std::io::Read;

/// A header decoder for the Implicit VR Little Endian transfer syntax.
///
/// Keys are always 8 bytes long and carry no value representation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImplicitVRLittleEndianDecoder;

impl Decode for ImplicitVRLittleEndianDecoder {
    fn decode_header<S>(&self, source: &mut S) -> Result<Option<(Header, usize)>>
    where
        S: ?Sized + Read,
    {
        let mut buf = [0u8; 8];
        if !read_header_start(source, &mut buf)? {
            return Ok(None);
        }
        let tag = Tag(
            LittleEndian::read_u16(&buf[0..2]),
            LittleEndian::read_u16(&buf[2..4]),
        );
        let len = LittleEndian::read_u32(&buf[4..8]);
        if tag.is_delimiter() {
            return marker(tag, len).map(|header| Some((header, 8)));
        }
        Ok(Some((Header::Element(Key::implicit(tag, Length(len))), 8)))
    }
}
