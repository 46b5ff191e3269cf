//! Explicit VR Big Endian syntax transfer implementation.

use crate::decode::{
    marker, read_header_start, read_long_length, Decode, Header, InvalidVrSnafu,
    ReservedBytesSnafu, Result,
};
use byteordered::byteorder::{BigEndian, ByteOrder};
use dicm_core::header::{Key, Length, Tag, VR};
use std::io::Read;

/// A header decoder for the Explicit VR Big Endian transfer syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitVRBigEndianDecoder;

impl Decode for ExplicitVRBigEndianDecoder {
    fn decode_header<S>(&self, source: &mut S) -> Result<Option<(Header, usize)>>
    where
        S: ?Sized + Read,
    {
        let mut buf = [0u8; 8];
        if !read_header_start(source, &mut buf)? {
            return Ok(None);
        }
        // retrieve tag
        let tag = Tag(
            BigEndian::read_u16(&buf[0..2]),
            BigEndian::read_u16(&buf[2..4]),
        );
        if tag.is_delimiter() {
            let len = BigEndian::read_u32(&buf[4..8]);
            return marker(tag, len).map(|header| Some((header, 8)));
        }

        // the VR characters are never swapped
        let bytes = [buf[4], buf[5]];
        let vr = match VR::from_binary(bytes) {
            Some(vr) => vr,
            None => return InvalidVrSnafu { tag, bytes }.fail(),
        };

        let (len, bytes_read) = if vr.is_short_form() {
            (u32::from(BigEndian::read_u16(&buf[6..8])), 8)
        } else {
            let reserved = [buf[6], buf[7]];
            if reserved != [0, 0] {
                return ReservedBytesSnafu {
                    tag,
                    bytes: reserved,
                }
                .fail();
            }
            let mut len_buf = [0u8; 4];
            read_long_length(source, &mut len_buf)?;
            (BigEndian::read_u32(&len_buf), 12)
        };

        Ok(Some((Header::Element(Key::new(tag, vr, Length(len))), bytes_read)))
    }
}
