//! Explicit VR Little Endian syntax transfer implementation

use crate::decode::{
    marker, read_header_start, read_long_length, Decode, Header, InvalidVrSnafu,
    ReservedBytesSnafu, Result,
};
use byteordered::byteorder::{ByteOrder, LittleEndian};
use dicm_core::header::{Key, Length, Tag, VR};
use std::io::Read;

/// A header decoder for the Explicit VR Little Endian transfer syntax.
///
/// The encapsulated transfer syntax uses this same decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitVRLittleEndianDecoder;

impl Decode for ExplicitVRLittleEndianDecoder {
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
            LittleEndian::read_u16(&buf[0..2]),
            LittleEndian::read_u16(&buf[2..4]),
        );
        if tag.is_delimiter() {
            let len = LittleEndian::read_u32(&buf[4..8]);
            return marker(tag, len).map(|header| Some((header, 8)));
        }

        let bytes = [buf[4], buf[5]];
        let vr = match VR::from_binary(bytes) {
            Some(vr) => vr,
            None => return InvalidVrSnafu { tag, bytes }.fail(),
        };

        let (len, bytes_read) = if vr.is_short_form() {
            // PS3.5 7.1.2:
            // 16-bit unsigned value length following the two byte VR Field
            (u32::from(LittleEndian::read_u16(&buf[6..8])), 8)
        } else {
            // PS3.5 7.1.2:
            // two reserved bytes, then a 32-bit unsigned value length
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
            (LittleEndian::read_u32(&len_buf), 12)
        };

        Ok(Some((Header::Element(Key::new(tag, vr, Length(len))), bytes_read)))
    }
}

#[cfg(test)]
mod tests {
    use super::ExplicitVRLittleEndianDecoder;
    use crate::decode::{Decode, Error, Header};
    use dicm_core::header::{Key, Length, SequenceItemHeader, Tag, VR};
    use matches::assert_matches;
    use std::io::{Cursor, Read};

    // manually crafting some DICOM data elements
    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x10, 0x00, 0x10, 0x00,     // (0010,0010) (LE) Patient's Name
            b'P', b'N',             // VR: PN (Person Name)
            0x08, 0x00,             // Length: 8 bytes (LE)
                b'D', b'O', b'E', b'^', b'J', b'O', b'H', b'N',
        0x08, 0x00, 0x15, 0x11,     // (0008,1115) (LE) Referenced Series Sequence
            b'S', b'Q',             // VR: SQ (Sequence)
            0x00, 0x00,             // Reserved
            0xFF, 0xFF, 0xFF, 0xFF, // Length: undefined
        0xFE, 0xFF, 0x00, 0xE0,     // (FFFE,E000) (LE) Item
            0x10, 0x00, 0x00, 0x00, // Length: 16 bytes (LE)
        0xFE, 0xFF, 0xDD, 0xE0,     // (FFFE,E0DD) (LE) Sequence Delimiter
            0x00, 0x00, 0x00, 0x00, // Length: 0
    ];

    #[test]
    fn decode_keys_and_markers() {
        let dec = ExplicitVRLittleEndianDecoder;
        let mut cursor = Cursor::new(RAW);

        let (header, bytes_read) = dec.decode_header(&mut cursor).unwrap().unwrap();
        assert_eq!(
            header,
            Header::Element(Key::new(Tag(0x0010, 0x0010), VR::PN, Length(8)))
        );
        assert_eq!(bytes_read, 8);
        let mut value = [0u8; 8];
        cursor.read_exact(&mut value).unwrap();
        assert_eq!(&value, b"DOE^JOHN");

        let (header, bytes_read) = dec.decode_header(&mut cursor).unwrap().unwrap();
        assert_eq!(
            header,
            Header::Element(Key::new(Tag(0x0008, 0x1115), VR::SQ, Length::UNDEFINED))
        );
        assert_eq!(bytes_read, 12);

        let (header, bytes_read) = dec.decode_header(&mut cursor).unwrap().unwrap();
        assert_eq!(
            header,
            Header::Marker(SequenceItemHeader::Item { len: Length(16) })
        );
        assert_eq!(bytes_read, 8);

        let (header, _) = dec.decode_header(&mut cursor).unwrap().unwrap();
        assert_eq!(header, Header::Marker(SequenceItemHeader::SequenceDelimiter));

        // clean end of stream
        assert_matches!(dec.decode_header(&mut cursor), Ok(None));
    }

    #[test]
    fn reject_bad_vr() {
        #[rustfmt::skip]
        let raw: &[u8] = &[
            0x10, 0x00, 0x10, 0x00, // (0010,0010)
                b'p', b'n',         // lower case VR
                0x02, 0x00,
        ];
        let dec = ExplicitVRLittleEndianDecoder;
        assert_matches!(
            dec.decode_header(&mut Cursor::new(raw)),
            Err(Error::InvalidVr { .. })
        );
    }

    #[test]
    fn reject_non_zero_reserved_bytes() {
        #[rustfmt::skip]
        let raw: &[u8] = &[
            0x08, 0x00, 0x15, 0x11,     // (0008,1115)
                b'O', b'B',             // VR: OB
                0xAB, 0xCD,             // Reserved, should be 0
                0x02, 0x00, 0x00, 0x00, // Length: 2 bytes (LE)
                0x01, 0x02,
        ];
        let dec = ExplicitVRLittleEndianDecoder;
        assert_matches!(
            dec.decode_header(&mut Cursor::new(raw)),
            Err(Error::ReservedBytes {
                tag: Tag(0x0008, 0x1115),
                bytes: [0xAB, 0xCD],
                ..
            })
        );
    }

    #[test]
    fn reject_truncated_headers() {
        let dec = ExplicitVRLittleEndianDecoder;
        assert_matches!(
            dec.decode_header(&mut Cursor::new(&RAW[..5])),
            Err(Error::ShortRead {
                expected: 8,
                read: 5,
                ..
            })
        );
        // long-form key without its length field
        assert_matches!(
            dec.decode_header(&mut Cursor::new(&RAW[16..26])),
            Err(Error::ShortRead {
                expected: 12,
                read: 10,
                ..
            })
        );
    }

    #[test]
    fn reject_delimiter_with_length() {
        #[rustfmt::skip]
        let raw: &[u8] = &[
            0xFE, 0xFF, 0x0D, 0xE0,     // (FFFE,E00D) Item Delimiter
                0x04, 0x00, 0x00, 0x00, // Length: 4, should be 0
        ];
        let dec = ExplicitVRLittleEndianDecoder;
        assert_matches!(
            dec.decode_header(&mut Cursor::new(raw)),
            Err(Error::BadSequenceHeader { .. })
        );
    }
}
