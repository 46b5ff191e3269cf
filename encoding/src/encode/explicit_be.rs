//! Explicit VR Big Endian syntax transfer implementation.

use crate::encode::{
    Encode, LengthOverflowSnafu, MissingVrSnafu, Result, WriteItemDelimiterSnafu,
    WriteItemHeaderSnafu, WriteLengthSnafu, WriteSequenceDelimiterSnafu, WriteTagSnafu,
    WriteVrSnafu,
};
use byteordered::byteorder::{BigEndian, ByteOrder};
use dicm_core::header::{Key, Tag};
use snafu::{OptionExt, ResultExt};
use std::io::Write;

/// A concrete encoder for the transfer syntax ExplicitVRBigEndian.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitVRBigEndianEncoder;

impl Encode for ExplicitVRBigEndianEncoder {
    fn encode_tag<W>(&self, to: &mut W, tag: Tag) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 4];
        BigEndian::write_u16(&mut buf[..], tag.group());
        BigEndian::write_u16(&mut buf[2..], tag.element());
        to.write_all(&buf).context(WriteTagSnafu)
    }

    fn encode_key<W>(&self, to: &mut W, key: &Key) -> Result<usize>
    where
        W: ?Sized + Write,
    {
        let vr = key.vr.context(MissingVrSnafu { tag: key.tag })?;
        self.encode_tag(to, key.tag)?;
        // VR characters are written as is
        to.write_all(&vr.to_bytes()).context(WriteVrSnafu)?;
        let len_bytes = self.encode_value_length(to, key)?;
        Ok(6 + len_bytes)
    }

    fn encode_value_length<W>(&self, to: &mut W, key: &Key) -> Result<usize>
    where
        W: ?Sized + Write,
    {
        if key.is_short_form() {
            let len = key
                .len
                .get()
                .filter(|len| *len <= u32::from(u16::MAX))
                .context(LengthOverflowSnafu {
                    tag: key.tag,
                    len: key.len,
                })?;
            let mut buf = [0u8; 2];
            BigEndian::write_u16(&mut buf, len as u16);
            to.write_all(&buf).context(WriteLengthSnafu)?;
            Ok(2)
        } else {
            // 2 reserved bytes, then the 32-bit length
            let mut buf = [0u8; 6];
            BigEndian::write_u32(&mut buf[2..], key.len.0);
            to.write_all(&buf).context(WriteLengthSnafu)?;
            Ok(6)
        }
    }

    fn encode_item_header<W>(&self, to: &mut W, len: u32) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 8];
        BigEndian::write_u16(&mut buf, 0xFFFE);
        BigEndian::write_u16(&mut buf[2..], 0xE000);
        BigEndian::write_u32(&mut buf[4..], len);
        to.write_all(&buf).context(WriteItemHeaderSnafu)
    }

    fn encode_item_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 8];
        BigEndian::write_u16(&mut buf, 0xFFFE);
        BigEndian::write_u16(&mut buf[2..], 0xE00D);
        to.write_all(&buf).context(WriteItemDelimiterSnafu)
    }

    fn encode_sequence_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 8];
        BigEndian::write_u16(&mut buf, 0xFFFE);
        BigEndian::write_u16(&mut buf[2..], 0xE0DD);
        to.write_all(&buf).context(WriteSequenceDelimiterSnafu)
    }
}
