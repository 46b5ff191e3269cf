//! Implicit VR Little Endian syntax transfer implementation

use crate::encode::{
    Encode, Result, WriteItemDelimiterSnafu, WriteItemHeaderSnafu, WriteLengthSnafu,
    WriteSequenceDelimiterSnafu, WriteTagSnafu,
};
use byteordered::byteorder::{ByteOrder, LittleEndian};
use dicm_core::header::{Key, Tag};
use snafu::ResultExt;
use std::io::Write;

/// A concrete encoder for the transfer syntax ImplicitVRLittleEndian.
///
/// The value representation of a key, if any, is never written.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImplicitVRLittleEndianEncoder;

impl Encode for ImplicitVRLittleEndianEncoder {
    fn encode_tag<W>(&self, to: &mut W, tag: Tag) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 4];
        LittleEndian::write_u16(&mut buf[..], tag.group());
        LittleEndian::write_u16(&mut buf[2..], tag.element());
        to.write_all(&buf).context(WriteTagSnafu)
    }

    fn encode_key<W>(&self, to: &mut W, key: &Key) -> Result<usize>
    where
        W: ?Sized + Write,
    {
        self.encode_tag(to, key.tag)?;
        let len_bytes = self.encode_value_length(to, key)?;
        Ok(4 + len_bytes)
    }

    fn encode_value_length<W>(&self, to: &mut W, key: &Key) -> Result<usize>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, key.len.0);
        to.write_all(&buf).context(WriteLengthSnafu)?;
        Ok(4)
    }

    fn encode_item_header<W>(&self, to: &mut W, len: u32) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 8];
        LittleEndian::write_u16(&mut buf, 0xFFFE);
        LittleEndian::write_u16(&mut buf[2..], 0xE000);
        LittleEndian::write_u32(&mut buf[4..], len);
        to.write_all(&buf).context(WriteItemHeaderSnafu)
    }

    fn encode_item_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 8];
        LittleEndian::write_u16(&mut buf, 0xFFFE);
        LittleEndian::write_u16(&mut buf[2..], 0xE00D);
        to.write_all(&buf).context(WriteItemDelimiterSnafu)
    }

    fn encode_sequence_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 8];
        LittleEndian::write_u16(&mut buf, 0xFFFE);
        LittleEndian::write_u16(&mut buf[2..], 0xE0DD);
        to.write_all(&buf).context(WriteSequenceDelimiterSnafu)
    }
}
