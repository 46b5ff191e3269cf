//! Explicit VR Little Endian syntax transfer implementation

use crate::encode::{
    Encode, LengthOverflowSnafu, MissingVrSnafu, Result, WriteItemDelimiterSnafu,
    WriteItemHeaderSnafu, WriteLengthSnafu, WriteSequenceDelimiterSnafu, WriteTagSnafu,
    WriteVrSnafu,
};
use byteordered::byteorder::{ByteOrder, LittleEndian};
use dicm_core::header::{Key, Tag};
use snafu::{OptionExt, ResultExt};
use std::io::Write;

/// A concrete encoder for the transfer syntax ExplicitVRLittleEndian.
///
/// The encapsulated transfer syntax uses this same encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitVRLittleEndianEncoder;

impl Encode for ExplicitVRLittleEndianEncoder {
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
        let vr = key.vr.context(MissingVrSnafu { tag: key.tag })?;
        self.encode_tag(to, key.tag)?;
        to.write_all(&vr.to_bytes()).context(WriteVrSnafu)?;
        let len_bytes = self.encode_value_length(to, key)?;
        Ok(6 + len_bytes)
    }

    fn encode_value_length<W>(&self, to: &mut W, key: &Key) -> Result<usize>
    where
        W: ?Sized + Write,
    {
        if key.is_short_form() {
            // PS3.5 7.1.2:
            // for VRs of AE, AS, AT, CS, DA, DS, DT, FL, FD, IS, LO, LT, PN,
            // SH, SL, SS, ST, TM, UI, UL and US the Value Length Field is the
            // 16-bit unsigned integer following the two byte VR Field
            let len = key
                .len
                .get()
                .filter(|len| *len <= u32::from(u16::MAX))
                .context(LengthOverflowSnafu {
                    tag: key.tag,
                    len: key.len,
                })?;
            let mut buf = [0u8; 2];
            LittleEndian::write_u16(&mut buf, len as u16);
            to.write_all(&buf).context(WriteLengthSnafu)?;
            Ok(2)
        } else {
            // PS3.5 7.1.2:
            // for all other VRs the 16 bits following the two byte VR Field
            // are reserved and shall be set to 0000H.
            // The Value Length Field is a 32-bit unsigned integer.
            let mut buf = [0u8; 6];
            LittleEndian::write_u32(&mut buf[2..], key.len.0);
            to.write_all(&buf).context(WriteLengthSnafu)?;
            Ok(6)
        }
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
