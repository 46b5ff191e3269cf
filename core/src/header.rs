//! This module contains the data types describing a data element key
//! (tag, value representation and value length),
//! the structural markers which delimit items and sequences,
//! and the rules which make a key well formed.

use snafu::{ensure, Backtrace, Snafu};
use std::fmt;
use std::str::FromStr;

/// Error type for issues constructing a sequence item header.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SequenceItemHeaderError {
    /// Unexpected header tag.
    /// Only Item (0xFFFE, 0xE000),
    /// Item Delimiter (0xFFFE, 0xE00D),
    /// or Sequence Delimiter (0xFFFE, 0xE0DD)
    /// are admitted.
    #[snafu(display("Unexpected tag {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },
    /// Unexpected delimiter value length.
    /// Must be zero for item and sequence delimiters.
    #[snafu(display("Unexpected delimiter length {}", len))]
    UnexpectedDelimiterLength { len: Length, backtrace: Backtrace },
    /// Item lengths must be even, unless undefined.
    #[snafu(display("Odd item length {}", len))]
    OddItemLength { len: Length, backtrace: Backtrace },
}

/// Error type for a data element key which cannot appear in a data set.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum InvalidKeyError {
    /// The tag belongs to a group reserved to command or stream structure.
    #[snafu(display("Tag {} is not admitted as a data element", tag))]
    ReservedTag { tag: Tag, backtrace: Backtrace },
    /// Value lengths must be even, unless undefined.
    #[snafu(display("Odd value length {} in element {}", len, tag))]
    OddLength {
        tag: Tag,
        len: Length,
        backtrace: Backtrace,
    },
    /// Only sequences and encapsulated pixel data may have an undefined length.
    #[snafu(display("Undefined length in element {} with VR {}", tag, vr))]
    UndefinedLength {
        tag: Tag,
        vr: VR,
        backtrace: Backtrace,
    },
    /// Group length elements are always UL.
    #[snafu(display("Group length element {} has VR {} instead of UL", tag, vr))]
    GroupLengthVr {
        tag: Tag,
        vr: VR,
        backtrace: Backtrace,
    },
    /// Private creator elements are always LO.
    #[snafu(display("Private creator element {} has VR {} instead of LO", tag, vr))]
    PrivateCreatorVr {
        tag: Tag,
        vr: VR,
        backtrace: Backtrace,
    },
}

type Result<T, E = SequenceItemHeaderError> = std::result::Result<T, E>;

/// Lowest group number admitted for a data element.
///
/// Groups below this one (command set and file meta information)
/// are not part of a data set stream.
pub const MIN_DATA_GROUP: u16 = 0x0008;

/// The group number of item and delimitation markers.
const DELIMITER_GROUP: u16 = 0xFFFE;

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for DICOM data element tags.
///
/// Both `(u16, u16)` and the packed `u32` form (group in the upper half)
/// can be converted to this type.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Item (start) marker.
    pub const ITEM: Tag = Tag(DELIMITER_GROUP, 0xE000);
    /// Item delimitation marker.
    pub const ITEM_DELIMITER: Tag = Tag(DELIMITER_GROUP, 0xE00D);
    /// Sequence delimitation marker.
    pub const SEQUENCE_DELIMITER: Tag = Tag(DELIMITER_GROUP, 0xE0DD);
    /// Pixel Data
    pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// Whether the tag belongs to a private group (odd group number).
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 % 2 == 1
    }

    /// Whether this is a group length element (element number 0).
    #[inline]
    pub fn is_group_length(self) -> bool {
        self.1 == 0
    }

    /// Whether this is a private creator element,
    /// reserving a block of elements in a private group.
    #[inline]
    pub fn is_private_creator(self) -> bool {
        self.is_private() && (0x0001..=0x00FF).contains(&self.1)
    }

    /// Whether this tag is one of the item or delimitation markers.
    #[inline]
    pub fn is_delimiter(self) -> bool {
        self.0 == DELIMITER_GROUP
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<u32> for Tag {
    #[inline]
    fn from(value: u32) -> Tag {
        Tag((value >> 16) as u16, (value & 0xFFFF) as u16)
    }
}

impl From<Tag> for u32 {
    #[inline]
    fn from(tag: Tag) -> u32 {
        (u32::from(tag.0) << 16) | u32::from(tag.1)
    }
}

/// A DICOM value representation.
///
/// Any pair of upper case ASCII letters is a well formed value
/// representation, including codes unknown to this library,
/// which are then treated as long-form representations.
/// The standard value representations are available as associated constants.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct VR([u8; 2]);

impl VR {
    /// Application Entity
    pub const AE: VR = VR(*b"AE");
    /// Age String
    pub const AS: VR = VR(*b"AS");
    /// Attribute Tag
    pub const AT: VR = VR(*b"AT");
    /// Code String
    pub const CS: VR = VR(*b"CS");
    /// Date
    pub const DA: VR = VR(*b"DA");
    /// Decimal String
    pub const DS: VR = VR(*b"DS");
    /// Date Time
    pub const DT: VR = VR(*b"DT");
    /// Floating Point Single
    pub const FL: VR = VR(*b"FL");
    /// Floating Point Double
    pub const FD: VR = VR(*b"FD");
    /// Integer String
    pub const IS: VR = VR(*b"IS");
    /// Long String
    pub const LO: VR = VR(*b"LO");
    /// Long Text
    pub const LT: VR = VR(*b"LT");
    /// Other Byte
    pub const OB: VR = VR(*b"OB");
    /// Other Double
    pub const OD: VR = VR(*b"OD");
    /// Other Float
    pub const OF: VR = VR(*b"OF");
    /// Other Long
    pub const OL: VR = VR(*b"OL");
    /// Other Very Long
    pub const OV: VR = VR(*b"OV");
    /// Other Word
    pub const OW: VR = VR(*b"OW");
    /// Person Name
    pub const PN: VR = VR(*b"PN");
    /// Short String
    pub const SH: VR = VR(*b"SH");
    /// Signed Long
    pub const SL: VR = VR(*b"SL");
    /// Sequence of Items
    pub const SQ: VR = VR(*b"SQ");
    /// Signed Short
    pub const SS: VR = VR(*b"SS");
    /// Short Text
    pub const ST: VR = VR(*b"ST");
    /// Signed Very Long
    pub const SV: VR = VR(*b"SV");
    /// Time
    pub const TM: VR = VR(*b"TM");
    /// Unlimited Characters
    pub const UC: VR = VR(*b"UC");
    /// Unique Identifier (UID)
    pub const UI: VR = VR(*b"UI");
    /// Unsigned Long
    pub const UL: VR = VR(*b"UL");
    /// Unknown
    pub const UN: VR = VR(*b"UN");
    /// Universal Resource Identifier or Universal Resource Locator (URI/URL)
    pub const UR: VR = VR(*b"UR");
    /// Unsigned Short
    pub const US: VR = VR(*b"US");
    /// Unlimited Text
    pub const UT: VR = VR(*b"UT");
    /// Unsigned Very Long
    pub const UV: VR = VR(*b"UV");

    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case,
    /// otherwise `None` is returned.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        if chars.iter().all(u8::is_ascii_uppercase) {
            Some(VR(chars))
        } else {
            None
        }
    }

    /// Retrieve a copy of this VR's byte representation.
    /// The function returns two alphabetic characters in upper case.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0
    }

    /// Retrieve a string representation of this VR.
    pub fn as_str(&self) -> &str {
        // always two ASCII letters
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    /// Whether this VR is encoded with a 16-bit value length
    /// in explicit VR transfer syntaxes.
    ///
    /// All other representations take two reserved bytes
    /// followed by a 32-bit value length.
    pub fn is_short_form(self) -> bool {
        // PS3.5 7.1.2
        matches!(
            &self.0,
            b"AE"
                | b"AS"
                | b"AT"
                | b"CS"
                | b"DA"
                | b"DS"
                | b"DT"
                | b"FD"
                | b"FL"
                | b"IS"
                | b"LO"
                | b"LT"
                | b"PN"
                | b"SH"
                | b"SL"
                | b"SS"
                | b"ST"
                | b"TM"
                | b"UI"
                | b"UL"
                | b"US"
        )
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two alphabetic ASCII characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        match string.as_bytes() {
            &[a, b] => VR::from_binary([a, b]).ok_or("no such value representation"),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Debug for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "VR({})", self.as_str())
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type for representing data set content length, in bytes.
/// An internal value of `0xFFFF_FFFF` represents an undefined
/// (unspecified) length, which is then determined by an explicit
/// delimitation marker in the stream.
///
/// Two lengths of undefined length are not equal.
///
/// ```
/// # use dicm_core::Length;
/// assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
/// assert!(Length::UNDEFINED.inner_eq(Length::UNDEFINED));
/// ```
#[derive(Clone, Copy)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Check whether this length is undefined (unknown).
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined (not undefined).
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if available.
    /// Returns `None` if it represents an undefined length.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }

    /// Check whether the length is equally specified as another length.
    /// Unlike the implemented `PartialEq`, two undefined lengths are
    /// considered equivalent by this method.
    #[inline]
    pub fn inner_eq(self, other: Length) -> bool {
        self.0 == other.0
    }

    /// Whether this length may appear in a data set stream:
    /// either undefined or an even number of bytes.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.is_undefined() || self.0 % 2 == 0
    }
}

impl From<u32> for Length {
    #[inline]
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", &l),
        }
    }
}

/// The key of a data element: its tag, value representation and length.
///
/// The value representation is `None`
/// when the key was read from (or is meant for) an implicit VR stream.
///
/// Equality between keys compares lengths with [`Length::inner_eq`],
/// so two keys of undefined length may be equal.
#[derive(Debug, Clone, Copy)]
pub struct Key {
    /// DICOM tag
    pub tag: Tag,
    /// Value Representation, if present in the stream
    pub vr: Option<VR>,
    /// Value length
    pub len: Length,
}

impl Key {
    /// Create a key with an explicit value representation.
    #[inline]
    pub fn new<T: Into<Tag>>(tag: T, vr: VR, len: Length) -> Key {
        Key {
            tag: tag.into(),
            vr: Some(vr),
            len,
        }
    }

    /// Create a key without a value representation,
    /// as found in implicit VR streams.
    #[inline]
    pub fn implicit<T: Into<Tag>>(tag: T, len: Length) -> Key {
        Key {
            tag: tag.into(),
            vr: None,
            len,
        }
    }

    /// Whether the key announces a sequence of items by its VR.
    #[inline]
    pub fn is_sequence(&self) -> bool {
        self.vr == Some(VR::SQ)
    }

    /// Whether the key opens an encapsulated pixel data fragment train:
    /// Pixel Data in OB with an undefined length.
    #[inline]
    pub fn is_encapsulated_pixel_data(&self) -> bool {
        self.tag == Tag::PIXEL_DATA && self.vr == Some(VR::OB) && self.len.is_undefined()
    }

    /// Whether the value length is written with 16 bits
    /// in explicit VR streams.
    #[inline]
    pub fn is_short_form(&self) -> bool {
        self.vr.map_or(false, VR::is_short_form)
    }

    /// Check whether the key is admitted in a data set stream.
    ///
    /// Keys without a VR are only checked for their tag and length.
    pub fn validate(&self) -> Result<(), InvalidKeyError> {
        let Key { tag, vr, len } = *self;
        ensure!(
            tag.group() >= MIN_DATA_GROUP && !tag.is_delimiter(),
            ReservedTagSnafu { tag }
        );
        ensure!(len.is_valid(), OddLengthSnafu { tag, len });

        let vr = match vr {
            Some(vr) => vr,
            None => return Ok(()),
        };
        if len.is_undefined() {
            ensure!(
                vr == VR::SQ || self.is_encapsulated_pixel_data(),
                UndefinedLengthSnafu { tag, vr }
            );
        }
        if tag.is_group_length() {
            ensure!(vr == VR::UL, GroupLengthVrSnafu { tag, vr });
        } else if tag.is_private_creator() {
            ensure!(vr == VR::LO, PrivateCreatorVrSnafu { tag, vr });
        }
        Ok(())
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Key) -> bool {
        self.tag == other.tag && self.vr == other.vr && self.len.inner_eq(other.len)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.vr {
            Some(vr) => write!(f, "{} {} {}", self.tag, vr, self.len),
            None => write!(f, "{} {}", self.tag, self.len),
        }
    }
}

/// Data type for describing a structural marker:
/// the start of an item (or fragment), an item delimiter,
/// or a sequence delimiter.
#[derive(Debug, Clone, Copy)]
pub enum SequenceItemHeader {
    /// The start of an item, or of a fragment in a fragment train.
    Item {
        /// the length of the item in bytes (can be 0xFFFFFFFF if undefined)
        len: Length,
    },
    /// The end of an item of undefined length.
    ItemDelimiter,
    /// The end of a sequence of undefined length or of a fragment train.
    SequenceDelimiter,
}

impl SequenceItemHeader {
    /// Create a sequence item header using the marker's raw properties.
    /// An error is raised if the given tag is not an item tag,
    /// an item delimiter or a sequence delimiter,
    /// if a delimiter has a non-zero length,
    /// or if an item has an odd length.
    pub fn new<T: Into<Tag>>(tag: T, len: Length) -> Result<SequenceItemHeader> {
        match tag.into() {
            Tag::ITEM => {
                ensure!(len.is_valid(), OddItemLengthSnafu { len });
                Ok(SequenceItemHeader::Item { len })
            }
            Tag::ITEM_DELIMITER => {
                // delimiters should not have a positive length
                ensure!(len.inner_eq(Length(0)), UnexpectedDelimiterLengthSnafu { len });
                Ok(SequenceItemHeader::ItemDelimiter)
            }
            Tag::SEQUENCE_DELIMITER => {
                ensure!(len.inner_eq(Length(0)), UnexpectedDelimiterLengthSnafu { len });
                Ok(SequenceItemHeader::SequenceDelimiter)
            }
            tag => UnexpectedTagSnafu { tag }.fail(),
        }
    }

    /// The tag of this marker.
    #[inline]
    pub fn tag(&self) -> Tag {
        match *self {
            SequenceItemHeader::Item { .. } => Tag::ITEM,
            SequenceItemHeader::ItemDelimiter => Tag::ITEM_DELIMITER,
            SequenceItemHeader::SequenceDelimiter => Tag::SEQUENCE_DELIMITER,
        }
    }

    /// The length field of this marker (always 0 for delimiters).
    #[inline]
    pub fn length(&self) -> Length {
        match *self {
            SequenceItemHeader::Item { len } => len,
            SequenceItemHeader::ItemDelimiter | SequenceItemHeader::SequenceDelimiter => Length(0),
        }
    }
}

impl PartialEq for SequenceItemHeader {
    fn eq(&self, other: &SequenceItemHeader) -> bool {
        self.tag() == other.tag() && self.length().inner_eq(other.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    #[test]
    fn tag_from_u16_pair() {
        let t = Tag::from((0x0010u16, 0x0020u16));
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
    }

    #[test]
    fn tag_packed_u32() {
        let t = Tag::from(0x0008_0000u32);
        assert_eq!(t, Tag(0x0008, 0x0000));
        assert_eq!(u32::from(Tag(0x7FE0, 0x0010)), 0x7FE0_0010);
    }

    #[test]
    fn tag_classes() {
        assert!(Tag(0x0009, 0x0010).is_private());
        assert!(Tag(0x0009, 0x0010).is_private_creator());
        assert!(!Tag(0x0009, 0x1010).is_private_creator());
        assert!(!Tag(0x0009, 0x0000).is_private_creator());
        assert!(!Tag(0x0010, 0x0010).is_private());
        assert!(Tag(0x0010, 0x0000).is_group_length());
        assert!(Tag::ITEM.is_delimiter());
    }

    #[test]
    fn vr_shape() {
        assert_eq!(VR::from_binary(*b"PN"), Some(VR::PN));
        assert_eq!(VR::from_binary(*b"ZZ").map(|vr| vr.to_bytes()), Some(*b"ZZ"));
        assert_eq!(VR::from_binary(*b"pn"), None);
        assert_eq!(VR::from_binary([0x00, 0x00]), None);
        assert_eq!(VR::from_binary(*b"P1"), None);
        assert_eq!("SQ".parse::<VR>(), Ok(VR::SQ));
        assert!("SQX".parse::<VR>().is_err());
        assert_eq!(VR::OB.to_string(), "OB");
    }

    #[test]
    fn vr_length_form() {
        assert!(VR::PN.is_short_form());
        assert!(VR::US.is_short_form());
        assert!(!VR::OB.is_short_form());
        assert!(!VR::SQ.is_short_form());
        assert!(!VR::UT.is_short_form());
        // unknown representations take the long form
        assert!(!VR::from_binary(*b"XX").map_or(true, VR::is_short_form));
        assert!(!Key::implicit(Tag(0x0010, 0x0010), Length(8)).is_short_form());
    }

    #[test]
    fn length_sentinel() {
        assert!(Length::UNDEFINED.is_undefined());
        assert_eq!(Length::UNDEFINED.get(), None);
        assert_eq!(Length(8).get(), Some(8));
        assert!(Length(8).is_valid());
        assert!(!Length(7).is_valid());
        assert!(Length::UNDEFINED.is_valid());
        assert_eq!(Length::UNDEFINED.to_string(), "U/L");
    }

    #[test]
    fn valid_keys() {
        let keys = [
            Key::new(Tag(0x0010, 0x0010), VR::PN, Length(8)),
            Key::new(Tag(0x0008, 0x1115), VR::SQ, Length::UNDEFINED),
            Key::new(Tag(0x0008, 0x1115), VR::SQ, Length(24)),
            Key::new(Tag::PIXEL_DATA, VR::OB, Length::UNDEFINED),
            Key::new(Tag(0x0010, 0x0000), VR::UL, Length(4)),
            Key::new(Tag(0x0009, 0x0010), VR::LO, Length(12)),
            Key::implicit(Tag(0x0008, 0x0000), Length(4)),
            Key::implicit(Tag(0x0008, 0x1115), Length::UNDEFINED),
        ];
        for key in &keys {
            assert!(key.validate().is_ok(), "{} should be valid", key);
        }
    }

    #[test]
    fn invalid_keys() {
        assert_matches!(
            Key::new(Tag(0x0002, 0x0010), VR::UI, Length(20)).validate(),
            Err(InvalidKeyError::ReservedTag { .. })
        );
        assert_matches!(
            Key::implicit(Tag::ITEM, Length(20)).validate(),
            Err(InvalidKeyError::ReservedTag { .. })
        );
        assert_matches!(
            Key::new(Tag(0x0010, 0x0010), VR::PN, Length(7)).validate(),
            Err(InvalidKeyError::OddLength { .. })
        );
        assert_matches!(
            Key::implicit(Tag(0x0010, 0x0010), Length(7)).validate(),
            Err(InvalidKeyError::OddLength { .. })
        );
        assert_matches!(
            Key::new(Tag(0x0010, 0x0010), VR::PN, Length::UNDEFINED).validate(),
            Err(InvalidKeyError::UndefinedLength { .. })
        );
        assert_matches!(
            Key::new(Tag::PIXEL_DATA, VR::OW, Length::UNDEFINED).validate(),
            Err(InvalidKeyError::UndefinedLength { .. })
        );
        assert_matches!(
            Key::new(Tag(0x0010, 0x0000), VR::US, Length(2)).validate(),
            Err(InvalidKeyError::GroupLengthVr { .. })
        );
        assert_matches!(
            Key::new(Tag(0x0009, 0x0010), VR::SH, Length(2)).validate(),
            Err(InvalidKeyError::PrivateCreatorVr { .. })
        );
    }

    #[test]
    fn key_equality_with_undefined_length() {
        let a = Key::new(Tag(0x0008, 0x1115), VR::SQ, Length::UNDEFINED);
        let b = Key::new(Tag(0x0008, 0x1115), VR::SQ, Length::UNDEFINED);
        assert_eq!(a, b);
        assert_ne!(a, Key::implicit(Tag(0x0008, 0x1115), Length::UNDEFINED));
    }

    #[test]
    fn markers() {
        assert_eq!(
            SequenceItemHeader::new(Tag::ITEM, Length::UNDEFINED).unwrap(),
            SequenceItemHeader::Item {
                len: Length::UNDEFINED
            }
        );
        assert_eq!(
            SequenceItemHeader::new(Tag::SEQUENCE_DELIMITER, Length(0)).unwrap(),
            SequenceItemHeader::SequenceDelimiter
        );
        assert_matches!(
            SequenceItemHeader::new(Tag::ITEM_DELIMITER, Length(4)),
            Err(SequenceItemHeaderError::UnexpectedDelimiterLength { .. })
        );
        assert_matches!(
            SequenceItemHeader::new(Tag::SEQUENCE_DELIMITER, Length::UNDEFINED),
            Err(SequenceItemHeaderError::UnexpectedDelimiterLength { .. })
        );
        assert_matches!(
            SequenceItemHeader::new(Tag::ITEM, Length(3)),
            Err(SequenceItemHeaderError::OddItemLength { .. })
        );
        assert_matches!(
            SequenceItemHeader::new(Tag(0x0010, 0x0010), Length(0)),
            Err(SequenceItemHeaderError::UnexpectedTag { .. })
        );
    }
}
