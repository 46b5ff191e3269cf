//! Helpers shared by the integration tests:
//! a small data set model, and functions to emit it and to parse it back
//! as a flat list of records.
#![allow(dead_code)]

use dicm_parser::{Emitter, Event, Key, Length, Parser, Result, Tag, TransferSyntax, VR};

/// An event along with the data the caller sees next to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    DocumentStart,
    DocumentEnd,
    Key(Key),
    Value(Vec<u8>),
    /// a fragment event followed by its value
    Fragment(Vec<u8>),
    /// an item start with its raw declared length
    ItemStart(u32),
    ItemEnd,
    SequenceStart,
    SequenceEnd,
}

/// Parse the whole data set, reading every value.
pub fn parse_all(ts: TransferSyntax, bytes: &[u8]) -> Result<Vec<Record>> {
    let mut parser = Parser::from_source(ts, bytes);
    let mut out = Vec::new();
    loop {
        let record = match parser.next_event()? {
            Event::DocumentStart => Record::DocumentStart,
            Event::DocumentEnd => {
                out.push(Record::DocumentEnd);
                return Ok(out);
            }
            Event::Key => Record::Key(parser.key()?),
            Event::Value => {
                let mut value = Vec::new();
                parser.read_value_to_end(&mut value)?;
                assert_eq!(parser.value_length()?.0 as usize, value.len());
                Record::Value(value)
            }
            Event::Fragment => {
                let len = parser.value_length()?;
                assert_eq!(parser.next_event()?, Event::Value);
                let mut value = Vec::new();
                parser.read_value_to_end(&mut value)?;
                assert_eq!(len.0 as usize, value.len());
                Record::Fragment(value)
            }
            Event::ItemStart => Record::ItemStart(parser.value_length()?.0),
            Event::ItemEnd => Record::ItemEnd,
            Event::SequenceStart => Record::SequenceStart,
            Event::SequenceEnd => Record::SequenceEnd,
        };
        out.push(record);
    }
}

/// Emit the given records into a new byte vector.
pub fn emit_all(ts: TransferSyntax, records: &[Record]) -> Result<Vec<u8>> {
    let mut emitter = Emitter::from_sink(ts, Vec::new());
    for record in records {
        match record {
            Record::DocumentStart => emitter.emit(Event::DocumentStart)?,
            Record::DocumentEnd => emitter.emit(Event::DocumentEnd)?,
            Record::Key(key) => emitter.emit_key(*key)?,
            Record::Value(value) => emitter.emit_value(value)?,
            Record::Fragment(value) => emitter.emit_fragment(value)?,
            Record::ItemStart(len) => emitter.emit_item_start(Length(*len))?,
            Record::ItemEnd => emitter.emit(Event::ItemEnd)?,
            Record::SequenceStart => emitter.emit(Event::SequenceStart)?,
            Record::SequenceEnd => emitter.emit(Event::SequenceEnd)?,
        }
    }
    Ok(emitter.into_inner().unwrap_or_default())
}

/// A node of a data set tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Tag, VR, Vec<u8>),
    Sequence(Tag, Vec<Vec<Node>>),
    Fragments(Vec<Vec<u8>>),
}

/// A data set with nested, empty and sibling sequences,
/// plus pixel data fitting the transfer syntax.
pub fn sample(ts: TransferSyntax) -> Vec<Node> {
    let mut nodes = vec![
        Node::Element(Tag(0x0008, 0x0005), VR::CS, b"ISO_IR 100".to_vec()),
        Node::Sequence(
            Tag(0x0008, 0x1115),
            vec![
                vec![Node::Element(Tag(0x0008, 0x1150), VR::UI, b"1.2.3.4\0".to_vec())],
                vec![
                    Node::Element(Tag(0x0008, 0x1155), VR::UI, b"1.2.3.4.5\0".to_vec()),
                    Node::Sequence(
                        Tag(0x0040, 0xA730),
                        vec![vec![Node::Element(
                            Tag(0x0040, 0xA010),
                            VR::CS,
                            b"CONTAINS".to_vec(),
                        )]],
                    ),
                ],
                vec![],
            ],
        ),
        Node::Sequence(Tag(0x0040, 0x0275), vec![]),
        Node::Element(Tag(0x0010, 0x0010), VR::PN, b"DOE^JOHN".to_vec()),
        Node::Element(Tag(0x0028, 0x0010), VR::US, vec![0x00, 0x02]),
    ];
    if ts.is_encapsulated() {
        nodes.push(Node::Fragments(vec![vec![], vec![1, 2, 3, 4], vec![5, 6]]));
    } else {
        nodes.push(Node::Element(Tag::PIXEL_DATA, VR::OW, vec![1, 2, 3, 4]));
    }
    nodes
}

/// Flatten a data set tree into records,
/// with sequences and items of defined or undefined length.
///
/// Sequences always have an undefined length in implicit VR,
/// since a defined length would make them look like values.
pub fn records(ts: TransferSyntax, nodes: &[Node], defined: bool) -> Vec<Record> {
    let mut out = vec![Record::DocumentStart];
    push_nodes(ts, nodes, defined, &mut out);
    out.push(Record::DocumentEnd);
    out
}

/// The encoded size of a data set tree.
pub fn encoded_len(ts: TransferSyntax, nodes: &[Node], defined: bool) -> u32 {
    nodes
        .iter()
        .map(|node| match node {
            Node::Element(_, vr, value) => key_size(ts, *vr) + value.len() as u32,
            Node::Sequence(_, items) => {
                let delimiter = if sequence_defined(ts, defined) { 0 } else { 8 };
                key_size(ts, VR::SQ) + sequence_content_len(ts, items, defined) + delimiter
            }
            Node::Fragments(fragments) => {
                key_size(ts, VR::OB)
                    + fragments.iter().map(|f| 8 + f.len() as u32).sum::<u32>()
                    + 8
            }
        })
        .sum()
}

/// Undefine all sequence and item lengths.
pub fn without_lengths(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|record| match record {
            Record::Key(key) if key.vr == Some(VR::SQ) => Record::Key(Key {
                len: Length::UNDEFINED,
                ..*key
            }),
            Record::ItemStart(_) => Record::ItemStart(Length::UNDEFINED.0),
            other => other.clone(),
        })
        .collect()
}

fn push_nodes(ts: TransferSyntax, nodes: &[Node], defined: bool, out: &mut Vec<Record>) {
    for node in nodes {
        match node {
            Node::Element(tag, vr, value) => {
                out.push(Record::Key(key(ts, *tag, *vr, Length(value.len() as u32))));
                out.push(Record::Value(value.clone()));
            }
            Node::Sequence(tag, items) => {
                let len = if sequence_defined(ts, defined) {
                    Length(sequence_content_len(ts, items, defined))
                } else {
                    Length::UNDEFINED
                };
                out.push(Record::Key(key(ts, *tag, VR::SQ, len)));
                out.push(Record::SequenceStart);
                for item in items {
                    let len = if defined {
                        encoded_len(ts, item, defined)
                    } else {
                        Length::UNDEFINED.0
                    };
                    out.push(Record::ItemStart(len));
                    push_nodes(ts, item, defined, out);
                    out.push(Record::ItemEnd);
                }
                out.push(Record::SequenceEnd);
            }
            Node::Fragments(fragments) => {
                out.push(Record::Key(key(ts, Tag::PIXEL_DATA, VR::OB, Length::UNDEFINED)));
                out.push(Record::SequenceStart);
                for fragment in fragments {
                    out.push(Record::Fragment(fragment.clone()));
                }
                out.push(Record::SequenceEnd);
            }
        }
    }
}

fn key(ts: TransferSyntax, tag: Tag, vr: VR, len: Length) -> Key {
    if ts.is_explicit_vr() {
        Key::new(tag, vr, len)
    } else {
        Key::implicit(tag, len)
    }
}

fn key_size(ts: TransferSyntax, vr: VR) -> u32 {
    if ts.is_explicit_vr() && !vr.is_short_form() {
        12
    } else {
        8
    }
}

fn sequence_defined(ts: TransferSyntax, defined: bool) -> bool {
    defined && ts.is_explicit_vr()
}

fn sequence_content_len(ts: TransferSyntax, items: &[Vec<Node>], defined: bool) -> u32 {
    let delimiter = if defined { 0 } else { 8 };
    items
        .iter()
        .map(|item| 8 + encoded_len(ts, item, defined) + delimiter)
        .sum()
}
