//! The reading half of a level: turns bytes into tokens and states.

use super::{Level, LevelKind, Token};
use crate::error::{
    DecodeHeaderSnafu, EmptyDocumentSnafu, InvalidKeySnafu, InvalidStateSnafu, Result,
    UnclassifiedValueSnafu, UndefinedFragmentLengthSnafu, UnexpectedElementSnafu,
    UnexpectedEofSnafu, UnexpectedMarkerSnafu,
};
use crate::event::State;
use dicm_core::header::{Key, SequenceItemHeader};
use dicm_encoding::{Decode, Header, TransferSyntax, ValueKind};
use snafu::{OptionExt, ResultExt};
use std::io::Read;

impl Level {
    /// Advance this level by one token read from the source,
    /// returning the new state.
    pub(crate) fn read_next<S>(&mut self, ts: TransferSyntax, source: &mut S) -> Result<State>
    where
        S: ?Sized + Read,
    {
        let token = match (self.kind, self.state) {
            (LevelKind::Root, State::Init) => {
                self.state = State::StartDocument;
                return Ok(self.state);
            }
            (LevelKind::Root, State::StartDocument) => match self.read_element(ts, source)? {
                Token::Eof => return EmptyDocumentSnafu.fail(),
                token => token,
            },
            (LevelKind::Root, State::Value | State::EndSequence) => {
                self.read_element(ts, source)?
            }
            (LevelKind::Root | LevelKind::Items, State::Key) => self.classify_key(ts)?,
            (LevelKind::Items, State::StartSequence | State::EndItem) => {
                self.read_item_marker(ts, source)?
            }
            (LevelKind::Items, State::StartItem | State::Value | State::EndSequence) => {
                self.read_item_element(ts, source)?
            }
            (LevelKind::Fragments, State::StartFragments | State::Value) => {
                self.read_fragment_marker(ts, source)?
            }
            (LevelKind::Fragments, State::Fragment) => Token::Value,
            (_, state) => {
                return InvalidStateSnafu {
                    operation: "read the next event",
                    state,
                }
                .fail()
            }
        };

        self.state = match token {
            Token::Key => State::Key,
            Token::Value => State::Value,
            Token::Fragment => State::Fragment,
            Token::StartItem => State::StartItem,
            Token::EndItem => State::EndItem,
            Token::StartSequence => State::StartSequence,
            Token::StartFragments => State::StartFragments,
            Token::EndSequence => State::EndSequence,
            Token::Eof => State::EndDocument,
        };
        Ok(self.state)
    }

    /// Read the next element key of the root data set.
    fn read_element<S>(&mut self, ts: TransferSyntax, source: &mut S) -> Result<Token>
    where
        S: ?Sized + Read,
    {
        match ts.decode_header(source).context(DecodeHeaderSnafu)? {
            None => Ok(Token::Eof),
            Some((Header::Element(key), size)) => self.accept_key(key, size),
            Some((Header::Marker(marker), _)) => UnexpectedMarkerSnafu {
                marker,
                state: self.state,
            }
            .fail(),
        }
    }

    /// Read the next element key of an item, or the end of the item.
    fn read_item_element<S>(&mut self, ts: TransferSyntax, source: &mut S) -> Result<Token>
    where
        S: ?Sized + Read,
    {
        if self.item.is_complete() {
            self.leave_item(false)?;
            return Ok(Token::EndItem);
        }
        match ts.decode_header(source).context(DecodeHeaderSnafu)? {
            None => UnexpectedEofSnafu { state: self.state }.fail(),
            Some((Header::Element(key), size)) => self.accept_key(key, size),
            Some((Header::Marker(SequenceItemHeader::ItemDelimiter), _))
                if self.item.is_delimited() =>
            {
                self.leave_item(true)?;
                Ok(Token::EndItem)
            }
            Some((Header::Marker(marker), _)) => UnexpectedMarkerSnafu {
                marker,
                state: self.state,
            }
            .fail(),
        }
    }

    /// Read the next item start marker, or the end of the sequence.
    fn read_item_marker<S>(&mut self, ts: TransferSyntax, source: &mut S) -> Result<Token>
    where
        S: ?Sized + Read,
    {
        if self.sequence.is_complete() {
            self.leave_sequence(false)?;
            return Ok(Token::EndSequence);
        }
        match ts.decode_header(source).context(DecodeHeaderSnafu)? {
            None => UnexpectedEofSnafu { state: self.state }.fail(),
            Some((Header::Marker(SequenceItemHeader::Item { len }), _)) => {
                self.enter_item(len)?;
                Ok(Token::StartItem)
            }
            Some((Header::Marker(SequenceItemHeader::SequenceDelimiter), _))
                if self.sequence.is_delimited() =>
            {
                self.leave_sequence(true)?;
                Ok(Token::EndSequence)
            }
            Some((Header::Marker(marker), _)) => UnexpectedMarkerSnafu {
                marker,
                state: self.state,
            }
            .fail(),
            Some((Header::Element(key), _)) => UnexpectedElementSnafu {
                tag: key.tag,
                state: self.state,
            }
            .fail(),
        }
    }

    /// Read the next fragment start marker, or the end of the fragment train.
    fn read_fragment_marker<S>(&mut self, ts: TransferSyntax, source: &mut S) -> Result<Token>
    where
        S: ?Sized + Read,
    {
        self.fold_fragment()?;
        match ts.decode_header(source).context(DecodeHeaderSnafu)? {
            None => UnexpectedEofSnafu { state: self.state }.fail(),
            Some((Header::Marker(SequenceItemHeader::Item { len }), _)) => {
                let len = len.get().context(UndefinedFragmentLengthSnafu)?;
                self.enter_fragment(len)?;
                Ok(Token::Fragment)
            }
            Some((Header::Marker(SequenceItemHeader::SequenceDelimiter), _)) => {
                self.leave_sequence(true)?;
                Ok(Token::EndSequence)
            }
            Some((Header::Marker(marker), _)) => UnexpectedMarkerSnafu {
                marker,
                state: self.state,
            }
            .fail(),
            // fragment trains hold no elements, and so no nested sequences
            Some((Header::Element(key), _)) => UnexpectedElementSnafu {
                tag: key.tag,
                state: self.state,
            }
            .fail(),
        }
    }

    fn accept_key(&mut self, key: Key, size: usize) -> Result<Token> {
        key.validate().context(InvalidKeySnafu)?;
        self.enter_key(key, size)?;
        Ok(Token::Key)
    }

    /// Decide what follows the current key.
    fn classify_key(&mut self, ts: TransferSyntax) -> Result<Token> {
        let key = self.key.context(InvalidStateSnafu {
            operation: "classify a missing key",
            state: self.state,
        })?;
        match ts.classify(&key) {
            Some(ValueKind::Primitive) => Ok(Token::Value),
            Some(ValueKind::Sequence) => Ok(Token::StartSequence),
            Some(ValueKind::Fragments) => Ok(Token::StartFragments),
            None => UnclassifiedValueSnafu { key, ts }.fail(),
        }
    }
}
