//! The writing half of a level: turns events into bytes and states.

use super::{Level, LevelKind};
use crate::error::{
    EncodeHeaderSnafu, InvalidKeySnafu, InvalidStateSnafu, MissingKeySnafu, MissingLengthSnafu,
    OddItemLengthSnafu, Result, UnclassifiedValueSnafu, UndefinedFragmentLengthSnafu,
    UnexpectedEventSnafu,
};
use crate::event::{Event, State};
use dicm_core::header::{Key, Length};
use dicm_encoding::{Encode, TransferSyntax, ValueKind};
use snafu::{ensure, OptionExt, ResultExt};
use std::io::Write;

/// The arguments set by the caller ahead of an event.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Pending {
    /// the key of the next key event
    pub key: Option<Key>,
    /// the length of the next item or fragment
    pub len: Option<Length>,
}

impl Level {
    /// Advance this level by the given event, writing what it implies,
    /// and return the new state.
    pub(crate) fn write_next<W>(
        &mut self,
        ts: TransferSyntax,
        sink: &mut W,
        event: Event,
        pending: &mut Pending,
    ) -> Result<State>
    where
        W: ?Sized + Write,
    {
        let state = match (self.kind, self.state, event) {
            (LevelKind::Root, State::Init, Event::DocumentStart) => State::StartDocument,
            (LevelKind::Root, State::StartDocument | State::Value | State::EndSequence, Event::Key)
            | (LevelKind::Items, State::StartItem | State::Value | State::EndSequence, Event::Key) => {
                self.write_key(ts, sink, pending)?
            }
            (LevelKind::Root | LevelKind::Items, State::Key, Event::Value | Event::SequenceStart) => {
                self.open_value(ts, event)?
            }
            (LevelKind::Root, State::Value | State::EndSequence, Event::DocumentEnd) => {
                State::EndDocument
            }
            (LevelKind::Items, State::StartItem | State::Value | State::EndSequence, Event::ItemEnd) => {
                let delimiter = self.item.is_delimited();
                if delimiter {
                    ts.encode_item_delimiter(sink).context(EncodeHeaderSnafu)?;
                }
                self.leave_item(delimiter)?;
                State::EndItem
            }
            (LevelKind::Items, State::StartSequence | State::EndItem, Event::ItemStart) => {
                let len = pending.len.take().unwrap_or(Length::UNDEFINED);
                ensure!(len.is_valid(), OddItemLengthSnafu { len });
                // bounds are checked before the marker is written
                self.enter_item(len)?;
                ts.encode_item_header(sink, len.0)
                    .context(EncodeHeaderSnafu)?;
                State::StartItem
            }
            (LevelKind::Items, State::StartSequence | State::EndItem, Event::SequenceEnd) => {
                let delimiter = self.sequence.is_delimited();
                if delimiter {
                    ts.encode_sequence_delimiter(sink)
                        .context(EncodeHeaderSnafu)?;
                }
                self.leave_sequence(delimiter)?;
                State::EndSequence
            }
            (LevelKind::Fragments, State::StartFragments | State::Value, Event::Fragment) => {
                let len = pending.len.take().context(MissingLengthSnafu)?;
                let n = len.get().context(UndefinedFragmentLengthSnafu)?;
                ensure!(len.is_valid(), OddItemLengthSnafu { len });
                self.fold_fragment()?;
                self.enter_fragment(n)?;
                ts.encode_item_header(sink, n).context(EncodeHeaderSnafu)?;
                State::Fragment
            }
            (LevelKind::Fragments, State::StartFragments | State::Value, Event::SequenceEnd) => {
                self.fold_fragment()?;
                ts.encode_sequence_delimiter(sink)
                    .context(EncodeHeaderSnafu)?;
                self.leave_sequence(true)?;
                State::EndSequence
            }
            (LevelKind::Fragments, State::Fragment, Event::Value) => State::Value,
            (_, state, event) => return UnexpectedEventSnafu { event, state }.fail(),
        };
        self.state = state;
        Ok(state)
    }

    /// Write the pending key in full, length field included.
    fn write_key<W>(&mut self, ts: TransferSyntax, sink: &mut W, pending: &mut Pending) -> Result<State>
    where
        W: ?Sized + Write,
    {
        let key = pending.key.take().context(MissingKeySnafu)?;
        key.validate().context(InvalidKeySnafu)?;
        ts.classify(&key)
            .context(UnclassifiedValueSnafu { key, ts })?;
        let size = ts.encode_key(sink, &key).context(EncodeHeaderSnafu)?;
        self.enter_key(key, size)?;
        Ok(State::Key)
    }

    /// Check the event following a key against the kind of its value.
    fn open_value(&mut self, ts: TransferSyntax, event: Event) -> Result<State> {
        let key = self.key.context(InvalidStateSnafu {
            operation: "open the value of a missing key",
            state: self.state,
        })?;
        // in implicit VR, only the event tells a defined length sequence
        // apart from a value
        let kind = if !ts.is_explicit_vr() && event == Event::SequenceStart {
            Some(ValueKind::Sequence)
        } else {
            ts.classify(&key)
        };
        match (kind, event) {
            (Some(ValueKind::Primitive), Event::Value) => Ok(State::Value),
            (Some(ValueKind::Sequence), Event::SequenceStart) => Ok(State::StartSequence),
            (Some(ValueKind::Fragments), Event::SequenceStart) => Ok(State::StartFragments),
            _ => UnexpectedEventSnafu {
                event,
                state: self.state,
            }
            .fail(),
        }
    }
}
