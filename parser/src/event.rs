//! Structural events and the states of a parsing or emitting run.

/// A structural event of a data set stream.
///
/// The parser produces these events in document order,
/// and the emitter accepts the very same sequence to write it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// The beginning of the data set.
    DocumentStart,
    /// The end of the data set.
    DocumentEnd,
    /// An element key (tag, value representation and value length).
    Key,
    /// The value bytes of an element or of a fragment.
    Value,
    /// The beginning of a pixel data fragment.
    Fragment,
    /// The beginning of a sequence item.
    ItemStart,
    /// The end of a sequence item.
    ItemEnd,
    /// The beginning of a sequence or of a fragment train.
    SequenceStart,
    /// The end of a sequence or of a fragment train.
    SequenceEnd,
}

/// The state of a nesting level, as observed between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Nothing was parsed or emitted yet.
    Init,
    /// The document has started.
    StartDocument,
    /// The document has ended, no more events follow.
    EndDocument,
    /// An element key was just read or written.
    Key,
    /// Inside the value of an element or of a fragment.
    Value,
    /// An item has started.
    StartItem,
    /// An item has ended.
    EndItem,
    /// A sequence of items has started.
    StartSequence,
    /// A sequence or fragment train has ended.
    EndSequence,
    /// A train of pixel data fragments has started.
    StartFragments,
    /// A fragment has started.
    Fragment,
    /// The run was aborted by an error.
    Invalid,
}

impl State {
    /// The event announcing that this state was entered.
    ///
    /// Sequences and fragment trains are both announced
    /// by [`Event::SequenceStart`].
    pub fn event(self) -> Option<Event> {
        match self {
            State::StartDocument => Some(Event::DocumentStart),
            State::EndDocument => Some(Event::DocumentEnd),
            State::Key => Some(Event::Key),
            State::Value => Some(Event::Value),
            State::StartItem => Some(Event::ItemStart),
            State::EndItem => Some(Event::ItemEnd),
            State::StartSequence | State::StartFragments => Some(Event::SequenceStart),
            State::EndSequence => Some(Event::SequenceEnd),
            State::Fragment => Some(Event::Fragment),
            State::Init | State::Invalid => None,
        }
    }

    /// Whether this state opens a nested level.
    pub fn is_nesting(self) -> bool {
        matches!(self, State::StartSequence | State::StartFragments)
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, State};

    #[test]
    fn sequence_and_fragments_share_the_start_event() {
        assert_eq!(State::StartSequence.event(), Some(Event::SequenceStart));
        assert_eq!(State::StartFragments.event(), Some(Event::SequenceStart));
        assert_eq!(State::Init.event(), None);
        assert_eq!(State::Invalid.event(), None);
        assert!(State::StartFragments.is_nesting());
        assert!(!State::StartItem.is_nesting());
    }
}
