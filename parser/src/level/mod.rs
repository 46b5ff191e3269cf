//! The stack of nesting levels shared by the parser and the emitter.
//!
//! Each [`Level`] stands for one nesting depth:
//! the root data set, the items of a sequence,
//! or the fragments of encapsulated pixel data.
//! A level keeps the running position of two scopes:
//! the enclosing sequence (or fragment train)
//! and the item (or fragment) currently open.
//! A scope either has a declared length,
//! in which case its end is implied once the position reaches it,
//! or it is delimited by explicit end markers.

use crate::error::{DepthLimitSnafu, LengthMismatchSnafu, LengthOverrunSnafu, Result};
use crate::event::State;
use dicm_core::header::{Key, Length};
use smallvec::SmallVec;

pub(crate) mod read;
pub(crate) mod write;

/// The size in bytes of an item or delimiter marker.
pub(crate) const MARKER_SIZE: u64 = 8;

/// How the end of a scope is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    /// Closed by an explicit delimiter marker.
    Delimited,
    /// Closed once the declared number of bytes was consumed.
    Length(u32),
}

/// A declared bound plus the number of bytes consumed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scope {
    pub bound: Bound,
    pub pos: u64,
}

impl Scope {
    pub fn new(len: Length) -> Self {
        let bound = match len.get() {
            Some(len) => Bound::Length(len),
            None => Bound::Delimited,
        };
        Scope { bound, pos: 0 }
    }

    pub fn delimited() -> Self {
        Scope {
            bound: Bound::Delimited,
            pos: 0,
        }
    }

    pub fn is_delimited(&self) -> bool {
        self.bound == Bound::Delimited
    }

    /// Whether a defined scope has consumed all of its bytes.
    pub fn is_complete(&self) -> bool {
        match self.bound {
            Bound::Length(len) => self.pos == u64::from(len),
            Bound::Delimited => false,
        }
    }

    /// The declared length, undefined for delimited scopes.
    pub fn length(&self) -> Length {
        match self.bound {
            Bound::Length(len) => Length(len),
            Bound::Delimited => Length::UNDEFINED,
        }
    }

    /// Whether `n` more bytes still fit in the scope.
    fn fits(&self, n: u64) -> bool {
        match self.bound {
            Bound::Length(len) => self.pos + n <= u64::from(len),
            Bound::Delimited => true,
        }
    }

    fn grow(&mut self, n: u64, scope: &'static str) -> Result<()> {
        self.ensure_room(n, scope)?;
        self.pos += n;
        Ok(())
    }

    fn ensure_room(&self, n: u64, scope: &'static str) -> Result<()> {
        if let Bound::Length(declared) = self.bound {
            if !self.fits(n) {
                return LengthOverrunSnafu {
                    scope,
                    declared,
                    position: self.pos + n,
                }
                .fail();
            }
        }
        Ok(())
    }

    fn ensure_complete(&self, scope: &'static str) -> Result<()> {
        match self.bound {
            Bound::Length(declared) if self.pos != u64::from(declared) => LengthMismatchSnafu {
                scope,
                declared,
                position: self.pos,
            }
            .fail(),
            _ => Ok(()),
        }
    }
}

/// The kind of content held by a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelKind {
    /// The top-level data set.
    Root,
    /// The items of a sequence.
    Items,
    /// The fragments of encapsulated pixel data.
    Fragments,
}

/// A structural token read from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Key,
    Value,
    Fragment,
    StartItem,
    EndItem,
    StartSequence,
    StartFragments,
    EndSequence,
    Eof,
}

/// One nesting level.
#[derive(Debug, Clone)]
pub(crate) struct Level {
    pub kind: LevelKind,
    pub state: State,
    /// the last key read or written at this level
    pub key: Option<Key>,
    pub sequence: Scope,
    pub item: Scope,
    /// length of the current element value or fragment
    pub value_len: u32,
    /// bytes of the current value already transferred
    pub value_pos: u32,
}

impl Level {
    fn root() -> Self {
        Level {
            kind: LevelKind::Root,
            state: State::Init,
            key: None,
            sequence: Scope::delimited(),
            item: Scope::delimited(),
            value_len: 0,
            value_pos: 0,
        }
    }

    /// A level for the sequence or fragment train
    /// opened by the parent's current key.
    fn child(parent: &Level) -> Self {
        let kind = if parent.state == State::StartFragments {
            LevelKind::Fragments
        } else {
            LevelKind::Items
        };
        let len = parent.key.map(|key| key.len).unwrap_or(Length::UNDEFINED);
        Level {
            kind,
            state: parent.state,
            key: None,
            sequence: Scope::new(len),
            item: Scope::delimited(),
            value_len: 0,
            value_pos: 0,
        }
    }

    pub fn value_remaining(&self) -> u32 {
        self.value_len - self.value_pos
    }

    pub fn grow_item(&mut self, n: u64) -> Result<()> {
        self.item.grow(n, "item")
    }

    pub fn grow_sequence(&mut self, n: u64) -> Result<()> {
        self.sequence.grow(n, "sequence")
    }

    /// Record `n` bytes of the current value as transferred.
    pub fn consume_value(&mut self, n: u32) -> Result<()> {
        debug_assert!(n <= self.value_remaining());
        self.value_pos += n;
        self.grow_item(u64::from(n))
    }

    /// Account for a new element key of `size` bytes.
    pub fn enter_key(&mut self, key: Key, size: usize) -> Result<()> {
        self.grow_item(size as u64)?;
        if let Some(len) = key.len.get() {
            self.item.ensure_room(u64::from(len), "item")?;
        }
        self.key = Some(key);
        self.value_len = key.len.get().unwrap_or(0);
        self.value_pos = 0;
        Ok(())
    }

    /// Account for an item start marker declaring the given length.
    pub fn enter_item(&mut self, len: Length) -> Result<()> {
        self.grow_sequence(MARKER_SIZE)?;
        if let Some(len) = len.get() {
            self.sequence.ensure_room(u64::from(len), "sequence")?;
        }
        self.item = Scope::new(len);
        Ok(())
    }

    /// Close the current item.
    /// An item delimiter counts towards the item itself.
    pub fn leave_item(&mut self, delimiter: bool) -> Result<()> {
        if delimiter {
            self.grow_item(MARKER_SIZE)?;
        } else {
            self.item.ensure_complete("item")?;
        }
        tracing::debug!(
            "item of {} bytes folded into sequence at {}",
            self.item.pos,
            self.sequence.pos
        );
        self.grow_sequence(self.item.pos)
    }

    /// Close the current sequence or fragment train.
    pub fn leave_sequence(&mut self, delimiter: bool) -> Result<()> {
        if delimiter {
            self.grow_sequence(MARKER_SIZE)
        } else {
            self.sequence.ensure_complete("sequence")
        }
    }

    /// Fold the bytes of the previous fragment into the fragment train.
    pub fn fold_fragment(&mut self) -> Result<()> {
        let len = self.item.pos;
        self.item = Scope::delimited();
        self.grow_sequence(len)
    }

    /// Account for a fragment start marker declaring the given length.
    pub fn enter_fragment(&mut self, len: u32) -> Result<()> {
        self.grow_sequence(MARKER_SIZE)?;
        self.item = Scope::new(Length(len));
        self.value_len = len;
        self.value_pos = 0;
        Ok(())
    }
}

/// The stack of levels of a run.
/// The root level is always present.
#[derive(Debug, Clone)]
pub(crate) struct LevelStack {
    root: Level,
    nested: SmallVec<[Level; 4]>,
}

impl Default for LevelStack {
    fn default() -> Self {
        LevelStack::new()
    }
}

impl LevelStack {
    pub fn new() -> Self {
        LevelStack {
            root: Level::root(),
            nested: SmallVec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.root = Level::root();
        self.nested.clear();
    }

    /// The number of levels, the root included.
    pub fn depth(&self) -> usize {
        1 + self.nested.len()
    }

    pub fn top(&self) -> &Level {
        self.nested.last().unwrap_or(&self.root)
    }

    pub fn top_mut(&mut self) -> &mut Level {
        match self.nested.last_mut() {
            Some(level) => level,
            None => &mut self.root,
        }
    }

    /// Push a child level if the top level has just opened
    /// a sequence or fragment train,
    /// or pop the top level if its sequence has ended.
    pub fn prepare(&mut self, max_depth: usize) -> Result<()> {
        let top = self.top();
        if top.state.is_nesting() {
            self.push(max_depth)
        } else if top.state == State::EndSequence && !self.nested.is_empty() {
            self.pop()
        } else {
            Ok(())
        }
    }

    fn push(&mut self, max_depth: usize) -> Result<()> {
        if self.depth() >= max_depth {
            return DepthLimitSnafu { max_depth }.fail();
        }
        let child = Level::child(self.top());
        tracing::debug!(
            "entering {:?} level at depth {}, declared length {}",
            child.kind,
            self.depth() + 1,
            child.sequence.length()
        );
        self.nested.push(child);
        Ok(())
    }

    fn pop(&mut self) -> Result<()> {
        if let Some(child) = self.nested.pop() {
            tracing::debug!(
                "leaving {:?} level of {} bytes at depth {}",
                child.kind,
                child.sequence.pos,
                self.depth() + 1
            );
            let parent = self.top_mut();
            parent.grow_item(child.sequence.pos)?;
            parent.state = State::EndSequence;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, Level, LevelKind, LevelStack, Scope};
    use crate::error::Error;
    use crate::event::State;
    use dicm_core::header::{Key, Length, Tag, VR};
    use matches::assert_matches;

    #[test]
    fn scope_bounds() {
        let mut scope = Scope::new(Length(16));
        assert_eq!(scope.bound, Bound::Length(16));
        scope.grow(8, "item").unwrap();
        assert!(!scope.is_complete());
        scope.grow(8, "item").unwrap();
        assert!(scope.is_complete());
        assert_matches!(
            scope.grow(2, "item"),
            Err(Error::LengthOverrun {
                declared: 16,
                position: 18,
                ..
            })
        );

        let mut scope = Scope::new(Length::UNDEFINED);
        assert!(scope.is_delimited());
        scope.grow(1 << 40, "sequence").unwrap();
        assert!(!scope.is_complete());
        assert!(scope.length().is_undefined());
    }

    #[test]
    fn item_accounting() {
        let mut level = Level::root();
        level.kind = LevelKind::Items;
        level.sequence = Scope::new(Length(28));

        // item of 20 bytes: one key of 8 and a value of 12
        level.enter_item(Length(20)).unwrap();
        assert_eq!(level.sequence.pos, 8);
        let key = Key::new(Tag(0x0018, 0x6012), VR::US, Length(12));
        level.enter_key(key, 8).unwrap();
        level.consume_value(12).unwrap();
        assert!(level.item.is_complete());
        level.leave_item(false).unwrap();
        assert_eq!(level.sequence.pos, 28);
        assert!(level.sequence.is_complete());
        level.leave_sequence(false).unwrap();
    }

    #[test]
    fn item_larger_than_sequence() {
        let mut level = Level::root();
        level.sequence = Scope::new(Length(16));
        assert_matches!(
            level.enter_item(Length(10)),
            Err(Error::LengthOverrun { scope: "sequence", .. })
        );
    }

    #[test]
    fn value_larger_than_item() {
        let mut level = Level::root();
        level.item = Scope::new(Length(10));
        let key = Key::new(Tag(0x0010, 0x0010), VR::PN, Length(4));
        assert_matches!(
            level.enter_key(key, 8),
            Err(Error::LengthOverrun { scope: "item", .. })
        );
    }

    #[test]
    fn early_end_of_defined_item() {
        let mut level = Level::root();
        level.enter_item(Length(10)).unwrap();
        assert_matches!(
            level.leave_item(false),
            Err(Error::LengthMismatch {
                declared: 10,
                position: 0,
                ..
            })
        );
    }

    #[test]
    fn push_and_pop_fold_lengths() {
        let mut stack = LevelStack::new();
        {
            let root = stack.top_mut();
            root.state = State::StartSequence;
            let key = Key::new(Tag(0x0008, 0x1115), VR::SQ, Length::UNDEFINED);
            root.enter_key(key, 12).unwrap();
        }
        stack.prepare(64).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top().kind, LevelKind::Items);
        assert_eq!(stack.top().state, State::StartSequence);
        assert!(stack.top().sequence.is_delimited());

        {
            let child = stack.top_mut();
            child.enter_item(Length::UNDEFINED).unwrap();
            child.leave_item(true).unwrap();
            child.leave_sequence(true).unwrap();
            child.state = State::EndSequence;
            assert_eq!(child.sequence.pos, 24);
        }
        stack.prepare(64).unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().state, State::EndSequence);
        assert_eq!(stack.top().item.pos, 12 + 24);
        // the root level is never popped
        stack.prepare(64).unwrap();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn depth_limit() {
        let mut stack = LevelStack::new();
        stack.top_mut().state = State::StartFragments;
        assert_matches!(
            stack.prepare(1),
            Err(Error::DepthLimit { max_depth: 1, .. })
        );
        stack.prepare(2).unwrap();
        assert_eq!(stack.top().kind, LevelKind::Fragments);
    }
}
