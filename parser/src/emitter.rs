//! The push emitter.
//!
//! An [`Emitter`] writes a data set to a byte sink from the same events
//! a [`Parser`](crate::Parser) produces.
//! Keys and item or fragment lengths are set ahead of their event,
//! and value bytes are written after the value event.
//! Delimiter markers are only written for sequences and items
//! of undefined length;
//! for defined lengths, the end events check
//! that the declared number of bytes was written.

use crate::error::{
    Error, FlushSnafu, FragmentTooLargeSnafu, InvalidStateSnafu, NoOutputSnafu, PoisonedSnafu,
    Result, ValueIncompleteSnafu, ValueOverflowSnafu, WriteValueSnafu,
};
use crate::event::{Event, State};
use crate::level::write::Pending;
use crate::level::{LevelKind, LevelStack};
use crate::parser::DEFAULT_MAX_DEPTH;
use dicm_core::header::{Key, Length};
use dicm_encoding::TransferSyntax;
use snafu::{ensure, OptionExt, ResultExt};
use std::convert::TryFrom;
use std::io::Write;

/// The set of options for the emitter.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct EmitterOptions {
    /// the maximum number of nesting levels, the root included
    pub max_depth: usize,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        EmitterOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EmitterOptions {
    /// Replace the maximum nesting depth of the options.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A push emitter of data sets into a byte sink.
///
/// Any error aborts the run:
/// every later call to a mutating method fails
/// until a new output is set.
#[derive(Debug)]
pub struct Emitter<W> {
    sink: Option<W>,
    ts: TransferSyntax,
    stack: LevelStack,
    pending: Pending,
    options: EmitterOptions,
    poisoned: bool,
}

impl<W> Default for Emitter<W> {
    fn default() -> Self {
        Emitter::new()
    }
}

impl<W> Emitter<W> {
    /// Create an emitter without output, with default options.
    pub fn new() -> Self {
        Emitter::with_options(EmitterOptions::default())
    }

    /// Create an emitter without output, with the given options.
    pub fn with_options(options: EmitterOptions) -> Self {
        Emitter {
            sink: None,
            ts: TransferSyntax::ExplicitVRLittleEndian,
            stack: LevelStack::new(),
            pending: Pending::default(),
            options,
            poisoned: false,
        }
    }

    /// Bind the emitter to a new sink in the given transfer syntax,
    /// starting a new run.
    ///
    /// Returns the previous sink, if any.
    pub fn set_output(&mut self, ts: TransferSyntax, sink: W) -> Option<W> {
        self.ts = ts;
        self.stack.reset();
        self.pending = Pending::default();
        self.poisoned = false;
        self.sink.replace(sink)
    }

    /// The transfer syntax of the current run.
    pub fn transfer_syntax(&self) -> TransferSyntax {
        self.ts
    }

    /// The current state, [`State::Invalid`] after an error.
    pub fn state(&self) -> State {
        if self.poisoned {
            State::Invalid
        } else {
            self.stack.top().state
        }
    }

    /// The current nesting depth, 1 at the root data set.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Set the key to write on the next key event.
    pub fn set_key(&mut self, key: Key) -> Result<()> {
        self.check_poisoned()?;
        match self.state() {
            State::StartDocument
            | State::StartItem
            | State::Value
            | State::EndSequence => {
                self.pending.key = Some(key);
                Ok(())
            }
            state => {
                let e = InvalidStateSnafu {
                    operation: "set a key",
                    state,
                }
                .build();
                Err(self.poison(e))
            }
        }
    }

    /// Set the length of the next item or fragment.
    ///
    /// Items default to an undefined length,
    /// fragments always need one.
    pub fn set_value_length(&mut self, len: Length) -> Result<()> {
        self.check_poisoned()?;
        match self.state() {
            State::StartSequence | State::EndItem | State::StartFragments => {}
            State::Value if self.stack.top().kind == LevelKind::Fragments => {}
            state => {
                let e = InvalidStateSnafu {
                    operation: "set a value length",
                    state,
                }
                .build();
                return Err(self.poison(e));
            }
        }
        self.pending.len = Some(len);
        Ok(())
    }

    /// Give the sink back, dropping the emitter.
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }

    fn check_poisoned(&self) -> Result<()> {
        if self.poisoned {
            PoisonedSnafu.fail()
        } else {
            Ok(())
        }
    }

    fn poison(&mut self, e: Error) -> Error {
        tracing::warn!("emitting aborted at depth {}: {}", self.stack.depth(), e);
        self.poisoned = true;
        e
    }
}

impl<W> Emitter<W>
where
    W: Write,
{
    /// Create an emitter over the given sink with default options.
    pub fn from_sink(ts: TransferSyntax, sink: W) -> Self {
        let mut emitter = Emitter::new();
        emitter.set_output(ts, sink);
        emitter
    }

    /// Feed the next event.
    ///
    /// The sink is flushed at the end of the document.
    pub fn emit(&mut self, event: Event) -> Result<()> {
        self.check_poisoned()?;
        match self.step(event) {
            Ok(()) => {
                tracing::trace!("{:?} at depth {}", event, self.stack.depth());
                Ok(())
            }
            Err(e) => Err(self.poison(e)),
        }
    }

    fn step(&mut self, event: Event) -> Result<()> {
        let Emitter {
            sink,
            ts,
            stack,
            pending,
            options,
            ..
        } = self;
        let sink = sink.as_mut().context(NoOutputSnafu)?;

        let top = stack.top();
        if top.state == State::Value {
            ensure!(
                top.value_remaining() == 0,
                ValueIncompleteSnafu {
                    written: top.value_pos,
                    len: top.value_len,
                }
            );
        }

        stack.prepare(options.max_depth)?;
        let state = stack.top_mut().write_next(*ts, sink, event, pending)?;
        if state == State::EndDocument {
            sink.flush().context(FlushSnafu)?;
        }
        Ok(())
    }

    /// Write the next bytes of the current value.
    ///
    /// May be called any number of times while in a value,
    /// as long as the total does not exceed the value length.
    pub fn write_value(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_poisoned()?;
        self.write_value_impl(bytes).map_err(|e| self.poison(e))
    }

    fn write_value_impl(&mut self, bytes: &[u8]) -> Result<()> {
        let state = self.state();
        let sink = self.sink.as_mut().context(NoOutputSnafu)?;
        let top = self.stack.top_mut();
        ensure!(
            state == State::Value,
            InvalidStateSnafu {
                operation: "write a value",
                state,
            }
        );
        let attempted = u64::from(top.value_pos) + bytes.len() as u64;
        ensure!(
            attempted <= u64::from(top.value_len),
            ValueOverflowSnafu {
                len: top.value_len,
                attempted,
            }
        );
        sink.write_all(bytes).context(WriteValueSnafu)?;
        top.consume_value(bytes.len() as u32)
    }

    /// Set the key and emit the key event.
    pub fn emit_key(&mut self, key: Key) -> Result<()> {
        self.set_key(key)?;
        self.emit(Event::Key)
    }

    /// Emit the value event and write the whole value.
    pub fn emit_value(&mut self, bytes: &[u8]) -> Result<()> {
        self.emit(Event::Value)?;
        self.write_value(bytes)
    }

    /// Set the item length and emit the item start event.
    pub fn emit_item_start(&mut self, len: Length) -> Result<()> {
        self.set_value_length(len)?;
        self.emit(Event::ItemStart)
    }

    /// Emit a whole fragment: its start, its value event and its bytes.
    pub fn emit_fragment(&mut self, bytes: &[u8]) -> Result<()> {
        let len = match u32::try_from(bytes.len()) {
            Ok(len) => len,
            Err(_) => {
                let e = FragmentTooLargeSnafu { len: bytes.len() }.build();
                return Err(self.poison(e));
            }
        };
        self.set_value_length(Length(len))?;
        self.emit(Event::Fragment)?;
        self.emit_value(bytes)
    }
}
