//! The pull parser.
//!
//! A [`Parser`] reads a data set from a byte source one event at a time.
//! Between events, the caller may inspect the current key and value length,
//! and read the value bytes in chunks of any size.
//!
//! ```no_run
//! # use dicm_parser::{Event, Parser, State, TransferSyntax};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("dataset.raw")?;
//! let mut parser = Parser::from_source(TransferSyntax::ExplicitVRLittleEndian, file);
//! while parser.state() != State::EndDocument {
//!     if parser.next_event()? == Event::Value {
//!         let mut value = Vec::new();
//!         parser.read_value_to_end(&mut value)?;
//!         println!("{} value bytes at depth {}", value.len(), parser.depth());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{
    Error, InvalidStateSnafu, NoInputSnafu, PoisonedSnafu, ReadValueSnafu, Result,
    ShortValueSnafu, UnreadValueSnafu,
};
use crate::event::{Event, State};
use crate::level::{LevelKind, LevelStack};
use dicm_core::header::{Key, Length};
use dicm_encoding::decode::read_fully;
use dicm_encoding::TransferSyntax;
use snafu::{OptionExt, ResultExt};
use std::io::{self, Read};

/// The default maximum number of nesting levels, the root included.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What to do with value bytes which the caller did not read
/// before asking for the next event.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum UnreadValueStrategy {
    /// Read and discard the remaining bytes.
    Skip,
    /// Fail with a caller misuse error.
    Fail,
}

impl Default for UnreadValueStrategy {
    fn default() -> Self {
        UnreadValueStrategy::Skip
    }
}

/// The set of options for the parser.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct ParserOptions {
    /// the maximum number of nesting levels, the root included
    pub max_depth: usize,
    /// the handling of unread value bytes
    pub unread_value: UnreadValueStrategy,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            unread_value: UnreadValueStrategy::default(),
        }
    }
}

impl ParserOptions {
    /// Replace the maximum nesting depth of the options.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the unread value strategy of the options.
    pub fn unread_value(mut self, unread_value: UnreadValueStrategy) -> Self {
        self.unread_value = unread_value;
        self
    }
}

/// A pull parser of data sets over a byte source.
///
/// The parser is bound to a source and a transfer syntax
/// with [`set_input`](Parser::set_input).
/// Any error aborts the run:
/// every later call to a mutating method fails
/// until a new input is set.
#[derive(Debug)]
pub struct Parser<R> {
    source: Option<R>,
    ts: TransferSyntax,
    stack: LevelStack,
    options: ParserOptions,
    poisoned: bool,
}

impl<R> Default for Parser<R> {
    fn default() -> Self {
        Parser::new()
    }
}

impl<R> Parser<R> {
    /// Create a parser without input, with default options.
    pub fn new() -> Self {
        Parser::with_options(ParserOptions::default())
    }

    /// Create a parser without input, with the given options.
    pub fn with_options(options: ParserOptions) -> Self {
        Parser {
            source: None,
            ts: TransferSyntax::ExplicitVRLittleEndian,
            stack: LevelStack::new(),
            options,
            poisoned: false,
        }
    }

    /// Bind the parser to a new source in the given transfer syntax,
    /// starting a new run.
    ///
    /// Returns the previous source, if any.
    pub fn set_input(&mut self, ts: TransferSyntax, source: R) -> Option<R> {
        self.ts = ts;
        self.stack.reset();
        self.poisoned = false;
        self.source.replace(source)
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

    /// Retrieve the key of the current element.
    ///
    /// Available after a key event, during its value,
    /// and at the start of the sequence or fragment train it opens.
    pub fn key(&self) -> Result<Key> {
        let top = self.stack.top();
        match self.state() {
            State::Key | State::StartSequence | State::StartFragments => {}
            State::Value if top.kind != LevelKind::Fragments => {}
            state => {
                return InvalidStateSnafu {
                    operation: "get the key",
                    state,
                }
                .fail()
            }
        }
        top.key.context(InvalidStateSnafu {
            operation: "get the key",
            state: top.state,
        })
    }

    /// Retrieve the length of the current value, item or fragment.
    pub fn value_length(&self) -> Result<Length> {
        let top = self.stack.top();
        match self.state() {
            State::Key | State::StartSequence | State::StartFragments => {
                self.key().map(|key| key.len)
            }
            State::Value | State::Fragment => Ok(Length(top.value_len)),
            State::StartItem => Ok(top.item.length()),
            state => InvalidStateSnafu {
                operation: "get the value length",
                state,
            }
            .fail(),
        }
    }

    /// Give the source back, dropping the parser.
    pub fn into_inner(self) -> Option<R> {
        self.source
    }

    fn check_poisoned(&self) -> Result<()> {
        if self.poisoned {
            PoisonedSnafu.fail()
        } else {
            Ok(())
        }
    }

    fn poison(&mut self, e: Error) -> Error {
        tracing::warn!("parsing aborted at depth {}: {}", self.stack.depth(), e);
        self.poisoned = true;
        e
    }
}

impl<R> Parser<R>
where
    R: Read,
{
    /// Create a parser over the given source with default options.
    pub fn from_source(ts: TransferSyntax, source: R) -> Self {
        let mut parser = Parser::new();
        parser.set_input(ts, source);
        parser
    }

    /// Advance to the next event.
    ///
    /// Any value bytes left unread are handled
    /// according to [`ParserOptions::unread_value`].
    pub fn next_event(&mut self) -> Result<Event> {
        self.check_poisoned()?;
        match self.step() {
            Ok(event) => {
                tracing::trace!("{:?} at depth {}", event, self.stack.depth());
                Ok(event)
            }
            Err(e) => Err(self.poison(e)),
        }
    }

    fn step(&mut self) -> Result<Event> {
        let Parser {
            source,
            ts,
            stack,
            options,
            ..
        } = self;
        let source = source.as_mut().context(NoInputSnafu)?;

        let top = stack.top_mut();
        if top.state == State::Value && top.value_remaining() > 0 {
            let remaining = top.value_remaining();
            match options.unread_value {
                UnreadValueStrategy::Skip => {
                    tracing::debug!("skipping {} unread value bytes", remaining);
                    let skipped = io::copy(
                        &mut source.by_ref().take(u64::from(remaining)),
                        &mut io::sink(),
                    )
                    .context(ReadValueSnafu)?;
                    if skipped < u64::from(remaining) {
                        return ShortValueSnafu {
                            expected: u64::from(remaining),
                            read: skipped,
                        }
                        .fail();
                    }
                    top.consume_value(remaining)?;
                }
                UnreadValueStrategy::Fail => return UnreadValueSnafu { remaining }.fail(),
            }
        }

        stack.prepare(options.max_depth)?;
        let state = stack.top_mut().read_next(*ts, source)?;
        state.event().context(InvalidStateSnafu {
            operation: "announce the state",
            state,
        })
    }

    /// Read the next bytes of the current value into `buf`.
    ///
    /// Returns the number of bytes read,
    /// 0 once the whole value was read.
    /// A source ending before the value does is an error.
    pub fn read_value(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check_poisoned()?;
        self.read_value_impl(buf).map_err(|e| self.poison(e))
    }

    fn read_value_impl(&mut self, buf: &mut [u8]) -> Result<usize> {
        let state = self.state();
        let source = self.source.as_mut().context(NoInputSnafu)?;
        let top = self.stack.top_mut();
        if state != State::Value {
            return InvalidStateSnafu {
                operation: "read a value",
                state,
            }
            .fail();
        }
        let n = buf.len().min(top.value_remaining() as usize);
        if n == 0 {
            return Ok(0);
        }
        let read = read_fully(source, &mut buf[..n]).context(ReadValueSnafu)?;
        if read < n {
            return ShortValueSnafu {
                expected: n as u64,
                read: read as u64,
            }
            .fail();
        }
        top.consume_value(n as u32)?;
        Ok(n)
    }

    /// Read the rest of the current value, appending it to `buf`.
    ///
    /// Returns the number of bytes read.
    pub fn read_value_to_end(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        self.check_poisoned()?;
        let start = buf.len();
        match self.read_value_to_end_impl(buf) {
            Ok(n) => Ok(n),
            Err(e) => {
                buf.truncate(start);
                Err(self.poison(e))
            }
        }
    }

    fn read_value_to_end_impl(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        let state = self.state();
        let source = self.source.as_mut().context(NoInputSnafu)?;
        let top = self.stack.top_mut();
        if state != State::Value {
            return InvalidStateSnafu {
                operation: "read a value",
                state,
            }
            .fail();
        }
        let remaining = top.value_remaining();
        if remaining == 0 {
            return Ok(0);
        }
        // the buffer grows with the bytes actually read, not the declared length
        let read = io::copy(&mut source.by_ref().take(u64::from(remaining)), buf)
            .context(ReadValueSnafu)?;
        if read < u64::from(remaining) {
            return ShortValueSnafu {
                expected: u64::from(remaining),
                read,
            }
            .fail();
        }
        top.consume_value(remaining)?;
        Ok(remaining as usize)
    }
}

/// Iterate over the events of the data set.
///
/// The iterator ends after the end of the document
/// or after the first error.
impl<R> Iterator for Parser<R>
where
    R: Read,
{
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned || self.stack.top().state == State::EndDocument {
            return None;
        }
        Some(self.next_event())
    }
}
