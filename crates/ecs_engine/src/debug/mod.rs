//! Debug output stream with scoped redirection
//!
//! Systems write diagnostic lines through [`print`] (or the
//! [`debug_print!`](crate::debug_print) macro). By default lines go to the
//! `log` facade at debug level. [`redirect`] pushes a sink on a stack and
//! returns a guard; while the guard lives the innermost sink receives every
//! line, and dropping the guard pops it again, on early return and unwind
//! alike.
//!
//! The stack belongs to the dispatch thread.
//!
//! ```
//! use ecs_engine::debug::{self, BufferSink};
//!
//! let sink = BufferSink::new();
//! {
//!     let _guard = debug::redirect(sink.clone());
//!     debug::print(format_args!("Rendering.."));
//! }
//! assert_eq!(sink.lines(), vec!["Rendering..".to_string()]);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for debug lines
pub trait DebugSink {
    /// Receive one line (without trailing newline)
    fn write_line(&self, line: &str);
}

thread_local! {
    static SINKS: RefCell<Vec<Rc<dyn DebugSink>>> = RefCell::new(Vec::new());
}

/// Restores the previous sink when dropped
#[must_use = "the redirection ends as soon as the guard is dropped"]
pub struct RedirectGuard {
    depth: usize,
    // Guards must be dropped on the thread that created them
    _not_send: PhantomData<Rc<()>>,
}

/// Route debug output to `sink` until the returned guard drops
pub fn redirect(sink: impl DebugSink + 'static) -> RedirectGuard {
    let depth = SINKS.with(|sinks| {
        let mut sinks = sinks.borrow_mut();
        sinks.push(Rc::new(sink));
        sinks.len()
    });
    RedirectGuard {
        depth,
        _not_send: PhantomData,
    }
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        SINKS.with(|sinks| {
            let mut sinks = sinks.borrow_mut();
            // Guards drop in LIFO order; anything above us was leaked
            sinks.truncate(self.depth - 1);
        });
    }
}

/// Number of active redirections on this thread
pub fn depth() -> usize {
    SINKS.with(|sinks| sinks.borrow().len())
}

/// Write one line to the innermost sink, or to the log when none is active
pub fn print(args: fmt::Arguments<'_>) {
    let top = SINKS.with(|sinks| sinks.borrow().last().cloned());
    match top {
        Some(sink) => sink.write_line(&args.to_string()),
        None => log::debug!(target: "ecs_engine::debug", "{args}"),
    }
}

/// Write a formatted line to the debug stream
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {
        $crate::debug::print(format_args!($($arg)*))
    };
}

/// Sink collecting lines in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferSink {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Remove and return the lines written so far
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DebugSink for BufferSink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
    }
}

/// Sink discarding everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn write_line(&self, _line: &str) {}
}

/// Sink forwarding to the log facade at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn write_line(&self, line: &str) {
        log::info!(target: "ecs_engine::debug", "{line}");
    }
}
