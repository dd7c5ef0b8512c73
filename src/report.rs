//! User-facing progress reporting, kept separate from the processing logic.

use std::cell::RefCell;

/// Sink for the messages a run produces.
pub trait Reporter {
    /// Neutral progress or informational message.
    fn info(&self, message: &str);
    /// A step completed successfully.
    fn success(&self, message: &str);
    /// Something was skipped but the run continues.
    fn warning(&self, message: &str);
    /// A step failed.
    fn error(&self, message: &str);
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn info(&self, message: &str) {
        (**self).info(message);
    }
    fn success(&self, message: &str) {
        (**self).success(message);
    }
    fn warning(&self, message: &str) {
        (**self).warning(message);
    }
    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Plain-text reporter writing to stdout, with failures on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn warning(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Reporter that discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Severity attached to a captured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// See [`Reporter::info`].
    Info,
    /// See [`Reporter::success`].
    Success,
    /// See [`Reporter::warning`].
    Warning,
    /// See [`Reporter::error`].
    Error,
}

/// Reporter that records messages in memory, for embedding callers and tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: RefCell<Vec<(Level, String)>>,
}

impl MemoryReporter {
    /// Snapshot of every message recorded so far.
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.borrow().clone()
    }

    /// Messages recorded at `level`.
    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(recorded, _)| *recorded == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }
    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }
    fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }
    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
