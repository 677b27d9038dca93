//! The REPL's output model: an append-only log of tagged entries.

use std::fmt;

/// Console method captured during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl ConsoleLevel {
    pub fn name(&self) -> &'static str {
        match self {
            ConsoleLevel::Log => "log",
            ConsoleLevel::Info => "info",
            ConsoleLevel::Warn => "warn",
            ConsoleLevel::Error => "error",
            ConsoleLevel::Debug => "debug",
        }
    }
}

/// Tag for one scrollback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The submitted input, echoed back verbatim.
    Echo,
    /// The result of a successful evaluation.
    Return,
    /// An evaluation failure.
    Error,
    /// Output captured from a console method during evaluation.
    Console(ConsoleLevel),
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            EntryKind::Echo => "echo",
            EntryKind::Return => "return",
            EntryKind::Error => "error",
            EntryKind::Console(level) => level.name(),
        };
        write!(f, "{tag}")
    }
}

/// One rendered line of REPL output. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: String,
}

/// Append-only list of entries for one session. Entries are never removed
/// or mutated.
#[derive(Debug, Default)]
pub struct Scrollback {
    entries: Vec<Entry>,
}

impl Scrollback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: EntryKind, text: String) {
        self.entries.push(Entry { kind, text });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries appended at or after `start`, in creation order.
    pub fn entries_from(&self, start: usize) -> &[Entry] {
        &self.entries[start.min(self.entries.len())..]
    }
}
