use crate::scrollback::ConsoleLevel;

/// Built-in functions available in every session. The console methods are
/// the captured logging surface; their output goes to the injected sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Console(ConsoleLevel),
    TypeOf,
    Len,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "log" => Some(Builtin::Console(ConsoleLevel::Log)),
            "info" => Some(Builtin::Console(ConsoleLevel::Info)),
            "warn" => Some(Builtin::Console(ConsoleLevel::Warn)),
            "error" => Some(Builtin::Console(ConsoleLevel::Error)),
            "debug" => Some(Builtin::Console(ConsoleLevel::Debug)),
            "typeof" => Some(Builtin::TypeOf),
            "len" => Some(Builtin::Len),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Console(level) => level.name(),
            Builtin::TypeOf => "typeof",
            Builtin::Len => "len",
        }
    }
}
