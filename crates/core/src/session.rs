//! A REPL session: one persistent evaluation context and one append-only
//! scrollback, tied together by the submit/print cycle.

use tracing::debug;

use crate::format::format_values;
use crate::lang::{ConsoleSink, Evaluator, LangError, Value, parser};
use crate::scrollback::{ConsoleLevel, Entry, EntryKind, Scrollback};

// Routes captured console calls into the scrollback, in call order.
struct PrinterSink<'a> {
    scrollback: &'a mut Scrollback,
}

impl ConsoleSink for PrinterSink<'_> {
    fn emit(&mut self, level: ConsoleLevel, args: &[Value]) {
        let kind = EntryKind::Console(level);
        let text = format_values(kind, args);
        self.scrollback.push(kind, text);
    }
}

#[derive(Default)]
pub struct ReplSession {
    evaluator: Evaluator,
    scrollback: Scrollback,
}

impl ReplSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// Submits one piece of input. All observable output lands in the
    /// scrollback: the echoed input, any console entries captured during
    /// evaluation, and a final `return` or `error` entry. Failures never
    /// propagate; the session stays usable.
    pub fn submit(&mut self, input: &str) {
        self.scrollback.push(EntryKind::Echo, input.to_string());

        match self.evaluate(input) {
            Ok(value) => {
                let text = format_values(EntryKind::Return, &[value]);
                self.scrollback.push(EntryKind::Return, text);
            }
            Err(error) => {
                debug!(error = %error, "evaluation failed");
                self.scrollback.push(EntryKind::Error, error.to_string());
            }
        }
    }

    /// Submits input and returns the entries it appended, in order.
    pub fn submit_and_collect(&mut self, input: &str) -> &[Entry] {
        let mark = self.scrollback.len();
        self.submit(input);
        self.scrollback.entries_from(mark)
    }

    fn evaluate(&mut self, input: &str) -> Result<Value, LangError> {
        let program = parser::parse(input)?;
        let mut sink = PrinterSink {
            scrollback: &mut self.scrollback,
        };
        Ok(self.evaluator.eval(&program, &mut sink)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(entries: &[Entry]) -> Vec<EntryKind> {
        entries.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_echo_is_first_and_verbatim() {
        let mut session = ReplSession::new();
        let input = "  1 +   1  ";
        let entries = session.submit_and_collect(input);

        assert_eq!(entries[0].kind, EntryKind::Echo);
        assert_eq!(entries[0].text, input);
    }

    #[test]
    fn test_bindings_persist_across_submissions() {
        let mut session = ReplSession::new();
        session.submit("x = 5");
        let entries = session.submit_and_collect("x + 1");

        assert_eq!(entries.last().unwrap().kind, EntryKind::Return);
        assert_eq!(entries.last().unwrap().text, "6");
    }

    #[test]
    fn test_undefined_result() {
        let mut session = ReplSession::new();
        let entries = session.submit_and_collect("undefined");
        assert_eq!(entries.last().unwrap().text, "undefined");

        let entries = session.submit_and_collect("log(\"x\")");
        assert_eq!(entries.last().unwrap().kind, EntryKind::Return);
        assert_eq!(entries.last().unwrap().text, "undefined");
    }

    #[test]
    fn test_structured_round_trip() {
        let mut session = ReplSession::new();
        let entries = session.submit_and_collect("({a: 1, b: [2, 3]})");

        assert_eq!(entries.last().unwrap().kind, EntryKind::Return);
        assert_eq!(entries.last().unwrap().text, r#"{"a":1,"b":[2,3]}"#);
    }

    #[test]
    fn test_error_containment() {
        let mut session = ReplSession::new();
        let entries = session.submit_and_collect("1 +");

        assert_eq!(
            kinds(entries),
            vec![EntryKind::Echo, EntryKind::Error],
            "exactly one error entry after the echo"
        );

        // the session keeps accepting submissions
        let entries = session.submit_and_collect("2 + 2");
        assert_eq!(entries.last().unwrap().kind, EntryKind::Return);
        assert_eq!(entries.last().unwrap().text, "4");
    }

    #[test]
    fn test_runtime_error_text() {
        let mut session = ReplSession::new();
        let entries = session.submit_and_collect("nope");

        assert_eq!(entries.last().unwrap().kind, EntryKind::Error);
        assert_eq!(entries.last().unwrap().text, "identifier not found: nope");
    }

    #[test]
    fn test_console_entries_interleave_before_return() {
        let mut session = ReplSession::new();
        let entries = session.submit_and_collect("log(\"a\"); warn(\"b\"); 42");

        assert_eq!(
            kinds(entries),
            vec![
                EntryKind::Echo,
                EntryKind::Console(ConsoleLevel::Log),
                EntryKind::Console(ConsoleLevel::Warn),
                EntryKind::Return,
            ]
        );
        assert_eq!(entries[1].text, "\"a\"");
        assert_eq!(entries[2].text, "\"b\"");
        assert_eq!(entries[3].text, "42");
    }

    #[test]
    fn test_console_output_survives_later_error() {
        let mut session = ReplSession::new();
        let entries = session.submit_and_collect("log(1); boom");

        assert_eq!(
            kinds(entries),
            vec![
                EntryKind::Echo,
                EntryKind::Console(ConsoleLevel::Log),
                EntryKind::Error,
            ]
        );
    }

    #[test]
    fn test_scrollback_only_grows() {
        let mut session = ReplSession::new();
        session.submit("1");
        let len_after_first = session.scrollback().len();
        session.submit("oops +");
        assert!(session.scrollback().len() > len_after_first);
        assert_eq!(session.scrollback().entries()[0].text, "1");
    }

    #[test]
    fn test_function_result_renders_source_text() {
        let mut session = ReplSession::new();
        let entries = session.submit_and_collect("fn(x) { x + 1 }");
        assert_eq!(entries.last().unwrap().text, "fn(x) { (x + 1) }");
    }

    #[test]
    fn test_non_serializable_result_falls_back() {
        let mut session = ReplSession::new();
        let entries = session.submit_and_collect("0 / 0");
        assert_eq!(entries.last().unwrap().kind, EntryKind::Return);
        assert_eq!(entries.last().unwrap().text, "Number {}");
    }
}
