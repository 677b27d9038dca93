use console::{Style, StyledObject};
use replbox_core::scrollback::{ConsoleLevel, Entry, EntryKind};

fn entry_style(kind: EntryKind) -> Style {
    match kind {
        EntryKind::Echo => Style::new().dim(),
        EntryKind::Return => Style::new().white().bright(),
        EntryKind::Error => Style::new().red().bold(),
        EntryKind::Console(ConsoleLevel::Warn) => Style::new().yellow(),
        EntryKind::Console(ConsoleLevel::Error) => Style::new().red(),
        EntryKind::Console(ConsoleLevel::Debug) => Style::new().dim(),
        EntryKind::Console(_) => Style::new().white(),
    }
}

/// Styles one entry's text according to its kind.
pub fn style_entry_text(text: &str, kind: EntryKind) -> StyledObject<&str> {
    entry_style(kind).apply_to(text)
}

/// Prints one entry to the terminal, newest last so the scrollback stays
/// pinned to the latest entry.
pub fn render_entry(entry: &Entry) {
    match entry.kind {
        EntryKind::Echo => println!("❯ {}", style_entry_text(&entry.text, entry.kind)),
        _ => println!("{}", style_entry_text(&entry.text, entry.kind)),
    }
}

/// Prints a formatted error message to stderr.
pub fn present_error(error: anyhow::Error) {
    let error_text = console::style("ERROR:").red().bold();
    eprintln!("\n{error_text} {error}");
}
