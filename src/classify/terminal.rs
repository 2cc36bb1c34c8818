use std::io::{self, IsTerminal, Stderr, Stdout, Write};

use colored::Colorize;

use super::{FormView, ResultView};

/// Width of the confidence bar track, in cells.
const TRACK_WIDTH: usize = 30;

/// Clears the current terminal line.
const ERASE_LINE: &str = "\r\x1b[2K";

/// Prints the result card to `out` and the loading indicator and alerts to
/// `err`.
///
/// On an interactive `err` the "Classifying…" indicator stays on its own
/// line and is erased before anything else is written. Otherwise it is
/// printed as a plain line and never erased, so redirected output carries
/// no escape codes.
#[derive(Debug)]
pub struct TerminalForm<O = Stdout, E = Stderr> {
    out: O,
    err: E,
    interactive: bool,
    loading_shown: bool,
}

impl TerminalForm {
    pub fn new() -> Self {
        let interactive = io::stderr().is_terminal();
        Self::with_writers(io::stdout(), io::stderr()).interactive(interactive)
    }
}

impl Default for TerminalForm {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Write, E: Write> TerminalForm<O, E> {
    /// A non-interactive form writing to the given streams.
    pub fn with_writers(out: O, err: E) -> Self {
        Self {
            out,
            err,
            interactive: false,
            loading_shown: false,
        }
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }

    fn clear_indicator(&mut self) {
        if self.loading_shown {
            let _ = write!(self.err, "{ERASE_LINE}");
            let _ = self.err.flush();
            self.loading_shown = false;
        }
    }
}

impl<O: Write, E: Write> FormView for TerminalForm<O, E> {
    fn set_submit_enabled(&mut self, _enabled: bool) {}

    fn set_loading(&mut self, loading: bool) {
        if !loading {
            self.clear_indicator();
            return;
        }
        if self.interactive {
            let _ = write!(self.err, "{}", "Classifying…".dimmed());
            self.loading_shown = true;
        } else {
            let _ = writeln!(self.err, "Classifying…");
        }
        let _ = self.err.flush();
    }

    fn hide_result(&mut self) {}

    fn show_result(&mut self, result: &ResultView) {
        self.clear_indicator();
        let _ = write!(self.out, "{}", render_card(result));
        let _ = self.out.flush();
    }

    fn alert(&mut self, message: &str) {
        self.clear_indicator();
        let _ = writeln!(self.err, "{}", message.red().bold());
    }
}

/// The result card as text.
pub(crate) fn render_card(result: &ResultView) -> String {
    let mut out = format!("{}\n", "Classification Result".bold().cyan());
    out.push_str(&format!("{}\n", "=".repeat(40)));
    out.push_str(&format!("  {} {}\n", "Category:  ".bold(), result.category.green().bold()));
    out.push_str(&format!("  {} {}\n", "Model:     ".bold(), result.model_name));
    out.push_str(&format!("  {} {}\n", "Word count:".bold(), result.word_count));

    if let Some(confidence) = &result.confidence {
        let filled = ((confidence.bar_width_pct / 100.0) * TRACK_WIDTH as f64).round() as usize;
        let filled = filled.min(TRACK_WIDTH);
        out.push_str(&format!(
            "  {} {} {}{}\n",
            "Confidence:".bold(),
            confidence.text,
            "█".repeat(filled).green(),
            "░".repeat(TRACK_WIDTH - filled).dimmed(),
        ));
    }

    if !result.top_predictions.is_empty() {
        out.push('\n');
        out.push_str(&format!("{}\n", "Top Predictions".bold().cyan()));
        for entry in &result.top_predictions {
            out.push_str(&format!("  {:<30} {:>8}\n", entry.label, entry.confidence));
        }
    }

    out
}
