//! Terminal capability detection and styling

use owo_colors::{colors::css, OwoColorize};

/// Whether stdout accepts colour codes.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Width of the terminal, if stdout is one.
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Whether the terminal is too narrow for the wide layouts (< 60 columns).
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// Extension trait for styling output
pub trait Colorize {
    /// Green, for completed actions.
    fn success(&self) -> String;
    /// Amber, for fallbacks and caveats.
    fn warning(&self) -> String;
    /// Blue, for headings.
    fn info(&self) -> String;
    /// Gold, for scripture.
    fn verse(&self) -> String;
    /// Reversed, for the current day.
    fn highlight(&self) -> String;
    /// Dimmed, for secondary detail.
    fn dim(&self) -> String;
}

fn styled(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

impl Colorize for str {
    fn success(&self) -> String {
        styled(self, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        styled(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn info(&self) -> String {
        styled(self, |s| s.fg::<css::LightBlue>().to_string())
    }

    fn verse(&self) -> String {
        styled(self, |s| s.fg::<css::GoldenRod>().italic().to_string())
    }

    fn highlight(&self) -> String {
        if supports_color() {
            self.reversed().to_string()
        } else {
            format!("[{self}]")
        }
    }

    fn dim(&self) -> String {
        styled(self, |s| s.dimmed().to_string())
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn verse(&self) -> String {
        self.as_str().verse()
    }

    fn highlight(&self) -> String {
        self.as_str().highlight()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}
