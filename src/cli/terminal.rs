//! Styling for the wizard's terminal output.

use owo_colors::{OwoColorize, Style};
use supports_color::Stream;

/// How a message printed by the wizard should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Warning,
    Error,
    Heading,
    Muted,
}

impl Tone {
    const fn style(self) -> Style {
        match self {
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red().bold(),
            Self::Heading => Style::new().bright_blue().bold(),
            Self::Muted => Style::new().dimmed(),
        }
    }

    /// Problems go to stderr, everything else to stdout.
    const fn stream(self) -> Stream {
        match self {
            Self::Warning | Self::Error => Stream::Stderr,
            Self::Success | Self::Heading | Self::Muted => Stream::Stdout,
        }
    }
}

fn paint(text: &str, tone: Tone) -> String {
    let color = supports_color::on_cached(tone.stream()).is_some();
    paint_with(text, tone, color)
}

fn paint_with(text: &str, tone: Tone, color: bool) -> String {
    if color {
        text.style(tone.style()).to_string()
    } else {
        text.to_string()
    }
}

/// Styles text for the stream it will be printed on.
pub trait Colorize: AsRef<str> {
    /// A step that went through, in green.
    fn success(&self) -> String {
        paint(self.as_ref(), Tone::Success)
    }

    /// Something the user should fix, in yellow.
    fn warning(&self) -> String {
        paint(self.as_ref(), Tone::Warning)
    }

    /// A failure or a field error, in bold red.
    fn error(&self) -> String {
        paint(self.as_ref(), Tone::Error)
    }

    /// Step titles.
    fn heading(&self) -> String {
        paint(self.as_ref(), Tone::Heading)
    }

    /// Secondary details such as the request reference.
    fn muted(&self) -> String {
        paint(self.as_ref(), Tone::Muted)
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_without_color_support() {
        for tone in [
            Tone::Success,
            Tone::Warning,
            Tone::Error,
            Tone::Heading,
            Tone::Muted,
        ] {
            assert_eq!(paint_with("Step 1/5", tone, false), "Step 1/5");
        }
    }

    #[test]
    fn styled_text_keeps_the_message() {
        let styled = paint_with("Saved IT_Request_3f2b8c1d.pdf", Tone::Success, true);
        assert!(styled.starts_with('\u{1b}'));
        assert!(styled.contains("Saved IT_Request_3f2b8c1d.pdf"));
    }

    #[test]
    fn problems_are_written_to_stderr() {
        assert!(matches!(Tone::Error.stream(), Stream::Stderr));
        assert!(matches!(Tone::Warning.stream(), Stream::Stderr));
        assert!(matches!(Tone::Heading.stream(), Stream::Stdout));
    }
}
