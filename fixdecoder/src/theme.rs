use colored::{Color, Colorize};

/// Role of a piece of output text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Style {
    /// Log text around messages.
    Line,
    /// Raw message span inside a log line.
    Message,
    Tag,
    Name,
    Value,
    Enum,
    File,
    Error,
    Separator,
}

impl Style {
    fn color(self) -> Color {
        match self {
            Style::Line => Color::TrueColor {
                r: 128,
                g: 128,
                b: 128,
            },
            Style::Message => Color::BrightWhite,
            Style::Tag => Color::TrueColor {
                r: 95,
                g: 215,
                b: 255,
            },
            Style::Name => Color::TrueColor {
                r: 175,
                g: 215,
                b: 175,
            },
            Style::Value => Color::TrueColor {
                r: 255,
                g: 255,
                b: 135,
            },
            Style::Enum => Color::TrueColor {
                r: 255,
                g: 175,
                b: 0,
            },
            Style::File => Color::BrightMagenta,
            Style::Error | Style::Separator => Color::Red,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    enabled: bool,
}

impl Theme {
    pub fn new(enabled: bool) -> Theme {
        Theme { enabled }
    }

    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            text.color(style.color()).to_string()
        } else {
            text.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use colored::control;

    use super::*;

    #[test]
    fn plain_theme_leaves_text_alone() {
        let theme = Theme::new(false);
        assert_eq!(theme.paint(Style::Tag, "  35"), "  35");
        assert_eq!(theme.paint(Style::Error, ""), "");
    }

    #[test]
    fn enabled_theme_wraps_text_in_escapes() {
        control::set_override(true);
        let painted = Theme::new(true).paint(Style::Error, "oops");
        assert!(painted.starts_with("\x1b["));
        assert!(painted.contains("oops"));
        assert!(painted.ends_with("\x1b[0m"));
    }
}
