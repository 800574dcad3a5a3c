use std::env;

use crossterm::terminal;
use serde::Deserialize;

use crate::{
    cli::{Cli, ColourChoice},
    theme::Theme,
};

pub const DEFAULT_WIDTH: usize = 80;

/// Options consumed by the decoding pipeline and schema display.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DecoderSettings {
    pub validate: bool,
    pub secret: bool,
    pub colour: bool,
    /// Output width used for separators and columns.
    pub width: usize,
}

impl Default for DecoderSettings {
    fn default() -> DecoderSettings {
        DecoderSettings {
            validate: false,
            secret: false,
            colour: false,
            width: DEFAULT_WIDTH,
        }
    }
}

impl DecoderSettings {
    pub fn from_cli(cli: &Cli, stdout_is_terminal: bool) -> DecoderSettings {
        let colour = match cli.colour {
            Some(ColourChoice::Yes) => true,
            Some(ColourChoice::No) => false,
            None => stdout_is_terminal,
        };
        DecoderSettings {
            validate: cli.validate,
            secret: cli.secret,
            colour,
            width: terminal_width(
                env::var("COLUMNS").ok().as_deref(),
                stdout_is_terminal.then(detected_width).flatten(),
            ),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::new(self.colour)
    }
}

fn detected_width() -> Option<usize> {
    terminal::size().ok().map(|(columns, _)| usize::from(columns))
}

/// Output width: a positive `COLUMNS` value, else the width of the attached
/// terminal, else [`DEFAULT_WIDTH`].
pub fn terminal_width(columns: Option<&str>, detected: Option<usize>) -> usize {
    columns
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&width| width > 0)
        .or(detected.filter(|&width| width > 0))
        .unwrap_or(DEFAULT_WIDTH)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn width_from_columns() {
        assert_eq!(terminal_width(None, None), DEFAULT_WIDTH);
        assert_eq!(terminal_width(Some("132"), None), 132);
        assert_eq!(terminal_width(Some(" 100\n"), None), 100);
        assert_eq!(terminal_width(Some("0"), None), DEFAULT_WIDTH);
        assert_eq!(terminal_width(Some("-5"), None), DEFAULT_WIDTH);
        assert_eq!(terminal_width(Some("wide"), None), DEFAULT_WIDTH);
    }

    #[test]
    fn detected_width_unless_columns_is_set() {
        assert_eq!(terminal_width(None, Some(173)), 173);
        assert_eq!(terminal_width(Some("132"), Some(173)), 132);
        assert_eq!(terminal_width(Some("wide"), Some(173)), 173);
        assert_eq!(terminal_width(None, Some(0)), DEFAULT_WIDTH);
    }

    #[test]
    fn colour_follows_terminal_unless_forced() {
        let auto = Cli::try_parse_from(["fixdecoder"]).unwrap();
        assert!(DecoderSettings::from_cli(&auto, true).colour);
        assert!(!DecoderSettings::from_cli(&auto, false).colour);

        let off = Cli::try_parse_from(["fixdecoder", "--colour=no"]).unwrap();
        assert!(!DecoderSettings::from_cli(&off, true).colour);

        let on = Cli::try_parse_from(["fixdecoder", "--colour=yes"]).unwrap();
        assert!(DecoderSettings::from_cli(&on, false).colour);
    }

    #[test]
    fn toggles_are_copied() {
        let cli = Cli::try_parse_from(["fixdecoder", "--validate", "--secret"]).unwrap();
        let settings = DecoderSettings::from_cli(&cli, false);
        assert!(settings.validate);
        assert!(settings.secret);
        assert!(settings.width > 0);
    }
}
