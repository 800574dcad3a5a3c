use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "fixdecoder")]
#[command(about = "Pretty-prints and validates FIX messages found in log files")]
#[command(version)]
pub struct Cli {
    /// FIX version used for schema display (40,41,42,43,44,50,50SP1,50SP2,T11)
    ///
    /// The built-in dictionaries cover the session messages and the common
    /// order entry, execution and market data flows only. Tags outside them
    /// print as bare numbers; pass a complete dictionary with --xml instead.
    #[arg(long, value_name = "VER", default_value = "44")]
    pub fix: String,

    /// Load the dictionary from an XML file instead of an embedded one
    #[arg(long, value_name = "FILE")]
    pub xml: Option<PathBuf>,

    /// Message name or MsgType to display (omit the value to list all messages)
    #[arg(long, value_name = "NAME|MSGTYPE", num_args = 0..=1)]
    pub message: Option<Option<String>>,

    /// Tag number to display (omit the value to list all tags)
    #[arg(long, value_name = "TAG", num_args = 0..=1)]
    pub tag: Option<Option<String>>,

    /// Component to display (omit the value to list all components)
    #[arg(long, value_name = "NAME", num_args = 0..=1)]
    pub component: Option<Option<String>>,

    /// Show a summary of the selected dictionary
    #[arg(long)]
    pub info: bool,

    /// Show enum values
    #[arg(long)]
    pub verbose: bool,

    /// Lay lists and enums out in columns
    #[arg(long)]
    pub column: bool,

    /// Include the Header block in message display
    #[arg(long)]
    pub header: bool,

    /// Include the Trailer block in message display
    #[arg(long)]
    pub trailer: bool,

    /// Validate decoded messages
    #[arg(long)]
    pub validate: bool,

    /// Force coloured output on or off (default: on when stdout is a terminal)
    #[arg(long, value_enum, value_name = "yes|no", num_args = 0..=1, default_missing_value = "yes")]
    pub colour: Option<ColourChoice>,

    /// Replace sensitive values (ids, accounts, passwords) with stable aliases
    #[arg(long)]
    pub secret: bool,

    /// Debug logging to stderr
    #[arg(long)]
    pub debug: bool,

    /// Log files to decode, none or `-` reads stdin
    pub files: Vec<String>,
}

impl Cli {
    /// Whether any schema query was requested instead of log decoding.
    pub fn has_query(&self) -> bool {
        self.xml.is_some()
            || self.info
            || self.message.is_some()
            || self.tag.is_some()
            || self.component.is_some()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ColourChoice {
    Yes,
    No,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clap::{CommandFactory, error::ErrorKind};

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from([&["fixdecoder"][..], args].concat()).unwrap()
    }

    #[test]
    fn command_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.fix, "44");
        assert!(cli.xml.is_none());
        assert!(cli.colour.is_none());
        assert!(cli.files.is_empty());
        assert!(!cli.has_query());
    }

    #[test]
    fn bare_and_valued_queries() {
        let cli = parse(&["--message"]);
        assert_eq!(cli.message, Some(None));
        assert!(cli.has_query());

        let cli = parse(&["--message=NewOrderSingle", "--tag", "35"]);
        assert_eq!(cli.message, Some(Some("NewOrderSingle".to_owned())));
        assert_eq!(cli.tag, Some(Some("35".to_owned())));
        assert_eq!(cli.component, None);

        let cli = parse(&["--component="]);
        assert_eq!(cli.component, Some(Some(String::new())));
    }

    #[test]
    fn long_help_mentions_dictionary_coverage() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("built-in dictionaries cover the session messages"));
    }

    #[test]
    fn colour_choice() {
        assert_eq!(parse(&["--colour", "no"]).colour, Some(ColourChoice::No));
        assert_eq!(parse(&["--colour=yes"]).colour, Some(ColourChoice::Yes));
        assert_eq!(parse(&["--colour"]).colour, Some(ColourChoice::Yes));
        assert_matches!(
            Cli::try_parse_from(["fixdecoder", "--colour=maybe"]),
            Err(err) if err.kind() == ErrorKind::InvalidValue
        );
    }

    #[test]
    fn files_and_flags() {
        let cli = parse(&["--validate", "--secret", "a.log", "-", "b.log"]);
        assert!(cli.validate);
        assert!(cli.secret);
        assert_eq!(cli.files, ["a.log", "-", "b.log"]);
    }
}
