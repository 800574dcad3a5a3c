//! Log scanning and field-by-field rendering of the messages found in it.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use fixdecoder_dictionary::{DictionaryCache, FlatDictionary};
use fixdecoder_messages::{dictionary_for_message, parse_fields, validate};
use regex::Regex;
use tracing::debug;

use crate::{
    obfuscator::Obfuscator,
    settings::DecoderSettings,
    theme::{Style, Theme},
};

/// Stands for standard input in the file list.
pub const STDIN: &str = "-";

static FIX_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"8=FIX.*?10=\d{3}\x01").expect("valid message pattern"));

/// Writes one line per field of `msg`: tag, field name, value and the enum
/// description when there is one. Members of repeating groups are indented
/// one level per enclosing group.
pub fn write_fields<W: Write>(
    out: &mut W,
    msg: &str,
    dictionary: &FlatDictionary,
    theme: &Theme,
) -> io::Result<()> {
    let mut open_groups: Vec<u32> = Vec::new();

    for field in parse_fields(msg) {
        match dictionary
            .group_owner(field.tag)
            .and_then(|owner| open_groups.iter().rposition(|&tag| tag == owner))
        {
            Some(position) => open_groups.truncate(position + 1),
            None => open_groups.clear(),
        }

        let description = dictionary.enum_description(field.tag, field.value);
        write!(
            out,
            "    {}{} ({}): {}",
            "    ".repeat(open_groups.len()),
            theme.paint(Style::Tag, &format!("{:>4}", field.tag)),
            theme.paint(Style::Name, &dictionary.field_name(field.tag)),
            theme.paint(Style::Value, field.value),
        )?;
        if !description.is_empty() {
            write!(out, " ({})", theme.paint(Style::Enum, description))?;
        }
        writeln!(out)?;

        if dictionary.is_group_count_field(field.tag) {
            open_groups.push(field.tag);
        }
    }
    Ok(())
}

pub struct Prettifier<'a> {
    cache: &'a DictionaryCache,
    settings: &'a DecoderSettings,
    obfuscator: Option<&'a Obfuscator>,
    theme: Theme,
    separator: String,
}

impl<'a> Prettifier<'a> {
    pub fn new(
        cache: &'a DictionaryCache,
        settings: &'a DecoderSettings,
        obfuscator: Option<&'a Obfuscator>,
    ) -> Prettifier<'a> {
        let theme = settings.theme();
        let separator = theme.paint(Style::Separator, &"=".repeat(settings.width));
        Prettifier {
            cache,
            settings,
            obfuscator,
            theme,
            separator,
        }
    }

    /// Decodes every file in `paths`, standard input when the list is empty.
    ///
    /// A file that cannot be opened or read is reported on `err` and skipped.
    /// Returns `false` if any file failed.
    pub fn decode_files<W: Write, E: Write>(
        &self,
        paths: &[String],
        out: &mut W,
        err: &mut E,
    ) -> Result<bool> {
        if paths.is_empty() {
            return self.report(self.decode(io::stdin().lock(), out), err);
        }

        let mut all_ok = true;
        for path in paths {
            let result = if path == STDIN {
                writeln!(out, "Processing: (stdin)\n")?;
                self.decode(io::stdin().lock(), out)
            } else {
                writeln!(out, "Processing: {}\n", self.theme.paint(Style::File, path))?;
                File::open(path)
                    .with_context(|| format!("cannot open {path}"))
                    .and_then(|file| self.decode(BufReader::new(file), out))
                    .with_context(|| format!("failed to decode {path}"))
            };
            all_ok &= self.report(result, err)?;
        }
        Ok(all_ok)
    }

    fn report<E: Write>(&self, result: Result<()>, err: &mut E) -> Result<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(error) => {
                writeln!(err, "{}", self.theme.paint(Style::Error, &format!("{error:#}")))?;
                Ok(false)
            }
        }
    }

    /// Decodes a log line by line. Bytes that are not UTF-8 are replaced
    /// rather than rejected.
    pub fn decode<R: BufRead, W: Write>(&self, mut input: R, out: &mut W) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf).context("read error")? == 0 {
                return Ok(());
            }
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\n', '\r']);
            let line = match self.obfuscator {
                Some(obfuscator) => Cow::Owned(obfuscator.obfuscate_line(line)),
                None => Cow::Borrowed(line),
            };
            self.decode_line(&line, out)?;
        }
    }

    /// Echoes a log line and decodes the messages embedded in it.
    pub fn decode_line<W: Write>(&self, line: &str, out: &mut W) -> Result<()> {
        let spans: Vec<_> = FIX_MESSAGE.find_iter(line).collect();
        if spans.is_empty() {
            writeln!(out, "{}", self.theme.paint(Style::Line, line))?;
            return Ok(());
        }

        let mut last = 0;
        for span in &spans {
            write!(
                out,
                "{}{}",
                self.theme.paint(Style::Line, &line[last..span.start()]),
                self.theme.paint(Style::Message, span.as_str()),
            )?;
            last = span.end();
        }
        writeln!(out, "{}", self.theme.paint(Style::Line, &line[last..]))?;
        writeln!(out, "{}", self.separator)?;

        for span in spans {
            self.decode_message(span.as_str(), out)?;
        }
        Ok(())
    }

    fn decode_message<W: Write>(&self, msg: &str, out: &mut W) -> Result<()> {
        let dictionary =
            dictionary_for_message(self.cache, msg).context("no dictionary for message")?;
        write_fields(out, msg, &dictionary, &self.theme)?;

        if self.settings.validate {
            let findings = validate(msg, &dictionary);
            debug!(findings = findings.len(), "validated message");
            if !findings.is_empty() {
                writeln!(out, "{}", self.separator)?;
                for finding in findings {
                    let text = format!("== {finding}");
                    writeln!(out, "{}", self.theme.paint(Style::Error, &text))?;
                }
            }
        }

        writeln!(out, "{}", self.separator)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const GROUPS_DICT: &str = r#"
<fix major="4" minor="4">
    <header>
        <field name="MsgType" required="Y"/>
    </header>
    <trailer/>
    <messages>
        <message name="NewOrderSingle" msgtype="D" msgcat="app">
            <field name="ClOrdID" required="Y"/>
            <group name="NoPartyIDs" required="N">
                <field name="PartyID" required="N"/>
                <field name="PartyRole" required="N"/>
                <group name="NoPartySubIDs" required="N">
                    <field name="PartySubID" required="N"/>
                </group>
            </group>
            <field name="Side" required="Y"/>
        </message>
    </messages>
    <fields>
        <field number="11" name="ClOrdID" type="STRING"/>
        <field number="35" name="MsgType" type="STRING"/>
        <field number="54" name="Side" type="CHAR">
            <value enum="1" description="BUY"/>
        </field>
        <field number="448" name="PartyID" type="STRING"/>
        <field number="452" name="PartyRole" type="INT"/>
        <field number="453" name="NoPartyIDs" type="NUMINGROUP"/>
        <field number="523" name="PartySubID" type="STRING"/>
        <field number="802" name="NoPartySubIDs" type="NUMINGROUP"/>
    </fields>
</fix>
"#;

    fn settings(validate: bool) -> DecoderSettings {
        DecoderSettings {
            validate,
            width: 10,
            ..DecoderSettings::default()
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn field_lines() {
        let dictionary = FlatDictionary::load(GROUPS_DICT).unwrap();
        let text = render(|out| {
            write_fields(out, "35=D\x0111=A1\x0154=1\x019999=x\x01", &dictionary, &Theme::new(false))
                .unwrap()
        });
        assert_eq!(
            text,
            "      35 (MsgType): D (NewOrderSingle)\n\
             \x20     11 (ClOrdID): A1\n\
             \x20     54 (Side): 1 (BUY)\n\
             \x20   9999 (9999): x\n"
        );
    }

    #[test]
    fn group_members_are_indented() {
        let dictionary = FlatDictionary::load(GROUPS_DICT).unwrap();
        let msg = "11=A\x01453=2\x01448=P1\x01452=3\x01802=1\x01523=S1\x01448=P2\x0154=1\x01";
        let text = render(|out| write_fields(out, msg, &dictionary, &Theme::new(false)).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "      11 (ClOrdID): A",
                "     453 (NoPartyIDs): 2",
                "         448 (PartyID): P1",
                "         452 (PartyRole): 3",
                "         802 (NoPartySubIDs): 1",
                "             523 (PartySubID): S1",
                "         448 (PartyID): P2",
                "      54 (Side): 1 (BUY)",
            ]
        );
    }

    #[test]
    fn plain_lines_are_echoed() {
        let cache = DictionaryCache::new();
        let settings = settings(false);
        let prettifier = Prettifier::new(&cache, &settings, None);

        let text = render(|out| prettifier.decode_line("nothing to see", out).unwrap());
        assert_eq!(text, "nothing to see\n");
    }

    #[test]
    fn message_lines_are_decoded() {
        let cache = DictionaryCache::new();
        let settings = settings(false);
        let prettifier = Prettifier::new(&cache, &settings, None);

        let line = "recv 8=FIX.4.4\x0135=0\x0110=247\x01 done";
        let text = render(|out| prettifier.decode_line(line, out).unwrap());
        assert_eq!(
            text,
            format!(
                "{line}\n\
                 ==========\n\
                 \x20      8 (BeginString): FIX.4.4\n\
                 \x20     35 (MsgType): 0 (Heartbeat)\n\
                 \x20     10 (CheckSum): 247\n\
                 ==========\n"
            )
        );
    }

    #[test]
    fn several_messages_on_one_line() {
        let cache = DictionaryCache::new();
        let settings = settings(false);
        let prettifier = Prettifier::new(&cache, &settings, None);

        let line = "8=FIX.4.4\x0135=0\x0110=247\x01|8=FIX.4.2\x0135=1\x0110=000\x01";
        let text = render(|out| prettifier.decode_line(line, out).unwrap());
        assert_eq!(text.matches("==========\n").count(), 3);
        assert!(text.contains("(MsgType): 0 (Heartbeat)"));
        assert!(text.contains("(MsgType): 1 (TestRequest)"));
    }

    #[test]
    fn validation_findings_follow_the_fields() {
        let cache = DictionaryCache::new();
        let settings = settings(true);
        let prettifier = Prettifier::new(&cache, &settings, None);

        let text = render(|out| {
            prettifier
                .decode_line("8=FIX.4.4\x0135=0\x0110=000\x01", out)
                .unwrap()
        });
        assert!(text.ends_with(
            "      10 (CheckSum): 000\n\
             ==========\n\
             == Checksum mismatch: got 000, expected 247\n\
             ==========\n"
        ));

        let clean = render(|out| {
            prettifier
                .decode_line("8=FIX.4.4\x0135=0\x0110=247\x01", out)
                .unwrap()
        });
        assert!(!clean.contains("== "));
    }

    #[test]
    fn decode_reads_every_line() {
        let cache = DictionaryCache::new();
        let settings = settings(false);
        let prettifier = Prettifier::new(&cache, &settings, None);

        let input = Cursor::new(b"first\r\n8=FIX.4.4\x0135=0\x0110=247\x01\nlast \xff".to_vec());
        let text = render(|out| prettifier.decode(input, out).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "first");
        assert_eq!(lines[1], "8=FIX.4.4\x0135=0\x0110=247\x01");
        assert_eq!(lines.last(), Some(&"last \u{fffd}"));
    }

    #[test]
    fn secret_values_are_replaced_before_decoding() {
        let cache = DictionaryCache::new();
        let settings = settings(false);
        let obfuscator = Obfuscator::new();
        let prettifier = Prettifier::new(&cache, &settings, Some(&obfuscator));

        let input = Cursor::new(b"8=FIX.4.4\x0135=0\x0149=ACME\x0110=000\x01\n".to_vec());
        let text = render(|out| prettifier.decode(input, out).unwrap());
        assert!(text.contains("(SenderCompID): SenderCompID0001"));
        assert!(!text.contains("ACME"));
    }

    #[test]
    fn missing_files_are_reported_and_skipped() {
        let cache = DictionaryCache::new();
        let settings = settings(false);
        let prettifier = Prettifier::new(&cache, &settings, None);

        let mut out = Vec::new();
        let mut err = Vec::new();
        let paths = vec!["/nonexistent/fix.log".to_owned()];
        let all_ok = prettifier.decode_files(&paths, &mut out, &mut err).unwrap();

        assert!(!all_ok);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Processing: /nonexistent/fix.log\n\n"
        );
        assert!(
            String::from_utf8(err)
                .unwrap()
                .starts_with("failed to decode /nonexistent/fix.log: cannot open")
        );
    }
}
