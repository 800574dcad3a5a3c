//! Schema queries: `--xml`, `--info`, `--message`, `--tag` and `--component`.

use std::{io::Write, path::Path, sync::Arc};

use anyhow::{Context, Result};
use clap::CommandFactory;
use fixdecoder_dictionary::{DictionaryCache, RawDictionary, SchemaTree, version_for_id};
use tracing::{debug, warn};

use crate::{
    cli::Cli,
    display::SchemaPrinter,
    settings::DecoderSettings,
    theme::Style,
};

fn load_external(path: &Path) -> Result<SchemaTree> {
    let raw = RawDictionary::from_file(path)
        .inspect_err(|err| warn!(path = %path.display(), "{err}"))
        .with_context(|| format!("failed to load dictionary {}", path.display()))?;
    SchemaTree::build(&raw).with_context(|| format!("invalid dictionary {}", path.display()))
}

/// The dictionary queries run against: the `--xml` file when given,
/// otherwise the embedded dictionary selected by `--fix`.
pub fn load_schema(cli: &Cli, cache: &DictionaryCache) -> Result<Arc<SchemaTree>> {
    if let Some(path) = &cli.xml {
        return load_external(path).map(Arc::new);
    }
    let version = version_for_id(&cli.fix);
    debug!(id = %cli.fix, %version, "selected embedded dictionary");
    cache
        .resolve_schema(version)
        .with_context(|| format!("failed to load FIX {} dictionary", cli.fix))
}

fn usage<W: Write>(out: &mut W) -> Result<()> {
    Cli::command().write_help(out)?;
    Ok(())
}

/// Runs the schema queries requested on the command line.
///
/// Returns `false` when none was requested and log decoding should run
/// instead.
pub fn run<W: Write>(
    cli: &Cli,
    cache: &DictionaryCache,
    settings: &DecoderSettings,
    out: &mut W,
) -> Result<bool> {
    if !cli.has_query() {
        return Ok(false);
    }

    let schema = load_schema(cli, cache)?;
    let printer = SchemaPrinter::new(&schema, cli.verbose, cli.column, settings.width);

    if let Some(path) = &cli.xml {
        let path = path.display().to_string();
        writeln!(
            out,
            "Dictionary loaded from: {}\n",
            settings.theme().paint(Style::File, &path)
        )?;
        printer.summary(out)?;
    }

    if cli.info {
        printer.info(out)?;
    }

    match cli.message.as_ref() {
        None => {}
        Some(None) => printer.list_messages(out)?,
        Some(Some(name)) if name.is_empty() => usage(out)?,
        Some(Some(name)) => printer.message(out, name, cli.header, cli.trailer)?,
    }

    match cli.tag.as_ref() {
        None => {}
        Some(None) => printer.list_tags(out)?,
        Some(Some(tag)) if tag.is_empty() => usage(out)?,
        Some(Some(tag)) => printer.tag(out, tag)?,
    }

    match cli.component.as_ref() {
        None => {}
        Some(None) => printer.list_components(out)?,
        Some(Some(name)) if name.is_empty() => usage(out)?,
        Some(Some(name)) => printer.component(out, name)?,
    }

    Ok(true)
}
