mod cli;
mod display;
mod handlers;
mod obfuscator;
mod prettifier;
mod settings;
mod theme;

use std::{
    env,
    io::{self, IsTerminal, Write},
    process::ExitCode,
};

use anyhow::Result;
use clap::Parser;
use colored::control;
use fixdecoder_dictionary::DictionaryCache;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::Cli, obfuscator::Obfuscator, prettifier::Prettifier, settings::DecoderSettings,
};

fn init_logging(debug: bool) {
    // RUST_LOG wins, e.g. RUST_LOG=fixdecoder_dictionary=trace
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug {
        EnvFilter::new("fixdecoder=debug")
    } else {
        EnvFilter::new("fixdecoder=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let settings = DecoderSettings::from_cli(&cli, io::stdout().is_terminal());
    control::set_override(settings.colour);
    debug!(?settings, "starting");

    let cache = DictionaryCache::new();
    let mut out = io::stdout().lock();

    if handlers::run(&cli, &cache, &settings, &mut out)? {
        out.flush()?;
        return Ok(ExitCode::SUCCESS);
    }

    let obfuscator = settings.secret.then(Obfuscator::new);
    let prettifier = Prettifier::new(&cache, &settings, obfuscator.as_ref());
    let all_ok = prettifier.decode_files(&cli.files, &mut out, &mut io::stderr())?;
    out.flush()?;

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
