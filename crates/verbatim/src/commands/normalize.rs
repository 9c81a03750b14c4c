//! Normalize command: show a text the way the matcher sees it.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use verbatim_core::{Config, Normalizer};

use super::read_text;

/// Arguments for the `normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// File to normalize (`-` reads standard input).
    pub file: Utf8PathBuf,
}

#[derive(Serialize)]
struct NormalizeOutput<'a> {
    file: &'a str,
    words: usize,
    text: &'a str,
}

/// Print the normalized form of a file.
#[instrument(name = "cmd_normalize", skip_all, fields(file = %args.file))]
pub fn cmd_normalize(
    args: NormalizeArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, "executing normalize command");

    let normalizer = Normalizer::from_config(&config.normalize)
        .context("invalid normalization rules in configuration")?;
    let content = read_text(&args.file, max_input_bytes)?;
    let text = normalizer.normalize(&content);

    if global_json {
        let output = NormalizeOutput {
            file: args.file.as_str(),
            words: text.split_whitespace().count(),
            text: &text,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{text}");
    }
    Ok(())
}
