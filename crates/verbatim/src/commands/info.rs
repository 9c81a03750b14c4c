//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};
use verbatim_core::RuleSummary;
use verbatim_core::config::{Config, ConfigSources};
use verbatim_core::normalize::Normalizer;

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    min_words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
    /// `None` when the configured rules fail to compile.
    #[serde(skip_serializing_if = "Option::is_none")]
    rules: Option<RuleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rules_error: Option<String>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let (rules, rules_error) = match Normalizer::from_config(&config.normalize) {
            Ok(normalizer) => (Some(normalizer.rules()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            min_words: config.effective_min_words(),
            max_input_bytes: config.effective_max_input_bytes(),
            rules,
            rules_error,
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let info = PackageInfo::new();

    debug!(json_output = global_json, "executing info command");

    let config_info = ConfigInfo::from_config(config, sources);
    let full_info = FullInfo {
        package: info,
        config: config_info,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }
    if !full_info.package.repository.is_empty() {
        println!(
            "{}: {}",
            "Repository".dimmed(),
            full_info.package.repository.cyan()
        );
    }

    let config = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    if let Some(ref path) = config.config_file {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    } else {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    println!("{}: {}", "Log level".dimmed(), config.log_level);
    if let Some(ref dir) = config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    println!("{}: {}", "Minimum run".dimmed(), config.min_words);
    match config.max_input_bytes {
        Some(max) => println!("{}: {max} bytes", "Input limit".dimmed()),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Normalization".bold().underline());
    if let Some(ref err) = config.rules_error {
        println!("{}: {}", "Rules".dimmed(), err.red());
    }
    if let Some(ref rules) = config.rules {
        println!("{}: {}", "Boilerplate phrases".dimmed(), rules.boilerplate_phrases);
        println!("{}: {}", "Boilerplate patterns".dimmed(), rules.boilerplate_patterns);
        print_toggle("Kicker labels", rules.strip_kicker_labels);
        if rules.quote_styles.is_empty() {
            println!("{}: {}", "Quote styles".dimmed(), "off".yellow());
        } else {
            println!("{}: {}", "Quote styles".dimmed(), rules.quote_styles.join(", "));
        }
        if rules.collapse_duplicates {
            println!(
                "{}: {}+ chars",
                "Duplicate passages".dimmed(),
                rules.min_duplicate_chars
            );
        } else {
            print_toggle("Duplicate passages", false);
        }
        print_toggle("Trailing headlines", rules.trim_trailing_headlines);
    }

    Ok(())
}

/// Print a rule toggle as on/off.
fn print_toggle(label: &str, on: bool) {
    if on {
        println!("{}: {}", label.dimmed(), "on".green());
    } else {
        println!("{}: {}", label.dimmed(), "off".yellow());
    }
}
