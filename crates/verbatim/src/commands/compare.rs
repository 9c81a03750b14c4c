//! Compare command: find runs a candidate shares with its sources.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use verbatim_core::{Comparator, ComparisonReport, ComparisonRequest, Config, Source};

use super::{check_text_size, read_text};

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Candidate text file (`-` reads standard input).
    pub candidate: Utf8PathBuf,

    /// Source files, as PATH or LABEL=PATH.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Source text given inline (labelled "manual entry"; repeatable).
    #[arg(long, value_name = "TEXT")]
    pub text: Vec<String>,

    /// Minimum shared run length, in words.
    #[arg(long, value_name = "N")]
    pub min_words: Option<usize>,

    /// Exit with an error when any source shares a run.
    #[arg(long)]
    pub fail_on_match: bool,
}

/// Split a SOURCE argument into its label and path.
///
/// A bare path is labelled with itself. `LABEL=PATH` only applies when the
/// label is non-empty and the whole argument is not an existing file. The
/// split happens at the last `=`, so URL labels may carry query strings.
fn parse_source(arg: &str) -> (String, Utf8PathBuf) {
    if let Some((label, path)) = arg.rsplit_once('=')
        && !label.is_empty()
        && !path.is_empty()
        && !Utf8Path::new(arg).exists()
    {
        return (label.to_string(), Utf8PathBuf::from(path));
    }
    (arg.to_string(), Utf8PathBuf::from(arg))
}

/// Compare a candidate file against every source.
#[instrument(name = "cmd_compare", skip_all, fields(candidate = %args.candidate))]
pub fn cmd_compare(
    args: CompareArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        sources = args.sources.len(),
        texts = args.text.len(),
        min_words = ?args.min_words,
        "executing compare command"
    );

    if args.sources.is_empty() && args.text.is_empty() {
        bail!("nothing to compare against: give at least one SOURCE or --text");
    }

    let mut comparator =
        Comparator::from_config(config).context("invalid normalization rules in configuration")?;
    if let Some(min_words) = args.min_words {
        comparator = comparator.with_min_words(min_words);
    }

    let candidate = read_text(&args.candidate, max_input_bytes)?;
    let mut request = ComparisonRequest::new(candidate);
    for arg in &args.sources {
        let (label, path) = parse_source(arg);
        let text = read_text(&path, max_input_bytes)?;
        request.sources.push(Source::new(label, text));
    }
    for text in args.text {
        check_text_size("--text", &text, max_input_bytes)?;
        request.sources.push(Source::manual(text));
    }

    let report = comparator.compare(&request);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&args.candidate, &report);
    }

    if args.fail_on_match && report.has_matches() {
        bail!(
            "{} shares {} run(s) with {} source(s)",
            args.candidate,
            report.total_matches(),
            report.sources.len()
        );
    }
    Ok(())
}

fn print_report(candidate: &Utf8Path, report: &ComparisonReport) {
    for label in &report.skipped {
        println!("{} {label} (empty)", "SKIP:".yellow());
    }

    if !report.has_matches() {
        println!(
            "{} no runs of {}+ words shared with any source ({} words checked)",
            "CLEAN:".green(),
            report.min_words,
            report.candidate_words
        );
        return;
    }

    for source in &report.sources {
        println!(
            "{} {} ({} run(s), {} words, {:.1}% of {candidate})",
            "MATCH:".red().bold(),
            source.label.cyan(),
            source.matches.len(),
            source.matched_words,
            source.coverage
        );
        for record in &source.matches {
            println!(
                "  {} {}",
                format!(
                    "[{}..{}]",
                    record.start_word_index,
                    record.end_word_index()
                )
                .dimmed(),
                record.text
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_path_is_its_own_label() {
        let (label, path) = parse_source("notes/article.txt");
        assert_eq!(label, "notes/article.txt");
        assert_eq!(path, "notes/article.txt");
    }

    #[test]
    fn label_prefix_is_split_off() {
        let (label, path) = parse_source("https://news.example/a=saved/a.html");
        assert_eq!(label, "https://news.example/a");
        assert_eq!(path, "saved/a.html");
    }

    #[test]
    fn label_with_query_string_keeps_its_equals_signs() {
        let (label, path) = parse_source("https://x.test/?id=7&page=2=saved.txt");
        assert_eq!(label, "https://x.test/?id=7&page=2");
        assert_eq!(path, "saved.txt");
    }

    #[test]
    fn degenerate_labels_are_paths() {
        assert_eq!(parse_source("=a.txt").0, "=a.txt");
        assert_eq!(parse_source("a.txt=").0, "a.txt=");
    }

    #[test]
    fn existing_file_with_equals_sign_is_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x=y.txt");
        std::fs::write(&file, "text").unwrap();
        let arg = file.to_str().unwrap();

        let (label, path) = parse_source(arg);
        assert_eq!(label, arg);
        assert_eq!(path, arg);
    }
}
