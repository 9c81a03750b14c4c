//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;
use verbatim_core::markup;

pub mod compare;
pub mod info;
pub mod normalize;
#[cfg(feature = "mcp")]
pub mod serve;

/// Path argument that means "read standard input".
pub const STDIN_PATH: &str = "-";

/// Read a file (or stdin for `-`) and validate its size against the
/// configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    if path.as_str() == STDIN_PATH {
        return read_stdin(max_bytes);
    }

    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Read an input and reduce Markdown files to their prose.
pub fn read_text(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    let content = read_input_file(path, max_bytes)?;
    if markup::is_markdown_path(path) {
        Ok(markup::strip_to_prose(&content))
    } else {
        Ok(content)
    }
}

/// Reject inline text over the configured limit.
pub fn check_text_size(what: &str, text: &str, max_bytes: Option<usize>) -> anyhow::Result<()> {
    if let Some(max) = max_bytes
        && text.len() > max
    {
        anyhow::bail!(
            "input too large: {what} is {} bytes (limit: {max} bytes)",
            text.len()
        );
    }
    Ok(())
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut buf = String::new();
    let stdin = std::io::stdin().lock();
    match max_bytes {
        // read one byte past the limit so oversize input is detectable
        Some(max) => {
            let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
            stdin
                .take(limit)
                .read_to_string(&mut buf)
                .context("failed to read standard input")?;
            check_text_size("standard input", &buf, Some(max))?;
        }
        None => {
            let mut stdin = stdin;
            stdin
                .read_to_string(&mut buf)
                .context("failed to read standard input")?;
        }
    }
    Ok(buf)
}
