//! Markdown-to-prose extraction for locally stored texts.
//!
//! Uses pulldown-cmark for proper CommonMark parsing rather than regex-based
//! stripping, so markup characters never leak into the words being compared.

use camino::Utf8Path;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Whether `path` looks like a Markdown document.
pub fn is_markdown_path(path: &Utf8Path) -> bool {
    matches!(path.extension(), Some("md" | "markdown"))
}

/// Reduce Markdown to the prose a reader would see.
///
/// Drops code blocks, HTML, image alt text, YAML frontmatter and block
/// quotes (quoted material is attributed, so it never counts as copying).
/// Keeps headings, paragraphs, list items, table cells, emphasis and link
/// text. Every block ends with a newline so adjacent blocks never fuse into
/// one word.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn strip_to_prose(text: &str) -> String {
    let text = strip_frontmatter(text);

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(text, options);

    let mut result = String::with_capacity(text.len());
    let mut skip_depth: usize = 0;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::BlockQuote(_) | Tag::Image { .. }) => {
                skip_depth += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::BlockQuote(_) | TagEnd::Image) => {
                skip_depth = skip_depth.saturating_sub(1);
            }

            Event::Text(t) | Event::Code(t) if skip_depth == 0 => {
                result.push_str(&t);
            }
            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => {
                result.push(' ');
            }
            Event::End(TagEnd::TableCell) if skip_depth == 0 => {
                result.push(' ');
            }
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::TableHead
                | TagEnd::TableRow,
            ) if skip_depth == 0 => {
                result.push('\n');
            }

            _ => {}
        }
    }

    result
}

/// Strip YAML frontmatter delimited by `---` lines.
fn strip_frontmatter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after_opening) = trimmed.strip_prefix("---") else {
        return text;
    };
    let Some(close_pos) = after_opening.find("\n---") else {
        return text;
    };

    let remainder = &after_opening[close_pos + 4..];
    remainder.strip_prefix('\n').unwrap_or(remainder)
}
