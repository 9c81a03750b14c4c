//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes normalization and matching to AI assistants over stdio. Every
//! tool delegates to `verbatim-core`; the server holds only the compiled
//! rule set and the input size limit, so requests never share state.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use verbatim_core::{Comparator, ComparisonRequest, Source, markup, matcher};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `normalize_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct NormalizeTextParams {
    /// The text to normalize.
    pub text: String,
    /// Whether to reduce markdown to prose first.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `find_matches` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct FindMatchesParams {
    /// The text under suspicion.
    pub candidate: String,
    /// The text it may have been copied from.
    pub reference: String,
    /// Minimum run length in words (defaults to the configured value).
    pub min_words: Option<usize>,
    /// Normalize both texts before matching (default true).
    #[serde(default = "default_true")]
    pub normalize: bool,
}

const fn default_true() -> bool {
    true
}

/// Parameters for the `compare_sources` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CompareSourcesParams {
    /// The text under suspicion.
    pub candidate: String,
    /// Labelled reference texts.
    pub sources: Vec<Source>,
    /// Minimum run length in words (defaults to the configured value).
    pub min_words: Option<usize>,
    /// Whether to reduce markdown to prose first, on every text.
    #[serde(default)]
    pub strip_markdown: bool,
}

#[derive(Serialize)]
struct NormalizedText {
    words: usize,
    text: String,
}

/// MCP server exposing comparison tools to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    comparator: Comparator,
    max_input_bytes: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server with the built-in rules and input limit.
    pub fn new() -> Self {
        Self::with_comparator(
            Comparator::default(),
            Some(verbatim_core::DEFAULT_MAX_INPUT_BYTES),
        )
    }

    /// Create a server with configured rules and input limit.
    pub fn with_comparator(comparator: Comparator, max_input_bytes: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            comparator,
            max_input_bytes,
        }
    }

    /// The default minimum run length.
    pub const fn min_words(&self) -> usize {
        self.comparator.min_words()
    }

    fn check_size(&self, what: &str, text: &str) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("{what} is {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    fn prepare(text: &str, strip_markdown: bool) -> String {
        if strip_markdown {
            markup::strip_to_prose(text)
        } else {
            text.to_string()
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "min_words": self.comparator.min_words(),
            "rules": self.comparator.normalizer().rules(),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Normalize text the way the matcher sees it.
    #[tool(
        description = "Normalize text: drop navigation boilerplate, dates, quoted passages and repeated paragraphs; unify dashes and punctuation spacing. Returns the normalized text and its word count."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn normalize_text(
        &self,
        Parameters(params): Parameters<NormalizeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size("text", &params.text)?;

        let prepared = Self::prepare(&params.text, params.strip_markdown);
        let text = self.comparator.normalizer().normalize(&prepared);
        let output = NormalizedText {
            words: text.split_whitespace().count(),
            text,
        };

        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(tool = "normalize_text", words = output.words, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Find runs shared by two texts.
    #[tool(
        description = "Find non-overlapping runs of at least min_words words that a candidate text shares verbatim with a reference text. Returns match records ordered by position."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn find_matches(
        &self,
        Parameters(params): Parameters<FindMatchesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size("candidate", &params.candidate)?;
        self.check_size("reference", &params.reference)?;

        let min_words = params.min_words.unwrap_or_else(|| self.comparator.min_words());
        let (candidate, reference) = if params.normalize {
            let normalizer = self.comparator.normalizer();
            (
                normalizer.normalize(&params.candidate),
                normalizer.normalize(&params.reference),
            )
        } else {
            (params.candidate, params.reference)
        };

        let matches = matcher::find_matches(&candidate, &reference, min_words);
        let json = serde_json::to_string_pretty(&matches)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(tool = "find_matches", matches = matches.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Compare one candidate against several labelled sources.
    #[tool(
        description = "Compare a candidate text against labelled source texts. Returns, per source with matches, the shared runs, matched word count and coverage percentage."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", sources = params.sources.len()))]
    fn compare_sources(
        &self,
        Parameters(params): Parameters<CompareSourcesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size("candidate", &params.candidate)?;
        for source in &params.sources {
            self.check_size(&source.label, &source.text)?;
        }

        let mut request =
            ComparisonRequest::new(Self::prepare(&params.candidate, params.strip_markdown));
        request.sources = params
            .sources
            .iter()
            .map(|s| Source::new(&s.label, Self::prepare(&s.text, params.strip_markdown)))
            .collect();

        let comparator = match params.min_words {
            Some(min_words) => self.comparator.clone().with_min_words(min_words),
            None => self.comparator.clone(),
        };
        let report = comparator.compare(&request);

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "compare_sources",
            matched_sources = report.sources.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use compare_sources to check a text against its sources, \
                 find_matches for a single pair, normalize_text to see what gets compared.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    const ARTICLE: &str = "Police in the harbour district arrested two men on Friday night \
                           after a chase through the old town.";

    #[test]
    fn server_info_has_correct_name() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn server_has_tools_capability() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn server_has_instructions() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains(env!("CARGO_PKG_NAME")));
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn extract_json(result: &CallToolResult) -> serde_json::Value {
        assert!(!result.is_error.unwrap_or(false));
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("valid JSON")
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = ProjectServer::new();
        let params = Parameters(GetInfoParams {
            format: "text".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = ProjectServer::new();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let json = extract_json(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["min_words"], 5);
        assert!(json["rules"]["quote_styles"].is_array());
    }

    #[test]
    fn normalize_text_tool_works() {
        let server = ProjectServer::new();
        let params = Parameters(NormalizeTextParams {
            text: "Read more\nHe said \"nothing\",then left.".to_string(),
            strip_markdown: false,
        });

        let result = server.normalize_text(params).expect("normalize_text should succeed");
        let json = extract_json(&result);
        assert_eq!(json["text"], "He said then left.");
        assert_eq!(json["words"], 4);
    }

    #[test]
    fn normalize_text_strips_markdown_on_request() {
        let server = ProjectServer::new();
        let params = Parameters(NormalizeTextParams {
            text: "# Heading\n\nSome **bold** words.".to_string(),
            strip_markdown: true,
        });

        let json = extract_json(&server.normalize_text(params).unwrap());
        assert_eq!(json["text"], "Heading Some bold words.");
    }

    #[test]
    fn find_matches_tool_works() {
        let server = ProjectServer::new();
        let params = Parameters(FindMatchesParams {
            candidate: "the quick brown fox jumps over the lazy dog".to_string(),
            reference: "a quick brown fox jumps over the lazy cat".to_string(),
            min_words: None,
            normalize: true,
        });

        let json = extract_json(&server.find_matches(params).unwrap());
        let matches = json.as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["start_word_index"], 1);
        assert_eq!(matches[0]["length_in_words"], 7);
    }

    #[test]
    fn find_matches_respects_min_words() {
        let server = ProjectServer::new();
        let params = Parameters(FindMatchesParams {
            candidate: "one two three four".to_string(),
            reference: "one two three four".to_string(),
            min_words: Some(4),
            normalize: false,
        });

        let json = extract_json(&server.find_matches(params).unwrap());
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[test]
    fn compare_sources_tool_works() {
        let server = ProjectServer::new();
        let params = Parameters(CompareSourcesParams {
            candidate: ARTICLE.to_string(),
            sources: vec![
                Source::new("https://news.example/a", ARTICLE),
                Source::new("blank", "   "),
                Source::new("other", "Nothing in common with the candidate at all."),
            ],
            min_words: None,
            strip_markdown: false,
        });

        let json = extract_json(&server.compare_sources(params).unwrap());
        let sources = json["sources"].as_array().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0]["label"], "https://news.example/a");
        assert_eq!(json["skipped"][0], "blank");
    }

    #[test]
    fn oversize_input_is_rejected() {
        let server = ProjectServer::with_comparator(Comparator::default(), Some(10));
        let params = Parameters(NormalizeTextParams {
            text: "far more than ten bytes of text".to_string(),
            strip_markdown: false,
        });

        assert!(server.normalize_text(params).is_err());
    }
}
