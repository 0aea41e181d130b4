//! Result presentation and export.
//!
//! Two output modes: structured JSON (field-complete, pretty-printed,
//! nulls preserved) and a narrative text/Markdown rendering with one
//! section per record. An unsupported format name is the one hard failure
//! in this crate; everything upstream degrades gracefully instead.

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;

use crate::error::SearchError;
use crate::model::types::{SearchResultEnvelope, ToolExecution};

/// Maximum characters shown on content lines in narrative output.
const CONTENT_PREVIEW_CHARS: usize = 200;

/// Session identifiers are long UUIDs; the narrative view keeps a prefix.
const SESSION_DISPLAY_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(SearchError::InvalidExportFormat(other.to_string())),
        }
    }
}

/// Renders the envelope for a terminal reader.
pub fn render_envelope(envelope: &SearchResultEnvelope) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "Conversation search results");
    let _ = writeln!(out, "{}", "=".repeat(60));

    if !envelope.user_prompts.is_empty() {
        let _ = writeln!(out, "\nUser prompts ({}):", envelope.user_prompts.len());
        let _ = writeln!(out, "{}", "-".repeat(40));
        for (i, prompt) in envelope.user_prompts.iter().enumerate() {
            let _ = writeln!(out, "\n{}. User prompt #{}", i + 1, prompt.id);
            let _ = writeln!(out, "   Session: {}", truncate_chars(&prompt.claude_session_id, SESSION_DISPLAY_CHARS));
            let _ = writeln!(out, "   Time: {}", prompt.created_at);
            let _ = writeln!(out, "   Text: {}", truncate_chars(&prompt.prompt_text, CONTENT_PREVIEW_CHARS));
        }
    }

    if !envelope.ai_responses.is_empty() {
        let _ = writeln!(out, "\nAI responses ({}):", envelope.ai_responses.len());
        let _ = writeln!(out, "{}", "-".repeat(40));
        for (i, response) in envelope.ai_responses.iter().enumerate() {
            let _ = writeln!(out, "\n{}. AI response #{}", i + 1, response.id);
            let _ = writeln!(out, "   Project: {}", response.project);
            let _ = writeln!(out, "   Session: {}", truncate_chars(&response.claude_session_id, SESSION_DISPLAY_CHARS));
            let _ = writeln!(out, "   Time: {}", response.created_at);
            let _ = writeln!(out, "   Type: {}", response.response_type.as_str());
            if let Some(tool) = &response.tool_name {
                let _ = writeln!(out, "   Tool: {tool}");
            }
            let _ = writeln!(out, "   Text: {}", truncate_chars(&response.response_text, CONTENT_PREVIEW_CHARS));
        }
    }

    if envelope.is_empty() {
        let _ = writeln!(out, "\nNo matching conversation records found.");
    }

    out
}

/// Renders tool executions for a terminal reader.
pub fn render_tool_executions(executions: &[ToolExecution]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tool executions ({}):", executions.len());
    let _ = writeln!(out, "{}", "-".repeat(40));
    for (i, exec) in executions.iter().enumerate() {
        let status = if exec.success { "ok" } else { "failed" };
        let _ = writeln!(out, "\n{}. {} [{}] #{}", i + 1, exec.tool_name, status, exec.id);
        let _ = writeln!(out, "   Project: {}", exec.project);
        let _ = writeln!(out, "   Session: {}", truncate_chars(&exec.claude_session_id, SESSION_DISPLAY_CHARS));
        let _ = writeln!(out, "   Time: {}", exec.created_at);
        if let Some(input) = &exec.tool_input {
            let _ = writeln!(out, "   Input: {}", truncate_chars(input, CONTENT_PREVIEW_CHARS));
        }
        if let Some(output) = &exec.tool_output {
            let _ = writeln!(out, "   Output: {}", truncate_chars(output, CONTENT_PREVIEW_CHARS));
        }
        if let Some(error) = &exec.error_message {
            let _ = writeln!(out, "   Error: {}", truncate_chars(error, CONTENT_PREVIEW_CHARS));
        }
    }
    if executions.is_empty() {
        let _ = writeln!(out, "\nNo matching tool executions found.");
    }
    out
}

/// Serializes the envelope in the requested export format.
pub fn envelope_to_string(
    envelope: &SearchResultEnvelope,
    format: ExportFormat,
) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(envelope)?),
        ExportFormat::Markdown => Ok(render_envelope(envelope)),
    }
}

/// Serializes a tool-execution list in the requested export format.
pub fn tool_executions_to_string(
    executions: &[ToolExecution],
    format: ExportFormat,
) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(executions)?),
        ExportFormat::Markdown => Ok(render_tool_executions(executions)),
    }
}

/// Writes rendered content to a file, or to stdout when no path is given.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Cuts `text` to at most `max_chars` characters, appending an ellipsis
/// when anything was dropped. Counts chars, not bytes, so multi-byte
/// content never splits mid-scalar.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{AiResponse, ResponseType, SearchResultEnvelope, UserPrompt};

    fn sample_envelope() -> SearchResultEnvelope {
        SearchResultEnvelope {
            user_prompts: vec![UserPrompt {
                id: 7,
                claude_session_id: "0b8e6c1a-4f2d-47e1-9c35-demo".into(),
                prompt_number: 1,
                prompt_text: "why does the api time out".into(),
                created_at: "2025-12-22T10:29:00Z".into(),
                created_at_epoch: 1,
            }],
            ai_responses: vec![AiResponse {
                id: 9,
                claude_session_id: "0b8e6c1a-4f2d-47e1-9c35-demo".into(),
                sdk_session_id: None,
                project: "web-app-project".into(),
                prompt_number: 1,
                response_text: "the api times out because of connection limits".into(),
                response_type: ResponseType::Assistant,
                tool_name: Some("python".into()),
                tool_input: None,
                tool_output: None,
                created_at: "2025-12-22T10:30:00Z".into(),
                created_at_epoch: 2,
            }],
        }
    }

    #[test]
    fn unknown_format_is_a_hard_error() {
        let err = ExportFormat::from_str("xml").unwrap_err();
        assert!(matches!(err, SearchError::InvalidExportFormat(_)));
    }

    #[test]
    fn json_export_round_trips_field_identically() {
        let envelope = sample_envelope();
        let json = envelope_to_string(&envelope, ExportFormat::Json).unwrap();
        let back: SearchResultEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn narrative_lists_both_streams_with_labels() {
        let text = render_envelope(&sample_envelope());
        assert!(text.contains("User prompts (1):"));
        assert!(text.contains("AI responses (1):"));
        assert!(text.contains("User prompt #7"));
        assert!(text.contains("AI response #9"));
        assert!(text.contains("Tool: python"));
        assert!(!text.contains("No matching"));
    }

    #[test]
    fn empty_envelope_renders_explicit_no_results_line() {
        let text = render_envelope(&SearchResultEnvelope::default());
        assert!(text.contains("No matching conversation records found."));
    }

    #[test]
    fn truncation_is_char_safe_on_multibyte_content() {
        let cjk = "数据库连接超时导致的性能问题".repeat(30);
        let cut = truncate_chars(&cjk, CONTENT_PREVIEW_CHARS);
        assert!(cut.ends_with('…'));
        assert_eq!(cut.chars().count(), CONTENT_PREVIEW_CHARS + 1);

        let short = "short";
        assert_eq!(truncate_chars(short, CONTENT_PREVIEW_CHARS), "short");
    }

    #[test]
    fn session_ids_are_shortened_for_display() {
        let text = render_envelope(&sample_envelope());
        assert!(text.contains("Session: 0b8e6c1a-4f2d-47e1-9…"));
    }
}
