//! Record, query, and envelope types shared by every backend.
//!
//! Records are fixed-field structs tagged by entity kind, not dynamically
//! keyed maps, so field names cannot drift between the substring and
//! full-text paths. Optional columns stay `Option<T>` and serialize as
//! explicit `null` to keep JSON exports round-trippable.

use serde::{Deserialize, Serialize};

/// A human-authored prompt. Carries no project field; project scoping goes
/// through the owning session (see `sdk_sessions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPrompt {
    pub id: i64,
    pub claude_session_id: String,
    pub prompt_number: i64,
    pub prompt_text: String,
    pub created_at: String,
    pub created_at_epoch: i64,
}

/// An AI-authored response, optionally carrying tool invocation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub id: i64,
    pub claude_session_id: String,
    pub sdk_session_id: Option<String>,
    pub project: String,
    pub prompt_number: i64,
    pub response_text: String,
    pub response_type: ResponseType,
    pub tool_name: Option<String>,
    pub tool_input: Option<String>,
    pub tool_output: Option<String>,
    pub created_at: String,
    pub created_at_epoch: i64,
}

/// Closed set of response kinds as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Assistant,
    ToolResult,
    Error,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Assistant => "assistant",
            ResponseType::ToolResult => "tool_result",
            ResponseType::Error => "error",
        }
    }

    /// Parses the stored string form. Unknown tags map to `Assistant` so a
    /// store written by a newer producer still reads.
    pub fn from_db(s: &str) -> Self {
        match s {
            "tool_result" => ResponseType::ToolResult,
            "error" => ResponseType::Error,
            _ => ResponseType::Assistant,
        }
    }
}

impl std::str::FromStr for ResponseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assistant" => Ok(ResponseType::Assistant),
            "tool_result" => Ok(ResponseType::ToolResult),
            "error" => Ok(ResponseType::Error),
            other => Err(format!("unknown response type: {other}")),
        }
    }
}

/// One tool invocation triggered by an AI response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecution {
    pub id: i64,
    pub ai_response_id: Option<i64>,
    pub claude_session_id: String,
    pub sdk_session_id: Option<String>,
    pub project: String,
    pub prompt_number: i64,
    pub tool_name: String,
    pub tool_input: Option<String>,
    pub tool_output: Option<String>,
    pub tool_duration_ms: Option<i64>,
    pub files_created: Option<String>,
    pub files_modified: Option<String>,
    pub files_read: Option<String>,
    pub files_deleted: Option<String>,
    pub error_message: Option<String>,
    pub success: bool,
    pub created_at: String,
    pub created_at_epoch: i64,
}

/// Aggregate counts for one project (or the whole store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub ai_response_count: i64,
    pub session_count: i64,
    pub earliest_response: Option<String>,
    pub latest_response: Option<String>,
}

/// How multiple keywords combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordLogic {
    /// Every keyword must match.
    #[default]
    And,
    /// At least one keyword must match.
    Or,
}

impl KeywordLogic {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordLogic::And => "AND",
            KeywordLogic::Or => "OR",
        }
    }
}

/// Which conversation streams a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationType {
    User,
    Ai,
    #[default]
    Both,
}

impl ConversationType {
    pub fn includes_user(&self) -> bool {
        matches!(self, ConversationType::User | ConversationType::Both)
    }

    pub fn includes_ai(&self) -> bool {
        matches!(self, ConversationType::Ai | ConversationType::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::User => "user",
            ConversationType::Ai => "ai",
            ConversationType::Both => "both",
        }
    }
}

/// One conversation search request. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keywords: Vec<String>,
    pub logic: KeywordLogic,
    pub conversation_type: ConversationType,
    pub project: Option<String>,
    pub limit: usize,
    pub offset: usize,
    pub response_type: Option<ResponseType>,
    /// Route the AI stream through the full-text index. Falls back to the
    /// substring scan when the index path fails.
    pub full_text: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            logic: KeywordLogic::And,
            conversation_type: ConversationType::Both,
            project: None,
            limit: 50,
            offset: 0,
            response_type: None,
            full_text: false,
        }
    }
}

/// One tool-execution search request.
#[derive(Debug, Clone)]
pub struct ToolQuery {
    pub keywords: Vec<String>,
    pub logic: KeywordLogic,
    pub project: Option<String>,
    pub tool_name: Option<String>,
    pub success_only: bool,
    pub limit: usize,
}

impl Default for ToolQuery {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            logic: KeywordLogic::And,
            project: None,
            tool_name: None,
            success_only: false,
            limit: 50,
        }
    }
}

/// Two named streams, independently paginated, never merged. Callers can
/// always tell which stream a record came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultEnvelope {
    pub user_prompts: Vec<UserPrompt>,
    pub ai_responses: Vec<AiResponse>,
}

impl SearchResultEnvelope {
    pub fn is_empty(&self) -> bool {
        self.user_prompts.is_empty() && self.ai_responses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_type_round_trips_through_serde() {
        for (variant, tag) in [
            (ResponseType::Assistant, "\"assistant\""),
            (ResponseType::ToolResult, "\"tool_result\""),
            (ResponseType::Error, "\"error\""),
        ] {
            assert_eq!(serde_json::to_string(&variant).unwrap(), tag);
            let back: ResponseType = serde_json::from_str(tag).unwrap();
            assert_eq!(back, variant);
        }
    }

    #[test]
    fn envelope_serializes_nulls_explicitly() {
        let envelope = SearchResultEnvelope {
            user_prompts: Vec::new(),
            ai_responses: vec![AiResponse {
                id: 1,
                claude_session_id: "s1".into(),
                sdk_session_id: None,
                project: "demo".into(),
                prompt_number: 1,
                response_text: "hello".into(),
                response_type: ResponseType::Assistant,
                tool_name: None,
                tool_input: None,
                tool_output: None,
                created_at: "2025-12-22T10:30:00Z".into(),
                created_at_epoch: 1_766_399_400_000,
            }],
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["ai_responses"][0]["tool_name"].is_null());
        assert!(json["ai_responses"][0]["sdk_session_id"].is_null());
    }

    #[test]
    fn conversation_type_selector_covers_streams() {
        assert!(ConversationType::Both.includes_user());
        assert!(ConversationType::Both.includes_ai());
        assert!(ConversationType::User.includes_user());
        assert!(!ConversationType::User.includes_ai());
        assert!(!ConversationType::Ai.includes_user());
        assert!(ConversationType::Ai.includes_ai());
    }
}
