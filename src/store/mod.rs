//! Store backends.
//!
//! - **[`sqlite`]**: live store over the recorder's SQLite database, with
//!   both the substring scan and the FTS5 index path.
//! - **[`fixture`]**: deterministic in-memory dataset for environments
//!   without a recorded store, behind the same trait.

pub mod fixture;
pub mod sqlite;

use std::path::Path;

use anyhow::Result;
use tracing::warn;

use crate::model::types::{
    AiResponse, ProjectStats, ResponseType, ToolExecution, UserPrompt,
};
use crate::search::predicate::KeywordPredicate;

/// Scoping and pagination applied alongside the keyword predicate on one
/// conversation stream.
#[derive(Debug, Clone, Default)]
pub struct StreamFilter {
    pub project: Option<String>,
    /// AI stream only; ignored for user prompts.
    pub response_type: Option<ResponseType>,
    pub limit: usize,
    pub offset: usize,
}

/// Scoping for tool-execution lookups.
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    pub project: Option<String>,
    pub tool_name: Option<String>,
    pub success_only: bool,
    pub limit: usize,
}

/// One conversation store. Implementations must agree on matching
/// semantics: the predicate decides keyword matches, project scoping is an
/// equality filter (direct for AI responses and tool executions, through
/// the session mapping for user prompts), and every list comes back newest
/// first.
pub trait ConversationStore {
    /// Substring scan over `prompt_text`. There is no full-text path for
    /// user prompts.
    fn search_user_prompts(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<UserPrompt>>;

    /// Substring scan over `response_text`. Authoritative baseline.
    fn search_ai_responses(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<AiResponse>>;

    /// Indexed full-text match over `response_text`. May under-match
    /// relative to the substring scan (index tokenization), must never
    /// over-match or break scoping/ordering. An `Err` here is recoverable:
    /// the engine retries through [`search_ai_responses`](Self::search_ai_responses).
    fn search_ai_responses_fts(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<AiResponse>>;

    /// Tool executions; a keyword matches if it appears in tool input,
    /// tool output, or the error message.
    fn tool_executions(
        &self,
        predicate: &KeywordPredicate,
        filter: &ToolFilter,
    ) -> Result<Vec<ToolExecution>>;

    /// Distinct non-null project labels, sorted.
    fn projects(&self) -> Result<Vec<String>>;

    /// Aggregate response/session counts, optionally scoped to one project.
    fn project_stats(&self, project: Option<&str>) -> Result<ProjectStats>;

    /// Human-readable description for diagnostics.
    fn describe(&self) -> String;
}

/// Opens the store at `path`, degrading to the built-in fixture when the
/// file is missing or lacks the expected tables. Search stays advisory:
/// an unusable store is a diagnostic, not a failure.
pub fn open_store(path: &Path) -> Box<dyn ConversationStore> {
    match sqlite::SqliteStore::open(path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "store unavailable, using demo fixture");
            Box::new(fixture::FixtureStore::new())
        }
    }
}
