//! Conversation search orchestration.
//!
//! The engine owns a store backend (live or fixture), dispatches each query
//! to the requested entity streams, and keeps failures local: a stream
//! whose query cannot execute comes back empty with a logged diagnostic,
//! and a failed full-text attempt is retried through the substring scan
//! before giving up.

use std::path::Path;

use tracing::{debug, warn};

use crate::model::types::{
    AiResponse, ProjectStats, SearchQuery, SearchResultEnvelope, ToolExecution, ToolQuery,
    UserPrompt,
};
use crate::search::predicate::KeywordPredicate;
use crate::store::{open_store, ConversationStore, StreamFilter, ToolFilter};

pub struct SearchEngine {
    store: Box<dyn ConversationStore>,
}

impl SearchEngine {
    pub fn new(store: Box<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Opens the store at `path`, falling back to the demo fixture when it
    /// is unavailable.
    pub fn open(path: &Path) -> Self {
        Self::new(open_store(path))
    }

    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    /// Runs one search. Each requested stream is computed independently
    /// with its own limit/offset; records are never merged across streams.
    pub fn search(&self, query: &SearchQuery) -> SearchResultEnvelope {
        let predicate = KeywordPredicate::new(&query.keywords, query.logic);
        debug!(
            keywords = ?predicate.keywords(),
            logic = query.logic.as_str(),
            conversation_type = query.conversation_type.as_str(),
            project = query.project.as_deref().unwrap_or(""),
            limit = query.limit,
            "search"
        );

        let mut envelope = SearchResultEnvelope::default();
        if query.conversation_type.includes_user() {
            envelope.user_prompts = self.user_prompts(&predicate, query);
        }
        if query.conversation_type.includes_ai() {
            envelope.ai_responses = self.ai_responses(&predicate, query);
        }
        envelope
    }

    fn user_prompts(&self, predicate: &KeywordPredicate, query: &SearchQuery) -> Vec<UserPrompt> {
        let filter = StreamFilter {
            project: query.project.clone(),
            response_type: None,
            limit: query.limit,
            offset: query.offset,
        };
        match self.store.search_user_prompts(predicate, &filter) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "user prompt search failed");
                Vec::new()
            }
        }
    }

    fn ai_responses(&self, predicate: &KeywordPredicate, query: &SearchQuery) -> Vec<AiResponse> {
        let filter = StreamFilter {
            project: query.project.clone(),
            response_type: query.response_type,
            limit: query.limit,
            offset: query.offset,
        };

        // The index path is opt-in and only worth the join when there are
        // keywords to match. Any failure falls back to the substring scan;
        // the index may lag or be missing entirely.
        if query.full_text && !predicate.is_empty() {
            match self.store.search_ai_responses_fts(predicate, &filter) {
                Ok(rows) => return rows,
                Err(err) => {
                    warn!(error = %err, "full-text search failed, falling back to substring scan");
                }
            }
        }

        match self.store.search_ai_responses(predicate, &filter) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "ai response search failed");
                Vec::new()
            }
        }
    }

    /// Tool-execution search: keyword predicate over input/output/error,
    /// ANDed with the project, tool-name, and success filters.
    pub fn tool_executions(&self, query: &ToolQuery) -> Vec<ToolExecution> {
        let predicate = KeywordPredicate::new(&query.keywords, query.logic);
        let filter = ToolFilter {
            project: query.project.clone(),
            tool_name: query.tool_name.clone(),
            success_only: query.success_only,
            limit: query.limit,
        };
        match self.store.tool_executions(&predicate, &filter) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "tool execution search failed");
                Vec::new()
            }
        }
    }

    pub fn projects(&self) -> Vec<String> {
        match self.store.projects() {
            Ok(projects) => projects,
            Err(err) => {
                warn!(error = %err, "project listing failed");
                Vec::new()
            }
        }
    }

    pub fn project_stats(&self, project: Option<&str>) -> ProjectStats {
        match self.store.project_stats(project) {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, "project stats failed");
                ProjectStats {
                    ai_response_count: 0,
                    session_count: 0,
                    earliest_response: None,
                    latest_response: None,
                }
            }
        }
    }
}
