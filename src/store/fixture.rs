//! Built-in demo dataset for environments without a recorded store.
//!
//! Implements the same trait as the live store and evaluates the same
//! predicate (via its in-memory matcher), so the two backends cannot drift
//! apart semantically. The full-text path reports the index as unavailable,
//! which exercises the engine's substring fallback for real.

use anyhow::{bail, Result};

use crate::model::types::{
    AiResponse, ProjectStats, ResponseType, ToolExecution, UserPrompt,
};
use crate::search::predicate::KeywordPredicate;
use crate::store::{ConversationStore, StreamFilter, ToolFilter};

pub struct FixtureStore {
    sessions: Vec<(String, String)>,
    user_prompts: Vec<UserPrompt>,
    ai_responses: Vec<AiResponse>,
    tool_executions: Vec<ToolExecution>,
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureStore {
    pub fn new() -> Self {
        let sessions = vec![
            ("demo-session-1".to_string(), "claude-mem-demo".to_string()),
            ("demo-session-2".to_string(), "web-app-project".to_string()),
            ("demo-session-3".to_string(), "data-analysis".to_string()),
        ];

        let user_prompts = vec![
            prompt(
                1,
                "demo-session-1",
                1,
                "Why is the API so slow? The logs are full of timeout errors.",
                "2025-12-22T10:29:00Z",
                1_766_399_340_000,
            ),
            prompt(
                2,
                "demo-session-1",
                2,
                "Add a retry around the flaky database call in the Python worker.",
                "2025-12-22T10:31:00Z",
                1_766_399_460_000,
            ),
            prompt(
                3,
                "demo-session-2",
                1,
                "The profile page re-renders constantly, can you fix it?",
                "2025-12-22T11:14:00Z",
                1_766_402_040_000,
            ),
        ];

        let ai_responses = vec![
            response(
                1,
                "demo-session-1",
                "claude-mem-demo",
                1,
                "Looked into the API performance problem; the error log points \
                 at database connection timeouts.",
                None,
                "2025-12-22T10:30:00Z",
                1_766_399_400_000,
            ),
            response(
                2,
                "demo-session-1",
                "claude-mem-demo",
                2,
                "Reviewed the Python error handling and added a retry \
                 mechanism around the flaky call.",
                Some("python"),
                "2025-12-22T10:32:00Z",
                1_766_399_520_000,
            ),
            response(
                3,
                "demo-session-2",
                "web-app-project",
                1,
                "Optimized the React component render path with memoization \
                 to cut unnecessary re-renders.",
                Some("edit_file"),
                "2025-12-22T11:15:00Z",
                1_766_402_100_000,
            ),
            response(
                4,
                "demo-session-3",
                "data-analysis",
                1,
                "The response-time distribution for the API calls shows \
                 outliers worth a closer look.",
                Some("python"),
                "2025-12-22T14:20:00Z",
                1_766_413_200_000,
            ),
        ];

        let tool_executions = vec![
            ToolExecution {
                id: 1,
                ai_response_id: Some(2),
                claude_session_id: "demo-session-1".into(),
                sdk_session_id: None,
                project: "claude-mem-demo".into(),
                prompt_number: 2,
                tool_name: "python".into(),
                tool_input: Some("import pandas as pd; df = pd.read_csv('error_log.csv')".into()),
                tool_output: Some("read 1000 rows from the error log".into()),
                tool_duration_ms: Some(412),
                files_created: None,
                files_modified: None,
                files_read: Some("[\"error_log.csv\"]".into()),
                files_deleted: None,
                error_message: None,
                success: true,
                created_at: "2025-12-22T10:32:00Z".into(),
                created_at_epoch: 1_766_399_520_000,
            },
            ToolExecution {
                id: 2,
                ai_response_id: Some(3),
                claude_session_id: "demo-session-2".into(),
                sdk_session_id: None,
                project: "web-app-project".into(),
                prompt_number: 1,
                tool_name: "edit_file".into(),
                tool_input: Some("src/components/UserProfile.tsx".into()),
                tool_output: Some("wrapped the component in React.memo".into()),
                tool_duration_ms: Some(88),
                files_created: None,
                files_modified: Some("[\"src/components/UserProfile.tsx\"]".into()),
                files_read: None,
                files_deleted: None,
                error_message: None,
                success: true,
                created_at: "2025-12-22T11:15:00Z".into(),
                created_at_epoch: 1_766_402_100_000,
            },
        ];

        Self {
            sessions,
            user_prompts,
            ai_responses,
            tool_executions,
        }
    }

    fn session_in_project(&self, session_id: &str, project: &str) -> bool {
        self.sessions
            .iter()
            .any(|(sid, proj)| sid == session_id && proj == project)
    }
}

impl ConversationStore for FixtureStore {
    fn search_user_prompts(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<UserPrompt>> {
        let mut rows: Vec<UserPrompt> = self
            .user_prompts
            .iter()
            .filter(|p| match &filter.project {
                Some(project) => self.session_in_project(&p.claude_session_id, project),
                None => true,
            })
            .filter(|p| predicate.matches(&p.prompt_text))
            .cloned()
            .collect();
        rows.sort_by_key(|p| std::cmp::Reverse(p.created_at_epoch));
        Ok(rows
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    fn search_ai_responses(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<AiResponse>> {
        let mut rows: Vec<AiResponse> = self
            .ai_responses
            .iter()
            .filter(|r| match &filter.project {
                Some(project) => &r.project == project,
                None => true,
            })
            .filter(|r| match filter.response_type {
                Some(kind) => r.response_type == kind,
                None => true,
            })
            .filter(|r| predicate.matches(&r.response_text))
            .cloned()
            .collect();
        rows.sort_by_key(|r| std::cmp::Reverse(r.created_at_epoch));
        Ok(rows
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    fn search_ai_responses_fts(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<AiResponse>> {
        if predicate.fts_expr().is_none() {
            return self.search_ai_responses(predicate, filter);
        }
        bail!("full-text index not available for the demo fixture")
    }

    fn tool_executions(
        &self,
        predicate: &KeywordPredicate,
        filter: &ToolFilter,
    ) -> Result<Vec<ToolExecution>> {
        let mut rows: Vec<ToolExecution> = self
            .tool_executions
            .iter()
            .filter(|e| match &filter.project {
                Some(project) => &e.project == project,
                None => true,
            })
            .filter(|e| match &filter.tool_name {
                Some(tool) => &e.tool_name == tool,
                None => true,
            })
            .filter(|e| !filter.success_only || e.success)
            .filter(|e| {
                predicate.matches_any(&[
                    e.tool_input.as_deref(),
                    e.tool_output.as_deref(),
                    e.error_message.as_deref(),
                ])
            })
            .cloned()
            .collect();
        rows.sort_by_key(|e| std::cmp::Reverse(e.created_at_epoch));
        Ok(rows.into_iter().take(filter.limit).collect())
    }

    fn projects(&self) -> Result<Vec<String>> {
        let mut projects: Vec<String> = self
            .ai_responses
            .iter()
            .map(|r| r.project.clone())
            .collect();
        projects.sort();
        projects.dedup();
        Ok(projects)
    }

    fn project_stats(&self, project: Option<&str>) -> Result<ProjectStats> {
        let rows: Vec<&AiResponse> = self
            .ai_responses
            .iter()
            .filter(|r| match project {
                Some(project) => r.project == project,
                None => true,
            })
            .collect();
        let mut sessions: Vec<&str> = rows.iter().map(|r| r.claude_session_id.as_str()).collect();
        sessions.sort();
        sessions.dedup();
        Ok(ProjectStats {
            ai_response_count: rows.len() as i64,
            session_count: sessions.len() as i64,
            earliest_response: rows.iter().map(|r| r.created_at.clone()).min(),
            latest_response: rows.iter().map(|r| r.created_at.clone()).max(),
        })
    }

    fn describe(&self) -> String {
        "built-in demo fixture (no live store found)".to_string()
    }
}

fn prompt(
    id: i64,
    session: &str,
    number: i64,
    text: &str,
    created_at: &str,
    epoch: i64,
) -> UserPrompt {
    UserPrompt {
        id,
        claude_session_id: session.into(),
        prompt_number: number,
        prompt_text: text.into(),
        created_at: created_at.into(),
        created_at_epoch: epoch,
    }
}

#[allow(clippy::too_many_arguments)]
fn response(
    id: i64,
    session: &str,
    project: &str,
    number: i64,
    text: &str,
    tool_name: Option<&str>,
    created_at: &str,
    epoch: i64,
) -> AiResponse {
    AiResponse {
        id,
        claude_session_id: session.into(),
        sdk_session_id: None,
        project: project.into(),
        prompt_number: number,
        response_text: text.into(),
        response_type: ResponseType::Assistant,
        tool_name: tool_name.map(Into::into),
        tool_input: None,
        tool_output: None,
        created_at: created_at.into(),
        created_at_epoch: epoch,
    }
}
