//! Live store over the recorder's SQLite database.
//!
//! Two matching strategies run against the same tables: a `LIKE` substring
//! scan (the authoritative baseline) and an FTS5 index join over
//! `ai_responses_fts` for the AI stream. Both produce the same row shapes
//! and the same `created_at_epoch DESC` ordering, so the engine can swap
//! one for the other without callers noticing.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rusqlite::{Connection, Row};
use tracing::debug;

use crate::error::SearchError;
use crate::model::types::{
    AiResponse, ProjectStats, ResponseType, ToolExecution, UserPrompt,
};
use crate::search::predicate::KeywordPredicate;
use crate::store::{ConversationStore, StreamFilter, ToolFilter};

/// Column list shared by both AI-response backends so the shapes cannot
/// drift apart.
const AI_RESPONSE_COLUMNS: &str = "id, claude_session_id, sdk_session_id, project, \
     prompt_number, response_text, response_type, tool_name, tool_input, \
     tool_output, created_at, created_at_epoch";

const TOOL_EXECUTION_COLUMNS: &str = "id, ai_response_id, claude_session_id, sdk_session_id, \
     project, prompt_number, tool_name, tool_input, tool_output, \
     tool_duration_ms, files_created, files_modified, files_read, \
     files_deleted, error_message, success, created_at, created_at_epoch";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens an existing store. The connection is owned by the returned
    /// value and closed on drop. Fails with `StoreUnavailable` when the
    /// file is missing or the recorder has not created its tables yet.
    pub fn open(path: &Path) -> Result<Self, SearchError> {
        if !path.exists() {
            return Err(SearchError::StoreUnavailable(format!(
                "no store file at {}",
                path.display()
            )));
        }
        let conn = Connection::open(path)
            .map_err(|e| SearchError::StoreUnavailable(e.to_string()))?;
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master \
                 WHERE type = 'table' AND name IN ('ai_responses', 'user_prompts')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| SearchError::StoreUnavailable(e.to_string()))?;
        if tables < 2 {
            return Err(SearchError::StoreUnavailable(format!(
                "store at {} has no conversation tables",
                path.display()
            )));
        }
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn raw(&self) -> &Connection {
        &self.conn
    }

    fn query_ai_rows(
        &self,
        sql: &str,
        params: &[Box<dyn rusqlite::ToSql>],
    ) -> Result<Vec<AiResponse>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(SearchError::QueryExecution)?;
        let rows = stmt
            .query_map(
                rusqlite::params_from_iter(params.iter().map(|b| &**b)),
                ai_response_from_row,
            )
            .map_err(SearchError::QueryExecution)?;
        Ok(rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(SearchError::QueryExecution)?)
    }
}

impl ConversationStore for SqliteStore {
    fn search_user_prompts(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<UserPrompt>> {
        let mut sql = String::from(
            "SELECT id, claude_session_id, prompt_number, prompt_text, \
             created_at, created_at_epoch FROM user_prompts WHERE 1=1",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        // Prompts carry no project column; scope through the owning session.
        if let Some(project) = &filter.project {
            sql.push_str(
                " AND claude_session_id IN \
                 (SELECT claude_session_id FROM sdk_sessions WHERE project = ?)",
            );
            params.push(Box::new(project.clone()));
        }

        if let Some((clause, keyword_params)) = predicate.sql_clause("prompt_text") {
            sql.push_str(" AND ");
            sql.push_str(&clause);
            for p in keyword_params {
                params.push(Box::new(p));
            }
        }

        sql.push_str(" ORDER BY created_at_epoch DESC LIMIT ? OFFSET ?");
        params.push(Box::new(filter.limit as i64));
        params.push(Box::new(filter.offset as i64));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter().map(|b| &**b)),
            user_prompt_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn search_ai_responses(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<AiResponse>> {
        let mut sql = format!("SELECT {AI_RESPONSE_COLUMNS} FROM ai_responses WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(project) = &filter.project {
            sql.push_str(" AND project = ?");
            params.push(Box::new(project.clone()));
        }
        if let Some(response_type) = filter.response_type {
            sql.push_str(" AND response_type = ?");
            params.push(Box::new(response_type.as_str().to_string()));
        }
        if let Some((clause, keyword_params)) = predicate.sql_clause("response_text") {
            sql.push_str(" AND ");
            sql.push_str(&clause);
            for p in keyword_params {
                params.push(Box::new(p));
            }
        }

        sql.push_str(" ORDER BY created_at_epoch DESC LIMIT ? OFFSET ?");
        params.push(Box::new(filter.limit as i64));
        params.push(Box::new(filter.offset as i64));

        self.query_ai_rows(&sql, &params)
    }

    fn search_ai_responses_fts(
        &self,
        predicate: &KeywordPredicate,
        filter: &StreamFilter,
    ) -> Result<Vec<AiResponse>> {
        // Nothing to match against the index; the plain scan already
        // handles the unfiltered case.
        let Some(match_expr) = predicate.fts_expr() else {
            return self.search_ai_responses(predicate, filter);
        };

        let columns = AI_RESPONSE_COLUMNS
            .split(", ")
            .map(|c| format!("ar.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!(
            "SELECT {columns} FROM ai_responses ar \
             JOIN ai_responses_fts fts ON ar.id = fts.rowid \
             WHERE ai_responses_fts MATCH ?"
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(match_expr.clone())];

        if let Some(project) = &filter.project {
            sql.push_str(" AND ar.project = ?");
            params.push(Box::new(project.clone()));
        }
        if let Some(response_type) = filter.response_type {
            sql.push_str(" AND ar.response_type = ?");
            params.push(Box::new(response_type.as_str().to_string()));
        }

        sql.push_str(" ORDER BY ar.created_at_epoch DESC LIMIT ? OFFSET ?");
        params.push(Box::new(filter.limit as i64));
        params.push(Box::new(filter.offset as i64));

        debug!(expr = %match_expr, "fts_search");
        self.query_ai_rows(&sql, &params)
    }

    fn tool_executions(
        &self,
        predicate: &KeywordPredicate,
        filter: &ToolFilter,
    ) -> Result<Vec<ToolExecution>> {
        let mut sql = format!("SELECT {TOOL_EXECUTION_COLUMNS} FROM tool_executions WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(project) = &filter.project {
            sql.push_str(" AND project = ?");
            params.push(Box::new(project.clone()));
        }
        if let Some(tool_name) = &filter.tool_name {
            sql.push_str(" AND tool_name = ?");
            params.push(Box::new(tool_name.clone()));
        }
        if filter.success_only {
            sql.push_str(" AND success = 1");
        }
        if let Some((clause, keyword_params)) =
            predicate.sql_clause_any(&["tool_input", "tool_output", "error_message"])
        {
            sql.push_str(" AND ");
            sql.push_str(&clause);
            for p in keyword_params {
                params.push(Box::new(p));
            }
        }

        sql.push_str(" ORDER BY created_at_epoch DESC LIMIT ?");
        params.push(Box::new(filter.limit as i64));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter().map(|b| &**b)),
            tool_execution_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn projects(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT project FROM ai_responses \
             WHERE project IS NOT NULL ORDER BY project",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn project_stats(&self, project: Option<&str>) -> Result<ProjectStats> {
        let base = "SELECT COUNT(*), COUNT(DISTINCT claude_session_id), \
                    MIN(created_at), MAX(created_at) FROM ai_responses";
        let stats = match project {
            Some(project) => self.conn.query_row(
                &format!("{base} WHERE project = ?"),
                [project],
                project_stats_from_row,
            )?,
            None => self.conn.query_row(base, [], project_stats_from_row)?,
        };
        Ok(stats)
    }

    fn describe(&self) -> String {
        format!("sqlite store at {}", self.path.display())
    }
}

fn project_stats_from_row(row: &Row<'_>) -> rusqlite::Result<ProjectStats> {
    Ok(ProjectStats {
        ai_response_count: row.get(0)?,
        session_count: row.get(1)?,
        earliest_response: row.get(2)?,
        latest_response: row.get(3)?,
    })
}

fn user_prompt_from_row(row: &Row<'_>) -> rusqlite::Result<UserPrompt> {
    Ok(UserPrompt {
        id: row.get(0)?,
        claude_session_id: row.get(1)?,
        prompt_number: row.get(2)?,
        prompt_text: row.get(3)?,
        created_at: row.get(4)?,
        created_at_epoch: row.get(5)?,
    })
}

fn ai_response_from_row(row: &Row<'_>) -> rusqlite::Result<AiResponse> {
    let response_type: String = row.get(6)?;
    Ok(AiResponse {
        id: row.get(0)?,
        claude_session_id: row.get(1)?,
        sdk_session_id: row.get(2)?,
        project: row.get(3)?,
        prompt_number: row.get(4)?,
        response_text: row.get(5)?,
        response_type: ResponseType::from_db(&response_type),
        tool_name: row.get(7)?,
        tool_input: row.get(8)?,
        tool_output: row.get(9)?,
        created_at: row.get(10)?,
        created_at_epoch: row.get(11)?,
    })
}

fn tool_execution_from_row(row: &Row<'_>) -> rusqlite::Result<ToolExecution> {
    Ok(ToolExecution {
        id: row.get(0)?,
        ai_response_id: row.get(1)?,
        claude_session_id: row.get(2)?,
        sdk_session_id: row.get(3)?,
        project: row.get(4)?,
        prompt_number: row.get(5)?,
        tool_name: row.get(6)?,
        tool_input: row.get(7)?,
        tool_output: row.get(8)?,
        tool_duration_ms: row.get(9)?,
        files_created: row.get(10)?,
        files_modified: row.get(11)?,
        files_read: row.get(12)?,
        files_deleted: row.get(13)?,
        error_message: row.get(14)?,
        success: row.get(15)?,
        created_at: row.get(16)?,
        created_at_epoch: row.get(17)?,
    })
}
