pub mod error;
pub mod model;
pub mod present;
pub mod remote;
pub mod search;
pub mod store;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::model::types::{
    ConversationType, KeywordLogic, ResponseType, SearchQuery, ToolQuery,
};
use crate::present::ExportFormat;
use crate::search::engine::SearchEngine;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "conversation-search",
    version,
    about = "Search stored AI coding-session conversations"
)]
pub struct Cli {
    /// Path to the conversation store (defaults to platform data dir)
    #[arg(long)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search user prompts and AI responses
    Search {
        /// Comma-delimited search keywords
        #[arg(short = 'k', long)]
        keywords: Option<String>,

        /// Restrict results to one project
        #[arg(short = 'p', long)]
        project: Option<String>,

        /// Which conversation streams to search
        #[arg(short = 't', long = "type", value_enum, default_value_t = TypeArg::Both)]
        conversation_type: TypeArg,

        /// How multiple keywords combine
        #[arg(short = 'l', long, value_enum, default_value_t = LogicArg::And)]
        logic: LogicArg,

        /// Per-stream result limit
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Per-stream result offset
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Restrict the AI stream to one response type
        /// (assistant, tool_result, error)
        #[arg(long)]
        response_type: Option<ResponseType>,

        /// Route the AI stream through the full-text index
        #[arg(long)]
        full_text: bool,

        /// Search a remote engine at this base URL instead of the local store
        #[arg(long)]
        url: Option<String>,

        /// Export format (json or markdown)
        #[arg(long)]
        export: Option<String>,

        /// Write output to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Suppress diagnostics, print results only
        #[arg(short = 'q', long)]
        quiet: bool,
    },
    /// Search tool execution records
    Tools {
        /// Comma-delimited search keywords (matched against tool input,
        /// output, and error message)
        #[arg(short = 'k', long)]
        keywords: Option<String>,

        /// Restrict results to one project
        #[arg(short = 'p', long)]
        project: Option<String>,

        /// Restrict results to one tool
        #[arg(long)]
        tool: Option<String>,

        /// Only successful executions
        #[arg(long)]
        success_only: bool,

        /// Result limit
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Export format (json or markdown)
        #[arg(long)]
        export: Option<String>,

        /// Write output to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Suppress diagnostics, print results only
        #[arg(short = 'q', long)]
        quiet: bool,
    },
    /// List projects recorded in the store
    Projects {
        /// Show aggregate stats instead of the plain listing
        #[arg(long)]
        stats: bool,

        /// Project to scope stats to
        project: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum TypeArg {
    User,
    Ai,
    Both,
}

impl From<TypeArg> for ConversationType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::User => ConversationType::User,
            TypeArg::Ai => ConversationType::Ai,
            TypeArg::Both => ConversationType::Both,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogicArg {
    #[value(name = "AND", alias = "and")]
    And,
    #[value(name = "OR", alias = "or")]
    Or,
}

impl From<LogicArg> for KeywordLogic {
    fn from(arg: LogicArg) -> Self {
        match arg {
            LogicArg::And => KeywordLogic::And,
            LogicArg::Or => KeywordLogic::Or,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let db_path = cli.db.clone().unwrap_or_else(default_db_path);

    match cli.command {
        Commands::Search {
            keywords,
            project,
            conversation_type,
            logic,
            limit,
            offset,
            response_type,
            full_text,
            url,
            export,
            output,
            quiet,
        } => {
            let query = SearchQuery {
                keywords: parse_keywords(keywords.as_deref()),
                logic: logic.into(),
                conversation_type: conversation_type.into(),
                project,
                limit,
                offset,
                response_type,
                full_text,
            };
            run_search(&db_path, &query, url.as_deref(), export.as_deref(), output, quiet)
        }
        Commands::Tools {
            keywords,
            project,
            tool,
            success_only,
            limit,
            export,
            output,
            quiet,
        } => {
            let query = ToolQuery {
                keywords: parse_keywords(keywords.as_deref()),
                logic: KeywordLogic::And,
                project,
                tool_name: tool,
                success_only,
                limit,
            };
            run_tools(&db_path, &query, export.as_deref(), output, quiet)
        }
        Commands::Projects { stats, project } => run_projects(&db_path, stats, project.as_deref()),
    }
}

fn run_search(
    db_path: &std::path::Path,
    query: &SearchQuery,
    url: Option<&str>,
    export: Option<&str>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    // Parse the export format before doing any work so an unsupported name
    // fails hard without touching the output file.
    let format = export.map(ExportFormat::from_str).transpose()?;

    let envelope = match url {
        Some(url) => match remote::RemoteClient::new(url) {
            Ok(client) => {
                if !quiet {
                    eprintln!("searching remote engine at {url}");
                }
                client.search(query)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not build remote client");
                Default::default()
            }
        },
        None => {
            let engine = SearchEngine::open(db_path);
            if !quiet {
                eprintln!("searching {}", engine.store_description());
            }
            engine.search(query)
        }
    };

    let content = match format {
        Some(format) => present::envelope_to_string(&envelope, format)?,
        None => present::render_envelope(&envelope),
    };
    present::write_output(&content, output.as_deref())?;
    if !quiet {
        if let Some(path) = &output {
            eprintln!("results written to {}", path.display());
        }
    }
    Ok(())
}

fn run_tools(
    db_path: &std::path::Path,
    query: &ToolQuery,
    export: Option<&str>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let format = export.map(ExportFormat::from_str).transpose()?;

    let engine = SearchEngine::open(db_path);
    if !quiet {
        eprintln!("searching {}", engine.store_description());
    }
    let executions = engine.tool_executions(query);

    let content = match format {
        Some(format) => present::tool_executions_to_string(&executions, format)?,
        None => present::render_tool_executions(&executions),
    };
    present::write_output(&content, output.as_deref())?;
    if !quiet {
        if let Some(path) = &output {
            eprintln!("results written to {}", path.display());
        }
    }
    Ok(())
}

fn run_projects(db_path: &std::path::Path, stats: bool, project: Option<&str>) -> Result<()> {
    let engine = SearchEngine::open(db_path);
    if stats {
        let stats = engine.project_stats(project);
        let scope = project.unwrap_or("all projects");
        println!("{scope}:");
        println!("  AI responses: {}", stats.ai_response_count);
        println!("  Sessions: {}", stats.session_count);
        if let Some(earliest) = stats.earliest_response {
            println!("  Earliest: {earliest}");
        }
        if let Some(latest) = stats.latest_response {
            println!("  Latest: {latest}");
        }
    } else {
        for project in engine.projects() {
            println!("{project}");
        }
    }
    Ok(())
}

/// Splits a comma-delimited keyword list; blanks are dropped.
fn parse_keywords(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

pub fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "conversation-search", "conversation-search")
        .expect("project dirs available")
        .data_dir()
        .join("conversations.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_split_on_commas_and_drop_blanks() {
        assert_eq!(
            parse_keywords(Some("api, error , ,timeout")),
            vec!["api", "error", "timeout"]
        );
        assert!(parse_keywords(Some("  ")).is_empty());
        assert!(parse_keywords(None).is_empty());
    }

    #[test]
    fn cli_parses_the_documented_search_flags() {
        let cli = Cli::try_parse_from([
            "conversation-search",
            "search",
            "-k",
            "api,error",
            "-p",
            "web-app-project",
            "-t",
            "ai",
            "-l",
            "OR",
            "--limit",
            "5",
            "--export",
            "json",
            "-q",
        ])
        .unwrap();
        match cli.command {
            Commands::Search {
                keywords,
                project,
                limit,
                quiet,
                export,
                ..
            } => {
                assert_eq!(keywords.as_deref(), Some("api,error"));
                assert_eq!(project.as_deref(), Some("web-app-project"));
                assert_eq!(limit, 5);
                assert_eq!(export.as_deref(), Some("json"));
                assert!(quiet);
            }
            other => panic!("expected search command, got {other:?}"),
        }
    }
}
