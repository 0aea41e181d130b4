//! Search layer facade.
//!
//! - **[`predicate`]**: pure keyword-predicate construction shared by every
//!   backend (LIKE clauses, FTS5 match expressions, in-memory checks).
//! - **[`engine`]**: the orchestrating search engine — stream dispatch,
//!   project scoping, full-text fallback, result envelope assembly.

pub mod engine;
pub mod predicate;
