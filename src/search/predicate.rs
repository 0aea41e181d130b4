//! Keyword predicate construction.
//!
//! A predicate is built once from the caller's keyword set and logic mode,
//! then rendered for whichever backend runs it: a `LIKE` clause for the
//! substring scan, an FTS5 `MATCH` expression for the indexed path, or a
//! direct in-memory check for stores without SQL. All three share one
//! contract: case-insensitive substring containment per keyword, no
//! stemming, no token boundaries, empty keyword set matches everything.

use crate::model::types::KeywordLogic;

#[derive(Debug, Clone, Default)]
pub struct KeywordPredicate {
    keywords: Vec<String>,
    logic: KeywordLogic,
}

impl KeywordPredicate {
    /// Blank and whitespace-only keywords are dropped; an all-blank set
    /// behaves like no keywords at all.
    pub fn new(keywords: &[String], logic: KeywordLogic) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords, logic }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn logic(&self) -> KeywordLogic {
        self.logic
    }

    fn joiner(&self) -> &'static str {
        match self.logic {
            KeywordLogic::And => " AND ",
            KeywordLogic::Or => " OR ",
        }
    }

    /// Renders the predicate as a parenthesized SQL condition over one text
    /// column, one `LIKE` test per keyword. Returns `None` when there is
    /// nothing to filter on.
    pub fn sql_clause(&self, column: &str) -> Option<(String, Vec<String>)> {
        self.sql_clause_any(&[column])
    }

    /// Like [`sql_clause`](Self::sql_clause), but a keyword matches the
    /// record if it appears in any of the given columns. The OR across
    /// columns is per keyword; the logic mode still governs combination
    /// across keywords.
    pub fn sql_clause_any(&self, columns: &[&str]) -> Option<(String, Vec<String>)> {
        if self.keywords.is_empty() || columns.is_empty() {
            return None;
        }
        let mut params = Vec::with_capacity(self.keywords.len() * columns.len());
        let per_keyword: Vec<String> = self
            .keywords
            .iter()
            .map(|keyword| {
                let pattern = format!("%{}%", escape_like(keyword));
                let tests: Vec<String> = columns
                    .iter()
                    .map(|column| {
                        params.push(pattern.clone());
                        format!("{column} LIKE ? ESCAPE '\\'")
                    })
                    .collect();
                if columns.len() == 1 {
                    tests.into_iter().next().unwrap_or_default()
                } else {
                    format!("({})", tests.join(" OR "))
                }
            })
            .collect();
        Some((format!("({})", per_keyword.join(self.joiner())), params))
    }

    /// Renders the predicate as an FTS5 MATCH expression, each keyword a
    /// quoted phrase so index syntax characters stay inert.
    pub fn fts_expr(&self) -> Option<String> {
        if self.keywords.is_empty() {
            return None;
        }
        let phrases: Vec<String> = self
            .keywords
            .iter()
            .map(|keyword| format!("\"{}\"", keyword.replace('"', "\"\"")))
            .collect();
        Some(phrases.join(self.joiner()))
    }

    /// In-memory evaluation over a single text field.
    pub fn matches(&self, text: &str) -> bool {
        self.matches_any(&[Some(text)])
    }

    /// In-memory evaluation where a keyword matches if it appears in any of
    /// the given fields. Missing fields never match.
    pub fn matches_any(&self, fields: &[Option<&str>]) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let lowered: Vec<String> = fields
            .iter()
            .flatten()
            .map(|f| f.to_lowercase())
            .collect();
        let keyword_hit = |keyword: &String| {
            let needle = keyword.to_lowercase();
            lowered.iter().any(|field| field.contains(&needle))
        };
        match self.logic {
            KeywordLogic::And => self.keywords.iter().all(keyword_hit),
            KeywordLogic::Or => self.keywords.iter().any(keyword_hit),
        }
    }
}

/// Escapes `LIKE` pattern metacharacters so keywords match literally.
fn escape_like(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn empty_keyword_set_matches_everything() {
        let pred = KeywordPredicate::new(&[], KeywordLogic::And);
        assert!(pred.is_empty());
        assert!(pred.sql_clause("response_text").is_none());
        assert!(pred.fts_expr().is_none());
        assert!(pred.matches("anything at all"));
        assert!(pred.matches(""));
    }

    #[test]
    fn blank_keywords_are_dropped() {
        let pred = KeywordPredicate::new(&kws(&["  ", "", " api "]), KeywordLogic::Or);
        assert_eq!(pred.keywords(), &["api".to_string()]);
    }

    #[test]
    fn and_mode_requires_every_keyword() {
        let pred = KeywordPredicate::new(&kws(&["API", "error"]), KeywordLogic::And);
        assert!(pred.matches("the api returned an Error code"));
        assert!(!pred.matches("the api returned success"));
        assert!(!pred.matches("an error without the other word"));
    }

    #[test]
    fn or_mode_requires_any_keyword() {
        let pred = KeywordPredicate::new(&kws(&["API", "error"]), KeywordLogic::Or);
        assert!(pred.matches("only an api mention"));
        assert!(pred.matches("only an ERROR mention"));
        assert!(!pred.matches("neither word appears"));
    }

    #[test]
    fn matching_is_substring_inside_larger_words() {
        let pred = KeywordPredicate::new(&kws(&["api"]), KeywordLogic::And);
        assert!(pred.matches("rapid response"));
    }

    #[test]
    fn sql_clause_joins_per_logic_mode() {
        let and_pred = KeywordPredicate::new(&kws(&["a", "b"]), KeywordLogic::And);
        let (clause, params) = and_pred.sql_clause("response_text").unwrap();
        assert_eq!(
            clause,
            "(response_text LIKE ? ESCAPE '\\' AND response_text LIKE ? ESCAPE '\\')"
        );
        assert_eq!(params, vec!["%a%".to_string(), "%b%".to_string()]);

        let or_pred = KeywordPredicate::new(&kws(&["a", "b"]), KeywordLogic::Or);
        let (clause, _) = or_pred.sql_clause("response_text").unwrap();
        assert!(clause.contains(" OR "));
    }

    #[test]
    fn sql_clause_any_ors_columns_within_one_keyword() {
        let pred = KeywordPredicate::new(&kws(&["x", "y"]), KeywordLogic::And);
        let (clause, params) = pred
            .sql_clause_any(&["tool_input", "tool_output", "error_message"])
            .unwrap();
        let per_keyword =
            "(tool_input LIKE ? ESCAPE '\\' OR tool_output LIKE ? ESCAPE '\\' OR error_message LIKE ? ESCAPE '\\')";
        assert_eq!(clause, format!("({per_keyword} AND {per_keyword})"));
        assert_eq!(params, vec!["%x%", "%x%", "%x%", "%y%", "%y%", "%y%"]);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        let pred = KeywordPredicate::new(&kws(&["100%", "under_score"]), KeywordLogic::And);
        let (_, params) = pred.sql_clause("prompt_text").unwrap();
        assert_eq!(params[0], "%100\\%%");
        assert_eq!(params[1], "%under\\_score%");
    }

    #[test]
    fn fts_expr_quotes_phrases_and_doubles_embedded_quotes() {
        let pred = KeywordPredicate::new(&kws(&["api", "time\"out"]), KeywordLogic::Or);
        assert_eq!(pred.fts_expr().unwrap(), "\"api\" OR \"time\"\"out\"");
    }

    #[test]
    fn matches_any_checks_each_field_per_keyword() {
        let pred = KeywordPredicate::new(&kws(&["input", "output"]), KeywordLogic::And);
        assert!(pred.matches_any(&[Some("the input file"), Some("wrote output"), None]));
        assert!(!pred.matches_any(&[Some("the input file"), None, None]));

        let or_pred = KeywordPredicate::new(&kws(&["missing", "output"]), KeywordLogic::Or);
        assert!(or_pred.matches_any(&[None, Some("wrote output"), None]));
    }
}
