//! Repindex Parser - SQL parsing and table-reference extraction
//!
//! This crate wraps sqlparser-rs. Callers only need the list of tables a
//! defining query reads from; everything else about the query is opaque.

use repindex_common::{Error, IdAndVersion, Result};
use sqlparser::ast::{ObjectName, Query, Statement, Visit, Visitor};
use sqlparser::dialect::MySqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, TokenWithLocation, Tokenizer, Word};
use std::ops::ControlFlow;

/// Parse a SQL string into a list of statements.
///
/// An unquoted pinned reference such as `syn123.4` is read as one identifier.
pub fn parse_sql(sql: &str) -> Result<Vec<Statement>> {
    // The index tables live in MySQL, so defining queries use its dialect
    let dialect = MySqlDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize_with_location()
        .map_err(|e| Error::Parse(e.to_string()))?;
    Parser::new(&dialect)
        .with_tokens_with_locations(join_versioned_names(tokens))
        .parse_statements()
        .map_err(|e| Error::Parse(e.to_string()))
}

/// Merges `syn123` followed directly by the number `.4` into the quoted
/// identifier `` `syn123.4` ``
fn join_versioned_names(tokens: Vec<TokenWithLocation>) -> Vec<TokenWithLocation> {
    let mut joined = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter().peekable();
    while let Some(TokenWithLocation { token, location }) = tokens.next() {
        let token = match token {
            Token::Word(word) if word.quote_style.is_none() && is_unversioned_id(&word.value) => {
                match tokens.peek().and_then(|next| version_suffix(&next.token)) {
                    Some(version) => {
                        tokens.next();
                        Token::Word(Word {
                            value: format!("{}.{}", word.value, version),
                            quote_style: Some('`'),
                            keyword: Keyword::NoKeyword,
                        })
                    }
                    None => Token::Word(word),
                }
            }
            other => other,
        };
        joined.push(TokenWithLocation { token, location });
    }
    joined
}

fn is_unversioned_id(word: &str) -> bool {
    word.parse::<IdAndVersion>()
        .is_ok_and(|id| id.version.is_none())
}

fn version_suffix(token: &Token) -> Option<String> {
    match token {
        Token::Number(number, false) => number
            .strip_prefix('.')
            .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string),
        _ => None,
    }
}

/// Parse a single SQL statement
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let mut statements = parse_sql(sql)?;
    if statements.len() != 1 {
        return Err(Error::Parse(format!(
            "Expected 1 statement, got {}",
            statements.len()
        )));
    }
    statements
        .pop()
        .ok_or_else(|| Error::Parse("Expected 1 statement, got 0".to_string()))
}

/// Distinct tables referenced by a single query, in order of first appearance.
///
/// Names declared by the query's own common table expressions are not table
/// references and are skipped.
pub fn table_references(sql: &str) -> Result<Vec<IdAndVersion>> {
    let statement = parse_statement(sql)?;
    if !matches!(statement, Statement::Query(_)) {
        return Err(Error::Parse(format!(
            "Expected a query, got: {}",
            statement
        )));
    }

    let mut collector = RelationCollector::default();
    if let ControlFlow::Break(err) = statement.visit(&mut collector) {
        return Err(err);
    }

    tracing::trace!(
        references = collector.references.len(),
        "extracted table references"
    );
    Ok(collector.references)
}

#[derive(Default)]
struct RelationCollector {
    /// CTE names visible inside each query being visited, innermost last
    scopes: Vec<Vec<String>>,
    /// CTE bodies not yet entered, with the names visible inside each
    cte_bodies: Vec<(*const Query, Vec<String>)>,
    references: Vec<IdAndVersion>,
}

impl RelationCollector {
    fn is_cte(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|names| names.iter().any(|cte| cte.eq_ignore_ascii_case(name)))
    }
}

impl Visitor for RelationCollector {
    type Break = Error;

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        let mut visible = match self
            .cte_bodies
            .iter()
            .position(|(body, _)| std::ptr::eq(*body, query))
        {
            Some(index) => self.cte_bodies.swap_remove(index).1,
            None => self.scopes.last().cloned().unwrap_or_default(),
        };

        if let Some(with) = &query.with {
            let names: Vec<String> = with
                .cte_tables
                .iter()
                .map(|cte| cte.alias.name.value.clone())
                .collect();
            for (index, cte) in with.cte_tables.iter().enumerate() {
                // A CTE sees only those declared before it unless the clause is recursive
                let declared = if with.recursive {
                    &names[..]
                } else {
                    &names[..index]
                };
                let mut body_scope = visible.clone();
                body_scope.extend_from_slice(declared);
                self.cte_bodies.push((&*cte.query as *const Query, body_scope));
            }
            visible.extend(names);
        }

        self.scopes.push(visible);
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &Query) -> ControlFlow<Self::Break> {
        self.scopes.pop();
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        let parts: Vec<&str> = relation.0.iter().map(|i| i.value.as_str()).collect();

        // `syn123`.`4` quotes the id and version parts separately
        let name = match parts.as_slice() {
            [single] => single.to_string(),
            [id, version] if version.chars().all(|c| c.is_ascii_digit()) => {
                format!("{}.{}", id, version)
            }
            _ => {
                return ControlFlow::Break(Error::InvalidArgument(format!(
                    "Invalid table reference: {}",
                    relation
                )))
            }
        };

        if self.is_cte(&name) {
            return ControlFlow::Continue(());
        }

        match name.parse::<IdAndVersion>() {
            Ok(id) => {
                if !self.references.contains(&id) {
                    self.references.push(id);
                }
                ControlFlow::Continue(())
            }
            Err(err) => ControlFlow::Break(err),
        }
    }
}
