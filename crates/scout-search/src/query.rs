//! Filter input → parameterized SQL.
//!
//! [`QueryBuilder::compile`] validates a [`FilterInput`] against the schema
//! registry and produces a [`CompiledQuery`]: select columns, an AND of
//! predicates, positional parameters, and an ordering. User values only ever
//! travel as parameters; table and column names come from the registry, which
//! admits plain identifiers only.
//!
//! Operator mapping (`SQLite` / FTS5):
//!
//! | operator        | predicate                                                        |
//! |-----------------|------------------------------------------------------------------|
//! | `equality`      | `t.col = ?1`                                                     |
//! | `array_overlap` | `EXISTS (SELECT 1 FROM json_each(t.col) WHERE json_each.value IN (?1, ?2))` |
//! | `full_text`     | `fts MATCH ?1` with `col : ("term" AND "term")`, ranked by `bm25` |
//! | `range`         | `t.col >= ?1`, `t.col <= ?2` (each bound optional)               |

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use scout_core::enums::{OperatorKind, ValueKind};
use scout_core::identity::IDENTITY_COLUMNS;
use scout_schema::{FieldDescriptor, FilterDescriptor, SchemaRegistry};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A value supplied for one filter.
///
/// Deserializes from JSON as `null`, a string, a list of strings, or an
/// object with optional `from` / `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Empty,
    Text(String),
    List(Vec<String>),
    Range {
        from: Option<String>,
        to: Option<String>,
    },
}

impl FilterValue {
    /// Range with both bounds set.
    #[must_use]
    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Range {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Whether the value carries nothing to filter on. Empty values never
    /// produce a predicate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.iter().all(|item| item.trim().is_empty()),
            Self::Range { from, to } => is_blank(from.as_deref()) && is_blank(to.as_deref()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Filter name → value for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterInput(BTreeMap<String, FilterValue>);

impl FilterInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FilterValue)> for FilterInput {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Compiled form
// ---------------------------------------------------------------------------

/// A bound parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
}

/// One selected storage column and the field it was requested as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    pub field: String,
    pub column: String,
    pub kind: ValueKind,
}

/// A single condition. Placeholder numbers are 1-based positions in
/// [`CompiledQuery::parameters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equality {
        filter: String,
        column: String,
        param: usize,
    },
    ArrayOverlap {
        filter: String,
        column: String,
        params: Vec<usize>,
    },
    FullText {
        filter: String,
        column: String,
        param: usize,
    },
    Range {
        filter: String,
        column: String,
        from: Option<usize>,
        to: Option<usize>,
    },
}

impl Predicate {
    #[must_use]
    pub const fn operator(&self) -> OperatorKind {
        match self {
            Self::Equality { .. } => OperatorKind::Equality,
            Self::ArrayOverlap { .. } => OperatorKind::ArrayOverlap,
            Self::FullText { .. } => OperatorKind::FullText,
            Self::Range { .. } => OperatorKind::Range,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        match self {
            Self::Equality { filter, .. }
            | Self::ArrayOverlap { filter, .. }
            | Self::FullText { filter, .. }
            | Self::Range { filter, .. } => filter,
        }
    }

    fn render(&self, table: &str, fts_table: &str) -> String {
        match self {
            Self::Equality { column, param, .. } => format!("{table}.{column} = ?{param}"),
            Self::ArrayOverlap { column, params, .. } => {
                let placeholders: Vec<String> = params.iter().map(|p| format!("?{p}")).collect();
                format!(
                    "EXISTS (SELECT 1 FROM json_each({table}.{column}) WHERE json_each.value IN ({}))",
                    placeholders.join(", ")
                )
            }
            Self::FullText { param, .. } => format!("{fts_table} MATCH ?{param}"),
            Self::Range {
                column, from, to, ..
            } => {
                let mut bounds = Vec::with_capacity(2);
                if let Some(p) = from {
                    bounds.push(format!("{table}.{column} >= ?{p}"));
                }
                if let Some(p) = to {
                    bounds.push(format!("{table}.{column} <= ?{p}"));
                }
                bounds.join(" AND ")
            }
        }
    }
}

/// Conjunction of predicates. Empty means no `WHERE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    pub predicates: Vec<Predicate>,
}

impl WhereClause {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    fn render(&self, table: &str, fts_table: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .predicates
            .iter()
            .map(|p| p.render(table, fts_table))
            .collect();
        Some(format!("WHERE {}", parts.join(" AND ")))
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderClause {
    /// `owner, repo` ascending.
    Identity,
    /// Relevance descending, identity breaking ties.
    Rank,
}

/// The FTS table join that a full-text filter activates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTextJoin {
    pub fts_table: String,
    pub filter: String,
    pub column: String,
}

/// A validated, parameterized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub table: String,
    pub select: Vec<SelectColumn>,
    pub where_clause: WhereClause,
    pub parameters: Vec<SqlValue>,
    pub order: OrderClause,
    pub full_text: Option<FullTextJoin>,
}

impl CompiledQuery {
    /// Placeholder number reserved for the row limit.
    #[must_use]
    pub fn limit_placeholder(&self) -> usize {
        self.parameters.len() + 1
    }

    #[must_use]
    pub const fn has_full_text(&self) -> bool {
        self.full_text.is_some()
    }

    /// Render the statement. The trailing `LIMIT` placeholder is
    /// [`Self::limit_placeholder`].
    #[must_use]
    pub fn sql(&self) -> String {
        let table = self.table.as_str();
        let mut columns: Vec<String> = self
            .select
            .iter()
            .map(|c| format!("{table}.{}", c.column))
            .collect();
        if let Some(join) = &self.full_text {
            columns.push(format!("-bm25({}) AS rank", join.fts_table));
        }

        let mut sql = format!("SELECT {} FROM {table}", columns.join(", "));
        let fts_table = self
            .full_text
            .as_ref()
            .map_or("", |join| join.fts_table.as_str());
        if self.full_text.is_some() {
            sql.push_str(&format!(
                " JOIN {fts_table} ON {fts_table}.rowid = {table}.rowid"
            ));
        }
        if let Some(where_sql) = self.where_clause.render(table, fts_table) {
            sql.push(' ');
            sql.push_str(&where_sql);
        }

        let [owner, repo] = IDENTITY_COLUMNS;
        match self.order {
            OrderClause::Identity => {
                sql.push_str(&format!(" ORDER BY {table}.{owner} ASC, {table}.{repo} ASC"));
            }
            OrderClause::Rank => {
                sql.push_str(&format!(
                    " ORDER BY rank DESC, {table}.{owner} ASC, {table}.{repo} ASC"
                ));
            }
        }
        sql.push_str(&format!(" LIMIT ?{}", self.limit_placeholder()));
        sql
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Compiles filter inputs against a schema registry. Pure and synchronous.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> QueryBuilder<'a> {
    #[must_use]
    pub const fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Compile `input` into a query selecting `fields`.
    ///
    /// An empty `fields` selects the schema's display columns. The identity
    /// columns are always selected first.
    ///
    /// # Errors
    ///
    /// - `UnknownField` for a requested field the schema does not define
    /// - `UnknownFilter` for an input naming an undefined or disabled filter
    /// - `ConflictingFullTextFilters` when two full-text filters carry values
    /// - `InvalidFilterValue` when a value does not fit its filter
    pub fn compile(
        &self,
        input: &FilterInput,
        fields: &[&str],
    ) -> Result<CompiledQuery, QueryError> {
        let select = self.resolve_select(fields)?;

        for name in input.names() {
            match self.registry.filter(name) {
                Ok(filter) if filter.enabled => {}
                _ => return Err(QueryError::UnknownFilter(name.to_string())),
            }
        }

        let store = self.registry.store();
        let mut state = Compilation::default();
        for filter in self.registry.enabled_filters() {
            let Some(value) = input.get(&filter.name) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let field = self
                .registry
                .field(&filter.field)
                .map_err(|_| QueryError::UnknownField(filter.field.clone()))?;

            match filter.operator {
                OperatorKind::Equality => state.equality(filter, field, value)?,
                OperatorKind::ArrayOverlap => state.array_overlap(filter, field, value)?,
                OperatorKind::FullText => {
                    state.full_text(filter, field, value, &store.fts_table)?;
                }
                OperatorKind::Range => state.range(filter, field, value)?,
            }
        }

        let order = if state.full_text.is_some() {
            OrderClause::Rank
        } else {
            OrderClause::Identity
        };

        tracing::debug!(
            predicates = state.predicates.len(),
            parameters = state.parameters.len(),
            columns = select.len(),
            full_text = state.full_text.is_some(),
            "compiled search query"
        );

        Ok(CompiledQuery {
            table: store.table.clone(),
            select,
            where_clause: WhereClause {
                predicates: state.predicates,
            },
            parameters: state.parameters,
            order,
            full_text: state.full_text,
        })
    }

    fn resolve_select(&self, fields: &[&str]) -> Result<Vec<SelectColumn>, QueryError> {
        let mut select = Vec::new();
        let mut seen = HashSet::new();

        for column in IDENTITY_COLUMNS {
            let (field, kind) = self
                .registry
                .field_for_column(column)
                .map_or_else(|| (column.to_string(), ValueKind::Text), |f| (f.name.clone(), f.kind));
            seen.insert(column.to_string());
            select.push(SelectColumn {
                field,
                column: column.to_string(),
                kind,
            });
        }

        let requested = if fields.is_empty() {
            self.registry.display_field_names()
        } else {
            fields.to_vec()
        };
        for name in requested {
            let field = self
                .registry
                .field(name)
                .map_err(|_| QueryError::UnknownField(name.to_string()))?;
            if seen.insert(field.column.clone()) {
                select.push(SelectColumn {
                    field: field.name.clone(),
                    column: field.column.clone(),
                    kind: field.kind,
                });
            }
        }
        Ok(select)
    }
}

/// Mutable state while walking the enabled filters.
#[derive(Default)]
struct Compilation {
    predicates: Vec<Predicate>,
    parameters: Vec<SqlValue>,
    full_text: Option<FullTextJoin>,
}

impl Compilation {
    fn bind(&mut self, value: SqlValue) -> usize {
        self.parameters.push(value);
        self.parameters.len()
    }

    fn equality(
        &mut self,
        filter: &FilterDescriptor,
        field: &FieldDescriptor,
        value: &FilterValue,
    ) -> Result<(), QueryError> {
        let raw = single_text(filter, value)?;
        let param = self.bind(coerce(filter, field, &raw, Edge::Start)?);
        self.predicates.push(Predicate::Equality {
            filter: filter.name.clone(),
            column: field.column.clone(),
            param,
        });
        Ok(())
    }

    fn array_overlap(
        &mut self,
        filter: &FilterDescriptor,
        field: &FieldDescriptor,
        value: &FilterValue,
    ) -> Result<(), QueryError> {
        let items = list_items(filter, value)?;
        if items.is_empty() {
            return Ok(());
        }
        let params = items
            .into_iter()
            .map(|item| self.bind(SqlValue::Text(item)))
            .collect();
        self.predicates.push(Predicate::ArrayOverlap {
            filter: filter.name.clone(),
            column: field.column.clone(),
            params,
        });
        Ok(())
    }

    fn full_text(
        &mut self,
        filter: &FilterDescriptor,
        field: &FieldDescriptor,
        value: &FilterValue,
        fts_table: &str,
    ) -> Result<(), QueryError> {
        if let Some(active) = &self.full_text {
            return Err(QueryError::ConflictingFullTextFilters {
                first: active.filter.clone(),
                second: filter.name.clone(),
            });
        }
        let FilterValue::Text(keyword) = value else {
            return Err(invalid(filter, "full-text filters take a single keyword"));
        };
        let expression = fts_expression(&field.column, keyword)
            .ok_or_else(|| invalid(filter, "keyword contains no searchable terms"))?;

        let param = self.bind(SqlValue::Text(expression));
        self.predicates.push(Predicate::FullText {
            filter: filter.name.clone(),
            column: field.column.clone(),
            param,
        });
        self.full_text = Some(FullTextJoin {
            fts_table: fts_table.to_string(),
            filter: filter.name.clone(),
            column: field.column.clone(),
        });
        Ok(())
    }

    fn range(
        &mut self,
        filter: &FilterDescriptor,
        field: &FieldDescriptor,
        value: &FilterValue,
    ) -> Result<(), QueryError> {
        let FilterValue::Range { from, to } = value else {
            return Err(invalid(filter, "range filters take a from/to pair"));
        };
        let mut bound = |raw: Option<&str>, edge: Edge| -> Result<Option<usize>, QueryError> {
            match raw.map(str::trim).filter(|v| !v.is_empty()) {
                Some(v) => Ok(Some(self.bind(coerce(filter, field, v, edge)?))),
                None => Ok(None),
            }
        };
        let from = bound(from.as_deref(), Edge::Start)?;
        let to = bound(to.as_deref(), Edge::End)?;
        self.predicates.push(Predicate::Range {
            filter: filter.name.clone(),
            column: field.column.clone(),
            from,
            to,
        });
        Ok(())
    }
}

fn invalid(filter: &FilterDescriptor, reason: impl Into<String>) -> QueryError {
    QueryError::InvalidFilterValue {
        filter: filter.name.clone(),
        reason: reason.into(),
    }
}

fn single_text(filter: &FilterDescriptor, value: &FilterValue) -> Result<String, QueryError> {
    match value {
        FilterValue::Text(text) => Ok(text.trim().to_string()),
        FilterValue::List(items) => {
            let mut present = items.iter().map(|i| i.trim()).filter(|i| !i.is_empty());
            match (present.next(), present.next()) {
                (Some(only), None) => Ok(only.to_string()),
                _ => Err(invalid(filter, "expected a single value")),
            }
        }
        FilterValue::Range { .. } => Err(invalid(filter, "expected a single value, got a range")),
        FilterValue::Empty => Err(invalid(filter, "expected a value")),
    }
}

/// Scalar text is split on commas.
fn list_items(filter: &FilterDescriptor, value: &FilterValue) -> Result<Vec<String>, QueryError> {
    let raw: Vec<&str> = match value {
        FilterValue::Text(text) => text.split(',').collect(),
        FilterValue::List(items) => items.iter().map(String::as_str).collect(),
        FilterValue::Range { .. } => {
            return Err(invalid(filter, "expected a list, got a range"));
        }
        FilterValue::Empty => Vec::new(),
    };
    let mut seen = HashSet::new();
    Ok(raw
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty() && seen.insert(*item))
        .map(str::to_string)
        .collect())
}

/// Which end of a day a bare date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

fn coerce(
    filter: &FilterDescriptor,
    field: &FieldDescriptor,
    raw: &str,
    edge: Edge,
) -> Result<SqlValue, QueryError> {
    match field.kind {
        ValueKind::Integer => raw
            .parse::<i64>()
            .map(SqlValue::Integer)
            .map_err(|e| invalid(filter, format!("'{raw}' is not an integer: {e}"))),
        ValueKind::Timestamp => normalize_timestamp(raw, edge)
            .map(SqlValue::Text)
            .ok_or_else(|| invalid(filter, format!("'{raw}' is not a date or RFC 3339 timestamp"))),
        ValueKind::Text | ValueKind::Array => Ok(SqlValue::Text(raw.to_string())),
    }
}

/// Stored timestamps are UTC RFC 3339, so bounds are normalized to the same
/// shape. A bare date means midnight UTC as a lower bound and the last
/// nanosecond of that day as an upper bound.
fn normalize_timestamp(raw: &str, edge: Edge) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).to_rfc3339());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| match edge {
            Edge::Start => date.and_hms_opt(0, 0, 0),
            Edge::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
        })
        .map(|naive| naive.and_utc().to_rfc3339())
}

// ---------------------------------------------------------------------------
// Full-text expressions
// ---------------------------------------------------------------------------

/// Split into lowercase alphanumeric terms.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// FTS5 match expression scoped to `column`.
///
/// Terms are AND-combined; a keyword wrapped in double quotes becomes one
/// phrase. Returns `None` when the keyword has no terms.
#[must_use]
pub fn fts_expression(column: &str, keyword: &str) -> Option<String> {
    let trimmed = keyword.trim();
    let phrase = trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"');
    let terms = tokenize(trimmed);
    if terms.is_empty() {
        return None;
    }
    if phrase {
        return Some(format!("{column} : \"{}\"", terms.join(" ")));
    }
    let quoted: Vec<String> = terms.iter().map(|t| format!("\"{t}\"")).collect();
    Some(format!("{column} : ({})", quoted.join(" AND ")))
}
