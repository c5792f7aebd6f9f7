//! Validated registry of queryable fields, filters, and display columns.
//!
//! The `SchemaRegistry` is built once from a [`SchemaDocument`] and is
//! read-only afterwards. All consistency checks run in [`SchemaRegistry::load`]
//! so that a bad reference is a startup failure, never a query-time surprise.

use std::collections::HashMap;
use std::path::Path;

use scout_core::enums::{OperatorKind, ValueKind};

use crate::document::{
    DisplayColumn, FieldDescriptor, FilterDescriptor, SchemaDocument, StoreDescriptor,
};
use crate::error::SchemaError;

/// The schema used when no schema file is configured.
pub const DEFAULT_SCHEMA: &str = include_str!("default_schema.toml");

/// Immutable, validated view of the catalog schema.
///
/// Fields, filters, and display columns keep their declaration order; name
/// lookups go through index maps built at load time.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    store: StoreDescriptor,
    fields: Vec<FieldDescriptor>,
    field_index: HashMap<String, usize>,
    filters: Vec<FilterDescriptor>,
    filter_index: HashMap<String, usize>,
    display_columns: Vec<DisplayColumn>,
}

impl SchemaRegistry {
    /// Validate a schema document and build the registry.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if a filter or display column references an
    /// undefined field, two fields share a column with different kinds, a name
    /// is duplicated, an identifier is not plain SQL, a searchable field's
    /// column is not in the text index, or a filter's operator does not fit
    /// its field.
    pub fn load(document: SchemaDocument) -> Result<Self, SchemaError> {
        let SchemaDocument {
            store,
            fields,
            filters,
            display_columns,
        } = document;

        check_identifier(&store.table)?;
        check_identifier(&store.fts_table)?;
        for column in &store.fts_columns {
            check_identifier(column)?;
        }

        let mut field_index = HashMap::with_capacity(fields.len());
        let mut column_kinds: HashMap<&str, ValueKind> = HashMap::new();
        for (idx, field) in fields.iter().enumerate() {
            check_identifier(&field.column)?;
            if field.searchable && !store.fts_columns.contains(&field.column) {
                return Err(SchemaError::NotIndexed {
                    field: field.name.clone(),
                    column: field.column.clone(),
                });
            }
            if field_index.insert(field.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            match column_kinds.get(field.column.as_str()) {
                Some(&first) if first != field.kind => {
                    return Err(SchemaError::ConflictingColumnKinds {
                        column: field.column.clone(),
                        first,
                        second: field.kind,
                    });
                }
                Some(_) => {}
                None => {
                    column_kinds.insert(field.column.as_str(), field.kind);
                }
            }
        }

        let mut filter_index = HashMap::with_capacity(filters.len());
        for (idx, filter) in filters.iter().enumerate() {
            if filter_index.insert(filter.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateFilter(filter.name.clone()));
            }
            let field = field_index
                .get(&filter.field)
                .map(|&i| &fields[i])
                .ok_or_else(|| SchemaError::UnknownFilterField {
                    filter: filter.name.clone(),
                    field: filter.field.clone(),
                })?;
            check_operator(filter, field)?;
        }

        for column in &display_columns {
            if !field_index.contains_key(&column.field) {
                return Err(SchemaError::UnknownDisplayField(column.field.clone()));
            }
        }

        tracing::debug!(
            fields = fields.len(),
            filters = filters.len(),
            display_columns = display_columns.len(),
            table = %store.table,
            "schema registry loaded"
        );

        Ok(Self {
            store,
            fields,
            field_index,
            filters,
            filter_index,
            display_columns,
        })
    }

    /// Parse and validate a TOML schema document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` for malformed TOML, or any error from [`Self::load`].
    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        Self::load(SchemaDocument::from_toml_str(text)?)
    }

    /// Read, parse, and validate a schema file.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Io` if the file cannot be read, or any error from
    /// [`Self::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The built-in schema ([`DEFAULT_SCHEMA`]).
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` only if the embedded document is inconsistent.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_toml_str(DEFAULT_SCHEMA)
    }

    /// Look up a field by name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if no field has this name.
    pub fn field(&self, name: &str) -> Result<&FieldDescriptor, SchemaError> {
        self.field_index
            .get(name)
            .map(|&idx| &self.fields[idx])
            .ok_or_else(|| SchemaError::NotFound {
                kind: "field",
                name: name.to_string(),
            })
    }

    /// Look up a filter by name (enabled or not).
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if no filter has this name.
    pub fn filter(&self, name: &str) -> Result<&FilterDescriptor, SchemaError> {
        self.filter_index
            .get(name)
            .map(|&idx| &self.filters[idx])
            .ok_or_else(|| SchemaError::NotFound {
                kind: "filter",
                name: name.to_string(),
            })
    }

    /// Enabled filters in declaration order.
    pub fn enabled_filters(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.filters.iter().filter(|filter| filter.enabled)
    }

    /// First field declared for a storage column.
    #[must_use]
    pub fn field_for_column(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.column == column)
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    #[must_use]
    pub fn display_columns(&self) -> &[DisplayColumn] {
        &self.display_columns
    }

    #[must_use]
    pub const fn store(&self) -> &StoreDescriptor {
        &self.store
    }

    /// Field names of the display columns, in order.
    #[must_use]
    pub fn display_field_names(&self) -> Vec<&str> {
        self.display_columns
            .iter()
            .map(|column| column.field.as_str())
            .collect()
    }

    /// Rebuild the document this registry was loaded from.
    #[must_use]
    pub fn to_document(&self) -> SchemaDocument {
        SchemaDocument {
            store: self.store.clone(),
            fields: self.fields.clone(),
            filters: self.filters.clone(),
            display_columns: self.display_columns.clone(),
        }
    }
}

fn check_operator(filter: &FilterDescriptor, field: &FieldDescriptor) -> Result<(), SchemaError> {
    if !filter.operator.supports(field.kind) {
        return Err(SchemaError::IncompatibleOperator {
            filter: filter.name.clone(),
            operator: filter.operator,
            field: field.name.clone(),
            kind: field.kind,
        });
    }
    if filter.operator == OperatorKind::FullText && !field.searchable {
        return Err(SchemaError::NotSearchable {
            filter: filter.name.clone(),
            field: field.name.clone(),
        });
    }
    Ok(())
}

/// Table and column names are interpolated into SQL text, so only plain
/// identifiers are accepted.
fn check_identifier(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const BASE_FIELDS: &str = r#"
        [[fields]]
        name = "owner"
        column = "owner"
        kind = "text"

        [[fields]]
        name = "repo"
        column = "repo"
        kind = "text"

        [[fields]]
        name = "title"
        column = "title"
        kind = "text"
        searchable = true

        [[fields]]
        name = "year"
        column = "year"
        kind = "integer"

        [[fields]]
        name = "team_members"
        column = "team_members"
        kind = "array"

        [[fields]]
        name = "libraries"
        column = "libraries"
        kind = "array"
    "#;

    fn with_base(extra: &str) -> String {
        format!("{BASE_FIELDS}\n{extra}")
    }

    #[test]
    fn builtin_schema_is_valid() {
        let reg = SchemaRegistry::builtin().unwrap();
        assert!(reg.field("title").is_ok());
        assert!(reg.filter("keyword").is_ok());
        assert_eq!(reg.store().table, "projects");
    }

    #[test]
    fn enabled_filters_keep_declaration_order() {
        let reg = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[filters]]
            name = "libraries"
            field = "libraries"
            operator = "array_overlap"
            enabled = true

            [[filters]]
            name = "hidden"
            field = "year"
            operator = "range"

            [[filters]]
            name = "keyword"
            field = "title"
            operator = "full_text"
            enabled = true
            "#,
        ))
        .unwrap();

        let names: Vec<&str> = reg.enabled_filters().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["libraries", "keyword"]);
        // Disabled filters remain addressable.
        assert!(reg.filter("hidden").is_ok());
    }

    #[test]
    fn field_lookup_reports_not_found() {
        let reg = SchemaRegistry::from_toml_str(BASE_FIELDS).unwrap();
        let err = reg.field("advisor").unwrap_err();
        assert!(matches!(err, SchemaError::NotFound { kind: "field", .. }));
        assert!(matches!(
            reg.filter("keyword"),
            Err(SchemaError::NotFound { kind: "filter", .. })
        ));
    }

    #[test]
    fn filter_with_undefined_field_fails_load() {
        let err = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[filters]]
            name = "advisor"
            field = "advisor"
            operator = "equality"
            enabled = true
            "#,
        ))
        .unwrap_err();
        assert!(
            matches!(err, SchemaError::UnknownFilterField { ref filter, ref field } if filter == "advisor" && field == "advisor")
        );
    }

    #[test]
    fn disabled_filter_with_undefined_field_also_fails() {
        let err = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[filters]]
            name = "advisor"
            field = "advisor"
            operator = "equality"
            "#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownFilterField { .. }));
    }

    #[test]
    fn display_column_with_undefined_field_fails_load() {
        let err = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[display_columns]]
            field = "advisor"
            "#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownDisplayField(ref f) if f == "advisor"));
    }

    #[test]
    fn shared_column_with_conflicting_kinds_fails_load() {
        let err = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[fields]]
            name = "cohort"
            column = "year"
            kind = "text"
            "#,
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::ConflictingColumnKinds {
                first: ValueKind::Integer,
                second: ValueKind::Text,
                ..
            }
        ));
    }

    #[test]
    fn shared_column_with_same_kind_is_allowed() {
        let reg = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[fields]]
            name = "cohort"
            column = "year"
            kind = "integer"
            "#,
        ))
        .unwrap();
        assert_eq!(reg.field_for_column("year").unwrap().name, "year");
    }

    #[rstest]
    #[case::overlap_on_text("title", "array_overlap")]
    #[case::full_text_on_integer("year", "full_text")]
    #[case::equality_on_array("libraries", "equality")]
    #[case::range_on_array("team_members", "range")]
    fn incompatible_operator_fails_load(#[case] field: &str, #[case] operator: &str) {
        let err = SchemaRegistry::from_toml_str(&with_base(&format!(
            r#"
            [[filters]]
            name = "f"
            field = "{field}"
            operator = "{operator}"
            enabled = true
            "#
        )))
        .unwrap_err();
        assert!(
            matches!(err, SchemaError::IncompatibleOperator { .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn full_text_on_unsearchable_field_fails_load() {
        let err = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[filters]]
            name = "by_owner"
            field = "owner"
            operator = "full_text"
            enabled = true
            "#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::NotSearchable { .. }));
    }

    #[test]
    fn searchable_field_outside_the_text_index_fails_load() {
        let err = SchemaRegistry::from_toml_str(
            r#"
            [[fields]]
            name = "owner"
            column = "owner"
            kind = "text"
            searchable = true
            "#,
        )
        .unwrap_err();
        assert!(
            matches!(&err, SchemaError::NotIndexed { field, column } if field == "owner" && column == "owner"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn declared_index_columns_admit_searchable_fields() {
        let reg = SchemaRegistry::from_toml_str(
            r#"
            [store]
            fts_columns = ["summary"]

            [[fields]]
            name = "summary"
            column = "summary"
            kind = "text"
            searchable = true
            "#,
        )
        .unwrap();
        assert_eq!(reg.store().fts_columns, vec!["summary"]);
    }

    #[rstest]
    #[case::spaces("title; DROP TABLE projects")]
    #[case::leading_digit("1title")]
    #[case::quote("ti\"tle")]
    #[case::empty("")]
    fn non_identifier_column_fails_load(#[case] column: &str) {
        let doc = format!(
            r#"
            [[fields]]
            name = "title"
            column = '{column}'
            kind = "text"
            "#
        );
        let err = SchemaRegistry::from_toml_str(&doc).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidIdentifier(_)));
    }

    #[test]
    fn duplicate_names_fail_load() {
        let err = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[fields]]
            name = "owner"
            column = "owner"
            kind = "text"
            "#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(ref n) if n == "owner"));

        let err = SchemaRegistry::from_toml_str(&with_base(
            r#"
            [[filters]]
            name = "f"
            field = "year"
            operator = "range"

            [[filters]]
            name = "f"
            field = "year"
            operator = "equality"
            "#,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFilter(ref n) if n == "f"));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.toml");
        std::fs::write(&path, BASE_FIELDS).unwrap();
        let reg = SchemaRegistry::from_path(&path).unwrap();
        assert_eq!(reg.fields().len(), 6);

        let missing = SchemaRegistry::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, SchemaError::Io { .. }));
    }

    #[test]
    fn document_roundtrips_through_registry() {
        let reg = SchemaRegistry::builtin().unwrap();
        let text = toml::to_string(&reg.to_document()).unwrap();
        let again = SchemaRegistry::from_toml_str(&text).unwrap();
        assert_eq!(again.to_document(), reg.to_document());
    }
}
