//! Table schema registry.
//!
//! Maps a table name to its ordered column list. Built once at startup from
//! the defaults plus any configured overrides, then validated.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use thiserror::Error;

/// Column every schema starts with; update and delete match on it.
pub const ID_COLUMN: &str = "id";

/// Built-in tables of the delivery plan store.
pub const DEFAULT_TABLES: &[(&str, &[&str])] = &[
    ("SKUs", &["id", "name", "month", "forecast"]),
    ("Deliveries", &["id", "date", "sku", "lot", "qty"]),
    ("Plans", &["id", "date", "sku", "qty"]),
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("table name must not be empty")]
    EmptyTableName,

    #[error("table '{0}' has no columns")]
    NoColumns(String),

    #[error("table '{table}' must start with column 'id', found '{found}'")]
    MissingIdColumn { table: String, found: String },

    #[error("table '{0}' has an empty column name")]
    EmptyColumn(String),

    #[error("table '{table}' repeats column '{column}'")]
    DuplicateColumn { table: String, column: String },
}

/// One entry of the registry, as exposed on `/meta/tables`.
#[derive(Debug, Clone, Serialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<String>,
}

/// Table name → ordered columns. Unknown tables resolve to `["id"]`.
#[derive(Debug, Clone)]
pub struct TableSchemas {
    tables: BTreeMap<String, Vec<String>>,
    fallback: Vec<String>,
}

impl Default for TableSchemas {
    fn default() -> Self {
        let tables = DEFAULT_TABLES
            .iter()
            .map(|(name, cols)| {
                (
                    name.to_string(),
                    cols.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect();
        Self {
            tables,
            fallback: vec![ID_COLUMN.to_string()],
        }
    }
}

impl TableSchemas {
    /// Defaults with `overrides` merged on top, validated.
    ///
    /// An override replaces the default schema of the same name; new names
    /// add tables.
    pub fn with_overrides(
        overrides: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, SchemaError> {
        let mut schemas = Self::default();
        schemas.tables.extend(overrides);
        schemas.validate()?;
        Ok(schemas)
    }

    /// Check every schema: non-empty name, `id` first, no empty or repeated
    /// column names.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (table, columns) in &self.tables {
            if table.trim().is_empty() {
                return Err(SchemaError::EmptyTableName);
            }
            let first = columns
                .first()
                .ok_or_else(|| SchemaError::NoColumns(table.clone()))?;
            if first != ID_COLUMN {
                return Err(SchemaError::MissingIdColumn {
                    table: table.clone(),
                    found: first.clone(),
                });
            }
            let mut seen = HashSet::new();
            for column in columns {
                if column.is_empty() {
                    return Err(SchemaError::EmptyColumn(table.clone()));
                }
                if !seen.insert(column.as_str()) {
                    return Err(SchemaError::DuplicateColumn {
                        table: table.clone(),
                        column: column.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Ordered columns for `table`, or the `["id"]` fallback.
    pub fn columns(&self, table: &str) -> &[String] {
        self.tables
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or(self.fallback.as_slice())
    }

    pub fn is_declared(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// All declared tables, sorted by name.
    pub fn tables(&self) -> Vec<TableDef> {
        self.tables
            .iter()
            .map(|(name, columns)| TableDef {
                name: name.clone(),
                columns: columns.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults() {
        let schemas = TableSchemas::default();
        schemas.validate().unwrap();
        assert_eq!(schemas.columns("SKUs"), cols(&["id", "name", "month", "forecast"]));
        assert_eq!(
            schemas.columns("Deliveries"),
            cols(&["id", "date", "sku", "lot", "qty"])
        );
        assert_eq!(schemas.columns("Plans"), cols(&["id", "date", "sku", "qty"]));
    }

    #[test]
    fn unknown_table_falls_back_to_id() {
        let schemas = TableSchemas::default();
        assert_eq!(schemas.columns("Suppliers"), cols(&["id"]));
        assert!(!schemas.is_declared("Suppliers"));
    }

    #[test]
    fn overrides_replace_and_extend() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Plans".to_string(), cols(&["id", "date", "sku", "qty", "note"]));
        overrides.insert("Suppliers".to_string(), cols(&["id", "name"]));
        let schemas = TableSchemas::with_overrides(overrides).unwrap();

        assert_eq!(schemas.columns("Plans").len(), 5);
        assert_eq!(schemas.columns("Suppliers"), cols(&["id", "name"]));
        assert_eq!(schemas.columns("SKUs").len(), 4);
        assert_eq!(schemas.tables().len(), 4);
    }

    #[test]
    fn rejects_schema_without_leading_id() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Bad".to_string(), cols(&["name", "id"]));
        let err = TableSchemas::with_overrides(overrides).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingIdColumn {
                table: "Bad".into(),
                found: "name".into()
            }
        );
    }

    #[test]
    fn rejects_empty_and_duplicate_columns() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Empty".to_string(), Vec::new());
        assert_eq!(
            TableSchemas::with_overrides(overrides).unwrap_err(),
            SchemaError::NoColumns("Empty".into())
        );

        let mut overrides = BTreeMap::new();
        overrides.insert("Dup".to_string(), cols(&["id", "qty", "qty"]));
        assert!(matches!(
            TableSchemas::with_overrides(overrides),
            Err(SchemaError::DuplicateColumn { .. })
        ));

        let mut overrides = BTreeMap::new();
        overrides.insert("Blank".to_string(), cols(&["id", ""]));
        assert!(matches!(
            TableSchemas::with_overrides(overrides),
            Err(SchemaError::EmptyColumn(_))
        ));

        let mut overrides = BTreeMap::new();
        overrides.insert(" ".to_string(), cols(&["id"]));
        assert_eq!(
            TableSchemas::with_overrides(overrides).unwrap_err(),
            SchemaError::EmptyTableName
        );
    }
}
