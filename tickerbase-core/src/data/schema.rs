use polars::prelude::*;

/// Storage kind of a canonical column, in both polars and DuckDB terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Double,
    BigInt,
    Varchar,
}

impl ColumnKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Date => "DATE",
            ColumnKind::Double => "DOUBLE",
            ColumnKind::BigInt => "BIGINT",
            ColumnKind::Varchar => "VARCHAR",
        }
    }

    pub fn dtype(self) -> DataType {
        match self {
            ColumnKind::Date => DataType::Date,
            ColumnKind::Double => DataType::Float64,
            ColumnKind::BigInt => DataType::Int64,
            ColumnKind::Varchar => DataType::String,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Canonical column order. Inserts are positional, so this order is the table layout.
pub const PRICE_COLUMNS: [ColumnSpec; 8] = [
    ColumnSpec { name: "date", kind: ColumnKind::Date },
    ColumnSpec { name: "open", kind: ColumnKind::Double },
    ColumnSpec { name: "high", kind: ColumnKind::Double },
    ColumnSpec { name: "low", kind: ColumnKind::Double },
    ColumnSpec { name: "close", kind: ColumnKind::Double },
    ColumnSpec { name: "adj_close", kind: ColumnKind::Double },
    ColumnSpec { name: "volume", kind: ColumnKind::BigInt },
    ColumnSpec { name: "ticker", kind: ColumnKind::Varchar },
];

/// Expected schema for normalized price rows
pub struct PriceSchema;

impl PriceSchema {
    /// Get the canonical polars schema
    pub fn schema() -> Schema {
        Schema::from_iter(
            PRICE_COLUMNS
                .iter()
                .map(|c| Field::new(c.name.into(), c.kind.dtype())),
        )
    }

    pub fn column_names() -> Vec<&'static str> {
        PRICE_COLUMNS.iter().map(|c| c.name).collect()
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for the given (already validated) table name.
    pub fn create_table_sql(table: &str) -> String {
        let cols: Vec<String> = PRICE_COLUMNS
            .iter()
            .map(|c| format!("    {} {}", c.name, c.kind.sql_type()))
            .collect();
        format!("CREATE TABLE IF NOT EXISTS {table} (\n{}\n)", cols.join(",\n"))
    }

    /// Validate a normalized DataFrame: canonical columns, canonical order, canonical types.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let expected = Self::schema();
        let actual = df.schema();

        // Check all required columns exist
        for field in expected.iter_fields() {
            if !actual.contains(field.name()) {
                return Err(SchemaError::MissingColumn(field.name().to_string()));
            }
        }

        // Check data types match
        for field in expected.iter_fields() {
            let actual_dtype = actual
                .get(field.name())
                .ok_or_else(|| SchemaError::MissingColumn(field.name().to_string()))?;
            if actual_dtype != field.dtype() {
                return Err(SchemaError::TypeMismatch {
                    column: field.name().to_string(),
                    expected: field.dtype().clone(),
                    actual: actual_dtype.clone(),
                });
            }
        }

        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        if names != Self::column_names() {
            return Err(SchemaError::ColumnOrder(names));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column {column}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },

    #[error("Columns out of canonical order: {0:?}")]
    ColumnOrder(Vec<String>),
}
