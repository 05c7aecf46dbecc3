//! Declarative table mapping for persisted models.
//!
//! # Responsibility
//! - Describe which column backs which model field, and its SQL type.
//! - Name the sequence that allocates identities for a table.
//!
//! # Invariants
//! - Exactly one column per table is the primary key.
//! - Column names match the model field names.

/// SQL storage class of one mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
}

impl ColumnType {
    /// Returns the SQLite type name used in DDL.
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

/// Mapping of one model field to one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub field: &'static str,
    pub column: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

/// Mapping of one model to one table plus its identity sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub table: &'static str,
    pub sequence: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// Returns the primary key column.
    pub fn primary_key(&self) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|column| column.primary_key)
    }

    /// Returns all columns except the primary key, in declaration order.
    pub fn value_columns(&self) -> impl Iterator<Item = &'static ColumnDef> {
        self.columns.iter().filter(|column| !column.primary_key)
    }

    /// Comma-separated column list in declaration order.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|column| column.column)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Mapping for `model::book::Book`.
pub const BOOK_TABLE: TableDef = TableDef {
    table: "books",
    sequence: "book_seq",
    columns: &[
        ColumnDef {
            field: "id",
            column: "id",
            column_type: ColumnType::Integer,
            nullable: false,
            primary_key: true,
        },
        ColumnDef {
            field: "title",
            column: "title",
            column_type: ColumnType::Text,
            nullable: true,
            primary_key: false,
        },
        ColumnDef {
            field: "description",
            column: "description",
            column_type: ColumnType::Text,
            nullable: true,
            primary_key: false,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::{ColumnType, BOOK_TABLE};

    #[test]
    fn book_table_has_single_integer_primary_key() {
        let pk = BOOK_TABLE.primary_key().expect("books must declare a key");
        assert_eq!(pk.column, "id");
        assert_eq!(pk.column_type, ColumnType::Integer);
        assert!(!pk.nullable);
        assert_eq!(
            BOOK_TABLE
                .columns
                .iter()
                .filter(|column| column.primary_key)
                .count(),
            1
        );
    }

    #[test]
    fn book_columns_match_field_names() {
        for column in BOOK_TABLE.columns {
            assert_eq!(column.field, column.column);
        }
        assert_eq!(BOOK_TABLE.column_list(), "id, title, description");
        let values: Vec<_> = BOOK_TABLE.value_columns().map(|c| c.column).collect();
        assert_eq!(values, ["title", "description"]);
    }
}
