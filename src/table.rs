//! Fixed-column tables built from normalized records, ready for bulk load.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AssembleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    BigInt,
    Double,
    Text,
}

impl SqlType {
    pub fn ddl(self) -> &'static str {
        match self {
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE PRECISION",
            SqlType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
}

impl Column {
    pub const fn int(name: &'static str) -> Self {
        Self { name, sql_type: SqlType::BigInt }
    }

    pub const fn float(name: &'static str) -> Self {
        Self { name, sql_type: SqlType::Double }
    }

    pub const fn text(name: &'static str) -> Self {
        Self { name, sql_type: SqlType::Text }
    }
}

/// A normalized output row. The serialized field names are looked up by
/// column name, so `COLUMNS` fixes both the selection and the order.
pub trait Record: Serialize {
    const TABLE: &'static str;
    const COLUMNS: &'static [Column];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn assemble<R: Record>(records: &[R]) -> Result<Self, AssembleError> {
        let objects = records
            .iter()
            .map(|record| to_object::<R>(record))
            .collect::<Result<Vec<_>, _>>()?;

        if !objects.is_empty() {
            for column in R::COLUMNS {
                if !objects.iter().any(|object| object.contains_key(column.name)) {
                    return Err(AssembleError::MissingColumn {
                        table: R::TABLE,
                        column: column.name,
                    });
                }
            }
        }

        let rows = objects
            .into_iter()
            .map(|mut object| {
                R::COLUMNS
                    .iter()
                    .map(|column| object.remove(column.name).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self {
            name: R::TABLE,
            columns: R::COLUMNS,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Values of one column, top to bottom. `None` if the table has no such column.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c.name == name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }
}

fn to_object<R: Record>(record: &R) -> Result<Map<String, Value>, AssembleError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(AssembleError::NotAnObject {
            table: R::TABLE,
            reason: format!("serialized as {other}"),
        }),
        Err(e) => Err(AssembleError::NotAnObject {
            table: R::TABLE,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        b: Option<i64>,
        a: &'static str,
    }

    impl Record for Row {
        const TABLE: &'static str = "rows";
        const COLUMNS: &'static [Column] = &[Column::text("a"), Column::int("b")];
    }

    #[derive(Serialize)]
    struct Misnamed {
        a: i64,
    }

    impl Record for Misnamed {
        const TABLE: &'static str = "misnamed";
        const COLUMNS: &'static [Column] = &[Column::int("a"), Column::int("z")];
    }

    #[test]
    fn columns_follow_declared_order() {
        let rows = [Row { b: Some(2), a: "x" }, Row { b: None, a: "y" }];
        let table = Table::assemble(&rows).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.rows[0], vec![Value::from("x"), Value::from(2)]);
        assert_eq!(table.rows[1], vec![Value::from("y"), Value::Null]);
    }

    #[test]
    fn unknown_column_is_a_configuration_error() {
        let err = Table::assemble(&[Misnamed { a: 1 }]).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::MissingColumn { table: "misnamed", column: "z" }
        ));
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = Table::assemble::<Misnamed>(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 2);
    }

    #[test]
    fn column_lookup() {
        let table = Table::assemble(&[Row { b: Some(5), a: "x" }]).unwrap();
        assert_eq!(table.column("b"), Some(vec![&Value::from(5)]));
        assert_eq!(table.column("c"), None);
    }
}
