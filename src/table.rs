//! Tabular view over a list of JSON records.

use serde_json::{Map, Value};
use std::fmt;

use crate::error::{ClientError, Result};

/// Rows of JSON values under named columns.
///
/// Columns appear in the order they are first seen across the records. A
/// record that lacks a column holds `null` in that cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Builds a table from a JSON array of objects.
    pub fn from_records(records: Value) -> Result<Self> {
        let records = match records {
            Value::Array(records) => records,
            other => {
                return Err(ClientError::UnexpectedResponse(format!(
                    "expected a list of records, got {}",
                    other
                )));
            }
        };

        let mut objects: Vec<Map<String, Value>> = Vec::with_capacity(records.len());
        for record in records {
            match record {
                Value::Object(map) => objects.push(map),
                other => {
                    return Err(ClientError::UnexpectedResponse(format!(
                        "expected a record object, got {}",
                        other
                    )));
                }
            }
        }

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = objects
            .into_iter()
            .map(|mut object| {
                columns
                    .iter()
                    .map(|c| object.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Projects onto the given columns, in that order.
    ///
    /// Returns `None` if any of them is absent from every record.
    pub fn select(&self, columns: &[&str]) -> Option<Table> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Option<Vec<_>>>()?;

        Some(Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Rows as JSON objects; `null` cells are left out.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .filter(|(_, v)| !v.is_null())
                    .map(|(c, v)| (c.clone(), v.clone()))
                    .collect()
            })
            .collect()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(cell).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let write_line = |f: &mut fmt::Formatter<'_>, values: &[String]| -> fmt::Result {
            let line = values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!("{:<width$}", v, width = w))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())
        };

        write_line(f, self.columns.as_slice())?;
        for row in &cells {
            write_line(f, row.as_slice())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn networks() -> Value {
        json!([
            {"id": "asia", "name": "Asia", "owner": "melle", "created": "2020-01-01"},
            {"id": "lung", "name": "Lungcancer", "owner": "jane", "created": "2020-02-01"}
        ])
    }

    #[test]
    fn test_from_records_column_order_and_missing_cells() {
        let table = Table::from_records(json!([
            {"id": "a", "name": "A"},
            {"id": "b", "owner": "jane"}
        ]))
        .unwrap();

        assert_eq!(table.columns(), &["id", "name", "owner"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "owner"), Some(&Value::Null));
        assert_eq!(table.get(1, "owner"), Some(&json!("jane")));
        assert_eq!(table.get(1, "missing"), None);
        assert_eq!(table.get(5, "id"), None);
    }

    #[test]
    fn test_from_records_rejects_non_list() {
        assert!(Table::from_records(json!({"id": "a"})).is_err());
        assert!(Table::from_records(json!(["a"])).is_err());
    }

    #[test]
    fn test_empty_list() {
        let table = Table::from_records(json!([])).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert!(table.select(&["id"]).is_none());
    }

    #[test]
    fn test_select_projects_in_requested_order() {
        let table = Table::from_records(networks()).unwrap();
        let summary = table.select(&["owner", "id"]).unwrap();

        assert_eq!(summary.columns(), &["owner", "id"]);
        assert_eq!(summary.rows()[1], vec![json!("jane"), json!("lung")]);
    }

    #[test]
    fn test_select_missing_column() {
        let table = Table::from_records(networks()).unwrap();
        assert!(table.select(&["id", "name", "nope"]).is_none());
        assert!(table.has_column("created"));
    }

    #[test]
    fn test_records_skip_null_cells() {
        let table = Table::from_records(json!([{"id": "a"}, {"name": "B"}])).unwrap();
        let records = table.records();
        assert_eq!(records[0].len(), 1);
        assert_eq!(records[1]["name"], "B");
    }

    #[test]
    fn test_display_aligns_columns() {
        let table = Table::from_records(json!([
            {"id": "asia", "name": "Asia"},
            {"id": 12, "name": null}
        ]))
        .unwrap();

        assert_eq!(table.to_string(), "id    name\nasia  Asia\n12\n");
    }
}
