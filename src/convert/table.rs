// Copyright 2021 Datafuse Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Serialize;
use serde_json::Value;

use crate::{
    response::{cell_number, QueryResults},
    schema::is_value_type,
};

use super::format_timestamp_millis;

/// A flat display table: one column per schema field, one rendered row per
/// result row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<TableValue>>,
    #[serde(rename = "type")]
    pub table_type: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Column {
    pub text: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

/// A display-ready cell: numeric columns stay numbers, TIMESTAMP renders as
/// text, everything else passes through as it arrived.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TableValue {
    Number(f64),
    Text(String),
    Raw(Value),
}

/// Renders a response as a display table, coercing each cell by its
/// column's declared type. Null and empty cells render as empty strings but
/// are never skipped, so positional alignment holds.
pub fn to_table(results: &QueryResults) -> Table {
    let columns: Vec<Column> = results
        .schema
        .fields
        .iter()
        .map(|field| Column {
            text: field.name.clone(),
            column_type: field.field_type.clone(),
        })
        .collect();

    let mut rows = Vec::new();
    for row in results.rows.iter().flatten() {
        let mut rendered = Vec::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            let raw = row.cell(idx);
            let value = if is_empty_cell(raw) {
                TableValue::Text(String::new())
            } else {
                convert_value(raw, &column.column_type)
            };
            rendered.push(value);
        }
        rows.push(rendered);
    }

    Table {
        columns,
        rows,
        table_type: "table",
    }
}

/// Maps a raw cell to its display value for the declared column type.
/// TIMESTAMP cells arrive as epoch-seconds strings and render as UTC
/// display strings; DATE, DATETIME, TIME, and unknown types need no cast.
fn convert_value(raw: &Value, column_type: &str) -> TableValue {
    if is_value_type(column_type) {
        return TableValue::Number(cell_number(raw));
    }
    if column_type == "TIMESTAMP" {
        let millis = (cell_number(raw) * 1000.0) as i64;
        return TableValue::Text(format_timestamp_millis(millis));
    }
    TableValue::Raw(raw.clone())
}

fn is_empty_cell(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn results(payload: serde_json::Value) -> QueryResults {
        serde_json::from_value(payload).unwrap()
    }

    #[test]
    fn coerces_cells_by_declared_column_type() {
        let table = to_table(&results(json!({
            "schema": {"fields": [
                {"name": "ts", "type": "TIMESTAMP"},
                {"name": "count", "type": "INT64"},
                {"name": "name", "type": "STRING"},
            ]},
            "rows": [
                {"f": [{"v": "1700000000"}, {"v": "42"}, {"v": "api"}]},
            ]
        })));
        assert_eq!(table.table_type, "table");
        assert_eq!(
            table.rows[0],
            vec![
                TableValue::Text("2023-11-14T22:13:20.000Z".to_string()),
                TableValue::Number(42.0),
                TableValue::Raw(json!("api")),
            ]
        );
    }

    #[test]
    fn null_and_empty_cells_render_as_empty_strings() {
        let table = to_table(&results(json!({
            "schema": {"fields": [
                {"name": "count", "type": "INT64"},
                {"name": "name", "type": "STRING"},
            ]},
            "rows": [
                {"f": [{"v": null}, {"v": ""}]},
            ]
        })));
        assert_eq!(
            table.rows[0],
            vec![
                TableValue::Text(String::new()),
                TableValue::Text(String::new()),
            ]
        );
    }

    #[test]
    fn short_rows_keep_positional_alignment() {
        let table = to_table(&results(json!({
            "schema": {"fields": [
                {"name": "a", "type": "STRING"},
                {"name": "b", "type": "STRING"},
            ]},
            "rows": [
                {"f": [{"v": "only"}]},
            ]
        })));
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0][1], TableValue::Text(String::new()));
    }

    #[test]
    fn unknown_column_types_pass_through() {
        let table = to_table(&results(json!({
            "schema": {"fields": [{"name": "blob", "type": "GEOGRAPHY"}]},
            "rows": [{"f": [{"v": "POINT(1 2)"}]}]
        })));
        assert_eq!(table.rows[0][0], TableValue::Raw(json!("POINT(1 2)")));
    }

    #[test]
    fn non_numeric_input_in_numeric_column_is_nan_not_an_error() {
        let table = to_table(&results(json!({
            "schema": {"fields": [{"name": "count", "type": "NUMERIC"}]},
            "rows": [{"f": [{"v": "oops"}]}]
        })));
        match &table.rows[0][0] {
            TableValue::Number(value) => assert!(value.is_nan()),
            other => panic!("unexpected cell: {other:?}"),
        }
    }

    #[test]
    fn absent_rows_still_list_columns() {
        let table = to_table(&results(json!({
            "schema": {"fields": [{"name": "count", "type": "INT64"}]}
        })));
        assert_eq!(table.columns.len(), 1);
        assert!(table.rows.is_empty());
    }
}
