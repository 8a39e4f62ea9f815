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

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::schema::TableSchema;

static NULL_CELL: Value = Value::Null;

/// A fully materialized query response, mirroring the JSON payload of
/// BigQuery's `jobs.getQueryResults`.
///
/// `rows` stays `None` when the API omits it for an empty result set; the
/// builders treat that the same as zero rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResults {
    #[serde(default)]
    pub schema: TableSchema,
    #[serde(default, deserialize_with = "skip_null_rows")]
    pub rows: Option<Vec<TableRow>>,
}

/// The API can emit `null` entries in `rows`; those carry no cells and are
/// dropped rather than failing the whole response.
fn skip_null_rows<'de, D>(deserializer: D) -> Result<Option<Vec<TableRow>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Option<Vec<Option<TableRow>>> = Option::deserialize(deserializer)?;
    Ok(rows.map(|rows| rows.into_iter().flatten().collect()))
}

/// One result row; cells align positionally with `schema.fields`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<RowCell>,
}

/// One cell of a row. The API wraps every value in `{"v": ...}` and
/// delivers scalars as strings regardless of the declared column type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowCell {
    #[serde(default)]
    pub v: Value,
}

impl TableRow {
    /// Positional cell access; rows shorter than the schema read as null.
    pub fn cell(&self, idx: usize) -> &Value {
        self.f.get(idx).map_or(&NULL_CELL, |cell| &cell.v)
    }
}

/// Numeric conversion of a loosely-typed cell, with JavaScript `Number`
/// semantics: null and blank strings are zero, unparseable input is NaN,
/// never an error.
pub(crate) fn cell_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(flag) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(num) => num.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

/// Display-string conversion of a cell; null renders as the empty string,
/// never the literal "null".
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_query_results_payload() {
        let results: QueryResults = serde_json::from_value(json!({
            "schema": {
                "fields": [
                    {"name": "ts", "type": "TIMESTAMP"},
                    {"name": "value", "type": "FLOAT64"},
                ]
            },
            "rows": [
                {"f": [{"v": "1700000000"}, {"v": "1.5"}]},
            ]
        }))
        .unwrap();
        assert_eq!(results.schema.fields.len(), 2);
        let rows = results.rows.unwrap();
        assert_eq!(rows[0].cell(1), &json!("1.5"));
    }

    #[test]
    fn omitted_rows_deserialize_as_none() {
        let results: QueryResults =
            serde_json::from_value(json!({"schema": {"fields": []}})).unwrap();
        assert!(results.rows.is_none());
    }

    #[test]
    fn null_row_entries_are_skipped() {
        let results: QueryResults = serde_json::from_value(json!({
            "schema": {"fields": [{"name": "v", "type": "INT64"}]},
            "rows": [null, {"f": [{"v": "1"}]}, null]
        }))
        .unwrap();
        assert_eq!(results.rows.unwrap().len(), 1);
    }

    #[test]
    fn short_row_reads_as_null() {
        let row = TableRow { f: Vec::new() };
        assert!(row.cell(3).is_null());
    }

    #[test]
    fn cell_number_is_permissive() {
        assert_eq!(cell_number(&json!("42")), 42.0);
        assert_eq!(cell_number(&json!(" 1.5 ")), 1.5);
        assert_eq!(cell_number(&Value::Null), 0.0);
        assert_eq!(cell_number(&json!("")), 0.0);
        assert!(cell_number(&json!("not a number")).is_nan());
    }

    #[test]
    fn cell_text_never_prints_null() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!("deploy")), "deploy");
        assert_eq!(cell_text(&json!(7)), "7");
    }
}
