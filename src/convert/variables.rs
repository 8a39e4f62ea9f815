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

use crate::response::QueryResults;

/// One selectable entry for a template-variable query.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VariableLabel {
    pub text: Value,
}

/// Extracts the first cell of every row, uncoerced, as a flat label list.
pub fn to_var(results: &QueryResults) -> Vec<VariableLabel> {
    results
        .rows
        .iter()
        .flatten()
        .map(|row| VariableLabel {
            text: row.cell(0).clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn takes_first_cell_of_every_row_unmodified() {
        let results: QueryResults = serde_json::from_value(json!({
            "schema": {"fields": [
                {"name": "env", "type": "STRING"},
                {"name": "ignored", "type": "STRING"},
            ]},
            "rows": [
                {"f": [{"v": "prod"}, {"v": "x"}]},
                {"f": [{"v": "42"}, {"v": "y"}]},
            ]
        }))
        .unwrap();
        let labels = to_var(&results);
        assert_eq!(
            labels,
            vec![
                VariableLabel { text: json!("prod") },
                VariableLabel { text: json!("42") },
            ]
        );
    }

    #[test]
    fn absent_rows_yield_no_labels() {
        let results: QueryResults =
            serde_json::from_value(json!({"schema": {"fields": []}})).unwrap();
        assert!(to_var(&results).is_empty());
    }
}
