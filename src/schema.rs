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

use serde::Deserialize;

use crate::error::ParseError;

/// One column descriptor. Field order in the schema defines the positional
/// alignment of row cells.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// Sub-fields, populated only on RECORD columns.
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Column types rendered as plottable numbers. Exact matches only;
/// anything unrecognized passes through untouched.
pub(crate) fn is_value_type(field_type: &str) -> bool {
    matches!(
        field_type,
        "INT64" | "NUMERIC" | "FLOAT64" | "FLOAT" | "INT" | "INTEGER"
    )
}

pub(crate) fn is_time_type(field_type: &str) -> bool {
    matches!(field_type, "DATE" | "TIMESTAMP" | "DATETIME")
}

/// Column positions the series builder works from: the first time-typed
/// column, the first column named `metric`, and every numeric column in
/// schema order.
#[derive(Debug)]
pub(crate) struct SchemaIndex {
    pub(crate) time: usize,
    pub(crate) metric: Option<usize>,
    pub(crate) values: Vec<usize>,
}

impl SchemaIndex {
    pub(crate) fn scan(schema: &TableSchema) -> Result<Self, ParseError> {
        let mut time = None;
        let mut metric = None;
        let mut values = Vec::new();
        for (idx, field) in schema.fields.iter().enumerate() {
            if time.is_none() && is_time_type(&field.field_type) {
                time = Some(idx);
            }
            if metric.is_none() && field.name == "metric" {
                metric = Some(idx);
            }
            if is_value_type(&field.field_type) {
                values.push(idx);
            }
        }
        let time = time.ok_or(ParseError::MissingTimeColumn)?;
        Ok(Self {
            time,
            metric,
            values,
        })
    }
}

/// Column positions for annotation queries, located by exact name. Only
/// `time` is mandatory, enforced by the annotation builder.
#[derive(Debug, Default)]
pub(crate) struct AnnotationIndex {
    pub(crate) time: Option<usize>,
    pub(crate) timeend: Option<usize>,
    pub(crate) text: Option<usize>,
    pub(crate) tags: Option<usize>,
}

impl AnnotationIndex {
    pub(crate) fn scan(schema: &TableSchema) -> Self {
        let mut index = Self::default();
        for (idx, field) in schema.fields.iter().enumerate() {
            let slot = match field.name.as_str() {
                "time" => &mut index.time,
                "timeend" => &mut index.timeend,
                "text" => &mut index.text,
                "tags" => &mut index.tags,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        index
    }
}

/// Expands RECORD columns into leaf fields with dotted names
/// (`parent.child.grandchild`), recursing through nested records.
///
/// Returns fresh descriptors; the caller's schema is never touched.
pub fn flatten_fields(fields: &[Field]) -> Vec<Field> {
    let mut flat = Vec::new();
    collect_leaf_fields(fields, "", &mut flat);
    flat
}

fn collect_leaf_fields(fields: &[Field], prefix: &str, out: &mut Vec<Field>) {
    for field in fields {
        let name = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };
        if field.field_type == "RECORD" {
            collect_leaf_fields(&field.fields, &name, out);
        } else {
            out.push(Field {
                name,
                field_type: field.field_type.clone(),
                fields: Vec::new(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: &str) -> Field {
        Field {
            name: name.to_string(),
            field_type: field_type.to_string(),
            fields: Vec::new(),
        }
    }

    fn schema(fields: Vec<Field>) -> TableSchema {
        TableSchema { fields }
    }

    #[test]
    fn index_picks_first_time_column_and_all_values() {
        let index = SchemaIndex::scan(&schema(vec![
            field("day", "DATE"),
            field("ts", "TIMESTAMP"),
            field("metric", "STRING"),
            field("requests", "INT64"),
            field("latency", "FLOAT64"),
        ]))
        .unwrap();
        assert_eq!(index.time, 0);
        assert_eq!(index.metric, Some(2));
        assert_eq!(index.values, vec![3, 4]);
    }

    #[test]
    fn index_without_time_column_is_an_error() {
        let err = SchemaIndex::scan(&schema(vec![field("value", "INT64")])).unwrap_err();
        assert_eq!(err, ParseError::MissingTimeColumn);
    }

    #[test]
    fn metric_column_matched_by_exact_name_only() {
        let index = SchemaIndex::scan(&schema(vec![
            field("ts", "DATETIME"),
            field("Metric", "STRING"),
            field("metric_name", "STRING"),
        ]))
        .unwrap();
        assert_eq!(index.metric, None);
    }

    #[test]
    fn annotation_index_locates_named_columns() {
        let index = AnnotationIndex::scan(&schema(vec![
            field("text", "STRING"),
            field("time", "TIMESTAMP"),
            field("tags", "STRING"),
        ]));
        assert_eq!(index.time, Some(1));
        assert_eq!(index.timeend, None);
        assert_eq!(index.text, Some(0));
        assert_eq!(index.tags, Some(2));
    }

    #[test]
    fn flattens_nested_record_to_dotted_leaf() {
        let fields = vec![Field {
            name: "addr".to_string(),
            field_type: "RECORD".to_string(),
            fields: vec![field("city", "STRING")],
        }];
        let flat = flatten_fields(&fields);
        assert_eq!(flat, vec![field("addr.city", "STRING")]);
    }

    #[test]
    fn flattens_two_levels_and_keeps_plain_fields() {
        let fields = vec![
            field("id", "INT64"),
            Field {
                name: "addr".to_string(),
                field_type: "RECORD".to_string(),
                fields: vec![
                    field("city", "STRING"),
                    Field {
                        name: "geo".to_string(),
                        field_type: "RECORD".to_string(),
                        fields: vec![field("lat", "FLOAT64"), field("lon", "FLOAT64")],
                    },
                ],
            },
        ];
        let names: Vec<String> = flatten_fields(&fields)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["id", "addr.city", "addr.geo.lat", "addr.geo.lon"]);
    }
}
