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

mod wildcard;

pub use wildcard::collapse_sharded_tables;

use serde::{Deserialize, Serialize};

use crate::schema::{flatten_fields, Field};

pub(crate) const PARTITIONED_MARKER: &str = "__partitioned";

/// Grafana's `{text, value}` pair, the shape every selection widget takes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResultFormat {
    pub text: String,
    pub value: String,
}

/// One entry of a `projects.list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectItem {
    pub id: String,
}

/// One entry of a `datasets.list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetItem {
    #[serde(rename = "datasetReference")]
    pub dataset_reference: DatasetReference,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetReference {
    #[serde(rename = "datasetId")]
    pub dataset_id: String,
}

/// One entry of a `tables.list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TableItem {
    #[serde(default)]
    pub kind: String,
    #[serde(rename = "tableReference")]
    pub table_reference: TableReference,
    #[serde(rename = "timePartitioning", default)]
    pub time_partitioning: Option<TimePartitioning>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableReference {
    #[serde(rename = "tableId")]
    pub table_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimePartitioning {
    #[serde(default)]
    pub field: Option<String>,
}

pub fn parse_projects(projects: &[ProjectItem]) -> Vec<ResultFormat> {
    projects
        .iter()
        .map(|project| ResultFormat {
            text: project.id.clone(),
            value: project.id.clone(),
        })
        .collect()
}

pub fn parse_datasets(datasets: &[DatasetItem]) -> Vec<ResultFormat> {
    datasets
        .iter()
        .map(|dataset| ResultFormat {
            text: dataset.dataset_reference.dataset_id.clone(),
            value: dataset.dataset_reference.dataset_id.clone(),
        })
        .collect()
}

/// Lists tables for the table picker. Time-partitioned tables get a
/// `__partitioned` marker (plus the partitioning field when declared) so
/// downstream query building can recognize them, and date-sharded families
/// collapse to one placeholder entry.
pub fn parse_tables(tables: &[TableItem]) -> Vec<ResultFormat> {
    let pairs = tables
        .iter()
        .map(|table| {
            let mut id = table.table_reference.table_id.clone();
            if table.kind == "bigquery#table" {
                if let Some(partitioning) = &table.time_partitioning {
                    id.push_str(PARTITIONED_MARKER);
                    if let Some(field) = &partitioning.field {
                        id.push_str("__");
                        id.push_str(field);
                    }
                }
            }
            ResultFormat {
                text: id.clone(),
                value: id,
            }
        })
        .collect();
    collapse_sharded_tables(pairs)
}

/// Flattens RECORD columns into dotted leaf fields and keeps only the
/// requested types; an empty filter keeps everything.
pub fn parse_table_fields(fields: &[Field], filter: &[&str]) -> Vec<ResultFormat> {
    flatten_fields(fields)
        .into_iter()
        .filter(|field| filter.is_empty() || filter.contains(&field.field_type.as_str()))
        .map(|field| ResultFormat {
            text: field.name,
            value: field.field_type,
        })
        .collect()
}
