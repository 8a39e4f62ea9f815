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

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::{
    error::ParseError,
    response::{cell_number, cell_text, QueryResults},
    schema::SchemaIndex,
};

/// One named series in Grafana's time-series frame format. `ref_id` carries
/// the metric value (or the value column name) the series was built from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeSeries {
    pub target: String,
    pub datapoints: Vec<DataPoint>,
    #[serde(rename = "refId")]
    pub ref_id: String,
}

/// A `[value, epoch-millis]` pair; a `None` value keeps the gap visible in
/// the panel instead of dropping the sample.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DataPoint(pub Option<f64>, pub i64);

/// Groups rows into named series buckets.
///
/// Every row contributes one point per numeric column. The bucket label is
/// the metric value joined with the column name, except in the common
/// single-value-column case where the metric value stands alone; without a
/// `metric` column the column name itself is the label. Buckets keep
/// first-seen order and points keep row order.
pub fn to_time_series(results: &QueryResults) -> Result<Vec<TimeSeries>, ParseError> {
    let index = SchemaIndex::scan(&results.schema)?;
    let fields = &results.schema.fields;
    let mut buckets: IndexMap<String, TimeSeries> = IndexMap::new();
    for row in results.rows.iter().flatten() {
        for &value_idx in &index.values {
            let epoch = (cell_number(row.cell(index.time)) * 1000.0) as i64;
            let column_name = &fields[value_idx].name;
            let (target, metric) = match index.metric {
                Some(metric_idx) => {
                    let metric = cell_text(row.cell(metric_idx));
                    let target = if index.values.len() == 1 {
                        metric.clone()
                    } else {
                        format!("{metric} {column_name}")
                    };
                    (target, metric)
                }
                None => (column_name.clone(), column_name.clone()),
            };
            let raw = row.cell(value_idx);
            let value = if raw.is_null() {
                None
            } else {
                Some(cell_number(raw))
            };
            let bucket = buckets.entry(target).or_insert_with_key(|key| TimeSeries {
                target: key.clone(),
                datapoints: Vec::new(),
                ref_id: metric,
            });
            bucket.datapoints.push(DataPoint(value, epoch));
        }
    }
    debug!(
        "bucketed {} rows into {} series",
        results.rows.as_deref().map_or(0, |rows| rows.len()),
        buckets.len()
    );
    Ok(buckets.into_values().collect())
}
