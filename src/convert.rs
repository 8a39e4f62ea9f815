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

mod series;
mod table;
mod variables;

pub use series::{to_time_series, DataPoint, TimeSeries};
pub use table::{to_table, Column, Table, TableValue};
pub use variables::{to_var, VariableLabel};

use chrono::{TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::ParseError,
    response::{cell_number, QueryResults},
};

/// Output shape requested by the panel issuing the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    TimeSeries,
    Table,
    Var,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum QueryOutput {
    TimeSeries(Vec<TimeSeries>),
    Table(Table),
    Var(Vec<VariableLabel>),
}

/// Routes a materialized query response to the builder for the requested
/// format.
///
/// A response without rows short-circuits the time-series path to an empty
/// output before the time-column check runs, so empty results never fail.
pub fn parse_data_query(
    results: &QueryResults,
    format: Format,
) -> Result<QueryOutput, ParseError> {
    match format {
        Format::TimeSeries if results.rows.is_none() => Ok(QueryOutput::TimeSeries(Vec::new())),
        Format::TimeSeries => to_time_series(results).map(QueryOutput::TimeSeries),
        Format::Table => Ok(QueryOutput::Table(to_table(results))),
        Format::Var => Ok(QueryOutput::Var(to_var(results))),
    }
}

/// Interprets a raw timestamp cell as either epoch-seconds or epoch-millis,
/// returning millis.
///
/// Anything below 1e10 is taken as seconds: that classifies every instant
/// between 1971 and 2285 correctly in either unit, at the cost of genuine
/// millis values outside that window.
pub(crate) fn seconds_or_millis(raw: &Value) -> i64 {
    let floored = cell_number(raw).floor();
    let millis = if floored.abs() < 1e10 {
        floored * 1000.0
    } else {
        floored
    };
    millis as i64
}

/// Renders an epoch-millis instant as the UTC display string used in table
/// cells. Out-of-range instants render empty rather than failing the table.
pub(crate) fn format_timestamp_millis(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(instant) => instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        None => String::new(),
    }
}
