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

//! Turns materialized BigQuery query responses into the shapes Grafana
//! consumes: time series, display tables, variable lists, annotation
//! events, and normalized resource listings.
//!
//! Query execution, credentials, caching, and rendering all live outside
//! this crate; callers hand in the JSON payload of `jobs.getQueryResults`
//! (or a resource listing) and receive derived, read-only output shapes.

pub mod annotations;
pub mod convert;
pub mod error;
pub mod resources;
pub mod response;
pub mod schema;

pub use annotations::{transform_annotation_response, Annotation};
pub use convert::{
    parse_data_query, Column, DataPoint, Format, QueryOutput, Table, TableValue, TimeSeries,
    VariableLabel,
};
pub use error::ParseError;
pub use resources::{
    collapse_sharded_tables, parse_datasets, parse_projects, parse_table_fields, parse_tables,
    ResultFormat,
};
pub use response::{QueryResults, RowCell, TableRow};
pub use schema::{flatten_fields, Field, TableSchema};
