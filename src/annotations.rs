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
    convert::seconds_or_millis,
    error::ParseError,
    response::{cell_text, QueryResults},
    schema::AnnotationIndex,
};

/// A discrete timestamped event extracted from an annotation query.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Annotation {
    /// The caller's fixed annotation label, carried through unchanged.
    pub annotation: String,
    /// Event start, epoch millis. The raw cell may be seconds or millis.
    pub time: i64,
    #[serde(rename = "timeEnd")]
    pub time_end: Option<i64>,
    pub text: String,
    pub tags: Vec<String>,
}

/// Maps annotation query rows to events.
///
/// Async so a missing `time` column rejects through the same future-based
/// path callers use for query execution. The check runs before any row is
/// touched and must reject even when the row set is empty; an empty row set
/// with a valid `time` column resolves to an empty list.
pub async fn transform_annotation_response(
    annotation: &str,
    results: &QueryResults,
) -> Result<Vec<Annotation>, ParseError> {
    let index = AnnotationIndex::scan(&results.schema);
    let Some(time_idx) = index.time else {
        return Err(ParseError::MissingAnnotationTimeColumn);
    };
    let Some(rows) = &results.rows else {
        return Ok(Vec::new());
    };

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        events.push(Annotation {
            annotation: annotation.to_string(),
            time: seconds_or_millis(row.cell(time_idx)),
            time_end: index.timeend.map(|idx| seconds_or_millis(row.cell(idx))),
            text: index
                .text
                .map(|idx| cell_text(row.cell(idx)))
                .unwrap_or_default(),
            tags: index.tags.map(|idx| split_tags(row.cell(idx))).unwrap_or_default(),
        });
    }
    Ok(events)
}

/// Comma-separated tags, whitespace-trimmed, blanks dropped.
fn split_tags(raw: &Value) -> Vec<String> {
    cell_text(raw)
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
