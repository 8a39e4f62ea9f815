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

use chrono::NaiveDate;
use indexmap::IndexMap;
use log::debug;

use super::{ResultFormat, PARTITIONED_MARKER};

const SHARD_PLACEHOLDER: &str = "YYYYMMDD";

/// Collapses date-sharded table families into a single placeholder entry
/// and strips the `__partitioned` marker from display labels.
///
/// Sharded families (one physical table per day) must present as one
/// logical, queryable entity. Every pair whose id ends in a valid
/// `_YYYYMMDD` shard date maps to `<labelPrefix>YYYYMMDD` for both text and
/// value; all other pairs keep their id as the key. The map is
/// insertion-ordered, so output order is first appearance and repeated ids
/// keep their first position. Running the result through again is a no-op.
pub fn collapse_sharded_tables(pairs: Vec<ResultFormat>) -> Vec<ResultFormat> {
    let input_len = pairs.len();
    let mut collapsed: IndexMap<String, String> = IndexMap::new();
    for mut pair in pairs {
        if let Some(marker) = pair.text.find(PARTITIONED_MARKER) {
            pair.text.truncate(marker);
        }
        if has_shard_date_suffix(&pair.value) {
            let placeholder = shard_placeholder(&pair.text);
            collapsed.insert(placeholder.clone(), placeholder);
        } else {
            collapsed.insert(pair.value, pair.text);
        }
    }
    if collapsed.len() != input_len {
        debug!(
            "collapsed {input_len} table entries into {}",
            collapsed.len()
        );
    }
    collapsed
        .into_iter()
        .map(|(value, text)| ResultFormat { text, value })
        .collect()
}

/// The family label: the shard label with its 8-character date tail
/// replaced by the `YYYYMMDD` placeholder.
fn shard_placeholder(label: &str) -> String {
    let cut = label.len().saturating_sub(8);
    let prefix = if label.is_char_boundary(cut) {
        &label[..cut]
    } else {
        label
    };
    format!("{prefix}{SHARD_PLACEHOLDER}")
}

/// True when the id ends in `_YYYYMMDD` naming one day of a sharded
/// family. The tail must be a valid Gregorian calendar date; the shard
/// naming convention only covers years 2000-2099.
fn has_shard_date_suffix(id: &str) -> bool {
    if id.len() < 9 || !id.is_char_boundary(id.len() - 8) {
        return false;
    }
    let (head, tail) = id.split_at(id.len() - 8);
    if !head.ends_with('_') || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let year: i32 = tail[..4].parse().unwrap_or(0);
    let month: u32 = tail[4..6].parse().unwrap_or(0);
    let day: u32 = tail[6..8].parse().unwrap_or(0);
    (2000..=2099).contains(&year) && NaiveDate::from_ymd_opt(year, month, day).is_some()
}
