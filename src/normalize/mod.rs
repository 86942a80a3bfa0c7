//! Response normalization.
//!
//! Turns the raw JSON body returned by the grid data API into a typed
//! `DemandSeries`:
//!
//! 1. rebuild the whole tree with snake_case keys (`case::normalize_keys`)
//! 2. locate `response.data` (the request echo in `request` is ignored)
//! 3. map each record 1:1 onto `DemandRecord`, failing on the first missing field
//! 4. check that periods advance by exactly one hour
//!
//! Nothing here performs I/O; the same payload always yields the same result.

use chrono::Duration;
use serde_json::{Map, Value};

use crate::domain::{DemandRecord, DemandSeries};
use crate::error::CoreError;

pub mod case;
pub mod period;

pub use case::{normalize_keys, to_snake_case};
pub use period::parse_period;

/// Series-level metadata carried in the `response` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Total number of rows the API reports for the query (may exceed one page).
    pub total: Option<u64>,
    pub date_format: Option<String>,
    pub frequency: Option<String>,
    pub description: Option<String>,
    /// API-side warnings, rendered as `warning: description`.
    pub warnings: Vec<String>,
}

/// Normalizer output: the typed series plus response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResponse {
    pub meta: ResponseMeta,
    pub series: DemandSeries,
}

/// Normalize a raw payload into a `DemandSeries`.
pub fn normalize(raw: &Value) -> Result<DemandSeries, CoreError> {
    normalize_response(raw).map(|r| r.series)
}

/// Normalize a raw payload, keeping the response metadata alongside the series.
pub fn normalize_response(raw: &Value) -> Result<NormalizedResponse, CoreError> {
    let envelope = normalize_keys(raw)?;
    let envelope = envelope
        .as_object()
        .ok_or_else(|| CoreError::malformed("payload is not a JSON object"))?;

    let response = envelope
        .get("response")
        .ok_or_else(|| CoreError::malformed("missing 'response' section"))?
        .as_object()
        .ok_or_else(|| CoreError::malformed("'response' section is not an object"))?;

    let data = response
        .get("data")
        .ok_or_else(|| CoreError::malformed("missing 'response.data' records"))?
        .as_array()
        .ok_or_else(|| CoreError::malformed("'response.data' is not a list"))?;

    let mut records = Vec::with_capacity(data.len());
    for (index, item) in data.iter().enumerate() {
        let fields = item.as_object().ok_or_else(|| {
            CoreError::malformed(format!("record {index} in 'response.data' is not an object"))
        })?;
        records.push(map_record(index, fields)?);
    }

    check_hourly_steps(&records)?;

    Ok(NormalizedResponse {
        meta: read_meta(response),
        series: DemandSeries::new(records),
    })
}

fn map_record(index: usize, fields: &Map<String, Value>) -> Result<DemandRecord, CoreError> {
    let period_raw = required_str(index, fields, "period")?;
    let period = parse_period(period_raw).ok_or_else(|| {
        CoreError::schema(index, "period", format!("unrecognized timestamp '{period_raw}'"))
    })?;

    Ok(DemandRecord {
        period,
        respondent_id: required_str(index, fields, "respondent")?.to_string(),
        respondent_name: required_str(index, fields, "respondent_name")?.to_string(),
        category: required_str(index, fields, "type")?.to_string(),
        category_name: required_str(index, fields, "type_name")?.to_string(),
        value: required_int(index, fields, "value")?,
        value_units: required_str(index, fields, "value_units")?.to_string(),
    })
}

fn required<'a>(
    index: usize,
    fields: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Value, CoreError> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(CoreError::schema(index, name, "missing")),
        Some(v) => Ok(v),
    }
}

fn required_str<'a>(
    index: usize,
    fields: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a str, CoreError> {
    required(index, fields, name)?
        .as_str()
        .ok_or_else(|| CoreError::schema(index, name, "expected a string"))
}

/// EIA quotes some numbers as strings, so an integer-valued string is accepted too.
fn required_int(index: usize, fields: &Map<String, Value>, name: &str) -> Result<i64, CoreError> {
    let value = required(index, fields, name)?;
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| CoreError::schema(index, name, format!("expected an integer, got {value}")))
}

fn check_hourly_steps(records: &[DemandRecord]) -> Result<(), CoreError> {
    let step = Duration::hours(1);
    for (index, pair) in records.windows(2).enumerate() {
        let (prev, next) = (pair[0].period, pair[1].period);
        if next - prev != step {
            return Err(CoreError::malformed(format!(
                "period of record {} ({}) does not follow record {} ({}) by one hour",
                index + 1,
                next.to_rfc3339(),
                index,
                prev.to_rfc3339()
            )));
        }
    }
    Ok(())
}

fn read_meta(response: &Map<String, Value>) -> ResponseMeta {
    let text = |key: &str| response.get(key).and_then(Value::as_str).map(str::to_string);

    let total = match response.get("total") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    let warnings = response
        .get("warnings")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(render_warning).collect())
        .unwrap_or_default();

    ResponseMeta {
        total,
        date_format: text("date_format"),
        frequency: text("frequency"),
        description: text("description"),
        warnings,
    }
}

fn render_warning(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            let head = map.get("warning").and_then(Value::as_str);
            let body = map.get("description").and_then(Value::as_str);
            match (head, body) {
                (Some(h), Some(b)) => Some(format!("{h}: {b}")),
                (Some(h), None) => Some(h.to_string()),
                (None, Some(b)) => Some(b.to_string()),
                (None, None) => None,
            }
        }
        _ => None,
    }
}
