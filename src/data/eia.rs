//! EIA v2 API integration for hourly balancing-authority demand.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::domain::{DataType, Frequency, Timestamp, grid_offset};
use crate::error::{AppError, EXIT_TRANSPORT};

const BASE_URL: &str = "https://api.eia.gov/v2/electricity/rto/region-data/data/";

/// Query timestamps always carry the grid's fixed offset.
const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S-04:00";

/// One demand request. `None` fields are left out of the query string.
#[derive(Debug, Clone)]
pub struct DemandQuery {
    pub frequency: Option<Frequency>,
    pub data_type: Option<DataType>,
    /// Respondent facet (balancing authority code).
    pub respondent: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl DemandQuery {
    /// Demand values for one respondent over `[start, end]`.
    pub fn new(
        frequency: Frequency,
        respondent: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
    ) -> Self {
        Self {
            frequency: Some(frequency),
            data_type: Some(DataType::Value),
            respondent: Some(respondent.into()),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Query parameters excluding the API key.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(f) = self.frequency {
            out.push(("frequency", f.as_param().to_string()));
        }
        if let Some(d) = self.data_type {
            out.push(("data[0]", d.as_param().to_string()));
        }
        if let Some(r) = &self.respondent {
            out.push(("facets[respondent][]", r.clone()));
        }
        if let Some(s) = self.start {
            out.push(("start", format_timestamp(s)));
        }
        if let Some(e) = self.end {
            out.push(("end", format_timestamp(e)));
        }
        // The selector relies on ascending periods.
        out.push(("sort[0][column]", "period".to_string()));
        out.push(("sort[0][direction]", "asc".to_string()));
        out
    }
}

/// Format as `YYYY-MM-DDTHH:MM:SS-04:00` after converting to the grid offset.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.with_timezone(&grid_offset())
        .format(QUERY_TIME_FORMAT)
        .to_string()
}

/// Local midnight of `date` in the grid offset.
pub fn day_start(date: NaiveDate) -> Option<Timestamp> {
    let naive = NaiveDateTime::new(date, NaiveTime::MIN);
    grid_offset().from_local_datetime(&naive).single()
}

pub struct EiaClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl EiaClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key.clone())
    }

    /// Point the client at another endpoint (e.g. a local mirror).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the raw JSON body for `query`.
    pub fn fetch_raw(&self, query: &DemandQuery) -> Result<Value, AppError> {
        let params = query.params();
        debug!(url = %self.base_url, ?params, "requesting demand data");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(&params)
            .send()
            .map_err(|e| AppError::new(EXIT_TRANSPORT, format!("EIA request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                EXIT_TRANSPORT,
                format!("EIA request failed with status {}.", resp.status()),
            ));
        }

        resp.json::<Value>()
            .map_err(|e| AppError::new(EXIT_TRANSPORT, format!("Failed to parse EIA response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a loopback port and return its base URL.
    fn serve_once(status: &str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });
        format!("http://{addr}/")
    }

    fn query() -> DemandQuery {
        DemandQuery::new(
            Frequency::LocalHourly,
            "MIDA",
            day_start(date(2023, 6, 24)).unwrap(),
            day_start(date(2023, 6, 25)).unwrap(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn timestamps_use_fixed_minus_four_suffix() {
        let ts = day_start(date(2023, 6, 24)).unwrap();
        assert_eq!(format_timestamp(ts), "2023-06-24T00:00:00-04:00");
    }

    #[test]
    fn other_offsets_are_shifted_before_formatting() {
        let utc = Utc.with_ymd_and_hms(2023, 6, 24, 12, 0, 0).unwrap().fixed_offset();
        assert_eq!(format_timestamp(utc), "2023-06-24T08:00:00-04:00");
    }

    #[test]
    fn params_include_every_set_field() {
        let q = DemandQuery::new(
            Frequency::LocalHourly,
            "MIDA",
            day_start(date(2023, 6, 24)).unwrap(),
            day_start(date(2023, 7, 1)).unwrap(),
        );
        let params = q.params();
        let get = |k: &str| {
            params
                .iter()
                .find(|(key, _)| *key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("frequency"), Some("local-hourly"));
        assert_eq!(get("data[0]"), Some("value"));
        assert_eq!(get("facets[respondent][]"), Some("MIDA"));
        assert_eq!(get("start"), Some("2023-06-24T00:00:00-04:00"));
        assert_eq!(get("end"), Some("2023-07-01T00:00:00-04:00"));
        assert_eq!(get("sort[0][direction]"), Some("asc"));
    }

    #[test]
    fn unset_fields_are_omitted() {
        let q = DemandQuery {
            frequency: None,
            data_type: None,
            respondent: None,
            start: None,
            end: None,
        };
        let keys: Vec<&str> = q.params().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["sort[0][column]", "sort[0][direction]"]);
    }

    #[test]
    fn error_status_is_a_transport_error() {
        let url = serve_once("500 Internal Server Error", "");
        let err = EiaClient::new("k").with_base_url(url).fetch_raw(&query()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_TRANSPORT);
        assert!(err.to_string().contains("500"), "{err}");
    }

    #[test]
    fn non_json_body_is_a_transport_error() {
        let url = serve_once("200 OK", "not json");
        let err = EiaClient::new("k").with_base_url(url).fetch_raw(&query()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_TRANSPORT);
    }

    #[test]
    fn json_body_is_returned_as_is() {
        let url = serve_once("200 OK", r#"{"response":{"data":[]}}"#);
        let raw = EiaClient::new("k").with_base_url(url).fetch_raw(&query()).unwrap();
        assert_eq!(raw["response"]["data"], Value::Array(vec![]));
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let err = EiaClient::new("k")
            .with_base_url(format!("http://{addr}/"))
            .fetch_raw(&query())
            .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_TRANSPORT);
    }
}
