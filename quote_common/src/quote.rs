//! Quote payload returned by the quotes endpoint.
//!
//! The endpoint answers with a JSON array of `{symbol, price, timestamp}` objects.
//! Gateways disagree on the timestamp encoding: some send epoch milliseconds, some
//! send the RFC 3339 text that Go's `time.Time` marshals to. Both are accepted and
//! normalized to `DateTime<Utc>`; serialization always writes epoch milliseconds.
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::result::Result;

/// Market data point for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol (e.g., `BTC`).
    pub symbol: String,
    /// Last known price.
    pub price: f64,
    /// Instant the price was observed.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Creates a quote from its parts.
    pub fn new(symbol: &str, price: f64, timestamp: DateTime<Utc>) -> Self {
        Quote {
            symbol: String::from(symbol),
            price,
            timestamp,
        }
    }

    /// Decode a full quote list from a JSON response body.
    ///
    /// The list is rejected as a whole if any element is malformed.
    pub fn list_from_slice(body: &[u8]) -> Result<Vec<Quote>> {
        let quotes = serde_json::from_slice(body)?;
        Ok(quotes)
    }
}

/// Convert epoch milliseconds into an instant.
///
/// Fractional milliseconds are truncated toward zero.
pub fn timestamp_from_millis(millis: f64) -> Result<DateTime<Utc>> {
    if !millis.is_finite() || millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return Err(QuoteError::InvalidTimestamp(millis.to_string()));
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
        .ok_or_else(|| QuoteError::InvalidTimestamp(millis.to_string()))
}

/// Parse a textual timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` read as local time, or a
/// bare `YYYY-MM-DD` meaning midnight UTC. A naive time that falls into a local
/// DST gap is rejected.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| QuoteError::InvalidTimestamp(String::from(trimmed)));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(QuoteError::InvalidTimestamp(String::from(trimmed)))
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let parsed = match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(millis) => super::timestamp_from_millis(millis),
            RawTimestamp::Text(text) => super::parse_timestamp(&text),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nov_14_2023() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
    }

    #[test]
    fn decodes_epoch_millis() {
        let body = br#"[{"symbol":"BTC","price":65000,"timestamp":1700000000000}]"#;
        let quotes = Quote::list_from_slice(body).unwrap();

        assert_eq!(quotes, vec![Quote::new("BTC", 65000.0, nov_14_2023())]);
    }

    #[test]
    fn decodes_go_style_rfc3339_text() {
        let body = br#"[
            {"symbol":"SBER","price":275.5,"timestamp":"2023-11-15T01:13:20.123456789+03:00"},
            {"symbol":"ETH","price":2650.2,"timestamp":"2023-11-14T22:13:20Z"}
        ]"#;
        let quotes = Quote::list_from_slice(body).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].timestamp.timestamp(), nov_14_2023().timestamp());
        assert_eq!(quotes[0].timestamp.timestamp_subsec_millis(), 123);
        assert_eq!(quotes[1].timestamp, nov_14_2023());
    }

    #[test]
    fn naive_text_is_local_time() {
        let naive = NaiveDate::from_ymd_opt(2023, 11, 14)
            .and_then(|date| date.and_hms_milli_opt(22, 13, 20, 250))
            .unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(parse_timestamp("2023-11-14T22:13:20.250").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2023-11-14T22:13:20").unwrap().timestamp_millis(),
            expected.timestamp_millis() - 250
        );
    }

    #[test]
    fn date_only_text_is_utc_midnight() {
        assert_eq!(
            parse_timestamp("2023-11-14").unwrap(),
            Utc.with_ymd_and_hms(2023, 11, 14, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn fractional_millis_are_truncated() {
        let instant = timestamp_from_millis(1_700_000_000_000.9).unwrap();
        assert_eq!(instant.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn rejects_unparseable_timestamp_text() {
        let body = br#"[{"symbol":"BTC","price":1,"timestamp":"yesterday"}]"#;
        let err = Quote::list_from_slice(body).unwrap_err();
        assert!(matches!(err, QuoteError::Parse(_)), "got {err:?}");
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn rejects_wrong_shapes() {
        for body in [
            &br#"{"symbol":"BTC","price":1,"timestamp":0}"#[..],
            &br#"[{"symbol":"BTC","timestamp":0}]"#[..],
            &br#"[{"symbol":"BTC","price":"cheap","timestamp":0}]"#[..],
            &b"not json"[..],
        ] {
            assert!(Quote::list_from_slice(body).is_err());
        }
    }

    #[test]
    fn empty_array_is_a_valid_list() {
        assert!(Quote::list_from_slice(b"[]").unwrap().is_empty());
    }

    #[test]
    fn serializes_timestamp_as_millis() {
        let json = serde_json::to_string(&Quote::new("ETH", 2650.2, nov_14_2023())).unwrap();
        assert_eq!(json, r#"{"symbol":"ETH","price":2650.2,"timestamp":1700000000000}"#);
    }
}
