use chrono::{NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{Column, Row, TypeInfo};
use tracing::warn;

use crate::datalayer::CRUD::cars::CarRecord;

/// How a MySQL column is rendered into JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Signed,
    Unsigned,
    Float,
    Double,
    Decimal,
    Date,
    DateTime,
    Timestamp,
    Time,
    Json,
    Binary,
    Text,
}

impl ColumnKind {
    /// Whether a failed typed decode may retry the payload as text.
    ///
    /// Binary-protocol numbers, temporals and bit strings are not UTF-8.
    pub fn has_text_fallback(self) -> bool {
        matches!(self, ColumnKind::Decimal | ColumnKind::Json | ColumnKind::Text)
    }
}

/// Classify a column by the type name the driver reports (`INT UNSIGNED`, `VARCHAR`, ...)
pub fn column_kind(type_name: &str) -> ColumnKind {
    let upper = type_name.trim().to_ascii_uppercase();
    let unsigned = upper.ends_with("UNSIGNED");
    let base = upper.split_whitespace().next().unwrap_or_default();

    match base {
        // BOOLEAN is TINYINT(1); keep it numeric
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT"
        | "YEAR" => {
            if unsigned {
                ColumnKind::Unsigned
            } else {
                ColumnKind::Signed
            }
        }
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" | "REAL" => ColumnKind::Double,
        "DECIMAL" | "NUMERIC" => ColumnKind::Decimal,
        "DATE" => ColumnKind::Date,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "TIME" => ColumnKind::Time,
        "JSON" => ColumnKind::Json,
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => {
            ColumnKind::Binary
        }
        _ => ColumnKind::Text,
    }
}

/// Render one `SELECT *` row as a JSON object keyed by column name.
///
/// A column that cannot be decoded is logged and rendered as `null`, so one
/// odd column never fails the whole lookup.
pub fn row_to_json(row: &MySqlRow) -> CarRecord {
    let mut record = CarRecord::new();

    for column in row.columns() {
        let index = column.ordinal();
        let kind = column_kind(column.type_info().name());

        let value = decode_column(row, index, kind).unwrap_or_else(|e| {
            if kind.has_text_fallback() {
                warn!(
                    column = %column.name(),
                    kind = ?kind,
                    error = %e,
                    "Falling back to text decoding"
                );
                decode_text(row, index)
            } else {
                warn!(
                    column = %column.name(),
                    kind = ?kind,
                    error = %e,
                    "Undecodable column rendered as null"
                );
                Value::Null
            }
        });

        record.insert(column.name().to_string(), value);
    }

    record
}

fn decode_column(row: &MySqlRow, index: usize, kind: ColumnKind) -> Result<Value, sqlx::Error> {
    let value = match kind {
        // Integer decoding reads as many bytes as the column sends
        ColumnKind::Signed => row
            .try_get_unchecked::<Option<i64>, _>(index)?
            .map(Value::from),
        ColumnKind::Unsigned => row
            .try_get_unchecked::<Option<u64>, _>(index)?
            .map(Value::from),
        // FLOAT arrives as 4 bytes, DOUBLE as 8
        ColumnKind::Float => row.try_get::<Option<f32>, _>(index)?.map(widen_float),
        ColumnKind::Double => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        // Exact decimals travel as text and stay text
        ColumnKind::Decimal => row
            .try_get_unchecked::<Option<String>, _>(index)?
            .map(Value::from),
        ColumnKind::Date | ColumnKind::DateTime | ColumnKind::Timestamp => raw_bytes(row, index)?
            .map(|bytes| {
                parse_datetime(&bytes)
                    .map(|at| Value::from(render_utc(at)))
                    .unwrap_or(Value::Null)
            }),
        ColumnKind::Time => raw_bytes(row, index)?
            .map(|bytes| format_time(&bytes).map(Value::from).unwrap_or(Value::Null)),
        ColumnKind::Json => row
            .try_get::<Option<Json<Value>>, _>(index)?
            .map(|json| json.0),
        ColumnKind::Binary => raw_bytes(row, index)?.map(Value::from),
        ColumnKind::Text => row
            .try_get::<Option<String>, _>(index)?
            .map(Value::from),
    };

    Ok(value.unwrap_or(Value::Null))
}

fn raw_bytes(row: &MySqlRow, index: usize) -> Result<Option<Vec<u8>>, sqlx::Error> {
    row.try_get_unchecked::<Option<Vec<u8>>, _>(index)
}

fn decode_text(row: &MySqlRow, index: usize) -> Value {
    match row.try_get_unchecked::<Option<String>, _>(index) {
        Ok(text) => text.map(Value::from).unwrap_or(Value::Null),
        Err(e) => {
            warn!(index, error = %e, "Text decoding failed, rendering null");
            Value::Null
        }
    }
}

/// Widen a FLOAT through its shortest decimal form, so `0.1` stays `0.1`
pub fn widen_float(value: f32) -> Value {
    value
        .to_string()
        .parse::<f64>()
        .map(Value::from)
        .unwrap_or(Value::Null)
}

/// UTC RFC 3339 with milliseconds, e.g. `2020-01-01T00:00:00.000Z`
pub fn render_utc(at: NaiveDateTime) -> String {
    Utc.from_utc_datetime(&at)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a DATE, DATETIME or TIMESTAMP payload.
///
/// Binary rows carry a length byte followed by year (u16 LE), month, day and
/// optionally hour, minute, second and microseconds (u32 LE). Text rows carry
/// `YYYY-MM-DD[ HH:MM:SS[.ffffff]]`. Zero dates yield `None`.
pub fn parse_datetime(bytes: &[u8]) -> Option<NaiveDateTime> {
    match bytes.split_first() {
        Some((&len, rest)) if usize::from(len) == rest.len() && matches!(len, 0 | 4 | 7 | 11) => {
            if len == 0 {
                return None;
            }

            let year = u16::from_le_bytes([rest[0], rest[1]]);
            let date = NaiveDate::from_ymd_opt(
                i32::from(year),
                u32::from(rest[2]),
                u32::from(rest[3]),
            )?;

            let (hour, minute, second) = if len >= 7 {
                (rest[4], rest[5], rest[6])
            } else {
                (0, 0, 0)
            };
            let micros = if len == 11 {
                u32::from_le_bytes([rest[7], rest[8], rest[9], rest[10]])
            } else {
                0
            };

            date.and_hms_micro_opt(
                u32::from(hour),
                u32::from(minute),
                u32::from(second),
                micros,
            )
        }
        _ => {
            let text = std::str::from_utf8(bytes).ok()?;
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
        }
    }
}

/// Format a TIME payload as `[-]HH:MM:SS[.ffffff]`.
///
/// TIME is a signed duration up to 838 hours, so days fold into the hour
/// count. Binary rows carry a length byte, a sign byte, days (u32 LE), hour,
/// minute, second and optionally microseconds (u32 LE). Text rows pass through.
pub fn format_time(bytes: &[u8]) -> Option<String> {
    match bytes.split_first() {
        Some((&len, rest)) if usize::from(len) == rest.len() && matches!(len, 0 | 8 | 12) => {
            if len == 0 {
                return Some("00:00:00".to_string());
            }

            let sign = if rest[0] != 0 { "-" } else { "" };
            let days = u64::from(u32::from_le_bytes([rest[1], rest[2], rest[3], rest[4]]));
            let hours = days * 24 + u64::from(rest[5]);

            let mut out = format!("{}{:02}:{:02}:{:02}", sign, hours, rest[6], rest[7]);
            if len == 12 {
                let micros = u32::from_le_bytes([rest[8], rest[9], rest[10], rest[11]]);
                if micros > 0 {
                    out.push_str(&format!(".{:06}", micros));
                }
            }
            Some(out)
        }
        _ => std::str::from_utf8(bytes).ok().map(str::to_string),
    }
}
