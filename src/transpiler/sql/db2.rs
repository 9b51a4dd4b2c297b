use crate::ast::{DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

/// Db2 for Linux, Unix and Windows.
pub struct Db2Generator;

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

impl SqlGenerator for Db2Generator {
    fn name(&self) -> &'static str {
        "db2"
    }

    fn supports_boolean_type(&self) -> bool {
        false
    }

    fn bytes_literal(&self, v: &[u8]) -> String {
        format!("BX'{}'", hex(v))
    }

    fn supports_regex(&self) -> bool {
        true
    }

    fn regex_match(&self, value: &str, pattern: &str) -> String {
        format!("REGEXP_LIKE({}, {})", value, pattern)
    }

    fn bitwise_and(&self, a: &str, b: &str) -> String {
        format!("BITAND({}, {})", a, b)
    }

    fn integer_to_number(&self, a: &str) -> String {
        format!("CAST({} AS DOUBLE)", a)
    }

    fn supports_hyperbolic(&self) -> bool {
        true
    }

    fn random(&self) -> String {
        "RAND()".to_string()
    }

    fn to_number(&self, a: &str) -> String {
        format!("CAST({} AS DOUBLE)", a)
    }

    fn length(&self, a: &str) -> String {
        format!("LENGTH({})", a)
    }

    fn substring(&self, a: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTR({}, {}, {})", a, start, len),
            None => format!("SUBSTR({}, {})", a, start),
        }
    }

    fn position(&self, haystack: &str, needle: &str) -> String {
        format!("LOCATE({}, {})", needle, haystack)
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!("{} + ({}) {}S", date, amount, unit.keyword())
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        let seconds = format!(
            "((DAYS({e}) - DAYS({s})) * 86400 + (MIDNIGHT_SECONDS({e}) - MIDNIGHT_SECONDS({s})) + (MICROSECOND({e}) - MICROSECOND({s})) / 1000000.0)",
            e = end,
            s = start
        );
        Ok(match unit {
            DateUnit::Year => format!("INTEGER(MONTHS_BETWEEN({}, {}) / 12)", end, start),
            DateUnit::Month => format!("INTEGER(MONTHS_BETWEEN({}, {}))", end, start),
            DateUnit::Week => format!("INTEGER({} / 604800)", seconds),
            DateUnit::Day => format!("INTEGER({} / 86400)", seconds),
            DateUnit::Hour => format!("INTEGER({} / 3600)", seconds),
            DateUnit::Minute => format!("INTEGER({} / 60)", seconds),
            DateUnit::Second => seconds,
        })
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("TIMESTAMP(DATE({}))", a)
    }

    fn select_without_from_suffix(&self) -> Option<&'static str> {
        Some(" FROM SYSIBM.SYSDUMMY1")
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Number | ValueType::Duration => "DOUBLE",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "TIMESTAMP",
            ValueType::Boolean => "SMALLINT",
            ValueType::Bytes => "BLOB",
            ValueType::DateRepeat => "VARCHAR(64)",
            _ => "VARCHAR(4000)",
        }
        .to_string()
    }

    fn supports_drop_if_exists(&self) -> bool {
        false
    }

    fn generated_key_query(&self, _table: &str, _column: &str) -> Option<String> {
        Some("VALUES IDENTITY_VAL_LOCAL()".to_string())
    }
}
