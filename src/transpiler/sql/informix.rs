use chrono::NaiveDateTime;

use crate::ast::{DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

pub struct InformixGenerator;

fn to_char_int(pattern: &str, a: &str) -> String {
    format!("CAST(TO_CHAR({}, '{}') AS INTEGER)", a, pattern)
}

impl SqlGenerator for InformixGenerator {
    fn name(&self) -> &'static str {
        "informix"
    }

    fn supports_boolean_type(&self) -> bool {
        false
    }

    fn date_literal(&self, v: &NaiveDateTime) -> String {
        format!(
            "DATETIME({}) YEAR TO FRACTION(3)",
            v.format("%Y-%m-%d %H:%M:%S%.3f")
        )
    }

    fn bitwise_and(&self, a: &str, b: &str) -> String {
        format!("BITAND({}, {})", a, b)
    }

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("CAST({} AS LVARCHAR(4000))", a)
    }

    fn to_number(&self, a: &str) -> String {
        format!("CAST({} AS FLOAT)", a)
    }

    fn to_integer(&self, a: &str) -> String {
        format!("CAST({} AS INT8)", a)
    }

    fn integer_to_number(&self, a: &str) -> String {
        format!("CAST({} AS FLOAT)", a)
    }

    fn substring(&self, a: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTR({}, {}, {})", a, start, len),
            None => format!("SUBSTR({}, {})", a, start),
        }
    }

    fn position(&self, haystack: &str, needle: &str) -> String {
        format!("INSTR({}, {})", haystack, needle)
    }

    fn current_date(&self) -> String {
        "TODAY".to_string()
    }

    fn current_timestamp(&self) -> String {
        "CURRENT YEAR TO FRACTION(3)".to_string()
    }

    fn date_part(&self, unit: DateUnit, a: &str) -> String {
        match unit {
            DateUnit::Year => format!("YEAR({})", a),
            DateUnit::Month => format!("MONTH({})", a),
            DateUnit::Day => format!("DAY({})", a),
            DateUnit::Week => to_char_int("%W", a),
            DateUnit::Hour => to_char_int("%H", a),
            DateUnit::Minute => to_char_int("%M", a),
            DateUnit::Second => format!("CAST(TO_CHAR({}, '%S%F3') AS DECIMAL) / 1000", a),
        }
    }

    fn day_of_week(&self, a: &str) -> String {
        format!("WEEKDAY({}) + 1", a)
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!("{} + ({}) UNITS {}", date, amount, unit.keyword())
    }

    /// Only day differences have an exact form.
    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        match unit {
            DateUnit::Day => Ok(format!("(DATE({}) - DATE({}))", end, start)),
            other => Err(self.unsupported(&format!("date difference in {}", other))),
        }
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("EXTEND(DATE({}), YEAR TO FRACTION(3))", a)
    }

    fn end_of_month(&self, a: &str) -> CompileResult<String> {
        Ok(format!("EXTEND(LAST_DAY({}), YEAR TO FRACTION(3))", a))
    }

    fn limit_offset(&self, _limit: Option<usize>, _offset: Option<usize>) -> String {
        String::new()
    }

    fn limit_in_select(&self, limit: Option<usize>, offset: Option<usize>) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(o) = offset {
            parts.push(format!("SKIP {}", o));
        }
        if let Some(l) = limit {
            parts.push(format!("FIRST {}", l));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    fn select_without_from_suffix(&self) -> Option<&'static str> {
        Some(" FROM systables WHERE tabid = 1")
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Number | ValueType::Duration => "FLOAT",
            ValueType::Integer => "INT8",
            ValueType::Date => "DATETIME YEAR TO FRACTION(3)",
            ValueType::Boolean => "SMALLINT",
            ValueType::Bytes => "BYTE",
            _ => "LVARCHAR(4000)",
        }
        .to_string()
    }

    fn autoincrement_type(&self) -> String {
        "SERIAL8".to_string()
    }

    fn autoincrement_suffix(&self) -> &'static str {
        ""
    }

    fn generated_key_query(&self, _table: &str, _column: &str) -> Option<String> {
        Some("SELECT DBINFO('serial8') FROM systables WHERE tabid = 1".to_string())
    }
}
