use chrono::NaiveDateTime;

use crate::ast::{AggregateFunc, DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

pub struct SqliteGenerator;

/// Modifier word for `DATETIME(d, 'n unit')`.
fn modifier_unit(unit: DateUnit) -> &'static str {
    match unit {
        DateUnit::Year => "years",
        DateUnit::Month => "months",
        DateUnit::Week | DateUnit::Day => "days",
        DateUnit::Hour => "hours",
        DateUnit::Minute => "minutes",
        DateUnit::Second => "seconds",
    }
}

fn strftime_int(pattern: &str, a: &str) -> String {
    format!("CAST(STRFTIME('{}', {}) AS INTEGER)", pattern, a)
}

impl SqlGenerator for SqliteGenerator {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    // Dates are stored as ISO text.
    fn date_literal(&self, v: &NaiveDateTime) -> String {
        format!("'{}'", v.format("%Y-%m-%d %H:%M:%S%.3f"))
    }

    fn limit_offset(&self, limit: Option<usize>, offset: Option<usize>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!(" LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!(" LIMIT {}", l),
            (None, Some(o)) => format!(" LIMIT -1 OFFSET {}", o),
            (None, None) => String::new(),
        }
    }

    fn supports_modulus_function(&self) -> bool {
        false
    }

    fn integer_to_number(&self, a: &str) -> String {
        format!("CAST({} AS REAL)", a)
    }

    fn truncate(&self, a: &str) -> String {
        format!("CAST({} AS INTEGER)", a)
    }

    fn supports_cot(&self) -> bool {
        false
    }

    fn supports_hyperbolic(&self) -> bool {
        true
    }

    // RANDOM() is a 64-bit integer.
    fn random(&self) -> String {
        "(RANDOM() / 18446744073709551616.0 + 0.5)".to_string()
    }

    fn greatest(&self, args: &[String]) -> String {
        format!("MAX({})", args.join(", "))
    }

    fn least(&self, args: &[String]) -> String {
        format!("MIN({})", args.join(", "))
    }

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("CAST({} AS TEXT)", a)
    }

    fn to_number(&self, a: &str) -> String {
        format!("CAST({} AS REAL)", a)
    }

    fn to_integer(&self, a: &str) -> String {
        format!("CAST({} AS INTEGER)", a)
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
        format!("INSTR({}, {})", haystack, needle)
    }

    fn current_timestamp(&self) -> String {
        "STRFTIME('%Y-%m-%d %H:%M:%f', 'now')".to_string()
    }

    fn date_part(&self, unit: DateUnit, a: &str) -> String {
        match unit {
            DateUnit::Year => strftime_int("%Y", a),
            DateUnit::Month => strftime_int("%m", a),
            DateUnit::Week => strftime_int("%W", a),
            DateUnit::Day => strftime_int("%d", a),
            DateUnit::Hour => strftime_int("%H", a),
            DateUnit::Minute => strftime_int("%M", a),
            DateUnit::Second => format!("CAST(STRFTIME('%f', {}) AS REAL)", a),
        }
    }

    fn day_of_week(&self, a: &str) -> String {
        format!("{} + 1", strftime_int("%w", a))
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!(
            "STRFTIME('%Y-%m-%d %H:%M:%f', {}, ({}) || ' {}')",
            date,
            amount,
            modifier_unit(unit)
        )
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        let days = format!("(JULIANDAY({}) - JULIANDAY({}))", end, start);
        let months = format!(
            "(({} - {}) * 12 + {} - {})",
            strftime_int("%Y", end),
            strftime_int("%Y", start),
            strftime_int("%m", end),
            strftime_int("%m", start)
        );
        Ok(match unit {
            DateUnit::Year => format!("{} / 12", months),
            DateUnit::Month => months,
            DateUnit::Week => format!("CAST({} / 7 AS INTEGER)", days),
            DateUnit::Day => format!("CAST({} AS INTEGER)", days),
            DateUnit::Hour => format!("CAST({} * 24 AS INTEGER)", days),
            DateUnit::Minute => format!("CAST({} * 1440 AS INTEGER)", days),
            DateUnit::Second => format!("{} * 86400.0", days),
        })
    }

    fn end_of_month(&self, a: &str) -> CompileResult<String> {
        Ok(format!(
            "DATETIME({}, 'start of month', '+1 month', '-1 day', 'start of day')",
            a
        ))
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("DATETIME({}, 'start of day')", a)
    }

    fn supports_aggregate(&self, func: AggregateFunc) -> bool {
        !matches!(
            func,
            AggregateFunc::StdDevPop
                | AggregateFunc::StdDevSamp
                | AggregateFunc::VarPop
                | AggregateFunc::VarSamp
        )
    }

    fn supports_groups_frame(&self) -> bool {
        true
    }

    fn supports_right_join(&self) -> bool {
        false
    }

    fn supports_full_outer_join(&self) -> bool {
        false
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Number | ValueType::Duration => "REAL",
            ValueType::Integer | ValueType::Boolean => "INTEGER",
            ValueType::Bytes => "BLOB",
            _ => "TEXT",
        }
        .to_string()
    }

    fn autoincrement_type(&self) -> String {
        "INTEGER".to_string()
    }

    fn autoincrement_suffix(&self) -> &'static str {
        " PRIMARY KEY AUTOINCREMENT"
    }

    fn generated_key_query(&self, _table: &str, _column: &str) -> Option<String> {
        Some("SELECT last_insert_rowid()".to_string())
    }

    fn returning_clause(&self, columns: &[String]) -> Option<String> {
        Some(format!(" RETURNING {}", columns.join(", ")))
    }
}
