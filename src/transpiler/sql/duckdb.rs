use crate::ast::{DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

pub struct DuckDbGenerator;

impl SqlGenerator for DuckDbGenerator {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn limit_offset(&self, limit: Option<usize>, offset: Option<usize>) -> String {
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }

    fn bytes_literal(&self, v: &[u8]) -> String {
        let escaped: String = v.iter().map(|b| format!("\\x{:02X}", b)).collect();
        format!("'{}'::BLOB", escaped)
    }

    fn supports_regex(&self) -> bool {
        true
    }

    fn regex_match(&self, value: &str, pattern: &str) -> String {
        format!("regexp_matches({}, {})", value, pattern)
    }

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("CAST({} AS VARCHAR)", a)
    }

    fn day_of_week(&self, a: &str) -> String {
        format!("(DAYOFWEEK({}) + 1)", a)
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!(
            "{} + {} * INTERVAL '1 {}'",
            date,
            amount,
            unit.keyword().to_lowercase()
        )
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        Ok(match unit {
            DateUnit::Second => format!("EPOCH({} - {})", end, start),
            _ => format!(
                "DATE_DIFF('{}', {}, {})",
                unit.keyword().to_lowercase(),
                start,
                end
            ),
        })
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("DATE_TRUNC('day', {})", a)
    }

    fn supports_date_repeat(&self) -> bool {
        true
    }

    fn date_repeat_literal(&self, v: &crate::ast::DateRepeat) -> CompileResult<String> {
        v.validate()?;
        Ok(format!(
            "INTERVAL '{} years {} months {} days {} hours {} minutes {} seconds'",
            v.years, v.months, v.days, v.hours, v.minutes, v.seconds
        ))
    }

    fn supports_geometry(&self) -> bool {
        true
    }

    fn supports_groups_frame(&self) -> bool {
        true
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Null | ValueType::String => "VARCHAR",
            ValueType::Number | ValueType::Duration => "DOUBLE",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "TIMESTAMP",
            ValueType::Boolean => "BOOLEAN",
            ValueType::DateRepeat => "INTERVAL",
            ValueType::Point | ValueType::Line | ValueType::Polygon => "GEOMETRY",
            ValueType::Bytes => "BLOB",
        }
        .to_string()
    }

    // Sequences provide generated keys; RETURNING reads them back.
    fn autoincrement_suffix(&self) -> &'static str {
        ""
    }

    fn returning_clause(&self, columns: &[String]) -> Option<String> {
        Some(format!(" RETURNING {}", columns.join(", ")))
    }
}
