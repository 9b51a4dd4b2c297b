use crate::ast::{DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

pub struct PostgresGenerator;

impl Default for PostgresGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PostgresGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SqlGenerator for PostgresGenerator {
    fn name(&self) -> &'static str {
        "postgres"
    }

    // Unquoted identifiers fold to lower case.
    fn format_table_name(&self, name: &str) -> String {
        self.escape_identifier_if_needed(&name.to_lowercase())
    }

    fn format_column_name(&self, name: &str) -> String {
        self.escape_identifier_if_needed(&name.to_lowercase())
    }

    fn max_identifier_length(&self) -> usize {
        63
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
        let hex: String = v.iter().map(|b| format!("{:02x}", b)).collect();
        format!("'\\x{}'::bytea", hex)
    }

    fn supports_regex(&self) -> bool {
        true
    }

    fn regex_match(&self, value: &str, pattern: &str) -> String {
        format!("{} ~ {}", value, pattern)
    }

    fn supports_hyperbolic(&self) -> bool {
        true
    }

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("CAST({} AS TEXT)", a)
    }

    fn day_of_week(&self, a: &str) -> String {
        format!("(EXTRACT(DOW FROM {}) + 1)", a)
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
        let epoch = format!("EXTRACT(EPOCH FROM ({} - {}))", end, start);
        Ok(match unit {
            DateUnit::Year => format!("DATE_PART('year', AGE({}, {}))", end, start),
            DateUnit::Month => format!(
                "(DATE_PART('year', AGE({e}, {s})) * 12 + DATE_PART('month', AGE({e}, {s})))",
                e = end,
                s = start
            ),
            DateUnit::Week => format!("FLOOR(DATE_PART('day', {} - {}) / 7)", end, start),
            DateUnit::Day => format!("DATE_PART('day', {} - {})", end, start),
            DateUnit::Hour => format!("FLOOR({} / 3600)", epoch),
            DateUnit::Minute => format!("FLOOR({} / 60)", epoch),
            DateUnit::Second => epoch,
        })
    }

    fn end_of_month(&self, a: &str) -> CompileResult<String> {
        Ok(format!(
            "(DATE_TRUNC('month', {}) + INTERVAL '1 month' - INTERVAL '1 day')",
            a
        ))
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("DATE_TRUNC('day', {})", a)
    }

    fn supports_date_repeat(&self) -> bool {
        true
    }

    fn supports_geometry(&self) -> bool {
        true
    }

    fn supports_groups_frame(&self) -> bool {
        true
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Null | ValueType::String => "TEXT",
            ValueType::Number | ValueType::Duration => "DOUBLE PRECISION",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "TIMESTAMP",
            ValueType::Boolean => "BOOLEAN",
            ValueType::DateRepeat => "INTERVAL",
            ValueType::Point => "GEOMETRY(POINT)",
            ValueType::Line => "GEOMETRY(LINESTRING)",
            ValueType::Polygon => "GEOMETRY(POLYGON)",
            ValueType::Bytes => "BYTEA",
        }
        .to_string()
    }

    fn autoincrement_type(&self) -> String {
        "BIGSERIAL".to_string()
    }

    fn autoincrement_suffix(&self) -> &'static str {
        ""
    }

    fn returning_clause(&self, columns: &[String]) -> Option<String> {
        Some(format!(" RETURNING {}", columns.join(", ")))
    }
}
