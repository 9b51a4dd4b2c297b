use crate::ast::{DateUnit, ValueType};
use crate::transpiler::traits::SqlGenerator;

/// Amazon Redshift: a Postgres 8 descendant with its own date functions.
pub struct RedshiftGenerator;

impl SqlGenerator for RedshiftGenerator {
    fn name(&self) -> &'static str {
        "redshift"
    }

    fn format_table_name(&self, name: &str) -> String {
        self.escape_identifier_if_needed(&name.to_lowercase())
    }

    fn format_column_name(&self, name: &str) -> String {
        self.escape_identifier_if_needed(&name.to_lowercase())
    }

    fn max_identifier_length(&self) -> usize {
        127
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
        format!("FROM_HEX('{}')", hex)
    }

    fn supports_regex(&self) -> bool {
        true
    }

    fn regex_match(&self, value: &str, pattern: &str) -> String {
        format!("{} ~ {}", value, pattern)
    }

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("CAST({} AS VARCHAR(65535))", a)
    }

    fn day_of_week(&self, a: &str) -> String {
        format!("(DATE_PART(dow, {}) + 1)", a)
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!(
            "DATEADD({}, {}, {})",
            unit.keyword().to_lowercase(),
            amount,
            date
        )
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("DATE_TRUNC('day', {})", a)
    }

    fn supports_geometry(&self) -> bool {
        true
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Null | ValueType::String => "VARCHAR(65535)",
            ValueType::Number | ValueType::Duration => "DOUBLE PRECISION",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "TIMESTAMP",
            ValueType::Boolean => "BOOLEAN",
            ValueType::DateRepeat => "VARCHAR(64)",
            ValueType::Point | ValueType::Line | ValueType::Polygon => "GEOMETRY",
            ValueType::Bytes => "VARBYTE",
        }
        .to_string()
    }

    fn autoincrement_suffix(&self) -> &'static str {
        " IDENTITY(1,1)"
    }

    fn supports_generated_keys(&self) -> bool {
        false
    }
}
