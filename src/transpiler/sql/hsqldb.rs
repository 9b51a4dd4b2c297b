use crate::ast::{DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

/// HyperSQL 2.x.
pub struct HsqldbGenerator;

fn field(unit: DateUnit) -> &'static str {
    match unit {
        DateUnit::Year => "'yy'",
        DateUnit::Month => "'mm'",
        DateUnit::Week | DateUnit::Day => "'dd'",
        DateUnit::Hour => "'hh'",
        DateUnit::Minute => "'mi'",
        DateUnit::Second => "'ss'",
    }
}

impl SqlGenerator for HsqldbGenerator {
    fn name(&self) -> &'static str {
        "hsqldb"
    }

    fn supports_regex(&self) -> bool {
        true
    }

    fn regex_match(&self, value: &str, pattern: &str) -> String {
        format!("REGEXP_MATCHES({}, {})", value, pattern)
    }

    fn random(&self) -> String {
        "RAND()".to_string()
    }

    fn to_number(&self, a: &str) -> String {
        format!("CAST({} AS DOUBLE)", a)
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!("DATEADD({}, {}, {})", field(unit), amount, date)
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        Ok(match unit {
            DateUnit::Second => format!("DATEDIFF('ms', {}, {}) / 1000.0", start, end),
            _ => format!("DATEDIFF({}, {}, {})", field(unit), start, end),
        })
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("TRUNC({}, 'DD')", a)
    }

    fn supports_window_functions(&self) -> bool {
        false
    }

    fn select_without_from_suffix(&self) -> Option<&'static str> {
        Some(" FROM (VALUES(0))")
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Number | ValueType::Duration => "DOUBLE",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "TIMESTAMP",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Bytes => "VARBINARY(16M)",
            _ => "VARCHAR(4000)",
        }
        .to_string()
    }

    fn generated_key_query(&self, _table: &str, _column: &str) -> Option<String> {
        Some("CALL IDENTITY()".to_string())
    }
}
