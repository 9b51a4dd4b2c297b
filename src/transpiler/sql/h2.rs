use crate::ast::{DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

pub struct H2Generator;

impl SqlGenerator for H2Generator {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn supports_regex(&self) -> bool {
        true
    }

    fn regex_match(&self, value: &str, pattern: &str) -> String {
        format!("REGEXP_LIKE({}, {})", value, pattern)
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

    fn day_of_week(&self, a: &str) -> String {
        format!("MOD(ISO_DAY_OF_WEEK({}), 7) + 1", a)
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!("DATEADD({}, {}, {})", unit.keyword(), amount, date)
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        Ok(match unit {
            DateUnit::Second => format!("DATEDIFF(MILLISECOND, {}, {}) / 1000.0", start, end),
            _ => format!("DATEDIFF({}, {}, {})", unit.keyword(), start, end),
        })
    }

    fn end_of_month(&self, a: &str) -> CompileResult<String> {
        Ok(format!(
            "DATEADD(DAY, -1, DATEADD(MONTH, 1, DATE_TRUNC(MONTH, {})))",
            a
        ))
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("DATE_TRUNC(DAY, {})", a)
    }

    fn supports_geometry(&self) -> bool {
        true
    }

    fn supports_groups_frame(&self) -> bool {
        true
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Number | ValueType::Duration => "DOUBLE PRECISION",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "TIMESTAMP",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Bytes => "VARBINARY",
            ValueType::Point | ValueType::Line | ValueType::Polygon => "GEOMETRY",
            _ => "VARCHAR(4000)",
        }
        .to_string()
    }
}
