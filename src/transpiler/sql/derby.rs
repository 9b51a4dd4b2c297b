use chrono::NaiveDateTime;

use crate::ast::{AggregateFunc, DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

/// Apache Derby.
pub struct DerbyGenerator;

fn interval(unit: DateUnit) -> &'static str {
    match unit {
        DateUnit::Year => "SQL_TSI_YEAR",
        DateUnit::Month => "SQL_TSI_MONTH",
        DateUnit::Week => "SQL_TSI_WEEK",
        DateUnit::Day => "SQL_TSI_DAY",
        DateUnit::Hour => "SQL_TSI_HOUR",
        DateUnit::Minute => "SQL_TSI_MINUTE",
        DateUnit::Second => "SQL_TSI_SECOND",
    }
}

impl SqlGenerator for DerbyGenerator {
    fn name(&self) -> &'static str {
        "derby"
    }

    fn typed_null(&self, value_type: ValueType) -> String {
        format!("CAST(NULL AS {})", self.sql_type(value_type))
    }

    fn date_literal(&self, v: &NaiveDateTime) -> String {
        format!("TIMESTAMP('{}')", v.format("%Y-%m-%d %H:%M:%S%.3f"))
    }

    // Predicates cannot be selected.
    fn supports_boolean_type(&self) -> bool {
        false
    }

    fn supports_bitwise_and(&self) -> bool {
        false
    }

    fn integer_to_number(&self, a: &str) -> String {
        format!("CAST({} AS DOUBLE)", a)
    }

    fn supports_round(&self) -> bool {
        false
    }

    fn round_to(&self, a: &str, places: &str) -> String {
        format!(
            "FLOOR({} * EXP({} * LN(10)) + 0.5) / EXP({} * LN(10))",
            a, places, places
        )
    }

    fn truncate(&self, a: &str) -> String {
        format!("CAST({} AS BIGINT)", a)
    }

    fn power(&self, a: &str, b: &str) -> String {
        format!("EXP({} * LN({}))", b, a)
    }

    fn supports_greatest_least(&self) -> bool {
        false
    }

    fn to_string_value(&self, a: &str, from: ValueType) -> String {
        match from {
            ValueType::String => a.to_string(),
            _ => format!("TRIM(CAST({} AS CHAR(254)))", a),
        }
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

    fn date_part(&self, unit: DateUnit, a: &str) -> String {
        match unit {
            DateUnit::Week => format!("{{fn WEEK({})}}", a),
            _ => format!("{}({})", unit.keyword(), a),
        }
    }

    // 1970-01-04 was a Sunday.
    fn day_of_week(&self, a: &str) -> String {
        format!(
            "MOD(MOD({{fn TIMESTAMPDIFF(SQL_TSI_DAY, TIMESTAMP('1970-01-04 00:00:00'), {})}}, 7) + 7, 7) + 1",
            a
        )
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!(
            "{{fn TIMESTAMPADD({}, CAST({} AS INTEGER), {})}}",
            interval(unit),
            amount,
            date
        )
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        Ok(match unit {
            DateUnit::Second => format!(
                "{{fn TIMESTAMPDIFF(SQL_TSI_FRAC_SECOND, {}, {})}} / 1000000000.0",
                start, end
            ),
            _ => format!(
                "{{fn TIMESTAMPDIFF({}, {}, {})}}",
                interval(unit),
                start,
                end
            ),
        })
    }

    fn end_of_month(&self, a: &str) -> CompileResult<String> {
        let first = format!("{{fn TIMESTAMPADD(SQL_TSI_DAY, 1 - DAY({}), {})}}", a, a);
        let next = format!("{{fn TIMESTAMPADD(SQL_TSI_MONTH, 1, {})}}", first);
        let last = format!("{{fn TIMESTAMPADD(SQL_TSI_DAY, -1, {})}}", next);
        Ok(self.start_of_day(&last))
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("TIMESTAMP(DATE({}), '00:00:00')", a)
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

    fn supports_window_functions(&self) -> bool {
        false
    }

    fn select_without_from_suffix(&self) -> Option<&'static str> {
        Some(" FROM SYSIBM.SYSDUMMY1")
    }

    fn supports_full_outer_join(&self) -> bool {
        false
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
