use crate::ast::{DateUnit, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

/// Oracle. `legacy` selects the pre-12c rules: 30 character identifiers,
/// ROWNUM paging and no identity columns.
pub struct OracleGenerator {
    legacy: bool,
}

impl OracleGenerator {
    pub const fn new() -> Self {
        Self { legacy: false }
    }

    pub const fn legacy() -> Self {
        Self { legacy: true }
    }
}

impl Default for OracleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

impl SqlGenerator for OracleGenerator {
    fn name(&self) -> &'static str {
        if self.legacy { "oracle11" } else { "oracle12" }
    }

    fn max_identifier_length(&self) -> usize {
        if self.legacy { 30 } else { 128 }
    }

    fn typed_null(&self, value_type: ValueType) -> String {
        format!("CAST(NULL AS {})", self.sql_type(value_type))
    }

    fn empty_string_is_null(&self) -> bool {
        true
    }

    fn supports_boolean_type(&self) -> bool {
        false
    }

    fn bytes_literal(&self, v: &[u8]) -> String {
        format!("HEXTORAW('{}')", hex(v))
    }

    fn geometry_literal(&self, wkt: &str) -> String {
        format!("SDO_GEOMETRY({})", self.string_literal(wkt))
    }

    fn max_in_list_size(&self) -> Option<usize> {
        Some(1000)
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

    // NUMBER division keeps the fraction.
    fn integer_to_number(&self, a: &str) -> String {
        a.to_string()
    }

    fn log10(&self, a: &str) -> String {
        format!("LOG(10, {})", a)
    }

    fn supports_cot(&self) -> bool {
        false
    }

    fn supports_hyperbolic(&self) -> bool {
        true
    }

    fn supports_degrees(&self) -> bool {
        false
    }

    fn supports_pi(&self) -> bool {
        false
    }

    fn random(&self) -> String {
        "DBMS_RANDOM.VALUE".to_string()
    }

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("TO_CHAR({})", a)
    }

    fn to_number(&self, a: &str) -> String {
        format!("TO_NUMBER({})", a)
    }

    fn to_integer(&self, a: &str) -> String {
        format!("TRUNC(TO_NUMBER({}))", a)
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
        "SYSTIMESTAMP".to_string()
    }

    fn day_of_week(&self, a: &str) -> String {
        format!("MOD(MOD(TRUNC({}) - DATE '1970-01-04', 7) + 7, 7) + 1", a)
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        match unit {
            DateUnit::Year => format!("ADD_MONTHS({}, ({}) * 12)", date, amount),
            DateUnit::Month => format!("ADD_MONTHS({}, {})", date, amount),
            _ => format!(
                "{} + NUMTODSINTERVAL({}, '{}')",
                date,
                amount,
                unit.keyword()
            ),
        }
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        let days = format!("(CAST({} AS DATE) - CAST({} AS DATE))", end, start);
        Ok(match unit {
            DateUnit::Year => format!("TRUNC(MONTHS_BETWEEN({}, {}) / 12)", end, start),
            DateUnit::Month => format!("TRUNC(MONTHS_BETWEEN({}, {}))", end, start),
            DateUnit::Week => format!("TRUNC({} / 7)", days),
            DateUnit::Day => format!("TRUNC({})", days),
            DateUnit::Hour => format!("TRUNC({} * 24)", days),
            DateUnit::Minute => format!("TRUNC({} * 1440)", days),
            DateUnit::Second => format!("{} * 86400", days),
        })
    }

    fn end_of_month(&self, a: &str) -> CompileResult<String> {
        Ok(format!("TRUNC(LAST_DAY({}))", a))
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("TRUNC({})", a)
    }

    fn placeholder(&self, index: usize) -> String {
        format!(":{}", index)
    }

    fn limit_offset(&self, limit: Option<usize>, offset: Option<usize>) -> String {
        if self.legacy {
            return String::new();
        }
        let mut sql = String::new();
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {} ROWS", n));
        }
        if let Some(n) = limit {
            sql.push_str(&format!(" FETCH FIRST {} ROWS ONLY", n));
        }
        sql
    }

    fn limit_in_where(&self, limit: Option<usize>) -> Option<String> {
        match (self.legacy, limit) {
            (true, Some(n)) => Some(format!("ROWNUM <= {}", n)),
            _ => None,
        }
    }

    fn supports_offset(&self) -> bool {
        !self.legacy
    }

    fn select_without_from_suffix(&self) -> Option<&'static str> {
        Some(" FROM DUAL")
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Null | ValueType::String => "VARCHAR2(4000)",
            ValueType::Number | ValueType::Duration => "NUMBER",
            ValueType::Integer => "NUMBER(19)",
            ValueType::Date => "TIMESTAMP",
            ValueType::Boolean => "NUMBER(1)",
            ValueType::DateRepeat => "VARCHAR2(64)",
            ValueType::Point | ValueType::Line | ValueType::Polygon => "SDO_GEOMETRY",
            ValueType::Bytes => "BLOB",
        }
        .to_string()
    }

    fn autoincrement_suffix(&self) -> &'static str {
        if self.legacy {
            ""
        } else {
            " GENERATED BY DEFAULT AS IDENTITY"
        }
    }

    fn supports_drop_if_exists(&self) -> bool {
        false
    }

    fn supports_generated_keys(&self) -> bool {
        !self.legacy
    }
}
