use crate::ast::{DateUnit, GeometryBound, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

pub struct MysqlGenerator;

/// Corner of `ST_Envelope` holding a bounding box edge.
pub(crate) fn envelope_bound(bound: GeometryBound, a: &str) -> String {
    let (axis, corner) = match bound {
        GeometryBound::MinX => ("ST_X", 1),
        GeometryBound::MaxX => ("ST_X", 3),
        GeometryBound::MinY => ("ST_Y", 1),
        GeometryBound::MaxY => ("ST_Y", 3),
    };
    format!(
        "{}(ST_PointN(ST_ExteriorRing(ST_Envelope({})), {}))",
        axis, a, corner
    )
}

impl SqlGenerator for MysqlGenerator {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("`{}`", id.replace('`', "``"))
    }

    fn max_identifier_length(&self) -> usize {
        64
    }

    fn escape_string(&self, s: &str) -> String {
        s.replace('\\', "\\\\").replace('\'', "''")
    }

    fn limit_offset(&self, limit: Option<usize>, offset: Option<usize>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!(" LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!(" LIMIT {}", l),
            // OFFSET needs a LIMIT.
            (None, Some(o)) => format!(" LIMIT 18446744073709551615 OFFSET {}", o),
            (None, None) => String::new(),
        }
    }

    fn supports_regex(&self) -> bool {
        true
    }

    fn regex_match(&self, value: &str, pattern: &str) -> String {
        format!("{} REGEXP {}", value, pattern)
    }

    // `/` already yields a decimal.
    fn integer_to_number(&self, a: &str) -> String {
        a.to_string()
    }

    fn truncate(&self, a: &str) -> String {
        format!("TRUNCATE({}, 0)", a)
    }

    fn random(&self) -> String {
        "RAND()".to_string()
    }

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("CAST({} AS CHAR)", a)
    }

    fn to_number(&self, a: &str) -> String {
        format!("CAST({} AS DOUBLE)", a)
    }

    fn to_integer(&self, a: &str) -> String {
        format!("CAST({} AS SIGNED)", a)
    }

    fn position(&self, haystack: &str, needle: &str) -> String {
        format!("LOCATE({}, {})", needle, haystack)
    }

    fn concat(&self, parts: &[String]) -> String {
        format!("CONCAT({})", parts.join(", "))
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!("DATE_ADD({}, INTERVAL {} {})", date, amount, unit.keyword())
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        Ok(match unit {
            DateUnit::Second => format!("TIMESTAMPDIFF(MICROSECOND, {}, {}) / 1000000", start, end),
            _ => format!("TIMESTAMPDIFF({}, {}, {})", unit.keyword(), start, end),
        })
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("CAST(DATE({}) AS DATETIME)", a)
    }

    fn supports_geometry(&self) -> bool {
        true
    }

    fn make_point(&self, x: &str, y: &str) -> String {
        format!("POINT({}, {})", x, y)
    }

    fn geometry_bound(&self, bound: GeometryBound, a: &str) -> String {
        envelope_bound(bound, a)
    }

    fn supports_nulls_ordering(&self) -> bool {
        false
    }

    fn supports_full_outer_join(&self) -> bool {
        false
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Null | ValueType::String => "VARCHAR(4000)",
            ValueType::Number | ValueType::Duration => "DOUBLE",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "DATETIME(3)",
            ValueType::Boolean => "BOOLEAN",
            ValueType::DateRepeat => "VARCHAR(64)",
            ValueType::Point => "POINT",
            ValueType::Line => "LINESTRING",
            ValueType::Polygon => "POLYGON",
            ValueType::Bytes => "LONGBLOB",
        }
        .to_string()
    }

    fn autoincrement_suffix(&self) -> &'static str {
        " AUTO_INCREMENT"
    }

    fn generated_key_query(&self, _table: &str, _column: &str) -> Option<String> {
        Some("SELECT LAST_INSERT_ID()".to_string())
    }
}
