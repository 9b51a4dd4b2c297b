use chrono::NaiveDateTime;

use crate::ast::{AggregateFunc, DateUnit, GeometryBound, ValueType};
use crate::error::CompileResult;
use crate::transpiler::traits::SqlGenerator;

pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("[{}]", id.replace(']', "]]"))
    }

    fn supports_boolean_type(&self) -> bool {
        false
    }

    fn string_literal(&self, s: &str) -> String {
        format!("N'{}'", self.escape_string(s))
    }

    fn date_literal(&self, v: &NaiveDateTime) -> String {
        format!("CAST('{}' AS DATETIME2)", v.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }

    fn bytes_literal(&self, v: &[u8]) -> String {
        let hex: String = v.iter().map(|b| format!("{:02X}", b)).collect();
        format!("0x{}", hex)
    }

    fn geometry_literal(&self, wkt: &str) -> String {
        format!("geometry::STGeomFromText({}, 0)", self.string_literal(wkt))
    }

    fn supports_modulus_function(&self) -> bool {
        false
    }

    fn integer_to_number(&self, a: &str) -> String {
        format!("CAST({} AS FLOAT)", a)
    }

    fn ceil(&self, a: &str) -> String {
        format!("CEILING({})", a)
    }

    fn truncate(&self, a: &str) -> String {
        format!("ROUND({}, 0, 1)", a)
    }

    fn ln(&self, a: &str) -> String {
        format!("LOG({})", a)
    }

    fn atan2(&self, y: &str, x: &str) -> String {
        format!("ATN2({}, {})", y, x)
    }

    fn random(&self) -> String {
        "RAND()".to_string()
    }

    fn supports_greatest_least(&self) -> bool {
        false
    }

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("CAST({} AS NVARCHAR(4000))", a)
    }

    fn to_number(&self, a: &str) -> String {
        format!("CAST({} AS FLOAT)", a)
    }

    fn length(&self, a: &str) -> String {
        format!("LEN({})", a)
    }

    fn substring(&self, a: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTRING({}, {}, {})", a, start, len),
            None => format!("SUBSTRING({}, {}, LEN({}))", a, start, a),
        }
    }

    fn position(&self, haystack: &str, needle: &str) -> String {
        format!("CHARINDEX({}, {})", needle, haystack)
    }

    fn concat(&self, parts: &[String]) -> String {
        parts.join(" + ")
    }

    fn current_date(&self) -> String {
        "CAST(GETDATE() AS DATE)".to_string()
    }

    fn current_timestamp(&self) -> String {
        "SYSDATETIME()".to_string()
    }

    fn date_part(&self, unit: DateUnit, a: &str) -> String {
        match unit {
            DateUnit::Second => format!(
                "(DATEPART(SECOND, {}) + DATEPART(NANOSECOND, {}) / 1000000000.0)",
                a, a
            ),
            _ => format!("DATEPART({}, {})", unit.keyword(), a),
        }
    }

    // 1900-01-07 was a Sunday; independent of DATEFIRST.
    fn day_of_week(&self, a: &str) -> String {
        format!("(DATEDIFF(DAY, '19000107', {}) % 7 + 7) % 7 + 1", a)
    }

    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!("DATEADD({}, {}, {})", unit.keyword(), amount, date)
    }

    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        Ok(match unit {
            DateUnit::Second => format!("DATEDIFF_BIG(MILLISECOND, {}, {}) / 1000.0", start, end),
            _ => format!("DATEDIFF({}, {}, {})", unit.keyword(), start, end),
        })
    }

    fn end_of_month(&self, a: &str) -> CompileResult<String> {
        Ok(format!("CAST(EOMONTH({}) AS DATETIME2)", a))
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("CAST(CAST({} AS DATE) AS DATETIME2)", a)
    }

    fn supports_geometry(&self) -> bool {
        true
    }

    fn make_point(&self, x: &str, y: &str) -> String {
        format!("geometry::Point({}, {}, 0)", x, y)
    }

    fn point_x(&self, p: &str) -> String {
        format!("{}.STX", p)
    }

    fn point_y(&self, p: &str) -> String {
        format!("{}.STY", p)
    }

    fn distance(&self, a: &str, b: &str) -> String {
        format!("{}.STDistance({})", a, b)
    }

    fn geometry_equals(&self, a: &str, b: &str) -> String {
        format!("{}.STEquals({}) = 1", a, b)
    }

    fn contains(&self, a: &str, b: &str) -> String {
        format!("{}.STContains({}) = 1", a, b)
    }

    fn intersects(&self, a: &str, b: &str) -> String {
        format!("{}.STIntersects({}) = 1", a, b)
    }

    fn area(&self, a: &str) -> String {
        format!("{}.STArea()", a)
    }

    fn line_length(&self, a: &str) -> String {
        format!("{}.STLength()", a)
    }

    fn geometry_bound(&self, bound: GeometryBound, a: &str) -> String {
        let (corner, axis) = match bound {
            GeometryBound::MinX => (1, "STX"),
            GeometryBound::MaxX => (3, "STX"),
            GeometryBound::MinY => (1, "STY"),
            GeometryBound::MaxY => (3, "STY"),
        };
        format!("{}.STEnvelope().STPointN({}).{}", a, corner, axis)
    }

    fn as_text(&self, a: &str) -> String {
        format!("{}.STAsText()", a)
    }

    fn aggregate_name(&self, func: AggregateFunc) -> &'static str {
        match func {
            AggregateFunc::StdDevPop => "STDEVP",
            AggregateFunc::StdDevSamp => "STDEV",
            AggregateFunc::VarPop => "VARP",
            AggregateFunc::VarSamp => "VAR",
            other => other.name(),
        }
    }

    fn window_constant_order(&self) -> String {
        "(SELECT NULL)".to_string()
    }

    fn supports_nulls_ordering(&self) -> bool {
        false
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@p{}", index)
    }

    /// OFFSET/FETCH when skipping rows, TOP otherwise.
    fn limit_offset(&self, limit: Option<usize>, offset: Option<usize>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!(" OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", o, l),
            (None, Some(o)) => format!(" OFFSET {} ROWS", o),
            _ => String::new(),
        }
    }

    fn limit_in_select(&self, limit: Option<usize>, offset: Option<usize>) -> Option<String> {
        match (limit, offset) {
            (Some(l), None) => Some(format!("TOP {}", l)),
            _ => None,
        }
    }

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Null | ValueType::String => "NVARCHAR(4000)",
            ValueType::Number | ValueType::Duration => "FLOAT",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "DATETIME2",
            ValueType::Boolean => "BIT",
            ValueType::DateRepeat => "NVARCHAR(64)",
            ValueType::Point | ValueType::Line | ValueType::Polygon => "geometry",
            ValueType::Bytes => "VARBINARY(MAX)",
        }
        .to_string()
    }

    fn autoincrement_suffix(&self) -> &'static str {
        " IDENTITY(1,1)"
    }

    fn generated_key_query(&self, _table: &str, _column: &str) -> Option<String> {
        Some("SELECT SCOPE_IDENTITY()".to_string())
    }
}
