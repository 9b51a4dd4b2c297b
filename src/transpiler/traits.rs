//! The dialect hook surface and identifier helpers.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::ast::repeat::DateRepeat;
use crate::ast::window::{NullsOrder, SortDirection};
use crate::ast::{AggregateFunc, CompareOp, DateUnit, GeometryBound, ValueType};
use crate::error::{CompileError, CompileResult};
use crate::typed::RowDef;

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "all", "alter", "and", "as", "between", "by", "case", "check", "column", "constraint",
    "create", "cross", "current", "date", "default", "delete", "distinct", "drop", "else", "end",
    "exists", "false", "for", "foreign", "from", "full", "group", "having", "in", "index",
    "inner", "insert", "intersect", "into", "is", "join", "key", "left", "like", "limit",
    "not", "null", "offset", "on", "or", "order", "outer", "primary", "references", "right",
    "row", "rows", "select", "set", "table", "then", "to", "true", "union", "unique", "update",
    "user", "values", "when", "where", "window", "with",
];

/// Whether `name` must be quoted to be used as an identifier.
pub fn needs_quoting(name: &str) -> bool {
    let lower = name.to_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
        || name.is_empty()
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().is_some_and(|c| c.is_numeric())
}

/// Java's `String.hashCode`, which seeds default table aliases.
pub fn java_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

/// Emit an ANSI `'...'` string literal, doubling single quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Trait for dialect-specific SQL generation.
///
/// Every hook has an ANSI default; a dialect overrides only where it
/// diverges. Hooks receive already rendered SQL fragments. Capability flags
/// (`supports_*`) decide whether the compiler calls a hook or composes an
/// equivalent from other hooks.
pub trait SqlGenerator: Send + Sync {
    /// Canonical lower-case dialect name, used in error messages.
    fn name(&self) -> &'static str;

    // ---- identifiers -------------------------------------------------

    /// Quote an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Quote only reserved words and names with special characters.
    fn escape_identifier_if_needed(&self, name: &str) -> String {
        if needs_quoting(name) {
            self.quote_identifier(name)
        } else {
            name.to_string()
        }
    }

    fn format_table_name(&self, name: &str) -> String {
        self.escape_identifier_if_needed(name)
    }

    fn format_column_name(&self, name: &str) -> String {
        self.escape_identifier_if_needed(name)
    }

    fn max_identifier_length(&self) -> usize {
        128
    }

    /// Truncate to the identifier limit, then escape.
    fn format_table_alias(&self, alias: &str) -> String {
        let truncated: String = alias.chars().take(self.max_identifier_length()).collect();
        self.escape_identifier_if_needed(&truncated)
    }

    /// The alias a row is referenced by.
    ///
    /// An explicit alias is used as given; otherwise the alias is `_` plus
    /// the hash of the row's alias seed, with `-` replaced by `_`.
    fn table_alias(&self, row: &RowDef) -> String {
        let alias = match row.alias() {
            Some(a) => a.to_string(),
            None => format!("_{}", java_hash(row.alias_seed())).replace('-', "_"),
        };
        self.format_table_alias(&alias)
    }

    fn table_and_column(&self, table: &str, column: &str) -> String {
        format!("{}.{}", table, column)
    }

    fn table_alias_separator(&self) -> &'static str {
        " "
    }

    /// `table alias` as it appears in FROM and JOIN.
    fn from_clause_entry(&self, row: &RowDef) -> String {
        format!(
            "{}{}{}",
            self.format_table_name(row.table_name()),
            self.table_alias_separator(),
            self.table_alias(row)
        )
    }

    // ---- literals ----------------------------------------------------

    fn null_literal(&self) -> String {
        "NULL".to_string()
    }

    /// A NULL where the database needs to know its type.
    fn typed_null(&self, _value_type: ValueType) -> String {
        self.null_literal()
    }

    fn escape_string(&self, s: &str) -> String {
        s.replace('\'', "''")
    }

    fn string_literal(&self, s: &str) -> String {
        format!("'{}'", self.escape_string(s))
    }

    /// `''` is stored as NULL (Oracle).
    fn empty_string_is_null(&self) -> bool {
        false
    }

    fn integer_literal(&self, v: i64) -> String {
        v.to_string()
    }

    /// Finite values only; the compiler rejects NaN and infinities first.
    fn number_literal(&self, v: f64) -> String {
        if v.fract() == 0.0 && v.abs() < 1e15 {
            format!("{:.1}", v)
        } else {
            v.to_string()
        }
    }

    fn decimal_literal(&self, v: &Decimal) -> String {
        v.normalize().to_string()
    }

    fn supports_boolean_type(&self) -> bool {
        true
    }

    /// Get the boolean literal (TRUE/FALSE vs 1/0).
    fn bool_literal(&self, val: bool) -> String {
        match (self.supports_boolean_type(), val) {
            (true, true) => "TRUE".to_string(),
            (true, false) => "FALSE".to_string(),
            (false, true) => "1".to_string(),
            (false, false) => "0".to_string(),
        }
    }

    /// Turn a predicate into a value, for dialects where they differ.
    fn boolean_as_value(&self, predicate: &str) -> String {
        if self.supports_boolean_type() {
            predicate.to_string()
        } else {
            format!("CASE WHEN {} THEN 1 ELSE 0 END", predicate)
        }
    }

    /// Turn a boolean value into a predicate.
    fn boolean_as_condition(&self, value: &str) -> String {
        if self.supports_boolean_type() {
            value.to_string()
        } else {
            format!("{} = 1", value)
        }
    }

    fn true_operation(&self) -> String {
        "(1=1)".to_string()
    }

    fn false_operation(&self) -> String {
        "(1=0)".to_string()
    }

    fn date_literal(&self, v: &NaiveDateTime) -> String {
        format!("TIMESTAMP '{}'", v.format("%Y-%m-%d %H:%M:%S%.3f"))
    }

    fn bytes_literal(&self, v: &[u8]) -> String {
        format!("X'{}'", hex(v))
    }

    fn date_repeat_literal(&self, v: &DateRepeat) -> CompileResult<String> {
        v.validate()?;
        Ok(format!(
            "INTERVAL '{} years {} mons {} days {} hours {} mins {} secs'",
            v.years, v.months, v.days, v.hours, v.minutes, v.seconds
        ))
    }

    /// Durations travel as a number of seconds.
    fn duration_literal(&self, seconds: &Decimal) -> String {
        self.decimal_literal(seconds)
    }

    fn geometry_literal(&self, wkt: &str) -> String {
        format!("ST_GeomFromText({})", quote_string(wkt))
    }

    // ---- comparison and logic ----------------------------------------

    fn compare_operator(&self, op: CompareOp) -> &'static str {
        match op {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    fn and_keyword(&self) -> &'static str {
        "AND"
    }

    fn or_keyword(&self) -> &'static str {
        "OR"
    }

    fn not(&self, condition: &str) -> String {
        format!("NOT ({})", condition)
    }

    fn is_null(&self, value: &str) -> String {
        format!("{} IS NULL", value)
    }

    fn is_not_null(&self, value: &str) -> String {
        format!("{} IS NOT NULL", value)
    }

    fn in_list(&self, value: &str, items: &[String]) -> String {
        format!("{} IN ({})", value, items.join(", "))
    }

    /// Longest IN list the database accepts; longer lists are split.
    fn max_in_list_size(&self) -> Option<usize> {
        None
    }

    fn supports_between(&self) -> bool {
        true
    }

    fn between(&self, value: &str, low: &str, high: &str) -> String {
        format!("{} BETWEEN {} AND {}", value, low, high)
    }

    fn like(&self, value: &str, pattern: &str) -> String {
        format!("{} LIKE {}", value, pattern)
    }

    fn supports_regex(&self) -> bool {
        false
    }

    fn regex_match(&self, value: &str, pattern: &str) -> String {
        format!("{} SIMILAR TO {}", value, pattern)
    }

    fn exists(&self, subquery: &str) -> String {
        format!("EXISTS ({})", subquery)
    }

    fn supports_bitwise_and(&self) -> bool {
        true
    }

    fn bitwise_and(&self, a: &str, b: &str) -> String {
        format!("{} & {}", a, b)
    }

    // ---- arithmetic --------------------------------------------------

    fn add(&self, a: &str, b: &str) -> String {
        format!("{} + {}", a, b)
    }

    fn subtract(&self, a: &str, b: &str) -> String {
        format!("{} - {}", a, b)
    }

    fn multiply(&self, a: &str, b: &str) -> String {
        format!("{} * {}", a, b)
    }

    fn divide(&self, a: &str, b: &str) -> String {
        format!("{} / {}", a, b)
    }

    fn negate(&self, a: &str) -> String {
        format!("-{}", a)
    }

    /// MOD(a, b) rather than `a % b`.
    fn supports_modulus_function(&self) -> bool {
        true
    }

    fn modulus_function(&self, a: &str, b: &str) -> String {
        format!("MOD({}, {})", a, b)
    }

    fn modulus_operator(&self, a: &str, b: &str) -> String {
        format!("{} % {}", a, b)
    }

    /// Widen an integer so division keeps the fraction.
    fn integer_to_number(&self, a: &str) -> String {
        format!("CAST({} AS DOUBLE PRECISION)", a)
    }

    // ---- math --------------------------------------------------------

    fn abs(&self, a: &str) -> String {
        format!("ABS({})", a)
    }

    fn sign(&self, a: &str) -> String {
        format!("SIGN({})", a)
    }

    fn ceil(&self, a: &str) -> String {
        format!("CEIL({})", a)
    }

    fn floor(&self, a: &str) -> String {
        format!("FLOOR({})", a)
    }

    fn supports_round(&self) -> bool {
        true
    }

    fn round(&self, a: &str) -> String {
        format!("ROUND({})", a)
    }

    fn round_to(&self, a: &str, places: &str) -> String {
        format!("ROUND({}, {})", a, places)
    }

    fn truncate(&self, a: &str) -> String {
        format!("TRUNC({})", a)
    }

    fn sqrt(&self, a: &str) -> String {
        format!("SQRT({})", a)
    }

    fn power(&self, a: &str, b: &str) -> String {
        format!("POWER({}, {})", a, b)
    }

    fn exp(&self, a: &str) -> String {
        format!("EXP({})", a)
    }

    fn ln(&self, a: &str) -> String {
        format!("LN({})", a)
    }

    fn log10(&self, a: &str) -> String {
        format!("LOG10({})", a)
    }

    fn sin(&self, a: &str) -> String {
        format!("SIN({})", a)
    }

    fn cos(&self, a: &str) -> String {
        format!("COS({})", a)
    }

    fn tan(&self, a: &str) -> String {
        format!("TAN({})", a)
    }

    fn asin(&self, a: &str) -> String {
        format!("ASIN({})", a)
    }

    fn acos(&self, a: &str) -> String {
        format!("ACOS({})", a)
    }

    fn atan(&self, a: &str) -> String {
        format!("ATAN({})", a)
    }

    fn atan2(&self, y: &str, x: &str) -> String {
        format!("ATAN2({}, {})", y, x)
    }

    fn supports_cot(&self) -> bool {
        true
    }

    fn cot(&self, a: &str) -> String {
        format!("COT({})", a)
    }

    fn supports_hyperbolic(&self) -> bool {
        false
    }

    fn sinh(&self, a: &str) -> String {
        format!("SINH({})", a)
    }

    fn cosh(&self, a: &str) -> String {
        format!("COSH({})", a)
    }

    fn tanh(&self, a: &str) -> String {
        format!("TANH({})", a)
    }

    fn supports_degrees(&self) -> bool {
        true
    }

    fn degrees(&self, a: &str) -> String {
        format!("DEGREES({})", a)
    }

    fn radians(&self, a: &str) -> String {
        format!("RADIANS({})", a)
    }

    fn supports_pi(&self) -> bool {
        true
    }

    fn pi(&self) -> String {
        "PI()".to_string()
    }

    fn random(&self) -> String {
        "RANDOM()".to_string()
    }

    fn supports_greatest_least(&self) -> bool {
        true
    }

    fn greatest(&self, args: &[String]) -> String {
        format!("GREATEST({})", args.join(", "))
    }

    fn least(&self, args: &[String]) -> String {
        format!("LEAST({})", args.join(", "))
    }

    fn coalesce(&self, args: &[String]) -> String {
        format!("COALESCE({})", args.join(", "))
    }

    fn null_if(&self, a: &str, b: &str) -> String {
        format!("NULLIF({}, {})", a, b)
    }

    // ---- conversions -------------------------------------------------

    fn to_string_value(&self, a: &str, _from: ValueType) -> String {
        format!("CAST({} AS VARCHAR(4000))", a)
    }

    fn to_number(&self, a: &str) -> String {
        format!("CAST({} AS DOUBLE PRECISION)", a)
    }

    fn to_integer(&self, a: &str) -> String {
        format!("CAST({} AS BIGINT)", a)
    }

    // ---- strings -----------------------------------------------------

    fn lower(&self, a: &str) -> String {
        format!("LOWER({})", a)
    }

    fn upper(&self, a: &str) -> String {
        format!("UPPER({})", a)
    }

    fn trim(&self, a: &str) -> String {
        format!("TRIM({})", a)
    }

    fn left_trim(&self, a: &str) -> String {
        format!("LTRIM({})", a)
    }

    fn right_trim(&self, a: &str) -> String {
        format!("RTRIM({})", a)
    }

    fn length(&self, a: &str) -> String {
        format!("CHAR_LENGTH({})", a)
    }

    /// 1-based `start`; `length` absent means to the end.
    fn substring(&self, a: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTRING({} FROM {} FOR {})", a, start, len),
            None => format!("SUBSTRING({} FROM {})", a, start),
        }
    }

    fn position(&self, haystack: &str, needle: &str) -> String {
        format!("POSITION({} IN {})", needle, haystack)
    }

    fn replace(&self, a: &str, from: &str, to: &str) -> String {
        format!("REPLACE({}, {}, {})", a, from, to)
    }

    /// Generate string concatenation expression (e.g. 'a' || 'b' vs CONCAT('a', 'b')).
    fn concat(&self, parts: &[String]) -> String {
        parts.join(" || ")
    }

    // ---- dates -------------------------------------------------------

    fn current_date(&self) -> String {
        "CURRENT_DATE".to_string()
    }

    fn current_timestamp(&self) -> String {
        "CURRENT_TIMESTAMP".to_string()
    }

    fn date_part(&self, unit: DateUnit, a: &str) -> String {
        format!("EXTRACT({} FROM {})", unit.keyword(), a)
    }

    /// 1 for Sunday through 7 for Saturday.
    fn day_of_week(&self, a: &str) -> String {
        format!("DAYOFWEEK({})", a)
    }

    /// Never called with weeks; those arrive as seven days.
    fn date_add(&self, unit: DateUnit, date: &str, amount: &str) -> String {
        format!("{} + {} * INTERVAL '1' {}", date, amount, unit.keyword())
    }

    /// Whole `unit`s from `start` to `end`; fractional for seconds.
    fn date_diff(&self, unit: DateUnit, start: &str, end: &str) -> CompileResult<String> {
        Ok(format!("DATEDIFF({}, {}, {})", unit.keyword(), start, end))
    }

    fn end_of_month(&self, a: &str) -> CompileResult<String> {
        Ok(format!("LAST_DAY({})", a))
    }

    fn start_of_day(&self, a: &str) -> String {
        format!("CAST(CAST({} AS DATE) AS TIMESTAMP)", a)
    }

    // ---- date repeats ------------------------------------------------

    fn supports_date_repeat(&self) -> bool {
        false
    }

    fn date_add_repeat(&self, date: &str, repeat: &str) -> String {
        format!("{} + {}", date, repeat)
    }

    fn date_subtract_repeat(&self, date: &str, repeat: &str) -> String {
        format!("{} - {}", date, repeat)
    }

    fn repeat_between(&self, start: &str, end: &str) -> String {
        format!("AGE({}, {})", end, start)
    }

    fn repeat_part(&self, unit: DateUnit, repeat: &str) -> String {
        format!("EXTRACT({} FROM {})", unit.keyword(), repeat)
    }

    // ---- geometry ----------------------------------------------------

    fn supports_geometry(&self) -> bool {
        false
    }

    fn make_point(&self, x: &str, y: &str) -> String {
        format!("ST_MakePoint({}, {})", x, y)
    }

    fn point_x(&self, p: &str) -> String {
        format!("ST_X({})", p)
    }

    fn point_y(&self, p: &str) -> String {
        format!("ST_Y({})", p)
    }

    fn distance(&self, a: &str, b: &str) -> String {
        format!("ST_Distance({}, {})", a, b)
    }

    fn geometry_equals(&self, a: &str, b: &str) -> String {
        format!("ST_Equals({}, {})", a, b)
    }

    fn contains(&self, a: &str, b: &str) -> String {
        format!("ST_Contains({}, {})", a, b)
    }

    fn intersects(&self, a: &str, b: &str) -> String {
        format!("ST_Intersects({}, {})", a, b)
    }

    fn area(&self, a: &str) -> String {
        format!("ST_Area({})", a)
    }

    fn line_length(&self, a: &str) -> String {
        format!("ST_Length({})", a)
    }

    fn geometry_bound(&self, bound: GeometryBound, a: &str) -> String {
        let func = match bound {
            GeometryBound::MinX => "ST_XMin",
            GeometryBound::MaxX => "ST_XMax",
            GeometryBound::MinY => "ST_YMin",
            GeometryBound::MaxY => "ST_YMax",
        };
        format!("{}({})", func, a)
    }

    fn as_text(&self, a: &str) -> String {
        format!("ST_AsText({})", a)
    }

    // ---- aggregates --------------------------------------------------

    fn supports_aggregate(&self, _func: AggregateFunc) -> bool {
        true
    }

    fn aggregate_name(&self, func: AggregateFunc) -> &'static str {
        func.name()
    }

    fn count_star(&self) -> String {
        "COUNT(*)".to_string()
    }

    // ---- windows -----------------------------------------------------

    fn supports_window_functions(&self) -> bool {
        true
    }

    fn supports_groups_frame(&self) -> bool {
        false
    }

    /// ORDER BY term for a window that needs one but has no sort keys.
    fn window_constant_order(&self) -> String {
        "NULL".to_string()
    }

    fn sort_direction(&self, direction: SortDirection) -> &'static str {
        match direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn supports_nulls_ordering(&self) -> bool {
        true
    }

    fn nulls_ordering(&self, nulls: NullsOrder) -> &'static str {
        match nulls {
            NullsOrder::First => "NULLS FIRST",
            NullsOrder::Last => "NULLS LAST",
        }
    }

    // ---- paging ------------------------------------------------------

    /// Generate the parameter placeholder (e.g., $1, ?, @p1) for a given index.
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    /// Trailing paging clause, with a leading space when non-empty.
    fn limit_offset(&self, limit: Option<usize>, offset: Option<usize>) -> String {
        let mut sql = String::new();
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {} ROWS", n));
        }
        if let Some(n) = limit {
            sql.push_str(&format!(" FETCH FIRST {} ROWS ONLY", n));
        }
        sql
    }

    /// Paging placed right after SELECT (TOP, SKIP/FIRST).
    fn limit_in_select(&self, _limit: Option<usize>, _offset: Option<usize>) -> Option<String> {
        None
    }

    /// Paging expressed as a WHERE condition (ROWNUM).
    fn limit_in_where(&self, _limit: Option<usize>) -> Option<String> {
        None
    }

    fn supports_offset(&self) -> bool {
        true
    }

    // ---- structure ---------------------------------------------------

    fn select_keyword(&self) -> &'static str {
        "SELECT"
    }

    fn distinct_keyword(&self) -> &'static str {
        "DISTINCT"
    }

    fn from_keyword(&self) -> &'static str {
        "FROM"
    }

    fn where_keyword(&self) -> &'static str {
        "WHERE"
    }

    fn group_by_keyword(&self) -> &'static str {
        "GROUP BY"
    }

    fn having_keyword(&self) -> &'static str {
        "HAVING"
    }

    fn order_by_keyword(&self) -> &'static str {
        "ORDER BY"
    }

    fn union_keyword(&self, all: bool) -> &'static str {
        if all { "UNION ALL" } else { "UNION" }
    }

    /// Table to select constants from, for dialects that require FROM.
    fn select_without_from_suffix(&self) -> Option<&'static str> {
        None
    }

    fn inner_join(&self) -> &'static str {
        "INNER JOIN"
    }

    fn left_join(&self) -> &'static str {
        "LEFT OUTER JOIN"
    }

    fn supports_right_join(&self) -> bool {
        true
    }

    fn right_join(&self) -> &'static str {
        "RIGHT OUTER JOIN"
    }

    fn supports_full_outer_join(&self) -> bool {
        true
    }

    fn full_join(&self) -> &'static str {
        "FULL OUTER JOIN"
    }

    fn cross_join(&self) -> &'static str {
        "CROSS JOIN"
    }

    // ---- DDL ---------------------------------------------------------

    fn sql_type(&self, value_type: ValueType) -> String {
        match value_type {
            ValueType::Null | ValueType::String => "VARCHAR(4000)",
            ValueType::Number | ValueType::Duration => "DOUBLE PRECISION",
            ValueType::Integer => "BIGINT",
            ValueType::Date => "TIMESTAMP",
            ValueType::Boolean => "BOOLEAN",
            ValueType::DateRepeat => "INTERVAL",
            ValueType::Point | ValueType::Line | ValueType::Polygon => "GEOMETRY",
            ValueType::Bytes => "BLOB",
        }
        .to_string()
    }

    fn autoincrement_type(&self) -> String {
        self.sql_type(ValueType::Integer)
    }

    fn autoincrement_suffix(&self) -> &'static str {
        " GENERATED BY DEFAULT AS IDENTITY"
    }

    fn primary_key_clause(&self, columns: &[String]) -> String {
        format!("PRIMARY KEY ({})", columns.join(", "))
    }

    fn supports_drop_if_exists(&self) -> bool {
        true
    }

    fn drop_table(&self, table: &str, if_exists: bool) -> String {
        if if_exists && self.supports_drop_if_exists() {
            format!("DROP TABLE IF EXISTS {}", self.format_table_name(table))
        } else {
            format!("DROP TABLE {}", self.format_table_name(table))
        }
    }

    // ---- generated keys ----------------------------------------------

    fn supports_generated_keys(&self) -> bool {
        true
    }

    /// Statement fetching the last generated key, where one is needed.
    fn generated_key_query(&self, _table: &str, _column: &str) -> Option<String> {
        None
    }

    /// `RETURNING` clause appended to INSERT, where supported.
    fn returning_clause(&self, _columns: &[String]) -> Option<String> {
        None
    }

    // ---- errors ------------------------------------------------------

    fn unsupported(&self, capability: &str) -> CompileError {
        CompileError::unsupported(self.name(), capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_hash_matches_string_hash_code() {
        assert_eq!(java_hash(""), 0);
        assert_eq!(java_hash("a"), 97);
        assert_eq!(java_hash("PEOPLE"), -1938479473);
    }

    #[test]
    fn test_needs_quoting() {
        assert!(needs_quoting("order"));
        assert!(needs_quoting("ORDER"));
        assert!(needs_quoting("first name"));
        assert!(needs_quoting("1st"));
        assert!(!needs_quoting("customer_id"));
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("it's"), "'it''s'");
    }
}
