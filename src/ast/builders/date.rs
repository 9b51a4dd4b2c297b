use chrono::{NaiveDate, NaiveDateTime};

use crate::ast::builders::{call, DateRepeatExpr, DurationExpr, IntegerExpr, NumberExpr, StringExpr};
use crate::ast::{DateUnit, Expr, Func, ValueType};

typed_expr!(
    /// A timestamp.
    DateExpr,
    ValueType::Date
);
equality_ops!(DateExpr);
comparable_ops!(DateExpr);
literal_from!(DateExpr, ValueType::Date, NaiveDateTime, NaiveDate);

impl DateExpr {
    pub fn current_date() -> Self {
        call(Func::CurrentDate, Vec::new())
    }

    pub fn now() -> Self {
        call(Func::CurrentTimestamp, Vec::new())
    }

    fn part(&self, unit: DateUnit) -> IntegerExpr {
        call(Func::DatePart(unit), vec![self.0.clone()])
    }

    pub fn year(&self) -> IntegerExpr {
        self.part(DateUnit::Year)
    }

    pub fn month(&self) -> IntegerExpr {
        self.part(DateUnit::Month)
    }

    pub fn day(&self) -> IntegerExpr {
        self.part(DateUnit::Day)
    }

    pub fn hour(&self) -> IntegerExpr {
        self.part(DateUnit::Hour)
    }

    pub fn minute(&self) -> IntegerExpr {
        self.part(DateUnit::Minute)
    }

    /// Seconds including the fraction.
    pub fn second(&self) -> NumberExpr {
        call(Func::DatePart(DateUnit::Second), vec![self.0.clone()])
    }

    /// 1 for Sunday through 7 for Saturday.
    pub fn day_of_week(&self) -> IntegerExpr {
        call(Func::DayOfWeek, vec![self.0.clone()])
    }

    /// Add `amount` of `unit`; negative amounts subtract.
    pub fn add(&self, unit: DateUnit, amount: impl Into<IntegerExpr>) -> Self {
        call(Func::DateAdd(unit), vec![self.0.clone(), amount.into().into()])
    }

    pub fn add_years(&self, n: impl Into<IntegerExpr>) -> Self {
        self.add(DateUnit::Year, n)
    }

    pub fn add_months(&self, n: impl Into<IntegerExpr>) -> Self {
        self.add(DateUnit::Month, n)
    }

    pub fn add_weeks(&self, n: impl Into<IntegerExpr>) -> Self {
        self.add(DateUnit::Week, n)
    }

    pub fn add_days(&self, n: impl Into<IntegerExpr>) -> Self {
        self.add(DateUnit::Day, n)
    }

    pub fn add_hours(&self, n: impl Into<IntegerExpr>) -> Self {
        self.add(DateUnit::Hour, n)
    }

    pub fn add_minutes(&self, n: impl Into<IntegerExpr>) -> Self {
        self.add(DateUnit::Minute, n)
    }

    pub fn add_seconds(&self, n: impl Into<NumberExpr>) -> Self {
        call(
            Func::DateAdd(DateUnit::Second),
            vec![self.0.clone(), n.into().into()],
        )
    }

    /// Whole `unit`s from `self` to `later`.
    pub fn units_until(&self, unit: DateUnit, later: impl Into<Self>) -> IntegerExpr {
        call(Func::DateDiff(unit), vec![self.0.clone(), later.into().0])
    }

    pub fn days_until(&self, later: impl Into<Self>) -> IntegerExpr {
        self.units_until(DateUnit::Day, later)
    }

    pub fn seconds_until(&self, later: impl Into<Self>) -> NumberExpr {
        call(
            Func::DateDiff(DateUnit::Second),
            vec![self.0.clone(), later.into().0],
        )
    }

    /// Last day of the month, at midnight.
    pub fn end_of_month(&self) -> Self {
        call(Func::EndOfMonth, vec![self.0.clone()])
    }

    /// Midnight of the same day.
    pub fn start_of_day(&self) -> Self {
        call(Func::StartOfDay, vec![self.0.clone()])
    }

    pub fn plus_repeat(&self, repeat: impl Into<DateRepeatExpr>) -> Self {
        call(Func::DateAddRepeat, vec![self.0.clone(), repeat.into().into()])
    }

    pub fn minus_repeat(&self, repeat: impl Into<DateRepeatExpr>) -> Self {
        call(
            Func::DateSubtractRepeat,
            vec![self.0.clone(), repeat.into().into()],
        )
    }

    /// The calendar period from `earlier` to `self`.
    pub fn repeat_since(&self, earlier: impl Into<Self>) -> DateRepeatExpr {
        call(Func::RepeatBetween, vec![earlier.into().0, self.0.clone()])
    }

    pub fn plus_duration(&self, duration: impl Into<DurationExpr>) -> Self {
        call(
            Func::DateAddDuration,
            vec![self.0.clone(), duration.into().into()],
        )
    }

    /// Exact time elapsed from `earlier` to `self`.
    pub fn duration_since(&self, earlier: impl Into<Self>) -> DurationExpr {
        call(Func::DurationBetween, vec![earlier.into().0, self.0.clone()])
    }

    pub fn to_string_value(&self) -> StringExpr {
        call(Func::ToStringValue, vec![self.0.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::TypedExpr;
    use crate::ast::Node;

    fn day() -> DateExpr {
        DateExpr::from(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap())
    }

    #[test]
    fn test_parts_are_integer_except_seconds() {
        assert_eq!(day().year().expr().value_type(), ValueType::Integer);
        assert_eq!(day().second().expr().value_type(), ValueType::Number);
    }

    #[test]
    fn test_duration_since_orders_arguments() {
        let later = DateExpr::now();
        let d = later.duration_since(day());
        match d.expr().node() {
            Node::Func { func: Func::DurationBetween, args } => {
                assert!(matches!(args[0].node(), Node::Literal(_)));
                assert!(matches!(args[1].node(), Node::Func { func: Func::CurrentTimestamp, .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(d.expr().value_type(), ValueType::Duration);
    }

    #[test]
    fn test_literal_is_pure() {
        assert!(day().add_days(3).is_purely_functional());
    }
}
