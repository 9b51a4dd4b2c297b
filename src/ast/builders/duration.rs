use chrono::TimeDelta;

use crate::ast::builders::{call, NumberExpr};
use crate::ast::{Expr, Func, ValueType};

typed_expr!(
    /// An exact elapsed time, carried as seconds.
    DurationExpr,
    ValueType::Duration
);
equality_ops!(DurationExpr);
comparable_ops!(DurationExpr);
literal_from!(DurationExpr, ValueType::Duration, TimeDelta);

impl DurationExpr {
    pub fn seconds(&self) -> NumberExpr {
        call(Func::DurationSeconds, vec![self.0.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::TypedExpr;

    #[test]
    fn test_seconds_is_number() {
        let d = DurationExpr::from(TimeDelta::minutes(2));
        assert_eq!(d.seconds().expr().value_type(), ValueType::Number);
        assert!(!d.includes_null());
        assert!(DurationExpr::from(None::<TimeDelta>).includes_null());
    }
}
