use crate::ast::builders::{call, IntegerExpr, NumberExpr};
use crate::ast::repeat::DateRepeat;
use crate::ast::{DateUnit, Expr, Func, ValueType};

typed_expr!(
    /// A calendar period such as "1 month 3 days".
    DateRepeatExpr,
    ValueType::DateRepeat
);
equality_ops!(DateRepeatExpr);
literal_from!(DateRepeatExpr, ValueType::DateRepeat, DateRepeat);

impl DateRepeatExpr {
    fn part(&self, unit: DateUnit) -> IntegerExpr {
        call(Func::RepeatPart(unit), vec![self.0.clone()])
    }

    pub fn years(&self) -> IntegerExpr {
        self.part(DateUnit::Year)
    }

    pub fn months(&self) -> IntegerExpr {
        self.part(DateUnit::Month)
    }

    pub fn days(&self) -> IntegerExpr {
        self.part(DateUnit::Day)
    }

    pub fn hours(&self) -> IntegerExpr {
        self.part(DateUnit::Hour)
    }

    pub fn minutes(&self) -> IntegerExpr {
        self.part(DateUnit::Minute)
    }

    pub fn seconds(&self) -> NumberExpr {
        call(Func::RepeatPart(DateUnit::Second), vec![self.0.clone()])
    }
}
