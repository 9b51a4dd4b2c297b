//! Typed expression trees, operators and window specifications.

pub mod builders;
pub mod column;
pub mod conditions;
pub mod expr;
pub mod func;
pub mod geometry;
pub mod operators;
pub mod repeat;
pub mod values;
pub mod window;

pub use column::ColumnRef;
pub use conditions::Condition;
pub use expr::{Clause, CompareOp, Expr, LogicalOp, Node};
pub use func::{AggregateFunc, DateUnit, Func, GeometryBound};
pub use geometry::{Line2D, Point2D, Polygon2D};
pub use operators::{ExistsQuery, Operator, OperatorKind};
pub use repeat::DateRepeat;
pub use values::{Value, ValueType};
pub use window::{SortDirection, SortKey, Window, WindowSpec};
