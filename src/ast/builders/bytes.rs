use crate::ast::{Expr, ValueType};

typed_expr!(
    /// Raw binary data.
    BytesExpr,
    ValueType::Bytes
);
equality_ops!(BytesExpr);
literal_from!(BytesExpr, ValueType::Bytes, Vec<u8>);

impl From<&[u8]> for BytesExpr {
    fn from(v: &[u8]) -> Self {
        Self(Expr::literal(v.to_vec()))
    }
}
