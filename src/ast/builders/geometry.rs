use crate::ast::builders::{call, BooleanExpr, NumberExpr, StringExpr, TypedExpr};
use crate::ast::geometry::{Line2D, Point2D, Polygon2D};
use crate::ast::{Expr, Func, GeometryBound, ValueType};

/// Wrappers holding spatial values.
pub trait GeometryExpr: TypedExpr {}

typed_expr!(
    /// A 2D point.
    PointExpr,
    ValueType::Point
);
literal_from!(PointExpr, ValueType::Point, Point2D);

typed_expr!(
    /// A 2D line string.
    LineExpr,
    ValueType::Line
);
literal_from!(LineExpr, ValueType::Line, Line2D);

typed_expr!(
    /// A 2D polygon.
    PolygonExpr,
    ValueType::Polygon
);
literal_from!(PolygonExpr, ValueType::Polygon, Polygon2D);

/// Spatial predicates and bounding box accessors.
macro_rules! geometry_ops {
    ($name:ident) => {
        impl GeometryExpr for $name {}

        impl $name {
            /// Spatial equality, not byte equality.
            pub fn is(&self, other: impl Into<Self>) -> BooleanExpr {
                call(Func::GeomEquals, vec![self.0.clone(), other.into().0])
            }

            pub fn is_not(&self, other: impl Into<Self>) -> BooleanExpr {
                self.is(other).not()
            }

            pub fn intersects<G: GeometryExpr>(&self, other: &G) -> BooleanExpr {
                call(Func::Intersects, vec![self.0.clone(), other.expr().clone()])
            }

            pub fn distance_to<G: GeometryExpr>(&self, other: &G) -> NumberExpr {
                call(Func::Distance, vec![self.0.clone(), other.expr().clone()])
            }

            pub fn min_x(&self) -> NumberExpr {
                call(Func::Bound(GeometryBound::MinX), vec![self.0.clone()])
            }

            pub fn max_x(&self) -> NumberExpr {
                call(Func::Bound(GeometryBound::MaxX), vec![self.0.clone()])
            }

            pub fn min_y(&self) -> NumberExpr {
                call(Func::Bound(GeometryBound::MinY), vec![self.0.clone()])
            }

            pub fn max_y(&self) -> NumberExpr {
                call(Func::Bound(GeometryBound::MaxY), vec![self.0.clone()])
            }

            /// Well-known text.
            pub fn as_text(&self) -> StringExpr {
                call(Func::AsText, vec![self.0.clone()])
            }
        }
    };
}

geometry_ops!(PointExpr);
geometry_ops!(LineExpr);
geometry_ops!(PolygonExpr);

impl PointExpr {
    pub fn from_xy(x: impl Into<NumberExpr>, y: impl Into<NumberExpr>) -> Self {
        call(Func::MakePoint, vec![x.into().into(), y.into().into()])
    }

    pub fn x(&self) -> NumberExpr {
        call(Func::PointX, vec![self.0.clone()])
    }

    pub fn y(&self) -> NumberExpr {
        call(Func::PointY, vec![self.0.clone()])
    }
}

impl LineExpr {
    pub fn length(&self) -> NumberExpr {
        call(Func::LineLength, vec![self.0.clone()])
    }
}

impl PolygonExpr {
    pub fn area(&self) -> NumberExpr {
        call(Func::Area, vec![self.0.clone()])
    }

    pub fn contains<G: GeometryExpr>(&self, other: &G) -> BooleanExpr {
        call(Func::Contains, vec![self.0.clone(), other.expr().clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    #[test]
    fn test_spatial_is_uses_function() {
        let p = PointExpr::from(Point2D::new(1.0, 2.0));
        let b = p.is(Point2D::new(1.0, 2.0));
        assert!(matches!(
            b.expr().node(),
            Node::Func {
                func: Func::GeomEquals,
                ..
            }
        ));
        assert!(matches!(p.is_not(Point2D::new(0.0, 0.0)).expr().node(), Node::Not(_)));
    }

    #[test]
    fn test_containment_accepts_any_geometry() {
        let poly = PolygonExpr::from(
            Polygon2D::rectangle(Point2D::new(0.0, 0.0), Point2D::new(2.0, 2.0)).unwrap(),
        );
        let p = PointExpr::from_xy(1.0, 1.0);
        assert!(poly.contains(&p).expr().is_boolean());
        assert_eq!(poly.area().expr().value_type(), ValueType::Number);
    }
}
