//! Planar geometry literals and their WKT text.

use crate::error::{CompileError, CompileResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn check(&self) -> CompileResult<()> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(())
        } else {
            Err(CompileError::InvalidValue(format!(
                "point coordinates must be finite, got ({}, {})",
                self.x, self.y
            )))
        }
    }

    fn coords(&self) -> String {
        format!("{} {}", self.x, self.y)
    }

    pub fn wkt(&self) -> CompileResult<String> {
        self.check()?;
        Ok(format!("POINT ({})", self.coords()))
    }
}

/// An open line string of at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    points: Vec<Point2D>,
}

impl Line2D {
    pub fn new(points: Vec<Point2D>) -> CompileResult<Self> {
        if points.len() < 2 {
            return Err(CompileError::InvalidValue(format!(
                "a line needs at least 2 points, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn wkt(&self) -> CompileResult<String> {
        Ok(format!("LINESTRING ({})", join_coords(&self.points)?))
    }
}

/// A simple polygon; the exterior ring is closed on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    exterior: Vec<Point2D>,
}

impl Polygon2D {
    pub fn new(mut exterior: Vec<Point2D>) -> CompileResult<Self> {
        if exterior.first() != exterior.last() {
            if let Some(first) = exterior.first().copied() {
                exterior.push(first);
            }
        }
        if exterior.len() < 4 {
            return Err(CompileError::InvalidValue(format!(
                "a polygon needs at least 3 distinct points, got {}",
                exterior.len().saturating_sub(1)
            )));
        }
        Ok(Self { exterior })
    }

    /// Axis-aligned rectangle from two opposite corners.
    pub fn rectangle(a: Point2D, b: Point2D) -> CompileResult<Self> {
        Self::new(vec![
            Point2D::new(a.x, a.y),
            Point2D::new(b.x, a.y),
            Point2D::new(b.x, b.y),
            Point2D::new(a.x, b.y),
        ])
    }

    pub fn exterior(&self) -> &[Point2D] {
        &self.exterior
    }

    pub fn wkt(&self) -> CompileResult<String> {
        Ok(format!("POLYGON (({}))", join_coords(&self.exterior)?))
    }
}

fn join_coords(points: &[Point2D]) -> CompileResult<String> {
    let mut parts = Vec::with_capacity(points.len());
    for p in points {
        p.check()?;
        parts.push(p.coords());
    }
    Ok(parts.join(", "))
}
