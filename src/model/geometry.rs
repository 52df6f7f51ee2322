//! Geometry primitives in OFD page space (millimetres, y axis pointing down).

use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// A rectangle given as `x y width height` (`ST_Box`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// ISO A4 portrait, the fallback page area.
    pub fn a4() -> Self {
        Self::new(0.0, 0.0, 210.0, 297.0)
    }

    /// Check if the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width in points.
    pub fn width_pt(&self) -> f64 {
        self.width * PT_PER_MM
    }

    /// Height in points.
    pub fn height_pt(&self) -> f64 {
        self.height * PT_PER_MM
    }
}

/// A 2D affine transform `[a b c d e f]`, mapping `(x, y)` to
/// `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Build from the six numbers of an `ST_Array`; other lengths are rejected.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [a, b, c, d, e, f] => Some(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// A pure translation.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// A pure scale.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Horizontal scale factor, signed by `a`.
    pub fn x_scale(&self) -> f64 {
        let s = (self.a * self.a + self.c * self.c).sqrt();
        if self.a < 0.0 {
            -s
        } else {
            s
        }
    }

    /// The six operands in PDF `cm` order.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Check if this is the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_points() {
        let a4 = Rect::a4();
        assert!((a4.width_pt() - 595.2756).abs() < 1e-3);
        assert!((a4.height_pt() - 841.8898).abs() < 1e-3);
        assert!(!a4.is_empty());
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_matrix_compose() {
        let m = Matrix::scale(2.0, 3.0).then(&Matrix::translate(10.0, 20.0));
        assert_eq!(m.apply(1.0, 1.0), (12.0, 23.0));

        let m = Matrix::translate(10.0, 20.0).then(&Matrix::scale(2.0, 3.0));
        assert_eq!(m.apply(1.0, 1.0), (22.0, 63.0));
    }

    #[test]
    fn test_matrix_from_slice() {
        assert!(Matrix::from_slice(&[1.0, 0.0, 0.0, 1.0]).is_none());
        let m = Matrix::from_slice(&[0.5, 0.0, 0.0, 0.5, 3.0, 4.0]).unwrap();
        assert_eq!(m.x_scale(), 0.5);
        assert!(!m.is_identity());
    }
}
