#![forbid(unsafe_code)]

//! 2-D affine transforms in the SVG `matrix(a b c d e f)` convention.
//!
//! A transform maps a point `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
//! The bridge uses one instance per surface (the screen transform pushed by
//! the host) and inverts it per event to map client coordinates into the
//! surface's local space. The remaining constructors cover the transforms a
//! host composes when panning, zooming, or orienting content.

/// Row-major 2-D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2d {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform2d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2d {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Translation by `(x, y)`.
    #[must_use]
    pub const fn translate(x: f64, y: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: x,
            f: y,
        }
    }

    /// Axis-aligned scale. Pass the same factor twice for uniform scaling.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation by `radians` counter-clockwise about the origin.
    #[must_use]
    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation by `degrees` counter-clockwise about the origin.
    #[must_use]
    pub fn rotate_degrees(degrees: f64) -> Self {
        Self::rotate(degrees.to_radians())
    }

    /// Rotation aligning the positive x-axis with the direction `(dx, dy)`.
    ///
    /// Returns `None` for the zero vector, which has no direction.
    #[must_use]
    pub fn direction_rotate(dx: f64, dy: f64) -> Option<Self> {
        let norm = (dx * dx + dy * dy).sqrt();
        if norm == 0.0 {
            return None;
        }
        let cos = dx / norm;
        let sin = dy / norm;
        Some(Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        })
    }

    /// Skew along the x-axis by `radians`.
    #[must_use]
    pub fn skew_x(radians: f64) -> Self {
        Self {
            c: radians.tan(),
            ..Self::IDENTITY
        }
    }

    /// Skew along the y-axis by `radians`.
    #[must_use]
    pub fn skew_y(radians: f64) -> Self {
        Self {
            b: radians.tan(),
            ..Self::IDENTITY
        }
    }

    /// Compose: first apply `self`, then apply `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when `self` is singular.
    #[must_use]
    pub fn invert(self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Apply the transform to a point.
    #[must_use]
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}
