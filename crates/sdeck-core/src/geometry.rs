#![forbid(unsafe_code)]

//! Transform primitives and the transform-expression formatter.
//!
//! Every function here is pure. The formatter emits the composed strings a
//! CSS-like surface understands (`translate3d(..)`, `rotateX(..)`, `scale(..)`).
//! Numbers are printed with Rust's shortest round-trip representation and a
//! negative zero is printed as `0`.

use std::fmt;

/// A three-component vector (pixels for translation, degrees for rotation).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise negation.
    #[inline]
    #[must_use]
    pub fn negated(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Translation, rotation (degrees, applied X then Y then Z), and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3d {
    pub translate: Vec3,
    pub rotate: Vec3,
    pub scale: f64,
}

impl Default for Transform3d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform3d {
    /// No translation, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translate: Vec3::ZERO,
        rotate: Vec3::ZERO,
        scale: 1.0,
    };

    /// Camera transform that brings `self` to the viewport center.
    ///
    /// Rotation and translation are negated and the scale inverted. `scale`
    /// must be finite and strictly positive; the step builder guarantees this
    /// for every step it emits.
    #[must_use]
    pub fn inverse(&self) -> Self {
        debug_assert!(
            self.scale.is_finite() && self.scale > 0.0,
            "inverse of a degenerate scale: {}",
            self.scale
        );
        Self {
            translate: self.translate.negated(),
            rotate: self.rotate.negated(),
            scale: 1.0 / self.scale,
        }
    }
}

/// Order in which the three rotation functions are composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationOrder {
    /// `rotateX rotateY rotateZ`, used to place a step.
    #[default]
    Xyz,
    /// `rotateZ rotateY rotateX`, used to undo a step's rotation.
    Zyx,
}

/// Number wrapper that prints `-0` as `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = if self.0 == 0.0 { 0.0 } else { self.0 };
        write!(f, "{v}")
    }
}

/// `translate3d(Xpx, Ypx, Zpx)`
#[must_use]
pub fn translate(t: Vec3) -> String {
    format!(
        "translate3d({}px, {}px, {}px)",
        Num(t.x),
        Num(t.y),
        Num(t.z)
    )
}

/// `rotateX(..deg) rotateY(..deg) rotateZ(..deg)`, or reversed for [`RotationOrder::Zyx`].
#[must_use]
pub fn rotate(r: Vec3, order: RotationOrder) -> String {
    let rx = format!("rotateX({}deg)", Num(r.x));
    let ry = format!("rotateY({}deg)", Num(r.y));
    let rz = format!("rotateZ({}deg)", Num(r.z));
    match order {
        RotationOrder::Xyz => format!("{rx} {ry} {rz}"),
        RotationOrder::Zyx => format!("{rz} {ry} {rx}"),
    }
}

/// `scale(s)`
#[must_use]
pub fn scale(s: f64) -> String {
    format!("scale({})", Num(s))
}

/// Placement of a step element: centered on its origin, then translated,
/// rotated, and scaled.
#[must_use]
pub fn step_placement(t: &Transform3d) -> String {
    format!(
        "translate(-50%, -50%) {} {} {}",
        translate(t.translate),
        rotate(t.rotate, RotationOrder::Xyz),
        scale(t.scale)
    )
}

/// Inner camera layer: rotation undone in reverse order, then translation.
#[must_use]
pub fn camera_pan(camera: &Transform3d) -> String {
    format!(
        "{} {}",
        rotate(camera.rotate, RotationOrder::Zyx),
        translate(camera.translate)
    )
}

/// Outer camera layer: uniform scale only.
#[must_use]
pub fn camera_zoom(camera: &Transform3d) -> String {
    scale(camera.scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(Num(-0.0).to_string(), "0");
        assert_eq!(Num(0.0).to_string(), "0");
        assert_eq!(Num(-2.5).to_string(), "-2.5");
        assert_eq!(Num(2000.0).to_string(), "2000");
    }

    #[test]
    fn translate_formats_pixels() {
        assert_eq!(
            translate(Vec3::new(2000.0, -100.0, 0.0)),
            "translate3d(2000px, -100px, 0px)"
        );
    }

    #[test]
    fn rotate_orders() {
        let r = Vec3::new(10.0, 20.0, 30.0);
        assert_eq!(
            rotate(r, RotationOrder::Xyz),
            "rotateX(10deg) rotateY(20deg) rotateZ(30deg)"
        );
        assert_eq!(
            rotate(r, RotationOrder::Zyx),
            "rotateZ(30deg) rotateY(20deg) rotateX(10deg)"
        );
    }

    #[test]
    fn inverse_negates_and_inverts_scale() {
        let t = Transform3d {
            translate: Vec3::new(2000.0, 0.0, -50.0),
            rotate: Vec3::new(0.0, 45.0, 90.0),
            scale: 4.0,
        };
        let inv = t.inverse();
        assert_eq!(inv.translate, Vec3::new(-2000.0, -0.0, 50.0));
        assert_eq!(inv.rotate, Vec3::new(-0.0, -45.0, -90.0));
        assert_eq!(inv.scale, 0.25);
    }

    #[test]
    fn identity_is_its_own_inverse() {
        let inv = Transform3d::IDENTITY.inverse();
        assert_eq!(camera_pan(&inv), camera_pan(&Transform3d::IDENTITY));
        assert_eq!(camera_zoom(&inv), "scale(1)");
    }
}
