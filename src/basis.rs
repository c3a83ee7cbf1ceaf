//! Linear cardinal B-spline ("hat") basis and the mapping from domain
//! coordinates to continuous grid-index coordinates.
//!
//! ```rust
//! use hatspline::basis::{grid_coordinate, hat};
//!
//! assert_eq!(hat(0.0_f64), 1.0);
//! assert_eq!(hat(0.5_f64), 0.5);
//! assert_eq!(hat(1.0_f64), 0.0);
//!
//! // Index 2 of a 5-point grid spanning [0, 8] sits at x = 4
//! assert_eq!(grid_coordinate(4.0_f64, 4.0, (0.0, 8.0)), 2.0);
//! ```
use num_traits::{Float, NumCast};

/// Absolute tolerance under which two floats compare equal
pub const EPS: f64 = 1e-12;

#[inline(always)]
fn eps<T: Float>() -> T {
    // Every float type in use can represent 1e-12, at worst inexactly
    <T as NumCast>::from(EPS).unwrap_or_else(T::epsilon)
}

/// `a == b` within an absolute tolerance of [`EPS`]
#[inline(always)]
pub fn is_eq<T: Float>(a: T, b: T) -> bool {
    let d = a - b;
    -d < eps() && d < eps()
}

/// `a >= b`, treating values within [`EPS`] as equal
#[inline(always)]
pub fn is_geq<T: Float>(a: T, b: T) -> bool {
    a > b || is_eq(a, b)
}

/// `a <= b`, treating values within [`EPS`] as equal
#[inline(always)]
pub fn is_leq<T: Float>(a: T, b: T) -> bool {
    a < b || is_eq(a, b)
}

/// Linear B-spline basis with support (-1, 1) and peak 1 at 0.
///
/// * `t + 1` on (-1, 0], where the upper end is compared with tolerance
/// * `1 - t` on (0, 1)
/// * `0` elsewhere, including for NaN
///
/// The tolerant upper end of the rising branch keeps a query that lands a rounding
/// error past a grid node from dropping that node's full weight.
#[inline(always)]
pub fn hat<T: Float>(t: T) -> T {
    let one = T::one();
    if t > -one && is_leq(t, T::zero()) {
        t + one
    } else if t > T::zero() && t < one {
        one - t
    } else {
        T::zero()
    }
}

/// Map a domain coordinate `x` onto the continuous index space of an axis whose
/// last node has index `last` and which spans `limits = (a, b)`.
///
/// Node `i` of the axis contributes `hat(u - i)` at the returned `u`.
/// A zero-width range is not guarded and yields an infinite or NaN coordinate.
#[inline(always)]
pub fn grid_coordinate<T: Float>(x: T, last: T, limits: (T, T)) -> T {
    let (a, b) = limits;
    (last * (x - a)) / (b - a)
}
