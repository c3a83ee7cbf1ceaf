//! Convenience methods for laying out grid-node coordinates over a domain,
//! echoing the helpers common in scripting languages.
use itertools::Itertools;
use num_traits::{Float, NumCast};

/// Convert an index or count to a float. Every `usize` converts, possibly inexactly.
#[inline(always)]
pub(crate) fn to_float<T: Float>(n: usize) -> T {
    <T as NumCast>::from(n).unwrap_or_else(T::nan)
}

/// Generates evenly spaced values from start to stop,
/// including the endpoint. `n == 1` yields just `start`.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    if n < 2 {
        return (0..n).map(|_| start).collect();
    }
    let dx: T = (stop - start) / to_float(n - 1);
    (0..n).map(|i| start + to_float::<T>(i) * dx).collect()
}

/// Domain coordinates of every node of a uniform grid, one vec per axis.
///
/// Node `i` of an axis with `dims[k]` nodes over `limits[k] = (a, b)`
/// sits at `a + i * (b - a) / (dims[k] - 1)`, which is where the
/// interpolant reproduces the coefficient exactly.
pub fn grid_locations<T>(dims: &[usize], limits: &[(T, T)]) -> Vec<Vec<T>>
where
    T: Float,
{
    dims.iter()
        .zip(limits.iter())
        .map(|(&n, &(a, b))| linspace(a, b, n))
        .collect()
}

/// Generates a meshgrid in C ordering (x0, y0, z0, x0, y0, z1, ..., x0, yn, zn)
pub fn meshgrid<T>(x: Vec<&Vec<T>>) -> Vec<Vec<T>>
where
    T: Float,
{
    x.into_iter()
        .multi_cartesian_product()
        .map(|xx| xx.iter().map(|y| **y).collect())
        .collect()
}
