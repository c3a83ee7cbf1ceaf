//! Array-shaped entry points for 1, 2, and 3 dimensions.
//!
//! Each takes one coordinate array per axis, all of the same shape, plus the
//! coefficient grid and its coordinate range, and returns an array of the same
//! shape and memory order as the first coordinate array.
//!
//! ```rust
//! use hatspline::{line_interpolate_1d, TensorView};
//!
//! let tabs = [0.0, 10.0, 0.0];
//! let x = [1.0, 0.5];
//!
//! let out = line_interpolate_1d(
//!     &TensorView::from_slice(&x),
//!     &TensorView::from_slice(&tabs),
//!     (0.0, 2.0),
//! )
//! .unwrap();
//! assert_eq!(out.as_slice(), &[10.0, 5.0]);
//! ```
use crate::{DenseArray, HatSplineRegular, InterpError, InterpOptions, TensorView};

fn line_interpolate<const N: usize>(
    x: [&TensorView<'_, f64>; N],
    uniform_tabs: &TensorView<'_, f64>,
    limits: [(f64, f64); N],
    options: &InterpOptions,
) -> Result<DenseArray<f64>, InterpError> {
    HatSplineRegular::new_with(uniform_tabs.clone(), limits, options)?.interp_tensor(x)
}

/// Interpolate a 1-D coefficient vector spanning `limits = (a, b)` at every element of `x`.
///
/// # Errors
/// * `InvalidArgument` if `uniform_tabs` is not 1-dimensional
/// * `OutOfMemory` if the output cannot be allocated
pub fn line_interpolate_1d(
    x: &TensorView<'_, f64>,
    uniform_tabs: &TensorView<'_, f64>,
    limits: (f64, f64),
) -> Result<DenseArray<f64>, InterpError> {
    line_interpolate_1d_with(x, uniform_tabs, limits, &InterpOptions::default())
}

/// [`line_interpolate_1d`] with explicit options.
pub fn line_interpolate_1d_with(
    x: &TensorView<'_, f64>,
    uniform_tabs: &TensorView<'_, f64>,
    limits: (f64, f64),
    options: &InterpOptions,
) -> Result<DenseArray<f64>, InterpError> {
    line_interpolate([x], uniform_tabs, [limits], options)
}

/// Interpolate a 2-D coefficient grid spanning `(a1, b1)` on its first axis and
/// `(a2, b2)` on its second, at the points `(x1[i], x2[i])`.
///
/// # Errors
/// * `InvalidArgument` if `uniform_tabs` is not 2-dimensional,
///   or if `x2` differs in shape from `x1`
/// * `OutOfMemory` if the output cannot be allocated
pub fn line_interpolate_2d(
    x1: &TensorView<'_, f64>,
    x2: &TensorView<'_, f64>,
    uniform_tabs: &TensorView<'_, f64>,
    limits: (f64, f64, f64, f64),
) -> Result<DenseArray<f64>, InterpError> {
    line_interpolate_2d_with(x1, x2, uniform_tabs, limits, &InterpOptions::default())
}

/// [`line_interpolate_2d`] with explicit options.
pub fn line_interpolate_2d_with(
    x1: &TensorView<'_, f64>,
    x2: &TensorView<'_, f64>,
    uniform_tabs: &TensorView<'_, f64>,
    limits: (f64, f64, f64, f64),
    options: &InterpOptions,
) -> Result<DenseArray<f64>, InterpError> {
    let (a1, b1, a2, b2) = limits;
    line_interpolate([x1, x2], uniform_tabs, [(a1, b1), (a2, b2)], options)
}

/// Interpolate a 3-D coefficient grid spanning `(a1, b1, a2, b2, a3, b3)`
/// at the points `(x1[i], x2[i], x3[i])`.
///
/// # Errors
/// * `InvalidArgument` if `uniform_tabs` is not 3-dimensional,
///   or if `x2` or `x3` differs in shape from `x1`
/// * `OutOfMemory` if the output cannot be allocated
pub fn line_interpolate_3d(
    x1: &TensorView<'_, f64>,
    x2: &TensorView<'_, f64>,
    x3: &TensorView<'_, f64>,
    uniform_tabs: &TensorView<'_, f64>,
    limits: (f64, f64, f64, f64, f64, f64),
) -> Result<DenseArray<f64>, InterpError> {
    line_interpolate_3d_with(x1, x2, x3, uniform_tabs, limits, &InterpOptions::default())
}

/// [`line_interpolate_3d`] with explicit options.
pub fn line_interpolate_3d_with(
    x1: &TensorView<'_, f64>,
    x2: &TensorView<'_, f64>,
    x3: &TensorView<'_, f64>,
    uniform_tabs: &TensorView<'_, f64>,
    limits: (f64, f64, f64, f64, f64, f64),
    options: &InterpOptions,
) -> Result<DenseArray<f64>, InterpError> {
    let (a1, b1, a2, b2, a3, b3) = limits;
    line_interpolate(
        [x1, x2, x3],
        uniform_tabs,
        [(a1, b1), (a2, b2), (a3, b3)],
        options,
    )
}
