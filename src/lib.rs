//! Linear B-spline ("hat" basis) tensor-product interpolation on uniform grids.
//!
//! A grid of coefficients spans a coordinate range on each axis, with nodes evenly
//! spaced from the start to the end of the range. The interpolant is the sum of every
//! coefficient weighted by the product of its per-axis hat functions, which reproduces
//! the coefficients exactly at the nodes, is multilinear between them, and is zero
//! outside the grid.
//!
//! | Method                                | Inputs                 | Per-point cost |
//! |---------------------------------------|------------------------|----------------|
//! | `line_interpolate_{1,2,3}d`           | Coordinate arrays      | O(prod(dims))  |
//! | `regular::interpn`                    | Flat coordinate slices | O(prod(dims))  |
//! | `HatSplineRegular`, compact footprint | Either                 | O(2^ndims)     |
//!
//! With the `rayon` feature, output elements are evaluated in parallel.
//! With the `ndarray` feature, coordinate and coefficient arrays can be borrowed
//! from `ndarray` views, and results converted back.
//!
//! ```rust
//! use hatspline::{line_interpolate_2d, Layout, TensorView};
//!
//! // 2x2 grid over [0, 1] x [0, 1]
//! let tabs = [1.0, 2.0, 3.0, 4.0];
//! let tabs = TensorView::new(&tabs, &[2, 2], Layout::RowMajor).unwrap();
//!
//! let x1 = [0.0, 0.5, 1.0];
//! let x2 = [0.0, 0.5, 2.0];
//! let out = line_interpolate_2d(
//!     &TensorView::from_slice(&x1),
//!     &TensorView::from_slice(&x2),
//!     &tabs,
//!     (0.0, 1.0, 0.0, 1.0),
//! )
//! .unwrap();
//!
//! // The last point is off the grid
//! assert_eq!(out.as_slice(), &[1.0, 2.5, 0.0]);
//! ```
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

use num_traits::Float;

pub mod basis;
mod error;
pub mod line;
mod options;
pub mod regular;
pub mod tensor;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use error::InterpError;
pub use line::{
    line_interpolate_1d, line_interpolate_1d_with, line_interpolate_2d, line_interpolate_2d_with,
    line_interpolate_3d, line_interpolate_3d_with,
};
pub use options::{DomainPolicy, Footprint, InterpOptions};
pub use regular::HatSplineRegular;
pub use tensor::{DenseArray, Layout, TensorView};

/// Floating-point element type of coefficients and coordinates.
pub trait Scalar: Float + Send + Sync {}

impl<T: Float + Send + Sync> Scalar for T {}
