//! Evaluation settings shared by every entry point.
use num_traits::Float;

use crate::InterpError;

/// Which grid nodes are visited for each query point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Footprint {
    /// Sum over every node of the grid, O(prod(dims)) per point.
    #[default]
    Dense,

    /// Sum over the nodes that can carry nonzero weight, at most 2 per axis.
    ///
    /// Identical to [`Footprint::Dense`] for finite coefficients. Differs only in that
    /// a non-finite coefficient outside the support of a point does not poison it.
    Compact,
}

/// How the coordinate range of each axis is vetted before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainPolicy {
    /// No validation. A zero-width range silently produces meaningless values
    /// (zero, or NaN/Inf where coefficients are non-finite).
    #[default]
    Propagate,

    /// Reject zero-width, reversed, or non-finite ranges with
    /// [`InterpError::InvalidArgument`]. Queries outside the range are still
    /// evaluated, to zero.
    Strict,
}

/// Settings for an interpolation call.
///
/// ```rust
/// use hatspline::{DomainPolicy, Footprint, InterpOptions};
///
/// let opts = InterpOptions::default()
///     .footprint(Footprint::Compact)
///     .domain(DomainPolicy::Strict);
/// assert_eq!(opts.footprint, Footprint::Compact);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterpOptions {
    pub footprint: Footprint,
    pub domain: DomainPolicy,

    /// Worker threads for the `rayon` feature; `None` uses the global pool.
    /// Ignored without that feature.
    pub threads: Option<usize>,
}

impl InterpOptions {
    pub fn footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = footprint;
        self
    }

    pub fn domain(mut self, domain: DomainPolicy) -> Self {
        self.domain = domain;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

impl DomainPolicy {
    /// Apply this policy to the coordinate ranges of every axis
    pub(crate) fn check<T: Float>(self, limits: &[(T, T)]) -> Result<(), InterpError> {
        for (k, &(a, b)) in limits.iter().enumerate() {
            let proper = a.is_finite() && b.is_finite() && a < b;
            if proper {
                continue;
            }
            match self {
                DomainPolicy::Propagate => {
                    tracing::warn!(
                        axis = k,
                        "degenerate coordinate range; output will not be meaningful"
                    );
                }
                DomainPolicy::Strict => {
                    return Err(InterpError::invalid(format!(
                        "coordinate range of axis {k} must be finite and increasing"
                    )));
                }
            }
        }
        Ok(())
    }
}
