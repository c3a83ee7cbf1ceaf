#![allow(clippy::all)] // Clippy will attempt to remove black_box() internals

use criterion::*;
use gridgen::*;
use hatspline::{Footprint, HatSplineRegular, InterpOptions, Layout, TensorView};

enum Kind {
    Interp,
    Extrap,
}

macro_rules! bench_interp_specific {
    ($group:ident, $ndims:expr, $gridsize:expr, $size:expr, $kind:expr) => {
        for footprint in [Footprint::Dense, Footprint::Compact] {
            $group.bench_with_input(
                BenchmarkId::new(
                    format!("Hat Regular {}x{}D, {:?}", $gridsize, $ndims, footprint),
                    $size,
                ),
                $size,
                |b, &size| {
                    // Interpolation grid
                    let (limits, z) = gen_grid($ndims, $gridsize);
                    let dims = [$gridsize; $ndims];

                    // Observation points
                    let obs_t = match $kind {
                        Kind::Interp => gen_obs(&limits, size, 0.0),
                        Kind::Extrap => gen_obs(&limits, size, 0.5),
                    };
                    let obs: [&[f64]; $ndims] = core::array::from_fn(|i| &obs_t[i][..]);
                    let mut out = vec![0.0; size];

                    let limits: [(f64, f64); $ndims] = core::array::from_fn(|i| limits[i]);
                    let opts = InterpOptions::default().footprint(footprint);

                    b.iter(|| {
                        black_box({
                            let vals = TensorView::new(&z, &dims, Layout::RowMajor).unwrap();
                            let interpolator: HatSplineRegular<'_, _, $ndims> =
                                HatSplineRegular::new_with(vals, limits, &opts).unwrap();
                            interpolator.interp(&obs, &mut out).unwrap()
                        })
                    });
                },
            );
        }
    };
}

fn bench_interp(c: &mut Criterion) {
    for gridsize in [10] {
        let mut group = c.benchmark_group(format!("Interp_1D_{gridsize}-grid"));
        for size in [1, 100, 10_000].iter() {
            group.throughput(Throughput::Elements(*size as u64));
            bench_interp_specific!(group, 1, gridsize, size, Kind::Interp);
        }
        group.finish();
    }

    for gridsize in [10] {
        let mut group = c.benchmark_group(format!("Interp_2D_{gridsize}-grid"));
        for size in [1, 100, 10_000].iter() {
            group.throughput(Throughput::Elements(*size as u64));
            bench_interp_specific!(group, 2, gridsize, size, Kind::Interp);
        }
        group.finish();
    }

    for gridsize in [10] {
        let mut group = c.benchmark_group(format!("Interp_3D_{gridsize}-grid"));
        for size in [1, 100, 10_000].iter() {
            group.throughput(Throughput::Elements(*size as u64));
            bench_interp_specific!(group, 3, gridsize, size, Kind::Interp);
        }
        group.finish();
    }
}

fn bench_extrap(c: &mut Criterion) {
    for gridsize in [10] {
        let mut group = c.benchmark_group(format!("Extrap_2D_{gridsize}-grid"));
        for size in [1, 100, 10_000].iter() {
            group.throughput(Throughput::Elements(*size as u64));
            bench_interp_specific!(group, 2, gridsize, size, Kind::Extrap);
        }
        group.finish();
    }
}

criterion_group!(benches_interp, bench_interp);
criterion_group!(benches_extrap, bench_extrap);
criterion_main!(benches_interp, benches_extrap,);

mod randn {
    use rand::distr::{Distribution, StandardUniform};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Fixed random seed to support repeatable testing
    const SEED: [u8; 32] = [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7,
        6, 5, 4, 3, 2, 1,
    ];

    /// Get a random number generator with a const seed for repeatable testing
    pub fn rng_fixed_seed() -> StdRng {
        StdRng::from_seed(SEED)
    }

    /// Generate `n` random numbers using provided generator
    pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
    where
        StandardUniform: Distribution<T>,
    {
        (0..n).map(|_| rng.random::<T>()).collect()
    }
}

mod gridgen {
    use super::randn::*;

    /// Coordinate ranges and random coefficients for a grid of `size` nodes per axis
    pub fn gen_grid(ndims: usize, size: usize) -> (Vec<(f64, f64)>, Vec<f64>) {
        let mut rng = rng_fixed_seed();
        let n = size.pow(ndims as u32);
        let z = randn::<f64>(&mut rng, n);
        let limits = (0..ndims).map(|i| (i as f64, 100.0 + i as f64)).collect();
        (limits, z)
    }

    /// Random observation points, spilling `overshoot` of each range's width
    /// past both ends
    pub fn gen_obs(limits: &[(f64, f64)], size: usize, overshoot: f64) -> Vec<Vec<f64>> {
        let mut rng = rng_fixed_seed();
        limits
            .iter()
            .map(|&(a, b)| {
                let w = (b - a) * (1.0 + 2.0 * overshoot);
                let lo = a - (b - a) * overshoot;
                randn::<f64>(&mut rng, size)
                    .into_iter()
                    .map(|r| lo + r * w)
                    .collect()
            })
            .collect()
    }
}
