// ─────────────────────────────────────────────────────────────────────
// SCPN Lens Core — Multi-Plane Tracing Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use lens_core::cosmology::{Cosmology, FlatLambdaCdm};
use lens_core::galaxy::Galaxy;
use lens_core::mass::MassProfile;
use lens_core::tracer::Tracer;
use lens_types::grid::RegularGrid;
use std::hint::black_box;
use std::sync::Arc;

fn lensing_tracer(n_planes: usize) -> Tracer {
    let cosmology: Arc<dyn Cosmology> = Arc::new(FlatLambdaCdm::planck15());
    let galaxies: Vec<Arc<Galaxy>> = (0..n_planes)
        .map(|k| {
            let redshift = 0.25 * (k + 1) as f64;
            let galaxy = Galaxy::new(redshift);
            if k + 1 == n_planes {
                Arc::new(galaxy)
            } else {
                Arc::new(galaxy.with_mass(MassProfile::SphericalIsothermal {
                    centre: (0.05 * k as f64, -0.05 * k as f64),
                    einstein_radius: 0.6,
                }))
            }
        })
        .collect();
    Tracer::from_galaxies(galaxies, cosmology).expect("benchmark tracer should build")
}

fn bench_traced_grids(c: &mut Criterion) {
    let mut group = c.benchmark_group("traced_grids_of_planes");
    group.sample_size(20);

    for side in [64usize, 128usize] {
        let grid = RegularGrid::new((side, side), 4.0 / side as f64, (0.0, 0.0))
            .expect("benchmark grid should build");
        for n_planes in [2usize, 5usize] {
            let tracer = lensing_tracer(n_planes);
            group.bench_function(format!("{}_planes_{}x{}", n_planes, side, side), |b| {
                b.iter(|| {
                    let traced = tracer
                        .traced_grids_of_planes_from_grid(black_box(grid.grid()), None)
                        .expect("tracing should succeed");
                    black_box(traced.len())
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_traced_grids);
criterion_main!(benches);
