use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ndarray::{ArrayD, IxDyn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use voxwarp_image::{SpatialImage, VoxelGrid};
use voxwarp_interp::ExtendMode;
use voxwarp_resample::{resample, ResampleOptions};
use voxwarp_transforms::AffineTransform;

fn random_image(side: usize, seed: u64) -> SpatialImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = ArrayD::from_shape_fn(IxDyn(&[side, side, side]), |_| {
        rng.random_range(0.0..1000.0)
    });
    SpatialImage::from_grid(data, VoxelGrid::unit([side, side, side]).unwrap()).unwrap()
}

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    for &side in &[16usize, 32, 64] {
        let image = random_image(side, 42);
        let transform = AffineTransform::translation(0.25, 0.5, 0.75);
        group.throughput(Throughput::Elements((side * side * side) as u64));

        for &order in &[0usize, 1, 3] {
            let options = ResampleOptions {
                order,
                mode: ExtendMode::Nearest,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("order{}", order), side),
                &side,
                |b, _| {
                    b.iter(|| {
                        let out =
                            resample(&transform, &image, Some(image.grid()), &options).unwrap();
                        std::hint::black_box(out);
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_resample);
criterion_main!(benches);
