use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fixcv_image::{Image, ImageSize};
use fixcv_imgproc::{
    edges::{edge_magnitude, sobel_edges, EdgeNorm},
    filter::{box_blur3, box_blur3_fast},
    integral::{box_feature, box_feature_size, integral_image, BoxFeature, BoxFeatureParams},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn create_test_image(width: usize, height: usize) -> Image<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<u8> = (0..(width * height)).map(|_| rng.random()).collect();
    Image::new(ImageSize { width, height }, data).unwrap()
}

fn bench_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("Edges");

    for (width, height) in [(320, 240), (640, 480)].iter() {
        let src = create_test_image(*width, *height);
        let size = src.size();
        let parameter_string = format!("{width}x{height}");

        group.bench_with_input(
            BenchmarkId::new("sobel_edges", &parameter_string),
            &src,
            |b, src| {
                let mut gx = Image::from_size_val(size, 0i16).unwrap();
                let mut gy = Image::from_size_val(size, 0i16).unwrap();
                b.iter(|| sobel_edges(src, &mut gx, &mut gy).unwrap())
            },
        );

        let mut gx = Image::from_size_val(size, 0i16).unwrap();
        let mut gy = Image::from_size_val(size, 0i16).unwrap();
        sobel_edges(&src, &mut gx, &mut gy).unwrap();
        for norm in [EdgeNorm::OneNorm, EdgeNorm::TwoNorm] {
            group.bench_with_input(
                BenchmarkId::new(format!("edge_magnitude_{norm:?}"), &parameter_string),
                &norm,
                |b, &norm| {
                    let mut dst = Image::from_size_val(size, 0u8).unwrap();
                    b.iter(|| edge_magnitude(&gx, &gy, norm, 3, &mut dst).unwrap())
                },
            );
        }

        group.bench_with_input(
            BenchmarkId::new("box_blur3", &parameter_string),
            &src,
            |b, src| {
                let mut dst = Image::from_size_val(size, 0u8).unwrap();
                b.iter(|| box_blur3(src, &mut dst).unwrap())
            },
        );

        group.bench_with_input(
            BenchmarkId::new("box_blur3_fast", &parameter_string),
            &src,
            |b, src| {
                let mut dst = Image::from_size_val(size, 0u8).unwrap();
                b.iter(|| box_blur3_fast(src, &mut dst).unwrap())
            },
        );

        group.bench_with_input(
            BenchmarkId::new("integral_box_feature", &parameter_string),
            &src,
            |b, src| {
                let params = BoxFeatureParams::default();
                let mut sat = Image::from_size_val(size, 0u32).unwrap();
                let out_size = box_feature_size(size, BoxFeature::UpDown, &params).unwrap();
                let mut features = Image::from_size_val(out_size, 0u32).unwrap();
                b.iter(|| {
                    integral_image(src, &mut sat).unwrap();
                    box_feature(&sat, BoxFeature::UpDown, &params, &mut features).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_edges);
criterion_main!(benches);
