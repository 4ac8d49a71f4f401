use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fixcv_image::{Image, ImageSize};
use fixcv_imgproc::{
    draw::draw_line,
    edges::sobel_edges,
    hough::{find_lines, vote_edges, HoughAccumulator},
};

// a filled triangle, so that the edges run in three directions
fn create_scene(width: usize, height: usize) -> Image<u8> {
    let mut image = Image::from_size_val(ImageSize { width, height }, 0u8).unwrap();
    let (w, h) = (width as i64, height as i64);
    for y in h / 8..7 * h / 8 {
        let half = (y - h / 8) / 2;
        draw_line(&mut image, (w / 2 - half, y), (w / 2 + half, y), 255);
    }
    image
}

fn bench_hough(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hough");

    for (width, height) in [(320, 240), (640, 480)].iter() {
        let src = create_scene(*width, *height);
        let size = src.size();
        let mut gx = Image::from_size_val(size, 0i16).unwrap();
        let mut gy = Image::from_size_val(size, 0i16).unwrap();
        sobel_edges(&src, &mut gx, &mut gy).unwrap();

        let mut mask = Image::from_size_val(size, 0u8).unwrap();
        mask.as_slice_mut()
            .iter_mut()
            .zip(gx.as_slice().iter().zip(gy.as_slice()))
            .for_each(|(m, (&dx, &dy))| *m = u8::from(dx != 0 || dy != 0));

        let origin = ((width / 2) as i32, (height / 2) as i32);

        for neighborhood in [0usize, 1, 3] {
            group.bench_with_input(
                BenchmarkId::new("vote_edges", format!("{width}x{height}_n{neighborhood}")),
                &neighborhood,
                |b, &n| {
                    let mut acc = HoughAccumulator::for_image(size).unwrap();
                    b.iter(|| {
                        acc.clear();
                        vote_edges(&mut acc, &mask, &gx, &gy, origin, n).unwrap()
                    })
                },
            );
        }

        let mut acc = HoughAccumulator::for_image(size).unwrap();
        vote_edges(&mut acc, &mask, &gx, &gy, origin, 1).unwrap();
        group.bench_with_input(
            BenchmarkId::new("find_lines", format!("{width}x{height}")),
            &acc,
            |b, acc| b.iter(|| find_lines(acc, 16)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_hough);
criterion_main!(benches);
