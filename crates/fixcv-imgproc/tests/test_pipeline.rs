use fixcv_image::{Image, ImageError, ImageSize};
use fixcv_imgproc::{
    draw::draw_hough_line,
    edges::{edge_magnitude, sobel_edges, EdgeNorm},
    histogram::{compute_histogram, Histogram, U8_BINS},
    hough::{find_lines, hough_radius, reconstruct_line, vote_edges, HoughAccumulator, HoughLine},
    integral::{integral_image, rect_sum},
    morphology::{open, StructuringElement},
    segmentation::{apply_segment_map, SegmentMap},
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn constant_image_histogram() -> Result<(), ImageError> {
    let image = Image::from_size_val([12, 5].into(), 42u8)?;
    let mut hist = Histogram::new(U8_BINS)?;
    compute_histogram(&image, &mut hist)?;

    assert_eq!(hist.number_counts(), 60);
    assert_eq!(hist.bins()[42], 60);
    assert_eq!(hist.sum_bins()[41], 0);
    assert_eq!(hist.sum_bins()[255], 60);
    assert_eq!(hist.median(), 42);

    let stats = hist.stats()?;
    assert_eq!(stats.max_index, 42);
    assert_eq!(stats.mean_index, 42);
    assert_eq!(stats.variance, 0);
    Ok(())
}

#[test]
fn opening_removes_isolated_dot() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 9,
        height: 9,
    };
    let mut image = Image::from_size_val(size, 0u8)?;
    image.set_pixel(1, 1, 255)?;
    for y in 5..8 {
        for x in 5..8 {
            image.set_pixel(x, y, 255)?;
        }
    }
    let block = {
        let mut block = image.clone();
        block.set_pixel(1, 1, 0)?;
        block
    };

    open(&mut image, StructuringElement::Square3, 1, 255)?;
    assert_eq!(image, block);
    Ok(())
}

#[test]
fn integral_of_single_pixel() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 1,
        height: 1,
    };
    let image = Image::new(size, vec![7u8])?;
    let mut sat = Image::from_size_val(size, 0u32)?;
    integral_image(&image, &mut sat)?;

    assert_eq!(rect_sum(&sat, 0, 0, 1, 1)?, 7);
    assert!(rect_sum(&sat, 0, 0, 2, 1).is_err());
    Ok(())
}

#[test]
fn integral_matches_brute_force() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 13,
        height: 9,
    };
    let data: Vec<u8> = (0..size.area()).map(|i| (i * 31 % 251) as u8).collect();
    let image = Image::new(size, data.clone())?;
    let mut sat = Image::from_size_val(size, 0u32)?;
    integral_image(&image, &mut sat)?;

    for (x, y, w, h) in [(0, 0, 13, 9), (3, 2, 4, 5), (12, 8, 1, 1), (0, 4, 13, 1)] {
        let expected: u32 = (y..y + h)
            .flat_map(|r| (x..x + w).map(move |c| (r, c)))
            .map(|(r, c)| u32::from(data[r * size.width + c]))
            .sum();
        assert_eq!(rect_sum(&sat, x, y, w, h)?, expected);
    }
    Ok(())
}

#[test]
fn hough_radius_is_odd_symmetric() {
    for angle_bin in 0..128 {
        for (x, y) in [(0, 0), (5, -3), (-17, 40), (123, 77), (-1, -1)] {
            assert_eq!(
                hough_radius(-x, -y, angle_bin),
                -hough_radius(x, y, angle_bin)
            );
        }
    }
}

#[test]
fn horizontal_edge_round_trip() -> Result<(), ImageError> {
    init_logger();
    let size = ImageSize {
        width: 16,
        height: 12,
    };
    let origin = (8, 6);

    let mut mask = Image::from_size_val(size, 0u8)?;
    let mut gy = Image::from_size_val(size, 0i16)?;
    let gx = Image::from_size_val(size, 0i16)?;
    for x in 0..size.width {
        mask.set_pixel(x, 2, 1)?;
        gy.set_pixel(x, 2, -100)?;
    }

    let mut acc = HoughAccumulator::for_image(size)?;
    assert_eq!(vote_edges(&mut acc, &mask, &gx, &gy, origin, 0)?, 16);
    assert_eq!(acc.total_votes(), 16);

    let lines = find_lines(&acc, 10);
    assert_eq!(
        lines,
        vec![HoughLine {
            angle_bin: 96,
            radius_bin: 1,
            votes: 16
        }]
    );

    let mut drawn = Image::from_size_val(size, 0u8)?;
    draw_hough_line(&mut drawn, (8, 6), 96, 1, 1)?;
    assert_eq!(drawn, mask);
    Ok(())
}

#[test]
fn step_edge_pipeline() -> Result<(), ImageError> {
    init_logger();
    let size = ImageSize {
        width: 32,
        height: 24,
    };
    let data = (0..size.area())
        .map(|i| if i % size.width >= 16 { 200u8 } else { 0 })
        .collect();
    let image = Image::new(size, data)?;

    let mut gx = Image::from_size_val(size, 0i16)?;
    let mut gy = Image::from_size_val(size, 0i16)?;
    sobel_edges(&image, &mut gx, &mut gy)?;
    assert_eq!(gx.get(15, 5), Some(&800));
    assert_eq!(gx.get(16, 5), Some(&800));
    assert!(gy.as_slice().iter().all(|&v| v == 0));

    let mut magnitude = Image::from_size_val(size, 0u8)?;
    edge_magnitude(&gx, &gy, EdgeNorm::OneNorm, 2, &mut magnitude)?;
    assert_eq!(magnitude.get(15, 5), Some(&200));

    // keep everything from 100 upwards
    let mut map = SegmentMap::<u8>::new();
    map.mark_interval(255, 155, 1);
    let mut mask = Image::from_size_val(size, 0u8)?;
    apply_segment_map(&magnitude, &map, &mut mask)?;
    assert_eq!(mask.as_slice().iter().filter(|&&m| m != 0).count(), 44);

    // pixels left of the origin project to a negative radius and are dropped
    let mut acc = HoughAccumulator::for_image(size)?;
    assert_eq!(vote_edges(&mut acc, &mask, &gx, &gy, (16, 12), 0)?, 22);

    let best = find_lines(&acc, 10);
    assert_eq!(best.len(), 1);
    assert_eq!((best[0].angle_bin, best[0].radius_bin), (0, 0));
    assert_eq!(
        reconstruct_line(size, (16, 12), best[0].angle_bin, best[0].radius_bin)?,
        ((16, 0), (16, 23))
    );
    Ok(())
}
