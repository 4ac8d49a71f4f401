use argh::FromArgs;

use fixcv::{
    image::{Image, ImageSize},
    imgproc::{draw, edges, filter, histogram, hough, segmentation},
};

#[derive(FromArgs)]
/// Detect the straight edges of a synthetic scene with the gradient-restricted Hough transform
struct Args {
    /// width of the synthetic image (default: 160)
    #[argh(option, short = 'w', default = "160")]
    width: usize,

    /// height of the synthetic image (default: 120)
    #[argh(option, short = 'h', default = "120")]
    height: usize,

    /// number of angle bins on each side of the gradient direction (default: 1)
    #[argh(option, short = 'n', default = "1")]
    neighborhood: usize,

    /// minimum number of votes for a line (default: 20)
    #[argh(option, short = 'v', default = "20")]
    min_votes: u32,

    /// maximum number of lines to report (default: 8)
    #[argh(option, short = 'k', default = "8")]
    max_lines: usize,
}

// a bright quadrilateral on a dark background
fn synthetic_scene(size: ImageSize) -> Result<Image<u8>, Box<dyn std::error::Error>> {
    let mut image = Image::from_size_val(size, 20u8)?;
    let (w, h) = (size.width as i64, size.height as i64);
    let (x0, x1) = (w / 4, 3 * w / 4);
    for y in h / 4..3 * h / 4 {
        // the right side leans so that one edge is oblique
        let lean = (y - h / 4) / 3;
        draw::draw_line(&mut image, (x0, y), (x1 - lean, y), 200);
    }
    Ok(image)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let scene = synthetic_scene(size)?;

    // smooth before differentiating
    let mut smooth = scene.clone();
    filter::box_blur3(&scene, &mut smooth)?;

    let mut gx = Image::from_size_val(size, 0i16)?;
    let mut gy = Image::from_size_val(size, 0i16)?;
    edges::sobel_edges(&smooth, &mut gx, &mut gy)?;

    let mut magnitude = Image::from_size_val(size, 0u8)?;
    edges::edge_magnitude(&gx, &gy, edges::EdgeNorm::OneNorm, 3, &mut magnitude)?;

    let mut hist = histogram::Histogram::new(histogram::U8_BINS)?;
    histogram::compute_histogram(&magnitude, &mut hist)?;
    let threshold = hist.otsu_threshold().unwrap_or(128).min(254) as u8;
    log::info!("edge threshold: {threshold}");

    // everything strictly above the threshold is an edge
    let mut edge_map = segmentation::SegmentMap::<u8>::new();
    edge_map.mark_interval(255, 255 - (threshold + 1), 255);
    let mut mask = Image::from_size_val(size, 0u8)?;
    segmentation::apply_segment_map(&magnitude, &edge_map, &mut mask)?;

    let origin = ((size.width / 2) as i32, (size.height / 2) as i32);
    let mut acc = hough::HoughAccumulator::for_image(size)?;
    let votes = hough::vote_edges(&mut acc, &mask, &gx, &gy, origin, args.neighborhood)?;
    log::info!("{votes} votes over {} radius bins", acc.radius_bins());

    let lines = hough::find_lines(&acc, args.min_votes);
    let mut overlay = scene.clone();
    for line in lines.iter().take(args.max_lines) {
        let (p0, p1) = hough::reconstruct_line(
            size,
            (i64::from(origin.0), i64::from(origin.1)),
            line.angle_bin,
            line.radius_bin,
        )?;
        log::info!(
            "line angle={} radius={} votes={} from {p0:?} to {p1:?}",
            line.angle_bin,
            line.radius_bin,
            line.votes
        );
        draw::draw_line(&mut overlay, p0, p1, 255);
    }

    let drawn = overlay
        .as_slice()
        .iter()
        .zip(scene.as_slice())
        .filter(|(o, s)| o != s)
        .count();
    println!(
        "found {} lines, {} shown, {drawn} pixels drawn",
        lines.len(),
        lines.len().min(args.max_lines)
    );

    Ok(())
}
