use argh::FromArgs;

use fixcv::{
    image::{Image, ImageSize},
    imgproc::{morphology, resize},
};

#[derive(FromArgs)]
/// Apply morphological operations (erode, dilate, open, close) to a synthetic binary image
struct Args {
    /// operation: erode, dilate, open, close (default: open)
    #[argh(option, short = 'o', default = "String::from(\"open\")")]
    operation: String,

    /// structuring element: h3, h5, v3, v5, s3, s5 (default: s3)
    #[argh(option, short = 'e', default = "String::from(\"s3\")")]
    element: String,

    /// number of iterations (default: 1)
    #[argh(option, short = 'n', default = "1")]
    iterations: usize,

    /// treat the outside of the image as background when eroding
    #[argh(switch, short = 'b')]
    background_border: bool,
}

// two blocks, a thin bar and some isolated dots
fn synthetic_binary(size: ImageSize) -> Result<Image<u8>, Box<dyn std::error::Error>> {
    let mut image = Image::from_size_val(size, 0u8)?;
    let mut fill = |x0: usize, y0: usize, w: usize, h: usize| -> Result<(), Box<dyn std::error::Error>> {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                image.set_pixel(x, y, 255)?;
            }
        }
        Ok(())
    };
    fill(4, 4, 20, 12)?;
    fill(36, 10, 16, 16)?;
    fill(8, 24, 24, 1)?;
    for (x, y) in [(30, 4), (58, 28), (2, 30), (45, 2)] {
        image.set_pixel(x, y, 255)?;
    }
    image.set_pixel(44, 18, 0)?;
    Ok(image)
}

fn print_ascii(title: &str, image: &Image<u8>) -> Result<(), Box<dyn std::error::Error>> {
    let mut small = Image::from_size_val(
        ImageSize {
            width: image.width(),
            height: image.height() / 2,
        },
        0u8,
    )?;
    resize::downsample(image, &mut small)?;

    println!("{title}");
    for y in 0..small.height() {
        let row = small.row(y).unwrap_or_default();
        println!("{}", row.iter().map(|&v| if v != 0 { '#' } else { '.' }).collect::<String>());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let element = match args.element.as_str() {
        "h3" => morphology::StructuringElement::Horizontal3,
        "h5" => morphology::StructuringElement::Horizontal5,
        "v3" => morphology::StructuringElement::Vertical3,
        "v5" => morphology::StructuringElement::Vertical5,
        "s5" => morphology::StructuringElement::Square5,
        _ => morphology::StructuringElement::Square3,
    };
    let border = if args.background_border {
        morphology::BorderMode::Background
    } else {
        morphology::BorderMode::Skip
    };

    let source = synthetic_binary(ImageSize {
        width: 64,
        height: 32,
    })?;
    let mut image = source.clone();

    match args.operation.as_str() {
        "erode" => {
            for _ in 0..args.iterations {
                morphology::erode(&mut image, element, border, 0)?;
            }
        }
        "dilate" => {
            for _ in 0..args.iterations {
                morphology::dilate(&mut image, element, 255)?;
            }
        }
        "close" => morphology::close(&mut image, element, args.iterations, 255)?,
        _ => morphology::open(&mut image, element, args.iterations, 255)?,
    }

    let count = |img: &Image<u8>| img.as_slice().iter().filter(|&&v| v != 0).count();
    log::info!(
        "{} with {element:?} x{}: {} -> {} pixels on",
        args.operation,
        args.iterations,
        count(&source),
        count(&image)
    );

    print_ascii("input", &source)?;
    print_ascii(&args.operation, &image)?;

    Ok(())
}
