use guided_vectorize::image::io::load_raw_rgb_color;
use guided_vectorize::pixel_size::{estimate_pixel_size, CalibrationBox};
use std::env;
use std::path::Path;
use std::str::FromStr;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let [w, h, infile, nw_x, nw_y, se_x, se_y] = args.as_slice() else {
        return Err(usage());
    };
    let width: usize = parse_arg(w, "w")?;
    let height: usize = parse_arg(h, "h")?;
    let bbox = CalibrationBox {
        nw_x: parse_arg(nw_x, "nw_x")?,
        nw_y: parse_arg(nw_y, "nw_y")?,
        se_x: parse_arg(se_x, "se_x")?,
        se_y: parse_arg(se_y, "se_y")?,
    };

    let raster = load_raw_rgb_color(Path::new(infile), width, height)
        .map_err(|e| format!("Failed to read {infile}: {e}"))?;
    match estimate_pixel_size(&raster, &bbox) {
        Some(size) => println!("{:.6} {:.6} {:.6}", size.mean, size.x, size.y),
        None => println!("0"),
    }
    Ok(())
}

fn parse_arg<T: FromStr>(value: &str, name: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid {name}: '{value}'\n{}", usage()))
}

fn usage() -> String {
    [
        "Usage: calc_pixel_size <w> <h> <infile> <nw_x> <nw_y> <se_x> <se_y>",
        "  w, h        image size in pixels",
        "  infile      raw RGB image, 3 bytes per pixel",
        "  nw_x, nw_y  NW corner of the red box in meters (EPSG:3857)",
        "  se_x, se_y  SE corner of the red box in meters (EPSG:3857)",
        "Prints the mean, x and y pixel size in meters, or 0 if no box is found.",
    ]
    .join("\n")
}
