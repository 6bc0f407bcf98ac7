//! Print the dominant color and palette of an image file.
//!
//! Usage:
//!   cargo run --example palette --release -- <image> [count] [quality]

use colorcut::{PaletteConfig, RgbaImage};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let input = args
        .get(1)
        .expect("usage: palette <image> [count] [quality]");
    let count: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10);
    let quality: u32 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);

    let img = image::open(input).unwrap().to_rgba8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels: Vec<rgb::RGBA<u8>> = img
        .pixels()
        .map(|p| rgb::RGBA {
            r: p.0[0],
            g: p.0[1],
            b: p.0[2],
            a: p.0[3],
        })
        .collect();

    let image = RgbaImage::new(&pixels, w, h).unwrap();
    let config = PaletteConfig::new().count(count).quality(quality);

    match colorcut::dominant_color(&image, &config) {
        Ok(color) => println!("dominant: {}", colorcut::to_hex(color)),
        Err(e) => {
            eprintln!("{input}: {e}");
            std::process::exit(1);
        }
    }

    let palette = match colorcut::palette(&image, &config) {
        Ok(palette) => palette,
        Err(e) => {
            eprintln!("{input}: {e}");
            std::process::exit(1);
        }
    };
    for swatch in &palette {
        println!("{}  {:>8}", swatch.hex(), swatch.population);
    }
    eprintln!(
        "{input} ({w}x{h}): {} of {count} colors",
        palette.len()
    );
}
