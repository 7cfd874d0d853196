//! Watermark a single image with the default style.
//!
//! Usage:
//! ```sh
//! cargo run --example watermark_image -- <assets_dir> input.jpg output.png
//! ```
//!
//! `assets_dir` must contain `logo.png`, `lightning.png` and `OxygenMono.ttf`.

use std::env;
use std::process;

use corner_watermark::{FsLoader, WatermarkEngine, WatermarkStyle};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <assets_dir> <input> <output>", args[0]);
        process::exit(1);
    }

    let loader = FsLoader::new(&args[1]);
    let engine = match WatermarkEngine::new(WatermarkStyle::default(), &loader) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let result = engine.process_file(args[2].as_ref(), args[3].as_ref());
    if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
