use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use corner_watermark::{
    default_output_path, to_data_url, Color, FsLoader, ProcessResult, WatermarkEngine,
    WatermarkStyle,
};

#[derive(Parser)]
#[command(
    name = "corner-watermark",
    about = "Stamp a logo and a text label onto square-cropped images",
    version,
    after_help = "Simple usage: corner-watermark <image>  (writes <name>_watermarked.<ext>)\n\n\
                  Asset paths in the style (logo, icon, font) are resolved against --assets."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_watermarked.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// TOML style file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory that logo, icon and font locations are relative to
    #[arg(short, long, default_value = ".")]
    assets: PathBuf,

    /// Text label to stamp in the bottom-right corner
    #[arg(short, long)]
    text: Option<String>,

    /// Logo image location
    #[arg(long)]
    logo: Option<String>,

    /// Icon image location
    #[arg(long)]
    icon: Option<String>,

    /// Font file location
    #[arg(long)]
    font: Option<String>,

    /// Text color on dark backgrounds (#RGB or #RRGGBB)
    #[arg(long)]
    text_light: Option<Color>,

    /// Text color on bright backgrounds (#RGB or #RRGGBB)
    #[arg(long)]
    text_dark: Option<Color>,

    /// Largest output edge in pixels
    #[arg(short = 'm', long)]
    max_size: Option<u32>,

    /// Print the result as a PNG data URL instead of writing a file
    #[arg(long)]
    data_url: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn style(&self) -> Result<WatermarkStyle, String> {
        let mut style = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
                toml::from_str::<WatermarkStyle>(&raw)
                    .map_err(|e| format!("Invalid style {}: {e}", path.display()))?
            }
            None => WatermarkStyle::default(),
        };

        if let Some(text) = &self.text {
            style.text.content.clone_from(text);
        }
        if let Some(logo) = &self.logo {
            style.logo.source.clone_from(logo);
        }
        if let Some(icon) = &self.icon {
            style.icon.source.clone_from(icon);
        }
        if let Some(font) = &self.font {
            style.text.font.clone_from(font);
        }
        if let Some(color) = self.text_light {
            style.text.light_color = color;
        }
        if let Some(color) = self.text_dark {
            style.text.dark_color = color;
        }
        if let Some(max) = self.max_size {
            style.max_image_size = max;
        }

        Ok(style)
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let style = match cli.style() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let loader = FsLoader::new(&cli.assets);
    let engine = match WatermarkEngine::new(style, &loader) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Fatal: Failed to initialize engine: {e}");
            process::exit(1);
        }
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if cli.data_url {
        print_data_url(&engine, input_path);
        return;
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: corner-watermark <input_dir> -o <output_dir>");
            process::exit(1);
        };
        engine.process_directory(input_path, &output_dir)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![engine.process_file(input_path, &output_path)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &cli);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !cli.quiet {
        eprintln!();
        eprint!("[Summary] Watermarked: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_data_url(engine: &WatermarkEngine, input: &Path) {
    if input.is_dir() {
        eprintln!("Error: --data-url takes a single image, not a directory");
        process::exit(1);
    }

    let url = image::open(input)
        .map_err(|e| format!("Failed to load: {e}"))
        .and_then(|img| engine.apply(&img).map_err(|e| e.to_string()))
        .and_then(|stamped| to_data_url(&stamped).map_err(|e| e.to_string()));

    match url {
        Ok(url) => println!("{url}"),
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", input.display());
            process::exit(1);
        }
    }
}

fn print_result(result: &ProcessResult, cli: &Cli) {
    if cli.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        eprintln!("[OK] {filename} -> {}", result.output.display());
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if cli.verbose && result.success {
        eprintln!("  -> {}", result.message);
    }
}
