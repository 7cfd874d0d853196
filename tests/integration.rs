use corner_watermark::testing::BlockRenderer;
use corner_watermark::{
    AssetKind, Color, Error, MemoryLoader, WatermarkAssets, WatermarkEngine, WatermarkStyle,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

fn engine(style: WatermarkStyle) -> WatermarkEngine {
    let assets = WatermarkAssets {
        logo: RgbaImage::from_pixel(400, 200, Rgba([0, 0, 0, 255])),
        icon: RgbaImage::from_pixel(16, 32, Rgba([0, 0, 0, 255])),
        text: Box::new(BlockRenderer),
    };
    WatermarkEngine::from_assets(style, assets).unwrap()
}

fn solid(w: u32, h: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([value, value, value, 255])))
}

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn black_source_gets_light_layers() {
    let engine = engine(WatermarkStyle::default());
    let result = engine.render(&solid(1024, 1024, 0)).unwrap();

    let style = engine.style();
    assert_eq!(result.text_color, style.text.light_color);
    assert_eq!(result.logo_color, style.logo.light_color);
    assert_eq!(result.image.dimensions(), (1024, 1024));
}

#[test]
fn white_source_gets_dark_layers() {
    let engine = engine(WatermarkStyle::default());
    let result = engine.render(&solid(300, 300, 255)).unwrap();

    assert_eq!(result.text_color, Color::new(0x44, 0x44, 0x44));
    assert_eq!(result.logo_color, Color::new(0xcc, 0xcc, 0xcc));
}

#[test]
fn transparent_source_is_treated_as_white() {
    let engine = engine(WatermarkStyle::default());
    let clear = DynamicImage::ImageRgba8(RgbaImage::new(200, 200));
    let result = engine.render(&clear).unwrap();

    assert_eq!(result.text_color, engine.style().text.dark_color);
    assert_eq!(*result.image.get_pixel(100, 100), Rgba([255, 255, 255, 255]));
}

#[test]
fn oversized_source_is_center_cropped() {
    let style = WatermarkStyle {
        max_image_size: 500,
        ..WatermarkStyle::default()
    };
    let engine = engine(style);
    let result = engine.render(&solid(2000, 1000, 90)).unwrap();

    assert_eq!(result.image.dimensions(), (500, 500));
    assert_eq!((result.crop.x, result.crop.y, result.crop.edge), (750, 250, 500));
}

#[test]
fn both_layers_land_in_their_corners() {
    let engine = engine(WatermarkStyle::default());
    let out = engine.apply(&solid(1000, 1000, 0)).unwrap();

    let white = Rgba([255, 255, 255, 255]);
    // Logo: 150 x 75 at (50, 50).
    assert_eq!(*out.get_pixel(120, 80), white);
    // Text "123": 225 x 105 ending at (900, 900).
    assert_eq!(*out.get_pixel(800, 850), white);
    // Icon: 75 x 150 at (592, 772).
    assert_eq!(*out.get_pixel(630, 850), white);
    // Untouched background.
    assert_eq!(*out.get_pixel(500, 500), Rgba([0, 0, 0, 255]));
    assert_eq!(*out.get_pixel(950, 950), Rgba([0, 0, 0, 255]));
}

#[test]
fn rendering_is_deterministic() {
    let engine = engine(WatermarkStyle::default());
    let src = solid(640, 480, 30);
    assert_eq!(engine.apply(&src).unwrap(), engine.apply(&src).unwrap());
}

#[test]
fn empty_source_is_rejected() {
    let engine = engine(WatermarkStyle::default());
    let err = engine.apply(&DynamicImage::new_rgba8(0, 10)).unwrap_err();
    assert!(matches!(err, Error::ImageTooSmall { width: 0, height: 10 }));
}

#[test]
fn invalid_style_is_rejected() {
    let style = WatermarkStyle {
        max_image_size: 0,
        ..WatermarkStyle::default()
    };
    let assets = WatermarkAssets {
        logo: RgbaImage::new(1, 1),
        icon: RgbaImage::new(1, 1),
        text: Box::new(BlockRenderer),
    };
    assert!(matches!(
        WatermarkEngine::from_assets(style, assets),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn missing_logo_surfaces_an_error() {
    let loader = MemoryLoader::new().with("lightning.png", png_bytes(&RgbaImage::new(4, 4)));
    let err = WatermarkEngine::new(WatermarkStyle::default(), &loader).unwrap_err();
    assert!(matches!(
        err,
        Error::AssetLoad {
            kind: AssetKind::Logo,
            ..
        }
    ));
}

#[test]
fn process_file_writes_square_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    solid(120, 80, 200).save(&input).unwrap();
    let output = dir.path().join("out").join("photo.jpg");

    let engine = engine(WatermarkStyle::default());
    let result = engine.process_file(&input, &output);

    assert!(result.success, "{}", result.message);
    assert!(result.message.starts_with("80x80"));
    let written = image::open(&output).unwrap();
    assert_eq!((written.width(), written.height()), (80, 80));
}

#[test]
fn process_file_reports_unreadable_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"not a png").unwrap();

    let engine = engine(WatermarkStyle::default());
    let result = engine.process_file(&input, &dir.path().join("out.png"));

    assert!(!result.success);
    assert!(result.message.starts_with("Failed to load"));
}

#[test]
fn process_directory_handles_supported_files_only() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    std::fs::create_dir(&input_dir).unwrap();
    solid(64, 64, 10).save(input_dir.join("a.png")).unwrap();
    solid(50, 70, 250).save(input_dir.join("b.bmp")).unwrap();
    std::fs::write(input_dir.join("notes.txt"), "skip me").unwrap();

    let engine = engine(WatermarkStyle::default());
    let mut results = engine.process_directory(&input_dir, &output_dir);
    results.sort_by(|a, b| a.path.cmp(&b.path));

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));
    assert!(output_dir.join("a.png").exists());
    assert!(output_dir.join("b.bmp").exists());
    assert!(!output_dir.join("notes.txt").exists());
}

#[test]
fn font_renderer_sizes_text_and_icon_in_ems() {
    let font = include_bytes!("fixtures/DejaVuSansMono-Bold.ttf").to_vec();
    let black = |w, h| png_bytes(&RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])));
    let loader = MemoryLoader::new()
        .with("logo.png", black(400, 200))
        .with("lightning.png", black(16, 32))
        .with("OxygenMono.ttf", font);
    let engine = WatermarkEngine::new(WatermarkStyle::default(), &loader).unwrap();

    let result = engine.render(&solid(1000, 1000, 0)).unwrap();
    assert_eq!(result.text_color, engine.style().text.light_color);

    let white = Rgba([255, 255, 255, 255]);
    let out = &result.image;
    // "8" advances 1233 / 2048 em = 90.3 px at size 150, so the icon is
    // 90 x 180 at (529, 753).
    assert_eq!(*out.get_pixel(574, 845), white);
    assert_eq!(*out.get_pixel(525, 845), Rgba([0, 0, 0, 255]));
    // Text ink stays between the icon and the right padding.
    let text_ink = (630..900)
        .flat_map(|x| (780..900).map(move |y| (x, y)))
        .filter(|&(x, y)| *out.get_pixel(x, y) == white)
        .count();
    assert!(text_ink > 0);
    assert!((900..1000).all(|x| *out.get_pixel(x, 850) == Rgba([0, 0, 0, 255])));
}
