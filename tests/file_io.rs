use std::path::{Path, PathBuf};

use raster_paint::file_handler::{encode_canvas, load_image, save_canvas};
use raster_paint::{CanvasBuffer, CanvasError, EditorSession, PaintConfig, Pixel, SaveFormat};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("raster_paint_{}_{}", std::process::id(), name))
}

fn sample_canvas() -> CanvasBuffer {
    let mut canvas = CanvasBuffer::new(4, 3).unwrap();
    canvas.set(0, 0, Pixel::rgb(255, 0, 0)).unwrap();
    canvas.set(3, 2, Pixel::rgba(0, 0, 255, 128)).unwrap();
    canvas
}

#[test]
fn test_format_from_extension() {
    assert_eq!(SaveFormat::from_path(Path::new("a.png")).unwrap(), SaveFormat::Png);
    assert_eq!(SaveFormat::from_path(Path::new("a.PNG")).unwrap(), SaveFormat::Png);
    assert_eq!(SaveFormat::from_path(Path::new("a.jpg")).unwrap(), SaveFormat::Jpeg);
    assert_eq!(SaveFormat::from_path(Path::new("a.jpeg")).unwrap(), SaveFormat::Jpeg);
    assert_eq!(SaveFormat::from_path(Path::new("dir/a.bmp")).unwrap(), SaveFormat::Bmp);

    assert!(matches!(
        SaveFormat::from_path(Path::new("a.gif")),
        Err(CanvasError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        SaveFormat::from_path(Path::new("noextension")),
        Err(CanvasError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_png_round_trip_keeps_alpha() {
    let canvas = sample_canvas();
    let path = temp_path("round_trip.png");

    let format = save_canvas(&canvas, &path, Pixel::WHITE).unwrap();
    assert_eq!(format, SaveFormat::Png);

    let loaded = load_image(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, canvas);
}

#[test]
fn test_bmp_round_trip() {
    let canvas = CanvasBuffer::filled(3, 2, Pixel::rgb(10, 200, 30)).unwrap();
    let path = temp_path("round_trip.bmp");
    save_canvas(&canvas, &path, Pixel::WHITE).unwrap();

    let loaded = load_image(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!((loaded.width(), loaded.height()), (3, 2));
    assert_eq!(loaded.get(2, 1).unwrap(), Pixel::rgb(10, 200, 30));
}

#[test]
fn test_jpeg_is_flattened_onto_background() {
    // Fully transparent canvas comes back (close to) white
    let canvas = CanvasBuffer::new(16, 16).unwrap();
    let bytes = encode_canvas(&canvas, SaveFormat::Jpeg, Pixel::WHITE).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

    for pixel in decoded.pixels() {
        assert_eq!(pixel[3], 255);
        assert!(pixel[0] > 245 && pixel[1] > 245 && pixel[2] > 245, "{pixel:?}");
    }
}

#[test]
fn test_unsupported_extension_writes_nothing() {
    let path = temp_path("picture.gif");
    let result = save_canvas(&sample_canvas(), &path, Pixel::WHITE);
    assert!(matches!(result, Err(CanvasError::UnsupportedFormat(_))));
    assert!(!path.exists());
}

#[test]
fn test_loading_garbage_fails() {
    let path = temp_path("garbage.png");
    std::fs::write(&path, b"definitely not a png").unwrap();
    let result = load_image(&path);
    std::fs::remove_file(&path).ok();
    assert!(result.is_err());
}

#[test]
fn test_session_open_failure_keeps_canvas() {
    let config = PaintConfig {
        default_width: 5,
        default_height: 5,
        ..PaintConfig::default()
    };
    let mut session = EditorSession::new(config).unwrap();
    session.clear();

    let missing = temp_path("missing.png");
    assert!(session.open_file(&missing).is_err());
    assert_eq!(session.canvas().width(), 5);
    assert!(session.history().can_undo());
}

#[test]
fn test_session_save_and_open() {
    let config = PaintConfig {
        default_width: 6,
        default_height: 4,
        ..PaintConfig::default()
    };
    let mut session = EditorSession::new(config.clone()).unwrap();
    session.resize(8, 4, raster_paint::Anchor::TopLeft).unwrap();

    let path = temp_path("session.png");
    assert_eq!(session.save_file(&path).unwrap(), SaveFormat::Png);

    let mut other = EditorSession::new(config).unwrap();
    other.open_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!((other.canvas().width(), other.canvas().height()), (8, 4));
    assert!(!other.history().can_undo());
}

#[test]
fn test_session_jpeg_uses_configured_background() {
    let session = EditorSession::new(PaintConfig {
        default_width: 8,
        default_height: 8,
        jpeg_background: Pixel::BLACK,
        ..PaintConfig::default()
    })
    .unwrap();
    let path = temp_path("background.jpg");

    assert_eq!(session.save_file(&path).unwrap(), SaveFormat::Jpeg);
    let reopened = load_image(&path).unwrap();
    std::fs::remove_file(&path).ok();
    let corner = reopened.get(0, 0).unwrap();
    assert_eq!(corner.a, 255);
    assert!(corner.max_channel_distance(Pixel::BLACK) <= 8, "{corner:?}");
}
