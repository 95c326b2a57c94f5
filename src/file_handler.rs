use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use eframe::egui;

use crate::canvas::{CanvasBuffer, Pixel};
use crate::error::{CanvasError, CanvasResult};

/// Formats the canvas can be saved as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Png,
    Jpeg,
    Bmp,
}

impl SaveFormat {
    pub const ALL: [SaveFormat; 3] = [SaveFormat::Png, SaveFormat::Jpeg, SaveFormat::Bmp];

    /// Resolve the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> CanvasResult<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(SaveFormat::Png),
            "jpg" | "jpeg" => Ok(SaveFormat::Jpeg),
            "bmp" => Ok(SaveFormat::Bmp),
            "" => Err(CanvasError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(CanvasError::UnsupportedFormat(format!(
                ".{other} (choose PNG, JPEG, or BMP)"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SaveFormat::Png => "PNG",
            SaveFormat::Jpeg => "JPEG",
            SaveFormat::Bmp => "BMP",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SaveFormat::Png => &["png"],
            SaveFormat::Jpeg => &["jpg", "jpeg"],
            SaveFormat::Bmp => &["bmp"],
        }
    }

    /// JPEG has no alpha channel; transparent pixels must be flattened first
    pub fn supports_alpha(self) -> bool {
        !matches!(self, SaveFormat::Jpeg)
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            SaveFormat::Png => image::ImageFormat::Png,
            SaveFormat::Jpeg => image::ImageFormat::Jpeg,
            SaveFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Extensions offered by the open dialog
pub const OPEN_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

fn canvas_from_image(img: image::DynamicImage) -> CanvasResult<CanvasBuffer> {
    log::debug!("Successfully decoded image: {}x{}", img.width(), img.height());
    let rgba = img.to_rgba8();
    CanvasBuffer::from_rgba(rgba.width(), rgba.height(), rgba.as_raw())
}

/// Decode an image file into a fresh canvas
pub fn load_image(path: &Path) -> CanvasResult<CanvasBuffer> {
    log::info!("Loading image from path: {}", path.display());
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    canvas_from_image(img)
}

/// Decode in-memory image data (e.g. a dropped file on the web)
pub fn decode_image(bytes: &[u8]) -> CanvasResult<CanvasBuffer> {
    let img = image::load_from_memory(bytes)?;
    canvas_from_image(img)
}

/// Encode the canvas in memory. Formats without alpha are flattened onto `background`.
pub fn encode_canvas(canvas: &CanvasBuffer, format: SaveFormat, background: Pixel) -> CanvasResult<Vec<u8>> {
    let (width, height) = (canvas.width(), canvas.height());
    let invalid = || CanvasError::InvalidDimensions { width, height };

    let image = if format.supports_alpha() {
        let buffer = image::RgbaImage::from_raw(width, height, canvas.to_rgba_bytes()).ok_or_else(invalid)?;
        image::DynamicImage::ImageRgba8(buffer)
    } else {
        let flat = canvas.flattened(background);
        let buffer = image::RgbImage::from_raw(width, height, flat.to_rgb_bytes()).ok_or_else(invalid)?;
        image::DynamicImage::ImageRgb8(buffer)
    };

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format.image_format())?;
    Ok(bytes)
}

/// Save the canvas, choosing the format from the path's extension.
///
/// The file is only written once encoding succeeded, so a codec failure never
/// truncates an existing file.
pub fn save_canvas(canvas: &CanvasBuffer, path: &Path, background: Pixel) -> CanvasResult<SaveFormat> {
    let format = SaveFormat::from_path(path)?;
    let bytes = encode_canvas(canvas, format, background)?;
    fs::write(path, bytes)?;
    log::info!("Image saved to: {} ({})", path.display(), format.name());
    Ok(format)
}

/// An image dropped onto the window, decoded or failed
pub struct DroppedImage {
    pub name: String,
    /// Where the file lives on disk. Browsers and some portals only hand over bytes.
    pub path: Option<PathBuf>,
    pub result: CanvasResult<CanvasBuffer>,
}

/// Collects files dropped onto the window and decodes the first image among them
#[derive(Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process any newly dropped files from the UI context
    /// Returns true if any new files arrived
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Decode the first dropped image file. Non-image files are skipped with a warning.
    pub fn take_dropped_image(&mut self) -> Option<DroppedImage> {
        let files = std::mem::take(&mut self.dropped_files);

        for file in files {
            let name = if let Some(path) = &file.path {
                path.display().to_string()
            } else if !file.name.is_empty() {
                file.name.clone()
            } else {
                "unknown".to_owned()
            };

            if !Self::is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", name);
                continue;
            }

            let result = if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {} ({} bytes)", name, bytes.len());
                decode_image(bytes)
            } else if let Some(path) = &file.path {
                load_image(path)
            } else {
                log::warn!("Dropped file has no accessible data: {}", name);
                continue;
            };

            return Some(DroppedImage {
                name,
                path: file.path,
                result,
            });
        }

        None
    }

    /// Check if a file is an image based on MIME type or extension
    fn is_image_file(file: &egui::DroppedFile) -> bool {
        if !file.mime.is_empty() {
            file.mime.starts_with("image/")
        } else if let Some(path) = &file.path {
            path.extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    OPEN_EXTENSIONS.contains(&ext.as_str())
                })
                .unwrap_or(false)
        } else {
            false
        }
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop an image to open it:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn png_bytes() -> Vec<u8> {
        let canvas = CanvasBuffer::filled(3, 2, Pixel::WHITE).unwrap();
        encode_canvas(&canvas, SaveFormat::Png, Pixel::WHITE).unwrap()
    }

    #[test]
    fn test_bytes_only_drop_has_no_path() {
        let mut handler = FileHandler::new();
        handler.dropped_files = vec![egui::DroppedFile {
            name: "picture.png".to_owned(),
            mime: "image/png".to_owned(),
            bytes: Some(Arc::from(png_bytes())),
            ..Default::default()
        }];

        let dropped = handler.take_dropped_image().unwrap();
        assert_eq!(dropped.name, "picture.png");
        assert!(dropped.path.is_none());
        assert_eq!(dropped.result.unwrap().width(), 3);
        assert!(handler.take_dropped_image().is_none());
    }

    #[test]
    fn test_drop_from_disk_keeps_path() {
        let path = std::env::temp_dir().join(format!("raster_paint_{}_drop.png", std::process::id()));
        std::fs::write(&path, png_bytes()).unwrap();

        let mut handler = FileHandler::new();
        handler.dropped_files = vec![
            egui::DroppedFile {
                path: Some(PathBuf::from("/tmp/notes.txt")),
                ..Default::default()
            },
            egui::DroppedFile {
                path: Some(path.clone()),
                ..Default::default()
            },
        ];

        let dropped = handler.take_dropped_image().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(dropped.path.as_deref(), Some(path.as_path()));
        assert_eq!(dropped.result.unwrap().height(), 2);
    }

    #[test]
    fn test_is_image_file_by_extension() {
        let file = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/picture.PNG")),
            ..Default::default()
        };
        assert!(FileHandler::is_image_file(&file));

        let file = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/notes.txt")),
            ..Default::default()
        };
        assert!(!FileHandler::is_image_file(&file));
    }

    #[test]
    fn test_is_image_file_prefers_mime() {
        let file = egui::DroppedFile {
            mime: "image/bmp".to_owned(),
            ..Default::default()
        };
        assert!(FileHandler::is_image_file(&file));
    }
}
