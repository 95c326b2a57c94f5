use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// Largest width or height a canvas may have
pub const MAX_DIMENSION: u32 = 10_000;

/// A single RGBA pixel with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel::rgba(0, 0, 0, 0);
    pub const BLACK: Pixel = Pixel::rgb(0, 0, 0);
    pub const WHITE: Pixel = Pixel::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Largest absolute difference over the four channels
    pub fn max_channel_distance(self, other: Pixel) -> u8 {
        let a = self.to_array();
        let b = other.to_array();
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.abs_diff(*y))
            .max()
            .unwrap_or(0)
    }

    /// Composite this pixel over an opaque background, producing an opaque pixel
    pub fn over_opaque(self, background: Pixel) -> Pixel {
        let alpha = self.a as u32;
        let blend = |src: u8, dst: u8| -> u8 {
            ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Pixel::rgb(
            blend(self.r, background.r),
            blend(self.g, background.g),
            blend(self.b, background.b),
        )
    }
}

impl From<Color32> for Pixel {
    fn from(color: Color32) -> Self {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        Pixel::rgba(r, g, b, a)
    }
}

impl From<Pixel> for Color32 {
    fn from(pixel: Pixel) -> Self {
        Color32::from_rgba_unmultiplied(pixel.r, pixel.g, pixel.b, pixel.a)
    }
}

/// Where existing content is placed when a canvas changes size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::Top,
        Anchor::TopRight,
        Anchor::Left,
        Anchor::Center,
        Anchor::Right,
        Anchor::BottomLeft,
        Anchor::Bottom,
        Anchor::BottomRight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Anchor::TopLeft => "Top left",
            Anchor::Top => "Top",
            Anchor::TopRight => "Top right",
            Anchor::Left => "Left",
            Anchor::Center => "Center",
            Anchor::Right => "Right",
            Anchor::BottomLeft => "Bottom left",
            Anchor::Bottom => "Bottom",
            Anchor::BottomRight => "Bottom right",
        }
    }

    /// Offset of the old content's origin inside the new canvas
    fn offset(self, old: (u32, u32), new: (u32, u32)) -> (i64, i64) {
        let dw = new.0 as i64 - old.0 as i64;
        let dh = new.1 as i64 - old.1 as i64;
        let x = match self {
            Anchor::TopLeft | Anchor::Left | Anchor::BottomLeft => 0,
            Anchor::Top | Anchor::Center | Anchor::Bottom => dw / 2,
            Anchor::TopRight | Anchor::Right | Anchor::BottomRight => dw,
        };
        let y = match self {
            Anchor::TopLeft | Anchor::Top | Anchor::TopRight => 0,
            Anchor::Left | Anchor::Center | Anchor::Right => dh / 2,
            Anchor::BottomLeft | Anchor::Bottom | Anchor::BottomRight => dh,
        };
        (x, y)
    }
}

fn validate_dimensions(width: u32, height: u32) -> CanvasResult<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// The drawing surface: a row-major grid of pixels
#[derive(Clone, PartialEq, Eq)]
pub struct CanvasBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl std::fmt::Debug for CanvasBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CanvasBuffer {
    /// Creates a fully transparent canvas
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        Self::filled(width, height, Pixel::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, pixel: Pixel) -> CanvasResult<Self> {
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        })
    }

    /// Wraps raw RGBA8 bytes as produced by an image decoder
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> CanvasResult<Self> {
        validate_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            log::error!(
                "Pixel data size mismatch: expected {} bytes, got {} bytes",
                expected,
                bytes.len()
            );
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Pixel::rgba(c[0], c[1], c[2], c[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> CanvasResult<usize> {
        if !self.contains(x, y) {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> CanvasResult<Pixel> {
        let idx = self.index(x, y)?;
        Ok(self.pixels[idx])
    }

    pub fn set(&mut self, x: i32, y: i32, pixel: Pixel) -> CanvasResult<()> {
        let idx = self.index(x, y)?;
        self.pixels[idx] = pixel;
        Ok(())
    }

    /// Unchecked access for the rasterizers, which clip before calling.
    #[inline]
    pub(crate) fn pixel_at(&self, x: u32, y: u32) -> Pixel {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Writes a pixel, returning whether its value changed.
    #[inline]
    pub(crate) fn put(&mut self, x: u32, y: u32, pixel: Pixel) -> bool {
        let idx = y as usize * self.width as usize + x as usize;
        let slot = &mut self.pixels[idx];
        if *slot == pixel {
            false
        } else {
            *slot = pixel;
            true
        }
    }

    /// Resets every pixel to transparent
    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::TRANSPARENT);
    }

    /// Builds a buffer of the new size with the overlapping content copied in.
    ///
    /// `self` is never modified; on error the caller keeps the old buffer.
    pub fn resize(&self, width: u32, height: u32, anchor: Anchor) -> CanvasResult<CanvasBuffer> {
        validate_dimensions(width, height)?;
        let mut resized = CanvasBuffer::new(width, height)?;
        let (dx, dy) = anchor.offset((self.width, self.height), (width, height));

        for y in 0..self.height as i64 {
            let ny = y + dy;
            if ny < 0 || ny >= height as i64 {
                continue;
            }
            // Horizontal overlap of this row, in source coordinates
            let x_start = (-dx).max(0);
            let x_end = (width as i64 - dx).min(self.width as i64);
            if x_start >= x_end {
                continue;
            }
            let src_row = y as usize * self.width as usize;
            let dst_row = ny as usize * width as usize;
            let src = &self.pixels[src_row + x_start as usize..src_row + x_end as usize];
            let dst_start = dst_row + (x_start + dx) as usize;
            resized.pixels[dst_start..dst_start + src.len()].copy_from_slice(src);
        }

        Ok(resized)
    }

    /// Copy with every pixel composited onto an opaque background
    pub fn flattened(&self, background: Pixel) -> CanvasBuffer {
        CanvasBuffer {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .map(|p| p.over_opaque(background))
                .collect(),
        }
    }

    /// Row-major RGBA8 bytes for the encoder
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Row-major RGB8 bytes, dropping alpha
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }

    /// Image suitable for uploading as an egui texture
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size(), &self.to_rgba_bytes())
    }
}
