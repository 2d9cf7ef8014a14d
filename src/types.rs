// Core types shared by the capture, filter, transform and sweep modules.

use std::fmt;

/// One captured video frame.
///
/// `pixels` is row-major, `stride` pixels per row (stride >= width; the extra
/// tail of a row is alignment padding and never displayed). Each entry is
/// 0x00RRGGBB, the layout minifb wants.
#[derive(Clone)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub pixels: Vec<u32>,
}

impl Frame {
    /// A zeroed (black) frame with stride == width.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, stride: width, pixels: vec![0u32; width * height] }
    }

    /// Wrap an existing tightly-packed pixel buffer.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u32>) -> Self {
        Self { width, height, stride: width, pixels }
    }

    /// Structural validity: non-empty, stride covers the width, and the
    /// buffer actually holds every addressable row. Invalid frames are
    /// rejected at the capture boundary and never reach the filters.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.stride >= self.width
            && self.pixels.len() >= self.stride * (self.height - 1) + self.width
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.stride + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: u32) {
        self.pixels[y * self.stride + x] = px;
    }
}

/// The visual effect applied to each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    None,
    Pixelate,
    SinCity,
}

impl FilterKind {
    /// All kinds in selection-key order (1, 2, 3). Also the sweep order.
    pub const ALL: [FilterKind; 3] = [FilterKind::None, FilterKind::Pixelate, FilterKind::SinCity];

    /// Lower-case name used in the record files.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Pixelate => "pixelate",
            FilterKind::SinCity => "sincity",
        }
    }

    /// Upper-case label for the HUD (the 5x7 font only has capitals).
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::None => "NONE",
            FilterKind::Pixelate => "PIXELATE",
            FilterKind::SinCity => "SINCITY",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which path consumes the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Cpu,
    Gpu,
}

impl Backend {
    /// Sweep enumeration order.
    pub const ALL: [Backend; 2] = [Backend::Cpu, Backend::Gpu];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Cpu => "CPU",
            Backend::Gpu => "GPU",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the user can poke at interactively, gathered in one place so
/// input handling and rendering share an explicit object instead of globals.
#[derive(Debug, Clone)]
pub struct InteractionState {
    pub transform: crate::transform::TransformState,
    pub filter: FilterKind,
    pub backend: Backend,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            transform: crate::transform::TransformState::default(),
            filter: FilterKind::None,
            backend: Backend::Gpu,
        }
    }
}

/// Unpack 0x00RRGGBB into channel bytes.
#[inline]
pub fn unpack(px: u32) -> (u32, u32, u32) {
    ((px >> 16) & 0xFF, (px >> 8) & 0xFF, px & 0xFF)
}

/// Pack channel values (already 0..=255) back into 0x00RRGGBB.
#[inline]
pub fn pack(r: u32, g: u32, b: u32) -> u32 {
    (r << 16) | (g << 8) | b
}
