// Window bridge: minifb window + the software render programs behind the
// RenderBridge contract, plus input polling and the 5x7 HUD font.
//
// Draw-time state is exactly what a GPU bridge would hold: the selected
// program, the last pushed transform uniforms, and the latest frame texture.
// `draw_frame` rasterizes the transformed quad with the program applied and
// presents it.

use std::sync::Arc;

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::render::{rasterize_quad, RenderBridge};
use crate::sweep::Signals;
use crate::transform::TransformState;
use crate::types::{FilterKind, Frame};
use crate::Error;

pub struct WindowBridge {
    window: Window,
    out: Frame,
    program: FilterKind,
    transform: TransformState,
    texture: Option<Frame>,
    hud: String,
    signals: Arc<Signals>,
}

impl WindowBridge {
    /// Create a window sized to the camera feed. The bridge owns the shared
    /// signals so sweep/shutdown requests keep working while a sweep has the
    /// main loop busy: every draw also polls the window.
    pub fn new(
        title: &str,
        width: usize,
        height: usize,
        signals: Arc<Signals>,
    ) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self {
            window,
            out: Frame::new(width, height),
            program: FilterKind::None,
            transform: TransformState::identity(),
            texture: None,
            hud: String::new(),
            signals,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Status line drawn over the video on the next draw.
    pub fn set_hud(&mut self, text: impl Into<String>) {
        self.hud = text.into();
    }

    /// Held-key state for the incremental transform controls.
    pub fn key_down(&self, key: Key) -> bool {
        self.window.is_key_down(key)
    }

    /// Edge-triggered key state (fires once per press, not while held).
    pub fn key_pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Map window-level events onto the shared signals. Runs on every draw,
    /// so it also covers the sweep's nested loop.
    fn poll_signals(&self) {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            self.signals.request_shutdown();
        }
        if self.window.is_key_pressed(Key::B, KeyRepeat::No) {
            self.signals.request_sweep();
        }
    }
}

impl RenderBridge for WindowBridge {
    fn select_program(&mut self, kind: FilterKind) {
        self.program = kind;
    }

    fn push_transform(&mut self, transform: &TransformState) {
        self.transform = *transform;
    }

    fn push_frame_texture(&mut self, frame: &Frame) {
        self.texture = Some(frame.clone());
    }

    fn draw_frame(&mut self) -> Result<(), Error> {
        if let Some(tex) = &self.texture {
            rasterize_quad(tex, &self.transform, self.program, &mut self.out);
        }
        if !self.hud.is_empty() {
            draw_text_5x7(&mut self.out, 8, 8, &self.hud, 0x00FF_FFFF);
        }
        self.window
            .update_with_buffer(&self.out.pixels, self.out.width, self.out.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        self.poll_signals();
        Ok(())
    }
}

/* ---------- Software drawing: pixels and a tiny bitmap font ---------- */

/// Put a pixel on the frame if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut Frame, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.set(x, y, color);
}

/// Return a 5x7 glyph bitmap for the character set the HUD needs.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Uppercase letters for the HUD strings:
        // CPU / GPU, NONE / PIXELATE / SINCITY, FPS, SWEEP RUNNING
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        // Punctuation: space, vertical bar, colon, dot
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), with a 1-pixel black shadow for
/// contrast against the video.
fn draw_char_5x7(fb: &mut Frame, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass: offset by (1,1) in black to improve readability
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32 + 1, y + ry as i32 + 1, 0x0000_0000);
                }
            }
        }

        // Foreground pass: actual glyph in chosen color
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs.
pub fn draw_text_5x7(fb: &mut Frame, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}
