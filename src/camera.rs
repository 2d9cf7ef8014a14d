// Frame source: opens the camera and converts frames into display-ready
// buffers. When `capture()` returns Some, you get a validated Frame of
// 0x00RRGGBB pixels ready to filter or push to the window.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::types::Frame;
use crate::Error;

// We also use `image` crate types for the decoded RGB frame buffer.
use image::{ImageBuffer, Rgb};

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// Warm-up protocol bounds: some devices need a moment before the first
/// usable frame arrives after the stream opens.
pub const WARMUP_ATTEMPTS: u32 = 30;
pub const WARMUP_DELAY: Duration = Duration::from_millis(50);

/// Anything that can be captured from. The sweep controller and the main
/// loop only see this trait, so tests can drive them with scripted sources.
pub trait FrameSource {
    /// Request a new device configuration. Takes effect on the next capture;
    /// the device may pick a nearby mode, so read back `current_resolution`.
    fn configure(&mut self, width: u32, height: u32, target_fps: u32) -> Result<(), Error>;

    /// One frame, or None when the device had nothing usable. A structurally
    /// invalid frame is treated exactly like an empty one: rejected here,
    /// never forwarded downstream.
    fn capture(&mut self) -> Option<Frame>;

    /// The resolution the device actually runs at (not what was asked for).
    fn current_resolution(&self) -> (u32, u32);
}

/// A small wrapper around nokhwa::Camera so the main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    index: u32,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` at a target resolution (the device may pick a
    /// close-by mode). Failure here is fatal: no device, no app.
    pub fn new(index: u32, width: u32, height: u32, target_fps: u32) -> Result<Self, Error> {
        let cam = open_device(index, width, height, target_fps)?;
        let actual = cam.resolution();
        info!(
            "camera stream open: requested {width}x{height}, actual {}x{}",
            actual.width(),
            actual.height()
        );
        Ok(Self { cam, index, width: actual.width(), height: actual.height() })
    }

    /// Startup warm-up: poll for a first valid frame a bounded number of
    /// times with a fixed delay. Returns true once one arrives. Running out
    /// of attempts is degraded, not fatal; the caller keeps going and the
    /// main loop retries per frame.
    pub fn warm_up(&mut self) -> bool {
        for attempt in 1..=WARMUP_ATTEMPTS {
            if self.capture().is_some() {
                debug!(attempt, "warm-up produced a valid frame");
                return true;
            }
            thread::sleep(WARMUP_DELAY);
        }
        warn!(
            attempts = WARMUP_ATTEMPTS,
            "warm-up exhausted without a valid frame, continuing degraded"
        );
        false
    }

    /// Fetch and decode one frame, then validate it. Any fetch/decode error
    /// or structural defect collapses to None: the caller skips and retries.
    fn grab(&mut self) -> Result<Frame, Error> {
        let raw = self
            .cam
            .frame()
            .map_err(|e| Error::InvalidFrame(format!("fetch: {e}")))?;

        // Decode to an RGB image buffer; handles the various raw formats.
        let rgb_img: ImageBuffer<Rgb<u8>, Vec<u8>> = raw
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::InvalidFrame(format!("decode: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for (_x, _y, pixel) in rgb_img.enumerate_pixels() {
            // Each `pixel` is Rgb<u8>; pack as 0x00RRGGBB.
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            pixels.push((r << 16) | (g << 8) | b);
        }

        let frame = Frame::from_pixels(w as usize, h as usize, pixels);
        if !frame.is_valid() {
            return Err(Error::InvalidFrame(format!("structural check failed ({w}x{h})")));
        }
        Ok(frame)
    }
}

impl FrameSource for CameraCapture {
    fn configure(&mut self, width: u32, height: u32, target_fps: u32) -> Result<(), Error> {
        // nokhwa negotiates the format at open time, so reconfiguration is a
        // clean reopen of the same device index.
        let cam = open_device(self.index, width, height, target_fps)?;
        let actual = cam.resolution();
        info!(
            "camera reconfigured: requested {width}x{height}, actual {}x{}",
            actual.width(),
            actual.height()
        );
        self.cam = cam;
        self.width = actual.width();
        self.height = actual.height();
        Ok(())
    }

    fn capture(&mut self) -> Option<Frame> {
        match self.grab() {
            Ok(frame) => Some(frame),
            Err(e) => {
                debug!(error = %e, "frame rejected");
                None
            }
        }
    }

    fn current_resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn open_device(index: u32, width: u32, height: u32, target_fps: u32) -> Result<Camera, Error> {
    let idx = CameraIndex::Index(index);

    let fmt = CameraFormat::new(
        Resolution::new(width, height),
        FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
        target_fps,
    );

    // Ask for RGB frames as close to the requested format as the device has.
    let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

    let mut cam = Camera::new(idx, req)
        .map_err(|e| Error::DeviceUnavailable(format!("create camera: {e}")))?;

    cam.open_stream()
        .map_err(|e| Error::DeviceUnavailable(format!("open stream: {e}")))?;

    Ok(cam)
}
