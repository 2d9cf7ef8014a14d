// Benchmark sweep controller: drive a deterministic cross-product of
// configurations through the pipeline, time each one for a fixed wall-clock
// window, and emit one result record per configuration.
//
// The sweep runs synchronously inside the main loop's iteration. That is
// deliberate: it measures real capture-and-render throughput, at the cost of
// the interactive view freezing for the sweep's duration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::camera::FrameSource;
use crate::pipeline::process_frame;
use crate::render::RenderBridge;
use crate::transform::TransformState;
use crate::types::{Backend, FilterKind};
use crate::Error;

/// Fixed transform the sweep applies when a config says transforms are on.
/// Representative of interactive use: offset, tilted, zoomed.
pub const SWEEP_TRANSFORM: TransformState = TransformState {
    translate_x: 0.25,
    translate_y: 0.15,
    rotate_deg: 30.0,
    scale: 1.5,
};

/// Cross-call-site signals shared between input polling and the main loop.
///
/// The sweep request is a single-slot flag consumed with an atomic exchange,
/// so rapid repeated key presses collapse into at most one sweep. The
/// shutdown flag is sticky and checked between every discrete unit of work.
pub struct Signals {
    sweep_requested: AtomicBool,
    shutdown: AtomicBool,
}

impl Signals {
    pub fn new() -> Self {
        Self { sweep_requested: AtomicBool::new(false), shutdown: AtomicBool::new(false) }
    }

    /// Edge-triggered sweep request. Idempotent while pending.
    pub fn request_sweep(&self) {
        self.sweep_requested.store(true, Ordering::SeqCst);
    }

    /// Consume a pending request. Returns true exactly once per pending
    /// request no matter how many call sites poll.
    pub fn take_sweep_request(&self) -> bool {
        self.sweep_requested.swap(false, Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}

/// Knobs for one sweep run. Tests shrink the durations; the defaults match
/// the measurement protocol described in the readme records.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Resolutions to request, in order.
    pub resolutions: Vec<(u32, u32)>,
    /// Frame rate to request alongside each resolution.
    pub target_fps: u32,
    /// Wall-clock measurement window per configuration.
    pub run_duration: Duration,
    /// Frames discarded after a resolution change, before measuring.
    /// Capture devices may emit stale buffered frames right after a switch.
    pub settle_frames: u32,
    /// Sleep after a failed capture, so a starved device is not busy-spun.
    pub retry_sleep: Duration,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            resolutions: vec![(640, 480), (1280, 720)],
            target_fps: 30,
            run_duration: Duration::from_secs(8),
            settle_frames: 10,
            retry_sleep: Duration::from_millis(5),
        }
    }
}

/// One cell of the sweep cross-product. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkConfig {
    pub resolution: (u32, u32),
    pub backend: Backend,
    pub filter: FilterKind,
    pub transform_active: bool,
}

/// The measured outcome for one config. Zero-valued when no frame was
/// observed; that absence is meaningful and still gets a record.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub config: BenchmarkConfig,
    pub average_fps: f64,
    pub average_frame_time_ms: f64,
    pub frames_observed: u64,
    pub run_seconds: f64,
}

/// The full cross-product in its fixed nested order:
/// resolution, then backend, then filter, then transform off/on.
pub fn enumerate_configs(opts: &SweepOptions) -> Vec<BenchmarkConfig> {
    let mut configs = Vec::new();
    for &resolution in &opts.resolutions {
        for backend in Backend::ALL {
            for filter in FilterKind::ALL {
                for transform_active in [false, true] {
                    configs.push(BenchmarkConfig { resolution, backend, filter, transform_active });
                }
            }
        }
    }
    configs
}

/// Run the whole sweep. Each produced result is handed to `emit` in
/// enumeration order before the next config starts; an emit failure (an
/// unwritable record file) aborts the sweep. A shutdown request aborts
/// between iterations and configs and still restores the original
/// resolution. Returns the results produced so far.
pub fn run_sweep<S, B, F>(
    source: &mut S,
    bridge: &mut B,
    opts: &SweepOptions,
    signals: &Signals,
    mut emit: F,
) -> Result<Vec<BenchmarkResult>, Error>
where
    S: FrameSource,
    B: RenderBridge,
    F: FnMut(&BenchmarkResult) -> Result<(), Error>,
{
    let original_resolution = source.current_resolution();
    let configs = enumerate_configs(opts);
    info!(configs = configs.len(), "benchmark sweep starting");

    let mut results = Vec::with_capacity(configs.len());
    let mut last_resolution = original_resolution;

    for config in configs {
        if signals.shutdown_requested() {
            info!("sweep cancelled between configs");
            break;
        }

        if config.resolution != last_resolution {
            if let Err(e) = source.configure(config.resolution.0, config.resolution.1, opts.target_fps)
            {
                restore_resolution(source, original_resolution, opts.target_fps);
                return Err(e);
            }
            last_resolution = config.resolution;
            // Settling period: drop frames that may predate the switch.
            for _ in 0..opts.settle_frames {
                if signals.shutdown_requested() {
                    break;
                }
                if source.capture().is_none() {
                    thread::sleep(opts.retry_sleep);
                }
            }
        }

        // A window truncated by cancellation is not a measurement; emitting
        // it would be indistinguishable from a genuinely starved config.
        let Some(result) = measure_config(source, bridge, opts, signals, config) else {
            info!("sweep cancelled mid-measurement, config dropped");
            break;
        };
        if let Err(e) = emit(&result) {
            restore_resolution(source, original_resolution, opts.target_fps);
            return Err(e);
        }
        results.push(result);
    }

    if last_resolution != original_resolution {
        restore_resolution(source, original_resolution, opts.target_fps);
    }
    info!(emitted = results.len(), "benchmark sweep finished");
    Ok(results)
}

/// Measure one configuration for the fixed wall-clock window. Returns None
/// when a shutdown request cuts the window short: only full windows count,
/// a zero-valued result is reserved for a device that truly starved.
fn measure_config<S, B>(
    source: &mut S,
    bridge: &mut B,
    opts: &SweepOptions,
    signals: &Signals,
    config: BenchmarkConfig,
) -> Option<BenchmarkResult>
where
    S: FrameSource,
    B: RenderBridge,
{
    let transform = if config.transform_active {
        SWEEP_TRANSFORM
    } else {
        TransformState::identity()
    };

    let started = Instant::now();
    let deadline = started + opts.run_duration;
    let mut frames_observed: u64 = 0;
    let mut total_frame_time = Duration::ZERO;

    while Instant::now() < deadline {
        if signals.shutdown_requested() {
            return None;
        }
        let iter_start = Instant::now();
        let Some(frame) = source.capture() else {
            // Rejected frames do not count toward timing or frame totals.
            thread::sleep(opts.retry_sleep);
            continue;
        };
        if process_frame(bridge, &frame, config.filter, config.backend, &transform).is_err() {
            // A failed draw is a skipped iteration, not a dead sweep.
            continue;
        }
        total_frame_time += iter_start.elapsed();
        frames_observed += 1;
    }

    let run_seconds = opts.run_duration.as_secs_f64();
    let (average_fps, average_frame_time_ms) = if frames_observed == 0 {
        (0.0, 0.0)
    } else {
        (
            frames_observed as f64 / run_seconds,
            total_frame_time.as_secs_f64() * 1000.0 / frames_observed as f64,
        )
    };

    Some(BenchmarkResult { config, average_fps, average_frame_time_ms, frames_observed, run_seconds })
}

fn restore_resolution<S: FrameSource>(source: &mut S, resolution: (u32, u32), fps: u32) {
    if let Err(e) = source.configure(resolution.0, resolution.1, fps) {
        warn!(error = %e, "could not restore pre-sweep resolution");
    }
}
