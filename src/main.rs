// Controls:
// • W/S/A/D translate the quad, Q/E rotate, Z/X scale.
// • 1/2/3 pick the filter (none / pixelate / sincity).
// • G renders on the GPU path, C on the CPU path.
// • B starts the benchmark sweep (the view freezes while it runs).
// • ESC or closing the window quits.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use minifb::Key;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use quadcam::camera::{CameraCapture, FrameSource};
use quadcam::config::Config;
use quadcam::metrics::{BenchmarkLog, MetricsLog, MetricsRecorder};
use quadcam::pipeline::process_frame;
use quadcam::sweep::{run_sweep, Signals};
use quadcam::transform::{ROTATE_STEP_DEG, SCALE_STEP, TRANSLATE_STEP};
use quadcam::types::{Backend, FilterKind, InteractionState};
use quadcam::window::WindowBridge;

/// Sleep after a capture miss so a starved device is not busy-spun.
const CAPTURE_RETRY_SLEEP: Duration = Duration::from_millis(5);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env();
    let signals = Arc::new(Signals::new());

    /* --- Camera + window setup --- */
    // Exit codes: a missing capture device is the one fatal startup error.
    let mut cam = CameraCapture::new(cfg.camera_index, cfg.width, cfg.height, cfg.target_fps)
        .context("acquiring the capture device")?;
    if !cam.warm_up() {
        warn!("starting without an initial frame; the loop will keep retrying");
    }

    let (w, h) = cam.current_resolution();
    let mut bridge = WindowBridge::new(
        "quadcam",
        w as usize,
        h as usize,
        Arc::clone(&signals),
    )
    .context("creating the display window")?;

    /* --- Interactive state + metrics --- */
    let mut state = InteractionState::default();
    let mut recorder = MetricsRecorder::new();
    // Interactive metrics are best-effort: an unwritable file is logged once
    // and the loop keeps rendering without it.
    let mut metrics_log = match MetricsLog::open(&cfg.metrics_path) {
        Ok(log) => Some(log),
        Err(e) => {
            warn!(error = %e, "interactive metrics disabled");
            None
        }
    };
    let mut hud_fps = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while bridge.is_open() && !signals.shutdown_requested() {
        poll_input(&bridge, &mut state);

        // Exactly-once consumption: two rapid presses are one sweep.
        if signals.take_sweep_request() {
            match BenchmarkLog::open(&cfg.bench_path) {
                Ok(mut log) => {
                    bridge.set_hud("SWEEP RUNNING");
                    let outcome = run_sweep(&mut cam, &mut bridge, &cfg.sweep, &signals, |r| {
                        log.write_result(r)
                    });
                    if let Err(e) = outcome {
                        error!(error = %e, "benchmark sweep aborted");
                    }
                }
                Err(e) => error!(error = %e, "benchmark record file unwritable, sweep skipped"),
            }
            // Presses made while the sweep ran are ignored, not queued:
            // at most one sweep per explicit request.
            signals.take_sweep_request();
            // Do not let the sweep's stall pollute the next interactive sample.
            recorder.reset(Instant::now());
            continue;
        }

        let Some(frame) = cam.capture() else {
            thread::sleep(CAPTURE_RETRY_SLEEP);
            continue;
        };

        bridge.set_hud(format!(
            "{} | {} | {}",
            state.backend.name(),
            state.filter.label(),
            hud_fps
        ));
        if let Err(e) = process_frame(
            &mut bridge,
            &frame,
            state.filter,
            state.backend,
            &state.transform,
        ) {
            error!(error = %e, "render failed, shutting down");
            break;
        }

        recorder.note_frame();
        if let Some(sample) = recorder.sample_at(Instant::now(), state.backend, state.filter) {
            info!(backend = %sample.backend, filter = %sample.filter, "interactive fps {:.1}", sample.fps);
            hud_fps = format!("FPS: {:.1}", sample.fps);
            if let Some(log) = &mut metrics_log {
                if let Err(e) = log.write_sample(&sample) {
                    warn!(error = %e, "metrics write failed, disabling");
                    metrics_log = None;
                }
            }
        }
    }

    info!("clean shutdown");
    Ok(())
}

/// Keyboard control. Held keys accumulate transform deltas every poll tick;
/// selection keys switch filter and backend. Sweep trigger and shutdown are
/// handled inside the bridge so they also work during a sweep.
fn poll_input(bridge: &WindowBridge, state: &mut InteractionState) {
    if bridge.key_down(Key::W) {
        state.transform.translate_by(0.0, TRANSLATE_STEP);
    }
    if bridge.key_down(Key::S) {
        state.transform.translate_by(0.0, -TRANSLATE_STEP);
    }
    if bridge.key_down(Key::A) {
        state.transform.translate_by(-TRANSLATE_STEP, 0.0);
    }
    if bridge.key_down(Key::D) {
        state.transform.translate_by(TRANSLATE_STEP, 0.0);
    }

    if bridge.key_down(Key::Q) {
        state.transform.rotate_by(-ROTATE_STEP_DEG);
    }
    if bridge.key_down(Key::E) {
        state.transform.rotate_by(ROTATE_STEP_DEG);
    }

    if bridge.key_down(Key::Z) {
        state.transform.scale_by(SCALE_STEP);
    }
    if bridge.key_down(Key::X) {
        state.transform.scale_by(1.0 / SCALE_STEP);
    }

    if bridge.key_pressed_once(Key::Key1) {
        state.filter = FilterKind::None;
    }
    if bridge.key_pressed_once(Key::Key2) {
        state.filter = FilterKind::Pixelate;
    }
    if bridge.key_pressed_once(Key::Key3) {
        state.filter = FilterKind::SinCity;
    }

    if bridge.key_pressed_once(Key::G) {
        state.backend = Backend::Gpu;
    }
    if bridge.key_pressed_once(Key::C) {
        state.backend = Backend::Cpu;
    }
}
