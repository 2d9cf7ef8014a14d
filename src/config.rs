// Runtime configuration: compiled defaults with QUADCAM_* env overrides.
// Bad values fall back to the default with a warning rather than aborting.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::sweep::SweepOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub camera_index: u32,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    /// Interactive metrics record (append-only CSV).
    pub metrics_path: PathBuf,
    /// Benchmark results record (append-only CSV).
    pub bench_path: PathBuf,
    pub sweep: SweepOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            width: 640,
            height: 480,
            target_fps: 30,
            metrics_path: PathBuf::from("fps_log.csv"),
            bench_path: PathBuf::from("benchmark_results.csv"),
            sweep: SweepOptions::default(),
        }
    }
}

impl Config {
    /// Defaults, overridden by environment variables:
    /// QUADCAM_CAMERA, QUADCAM_WIDTH, QUADCAM_HEIGHT, QUADCAM_FPS,
    /// QUADCAM_METRICS_CSV, QUADCAM_BENCH_CSV,
    /// QUADCAM_SWEEP_SECS, QUADCAM_SETTLE_FRAMES.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = env_parse("QUADCAM_CAMERA") {
            cfg.camera_index = v;
        }
        if let Some(v) = env_parse("QUADCAM_WIDTH") {
            cfg.width = v;
        }
        if let Some(v) = env_parse("QUADCAM_HEIGHT") {
            cfg.height = v;
        }
        if let Some(v) = env_parse("QUADCAM_FPS") {
            cfg.target_fps = v;
            cfg.sweep.target_fps = v;
        }
        if let Ok(v) = env::var("QUADCAM_METRICS_CSV") {
            cfg.metrics_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("QUADCAM_BENCH_CSV") {
            cfg.bench_path = PathBuf::from(v);
        }
        if let Some(v) = env_parse::<u64>("QUADCAM_SWEEP_SECS") {
            cfg.sweep.run_duration = Duration::from_secs(v);
        }
        if let Some(v) = env_parse("QUADCAM_SETTLE_FRAMES") {
            cfg.sweep.settle_frames = v;
        }
        cfg
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = name, value = %raw, "unparsable value, using default");
            None
        }
    }
}
