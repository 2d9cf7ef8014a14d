// Frame-rate accounting and the append-only CSV record files.
//
// Interactive runs emit one MetricsSample per rolling 1-second window;
// benchmark sweeps append one row per configuration. Both files get their
// header written only when the file is new or empty, so repeated runs
// accumulate history instead of rewriting it.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::sweep::BenchmarkResult;
use crate::types::{Backend, FilterKind};
use crate::Error;

/// Window length for interactive sampling.
pub const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// One interactive measurement: frames seen in the window and the fps they
/// amount to, tagged with what was active at emission time.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSample {
    pub frame_count: u32,
    pub backend: Backend,
    pub filter: FilterKind,
    pub fps: f64,
}

/// Rolling frame counter. Call `note_frame` once per rendered frame and
/// `sample_at` once per loop; a sample pops out whenever a full window has
/// elapsed, and both counter and timer reset.
pub struct MetricsRecorder {
    frames: u32,
    window_start: Instant,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self { frames: 0, window_start: Instant::now() }
    }

    pub fn note_frame(&mut self) {
        self.frames += 1;
    }

    pub fn sample_at(
        &mut self,
        now: Instant,
        backend: Backend,
        filter: FilterKind,
    ) -> Option<MetricsSample> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < SAMPLE_WINDOW {
            return None;
        }
        let sample = MetricsSample {
            frame_count: self.frames,
            backend,
            filter,
            fps: self.frames as f64 / elapsed.as_secs_f64(),
        };
        self.frames = 0;
        self.window_start = now;
        Some(sample)
    }

    /// Restart the window without emitting (used after a sweep, so the
    /// sweep's stall does not pollute the next interactive sample).
    pub fn reset(&mut self, now: Instant) {
        self.frames = 0;
        self.window_start = now;
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Open `path` for appending, writing `header` first if the file is new or
/// empty. Shared by both record files.
fn open_record(path: &Path, header: &str) -> Result<File, Error> {
    let map_err = |source| Error::RecordFile { path: path.to_path_buf(), source };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(map_err)?;
    let len = file.metadata().map_err(map_err)?.len();
    if len == 0 {
        writeln!(file, "{header}").map_err(map_err)?;
    }
    Ok(file)
}

/// Append-only interactive metrics record.
pub struct MetricsLog {
    file: File,
    path: PathBuf,
}

impl MetricsLog {
    pub const HEADER: &'static str = "frame_count,backend,filter,fps";

    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = open_record(&path, Self::HEADER)?;
        Ok(Self { file, path })
    }

    pub fn write_sample(&mut self, sample: &MetricsSample) -> Result<(), Error> {
        writeln!(
            self.file,
            "{},{},{},{:.2}",
            sample.frame_count, sample.backend, sample.filter, sample.fps
        )
        .map_err(|source| Error::RecordFile { path: self.path.clone(), source })
    }
}

/// Append-only benchmark results record.
pub struct BenchmarkLog {
    file: File,
    path: PathBuf,
}

impl BenchmarkLog {
    pub const HEADER: &'static str = "resolution_w,resolution_h,backend,filter,transform,\
avg_fps,run_seconds,build_type,avg_frame_time_ms";

    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = open_record(&path, Self::HEADER)?;
        Ok(Self { file, path })
    }

    pub fn write_result(&mut self, result: &BenchmarkResult) -> Result<(), Error> {
        let build_type = if cfg!(debug_assertions) { "debug" } else { "release" };
        writeln!(
            self.file,
            "{},{},{},{},{},{:.2},{:.1},{},{:.3}",
            result.config.resolution.0,
            result.config.resolution.1,
            result.config.backend,
            result.config.filter,
            if result.config.transform_active { 1 } else { 0 },
            result.average_fps,
            result.run_seconds,
            build_type,
            result.average_frame_time_ms,
        )
        .map_err(|source| Error::RecordFile { path: self.path.clone(), source })
    }
}
