// Error taxonomy for the whole crate. Every variant states *where* things
// went wrong; `thiserror` supplies Display and std::error::Error.
//
// Shutdown is not modelled here: an exit request is orderly loop termination,
// handled as control flow in main, never as an Err.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No usable capture device. Fatal at startup.
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A frame failed structural validation. Recoverable: skip and retry.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Creating the window failed.
    #[error("window init: {0}")]
    WindowInit(String),

    /// Pushing a buffer to the window failed.
    #[error("window update: {0}")]
    WindowUpdate(String),

    /// A record file could not be opened or appended to. Aborts a sweep;
    /// interactive metrics treat it as best-effort and only log it.
    #[error("record file {path:?} unwritable: {source}")]
    RecordFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
