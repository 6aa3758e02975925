use thiserror::Error;

/// What the frame loop should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the target is skipped this tick and resumes next tick.
    Reconfigured,
    /// Transient; skip the target this tick.
    SkipFrame,
    /// Unrecoverable (out of memory); stop the loop.
    Fatal,
}

/// Failure to obtain this tick's drawable from a target.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The target was used before `configure`. Programming error.
    #[error("surface target {index} used before configuration")]
    Unconfigured { index: usize },

    #[error("surface target {index}: {source}")]
    Surface {
        index: usize,
        #[source]
        source: wgpu::SurfaceError,
    },
}
