//! GPU device + presentation surfaces.
//!
//! - one [`GpuDevice`] (instance/adapter/device/queue) shared by every target
//! - one [`SurfaceTarget`] per window, configured against that device
//! - per-tick [`TargetSlot`]s carrying the freshly acquired drawable

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::GpuDevice;
pub use error::{AcquireError, SurfaceErrorAction};
pub use frame::{TargetFrame, TargetSlot};
pub use init::DeviceInit;
pub use surface::SurfaceTarget;

pub(crate) use surface::{choose_alpha_mode, choose_surface_format};
