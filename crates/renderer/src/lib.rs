//! Renderer crate for PixelBlast.
//!
//! Two backends implement the scheduler's `RenderBackend`:
//!
//! ```text
//!   pixelblast CLI
//!          │ PixelBlastConfig
//!          ▼
//!   run_window ──▶ Lifecycle<WgpuBackend> ──▶ winit event loop ──▶ tick()
//!   render_still ──▶ Lifecycle<SoftwareBackend> ──▶ RgbaImage ──▶ PNG
//! ```
//!
//! Both build their pass list from [`PassChain`]: the pattern pass, then the
//! optional liquid pass, with film grain always last.

mod compile;
pub mod compose;
mod export;
mod gpu;
pub mod software;
mod types;
mod window;

pub use compose::{Pass, PassChain, PassKind};
pub use export::{render_still, save_png};
pub use gpu::{WgpuBackend, WgpuSurface};
pub use software::{Framebuffer, SoftwareBackend, SoftwareSurface};
pub use types::{StillRequest, WindowOptions};
pub use window::run_window;
