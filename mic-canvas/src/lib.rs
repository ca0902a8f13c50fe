//! Audio-reactive canvas: three drawing modes fed by `vis_core` feature snapshots.
pub mod cubic;
pub mod mode;
pub mod palette;
pub mod pure;
pub mod renderer;
pub mod surface;
pub mod waves;

pub use crate::mode::Mode;
pub use crate::renderer::Renderer;
pub use crate::surface::Surface;
