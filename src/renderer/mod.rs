//! Rendering module
//!
//! Platform-free: `Renderer` turns a `GameState` into a `Frame` of triangle,
//! sprite and text commands, and the host presents it on whatever `Surface`
//! it has (a canvas 2D context in the browser).

pub mod frame;
pub mod scene;
pub mod shapes;
pub mod sprites;
pub mod vertex;

pub use frame::{DrawCmd, Frame, Surface};
pub use scene::Renderer;
pub use sprites::{SpriteId, SpriteSet, SpriteStatus};
pub use vertex::Vertex;
