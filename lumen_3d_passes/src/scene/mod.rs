//! Scene module
//!
//! Provides the scene collaborator seam used by the passes, the closed
//! set of drawable categories used for exclusion filters, the shared
//! static-mesh primitive, and a simple draw-list scene.

mod category;
mod static_mesh;
mod scene;
mod draw_list;

pub use category::{Categories, DrawableCategory};
pub use static_mesh::StaticMesh;
pub use scene::Scene;
pub use draw_list::{DrawList, Drawable, DrawableKey};
