mod light;

pub use light::{DirectionalLight, Light, LightKind, LightMarker, PointLight};
