mod camera;
mod plane;
mod projector;

pub use camera::SceneCamera;
pub use plane::PaintPlane;
pub use projector::Projector;
