pub mod edge;
pub mod ring;
pub mod zone;

pub use edge::{Edge, EdgeTable};
pub use ring::{Orientation, Ring};
pub use zone::{Zone, ZoneKind};
