pub mod merge_zones;
pub mod satisfy;

pub use merge_zones::{EffectiveDomain, MergeZones};
pub use satisfy::Satisfy;
