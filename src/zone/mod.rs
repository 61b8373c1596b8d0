mod norm;
mod table;

pub use norm::{FeatureRange, NormMeta};
pub use table::{Zone, ZoneTable};
