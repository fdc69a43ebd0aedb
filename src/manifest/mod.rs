// src/manifest/mod.rs
pub mod columns;
pub mod normalize;
pub mod reader;
pub mod value;

pub use columns::Column;
pub use normalize::{normalize, NormalizedRecord};
pub use reader::{ManifestReader, RawRow};
pub use value::Cell;
