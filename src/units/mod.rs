//! Unit model: types, combat traits, stat catalog, and count maps

pub mod catalog;
pub mod composition;
pub mod traits;
pub mod unit_type;

pub use catalog::{UnitCatalog, UnitStats};
pub use composition::{Composition, Force};
pub use traits::{TraitFlag, TraitSet};
pub use unit_type::UnitType;
