pub mod ingredient;
pub mod lookup;
pub mod product;

pub use ingredient::{Ingredient, SKIP_TAG};
pub use lookup::NameLookup;
pub use product::{Product, SyncOptions};
