pub mod builder;
pub mod fixtures;

pub use builder::{SortingBuilder, TreeBuilder};
pub use fixtures::{load_batch_tree, load_denormalized, FixtureFile};
