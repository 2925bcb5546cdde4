pub mod posters;
pub mod recommendations;
pub mod similarity;
pub mod title_search;

pub use posters::{PosterResolver, PosterSource};
pub use similarity::Catalog;
