mod build;
mod load;
mod ordered;
mod types;

pub use build::*;
pub use load::*;
pub use ordered::OrderedMap;
pub use types::*;
