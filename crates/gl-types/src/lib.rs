pub mod batches;
pub mod config;
pub mod errors;
pub mod grid;
pub mod model;
pub mod vocab;

pub use batches::*;
pub use config::*;
pub use errors::*;
pub use grid::*;
pub use model::*;
pub use vocab::*;
