mod config;
mod constants;
mod outcome;
mod summary;

pub use config::*;
pub use constants::*;
pub use outcome::*;
pub use summary::*;
