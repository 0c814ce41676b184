pub mod diff;
pub mod outcome;
pub mod runner;
pub mod verdict;

pub use diff::*;
pub use outcome::*;
pub use runner::*;
pub use verdict::*;
