pub mod editing;
pub mod io;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{
    EditError, breakpoints::*, editor::*, favorites::*, reorder::*, tracker::*, validation::*,
};
pub use io::*;
pub use models::*;
