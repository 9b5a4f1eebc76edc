pub mod combinatorics;
pub mod format;
