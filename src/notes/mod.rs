//! Note collection, ranking, and graph construction.

pub mod graph;
pub mod search;
pub mod types;
pub mod workspace;
