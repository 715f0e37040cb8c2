pub mod colors;
pub mod graph;
pub mod issues;
pub mod population;
