pub mod config;
pub mod errors;
pub mod generators;
pub mod geometry;
pub mod kicad;
pub mod nodes;
pub mod tree;
pub mod writer;

#[cfg(test)]
mod tests;
