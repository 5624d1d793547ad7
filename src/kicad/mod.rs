pub mod layer;
pub mod syntax;
