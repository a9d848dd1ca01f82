pub mod metadata;
pub mod sink;
