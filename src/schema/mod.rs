pub mod catalog;
pub mod preset;
