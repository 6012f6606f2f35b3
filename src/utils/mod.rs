pub mod export;
pub mod render;
