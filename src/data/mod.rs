pub mod holidays;
pub mod loader;
