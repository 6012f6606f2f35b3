pub mod calendar;
pub mod config;
pub mod summary;
pub mod trade;
pub mod view;
