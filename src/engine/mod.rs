pub mod aggregate;
pub mod calendar;
pub mod state;
pub mod view;
