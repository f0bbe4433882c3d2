pub mod config;
pub mod controllers;
pub mod display;
pub mod error;
pub mod models;
pub mod services;

pub use error::{BookingError, BookingResult};
pub use services::Cinema;
