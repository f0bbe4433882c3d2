pub mod allocation;
pub mod engine;
pub mod seating_chart;

pub use engine::Cinema;
