use thiserror::Error;

use crate::models::SeatPosition;

/// Ошибки движка бронирования. Все они восстановимые: вызывающая сторона
/// решает, что спросить у пользователя дальше.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("invalid venue configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid seat label '{label}'")]
    InvalidSeatLabel { label: String },

    #[error("seat {seat} is already booked")]
    SeatUnavailable { seat: SeatPosition },

    #[error("not enough seats: requested {requested}, only {available} available")]
    InsufficientSeats { requested: usize, available: usize },

    #[error("tentative allocation is no longer valid, request a new one")]
    StaleAllocation,

    #[error("booking {booking_id} not found")]
    NotFound { booking_id: String },

    #[error("number of tickets must be greater than 0")]
    InvalidQuantity,
}

pub type BookingResult<T> = Result<T, BookingError>;
