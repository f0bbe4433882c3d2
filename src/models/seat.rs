use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BookingError, BookingResult};

/// Максимум рядов: по одной букве A..Z на ряд
pub const MAX_ROWS: usize = 26;
pub const MAX_COLUMNS: usize = 50;

/// Состояние места в зале. Кандидаты tentative-брони сюда не попадают никогда.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatState {
    Empty,
    Booked,
}

/// Позиция места: ряд 0 ближе всего к экрану, колонки с нуля.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatPosition {
    pub row: usize,
    pub column: usize,
}

impl SeatPosition {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Разбирает метку вида "A1" / "c12" в позицию с проверкой границ зала.
    pub fn parse_label(label: &str, rows: usize, columns: usize) -> BookingResult<Self> {
        let invalid = || BookingError::InvalidSeatLabel {
            label: label.to_string(),
        };

        let trimmed = label.trim();
        let mut chars = trimmed.chars();
        let row = chars
            .next()
            .and_then(row_index)
            .filter(|row| *row < rows)
            .ok_or_else(invalid)?;

        // usize::from_str пропускает ведущий '+', поэтому цифры проверяем сами
        let number = chars.as_str();
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let seat_number: usize = number.parse().map_err(|_| invalid())?;
        if seat_number == 0 || seat_number > columns {
            return Err(invalid());
        }

        Ok(Self::new(row, seat_number - 1))
    }

    /// Номер места, как его видит зритель (с единицы)
    pub const fn seat_number(&self) -> usize {
        self.column + 1
    }
}

impl fmt::Display for SeatPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match row_letter(self.row) {
            Some(letter) => write!(f, "{}{}", letter, self.seat_number()),
            None => write!(f, "R{}:{}", self.row, self.seat_number()),
        }
    }
}

/// Буква ряда для индекса 0..=25
pub fn row_letter(row: usize) -> Option<char> {
    if row < MAX_ROWS {
        Some(char::from(b'A' + row as u8))
    } else {
        None
    }
}

/// Индекс ряда по букве, регистр не важен
pub fn row_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some((upper as u8 - b'A') as usize)
    } else {
        None
    }
}
