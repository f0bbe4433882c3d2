use validator::Validate;

use crate::error::{BookingError, BookingResult};
use crate::models::seat::{MAX_COLUMNS, MAX_ROWS};

/// Параметры зала на один показ
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct VenueSpec {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(range(min = 1, max = MAX_ROWS, message = "row count is out of range"))]
    pub rows: usize,
    #[validate(range(min = 1, max = MAX_COLUMNS, message = "seats per row is out of range"))]
    pub columns: usize,
}

impl VenueSpec {
    pub fn new(title: impl Into<String>, rows: usize, columns: usize) -> BookingResult<Self> {
        let spec = Self {
            title: title.into().trim().to_string(),
            rows,
            columns,
        };
        spec.check()?;
        Ok(spec)
    }

    /// Формат ввода меню: "[Title] [Row] [SeatsPerRow]"
    pub fn parse_line(line: &str) -> BookingResult<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [title, rows, columns] = parts.as_slice() else {
            return Err(BookingError::InvalidConfig(
                "expected [Title] [Row] [SeatsPerRow]".to_string(),
            ));
        };
        let rows = rows
            .parse()
            .map_err(|_| BookingError::InvalidConfig(format!("row count '{rows}' is not a number")))?;
        let columns = columns.parse().map_err(|_| {
            BookingError::InvalidConfig(format!("seats per row '{columns}' is not a number"))
        })?;
        Self::new(*title, rows, columns)
    }

    pub fn check(&self) -> BookingResult<()> {
        self.validate()
            .map_err(|e| BookingError::InvalidConfig(e.to_string()))?;
        // validator не знает про пробельные строки
        if self.title.trim().is_empty() {
            return Err(BookingError::InvalidConfig("title must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn total_seats(&self) -> usize {
        self.rows * self.columns
    }
}
