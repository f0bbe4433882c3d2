use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

use super::SeatPosition;

/// Видимый номер брони, например "GIC0001"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(String);

impl BookingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Реестр ищет брони прямо по строке из ввода
impl Borrow<str> for BookingId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Формат номеров брони: постоянный префикс + порядковый номер с нулями
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingIdFormat {
    pub prefix: String,
    pub width: usize,
}

impl BookingIdFormat {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    pub fn render(&self, sequence: u32) -> BookingId {
        BookingId(format!("{}{:0width$}", self.prefix, sequence, width = self.width))
    }
}

impl Default for BookingIdFormat {
    fn default() -> Self {
        Self::new("GIC", 4)
    }
}

/// Подтвержденная бронь. После подтверждения не меняется.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub sequence: u32,
    pub seats: Vec<SeatPosition>,
    pub confirmed_at: DateTime<Utc>,
}

/// Предварительный подбор мест. Живет только у того, кто его запросил,
/// в зал не записывается до `confirm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TentativeAllocation {
    pub hold_id: Uuid,
    pub quantity: usize,
    /// Номер, который получит следующее подтверждение. Фактический номер
    /// выдается только в момент подтверждения.
    pub preview_id: BookingId,
    pub seats: Vec<SeatPosition>,
}
