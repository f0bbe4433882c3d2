//! allocation.rs
//!
//! Две стратегии подбора мест. Обе работают только по подтвержденному
//! состоянию зала и ничего в нем не меняют: результат - просто список позиций
//! в порядке выбора.
//!
//! 1.  **Default**: ряды от экрана назад, внутри ряда от середины (`columns / 2`)
//!     наружу, сначала вправо, потом влево.
//! 2.  **From**: от указанного места вправо до конца ряда, затем с первого места
//!     следующего ряда. Занятые места пропускаются, скан не прерывают.

use std::iter;

use crate::error::{BookingError, BookingResult};
use crate::models::SeatPosition;
use crate::services::seating_chart::SeatingChart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStrategy {
    Default,
    From(SeatPosition),
}

impl AllocationStrategy {
    pub fn allocate(self, chart: &SeatingChart, quantity: usize) -> BookingResult<Vec<SeatPosition>> {
        match self {
            Self::Default => allocate_default(chart, quantity),
            Self::From(start) => allocate_from(chart, quantity, start),
        }
    }
}

/// Порядок обхода колонок ряда: середина, затем +1, -1, +2, -2 ...
fn middle_out(columns: usize) -> impl Iterator<Item = usize> {
    let mid = columns / 2;
    iter::once(Some(mid))
        .chain((1..=columns).flat_map(move |offset| {
            [Some(mid + offset).filter(|c| *c < columns), mid.checked_sub(offset)]
        }))
        .flatten()
}

/// Лучшие места: ближе к экрану и к центру ряда
pub fn allocate_default(chart: &SeatingChart, quantity: usize) -> BookingResult<Vec<SeatPosition>> {
    let mut selected = Vec::with_capacity(quantity);

    'rows: for row in 0..chart.rows() {
        for column in middle_out(chart.columns()) {
            if selected.len() == quantity {
                break 'rows;
            }
            let pos = SeatPosition::new(row, column);
            if chart.is_empty(pos) {
                selected.push(pos);
            }
        }
    }

    if selected.len() < quantity {
        return Err(BookingError::InsufficientSeats {
            requested: quantity,
            available: chart.available_seats(),
        });
    }
    Ok(selected)
}

/// Места начиная с выбранного пользователем, с переносом на следующий ряд
pub fn allocate_from(
    chart: &SeatingChart,
    quantity: usize,
    start: SeatPosition,
) -> BookingResult<Vec<SeatPosition>> {
    if !chart.is_in_bounds(start) {
        return Err(BookingError::InvalidSeatLabel {
            label: start.to_string(),
        });
    }
    if !chart.is_empty(start) {
        return Err(BookingError::SeatUnavailable { seat: start });
    }

    let columns = chart.columns();
    let selected: Vec<SeatPosition> = (start.row..chart.rows())
        .flat_map(move |row| {
            let first = if row == start.row { start.column } else { 0 };
            (first..columns).map(move |column| SeatPosition::new(row, column))
        })
        .filter(|pos| chart.is_empty(*pos))
        .take(quantity)
        .collect();

    // частичный подбор никогда не отдаем
    if selected.len() < quantity {
        return Err(BookingError::InsufficientSeats {
            requested: quantity,
            available: chart.available_seats(),
        });
    }
    Ok(selected)
}
