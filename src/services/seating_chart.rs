//! seating_chart.rs
//!
//! Сетка мест одного показа и производные счетчики. Никакой логики бронирования
//! здесь нет: только состояние мест и проверки над ним.

use crate::models::{SeatPosition, SeatState};

/// Отметка места в представлении для отрисовки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatMark {
    Empty,
    Booked,
    /// Места текущего подбора или найденной брони
    Selected,
}

/// Копия сетки только для чтения, ряд 0 первым
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    pub rows: Vec<Vec<SeatMark>>,
}

impl ChartView {
    pub fn mark(&self, pos: SeatPosition) -> Option<SeatMark> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.column)).copied()
    }

    /// Помечает позиции как Selected, позиции вне сетки игнорируются
    pub fn with_selected(mut self, positions: &[SeatPosition]) -> Self {
        for pos in positions {
            if let Some(cell) = self.rows.get_mut(pos.row).and_then(|row| row.get_mut(pos.column)) {
                *cell = SeatMark::Selected;
            }
        }
        self
    }

    pub fn count(&self, mark: SeatMark) -> usize {
        self.rows.iter().flatten().filter(|m| **m == mark).count()
    }
}

#[derive(Debug, Clone)]
pub struct SeatingChart {
    rows: usize,
    columns: usize,
    cells: Vec<SeatState>,
    available_seats: usize,
}

impl SeatingChart {
    /// Размеры уже проверены `VenueSpec`, здесь только пустая сетка
    pub fn new(rows: usize, columns: usize) -> Self {
        let total = rows * columns;
        Self {
            rows,
            columns,
            cells: vec![SeatState::Empty; total],
            available_seats: total,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn total_seats(&self) -> usize {
        self.rows * self.columns
    }

    pub fn available_seats(&self) -> usize {
        self.available_seats
    }

    pub fn booked_count(&self) -> usize {
        self.cells.iter().filter(|s| **s == SeatState::Booked).count()
    }

    pub fn is_in_bounds(&self, pos: SeatPosition) -> bool {
        pos.row < self.rows && pos.column < self.columns
    }

    pub fn state(&self, pos: SeatPosition) -> Option<SeatState> {
        self.is_in_bounds(pos)
            .then(|| self.cells[pos.row * self.columns + pos.column])
    }

    pub fn is_empty(&self, pos: SeatPosition) -> bool {
        self.state(pos) == Some(SeatState::Empty)
    }

    /// Переводит места из Empty в Booked.
    ///
    /// # Panics
    ///
    /// Если хотя бы одна позиция вне зала, уже занята или повторяется.
    /// Движок вызывает это только после собственной проверки доступности,
    /// так что срабатывание означает ошибку в движке.
    pub fn mark_booked(&mut self, positions: &[SeatPosition]) {
        for (i, pos) in positions.iter().enumerate() {
            assert!(
                self.is_empty(*pos),
                "mark_booked: seat {pos} is out of bounds or not empty"
            );
            assert!(
                !positions[..i].contains(pos),
                "mark_booked: seat {pos} listed twice"
            );
        }

        for pos in positions {
            self.cells[pos.row * self.columns + pos.column] = SeatState::Booked;
        }
        self.available_seats -= positions.len();
    }

    pub fn snapshot(&self) -> ChartView {
        let rows = self
            .cells
            .chunks(self.columns)
            .map(|row| {
                row.iter()
                    .map(|state| match state {
                        SeatState::Empty => SeatMark::Empty,
                        SeatState::Booked => SeatMark::Booked,
                    })
                    .collect()
            })
            .collect();
        ChartView { rows }
    }
}
