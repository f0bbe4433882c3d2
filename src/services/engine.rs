//! engine.rs
//!
//! Движок бронирования одного показа.
//!
//! Зал, реестр броней, счетчик номеров и открытые tentative-подборы лежат под
//! одним `Mutex`. Каждый вызов берет блокировку целиком на время вычисления,
//! ввода-вывода под ней нет: логирование идет уже после освобождения.
//!
//! Жизненный цикл брони:
//! 1.  `request_tentative` считает места по подтвержденному состоянию зала и
//!     запоминает их под `hold_id`. Зал не меняется, другие потоки эти места
//!     по-прежнему видят свободными.
//! 2.  `reallocate` пересчитывает подбор под тем же `hold_id` (например, с
//!     другого стартового места), старый подбор забывается.
//! 3.  `confirm` повторно проверяет, что места свободны, и только тогда пишет
//!     их в зал, выдает номер брони и двигает счетчик. Если между подбором и
//!     подтверждением кто-то занял хоть одно место - `StaleAllocation`.

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{Booking, BookingId, BookingIdFormat, SeatPosition, TentativeAllocation, VenueSpec};
use crate::services::allocation::AllocationStrategy;
use crate::services::seating_chart::{ChartView, SeatingChart};

/// Изменяемое состояние показа, доступ только под блокировкой
#[derive(Debug)]
struct LedgerState {
    chart: SeatingChart,
    /// Реестр по порядковому номеру, строковый номер только для поиска
    bookings: BTreeMap<u32, Booking>,
    ids: HashMap<BookingId, u32>,
    next_sequence: u32,
    /// Последний подбор каждого незавершенного сценария бронирования
    holds: HashMap<Uuid, Vec<SeatPosition>>,
}

impl LedgerState {
    fn booking(&self, booking_id: &str) -> Option<&Booking> {
        self.ids.get(booking_id).and_then(|seq| self.bookings.get(seq))
    }
}

/// Почему подтверждение не прошло (для лога после снятия блокировки)
enum Rejection {
    Replaced,
    SeatTaken(SeatPosition),
}

#[derive(Debug)]
pub struct Cinema {
    title: String,
    id_format: BookingIdFormat,
    state: Mutex<LedgerState>,
}

impl Cinema {
    pub fn new(spec: VenueSpec, id_format: BookingIdFormat) -> BookingResult<Self> {
        spec.check()?;

        // каждая бронь минимум на одно место, номеров не больше чем мест
        let needed_width = spec.total_seats().to_string().len();
        if id_format.width < needed_width {
            return Err(BookingError::InvalidConfig(format!(
                "booking id width {} cannot hold {} bookings",
                id_format.width,
                spec.total_seats()
            )));
        }

        info!(
            "Venue created: '{}' with {} rows x {} seats",
            spec.title, spec.rows, spec.columns
        );

        Ok(Self {
            title: spec.title,
            id_format,
            state: Mutex::new(LedgerState {
                chart: SeatingChart::new(spec.rows, spec.columns),
                bookings: BTreeMap::new(),
                ids: HashMap::new(),
                next_sequence: 1,
                holds: HashMap::new(),
            }),
        })
    }

    // Все секции сначала проверяют, потом пишут, поэтому
    // после паники состояние целое и poison можно снять
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> usize {
        self.lock().chart.rows()
    }

    pub fn columns(&self) -> usize {
        self.lock().chart.columns()
    }

    pub fn total_seats(&self) -> usize {
        self.lock().chart.total_seats()
    }

    pub fn available_seats(&self) -> usize {
        self.lock().chart.available_seats()
    }

    /// Новый сценарий бронирования. `start` - метка места вроде "B3";
    /// без нее работает подбор лучших мест.
    pub fn request_tentative(
        &self,
        quantity: usize,
        start: Option<&str>,
    ) -> BookingResult<TentativeAllocation> {
        self.allocate(Uuid::new_v4(), quantity, start)
    }

    /// Пересчет подбора в рамках того же сценария
    pub fn reallocate(
        &self,
        previous: &TentativeAllocation,
        start: Option<&str>,
    ) -> BookingResult<TentativeAllocation> {
        self.allocate(previous.hold_id, previous.quantity, start)
    }

    fn allocate(
        &self,
        hold_id: Uuid,
        quantity: usize,
        start: Option<&str>,
    ) -> BookingResult<TentativeAllocation> {
        if quantity == 0 {
            return Err(BookingError::InvalidQuantity);
        }

        let (seats, strategy, preview_id) = {
            let mut state = self.lock();
            let chart = &state.chart;

            if quantity > chart.available_seats() {
                return Err(BookingError::InsufficientSeats {
                    requested: quantity,
                    available: chart.available_seats(),
                });
            }

            let strategy = match start {
                Some(label) => AllocationStrategy::From(SeatPosition::parse_label(
                    label,
                    chart.rows(),
                    chart.columns(),
                )?),
                None => AllocationStrategy::Default,
            };
            let seats = strategy.allocate(chart, quantity)?;
            let preview_id = self.id_format.render(state.next_sequence);

            // Новый подбор вытесняет предыдущий для этого сценария
            state.holds.insert(hold_id, seats.clone());
            (seats, strategy, preview_id)
        };

        debug!(
            "Tentative allocation {} ({}): {} seats via {:?}",
            hold_id, preview_id, seats.len(), strategy
        );

        Ok(TentativeAllocation {
            hold_id,
            quantity,
            preview_id,
            seats,
        })
    }

    /// Фиксирует подбор. Номер брони выдается здесь, поэтому он может
    /// отличаться от `preview_id`, если кто-то подтвердил раньше.
    pub fn confirm(&self, tentative: &TentativeAllocation) -> BookingResult<Booking> {
        match self.commit(tentative) {
            Ok((booking, remaining)) => {
                info!(
                    "Booking {} confirmed: {} seats, {} remaining",
                    booking.id,
                    booking.seats.len(),
                    remaining
                );
                Ok(booking)
            }
            Err(Rejection::Replaced) => {
                warn!(
                    "Confirmation for {} rejected: allocation was replaced or abandoned",
                    tentative.hold_id
                );
                Err(BookingError::StaleAllocation)
            }
            Err(Rejection::SeatTaken(seat)) => {
                warn!(
                    "Confirmation for {} rejected: seat {} was booked meanwhile",
                    tentative.hold_id, seat
                );
                Err(BookingError::StaleAllocation)
            }
        }
    }

    // Проверка и запись в одной критической секции
    fn commit(&self, tentative: &TentativeAllocation) -> Result<(Booking, usize), Rejection> {
        let mut state = self.lock();

        if state.holds.get(&tentative.hold_id) != Some(&tentative.seats) {
            return Err(Rejection::Replaced);
        }
        if let Some(taken) = tentative.seats.iter().find(|pos| !state.chart.is_empty(**pos)) {
            let taken = *taken;
            state.holds.remove(&tentative.hold_id);
            return Err(Rejection::SeatTaken(taken));
        }

        state.chart.mark_booked(&tentative.seats);
        state.holds.remove(&tentative.hold_id);

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        let booking = Booking {
            id: self.id_format.render(sequence),
            sequence,
            seats: tentative.seats.clone(),
            confirmed_at: Utc::now(),
        };
        state.ids.insert(booking.id.clone(), sequence);
        state.bookings.insert(sequence, booking.clone());

        Ok((booking, state.chart.available_seats()))
    }

    /// Сценарий брошен без подтверждения. В зале от него следов нет.
    pub fn abandon(&self, tentative: TentativeAllocation) {
        let removed = self.lock().holds.remove(&tentative.hold_id);
        if removed.is_some() {
            debug!("Tentative allocation {} abandoned", tentative.hold_id);
        }
    }

    pub fn lookup(&self, booking_id: &str) -> BookingResult<Booking> {
        let key = booking_id.trim();
        self.lock()
            .booking(key)
            .cloned()
            .ok_or_else(|| BookingError::NotFound {
                booking_id: key.to_string(),
            })
    }

    /// Все подтвержденные брони в порядке номеров
    pub fn bookings(&self) -> Vec<Booking> {
        self.lock().bookings.values().cloned().collect()
    }

    pub fn snapshot(&self) -> ChartView {
        self.lock().chart.snapshot()
    }

    /// Зал с местами подбора поверх подтвержденных броней
    pub fn tentative_view(&self, tentative: &TentativeAllocation) -> ChartView {
        self.snapshot().with_selected(&tentative.seats)
    }

    /// Зал, где места брони `booking_id` выделены отдельно от остальных занятых
    pub fn highlighted_view(&self, booking_id: &str) -> BookingResult<ChartView> {
        let key = booking_id.trim();
        let state = self.lock();
        let booking = state.booking(key).ok_or_else(|| BookingError::NotFound {
            booking_id: key.to_string(),
        })?;
        Ok(state.chart.snapshot().with_selected(&booking.seats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seating_chart::SeatMark;

    fn cinema(rows: usize, columns: usize) -> Cinema {
        Cinema::new(VenueSpec::new("Test Movie", rows, columns).unwrap(), BookingIdFormat::default())
            .unwrap()
    }

    fn pos(row: usize, column: usize) -> SeatPosition {
        SeatPosition::new(row, column)
    }

    #[test]
    fn rejects_invalid_venue() {
        let spec = VenueSpec { title: "X".into(), rows: 27, columns: 10 };
        assert!(matches!(
            Cinema::new(spec, BookingIdFormat::default()),
            Err(BookingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn tentative_allocation_leaves_chart_untouched() {
        let cinema = cinema(5, 10);
        let hold = cinema.request_tentative(3, None).unwrap();

        assert_eq!(hold.preview_id.as_str(), "GIC0001");
        assert_eq!(hold.seats, vec![pos(0, 5), pos(0, 6), pos(0, 4)]);
        assert_eq!(cinema.available_seats(), 50);
        assert_eq!(cinema.snapshot().count(SeatMark::Empty), 50);
        assert_eq!(cinema.tentative_view(&hold).count(SeatMark::Selected), 3);
    }

    #[test]
    fn confirm_commits_seats_and_ledger() {
        let cinema = cinema(5, 10);
        let hold = cinema.request_tentative(3, None).unwrap();
        let booking = cinema.confirm(&hold).unwrap();

        assert_eq!(booking.id.as_str(), "GIC0001");
        assert_eq!(booking.sequence, 1);
        assert_eq!(cinema.available_seats(), 47);
        assert_eq!(cinema.lookup("GIC0001").unwrap().seats, hold.seats);
        assert_eq!(cinema.snapshot().count(SeatMark::Booked), 3);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert_eq!(cinema(1, 1).request_tentative(0, None), Err(BookingError::InvalidQuantity));
    }

    #[test]
    fn quantity_above_availability_reports_current_count() {
        let cinema = cinema(5, 10);
        let all = cinema.request_tentative(50, None).unwrap();
        cinema.confirm(&all).unwrap();

        assert_eq!(
            cinema.request_tentative(1, None),
            Err(BookingError::InsufficientSeats { requested: 1, available: 0 })
        );
    }

    #[test]
    fn invalid_start_labels_are_reported() {
        let cinema = cinema(5, 10);
        for label in ["Z1", "A", "A15"] {
            assert_eq!(
                cinema.request_tentative(2, Some(label)),
                Err(BookingError::InvalidSeatLabel { label: label.to_string() })
            );
        }
    }

    #[test]
    fn booked_start_seat_is_unavailable() {
        let cinema = cinema(5, 10);
        let first = cinema.request_tentative(4, Some("A1")).unwrap();
        cinema.confirm(&first).unwrap();

        assert_eq!(
            cinema.request_tentative(2, Some("A3")),
            Err(BookingError::SeatUnavailable { seat: pos(0, 2) })
        );
    }

    #[test]
    fn reallocation_replaces_previous_candidate_set() {
        let cinema = cinema(5, 10);
        let first = cinema.request_tentative(2, None).unwrap();
        let second = cinema.reallocate(&first, Some("C1")).unwrap();

        assert_eq!(second.hold_id, first.hold_id);
        assert_eq!(second.seats, vec![pos(2, 0), pos(2, 1)]);
        // старый набор больше не подтверждается
        assert_eq!(cinema.confirm(&first), Err(BookingError::StaleAllocation));
        assert_eq!(cinema.confirm(&second).unwrap().seats, second.seats);
    }

    #[test]
    fn failed_reallocation_keeps_previous_candidate_set() {
        let cinema = cinema(5, 10);
        let first = cinema.request_tentative(2, None).unwrap();
        assert!(cinema.reallocate(&first, Some("Q9")).is_err());
        assert!(cinema.confirm(&first).is_ok());
    }

    #[test]
    fn abandoned_allocation_consumes_nothing() {
        let cinema = cinema(5, 10);
        let abandoned = cinema.request_tentative(5, None).unwrap();
        cinema.abandon(abandoned.clone());

        assert_eq!(cinema.available_seats(), 50);
        assert_eq!(cinema.confirm(&abandoned), Err(BookingError::StaleAllocation));

        let next = cinema.request_tentative(5, None).unwrap();
        assert_eq!(next.preview_id.as_str(), "GIC0001");
        assert_eq!(next.seats, abandoned.seats);
    }

    #[test]
    fn overlapping_confirmations_second_is_stale() {
        let cinema = cinema(5, 10);
        let a = cinema.request_tentative(5, None).unwrap();
        let b = cinema.request_tentative(5, None).unwrap();
        assert_eq!(a.seats, b.seats);
        assert_eq!(a.preview_id, b.preview_id);

        cinema.confirm(&a).unwrap();
        assert_eq!(cinema.confirm(&b), Err(BookingError::StaleAllocation));
        assert_eq!(cinema.available_seats(), 45);
        assert_eq!(cinema.bookings().len(), 1);
    }

    #[test]
    fn disjoint_flows_sharing_a_preview_get_distinct_ids() {
        let cinema = cinema(5, 10);
        let a = cinema.request_tentative(2, Some("A1")).unwrap();
        let b = cinema.request_tentative(2, Some("B1")).unwrap();
        assert_eq!(a.preview_id, b.preview_id);

        let first = cinema.confirm(&a).unwrap();
        let second = cinema.confirm(&b).unwrap();
        assert_eq!(first.id.as_str(), "GIC0001");
        assert_eq!(second.id.as_str(), "GIC0002");
    }

    #[test]
    fn multiple_bookings_do_not_conflict() {
        let cinema = cinema(5, 10);
        let ids: Vec<_> = [None, Some("A1"), Some("A8")]
            .into_iter()
            .map(|start| {
                let hold = cinema.request_tentative(3, start).unwrap();
                cinema.confirm(&hold).unwrap().id
            })
            .collect();

        assert_eq!(cinema.available_seats(), 41);
        assert_eq!(cinema.lookup(ids[1].as_str()).unwrap().seats, vec![pos(0, 0), pos(0, 1), pos(0, 2)]);
        assert_eq!(cinema.lookup(ids[2].as_str()).unwrap().seats, vec![pos(0, 7), pos(0, 8), pos(0, 9)]);
    }

    #[test]
    fn narrow_id_width_keeps_bookings_in_sequence_order() {
        let spec = VenueSpec::new("Narrow", 1, 9).unwrap();
        let cinema = Cinema::new(spec, BookingIdFormat::new("G", 1)).unwrap();
        for _ in 0..9 {
            cinema.confirm(&cinema.request_tentative(1, None).unwrap()).unwrap();
        }

        let bookings = cinema.bookings();
        let sequences: Vec<u32> = bookings.iter().map(|b| b.sequence).collect();
        assert_eq!(sequences, (1..=9).collect::<Vec<_>>());
        assert_eq!(cinema.lookup("G9").unwrap().sequence, 9);
    }

    #[test]
    fn id_width_too_small_for_the_venue_is_rejected() {
        // 20 мест - до 20 броней, одной цифры не хватит
        let spec = VenueSpec::new("Narrow", 2, 10).unwrap();
        assert!(matches!(
            Cinema::new(spec.clone(), BookingIdFormat::new("GIC", 1)),
            Err(BookingError::InvalidConfig(_))
        ));
        assert!(Cinema::new(spec, BookingIdFormat::new("GIC", 2)).is_ok());
    }

    #[test]
    fn lookup_of_unknown_id_is_not_found() {
        assert_eq!(
            cinema(5, 10).lookup("INVALID123"),
            Err(BookingError::NotFound { booking_id: "INVALID123".to_string() })
        );
    }

    #[test]
    fn highlighted_view_separates_own_seats_from_others() {
        let cinema = cinema(5, 10);
        let first = cinema.confirm(&cinema.request_tentative(3, None).unwrap()).unwrap();
        cinema.confirm(&cinema.request_tentative(2, Some("B1")).unwrap()).unwrap();

        let view = cinema.highlighted_view(first.id.as_str()).unwrap();
        assert_eq!(view.count(SeatMark::Selected), 3);
        assert_eq!(view.count(SeatMark::Booked), 2);
        assert_eq!(view.mark(pos(1, 0)), Some(SeatMark::Booked));
        // сам зал не поменялся
        assert_eq!(cinema.snapshot().count(SeatMark::Selected), 0);
        assert!(cinema.highlighted_view("GIC0099").is_err());
    }
}
