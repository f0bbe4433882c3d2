pub mod booking;
pub mod seat;
pub mod venue;

pub use booking::{Booking, BookingId, BookingIdFormat, TentativeAllocation};
pub use seat::{SeatPosition, SeatState};
pub use venue::VenueSpec;
