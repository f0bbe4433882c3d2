use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info};

use super::Console;
use crate::display::render;
use crate::models::TentativeAllocation;
use crate::{BookingError, Cinema};

/* ---------- helpers ---------- */

async fn show_selection<R, W>(
    console: &mut Console<R, W>,
    cinema: &Cinema,
    hold: &TentativeAllocation,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say(&format!("Booking id: {}", hold.preview_id)).await?;
    console.say("Selected seats:").await?;
    console.say(&render(&cinema.tentative_view(hold))).await
}

enum Decision {
    Confirmed,
    Restart,
    Abandoned,
}

/* ---------- BOOK TICKETS ---------- */

/// Пункт меню [1]: количество билетов, подбор, подтверждение или смена стартового места
pub async fn book_tickets<R, W>(console: &mut Console<R, W>, cinema: &Cinema) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let Some(input) = console
            .prompt("\nEnter number of tickets to book, or enter blank to go back to main menu:")
            .await?
        else {
            return Ok(());
        };
        if input.is_empty() {
            return Ok(());
        }

        let quantity = match input.parse::<i64>() {
            Ok(n) if n > 0 => n as usize,
            Ok(_) => {
                console.say("Number of tickets must be greater than 0.").await?;
                continue;
            }
            Err(_) => {
                console.say("Invalid input. Please enter a number.").await?;
                continue;
            }
        };

        let hold = match cinema.request_tentative(quantity, None) {
            Ok(hold) => hold,
            Err(BookingError::InsufficientSeats { available, .. }) => {
                console
                    .say(&format!("\nSorry, there are only {available} seats available."))
                    .await?;
                continue;
            }
            Err(e) => {
                console.say(&format!("\n{e}")).await?;
                continue;
            }
        };

        console
            .say(&format!(
                "\nSuccessfully reserved {} {} tickets.",
                quantity,
                cinema.title()
            ))
            .await?;
        show_selection(console, cinema, &hold).await?;

        match choose_seats(console, cinema, hold).await? {
            Decision::Confirmed | Decision::Abandoned => return Ok(()),
            Decision::Restart => continue,
        }
    }
}

async fn choose_seats<R, W>(
    console: &mut Console<R, W>,
    cinema: &Cinema,
    mut hold: TentativeAllocation,
) -> io::Result<Decision>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let Some(answer) = console
            .prompt("\nEnter blank to accept seat selection, or enter new seating position:")
            .await?
        else {
            cinema.abandon(hold);
            return Ok(Decision::Abandoned);
        };

        if answer.is_empty() {
            return match cinema.confirm(&hold) {
                Ok(booking) => {
                    console
                        .say(&format!("Booking id: {} confirmed.", booking.id))
                        .await?;
                    Ok(Decision::Confirmed)
                }
                Err(e) => {
                    info!("Confirmation of {} failed: {}", hold.preview_id, e);
                    console
                        .say("Selected seats are no longer available. Please book again.")
                        .await?;
                    Ok(Decision::Restart)
                }
            };
        }

        // при ошибке остается прежний подбор
        match cinema.reallocate(&hold, Some(&answer)) {
            Ok(next) => {
                hold = next;
                show_selection(console, cinema, &hold).await?;
            }
            Err(e) => {
                debug!("Seat position '{}' rejected: {}", answer, e);
                console.say("Invalid seat selection or seats already taken.").await?;
            }
        }
    }
}

/* ---------- CHECK BOOKINGS ---------- */

/// Пункт меню [2]: показать бронь по номеру
pub async fn check_bookings<R, W>(console: &mut Console<R, W>, cinema: &Cinema) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let Some(input) = console
            .prompt("\nEnter booking id, or enter blank to go back to main menu:")
            .await?
        else {
            return Ok(());
        };
        if input.is_empty() {
            return Ok(());
        }

        match cinema
            .lookup(&input)
            .and_then(|booking| cinema.highlighted_view(&input).map(|view| (booking, view)))
        {
            Ok((booking, view)) => {
                console.say(&format!("Booking id: {}", booking.id)).await?;
                console
                    .say(&format!(
                        "Confirmed at: {}",
                        booking.confirmed_at.format("%Y-%m-%d %H:%M:%S UTC")
                    ))
                    .await?;
                console.say("Selected seats:").await?;
                console.say(&render(&view)).await?;
            }
            Err(_) => console.say("Invalid booking id.").await?,
        }
    }
}
