use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};

use super::{bookings, Console};
use crate::Cinema;

/// Главный цикл меню до выбора [3] или конца ввода
pub async fn run<R, W>(console: &mut Console<R, W>, cinema: &Cinema, cinema_name: &str) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        console.say(&format!("\nWelcome to {cinema_name}")).await?;
        console
            .say(&format!(
                "[1] Book tickets for {} ({} seats available)",
                cinema.title(),
                cinema.available_seats()
            ))
            .await?;
        console.say("[2] Check bookings").await?;
        console.say("[3] Exit").await?;

        let Some(selection) = console.prompt("Please enter your selection:").await? else {
            break;
        };
        match selection.as_str() {
            "1" => bookings::book_tickets(console, cinema).await?,
            "2" => bookings::check_bookings(console, cinema).await?,
            "3" => break,
            _ => console.say("Invalid selection. Please choose 1, 2, or 3.").await?,
        }
    }

    console
        .say(&format!("\nThank you for using {cinema_name} system. Bye!"))
        .await
}
