use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

use super::Console;
use crate::models::{BookingIdFormat, VenueSpec};
use crate::Cinema;

const VENUE_PROMPT: &str =
    "Please define movie title and seating map in [Title] [Row] [SeatsPerRow] format:";

/// Спрашивает параметры зала, пока не получит корректные. `None` - ввод закончился.
pub async fn define_venue<R, W>(
    console: &mut Console<R, W>,
    id_format: &BookingIdFormat,
) -> io::Result<Option<Cinema>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let Some(line) = console.prompt(VENUE_PROMPT).await? else {
            return Ok(None);
        };

        let created = VenueSpec::parse_line(&line)
            .and_then(|spec| Cinema::new(spec, id_format.clone()));
        match created {
            Ok(cinema) => return Ok(Some(cinema)),
            Err(e) => {
                debug!("Rejected venue definition '{}': {}", line, e);
                console
                    .say("Invalid input. Row must be between 1 and 26, and seats per row must be between 1 and 50.")
                    .await?;
            }
        }
    }
}
