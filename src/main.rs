use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{
    config::Config,
    controllers::{menu, venue, Console},
    Cinema,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Логи в stderr, stdout занят меню
    let filter = tracing_subscriber::EnvFilter::new(&config.app.rust_log);
    let registry = tracing_subscriber::registry().with(filter);
    if config.app.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    info!("Starting {} booking console", config.app.cinema_name);

    let mut console = Console::new(BufReader::new(stdin()), stdout());
    let id_format = config.booking.id_format();

    let cinema = match config.venue.preset() {
        Some(spec) => Cinema::new(spec?, id_format)?,
        None => match venue::define_venue(&mut console, &id_format).await? {
            Some(cinema) => cinema,
            None => return Ok(()),
        },
    };

    menu::run(&mut console, &cinema, &config.app.cinema_name).await?;
    info!("Session finished with {} bookings", cinema.bookings().len());
    Ok(())
}
