use serde::Deserialize;
use std::env;

use crate::error::BookingResult;
use crate::models::{BookingIdFormat, VenueSpec};

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub booking: BookingConfig,
    #[serde(default)]
    pub venue: VenueDefaults,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub cinema_name: String,
    pub rust_log: String,
    /// "pretty" или "json"
    pub log_format: String,
}

// Формат номеров брони
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub id_prefix: String,
    pub id_width: usize,
}

// Зал можно задать заранее, тогда стартовый вопрос пропускается
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueDefaults {
    pub title: Option<String>,
    pub rows: Option<usize>,
    pub columns: Option<usize>,
}

impl BookingConfig {
    pub fn id_format(&self) -> BookingIdFormat {
        BookingIdFormat::new(self.id_prefix.clone(), self.id_width)
    }
}

impl VenueDefaults {
    /// Заданы все три поля - зал, проверенный так же, как ввод с консоли
    pub fn preset(&self) -> Option<BookingResult<VenueSpec>> {
        match (&self.title, self.rows, self.columns) {
            (Some(title), Some(rows), Some(columns)) => {
                Some(VenueSpec::new(title.as_str(), rows, columns))
            }
            _ => None,
        }
    }
}

impl Config {
    /// Значения по умолчанию, затем переменные `CINEMA_*`
    /// (`CINEMA_BOOKING__ID_PREFIX=HALL`), затем `RUST_LOG`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("app.cinema_name", "GIC Cinemas")?
            .set_default("app.rust_log", "cinema_booking=info")?
            .set_default("app.log_format", "pretty")?
            .set_default("booking.id_prefix", "GIC")?
            .set_default("booking.id_width", 4)?
            .add_source(
                config::Environment::with_prefix("CINEMA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("app.rust_log", env::var("RUST_LOG").ok())?
            .build()?
            .try_deserialize()
    }
}
