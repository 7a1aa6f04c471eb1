pub mod config;
pub mod directory;
pub mod error;
pub mod flow;
pub mod geo;
pub mod geocode;
pub mod input;
pub mod matcher;
pub mod models;
pub mod notify;
pub mod reminder;
pub mod router;
pub mod store;
pub mod ticket;

pub use config::BotConfig;
pub use directory::{InMemoryOwnerRepository, OwnerDirectory, OwnerRepository};
pub use error::CoreError;
pub use flow::ParkingBot;
pub use geocode::{Geocoder, NamedLocation, PredefinedGeocoder, ResolvedLocation};
pub use matcher::MatchOutcome;
pub use models::{Booking, BookingStep, Mode, Owner, OwnerStatus, VehicleType};
pub use notify::{ConsoleNotifier, Notifier};
pub use store::SessionStore;
