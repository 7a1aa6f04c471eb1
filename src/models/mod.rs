pub mod booking;
pub mod owner;
pub mod session;

pub use booking::{Booking, BookingStep, VehicleType};
pub use owner::{Owner, OwnerStatus};
pub use session::{Mode, Session};
