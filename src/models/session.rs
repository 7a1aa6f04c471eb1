use serde::{Deserialize, Serialize};

use super::Booking;

/// Which conversational surface currently handles a user's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Ai,
    Parking,
    Owner,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub mode: Mode,
    pub booking: Option<Booking>,
}
