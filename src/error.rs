use thiserror::Error;

/// Errors crossing the collaborator boundaries. Input-validation problems are
/// not errors here; the booking flow answers those with a re-prompt instead.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("geocoder error: {0}")]
    Geocoder(String),

    /// Delivery failure from a transport-backed notifier. The bundled
    /// console notifier never fails; real transports return this.
    #[error("notifier error: {0}")]
    Notifier(String),

    #[error("owner repository error: {0}")]
    Repository(String),

    #[error("booking in inconsistent state: {0}")]
    InvalidState(&'static str),
}
