use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered steps of the reservation dialogue. The two timing states branch
/// off between destination collection and dispatch; steps never move
/// backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStep {
    CollectName,
    CollectContact,
    CollectDestination,
    ChooseTiming,
    CollectScheduleTime,
    Dispatch,
}

impl BookingStep {
    /// Step label shown in status messages ("step n/4"). Keeps the numbering
    /// users already know from the dialogue prompts.
    pub fn number(&self) -> &'static str {
        match self {
            BookingStep::CollectName => "1",
            BookingStep::CollectContact => "2",
            BookingStep::CollectDestination => "3",
            BookingStep::ChooseTiming => "3.5",
            BookingStep::CollectScheduleTime => "3.75",
            BookingStep::Dispatch => "4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    TwoWheeler,
    FourSeatCar,
    EightSeatCar,
    Van,
}

impl VehicleType {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::TwoWheeler => "Two-wheeler",
            VehicleType::FourSeatCar => "4-seat car",
            VehicleType::EightSeatCar => "8-seat car",
            VehicleType::Van => "Van",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One in-progress or completed reservation. Fields fill in as the dialogue
/// advances; a confirmed booking is immutable except through owner
/// acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub step: BookingStep,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub destination: Option<String>,
    pub destination_lat: Option<f64>,
    pub destination_lon: Option<f64>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub confirmed: bool,
    pub pending_owner: bool,
    pub ticket_id: Option<String>,
    pub assigned_owner: Option<String>,
    pub last_interaction: DateTime<Utc>,
}

impl Booking {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            step: BookingStep::CollectName,
            name: None,
            phone: None,
            vehicle_type: None,
            destination: None,
            destination_lat: None,
            destination_lon: None,
            scheduled_time: None,
            confirmed: false,
            pending_owner: false,
            ticket_id: None,
            assigned_owner: None,
            last_interaction: now,
        }
    }
}
