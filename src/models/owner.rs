use serde::{Deserialize, Serialize};

use super::VehicleType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerStatus {
    Active,
    Inactive,
}

impl OwnerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerStatus::Active => "active",
            OwnerStatus::Inactive => "inactive",
        }
    }
}

/// A registered parking-space provider. `phone` is the key the directory and
/// the notifier address owners by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub phone: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: OwnerStatus,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bookings: u32,
    #[serde(default)]
    pub available_vehicle_types: Vec<VehicleType>,
}

impl Owner {
    pub fn new(phone: impl Into<String>, name: Option<String>) -> Self {
        Self {
            phone: phone.into(),
            name,
            status: OwnerStatus::Inactive,
            lat: 0.0,
            lon: 0.0,
            location: None,
            bookings: 0,
            available_vehicle_types: vec![
                VehicleType::TwoWheeler,
                VehicleType::FourSeatCar,
                VehicleType::EightSeatCar,
                VehicleType::Van,
            ],
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.phone)
    }

    pub fn supports(&self, vehicle: VehicleType) -> bool {
        self.available_vehicle_types.contains(&vehicle)
    }
}
