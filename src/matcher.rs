//! Nearest-owner selection around a destination.

use crate::geo::{haversine, GeoPoint};
use crate::models::{Owner, OwnerStatus, VehicleType};

#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// Nearest active owner within the radius.
    Found(Owner),
    /// Active owners exist, but none inside the radius.
    NoNearbyOwner,
    /// No owner is active at all.
    NoActiveOwners,
}

/// Scans all owners and keeps the strictly nearest active one within
/// `radius_km` of the destination; on an exact distance tie the first owner
/// seen wins. `filter_vehicle_types` additionally requires the owner to list
/// the requested vehicle type (policy switch, off in the deployed setup).
pub fn find_available_owner(
    owners: &[Owner],
    vehicle: VehicleType,
    destination: GeoPoint,
    radius_km: f64,
    filter_vehicle_types: bool,
) -> MatchOutcome {
    let mut nearest: Option<&Owner> = None;
    let mut min_distance = f64::INFINITY;
    let mut active_owners_exist = false;

    for owner in owners {
        if owner.status != OwnerStatus::Active {
            continue;
        }
        active_owners_exist = true;
        if filter_vehicle_types && !owner.supports(vehicle) {
            continue;
        }
        let distance = haversine(destination, GeoPoint { lat: owner.lat, lon: owner.lon });
        if distance <= radius_km && distance < min_distance {
            nearest = Some(owner);
            min_distance = distance;
        }
    }

    match nearest {
        Some(owner) => MatchOutcome::Found(owner.clone()),
        None if active_owners_exist => MatchOutcome::NoNearbyOwner,
        None => MatchOutcome::NoActiveOwners,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEST: GeoPoint = GeoPoint { lat: 9.4533, lon: 77.7975 };

    fn owner(phone: &str, status: OwnerStatus, lat: f64, lon: f64) -> Owner {
        Owner {
            status,
            lat,
            lon,
            ..Owner::new(phone, None)
        }
    }

    #[test]
    fn empty_directory_means_no_active_owners() {
        assert!(matches!(
            find_available_owner(&[], VehicleType::Van, DEST, 1.0, false),
            MatchOutcome::NoActiveOwners
        ));
    }

    #[test]
    fn inactive_owners_do_not_count_as_active() {
        let owners = [owner("+911", OwnerStatus::Inactive, DEST.lat, DEST.lon)];
        assert!(matches!(
            find_available_owner(&owners, VehicleType::Van, DEST, 1.0, false),
            MatchOutcome::NoActiveOwners
        ));
    }

    #[test]
    fn distant_active_owner_reports_no_nearby() {
        let owners = [owner("+911", OwnerStatus::Active, DEST.lat + 0.05, DEST.lon)];
        assert!(matches!(
            find_available_owner(&owners, VehicleType::Van, DEST, 1.0, false),
            MatchOutcome::NoNearbyOwner
        ));
    }

    #[test]
    fn nearest_qualifying_owner_wins() {
        let owners = [
            owner("+91far", OwnerStatus::Active, DEST.lat + 0.008, DEST.lon),
            owner("+91near", OwnerStatus::Active, DEST.lat + 0.002, DEST.lon),
            owner("+91off", OwnerStatus::Inactive, DEST.lat, DEST.lon),
        ];
        match find_available_owner(&owners, VehicleType::Van, DEST, 1.0, false) {
            MatchOutcome::Found(o) => assert_eq!(o.phone, "+91near"),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn exact_tie_keeps_first_seen() {
        let owners = [
            owner("+91first", OwnerStatus::Active, DEST.lat + 0.002, DEST.lon),
            owner("+91second", OwnerStatus::Active, DEST.lat + 0.002, DEST.lon),
        ];
        match find_available_owner(&owners, VehicleType::Van, DEST, 1.0, false) {
            MatchOutcome::Found(o) => assert_eq!(o.phone, "+91first"),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn vehicle_filter_is_opt_in() {
        let mut two_wheeler_only = owner("+911", OwnerStatus::Active, DEST.lat, DEST.lon);
        two_wheeler_only.available_vehicle_types = vec![VehicleType::TwoWheeler];
        let owners = [two_wheeler_only];

        // Default policy ignores the declared types.
        assert!(matches!(
            find_available_owner(&owners, VehicleType::Van, DEST, 1.0, false),
            MatchOutcome::Found(_)
        ));
        // Opt-in policy enforces them.
        assert!(matches!(
            find_available_owner(&owners, VehicleType::Van, DEST, 1.0, true),
            MatchOutcome::NoNearbyOwner
        ));
    }
}
