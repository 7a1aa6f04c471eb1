//! Ticket issuance: a collision-resistant identifier plus the confirmation
//! slip sent to both the user and the assigned owner.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Booking, Owner};

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: String,
    pub slip: String,
}

#[derive(Debug, Clone, Default)]
pub struct TicketGenerator;

impl TicketGenerator {
    pub fn issue(&self, booking: &Booking, owner: &Owner) -> Ticket {
        let id = new_ticket_id();
        let scheduled_line = booking
            .scheduled_time
            .map(|t| format!("\n📅 Scheduled: {}", t.format("%d/%m/%Y %H:%M")))
            .unwrap_or_default();
        let slip = format!(
            "\n🎫 *Parking Ticket Confirmed*\n\
             ----------------------------\n\
             🆔 Ticket ID: {id}\n\
             👤 Name: {name}\n\
             📞 Phone: {phone}\n\
             🚗 Vehicle: {vehicle}\n\
             📍 Destination: {destination}\n\
             🕒 Booking Time: {booked_at}{scheduled_line}\n\
             👷 Assigned Owner: {assigned}\n\
             ----------------------------\n\
             ℹ️ Present this ticket on arrival",
            name = booking.name.as_deref().unwrap_or(""),
            phone = booking.phone.as_deref().unwrap_or(""),
            vehicle = booking
                .vehicle_type
                .map(|v| v.label())
                .unwrap_or(""),
            destination = booking.destination.as_deref().unwrap_or(""),
            booked_at = Utc::now().format("%d/%m/%Y %H:%M:%S"),
            assigned = owner.display_name(),
        );
        Ticket { id, slip }
    }
}

/// `TKT-` plus a random token. Random rather than clock-derived so two
/// tickets issued in the same instant cannot collide.
fn new_ticket_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("TKT-{}", token[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStep, OwnerStatus, VehicleType};
    use chrono::{TimeZone, Utc};

    fn booking() -> Booking {
        let mut b = Booking::new(Utc::now());
        b.step = BookingStep::Dispatch;
        b.name = Some("Asha".into());
        b.phone = Some("+919876543210".into());
        b.vehicle_type = Some(VehicleType::FourSeatCar);
        b.destination = Some("Bus Stand".into());
        b
    }

    fn owner() -> Owner {
        let mut o = Owner::new("+911234567890", Some("Mani".into()));
        o.status = OwnerStatus::Active;
        o
    }

    #[test]
    fn slip_carries_the_booking_summary() {
        let ticket = TicketGenerator.issue(&booking(), &owner());
        assert!(ticket.id.starts_with("TKT-"));
        assert_eq!(ticket.id.len(), "TKT-".len() + 8);
        assert!(ticket.slip.contains(&format!("🆔 Ticket ID: {}", ticket.id)));
        assert!(ticket.slip.contains("👤 Name: Asha"));
        assert!(ticket.slip.contains("🚗 Vehicle: 4-seat car"));
        assert!(ticket.slip.contains("👷 Assigned Owner: Mani"));
        assert!(!ticket.slip.contains("📅 Scheduled:"));
    }

    #[test]
    fn scheduled_bookings_get_a_schedule_line() {
        let mut b = booking();
        b.scheduled_time = Some(Utc.with_ymd_and_hms(2025, 5, 20, 14, 30, 0).unwrap());
        let ticket = TicketGenerator.issue(&b, &owner());
        assert!(ticket.slip.contains("📅 Scheduled: 20/05/2025 14:30"));
    }

    #[test]
    fn ids_do_not_repeat() {
        let b = booking();
        let o = owner();
        let a = TicketGenerator.issue(&b, &o).id;
        let c = TicketGenerator.issue(&b, &o).id;
        assert_ne!(a, c);
    }
}
