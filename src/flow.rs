//! The booking dialogue: a per-user state machine that walks the fixed
//! sequence of prompts, dispatches to the nearest-owner matcher at the final
//! step and finalizes matches into tickets. Prompt wording is the protocol
//! the deployed user base knows; change it only together with the
//! compatibility tests.

use chrono::{TimeZone, Utc};
use std::sync::Arc;

use crate::config::BotConfig;
use crate::directory::{OwnerDirectory, OwnerRepository};
use crate::error::CoreError;
use crate::geo::GeoPoint;
use crate::geocode::Geocoder;
use crate::input::{normalize_phone, parse_schedule, VehicleSynonyms};
use crate::matcher::{find_available_owner, MatchOutcome};
use crate::models::{Booking, BookingStep, Mode, Owner};
use crate::notify::Notifier;
use crate::reminder::ReminderScheduler;
use crate::store::SessionStore;
use crate::ticket::TicketGenerator;

const VEHICLE_TYPE_MENU: &str =
    "Available vehicle types:\n- Two-wheeler\n- 4-seat car\n- 8-seat car\n- Van";

#[derive(Clone)]
pub struct ParkingBot {
    pub(crate) sessions: SessionStore,
    pub(crate) owners: OwnerDirectory,
    pub(crate) geocoder: Arc<dyn Geocoder>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) tickets: TicketGenerator,
    pub(crate) reminders: ReminderScheduler,
    pub(crate) config: Arc<BotConfig>,
    pub(crate) synonyms: Arc<VehicleSynonyms>,
}

impl ParkingBot {
    pub fn new(
        config: BotConfig,
        owners: Arc<dyn OwnerRepository>,
        geocoder: Arc<dyn Geocoder>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            owners: OwnerDirectory::new(owners),
            geocoder,
            notifier,
            tickets: TicketGenerator,
            reminders: ReminderScheduler::new(),
            config: Arc::new(config),
            synonyms: Arc::new(VehicleSynonyms::default()),
        }
    }

    /// Replaces the vehicle-type synonym table. The table is ordered and the
    /// order is observable, so deployments that need different resolution
    /// pass their own.
    pub fn with_synonyms(mut self, synonyms: VehicleSynonyms) -> Self {
        self.synonyms = Arc::new(synonyms);
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn owners(&self) -> &OwnerDirectory {
        &self.owners
    }

    pub fn reminders(&self) -> &ReminderScheduler {
        &self.reminders
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Feeds one inbound message into the user's booking dialogue and
    /// returns the reply text. An empty reply means the step already
    /// notified everyone it had to. `Err` is a collaborator failure; state
    /// is left where it was so the user can retry.
    pub async fn advance(&self, user_id: &str, raw_message: &str) -> Result<String, CoreError> {
        let lock = self.sessions.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let message = raw_message.trim().to_string();
        let now = Utc::now();
        let existing = self.sessions.booking(user_id).await;

        // A confirmed booking stays frozen until it is completed or the
        // owner-acceptance flow touches it.
        if existing.as_ref().is_some_and(|b| b.confirmed) {
            return Ok("⚠️ You already have an active booking. Please use \"status\" to check your current booking or complete it first.".to_string());
        }

        let mut booking = match existing {
            Some(booking) => {
                if now - booking.last_interaction > self.config.session_timeout {
                    self.sessions.set_booking(user_id, None).await;
                    self.sessions.set_mode(user_id, Mode::Ai).await;
                    log::info!("Booking session timed out for {user_id}");
                    return Ok("⏳ Your session has timed out due to inactivity. Please start the booking process again by typing Book.".to_string());
                }
                booking
            }
            None => Booking::new(now),
        };
        booking.last_interaction = now;
        self.sessions
            .set_booking(user_id, Some(booking.clone()))
            .await;

        match booking.step {
            BookingStep::CollectName => self.collect_name(user_id, booking, &message).await,
            BookingStep::CollectContact => self.collect_contact(user_id, booking, &message).await,
            BookingStep::CollectDestination => {
                self.collect_destination(user_id, booking, &message).await
            }
            BookingStep::ChooseTiming => self.choose_timing(user_id, booking, &message).await,
            BookingStep::CollectScheduleTime => {
                self.collect_schedule_time(user_id, booking, &message).await
            }
            BookingStep::Dispatch => self.dispatch(user_id, booking).await,
        }
    }

    async fn collect_name(
        &self,
        user_id: &str,
        mut booking: Booking,
        message: &str,
    ) -> Result<String, CoreError> {
        if message.is_empty() {
            return Ok("Please enter your name to begin the booking.".to_string());
        }
        booking.name = Some(message.to_string());
        booking.step = BookingStep::CollectContact;
        self.sessions.set_booking(user_id, Some(booking)).await;
        Ok(format!(
            "Got it! Now please share your phone number and vehicle type in the following format:\n\nPhone, Vehicle Type\n\nExample:\n1234567890, 4-seat car\n\n{VEHICLE_TYPE_MENU}"
        ))
    }

    async fn collect_contact(
        &self,
        user_id: &str,
        mut booking: Booking,
        message: &str,
    ) -> Result<String, CoreError> {
        let parts: Vec<&str> = message.split(',').collect();
        if parts.len() != 2 {
            return Ok("Please use the correct format: Phone, Vehicle Type\nExample: 1234567890, 4-seat car".to_string());
        }

        let Some(phone) = normalize_phone(parts[0], &self.config.country_code) else {
            return Ok("That phone number looks invalid. Please provide a valid number (e.g., 1234567890 or +911234567890).".to_string());
        };
        let Some(vehicle) = self.synonyms.resolve(parts[1]) else {
            return Ok(format!(
                "Please specify a valid vehicle type.\n{VEHICLE_TYPE_MENU}"
            ));
        };

        booking.phone = Some(phone);
        booking.vehicle_type = Some(vehicle);
        booking.step = BookingStep::CollectDestination;
        self.sessions.set_booking(user_id, Some(booking)).await;
        Ok("Great! Now send your destination location (just type the location name or share location via WhatsApp).".to_string())
    }

    async fn collect_destination(
        &self,
        user_id: &str,
        mut booking: Booking,
        message: &str,
    ) -> Result<String, CoreError> {
        if message.is_empty() {
            return Ok("Please provide your destination location.".to_string());
        }
        let Some(location) = self.geocoder.resolve(message).await? else {
            return Ok(format!(
                "Sorry, we couldn't find a location for \"{message}\". Please try a more specific address."
            ));
        };
        booking.destination = Some(message.to_string());
        booking.destination_lat = Some(location.lat);
        booking.destination_lon = Some(location.lon);
        booking.step = BookingStep::ChooseTiming;
        self.sessions.set_booking(user_id, Some(booking)).await;
        Ok("Would you like to book for now or schedule for later?\n\n1. Book Now\n2. Schedule for Later".to_string())
    }

    async fn choose_timing(
        &self,
        user_id: &str,
        mut booking: Booking,
        message: &str,
    ) -> Result<String, CoreError> {
        let lower = message.to_lowercase();
        if message == "1" || lower.contains("now") {
            booking.step = BookingStep::Dispatch;
            let reply = format!(
                "🅿️ Parking Mode: Thanks, {name}! We are finding the nearest parking spot for your {vehicle}. Your destination coordinates are Lat: {lat}, Lon: {lon}. Please wait...",
                name = booking.name.as_deref().unwrap_or(""),
                vehicle = booking.vehicle_type.map(|v| v.label()).unwrap_or(""),
                lat = booking.destination_lat.unwrap_or_default(),
                lon = booking.destination_lon.unwrap_or_default(),
            );
            self.sessions.set_booking(user_id, Some(booking)).await;
            Ok(reply)
        } else if message == "2" || lower.contains("later") || lower.contains("schedule") {
            booking.step = BookingStep::CollectScheduleTime;
            self.sessions.set_booking(user_id, Some(booking)).await;
            Ok("Please enter the date and time for your scheduled parking in format: DD/MM/YYYY HH:MM (24-hour format)\nExample: 20/05/2025 14:30".to_string())
        } else {
            Ok("Please select a valid option:\n1. Book Now\n2. Schedule for Later".to_string())
        }
    }

    async fn collect_schedule_time(
        &self,
        user_id: &str,
        mut booking: Booking,
        message: &str,
    ) -> Result<String, CoreError> {
        let Some(naive) = parse_schedule(message) else {
            return Ok("Invalid format. Please enter the date and time as: DD/MM/YYYY HH:MM\nExample: 20/05/2025 14:30".to_string());
        };
        let now = Utc::now();
        let scheduled = Utc.from_utc_datetime(&naive);
        if scheduled < now {
            return Ok("Please enter a valid future date and time.".to_string());
        }

        booking.scheduled_time = Some(scheduled);
        booking.step = BookingStep::Dispatch;
        self.reminders
            .arm(user_id, booking.clone(), self.clone())
            .await;
        self.sessions
            .set_booking(user_id, Some(booking.clone()))
            .await;

        let display = scheduled.format("%d/%m/%Y %H:%M");
        if scheduled > now + self.config.advance_threshold {
            Ok(format!(
                "🅿️ Parking Mode: Your booking has been scheduled for {display}. We'll notify you 15 minutes before your booking time. Type \"status\" anytime to check your booking."
            ))
        } else {
            // Close enough to now: functionally an immediate booking, but
            // the schedule stays on record.
            Ok(format!(
                "🅿️ Parking Mode: Thanks, {name}! We are finding the nearest parking spot for your {vehicle} for {display}. Please wait...",
                name = booking.name.as_deref().unwrap_or(""),
                vehicle = booking.vehicle_type.map(|v| v.label()).unwrap_or(""),
            ))
        }
    }

    async fn dispatch(&self, user_id: &str, mut booking: Booking) -> Result<String, CoreError> {
        let destination = destination_point(&booking)?;
        let vehicle = booking
            .vehicle_type
            .ok_or(CoreError::InvalidState("vehicle type missing at dispatch"))?;

        let owners = self.owners.list()?;
        let outcome = find_available_owner(
            &owners,
            vehicle,
            destination,
            self.config.match_radius_km,
            self.config.match_vehicle_types,
        );

        if let MatchOutcome::Found(owner) = outcome {
            self.finalize_match(user_id, &mut booking, &owner).await;
            return Ok(String::new());
        }

        let reason = match outcome {
            MatchOutcome::NoNearbyOwner => "🚗 No owner found within 1 km of your destination.",
            _ => "😔 No active owners available at the moment.",
        };

        if booking.scheduled_time.is_some() {
            booking.confirmed = false;
            booking.pending_owner = true;
            self.sessions.set_booking(user_id, Some(booking)).await;
            Ok(format!(
                "🅿️ Parking Mode: {reason} Your scheduled booking will be processed again closer to the scheduled time."
            ))
        } else {
            self.sessions.set_booking(user_id, None).await;
            self.sessions.set_mode(user_id, Mode::Ai).await;
            Ok(format!(
                "🅿️ Parking Mode: {reason} Please try again later or choose a different location."
            ))
        }
    }

    /// Shared tail of dispatch and the reminder path: ticket, confirmation,
    /// notifications to both parties, mode back to AI.
    pub(crate) async fn finalize_match(
        &self,
        user_id: &str,
        booking: &mut Booking,
        owner: &Owner,
    ) {
        let ticket = self.tickets.issue(booking, owner);
        booking.confirmed = true;
        booking.pending_owner = false;
        booking.ticket_id = Some(ticket.id.clone());
        booking.assigned_owner = Some(owner.phone.clone());
        self.sessions
            .set_booking(user_id, Some(booking.clone()))
            .await;

        if let Err(e) = self
            .notifier
            .send(user_id, &format!("🅿️ {}", ticket.slip))
            .await
        {
            log::error!("❌ Failed to notify user {user_id}: {e}");
        }
        if let Err(e) = self
            .notifier
            .send(
                &owner.phone,
                &format!("📥 *New Booking Received!*\n{}\n\nReply '2' to confirm.", ticket.slip),
            )
            .await
        {
            log::error!("❌ Failed to notify owner {}: {e}", owner.phone);
        }

        self.sessions.set_mode(user_id, Mode::Ai).await;
        log::info!(
            "🎫 Booking {} confirmed for {user_id}, assigned owner {}",
            ticket.id,
            owner.phone
        );
    }

    /// Reminder callback. The notification text comes from the snapshot the
    /// reminder was armed with; the re-match runs against the live booking.
    pub(crate) async fn fire_reminder(&self, user_id: &str, snapshot: &Booking) {
        let lock = self.sessions.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Some(mut booking) = self.sessions.booking(user_id).await else {
            return;
        };
        if booking.scheduled_time.is_none() {
            return;
        }

        let reminder = format!(
            "🔔 *Reminder:* Your parking reservation is coming up in ~15 minutes!\n\n📌 Destination: {destination}\n🚗 Vehicle: {vehicle}\n⏰ Scheduled for: {scheduled}",
            destination = snapshot.destination.as_deref().unwrap_or(""),
            vehicle = snapshot.vehicle_type.map(|v| v.label()).unwrap_or(""),
            scheduled = snapshot
                .scheduled_time
                .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
                .unwrap_or_default(),
        );
        if let Err(e) = self
            .notifier
            .send(user_id, &format!("🅿️ Parking Mode: {reminder}"))
            .await
        {
            log::error!("❌ Failed to send reminder to {user_id}: {e}");
        }
        log::info!("Reminder sent to {user_id}");

        let Ok(destination) = destination_point(&booking) else {
            return;
        };
        let Some(vehicle) = booking.vehicle_type else {
            return;
        };
        let owners = match self.owners.list() {
            Ok(owners) => owners,
            Err(e) => {
                log::error!("Owner lookup failed during reminder for {user_id}: {e}");
                return;
            }
        };

        match find_available_owner(
            &owners,
            vehicle,
            destination,
            self.config.match_radius_km,
            self.config.match_vehicle_types,
        ) {
            MatchOutcome::Found(owner) => {
                self.finalize_match(user_id, &mut booking, &owner).await;
            }
            _ => {
                // No retry beyond this point; the booking stays pending.
                log::info!("No owner available at reminder time for {user_id}");
            }
        }
    }

    /// Formatted booking status for the `status` command.
    pub async fn booking_status(&self, user_id: &str) -> String {
        let Some(booking) = self.sessions.booking(user_id).await else {
            return "You don't have any active bookings at the moment. Type 'Book' to make a reservation.".to_string();
        };

        let mut status = String::from("📱 *Your Booking Status*\n");
        if booking.confirmed {
            status.push_str("✅ Status: Confirmed\n");
        } else if let Some(scheduled) = booking.scheduled_time {
            status.push_str("⏳ Status: Scheduled\n");
            let left = scheduled - Utc::now();
            if left > chrono::Duration::zero() {
                status.push_str(&format!(
                    "⏱️ Coming up in: {}h {}m\n",
                    left.num_hours(),
                    left.num_minutes() % 60
                ));
            }
        } else {
            status.push_str("🔄 Status: In Progress\n");
        }

        if let Some(name) = &booking.name {
            status.push_str(&format!("👤 Name: {name}\n"));
        }
        if let Some(phone) = &booking.phone {
            status.push_str(&format!("📞 Phone: {phone}\n"));
        }
        if let Some(vehicle) = booking.vehicle_type {
            status.push_str(&format!("🚗 Vehicle: {vehicle}\n"));
        }
        if let Some(destination) = &booking.destination {
            status.push_str(&format!("📍 Destination: {destination}\n"));
        }
        if let Some(scheduled) = booking.scheduled_time {
            status.push_str(&format!(
                "⏰ Scheduled for: {}\n",
                scheduled.format("%d/%m/%Y %H:%M")
            ));
        }
        if let Some(ticket_id) = &booking.ticket_id {
            status.push_str(&format!("🎫 Ticket ID: {ticket_id}\n"));
        }

        if !booking.confirmed && booking.scheduled_time.is_none() {
            status.push_str(&format!(
                "\n⏳ Booking in progress (step {}/4)\nType 'Book' to continue where you left off.",
                booking.step.number()
            ));
        }
        status
    }
}

fn destination_point(booking: &Booking) -> Result<GeoPoint, CoreError> {
    match (booking.destination_lat, booking.destination_lon) {
        (Some(lat), Some(lon)) => Ok(GeoPoint { lat, lon }),
        _ => Err(CoreError::InvalidState("destination missing at dispatch")),
    }
}
