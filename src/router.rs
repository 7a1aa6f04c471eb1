//! Mode routing for inbound text, transport-agnostic: the webhook layer
//! hands over `(user id, message)` and sends back every returned reply.

use crate::flow::ParkingBot;
use crate::models::{Mode, Owner, OwnerStatus};

const WELCOME: &str = "Welcome to SharaSpot!\nWherever you drive, Park Nearby\nOur service is currently available in Sivakasi and Rajapalayam, and we're expanding soon!\n\nType \"Book\" to reserve your parking space, or ask Shara AI anything for more info.\n\nPowered by Folonite.";

pub fn mode_prefix(mode: Mode) -> &'static str {
    match mode {
        Mode::Ai => "💬 Shara AI",
        Mode::Parking => "🅿️ Parking Mode",
        Mode::Owner => "🅿️ Owner Mode",
    }
}

fn wrap(mode: Mode, message: &str) -> String {
    format!("{}: {message}", mode_prefix(mode))
}

/// Routes one inbound message and returns the replies to deliver, in order.
pub async fn route_message(bot: &ParkingBot, user_id: &str, text: &str) -> Vec<String> {
    let message = text.trim();
    let lower = message.to_lowercase();

    // Registered owners land in owner mode on any contact, unless they are
    // explicitly switching to the AI surface.
    match bot.owners.get(user_id) {
        Ok(Some(owner)) if lower != "hi" && lower != "talk" => {
            bot.sessions.set_mode(user_id, Mode::Owner).await;
            let mut replies = vec![owner_welcome(&owner)];
            if !message.is_empty() {
                replies.push(handle_owner_command(bot, user_id, message).await);
            }
            return replies;
        }
        Ok(_) => {}
        Err(e) => log::error!("Owner lookup failed for {user_id}: {e}"),
    }

    match lower.as_str() {
        "hi" | "talk" => {
            bot.sessions.set_mode(user_id, Mode::Ai).await;
            vec![wrap(Mode::Ai, WELCOME)]
        }
        "book" => {
            bot.sessions.set_mode(user_id, Mode::Parking).await;
            vec![wrap(
                Mode::Parking,
                "You are now in Parking Mode. Let's start your reservation. \nEnter your name:",
            )]
        }
        "status" => {
            let mode = bot.sessions.mode(user_id).await;
            if mode == Mode::Owner {
                vec![handle_owner_command(bot, user_id, "status").await]
            } else {
                vec![wrap(mode, &bot.booking_status(user_id).await)]
            }
        }
        "help" => {
            let mode = bot.sessions.mode(user_id).await;
            vec![wrap(mode, help_text(mode))]
        }
        _ => match bot.sessions.mode(user_id).await {
            // Free-form AI replies come from an external service; the core
            // only knows the fallback.
            Mode::Ai => vec![wrap(
                Mode::Ai,
                "I didn't get that. Please type 'help' to see available commands.",
            )],
            Mode::Parking => match bot.advance(user_id, message).await {
                Ok(reply) if reply.is_empty() => Vec::new(),
                Ok(reply) => vec![wrap(Mode::Parking, &reply)],
                Err(e) => {
                    log::error!("Booking error for {user_id}: {e}");
                    vec![wrap(
                        Mode::Parking,
                        "We hit a snag with your booking 😔. Please try again shortly.",
                    )]
                }
            },
            Mode::Owner => vec![handle_owner_command(bot, user_id, message).await],
        },
    }
}

fn help_text(mode: Mode) -> &'static str {
    match mode {
        Mode::Owner => "Commands:\n- 1: Set Active\n- 0: Set Inactive\n- 2: Accept Current Booking\n- 3: Update Location\n- status: View Your Status\n- hi/talk: Switch to AI Mode",
        Mode::Parking => "Commands:\n- hi/talk: Switch to AI Mode\n- status: Check booking status\n- help: Show this menu",
        Mode::Ai => "Commands:\n- book: Start a parking reservation\n- status: Check booking status\n- help: Show this menu",
    }
}

fn owner_welcome(owner: &Owner) -> String {
    let status_emoji = status_emoji(owner.status);
    format!(
        "🅿️ Owner Mode: Welcome back {name}! Your status is {status_emoji} {status}.\n\nAvailable Commands:\n1 - Set Active\n0 - Set Inactive\n2 - Accept Current Booking\n3 - Update Location\nstatus - View Your Status\nhelp - More options",
        name = owner.name.as_deref().unwrap_or(""),
        status = owner.status.as_str().to_uppercase(),
    )
}

fn status_emoji(status: OwnerStatus) -> &'static str {
    match status {
        OwnerStatus::Active => "🟢",
        OwnerStatus::Inactive => "🔴",
    }
}

/// Owner text commands: activation toggles, booking acceptance, location
/// updates and status.
pub async fn handle_owner_command(bot: &ParkingBot, user_id: &str, message: &str) -> String {
    let owner = match bot.owners.get(user_id) {
        Ok(Some(owner)) => owner,
        Ok(None) => return "🅿️ Owner Mode: You are not registered as an owner!".to_string(),
        Err(e) => {
            log::error!("Owner lookup failed for {user_id}: {e}");
            return "🅿️ Owner Mode: Something went wrong. Please try again shortly.".to_string();
        }
    };

    let command = message.trim();
    match command {
        "1" => match bot.owners.set_status(user_id, OwnerStatus::Active) {
            Ok(_) => "🅿️ Owner Mode: ✅ Your status has been set to ACTIVE. You will now receive booking requests automatically.".to_string(),
            Err(e) => owner_update_failed(user_id, e),
        },
        "0" => match bot.owners.set_status(user_id, OwnerStatus::Inactive) {
            Ok(_) => "🅿️ Owner Mode: 🔴 Your status has been set to INACTIVE. You will not receive booking requests until activated again.".to_string(),
            Err(e) => owner_update_failed(user_id, e),
        },
        // TODO: look up the booking assigned to this owner and notify that
        // user directly instead of only acknowledging.
        "2" => "🅿️ Owner Mode: ✅ You have accepted the booking. The user has been notified.".to_string(),
        "3" => "🅿️ Owner Mode: Please send your new location in the format: \"LOCATION: <location name>\".".to_string(),
        "help" => "🅿️ Owner Mode Commands:\n1 - Set status to Active\n0 - Set status to Inactive\n2 - Accept current booking\n3 - Update your location\nhelp - Show this menu\nstatus - Check your current status".to_string(),
        "status" => {
            let vehicle_types = if owner.available_vehicle_types.is_empty() {
                "All types".to_string()
            } else {
                owner
                    .available_vehicle_types
                    .iter()
                    .map(|v| v.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!(
                "🅿️ Owner Mode: {emoji} Your current status is {status}.\n📍 Location: {location}\n🚗 Vehicle Types: {vehicle_types}\n📊 Total bookings: {bookings}",
                emoji = status_emoji(owner.status),
                status = owner.status.as_str().to_uppercase(),
                location = owner.location.as_deref().unwrap_or("Not set"),
                bookings = owner.bookings,
            )
        }
        _ if command.to_lowercase().starts_with("location:") => {
            update_owner_location(bot, user_id, command["location:".len()..].trim()).await
        }
        _ => "🅿️ Owner Mode: ❌ Invalid command. Type \"help\" to see all available commands.".to_string(),
    }
}

async fn update_owner_location(bot: &ParkingBot, user_id: &str, location_text: &str) -> String {
    match bot.geocoder.resolve(location_text).await {
        Ok(Some(location)) => {
            match bot
                .owners
                .set_location(user_id, location.lat, location.lon, location_text)
            {
                Ok(_) => format!(
                    "🅿️ Owner Mode: ✅ Your location has been updated to: \"{location_text}\" ({}, {}).",
                    location.lat, location.lon
                ),
                Err(e) => owner_update_failed(user_id, e),
            }
        }
        Ok(None) => "🅿️ Owner Mode: ❌ Couldn't resolve that location. Please try a more specific address or send your location via WhatsApp.".to_string(),
        Err(e) => {
            log::error!("Geocoding failed for owner {user_id}: {e}");
            "🅿️ Owner Mode: Something went wrong. Please try again shortly.".to_string()
        }
    }
}

fn owner_update_failed(user_id: &str, e: crate::error::CoreError) -> String {
    log::error!("Owner update failed for {user_id}: {e}");
    "🅿️ Owner Mode: Something went wrong. Please try again shortly.".to_string()
}
