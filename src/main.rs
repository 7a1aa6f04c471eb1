use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use sharaspot::router::route_message;
use sharaspot::{BotConfig, ConsoleNotifier, InMemoryOwnerRepository, ParkingBot, PredefinedGeocoder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env and set up logging
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting SharaSpot parking bot (console front end)...");

    let config = BotConfig::from_env();
    let owners_file = env::var("OWNERS_FILE").unwrap_or_else(|_| "data/owners.json".to_string());
    let locations_file =
        env::var("LOCATIONS_FILE").unwrap_or_else(|_| "data/locations.json".to_string());

    let owners = match InMemoryOwnerRepository::from_json_file(&owners_file) {
        Ok(repo) => repo,
        Err(e) => {
            log::error!("Error reading owner data: {e}");
            InMemoryOwnerRepository::default()
        }
    };
    let geocoder = match PredefinedGeocoder::from_json_file(&locations_file) {
        Ok(geocoder) => geocoder,
        Err(e) => {
            log::error!("Error reading location table: {e}");
            PredefinedGeocoder::default()
        }
    };

    let bot = ParkingBot::new(
        config,
        Arc::new(owners),
        Arc::new(geocoder),
        Arc::new(ConsoleNotifier),
    );
    log::info!("✅ Owner directory and location table loaded");

    // One exchange per line: "<user id> <message>". Replies and outbound
    // notifications both land on stdout so a single terminal shows the full
    // conversation.
    println!("SharaSpot console. Lines are \"<user id> <message>\", Ctrl-D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((user_id, message)) = line.split_once(' ') else {
            println!("(expected: <user id> <message>)");
            continue;
        };
        for reply in route_message(&bot, user_id, message).await {
            println!("-> {user_id}: {reply}");
        }
    }

    log::info!("👋 Shutting down");
    Ok(())
}
