use chrono::Duration;
use std::env;

/// Runtime tunables, loaded from the environment with coded defaults.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Country-code prefix applied to bare 10-digit phone numbers.
    pub country_code: String,
    /// Inactivity window after which an in-progress booking is dropped.
    pub session_timeout: Duration,
    /// Maximum owner distance from the destination.
    pub match_radius_km: f64,
    /// How long before a scheduled slot the reminder fires.
    pub reminder_lead: Duration,
    /// Bookings further out than this are treated as advance bookings.
    pub advance_threshold: Duration,
    /// Whether the matcher honours an owner's declared vehicle types.
    /// Off by default: the deployed behaviour ignores the field.
    pub match_vehicle_types: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            country_code: "+91".to_string(),
            session_timeout: Duration::milliseconds(50_000),
            match_radius_km: 1.0,
            reminder_lead: Duration::minutes(15),
            advance_threshold: Duration::minutes(30),
            match_vehicle_types: false,
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            country_code: env::var("SHARASPOT_COUNTRY_CODE").unwrap_or(defaults.country_code),
            session_timeout: env_i64("SHARASPOT_SESSION_TIMEOUT_MS")
                .map(Duration::milliseconds)
                .unwrap_or(defaults.session_timeout),
            match_radius_km: env::var("SHARASPOT_MATCH_RADIUS_KM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.match_radius_km),
            reminder_lead: env_i64("SHARASPOT_REMINDER_LEAD_MIN")
                .map(Duration::minutes)
                .unwrap_or(defaults.reminder_lead),
            advance_threshold: env_i64("SHARASPOT_ADVANCE_THRESHOLD_MIN")
                .map(Duration::minutes)
                .unwrap_or(defaults.advance_threshold),
            match_vehicle_types: env::var("SHARASPOT_MATCH_VEHICLE_TYPES")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.match_vehicle_types),
        }
    }
}

fn env_i64(key: &str) -> Option<i64> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_constants() {
        let cfg = BotConfig::default();
        assert_eq!(cfg.country_code, "+91");
        assert_eq!(cfg.session_timeout, Duration::milliseconds(50_000));
        assert_eq!(cfg.match_radius_km, 1.0);
        assert_eq!(cfg.reminder_lead, Duration::minutes(15));
        assert_eq!(cfg.advance_threshold, Duration::minutes(30));
        assert!(!cfg.match_vehicle_types);
    }
}
