//! Parsing of free-text user input: phone numbers, vehicle types and
//! schedule timestamps.

use chrono::NaiveDateTime;

use crate::models::VehicleType;

/// Normalizes a phone number towards E.164. Already-prefixed numbers pass
/// through untouched, bare 10-digit numbers get the country code, 11-15
/// digit numbers only get a `+`. Anything else is rejected.
pub fn normalize_phone(raw: &str, country_code: &str) -> Option<String> {
    let phone = raw.trim();
    if phone.starts_with('+') {
        return Some(phone.to_string());
    }
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match phone.len() {
        10 => Some(format!("{country_code}{phone}")),
        11..=15 => Some(format!("+{phone}")),
        _ => None,
    }
}

/// Ordered synonym table for vehicle types. Matching is substring
/// containment on the lower-cased input, first entry wins, so the order of
/// the entries is part of the behaviour; callers that need a different
/// resolution order construct their own table.
#[derive(Debug, Clone)]
pub struct VehicleSynonyms {
    entries: Vec<(String, VehicleType)>,
}

impl Default for VehicleSynonyms {
    fn default() -> Self {
        use VehicleType::*;
        let entries = [
            ("two wheeler", TwoWheeler),
            ("2 wheeler", TwoWheeler),
            ("4 seat car", FourSeatCar),
            ("4-seater", FourSeatCar),
            ("4-seats", FourSeatCar),
            ("4 seater", FourSeatCar),
            ("4-seat car", FourSeatCar),
            ("8 seat car", EightSeatCar),
            ("8-seater", EightSeatCar),
            ("8 seats", EightSeatCar),
            ("van", Van),
            ("4 seat", FourSeatCar),
        ];
        Self {
            entries: entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}

impl VehicleSynonyms {
    pub fn new(entries: Vec<(String, VehicleType)>) -> Self {
        Self { entries }
    }

    pub fn resolve(&self, raw: &str) -> Option<VehicleType> {
        let input = raw.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| input.contains(key.as_str()))
            .map(|(_, vehicle)| *vehicle)
    }
}

/// Parses `DD/MM/YYYY HH:MM` (24-hour). Returns the naive timestamp; the
/// caller decides whether it lies in the past.
pub fn parse_schedule(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), "%d/%m/%Y %H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_numbers_pass_through() {
        assert_eq!(
            normalize_phone("+911234567890", "+91").as_deref(),
            Some("+911234567890")
        );
    }

    #[test]
    fn bare_ten_digits_get_country_code() {
        assert_eq!(
            normalize_phone("9876543210", "+91").as_deref(),
            Some("+919876543210")
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_phone("9876543210", "+91").unwrap();
        let twice = normalize_phone(&once, "+91").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn long_numbers_get_a_bare_plus() {
        assert_eq!(
            normalize_phone("919876543210", "+91").as_deref(),
            Some("+919876543210")
        );
    }

    #[test]
    fn junk_is_rejected() {
        assert_eq!(normalize_phone("12345", "+91"), None);
        assert_eq!(normalize_phone("98765abc10", "+91"), None);
        assert_eq!(normalize_phone("1234567890123456", "+91"), None);
    }

    #[test]
    fn synonyms_resolve_by_containment() {
        let table = VehicleSynonyms::default();
        assert_eq!(table.resolve("4 seater"), Some(VehicleType::FourSeatCar));
        assert_eq!(table.resolve("4-seat car"), Some(VehicleType::FourSeatCar));
        assert_eq!(table.resolve("Two Wheeler"), Some(VehicleType::TwoWheeler));
        assert_eq!(table.resolve("a small van please"), Some(VehicleType::Van));
        assert_eq!(table.resolve("8-seater"), Some(VehicleType::EightSeatCar));
        assert_eq!(table.resolve("lorry"), None);
    }

    #[test]
    fn first_table_entry_wins() {
        // Overlapping keys resolve in table order, not by specificity.
        let table = VehicleSynonyms::new(vec![
            ("seat".to_string(), VehicleType::FourSeatCar),
            ("8 seat car".to_string(), VehicleType::EightSeatCar),
        ]);
        assert_eq!(table.resolve("8 seat car"), Some(VehicleType::FourSeatCar));
    }

    #[test]
    fn schedule_parses_and_rejects() {
        let parsed = parse_schedule("20/05/2025 14:30").unwrap();
        assert_eq!(parsed.format("%d/%m/%Y %H:%M").to_string(), "20/05/2025 14:30");
        assert!(parse_schedule("2025-05-20 14:30").is_none());
        assert!(parse_schedule("tomorrow at noon").is_none());
        assert!(parse_schedule("32/01/2025 10:00").is_none());
    }
}
