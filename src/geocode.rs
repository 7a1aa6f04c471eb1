//! Destination resolution. The core only depends on the [`Geocoder`] trait;
//! the bundled implementation matches against a predefined location table
//! the same way the production deployment seeds its service towns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

/// Turns free text into coordinates. `Ok(None)` means "not found"; `Err` is
/// a collaborator failure and leaves booking state untouched upstream.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, text: &str) -> Result<Option<ResolvedLocation>, CoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Fuzzy lookup over a fixed location table: exact match, then containment,
/// then Levenshtein similarity with a 0.6 cutoff.
#[derive(Debug, Clone, Default)]
pub struct PredefinedGeocoder {
    locations: Vec<NamedLocation>,
}

const FUZZY_THRESHOLD: f64 = 0.6;

impl PredefinedGeocoder {
    pub fn new(locations: Vec<NamedLocation>) -> Self {
        Self { locations }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::Geocoder(format!("reading location table: {e}")))?;
        let locations = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Geocoder(format!("parsing location table: {e}")))?;
        Ok(Self { locations })
    }

    fn best_match(&self, text: &str) -> Option<(&NamedLocation, f64)> {
        let mut best: Option<(&NamedLocation, f64)> = None;
        for location in &self.locations {
            let score = fuzzy_score(text, &location.name);
            if score > FUZZY_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                best = Some((location, score));
            }
        }
        best
    }
}

#[async_trait]
impl Geocoder for PredefinedGeocoder {
    async fn resolve(&self, text: &str) -> Result<Option<ResolvedLocation>, CoreError> {
        Ok(self.best_match(text).map(|(location, score)| {
            log::debug!("Found predefined location: {} (score: {score:.2})", location.name);
            ResolvedLocation {
                lat: location.latitude,
                lon: location.longitude,
                label: location.name.clone(),
            }
        }))
    }
}

/// Similarity in [0, 1]: 1.0 exact, 0.8 substring containment either way,
/// otherwise Levenshtein-based with scores under the threshold collapsed
/// to zero.
fn fuzzy_score(input: &str, target: &str) -> f64 {
    let input = input.trim().to_lowercase();
    let target = target.trim().to_lowercase();

    if input == target {
        return 1.0;
    }
    if target.contains(&input) || input.contains(&target) {
        return 0.8;
    }

    let distance = levenshtein(&input, &target);
    let max_len = input.chars().count().max(target.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let similarity = 1.0 - distance as f64 / max_len as f64;
    if similarity >= FUZZY_THRESHOLD {
        similarity
    } else {
        0.0
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut current = vec![0; a.len() + 1];

    for (i, bc) in b.iter().enumerate() {
        current[0] = i + 1;
        for (j, ac) in a.iter().enumerate() {
            let substitution = prev[j] + usize::from(ac != bc);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[a.len()]
}
