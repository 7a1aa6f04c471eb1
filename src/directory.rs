//! Owner records. Persistence mechanics live behind [`OwnerRepository`];
//! the bundled implementation keeps everything in memory and can seed
//! itself from the deployment's `owners.json`.

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::error::CoreError;
use crate::models::{Owner, OwnerStatus};

/// Synchronous owner store. The core treats it as always available; errors
/// surface as [`CoreError::Repository`].
pub trait OwnerRepository: Send + Sync {
    fn list(&self) -> Result<Vec<Owner>, CoreError>;
    fn get(&self, phone: &str) -> Result<Option<Owner>, CoreError>;
    fn set_status(&self, phone: &str, status: OwnerStatus) -> Result<bool, CoreError>;
    fn set_location(
        &self,
        phone: &str,
        lat: f64,
        lon: f64,
        text: &str,
    ) -> Result<bool, CoreError>;
    /// Returns `false` when an owner with that phone already exists.
    fn add(&self, phone: &str, name: Option<String>) -> Result<bool, CoreError>;
    fn remove(&self, phone: &str) -> Result<bool, CoreError>;
}

/// Thin façade the rest of the core talks to.
#[derive(Clone)]
pub struct OwnerDirectory {
    repo: Arc<dyn OwnerRepository>,
}

impl OwnerDirectory {
    pub fn new(repo: Arc<dyn OwnerRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> Result<Vec<Owner>, CoreError> {
        self.repo.list()
    }

    pub fn get(&self, phone: &str) -> Result<Option<Owner>, CoreError> {
        self.repo.get(phone)
    }

    pub fn set_status(&self, phone: &str, status: OwnerStatus) -> Result<bool, CoreError> {
        self.repo.set_status(phone, status)
    }

    pub fn set_location(
        &self,
        phone: &str,
        lat: f64,
        lon: f64,
        text: &str,
    ) -> Result<bool, CoreError> {
        self.repo.set_location(phone, lat, lon, text)
    }

    pub fn add(&self, phone: &str, name: Option<String>) -> Result<bool, CoreError> {
        self.repo.add(phone, name)
    }

    pub fn remove(&self, phone: &str) -> Result<bool, CoreError> {
        self.repo.remove(phone)
    }
}

#[derive(Default)]
pub struct InMemoryOwnerRepository {
    owners: RwLock<Vec<Owner>>,
}

impl InMemoryOwnerRepository {
    pub fn new(owners: Vec<Owner>) -> Self {
        Self { owners: RwLock::new(owners) }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::Repository(format!("reading owner data: {e}")))?;
        let owners = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Repository(format!("parsing owner data: {e}")))?;
        Ok(Self::new(owners))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Owner>>, CoreError> {
        self.owners
            .write()
            .map_err(|_| CoreError::Repository("owner store lock poisoned".into()))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Owner>>, CoreError> {
        self.owners
            .read()
            .map_err(|_| CoreError::Repository("owner store lock poisoned".into()))
    }
}

impl OwnerRepository for InMemoryOwnerRepository {
    fn list(&self) -> Result<Vec<Owner>, CoreError> {
        Ok(self.read()?.clone())
    }

    fn get(&self, phone: &str) -> Result<Option<Owner>, CoreError> {
        Ok(self.read()?.iter().find(|o| o.phone == phone).cloned())
    }

    fn set_status(&self, phone: &str, status: OwnerStatus) -> Result<bool, CoreError> {
        let mut owners = self.write()?;
        match owners.iter_mut().find(|o| o.phone == phone) {
            Some(owner) => {
                owner.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn set_location(
        &self,
        phone: &str,
        lat: f64,
        lon: f64,
        text: &str,
    ) -> Result<bool, CoreError> {
        let mut owners = self.write()?;
        match owners.iter_mut().find(|o| o.phone == phone) {
            Some(owner) => {
                owner.lat = lat;
                owner.lon = lon;
                owner.location = Some(text.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn add(&self, phone: &str, name: Option<String>) -> Result<bool, CoreError> {
        let mut owners = self.write()?;
        if owners.iter().any(|o| o.phone == phone) {
            return Ok(false);
        }
        owners.push(Owner::new(phone, name));
        Ok(true)
    }

    fn remove(&self, phone: &str) -> Result<bool, CoreError> {
        let mut owners = self.write()?;
        let before = owners.len();
        owners.retain(|o| o.phone != phone);
        Ok(owners.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_rejected_for_duplicates() {
        let repo = InMemoryOwnerRepository::default();
        assert!(repo.add("+911", Some("Mani".into())).unwrap());
        assert!(!repo.add("+911", None).unwrap());
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn new_owners_start_inactive() {
        let repo = InMemoryOwnerRepository::default();
        repo.add("+911", None).unwrap();
        let owner = repo.get("+911").unwrap().unwrap();
        assert_eq!(owner.status, OwnerStatus::Inactive);
        assert_eq!(owner.bookings, 0);
    }

    #[test]
    fn status_and_location_updates_hit_the_right_owner() {
        let repo = InMemoryOwnerRepository::default();
        repo.add("+911", None).unwrap();
        repo.add("+912", None).unwrap();

        assert!(repo.set_status("+911", OwnerStatus::Active).unwrap());
        assert!(repo.set_location("+912", 9.45, 77.79, "Bus Stand").unwrap());
        assert!(!repo.set_status("+913", OwnerStatus::Active).unwrap());

        assert_eq!(repo.get("+911").unwrap().unwrap().status, OwnerStatus::Active);
        let moved = repo.get("+912").unwrap().unwrap();
        assert_eq!(moved.location.as_deref(), Some("Bus Stand"));
        assert_eq!(moved.status, OwnerStatus::Inactive);
    }

    #[test]
    fn remove_reports_whether_anything_went() {
        let repo = InMemoryOwnerRepository::default();
        repo.add("+911", None).unwrap();
        assert!(repo.remove("+911").unwrap());
        assert!(!repo.remove("+911").unwrap());
    }
}
