//! The customer's saved size profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

use super::types::{BodyType, FitPreference, SizeQuery, SizeRecommendation};

/// Storage key holding the size profile.
pub const SIZE_PROFILE_KEY: &str = "verse_size_profile";

/// Last submitted measurements and the size recommended for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeProfile {
    pub height: f64,
    pub weight: f64,
    pub body_type: BodyType,
    pub fit_preference: FitPreference,
    pub recommended_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SizeProfile {
    /// Profile for a query and the recommendation it produced.
    #[must_use]
    pub fn new(query: &SizeQuery, recommendation: &SizeRecommendation) -> Self {
        Self {
            height: query.height_cm,
            weight: query.weight_kg,
            body_type: query.body_type,
            fit_preference: query.fit_preference,
            recommended_size: recommendation.size.clone(),
            updated_at: Some(Utc::now()),
        }
    }

    /// The measurements, for prefilling the next recommendation.
    #[must_use]
    pub const fn query(&self) -> SizeQuery {
        SizeQuery {
            height_cm: self.height,
            weight_kg: self.weight,
            body_type: self.body_type,
            fit_preference: self.fit_preference,
        }
    }
}

/// Size profile persisted under [`SIZE_PROFILE_KEY`].
#[derive(Debug, Clone)]
pub struct SizeProfileStore<S> {
    store: S,
}

impl<S: KeyValueStore> SizeProfileStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The saved profile. Absent or unreadable data yields `None`.
    pub fn load(&self) -> Option<SizeProfile> {
        let raw = match self.store.get(SIZE_PROFILE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read size profile");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| warn!(error = %e, "Stored size profile is corrupt, ignoring"))
            .ok()
    }

    /// Replace the saved profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be written.
    pub fn save(&self, profile: &SizeProfile) -> Result<(), StorageError> {
        let raw = serde_json::to_string(profile)?;
        self.store.set(SIZE_PROFILE_KEY, &raw)
    }

    /// Forget the saved profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(SIZE_PROFILE_KEY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn recommendation(size: &str) -> SizeRecommendation {
        SizeRecommendation {
            size: size.to_string(),
            alternatives: vec!["M".to_string(), "XL".to_string()],
            confidence: 0.9,
            reasoning: "Broad shoulders".to_string(),
            bmi: Some(24.1),
        }
    }

    #[test]
    fn test_save_and_load() {
        let profiles = SizeProfileStore::new(MemoryStore::new());
        assert!(profiles.load().is_none());

        let query = SizeQuery {
            height_cm: 180.0,
            weight_kg: 78.0,
            body_type: BodyType::Broad,
            fit_preference: FitPreference::Regular,
        };
        let profile = SizeProfile::new(&query, &recommendation("L"));
        profiles.save(&profile).unwrap();

        let loaded = profiles.load().unwrap();
        assert_eq!(loaded, profile);
        assert_eq!(loaded.query(), query);
    }

    #[test]
    fn test_reads_profile_without_timestamp() {
        let profiles = SizeProfileStore::new(MemoryStore::with_entry(
            SIZE_PROFILE_KEY,
            r#"{"height":165,"weight":55,"bodyType":"slim","fitPreference":"slim","recommendedSize":"XS"}"#,
        ));
        let loaded = profiles.load().unwrap();
        assert_eq!(loaded.recommended_size, "XS");
        assert!(loaded.updated_at.is_none());
    }

    #[test]
    fn test_corrupt_profile_is_ignored() {
        let profiles = SizeProfileStore::new(MemoryStore::with_entry(SIZE_PROFILE_KEY, "{"));
        assert!(profiles.load().is_none());
        profiles.clear().unwrap();
    }
}
