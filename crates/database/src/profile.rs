//! User profile storage for personal settings.

use std::sync::Arc;

use raksha_core::{validate_age, Namespace, Persistence, UserProfile, ValidationError};
use tokio::sync::RwLock;
use tracing::info;

use crate::collection::{load_json, save_json};
use crate::Result;

/// Profile field identifiers for updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Age,
    Gender,
    BloodType,
}

impl ProfileField {
    /// Parse a field name from user input.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" => Some(ProfileField::Name),
            "age" => Some(ProfileField::Age),
            "gender" | "sex" => Some(ProfileField::Gender),
            "blood_type" | "blood-type" | "bloodtype" | "blood" => Some(ProfileField::BloodType),
            _ => None,
        }
    }

    /// Get a human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Age => "age",
            ProfileField::Gender => "gender",
            ProfileField::BloodType => "blood type",
        }
    }
}

/// Holds the single user profile for the session.
///
/// Created with defaults, loaded once, persisted on every edit.
pub struct ProfileStore {
    persistence: Arc<dyn Persistence>,
    profile: RwLock<UserProfile>,
}

impl ProfileStore {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            profile: RwLock::new(UserProfile::default()),
        }
    }

    /// Create a store and load the persisted profile, if any.
    pub async fn open(persistence: Arc<dyn Persistence>) -> Self {
        let store = Self::new(persistence);
        if let Some(profile) = load_json::<UserProfile>(&store.persistence, Namespace::Profile).await
        {
            *store.profile.write().await = profile;
        }
        store
    }

    pub async fn get(&self) -> UserProfile {
        self.profile.read().await.clone()
    }

    /// Replace the whole profile after validating it.
    pub async fn update(&self, profile: UserProfile) -> Result<()> {
        profile.validate()?;
        let mut current = self.profile.write().await;
        *current = profile;
        info!(name = %current.name, "Updated user profile");
        save_json(&self.persistence, Namespace::Profile, &*current).await;
        Ok(())
    }

    /// Parse and set a single field.
    pub async fn set_field(&self, field: ProfileField, value: &str) -> Result<UserProfile> {
        let mut profile = self.get().await;
        match field {
            ProfileField::Name => profile.name = value.trim().to_string(),
            ProfileField::Age => {
                let age: i64 = value.trim().parse().map_err(|_| ValidationError::Unknown {
                    field: "age".to_string(),
                    value: value.to_string(),
                })?;
                profile.age = validate_age(age)?;
            }
            ProfileField::Gender => profile.gender = value.parse()?,
            ProfileField::BloodType => profile.blood_type = value.parse()?,
        }
        self.update(profile.clone()).await?;
        Ok(profile)
    }
}
