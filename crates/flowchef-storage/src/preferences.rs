use std::fmt;
use std::str::FromStr;

use flowchef_core::storage_keys;
use tracing::debug;

use crate::error::StorageError;
use crate::objects::KeyValueStore;

/// A user setting persisted as a plain string next to the recipe collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Model,
    MeasureSystem,
    Servings,
    ProviderType,
    ApiEndpoint,
    CustomModel,
    ClarifyingQuestions,
}

impl Preference {
    pub const ALL: [Preference; 7] = [
        Preference::Model,
        Preference::MeasureSystem,
        Preference::Servings,
        Preference::ProviderType,
        Preference::ApiEndpoint,
        Preference::CustomModel,
        Preference::ClarifyingQuestions,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Preference::Model => storage_keys::MODEL,
            Preference::MeasureSystem => storage_keys::MEASURE_SYSTEM,
            Preference::Servings => storage_keys::SERVINGS,
            Preference::ProviderType => storage_keys::PROVIDER_TYPE,
            Preference::ApiEndpoint => storage_keys::API_ENDPOINT,
            Preference::CustomModel => storage_keys::CUSTOM_MODEL,
            Preference::ClarifyingQuestions => storage_keys::CLARIFYING_QUESTIONS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preference::Model => "model",
            Preference::MeasureSystem => "measure-system",
            Preference::Servings => "servings",
            Preference::ProviderType => "provider-type",
            Preference::ApiEndpoint => "api-endpoint",
            Preference::CustomModel => "custom-model",
            Preference::ClarifyingQuestions => "clarifying-questions",
        }
    }

    /// Value reported when nothing has been stored.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            Preference::MeasureSystem => Some("metric"),
            Preference::Servings => Some("4"),
            Preference::ClarifyingQuestions => Some("true"),
            _ => None,
        }
    }

    fn check(self, value: &str) -> Result<(), String> {
        match self {
            Preference::MeasureSystem if !matches!(value, "metric" | "imperial") => {
                Err("expected metric or imperial".to_string())
            }
            Preference::Servings => match value.parse::<u32>() {
                Ok(n) if n > 0 => Ok(()),
                _ => Err("expected a positive whole number".to_string()),
            },
            Preference::ClarifyingQuestions if !matches!(value, "true" | "false") => {
                Err("expected true or false".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preference {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preference::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| StorageError::UnknownPreference(s.to_string()))
    }
}

/// The stored value, or the preference's default.
pub fn get_preference<S: KeyValueStore + ?Sized>(
    store: &S,
    pref: Preference,
) -> Result<Option<String>, StorageError> {
    let stored = store.get(pref.key())?;
    Ok(stored.or_else(|| pref.default_value().map(str::to_string)))
}

/// Validate and store a preference. An empty value clears it.
pub fn set_preference<S: KeyValueStore + ?Sized>(
    store: &mut S,
    pref: Preference,
    value: &str,
) -> Result<(), StorageError> {
    if value.is_empty() {
        debug!(preference = %pref, "preference cleared");
        return store.remove(pref.key());
    }
    pref.check(value)
        .map_err(|reason| StorageError::InvalidPreference {
            name: pref.name().to_string(),
            value: value.to_string(),
            reason,
        })?;
    debug!(preference = %pref, "preference set");
    store.set(pref.key(), value.to_string())
}

pub fn clarifying_questions_enabled<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<bool, StorageError> {
    Ok(get_preference(store, Preference::ClarifyingQuestions)?.as_deref() != Some("false"))
}
