//! Key-value storage conventions.
//!
//! Every piece of persisted state lives under one of these keys. The recipe
//! collection is a single JSON array; the preference keys each hold a plain
//! string.

pub const SAVED_RECIPES: &str = "flowchef_saved_recipes";

pub const MODEL: &str = "flowchef_model";
pub const MEASURE_SYSTEM: &str = "flowchef_measure_system";
pub const SERVINGS: &str = "flowchef_servings";
pub const PROVIDER_TYPE: &str = "flowchef_provider_type";
pub const API_ENDPOINT: &str = "flowchef_api_endpoint";
pub const CUSTOM_MODEL: &str = "flowchef_custom_model";
pub const CLARIFYING_QUESTIONS: &str = "flowchef_clarifying_questions";

/// All preference keys, in display order.
pub const PREFERENCES: &[&str] = &[
    MODEL,
    MEASURE_SYSTEM,
    SERVINGS,
    PROVIDER_TYPE,
    API_ENDPOINT,
    CUSTOM_MODEL,
    CLARIFYING_QUESTIONS,
];
