//! User preferences patching

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::store::types::{BookFormat, PriceRange, UserPreferences};

/// Share of the monthly budget used as the price ceiling at onboarding
pub const ONBOARDING_PRICE_SHARE: f64 = 0.6;

/// Shallow partial update of `UserPreferences`
///
/// Each present field replaces the stored value wholesale; absent fields are
/// kept. `notification_preferences` is replaced, not merged key by key.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(default)]
    pub favorite_genres: Option<BTreeSet<String>>,
    #[serde(default)]
    pub monthly_budget: Option<f64>,
    #[serde(default)]
    pub preferred_formats: Option<BTreeSet<BookFormat>>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub is_onboarded: Option<bool>,
    #[serde(default)]
    pub notification_preferences: Option<BTreeMap<String, bool>>,
}

impl PreferencesPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Onboarding budget pick: sets the budget and a matching price ceiling
    pub fn budget_selection(amount: f64) -> Self {
        Self {
            monthly_budget: Some(amount),
            price_range: Some(PriceRange::up_to((amount * ONBOARDING_PRICE_SHARE).floor())),
            ..Default::default()
        }
    }

    /// Builder: replace favorite genres
    pub fn genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_genres = Some(genres.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: replace preferred formats
    pub fn formats(mut self, formats: impl IntoIterator<Item = BookFormat>) -> Self {
        self.preferred_formats = Some(formats.into_iter().collect());
        self
    }

    /// Builder: set a single notification flag (merged into whatever else is in the patch)
    pub fn notification(mut self, flag: impl Into<String>, enabled: bool) -> Self {
        self.notification_preferences
            .get_or_insert_with(BTreeMap::new)
            .insert(flag.into(), enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into stored preferences
    pub fn apply(self, prefs: &mut UserPreferences) {
        if let Some(genres) = self.favorite_genres {
            prefs.favorite_genres = genres;
        }
        if let Some(budget) = self.monthly_budget {
            prefs.monthly_budget = budget;
        }
        if let Some(formats) = self.preferred_formats {
            prefs.preferred_formats = formats;
        }
        if let Some(range) = self.price_range {
            prefs.price_range = range;
        }
        if let Some(onboarded) = self.is_onboarded {
            prefs.is_onboarded = onboarded;
        }
        if let Some(flags) = self.notification_preferences {
            prefs.notification_preferences = flags;
        }
    }
}
