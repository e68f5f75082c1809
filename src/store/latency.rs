//! Simulated service latency
//!
//! Every store operation waits a fixed, per-operation delay before touching
//! state, so clients see the timing of a remote service. The delay is scaled
//! by configuration and can be switched off.

use tokio::time::{sleep, Duration};

/// Store operations, grouped by their simulated cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListBooks,
    GetBook,
    BooksByGenre,
    Deals,
    BooksByPrice,
    Search,
    Recommend,
    Browse,
    ListBudgets,
    CurrentBudget,
    UpdateBudget,
    AddPurchase,
    RemainingBudget,
    BudgetSummary,
    ListWishlist,
    GetWishlistItem,
    CreateWishlistItem,
    UpdateWishlistItem,
    DeleteWishlistItem,
    InWishlist,
    ToggleWishlist,
    PriceAlerts,
    GetPreferences,
    UpdatePreferences,
    UpdatePreferenceField,
    IsOnboarded,
    CompleteOnboarding,
}

impl Operation {
    /// Unscaled delay in milliseconds
    pub fn base_delay_ms(self) -> u64 {
        use Operation::*;
        match self {
            InWishlist | IsOnboarded => 100,
            RemainingBudget => 150,
            GetBook | GetWishlistItem | CurrentBudget | DeleteWishlistItem | GetPreferences
            | CompleteOnboarding => 200,
            BooksByGenre | BooksByPrice | ListBudgets | ListWishlist | UpdateWishlistItem
            | ToggleWishlist | UpdatePreferenceField | BudgetSummary => 250,
            ListBooks | Deals | Search | Browse | UpdateBudget | AddPurchase
            | CreateWishlistItem | UpdatePreferences | PriceAlerts => 300,
            Recommend => 400,
        }
    }
}

/// Latency settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Latency {
    pub enabled: bool,
    /// Multiplier applied to every base delay
    pub scale: f64,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 1.0,
        }
    }
}

impl Latency {
    /// No delay at all
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            scale: 0.0,
        }
    }

    /// Delay for an operation after scaling
    pub fn delay_for(&self, op: Operation) -> Duration {
        if !self.enabled || !self.scale.is_finite() || self.scale <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_micros((op.base_delay_ms() as f64 * self.scale * 1000.0).round() as u64)
    }

    /// Wait out the simulated delay
    pub async fn pause(&self, op: Operation) {
        let delay = self.delay_for(op);
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
