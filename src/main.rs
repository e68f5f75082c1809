//! BookWise demo
//!
//! Walks one session through the store: discovery, wishlist, budget and
//! onboarding, logging what each step returns.

use bookwise::config::Config;
use bookwise::store::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    bookwise::logging::init(&config.logging);

    tracing::info!("BookWise v{}", env!("CARGO_PKG_VERSION"));

    let store = BookStore::new(config.store.to_store_config())?;
    tracing::info!("Store stats: {}", store.stats().await);

    demo_discovery(&store).await?;
    demo_wishlist(&store).await;
    demo_budget(&store).await?;
    demo_onboarding(&store).await;

    tracing::info!("Store stats: {}", store.stats().await);
    Ok(())
}

async fn demo_discovery(store: &BookStore) -> StoreResult<()> {
    let deals = store.deals().await;
    for book in &deals {
        let detail = store.book_detail(&book.id).await?;
        tracing::info!(
            "Deal: {} at {} ({}% off)",
            book.title,
            book.current_price,
            detail.discount_percentage
        );
    }

    let picks = store
        .recommendations(&RecommendationQuery::new().price_range(PriceRange::up_to(UNDER_PRICE_CEILING)))
        .await;
    tracing::info!("{} recommendations under {}", picks.len(), UNDER_PRICE_CEILING);

    let trending = store
        .browse(&BrowseFilter::new().category(BrowseCategory::Trending))
        .await;
    if let Some(top) = trending.first() {
        tracing::info!("Trending: {} ({})", top.title, top.rating);
    }

    Ok(())
}

async fn demo_wishlist(store: &BookStore) {
    let outcome = store.toggle_wishlist("1", Some(200.0)).await;
    tracing::info!("Toggled The Silent Patient: {:?}", outcome.action);

    for entry in store.wishlist_entries().await {
        let title = entry.book.as_ref().map(|b| b.title.as_str()).unwrap_or("<missing>");
        match entry.price_status {
            Some(status) => tracing::info!("Wishlist: {} - {}", title, status.message()),
            None => tracing::info!("Wishlist: {} - no target", title),
        }
    }

    for alert in store.price_alerts().await {
        tracing::info!(
            "Price alert: {} is {} (target {})",
            alert.book.title,
            alert.current_price,
            alert.target_price
        );
    }
}

async fn demo_budget(store: &BookStore) -> StoreResult<()> {
    let current = store.current_month_budget().await;
    let month = current.month;

    store
        .add_purchase(month, PurchaseDraft::new("The Name of the Wind", 199.0).retailer("Amazon"))
        .await?;

    let summary = store.budget_summary(month).await?;
    tracing::info!(
        "Budget {}: spent {} of {}, {} left ({:.0}%)",
        month,
        summary.spent_amount,
        summary.budget_amount,
        summary.remaining,
        summary.percent_spent
    );

    let suggestions = store.budget_suggestions(month, DEFAULT_SUGGESTION_LIMIT).await;
    tracing::info!("{} books fit the remaining budget", suggestions.len());

    Ok(())
}

async fn demo_onboarding(store: &BookStore) {
    store
        .update_preferences(PreferencesPatch::budget_selection(1500.0).genres(["Fantasy", "Thriller"]))
        .await;
    let prefs = store.complete_onboarding().await;
    tracing::info!(
        "Onboarded with {} genres, price ceiling {}",
        prefs.favorite_genres.len(),
        prefs.price_range.max
    );

    let picks = store.recommendations_for_user().await;
    tracing::info!("{} personal recommendations", picks.len());
}
