//! Catalog browser binary
//!
//! Loads the category menu, resolves a category route and prints one page
//! of products from a running storefront backend.
//!
//! ```text
//! catalog-browser [category/slugs] [query]
//! catalog-browser footwear/shoes "gender=women&page=2"
//! ```
//!
//! `STOREFRONT_API_BASE_URL` selects the backend; preferences are kept in
//! `STOREFRONT_STATE_FILE` (default `storefront-demo.json`).

use anyhow::Context;
use std::time::Duration;
use storefront::catalog::{CatalogAction, CatalogEnvironment, CatalogReducer, CatalogScope, CatalogState};
use storefront::category::{CategoryAction, CategoryEnvironment, CategoryReducer, CategoryState};
use storefront::preferences::{
    PreferencesAction, PreferencesEnvironment, PreferencesReducer, PreferencesState,
};
use storefront::providers::{NavigationError, Navigator};
use storefront::{HttpClient, JsonFileStorage, RouteQuery, StorefrontConfig};
use storefront_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const STATE_FILE_ENV: &str = "STOREFRONT_STATE_FILE";
const EFFECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Prints pushed routes instead of navigating.
#[derive(Debug, Clone)]
struct PrintingNavigator {
    route: String,
}

impl Navigator for PrintingNavigator {
    async fn push(&self, query: &RouteQuery) -> Result<(), NavigationError> {
        if query.is_empty() {
            println!("  → /{}", self.route);
        } else {
            println!("  → /{}?{query}", self.route);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_browser=info,storefront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let route = args.next().unwrap_or_default();
    let query = RouteQuery::parse(&args.next().unwrap_or_default());

    let config = StorefrontConfig::from_env().context("reading configuration")?;
    let client = HttpClient::new(&config).context("building HTTP client")?;
    tracing::info!(base_url = client.base_url(), "Using storefront backend");

    // Preferences: page size for fresh listings
    let state_file = std::env::var(STATE_FILE_ENV).unwrap_or_else(|_| "storefront-demo.json".into());
    let storage = JsonFileStorage::new(state_file);
    let preferences = Store::new(
        PreferencesState::default(),
        PreferencesReducer::new(),
        PreferencesEnvironment::new(storage.clone()),
    );
    preferences
        .send(PreferencesAction::Load)
        .await?
        .wait_with_timeout(EFFECT_TIMEOUT)
        .await?;
    let per_page = preferences.state(|p| p.items_per_page).await;

    // Categories
    let categories = Store::new(
        CategoryState::default(),
        CategoryReducer::new(),
        CategoryEnvironment::new(client.clone()),
    );
    categories
        .send(CategoryAction::FetchMenu)
        .await?
        .wait_with_timeout(EFFECT_TIMEOUT)
        .await?;
    let (tree, menu_error) = categories.state(|c| (c.tree.clone(), c.error.clone())).await;
    if let Some(error) = menu_error {
        tracing::warn!(%error, "Category menu unavailable");
    }

    println!("=== Categories ===");
    for master in tree.masters() {
        let subs: Vec<&str> = master.children.iter().map(|s| s.slug.as_str()).collect();
        println!("{:<20} {}", master.slug, subs.join(", "));
    }

    let slugs: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
    let scope = if slugs.is_empty() {
        CatalogScope::All
    } else {
        CatalogScope::from_slugs(&tree, &slugs)
            .with_context(|| format!("no category at /{route}"))?
    };
    if let CatalogScope::Category(path) = &scope {
        let trail: Vec<String> = tree
            .breadcrumb(path)
            .unwrap_or_default()
            .into_iter()
            .map(|crumb| crumb.name)
            .collect();
        println!("\n=== {} ===", trail.join(" › "));
    } else {
        println!("\n=== All products ===");
    }

    // Listing
    let catalog = Store::new(
        CatalogState::new(per_page),
        CatalogReducer::new(),
        CatalogEnvironment::new(client, PrintingNavigator { route }, config).with_preferences(storage),
    );
    catalog
        .send(CatalogAction::Enter { scope, query })
        .await?
        .wait_with_timeout(EFFECT_TIMEOUT)
        .await?;

    let listing = catalog.state(Clone::clone).await;
    if let Some(error) = &listing.error {
        anyhow::bail!("products failed to load: {error}");
    }
    for product in &listing.products {
        println!(
            "#{:<6} {:<4} {:<8} {}",
            product.product_id, product.year, product.gender, product.product_display_name
        );
    }
    println!(
        "\nPage {} of {} ({} products, {} per page, {} active filters)",
        listing.pagination.current_page,
        listing.pagination.total_pages,
        listing.pagination.total_items,
        listing.pagination.items_per_page,
        listing.filters.active_filters_count(),
    );

    catalog.shutdown(EFFECT_TIMEOUT).await?;
    Ok(())
}
