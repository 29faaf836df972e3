//! Shared product catalog.
//!
//! The storefront starts with an empty catalog and fills it from the backend
//! in the background. Each refresh takes a ticket from a monotonically
//! increasing generation counter; a result is applied only if no newer ticket
//! has been applied first, so a slow response can never overwrite fresher
//! data. When the backend is unreachable the static LUXE collection is
//! applied instead, under the same rule.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use luxe_core::{Product, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::backend::BackendClient;

/// Where the current product list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// Nothing applied yet.
    Empty,
    Backend,
    /// Backend was unreachable; the static collection is shown.
    Fallback,
}

/// A refresh ticket. Higher tickets were issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

struct Snapshot {
    generation: u64,
    source: CatalogSource,
    products: Arc<Vec<Product>>,
}

/// The product list shared by every session.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    next_ticket: AtomicU64,
    snapshot: RwLock<Snapshot>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                next_ticket: AtomicU64::new(0),
                snapshot: RwLock::new(Snapshot {
                    generation: 0,
                    source: CatalogSource::Empty,
                    products: Arc::new(Vec::new()),
                }),
            }),
        }
    }

    /// Issue the next refresh ticket.
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.inner.next_ticket.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Apply a fetched product list if `ticket` is newer than the applied one.
    ///
    /// Inactive products are dropped. Returns whether the list was applied.
    pub fn apply(&self, ticket: RefreshTicket, products: Vec<Product>, source: CatalogSource) -> bool {
        let Ok(mut snapshot) = self.inner.snapshot.write() else {
            tracing::error!("Catalog lock poisoned, dropping refresh");
            return false;
        };

        if ticket.0 <= snapshot.generation {
            tracing::debug!(
                ticket = ticket.0,
                applied = snapshot.generation,
                "Discarding stale catalog refresh"
            );
            return false;
        }

        let active: Vec<Product> = products.into_iter().filter(|p| p.is_active).collect();
        tracing::info!(
            ticket = ticket.0,
            count = active.len(),
            source = ?source,
            "Catalog updated"
        );
        *snapshot = Snapshot {
            generation: ticket.0,
            source,
            products: Arc::new(active),
        };
        true
    }

    /// Fetch the product list from the backend and apply it.
    ///
    /// On failure the static collection is applied instead. Returns whether
    /// this refresh's result was applied.
    #[instrument(skip(self, client))]
    pub async fn refresh(&self, client: &BackendClient) -> bool {
        let ticket = self.begin_refresh();
        match client.list_products().await {
            Ok(products) => self.apply(ticket, products, CatalogSource::Backend),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch products, using static catalog");
                self.apply(ticket, fallback_products(), CatalogSource::Fallback)
            }
        }
    }

    /// Refresh now, then keep refreshing every `interval` in the background.
    ///
    /// Each refresh runs as its own task so a slow backend call cannot delay
    /// the next one; the generation rule keeps the newest result.
    pub fn spawn_refresh_loop(
        &self,
        client: BackendClient,
        interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let catalog = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let catalog = catalog.clone();
                let client = client.clone();
                tokio::spawn(async move {
                    catalog.refresh(&client).await;
                });
            }
        })
    }

    /// The current active products.
    #[must_use]
    pub fn products(&self) -> Arc<Vec<Product>> {
        self.inner
            .snapshot
            .read()
            .map(|snapshot| Arc::clone(&snapshot.products))
            .unwrap_or_default()
    }

    /// Look up an active product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.products().iter().find(|p| p.id == id).cloned()
    }

    /// Where the current list came from.
    #[must_use]
    pub fn source(&self) -> CatalogSource {
        self.inner
            .snapshot
            .read()
            .map_or(CatalogSource::Empty, |snapshot| snapshot.source)
    }
}

const FALLBACK_SIZES: [&str; 5] = ["XS", "S", "M", "L", "XL"];
const FALLBACK_STOCK: u32 = 10;
const FALLBACK_COLORS: [&str; 4] = ["black", "white", "navy", "gray"];

/// The static LUXE collection shown when the backend is unreachable.
#[must_use]
pub fn fallback_products() -> Vec<Product> {
    [
        (1, "Essential White Tee", "shirts", 70, "photo-1521572163474-6864f9cf17ab"),
        (2, "Classic Baseball Cap", "hats", 100, "photo-1578662996442-48f60103fc96"),
        (3, "Linen Blend Shorts", "shorts", 150, "photo-1591195853828-11db59a44f6b"),
        (4, "Classic Polo Shirt", "polos", 100, "photo-1586790170083-2f9ceadc732d"),
        (5, "Oversized Hoodie", "shirts", 200, "photo-1620012253295-c15cc3e65df4"),
        (6, "Slim Fit Jeans", "pants", 200, "photo-1605518216938-7c31b7b14ad0"),
        (7, "Leather Sneakers", "shoes", 250, "photo-1549298916-b41d501d3772"),
        (8, "Minimalist Watch", "accessories", 350, "photo-1551698618-1dfe5d97d256"),
    ]
    .into_iter()
    .map(|(id, name, category, price, photo)| {
        Product::new(
            ProductId::new(id),
            name,
            luxe_core::product::DEFAULT_BRAND,
            category,
            Decimal::from(price),
        )
        .with_sizes(FALLBACK_SIZES)
        .with_colors(FALLBACK_COLORS)
        .with_stock(FALLBACK_STOCK)
        .with_image(format!("https://images.unsplash.com/{photo}?w=400"))
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product::new(ProductId::new(id), format!("P{id}"), "LUXE", "shirts", Decimal::ONE)
    }

    #[test]
    fn test_new_catalog_is_empty() {
        let catalog = Catalog::new();
        assert!(catalog.products().is_empty());
        assert_eq!(catalog.source(), CatalogSource::Empty);
    }

    #[test]
    fn test_stale_refresh_is_discarded() {
        let catalog = Catalog::new();
        let slow = catalog.begin_refresh();
        let fast = catalog.begin_refresh();

        assert!(catalog.apply(fast, vec![product(2)], CatalogSource::Backend));
        assert!(!catalog.apply(slow, vec![product(1)], CatalogSource::Backend));

        let ids: Vec<i64> = catalog.products().iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_in_order_refreshes_apply() {
        let catalog = Catalog::new();
        let first = catalog.begin_refresh();
        assert!(catalog.apply(first, vec![product(1)], CatalogSource::Fallback));
        let second = catalog.begin_refresh();
        assert!(catalog.apply(second, vec![product(1), product(2)], CatalogSource::Backend));
        assert_eq!(catalog.products().len(), 2);
        assert_eq!(catalog.source(), CatalogSource::Backend);
    }

    #[test]
    fn test_same_ticket_applies_once() {
        let catalog = Catalog::new();
        let ticket = catalog.begin_refresh();
        assert!(catalog.apply(ticket, vec![product(1)], CatalogSource::Backend));
        assert!(!catalog.apply(ticket, vec![product(2)], CatalogSource::Backend));
    }

    #[test]
    fn test_inactive_products_are_hidden() {
        let catalog = Catalog::new();
        let mut hidden = product(2);
        hidden.is_active = false;
        catalog.apply(catalog.begin_refresh(), vec![product(1), hidden], CatalogSource::Backend);

        assert_eq!(catalog.products().len(), 1);
        assert!(catalog.get(ProductId::new(2)).is_none());
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().name, "P1");
    }

    #[test]
    fn test_fallback_collection() {
        let products = fallback_products();
        assert_eq!(products.len(), 8);
        let watch = products.last().unwrap();
        assert_eq!(watch.name, "Minimalist Watch");
        assert_eq!(watch.price, Decimal::from(350));
        assert_eq!(watch.brand, "LUXE");
        assert!(watch.primary_image().unwrap().starts_with("https://images.unsplash.com/"));
        assert!(products.iter().all(|p| p.offers_size("M")));
    }

    #[tokio::test]
    async fn test_refresh_falls_back_when_backend_is_down() {
        // Nothing listens on port 9 (discard) in the test environment
        let config = crate::config::BackendConfig::new("http://127.0.0.1:9/api/").unwrap();
        let client = BackendClient::new(&config).unwrap();
        let catalog = Catalog::new();

        assert!(catalog.refresh(&client).await);
        assert_eq!(catalog.source(), CatalogSource::Fallback);
        assert_eq!(catalog.products().len(), 8);
    }
}
