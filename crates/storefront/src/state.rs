//! Application state shared across handlers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tower_sessions::session::Id;
use veggie_go_core::Catalog;

use crate::config::StorefrontConfig;
use crate::services::payment::PaymentClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog and the payment client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    payment: PaymentClient,
    checkout_guard: CheckoutGuard,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product catalog, loaded once at startup
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let payment = PaymentClient::new(&config.payment);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                payment,
                checkout_guard: CheckoutGuard::default(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the payment service client.
    #[must_use]
    pub fn payment(&self) -> &PaymentClient {
        &self.inner.payment
    }

    /// Get a reference to the checkout guard.
    #[must_use]
    pub fn checkout_guard(&self) -> &CheckoutGuard {
        &self.inner.checkout_guard
    }
}

/// Tracks sessions with a checkout in flight so a second submission cannot
/// be issued concurrently for the same cart.
#[derive(Default)]
pub struct CheckoutGuard {
    in_flight: Mutex<HashSet<Id>>,
}

impl CheckoutGuard {
    /// Claim the checkout slot for a session.
    ///
    /// Returns `None` when a checkout for this session is already in flight.
    #[must_use]
    pub fn try_begin(&self, session: Id) -> Option<CheckoutPermit<'_>> {
        let mut in_flight = self.lock();
        if in_flight.insert(session) {
            Some(CheckoutPermit {
                guard: self,
                session,
            })
        } else {
            None
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Id>> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the session's checkout slot when dropped, on every exit path.
pub struct CheckoutPermit<'a> {
    guard: &'a CheckoutGuard,
    session: Id,
}

impl Drop for CheckoutPermit<'_> {
    fn drop(&mut self) {
        self.guard.lock().remove(&self.session);
    }
}
