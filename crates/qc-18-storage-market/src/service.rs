//! # Storage Market Service
//!
//! The coordinating component: owns the single `MarketState`, serializes
//! every state-changing call behind one write lock, stamps calls with the
//! runtime's block height, and journals committed transitions.
//!
//! ## Concurrency
//!
//! - Writers (register, request, accept, reject, release, expire) hold the
//!   write guard for the full check-then-commit sequence, so two accepts
//!   against the same provider can never both pass the capacity check.
//! - Readers take the read guard and only ever observe fully applied state.
//! - Nothing inside the guard awaits or performs I/O.

use crate::config::MarketConfig;
use crate::domain::entities::{ProviderView, RequestView};
use crate::domain::state::MarketState;
use crate::domain::value_objects::{Principal, RequestId};
use crate::errors::MarketError;
use crate::events::MarketEvent;
use crate::ports::inbound::StorageMarketApi;
use crate::ports::outbound::{BlockHeightSource, MarketEventSink};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Statistics for the Storage Market Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Providers registered.
    pub providers_registered: u64,
    /// Requests created.
    pub requests_created: u64,
    /// Requests accepted.
    pub requests_accepted: u64,
    /// Requests rejected or cancelled by a party.
    pub requests_rejected: u64,
    /// Requests released.
    pub requests_released: u64,
    /// Pending requests expired by TTL.
    pub requests_expired: u64,
    /// Calls that returned an error.
    pub failed_calls: u64,
}

/// The main Storage Market Service.
pub struct StorageMarketService<B: BlockHeightSource, E: MarketEventSink> {
    /// Service configuration.
    config: MarketConfig,
    /// Block height source.
    clock: Arc<B>,
    /// Journal of committed transitions.
    events: Arc<E>,
    /// Registry and ledger, single writer.
    state: RwLock<MarketState>,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
}

impl<B: BlockHeightSource, E: MarketEventSink> StorageMarketService<B, E> {
    /// Create a new service over an empty market.
    pub fn new(clock: Arc<B>, events: Arc<E>, config: MarketConfig) -> Self {
        info!(
            max_request_size_gb = config.max_request_size_gb,
            pending_ttl_blocks = ?config.pending_request_ttl_blocks,
            "Creating storage market service"
        );
        Self {
            state: RwLock::new(MarketState::new(config.max_request_size_gb)),
            config,
            clock,
            events,
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Number of registered providers and created requests.
    pub async fn counts(&self) -> (usize, usize) {
        let state = self.state.read().await;
        (state.provider_count(), state.request_count())
    }

    /// Expire Pending requests that outlived the configured TTL.
    ///
    /// Runs as its own committed step, never as part of a caller's
    /// operation. Returns the ids expired by this sweep. A no-op when expiry
    /// is disabled.
    #[instrument(skip(self))]
    pub async fn expire_stale_requests(&self) -> Vec<RequestId> {
        let Some(ttl) = self.config.pending_request_ttl_blocks else {
            return Vec::new();
        };
        let mut state = self.state.write().await;
        let now = self.clock.current_height();
        let expired = state.expire_pending(now, ttl);
        if expired.is_empty() {
            return Vec::new();
        }

        let ids = expired.iter().map(|r| r.id).collect::<Vec<_>>();
        for request in expired {
            debug!(
                request_id = %request.id,
                created_at = request.created_at,
                "Pending request expired"
            );
            self.events.publish(MarketEvent::RequestExpired { request });
        }
        Self::audit(&state);
        drop(state);

        self.stats.write().await.requests_expired += ids.len() as u64;
        ids
    }

    async fn record_failure(&self, operation: &'static str, err: &MarketError) {
        warn!(operation, code = err.code(), error = %err, "Market call rejected");
        self.stats.write().await.failed_calls += 1;
    }

    /// Logs any invariant violation. Debug builds only.
    fn audit(state: &MarketState) {
        if cfg!(debug_assertions) {
            for violation in state.check_invariants() {
                error!(?violation, "Market invariant violated");
            }
        }
    }
}

#[async_trait]
impl<B: BlockHeightSource, E: MarketEventSink> StorageMarketApi for StorageMarketService<B, E> {
    #[instrument(skip(self), fields(caller = %caller))]
    async fn register_provider(
        &self,
        caller: Principal,
        price_per_gb: u64,
        available_space: u64,
    ) -> Result<bool, MarketError> {
        let mut state = self.state.write().await;
        let height = self.clock.current_height();

        match state.register_provider(caller, price_per_gb, available_space, height) {
            Ok(provider) => {
                info!(price_per_gb, available_space, height, "Provider registered");
                self.events.publish(MarketEvent::ProviderRegistered { provider });
                Self::audit(&state);
                drop(state);
                self.stats.write().await.providers_registered += 1;
                Ok(true)
            }
            Err(err) => {
                drop(state);
                self.record_failure("register-provider", &err).await;
                Err(err)
            }
        }
    }

    async fn get_provider_details(&self, principal: Principal) -> Option<ProviderView> {
        self.state.read().await.provider(&principal)
    }

    #[instrument(skip(self), fields(caller = %caller, provider = %provider))]
    async fn request_storage(
        &self,
        caller: Principal,
        provider: Principal,
        size_gb: u64,
    ) -> Result<RequestId, MarketError> {
        let mut state = self.state.write().await;
        let height = self.clock.current_height();

        match state.request_storage(caller, provider, size_gb, height) {
            Ok(request) => {
                let id = request.id;
                info!(
                    request_id = %id,
                    size_gb,
                    total_price = request.total_price,
                    "Storage requested"
                );
                self.events.publish(MarketEvent::StorageRequested { request });
                drop(state);
                self.stats.write().await.requests_created += 1;
                Ok(id)
            }
            Err(err) => {
                drop(state);
                self.record_failure("request-storage", &err).await;
                Err(err)
            }
        }
    }

    async fn get_request(&self, request_id: RequestId) -> Option<RequestView> {
        self.state.read().await.request(request_id)
    }

    #[instrument(skip(self), fields(caller = %caller, request_id = %request_id))]
    async fn accept_request(
        &self,
        caller: Principal,
        request_id: RequestId,
    ) -> Result<bool, MarketError> {
        let mut state = self.state.write().await;
        let height = self.clock.current_height();

        match state.accept_request(&caller, request_id, height) {
            Ok(outcome) => {
                info!(
                    size_gb = outcome.request.size_gb,
                    available_space = outcome.available_space,
                    "Request accepted"
                );
                self.events.publish(MarketEvent::RequestAccepted {
                    request: outcome.request,
                    available_space: outcome.available_space,
                });
                Self::audit(&state);
                drop(state);
                self.stats.write().await.requests_accepted += 1;
                Ok(true)
            }
            Err(err) => {
                drop(state);
                self.record_failure("accept-request", &err).await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, request_id = %request_id))]
    async fn reject_request(
        &self,
        caller: Principal,
        request_id: RequestId,
    ) -> Result<bool, MarketError> {
        let mut state = self.state.write().await;
        let height = self.clock.current_height();

        match state.reject_request(&caller, request_id, height) {
            Ok(outcome) => {
                info!("Request rejected");
                self.events.publish(MarketEvent::RequestRejected {
                    request: outcome.request,
                    by: caller,
                });
                drop(state);
                self.stats.write().await.requests_rejected += 1;
                Ok(true)
            }
            Err(err) => {
                drop(state);
                self.record_failure("reject-request", &err).await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, request_id = %request_id))]
    async fn release_request(
        &self,
        caller: Principal,
        request_id: RequestId,
    ) -> Result<bool, MarketError> {
        let mut state = self.state.write().await;
        let height = self.clock.current_height();

        match state.release_request(&caller, request_id, height) {
            Ok(outcome) => {
                info!(
                    size_gb = outcome.request.size_gb,
                    available_space = outcome.available_space,
                    "Request released"
                );
                self.events.publish(MarketEvent::RequestReleased {
                    request: outcome.request,
                    by: caller,
                    available_space: outcome.available_space,
                });
                Self::audit(&state);
                drop(state);
                self.stats.write().await.requests_released += 1;
                Ok(true)
            }
            Err(err) => {
                drop(state);
                self.record_failure("release-request", &err).await;
                Err(err)
            }
        }
    }

    async fn requests_for_provider(&self, provider: Principal) -> Vec<RequestView> {
        self.state.read().await.requests_for_provider(&provider)
    }

    async fn requests_for_client(&self, client: Principal) -> Vec<RequestView> {
        self.state.read().await.requests_for_client(&client)
    }
}

/// Service over a manual clock and an in-memory event log, for tests and
/// the standalone node.
pub fn create_test_service(
    config: MarketConfig,
) -> (
    StorageMarketService<crate::adapters::ManualBlockClock, crate::adapters::InMemoryEventLog>,
    Arc<crate::adapters::ManualBlockClock>,
    Arc<crate::adapters::InMemoryEventLog>,
) {
    let clock = Arc::new(crate::adapters::ManualBlockClock::new(config.start_height));
    let events = Arc::new(crate::adapters::InMemoryEventLog::new());
    let service = StorageMarketService::new(Arc::clone(&clock), Arc::clone(&events), config);
    (service, clock, events)
}

// =============================================================================
// TESTS
// =============================================================================
