use std::sync::Arc;

use crate::application::services::{
    AuthService, DashboardService, EnergyService, MarketService, PaymentService, PropertyService,
    RateLimiter, ValuationService,
};
use crate::domain::gateways::{PaymentProcessor, RegionalStatisticsSource};
use crate::domain::rate_limit::RateLimitStore;
use crate::domain::repositories::{
    EnergyProjectRepository, PropertyRepository, SessionRepository, ValuationRepository,
};

/// Storage backends the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub properties: Arc<dyn PropertyRepository>,
    pub energy_projects: Arc<dyn EnergyProjectRepository>,
    pub valuations: Arc<dyn ValuationRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

/// Third-party integrations and the rate-limit counter store.
#[derive(Clone)]
pub struct Integrations {
    pub statistics: Arc<dyn RegionalStatisticsSource>,
    /// Only gateways with credentials; may be empty.
    pub payment_processors: Vec<Arc<dyn PaymentProcessor>>,
    pub rate_limit_store: Arc<dyn RateLimitStore>,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub signing_secret: String,
    pub access_token_ttl_seconds: i64,
}

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub property_service: Arc<PropertyService>,
    pub market_service: Arc<MarketService>,
    pub valuation_service: Arc<ValuationService>,
    pub energy_service: Arc<EnergyService>,
    pub dashboard_service: Arc<DashboardService>,
    pub payment_service: Arc<PaymentService>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` when resolving client addresses.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services over the given backends.
    pub fn new(
        repositories: Repositories,
        integrations: Integrations,
        sessions: SessionSettings,
        behind_proxy: bool,
    ) -> Self {
        let Repositories {
            properties,
            energy_projects,
            valuations,
            sessions: session_repository,
        } = repositories;

        let market_service = Arc::new(MarketService::new(
            properties.clone(),
            integrations.statistics,
        ));

        Self {
            auth_service: Arc::new(AuthService::new(
                session_repository,
                sessions.signing_secret,
                sessions.access_token_ttl_seconds,
            )),
            property_service: Arc::new(PropertyService::new(properties.clone())),
            valuation_service: Arc::new(ValuationService::new(
                properties.clone(),
                valuations.clone(),
                market_service.clone(),
            )),
            energy_service: Arc::new(EnergyService::new(
                properties.clone(),
                energy_projects.clone(),
            )),
            dashboard_service: Arc::new(DashboardService::new(
                properties,
                energy_projects,
                valuations,
            )),
            market_service,
            payment_service: Arc::new(PaymentService::new(integrations.payment_processors)),
            rate_limiter: Arc::new(RateLimiter::new(integrations.rate_limit_store)),
            behind_proxy,
        }
    }
}
