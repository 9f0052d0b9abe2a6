#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{Value, json};

use woonmarkt::api::routes::api_router;
use woonmarkt::application::services::IssuedTokens;
use woonmarkt::domain::entities::{
    CityListingStats, EnergyProject, ListingStatus, NewEnergyProject, NewProperty, NewSession,
    NewValuation, PaymentIntent, PaymentProvider, PaymentRequest, PaymentStatus, ProjectStatus,
    Property, PropertyFilter, PropertyType, Refund, RefundRequest, RegionStatistic, Role, Session,
    SessionKind, Valuation,
};
use woonmarkt::domain::gateways::{
    PaymentError, PaymentProcessor, RegionalStatisticsSource, StatisticsError,
};
use woonmarkt::domain::rate_limit::{RateLimitError, RateLimitStore, WindowCount};
use woonmarkt::domain::repositories::{
    EnergyProjectRepository, PropertyRepository, SessionRepository, ValuationRepository,
};
use woonmarkt::error::AppError;
use woonmarkt::infrastructure::rate_limit::MemoryRateLimitStore;
use woonmarkt::state::{AppState, Integrations, Repositories, SessionSettings};

pub const SIGNING_SECRET: &str = "integration-test-secret";

// ─── Repositories ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryProperties {
    rows: Mutex<Vec<Property>>,
}

fn matches_filter(property: &Property, filter: &PropertyFilter) -> bool {
    filter
        .city
        .as_ref()
        .is_none_or(|city| property.city.eq_ignore_ascii_case(city))
        && filter.min_price.is_none_or(|min| property.asking_price >= min)
        && filter.max_price.is_none_or(|max| property.asking_price <= max)
}

#[async_trait]
impl PropertyRepository for InMemoryProperties {
    async fn create(&self, new_property: NewProperty) -> Result<Property, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let property = Property {
            id: rows.len() as i64 + 1,
            owner_id: new_property.owner_id,
            title: new_property.title,
            street: new_property.street,
            house_number: new_property.house_number,
            postal_code: new_property.postal_code,
            city: new_property.city,
            asking_price: new_property.asking_price,
            living_area_m2: new_property.living_area_m2,
            rooms: new_property.rooms,
            property_type: new_property.property_type,
            energy_label: new_property.energy_label,
            woz_value: new_property.woz_value,
            status: ListingStatus::Available,
            created_at: now,
            updated_at: now,
        };
        rows.push(property.clone());
        Ok(property)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Property>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list(
        &self,
        filter: PropertyFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| matches_filter(p, &filter))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: PropertyFilter) -> Result<i64, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| matches_filter(p, &filter))
            .count() as i64)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Property>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }

    async fn city_stats(&self, city: &str) -> Result<CityListingStats, AppError> {
        let rows = self.rows.lock().unwrap();
        let listings: Vec<_> = rows
            .iter()
            .filter(|p| p.city.eq_ignore_ascii_case(city))
            .collect();

        if listings.is_empty() {
            return Ok(CityListingStats::default());
        }

        let n = listings.len() as f64;
        let priced: Vec<f64> = listings
            .iter()
            .filter_map(|p| p.price_per_m2())
            .map(|v| v as f64)
            .collect();

        Ok(CityListingStats {
            listing_count: listings.len() as i64,
            average_asking_price: Some(
                listings.iter().map(|p| p.asking_price as f64).sum::<f64>() / n,
            ),
            average_price_per_m2: (!priced.is_empty())
                .then(|| priced.iter().sum::<f64>() / priced.len() as f64),
        })
    }
}

#[derive(Default)]
pub struct InMemoryEnergyProjects {
    rows: Mutex<Vec<EnergyProject>>,
}

#[async_trait]
impl EnergyProjectRepository for InMemoryEnergyProjects {
    async fn create(&self, new_project: NewEnergyProject) -> Result<EnergyProject, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let project = EnergyProject {
            id: rows.len() as i64 + 1,
            property_id: new_project.property_id,
            owner_id: new_project.owner_id,
            measure: new_project.measure,
            status: ProjectStatus::Planned,
            estimated_cost: new_project.estimated_cost,
            label_before: new_project.label_before,
            label_after: new_project.label_after,
            created_at: now,
            updated_at: now,
        };
        rows.push(project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<EnergyProject>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<EnergyProject>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: i64,
        status: ProjectStatus,
    ) -> Result<Option<EnergyProject>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|p| p.id == id).map(|p| {
            p.status = status;
            p.updated_at = Utc::now();
            p.clone()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryValuations {
    rows: Mutex<Vec<Valuation>>,
}

#[async_trait]
impl ValuationRepository for InMemoryValuations {
    async fn create(&self, new_valuation: NewValuation) -> Result<Valuation, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let valuation = Valuation {
            id: rows.len() as i64 + 1,
            property_id: new_valuation.property_id,
            requested_by: new_valuation.requested_by,
            estimated_value: new_valuation.estimated_value,
            low_estimate: new_valuation.low_estimate,
            high_estimate: new_valuation.high_estimate,
            price_per_m2: new_valuation.price_per_m2,
            basis: new_valuation.basis,
            region_source: new_valuation.region_source,
            created_at: Utc::now(),
        };
        rows.push(valuation.clone());
        Ok(valuation)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Valuation>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|v| v.id == id).cloned())
    }

    async fn recent_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<Valuation>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|v| v.requested_by == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

struct StoredSession {
    session: NewSession,
    revoked: bool,
}

/// Session store that also plays the users table for role lookups.
#[derive(Default)]
pub struct InMemorySessions {
    rows: Mutex<Vec<StoredSession>>,
    roles: Mutex<HashMap<i64, Role>>,
}

impl InMemorySessions {
    pub fn set_role(&self, user_id: i64, role: Role) {
        self.roles.lock().unwrap().insert(user_id, role);
    }

    pub fn active_count(&self, user_id: i64) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.session.user_id == user_id && !s.revoked)
            .count()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessions {
    async fn create(&self, new_session: NewSession) -> Result<(), AppError> {
        self.rows.lock().unwrap().push(StoredSession {
            session: new_session,
            revoked: false,
        });
        Ok(())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        kind: SessionKind,
    ) -> Result<Option<Session>, AppError> {
        let roles = self.roles.lock().unwrap();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| !s.revoked && s.session.token_hash == token_hash && s.session.kind == kind)
            .map(|s| Session {
                user_id: s.session.user_id,
                role: roles.get(&s.session.user_id).copied().unwrap_or(Role::User),
                kind: s.session.kind,
                expires_at: s.session.expires_at,
            }))
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|s| !s.revoked && s.session.token_hash == token_hash)
        {
            Some(stored) => {
                stored.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let mut revoked = 0;
        for stored in rows
            .iter_mut()
            .filter(|s| !s.revoked && s.session.user_id == user_id)
        {
            stored.revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn touch(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }
}

// ─── Integrations ───────────────────────────────────────────────────────────

/// Regional statistics served from a fixed list, or a failing upstream.
pub struct FakeStatistics {
    regions: Vec<RegionStatistic>,
    fail_with: Option<u16>,
}

impl FakeStatistics {
    pub fn with_regions(regions: Vec<RegionStatistic>) -> Self {
        Self {
            regions,
            fail_with: None,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            regions: Vec::new(),
            fail_with: Some(status),
        }
    }
}

#[async_trait]
impl RegionalStatisticsSource for FakeStatistics {
    async fn fetch_regions(&self) -> Result<Vec<RegionStatistic>, StatisticsError> {
        match self.fail_with {
            Some(status) => Err(StatisticsError::Status { status }),
            None => Ok(self.regions.clone()),
        }
    }
}

pub fn region(name: &str, average_sale_price: f64, yearly_change_pct: f64) -> RegionStatistic {
    RegionStatistic {
        region_name: name.to_string(),
        average_sale_price: Some(average_sale_price),
        yearly_change_pct: Some(yearly_change_pct),
    }
}

/// Gateway that answers locally and records what it was asked.
pub struct FakePaymentProcessor {
    provider: PaymentProvider,
    fail: bool,
    pub created: Mutex<Vec<PaymentRequest>>,
    owners: Mutex<HashMap<String, i64>>,
    pub captured: Mutex<Vec<String>>,
    pub refunded: Mutex<Vec<String>>,
}

impl FakePaymentProcessor {
    pub fn new(provider: PaymentProvider) -> Self {
        Self {
            provider,
            fail: false,
            created: Mutex::new(Vec::new()),
            owners: Mutex::new(HashMap::new()),
            captured: Mutex::new(Vec::new()),
            refunded: Mutex::new(Vec::new()),
        }
    }

    /// Registers an existing payment created by `owner`.
    pub fn with_payment(self, payment_id: &str, owner: i64) -> Self {
        self.owners
            .lock()
            .unwrap()
            .insert(payment_id.to_string(), owner);
        self
    }

    pub fn failing(provider: PaymentProvider) -> Self {
        Self {
            fail: true,
            ..Self::new(provider)
        }
    }

    fn check(&self) -> Result<(), PaymentError> {
        if self.fail {
            return Err(PaymentError::new(self.provider, "HTTP 402 card_declined"));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProcessor for FakePaymentProcessor {
    fn provider(&self) -> PaymentProvider {
        self.provider
    }

    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentIntent, PaymentError> {
        self.check()?;
        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        let id = format!("{}_pay_{}", self.provider, created.len());
        self.owners
            .lock()
            .unwrap()
            .insert(id.clone(), request.user_id);

        Ok(PaymentIntent {
            provider: self.provider,
            id,
            status: PaymentStatus::RequiresAction,
            amount_cents: Some(request.amount_cents),
            currency: Some(request.currency.clone()),
            client_action: Some("secret_or_link".to_string()),
            capture_id: None,
        })
    }

    async fn capture(&self, payment_id: &str) -> Result<PaymentIntent, PaymentError> {
        self.check()?;
        self.captured.lock().unwrap().push(payment_id.to_string());

        Ok(PaymentIntent {
            provider: self.provider,
            id: payment_id.to_string(),
            status: PaymentStatus::Succeeded,
            amount_cents: None,
            currency: None,
            client_action: None,
            capture_id: Some(format!("{payment_id}_capture")),
        })
    }

    async fn refund(
        &self,
        payment_id: &str,
        request: &RefundRequest,
    ) -> Result<Refund, PaymentError> {
        self.check()?;
        self.refunded.lock().unwrap().push(payment_id.to_string());

        Ok(Refund {
            provider: self.provider,
            id: format!("{payment_id}_refund"),
            status: "succeeded".to_string(),
            amount_cents: request.amount_cents,
        })
    }

    async fn payment_owner(&self, payment_id: &str) -> Result<Option<i64>, PaymentError> {
        self.check()?;
        Ok(self.owners.lock().unwrap().get(payment_id).copied())
    }

    /// Captures are named `{payment_id}_capture`.
    async fn refund_owner(&self, payment_id: &str) -> Result<Option<i64>, PaymentError> {
        let payment_id = payment_id.strip_suffix("_capture").unwrap_or(payment_id);
        self.payment_owner(payment_id).await
    }
}

/// Counter store whose backend is always down.
pub struct UnavailableRateLimitStore;

#[async_trait]
impl RateLimitStore for UnavailableRateLimitStore {
    async fn hit(&self, _key: &str, _window_secs: u64) -> Result<WindowCount, RateLimitError> {
        Err(RateLimitError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

// ─── Application ────────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub properties: Arc<InMemoryProperties>,
    pub sessions: Arc<InMemorySessions>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder::default()
    }

    /// Issues a token pair for `user_id` through the real auth service.
    pub async fn issue_tokens(&self, user_id: i64, role: Role) -> IssuedTokens {
        self.sessions.set_role(user_id, role);
        self.state.auth_service.issue_tokens(user_id).await.unwrap()
    }

    /// `Authorization` header value for a fresh session of `user_id`.
    pub async fn bearer(&self, user_id: i64, role: Role) -> String {
        let tokens = self.issue_tokens(user_id, role).await;
        format!("Bearer {}", tokens.access_token)
    }

    /// Inserts a listing straight into the repository.
    pub async fn seed_property(&self, owner_id: i64, city: &str, asking_price: i64) -> Property {
        self.properties
            .create(NewProperty {
                owner_id,
                title: format!("Woning in {city}"),
                street: "Kerkstraat".to_string(),
                house_number: "1".to_string(),
                postal_code: "1017 GA".to_string(),
                city: city.to_string(),
                asking_price,
                living_area_m2: 100,
                rooms: 4,
                property_type: PropertyType::Terraced,
                energy_label: None,
                woz_value: None,
            })
            .await
            .unwrap()
    }
}

pub struct TestAppBuilder {
    statistics: Arc<dyn RegionalStatisticsSource>,
    payment_processors: Vec<Arc<dyn PaymentProcessor>>,
    rate_limit_store: Arc<dyn RateLimitStore>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            statistics: Arc::new(FakeStatistics::with_regions(Vec::new())),
            payment_processors: Vec::new(),
            rate_limit_store: Arc::new(MemoryRateLimitStore::new()),
        }
    }
}

impl TestAppBuilder {
    pub fn statistics(mut self, statistics: FakeStatistics) -> Self {
        self.statistics = Arc::new(statistics);
        self
    }

    pub fn payment_processor(mut self, processor: Arc<dyn PaymentProcessor>) -> Self {
        self.payment_processors.push(processor);
        self
    }

    pub fn rate_limit_store(mut self, store: Arc<dyn RateLimitStore>) -> Self {
        self.rate_limit_store = store;
        self
    }

    pub fn build(self) -> TestApp {
        let properties = Arc::new(InMemoryProperties::default());
        let sessions = Arc::new(InMemorySessions::default());

        let state = AppState::new(
            Repositories {
                properties: properties.clone(),
                energy_projects: Arc::new(InMemoryEnergyProjects::default()),
                valuations: Arc::new(InMemoryValuations::default()),
                sessions: sessions.clone(),
            },
            Integrations {
                statistics: self.statistics,
                payment_processors: self.payment_processors,
                rate_limit_store: self.rate_limit_store,
            },
            SessionSettings {
                signing_secret: SIGNING_SECRET.to_string(),
                access_token_ttl_seconds: 900,
            },
            false,
        );

        let server = TestServer::new(api_router(state.clone())).unwrap();

        TestApp {
            server,
            state,
            properties,
            sessions,
        }
    }
}

pub fn test_app() -> TestApp {
    TestApp::builder().build()
}

// ─── Payloads ───────────────────────────────────────────────────────────────

pub fn property_payload() -> Value {
    json!({
        "title": "Ruim appartement aan de gracht",
        "street": "Prinsengracht",
        "house_number": "263",
        "postal_code": "1016gv",
        "city": "Amsterdam",
        "asking_price": 650000,
        "living_area_m2": 95,
        "rooms": 3,
        "property_type": "apartment",
        "energy_label": "B"
    })
}

/// Field names listed in a validation error body.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["error"]["details"]["fields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
