//! In-memory collaborators for engine tests
//!
//! Both fakes append to a shared call log so tests can assert on the order
//! of remote calls across services.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use match_engine::collaborator::{CollaboratorError, NeedsDirectory, OfferCatalog};
use match_engine::{EngineConfig, MatchEngine};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use types::collaborator::{
    DeliveryReceipt, DeliveryRequest, DeliveryStatus, FulfillReceipt, FulfillStatus,
};
use types::ids::{NeedId, Sku};
use types::need::{Need, NeedStatus};
use types::offer::Offer;

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn need(id: &str, what: &str, max_price: Option<&str>) -> Need {
    let need = Need::new(NeedId::try_new(id).unwrap(), what);
    match max_price {
        Some(p) => need.with_max_price(dec(p)),
        None => need,
    }
}

pub fn offer(sku: &str, name: &str, price: Option<&str>) -> Offer {
    let offer = Offer::new(Sku::try_new(sku).unwrap(), name);
    match price {
        Some(p) => offer.with_price(dec(p)),
        None => offer,
    }
}

pub struct FakeNeeds {
    log: CallLog,
    list: Mutex<Result<Vec<Need>, CollaboratorError>>,
    fulfill: Mutex<HashMap<String, Result<FulfillReceipt, CollaboratorError>>>,
    fulfill_delay: Mutex<Option<Duration>>,
    cancel_on_fulfill: Mutex<Option<CancellationToken>>,
    pub list_calls: Mutex<Vec<Option<NeedStatus>>>,
}

impl FakeNeeds {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            list: Mutex::new(Ok(Vec::new())),
            fulfill: Mutex::new(HashMap::new()),
            fulfill_delay: Mutex::new(None),
            cancel_on_fulfill: Mutex::new(None),
            list_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_needs(&self, needs: Vec<Need>) {
        *self.list.lock().unwrap() = Ok(needs);
    }

    pub fn fail_list(&self, err: CollaboratorError) {
        *self.list.lock().unwrap() = Err(err);
    }

    pub fn reply_to_fulfill(&self, need_id: &str, reply: Result<FulfillReceipt, CollaboratorError>) {
        self.fulfill.lock().unwrap().insert(need_id.to_string(), reply);
    }

    pub fn delay_fulfill(&self, delay: Duration) {
        *self.fulfill_delay.lock().unwrap() = Some(delay);
    }

    /// Cancel `token` while the next fulfill call is in flight
    pub fn cancel_during_fulfill(&self, token: CancellationToken) {
        *self.cancel_on_fulfill.lock().unwrap() = Some(token);
    }
}

#[async_trait]
impl NeedsDirectory for FakeNeeds {
    async fn list_needs(&self, status: Option<NeedStatus>) -> Result<Vec<Need>, CollaboratorError> {
        self.list_calls.lock().unwrap().push(status);
        self.log.lock().unwrap().push("need_list".to_string());
        self.list.lock().unwrap().clone()
    }

    async fn fulfill_need(&self, need_id: &NeedId) -> Result<FulfillReceipt, CollaboratorError> {
        self.log.lock().unwrap().push(format!("need_fulfill:{need_id}"));
        if let Some(token) = self.cancel_on_fulfill.lock().unwrap().take() {
            token.cancel();
        }
        let delay = *self.fulfill_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.fulfill
            .lock()
            .unwrap()
            .get(need_id.as_str())
            .cloned()
            .unwrap_or(Ok(FulfillReceipt { status: FulfillStatus::Fulfilled }))
    }
}

pub struct FakeOffers {
    log: CallLog,
    list: Mutex<Result<Vec<Offer>, CollaboratorError>>,
    deliver: Mutex<HashMap<String, Result<DeliveryReceipt, CollaboratorError>>>,
    pub deliveries: Mutex<Vec<DeliveryRequest>>,
}

impl FakeOffers {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            list: Mutex::new(Ok(Vec::new())),
            deliver: Mutex::new(HashMap::new()),
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn set_offers(&self, offers: Vec<Offer>) {
        *self.list.lock().unwrap() = Ok(offers);
    }

    pub fn fail_list(&self, err: CollaboratorError) {
        *self.list.lock().unwrap() = Err(err);
    }

    /// Answer the next list calls with an already decoded reply
    pub fn reply_to_list(&self, reply: Result<Vec<Offer>, CollaboratorError>) {
        *self.list.lock().unwrap() = reply;
    }

    pub fn reply_to_deliver(&self, sku: &str, reply: Result<DeliveryReceipt, CollaboratorError>) {
        self.deliver.lock().unwrap().insert(sku.to_string(), reply);
    }
}

#[async_trait]
impl OfferCatalog for FakeOffers {
    async fn list_offers(&self) -> Result<Vec<Offer>, CollaboratorError> {
        self.log.lock().unwrap().push("offer_list".to_string());
        self.list.lock().unwrap().clone()
    }

    async fn deliver_offer(&self, request: &DeliveryRequest) -> Result<DeliveryReceipt, CollaboratorError> {
        self.log.lock().unwrap().push(format!("supply_deliver:{}", request.sku));
        self.deliveries.lock().unwrap().push(request.clone());
        self.deliver
            .lock()
            .unwrap()
            .get(request.sku.as_str())
            .cloned()
            .unwrap_or(Ok(DeliveryReceipt {
                status: DeliveryStatus::Delivered,
                remaining_stock: None,
            }))
    }
}

/// Fakes plus an engine wired to them
pub struct Harness {
    pub log: CallLog,
    pub needs: Arc<FakeNeeds>,
    pub offers: Arc<FakeOffers>,
    pub engine: MatchEngine,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        init_tracing();
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let needs = Arc::new(FakeNeeds::new(Arc::clone(&log)));
        let offers = Arc::new(FakeOffers::new(Arc::clone(&log)));
        let engine = MatchEngine::new(config, needs.clone(), offers.clone());
        Self { log, needs, offers, engine }
    }

    /// Remote side-effect calls issued so far, in order
    pub fn side_effects(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with("need_fulfill") || c.starts_with("supply_deliver"))
            .cloned()
            .collect()
    }
}
