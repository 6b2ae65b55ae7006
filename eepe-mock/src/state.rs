use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::scenario::Scenario;

#[derive(Debug, Default)]
pub struct Counters {
    pub logins: AtomicUsize,
    pub tokens: AtomicUsize,
    pub checks: AtomicUsize,
    pub telemetry: AtomicUsize,
}

impl Counters {
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> usize {
        self.tokens.load(Ordering::SeqCst)
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn telemetry(&self) -> usize {
        self.telemetry.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct MockState {
    pub scenario: Arc<RwLock<Scenario>>,
    pub counters: Arc<Counters>,
    issued_tokens: Arc<RwLock<Vec<String>>>,
}

impl MockState {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario: Arc::new(RwLock::new(scenario)),
            counters: Arc::new(Counters::default()),
            issued_tokens: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Changes the scenario for every later request.
    pub async fn update<F: FnOnce(&mut Scenario)>(&self, change: F) {
        change(&mut *self.scenario.write().await);
    }

    pub async fn record_token(&self, token: String) {
        self.issued_tokens.write().await.push(token);
    }

    pub async fn is_issued(&self, token: &str) -> bool {
        self.issued_tokens.read().await.iter().any(|issued| issued == token)
    }
}
