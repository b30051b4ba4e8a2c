//! In-memory `ContractorService` used by the orchestration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use safecontractor_core::{ContractorDetail, SearchQuery, SearchResultItem};

use crate::{ClientError, ContractorService};

enum Canned<T> {
    Ok(T),
    Remote(String),
}

#[derive(Default)]
pub(crate) struct FakeService {
    results: Mutex<HashMap<String, (Canned<Vec<SearchResultItem>>, Duration)>>,
    details: Mutex<HashMap<String, Canned<ContractorDetail>>>,
    search_calls: Mutex<Vec<String>>,
    detail_calls: Mutex<Vec<String>>,
}

impl FakeService {
    pub(crate) fn with_results(self, value: &str, names: &[&str], delay_ms: u64) -> Self {
        let items = names.iter().map(|n| SearchResultItem::named(*n)).collect();
        self.results.lock().unwrap().insert(
            value.to_string(),
            (Canned::Ok(items), Duration::from_millis(delay_ms)),
        );
        self
    }

    pub(crate) fn with_search_error(self, value: &str, message: &str) -> Self {
        self.results.lock().unwrap().insert(
            value.to_string(),
            (Canned::Remote(message.to_string()), Duration::ZERO),
        );
        self
    }

    pub(crate) fn with_detail(self, detail: ContractorDetail) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(detail.name.clone(), Canned::Ok(detail));
        self
    }

    pub(crate) fn with_detail_error(self, name: &str, message: &str) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(name.to_string(), Canned::Remote(message.to_string()));
        self
    }

    /// Values searched for, in call order.
    pub(crate) fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Names fetched, in call order.
    pub(crate) fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContractorService for FakeService {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>, ClientError> {
        self.search_calls
            .lock()
            .unwrap()
            .push(query.value().to_string());

        let (outcome, delay) = match self.results.lock().unwrap().get(query.value()) {
            Some((Canned::Ok(items), delay)) => (Ok(items.clone()), *delay),
            Some((Canned::Remote(msg), delay)) => (Err(msg.clone()), *delay),
            None => (Ok(Vec::new()), Duration::ZERO),
        };
        tokio::time::sleep(delay).await;
        outcome.map_err(ClientError::Remote)
    }

    async fn detail(&self, contractor_name: &str) -> Result<ContractorDetail, ClientError> {
        self.detail_calls
            .lock()
            .unwrap()
            .push(contractor_name.to_string());

        match self.details.lock().unwrap().get(contractor_name) {
            Some(Canned::Ok(detail)) => Ok(detail.clone()),
            Some(Canned::Remote(msg)) => Err(ClientError::Remote(msg.clone())),
            None => Err(ClientError::NotFound),
        }
    }
}
