//! Search-and-handoff pipeline: debounced search against the contractor
//! service, and detail resolution via a read-once handoff slot.

mod error;
pub use error::ClientError;

pub mod debounce;
pub mod handoff;
pub mod http;
pub mod resolver;
pub mod service;
pub mod session;

#[cfg(test)]
mod testing;

pub use debounce::Debouncer;
pub use handoff::HandoffStore;
pub use http::SearchClient;
pub use resolver::{DetailResolver, DetailScreen, DetailState};
pub use service::ContractorService;
pub use session::{NavigationTarget, SearchOutcome, SearchSession, SearchSnapshot};
