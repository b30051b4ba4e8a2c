//! The remote operations the search pipeline depends on.

use async_trait::async_trait;
use safecontractor_core::{ContractorDetail, SearchQuery, SearchResultItem};

use crate::ClientError;

/// Search and detail lookups against the contractor service.
///
/// [`SearchClient`](crate::SearchClient) is the HTTP implementation; the
/// session and resolver only see this trait.
#[async_trait]
pub trait ContractorService: Send + Sync {
    /// Run one search. Results come back in service order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>, ClientError>;

    /// Fetch the full record for `contractor_name`.
    ///
    /// An empty record is reported as [`ClientError::NotFound`].
    async fn detail(&self, contractor_name: &str) -> Result<ContractorDetail, ClientError>;
}
