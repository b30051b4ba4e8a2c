pub mod config;
pub mod contractor;
pub mod query;

pub use config::{ClientConfig, ConfigError};
pub use contractor::{Address, ContractorDetail, ProjectRecord, SearchResultItem};
pub use query::{QueryBuilder, QueryMode, SearchInput, SearchQuery};
