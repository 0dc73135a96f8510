pub mod aggregate;
pub mod agents;
pub mod config;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod query;

pub use agents::{AgentSessionFactory, ExtractionAgent, SessionConfig, SessionHandle};
pub use config::{AgentProfile, ConcurrencyConfig, ExtractorConfig, TimeoutConfig};
pub use error::{ExtractionError, Result};
pub use extractor::{PageExtractor, RecordSchema, SearchResultRecord, PAGE_SIZE};
pub use orchestrator::{ExecutionMode, ExtractionOptions, SerpExtractor};
pub use query::EncodedQuery;
