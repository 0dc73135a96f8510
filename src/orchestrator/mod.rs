pub mod executor;
pub mod plan;


pub use plan::{plan_fully_parallel, plan_hybrid, WorkUnit};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::agents::extraction::ExtractionAgent;
use crate::agents::factory::AgentSessionFactory;
use crate::aggregate::{dedupe_by_url, merge};
use crate::config::ExtractorConfig;
use crate::error::{ExtractionError, Result};
use crate::extractor::{PageExtractor, SearchResultRecord, PAGE_SIZE};
use crate::orchestrator::executor::{all_or_first_error, run_all_settled};
use crate::query::EncodedQuery;

/// How work is partitioned across sessions, selected by the two
/// concurrency flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// An independent session for every page of every question. Fastest;
    /// no context carries over between pages.
    FullyParallel,
    /// One session per question, reused across that question's pages;
    /// questions run concurrently with each other.
    Hybrid,
    /// A single session serves the entire batch in input order.
    Sequential,
}

impl ExecutionMode {
    pub fn from_flags(parallel_questions: bool, parallel_pages: bool) -> Self {
        if parallel_questions && parallel_pages {
            ExecutionMode::FullyParallel
        } else if parallel_questions {
            ExecutionMode::Hybrid
        } else {
            ExecutionMode::Sequential
        }
    }
}

/// Options for one extraction call. Defaults to two pages per question,
/// fully parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub max_pages: u32,
    pub parallel_questions: bool,
    pub parallel_pages: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            max_pages: 2,
            parallel_questions: true,
            parallel_pages: true,
        }
    }
}

/// Drives the extraction agent over a batch of questions and merges every
/// unit's output into one deduplicated result set.
pub struct SerpExtractor {
    factory: AgentSessionFactory,
    extractor: PageExtractor,
    config: ExtractorConfig,
}

impl SerpExtractor {
    pub fn new(agent: Arc<dyn ExtractionAgent>, config: ExtractorConfig) -> Result<Self> {
        config.validate()?;

        let factory = AgentSessionFactory::new(
            agent.clone(),
            config.agent.clone(),
            config.timeouts.clone(),
        )?;
        let extractor = PageExtractor::new(
            agent,
            config.agent.root_url.clone(),
            config.timeouts.clone(),
        );

        Ok(Self {
            factory,
            extractor,
            config,
        })
    }

    pub async fn extract_search_results(
        &self,
        questions: &[String],
        options: &ExtractionOptions,
    ) -> Result<Vec<SearchResultRecord>> {
        self.extract_search_results_with_cancel(questions, options, CancellationToken::new())
            .await
    }

    pub async fn extract_search_results_with_cancel(
        &self,
        questions: &[String],
        options: &ExtractionOptions,
        cancel: CancellationToken,
    ) -> Result<Vec<SearchResultRecord>> {
        if questions.is_empty() {
            return Err(ExtractionError::InvalidInput(
                "no questions provided".to_string(),
            ));
        }
        if options.max_pages == 0 {
            return Err(ExtractionError::InvalidInput(
                "max_pages must be at least 1".to_string(),
            ));
        }

        let mode = ExecutionMode::from_flags(options.parallel_questions, options.parallel_pages);
        info!(
            "Extracting {} questions, {} pages each, mode {:?}",
            questions.len(),
            options.max_pages,
            mode
        );

        let unit_outputs = match mode {
            ExecutionMode::FullyParallel => {
                let units = plan_fully_parallel(questions, options.max_pages);
                self.run_parallel(units, &cancel).await?
            }
            ExecutionMode::Hybrid => {
                let units = plan_hybrid(questions, options.max_pages);
                self.run_parallel(units, &cancel).await?
            }
            ExecutionMode::Sequential => {
                self.run_sequential(questions, options.max_pages, &cancel)
                    .await?
            }
        };

        let merged = merge(unit_outputs);
        debug!("Merged {} records before dedup", merged.len());
        Ok(dedupe_by_url(merged))
    }

    /// Runs every unit under the bounded pool and joins all of them. The
    /// first error in launch order surfaces only after every unit has
    /// settled, so an early abort never orphans a session.
    async fn run_parallel(
        &self,
        units: Vec<WorkUnit>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<SearchResultRecord>>> {
        let outcomes = run_all_settled(
            units,
            self.config.concurrency.max_concurrent_sessions,
            |unit| self.run_unit(unit, cancel.clone()),
        )
        .await;

        all_or_first_error(outcomes)
    }

    /// One unit: acquire a session, loop the extractor over the unit's
    /// offsets, release the session on every exit path.
    async fn run_unit(
        &self,
        unit: WorkUnit,
        cancel: CancellationToken,
    ) -> Result<Vec<SearchResultRecord>> {
        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }

        let query = EncodedQuery::encode(&unit.question);
        let extractor = &self.extractor;

        self.factory
            .with_session(move |session| async move {
                let mut unit_results = Vec::new();
                for offset in unit.offsets() {
                    let records = extractor
                        .extract_page(session, &query, offset, &cancel)
                        .await?;
                    unit_results.extend(records);
                }
                Ok(unit_results)
            })
            .await
    }

    /// A single session serves the whole batch. The running offset advances
    /// by PAGE_SIZE on every extraction and, unless
    /// `reset_sequential_offsets` is set, never resets between questions:
    /// question N+1 starts paginating where question N stopped. Fails fast
    /// on the first error.
    async fn run_sequential(
        &self,
        questions: &[String],
        max_pages: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<SearchResultRecord>>> {
        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }

        let reset_offsets = self.config.reset_sequential_offsets;
        let extractor = &self.extractor;

        self.factory
            .with_session(move |session| async move {
                let mut offset = 0u32;
                let mut outputs = Vec::with_capacity(questions.len());

                for question in questions {
                    if reset_offsets {
                        offset = 0;
                    }
                    let query = EncodedQuery::encode(question);
                    let mut question_results = Vec::new();

                    for _ in 0..max_pages {
                        let records = extractor
                            .extract_page(session, &query, offset, cancel)
                            .await?;
                        question_results.extend(records);
                        offset += PAGE_SIZE;
                    }

                    outputs.push(question_results);
                }

                Ok(outputs)
            })
            .await
    }
}
