//! Hierarchical (map-then-reduce) summarization of long chats.
//!
//! A run moves through explicit stages:
//!
//! ```text
//! Splitting ─┬─ 1 group ──► DirectSummarize ─────────────────► Done
//!            └─ N groups ─► GroupSummarize ─► Consolidate ───► Done
//! ```
//!
//! Any generation failure ends the run with an error tagged with the stage
//! (and group index) where it happened. Nothing partial is ever returned.

use futures::{StreamExt, TryStreamExt, stream};
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::ai::{Generator, TokenCounter};
use crate::chunker::{Group, chunk_messages};
use crate::core::config::AppConfig;
use crate::errors::{GenerateError, SummarizeError};
use crate::prompt::{Phase, build_prompt};

/// Separator placed between partial summaries before consolidation.
pub const PARTIAL_JOINER: &str = "\n";

/// Per-call knobs. `None`, zero and empty values select the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    pub model: Option<String>,
    pub token_budget: Option<usize>,
    pub word_limit: Option<usize>,
}

/// Result of one pipeline run.
///
/// `partials` is empty when the whole chat fit into a single group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub partials: Vec<String>,
    pub summary: String,
}

impl SummaryOutcome {
    /// Partial summaries in chat order, followed by the final summary.
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        let mut list = self.partials;
        list.push(self.summary);
        list
    }
}

/// How passage summaries are issued when a chat spans several groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSchedule {
    /// One call at a time, in chat order.
    Sequential,
    /// Up to `limit` calls in flight; results are reassembled in chat order.
    Concurrent { limit: NonZeroUsize },
}

impl GroupSchedule {
    #[must_use]
    pub fn from_concurrency(concurrency: usize) -> Self {
        match NonZeroUsize::new(concurrency) {
            Some(limit) if limit.get() > 1 => GroupSchedule::Concurrent { limit },
            _ => GroupSchedule::Sequential,
        }
    }
}

#[derive(Debug)]
struct ResolvedOptions {
    model: String,
    token_budget: usize,
    word_limit: usize,
}

enum Stage<'a> {
    Splitting,
    DirectSummarize(Group<'a>),
    GroupSummarize(Vec<Group<'a>>),
    Consolidate(Vec<String>),
    Done(SummaryOutcome),
}

pub struct SummarizationPipeline<G, C> {
    generator: G,
    counter: C,
    config: AppConfig,
    schedule: GroupSchedule,
}

impl<G, C> SummarizationPipeline<G, C>
where
    G: Generator,
    C: TokenCounter,
{
    #[must_use]
    pub fn new(generator: G, counter: C, config: AppConfig) -> Self {
        let schedule = GroupSchedule::from_concurrency(config.group_concurrency);
        Self {
            generator,
            counter,
            config,
            schedule,
        }
    }

    #[must_use]
    pub fn with_schedule(mut self, schedule: GroupSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    #[must_use]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn resolve(&self, options: &SummaryOptions) -> ResolvedOptions {
        ResolvedOptions {
            model: options
                .model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(self.config.default_model.as_str())
                .to_string(),
            token_budget: options
                .token_budget
                .filter(|b| *b > 0)
                .unwrap_or(self.config.default_token_budget),
            word_limit: options
                .word_limit
                .filter(|w| *w > 0)
                .unwrap_or(self.config.default_word_limit),
        }
    }

    /// Summarizes `messages` (rendered chat lines, in chronological order).
    ///
    /// # Errors
    ///
    /// - [`SummarizeError::InvalidInput`] if `messages` is empty.
    /// - [`SummarizeError::GroupSummaryFailed`] if a passage summary fails;
    ///   no later groups are summarized and no consolidation happens.
    /// - [`SummarizeError::ConsolidationFailed`] if the final call fails.
    pub async fn summarize<S>(
        &self,
        messages: &[S],
        options: &SummaryOptions,
    ) -> Result<SummaryOutcome, SummarizeError>
    where
        S: AsRef<str>,
    {
        let options = self.resolve(options);
        let mut stage = Stage::Splitting;

        loop {
            stage = match stage {
                Stage::Splitting => {
                    let mut groups = chunk_messages(messages, options.token_budget, &self.counter);
                    info!(
                        messages = messages.len(),
                        groups = groups.len(),
                        budget = options.token_budget,
                        model = %options.model,
                        "Split chat into groups"
                    );
                    match groups.len() {
                        0 => {
                            return Err(SummarizeError::InvalidInput(
                                "no messages to summarize".to_string(),
                            ));
                        }
                        1 => Stage::DirectSummarize(groups.swap_remove(0)),
                        _ => Stage::GroupSummarize(groups),
                    }
                }
                Stage::DirectSummarize(group) => {
                    let prompt =
                        build_prompt(Phase::Consolidate, &group.joined_text(), options.word_limit);
                    let summary = self
                        .call(&options.model, &prompt)
                        .await
                        .map_err(|source| {
                            error!(error = %source, "Direct summary failed");
                            SummarizeError::ConsolidationFailed { source }
                        })?;
                    Stage::Done(SummaryOutcome {
                        partials: Vec::new(),
                        summary,
                    })
                }
                Stage::GroupSummarize(groups) => {
                    let partials = self.summarize_groups(&options, &groups).await?;
                    Stage::Consolidate(partials)
                }
                Stage::Consolidate(partials) => {
                    info!(partials = partials.len(), "Consolidating partial summaries");
                    let combined = partials.join(PARTIAL_JOINER);
                    let prompt = build_prompt(Phase::Consolidate, &combined, options.word_limit);
                    let summary = self
                        .call(&options.model, &prompt)
                        .await
                        .map_err(|source| {
                            error!(error = %source, "Consolidation failed");
                            SummarizeError::ConsolidationFailed { source }
                        })?;
                    Stage::Done(SummaryOutcome { partials, summary })
                }
                Stage::Done(outcome) => {
                    info!(outputs = outcome.partials.len() + 1, "Summary complete");
                    return Ok(outcome);
                }
            };
        }
    }

    async fn summarize_groups(
        &self,
        options: &ResolvedOptions,
        groups: &[Group<'_>],
    ) -> Result<Vec<String>, SummarizeError> {
        let model = options.model.as_str();

        match self.schedule {
            GroupSchedule::Sequential => {
                let mut partials = Vec::with_capacity(groups.len());
                for (index, group) in groups.iter().enumerate() {
                    partials.push(self.summarize_group(model, index, group).await?);
                }
                Ok(partials)
            }
            GroupSchedule::Concurrent { limit } => {
                stream::iter(groups.iter().enumerate())
                    .map(|(index, group)| self.summarize_group(model, index, group))
                    .buffered(limit.get())
                    .try_collect()
                    .await
            }
        }
    }

    async fn summarize_group(
        &self,
        model: &str,
        index: usize,
        group: &Group<'_>,
    ) -> Result<String, SummarizeError> {
        debug!(index, messages = group.len(), tokens = group.tokens(), "Summarizing group");
        let prompt = build_prompt(Phase::Passage, &group.joined_text(), 0);
        self.call(model, &prompt).await.map_err(|source| {
            error!(index, error = %source, "Group summary failed");
            SummarizeError::GroupSummaryFailed { index, source }
        })
    }

    async fn call(&self, model: &str, prompt: &str) -> Result<String, GenerateError> {
        match self.config.request_timeout {
            Some(deadline) => tokio::time::timeout(deadline, self.generator.generate(model, prompt))
                .await
                .map_err(|_| deadline_exceeded(deadline))?,
            None => self.generator.generate(model, prompt).await,
        }
    }
}

fn deadline_exceeded(deadline: Duration) -> GenerateError {
    GenerateError::Unavailable(format!("no response within {deadline:?}"))
}
