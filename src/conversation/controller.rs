//! One request cycle: utterance in, filtered view and reply out
//!
//! Each cycle filters the base dataset, never the previous view. A cycle
//! either updates the view and appends a summary, or leaves the view alone
//! and appends an error message; exactly one assistant message either way.
//! `submit` takes `&mut self`, so cycles on one controller are serialized.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{ConversationLog, ConversationMessage};
use crate::config::AppConfig;
use crate::dataset::{Dataset, TableSchema};
use crate::error::{CycleError, TranslationResult};
use crate::filter::{FilterSpec, apply_filter, parse_filter_spec};
use crate::reactive::{CellReader, ReactiveCell};
use crate::translate::{BackendConfig, ChatCompletionsClient, PromptBuilder, TranslationBackend};

/// Summary used when nothing narrows the view
pub const SHOW_ALL_SUMMARY: &str = "Showing all data.";

/// What a cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The view was replaced
    Applied {
        /// Filter decoded from the reply
        filter: FilterSpec,
        /// Rows in the new view
        rows: usize,
        /// Assistant message appended
        summary: String,
    },
    /// The view was left untouched
    Failed {
        /// Assistant message appended
        message: String,
    },
}

/// Owns the conversation log and the filtered view for one session
pub struct ConversationController {
    session: Uuid,
    base: Arc<Dataset>,
    prompt: PromptBuilder,
    backend: Arc<dyn TranslationBackend>,
    log: ConversationLog,
    view: ReactiveCell<Dataset>,
    active_filter: FilterSpec,
}

impl ConversationController {
    /// Create a controller whose view starts as the full base dataset
    pub fn new(
        base: Arc<Dataset>,
        schema: &TableSchema,
        backend: Arc<dyn TranslationBackend>,
        greeting: impl Into<String>,
    ) -> Self {
        let session = Uuid::new_v4();
        tracing::info!(%session, backend = backend.name(), rows = base.len(), "Session started");
        Self {
            session,
            view: ReactiveCell::from_arc(Arc::clone(&base)),
            base,
            prompt: PromptBuilder::new(schema),
            backend,
            log: ConversationLog::seeded(greeting),
            active_filter: FilterSpec::new(),
        }
    }

    /// Create a controller talking to the backend preset named in `config`
    pub fn from_config(
        base: Arc<Dataset>,
        schema: &TableSchema,
        config: &AppConfig,
    ) -> TranslationResult<Self> {
        let backend = ChatCompletionsClient::new(
            BackendConfig::from_env(config.backend),
            config.temperature,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(
            base,
            schema,
            Arc::new(backend),
            config.greeting.clone(),
        ))
    }

    /// Run one request cycle for `utterance`
    pub async fn submit(&mut self, utterance: &str) -> CycleOutcome {
        tracing::info!(session = %self.session, utterance, "User message received");
        self.log.append_user(utterance);

        match self.translate(utterance).await {
            Ok(filter) => {
                let view = apply_filter(&self.base, &filter);
                let unknown = filter.unknown_columns(&self.base);
                if !unknown.is_empty() {
                    tracing::debug!(session = %self.session, ?unknown, "Ignoring unknown filter columns");
                }
                let summary = summarize(&self.base, &filter);
                let rows = view.len();
                tracing::info!(session = %self.session, rows, filters = filter.len(), "Filter applied");

                self.view.set(view);
                self.log.append_assistant(summary.clone());
                self.active_filter = filter.clone();
                CycleOutcome::Applied {
                    filter,
                    rows,
                    summary,
                }
            }
            Err(err) => {
                tracing::warn!(session = %self.session, error = %err, "Cycle failed");
                let message = format!("Error: {err}");
                self.log.append_assistant(message.clone());
                CycleOutcome::Failed { message }
            }
        }
    }

    async fn translate(&self, utterance: &str) -> Result<FilterSpec, CycleError> {
        let messages = self.prompt.build(utterance);
        tracing::debug!(session = %self.session, backend = self.backend.name(), "Calling backend");
        let reply = self.backend.send(&messages).await?;
        Ok(parse_filter_spec(&reply)?)
    }

    /// Session identifier
    pub fn session(&self) -> Uuid {
        self.session
    }

    /// The unfiltered dataset
    pub fn base(&self) -> &Arc<Dataset> {
        &self.base
    }

    /// Read handle to the filtered view
    pub fn view(&self) -> CellReader<Dataset> {
        self.view.reader()
    }

    /// Filter behind the current view
    pub fn active_filter(&self) -> &FilterSpec {
        &self.active_filter
    }

    /// Conversation so far, oldest first
    pub fn messages(&self) -> &[ConversationMessage] {
        self.log.messages()
    }

    /// The conversation log
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }
}

/// Human-readable description of the clauses `filter` applies to `base`
pub fn summarize(base: &Dataset, filter: &FilterSpec) -> String {
    let clauses: Vec<String> = filter
        .clauses_for(base)
        .iter()
        .map(ToString::to_string)
        .collect();
    if clauses.is_empty() {
        SHOW_ALL_SUMMARY.to_string()
    } else {
        format!("Applied filters: {}", clauses.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnKind, Row};

    fn base() -> Dataset {
        Dataset::new(
            vec![
                Column::new("Location", ColumnKind::Text),
                Column::new("FloodRisk", ColumnKind::Text),
            ],
            vec![Row::new(vec!["London".into(), "High".into()])],
        )
        .unwrap()
    }

    #[test]
    fn test_summary_lists_clauses_in_order() {
        let filter = FilterSpec::new()
            .with("FloodRisk", "High")
            .with("Location", "London");
        assert_eq!(
            summarize(&base(), &filter),
            "Applied filters: FloodRisk='High', Location='London'"
        );
    }

    #[test]
    fn test_summary_for_empty_or_unknown_only() {
        assert_eq!(summarize(&base(), &FilterSpec::new()), SHOW_ALL_SUMMARY);
        assert_eq!(
            summarize(&base(), &FilterSpec::new().with("Colour", "Red")),
            SHOW_ALL_SUMMARY
        );
    }
}
