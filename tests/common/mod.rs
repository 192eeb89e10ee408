//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use tablechat::dataset::loader::read_csv;
use tablechat::error::{TranslationError, TranslationResult};
use tablechat::translate::{ChatMessage, TranslationBackend};
use tablechat::{Dataset, TableSchema};

pub const PROPERTIES: &str = "\
Location,Construction,FloodRisk,SumInsured,YearBuilt
London,Timber Frame,High,500000,1990
London,Timber Frame,Low,320000,1985
London,Masonry,High,910000,1899
Glasgow,Timber Frame,High,275000,2003
London,Timber Frame,High,640000,2012
Leeds,Steel Frame,Medium,1200000,1978
Bristol,Reinforced Concrete,Very High,2100000,1969
Glasgow,Masonry,Low,180000,1931
";

/// The property schedule used across tests
pub fn properties() -> Dataset {
    read_csv(PROPERTIES.as_bytes(), &TableSchema::property_schedule()).unwrap()
}

/// Backend that replays queued replies and records what it was sent
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<TranslationResult<String>>>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: TranslationError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }
}

#[async_trait]
impl TranslationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, messages: &[ChatMessage]) -> TranslationResult<String> {
        self.requests.lock().push(messages.to_vec());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or(Err(TranslationError::EmptyResponse))
    }
}
