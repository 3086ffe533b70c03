//! Wires the store, ledger, recorder, registry and name store into one
//! handle shared by the chat loop and the CLI commands.

use anyhow::Result;
use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::conversation::{ChatSettings, ConversationController};
use crate::mood::MoodLedger;
use crate::profile::{NameStore, StoredNameStore};
use crate::sessions::{SessionRecorder, SessionRegistry};
use crate::store::{create_store, Collections, CollectionStore, InMemoryCollectionStore};

pub struct Engine {
    pub collections: Arc<Collections>,
    pub ledger: Arc<MoodLedger>,
    pub recorder: Arc<SessionRecorder>,
    pub registry: SessionRegistry,
    pub names: Arc<dyn NameStore>,
}

impl Engine {
    /// Open the configured store and hydrate the mood ledger from it.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = create_store(&config.storage, &config.data_dir)?;
        tracing::info!(
            backend = store.name(),
            dir = %config.data_dir.display(),
            "Store opened"
        );
        Ok(Self::with_store(store).await)
    }

    /// Engine over a fresh in-memory store.
    pub async fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryCollectionStore::new())).await
    }

    pub async fn with_store(store: Arc<dyn CollectionStore>) -> Self {
        let collections = Arc::new(Collections::new(Arc::clone(&store)));
        let ledger = Arc::new(MoodLedger::hydrate(Arc::clone(&collections)).await);
        Self {
            recorder: Arc::new(SessionRecorder::new(Arc::clone(&collections))),
            registry: SessionRegistry::new(Arc::clone(&collections)),
            names: Arc::new(StoredNameStore::new(store)),
            ledger,
            collections,
        }
    }

    /// Build a conversation controller sharing this engine's state.
    pub fn controller(
        &self,
        classifier: Arc<dyn Classifier>,
        settings: ChatSettings,
    ) -> ConversationController {
        ConversationController::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.recorder),
            classifier,
            Arc::clone(&self.names),
            settings,
        )
    }
}
