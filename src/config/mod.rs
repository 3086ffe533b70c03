pub mod schema;

pub use schema::{ChatConfig, ClassifierConfig, Config, StorageConfig};
