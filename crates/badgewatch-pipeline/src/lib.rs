pub mod batch;
pub mod coordinator;
pub mod error;
pub mod source;
pub mod store;

pub use batch::run_batches;
pub use coordinator::{PollOutcome, RunCoordinator, RunSettings, TriggerOutcome};
pub use error::PipelineError;
pub use source::{parse_catalogue, CatalogueRow};
pub use store::{FileStore, JsonFileResultStore, LocalFileStore, ResultStore, StoreError};
