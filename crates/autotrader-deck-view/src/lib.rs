/*
[INPUT]:  Public API exports for the autotrader-deck view-model crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod clock;
pub mod config;
pub mod decode;
pub mod derive;
pub mod error;
pub mod export;
pub mod filter;
pub mod live;
pub mod model;
pub mod orchestrator;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use config::DeckConfig;
pub use derive::{ChartPoint, DerivedCache, TradeExtremes};
pub use error::{ActionError, ExportError, GENERIC_NETWORK_ERROR, GENERIC_REJECTION};
pub use export::{export_file_name, export_trades};
pub use filter::{StatusBucket, TradeFilter};
pub use orchestrator::{BatchKind, BatchTicket, FetchPlan, PullBatch, PullOutcome, run_batch};
pub use session::{DashboardSession, PushFeed, SessionCommand, SessionHandle};
pub use state::{ApplyReport, DashboardState, Slice, SliceSource, SliceUpdate, Slot};
