pub mod bus;
pub mod classify;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod render;
pub mod snapshot;
pub mod stats;
pub mod test_utils;
pub mod timer;
pub mod tui;
pub mod view;

pub use bus::{ObserverBus, ObserverId, PollCycle, StatusObserver};
pub use classify::{classify, UiState};
pub use error::{BuildwatchError, Result};
pub use render::{MemorySurface, RenderSurface};
pub use snapshot::{BuildingInfo, CurrentStatus, PreviousResult, ProjectSnapshot, StatusResponse};
pub use stats::{aggregate, StatusSummary};
pub use timer::{BuildTimer, TimerRegistry};
