pub mod batcher;
pub mod calculations;
pub mod catalog;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod history;
pub mod keymap;
pub mod labels;
pub mod logging;
pub mod merge;
pub mod points;
pub mod session;
pub mod settings;
pub mod state;
pub mod validation;

// Re-export commonly used items for easier access
pub use batcher::{CallbackSink, StateSink, SyncEvent, UpdateBatcher};
pub use calculations::{AttributeInputs, DerivedStats, calculate_derived_stats};
pub use catalog::{AttributeBounds, ChargenConstData};
pub use dashboard::DashboardData;
pub use error::{ChargenError, Result};
pub use history::{HistoryEntry, HistoryManager};
pub use labels::describe_change;
pub use session::ChargenSession;
pub use settings::ChargenOptions;
pub use state::{AugmentGrade, AugmentSelection, ChargenState, Contact, Lockable};
pub use validation::{Severity, ValidationIssue, ValidationResult, validate_chargen_state};
