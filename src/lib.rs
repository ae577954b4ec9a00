pub mod distribution;
pub mod group;
pub mod persistence;
pub mod report;
pub mod rounding;
pub mod session;
pub mod split;
pub mod validation;
pub mod wizard;

pub use distribution::{DistributionConfig, auto_distribute};
pub use group::Group;
#[cfg(feature = "sqlite")]
pub use persistence::SqliteStore;
pub use persistence::{
    ConfigSlot, ConfigurationMissing, JsonFileStore, KeyValueStore, MemoryStore,
    PersistenceError, PersistenceResult, STORAGE_KEY, export_report_to_csv, open_store,
};
pub use rounding::{CURRENCY_STEP, RoundingRule, round_up_to_increment};
pub use session::CalculationSession;
pub use split::{
    CalculationMethod, DisplayOrder, SplitReport, SplitResult, SplitSummary, compute_split,
    compute_split_from_input,
};
pub use validation::ValidationError;
pub use wizard::{ConfigWizard, WizardOutcome, WizardStep};
