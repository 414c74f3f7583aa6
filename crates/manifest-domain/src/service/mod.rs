//! Domain services

pub mod chooser;
pub mod merge;
pub mod rollover;
pub mod shift_save;
pub mod summary;

pub use chooser::{ChooserState, StatusChooser};
pub use merge::{merge_shift, MergedRow};
pub use rollover::{check_rollover, RolloverOutcome};
pub use shift_save::{build_records, save_shift, RowInput, ShiftDraft};
pub use summary::{project_summary, SummaryRow};
