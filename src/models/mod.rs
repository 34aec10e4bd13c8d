mod asset;
mod index;
mod observation;
pub mod snapshot;
pub mod update_mode;

pub use asset::{AssetEntry, AssetTable};
pub use index::SnapshotIndex;
pub use observation::Observation;
pub use snapshot::{SeriesPoint, Snapshot};
pub use update_mode::{decide_update_mode, FullReason, PriorSnapshot, UpdateMode};
