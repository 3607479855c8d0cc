//! Background mirroring of Chess.com rating history into the players table.

pub mod archives;
pub mod coordinator;
pub mod freshness;
pub mod player;
pub mod scheduler;

pub use coordinator::{Coordinator, CycleReport, SyncSettings};
pub use player::{sync_player, SyncOutcome};
pub use scheduler::{CycleGuard, SyncScheduler};
