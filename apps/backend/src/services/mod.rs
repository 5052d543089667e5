pub mod clock;
pub mod coordinator;
pub mod registry;
pub mod session;
pub mod sync_gateway;

pub use clock::spawn_clock;
pub use coordinator::{FrameOutcome, GroupCreated, SessionCoordinator, SessionSummary};
