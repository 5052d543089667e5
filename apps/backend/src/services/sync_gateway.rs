//! Synchronization gateway: one rendering path for both delivery modes.
//!
//! The coordinator publishes after every committed transition (push); the
//! snapshot route renders on demand (pull). Both call [`render`], which reads
//! the group and the heartbeat inside the group's critical section, so a
//! snapshot's `(version, tick)` pair orders it against every other snapshot of
//! the same group.

use crate::domain::{ConnectionId, GroupId, GroupView, SessionPhase, SyncSnapshot};
use crate::errors::domain::DomainError;
use crate::services::registry::GroupCell;
use crate::services::session::Session;

/// Renders one group's snapshot. `phase` is computed by the caller, outside
/// the group lock.
pub fn render(session: &Session, phase: SessionPhase, cell: &GroupCell) -> SyncSnapshot {
    cell.read(|group| {
        let heartbeat = session.heartbeat();
        SyncSnapshot {
            game_phase: phase,
            time_left: heartbeat.time_left,
            tick: heartbeat.tick,
            my_group_state: GroupView::of(group),
        }
    })
}

/// Pull mode. Without a connection the session must hold exactly one group,
/// which is then the implicit group.
pub fn snapshot_for(
    session: &Session,
    connection: Option<ConnectionId>,
) -> Result<SyncSnapshot, DomainError> {
    let cell = match connection {
        Some(connection) => session.registry().group_for(connection).ok_or_else(|| {
            DomainError::not_in_group(format!("connection {connection} has no group"))
        })?,
        None => {
            let mut cells = session.registry().cells();
            if cells.len() != 1 {
                return Err(DomainError::not_in_group(
                    "a connection id is required unless exactly one group exists",
                ));
            }
            cells.remove(0)
        }
    };
    Ok(render(session, session.phase(), &cell))
}

/// Push-side ordering guard kept per socket: a snapshot is delivered only if
/// it is newer than the last one delivered for the same group.
#[derive(Debug, Default)]
pub struct DeliveryMarker {
    last: Option<(GroupId, (u64, u64))>,
}

impl DeliveryMarker {
    pub fn admit(&mut self, snapshot: &SyncSnapshot) -> bool {
        let group = snapshot.group_id();
        let marker = snapshot.marker();
        if let Some((last_group, last_marker)) = self.last {
            if last_group == group && marker <= last_marker {
                return false;
            }
        }
        self.last = Some((group, marker));
        true
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
