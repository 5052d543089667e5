//! Player & group registry.
//!
//! Groups live in an arena keyed by id, each behind its own mutex so groups
//! progress in parallel. The lobby index (insertion order, connection
//! ownership, `started`) sits behind a separate mutex. Lock order is always
//! index first, then a group; never the reverse.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::domain::{ConnectionId, Group, GroupId, Player};
use crate::errors::domain::{DomainError, ValidationKind};

pub const MAX_NAME_CHARS: usize = 32;

/// One group plus the lock that makes its transitions exclusive.
pub struct GroupCell {
    id: GroupId,
    owner: ConnectionId,
    state: Mutex<Group>,
}

impl GroupCell {
    fn new(group: Group) -> Self {
        Self {
            id: group.id,
            owner: group.owner,
            state: Mutex::new(group),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn owner(&self) -> ConnectionId {
        self.owner
    }

    /// Runs `f` as the group's critical section.
    pub fn transition<T>(
        &self,
        f: impl FnOnce(&mut Group) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut group = self.state.lock();
        f(&mut group)
    }

    pub fn read<T>(&self, f: impl FnOnce(&Group) -> T) -> T {
        let group = self.state.lock();
        f(&group)
    }
}

/// Lobby listing entry, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyEntry {
    pub group_id: GroupId,
    pub names: Vec<String>,
    pub is_host: bool,
}

#[derive(Default)]
struct LobbyIndex {
    order: Vec<GroupId>,
    by_connection: HashMap<ConnectionId, GroupId>,
    started: bool,
}

pub struct GroupRegistry {
    groups: DashMap<GroupId, Arc<GroupCell>>,
    index: Mutex<LobbyIndex>,
    max_group_size: usize,
}

impl GroupRegistry {
    pub fn new(max_group_size: usize) -> Self {
        Self {
            groups: DashMap::new(),
            index: Mutex::new(LobbyIndex::default()),
            max_group_size,
        }
    }

    pub fn create_group(
        &self,
        connection: ConnectionId,
        names: &[String],
    ) -> Result<Arc<GroupCell>, DomainError> {
        let names = normalize_names(names, self.max_group_size)?;

        let mut index = self.index.lock();
        if index.started {
            return Err(DomainError::precondition(
                "groups cannot be created after the session started",
            ));
        }
        if index.by_connection.contains_key(&connection) {
            return Err(DomainError::validation(
                ValidationKind::AlreadyInGroup,
                format!("connection {connection} already owns a group"),
            ));
        }

        let group = Group::new(
            GroupId::new(),
            connection,
            names.into_iter().map(Player::new).collect(),
        );
        let cell = Arc::new(GroupCell::new(group));
        self.groups.insert(cell.id(), cell.clone());
        index.order.push(cell.id());
        index.by_connection.insert(connection, cell.id());
        Ok(cell)
    }

    /// Lobby membership in insertion order; the first group is the host.
    pub fn list_groups(&self) -> Vec<LobbyEntry> {
        let index = self.index.lock();
        index
            .order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                self.groups.get(id).map(|cell| LobbyEntry {
                    group_id: *id,
                    names: cell.read(Group::display_names),
                    is_host: i == 0,
                })
            })
            .collect()
    }

    /// Drops the connection's lobby group. Host authority passes to the next
    /// group in insertion order.
    pub fn remove_connection(&self, connection: ConnectionId) -> Result<Option<GroupId>, DomainError> {
        let mut index = self.index.lock();
        if index.started {
            return Err(DomainError::precondition(
                "groups cannot leave after the session started",
            ));
        }
        let Some(group_id) = index.by_connection.remove(&connection) else {
            return Ok(None);
        };
        index.order.retain(|id| *id != group_id);
        self.groups.remove(&group_id);
        Ok(Some(group_id))
    }

    /// Flips `started` for the host and hands back every group in order.
    pub fn mark_started(&self, caller: ConnectionId) -> Result<Vec<Arc<GroupCell>>, DomainError> {
        let mut index = self.index.lock();
        let Some(host_group) = index.order.first().copied() else {
            return Err(DomainError::precondition("no groups have been created"));
        };
        if index.by_connection.get(&caller) != Some(&host_group) {
            return Err(DomainError::authorization(
                "only the host group may start the session",
            ));
        }
        if index.started {
            return Err(DomainError::precondition("session already started"));
        }
        index.started = true;
        Ok(self.cells_in(&index))
    }

    pub fn is_started(&self) -> bool {
        self.index.lock().started
    }

    pub fn host_connection(&self) -> Option<ConnectionId> {
        let index = self.index.lock();
        index
            .order
            .first()
            .and_then(|id| self.groups.get(id))
            .map(|cell| cell.owner())
    }

    pub fn group_for(&self, connection: ConnectionId) -> Option<Arc<GroupCell>> {
        let group_id = self.index.lock().by_connection.get(&connection).copied()?;
        self.get(group_id)
    }

    pub fn get(&self, group_id: GroupId) -> Option<Arc<GroupCell>> {
        self.groups.get(&group_id).map(|cell| cell.clone())
    }

    /// All groups in insertion order.
    pub fn cells(&self) -> Vec<Arc<GroupCell>> {
        let index = self.index.lock();
        self.cells_in(&index)
    }

    pub fn len(&self) -> usize {
        self.index.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cells_in(&self, index: &LobbyIndex) -> Vec<Arc<GroupCell>> {
        index
            .order
            .iter()
            .filter_map(|id| self.groups.get(id).map(|cell| cell.clone()))
            .collect()
    }
}

/// Trimmed, NFKC-normalized display names; none may be blank.
pub fn normalize_names(names: &[String], max_group_size: usize) -> Result<Vec<String>, DomainError> {
    if names.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidNames,
            "at least one player name is required",
        ));
    }
    if names.len() > max_group_size {
        return Err(DomainError::validation(
            ValidationKind::InvalidNames,
            format!("a group holds at most {max_group_size} players"),
        ));
    }

    names
        .iter()
        .map(|raw| {
            let name = raw.trim().nfkc().collect::<String>();
            if name.is_empty() {
                return Err(DomainError::validation(
                    ValidationKind::InvalidNames,
                    "player names must not be blank",
                ));
            }
            if name.chars().count() > MAX_NAME_CHARS {
                return Err(DomainError::validation(
                    ValidationKind::InvalidNames,
                    format!("player names are limited to {MAX_NAME_CHARS} characters"),
                ));
            }
            Ok(name)
        })
        .collect()
}
