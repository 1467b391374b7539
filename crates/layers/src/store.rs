use std::cell::Cell;

use runtime::{ListenerKey, Listeners};

use crate::attribution::Attribution;
use crate::tile_grid::TileGrid;

/// Which intersection test a store's coverage areas are subject to.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreKind {
    /// Tiled store: coverage is banded by discrete zoom level.
    Tile(TileGrid),
    /// Free-resolution store: coverage is tested against raw resolution.
    Continuous,
}

/// Fired once when a store transitions to ready.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StoreReady;

/// Data source of a layer and producer of its attributions.
#[derive(Debug)]
pub struct Store {
    kind: StoreKind,
    attributions: Option<Vec<Attribution>>,
    ready: Cell<bool>,
    ready_listeners: Listeners<StoreReady>,
}

impl Store {
    /// A store that is ready immediately.
    pub fn new(kind: StoreKind, attributions: Option<Vec<Attribution>>) -> Self {
        Self {
            kind,
            attributions,
            ready: Cell::new(true),
            ready_listeners: Listeners::new(),
        }
    }

    /// A store that becomes ready later through `set_ready`.
    pub fn pending(kind: StoreKind, attributions: Option<Vec<Attribution>>) -> Self {
        let store = Self::new(kind, attributions);
        store.ready.set(false);
        store
    }

    pub fn kind(&self) -> &StoreKind {
        &self.kind
    }

    pub fn tile_grid(&self) -> Option<&TileGrid> {
        match &self.kind {
            StoreKind::Tile(grid) => Some(grid),
            StoreKind::Continuous => None,
        }
    }

    /// `None` means the store carries no attribution metadata at all.
    pub fn attributions(&self) -> Option<&[Attribution]> {
        self.attributions.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Marks the store ready and fires the ready signal; later calls are no-ops.
    pub fn set_ready(&self) {
        if self.ready.replace(true) {
            return;
        }
        self.ready_listeners.emit(&StoreReady);
    }

    /// Registers a callback for the next (and only) ready transition.
    pub fn listen_ready_once(&self, callback: impl Fn(&StoreReady) + 'static) -> ListenerKey {
        self.ready_listeners.listen_once(callback)
    }

    pub fn unlisten_ready(&self, key: ListenerKey) -> bool {
        self.ready_listeners.unlisten(key)
    }

    pub fn pending_ready_listeners(&self) -> usize {
        self.ready_listeners.len()
    }
}
