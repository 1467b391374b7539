use std::cell::Cell;
use std::rc::Rc;

use foundation::IdSource;
use runtime::{ListenerKey, Listeners};

use crate::store::Store;

static LAYER_IDS: IdSource = IdSource::new();

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerProperty {
    Visible,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerChanged {
    pub layer: LayerId,
    pub property: LayerProperty,
}

/// A displayed layer: a store plus a visibility flag.
///
/// Layers are shared (`Rc`) between the collection that owns their position
/// and anything observing them.
#[derive(Debug)]
pub struct Layer {
    id: LayerId,
    store: Rc<Store>,
    visible: Cell<bool>,
    listeners: Listeners<LayerChanged>,
}

impl Layer {
    pub fn new(store: Rc<Store>) -> Rc<Self> {
        Rc::new(Self {
            id: LayerId(LAYER_IDS.next_id()),
            store,
            visible: Cell::new(true),
            listeners: Listeners::new(),
        })
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn store(&self) -> &Rc<Store> {
        &self.store
    }

    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    /// Sets the visibility flag, notifying listeners only on an actual change.
    pub fn set_visible(&self, visible: bool) {
        if self.visible.replace(visible) == visible {
            return;
        }
        self.listeners.emit(&LayerChanged {
            layer: self.id,
            property: LayerProperty::Visible,
        });
    }

    pub fn listen_visible(&self, callback: impl Fn(&LayerChanged) + 'static) -> ListenerKey {
        self.listeners.listen(callback)
    }

    pub fn unlisten(&self, key: ListenerKey) -> bool {
        self.listeners.unlisten(key)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
