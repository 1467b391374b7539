use std::cell::RefCell;
use std::rc::Rc;

use runtime::{ListenerKey, Listeners};

use crate::layer::Layer;

#[derive(Debug, Clone)]
pub struct InsertAt {
    pub index: usize,
    pub layer: Rc<Layer>,
}

#[derive(Debug, Clone)]
pub struct RemoveAt {
    pub index: usize,
    pub prev: Rc<Layer>,
}

#[derive(Debug, Clone)]
pub struct ReplaceAt {
    pub index: usize,
    pub prev: Rc<Layer>,
    pub layer: Rc<Layer>,
}

/// Ordered, observable sequence of layers.
///
/// Every mutation finishes updating the sequence before notifying, and
/// notifies synchronously before returning. Listeners may read the
/// collection but must not mutate it.
#[derive(Debug, Default)]
pub struct LayerCollection {
    items: RefCell<Vec<Rc<Layer>>>,
    insert_listeners: Listeners<InsertAt>,
    remove_listeners: Listeners<RemoveAt>,
    replace_listeners: Listeners<ReplaceAt>,
}

impl LayerCollection {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn from_layers(layers: Vec<Rc<Layer>>) -> Rc<Self> {
        Rc::new(Self {
            items: RefCell::new(layers),
            ..Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rc<Layer>> {
        self.items.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<Rc<Layer>> {
        self.items.borrow().clone()
    }

    pub fn push(&self, layer: Rc<Layer>) {
        let index = self.len();
        self.insert_at(index, layer);
    }

    /// Inserts at `index`, shifting later layers.
    ///
    /// Panics if `index > len`, like `Vec::insert`.
    pub fn insert_at(&self, index: usize, layer: Rc<Layer>) {
        self.items.borrow_mut().insert(index, Rc::clone(&layer));
        self.insert_listeners.emit(&InsertAt { index, layer });
    }

    pub fn remove_at(&self, index: usize) -> Option<Rc<Layer>> {
        let prev = {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.remove_listeners.emit(&RemoveAt {
            index,
            prev: Rc::clone(&prev),
        });
        Some(prev)
    }

    /// Replaces the layer at `index`, returning the previous one.
    pub fn replace_at(&self, index: usize, layer: Rc<Layer>) -> Option<Rc<Layer>> {
        let prev = {
            let mut items = self.items.borrow_mut();
            let slot = items.get_mut(index)?;
            std::mem::replace(slot, Rc::clone(&layer))
        };
        self.replace_listeners.emit(&ReplaceAt {
            index,
            prev: Rc::clone(&prev),
            layer,
        });
        Some(prev)
    }

    pub fn listen_insert_at(&self, callback: impl Fn(&InsertAt) + 'static) -> ListenerKey {
        self.insert_listeners.listen(callback)
    }

    pub fn listen_remove_at(&self, callback: impl Fn(&RemoveAt) + 'static) -> ListenerKey {
        self.remove_listeners.listen(callback)
    }

    pub fn listen_replace_at(&self, callback: impl Fn(&ReplaceAt) + 'static) -> ListenerKey {
        self.replace_listeners.listen(callback)
    }

    /// Removes a structural listener of any kind.
    pub fn unlisten(&self, key: ListenerKey) -> bool {
        self.insert_listeners.unlisten(key)
            || self.remove_listeners.unlisten(key)
            || self.replace_listeners.unlisten(key)
    }

    pub fn listener_count(&self) -> usize {
        self.insert_listeners.len() + self.remove_listeners.len() + self.replace_listeners.len()
    }
}
