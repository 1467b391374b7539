use std::collections::BTreeMap;
use std::rc::Rc;

use layers::{
    AttributionId, InsertAt, Layer, LayerChanged, LayerCollection, LayerId, RemoveAt, ReplaceAt,
    StoreReady,
};
use runtime::ListenerKey;
use tracing::debug;

use crate::registry::RenderSurface;
use crate::view::ViewState;

#[derive(Debug)]
struct TrackedLayer {
    layer: Rc<Layer>,
    members: usize,
    visible_key: ListenerKey,
    ready_key: Option<ListenerKey>,
}

#[derive(Debug)]
struct CollectionBinding {
    layers: Rc<LayerCollection>,
    keys: [ListenerKey; 3],
}

/// Which layers the view observes, and the listener keys it holds on them.
///
/// Invariant: the tracked set equals the distinct members of the bound
/// collection, and `members` is how often each appears in it.
#[derive(Debug, Default)]
pub struct LayerSubscriptionManager {
    tracked: BTreeMap<LayerId, TrackedLayer>,
    binding: Option<CollectionBinding>,
}

impl LayerSubscriptionManager {
    pub fn is_tracked(&self, id: LayerId) -> bool {
        self.tracked.contains_key(&id)
    }

    pub fn tracked_ids(&self) -> Vec<LayerId> {
        self.tracked.keys().copied().collect()
    }

    /// Zero for untracked layers.
    pub fn membership(&self, id: LayerId) -> usize {
        self.tracked.get(&id).map_or(0, |t| t.members)
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Whether a tracked layer with a ready store still renders `id`.
    pub fn attribution_in_use(&self, id: AttributionId) -> bool {
        self.tracked.values().any(|t| {
            let store = t.layer.store();
            store.is_ready()
                && store
                    .attributions()
                    .is_some_and(|list| list.iter().any(|a| a.id() == id))
        })
    }

    fn layer(&self, id: LayerId) -> Option<Rc<Layer>> {
        self.tracked.get(&id).map(|t| Rc::clone(&t.layer))
    }
}

impl<S: RenderSurface + 'static> ViewState<S> {
    /// Rebinds to the map's current collection and reconciles the tracked
    /// set against its members.
    ///
    /// Layers no longer present are untracked, layers present before and
    /// after only get their membership count updated, and new layers are
    /// tracked in collection order. Re-announcing an unchanged collection
    /// leaves every element untouched.
    pub(crate) fn on_layers_changed(&mut self) {
        self.unbind_collection();

        let layers = self.map.layers();
        let members = layers.as_ref().map(|c| c.to_vec()).unwrap_or_default();
        let mut counts: BTreeMap<LayerId, usize> = BTreeMap::new();
        for layer in &members {
            *counts.entry(layer.id()).or_insert(0) += 1;
        }

        for id in self.subscriptions.tracked_ids() {
            match counts.get(&id) {
                Some(&n) => {
                    if let Some(tracked) = self.subscriptions.tracked.get_mut(&id) {
                        tracked.members = n;
                    }
                }
                None => self.untrack(id),
            }
        }
        for layer in &members {
            let id = layer.id();
            if self.subscriptions.is_tracked(id) {
                continue;
            }
            self.track(layer);
            if let Some(tracked) = self.subscriptions.tracked.get_mut(&id) {
                tracked.members = counts.get(&id).copied().unwrap_or(1);
            }
        }

        let Some(layers) = layers else {
            debug!("map has no layer collection");
            return;
        };
        let keys = [
            layers.listen_insert_at(self.handler(|s, e: &InsertAt| s.on_insert_at(&e.layer))),
            layers.listen_remove_at(self.handler(|s, e: &RemoveAt| s.on_remove_at(&e.prev))),
            layers.listen_replace_at(
                self.handler(|s, e: &ReplaceAt| s.on_replace_at(&e.prev, &e.layer)),
            ),
        ];
        self.subscriptions.binding = Some(CollectionBinding { layers, keys });
        debug!(layers = members.len(), "bound to layer collection");
    }

    pub(crate) fn on_insert_at(&mut self, layer: &Rc<Layer>) {
        if let Some(tracked) = self.subscriptions.tracked.get_mut(&layer.id()) {
            tracked.members += 1;
            return;
        }
        self.track(layer);
    }

    pub(crate) fn on_remove_at(&mut self, layer: &Rc<Layer>) {
        let id = layer.id();
        let Some(tracked) = self.subscriptions.tracked.get_mut(&id) else {
            return;
        };
        tracked.members -= 1;
        if tracked.members == 0 {
            self.untrack(id);
        }
    }

    pub(crate) fn on_replace_at(&mut self, prev: &Rc<Layer>, layer: &Rc<Layer>) {
        self.on_remove_at(prev);
        self.on_insert_at(layer);
    }

    fn track(&mut self, layer: &Rc<Layer>) {
        let id = layer.id();
        let on_visible = self.handler(move |s, _: &LayerChanged| s.on_layer_visible_changed(id));
        let visible_key = layer.listen_visible(on_visible);

        let store = layer.store();
        let ready_key = if store.is_ready() {
            None
        } else {
            let on_ready = self.handler(move |s, _: &StoreReady| s.on_store_ready(id));
            Some(store.listen_ready_once(on_ready))
        };

        self.subscriptions.tracked.insert(
            id,
            TrackedLayer {
                layer: Rc::clone(layer),
                members: 1,
                visible_key,
                ready_key,
            },
        );
        debug!(layer = id.0, deferred = ready_key.is_some(), "layer tracked");

        if ready_key.is_none() {
            self.build_elements(layer);
        }
    }

    fn untrack(&mut self, id: LayerId) {
        let Some(tracked) = self.subscriptions.tracked.remove(&id) else {
            return;
        };
        let layer = tracked.layer;
        layer.unlisten(tracked.visible_key);
        if let Some(key) = tracked.ready_key {
            layer.store().unlisten_ready(key);
        }
        if layer.store().is_ready() {
            self.teardown_elements(&layer);
        }
        debug!(layer = id.0, "layer untracked");
    }

    pub(crate) fn on_store_ready(&mut self, id: LayerId) {
        let Some(tracked) = self.subscriptions.tracked.get_mut(&id) else {
            return;
        };
        tracked.ready_key = None;
        let layer = Rc::clone(&tracked.layer);
        debug!(layer = id.0, "store ready, building deferred elements");
        self.build_elements(&layer);
    }

    pub(crate) fn tracked_layer(&self, id: LayerId) -> Option<Rc<Layer>> {
        self.subscriptions.layer(id)
    }

    fn unbind_collection(&mut self) {
        if let Some(binding) = self.subscriptions.binding.take() {
            for key in binding.keys {
                binding.layers.unlisten(key);
            }
        }
    }

    /// Unbinds the collection and untracks every layer.
    pub(crate) fn release_subscriptions(&mut self) {
        self.unbind_collection();
        for id in self.subscriptions.tracked_ids() {
            self.untrack(id);
        }
    }
}
