use std::collections::BTreeSet;

use layers::{Layer, LayerId};
use map::{MapChanged, MapProperty};
use runtime::ListenerKey;
use tracing::{debug, trace};

use crate::registry::RenderSurface;
use crate::view::{RECOMPUTATIONS, ViewState};

const OBSERVED: [MapProperty; 5] = [
    MapProperty::Center,
    MapProperty::Resolution,
    MapProperty::Size,
    MapProperty::Projection,
    MapProperty::Layers,
];

/// Listener keys the view holds on the map.
#[derive(Debug, Default)]
pub struct ViewportChangeDispatcher {
    keys: Vec<(MapProperty, ListenerKey)>,
}

impl ViewportChangeDispatcher {
    pub fn is_listening(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn properties(&self) -> Vec<MapProperty> {
        self.keys.iter().map(|(p, _)| *p).collect()
    }
}

impl<S: RenderSurface + 'static> ViewState<S> {
    pub(crate) fn listen_to_map(&mut self) {
        for property in OBSERVED {
            let key = self.map.listen(
                property,
                self.handler(|s, e: &MapChanged| s.on_map_changed(e.property)),
            );
            self.dispatcher.keys.push((property, key));
        }
    }

    pub(crate) fn unlisten_map(&mut self) {
        for (property, key) in std::mem::take(&mut self.dispatcher.keys) {
            self.map.unlisten(property, key);
        }
    }

    fn on_map_changed(&mut self, property: MapProperty) {
        trace!(?property, "map changed");
        match property {
            MapProperty::Center | MapProperty::Resolution | MapProperty::Size => self.refresh_all(),
            MapProperty::Projection => {
                debug!(
                    projection = %self.map.projection(),
                    "projection changed, clearing coverage cache"
                );
                self.calculator.clear_cache();
                self.refresh_all();
            }
            MapProperty::Layers => self.on_layers_changed(),
        }
    }

    /// Recomputes each tracked layer once, in collection order.
    pub(crate) fn refresh_all(&mut self) {
        let layers = self.map.layers().map(|c| c.to_vec()).unwrap_or_default();
        let mut seen = BTreeSet::new();
        for layer in layers {
            if seen.insert(layer.id()) && self.subscriptions.is_tracked(layer.id()) {
                self.update_layer_visibility(&layer);
            }
        }
    }

    pub(crate) fn on_layer_visible_changed(&mut self, id: LayerId) {
        if let Some(layer) = self.tracked_layer(id) {
            self.update_layer_visibility(&layer);
        }
    }

    /// Applies the current visibility of `layer`'s attributions to their
    /// elements. Layers whose store is not ready have no elements yet.
    pub(crate) fn update_layer_visibility(&mut self, layer: &Layer) {
        let store = layer.store();
        if !store.is_ready() {
            return;
        }
        let Some(attributions) = store.attributions() else {
            return;
        };
        self.metrics.inc_counter(RECOMPUTATIONS, 1);

        let viewport = self.map.viewport();
        if viewport.is_defined && layer.visible() {
            let visibilities = self
                .calculator
                .compute(layer, &viewport, &mut self.metrics)
                .unwrap_or_default();
            for (id, visible) in visibilities {
                self.registry.show(id, visible);
            }
        } else {
            for attribution in attributions {
                self.registry.show(attribution.id(), false);
            }
        }
    }
}
