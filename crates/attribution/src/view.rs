use std::cell::RefCell;
use std::rc::{Rc, Weak};

use foundation::math::Projections;
use layers::{AttributionId, Layer, LayerId};
use map::Map;
use runtime::{Metrics, MetricsSnapshot};
use tracing::debug;

use crate::dispatcher::ViewportChangeDispatcher;
use crate::registry::{ElementRegistry, RenderSurface};
use crate::subscriptions::LayerSubscriptionManager;
use crate::visibility::VisibilityCalculator;

pub const ELEMENTS_CREATED: &str = "attribution.elements_created";
pub const ELEMENTS_DESTROYED: &str = "attribution.elements_destroyed";
pub const RECOMPUTATIONS: &str = "attribution.recomputations";

/// Everything the view mutates from inside its listeners.
///
/// Listener closures hold a `Weak` to this and borrow it mutably for the
/// duration of one callback, so a callback must never re-enter the view.
#[derive(Debug)]
pub(crate) struct ViewState<S> {
    pub(crate) me: Weak<RefCell<ViewState<S>>>,
    pub(crate) map: Rc<Map>,
    pub(crate) registry: ElementRegistry<S>,
    pub(crate) calculator: VisibilityCalculator,
    pub(crate) subscriptions: LayerSubscriptionManager,
    pub(crate) dispatcher: ViewportChangeDispatcher,
    pub(crate) metrics: Metrics,
    pub(crate) attached: bool,
}

impl<S: RenderSurface + 'static> ViewState<S> {
    /// Wraps `f` into a listener that reaches this state through a weak
    /// reference. Once the view is gone the listener does nothing.
    pub(crate) fn handler<E, F>(&self, f: F) -> impl Fn(&E) + use<S, E, F>
    where
        E: 'static,
        F: Fn(&mut ViewState<S>, &E) + 'static,
    {
        let me = self.me.clone();
        move |event: &E| {
            if let Some(state) = me.upgrade() {
                f(&mut *state.borrow_mut(), event);
            }
        }
    }

    /// Creates one element per attribution of `layer`, in store order.
    ///
    /// Initial visibility is the immediate computation, so nothing is shown
    /// and then corrected.
    pub(crate) fn build_elements(&mut self, layer: &Layer) {
        let Some(attributions) = layer.store().attributions() else {
            debug!(layer = layer.id().0, "store has no attribution metadata");
            return;
        };

        let viewport = self.map.viewport();
        let visibilities = if viewport.is_defined && layer.visible() {
            self.calculator.compute(layer, &viewport, &mut self.metrics)
        } else {
            None
        };

        let mut created = 0;
        for attribution in attributions {
            let visible = visibilities
                .as_ref()
                .and_then(|v| v.get(&attribution.id()).copied())
                .unwrap_or(false);
            if self.registry.create(attribution, visible) {
                created += 1;
            }
        }
        self.metrics.inc_counter(ELEMENTS_CREATED, created);
        debug!(layer = layer.id().0, created, "attribution elements built");
    }

    /// Destroys the elements and cached geometry of `layer`'s attributions.
    ///
    /// Attributions still reachable through another tracked, ready layer
    /// (two layers sharing one store) are left alone.
    pub(crate) fn teardown_elements(&mut self, layer: &Layer) {
        let Some(attributions) = layer.store().attributions() else {
            return;
        };

        let mut destroyed = 0;
        for attribution in attributions {
            let id = attribution.id();
            if self.subscriptions.attribution_in_use(id) {
                continue;
            }
            self.calculator.forget(id);
            if self.registry.destroy(id) {
                destroyed += 1;
            }
        }
        self.metrics.inc_counter(ELEMENTS_DESTROYED, destroyed);
        debug!(layer = layer.id().0, destroyed, "attribution elements torn down");
    }

    pub(crate) fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.unlisten_map();
        self.release_subscriptions();
        debug!("attribution view detached");
    }
}

/// Attribution list kept in sync with a map.
///
/// Construction subscribes to the map and every layer it currently has;
/// dropping the view (or `detach`) releases every subscription and destroys
/// every element it created.
#[derive(Debug)]
pub struct AttributionView<S: RenderSurface + 'static> {
    state: Rc<RefCell<ViewState<S>>>,
}

impl<S: RenderSurface + 'static> AttributionView<S> {
    pub fn new(map: Rc<Map>, surface: S) -> Self {
        Self::with_projections(map, surface, Rc::new(Projections::with_defaults()))
    }

    pub fn with_projections(map: Rc<Map>, surface: S, projections: Rc<Projections>) -> Self {
        let state = Rc::new_cyclic(|me| {
            RefCell::new(ViewState {
                me: me.clone(),
                map,
                registry: ElementRegistry::new(surface),
                calculator: VisibilityCalculator::new(projections),
                subscriptions: LayerSubscriptionManager::default(),
                dispatcher: ViewportChangeDispatcher::default(),
                metrics: Metrics::new(),
                attached: true,
            })
        });
        {
            let mut s = state.borrow_mut();
            s.listen_to_map();
            s.on_layers_changed();
        }
        Self { state }
    }

    /// Recomputes every tracked layer, as a viewport change would.
    pub fn refresh(&self) {
        self.state.borrow_mut().refresh_all();
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(self.state.borrow().registry.surface())
    }

    pub fn is_rendered(&self, id: AttributionId) -> bool {
        self.state.borrow().registry.contains(id)
    }

    /// `None` when no element exists for `id`.
    pub fn is_visible(&self, id: AttributionId) -> Option<bool> {
        self.state.borrow().registry.is_visible(id)
    }

    pub fn element_count(&self) -> usize {
        self.state.borrow().registry.len()
    }

    pub fn rendered_attributions(&self) -> Vec<AttributionId> {
        self.state.borrow().registry.ids()
    }

    pub fn tracked_layers(&self) -> Vec<LayerId> {
        self.state.borrow().subscriptions.tracked_ids()
    }

    /// How many times `layer` currently appears in the tracked collection.
    pub fn membership(&self, layer: LayerId) -> usize {
        self.state.borrow().subscriptions.membership(layer)
    }

    pub fn has_cached_coverage(&self, id: AttributionId) -> bool {
        self.state.borrow().calculator.cache().contains(id)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.state.borrow().metrics.snapshot()
    }

    /// Releases all subscriptions and elements; later calls are no-ops.
    pub fn detach(&self) {
        self.state.borrow_mut().detach();
    }
}

impl<S: RenderSurface + 'static> Drop for AttributionView<S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.detach();
        }
    }
}
