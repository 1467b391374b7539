use std::collections::HashMap;

use layers::{Attribution, AttributionId};
use tracing::trace;

/// Opaque handle to an element owned by a `RenderSurface`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementHandle(pub u64);

/// Ordered container the attribution list is rendered into.
///
/// `create` makes a detached, visible element; `append` attaches it at the
/// end of the container; `remove` detaches and forgets it.
pub trait RenderSurface {
    fn create(&mut self, html: &str) -> ElementHandle;
    fn append(&mut self, element: ElementHandle);
    fn remove(&mut self, element: ElementHandle);
    fn show(&mut self, element: ElementHandle);
    fn hide(&mut self, element: ElementHandle);
}

#[derive(Debug, Copy, Clone)]
struct Element {
    handle: ElementHandle,
    visible: bool,
}

/// One rendered element per known attribution.
///
/// Show/hide is forwarded to the surface only when the state actually
/// changes, so repeated recomputation with an unchanged viewport is silent.
#[derive(Debug)]
pub struct ElementRegistry<S> {
    surface: S,
    elements: HashMap<AttributionId, Element>,
}

impl<S: RenderSurface> ElementRegistry<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            elements: HashMap::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Creates and appends the element for `attribution`.
    ///
    /// The element is hidden before it is attached, so an out-of-view
    /// attribution never flashes. If an element already exists for this
    /// identity it is kept and only its visibility is updated; returns
    /// whether a new element was created.
    pub fn create(&mut self, attribution: &Attribution, visible: bool) -> bool {
        let id = attribution.id();
        if self.elements.contains_key(&id) {
            self.show(id, visible);
            return false;
        }
        let handle = self.surface.create(attribution.html());
        if !visible {
            self.surface.hide(handle);
        }
        self.surface.append(handle);
        self.elements.insert(id, Element { handle, visible });
        trace!(attribution = id.0, visible, "element created");
        true
    }

    /// Sets visibility; returns `true` if the surface was touched.
    pub fn show(&mut self, id: AttributionId, visible: bool) -> bool {
        let Some(element) = self.elements.get_mut(&id) else {
            return false;
        };
        if element.visible == visible {
            return false;
        }
        element.visible = visible;
        if visible {
            self.surface.show(element.handle);
        } else {
            self.surface.hide(element.handle);
        }
        true
    }

    /// Detaches and forgets the element; a missing element is a no-op.
    pub fn destroy(&mut self, id: AttributionId) -> bool {
        let Some(element) = self.elements.remove(&id) else {
            return false;
        };
        self.surface.remove(element.handle);
        trace!(attribution = id.0, "element destroyed");
        true
    }

    pub fn contains(&self, id: AttributionId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn is_visible(&self, id: AttributionId) -> Option<bool> {
        self.elements.get(&id).map(|e| e.visible)
    }

    /// Known attribution ids in ascending order.
    pub fn ids(&self) -> Vec<AttributionId> {
        let mut ids: Vec<AttributionId> = self.elements.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
