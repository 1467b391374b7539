use std::cell::{Cell, RefCell};
use std::rc::Rc;

use foundation::Extent;
use foundation::math::{Coordinate, Projection};
use layers::LayerCollection;
use runtime::{ListenerKey, Listeners};

use crate::viewport::Viewport;

/// Observable map properties.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapProperty {
    Center,
    Resolution,
    Size,
    Projection,
    Layers,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MapChanged {
    pub property: MapProperty,
}

/// Map state relevant to overlays: view parameters plus the layer collection.
///
/// Setters notify synchronously, after the new value is in place, and only
/// when the value actually changed.
#[derive(Debug)]
pub struct Map {
    center: Cell<Option<Coordinate>>,
    resolution: Cell<Option<f64>>,
    size: Cell<Option<[u32; 2]>>,
    projection: RefCell<Projection>,
    layers: RefCell<Option<Rc<LayerCollection>>>,
    center_listeners: Listeners<MapChanged>,
    resolution_listeners: Listeners<MapChanged>,
    size_listeners: Listeners<MapChanged>,
    projection_listeners: Listeners<MapChanged>,
    layers_listeners: Listeners<MapChanged>,
}

impl Map {
    pub fn new(projection: Projection) -> Rc<Self> {
        Rc::new(Self {
            center: Cell::new(None),
            resolution: Cell::new(None),
            size: Cell::new(None),
            projection: RefCell::new(projection),
            layers: RefCell::new(Some(LayerCollection::new())),
            center_listeners: Listeners::new(),
            resolution_listeners: Listeners::new(),
            size_listeners: Listeners::new(),
            projection_listeners: Listeners::new(),
            layers_listeners: Listeners::new(),
        })
    }

    fn listeners(&self, property: MapProperty) -> &Listeners<MapChanged> {
        match property {
            MapProperty::Center => &self.center_listeners,
            MapProperty::Resolution => &self.resolution_listeners,
            MapProperty::Size => &self.size_listeners,
            MapProperty::Projection => &self.projection_listeners,
            MapProperty::Layers => &self.layers_listeners,
        }
    }

    fn notify(&self, property: MapProperty) {
        self.listeners(property).emit(&MapChanged { property });
    }

    pub fn listen(
        &self,
        property: MapProperty,
        callback: impl Fn(&MapChanged) + 'static,
    ) -> ListenerKey {
        self.listeners(property).listen(callback)
    }

    pub fn unlisten(&self, property: MapProperty, key: ListenerKey) -> bool {
        self.listeners(property).unlisten(key)
    }

    pub fn listener_count(&self) -> usize {
        [
            MapProperty::Center,
            MapProperty::Resolution,
            MapProperty::Size,
            MapProperty::Projection,
            MapProperty::Layers,
        ]
        .into_iter()
        .map(|p| self.listeners(p).len())
        .sum()
    }

    pub fn center(&self) -> Option<Coordinate> {
        self.center.get()
    }

    pub fn set_center(&self, center: Coordinate) {
        if self.center.replace(Some(center)) != Some(center) {
            self.notify(MapProperty::Center);
        }
    }

    pub fn resolution(&self) -> Option<f64> {
        self.resolution.get()
    }

    pub fn set_resolution(&self, resolution: f64) {
        if self.resolution.replace(Some(resolution)) != Some(resolution) {
            self.notify(MapProperty::Resolution);
        }
    }

    pub fn size(&self) -> Option<[u32; 2]> {
        self.size.get()
    }

    pub fn set_size(&self, size: [u32; 2]) {
        if self.size.replace(Some(size)) != Some(size) {
            self.notify(MapProperty::Size);
        }
    }

    pub fn projection(&self) -> Projection {
        self.projection.borrow().clone()
    }

    pub fn set_projection(&self, projection: Projection) {
        let changed = {
            let mut current = self.projection.borrow_mut();
            if *current == projection {
                false
            } else {
                *current = projection;
                true
            }
        };
        if changed {
            self.notify(MapProperty::Projection);
        }
    }

    pub fn layers(&self) -> Option<Rc<LayerCollection>> {
        self.layers.borrow().clone()
    }

    /// Swaps the whole layer collection.
    pub fn set_layers(&self, layers: Option<Rc<LayerCollection>>) {
        *self.layers.borrow_mut() = layers;
        self.notify(MapProperty::Layers);
    }

    /// Center, resolution and a non-empty size are all known.
    pub fn is_defined(&self) -> bool {
        self.center.get().is_some()
            && self.resolution.get().is_some()
            && self.size.get().is_some_and(|s| s[0] > 0 && s[1] > 0)
    }

    pub fn extent(&self) -> Option<Extent> {
        Some(Extent::from_center_and_size(
            self.center.get()?,
            self.resolution.get()?,
            self.size.get()?,
        ))
    }

    pub fn viewport(&self) -> Viewport {
        let projection = self.projection();
        match (self.is_defined(), self.extent(), self.resolution()) {
            (true, Some(extent), Some(resolution)) => {
                Viewport::defined(extent, resolution, projection)
            }
            _ => Viewport::undefined(projection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Map, MapProperty};
    use foundation::Extent;
    use foundation::math::{Coordinate, EPSG_3857, EPSG_4326, Projection};
    use layers::LayerCollection;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn viewport_is_undefined_until_all_view_properties_are_set() {
        let map = Map::new(Projection::new(EPSG_3857));
        assert!(!map.viewport().is_defined);
        map.set_center(Coordinate::new(0.0, 0.0));
        map.set_resolution(1.0);
        assert!(!map.viewport().is_defined);
        map.set_size([100, 50]);

        let vp = map.viewport();
        assert!(vp.is_defined);
        assert_eq!(vp.extent, Some(Extent::new(-50.0, -25.0, 50.0, 25.0)));
        assert_eq!(vp.resolution, Some(1.0));
    }

    #[test]
    fn zero_size_is_not_defined() {
        let map = Map::new(Projection::new(EPSG_3857));
        map.set_center(Coordinate::new(0.0, 0.0));
        map.set_resolution(1.0);
        map.set_size([0, 50]);
        assert!(!map.is_defined());
    }

    #[test]
    fn setters_notify_per_property_and_only_on_change() {
        let map = Map::new(Projection::new(EPSG_3857));
        let log = Rc::new(RefCell::new(Vec::new()));
        for p in [
            MapProperty::Center,
            MapProperty::Resolution,
            MapProperty::Projection,
            MapProperty::Layers,
        ] {
            let l = Rc::clone(&log);
            map.listen(p, move |e| l.borrow_mut().push(e.property));
        }

        map.set_center(Coordinate::new(1.0, 1.0));
        map.set_center(Coordinate::new(1.0, 1.0));
        map.set_resolution(3.0);
        map.set_projection(Projection::new(EPSG_3857));
        map.set_projection(Projection::new(EPSG_4326));
        map.set_layers(Some(LayerCollection::new()));

        assert_eq!(
            *log.borrow(),
            vec![
                MapProperty::Center,
                MapProperty::Resolution,
                MapProperty::Projection,
                MapProperty::Layers,
            ]
        );
        assert_eq!(map.listener_count(), 4);
    }
}
