use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use attribution::{
    AttributionView, ELEMENTS_CREATED, ELEMENTS_DESTROYED, ElementHandle, ListSurface,
    REPROJECTIONS, RenderSurface,
};
use foundation::Extent;
use foundation::math::{Coordinate, EPSG_3857, EPSG_4326, Projection};
use layers::{
    Attribution, AttributionId, ContinuousCoverageArea, CoverageArea, Layer, LayerId, Store,
    StoreKind, TileCoverageArea, TileGrid,
};
use map::Map;
use pretty_assertions::assert_eq;

fn mercator_map(center: (f64, f64), resolution: f64) -> Rc<Map> {
    let map = Map::new(Projection::new(EPSG_3857));
    map.set_size([100, 100]);
    map.set_center(Coordinate::new(center.0, center.1));
    map.set_resolution(resolution);
    map
}

fn mercator(html: &str) -> Attribution {
    Attribution::new(html, Projection::new(EPSG_3857))
}

fn region(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> CoverageArea {
    ContinuousCoverageArea::new(Extent::new(min_x, min_y, max_x, max_y)).into()
}

fn continuous_layer(attributions: Vec<Attribution>) -> Rc<Layer> {
    Layer::new(Rc::new(Store::new(StoreKind::Continuous, Some(attributions))))
}

fn push(map: &Map, layer: &Rc<Layer>) {
    map.layers().expect("layer collection").push(Rc::clone(layer));
}

fn visible_html(view: &AttributionView<ListSurface>) -> Vec<String> {
    view.with_surface(|s| s.visible_html())
}

fn rendered_html(view: &AttributionView<ListSurface>) -> Vec<String> {
    view.with_surface(|s| s.rendered_html())
}

#[test]
fn attribution_without_coverage_is_visible_on_insert() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = mercator("A");
    let a_id = a.id();
    push(&map, &continuous_layer(vec![a]));

    assert_eq!(view.is_visible(a_id), Some(true));
    assert_eq!(visible_html(&view), vec!["A".to_string()]);
}

#[test]
fn invisible_layer_creates_hidden_elements_without_flashing() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = mercator("A");
    let a_id = a.id();
    let layer = continuous_layer(vec![a]);
    layer.set_visible(false);
    push(&map, &layer);

    assert_eq!(view.is_visible(a_id), Some(false));
    assert_eq!(rendered_html(&view), vec!["A".to_string()]);
    assert!(visible_html(&view).is_empty());
    view.with_surface(|s| assert!(!s.items()[0].ever_shown_attached));

    layer.set_visible(true);
    assert_eq!(view.is_visible(a_id), Some(true));
}

#[test]
fn panning_into_a_region_shows_only_that_attribution() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let regional =
        mercator("regional").with_coverage_areas(vec![region(1000.0, 1000.0, 1100.0, 1100.0)]);
    let regional_id = regional.id();
    let global = mercator("global");
    let global_id = global.id();
    push(&map, &continuous_layer(vec![regional, global]));

    assert_eq!(view.is_visible(regional_id), Some(false));
    assert_eq!(view.is_visible(global_id), Some(true));
    view.with_surface(|s| assert!(!s.items()[0].ever_shown_attached));

    map.set_center(Coordinate::new(1050.0, 1050.0));
    assert_eq!(view.is_visible(regional_id), Some(true));
    assert_eq!(view.is_visible(global_id), Some(true));
    assert_eq!(
        visible_html(&view),
        vec!["regional".to_string(), "global".to_string()]
    );

    map.set_center(Coordinate::new(-5000.0, 0.0));
    assert_eq!(view.is_visible(regional_id), Some(false));
}

#[test]
fn resolution_bounds_limit_continuous_coverage() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let area = ContinuousCoverageArea::new(Extent::new(-1e6, -1e6, 1e6, 1e6))
        .with_resolution_range(Some(0.5), Some(10.0));
    let a = mercator("zoomed").with_coverage_areas(vec![area.into()]);
    let a_id = a.id();
    push(&map, &continuous_layer(vec![a]));

    assert_eq!(view.is_visible(a_id), Some(true));
    map.set_resolution(20.0);
    assert_eq!(view.is_visible(a_id), Some(false));
    map.set_resolution(10.0);
    assert_eq!(view.is_visible(a_id), Some(true));
}

#[test]
fn removal_destroys_element_listener_and_cache() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = Attribution::new("A", Projection::new(EPSG_4326))
        .with_coverage_areas(vec![region(-10.0, -10.0, 10.0, 10.0)]);
    let a_id = a.id();
    let layer = continuous_layer(vec![a]);
    push(&map, &layer);

    assert!(view.is_rendered(a_id));
    assert!(view.has_cached_coverage(a_id));
    assert_eq!(layer.listener_count(), 1);
    assert_eq!(view.metrics().counter(REPROJECTIONS), 1);

    map.layers().expect("layer collection").remove_at(0);
    assert!(!view.is_rendered(a_id));
    assert!(!view.has_cached_coverage(a_id));
    assert_eq!(layer.listener_count(), 0);
    assert_eq!(view.element_count(), 0);
    assert!(view.tracked_layers().is_empty());

    // A fresh attribution identity is rebuilt from scratch.
    let b = Attribution::new("A", Projection::new(EPSG_4326))
        .with_coverage_areas(vec![region(-10.0, -10.0, 10.0, 10.0)]);
    let b_id = b.id();
    push(&map, &continuous_layer(vec![b]));
    assert_eq!(view.is_visible(b_id), Some(true));
    assert_eq!(view.metrics().counter(REPROJECTIONS), 2);
    assert_eq!(view.metrics().counter(ELEMENTS_DESTROYED), 1);
}

/// Records surface operations by html so ordering can be asserted.
#[derive(Debug, Default)]
struct RecordingSurface {
    inner: ListSurface,
    html: BTreeMap<ElementHandle, String>,
    log: Vec<String>,
}

impl RenderSurface for RecordingSurface {
    fn create(&mut self, html: &str) -> ElementHandle {
        let handle = self.inner.create(html);
        self.html.insert(handle, html.to_string());
        self.log.push(format!("create {html}"));
        handle
    }

    fn append(&mut self, element: ElementHandle) {
        self.inner.append(element);
        self.log.push(format!("append {}", self.html[&element]));
    }

    fn remove(&mut self, element: ElementHandle) {
        self.inner.remove(element);
        self.log.push(format!("remove {}", self.html[&element]));
    }

    fn show(&mut self, element: ElementHandle) {
        self.inner.show(element);
        self.log.push(format!("show {}", self.html[&element]));
    }

    fn hide(&mut self, element: ElementHandle) {
        self.inner.hide(element);
        self.log.push(format!("hide {}", self.html[&element]));
    }
}

#[test]
fn replace_destroys_previous_elements_before_creating_new_ones() {
    let map = mercator_map((0.0, 0.0), 1.0);
    push(&map, &continuous_layer(vec![mercator("A1")]));
    let view = AttributionView::new(Rc::clone(&map), RecordingSurface::default());

    map.layers()
        .expect("layer collection")
        .replace_at(0, continuous_layer(vec![mercator("A2")]));

    view.with_surface(|s| {
        assert_eq!(
            s.log,
            vec![
                "create A1".to_string(),
                "append A1".to_string(),
                "remove A1".to_string(),
                "create A2".to_string(),
                "append A2".to_string(),
            ]
        );
        assert_eq!(s.inner.visible_html(), vec!["A2".to_string()]);
    });
}

#[test]
fn tracked_layers_follow_collection_membership() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());
    let layers = map.layers().expect("layer collection");

    let all: Vec<Rc<Layer>> = (0..5)
        .map(|i| continuous_layer(vec![mercator(&format!("L{i}"))]))
        .collect();

    let check = |view: &AttributionView<ListSurface>| {
        let members = layers.to_vec();
        let expected_layers: BTreeSet<LayerId> = members.iter().map(|l| l.id()).collect();
        let tracked: BTreeSet<LayerId> = view.tracked_layers().into_iter().collect();
        assert_eq!(tracked, expected_layers);

        let expected_ids: BTreeSet<AttributionId> = members
            .iter()
            .flat_map(|l| l.store().attributions().unwrap_or_default().iter().map(|a| a.id()))
            .collect();
        let rendered: BTreeSet<AttributionId> = view.rendered_attributions().into_iter().collect();
        assert_eq!(rendered, expected_ids);
    };

    layers.push(Rc::clone(&all[0]));
    layers.push(Rc::clone(&all[1]));
    check(&view);
    layers.insert_at(1, Rc::clone(&all[2]));
    check(&view);
    layers.replace_at(0, Rc::clone(&all[3]));
    check(&view);
    layers.remove_at(1);
    check(&view);
    layers.replace_at(1, Rc::clone(&all[4]));
    check(&view);
    layers.remove_at(0);
    layers.remove_at(0);
    check(&view);
    assert_eq!(view.element_count(), 0);
}

#[test]
fn undefined_viewport_forces_every_attribution_hidden() {
    let map = Map::new(Projection::new(EPSG_3857));
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = mercator("A");
    let a_id = a.id();
    push(&map, &continuous_layer(vec![a]));
    assert_eq!(view.is_visible(a_id), Some(false));

    map.set_size([100, 100]);
    map.set_center(Coordinate::new(0.0, 0.0));
    assert_eq!(view.is_visible(a_id), Some(false));
    map.set_resolution(1.0);
    assert_eq!(view.is_visible(a_id), Some(true));

    map.set_size([0, 100]);
    assert_eq!(view.is_visible(a_id), Some(false));
}

#[test]
fn recomputing_an_unchanged_viewport_touches_nothing() {
    let map = mercator_map((0.0, 0.0), 1.0);
    push(
        &map,
        &continuous_layer(vec![
            mercator("in").with_coverage_areas(vec![region(-10.0, -10.0, 10.0, 10.0)]),
            mercator("out").with_coverage_areas(vec![region(500.0, 500.0, 600.0, 600.0)]),
        ]),
    );
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let before = view.with_surface(|s| s.commands());
    view.refresh();
    view.refresh();
    assert_eq!(view.with_surface(|s| s.commands()), before);
    assert_eq!(visible_html(&view), vec!["in".to_string()]);
}

#[test]
fn coverage_is_reprojected_once_per_attribution() {
    let map = mercator_map((500_000.0, 500_000.0), 100.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = Attribution::new("lonlat", Projection::new(EPSG_4326))
        .with_coverage_areas(vec![region(0.0, 0.0, 10.0, 10.0)]);
    let a_id = a.id();
    push(&map, &continuous_layer(vec![a]));
    assert_eq!(view.is_visible(a_id), Some(true));

    map.set_center(Coordinate::new(-5e6, -5e6));
    assert_eq!(view.is_visible(a_id), Some(false));
    map.set_center(Coordinate::new(600_000.0, 600_000.0));
    assert_eq!(view.is_visible(a_id), Some(true));
    map.set_resolution(50.0);

    assert_eq!(view.metrics().counter(REPROJECTIONS), 1);
}

#[test]
fn projection_change_recomputes_against_fresh_geometry() {
    let map = mercator_map((500_000.0, 500_000.0), 100.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = Attribution::new("lonlat", Projection::new(EPSG_4326))
        .with_coverage_areas(vec![region(0.0, 0.0, 10.0, 10.0)]);
    let a_id = a.id();
    push(&map, &continuous_layer(vec![a]));
    assert_eq!(view.metrics().counter(REPROJECTIONS), 1);

    // Same numbers read as degrees now fall far outside the area.
    map.set_projection(Projection::new(EPSG_4326));
    map.set_resolution(0.001);
    assert_eq!(view.is_visible(a_id), Some(false));

    map.set_center(Coordinate::new(5.0, 5.0));
    assert_eq!(view.is_visible(a_id), Some(true));
    assert!(view.has_cached_coverage(a_id));
    assert_eq!(view.metrics().counter(REPROJECTIONS), 1);
}

#[test]
fn tile_store_coverage_is_banded_by_level() {
    let grid = TileGrid::web_mercator(5).unwrap();
    let resolutions = grid.resolutions().to_vec();
    let map = mercator_map((0.0, 0.0), resolutions[2]);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = mercator("tiles").with_coverage_areas(vec![
        TileCoverageArea::new(Extent::new(-1e7, -1e7, 1e7, 1e7), 2, 3).into(),
    ]);
    let a_id = a.id();
    push(
        &map,
        &Layer::new(Rc::new(Store::new(StoreKind::Tile(grid), Some(vec![a])))),
    );

    assert_eq!(view.is_visible(a_id), Some(true));
    map.set_resolution(resolutions[4]);
    assert_eq!(view.is_visible(a_id), Some(false));
    map.set_resolution(resolutions[3] * 1.1);
    assert_eq!(view.is_visible(a_id), Some(true));
    map.set_resolution(resolutions[0]);
    assert_eq!(view.is_visible(a_id), Some(false));
}

#[test]
#[should_panic(expected = "tile stores require tile coverage areas")]
fn tile_store_with_continuous_coverage_panics() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let _view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = mercator("bad").with_coverage_areas(vec![region(-1.0, -1.0, 1.0, 1.0)]);
    push(
        &map,
        &Layer::new(Rc::new(Store::new(
            StoreKind::Tile(TileGrid::web_mercator(3).unwrap()),
            Some(vec![a]),
        ))),
    );
}

#[test]
fn pending_store_builds_elements_once_ready() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = mercator("late");
    let a_id = a.id();
    let store = Rc::new(Store::pending(StoreKind::Continuous, Some(vec![a])));
    let layer = Layer::new(Rc::clone(&store));
    push(&map, &layer);

    assert_eq!(view.tracked_layers(), vec![layer.id()]);
    assert_eq!(view.element_count(), 0);
    map.set_center(Coordinate::new(1.0, 1.0));
    assert_eq!(view.element_count(), 0);

    store.set_ready();
    assert_eq!(view.is_visible(a_id), Some(true));
    assert_eq!(store.pending_ready_listeners(), 0);
    assert_eq!(view.metrics().counter(ELEMENTS_CREATED), 1);
}

#[test]
fn removal_before_ready_cancels_deferred_build() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let store = Rc::new(Store::pending(StoreKind::Continuous, Some(vec![mercator("late")])));
    push(&map, &Layer::new(Rc::clone(&store)));
    assert_eq!(store.pending_ready_listeners(), 1);

    map.layers().expect("layer collection").remove_at(0);
    assert_eq!(store.pending_ready_listeners(), 0);

    store.set_ready();
    assert_eq!(view.element_count(), 0);
    assert!(view.tracked_layers().is_empty());
}

#[test]
fn store_without_metadata_renders_nothing() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let layer = Layer::new(Rc::new(Store::new(StoreKind::Continuous, None)));
    push(&map, &layer);
    map.set_center(Coordinate::new(3.0, 3.0));

    assert_eq!(view.tracked_layers(), vec![layer.id()]);
    assert_eq!(view.element_count(), 0);
}

#[test]
fn duplicate_layer_is_torn_down_with_its_last_membership() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());
    let layers = map.layers().expect("layer collection");

    let a = mercator("twice");
    let a_id = a.id();
    let layer = continuous_layer(vec![a]);
    layers.push(Rc::clone(&layer));
    layers.push(Rc::clone(&layer));

    assert_eq!(view.membership(layer.id()), 2);
    assert_eq!(view.element_count(), 1);
    assert_eq!(layer.listener_count(), 1);

    layers.remove_at(0);
    assert!(view.is_rendered(a_id));
    layers.remove_at(0);
    assert!(!view.is_rendered(a_id));
    assert_eq!(layer.listener_count(), 0);
}

#[test]
fn layers_sharing_a_store_keep_its_elements_until_both_leave() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());
    let layers = map.layers().expect("layer collection");

    let a = mercator("shared");
    let a_id = a.id();
    let store = Rc::new(Store::new(StoreKind::Continuous, Some(vec![a])));
    layers.push(Layer::new(Rc::clone(&store)));
    layers.push(Layer::new(Rc::clone(&store)));
    assert_eq!(view.element_count(), 1);

    layers.remove_at(0);
    assert!(view.is_rendered(a_id));
    layers.remove_at(0);
    assert!(!view.is_rendered(a_id));
}

#[test]
fn swapping_the_collection_rebinds_the_view() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());
    let old = map.layers().expect("layer collection");
    old.push(continuous_layer(vec![mercator("old")]));

    let fresh = layers::LayerCollection::from_layers(vec![continuous_layer(vec![mercator("new")])]);
    map.set_layers(Some(Rc::clone(&fresh)));

    assert_eq!(rendered_html(&view), vec!["new".to_string()]);
    assert_eq!(old.listener_count(), 0);
    assert_eq!(fresh.listener_count(), 3);

    old.push(continuous_layer(vec![mercator("ignored")]));
    assert_eq!(rendered_html(&view), vec!["new".to_string()]);

    map.set_layers(None);
    assert_eq!(view.element_count(), 0);
    assert_eq!(fresh.listener_count(), 0);
}

#[test]
fn reannouncing_the_same_collection_touches_no_element() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());
    let layers = map.layers().expect("layer collection");
    let twice = continuous_layer(vec![mercator("L2")]);
    layers.push(continuous_layer(vec![mercator("L1")]));
    layers.insert_at(0, continuous_layer(vec![mercator("L0")]));
    layers.push(Rc::clone(&twice));
    layers.push(Rc::clone(&twice));

    let commands = view.with_surface(|s| s.commands());
    let order = rendered_html(&view);
    let created = view.metrics().counter(ELEMENTS_CREATED);
    assert_eq!(order, vec!["L1".to_string(), "L0".to_string(), "L2".to_string()]);

    map.set_layers(Some(Rc::clone(&layers)));

    assert_eq!(view.with_surface(|s| s.commands()), commands);
    assert_eq!(rendered_html(&view), order);
    assert_eq!(view.metrics().counter(ELEMENTS_CREATED), created);
    assert_eq!(view.membership(twice.id()), 2);
    assert_eq!(layers.listener_count(), 3);

    // Structural listeners are live again after the rebind.
    layers.remove_at(0);
    assert_eq!(rendered_html(&view), vec!["L1".to_string(), "L2".to_string()]);
}

#[test]
fn swapping_to_a_collection_sharing_layers_keeps_their_elements() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());
    let kept = continuous_layer(vec![mercator("kept")]);
    push(&map, &continuous_layer(vec![mercator("dropped")]));
    push(&map, &kept);
    let created = view.metrics().counter(ELEMENTS_CREATED);

    let fresh = layers::LayerCollection::from_layers(vec![
        continuous_layer(vec![mercator("added")]),
        Rc::clone(&kept),
    ]);
    map.set_layers(Some(fresh));

    assert_eq!(rendered_html(&view), vec!["kept".to_string(), "added".to_string()]);
    assert_eq!(view.metrics().counter(ELEMENTS_CREATED), created + 1);
    assert_eq!(view.metrics().counter(ELEMENTS_DESTROYED), 1);
    assert_eq!(kept.listener_count(), 1);
}

#[test]
fn hidden_layer_skips_coverage_geometry_until_shown() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = Attribution::new("lonlat", Projection::new(EPSG_4326))
        .with_coverage_areas(vec![region(-10.0, -10.0, 10.0, 10.0)]);
    let a_id = a.id();
    let layer = continuous_layer(vec![a]);
    layer.set_visible(false);
    push(&map, &layer);
    map.set_center(Coordinate::new(1.0, 1.0));

    assert_eq!(view.is_visible(a_id), Some(false));
    assert!(!view.has_cached_coverage(a_id));
    assert_eq!(view.metrics().counter(REPROJECTIONS), 0);

    layer.set_visible(true);
    assert_eq!(view.is_visible(a_id), Some(true));
    assert!(view.has_cached_coverage(a_id));
    assert_eq!(view.metrics().counter(REPROJECTIONS), 1);
}

#[test]
fn undefined_viewport_skips_coverage_geometry_until_defined() {
    let map = Map::new(Projection::new(EPSG_3857));
    map.set_size([100, 100]);
    map.set_center(Coordinate::new(0.0, 0.0));
    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());

    let a = Attribution::new("lonlat", Projection::new(EPSG_4326))
        .with_coverage_areas(vec![region(-10.0, -10.0, 10.0, 10.0)]);
    let a_id = a.id();
    push(&map, &continuous_layer(vec![a]));
    map.set_center(Coordinate::new(1.0, 1.0));

    assert_eq!(view.is_visible(a_id), Some(false));
    assert!(!view.has_cached_coverage(a_id));
    assert_eq!(view.metrics().counter(REPROJECTIONS), 0);

    map.set_resolution(1.0);
    assert_eq!(view.is_visible(a_id), Some(true));
    assert_eq!(view.metrics().counter(REPROJECTIONS), 1);
}

#[test]
fn detach_releases_every_subscription() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let layer = continuous_layer(vec![mercator("A")]);
    let store = Rc::new(Store::pending(StoreKind::Continuous, Some(vec![mercator("B")])));
    push(&map, &layer);
    push(&map, &Layer::new(Rc::clone(&store)));

    let view = AttributionView::new(Rc::clone(&map), ListSurface::new());
    assert!(map.listener_count() > 0);

    view.detach();
    assert_eq!(map.listener_count(), 0);
    assert_eq!(map.layers().expect("layer collection").listener_count(), 0);
    assert_eq!(layer.listener_count(), 0);
    assert_eq!(store.pending_ready_listeners(), 0);
    assert!(rendered_html(&view).is_empty());

    // Later changes reach nothing.
    map.set_center(Coordinate::new(9.0, 9.0));
    push(&map, &continuous_layer(vec![mercator("C")]));
    assert_eq!(view.element_count(), 0);
    view.detach();
}

#[test]
fn dropping_the_view_unsubscribes_from_the_map() {
    let map = mercator_map((0.0, 0.0), 1.0);
    let layer = continuous_layer(vec![mercator("A")]);
    push(&map, &layer);
    {
        let _view = AttributionView::new(Rc::clone(&map), ListSurface::new());
        assert_eq!(layer.listener_count(), 1);
    }
    assert_eq!(map.listener_count(), 0);
    assert_eq!(layer.listener_count(), 0);
}
