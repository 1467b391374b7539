//! JSON scene files replayed through an `AttributionView`.
//!
//! A scene describes the map (projection, size, initial view), its layers
//! with their stores and attributions, and a list of steps that mutate the
//! map the way an application would.

use std::collections::BTreeMap;
use std::rc::Rc;

use attribution::{AttributionView, ListSurface};
use foundation::Extent;
use foundation::math::{Coordinate, EPSG_3857, Projection, ProjectionError, Projections};
use layers::{
    Attribution, ContinuousCoverageArea, CoverageArea, Layer, LayerCollection, Store, StoreKind,
    TileCoverageArea, TileGrid, TileGridError,
};
use map::Map;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const DEFAULT_MAX_LEVEL: u32 = 18;

fn default_projection() -> String {
    EPSG_3857.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default = "default_projection")]
    pub projection: String,
    #[serde(default)]
    pub size: Option<[u32; 2]>,
    #[serde(default)]
    pub center: Option<[f64; 2]>,
    #[serde(default)]
    pub resolution: Option<f64>,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub store: StoreSpec,
    #[serde(default = "default_true")]
    pub ready: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Absent means the store carries no attribution metadata.
    #[serde(default)]
    pub attributions: Option<Vec<AttributionSpec>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreSpec {
    /// Empty `resolutions` means the standard spherical mercator pyramid.
    Tile {
        #[serde(default)]
        resolutions: Vec<f64>,
        #[serde(default)]
        max_level: Option<u32>,
    },
    Continuous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionSpec {
    pub html: String,
    #[serde(default = "default_projection")]
    pub projection: String,
    #[serde(default)]
    pub coverage: Option<Vec<CoverageSpec>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoverageSpec {
    Continuous {
        extent: [f64; 4],
        #[serde(default)]
        min_resolution: Option<f64>,
        #[serde(default)]
        max_resolution: Option<f64>,
    },
    Tile {
        extent: [f64; 4],
        min_level: u32,
        max_level: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    SetCenter { center: [f64; 2] },
    SetResolution { resolution: f64 },
    SetSize { size: [u32; 2] },
    SetLayerVisible { layer: String, visible: bool },
    SetStoreReady { layer: String },
    /// Appends when `index` is absent.
    InsertLayer {
        #[serde(default)]
        index: Option<usize>,
        layer: LayerSpec,
    },
    RemoveLayer { layer: String },
    ReplaceLayer { layer: String, with: LayerSpec },
    SetProjection { projection: String },
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Step::SetCenter { .. } => "set_center",
            Step::SetResolution { .. } => "set_resolution",
            Step::SetSize { .. } => "set_size",
            Step::SetLayerVisible { .. } => "set_layer_visible",
            Step::SetStoreReady { .. } => "set_store_ready",
            Step::InsertLayer { .. } => "insert_layer",
            Step::RemoveLayer { .. } => "remove_layer",
            Step::ReplaceLayer { .. } => "replace_layer",
            Step::SetProjection { .. } => "set_projection",
        }
    }
}

#[derive(Debug)]
pub enum SceneError {
    Json(serde_json::Error),
    Projection(ProjectionError),
    TileGrid {
        layer: String,
        source: TileGridError,
    },
    UnknownLayer(String),
    DuplicateLayer(String),
    NotInCollection(String),
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Json(e) => write!(f, "invalid scene json: {e}"),
            SceneError::Projection(e) => write!(f, "{e}"),
            SceneError::TileGrid { layer, source } => {
                write!(f, "layer {layer}: invalid tile grid: {source}")
            }
            SceneError::UnknownLayer(name) => write!(f, "unknown layer: {name}"),
            SceneError::DuplicateLayer(name) => write!(f, "duplicate layer name: {name}"),
            SceneError::NotInCollection(name) => {
                write!(f, "layer {name} is not in the map's layer collection")
            }
            SceneError::IndexOutOfBounds { index, len } => {
                write!(f, "insert index {index} out of bounds for {len} layers")
            }
        }
    }
}

impl std::error::Error for SceneError {}

impl From<ProjectionError> for SceneError {
    fn from(e: ProjectionError) -> Self {
        SceneError::Projection(e)
    }
}

pub fn parse_scene(json: &str) -> Result<SceneFile, SceneError> {
    serde_json::from_str(json).map_err(SceneError::Json)
}

/// Attribution list state after one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: String,
    pub visible: Vec<String>,
    pub rendered: Vec<String>,
}

/// A live map built from a `SceneFile`, observed by an attribution view.
#[derive(Debug)]
pub struct Scene {
    map: Rc<Map>,
    projections: Rc<Projections>,
    view: AttributionView<ListSurface>,
    layers: BTreeMap<String, Rc<Layer>>,
}

impl Scene {
    pub fn build(file: &SceneFile) -> Result<Self, SceneError> {
        let projections = Rc::new(Projections::with_defaults());
        let map = Map::new(projections.get(&file.projection)?);
        if let Some(size) = file.size {
            map.set_size(size);
        }
        if let Some([x, y]) = file.center {
            map.set_center(Coordinate::new(x, y));
        }
        if let Some(resolution) = file.resolution {
            map.set_resolution(resolution);
        }

        let mut scene = Self {
            view: AttributionView::with_projections(
                Rc::clone(&map),
                ListSurface::new(),
                Rc::clone(&projections),
            ),
            map,
            projections,
            layers: BTreeMap::new(),
        };
        for spec in &file.layers {
            let layer = scene.make_layer(spec)?;
            scene.collection().push(layer);
        }
        info!(layers = file.layers.len(), "scene built");
        Ok(scene)
    }

    pub fn map(&self) -> &Rc<Map> {
        &self.map
    }

    pub fn view(&self) -> &AttributionView<ListSurface> {
        &self.view
    }

    pub fn layer(&self, name: &str) -> Option<&Rc<Layer>> {
        self.layers.get(name)
    }

    pub fn apply(&mut self, step: &Step) -> Result<(), SceneError> {
        debug!(op = step.op(), "applying step");
        match step {
            Step::SetCenter { center: [x, y] } => self.map.set_center(Coordinate::new(*x, *y)),
            Step::SetResolution { resolution } => self.map.set_resolution(*resolution),
            Step::SetSize { size } => self.map.set_size(*size),
            Step::SetLayerVisible { layer, visible } => self.named(layer)?.set_visible(*visible),
            Step::SetStoreReady { layer } => self.named(layer)?.store().set_ready(),
            Step::InsertLayer { index, layer } => {
                let collection = self.collection();
                let index = index.unwrap_or(collection.len());
                if index > collection.len() {
                    return Err(SceneError::IndexOutOfBounds {
                        index,
                        len: collection.len(),
                    });
                }
                let layer = self.make_layer(layer)?;
                collection.insert_at(index, layer);
            }
            Step::RemoveLayer { layer } => {
                let index = self.position(layer)?;
                self.collection().remove_at(index);
            }
            Step::ReplaceLayer { layer, with } => {
                let index = self.position(layer)?;
                let replacement = self.make_layer(with)?;
                self.collection().replace_at(index, replacement);
            }
            Step::SetProjection { projection } => {
                self.map.set_projection(self.projections.get(projection)?);
            }
        }
        Ok(())
    }

    pub fn report(&self, step: impl Into<String>) -> StepReport {
        self.view.with_surface(|s| StepReport {
            step: step.into(),
            visible: s.visible_html(),
            rendered: s.rendered_html(),
        })
    }

    fn collection(&mut self) -> Rc<LayerCollection> {
        if let Some(layers) = self.map.layers() {
            return layers;
        }
        let layers = LayerCollection::new();
        self.map.set_layers(Some(Rc::clone(&layers)));
        layers
    }

    fn named(&self, name: &str) -> Result<&Rc<Layer>, SceneError> {
        self.layers
            .get(name)
            .ok_or_else(|| SceneError::UnknownLayer(name.to_string()))
    }

    fn position(&mut self, name: &str) -> Result<usize, SceneError> {
        let id = self.named(name)?.id();
        self.collection()
            .to_vec()
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| SceneError::NotInCollection(name.to_string()))
    }

    fn make_layer(&mut self, spec: &LayerSpec) -> Result<Rc<Layer>, SceneError> {
        if self.layers.contains_key(&spec.name) {
            return Err(SceneError::DuplicateLayer(spec.name.clone()));
        }
        let kind = store_kind(spec)?;
        let attributions = match &spec.attributions {
            Some(list) => Some(
                list.iter()
                    .map(|a| self.make_attribution(a))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        let store = if spec.ready {
            Store::new(kind, attributions)
        } else {
            Store::pending(kind, attributions)
        };
        let layer = Layer::new(Rc::new(store));
        layer.set_visible(spec.visible);
        self.layers.insert(spec.name.clone(), Rc::clone(&layer));
        Ok(layer)
    }

    fn make_attribution(&self, spec: &AttributionSpec) -> Result<Attribution, SceneError> {
        let projection: Projection = self.projections.get(&spec.projection)?;
        let attribution = Attribution::new(spec.html.clone(), projection);
        Ok(match &spec.coverage {
            Some(areas) => {
                attribution.with_coverage_areas(areas.iter().map(coverage_area).collect())
            }
            None => attribution,
        })
    }
}

fn store_kind(spec: &LayerSpec) -> Result<StoreKind, SceneError> {
    match &spec.store {
        StoreSpec::Continuous => Ok(StoreKind::Continuous),
        StoreSpec::Tile {
            resolutions,
            max_level,
        } => {
            let grid = if resolutions.is_empty() {
                TileGrid::web_mercator(max_level.unwrap_or(DEFAULT_MAX_LEVEL))
            } else {
                TileGrid::new(resolutions.clone())
            };
            grid.map(StoreKind::Tile).map_err(|source| SceneError::TileGrid {
                layer: spec.name.clone(),
                source,
            })
        }
    }
}

fn coverage_area(spec: &CoverageSpec) -> CoverageArea {
    match spec {
        CoverageSpec::Continuous {
            extent,
            min_resolution,
            max_resolution,
        } => ContinuousCoverageArea::new(Extent::from(*extent))
            .with_resolution_range(*min_resolution, *max_resolution)
            .into(),
        CoverageSpec::Tile {
            extent,
            min_level,
            max_level,
        } => TileCoverageArea::new(Extent::from(*extent), *min_level, *max_level).into(),
    }
}

/// Builds the scene and applies every step, reporting after each one.
///
/// The first report, labelled `initial`, reflects the scene before any step.
pub fn replay(file: &SceneFile) -> Result<Vec<StepReport>, SceneError> {
    let mut scene = Scene::build(file)?;
    let mut reports = vec![scene.report("initial")];
    for (i, step) in file.steps.iter().enumerate() {
        scene.apply(step)?;
        reports.push(scene.report(format!("{}: {}", i + 1, step.op())));
    }
    Ok(reports)
}
