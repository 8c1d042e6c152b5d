use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use glimmer_color::{ColorError, Rgb};
use glimmer_lighting::{LightSource, LightingEngine, LightingOptions};
use hashbrown::HashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::grid::TileGrid;
use crate::raycast::RaycastFov;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("map has no rows")]
    EmptyMap,
    #[error("map row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("reflectivity key `{0}` must be a single tile character")]
    BadTileKey(String),
    #[error("light at ({x}, {y}) is outside the map")]
    LightOutOfBounds { x: i32, y: i32 },
    #[error("light at ({x}, {y}): {source}")]
    BadLightColor {
        x: i32,
        y: i32,
        #[source]
        source: ColorError,
    },
}

// Top-level scene file
#[derive(Deserialize, Debug)]
pub struct SceneConfig {
    #[serde(default)]
    pub lighting: LightingOptions,
    pub map: MapConfig,
    #[serde(default)]
    pub lights: Vec<LightDef>,
}

#[derive(Deserialize, Debug)]
pub struct MapConfig {
    pub rows: Vec<String>,
    #[serde(default = "default_opaque")]
    pub opaque: String,
    #[serde(default)]
    pub reflectivity: BTreeMap<String, f64>,
    #[serde(default)]
    pub default_reflectivity: f64,
}

fn default_opaque() -> String {
    "#".into()
}

#[derive(Deserialize, Debug, Clone)]
pub struct LightDef {
    pub x: i32,
    pub y: i32,
    pub color: ColorDef,
}

// Light colour is either a colour string or an [r, g, b] array
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ColorDef {
    Name(String),
    Rgb([u32; 3]),
}

impl From<ColorDef> for LightSource {
    fn from(c: ColorDef) -> Self {
        match c {
            ColorDef::Name(s) => LightSource::Named(s),
            ColorDef::Rgb(c) => LightSource::Rgb(Rgb::from_array(c)),
        }
    }
}

/// A validated scene: tile grid, resolved lights and lighting options.
#[derive(Clone, Debug)]
pub struct Scene {
    pub grid: Rc<TileGrid>,
    pub lights: Vec<(i32, i32, Rgb)>,
    pub options: LightingOptions,
}

impl Scene {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SceneError> {
        let cfg: SceneConfig = toml::from_str(text)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: SceneConfig) -> Result<Self, SceneError> {
        let grid = build_grid(&cfg.map)?;
        let mut lights = Vec::with_capacity(cfg.lights.len());
        for def in cfg.lights {
            let (x, y) = (def.x, def.y);
            if !grid.in_bounds(x, y) {
                return Err(SceneError::LightOutOfBounds { x, y });
            }
            let source: LightSource = def.color.into();
            match source.resolve() {
                Ok(Some(c)) => lights.push((x, y, c)),
                Ok(None) => {}
                Err(source) => return Err(SceneError::BadLightColor { x, y, source }),
            }
        }
        Ok(Self {
            grid: Rc::new(grid),
            lights,
            options: cfg.lighting,
        })
    }

    /// Engine wired to this scene's grid: raycast FOV and per-tile
    /// reflectivity, with every scene light registered.
    pub fn build_engine(&self, options: LightingOptions) -> LightingEngine {
        let grid = Rc::clone(&self.grid);
        let reflectivity = move |x: i32, y: i32| grid.reflectivity(x, y);
        let fov = RaycastFov::new(Rc::clone(&self.grid));
        let mut engine = LightingEngine::new(reflectivity, fov, options);
        for &(x, y, c) in &self.lights {
            engine.insert_light(x, y, c);
        }
        engine
    }
}

fn build_grid(map: &MapConfig) -> Result<TileGrid, SceneError> {
    let width = map.rows.first().map(|r| r.chars().count()).ok_or(SceneError::EmptyMap)?;
    if width == 0 {
        return Err(SceneError::EmptyMap);
    }
    let mut tiles = Vec::with_capacity(width * map.rows.len());
    for (row, line) in map.rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(SceneError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }
        tiles.extend(line.chars());
    }
    let mut reflectivity = HashMap::new();
    for (key, value) in &map.reflectivity {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                reflectivity.insert(c, *value);
            }
            _ => return Err(SceneError::BadTileKey(key.clone())),
        }
    }
    Ok(TileGrid::new(
        width,
        map.rows.len(),
        tiles,
        map.opaque.chars().collect(),
        reflectivity,
        map.default_reflectivity,
    ))
}
