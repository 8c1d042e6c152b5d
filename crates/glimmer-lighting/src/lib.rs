//! Multi-pass 2D lighting: coloured lights projected through a pluggable
//! field-of-view, with optional reflected bounces from lit cells.
#![forbid(unsafe_code)]

mod cache;
mod engine;
mod options;

pub use cache::{CacheStats, FormFactors};
pub use engine::{ComputeStats, LightingEngine};
pub use glimmer_color::{ColorError, Rgb};
pub use options::LightingOptions;

/// Grid coordinate used as the key of every per-cell map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
}

impl CellKey {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for CellKey {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Field-of-view collaborator.
///
/// `compute` must call `visit(x, y, distance, visibility)` for every cell
/// within `range` of `(x, y)` whose visibility is non-zero. Visibility is in
/// `[0, 1]`; the distance metric, report order and whether the source cell
/// itself is reported are up to the implementation.
pub trait FovProvider {
    fn compute(&mut self, x: i32, y: i32, range: i32, visit: &mut dyn FnMut(i32, i32, f64, f64));
}

impl<F> FovProvider for F
where
    F: FnMut(i32, i32, i32, &mut dyn FnMut(i32, i32, f64, f64)),
{
    #[inline]
    fn compute(&mut self, x: i32, y: i32, range: i32, visit: &mut dyn FnMut(i32, i32, f64, f64)) {
        self(x, y, range, visit)
    }
}

/// Fraction of incident light a cell re-emits, in `[0, 1]`. Must be
/// deterministic; the engine queries each cell at most once per cache
/// lifetime.
pub trait ReflectivityProvider {
    fn reflectivity(&self, x: i32, y: i32) -> f64;
}

impl<F> ReflectivityProvider for F
where
    F: Fn(i32, i32) -> f64,
{
    #[inline]
    fn reflectivity(&self, x: i32, y: i32) -> f64 {
        self(x, y)
    }
}

/// Colour argument of [`LightingEngine::set_light`].
#[derive(Clone, Debug, PartialEq)]
pub enum LightSource {
    /// Anything `glimmer_color::from_string` accepts.
    Named(String),
    Rgb(Rgb),
    /// Removes the light.
    None,
}

impl LightSource {
    /// Resolves to a triplet; `Ok(None)` means "remove".
    pub fn resolve(&self) -> Result<Option<Rgb>, ColorError> {
        match self {
            LightSource::Named(name) => glimmer_color::from_string(name).map(Some),
            LightSource::Rgb(c) => Ok(Some(*c)),
            LightSource::None => Ok(None),
        }
    }
}

impl From<&str> for LightSource {
    fn from(s: &str) -> Self {
        LightSource::Named(s.to_string())
    }
}

impl From<String> for LightSource {
    fn from(s: String) -> Self {
        LightSource::Named(s)
    }
}

impl From<Rgb> for LightSource {
    fn from(c: Rgb) -> Self {
        LightSource::Rgb(c)
    }
}

impl From<[u32; 3]> for LightSource {
    fn from(c: [u32; 3]) -> Self {
        LightSource::Rgb(Rgb::from_array(c))
    }
}

impl From<Option<Rgb>> for LightSource {
    fn from(c: Option<Rgb>) -> Self {
        c.map_or(LightSource::None, LightSource::Rgb)
    }
}
