use hashbrown::{HashMap, HashSet};

use glimmer_color::{ColorError, Rgb};

use crate::cache::{self, CacheStats, FovCache, ReflectivityCache};
use crate::{CellKey, FovProvider, LightSource, LightingOptions, ReflectivityProvider};

/// Counters for one `compute` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComputeStats {
    pub passes_run: u32,
    /// Emitters summed over all passes.
    pub emitters: usize,
    pub lit_cells: usize,
}

/// Owns the light registry and the FOV and reflectivity caches.
///
/// Caches persist across `compute` calls. They are cleared by [`reset`],
/// by a `range` change in [`set_options`], and (FOV only) by [`set_fov`].
/// The engine is single-threaded; callers sharing one instance must
/// serialize all `&mut self` calls.
///
/// [`reset`]: LightingEngine::reset
/// [`set_options`]: LightingEngine::set_options
/// [`set_fov`]: LightingEngine::set_fov
pub struct LightingEngine {
    options: LightingOptions,
    reflectivity: Box<dyn ReflectivityProvider>,
    fov: Box<dyn FovProvider>,
    lights: HashMap<CellKey, Rgb>,
    reflectivity_cache: ReflectivityCache,
    fov_cache: FovCache,
}

impl LightingEngine {
    pub fn new(
        reflectivity: impl ReflectivityProvider + 'static,
        fov: impl FovProvider + 'static,
        options: LightingOptions,
    ) -> Self {
        Self {
            options,
            reflectivity: Box::new(reflectivity),
            fov: Box::new(fov),
            lights: HashMap::new(),
            reflectivity_cache: ReflectivityCache::default(),
            fov_cache: FovCache::default(),
        }
    }

    #[inline]
    pub fn options(&self) -> LightingOptions {
        self.options
    }

    /// Replaces the options. A different `range` invalidates both caches.
    pub fn set_options(&mut self, options: LightingOptions) {
        let range_changed = options.range != self.options.range;
        self.options = options;
        if range_changed {
            log::debug!(target: "lighting", "range changed to {}; resetting caches", options.range);
            self.reset();
        }
    }

    /// Replaces the FOV provider and drops the FOV cache.
    pub fn set_fov(&mut self, fov: impl FovProvider + 'static) {
        self.fov = Box::new(fov);
        self.fov_cache.clear();
        log::debug!(target: "lighting", "fov provider replaced; fov cache cleared");
    }

    /// Registers, replaces or (with [`LightSource::None`]) removes the light
    /// at `(x, y)`. On a colour error the registry is left untouched.
    pub fn set_light(&mut self, x: i32, y: i32, color: impl Into<LightSource>) -> Result<(), ColorError> {
        let key = CellKey::new(x, y);
        match color.into().resolve()? {
            Some(c) => {
                self.lights.insert(key, c);
            }
            None => {
                self.lights.remove(&key);
            }
        }
        Ok(())
    }

    /// Registers an already resolved colour, returning the one it replaced.
    pub fn insert_light(&mut self, x: i32, y: i32, color: Rgb) -> Option<Rgb> {
        self.lights.insert(CellKey::new(x, y), color)
    }

    pub fn remove_light(&mut self, x: i32, y: i32) -> Option<Rgb> {
        self.lights.remove(&CellKey::new(x, y))
    }

    pub fn light(&self, x: i32, y: i32) -> Option<Rgb> {
        self.lights.get(&CellKey::new(x, y)).copied()
    }

    pub fn lights(&self) -> impl Iterator<Item = (CellKey, Rgb)> + '_ {
        self.lights.iter().map(|(k, c)| (*k, *c))
    }

    #[inline]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    /// Clears both caches. Lights are kept.
    pub fn reset(&mut self) {
        self.reflectivity_cache.clear();
        self.fov_cache.clear();
        log::debug!(target: "lighting", "caches reset");
    }

    pub fn cache_stats(&self) -> CacheStats {
        cache::stats(&self.fov_cache, &self.reflectivity_cache)
    }

    /// Runs all passes and calls `callback(x, y, color)` once for every lit
    /// cell, in no particular order.
    pub fn compute<F>(&mut self, mut callback: F) -> ComputeStats
    where
        F: FnMut(i32, i32, Rgb),
    {
        let (lit, stats) = self.propagate();
        for (cell, color) in &lit {
            callback(cell.x, cell.y, *color);
        }
        stats
    }

    /// Same as [`compute`](Self::compute) but returns the lit cells.
    pub fn compute_map(&mut self) -> HashMap<CellKey, Rgb> {
        self.propagate().0
    }

    fn propagate(&mut self) -> (HashMap<CellKey, Rgb>, ComputeStats) {
        let passes = self.options.passes;
        let mut stats = ComputeStats::default();
        let mut lit: HashMap<CellKey, Rgb> = HashMap::new();
        let mut done: HashSet<CellKey> = HashSet::new();

        // Copy into fresh triplets; the registry is never touched by emission.
        let mut emitting: HashMap<CellKey, Rgb> = self
            .lights
            .iter()
            .map(|(cell, color)| {
                let mut seed = Rgb::ZERO;
                glimmer_color::add(&mut seed, *color);
                (*cell, seed)
            })
            .collect();

        for pass in 0..passes {
            self.emit_light(&emitting, &mut lit, &mut done);
            stats.passes_run += 1;
            stats.emitters += emitting.len();
            log::debug!(
                target: "lighting",
                "pass {}/{} emitters={} lit={}",
                pass + 1,
                passes,
                emitting.len(),
                lit.len()
            );
            if pass + 1 == passes {
                break;
            }
            emitting = self.compute_emitters(&lit, &done);
        }

        stats.lit_cells = lit.len();
        log::debug!(
            target: "lighting",
            "compute done passes={} emitters={} lit={}",
            stats.passes_run,
            stats.emitters,
            stats.lit_cells
        );
        (lit, stats)
    }

    /// Projects every emitter through its cached form factors into `lit`.
    fn emit_light(
        &mut self,
        emitting: &HashMap<CellKey, Rgb>,
        lit: &mut HashMap<CellKey, Rgb>,
        done: &mut HashSet<CellKey>,
    ) {
        let range = self.options.range;
        for (&source, &color) in emitting {
            let factors = self.fov_cache.form_factors(source, range, &mut *self.fov);
            for (&cell, &ff) in factors {
                *lit.entry(cell).or_insert(Rgb::ZERO) += color.scaled(ff);
            }
            done.insert(source);
        }
    }

    /// Picks next-pass emitters among lit cells that have not emitted yet.
    fn compute_emitters(
        &mut self,
        lit: &HashMap<CellKey, Rgb>,
        done: &HashSet<CellKey>,
    ) -> HashMap<CellKey, Rgb> {
        let threshold = self.options.emission_threshold;
        let mut next = HashMap::new();
        for (&cell, &color) in lit {
            if done.contains(&cell) {
                continue;
            }
            let reflectivity = self.reflectivity_cache.get(cell, &*self.reflectivity);
            if reflectivity == 0.0 {
                continue;
            }
            let emission = color.scaled(reflectivity);
            if emission.sum() as f64 > threshold {
                next.insert(cell, emission);
            }
        }
        next
    }
}
