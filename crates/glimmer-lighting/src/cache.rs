use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::{CellKey, FovProvider, ReflectivityProvider};

/// Visible cell -> form factor in `(0, 1]` for one source cell.
pub type FormFactors = HashMap<CellKey, f64>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub fov_entries: usize,
    pub fov_hits: u64,
    pub fov_misses: u64,
    pub reflectivity_entries: usize,
    pub reflectivity_hits: u64,
    pub reflectivity_misses: u64,
}

#[derive(Default)]
pub(crate) struct FovCache {
    entries: HashMap<CellKey, FormFactors>,
    hits: u64,
    misses: u64,
}

impl FovCache {
    /// Form factors for `source`, querying `fov` on first use.
    pub(crate) fn form_factors(
        &mut self,
        source: CellKey,
        range: i32,
        fov: &mut dyn FovProvider,
    ) -> &FormFactors {
        match self.entries.entry(source) {
            Entry::Occupied(e) => {
                self.hits += 1;
                e.into_mut()
            }
            Entry::Vacant(v) => {
                self.misses += 1;
                let factors = form_factors_for(source, range, fov);
                log::trace!(
                    target: "lighting",
                    "fov cache miss ({}, {}) visible={}",
                    source.x,
                    source.y,
                    factors.len()
                );
                v.insert(factors)
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Runs the FOV once and keeps every cell with a positive form factor,
/// `visibility * (1 - distance / range)`.
pub(crate) fn form_factors_for(source: CellKey, range: i32, fov: &mut dyn FovProvider) -> FormFactors {
    let mut out = FormFactors::new();
    fov.compute(source.x, source.y, range, &mut |x, y, distance, visibility| {
        let ff = visibility * attenuation(distance, range);
        // Zero (and NaN) factors are never stored.
        if ff > 0.0 {
            out.insert(CellKey::new(x, y), ff);
        }
    });
    out
}

#[inline]
fn attenuation(distance: f64, range: i32) -> f64 {
    if range <= 0 {
        return 0.0;
    }
    1.0 - distance / range as f64
}

#[derive(Default)]
pub(crate) struct ReflectivityCache {
    entries: HashMap<CellKey, f64>,
    hits: u64,
    misses: u64,
}

impl ReflectivityCache {
    pub(crate) fn get(&mut self, cell: CellKey, provider: &dyn ReflectivityProvider) -> f64 {
        match self.entries.entry(cell) {
            Entry::Occupied(e) => {
                self.hits += 1;
                *e.get()
            }
            Entry::Vacant(v) => {
                self.misses += 1;
                *v.insert(provider.reflectivity(cell.x, cell.y))
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

pub(crate) fn stats(fov: &FovCache, refl: &ReflectivityCache) -> CacheStats {
    CacheStats {
        fov_entries: fov.len(),
        fov_hits: fov.hits,
        fov_misses: fov.misses,
        reflectivity_entries: refl.entries.len(),
        reflectivity_hits: refl.hits,
        reflectivity_misses: refl.misses,
    }
}
