use hashbrown::HashMap;

/// Character tile map with per-tile opacity and reflectivity.
#[derive(Clone, Debug)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<char>,
    opaque: Vec<char>,
    reflectivity: HashMap<char, f64>,
    default_reflectivity: f64,
}

impl TileGrid {
    pub fn new(
        width: usize,
        height: usize,
        tiles: Vec<char>,
        opaque: Vec<char>,
        reflectivity: HashMap<char, f64>,
        default_reflectivity: f64,
    ) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        Self {
            width,
            height,
            tiles,
            opaque,
            reflectivity,
            default_reflectivity,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<char> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.tiles[self.idx(x as usize, y as usize)])
    }

    /// Out-of-bounds cells block sight.
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_none_or(|t| self.opaque.contains(&t))
    }

    /// Out-of-bounds cells reflect nothing.
    pub fn reflectivity(&self, x: i32, y: i32) -> f64 {
        match self.tile(x, y) {
            Some(t) => self.reflectivity.get(&t).copied().unwrap_or(self.default_reflectivity),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TileGrid {
        let rows = ["#.#", ".,."];
        let tiles = rows.iter().flat_map(|r| r.chars()).collect();
        let mut refl = HashMap::new();
        refl.insert('.', 0.5);
        TileGrid::new(3, 2, tiles, vec!['#'], refl, 0.2)
    }

    #[test]
    fn bounds_and_lookup() {
        let g = sample();
        assert_eq!(g.tile(0, 0), Some('#'));
        assert_eq!(g.tile(1, 1), Some(','));
        assert_eq!(g.tile(3, 0), None);
        assert_eq!(g.tile(-1, 0), None);
    }

    #[test]
    fn opacity_and_reflectivity() {
        let g = sample();
        assert!(g.is_opaque(0, 0));
        assert!(!g.is_opaque(1, 0));
        assert!(g.is_opaque(0, 5));
        assert_eq!(g.reflectivity(1, 0), 0.5);
        assert_eq!(g.reflectivity(1, 1), 0.2);
        assert_eq!(g.reflectivity(9, 9), 0.0);
    }
}
