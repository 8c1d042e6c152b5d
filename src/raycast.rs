use std::rc::Rc;

use glimmer_lighting::FovProvider;

use crate::grid::TileGrid;

/// Line-of-sight FOV over a [`TileGrid`].
///
/// A cell is visible when a ray from the source cell's centre to its centre
/// crosses no opaque cell before reaching it; opaque cells themselves can be
/// seen (and lit). The source cell is always reported at distance 0 with
/// full visibility. Distances are Euclidean; visibility is 0 or 1.
pub struct RaycastFov {
    grid: Rc<TileGrid>,
}

impl RaycastFov {
    pub fn new(grid: Rc<TileGrid>) -> Self {
        Self { grid }
    }
}

impl FovProvider for RaycastFov {
    fn compute(&mut self, x: i32, y: i32, range: i32, visit: &mut dyn FnMut(i32, i32, f64, f64)) {
        if !self.grid.in_bounds(x, y) || range < 0 {
            return;
        }
        let max = range as f64;
        let (w, h) = (self.grid.width as i32, self.grid.height as i32);
        let (x0, x1) = (x.saturating_sub(range).max(0), x.saturating_add(range).min(w - 1));
        let (y0, y1) = (y.saturating_sub(range).max(0), y.saturating_add(range).min(h - 1));
        for ty in y0..=y1 {
            for tx in x0..=x1 {
                let (dx, dy) = ((tx - x) as f64, (ty - y) as f64);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > max {
                    continue;
                }
                if line_of_sight(x, y, tx, ty, |cx, cy| self.grid.is_opaque(cx, cy)) {
                    visit(tx, ty, dist, 1.0);
                }
            }
        }
    }
}

#[inline]
fn inv_or_max(v: f64) -> f64 {
    if v.abs() < 1e-12 { f64::MAX } else { 1.0 / v.abs() }
}

/// Walks the cells crossed by the segment between the centres of `(x0, y0)`
/// and `(x1, y1)` (grid DDA). Returns false if an opaque cell is crossed
/// before the target; the endpoints themselves are never tested.
pub fn line_of_sight<F>(x0: i32, y0: i32, x1: i32, y1: i32, mut is_opaque: F) -> bool
where
    F: FnMut(i32, i32) -> bool,
{
    let (dx, dy) = ((x1 - x0) as f64, (y1 - y0) as f64);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-12 {
        return true;
    }
    let (dirx, diry) = (dx / len, dy / len);
    let stepx = (x1 - x0).signum();
    let stepy = (y1 - y0).signum();
    let tdx = inv_or_max(dirx);
    let tdy = inv_or_max(diry);
    // Ray starts at a cell centre, half a cell from the first boundary.
    let mut tmx = if stepx == 0 { f64::MAX } else { 0.5 * tdx };
    let mut tmy = if stepy == 0 { f64::MAX } else { 0.5 * tdy };

    let (mut vx, mut vy) = (x0, y0);
    let steps = (x1 - x0).abs() + (y1 - y0).abs();
    for _ in 0..steps {
        // Once an axis is aligned with the target it no longer steps.
        let step_x = vy == y1 || (vx != x1 && tmx < tmy);
        if step_x {
            vx += stepx;
            tmx += tdx;
        } else {
            vy += stepy;
            tmy += tdy;
        }
        if vx == x1 && vy == y1 {
            return true;
        }
        if is_opaque(vx, vy) {
            return false;
        }
    }
    vx == x1 && vy == y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;

    fn grid(rows: &[&str]) -> Rc<TileGrid> {
        let width = rows[0].len();
        let tiles = rows.iter().flat_map(|r| r.chars()).collect();
        Rc::new(TileGrid::new(width, rows.len(), tiles, vec!['#'], HashMap::new(), 0.0))
    }

    fn visible(fov: &mut RaycastFov, x: i32, y: i32, range: i32) -> HashMap<(i32, i32), f64> {
        let mut out = HashMap::new();
        fov.compute(x, y, range, &mut |vx, vy, d, v| {
            assert_eq!(v, 1.0);
            out.insert((vx, vy), d);
        });
        out
    }

    #[test]
    fn open_room_sees_within_radius() {
        let g = grid(&[".....", ".....", ".....", ".....", "....."]);
        let mut fov = RaycastFov::new(g);
        let seen = visible(&mut fov, 2, 2, 2);
        assert_eq!(seen[&(2, 2)], 0.0);
        assert_eq!(seen[&(4, 2)], 2.0);
        assert!((seen[&(3, 3)] - 2f64.sqrt()).abs() < 1e-12);
        // Corners lie at distance sqrt(8) > 2
        assert!(!seen.contains_key(&(0, 0)));
        assert_eq!(seen.len(), 13);
    }

    #[test]
    fn walls_are_seen_but_block() {
        let g = grid(&["......", "..#...", "......"]);
        let mut fov = RaycastFov::new(g);
        let seen = visible(&mut fov, 0, 1, 5);
        assert!(seen.contains_key(&(1, 1)));
        assert!(seen.contains_key(&(2, 1)), "the wall itself is visible");
        assert!(!seen.contains_key(&(3, 1)));
        assert!(!seen.contains_key(&(5, 1)));
    }

    #[test]
    fn zero_range_reports_only_source() {
        let g = grid(&["...", "..."]);
        let mut fov = RaycastFov::new(g);
        let seen = visible(&mut fov, 1, 1, 0);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[&(1, 1)], 0.0);
        assert!(visible(&mut fov, 7, 7, 3).is_empty());
    }

    #[test]
    fn huge_range_is_clipped_to_grid() {
        let g = grid(&["...", "..."]);
        let mut fov = RaycastFov::new(g);
        let seen = visible(&mut fov, 1, 0, i32::MAX);
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[&(1, 0)], 0.0);
        assert_eq!(seen[&(2, 1)], 2f64.sqrt());
    }

    #[test]
    fn line_of_sight_is_blocked_by_interior_cells_only() {
        let wall = |x: i32, y: i32| (x, y) == (2, 0);
        assert!(!line_of_sight(0, 0, 4, 0, wall));
        assert!(line_of_sight(0, 0, 2, 0, wall));
        assert!(line_of_sight(2, 0, 4, 0, wall));
        assert!(line_of_sight(0, 0, 0, 3, wall));
        assert!(line_of_sight(3, 3, 3, 3, wall));
        // Diagonal through an opaque cell
        let pillar = |x: i32, y: i32| (x, y) == (2, 2);
        assert!(!line_of_sight(0, 0, 4, 4, pillar));
        assert!(!line_of_sight(0, 4, 4, 0, pillar));
    }
}
