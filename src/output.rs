use std::io::{self, Write};

use clap::ValueEnum;
use glimmer_color::Rgb;
use glimmer_lighting::CellKey;
use hashbrown::HashMap;

use crate::grid::TileGrid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Brightness ramp per cell, opaque tiles drawn as themselves.
    Grid,
    /// One `x y r g b` line per lit cell.
    List,
    /// `#rrggbb` per cell, one map row per line.
    Hex,
}

const RAMP: &[u8] = b" .:-=+*%@";

fn shade(c: Rgb) -> char {
    let peak = c.r.max(c.g).max(c.b).min(255) as usize;
    RAMP[peak * (RAMP.len() - 1) / 255] as char
}

pub fn write_lighting<W: Write>(
    out: &mut W,
    format: Format,
    grid: &TileGrid,
    lit: &HashMap<CellKey, Rgb>,
) -> io::Result<()> {
    match format {
        Format::Grid => {
            for y in 0..grid.height as i32 {
                let line: String = (0..grid.width as i32)
                    .map(|x| match grid.tile(x, y) {
                        Some(t) if grid.is_opaque(x, y) => t,
                        _ => shade(lit.get(&CellKey::new(x, y)).copied().unwrap_or_default()),
                    })
                    .collect();
                writeln!(out, "{}", line.trim_end())?;
            }
        }
        Format::List => {
            let mut cells: Vec<_> = lit.iter().map(|(k, c)| (*k, *c)).collect();
            cells.sort_by_key(|(k, _)| (k.y, k.x));
            for (k, c) in cells {
                writeln!(out, "{} {} {} {} {}", k.x, k.y, c.r, c.g, c.b)?;
            }
        }
        Format::Hex => {
            for y in 0..grid.height as i32 {
                let row: Vec<String> = (0..grid.width as i32)
                    .map(|x| match lit.get(&CellKey::new(x, y)) {
                        Some(c) => c.to_hex(),
                        None => "-------".to_string(),
                    })
                    .collect();
                writeln!(out, "{}", row.join(" "))?;
            }
        }
    }
    Ok(())
}
