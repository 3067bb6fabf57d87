use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Placement rules for a symbol grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub tile_width: f32,
    pub tile_height: f32,
    /// World position of the top-left corner of cell (0, 0).
    pub origin: Vec2,
}

impl GridSpec {
    pub fn new(tile_width: f32, tile_height: f32) -> Self {
        Self {
            tile_width,
            tile_height,
            origin: Vec2::ZERO,
        }
    }

    /// Top-left world position of a cell.
    pub fn cell_pos(&self, col: usize, row: usize) -> Vec2 {
        self.origin + Vec2::new(col as f32 * self.tile_width, row as f32 * self.tile_height)
    }
}

/// One cell being instantiated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub symbol: char,
    pub col: usize,
    pub row: usize,
    pub pos: Vec2,
}

/// Build one value per non-blank cell by calling `factory`.
///
/// The factory returns `Ok(None)` for symbols it does not know; those cells
/// are skipped. The first factory error aborts the whole grid, so callers
/// never see a partially built level.
pub fn load_grid<T, E, S>(
    rows: &[S],
    spec: &GridSpec,
    mut factory: impl FnMut(Cell) -> Result<Option<T>, E>,
) -> Result<Vec<T>, E>
where
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        for (col, symbol) in line.as_ref().chars().enumerate() {
            if symbol == ' ' {
                continue;
            }
            let cell = Cell {
                symbol,
                col,
                row,
                pos: spec.cell_pos(col, row),
            };
            if let Some(value) = factory(cell)? {
                out.push(value);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_known_symbols_on_grid() {
        let rows = ["= $", " %="];
        let spec = GridSpec::new(32.0, 32.0);
        let cells: Vec<Cell> = load_grid(&rows, &spec, |cell| {
            Ok::<_, ()>(matches!(cell.symbol, '=' | '%').then_some(cell))
        })
        .unwrap();
        let placed: Vec<(char, Vec2)> = cells.iter().map(|c| (c.symbol, c.pos)).collect();
        assert_eq!(placed, vec![
            ('=', Vec2::new(0.0, 0.0)),
            ('%', Vec2::new(32.0, 32.0)),
            ('=', Vec2::new(64.0, 32.0)),
        ]);
    }

    #[test]
    fn factory_error_aborts() {
        let rows = ["ab"];
        let spec = GridSpec::new(10.0, 10.0);
        let result: Result<Vec<char>, String> = load_grid(&rows, &spec, |cell| {
            if cell.symbol == 'b' {
                Err("missing sprite".to_string())
            } else {
                Ok(Some(cell.symbol))
            }
        });
        assert_eq!(result, Err("missing sprite".to_string()));
    }

    #[test]
    fn origin_offsets_cells() {
        let spec = GridSpec {
            origin: Vec2::new(5.0, 7.0),
            ..GridSpec::new(16.0, 8.0)
        };
        assert_eq!(spec.cell_pos(2, 3), Vec2::new(37.0, 31.0));
    }
}
