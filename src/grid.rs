use serde::{Deserialize, Serialize};

/// Cardinal movement direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Polling order used when several directions are held at once.
    pub const PRIORITY: [Direction; 4] =
        [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    /// Unit cell delta `(dx, dy)`; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Discrete cell coordinates on the movement grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Board dimensions in cells plus the pixel edge of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
}

impl GridBounds {
    pub const fn new(width: u32, height: u32, tile_size: u32) -> Self {
        Self { width, height, tile_size }
    }

    pub fn contains(&self, cell: GridPosition) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Clamp `cell` into the board. A zero-sized axis clamps to 0.
    pub fn clamp(&self, cell: GridPosition) -> GridPosition {
        GridPosition {
            x: cell.x.min(self.width.saturating_sub(1)),
            y: cell.y.min(self.height.saturating_sub(1)),
        }
    }

    /// One step from `cell` in `direction`, clamped at the edges.
    ///
    /// Stepping into a wall leaves that axis unchanged; it never wraps.
    pub fn step(&self, cell: GridPosition, direction: Direction) -> GridPosition {
        let (dx, dy) = direction.delta();
        let x = (cell.x as i64 + dx as i64).clamp(0, self.width.saturating_sub(1) as i64);
        let y = (cell.y as i64 + dy as i64).clamp(0, self.height.saturating_sub(1) as i64);
        GridPosition { x: x as u32, y: y as u32 }
    }

    /// Pixel centre of `cell`: `cell * tile + tile / 2` on both axes.
    pub fn project(&self, cell: GridPosition) -> [f32; 2] {
        let tile = self.tile_size as f32;
        [
            cell.x as f32 * tile + tile / 2.0,
            cell.y as f32 * tile + tile / 2.0,
        ]
    }

    /// Cell under the pixel `(px, py)`, or `None` outside the board.
    pub fn cell_at(&self, px: f32, py: f32) -> Option<GridPosition> {
        if self.tile_size == 0 || px < 0.0 || py < 0.0 {
            return None;
        }
        let tile = self.tile_size as f32;
        let cell = GridPosition { x: (px / tile) as u32, y: (py / tile) as u32 };
        self.contains(cell).then_some(cell)
    }

    /// Board size in pixels, saturating at `u32::MAX`.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.saturating_mul(self.tile_size), self.height.saturating_mul(self.tile_size))
    }

    /// Every cell whose coordinates keep at least `margin` cells from each edge.
    pub fn inner_cells(&self, margin: u32) -> Vec<GridPosition> {
        let x_end = self.width.saturating_sub(margin);
        let y_end = self.height.saturating_sub(margin);
        let mut cells = Vec::new();
        for y in margin..y_end {
            for x in margin..x_end {
                cells.push(GridPosition { x, y });
            }
        }
        cells
    }
}
