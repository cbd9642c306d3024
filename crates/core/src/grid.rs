//! Grid module - owns the board cells
//!
//! The grid is a `width x height` array of cells stored flat in row-major order
//! (`y * width + x`). Row `y = 0` is the bottom of the board; gravity pulls tiles
//! toward it. Every accessor is bounds-checked and reports
//! [`BoardError::OutOfBounds`] without touching any cell.

use arrayvec::ArrayVec;

use crate::types::{BoardError, Direction, Pos, TileHandle, TileId, TileKind};

/// A tile living in exactly one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub handle: TileHandle,
}

/// A cell on the board
///
/// - `None`: empty slot (only observable between clearing and refilling)
/// - `Some(Tile)`: occupied slot
pub type Cell = Option<Tile>;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    #[inline(always)]
    fn pos_index(&self, pos: Pos) -> Result<usize, BoardError> {
        self.index(pos.x as i16, pos.y as i16)
            .ok_or(BoardError::OutOfBounds {
                x: pos.x as i16,
                y: pos.y as i16,
            })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u8, u8) {
        (self.width, self.height)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Get cell at (x, y)
    pub fn get(&self, x: i16, y: i16) -> Result<Cell, BoardError> {
        self.index(x, y)
            .map(|idx| self.cells[idx])
            .ok_or(BoardError::OutOfBounds { x, y })
    }

    /// Set cell at (x, y), returning what was there before
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> Result<Cell, BoardError> {
        let idx = self.index(x, y).ok_or(BoardError::OutOfBounds { x, y })?;
        Ok(std::mem::replace(&mut self.cells[idx], cell))
    }

    pub fn at(&self, pos: Pos) -> Result<Cell, BoardError> {
        self.pos_index(pos).map(|idx| self.cells[idx])
    }

    pub fn put(&mut self, pos: Pos, cell: Cell) -> Result<Cell, BoardError> {
        let idx = self.pos_index(pos)?;
        Ok(std::mem::replace(&mut self.cells[idx], cell))
    }

    /// Remove and return the tile at `pos`
    pub fn take(&mut self, pos: Pos) -> Result<Cell, BoardError> {
        self.put(pos, None)
    }

    /// Kind at `pos`; `None` for empty cells and positions off the board.
    ///
    /// Match scans lean on this: running off the board and hitting a hole both
    /// end a run.
    #[inline]
    pub fn kind_at(&self, pos: Pos) -> Option<TileKind> {
        self.index(pos.x as i16, pos.y as i16)
            .and_then(|idx| self.cells[idx])
            .map(|tile| tile.kind)
    }

    /// Exchange the contents of two cells. Both must be on the board.
    pub fn swap_cells(&mut self, a: Pos, b: Pos) -> Result<(), BoardError> {
        let ia = self.pos_index(a)?;
        let ib = self.pos_index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// On-board orthogonal neighbours of `pos`
    pub fn neighbours(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            if let Some(p) = pos.step(dir) {
                if self.contains(p) {
                    out.push(p);
                }
            }
        }
        out
    }

    /// All positions in raster order: `y` ascending, then `x` ascending
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    /// Flat index for `pos`, used by per-pass scratch buffers
    #[inline(always)]
    pub(crate) fn flat_index(&self, pos: Pos) -> usize {
        debug_assert!(self.contains(pos), "{:?} is off the board", pos);
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Exchange two cells already known to be on the board
    #[inline(always)]
    pub(crate) fn exchange(&mut self, a: Pos, b: Pos) {
        let (ia, ib) = (self.flat_index(a), self.flat_index(b));
        self.cells.swap(ia, ib);
    }

    /// Occupy a cell already known to be on the board
    #[inline(always)]
    pub(crate) fn fill(&mut self, pos: Pos, tile: Tile) {
        let idx = self.flat_index(pos);
        self.cells[idx] = Some(tile);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate occupied cells with their positions
    pub fn tiles(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.positions()
            .zip(self.cells.iter())
            .filter_map(|(pos, cell)| cell.map(|tile| (pos, tile)))
    }

    /// Largest tile id on the board, if any
    pub fn max_tile_id(&self) -> Option<TileId> {
        self.cells.iter().flatten().map(|t| t.id).max()
    }

    /// Build a grid from letter rows listed **top row first**, the way a board
    /// reads on screen. `.` is an empty cell; letters follow
    /// [`TileKind::letter`]. Tile ids and handles are assigned in raster order
    /// starting at 1.
    ///
    /// ```
    /// use gem_cascade_core::Grid;
    /// use gem_cascade_core::types::{Pos, TileKind};
    ///
    /// let grid = Grid::from_letters(&["SB.", "EEH"]).unwrap();
    /// assert_eq!(grid.dimensions(), (3, 2));
    /// assert_eq!(grid.kind_at(Pos::new(0, 0)), Some(TileKind::Estus));
    /// assert_eq!(grid.kind_at(Pos::new(2, 1)), None);
    /// ```
    pub fn from_letters(rows: &[&str]) -> Option<Self> {
        let height = u8::try_from(rows.len()).ok()?;
        let width = u8::try_from(rows.first().map(|r| r.chars().count()).unwrap_or(0)).ok()?;
        let mut grid = Grid::new(width, height);
        let mut next_id = 1u64;

        for (row_from_top, row) in rows.iter().enumerate() {
            if row.chars().count() != width as usize {
                return None;
            }
            let y = height as usize - 1 - row_from_top;
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    c => {
                        let kind = TileKind::ALL.into_iter().find(|k| k.letter() == c)?;
                        Some(Tile {
                            id: TileId(0),
                            kind,
                            handle: TileHandle(0),
                        })
                    }
                };
                grid.cells[y * width as usize + x] = cell;
            }
        }

        // Ids follow raster order rather than the row order above.
        for tile in grid.cells.iter_mut().flatten() {
            tile.id = TileId(next_id);
            tile.handle = TileHandle(next_id);
            next_id += 1;
        }
        Some(grid)
    }

    /// Render as letter rows, top row first (inverse of [`Grid::from_letters`])
    pub fn to_letters(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        self.kind_at(Pos::new(x, y))
                            .map(|k| k.letter())
                            .unwrap_or('.')
                    })
                    .collect()
            })
            .collect()
    }

    /// Kinds per column, bottom to top
    pub fn column_kinds(&self, x: u8) -> Vec<Option<TileKind>> {
        (0..self.height)
            .map(|y| self.kind_at(Pos::new(x, y)))
            .collect()
    }
}
