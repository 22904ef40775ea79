//! Lock-and-key maze generation.
//!
//! The maze is carved as a randomized depth-first spanning tree. Every dead
//! end the traversal hits (other than the very last cell it visits) receives
//! a key, and the next edge carved after that dead end becomes a door for
//! that key. Because the key's cell is always visited before the gated edge
//! is carved, every maze can be solved by sweeping dead ends for keys.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use chatmaze_core::player::Direction;

pub const TOP_WALL: u8 = 1;
pub const RIGHT_WALL: u8 = 2;
pub const BOTTOM_WALL: u8 = 4;
pub const LEFT_WALL: u8 = 8;
pub const ALL_WALLS: u8 = TOP_WALL | RIGHT_WALL | BOTTOM_WALL | LEFT_WALL;

/// Identifier shared by a key and the door it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(pub u32);

/// Wall bit for one side of a cell.
pub fn wall_bit(side: Direction) -> u8 {
    match side {
        Direction::Up => TOP_WALL,
        Direction::Right => RIGHT_WALL,
        Direction::Down => BOTTOM_WALL,
        Direction::Left => LEFT_WALL,
    }
}

/// One grid position of the maze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeCell {
    pub row: u32,
    pub column: u32,
    /// Bit set = wall present. See [`TOP_WALL`] and friends.
    pub walls: u8,
    /// Door per side, indexed by [`Direction::index`].
    pub doors: [Option<KeyId>; 4],
    pub key: Option<KeyId>,
    /// Depth of the parent cell in carving order. Metadata only.
    pub distance: u32,
    /// Last cell visited by the traversal; the coin spawns here.
    pub is_last: bool,
}

impl MazeCell {
    fn new(row: u32, column: u32) -> Self {
        Self {
            row,
            column,
            walls: ALL_WALLS,
            doors: [None; 4],
            key: None,
            distance: 0,
            is_last: false,
        }
    }

    fn reset(&mut self) {
        self.walls = ALL_WALLS;
        self.doors = [None; 4];
        self.key = None;
        self.distance = 0;
        self.is_last = false;
    }

    pub fn has_wall(&self, side: Direction) -> bool {
        self.walls & wall_bit(side) != 0
    }

    pub fn door(&self, side: Direction) -> Option<KeyId> {
        self.doors[side.index()]
    }

    /// Open wall and no door on this side.
    pub fn can_pass(&self, side: Direction) -> bool {
        !self.has_wall(side) && self.door(side).is_none()
    }

    /// Number of open walls, i.e. the cell's degree in the spanning tree.
    pub fn open_sides(&self) -> usize {
        Direction::ALL
            .iter()
            .filter(|&&side| !self.has_wall(side))
            .count()
    }
}

/// Explicit-stack frame for the depth-first carve.
struct Frame {
    index: usize,
    row: u32,
    column: u32,
    depth: u32,
    sides: [Direction; 4],
    next: usize,
    carved: bool,
}

/// A `rows × columns` maze, regenerated in place each round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maze {
    rows: u32,
    columns: u32,
    /// Cells stored row-major (row * columns + column).
    cells: Vec<MazeCell>,
}

impl Maze {
    /// A fully walled grid. Call [`Maze::generate`] to carve it.
    pub fn new(rows: u32, columns: u32) -> Self {
        let cells = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| MazeCell::new(row, column)))
            .collect();
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// The last generated grid, row-major.
    pub fn cells(&self) -> &[MazeCell] {
        &self.cells
    }

    /// The grid split into rows.
    pub fn grid(&self) -> impl Iterator<Item = &[MazeCell]> {
        self.cells.chunks(self.columns.max(1) as usize)
    }

    /// Cell at `(row, column)`, or `None` outside the grid.
    pub fn cell(&self, row: u32, column: u32) -> Option<&MazeCell> {
        self.index(row, column).map(|i| &self.cells[i])
    }

    /// The cell marked `is_last` by the most recent generation.
    pub fn terminal(&self) -> Option<&MazeCell> {
        self.cells.iter().find(|cell| cell.is_last)
    }

    /// Whether a player standing on `(row, column)` may step towards `side`.
    /// Cells outside the grid are treated as fully walled.
    pub fn can_pass(&self, row: u32, column: u32, side: Direction) -> bool {
        self.cell(row, column).is_some_and(|cell| cell.can_pass(side))
    }

    fn index(&self, row: u32, column: u32) -> Option<usize> {
        if row < self.rows && column < self.columns {
            Some(row as usize * self.columns as usize + column as usize)
        } else {
            None
        }
    }

    fn neighbor(&self, row: u32, column: u32, side: Direction) -> Option<(u32, u32)> {
        let (dr, dc) = side.delta();
        let row = u32::try_from(i64::from(row) + dr).ok()?;
        let column = u32::try_from(i64::from(column) + dc).ok()?;
        self.index(row, column).map(|_| (row, column))
    }

    /// Carve a fresh maze with its lock/key overlay and return the grid.
    ///
    /// Visitation order, key placement and door placement are identical to a
    /// recursive backtracker that shuffles the four sides on entry to each
    /// cell; the traversal just keeps its frames on the heap.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[MazeCell] {
        for cell in &mut self.cells {
            cell.reset();
        }

        let total = self.cells.len();
        if total == 0 {
            return &self.cells;
        }

        let mut pending_door: Option<KeyId> = None;
        let mut next_key = 0u32;
        let mut visited = 0usize;
        let mut stack: Vec<Frame> = Vec::with_capacity(total);

        self.enter(0, 0, 0, &mut visited, &mut stack, rng);

        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.sides.len() {
                let side = frame.sides[frame.next];
                frame.next += 1;
                let (here, row, column, depth) = (frame.index, frame.row, frame.column, frame.depth);

                let Some((next_row, next_column)) = self.neighbor(row, column, side) else {
                    continue;
                };
                let Some(there) = self.index(next_row, next_column) else {
                    continue;
                };
                if self.cells[there].walls != ALL_WALLS {
                    continue;
                }
                frame.carved = true;

                if let Some(key) = pending_door.take() {
                    self.cells[here].doors[side.index()] = Some(key);
                    self.cells[there].doors[side.opposite().index()] = Some(key);
                }
                self.cells[here].walls &= !wall_bit(side);
                self.cells[there].walls &= !wall_bit(side.opposite());
                self.cells[there].distance = depth;

                self.enter(next_row, next_column, depth + 1, &mut visited, &mut stack, rng);
            } else {
                let Some(done) = stack.pop() else {
                    break;
                };
                let cell = &mut self.cells[done.index];
                if !done.carved && !cell.is_last {
                    let key = KeyId(next_key);
                    cell.key = Some(key);
                    pending_door = Some(key);
                    next_key += 1;
                }
            }
        }

        tracing::debug!(
            rows = self.rows,
            columns = self.columns,
            keys = next_key,
            "Generated maze"
        );

        &self.cells
    }

    fn enter<R: Rng + ?Sized>(
        &mut self,
        row: u32,
        column: u32,
        depth: u32,
        visited: &mut usize,
        stack: &mut Vec<Frame>,
        rng: &mut R,
    ) {
        let Some(index) = self.index(row, column) else {
            return;
        };
        *visited += 1;
        if *visited == self.cells.len() {
            self.cells[index].is_last = true;
        }

        let mut sides = Direction::ALL;
        sides.shuffle(rng);
        stack.push(Frame {
            index,
            row,
            column,
            depth,
            sides,
            next: 0,
            carved: false,
        });
    }

    /// Pick up the key at `(row, column)`, removing every door it opens
    /// anywhere in the grid. Returns the key, or `None` if there was none.
    pub fn collect(&mut self, row: u32, column: u32) -> Option<KeyId> {
        let index = self.index(row, column)?;
        let key = self.cells[index].key.take()?;
        for cell in &mut self.cells {
            for door in &mut cell.doors {
                if *door == Some(key) {
                    *door = None;
                }
            }
        }
        tracing::debug!(key = key.0, row, column, "Key collected, doors unlocked");
        Some(key)
    }

    #[cfg(test)]
    pub(crate) fn cell_mut(&mut self, row: u32, column: u32) -> Option<&mut MazeCell> {
        self.index(row, column).map(|i| &mut self.cells[i])
    }
}
