//! Hexagonal binning.
//!
//! The grid is made of two rectangular lattices of hexagon centers, the second
//! offset by half a cell in both directions. A point belongs to the nearer of
//! its two candidate centers, measured with the vertical axis scaled by √3 so
//! cells are regular in grid units.

/// Number of hexagons along the longitude axis
pub const GRID_SIZE: usize = 300;

/// Axis-aligned data extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Minimum x (longitude)
    pub xmin: f64,
    /// Maximum x (longitude)
    pub xmax: f64,
    /// Minimum y (latitude)
    pub ymin: f64,
    /// Maximum y (latitude)
    pub ymax: f64,
}

impl Extent {
    /// The whole globe in plate carrée degrees
    pub const GLOBAL: Extent = Extent {
        xmin: -180.0,
        xmax: 180.0,
        ymin: -90.0,
        ymax: 90.0,
    };

    /// Is `(x, y)` inside the extent (borders included)?
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

/// Which of the two center lattices a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lattice {
    /// Centers at `(xmin + i·sx, ymin + j·sy)`, `(nx+1) × (ny+1)` cells
    Primary,
    /// Centers at `(xmin + (i+½)·sx, ymin + (j+½)·sy)`, `nx × ny` cells
    Offset,
}

/// A hexagon of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexCell {
    /// Lattice of the center
    pub lattice: Lattice,
    /// Column index
    pub i: usize,
    /// Row index
    pub j: usize,
}

/// Hexagon grid geometry over an extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGrid {
    extent: Extent,
    nx: usize,
    ny: usize,
    sx: f64,
    sy: f64,
}

impl HexGrid {
    /// Grid with `nx` hexagons along x; the row count follows from keeping
    /// cells regular (`ny = nx / √3`)
    pub fn new(nx: usize, extent: Extent) -> Self {
        let nx = nx.max(1);
        let ny = ((nx as f64 / 3f64.sqrt()) as usize).max(1);
        Self {
            extent,
            nx,
            ny,
            sx: (extent.xmax - extent.xmin) / nx as f64,
            sy: (extent.ymax - extent.ymin) / ny as f64,
        }
    }

    /// The fixed global grid used for flash density maps
    pub fn global() -> Self {
        Self::new(GRID_SIZE, Extent::GLOBAL)
    }

    /// Grid extent
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Hexagons along x
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Rows along y
    pub fn ny(&self) -> usize {
        self.ny
    }

    fn lattice_dims(&self, lattice: Lattice) -> (usize, usize) {
        match lattice {
            Lattice::Primary => (self.nx + 1, self.ny + 1),
            Lattice::Offset => (self.nx, self.ny),
        }
    }

    fn cell_index(&self, cell: HexCell) -> usize {
        let (nx, _) = self.lattice_dims(cell.lattice);
        cell.j * nx + cell.i
    }

    fn cell_at(&self, lattice: Lattice, i: f64, j: f64) -> Option<HexCell> {
        let (nx, ny) = self.lattice_dims(lattice);
        if i < 0.0 || j < 0.0 || i >= nx as f64 || j >= ny as f64 {
            return None;
        }
        Some(HexCell {
            lattice,
            i: i as usize,
            j: j as usize,
        })
    }

    /// Cell containing `(x, y)`, `None` for non-finite or out-of-extent points
    pub fn locate(&self, x: f64, y: f64) -> Option<HexCell> {
        if !x.is_finite() || !y.is_finite() || !self.extent.contains(x, y) {
            return None;
        }

        let ix = (x - self.extent.xmin) / self.sx;
        let iy = (y - self.extent.ymin) / self.sy;

        let (ix1, iy1) = (ix.round(), iy.round());
        let (ix2, iy2) = (ix.floor(), iy.floor());

        let d1 = (ix - ix1).powi(2) + 3.0 * (iy - iy1).powi(2);
        let d2 = (ix - ix2 - 0.5).powi(2) + 3.0 * (iy - iy2 - 0.5).powi(2);

        let primary = self.cell_at(Lattice::Primary, ix1, iy1);
        let offset = self.cell_at(Lattice::Offset, ix2, iy2);

        if d1 < d2 {
            primary.or(offset)
        } else {
            offset.or(primary)
        }
    }

    /// Center of `cell` in data coordinates
    pub fn center(&self, cell: HexCell) -> (f64, f64) {
        let shift = match cell.lattice {
            Lattice::Primary => 0.0,
            Lattice::Offset => 0.5,
        };
        (
            self.extent.xmin + (cell.i as f64 + shift) * self.sx,
            self.extent.ymin + (cell.j as f64 + shift) * self.sy,
        )
    }

    /// Corner points of `cell`, pointy side up
    pub fn vertices(&self, cell: HexCell) -> [(f64, f64); 6] {
        let (cx, cy) = self.center(cell);
        let (hx, hy) = (self.sx * 0.5, self.sy / 3.0);
        [
            (cx + hx, cy - hy * 0.5),
            (cx + hx, cy + hy * 0.5),
            (cx, cy + hy),
            (cx - hx, cy + hy * 0.5),
            (cx - hx, cy - hy * 0.5),
            (cx, cy - hy),
        ]
    }
}

/// Point counts per hexagon
#[derive(Debug, Clone)]
pub struct HexBins {
    grid: HexGrid,
    primary: Vec<u32>,
    offset: Vec<u32>,
    dropped: usize,
}

impl HexBins {
    /// Empty bins over `grid`
    pub fn new(grid: HexGrid) -> Self {
        let (px, py) = grid.lattice_dims(Lattice::Primary);
        let (ox, oy) = grid.lattice_dims(Lattice::Offset);
        Self {
            grid,
            primary: vec![0; px * py],
            offset: vec![0; ox * oy],
            dropped: 0,
        }
    }

    /// Bin paired `xs`/`ys` coordinates; extra values of the longer slice are ignored
    pub fn from_points(grid: HexGrid, xs: &[f64], ys: &[f64]) -> Self {
        let mut bins = Self::new(grid);
        for (&x, &y) in xs.iter().zip(ys) {
            bins.add(x, y);
        }
        bins
    }

    /// Count one point; points outside the grid are tallied as dropped
    pub fn add(&mut self, x: f64, y: f64) {
        match self.grid.locate(x, y) {
            Some(cell) => {
                let idx = self.grid.cell_index(cell);
                match cell.lattice {
                    Lattice::Primary => self.primary[idx] += 1,
                    Lattice::Offset => self.offset[idx] += 1,
                }
            }
            None => self.dropped += 1,
        }
    }

    /// Grid geometry
    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Count of a single cell
    pub fn count(&self, cell: HexCell) -> u32 {
        let idx = self.grid.cell_index(cell);
        match cell.lattice {
            Lattice::Primary => self.primary[idx],
            Lattice::Offset => self.offset[idx],
        }
    }

    /// Points outside the extent or not finite
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Points that landed in a cell
    pub fn total(&self) -> u64 {
        self.primary
            .iter()
            .chain(&self.offset)
            .map(|&c| c as u64)
            .sum()
    }

    /// Cells holding at least `min_count` points
    pub fn occupied(&self, min_count: u32) -> impl Iterator<Item = (HexCell, u32)> + '_ {
        let min_count = min_count.max(1);
        let (px, _) = self.grid.lattice_dims(Lattice::Primary);
        let (ox, _) = self.grid.lattice_dims(Lattice::Offset);
        lattice_cells(Lattice::Primary, px, &self.primary, min_count)
            .chain(lattice_cells(Lattice::Offset, ox, &self.offset, min_count))
    }

    /// Smallest and largest non-zero count, `None` if every cell is empty
    pub fn count_range(&self) -> Option<(u32, u32)> {
        self.occupied(1).fold(None, |acc, (_, c)| match acc {
            None => Some((c, c)),
            Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
        })
    }
}

fn lattice_cells(
    lattice: Lattice,
    nx: usize,
    counts: &[u32],
    min_count: u32,
) -> impl Iterator<Item = (HexCell, u32)> + '_ {
    counts
        .iter()
        .enumerate()
        .filter(move |(_, &c)| c >= min_count)
        .map(move |(idx, &c)| {
            (
                HexCell {
                    lattice,
                    i: idx % nx,
                    j: idx / nx,
                },
                c,
            )
        })
}
