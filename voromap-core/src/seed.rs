//! Seed and point types, seed placement, and adjacency sizing.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{Result, Rgb, VoronoiError};

/// Integer 2D pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point. Exact integer arithmetic; prefer
    /// this wherever only relative ordering matters.
    pub fn dist_sq(&self, other: &Point) -> u64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        (dx * dx + dy * dy) as u64
    }

    /// Distance to another point
    pub fn dist(&self, other: &Point) -> f64 {
        (self.dist_sq(other) as f64).sqrt()
    }
}

/// A Voronoi seed: cell center plus the color its cell is painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub pos: Point,
    pub color: Rgb,
}

impl Seed {
    pub fn new(pos: Point, color: Rgb) -> Self {
        Self { pos, color }
    }
}

/// A seed enriched with its safe fill radius.
///
/// Every pixel within `safe_radius` of the seed is nearer to it than to any
/// other seed, so the disc it bounds lies inside the seed's Voronoi cell.
#[derive(Debug, Clone, Copy)]
pub struct SizedSeed {
    pub seed: Seed,
    pub safe_radius: u32,
}

/// Ordered collection of seeds validated against a grid.
///
/// Index order is the tie-break priority for pixels equidistant to two
/// seeds, and the iteration order of the fill engine's disc pass.
#[derive(Debug, Clone)]
pub struct SeedField {
    seeds: Vec<Seed>,
    width: u32,
    height: u32,
}

impl SeedField {
    /// Pair positions with palette colors, rejecting anything that would
    /// break a fill run: zero seeds, more seeds than pixels, a zero-area
    /// grid, a palette of the wrong length, or an out-of-bounds position.
    pub fn new(positions: Vec<Point>, colors: &[Rgb], width: u32, height: u32) -> Result<Self> {
        check_dims(width, height)?;
        if positions.is_empty() {
            return Err(VoronoiError::NoSeeds);
        }
        if positions.len() as u64 > width as u64 * height as u64 {
            return Err(VoronoiError::TooManySeeds {
                count: positions.len(),
                width,
                height,
            });
        }
        if positions.len() != colors.len() {
            return Err(VoronoiError::PaletteMismatch {
                seeds: positions.len(),
                colors: colors.len(),
            });
        }
        for (index, pos) in positions.iter().enumerate() {
            if pos.x < 0 || pos.x >= width as i32 || pos.y < 0 || pos.y >= height as i32 {
                return Err(VoronoiError::SeedOutOfBounds {
                    index,
                    x: pos.x,
                    y: pos.y,
                    width,
                    height,
                });
            }
        }

        let seeds = positions
            .into_iter()
            .zip(colors.iter().copied())
            .map(|(pos, color)| Seed::new(pos, color))
            .collect();
        Ok(Self {
            seeds,
            width,
            height,
        })
    }

    /// Place `count` seeds at uniform random positions, reproducibly for a
    /// given RNG seed.
    pub fn random(
        count: usize,
        width: u32,
        height: u32,
        palette: &[Rgb],
        rng_seed: u64,
    ) -> Result<Self> {
        check_dims(width, height)?;
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let positions = (0..count)
            .map(|_| random_point(&mut rng, 0, width as i32, 0, height as i32))
            .collect();
        Self::new(positions, palette, width, height)
    }

    /// Place one seed uniformly inside each box of a near-square lattice,
    /// row-major, until `count` seeds exist. Spreads seeds more evenly than
    /// plain uniform placement. Grids too narrow for the lattice are topped
    /// up with uniform random positions.
    pub fn grid_partitioned(
        count: usize,
        width: u32,
        height: u32,
        palette: &[Rgb],
        rng_seed: u64,
    ) -> Result<Self> {
        check_dims(width, height)?;
        if count == 0 {
            return Err(VoronoiError::NoSeeds);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);

        let side = (count as f64).sqrt().ceil() as u32;
        let box_w = width.div_ceil(side);
        let box_h = height.div_ceil(side);

        let mut positions = Vec::with_capacity(count);
        'boxes: for by in (0..height).step_by(box_h as usize) {
            for bx in (0..width).step_by(box_w as usize) {
                let max_x = (bx + box_w).min(width);
                let max_y = (by + box_h).min(height);
                positions.push(random_point(
                    &mut rng,
                    bx as i32,
                    max_x as i32,
                    by as i32,
                    max_y as i32,
                ));
                if positions.len() == count {
                    break 'boxes;
                }
            }
        }
        while positions.len() < count {
            positions.push(random_point(&mut rng, 0, width as i32, 0, height as i32));
        }

        Self::new(positions, palette, width, height)
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Compute each seed's safe fill radius from its nearest neighbor:
    /// `floor(nearest_neighbor_distance / 2)`, which keeps the disc inside
    /// the seed's Voronoi cell. A single seed has no neighbor and owns the
    /// whole grid, so its radius is the grid diagonal.
    ///
    /// Returns a new enriched sequence; the field itself is not mutated.
    /// Radii are stale if seed positions change and must be recomputed.
    ///
    /// O(N²) all-pairs scan. Fine for tens of seeds; swap in a spatial
    /// index here if N ever grows to thousands.
    pub fn compute_adjacency(&self) -> Vec<SizedSeed> {
        if self.seeds.len() == 1 {
            let w = self.width as u64;
            let h = self.height as u64;
            let diagonal = ((w * w + h * h) as f64).sqrt().ceil() as u32;
            return vec![SizedSeed {
                seed: self.seeds[0],
                safe_radius: diagonal,
            }];
        }

        self.seeds
            .iter()
            .enumerate()
            .map(|(i, &seed)| {
                let mut min_sq = u64::MAX;
                for (j, other) in self.seeds.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    min_sq = min_sq.min(seed.pos.dist_sq(&other.pos));
                }
                let safe_radius = ((min_sq as f64).sqrt() / 2.0).floor() as u32;
                SizedSeed { seed, safe_radius }
            })
            .collect()
    }
}

fn check_dims(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(VoronoiError::EmptyGrid { width, height });
    }
    Ok(())
}

fn random_point(rng: &mut ChaCha8Rng, x0: i32, x1: i32, y0: i32, y1: i32) -> Point {
    Point::new(rng.gen_range(x0..x1), rng.gen_range(y0..y1))
}
