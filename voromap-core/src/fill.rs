//! Two-phase Voronoi fill.
//!
//! The disc pass paints every pixel within each seed's safe radius: such a
//! pixel is nearer that seed than any other, so it needs no distance
//! comparison against the rest of the field. The fallback pass resolves the
//! leftover pixels by exhaustive nearest-seed scan. The disc pass is a pure
//! optimization; disabling it changes the runtime, never the image.

use crate::canvas::Canvas;
use crate::seed::{Point, SizedSeed};
use crate::{Result, Rgb, VoronoiError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Pixels painted per fill phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillReport {
    /// Pixels painted by the disc pass
    pub disc: usize,
    /// Pixels resolved by the exhaustive fallback
    pub fallback: usize,
}

impl FillReport {
    pub fn total(&self) -> usize {
        self.disc + self.fallback
    }
}

/// Voronoi fill engine.
pub struct FillEngine {
    /// Paint safe-radius discs before the exhaustive pass
    pub disc_phase: bool,
}

impl FillEngine {
    pub fn new() -> Self {
        Self { disc_phase: true }
    }

    /// Engine that resolves every pixel by exhaustive scan (for comparing
    /// against the disc-accelerated path)
    pub fn brute_force() -> Self {
        Self { disc_phase: false }
    }

    /// Color every canvas pixel with its nearest seed's color.
    ///
    /// Ties on squared distance go to the lowest seed index. Every pixel is
    /// filled exactly once when this returns.
    pub fn fill(&self, canvas: &mut Canvas, seeds: &[SizedSeed]) -> Result<FillReport> {
        if seeds.is_empty() {
            return Err(VoronoiError::NoSeeds);
        }
        if seeds.len() > canvas.len() {
            return Err(VoronoiError::TooManySeeds {
                count: seeds.len(),
                width: canvas.width(),
                height: canvas.height(),
            });
        }

        let mut filled = vec![false; canvas.len()];
        let mut report = FillReport::default();

        if self.disc_phase {
            report.disc = paint_discs(canvas, seeds, &mut filled);
        }
        report.fallback = resolve_leftovers(canvas, seeds, &mut filled);

        debug_assert!(filled.iter().all(|&f| f));
        Ok(report)
    }
}

impl Default for FillEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Paint each seed's safe disc, in seed index order.
///
/// Walks the bounding square of side `2 * safe_radius` clipped to the
/// canvas and claims every unfilled pixel with `dist_sq <= radius²`. The
/// inclusive bound keeps boundary pixels out of the fallback pass; a pixel
/// exactly on two discs' shared boundary is claimed by the lower-indexed
/// seed, matching the fallback tie-break.
fn paint_discs(canvas: &mut Canvas, seeds: &[SizedSeed], filled: &mut [bool]) -> usize {
    let width = canvas.width() as i64;
    let height = canvas.height() as i64;
    let pixels = canvas.pixels_mut();
    let mut painted = 0;

    for sized in seeds {
        let center = sized.seed.pos;
        let radius = sized.safe_radius as i64;
        let radius_sq = (radius * radius) as u64;

        let x0 = (center.x as i64 - radius).max(0) as i32;
        let x1 = (center.x as i64 + radius).min(width - 1) as i32;
        let y0 = (center.y as i64 - radius).max(0) as i32;
        let y1 = (center.y as i64 + radius).min(height - 1) as i32;

        for y in y0..=y1 {
            let row = y as usize * width as usize;
            for x in x0..=x1 {
                let idx = row + x as usize;
                if filled[idx] {
                    continue;
                }
                if center.dist_sq(&Point::new(x, y)) <= radius_sq {
                    pixels[idx] = sized.seed.color;
                    filled[idx] = true;
                    painted += 1;
                }
            }
        }
    }

    painted
}

/// Index of the seed nearest to `p`; ties go to the lowest index.
fn nearest_seed(p: Point, seeds: &[SizedSeed]) -> usize {
    let mut best = 0;
    let mut best_sq = u64::MAX;
    for (i, sized) in seeds.iter().enumerate() {
        let d = p.dist_sq(&sized.seed.pos);
        if d < best_sq {
            best_sq = d;
            best = i;
        }
    }
    best
}

/// Resolve one row's unfilled pixels by exhaustive nearest-seed scan.
fn resolve_row(y: usize, row: &mut [Rgb], row_filled: &mut [bool], seeds: &[SizedSeed]) -> usize {
    let mut resolved = 0;
    for (x, (pixel, is_filled)) in row.iter_mut().zip(row_filled.iter_mut()).enumerate() {
        if *is_filled {
            continue;
        }
        let nearest = nearest_seed(Point::new(x as i32, y as i32), seeds);
        *pixel = seeds[nearest].seed.color;
        *is_filled = true;
        resolved += 1;
    }
    resolved
}

/// Exhaustive fallback, parallel over rows. Each pixel depends only on
/// immutable seed data and rows are disjoint slices, so the result is
/// identical to the serial pass.
#[cfg(feature = "parallel")]
fn resolve_leftovers(canvas: &mut Canvas, seeds: &[SizedSeed], filled: &mut [bool]) -> usize {
    let width = canvas.width() as usize;
    canvas
        .pixels_mut()
        .par_chunks_exact_mut(width)
        .zip(filled.par_chunks_exact_mut(width))
        .enumerate()
        .map(|(y, (row, row_filled))| resolve_row(y, row, row_filled, seeds))
        .sum()
}

/// Exhaustive fallback over unfilled pixels, row by row.
#[cfg(not(feature = "parallel"))]
fn resolve_leftovers(canvas: &mut Canvas, seeds: &[SizedSeed], filled: &mut [bool]) -> usize {
    let width = canvas.width() as usize;
    canvas
        .pixels_mut()
        .chunks_exact_mut(width)
        .zip(filled.chunks_exact_mut(width))
        .enumerate()
        .map(|(y, (row, row_filled))| resolve_row(y, row, row_filled, seeds))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{Seed, SeedField};
    use crate::{build_palette, Rgb};

    fn sized_field(positions: Vec<Point>, colors: &[Rgb], w: u32, h: u32) -> Vec<SizedSeed> {
        SeedField::new(positions, colors, w, h)
            .unwrap()
            .compute_adjacency()
    }

    /// Reference nearest-seed scan with the documented tie-break.
    fn expected_color(p: Point, seeds: &[SizedSeed]) -> Rgb {
        seeds[nearest_seed(p, seeds)].seed.color
    }

    #[test]
    fn test_two_seeds_4x4() {
        let red: Rgb = [255, 0, 0];
        let blue: Rgb = [0, 0, 255];
        let sized = sized_field(
            vec![Point::new(0, 0), Point::new(3, 3)],
            &[red, blue],
            4,
            4,
        );
        // neighbor distance sqrt(18) ~ 4.24 -> safe radius 2
        assert_eq!(sized[0].safe_radius, 2);
        assert_eq!(sized[1].safe_radius, 2);

        let mut canvas = Canvas::new(4, 4);
        let report = FillEngine::new().fill(&mut canvas, &sized).unwrap();

        assert_eq!(report.total(), 16);
        assert_eq!(canvas.get(0, 0), red);
        assert_eq!(canvas.get(3, 3), blue);
        // (1,1): squared distances 2 vs 8
        assert_eq!(canvas.get(1, 1), red);
        // (2,2): squared distances 8 vs 2
        assert_eq!(canvas.get(2, 2), blue);
        // (1,2) and (2,1) are exact ties (5 vs 5): lowest seed index wins
        assert_eq!(canvas.get(1, 2), red);
        assert_eq!(canvas.get(2, 1), red);
    }

    #[test]
    fn test_single_seed_owns_every_pixel() {
        let color: Rgb = [9, 99, 199];
        let sized = sized_field(vec![Point::new(2, 3)], &[color], 8, 5);

        let mut canvas = Canvas::new(8, 5);
        let report = FillEngine::new().fill(&mut canvas, &sized).unwrap();

        assert_eq!(report.total(), 40);
        // The whole-grid radius means the fallback never runs
        assert_eq!(report.fallback, 0);
        assert!(canvas.pixels().iter().all(|&c| c == color));
    }

    #[test]
    fn test_every_pixel_gets_its_nearest_seed() {
        let positions = vec![
            Point::new(1, 1),
            Point::new(12, 3),
            Point::new(4, 13),
            Point::new(14, 14),
        ];
        let palette = build_palette(4).unwrap();
        let sized = sized_field(positions, &palette, 16, 16);

        let mut canvas = Canvas::new(16, 16);
        let report = FillEngine::new().fill(&mut canvas, &sized).unwrap();

        assert_eq!(report.total(), 256);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(
                    canvas.get(x, y),
                    expected_color(Point::new(x as i32, y as i32), &sized),
                    "pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_disc_phase_does_not_change_the_image() {
        let palette = build_palette(10).unwrap();
        for rng_seed in 0..5 {
            let field = SeedField::random(10, 64, 64, &palette, rng_seed).unwrap();
            let sized = field.compute_adjacency();

            let mut fast = Canvas::new(64, 64);
            let mut exact = Canvas::new(64, 64);
            FillEngine::new().fill(&mut fast, &sized).unwrap();
            FillEngine::brute_force().fill(&mut exact, &sized).unwrap();

            assert_eq!(fast.render(), exact.render(), "rng seed {}", rng_seed);
        }
    }

    #[test]
    fn test_fill_is_deterministic() {
        let palette = build_palette(12).unwrap();
        let field = SeedField::random(12, 48, 32, &palette, 5).unwrap();
        let sized = field.compute_adjacency();

        let mut a = Canvas::new(48, 32);
        let mut b = Canvas::new(48, 32);
        FillEngine::new().fill(&mut a, &sized).unwrap();
        FillEngine::new().fill(&mut b, &sized).unwrap();

        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn test_disc_pass_stays_within_radius() {
        let palette = build_palette(5).unwrap();
        let positions = vec![
            Point::new(4, 4),
            Point::new(27, 6),
            Point::new(8, 25),
            Point::new(24, 24),
            Point::new(16, 15),
        ];
        let sized = sized_field(positions, &palette, 32, 32);

        let mut canvas = Canvas::new(32, 32);
        let mut filled = vec![false; canvas.len()];
        let painted = paint_discs(&mut canvas, &sized, &mut filled);

        assert!(painted > 0);
        assert_eq!(painted, filled.iter().filter(|&&f| f).count());

        // Palette colors are distinct, so the painted color identifies the
        // claiming seed; its disc bound must hold for every painted pixel.
        for y in 0..32u32 {
            for x in 0..32u32 {
                if !filled[(y * 32 + x) as usize] {
                    continue;
                }
                let p = Point::new(x as i32, y as i32);
                let owner = sized
                    .iter()
                    .find(|s| s.seed.color == canvas.get(x, y))
                    .expect("painted color belongs to a seed");
                let radius_sq = owner.safe_radius as u64 * owner.safe_radius as u64;
                assert!(owner.seed.pos.dist_sq(&p) <= radius_sq);
            }
        }
    }

    #[test]
    fn test_clustered_seeds_degenerate_gracefully() {
        // Adjacent seeds collapse to radius 0; the fallback does the work
        let palette = build_palette(3).unwrap();
        let positions = vec![Point::new(10, 10), Point::new(11, 10), Point::new(10, 11)];
        let sized = sized_field(positions, &palette, 20, 20);
        for s in &sized {
            assert_eq!(s.safe_radius, 0);
        }

        let mut canvas = Canvas::new(20, 20);
        let report = FillEngine::new().fill(&mut canvas, &sized).unwrap();

        assert_eq!(report.total(), 400);
        // Radius 0 still claims the seed's own pixel
        assert_eq!(report.disc, 3);
    }

    #[test]
    fn test_rejects_empty_seed_slice() {
        let mut canvas = Canvas::new(4, 4);
        let err = FillEngine::new().fill(&mut canvas, &[]).unwrap_err();
        assert!(matches!(err, VoronoiError::NoSeeds));
    }

    #[test]
    fn test_rejects_more_seeds_than_pixels() {
        let seeds: Vec<SizedSeed> = (0..5)
            .map(|i| SizedSeed {
                seed: Seed::new(Point::new(i % 2, i / 2), [i as u8; 3]),
                safe_radius: 0,
            })
            .collect();
        let mut canvas = Canvas::new(2, 2);
        let err = FillEngine::new().fill(&mut canvas, &seeds).unwrap_err();
        assert!(matches!(err, VoronoiError::TooManySeeds { count: 5, .. }));
    }
}
