//! Core Voronoi raster fill library.
//!
//! Colors every pixel of a grid with the color of its nearest seed. Most of
//! the grid is painted by a cheap per-seed disc pass; the remainder falls
//! back to an exhaustive nearest-seed scan (Rayon-parallelized with the
//! `parallel` feature). A binary-subdivision palette generator supplies
//! maximally-distinct seed colors.

mod canvas;
mod fill;
mod palette;
mod seed;

pub use canvas::Canvas;
pub use fill::{FillEngine, FillReport};
pub use palette::{build_palette, diversity_sequence};
pub use seed::{Point, Seed, SeedField, SizedSeed};

/// RGB color tuple
pub type Rgb = [u8; 3];

/// Error type for Voronoi raster operations
#[derive(Debug, thiserror::Error)]
pub enum VoronoiError {
    #[error("No seeds provided")]
    NoSeeds,

    #[error("{count} seeds cannot fit a {width}x{height} grid")]
    TooManySeeds {
        count: usize,
        width: u32,
        height: u32,
    },

    #[error("Seed {index} at ({x}, {y}) lies outside the {width}x{height} grid")]
    SeedOutOfBounds {
        index: usize,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("Grid has zero area ({width}x{height})")]
    EmptyGrid { width: u32, height: u32 },

    #[error("{seeds} seeds but {colors} palette colors")]
    PaletteMismatch { seeds: usize, colors: usize },

    #[error("Requested an empty palette")]
    EmptyPalette,
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
