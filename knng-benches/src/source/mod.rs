//! Synthetic vector sources for benchmarking.
//!
//! Sources are plain row-major `f32` buffers scored with the Euclidean
//! similarity kernel, so NN-Descent and the brute-force oracle see the same
//! values.

mod errors;
mod generation;

use knng_core::{SimilarityComputer, euclidean_similarity};
use rand::{Rng, SeedableRng, rngs::SmallRng};

pub use errors::SyntheticError;
use generation::{build_blob_centroids, standard_normal_sample, validate_blob_config};

/// Uniform random vector configuration.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Dimensionality of each vector.
    pub dimensions: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Configuration for isotropic Gaussian blobs.
#[derive(Clone, Debug)]
pub struct GaussianBlobConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Dimensionality of each vector.
    pub dimensions: usize,
    /// Number of Gaussian clusters.
    pub cluster_count: usize,
    /// Radius of the circle the centroids sit on.
    pub separation: f32,
    /// Standard deviation of every axis.
    pub spread: f32,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A dense synthetic dataset scored with Euclidean similarity.
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    data: Vec<f32>,
    point_count: usize,
    dimensions: usize,
    name: &'static str,
}

impl SyntheticSource {
    /// Generates uniform random vectors in `[0.0, 1.0)`.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is invalid.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        let total = checked_total(config.point_count, config.dimensions)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let data: Vec<f32> = (0..total)
            .map(|_| rng.gen_range(0.0_f32..1.0_f32))
            .collect();
        Ok(Self {
            data,
            point_count: config.point_count,
            dimensions: config.dimensions,
            name: "synthetic-uniform",
        })
    }

    /// Generates Gaussian blobs, assigning points to centroids round-robin.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is invalid.
    #[expect(
        clippy::float_arithmetic,
        reason = "Gaussian samples are scaled and offset by the centroid"
    )]
    pub fn generate_gaussian_blobs(config: &GaussianBlobConfig) -> Result<Self, SyntheticError> {
        let total = checked_total(config.point_count, config.dimensions)?;
        validate_blob_config(config)?;
        let centroids = build_blob_centroids(config, &mut SmallRng::seed_from_u64(config.seed));
        let mut rng = SmallRng::seed_from_u64(config.seed ^ 0xA5A5_A5A5_A5A5_A5A5_u64);
        let mut data = Vec::with_capacity(total);
        for centroid in centroids.iter().cycle().take(config.point_count) {
            for &centre in centroid {
                data.push(centre + standard_normal_sample(&mut rng)? * config.spread);
            }
        }
        Ok(Self {
            data,
            point_count: config.point_count,
            dimensions: config.dimensions,
            name: "synthetic-gaussian-blobs",
        })
    }

    /// Returns the dimensionality of each vector.
    #[must_use]
    #[rustfmt::skip]
    pub const fn dimensions(&self) -> usize { self.dimensions }

    /// Returns the vector of `index`, or `None` when out of range.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dimensions)?;
        let end = start.checked_add(self.dimensions)?;
        self.data.get(start..end)
    }
}

impl SimilarityComputer for SyntheticSource {
    #[rustfmt::skip]
    fn node_count(&self) -> usize { self.point_count }

    #[rustfmt::skip]
    fn name(&self) -> &str { self.name }

    fn similarity(&self, node: usize, candidate: usize) -> f64 {
        match (self.row(node), self.row(candidate)) {
            (Some(left), Some(right)) => euclidean_similarity(left, right).unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }
}

fn checked_total(point_count: usize, dimensions: usize) -> Result<usize, SyntheticError> {
    if point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions);
    }
    point_count
        .checked_mul(dimensions)
        .ok_or(SyntheticError::Overflow)
}
