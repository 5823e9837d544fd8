//! The convergence loop: seed, reassign until nothing moves.

use rand::Rng;
use tracing::debug;

use crate::assign::{assign, nearest, unassign};
use crate::error::{PaletteError, Result};
use crate::sample::{Centroid, CentroidId, Sample};

/// Where a clustering run is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterState {
    Initializing,
    /// Number of full passes completed so far.
    Iterating(usize),
    Converged,
}

/// Cluster `samples` into `k` centroids.
///
/// Centroids come back in creation order, which is the order their seeds
/// were drawn from `rng`. Any handles already on the samples are dropped
/// first: they index some other run's arena. With `max_iterations` unset
/// the loop runs until a pass makes no reassignment.
pub fn cluster_samples<R: Rng + ?Sized>(
    samples: &mut [Sample],
    k: usize,
    max_iterations: Option<usize>,
    rng: &mut R,
) -> Result<Vec<Centroid>> {
    if k == 0 {
        return Err(PaletteError::ZeroClusters);
    }
    if samples.is_empty() {
        return Err(PaletteError::EmptySamples);
    }

    let mut state = ClusterState::Initializing;
    let mut centroids = Vec::with_capacity(k);

    loop {
        state = match state {
            ClusterState::Initializing => {
                for sample in samples.iter_mut() {
                    sample.centroid = None;
                }
                seed_centroids(samples, k, rng, &mut centroids);
                ClusterState::Iterating(0)
            }
            ClusterState::Iterating(passes) => {
                if max_iterations.is_some_and(|cap| passes >= cap) {
                    return Err(PaletteError::DidNotConverge { passes });
                }
                let moved = reassign_pass(samples, &mut centroids);
                debug!(pass = passes + 1, moved, "clustering pass");
                if moved == 0 {
                    ClusterState::Converged
                } else {
                    ClusterState::Iterating(passes + 1)
                }
            }
            ClusterState::Converged => return Ok(centroids),
        };
    }
}

/// Pick `k` seeds uniformly with replacement. Duplicate picks are allowed.
///
/// The seed sample is pointed at its centroid directly, without going
/// through `assign`, so the centroid starts at exactly one member.
fn seed_centroids<R: Rng + ?Sized>(
    samples: &mut [Sample],
    k: usize,
    rng: &mut R,
    centroids: &mut Vec<Centroid>,
) {
    for index in 0..k {
        let pick = rng.random_range(0..samples.len());
        let id = CentroidId(index);
        let seed = &mut samples[pick];
        centroids.push(Centroid::seeded(id, seed));
        seed.centroid = Some(id);
    }
}

/// Move every sample to its nearest centroid. Returns how many moved.
fn reassign_pass(samples: &mut [Sample], centroids: &mut [Centroid]) -> usize {
    let mut moved = 0;
    for sample in samples.iter_mut() {
        let Some(closest) = nearest(sample, centroids) else {
            continue;
        };
        if sample.centroid != Some(centroids[closest].id) {
            unassign(sample, centroids);
            assign(sample, &mut centroids[closest]);
            moved += 1;
        }
    }
    moved
}
