//! Recursive refinement of a palette toward its most colorful sub-clusters.
//!
//! Each level splits every palette entry's members into `k` sub-clusters
//! (`k` being the palette length) and keeps the sub-cluster whose mean has
//! the widest channel spread. The samples' centroid handles are rewritten
//! along the way and the caller's sample order is regrouped, so neither the
//! input palette nor the previous handles mean anything afterwards.

use std::ops::Range;

use rand::Rng;
use tracing::{debug, warn};

use crate::cluster::cluster_samples;
use crate::error::Result;
use crate::sample::{Centroid, CentroidId, Sample};

/// Refine `palette` for `depth` levels. `depth == 0` hands it back untouched.
pub fn brighten<R: Rng + ?Sized>(
    samples: &mut [Sample],
    mut palette: Vec<Centroid>,
    depth: usize,
    max_iterations: Option<usize>,
    rng: &mut R,
) -> Result<Vec<Centroid>> {
    for level in 0..depth {
        palette = brighten_level(samples, palette, max_iterations, rng)?;
        debug!(level = level + 1, colors = palette.len(), "brightening level done");
    }
    Ok(palette)
}

fn brighten_level<R: Rng + ?Sized>(
    samples: &mut [Sample],
    palette: Vec<Centroid>,
    max_iterations: Option<usize>,
    rng: &mut R,
) -> Result<Vec<Centroid>> {
    let k = palette.len();
    let groups = group_by_position(samples, &palette);
    let mut refined = Vec::with_capacity(k);

    for (position, (parent, range)) in palette.into_iter().zip(groups).enumerate() {
        let id = CentroidId(position);
        let members = &mut samples[range];

        if members.is_empty() {
            warn!(position, "palette entry has no samples, keeping it as is");
            refined.push(Centroid { id, ..parent });
            continue;
        }

        let mut subs = cluster_samples(members, k, max_iterations, rng)?;
        for sub in subs.iter_mut() {
            sub.color_spread = strict_spread(sub.mean);
        }
        let best = most_colorful(&subs);
        let chosen = subs.swap_remove(best);

        for sample in members.iter_mut() {
            sample.centroid = (sample.centroid == Some(chosen.id)).then_some(id);
        }
        refined.push(Centroid { id, ..chosen });
    }

    Ok(refined)
}

/// Point every sample at its centroid's position in `palette` and sort the
/// samples so each position's members sit in one contiguous range.
///
/// The sort is stable, so members keep their relative traversal order.
fn group_by_position(samples: &mut [Sample], palette: &[Centroid]) -> Vec<Range<usize>> {
    let slots = palette.iter().map(|c| c.id.index()).max().map_or(0, |m| m + 1);
    let mut position_of = vec![None; slots];
    for (position, centroid) in palette.iter().enumerate() {
        position_of[centroid.id.index()] = Some(CentroidId(position));
    }

    for sample in samples.iter_mut() {
        sample.centroid = sample
            .centroid
            .and_then(|id| position_of.get(id.index()).copied().flatten());
    }
    samples.sort_by_key(key);

    (0..palette.len())
        .map(|position| {
            let start = samples.partition_point(|s| key(s) < position);
            let end = samples.partition_point(|s| key(s) <= position);
            start..end
        })
        .collect()
}

fn key(sample: &Sample) -> usize {
    sample.centroid.map_or(usize::MAX, CentroidId::index)
}

/// Strictly largest channel minus strictly smallest channel.
///
/// Either side counts as 0 when no channel is strictly beyond both others,
/// so a mean like `(5, 5, 1)` scores `0 - 1`.
fn strict_spread([x, y, z]: [i64; 3]) -> i64 {
    let min = if x < y && x < z {
        x
    } else if y < x && y < z {
        y
    } else if z < x && z < y {
        z
    } else {
        0
    };
    let max = if x > y && x > z {
        x
    } else if y > x && y > z {
        y
    } else if z > x && z > y {
        z
    } else {
        0
    };
    max - min
}

/// Index of the sub-cluster with the widest spread. The first one wins
/// unless a later one beats the best spread so far, which starts at 0.
fn most_colorful(subs: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_spread = 0;
    for (index, sub) in subs.iter().enumerate() {
        if sub.color_spread > best_spread {
            best = index;
            best_spread = sub.color_spread;
        }
    }
    best
}
