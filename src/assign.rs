//! Nearest-centroid lookup and incremental membership updates.
//!
//! Means are integers and every update divides with truncation toward zero,
//! so removing a sample is only an approximate inverse of adding it. The
//! resulting drift is part of how the palette comes out and is kept as is.

use crate::sample::{Centroid, Sample};

/// Squared euclidean distance between a sample and a centroid's mean.
#[inline(always)]
pub fn distance_squared(sample: &Sample, centroid: &Centroid) -> i64 {
    squared_gap(sample.channels(), centroid.mean)
}

#[inline(always)]
fn squared_gap(a: [i64; 3], b: [i64; 3]) -> i64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    dx * dx + dy * dy + dz * dz
}

/// Index of the centroid closest to `sample`. Ties go to the earliest one.
///
/// Returns `None` only for an empty centroid list.
pub fn nearest(sample: &Sample, centroids: &[Centroid]) -> Option<usize> {
    let (first, rest) = centroids.split_first()?;
    let mut best = 0;
    let mut best_dist = distance_squared(sample, first);

    for (offset, centroid) in rest.iter().enumerate() {
        let dist = distance_squared(sample, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = offset + 1;
        }
    }
    Some(best)
}

/// Add `sample` to `centroid`, nudging the mean toward it.
pub fn assign(sample: &mut Sample, centroid: &mut Centroid) {
    centroid.members += 1;
    let count = centroid.members as i64;
    for (mean, channel) in centroid.mean.iter_mut().zip(sample.channels()) {
        *mean += (channel - *mean) / count;
    }
    sample.centroid = Some(centroid.id);
}

/// Remove `sample` from whichever centroid in `centroids` it belongs to.
///
/// The mean is pulled back using the already decremented count. A centroid
/// losing its last member keeps its stale mean.
pub fn unassign(sample: &mut Sample, centroids: &mut [Centroid]) {
    let Some(id) = sample.centroid.take() else {
        return;
    };
    let Some(centroid) = centroids.get_mut(id.index()) else {
        return;
    };

    if centroid.members > 1 {
        centroid.members -= 1;
        let count = centroid.members as i64;
        for (mean, channel) in centroid.mean.iter_mut().zip(sample.channels()) {
            *mean -= (channel - *mean) / count;
        }
    } else {
        centroid.members = centroid.members.saturating_sub(1);
    }
}
