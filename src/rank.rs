//! Orders centroids by how many samples they hold.

use crate::sample::Centroid;

/// Stable sort by member count, largest first.
///
/// Bottom-up merge sort, so the depth of the call stack does not grow with
/// the palette. Equal counts keep their incoming order.
pub fn rank(centroids: Vec<Centroid>) -> Vec<Centroid> {
    let len = centroids.len();
    if len < 2 {
        return centroids;
    }

    let mut src: Vec<Option<Centroid>> = centroids.into_iter().map(Some).collect();
    let mut dst: Vec<Option<Centroid>> = Vec::with_capacity(len);

    let mut width = 1;
    while width < len {
        dst.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            merge(&mut src, start, mid, end, &mut dst);
            start = end;
        }
        std::mem::swap(&mut src, &mut dst);
        width *= 2;
    }

    src.into_iter().flatten().collect()
}

/// Merge the runs `[start, mid)` and `[mid, end)` of `src` onto `dst`.
fn merge(
    src: &mut [Option<Centroid>],
    start: usize,
    mid: usize,
    end: usize,
    dst: &mut Vec<Option<Centroid>>,
) {
    let (mut left, mut right) = (start, mid);
    while left < mid && right < end {
        let left_count = members(&src[left]);
        let right_count = members(&src[right]);
        // Left wins ties.
        if left_count >= right_count {
            dst.push(src[left].take());
            left += 1;
        } else {
            dst.push(src[right].take());
            right += 1;
        }
    }
    dst.extend(src[left..mid].iter_mut().map(Option::take));
    dst.extend(src[right..end].iter_mut().map(Option::take));
}

fn members(slot: &Option<Centroid>) -> usize {
    slot.as_ref().map_or(0, Centroid::members)
}
