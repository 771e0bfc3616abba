use std::ops::Range;

use crate::core::DataPoint;

/// Whether defined points are in non-decreasing x order.
///
/// Undefined (gap) points are ignored.
#[must_use]
pub fn is_sorted_by_x(points: &[DataPoint]) -> bool {
    let mut previous = f64::NEG_INFINITY;
    for point in points.iter().filter(|point| point.is_defined()) {
        if point.x < previous {
            return false;
        }
        previous = point.x;
    }
    true
}

/// Index range of an x-sorted slice that covers `[start, end]`.
///
/// One neighbor is kept on each side so segments crossing the window edges
/// are still drawn. The slice must be sorted by x and free of gap points.
#[must_use]
pub fn visible_index_range(points: &[DataPoint], start: f64, end: f64) -> Range<usize> {
    let (min_x, max_x) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    let first = points.partition_point(|point| point.x < min_x);
    let last = points.partition_point(|point| point.x <= max_x);
    first.saturating_sub(1)..(last + 1).min(points.len())
}
