//! Column geometry recovery for multi-column page layouts.
//!
//! The tract listings are set in two or three newspaper-style columns.
//! Fragment positions cluster tightly on the left edge of each column,
//! so a histogram over quantized x-positions finds the column anchors
//! without any knowledge of the page size.

use crate::extraction::Fragment;
use std::collections::BTreeMap;

/// Tunables for column detection.
#[derive(Debug, Clone)]
pub struct LayoutParams {
    /// Quantization bucket width for x-positions, in page units.
    pub bucket_width: f32,
    /// A bucket must collect more than this many fragments to anchor a column.
    pub min_support: usize,
    /// Anchors closer than this merge into one, keeping the leftmost.
    pub min_gap: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        LayoutParams {
            bucket_width: 10.0,
            min_support: 5,
            min_gap: 30.0,
        }
    }
}

/// A detected column anchor. Columns are indexed left to right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub index: usize,
    pub x: f32,
}

/// Detect column anchors from all fragments of a document.
///
/// Columns are detected document-wide, not per page; the listings keep
/// the same column grid on every page. Always returns at least one
/// column so callers never face an empty layout.
pub fn detect_columns(fragments: &[Fragment], params: &LayoutParams) -> Vec<Column> {
    let mut bucket_counts: BTreeMap<i64, usize> = BTreeMap::new();
    for frag in fragments {
        let bucket = (frag.x / params.bucket_width).round() as i64;
        *bucket_counts.entry(bucket).or_insert(0) += 1;
    }

    let mut anchors: Vec<f32> = Vec::new();
    for (bucket, count) in bucket_counts {
        if count <= params.min_support {
            continue;
        }
        let x = bucket as f32 * params.bucket_width;
        match anchors.last() {
            Some(last) if x - last <= params.min_gap => {} // merged into the leftmost
            _ => anchors.push(x),
        }
    }

    if anchors.is_empty() {
        // Degenerate page: treat everything as one column.
        anchors.push(0.0);
    }

    anchors
        .into_iter()
        .enumerate()
        .map(|(index, x)| Column { index, x })
        .collect()
}

/// Index of the column nearest to `x`. Ties go to the lower index.
pub fn assign_column(x: f32, columns: &[Column]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for col in columns {
        let dist = (x - col.x).abs();
        if dist < best_dist {
            best_dist = dist;
            best = col.index;
        }
    }
    best
}

/// Group fragments by (page, column) and sort each group top to bottom.
///
/// BTreeMap iteration then yields page order, column order within a
/// page, and vertical order within a column, which is the reading
/// order the context machine depends on.
pub fn group_by_column(
    fragments: Vec<Fragment>,
    columns: &[Column],
) -> BTreeMap<(usize, usize), Vec<Fragment>> {
    let mut groups: BTreeMap<(usize, usize), Vec<Fragment>> = BTreeMap::new();
    for frag in fragments {
        let col = assign_column(frag.x, columns);
        groups.entry((frag.page, col)).or_default().push(frag);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.y.total_cmp(&b.y));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, y: f32, page: usize) -> Fragment {
        Fragment {
            text: text.to_string(),
            x,
            y,
            page,
        }
    }

    fn stack(x: f32, count: usize, page: usize) -> Vec<Fragment> {
        (0..count)
            .map(|i| frag("Census Tract 1", x, 100.0 + i as f32 * 12.0, page))
            .collect()
    }

    #[test]
    fn test_detect_three_columns() {
        let mut frags = stack(36.0, 8, 0);
        frags.extend(stack(220.0, 7, 0));
        frags.extend(stack(410.0, 9, 0));

        let columns = detect_columns(&frags, &LayoutParams::default());
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].x, 40.0);
        assert_eq!(columns[1].x, 220.0);
        assert_eq!(columns[2].x, 410.0);
        assert_eq!(columns[2].index, 2);
    }

    #[test]
    fn test_sparse_page_falls_back_to_single_column() {
        // Five fragments do not clear the support threshold.
        let frags = stack(36.0, 5, 0);
        let columns = detect_columns(&frags, &LayoutParams::default());
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].index, 0);
    }

    #[test]
    fn test_close_anchors_merge_keeping_leftmost() {
        let mut frags = stack(40.0, 8, 0);
        frags.extend(stack(60.0, 8, 0));

        let columns = detect_columns(&frags, &LayoutParams::default());
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].x, 40.0);
    }

    #[test]
    fn test_detection_shifts_with_translation() {
        let mut frags = stack(36.0, 8, 0);
        frags.extend(stack(220.0, 7, 0));

        let base = detect_columns(&frags, &LayoutParams::default());

        let shifted: Vec<Fragment> = frags
            .iter()
            .map(|f| frag(&f.text, f.x + 200.0, f.y, f.page))
            .collect();
        let moved = detect_columns(&shifted, &LayoutParams::default());

        assert_eq!(base.len(), moved.len());
        for (a, b) in base.iter().zip(&moved) {
            assert_eq!(a.x + 200.0, b.x);
        }
    }

    #[test]
    fn test_assign_nearest_column() {
        let columns = vec![
            Column { index: 0, x: 40.0 },
            Column { index: 1, x: 220.0 },
        ];
        assert_eq!(assign_column(45.0, &columns), 0);
        assert_eq!(assign_column(210.0, &columns), 1);
    }

    #[test]
    fn test_assign_tie_prefers_lower_index() {
        let columns = vec![
            Column { index: 0, x: 0.0 },
            Column { index: 1, x: 100.0 },
        ];
        assert_eq!(assign_column(50.0, &columns), 0);
    }

    #[test]
    fn test_groups_sorted_top_to_bottom() {
        let columns = vec![Column { index: 0, x: 40.0 }];
        let frags = vec![
            frag("lower", 40.0, 300.0, 0),
            frag("upper", 41.0, 100.0, 0),
        ];
        let groups = group_by_column(frags, &columns);
        let col = &groups[&(0, 0)];
        assert_eq!(col[0].text, "upper");
        assert_eq!(col[1].text, "lower");
    }

    #[test]
    fn test_group_iteration_order_is_page_then_column() {
        let columns = vec![
            Column { index: 0, x: 40.0 },
            Column { index: 1, x: 220.0 },
        ];
        let frags = vec![
            frag("p1 c1", 220.0, 100.0, 1),
            frag("p0 c1", 221.0, 100.0, 0),
            frag("p0 c0", 40.0, 100.0, 0),
        ];
        let groups = group_by_column(frags, &columns);
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec![(0, 0), (0, 1), (1, 1)]);
    }
}
