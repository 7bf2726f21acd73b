//! Candidate region selection.

use salient_region_model::{Blob, BlobFilter, GridDims};

/// Whether `blob` passes the size and aspect filters on `grid`.
pub fn admits(blob: &Blob, grid: GridDims, filter: &BlobFilter) -> bool {
    let area = grid.area();
    if !filter.min_size.admits(blob.cell_count, area) {
        return false;
    }
    if blob.cell_count as f64 > area as f64 * filter.max_fraction {
        return false;
    }
    match filter.aspect {
        Some(bounds) => bounds.contains(blob.aspect_ratio()),
        None => true,
    }
}

/// Pick the largest admissible blob. Ties go to the earliest blob in the
/// list, which for labeler output is raster order.
pub fn select<'a>(blobs: &'a [Blob], grid: GridDims, filter: &BlobFilter) -> Option<&'a Blob> {
    let mut best: Option<&Blob> = None;
    for blob in blobs.iter().filter(|b| admits(b, grid, filter)) {
        if best.map_or(true, |b| blob.cell_count > b.cell_count) {
            best = Some(blob);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use salient_region_model::{AspectBounds, MinClusterSize};

    fn blob(min_x: usize, min_y: usize, w: usize, h: usize, count: usize) -> Blob {
        Blob {
            min_x,
            max_x: min_x + w - 1,
            min_y,
            max_y: min_y + h - 1,
            cell_count: count,
            centroid: (min_x as f64 + (w - 1) as f64 / 2.0, min_y as f64 + (h - 1) as f64 / 2.0),
        }
    }

    fn filter(min: usize, max_fraction: f64) -> BlobFilter {
        BlobFilter {
            min_size: MinClusterSize::Cells(min),
            max_fraction,
            aspect: None,
        }
    }

    #[test]
    fn test_rejects_small_blob() {
        let grid = GridDims::new(10, 10);
        let small = blob(0, 0, 2, 1, 2);
        assert!(!admits(&small, grid, &filter(4, 0.4)));
        assert!(select(&[small], grid, &filter(4, 0.4)).is_none());
    }

    #[test]
    fn test_rejects_oversized_blob() {
        let grid = GridDims::new(10, 10);
        let huge = blob(0, 0, 10, 6, 60);
        assert!(!admits(&huge, grid, &filter(4, 0.4)));
        assert!(admits(&huge, grid, &filter(4, 0.6)));
    }

    #[test]
    fn test_area_fraction_minimum() {
        let grid = GridDims::new(10, 10);
        let f = BlobFilter {
            min_size: MinClusterSize::AreaFraction(0.05),
            ..filter(0, 1.0)
        };
        assert!(!admits(&blob(0, 0, 2, 2, 4), grid, &f));
        assert!(admits(&blob(0, 0, 5, 1, 5), grid, &f));
    }

    #[test]
    fn test_aspect_gate() {
        let grid = GridDims::new(20, 20);
        let sliver = blob(0, 0, 12, 1, 12);
        let mut f = filter(4, 0.4);
        assert!(admits(&sliver, grid, &f));

        f.aspect = Some(AspectBounds { min: 0.2, max: 5.0 });
        assert!(!admits(&sliver, grid, &f));
        assert!(admits(&blob(0, 0, 3, 3, 9), grid, &f));
    }

    #[test]
    fn test_largest_wins_ties_go_first() {
        let grid = GridDims::new(20, 20);
        let blobs = [
            blob(0, 0, 2, 3, 6),
            blob(5, 0, 3, 3, 9),
            blob(10, 10, 3, 3, 9),
            blob(15, 15, 1, 4, 4),
        ];
        let winner = select(&blobs, grid, &filter(4, 0.4)).unwrap();
        assert_eq!((winner.min_x, winner.min_y), (5, 0));
    }

    #[test]
    fn test_filtered_largest_falls_back_to_next() {
        let grid = GridDims::new(10, 10);
        let blobs = [blob(0, 0, 10, 5, 50), blob(0, 6, 3, 2, 6)];
        let winner = select(&blobs, grid, &filter(4, 0.4)).unwrap();
        assert_eq!(winner.cell_count, 6);
    }
}
