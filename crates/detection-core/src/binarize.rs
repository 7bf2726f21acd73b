//! Score map thresholding.

use crate::error::{DetectError, DetectResult};

/// Write `scores[i] > threshold` into `mask` and return the active count.
pub fn binarize(scores: &[f64], threshold: f64, mask: &mut [bool]) -> DetectResult<usize> {
    DetectError::check_len("active mask", scores.len(), mask.len())?;

    let mut active = 0;
    for (cell, &score) in mask.iter_mut().zip(scores) {
        *cell = score > threshold;
        active += *cell as usize;
    }
    Ok(active)
}

/// Number of active cells in a mask.
pub fn active_count(mask: &[bool]) -> usize {
    mask.iter().filter(|&&a| a).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strictly_greater() {
        let scores = [10.0, 30.0, 30.5, -4.0];
        let mut mask = [false; 4];
        let active = binarize(&scores, 30.0, &mut mask).unwrap();
        assert_eq!(mask, [false, false, true, false]);
        assert_eq!(active, 1);
        assert_eq!(active_count(&mask), 1);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let mut mask = [false; 3];
        assert!(binarize(&[1.0, 2.0], 0.0, &mut mask).is_err());
    }

    proptest! {
        #[test]
        fn raising_threshold_never_adds_cells(
            scores in prop::collection::vec(-300.0f64..300.0, 0..200),
            low in -300.0f64..300.0,
            delta in 0.0f64..300.0,
        ) {
            let mut mask = vec![false; scores.len()];
            let at_low = binarize(&scores, low, &mut mask).unwrap();
            let at_high = binarize(&scores, low + delta, &mut mask).unwrap();
            prop_assert!(at_high <= at_low);
        }
    }
}
