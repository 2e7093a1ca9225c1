use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView2, Zip};

/// Distinct non-zero labels of a slice, ascending.
pub fn class_set(labels: &ArrayView2<'_, u32>) -> BTreeSet<u32> {
    labels.iter().copied().filter(|&label| label != 0).collect()
}

/// Mark the boundary pixels of every class in `labels`.
///
/// Each class is isolated as a 0/1 indicator and run through a 5-point
/// Laplacian; pixels with a non-zero response take the class label.
/// Classes are visited in ascending order, so where two boundaries meet
/// the higher label is kept.
pub fn class_boundaries(labels: &ArrayView2<'_, u32>) -> Array2<u32> {
    let mut boundary = Array2::zeros(labels.raw_dim());

    for class in class_set(labels) {
        let indicator = labels.mapv(|label| i32::from(label == class));
        let response = laplace(&indicator.view());
        Zip::from(&mut boundary)
            .and(&response)
            .for_each(|out, &edge| {
                if edge != 0 {
                    *out = class;
                }
            });
    }

    boundary
}

/// Discrete Laplacian with reflected borders: a neighbour outside the
/// slice takes the value of the edge pixel it mirrors.
fn laplace(field: &ArrayView2<'_, i32>) -> Array2<i32> {
    let (rows, cols) = field.dim();
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let centre = field[[r, c]];
        let up = if r > 0 { field[[r - 1, c]] } else { centre };
        let down = if r + 1 < rows { field[[r + 1, c]] } else { centre };
        let left = if c > 0 { field[[r, c - 1]] } else { centre };
        let right = if c + 1 < cols { field[[r, c + 1]] } else { centre };
        up + down + left + right - 4 * centre
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, s};

    #[test]
    fn empty_class_set_gives_zero_boundary() {
        let labels = Array2::<u32>::zeros((5, 4));
        let boundary = class_boundaries(&labels.view());
        assert_eq!(boundary.dim(), (5, 4));
        assert!(boundary.iter().all(|&b| b == 0));
    }

    #[test]
    fn square_region_marks_its_rim() {
        let mut labels = Array2::<u32>::zeros((9, 9));
        labels.slice_mut(s![3..6, 3..6]).fill(5);

        let boundary = class_boundaries(&labels.view());

        for ((r, c), &b) in boundary.indexed_iter() {
            let inside = (3..6).contains(&r) && (3..6).contains(&c);
            let inner_rim = inside && (r == 3 || r == 5 || c == 3 || c == 5);
            let outer_rim = !inside
                && (((r == 2 || r == 6) && (3..6).contains(&c))
                    || ((c == 2 || c == 6) && (3..6).contains(&r)));
            let expected = if inner_rim || outer_rim { 5 } else { 0 };
            assert_eq!(b, expected, "pixel ({r}, {c})");
        }
        assert_eq!(boundary[[4, 4]], 0);
        assert_eq!(boundary[[2, 2]], 0);
    }

    #[test]
    fn region_touching_the_border_has_no_edge_at_the_border() {
        let mut labels = Array2::<u32>::zeros((4, 4));
        labels.slice_mut(s![.., 0..2]).fill(1);

        let boundary = class_boundaries(&labels.view());

        // reflection makes the slice edge look like more of the same region
        assert_eq!(boundary.column(0).to_vec(), vec![0, 0, 0, 0]);
        assert_eq!(boundary.column(1).to_vec(), vec![1, 1, 1, 1]);
        assert_eq!(boundary.column(2).to_vec(), vec![1, 1, 1, 1]);
        assert_eq!(boundary.column(3).to_vec(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn higher_label_wins_shared_boundary() {
        let mut labels = Array2::<u32>::zeros((6, 6));
        labels.slice_mut(s![.., 0..3]).fill(2);
        labels.slice_mut(s![.., 3..6]).fill(5);

        let boundary = class_boundaries(&labels.view());

        for r in 0..6 {
            assert_eq!(boundary[[r, 2]], 5);
            assert_eq!(boundary[[r, 3]], 5);
            assert_eq!(boundary[[r, 0]], 0);
            assert_eq!(boundary[[r, 5]], 0);
        }
    }

    #[test]
    fn class_set_skips_background() {
        let labels = ndarray::array![[0, 3, 3], [1, 0, 3]];
        let classes: Vec<u32> = class_set(&labels.view()).into_iter().collect();
        assert_eq!(classes, vec![1, 3]);
    }
}
