use ndarray::Array2;

// Helper function for approximate comparison of gridded values
pub fn assert_grid_approx_eq(result: &Array2<f64>, expected: &Array2<f64>, tolerance: f64) {
    assert_eq!(result.dim(), expected.dim(), "Grid shape mismatch");
    for ((i, j), value) in result.indexed_iter() {
        let diff = (value - expected[[i, j]]).abs();
        assert!(
            diff < tolerance,
            "Mismatch at [{}][{}]: result = {:.6}, expected = {:.6}",
            i,
            j,
            value,
            expected[[i, j]]
        );
    }
}
