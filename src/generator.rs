use std::ops::RangeInclusive;

use ndarray_rand::{
    rand::{rngs::StdRng, Rng, SeedableRng},
    rand_distr::Uniform,
};
use tracing::debug;

use crate::{
    error::{Result, SparseError},
    SparseMatrix, Value,
};

/// Seeded random matrix with `nnz` distinct non-zero cells.
///
/// Coordinates are uniform over the shape, values uniform over `values`
/// with zero redrawn. `nnz` is capped at `n_rows * n_cols`. The same seed
/// always yields the same matrix.
pub fn random_sparse(
    n_rows: usize,
    n_cols: usize,
    nnz: usize,
    values: RangeInclusive<Value>,
    seed: u64,
) -> Result<SparseMatrix> {
    let (min, max) = (*values.start(), *values.end());
    if min > max || (min == 0 && max == 0) {
        return Err(SparseError::InvalidValueRange { min, max });
    }

    let mut m = SparseMatrix::new(n_rows, n_cols)?;
    let target = nnz.min(n_rows.saturating_mul(n_cols));
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Uniform::new_inclusive(min, max);

    while m.nnz() < target {
        let i = rng.gen_range(0..n_rows);
        let j = rng.gen_range(0..n_cols);
        if m[(i, j)] != 0 {
            continue;
        }
        let v = loop {
            let v = rng.sample(&dist);
            if v != 0 {
                break v;
            }
        };
        m.store(i, j, v);
    }

    debug!(n_rows, n_cols, nnz = m.nnz(), seed, "generated random matrix");
    Ok(m)
}
