use std::{
    collections::{hash_map::Entry, HashMap},
    fmt::{self, Display},
    ops::Index,
    panic,
};

use crossbeam::thread;
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::{
    data_structures::{coord_map, CoordList, CoordinateMap, SparseMatrixView},
    error::{Result, SparseError},
    Value,
};

/// Row `k` of a right-hand operand: `(col, value)` pairs.
type RowIndex = HashMap<usize, Vec<(usize, Value)>>;

/// Partial products, widened so the order of accumulation cannot overflow.
type Accumulator = HashMap<(usize, usize), i128>;

/// Integer matrix storing only its non-zero cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMatrix {
    n_rows: usize,
    n_cols: usize,
    entries: CoordinateMap,
}

impl SparseMatrix {
    /// Empty matrix of the given shape. Both sides must be positive.
    pub fn new(n_rows: usize, n_cols: usize) -> Result<Self> {
        if n_rows == 0 || n_cols == 0 {
            return Err(SparseError::InvalidDimensions { n_rows, n_cols });
        }
        Ok(Self {
            n_rows,
            n_cols,
            entries: CoordinateMap::new(),
        })
    }

    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::new(n, n)?;
        for k in 0..n {
            m.entries.insert(k, k, 1);
        }
        Ok(m)
    }

    pub fn from_dense(dense: ArrayView2<Value>) -> Result<Self> {
        let (n_rows, n_cols) = dense.dim();
        let mut m = Self::new(n_rows, n_cols)?;
        for ((i, j), &v) in dense.indexed_iter() {
            m.store(i, j, v);
        }
        Ok(m)
    }

    /// Materializes the full grid. Only sensible for small matrices.
    pub fn to_dense(&self) -> Array2<Value> {
        let mut dense = Array2::zeros((self.n_rows, self.n_cols));
        for (i, j, v) in self.iter() {
            dense[[i, j]] = v;
        }
        dense
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of non-zero cells.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn nnz_row(&self, row: usize) -> usize {
        self.entries.nnz_row(row)
    }

    /// Non-zero cells in unspecified order.
    pub fn iter(&self) -> coord_map::Iter<'_> {
        self.entries.iter()
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.n_rows || col >= self.n_cols {
            return Err(SparseError::IndexOutOfBounds {
                row,
                col,
                n_rows: self.n_rows,
                n_cols: self.n_cols,
            });
        }
        Ok(())
    }

    pub fn get_element(&self, row: usize, col: usize) -> Result<Value> {
        self.check_bounds(row, col)?;
        Ok(self.entries.get(row, col))
    }

    /// Writes a cell; writing zero deletes it.
    pub fn set_element(&mut self, row: usize, col: usize, value: Value) -> Result<()> {
        self.check_bounds(row, col)?;
        self.store(row, col, value);
        Ok(())
    }

    /// Unchecked write keeping the no-stored-zero invariant.
    pub(crate) fn store(&mut self, row: usize, col: usize, value: Value) {
        if value == 0 {
            self.entries.remove(row, col);
        } else {
            self.entries.insert(row, col, value);
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.combine(other, "addition", Value::checked_add)
    }

    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.combine(other, "subtraction", Value::checked_sub)
    }

    /// Copies `self`, then folds every entry of `other` into it with `op`.
    fn combine(
        &self,
        other: &Self,
        op_name: &'static str,
        op: fn(Value, Value) -> Option<Value>,
    ) -> Result<Self> {
        if self.shape() != other.shape() {
            return Err(SparseError::DimensionMismatch {
                op: op_name,
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }

        let mut result = self.clone();
        for (i, j, v) in other.iter() {
            let current = result.entries.get(i, j);
            let updated = op(current, v).ok_or(SparseError::Overflow { row: i, col: j })?;
            result.store(i, j, updated);
        }
        Ok(result)
    }

    fn check_product(&self, other: &Self) -> Result<()> {
        if self.n_cols != other.n_rows {
            return Err(SparseError::IncompatibleDimensions {
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        Ok(())
    }

    /// Matrix product `self * other`.
    ///
    /// Only pairs of non-zero entries contribute: `other` is grouped by row
    /// once, and every entry `(i, k, a)` of `self` is combined with row `k`.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        self.check_product(other)?;
        debug!(
            lhs_nnz = self.nnz(),
            rhs_nnz = other.nnz(),
            "multiplying sequentially"
        );

        let index = other.row_index();
        let acc = accumulate(self.iter(), &index)?;
        Self::from_accumulator(self.n_rows, other.n_cols, acc)
    }

    /// Same result as [`SparseMatrix::multiply`], with the entries of `self`
    /// split across `n_workers` threads.
    pub fn multiply_parallel(&self, other: &Self, n_workers: usize) -> Result<Self> {
        if n_workers <= 1 {
            return self.multiply(other);
        }
        self.check_product(other)?;

        let entries = self.entries.entries();
        let n_workers = n_workers.min(entries.len()).max(1);
        let chunk_size = entries.len().div_ceil(n_workers).max(1);
        debug!(
            lhs_nnz = self.nnz(),
            rhs_nnz = other.nnz(),
            n_workers,
            chunk_size,
            "multiplying in parallel"
        );

        let index = other.row_index();
        let index = &index;
        let partials: Vec<Result<Accumulator>> = thread::scope(|s| {
            let handles: Vec<_> = entries
                .chunks(chunk_size)
                .map(|chunk| s.spawn(move |_| accumulate(chunk.iter().copied(), index)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        })
        .unwrap_or_else(|e| panic::resume_unwind(e));

        let mut total = Accumulator::new();
        for partial in partials {
            for ((i, j), sum) in partial? {
                match total.entry((i, j)) {
                    Entry::Occupied(mut o) => {
                        let merged = o
                            .get()
                            .checked_add(sum)
                            .ok_or(SparseError::Overflow { row: i, col: j })?;
                        *o.get_mut() = merged;
                    }
                    Entry::Vacant(v) => {
                        v.insert(sum);
                    }
                }
            }
        }
        Self::from_accumulator(self.n_rows, other.n_cols, total)
    }

    fn row_index(&self) -> RowIndex {
        let mut index = RowIndex::with_capacity(self.entries.occupied_rows());
        for (k, j, v) in self.iter() {
            index
                .entry(k)
                .or_insert_with(|| Vec::with_capacity(self.entries.nnz_row(k)))
                .push((j, v));
        }
        index
    }

    fn from_accumulator(n_rows: usize, n_cols: usize, acc: Accumulator) -> Result<Self> {
        let mut result = Self::new(n_rows, n_cols)?;
        for ((i, j), sum) in acc {
            let v = Value::try_from(sum).map_err(|_| SparseError::Overflow { row: i, col: j })?;
            result.store(i, j, v);
        }
        Ok(result)
    }
}

fn accumulate(
    lhs: impl Iterator<Item = (usize, usize, Value)>,
    rhs_rows: &RowIndex,
) -> Result<Accumulator> {
    let mut acc = Accumulator::new();
    for (i, k, a) in lhs {
        let Some(row) = rhs_rows.get(&k) else {
            continue;
        };
        for &(j, b) in row {
            let cell = acc.entry((i, j)).or_insert(0);
            *cell = cell
                .checked_add(a as i128 * b as i128)
                .ok_or(SparseError::Overflow { row: i, col: j })?;
        }
    }
    Ok(acc)
}

impl SparseMatrixView for SparseMatrix {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_cols(&self) -> usize {
        self.n_cols
    }

    fn nnz(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (usize, usize, Value)> + '_> {
        Box::new(self.entries.iter())
    }
}

impl Index<(usize, usize)> for SparseMatrix {
    type Output = Value;
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.n_rows && col < self.n_cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.n_rows,
            self.n_cols
        );
        self.entries.get_ref(row, col).unwrap_or(&0)
    }
}

impl Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        CoordList::from_view(self).fmt(f)
    }
}
