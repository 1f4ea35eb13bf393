use crate::Value;

pub mod coord_list;
pub mod coord_map;

pub use coord_list::CoordList;
pub use coord_map::CoordinateMap;

/// Read-only access shared by the matrix representations.
pub trait SparseMatrixView {
    fn n_rows(&self) -> usize;
    fn n_cols(&self) -> usize;

    fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    fn nnz(&self) -> usize;

    /// Non-zero entries as `(row, col, value)`; order is up to the implementor.
    fn iter(&self) -> Box<dyn Iterator<Item = (usize, usize, Value)> + '_>;
}
