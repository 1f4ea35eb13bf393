use std::{
    fmt::{self, Display},
    ops::Index,
};

use crate::{data_structures::SparseMatrixView, Value};

/// Entries of a matrix frozen in row-major order.
///
/// Rendering through [`Display`] produces the text format read by
/// [`crate::data_loader`], so two equal matrices always serialize to the
/// same bytes regardless of hash order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordList {
    data: Vec<(usize, usize, Value)>,
    n_rows: usize,
    n_cols: usize,
}

impl CoordList {
    pub fn from_view<M: SparseMatrixView + ?Sized>(matrix: &M) -> Self {
        let mut data: Vec<_> = matrix.iter().collect();
        // stable merge sort, row first then column
        data.sort_by_key(|&(i, j, _)| (i, j));
        Self {
            data,
            n_rows: matrix.n_rows(),
            n_cols: matrix.n_cols(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[(usize, usize, Value)] {
        &self.data
    }
}

impl SparseMatrixView for CoordList {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_cols(&self) -> usize {
        self.n_cols
    }

    fn nnz(&self) -> usize {
        self.data.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (usize, usize, Value)> + '_> {
        Box::new(self.data.iter().copied())
    }
}

impl Display for CoordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows={}", self.n_rows)?;
        writeln!(f, "cols={}", self.n_cols)?;
        for &(i, j, e) in &self.data {
            writeln!(f, "({}, {}, {})", i, j, e)?;
        }
        Ok(())
    }
}

impl Index<usize> for CoordList {
    type Output = (usize, usize, Value);
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SparseMatrix;

    #[test]
    fn test_sorted_row_then_col() {
        let mut m = SparseMatrix::new(4, 4).unwrap();
        for &(i, j, v) in &[(3, 0, 1), (0, 3, 2), (0, 1, 3), (2, 2, 4), (3, 1, 5)] {
            m.set_element(i, j, v).unwrap();
        }
        let list = CoordList::from_view(&m);
        assert_eq!(
            list.as_slice(),
            &[(0, 1, 3), (0, 3, 2), (2, 2, 4), (3, 0, 1), (3, 1, 5)]
        );
        assert_eq!(list[2], (2, 2, 4));
        assert_eq!(list.shape(), (4, 4));
    }

    #[test]
    fn test_display_format() {
        let mut m = SparseMatrix::new(3, 5).unwrap();
        m.set_element(1, 4, -2).unwrap();
        m.set_element(0, 0, 7).unwrap();
        let text = CoordList::from_view(&m).to_string();
        assert_eq!(text, "rows=3\ncols=5\n(0, 0, 7)\n(1, 4, -2)\n");
    }

    #[test]
    fn test_empty_matrix_has_headers_only() {
        let m = SparseMatrix::new(2, 2).unwrap();
        let list = CoordList::from_view(&m);
        assert!(list.is_empty());
        assert_eq!(list.to_string(), "rows=2\ncols=2\n");
    }
}
