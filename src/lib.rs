//! Sparse integer matrices backed by a coordinate hash map.
//!
//! Matrices are read from and written to a small line-oriented text format
//! (see [`data_loader`]), and support element access plus addition,
//! subtraction and multiplication that only ever touch non-zero cells.
//!
//! ```
//! use sparsemat::{data_loader::read_matrix, SparseMatrix};
//!
//! let (a, report) = read_matrix("rows=2\ncols=2\n(0, 0, 1)\n(1, 1, 2)\n".as_bytes()).unwrap();
//! assert_eq!(report.processed, 2);
//!
//! let mut b = SparseMatrix::new(2, 2).unwrap();
//! b.set_element(0, 1, 3).unwrap();
//! b.set_element(1, 0, 4).unwrap();
//!
//! let c = a.multiply(&b).unwrap();
//! assert_eq!(c.to_string(), "rows=2\ncols=2\n(0, 1, 3)\n(1, 0, 8)\n");
//! ```

pub mod data_loader;
pub mod data_structures;
pub mod data_writer;
pub mod error;
pub mod generator;
pub mod sparse_matrix;

pub use data_loader::{load_matrix, load_matrix_with_report, read_matrix, LoadReport};
pub use data_structures::SparseMatrixView;
pub use data_writer::{save_matrix, write_matrix};
pub use error::{FormatReason, Result, SparseError};
pub use sparse_matrix::SparseMatrix;

/// Element type of every matrix.
pub type Value = i64;
