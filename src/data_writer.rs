use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use tracing::debug;

use crate::{
    data_structures::{CoordList, SparseMatrixView},
    error::{Result, SparseError},
};

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Writes the text format with entries in row-major order.
pub fn write_matrix<M, W>(matrix: &M, mut writer: W) -> Result<()>
where
    M: SparseMatrixView + ?Sized,
    W: Write,
{
    let list = CoordList::from_view(matrix);
    write!(writer, "{}", list)?;
    writer.flush()?;
    Ok(())
}

/// Saves `matrix` to `path`, creating missing parent directories.
pub fn save_matrix<M>(matrix: &M, path: impl AsRef<Path>) -> Result<()>
where
    M: SparseMatrixView + ?Sized,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SparseError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| SparseError::io(path, e))?;
    let writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    write_matrix(matrix, writer).map_err(|e| match e {
        SparseError::Stream(source) => SparseError::io(path, source),
        e => e,
    })?;

    debug!(path = %path.display(), nnz = matrix.nnz(), "matrix saved");
    Ok(())
}
