//! This module provides utilities for loading benchmark matrices from files.
//!
//! Matrices are stored in the Matrix Market coordinate format and read with
//! [`matrix_market_rs`]. This module only turns the coordinate data into the
//! compressed layout requested by the caller: it bounds-checks the indices, expands
//! symmetric storage into the full matrix and sums duplicates during triplet assembly.
//! Every call reads the file again: nothing is cached between benchmark runs.

use crate::matrix::{Layout, SparseMatrix};
use faer::sparse::{SparseColMat, SparseRowMat, Triplet};
use glob::{Pattern, glob};
use matrix_market_rs::{MtxData, SymInfo};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Represents all possible errors that can occur during data loading and parsing.
#[derive(Error, Debug)]
pub enum DataLoaderError {
    /// Wraps a standard I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The Matrix Market reader rejected the file.
    #[error("Format error: {0}")]
    MatrixMarket(String),
    /// The file holds a dense `array` matrix; only sparse `coordinate` data is benchmarked.
    #[error("Format error: Dense Matrix Market arrays are not supported.")]
    DenseArray,
    /// Occurs when an entry points outside the declared dimensions.
    #[error("Index error: entry ({row}, {col}) is outside a {nrows}x{ncols} matrix.")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },
    /// Occurs when the corpus directory cannot be turned into a glob pattern.
    #[error("Pattern error: {0}")]
    Pattern(String),
    /// Occurs if the sparse matrix construction fails internally.
    #[error("Internal error: Failed to construct the sparse matrix from triplets.")]
    SparseMatrixConstructionError,
}

/// Dimensions and fully expanded, zero-based triplets of a coordinate matrix.
type Coordinates = (usize, usize, Vec<Triplet<usize, usize, f64>>);

/// Expands the coordinate data returned by the reader into the triplets of the full matrix.
///
/// Entries of `symmetric` and `hermitian` (real-valued) storage are mirrored across the
/// diagonal; `skew-symmetric` entries are mirrored negated.
fn expand_coordinates(data: MtxData<f64>) -> Result<Coordinates, DataLoaderError> {
    let MtxData::Sparse([nrows, ncols], coords, values, symmetry) = data else {
        return Err(DataLoaderError::DenseArray);
    };

    let capacity = match symmetry {
        SymInfo::General => values.len(),
        _ => 2 * values.len(),
    };
    let mut triplets = Vec::with_capacity(capacity);

    for ([row, col], val) in coords.into_iter().zip(values) {
        if row >= nrows || col >= ncols {
            return Err(DataLoaderError::IndexOutOfBounds {
                row,
                col,
                nrows,
                ncols,
            });
        }
        triplets.push(Triplet::new(row, col, val));
        if row != col {
            match symmetry {
                SymInfo::General => {}
                SymInfo::Symmetric => triplets.push(Triplet::new(col, row, val)),
            }
        }
    }

    Ok((nrows, ncols, triplets))
}

/// Loads a Matrix Market file into the requested compressed layout.
///
/// # Arguments
/// * `path`: The path to the `.mtx` file.
/// * `layout`: [`Layout::Csr`] for PARDISO, [`Layout::Csc`] for UMFPACK and SuperLU.
///
/// # Returns
/// The assembled [`SparseMatrix`]. Duplicate entries are summed.
pub fn load_matrix(
    path: impl AsRef<Path>,
    layout: Layout,
) -> Result<SparseMatrix, DataLoaderError> {
    let data = MtxData::<f64>::from_file(path.as_ref())
        .map_err(|e| DataLoaderError::MatrixMarket(format!("{e:?}")))?;
    let (nrows, ncols, triplets) = expand_coordinates(data)?;

    let matrix = match layout {
        Layout::Csr => SparseMatrix::Csr(
            SparseRowMat::try_new_from_triplets(nrows, ncols, &triplets)
                .map_err(|_| DataLoaderError::SparseMatrixConstructionError)?,
        ),
        Layout::Csc => SparseMatrix::Csc(
            SparseColMat::try_new_from_triplets(nrows, ncols, &triplets)
                .map_err(|_| DataLoaderError::SparseMatrixConstructionError)?,
        ),
    };
    Ok(matrix)
}

/// Lists the `*.mtx` files of a corpus directory in lexicographic order.
///
/// A directory that does not exist yields an empty list. Glob metacharacters in the
/// directory name are matched literally.
pub fn discover_matrices(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, DataLoaderError> {
    let dir = dir.as_ref().to_string_lossy();
    let pattern = Path::new(&Pattern::escape(&dir)).join("*.mtx");
    let pattern = pattern.to_string_lossy();
    let entries = glob(&pattern)
        .map_err(|e| DataLoaderError::Pattern(format!("glob pattern '{pattern}': {e}")))?;

    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry.map_err(io::Error::from)?);
    }
    paths.sort();
    Ok(paths)
}
