//! Input boundary of the solver.
//!
//! The solver itself never parses anything. Whatever supplies the distance
//! matrix (a file, an in-memory table, a generator in a test) implements
//! [`MatrixProvider`] and is responsible for rejecting malformed input before
//! a solve starts.

use crate::error::Result;
use crate::matrix::DistanceMatrix;

/// Source of a complete, validated n×n distance matrix.
///
/// Implementations must either produce every entry or fail with
/// [`Error::InvalidInput`](crate::Error::InvalidInput) (or
/// [`Error::Io`](crate::Error::Io) when reading fails). Partial matrices are
/// never returned.
pub trait MatrixProvider {
    fn load(&self) -> Result<DistanceMatrix>;
}

impl MatrixProvider for DistanceMatrix {
    fn load(&self) -> Result<DistanceMatrix> {
        Ok(self.clone())
    }
}

impl<P: MatrixProvider + ?Sized> MatrixProvider for &P {
    fn load(&self) -> Result<DistanceMatrix> {
        (**self).load()
    }
}

impl<P: MatrixProvider + ?Sized> MatrixProvider for Box<P> {
    fn load(&self) -> Result<DistanceMatrix> {
        (**self).load()
    }
}
