// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Sparse coordinate arrays.

use arrow::array::{Array, ArrayBuilder, Float32Array, Float32Builder, Int32Array, Int32Builder};

use crate::errors::{CFError, Result};

use super::CSRMatrix;

/// A sparse matrix in coordinate form.
///
/// Coordinates may repeat; repeated entries are summed when the matrix is
/// compressed with [COOMatrix::to_csr].
pub struct COOMatrix {
    pub row: Int32Array,
    pub col: Int32Array,
    pub val: Float32Array,
}

pub struct COOMatrixBuilder {
    row: Int32Builder,
    col: Int32Builder,
    val: Float32Builder,
}

impl COOMatrixBuilder {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Initialize a builder with a specified capacity.
    pub fn with_capacity(cap: usize) -> Self {
        COOMatrixBuilder {
            row: Int32Builder::with_capacity(cap),
            col: Int32Builder::with_capacity(cap),
            val: Float32Builder::with_capacity(cap),
        }
    }

    pub fn add_entry(&mut self, row: i32, col: i32, val: f32) {
        self.row.append_value(row);
        self.col.append_value(col);
        self.val.append_value(val);
    }

    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the final COO matrix from this builder.
    pub fn finish(mut self) -> COOMatrix {
        COOMatrix {
            row: self.row.finish(),
            col: self.col.finish(),
            val: self.val.finish(),
        }
    }
}

impl Default for COOMatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl COOMatrix {
    /// Get the number of stored coordinates (including duplicates).
    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compress into a CSR matrix of the given shape.
    ///
    /// Entries with the same coordinates are summed, and each output row has
    /// its column indices in ascending order.
    pub fn to_csr(&self, n_rows: usize, n_cols: usize) -> Result<CSRMatrix> {
        let rows = self.row.values();
        let cols = self.col.values();
        let vals = self.val.values();
        let n = rows.len();

        // step 1: count row entries, placing counts in rps[r+1]
        let mut starts = vec![0usize; n_rows + 1];
        for i in 0..n {
            let (r, c) = (rows[i], cols[i]);
            if r < 0 || r as usize >= n_rows || c < 0 || c as usize >= n_cols {
                return Err(CFError::InvalidInput(format!(
                    "coordinate ({}, {}) outside {}x{} matrix",
                    r, c, n_rows, n_cols
                )));
            }
            starts[r as usize + 1] += 1;
        }

        // step 2: convert counts into offsets
        for i in 1..=n_rows {
            starts[i] += starts[i - 1];
        }

        // step 3: scatter entries into their rows
        let mut fill = starts.clone();
        let mut entries = vec![(0i32, 0.0f32); n];
        for i in 0..n {
            let r = rows[i] as usize;
            entries[fill[r]] = (cols[i], vals[i]);
            fill[r] += 1;
        }

        // step 4: sort each row and sum duplicate columns
        let mut row_ptrs = Vec::with_capacity(n_rows + 1);
        let mut col_inds: Vec<i32> = Vec::with_capacity(n);
        let mut values: Vec<f32> = Vec::with_capacity(n);
        row_ptrs.push(0i64);
        for r in 0..n_rows {
            let row_start = col_inds.len();
            let row = &mut entries[starts[r]..starts[r + 1]];
            row.sort_by_key(|(c, _)| *c);
            for &(c, v) in row.iter() {
                let repeated = col_inds.len() > row_start && col_inds.last() == Some(&c);
                if !repeated {
                    col_inds.push(c);
                    values.push(v);
                } else if let Some(acc) = values.last_mut() {
                    *acc += v;
                }
            }
            row_ptrs.push(col_inds.len() as i64);
        }

        Ok(CSRMatrix::from_parts(
            n_rows, n_cols, row_ptrs, col_inds, values,
        ))
    }
}
