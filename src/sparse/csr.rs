// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use arrow::{
    array::{Array, Float32Array, Int32Array, LargeListArray, StructArray},
    buffer::OffsetBuffer,
};
use arrow_schema::{DataType, Field, Fields};

use crate::errors::{CFError, Result};

/// A compressed sparse row matrix.
///
/// Rows are stored as an Arrow large list of `{index, value}` structs, so the
/// row pointers are the list offsets.
#[derive(Clone, Debug)]
pub struct CSRMatrix {
    pub n_rows: usize,
    pub n_cols: usize,
    array: LargeListArray,
    col_inds: Int32Array,
    values: Float32Array,
}

fn row_fields() -> Fields {
    Fields::from(vec![
        Field::new("index", DataType::Int32, false),
        Field::new("value", DataType::Float32, false),
    ])
}

impl CSRMatrix {
    /// Create a CSR matrix from its row pointers, column indices and values.
    ///
    /// Row pointers must start at zero and never decrease, and each row's
    /// column indices must be strictly increasing and less than `n_cols`.
    pub fn try_from_parts(
        n_rows: usize,
        n_cols: usize,
        row_ptrs: Vec<i64>,
        col_inds: Vec<i32>,
        values: Vec<f32>,
    ) -> Result<CSRMatrix> {
        if row_ptrs.len() != n_rows + 1 {
            return Err(CFError::InvalidInput(format!(
                "expected {} row pointers, found {}",
                n_rows + 1,
                row_ptrs.len()
            )));
        }
        if col_inds.len() != values.len() {
            return Err(CFError::InvalidInput(format!(
                "{} column indices but {} values",
                col_inds.len(),
                values.len()
            )));
        }
        if row_ptrs[0] != 0 || row_ptrs[n_rows] as usize != col_inds.len() {
            return Err(CFError::InvalidInput(
                "row pointers do not span the column indices".into(),
            ));
        }
        for (row, w) in row_ptrs.windows(2).enumerate() {
            if w[1] < w[0] || w[1] as usize > col_inds.len() {
                return Err(CFError::InvalidInput(format!(
                    "invalid row pointers at row {}",
                    row
                )));
            }
            let cols = &col_inds[w[0] as usize..w[1] as usize];
            if cols.iter().any(|c| *c < 0 || *c as usize >= n_cols) {
                return Err(CFError::InvalidInput(format!(
                    "row {} has a column index outside 0..{}",
                    row, n_cols
                )));
            }
            if cols.windows(2).any(|p| p[1] <= p[0]) {
                return Err(CFError::InvalidInput(format!(
                    "row {} columns are not sorted and distinct",
                    row
                )));
            }
        }
        Ok(Self::from_parts(n_rows, n_cols, row_ptrs, col_inds, values))
    }

    /// Assemble a CSR matrix from parts already known to be consistent.
    ///
    /// Panics if the arrays are inconsistent with each other or the shape.
    pub(crate) fn from_parts(
        n_rows: usize,
        n_cols: usize,
        row_ptrs: Vec<i64>,
        col_inds: Vec<i32>,
        values: Vec<f32>,
    ) -> CSRMatrix {
        assert_eq!(row_ptrs.len(), n_rows + 1);
        assert_eq!(col_inds.len(), values.len());
        assert_eq!(row_ptrs[n_rows] as usize, col_inds.len());
        Self::assemble(
            n_rows,
            n_cols,
            OffsetBuffer::new(row_ptrs.into()),
            Int32Array::from(col_inds),
            Float32Array::from(values),
        )
    }

    fn assemble(
        n_rows: usize,
        n_cols: usize,
        offsets: OffsetBuffer<i64>,
        col_inds: Int32Array,
        values: Float32Array,
    ) -> CSRMatrix {
        let struct_fields = row_fields();
        let list_field = Field::new("rows", DataType::Struct(struct_fields.clone()), false);
        let sa = StructArray::new(
            struct_fields,
            vec![Arc::new(col_inds.clone()), Arc::new(values.clone())],
            None,
        );
        let array = LargeListArray::new(Arc::new(list_field), offsets, Arc::new(sa), None);

        CSRMatrix {
            n_rows,
            n_cols,
            array,
            col_inds,
            values,
        }
    }

    /// Create a matrix with the same structure and new values.
    pub fn with_values(&self, values: Vec<f32>) -> CSRMatrix {
        assert_eq!(values.len(), self.nnz());
        Self::assemble(
            self.n_rows,
            self.n_cols,
            self.array.offsets().clone(),
            self.col_inds.clone(),
            Float32Array::from(values),
        )
    }

    /// Get the underlying Arrow array of rows.
    pub fn array(&self) -> &LargeListArray {
        &self.array
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Get the "length" (number of rows) in the matrix.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of observed values in the matrix.
    pub fn nnz(&self) -> usize {
        self.row_ptrs()[self.len()] as usize
    }

    /// Get the row pointers as a slice.
    pub fn row_ptrs(&self) -> &[i64] {
        self.array.value_offsets()
    }

    /// Get the extent in the underlying arrays for a row in the matrix.
    pub fn extent(&self, row: usize) -> (usize, usize) {
        let off = self.row_ptrs();
        (off[row] as usize, off[row + 1] as usize)
    }

    /// Get all column indices.
    pub fn col_inds(&self) -> &[i32] {
        self.col_inds.values()
    }

    /// Get all stored values.
    pub fn values(&self) -> &[f32] {
        self.values.values()
    }

    /// Get the column indices for a row in the matrix.
    pub fn row_cols(&self, row: usize) -> &[i32] {
        let (start, end) = self.extent(row);
        &self.col_inds()[start..end]
    }

    /// Get the values for a row in the matrix.
    pub fn row_vals(&self, row: usize) -> &[f32] {
        let (start, end) = self.extent(row);
        &self.values()[start..end]
    }

    /// Look up a single stored value.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.n_rows {
            return None;
        }
        let cols = self.row_cols(row);
        cols.binary_search(&(col as i32))
            .ok()
            .map(|i| self.row_vals(row)[i])
    }

    /// Iterate over `(row, col, value)` entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        (0..self.n_rows).flat_map(move |row| {
            self.row_cols(row)
                .iter()
                .zip(self.row_vals(row))
                .map(move |(c, v)| (row, *c as usize, *v))
        })
    }

    /// Sum the stored values in each row.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.n_rows)
            .map(|r| self.row_vals(r).iter().map(|v| *v as f64).sum())
            .collect()
    }

    /// Count the stored entries in each column.
    pub fn col_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_cols];
        for c in self.col_inds() {
            counts[*c as usize] += 1;
        }
        counts
    }
}
