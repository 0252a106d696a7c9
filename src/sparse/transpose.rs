// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use super::CSRMatrix;

/// Transpose a CSR matrix, carrying its values along.
///
/// The rows of the result have their column indices in ascending order.
pub fn transpose_csr(csr: &CSRMatrix) -> CSRMatrix {
    let nnz = csr.nnz();
    let mut row_ptrs = vec![0i64; csr.n_cols + 1];
    let mut col_inds = vec![0i32; nnz];
    let mut values = vec![0.0f32; nnz];

    // step 1: count column values, placing counts in rps[c+1].
    for c in csr.col_inds() {
        row_ptrs[*c as usize + 1] += 1;
    }

    // step 2: convert column counts into row offsets
    for i in 1..=csr.n_cols {
        let prev = row_ptrs[i - 1];
        row_ptrs[i] += prev;
    }

    // step 3: insert row indices and values into outputs
    let mut row_ips = row_ptrs.clone();
    let cols = csr.col_inds();
    let vals = csr.values();
    for row in 0..csr.n_rows {
        let (sp, ep) = csr.extent(row);
        for ci in sp..ep {
            let cv = cols[ci] as usize;
            let pos = row_ips[cv] as usize;
            col_inds[pos] = row as i32;
            values[pos] = vals[ci];
            row_ips[cv] += 1;
        }
    }

    // now we're done, and the result is transposed!
    CSRMatrix::from_parts(csr.n_cols, csr.n_rows, row_ptrs, col_inds, values)
}
