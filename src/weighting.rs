// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! BM25 reweighting of interaction matrices.

use log::*;

use crate::config::BM25Config;
use crate::sparse::CSRMatrix;

/// Weight a matrix with BM25, treating rows as documents and columns as terms.
///
/// This dampens both rows with very large counts and columns that appear in
/// many rows. The sparsity structure is unchanged.
pub fn bm25_weight(matrix: &CSRMatrix, config: &BM25Config) -> CSRMatrix {
    let k1 = config.k1;
    let b = config.b;
    let n = matrix.n_rows as f64;

    let idf: Vec<f64> = matrix
        .col_counts()
        .iter()
        .map(|df| n.ln() - (*df as f64).ln_1p())
        .collect();

    let row_sums = matrix.row_sums();
    let avg_len = if matrix.n_rows > 0 {
        row_sums.iter().sum::<f64>() / n
    } else {
        0.0
    };
    // all-zero matrices get no length normalization
    let avg_len = if avg_len > 0.0 { avg_len } else { 1.0 };
    debug!(
        "BM25 weighting {}x{} matrix (K1={}, B={}, average row sum {:.2})",
        matrix.n_rows, matrix.n_cols, k1, b, avg_len
    );

    let mut weighted = Vec::with_capacity(matrix.nnz());
    for row in 0..matrix.n_rows {
        let length_norm = (1.0 - b) + b * row_sums[row] / avg_len;
        for (c, v) in matrix.row_cols(row).iter().zip(matrix.row_vals(row)) {
            let v = *v as f64;
            let w = v * (k1 + 1.0) / (k1 * length_norm + v) * idf[*c as usize];
            weighted.push(w as f32);
        }
    }

    matrix.with_values(weighted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::COOMatrixBuilder;

    fn plays() -> CSRMatrix {
        // 4 users; artist 0 is played by everyone, artist 1 by one user
        let mut bld = COOMatrixBuilder::new();
        bld.add_entry(0, 0, 10.0);
        bld.add_entry(1, 0, 10.0);
        bld.add_entry(2, 0, 10.0);
        bld.add_entry(3, 0, 10.0);
        bld.add_entry(0, 1, 10.0);
        bld.add_entry(1, 2, 5.0);
        bld.add_entry(2, 2, 5.0);
        bld.finish().to_csr(4, 3).unwrap()
    }

    #[test]
    fn test_structure_kept() {
        let m = plays();
        let w = bm25_weight(&m, &BM25Config::default());
        assert_eq!(w.shape(), m.shape());
        assert_eq!(w.row_ptrs(), m.row_ptrs());
        assert_eq!(w.col_inds(), m.col_inds());
    }

    #[test]
    fn test_popular_dampened() {
        let m = plays();
        let w = bm25_weight(&m, &BM25Config::default());
        // same user, same count; the rare artist is worth more
        let popular = w.get(0, 0).unwrap();
        let rare = w.get(0, 1).unwrap();
        assert!(rare > popular, "{} <= {}", rare, popular);
    }

    #[test]
    fn test_known_value() {
        let m = plays();
        let config = BM25Config { k1: 100.0, b: 0.8 };
        let w = bm25_weight(&m, &config);

        // user 3 has row sum 10, average row sum is 15
        let avg = 15.0;
        let norm = 0.2 + 0.8 * 10.0 / avg;
        let idf = 4.0f64.ln() - 5.0f64.ln();
        let expected = 10.0 * 101.0 / (100.0 * norm + 10.0) * idf;
        let actual = w.get(3, 0).unwrap() as f64;
        assert!((actual - expected).abs() < 1e-5, "{} != {}", actual, expected);
    }

    #[test]
    fn test_no_length_norm() {
        let m = plays();
        let config = BM25Config { k1: 100.0, b: 0.0 };
        let w = bm25_weight(&m, &config);
        // without length normalization, equal counts in the same column are equal
        assert_eq!(w.get(0, 0), w.get(3, 0));
    }

    #[test]
    fn test_empty() {
        let m = CSRMatrix::from_parts(0, 0, vec![0], vec![], vec![]);
        let w = bm25_weight(&m, &BM25Config::default());
        assert_eq!(w.nnz(), 0);
    }
}
