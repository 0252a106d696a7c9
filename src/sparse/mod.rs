// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Sparse matrix support.

mod coo;
mod csr;
mod transpose;

pub use coo::{COOMatrix, COOMatrixBuilder};
pub use csr::CSRMatrix;
pub use transpose::transpose_csr;
