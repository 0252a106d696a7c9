// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use log::*;

use crate::als::{ALSModel, ImplicitALS};
use crate::config::ModelConfig;
use crate::errors::Result;
use crate::sparse::CSRMatrix;
use crate::weighting::bm25_weight;

/// Build an artist model from a user-artist play matrix with default settings.
///
/// The plays are BM25-weighted (K1 = 100, B = 0.8) to reduce the impact of
/// users who played the same artist thousands of times and of very popular
/// artists, and then factored with implicit ALS (64 factors, regularization
/// 0.05, alpha 2.0).
pub fn build_model(plays: &CSRMatrix) -> Result<ALSModel> {
    build_model_with(plays, &ModelConfig::default())
}

/// Build an artist model with explicit configuration.
pub fn build_model_with(plays: &CSRMatrix, config: &ModelConfig) -> Result<ALSModel> {
    config.validate()?;
    debug!("building model with {:?}", config);
    let weighted = bm25_weight(plays, &config.bm25);
    ImplicitALS::new(config.als.clone()).fit(&weighted)
}
