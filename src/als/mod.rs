// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Implicit-feedback alternating least squares.
//!
//! Factorization is done by `discorec`; this module converts matrices into
//! its datasets and its fitted factors into an [ALSModel].

mod model;

use std::time::Instant;

use discorec::{Dataset, RecommenderBuilder};
use log::*;
use ndarray::Array2;
use thiserror::Error;

use crate::config::ALSConfig;
use crate::errors::Result;
use crate::progress::ProgressHandle;
use crate::sparse::CSRMatrix;

pub use model::ALSModel;

/// Failures of the factorization step.
#[derive(Error, Debug)]
pub enum FitError {
    #[error("input matrix contains non-finite values")]
    NonFiniteInput,
    #[error("input matrix has no positive entries")]
    NoPositiveEntries,
    #[error("solver produced non-finite factors")]
    NonFiniteFactors,
}

/// Trainer for implicit-feedback ALS models.
///
/// The input matrix has users as rows and artists (items) as columns.
pub struct ImplicitALS {
    config: ALSConfig,
}

impl ImplicitALS {
    pub fn new(config: ALSConfig) -> Self {
        ImplicitALS { config }
    }

    pub fn config(&self) -> &ALSConfig {
        &self.config
    }

    /// Fit a model to a weighted user-artist matrix.
    ///
    /// Only positive entries are observations; entries at or below zero
    /// carry no preference and are left out of the dataset.
    pub fn fit(&self, user_artists: &CSRMatrix) -> Result<ALSModel> {
        self.config.validate()?;
        if !user_artists.values().iter().all(|v| v.is_finite()) {
            return Err(FitError::NonFiniteInput.into());
        }

        let mut dataset = Dataset::new();
        let mut n_obs = 0;
        for (user, artist, value) in user_artists.iter() {
            if value > 0.0 {
                dataset.push(user, artist, value);
                n_obs += 1;
            }
        }
        if n_obs == 0 {
            return Err(FitError::NoPositiveEntries.into());
        }

        let start = Instant::now();
        info!(
            "training ALS with {} factors on {} users and {} artists ({} observations)",
            self.config.factors, user_artists.n_rows, user_artists.n_cols, n_obs
        );
        let progress = ProgressHandle::new("ALS iterations", self.config.iterations as usize);
        let mut builder = RecommenderBuilder::new();
        builder
            .factors(self.config.factors)
            .iterations(self.config.iterations)
            .regularization(self.config.regularization)
            .alpha(self.config.alpha)
            .callback(|_| progress.tick());
        let recommender = builder.fit_implicit(&dataset);
        progress.finish();
        info!(
            "finished ALS training in {:.2}s",
            start.elapsed().as_secs_f64()
        );

        let k = self.config.factors as usize;
        let mut users = Array2::zeros((user_artists.n_rows, k));
        for u in 0..user_artists.n_rows {
            if let Some(f) = recommender.user_factors(&u) {
                for (j, v) in f.iter().enumerate() {
                    users[[u, j]] = *v;
                }
            }
        }
        let mut artists = Array2::zeros((user_artists.n_cols, k));
        for a in 0..user_artists.n_cols {
            if let Some(f) = recommender.item_factors(&a) {
                for (j, v) in f.iter().enumerate() {
                    artists[[a, j]] = *v;
                }
            }
        }

        if !users.iter().chain(artists.iter()).all(|v| v.is_finite()) {
            return Err(FitError::NonFiniteFactors.into());
        }

        Ok(ALSModel::new(users, artists))
    }
}
