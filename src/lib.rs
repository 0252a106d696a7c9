// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Collaborative filtering over ListenBrainz listening history.
//!
//! The pipeline loads user-artist play counts into a sparse matrix
//! ([load_data_matrix]), fits an implicit ALS model over BM25-weighted plays
//! ([build_model]), and maps between artist MBIDs, matrix indices
//! ([artist_index]) and artist names ([get_artist_map]).

pub mod als;
mod builder;
pub mod config;
pub mod data;
pub mod errors;
mod progress;
pub mod sparse;
pub mod weighting;

pub use als::ALSModel;
pub use builder::{build_model, build_model_with};
pub use config::{ALSConfig, BM25Config, ModelConfig};
pub use data::{artist_index, get_artist_map, load_data_matrix, Interactions, Vocabulary};
pub use errors::{CFError, Result};
pub use sparse::CSRMatrix;
