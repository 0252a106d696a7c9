// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Model hyperparameters.
//!
//! The defaults are the fixed settings used for ListenBrainz artist models.
//! Every section is optional when loaded from JSON.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CFError, Result};

/// BM25 weighting parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BM25Config {
    /// Saturation constant.
    pub k1: f64,
    /// Length-normalization strength, in `[0, 1]`.
    pub b: f64,
}

/// Implicit-feedback ALS parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ALSConfig {
    pub factors: u32,
    pub regularization: f32,
    /// Confidence scale applied to the weighted play counts.
    pub alpha: f32,
    pub iterations: u32,
}

/// Configuration for building a model.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub bm25: BM25Config,
    pub als: ALSConfig,
}

impl Default for BM25Config {
    fn default() -> Self {
        BM25Config { k1: 100.0, b: 0.8 }
    }
}

impl Default for ALSConfig {
    fn default() -> Self {
        ALSConfig {
            factors: 64,
            regularization: 0.05,
            alpha: 2.0,
            iterations: 15,
        }
    }
}

impl BM25Config {
    pub fn validate(&self) -> Result<()> {
        if !(self.k1.is_finite() && self.k1 >= 0.0) {
            return Err(CFError::InvalidInput(format!("invalid BM25 K1 {}", self.k1)));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(CFError::InvalidInput(format!("invalid BM25 B {}", self.b)));
        }
        Ok(())
    }
}

impl ALSConfig {
    pub fn validate(&self) -> Result<()> {
        if self.factors == 0 {
            return Err(CFError::InvalidInput("ALS needs at least one factor".into()));
        }
        if self.iterations == 0 {
            return Err(CFError::InvalidInput("ALS needs at least one iteration".into()));
        }
        if !(self.regularization.is_finite() && self.regularization > 0.0) {
            return Err(CFError::InvalidInput(format!(
                "invalid ALS regularization {}",
                self.regularization
            )));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(CFError::InvalidInput(format!(
                "invalid ALS alpha {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

impl ModelConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<ModelConfig> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CFError::parse(path, e))?;
        let config: ModelConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| CFError::parse(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.bm25.validate()?;
        self.als.validate()
    }
}
