// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::cmp::Reverse;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ordered_float::NotNan;

use crate::errors::{CFError, Result};
use crate::sparse::CSRMatrix;

/// A fitted latent-factor model over users and artists.
///
/// Scores are inner products of user and artist factor vectors.
#[derive(Debug, Clone)]
pub struct ALSModel {
    user_factors: Array2<f32>,
    artist_factors: Array2<f32>,
}

impl ALSModel {
    pub fn new(user_factors: Array2<f32>, artist_factors: Array2<f32>) -> ALSModel {
        assert_eq!(user_factors.ncols(), artist_factors.ncols());
        ALSModel {
            user_factors,
            artist_factors,
        }
    }

    /// Get the user factor matrix (users × factors).
    pub fn user_factors(&self) -> ArrayView2<'_, f32> {
        self.user_factors.view()
    }

    /// Get the artist factor matrix (artists × factors).
    pub fn artist_factors(&self) -> ArrayView2<'_, f32> {
        self.artist_factors.view()
    }

    pub fn n_factors(&self) -> usize {
        self.user_factors.ncols()
    }

    pub fn n_users(&self) -> usize {
        self.user_factors.nrows()
    }

    pub fn n_artists(&self) -> usize {
        self.artist_factors.nrows()
    }

    pub fn user_vector(&self, user: usize) -> Result<ArrayView1<'_, f32>> {
        check_index("user", user, self.n_users())?;
        Ok(self.user_factors.row(user))
    }

    pub fn artist_vector(&self, artist: usize) -> Result<ArrayView1<'_, f32>> {
        check_index("artist", artist, self.n_artists())?;
        Ok(self.artist_factors.row(artist))
    }

    /// Predict a user's preference for an artist.
    pub fn score(&self, user: usize, artist: usize) -> Result<f32> {
        Ok(self.user_vector(user)?.dot(&self.artist_vector(artist)?))
    }

    /// Recommend the `n` highest-scoring artists for a user.
    ///
    /// If `exclude` is given, artists stored in the user's row of that matrix
    /// (normally the play matrix) are skipped.
    pub fn recommend(
        &self,
        user: usize,
        n: usize,
        exclude: Option<&CSRMatrix>,
    ) -> Result<Vec<(usize, f32)>> {
        let uvec = self.user_vector(user)?;
        let excluded: &[i32] = match exclude {
            Some(m) if m.n_cols != self.n_artists() => {
                return Err(CFError::InvalidInput(format!(
                    "exclusion matrix has {} columns, model has {} artists",
                    m.n_cols,
                    self.n_artists()
                )))
            }
            Some(m) if user < m.n_rows => m.row_cols(user),
            _ => &[],
        };

        let scores = self.artist_factors.dot(&uvec);
        let candidates = scores
            .iter()
            .enumerate()
            .filter(|(i, _)| excluded.binary_search(&(*i as i32)).is_err())
            .map(|(i, s)| (i, *s));
        Ok(top_n(candidates, n))
    }

    /// Find the `n` artists most similar to an artist by cosine similarity.
    ///
    /// The artist itself is included, normally in first place.
    pub fn similar_artists(&self, artist: usize, n: usize) -> Result<Vec<(usize, f32)>> {
        check_index("artist", artist, self.n_artists())?;
        Ok(cosine_neighbors(&self.artist_factors, artist, n))
    }

    /// Find the `n` users most similar to a user by cosine similarity.
    pub fn similar_users(&self, user: usize, n: usize) -> Result<Vec<(usize, f32)>> {
        check_index("user", user, self.n_users())?;
        Ok(cosine_neighbors(&self.user_factors, user, n))
    }
}

fn check_index(kind: &str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(CFError::InvalidInput(format!(
            "{} index {} out of range for {} {}s",
            kind, index, len, kind
        )))
    }
}

fn cosine_neighbors(factors: &Array2<f32>, row: usize, n: usize) -> Vec<(usize, f32)> {
    let norms: Array1<f32> = factors.map_axis(Axis(1), |r| r.dot(&r).sqrt());
    let qnorm = norms[row];
    let dots = factors.dot(&factors.row(row));
    let sims = dots.iter().zip(norms.iter()).enumerate().map(|(i, (d, norm))| {
        let denom = norm * qnorm;
        let sim = if denom > 0.0 { d / denom } else { 0.0 };
        (i, sim)
    });
    top_n(sims, n)
}

/// Select the `n` highest scores, skipping NaNs, in decreasing order.
fn top_n<I: Iterator<Item = (usize, f32)>>(scores: I, n: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, NotNan<f32>)> = scores
        .filter_map(|(i, s)| NotNan::new(s).ok().map(|s| (i, s)))
        .collect();
    scored.sort_by_key(|(i, s)| (Reverse(*s), *i));
    scored.truncate(n);
    scored.into_iter().map(|(i, s)| (i, s.into_inner())).collect()
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn model() -> ALSModel {
        let users = array![[1.0f32, 0.0], [0.0, 1.0], [0.0, 0.0]];
        let artists = array![[2.0f32, 0.0], [1.0, 1.0], [0.0, 3.0], [1.9, 0.1]];
        ALSModel::new(users, artists)
    }

    #[test]
    fn test_shape() {
        let m = model();
        assert_eq!(m.n_users(), 3);
        assert_eq!(m.n_artists(), 4);
        assert_eq!(m.n_factors(), 2);
    }

    #[test]
    fn test_score() {
        let m = model();
        assert_eq!(m.score(0, 0).unwrap(), 2.0);
        assert_eq!(m.score(1, 2).unwrap(), 3.0);
        assert!(matches!(m.score(3, 0), Err(CFError::InvalidInput(_))));
        assert!(matches!(m.score(0, 4), Err(CFError::InvalidInput(_))));
    }

    #[test]
    fn test_recommend() {
        let m = model();
        let recs = m.recommend(0, 2, None).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].0, 0);
        assert_eq!(recs[1].0, 3);
    }

    #[test]
    fn test_recommend_exclude() {
        let m = model();
        // user 0 has already played artist 0
        let plays = CSRMatrix::from_parts(3, 4, vec![0, 1, 1, 1], vec![0], vec![5.0]);
        let recs = m.recommend(0, 2, Some(&plays)).unwrap();
        assert_eq!(recs.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_recommend_bad_exclude() {
        let m = model();
        let plays = CSRMatrix::from_parts(1, 2, vec![0, 0], vec![], vec![]);
        assert!(m.recommend(0, 2, Some(&plays)).is_err());
    }

    #[test]
    fn test_similar_artists() {
        let m = model();
        let sims = m.similar_artists(0, 3).unwrap();
        assert_eq!(sims[0].0, 0);
        assert!((sims[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(sims[1].0, 3);
        assert_eq!(sims[2].0, 1);
    }

    #[test]
    fn test_similar_zero_vector() {
        let m = model();
        let sims = m.similar_users(2, 3).unwrap();
        assert!(sims.iter().all(|(_, s)| *s == 0.0));
    }

    #[test]
    fn test_top_n_skips_nan() {
        let top = top_n(vec![(0, 1.0), (1, f32::NAN), (2, 3.0)].into_iter(), 5);
        assert_eq!(top, vec![(2, 3.0), (0, 1.0)]);
    }
}
