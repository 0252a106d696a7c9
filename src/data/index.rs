// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use crate::errors::{CFError, Result};

/// Find the matrix index of an artist MBID in a label sequence.
///
/// The labels are expected to be unique; more than one match is reported as
/// [CFError::AmbiguousResult] rather than resolved.
pub fn artist_index<S: AsRef<str>>(artists: &[S], artist_mbid: &str) -> Result<usize> {
    let positions: Vec<usize> = artists
        .iter()
        .enumerate()
        .filter(|(_, a)| a.as_ref() == artist_mbid)
        .map(|(i, _)| i)
        .collect();

    match positions.as_slice() {
        [] => Err(CFError::NotFound(artist_mbid.to_string())),
        [pos] => Ok(*pos),
        _ => Err(CFError::AmbiguousResult {
            id: artist_mbid.to_string(),
            count: positions.len(),
        }),
    }
}
