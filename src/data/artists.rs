// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Loading MusicBrainz artist metadata.

use std::collections::HashMap;
use std::path::Path;

use log::*;
use serde::Deserialize;

use crate::errors::{CFError, Result};

const REQUIRED_COLUMNS: [&str; 2] = ["artist_mbid", "name"];

#[derive(Debug, Deserialize)]
struct ArtistRecord {
    artist_mbid: String,
    name: String,
}

/// Load a MusicBrainz data file that maps artist MBIDs to artist names.
///
/// Columns other than `artist_mbid` and `name` are ignored. If an MBID
/// appears more than once, the last name wins.
pub fn get_artist_map<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    debug!("loading artist names from {}", path.display());
    let mut reader = csv::Reader::from_path(path).map_err(|e| CFError::parse(path, e))?;

    let headers = reader.headers().map_err(|e| CFError::parse(path, e))?;
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(CFError::parse(
                path,
                format!("missing required column {}", col),
            ));
        }
    }

    let mut artist_map = HashMap::new();
    for rec in reader.deserialize::<ArtistRecord>() {
        let rec = rec.map_err(|e| CFError::parse(path, e))?;
        artist_map.insert(rec.artist_mbid, rec.name);
    }
    debug!("loaded {} artist names", artist_map.len());

    Ok(artist_map)
}
