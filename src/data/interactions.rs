// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Loading user-artist play counts.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::*;

use crate::errors::{CFError, Result};
use crate::ok_or_parse;
use crate::sparse::{COOMatrixBuilder, CSRMatrix};

use super::{artist_index, Vocabulary};

/// User-artist play counts with their identifier vocabularies.
///
/// Rows of [Interactions::plays] are users and columns are artists; the row
/// and column numbers are the codes in [Interactions::users] and
/// [Interactions::artists].
#[derive(Debug, Clone)]
pub struct Interactions {
    pub artists: Vocabulary,
    pub users: Vocabulary,
    pub plays: CSRMatrix,
}

impl Interactions {
    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn n_artists(&self) -> usize {
        self.artists.len()
    }

    /// Find the column of an artist MBID.
    pub fn artist_index(&self, artist_mbid: &str) -> Result<usize> {
        artist_index(self.artists.ids(), artist_mbid)
    }

    /// Split into the artist labels, user labels and play matrix.
    pub fn into_parts(self) -> (Vec<String>, Vec<String>, CSRMatrix) {
        (self.artists.into_ids(), self.users.into_ids(), self.plays)
    }
}

/// Load a CSV file of `user,artist,plays` lines into a play-count matrix.
///
/// The first line is a header and is skipped. Only the first three columns
/// are read; loading stops at the first row with a missing or invalid field.
pub fn load_data_matrix<P: AsRef<Path>>(path: P) -> Result<Interactions> {
    let path = path.as_ref();
    debug!("loading play counts from {}", path.display());
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CFError::parse(path, e))?;

    let mut users = Vocabulary::new();
    let mut artists = Vocabulary::new();
    let mut coo = COOMatrixBuilder::new();

    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => (),
            Ok(false) => break,
            Err(e) => return Err(CFError::parse(path, e)),
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let (user, artist, plays) = parse_play_record(path, line, &record)?;

        let row = code_to_index(path, users.intern(user))?;
        let col = code_to_index(path, artists.intern(artist))?;
        coo.add_entry(row, col, plays as f32);
    }

    debug!(
        "read {} play records for {} users and {} artists",
        coo.len(),
        users.len(),
        artists.len()
    );
    let plays = coo.finish().to_csr(users.len(), artists.len())?;
    debug!(
        "built {}x{} play matrix with {} entries",
        plays.n_rows,
        plays.n_cols,
        plays.nnz()
    );

    Ok(Interactions {
        artists,
        users,
        plays,
    })
}

fn parse_play_record<'r>(
    path: &Path,
    line: u64,
    record: &'r StringRecord,
) -> Result<(&'r str, &'r str, i32)> {
    let user = ok_or_parse!(record.get(0), path, "line {}: missing user field", line)?;
    let artist = ok_or_parse!(record.get(1), path, "line {}: missing artist field", line)?;
    let plays = ok_or_parse!(record.get(2), path, "line {}: missing plays field", line)?;

    let count: i32 = plays.trim().parse().map_err(|e| {
        CFError::parse(
            path,
            format!("line {}: invalid play count {:?}: {}", line, plays, e),
        )
    })?;
    if count < 0 {
        return Err(CFError::parse(
            path,
            format!("line {}: negative play count {}", line, count),
        ));
    }

    Ok((user, artist, count))
}

fn code_to_index(path: &Path, code: usize) -> Result<i32> {
    i32::try_from(code).map_err(|_| CFError::parse(path, "too many distinct identifiers"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_csv(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_small_matrix() {
        let file = write_csv("user,artist,plays\nu1,a1,5\nu2,a1,2\nu1,a2,1\n");
        let data = load_data_matrix(file.path()).unwrap();
        assert_eq!(data.users.ids(), &["u1", "u2"]);
        assert_eq!(data.artists.ids(), &["a1", "a2"]);
        assert_eq!(data.plays.shape(), (2, 2));
        assert_eq!(data.plays.nnz(), 3);
        assert_eq!(data.plays.get(0, 0), Some(5.0));
        assert_eq!(data.plays.get(1, 0), Some(2.0));
        assert_eq!(data.plays.get(0, 1), Some(1.0));
        assert_eq!(data.plays.get(1, 1), None);
    }

    #[test]
    fn test_duplicates_summed() {
        let file = write_csv("user,artist,plays\nu1,a1,3\nu1,a1,4\n");
        let data = load_data_matrix(file.path()).unwrap();
        assert_eq!(data.plays.nnz(), 1);
        assert_eq!(data.plays.get(0, 0), Some(7.0));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let file = write_csv("user,artist,plays,extra\nu1,a1,3,foo\nu2,a2,4,bar,baz\n");
        let data = load_data_matrix(file.path()).unwrap();
        assert_eq!(data.n_users(), 2);
        assert_eq!(data.n_artists(), 2);
        assert_eq!(data.plays.get(1, 1), Some(4.0));
    }

    #[test]
    fn test_bad_count() {
        let file = write_csv("user,artist,plays\nu1,a1,3\nu2,a1,many\n");
        match load_data_matrix(file.path()) {
            Err(CFError::Parse { message, .. }) => {
                assert!(message.contains("line 3"), "unexpected message {}", message)
            }
            r => panic!("unexpected result {:?}", r.map(|d| d.plays.nnz())),
        }
    }

    #[test]
    fn test_empty_count() {
        let file = write_csv("user,artist,plays\nu1,a1,\n");
        assert!(matches!(
            load_data_matrix(file.path()),
            Err(CFError::Parse { .. })
        ));
    }

    #[test]
    fn test_negative_count() {
        let file = write_csv("user,artist,plays\nu1,a1,-2\n");
        assert!(matches!(
            load_data_matrix(file.path()),
            Err(CFError::Parse { .. })
        ));
    }

    #[test]
    fn test_short_row() {
        let file = write_csv("user,artist,plays\nu1,a1\n");
        assert!(matches!(
            load_data_matrix(file.path()),
            Err(CFError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_data_matrix(dir.path().join("missing.csv"));
        assert!(matches!(res, Err(CFError::Parse { .. })));
    }

    #[test]
    fn test_header_only() {
        let file = write_csv("user,artist,plays\n");
        let data = load_data_matrix(file.path()).unwrap();
        assert_eq!(data.plays.shape(), (0, 0));
        assert_eq!(data.plays.nnz(), 0);
    }

    #[test]
    fn test_into_parts() {
        let file = write_csv("user,artist,plays\nu1,a1,5\nu2,a2,2\n");
        let data = load_data_matrix(file.path()).unwrap();
        assert_eq!(data.artist_index("a2").unwrap(), 1);
        let (artists, users, plays) = data.into_parts();
        assert_eq!(artists, vec!["a1", "a2"]);
        assert_eq!(users, vec!["u1", "u2"]);
        assert_eq!(plays.nnz(), 2);
    }
}
