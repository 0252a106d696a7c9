// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Data loading and identifier management.

mod artists;
mod index;
mod interactions;
mod vocab;

pub use artists::get_artist_map;
pub use index::artist_index;
pub use interactions::{load_data_matrix, Interactions};
pub use vocab::Vocabulary;
