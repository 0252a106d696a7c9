// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Identifier vocabularies.

use rustc_hash::FxHashMap;

/// Ordered vocabulary of string identifiers.
///
/// Identifiers receive dense codes in the order they are first seen; the code
/// of an identifier is its position in [Vocabulary::ids].
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the code for an identifier, assigning the next code if it is new.
    pub fn intern(&mut self, id: &str) -> usize {
        if let Some(code) = self.index.get(id) {
            return *code;
        }
        let code = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), code);
        code
    }

    /// Look up the code for an identifier.
    pub fn lookup(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Look up the identifier for a code.
    pub fn id(&self, code: usize) -> Option<&str> {
        self.ids.get(code).map(String::as_str)
    }

    /// Get the identifiers in code order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocab = Vocabulary::new();
        for id in iter {
            vocab.intern(id.as_ref());
        }
        vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut vocab = Vocabulary::new();
        assert_eq!(vocab.intern("zed"), 0);
        assert_eq!(vocab.intern("alpha"), 1);
        assert_eq!(vocab.intern("zed"), 0);
        assert_eq!(vocab.intern("mid"), 2);
        assert_eq!(vocab.ids(), &["zed", "alpha", "mid"]);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let vocab: Vocabulary = ["a", "b", "a", "c"].into_iter().collect();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.lookup("c"), Some(2));
        assert_eq!(vocab.lookup("d"), None);
        assert_eq!(vocab.id(1), Some("b"));
        assert_eq!(vocab.id(3), None);
    }
}
