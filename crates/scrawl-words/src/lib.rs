//! The word side of Scrawl: picking secret words, masking them for
//! guessers, and deciding whether a chat line counts as a correct guess.
//!
//! Loading a word list from disk is the embedding application's job —
//! this crate takes the list as plain strings and owns everything that
//! happens to it afterwards.

use rand::seq::IndexedRandom;

/// Errors from constructing or sampling a word bank.
#[derive(Debug, thiserror::Error)]
pub enum WordsError {
    /// The supplied word list had no usable entries.
    #[error("word list is empty")]
    EmptyWordList,
}

/// An immutable pool of secret words for a running server.
///
/// Construction filters out blank lines so a sloppy word-list file can't
/// produce an unguessable empty word. The bank is never empty after
/// construction, which is what lets the sampling methods return `&str`
/// instead of `Option`.
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Builds a bank from raw word-list entries.
    ///
    /// # Errors
    /// Returns [`WordsError::EmptyWordList`] if nothing non-blank remains.
    pub fn new<I, S>(words: I) -> Result<Self, WordsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(WordsError::EmptyWordList);
        }
        Ok(Self { words })
    }

    /// Number of words in the bank.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false` — kept for the conventional pairing with `len`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// One uniformly random word.
    pub fn random_word(&self) -> &str {
        self.words
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// `how_many` distinct words, fewer if the bank is smaller than that.
    ///
    /// Sampling is without replacement, so a three-word offer never shows
    /// the same word twice.
    pub fn random_words(&self, how_many: usize) -> Vec<String> {
        self.words
            .choose_multiple(&mut rand::rng(), how_many)
            .cloned()
            .collect()
    }
}

/// Replaces every non-space character with `_` and spreads the result out
/// with single spaces, preserving the original spaces.
///
/// `"cat dog"` becomes `"_ _ _   _ _ _"` — guessers see the word's shape
/// (lengths and word breaks) but nothing else.
pub fn mask_word(word: &str) -> String {
    let mut masked = String::with_capacity(word.len() * 2);
    for (i, c) in word.chars().enumerate() {
        if i > 0 {
            masked.push(' ');
        }
        masked.push(if c == ' ' { ' ' } else { '_' });
    }
    masked
}

/// Whether a guess matches the secret word, ignoring case and
/// surrounding whitespace.
pub fn matches_word(guess: &str, word: &str) -> bool {
    guess.trim().to_lowercase() == word.trim().to_lowercase()
}

// =========================================================================
// Tests
// =========================================================================
