//! Phrase tokenization for pronunciation practice.
//!
//! Turns a phrase into an ordered sequence of comparable word tokens.
//! Comparison is by lowercased text; the original spelling is kept for
//! display.

use serde::{Deserialize, Serialize};

/// Options controlling how comparison keys are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Drop non-alphanumeric characters from the comparison key, so that
    /// "you?" compares equal to "you". Off by default: punctuation attached
    /// to a word is part of that word's key.
    pub strip_punctuation: bool,
}

/// A single word unit within a phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// The word as it appeared in the source phrase.
    pub text: String,
    /// Lowercased comparison key.
    pub key: String,
    /// Position within the source sequence.
    pub index: usize,
}

impl Token {
    fn new(text: &str, index: usize, config: TokenizerConfig) -> Self {
        let lowered = text.to_lowercase();
        let key = if config.strip_punctuation {
            let stripped: String = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
            // A token that is pure punctuation keeps its literal key,
            // otherwise "?" and "!" would all collapse together.
            if stripped.is_empty() {
                lowered
            } else {
                stripped
            }
        } else {
            lowered
        };
        Self {
            text: text.to_string(),
            key,
            index,
        }
    }
}

/// Equality is by comparison key; the original spelling does not matter.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Token {}

/// An ordered sequence of tokens derived from one phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Comparison keys joined by single spaces.
    ///
    /// Re-tokenizing this form yields an equal sequence.
    pub fn rendered(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.key.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Tokenize with the default configuration (punctuation kept).
pub fn tokenize(text: &str) -> TokenSequence {
    tokenize_with(text, TokenizerConfig::default())
}

/// Tokenize a phrase: lowercase, split on whitespace runs, drop empties.
///
/// Pure and infallible; empty input yields an empty sequence.
pub fn tokenize_with(text: &str, config: TokenizerConfig) -> TokenSequence {
    let tokens = text
        .split_whitespace()
        .enumerate()
        .map(|(index, word)| Token::new(word, index, config))
        .collect();
    TokenSequence { tokens }
}
