//! Feature extraction with w-shingling over characters or words.
use std::borrow::Cow;
use std::ops::Range;

use crate::errors::{MatchError, Result};

/// Token unit of shingles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenUnit {
    /// Every character is a token, whitespace included.
    Char,
    /// Maximal runs of at least two word characters (alphanumeric or `_`) are tokens.
    Word,
}

const MIN_WORD_CHARS: usize = 2;

/// Configuration of feature extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureConfig {
    window_size: usize,
    unit: TokenUnit,
}

impl FeatureConfig {
    /// Creates an instance.
    ///
    /// # Arguments
    ///
    /// * `window_size` - Window size for w-shingling (must be more than 0).
    /// * `unit` - Token unit inside a window.
    pub fn new(window_size: usize, unit: TokenUnit) -> Result<Self> {
        if window_size == 0 {
            return Err(MatchError::input("Window size must not be 0."));
        }
        Ok(Self { window_size, unit })
    }

    /// Character bigrams.
    pub const fn char_bigram() -> Self {
        Self {
            window_size: 2,
            unit: TokenUnit::Char,
        }
    }

    /// Single words.
    pub const fn word_unigram() -> Self {
        Self {
            window_size: 1,
            unit: TokenUnit::Word,
        }
    }

    /// Window size.
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Token unit.
    pub const fn unit(&self) -> TokenUnit {
        self.unit
    }
}

/// Extractor of shingles as slices of the input text.
pub struct FeatureExtractor {
    config: FeatureConfig,
    token_ranges: Vec<Range<usize>>,
}

impl FeatureExtractor {
    /// Creates an instance.
    pub const fn new(config: FeatureConfig) -> Self {
        Self {
            config,
            token_ranges: vec![],
        }
    }

    /// Prepares `text` for [`Self::extract`].
    ///
    /// With character tokens, every run of two or more whitespace characters becomes a
    /// single space. Word tokens need no preparation.
    pub fn prepare<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.config.unit == TokenUnit::Char && has_whitespace_run(text) {
            Cow::Owned(squeeze_whitespace(text))
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Extracts the shingles of `text` into `feature`, in text order and with repetitions.
    /// A text with fewer tokens than the window size has no shingle.
    pub fn extract<'t>(&mut self, text: &'t str, feature: &mut Vec<&'t str>) {
        feature.clear();
        self.tokenize(text);
        for window in self.token_ranges.windows(self.config.window_size) {
            // Windows are non-empty, so both ends exist.
            let start = window[0].start;
            let end = window[window.len() - 1].end;
            feature.push(&text[start..end]);
        }
    }

    fn tokenize(&mut self, text: &str) {
        self.token_ranges.clear();

        match self.config.unit {
            TokenUnit::Char => {
                for (offset, c) in text.char_indices() {
                    self.token_ranges.push(offset..offset + c.len_utf8());
                }
            }
            TokenUnit::Word => {
                let mut start = None;
                let mut num_chars = 0;
                for (offset, c) in text.char_indices() {
                    if is_word_char(c) {
                        if start.is_none() {
                            start = Some(offset);
                            num_chars = 0;
                        }
                        num_chars += 1;
                    } else if let Some(s) = start.take() {
                        if num_chars >= MIN_WORD_CHARS {
                            self.token_ranges.push(s..offset);
                        }
                    }
                }
                if let Some(s) = start {
                    if num_chars >= MIN_WORD_CHARS {
                        self.token_ranges.push(s..text.len());
                    }
                }
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn has_whitespace_run(text: &str) -> bool {
    text.chars()
        .zip(text.chars().skip(1))
        .any(|(a, b)| a.is_whitespace() && b.is_whitespace())
}

fn squeeze_whitespace(text: &str) -> String {
    let mut squeezed = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() && chars.peek().map_or(false, |n| n.is_whitespace()) {
            while chars.next_if(|n| n.is_whitespace()).is_some() {}
            squeezed.push(' ');
        } else {
            squeezed.push(c);
        }
    }
    squeezed
}
