//! Source of the pseudo-random opener phrases.

use rand::Rng;

pub trait PhraseSource: Send {
    /// Index into a list of `len` phrases; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

#[derive(Default)]
pub struct RandomPhrases;

impl PhraseSource for RandomPhrases {
    fn pick(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Always picks the same index (wrapped into range).
pub struct FixedPhrase(pub usize);

impl PhraseSource for FixedPhrase {
    fn pick(&mut self, len: usize) -> usize {
        self.0 % len
    }
}
