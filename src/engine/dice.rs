use crate::DIE_FACES;
use rand::Rng;
use rand::rngs::SmallRng;

/// Randomness the engine draws on: dice throws and deck picks.
pub trait Dice: Send {
    /// One throw of a single die, uniform in `1..=6`.
    fn die(&mut self) -> u8;
    /// Uniform index in `0..n`. Callers guarantee `n > 0`.
    fn pick(&mut self, n: usize) -> usize;
}

impl Dice for SmallRng {
    fn die(&mut self) -> u8 {
        self.random_range(1..=DIE_FACES)
    }
    fn pick(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

/// Scripted dice that replay fixed throws and picks, cycling when exhausted.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct Loaded {
    throws: Vec<u8>,
    picks: Vec<usize>,
    cursor: (usize, usize),
}

#[cfg(test)]
impl Loaded {
    pub fn new(throws: &[u8], picks: &[usize]) -> Self {
        Self {
            throws: throws.to_vec(),
            picks: picks.to_vec(),
            cursor: (0, 0),
        }
    }
}

#[cfg(test)]
impl Dice for Loaded {
    fn die(&mut self) -> u8 {
        let die = self.throws[self.cursor.0 % self.throws.len()];
        self.cursor.0 += 1;
        die
    }
    fn pick(&mut self, n: usize) -> usize {
        let pick = self.picks[self.cursor.1 % self.picks.len()];
        self.cursor.1 += 1;
        pick % n
    }
}
