use std::collections::VecDeque;

use rand::{SeedableRng as _, seq::SliceRandom};
use rand_pcg::Pcg32;

use crate::core::{PieceKind, QUEUE_LEN, Queue};

/// Manages piece generation and the hold slot using the 7-bag randomization algorithm.
///
/// The bag holds every piece type once, shuffled; it is refilled with a new shuffled set
/// before it runs short, so the preview always has enough pieces.
///
/// Holding stores the current piece: the first hold draws the replacement from the
/// queue, later holds swap with the stored piece.
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
    held: Option<PieceKind>,
}

/// Seed for deterministic piece generation, built from an episode seed with
/// [`From<u64>`].
///
/// ```
/// use dropwise_engine::{PieceBuffer, PieceSeed};
///
/// let mut a = PieceBuffer::with_seed(PieceSeed::from(43));
/// let mut b = PieceBuffer::with_seed(PieceSeed::from(43));
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl From<u64> for PieceSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl PieceBuffer {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
            held: None,
        };
        this.fill_bag();
        this
    }

    /// Refills the bag until more than 7 pieces remain, keeping the preview full.
    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut new_bag = PieceKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Draws the next piece from the bag.
    ///
    /// # Panics
    ///
    /// Panics if the bag is empty (should never happen with proper refill logic).
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_bag();
        self.bag
            .pop_front()
            .expect("Piece bag should never be empty")
    }

    /// Returns the next pieces in play order.
    #[must_use]
    pub fn queue(&self) -> Queue {
        std::array::from_fn(|i| self.bag[i])
    }

    /// Returns what piece would be received if hold is used now.
    #[must_use]
    pub fn peek_hold_result(&self) -> PieceKind {
        self.held.unwrap_or_else(|| self.bag[0])
    }

    /// Stores `current` in the hold slot and returns the piece that replaces it.
    pub fn hold(&mut self, current: PieceKind) -> PieceKind {
        self.held
            .replace(current)
            .unwrap_or_else(|| self.pop_next())
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }
}

const _: () = assert!(QUEUE_LEN <= PieceKind::LEN);
