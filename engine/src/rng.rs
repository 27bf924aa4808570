use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::model::{DiceRoll, Face};

pub const FACES: Face = 6;

/// Produces fresh dice for a player. Closures `FnMut(usize) -> DiceRoll` qualify,
/// which is how tests pin the dice.
pub trait DiceSource: Send {
    fn roll(&mut self, count: usize) -> DiceRoll;
}

impl<F> DiceSource for F
where
    F: FnMut(usize) -> DiceRoll + Send,
{
    fn roll(&mut self, count: usize) -> DiceRoll { self(count) }
}

pub struct RandomDice { rng: StdRng }

impl RandomDice {
    pub fn from_entropy() -> Self { Self { rng: StdRng::from_entropy() } }
    pub fn seeded(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed) } }
}

impl DiceSource for RandomDice {
    fn roll(&mut self, count: usize) -> DiceRoll {
        (0..count).map(|_| self.rng.gen_range(1..=FACES)).collect()
    }
}

/// `[1, 2, .., count]` on every roll.
pub fn ascending_dice(count: usize) -> DiceRoll {
    (1..=count as Face).collect()
}
