use super::player::Player;
use super::pos::{Pos, TOTAL_CELLS};
use once_cell::sync::Lazy;
use rand::Rng;

// Zobrist board hashing
// * One number for each player at each intersection ( 2 * 225 )
// * Keys are 31-bit so a hash always fits a non-negative i32
//
// To get the zobrist hash for any position:
// [Hash for Black on a1] xor [Hash for White on b1] xor ... ( all stones )
// The side to move is not hashed; callers that care combine it themselves.

const KEY_MASK: u64 = (1 << 31) - 1;

pub static ZOBRIST: Lazy<Zobrist> = Lazy::new(Zobrist::new);

pub struct Zobrist {
    numbers: [[u64; 2]; TOTAL_CELLS],
}

impl Zobrist {
    pub fn new() -> Self {
        Self {
            numbers: init_rand_numbers(),
        }
    }

    #[inline]
    pub fn key(&self, pos: Pos, player: Player) -> u64 {
        self.numbers[pos.index()][player.index()]
    }
}

impl Default for Zobrist {
    fn default() -> Self {
        Self::new()
    }
}

fn init_rand_numbers() -> [[u64; 2]; TOTAL_CELLS] {
    let mut nums = [[0; 2]; TOTAL_CELLS];
    let mut rng = rand::thread_rng();

    for cell in nums.iter_mut() {
        for num in cell.iter_mut() {
            // zero would make a stone invisible to the hash
            *num = loop {
                let candidate = rng.gen::<u64>() & KEY_MASK;
                if candidate != 0 {
                    break candidate;
                }
            };
        }
    }

    nums
}
