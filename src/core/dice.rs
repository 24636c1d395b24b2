/// Injectable random source for every generative call.
use rand::Rng;

/// What a single random draw decides.
///
/// Production sources ignore the tag; scripted sources used in tests
/// answer per purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Draw {
    GivenName,
    HouseName,
    NobleHouse,
    Gender,
    Sexuality,
    Lifespan,
    Crisis,
    PartnerGender,
    PartnerAge,
    UnionLength,
    Marriage,
    RomanceGate,
    RomanceBudget,
    Romance,
    Fertility,
    Twins,
    Triplets,
}

/// A source of uniform integers.
pub trait Dice {
    /// Uniform integer in `lo..=hi`. Implementations must return `lo`
    /// when `hi <= lo`.
    fn roll(&mut self, draw: Draw, lo: i32, hi: i32) -> i32;

    /// Uniform integer in `0..=99`.
    fn percent(&mut self, draw: Draw) -> i32 {
        self.roll(draw, 0, 99)
    }

    /// Uniform index into a collection of `len` items.
    fn pick(&mut self, draw: Draw, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.roll(draw, 0, len as i32 - 1) as usize
    }
}

impl<R: Rng + ?Sized> Dice for R {
    fn roll(&mut self, _draw: Draw, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.gen_range(lo..=hi)
    }
}
