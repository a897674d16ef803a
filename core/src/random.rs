use rand::{Rng, RngCore};

/// Uniform random draws consumed by the phase controller and pattern emitters.
///
/// Every `rand` generator implements this trait, so production code passes a
/// seeded `ChaCha8Rng` while tests may script exact sequences.
pub trait RandomSource {
    /// Uniform integer in `0..upper`. Returns `0` when `upper` is zero.
    fn next_below(&mut self, upper: u32) -> u32;

    /// Uniform float in `0.0..1.0`.
    fn next_unit(&mut self) -> f32;

    /// Uniform float in `low..high`. Returns `low` when the range is empty.
    fn next_in_range(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        low + (high - low) * self.next_unit()
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.gen_range(0..upper)
    }

    fn next_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}
