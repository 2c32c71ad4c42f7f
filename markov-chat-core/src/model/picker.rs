use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Chooses one index out of `len` candidates.
///
/// This is the only source of randomness used during generation.
/// Swapping it for a deterministic implementation makes a walk through
/// the transition table fully predictable.
///
/// ## Contract
/// - `len` is always >= 1
/// - The returned index must be in `0..len`
pub trait Picker {
	fn pick(&mut self, len: usize) -> usize;
}

/// Any `FnMut(usize) -> usize` closure can act as a picker.
///
/// Example: `|_| 0` always takes the first successor.
impl<F> Picker for F
where
	F: FnMut(usize) -> usize,
{
	fn pick(&mut self, len: usize) -> usize {
		self(len)
	}
}

/// Uniform picker backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngPicker<R: Rng> {
	rng: R,
}

impl RngPicker<ThreadRng> {
	/// Picker using the thread-local generator (not reproducible).
	pub fn thread() -> Self {
		Self { rng: rand::rng() }
	}
}

impl RngPicker<StdRng> {
	/// Picker seeded with a fixed value.
	///
	/// The same seed over the same table gives the same replies.
	pub fn seeded(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}
}

impl<R: Rng> RngPicker<R> {
	/// Wraps an existing generator.
	pub fn new(rng: R) -> Self {
		Self { rng }
	}
}

impl<R: Rng> Picker for RngPicker<R> {
	fn pick(&mut self, len: usize) -> usize {
		self.rng.random_range(0..len)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn closure_picker_forwards_len() {
		let mut seen = Vec::new();
		let mut picker = |len: usize| {
			seen.push(len);
			len - 1
		};
		assert_eq!(picker.pick(4), 3);
		assert_eq!(picker.pick(1), 0);
		assert_eq!(seen, vec![4, 1]);
	}

	#[test]
	fn rng_picker_stays_in_range() {
		let mut picker = RngPicker::thread();
		for len in 1..50 {
			assert!(picker.pick(len) < len);
		}
	}

	#[test]
	fn seeded_pickers_repeat() {
		let mut a = RngPicker::seeded(7);
		let mut b = RngPicker::seeded(7);
		let left: Vec<usize> = (0..20).map(|_| a.pick(10)).collect();
		let right: Vec<usize> = (0..20).map(|_| b.pick(10)).collect();
		assert_eq!(left, right);
	}
}
