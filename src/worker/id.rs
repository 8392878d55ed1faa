use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier of a worker allocated by this process.
///
/// Ids are never reused and never `0`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct WorkerId(NonZeroU64);

impl WorkerId {
	/// Creates a new, unique [`WorkerId`].
	pub(crate) fn new() -> Self {
		/// Next id to hand out.
		static COUNTER: AtomicU64 = AtomicU64::new(1);

		let id = COUNTER.fetch_add(1, Ordering::Relaxed);
		Self(NonZeroU64::new(id).expect("`WorkerId` counter overflowed"))
	}

	/// Returns the numeric value of this id.
	#[must_use]
	pub const fn as_u64(self) -> NonZeroU64 {
		self.0
	}
}

impl Display for WorkerId {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, formatter)
	}
}
