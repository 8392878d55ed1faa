//! Worker allocation errors.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, ErrorKind};

/// Returned by [`malloc()`](crate::malloc()) and
/// [`WorkerBuilder::spawn()`](crate::WorkerBuilder::spawn()) when no worker
/// could be provisioned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AllocError {
	/// The requested stack size was `0` or too large to be aligned.
	InvalidStackSize {
		/// Stack size in bytes as passed by the caller.
		requested: usize,
	},
	/// The platform refused to create the thread or Web Worker.
	Spawn(String),
	/// This target has no support for spawning workers.
	Unsupported,
}

impl Display for AllocError {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::InvalidStackSize { requested } => {
				write!(formatter, "invalid worker stack size: {requested} bytes")
			}
			Self::Spawn(error) => write!(formatter, "failed to spawn worker: {error}"),
			Self::Unsupported => write!(
				formatter,
				"spawning workers is not supported on this platform, check \
				 `has_spawn_support()`"
			),
		}
	}
}

impl Error for AllocError {}

impl From<AllocError> for io::Error {
	fn from(value: AllocError) -> Self {
		let kind = match value {
			AllocError::InvalidStackSize { .. } => ErrorKind::InvalidInput,
			AllocError::Spawn(_) => ErrorKind::Other,
			AllocError::Unsupported => ErrorKind::Unsupported,
		};

		Self::new(kind, value)
	}
}
