//! Domain logic - the version model, independent of files and git

pub mod bump;
pub mod prerelease;
pub mod version;

pub use bump::BumpLevels;
pub use prerelease::{PreRelease, PreReleaseKind};
pub use version::{is_canonical, Version};
