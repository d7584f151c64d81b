//! cmakegen - out-of-source CMake build trees for component-based projects
//!
//! Given a root component and a target, cmakegen walks the component's
//! dependency graph and writes one `CMakeLists.txt` per distinct component,
//! wired together with `add_subdirectory` so CMake can build the whole tree.

pub mod core;
pub mod generator;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test fixtures for component trees.
#[cfg(test)]
pub mod test_support;

pub use core::{Component, Target};
pub use generator::{BuildGraphWalker, CMakeEmitter, GenerateReport};
pub use resolver::{Resolver, SearchPathResolver};
pub use util::context::GlobalContext;
