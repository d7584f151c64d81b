//! CMake build tree generation.
//!
//! [`BuildGraphWalker`] walks the dependency tree of a root component and
//! calls an [`Emit`] implementation once per distinct component.
//! [`CMakeEmitter`] renders each `CMakeLists.txt` through a [`Template`];
//! [`RecordingEmitter`] only records what would be written.

pub mod emitter;
pub mod plan;
pub mod report;
pub mod template;
pub mod walker;

pub use emitter::{CMakeEmitter, Emit, BUILD_SCRIPT_NAME, IGNORED_SUBDIRS};
pub use plan::{PlannedScript, RecordingEmitter};
pub use report::{GenerateReport, GeneratedScript, MissingDependency};
pub use template::{Template, TemplateError};
pub use walker::{BuildGraphWalker, TraversalState};
