//! Domain layer: profiles, the registry tree and the matching rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod case_file;
pub mod entities;
pub mod error;
pub mod matching;
pub mod queue;
pub mod registry;
pub mod tree;

pub use case_file::{CaseFile, PersonRecord};
pub use entities::{DuplicatePolicy, MarkerRecord, Profile};
pub use error::{DomainError, DomainResult};
pub use matching::{agreement_threshold, count_non_overlapping};
pub use queue::Queue;
pub use registry::Registry;
pub use tree::{InOrder, LevelOrder, TreeNode};
