//! Forensic STR profile registry.
//!
//! Profiles are stored in an unbalanced binary search tree keyed by
//! `"Last, First"`. A matching pass compares each profile's marker counts with
//! two unknown sequences and flags the profiles of interest; a cleanup pass
//! removes everybody else.
//!
//! ```
//! use forensic::domain::{MarkerRecord, Profile, Registry};
//!
//! let mut registry = Registry::new("AAGATCAGATCAGA", "AGATCTAGATCAAA");
//! registry.insert("Doe, Jane", Profile::new(vec![MarkerRecord::new("AGATC", 4)])).unwrap();
//! registry.insert("Adams, Bob", Profile::new(vec![MarkerRecord::new("AGATC", 3)])).unwrap();
//!
//! registry.flag_profiles_of_interest();
//! assert_eq!(registry.collect_unflagged(), ["Adams, Bob"]);
//!
//! registry.cleanup();
//! assert_eq!(registry.names(), ["Doe, Jane"]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
