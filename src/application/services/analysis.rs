//! Case analysis service
//!
//! Loads case files into a registry and runs the flag / collect / cleanup pipeline.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CaseFile, DuplicatePolicy, Registry, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// Outcome of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Profiles of interest, ascending by name
    pub flagged: Vec<String>,
    /// Profiles not of interest, in level order
    pub unflagged: Vec<String>,
    /// Profiles flagged by this run (earlier runs may have flagged others)
    pub newly_flagged: usize,
    /// Names removed by cleanup, empty when cleanup was skipped
    pub removed: Vec<String>,
    /// Names still registered after the run, ascending
    pub remaining: Vec<String>,
}

/// Service for loading and analysing forensic cases.
pub struct AnalysisService {
    fs: Arc<dyn FileSystem>,
}

impl AnalysisService {
    /// Create a new analysis service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a case file, then register every listed person.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path, policy: DuplicatePolicy) -> ApplicationResult<Registry> {
        if !self.fs.exists(path) || !self.fs.is_file(path) {
            return Err(ApplicationError::CaseFileNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read case file", path)?;

        let registry = CaseFile::parse(&content)
            .and_then(|case| case.into_registry(policy))
            .map_err(|source| ApplicationError::InvalidCaseFile {
                path: path.to_path_buf(),
                source,
            })?;
        info!("loaded {} profiles from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Flag matching profiles and optionally remove everybody else.
    ///
    /// The unflagged list is taken before cleanup, so it names exactly the
    /// profiles that cleanup removes.
    #[instrument(level = "debug", skip(self, registry))]
    pub fn analyze(&self, registry: &mut Registry, cleanup: bool) -> AnalysisReport {
        let newly_flagged = registry.flag_profiles_of_interest();
        let flagged = registry
            .iter()
            .filter(|node| node.profile().is_of_interest())
            .map(|node| node.key().to_string())
            .collect();
        let unflagged = registry.collect_unflagged();
        debug!(
            "{} of interest, {} not of interest",
            registry.count_by_interest(true),
            unflagged.len()
        );

        let removed = if cleanup { registry.cleanup() } else { Vec::new() };
        let remaining = registry.iter().map(TreeNode::key).map(str::to_string).collect();

        AnalysisReport {
            flagged,
            unflagged,
            newly_flagged,
            removed,
            remaining,
        }
    }

    /// Load a case file and analyse it in one go.
    pub fn run(
        &self,
        path: &Path,
        policy: DuplicatePolicy,
        cleanup: bool,
    ) -> ApplicationResult<(Registry, AnalysisReport)> {
        let mut registry = self.load(path, policy)?;
        let report = self.analyze(&mut registry, cleanup);
        Ok((registry, report))
    }
}
