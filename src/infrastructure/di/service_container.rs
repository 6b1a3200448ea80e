//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::AnalysisService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Case loading and analysis
    pub analysis: AnalysisService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let analysis = AnalysisService::new(fs);

        Self { settings, analysis }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DuplicatePolicy;
    use std::io;
    use std::path::Path;

    struct OneFile;

    impl FileSystem for OneFile {
        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            Ok("GATTACA\nTAGGAT\n1\nJane Doe 0\n".to_string())
        }

        fn exists(&self, path: &Path) -> bool {
            path == Path::new("case.txt")
        }

        fn is_file(&self, path: &Path) -> bool {
            self.exists(path)
        }
    }

    #[test]
    fn given_custom_filesystem_when_wiring_then_analysis_reads_through_it() {
        let container = ServiceContainer::with_deps(Settings::default(), Arc::new(OneFile));

        let registry = container
            .analysis
            .load(Path::new("case.txt"), container.settings.duplicate_policy)
            .unwrap();

        assert_eq!(registry.names(), ["Doe, Jane"]);
        assert_eq!(container.settings.duplicate_policy, DuplicatePolicy::Reject);
    }
}
