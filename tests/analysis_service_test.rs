//! Integration tests for AnalysisService: case file loading and the analysis pipeline

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use forensic::application::services::AnalysisService;
use forensic::application::ApplicationError;
use forensic::domain::{DomainError, DuplicatePolicy};
use forensic::infrastructure::traits::{FileSystem, RealFileSystem};
use forensic::util::testing;

const CASE: &str = "\
AAGATCAGATCAGA
AGATCTAGATCAAA
5
Ann Miller 2 AGATC 4 AATG 0
Jane Doe 1 AGATC 1
Carl Smith 3 AGATC 4 TATC 2 GATA 0
Bob Adams
  2 CAGA 2
    TCTA 1
Jo Park 2 AGATC 5 TTTT 1
";

/// In-memory filesystem holding a fixed set of files.
#[derive(Default)]
struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.files.keys().any(|file| file.starts_with(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

fn memory_service(path: &str, content: &str) -> AnalysisService {
    testing::init_test_setup();
    AnalysisService::new(Arc::new(MemoryFileSystem::default().with_file(path, content)))
}

// ============================================================
// load()
// ============================================================

#[test]
fn given_case_file_on_disk_when_loading_then_registry_holds_all_persons() {
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("case.txt");
    fs::write(&path, CASE).unwrap();
    let service = AnalysisService::new(Arc::new(RealFileSystem));

    let registry = service.load(&path, DuplicatePolicy::Reject).unwrap();

    assert_eq!(registry.len(), 5);
    assert_eq!(registry.sequence_a(), "AAGATCAGATCAGA");
    assert_eq!(registry.sequence_b(), "AGATCTAGATCAAA");
    assert_eq!(
        registry.names(),
        ["Adams, Bob", "Doe, Jane", "Miller, Ann", "Park, Jo", "Smith, Carl"]
    );
    assert_eq!(registry.root().unwrap().key(), "Miller, Ann");
}

#[test]
fn given_missing_path_when_loading_then_case_file_not_found() {
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    let service = AnalysisService::new(Arc::new(RealFileSystem));

    let err = service
        .load(&dir.path().join("absent.txt"), DuplicatePolicy::Reject)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::CaseFileNotFound(_)), "{err}");
}

#[test]
fn given_directory_when_loading_then_case_file_not_found() {
    let service = memory_service("/cases/a/case.txt", CASE);

    let err = service
        .load(Path::new("/cases/a"), DuplicatePolicy::Reject)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::CaseFileNotFound(_)), "{err}");
}

#[test]
fn given_truncated_case_when_loading_then_invalid_case_file_with_path() {
    let service = memory_service("/cases/bad.txt", "GATTACA\nTAGGAT\n2\nJane Doe 1 AGATC\n");

    let err = service
        .load(Path::new("/cases/bad.txt"), DuplicatePolicy::Reject)
        .unwrap_err();

    match &err {
        ApplicationError::InvalidCaseFile { path, source } => {
            assert_eq!(path, Path::new("/cases/bad.txt"));
            assert!(matches!(source, DomainError::InvalidCaseFile { line: 4, .. }), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("/cases/bad.txt"), "{err}");
}

#[test]
fn given_duplicate_person_when_loading_with_reject_then_invalid_case_file() {
    let case = "A\nB\n2\nJane Doe 0\nJane Doe 1 A 0\n";
    let service = memory_service("/cases/dup.txt", case);

    let err = service
        .load(Path::new("/cases/dup.txt"), DuplicatePolicy::Reject)
        .unwrap_err();

    assert!(
        matches!(
            err,
            ApplicationError::InvalidCaseFile {
                source: DomainError::DuplicateKey(ref name),
                ..
            } if name == "Doe, Jane"
        ),
        "{err}"
    );
}

#[test]
fn given_duplicate_person_when_loading_with_overwrite_then_last_profile_wins() {
    let case = "A\nB\n2\nJane Doe 0\nJane Doe 1 A 0\n";
    let service = memory_service("/cases/dup.txt", case);

    let registry = service
        .load(Path::new("/cases/dup.txt"), DuplicatePolicy::Overwrite)
        .unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("Doe, Jane").unwrap().markers().len(), 1);
}

// ============================================================
// analyze() / run()
// ============================================================

#[test]
fn given_case_when_running_with_cleanup_then_only_profiles_of_interest_remain() {
    let service = memory_service("/cases/case.txt", CASE);

    let (registry, report) = service
        .run(Path::new("/cases/case.txt"), DuplicatePolicy::Reject, true)
        .unwrap();

    assert_eq!(report.flagged, ["Adams, Bob", "Miller, Ann", "Smith, Carl"]);
    // Miller(root) / Doe, Smith / Adams, Park
    assert_eq!(report.unflagged, ["Doe, Jane", "Park, Jo"]);
    assert_eq!(report.newly_flagged, 3);
    assert_eq!(report.removed, report.unflagged);
    assert_eq!(report.remaining, report.flagged);
    assert_eq!(registry.names(), ["Adams, Bob", "Miller, Ann", "Smith, Carl"]);
    assert_eq!(registry.count_by_interest(false), 0);
}

#[test]
fn given_case_when_running_without_cleanup_then_registry_kept_whole() {
    let service = memory_service("/cases/case.txt", CASE);

    let (registry, report) = service
        .run(Path::new("/cases/case.txt"), DuplicatePolicy::Reject, false)
        .unwrap();

    assert!(report.removed.is_empty());
    assert_eq!(report.remaining.len(), 5);
    assert_eq!(registry.len(), 5);
    assert_eq!(registry.count_by_interest(true), 3);
    assert_eq!(registry.collect_unflagged(), report.unflagged);
}

#[test]
fn given_analyzed_registry_when_analyzing_again_then_nothing_newly_flagged() {
    let service = memory_service("/cases/case.txt", CASE);
    let mut registry = service
        .load(Path::new("/cases/case.txt"), DuplicatePolicy::Reject)
        .unwrap();

    let first = service.analyze(&mut registry, false);
    let second = service.analyze(&mut registry, false);

    assert_eq!(first.newly_flagged, 3);
    assert_eq!(second.newly_flagged, 0);
    assert_eq!(second.flagged, first.flagged);
    assert_eq!(second.unflagged, first.unflagged);
}

#[test]
fn given_empty_case_when_running_then_empty_report() {
    let service = memory_service("/cases/empty.txt", "GATTACA\nTAGGAT\n0\n");

    let (registry, report) = service
        .run(Path::new("/cases/empty.txt"), DuplicatePolicy::Reject, true)
        .unwrap();

    assert!(registry.is_empty());
    assert!(report.flagged.is_empty());
    assert!(report.unflagged.is_empty());
    assert!(report.removed.is_empty());
    assert_eq!(report.newly_flagged, 0);
}
