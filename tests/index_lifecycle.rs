use devmind::indexer::content_preview;
use devmind::{DevMindError, ProjectIndexer};
use proptest::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn write_files(root: &std::path::Path, files: &[&str]) {
    for relative in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("# {}\nimport os\n", relative)).unwrap();
    }
}

#[test]
fn indexed_paths_match_text_files_exactly() {
    let temp_dir = TempDir::new().unwrap();
    let expected = ["a.py", "b/c.py", "b/d/e.txt", "z/y/x/w.md"];
    write_files(temp_dir.path(), &expected);
    fs::write(temp_dir.path().join("b/blob.dat"), [0x80u8, 0x81, 0x82]).unwrap();
    fs::create_dir_all(temp_dir.path().join("empty/dir")).unwrap();

    let indexer = ProjectIndexer::default();
    let result = indexer.analyze(temp_dir.path()).unwrap();

    let got: HashSet<&str> = result.files.iter().map(String::as_str).collect();
    assert_eq!(got, expected.iter().copied().collect::<HashSet<_>>());
    assert_eq!(got.len(), result.files.len());
    assert_eq!(result.skipped, 1);
    assert_eq!(indexer.list_paths(), result.files);
}

#[test]
fn every_indexed_path_round_trips_content() {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &["one.py", "nested/two.py"]);

    let indexer = ProjectIndexer::default();
    for path in indexer.analyze(temp_dir.path()).unwrap().files {
        let record = indexer.get_summary(&path).unwrap();
        let on_disk = fs::read_to_string(&record.absolute_path).unwrap();
        assert_eq!(indexer.get_full_content(&path).unwrap(), on_disk);
    }
}

#[test]
fn re_analyze_replaces_every_entry() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_files(first.path(), &["old/a.py", "old/b.py"]);
    write_files(second.path(), &["new.py"]);

    let indexer = ProjectIndexer::default();
    let before = indexer.analyze(first.path()).unwrap().files;
    indexer.analyze(second.path()).unwrap();

    for path in before {
        assert!(matches!(
            indexer.get_summary(&path),
            Err(DevMindError::NotIndexed(_))
        ));
    }
    assert_eq!(indexer.list_paths(), vec!["new.py"]);
}

#[test]
fn readers_never_see_a_mixed_index() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let first_files: Vec<String> = (0..40).map(|i| format!("first_{:02}.py", i)).collect();
    let second_files: Vec<String> = (0..40).map(|i| format!("second_{:02}.py", i)).collect();
    write_files(first.path(), &first_files.iter().map(String::as_str).collect::<Vec<_>>());
    write_files(second.path(), &second_files.iter().map(String::as_str).collect::<Vec<_>>());

    let indexer = Arc::new(ProjectIndexer::default());
    indexer.analyze(first.path()).unwrap();

    let reader = {
        let indexer = Arc::clone(&indexer);
        thread::spawn(move || {
            for _ in 0..200 {
                let snapshot = indexer.snapshot();
                let firsts = snapshot.paths().iter().filter(|p| p.starts_with("first_")).count();
                let seconds = snapshot.paths().iter().filter(|p| p.starts_with("second_")).count();
                assert!(
                    (firsts == 40 && seconds == 0) || (firsts == 0 && seconds == 40),
                    "observed {} first and {} second entries",
                    firsts,
                    seconds
                );
            }
        })
    };

    for round in 0..10 {
        let root = if round % 2 == 0 { second.path() } else { first.path() };
        indexer.analyze(root).unwrap();
    }
    reader.join().unwrap();
}

proptest! {
    #[test]
    fn preview_length_contract(text in "\\PC{0,1500}", limit in 0usize..1200) {
        let marker = "...";
        let preview = content_preview(&text, limit, marker);
        let len = text.chars().count();

        if len > limit {
            prop_assert_eq!(preview.chars().count(), limit + marker.chars().count());
            prop_assert!(preview.ends_with(marker));
            let kept: String = text.chars().take(limit).collect();
            prop_assert!(preview.starts_with(&kept));
        } else {
            prop_assert_eq!(preview, text);
        }
    }
}
