//! End-to-end tests for FileSystemService over the in-memory adapter
//!
//! Paths in the memory adapter are Unix-style, so these only run on Unix.
#![cfg(unix)]

use std::sync::Arc;

use bridge_memory::MemoryFileSystemDriver;
use bridge_traits::{Clock, ManualClock};
use core_fs::{
    ContentEncoding, FileSystemConfig, FileSystemService, FileType, FsError, PathComponent,
    WriteOptions,
};

fn service_with(driver: MemoryFileSystemDriver, line_width: Option<usize>) -> FileSystemService {
    let driver = Arc::new(driver);
    let config = FileSystemConfig::builder()
        .driver(driver.clone())
        .locations(driver)
        .base64_line_width(line_width)
        .build()
        .unwrap();
    FileSystemService::new(config)
}

fn service() -> FileSystemService {
    service_with(MemoryFileSystemDriver::new(), None)
}

fn create() -> WriteOptions {
    WriteOptions::new().create(true)
}

#[test]
fn test_standard_locations_exist() {
    let fs = service();

    for path in [
        fs.contents_directory().unwrap(),
        fs.caches_directory().unwrap(),
        fs.temporary_directory().unwrap(),
    ] {
        assert!(fs.exists(&path));
        assert!(fs.property(&path).unwrap().is_directory());
    }
}

#[test]
fn test_text_round_trip() {
    let fs = service();

    fs.write_file("/contents/u.txt", "grüße ✓", create()).unwrap();
    assert_eq!(
        fs.read_file("/contents/u.txt", ContentEncoding::Utf8).unwrap(),
        "grüße ✓"
    );

    let ascii = create().encoding(ContentEncoding::Ascii);
    fs.write_file("/contents/a.txt", "plain text", ascii).unwrap();
    assert_eq!(
        fs.read_file("/contents/a.txt", ContentEncoding::Ascii).unwrap(),
        "plain text"
    );
}

#[test]
fn test_base64_round_trip() {
    let fs = service();
    let base64 = create().encoding(ContentEncoding::Base64);

    fs.write_file("/contents/b.txt", "hello", base64).unwrap();

    assert_eq!(
        fs.read_file("/contents/b.txt", ContentEncoding::Base64).unwrap(),
        "hello"
    );
    assert_eq!(&fs.read_bytes("/contents/b.txt").unwrap()[..], b"aGVsbG8=");
}

#[test]
fn test_base64_append_concatenates_decoded_text() {
    let fs = service();
    let base64 = WriteOptions::new().encoding(ContentEncoding::Base64);

    fs.write_file("/contents/b.txt", "ab", base64.create(true)).unwrap();
    fs.write_file("/contents/b.txt", "cd", base64.append(true)).unwrap();

    assert_eq!(
        fs.read_file("/contents/b.txt", ContentEncoding::Base64).unwrap(),
        "abcd"
    );
    assert_eq!(&fs.read_bytes("/contents/b.txt").unwrap()[..], b"YWJjZA==");
}

#[test]
fn test_base64_wrapped_lines_survive_append() {
    let fs = service_with(MemoryFileSystemDriver::new(), Some(8));
    let base64 = WriteOptions::new().encoding(ContentEncoding::Base64);
    let first = "first chunk of text, ";
    let second = "second chunk";

    fs.write_file("/tmp/w.b64", first, base64.create(true)).unwrap();
    fs.write_file("/tmp/w.b64", second, base64.append(true)).unwrap();

    let stored = fs.read_bytes("/tmp/w.b64").unwrap();
    let stored = std::str::from_utf8(&stored).unwrap();
    assert!(stored.lines().all(|line| line.len() <= 8));

    assert_eq!(
        fs.read_file("/tmp/w.b64", ContentEncoding::Base64).unwrap(),
        format!("{first}{second}")
    );
}

#[test]
fn test_text_append_keeps_existing_content() {
    let fs = service();

    fs.write_file("/tmp/log.txt", "one\n", create()).unwrap();
    fs.write_file("/tmp/log.txt", "two\n", WriteOptions::new().append(true))
        .unwrap();

    assert_eq!(
        fs.read_file("/tmp/log.txt", ContentEncoding::Utf8).unwrap(),
        "one\ntwo\n"
    );
}

#[test]
fn test_append_with_create_on_missing_file() {
    let fs = service();

    fs.write_file("/tmp/new.log", "start", create().append(true))
        .unwrap();
    assert_eq!(
        fs.read_file("/tmp/new.log", ContentEncoding::Utf8).unwrap(),
        "start"
    );
}

#[test]
fn test_binary_write_and_append() {
    let driver = MemoryFileSystemDriver::new();
    let handles = driver.clone();
    let fs = service_with(driver, None);

    fs.write_bytes("/caches/blob", &[0, 1, 2], create()).unwrap();
    fs.write_bytes("/caches/blob", &[0xFF], WriteOptions::new().append(true))
        .unwrap();

    assert_eq!(&fs.read_bytes("/caches/blob").unwrap()[..], &[0, 1, 2, 0xFF]);
    assert_eq!(handles.open_handle_count(), 0);
}

#[test]
fn test_write_without_create_leaves_nothing_behind() {
    let fs = service();

    let err = fs
        .write_file("/tmp/missing.txt", "x", WriteOptions::new())
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!fs.exists("/tmp/missing.txt"));
}

#[test]
fn test_invalid_ascii_creates_nothing() {
    let fs = service();

    let err = fs
        .write_file(
            "/tmp/bad.txt",
            "naïve",
            create().encoding(ContentEncoding::Ascii),
        )
        .unwrap_err();
    assert!(matches!(err, FsError::InvalidContent { .. }));
    assert!(!fs.exists("/tmp/bad.txt"));
}

#[test]
fn test_write_into_missing_parent_fails() {
    let fs = service();
    assert!(fs
        .write_file("/tmp/no/such/dir/file.txt", "x", create())
        .is_err());
}

#[test]
fn test_write_to_directory_is_wrong_type() {
    let fs = service();
    let err = fs.write_file("/tmp", "x", create()).unwrap_err();
    assert!(matches!(err, FsError::WrongType { expected: "file", .. }));
}

#[test]
fn test_touch_twice() {
    let fs = service();

    fs.touch("/contents/fresh").unwrap();
    assert!(fs.exists("/contents/fresh"));
    assert!(fs.property("/contents/fresh").unwrap().is_file());

    assert!(matches!(
        fs.touch("/contents/fresh"),
        Err(FsError::AlreadyExists(_))
    ));
}

#[test]
fn test_mkdir_recursive_and_strict() {
    let fs = service();

    assert!(fs.mkdir("/contents/a/b/c", false).unwrap_err().is_not_found());
    assert!(!fs.exists("/contents/a"));

    fs.mkdir("/contents/a/b/c", true).unwrap();
    assert!(fs.exists("/contents/a"));
    assert!(fs.exists("/contents/a/b"));
    assert!(fs.exists("/contents/a/b/c"));

    assert!(matches!(
        fs.mkdir("/contents/a/b/c", true),
        Err(FsError::AlreadyExists(_))
    ));
    assert!(matches!(
        fs.mkdir("/contents/a/b/c", false),
        Err(FsError::AlreadyExists(_))
    ));
}

#[test]
fn test_remove_directory_tree() {
    let fs = service();

    fs.mkdir("/contents/tree/sub", true).unwrap();
    fs.touch("/contents/tree/top.txt").unwrap();
    fs.touch("/contents/tree/sub/.hidden").unwrap();
    fs.touch("/contents/tree/sub/deep.txt").unwrap();

    fs.remove("/contents/tree").unwrap();

    for path in [
        "/contents/tree",
        "/contents/tree/top.txt",
        "/contents/tree/sub",
        "/contents/tree/sub/.hidden",
        "/contents/tree/sub/deep.txt",
    ] {
        assert!(!fs.exists(path), "{path} survived");
    }

    assert!(fs.remove("/contents/tree").unwrap_err().is_not_found());
}

#[test]
fn test_copy_includes_hidden_entries() {
    let fs = service();

    fs.mkdir("/contents/src/nested", true).unwrap();
    fs.write_file("/contents/src/.secret", "s", create()).unwrap();
    fs.write_file("/contents/src/nested/.cfg", "c", create()).unwrap();

    fs.copy_file("/contents/src", "/caches/dest").unwrap();

    assert_eq!(
        fs.read_file("/caches/dest/.secret", ContentEncoding::Utf8).unwrap(),
        "s"
    );
    assert!(fs.exists("/caches/dest/nested/.cfg"));
    assert!(fs.exists("/contents/src/.secret"));
}

#[test]
fn test_move_includes_hidden_entries() {
    let fs = service();

    fs.mkdir("/contents/src", false).unwrap();
    fs.touch("/contents/src/.keep").unwrap();

    fs.move_file("/contents/src", "/tmp/moved").unwrap();

    assert!(fs.exists("/tmp/moved/.keep"));
    assert!(!fs.exists("/contents/src"));
}

#[test]
fn test_transfer_edge_cases() {
    let fs = service();
    fs.mkdir("/contents/dir", false).unwrap();
    fs.touch("/contents/file").unwrap();

    assert!(fs.copy_file("/contents/none", "/tmp/x").unwrap_err().is_not_found());
    assert!(matches!(
        fs.move_file("/contents/dir", "/contents/file"),
        Err(FsError::AlreadyExists(_))
    ));
    assert!(matches!(
        fs.copy_file("/contents/dir", "/contents/dir/inner"),
        Err(FsError::InvalidPath(_))
    ));
    assert!(fs
        .copy_file("/contents/file", "/tmp/missing/parent")
        .unwrap_err()
        .is_not_found());
    assert!(matches!(
        fs.copy_file("/contents/dir", "/contents/file/child"),
        Err(FsError::WrongType { expected: "directory", .. })
    ));
}

#[test]
fn test_read_dir_empty_missing_and_file() {
    let fs = service();
    fs.mkdir("/contents/empty", false).unwrap();
    fs.touch("/contents/plain").unwrap();

    assert!(fs.read_dir("/contents/empty").unwrap().is_empty());
    assert!(fs.read_dir("/contents/nothing").unwrap_err().is_not_found());
    assert!(matches!(
        fs.read_dir("/contents/plain"),
        Err(FsError::WrongType { expected: "directory", .. })
    ));
}

#[test]
fn test_read_dir_lists_immediate_children() {
    let fs = service();
    fs.mkdir("/contents/docs/inner", true).unwrap();
    fs.write_file("/contents/docs/b.md", "# b", create()).unwrap();
    fs.touch("/contents/docs/.a").unwrap();
    fs.touch("/contents/docs/inner/deep.txt").unwrap();

    let entries = fs.read_dir("/contents/docs").unwrap();
    let names: Vec<&str> = entries.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec![".a", "b.md", "inner"]);

    assert!(entries[0].is_hidden());
    assert_eq!(entries[1].extension.as_deref(), Some("md"));
    assert_eq!(entries[1].size, Some(3));
    assert_eq!(entries[2].file_type, FileType::Directory);
    assert_eq!(
        entries[1].absolute_path,
        PathComponent::new("/contents/docs/b.md")
    );
}

#[test]
fn test_property_timestamps_follow_clock() {
    let clock = Arc::new(ManualClock::new(1_000));
    let driver = MemoryFileSystemDriver::with_clock(clock.clone() as Arc<dyn Clock>);
    let fs = service_with(driver, None);

    fs.touch("/tmp/t").unwrap();
    clock.advance(500);
    fs.write_file("/tmp/t", "later", WriteOptions::new()).unwrap();

    let prop = fs.property("/tmp/t").unwrap();
    assert_eq!(prop.created_at, Some(1_000));
    assert_eq!(prop.modified_at, Some(1_500));
}

#[test]
fn test_creation_time_unavailable_is_none() {
    let fs = service_with(MemoryFileSystemDriver::new().without_creation_time(), None);

    fs.touch("/tmp/t").unwrap();
    let prop = fs.property("/tmp/t").unwrap();

    assert_eq!(prop.created_at, None);
    assert!(prop.modified_at.is_some());
}

#[test]
fn test_directory_size_counts_hidden_files() {
    let fs = service();
    fs.mkdir("/contents/sized/sub", true).unwrap();
    fs.write_bytes("/contents/sized/a", &[0; 10], create()).unwrap();
    fs.write_bytes("/contents/sized/.h", &[0; 5], create()).unwrap();
    fs.write_bytes("/contents/sized/sub/b", &[0; 7], create()).unwrap();

    assert_eq!(fs.directory_size("/contents/sized").unwrap(), 22);
    assert!(fs.directory_size("/contents/sized/a").is_err());
}

#[test]
fn test_paths_are_normalized_before_use() {
    let fs = service();

    fs.write_file("/contents/./x/../n.txt", "n", create()).unwrap();
    assert!(fs.exists("/contents/n.txt"));

    let base = PathComponent::new("/contents");
    let child = base.by_appending("n.txt").unwrap();
    assert_eq!(fs.read_file(&child, ContentEncoding::Utf8).unwrap(), "n");
}

#[test]
fn test_exists_is_stable() {
    let fs = service();
    fs.touch("/tmp/stable").unwrap();

    let first = fs.exists("/tmp/stable");
    for _ in 0..5 {
        assert_eq!(fs.exists("/tmp/stable"), first);
    }
    assert!(!fs.exists(""));
}
