//! FileSystemService against the real filesystem
//!
//! Each test works inside its own scratch directory under the system temp
//! directory and removes it on drop.

use std::path::PathBuf;
use std::sync::Arc;

use bridge_desktop::{DesktopLocationResolver, StdFileSystemDriver};
use core_fs::{ContentEncoding, FileSystemConfig, FileSystemService, FsError, WriteOptions};
use uuid::Uuid;

struct Scratch {
    root: PathBuf,
    fs: FileSystemService,
}

impl Scratch {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("core-fs-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();

        let locations = DesktopLocationResolver::with_directories(
            root.join("contents"),
            root.join("caches"),
            root.join("tmp"),
        );
        let config = FileSystemConfig::builder()
            .driver(Arc::new(StdFileSystemDriver::new()))
            .locations(Arc::new(locations))
            .build()
            .unwrap();

        Self {
            root,
            fs: FileSystemService::new(config),
        }
    }

    fn path(&self, relative: &str) -> String {
        self.root.join(relative).to_string_lossy().into_owned()
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

#[test]
fn test_standard_locations_are_created() {
    let scratch = Scratch::new();

    let caches = scratch.fs.caches_directory().unwrap();
    assert!(scratch.fs.exists(&caches));
    assert!(scratch.root.join("caches").is_dir());
}

#[test]
fn test_write_read_append_cycle() {
    let scratch = Scratch::new();
    let fs = &scratch.fs;
    let file = scratch.path("notes.txt");

    fs.write_file(&file, "alpha", WriteOptions::new().create(true))
        .unwrap();
    fs.write_file(&file, "-beta", WriteOptions::new().append(true))
        .unwrap();

    assert_eq!(fs.read_file(&file, ContentEncoding::Utf8).unwrap(), "alpha-beta");
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "alpha-beta");
}

#[test]
fn test_base64_append_on_disk() {
    let scratch = Scratch::new();
    let fs = &scratch.fs;
    let file = scratch.path("data.b64");
    let base64 = WriteOptions::new().encoding(ContentEncoding::Base64);

    fs.write_file(&file, "ab", base64.create(true)).unwrap();
    fs.write_file(&file, "cd", base64.append(true)).unwrap();

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "YWJjZA==");
    assert_eq!(fs.read_file(&file, ContentEncoding::Base64).unwrap(), "abcd");
}

#[test]
fn test_base64_read_accepts_line_breaks() {
    let scratch = Scratch::new();
    let file = scratch.root.join("wrapped.b64");
    std::fs::write(&file, "aGVs\r\nbG8=\r\n").unwrap();

    assert_eq!(
        scratch
            .fs
            .read_file(&*file, ContentEncoding::Base64)
            .unwrap(),
        "hello"
    );
}

#[test]
fn test_touch_mkdir_and_remove() {
    let scratch = Scratch::new();
    let fs = &scratch.fs;

    let nested = scratch.path("a/b/c");
    assert!(fs.mkdir(&nested, false).is_err());
    fs.mkdir(&nested, true).unwrap();
    assert!(matches!(fs.mkdir(&nested, true), Err(FsError::AlreadyExists(_))));

    let file = scratch.path("a/b/c/.dotfile");
    fs.touch(&file).unwrap();
    assert!(matches!(fs.touch(&file), Err(FsError::AlreadyExists(_))));

    fs.remove(scratch.path("a")).unwrap();
    assert!(!fs.exists(&file));
    assert!(!fs.exists(scratch.path("a")));
}

#[test]
fn test_copy_and_move_trees() {
    let scratch = Scratch::new();
    let fs = &scratch.fs;

    fs.mkdir(scratch.path("src/inner"), true).unwrap();
    fs.write_file(scratch.path("src/.hidden"), "h", WriteOptions::new().create(true))
        .unwrap();
    fs.touch(scratch.path("src/inner/file")).unwrap();

    fs.copy_file(scratch.path("src"), scratch.path("copy")).unwrap();
    assert_eq!(
        fs.read_file(scratch.path("copy/.hidden"), ContentEncoding::Utf8)
            .unwrap(),
        "h"
    );
    assert!(fs.exists(scratch.path("copy/inner/file")));

    assert!(matches!(
        fs.move_file(scratch.path("src"), scratch.path("copy")),
        Err(FsError::AlreadyExists(_))
    ));

    fs.move_file(scratch.path("src"), scratch.path("moved")).unwrap();
    assert!(fs.exists(scratch.path("moved/.hidden")));
    assert!(!fs.exists(scratch.path("src")));
}

#[test]
fn test_read_dir_and_property() {
    let scratch = Scratch::new();
    let fs = &scratch.fs;

    fs.mkdir(scratch.path("dir"), false).unwrap();
    assert!(fs.read_dir(scratch.path("dir")).unwrap().is_empty());

    fs.write_bytes(scratch.path("dir/report.pdf"), &[1, 2, 3, 4], WriteOptions::new().create(true))
        .unwrap();
    let entries = fs.read_dir(scratch.path("dir")).unwrap();
    assert_eq!(entries.len(), 1);

    let prop = &entries[0];
    assert_eq!(prop.name, "report.pdf");
    assert_eq!(prop.extension.as_deref(), Some("pdf"));
    assert_eq!(prop.size, Some(4));
    assert!(prop.is_file());
    assert!(prop.modified_at.is_some());

    assert!(fs.read_dir(scratch.path("missing")).unwrap_err().is_not_found());
    assert!(matches!(
        fs.read_dir(scratch.path("dir/report.pdf")),
        Err(FsError::WrongType { .. })
    ));
}

#[test]
fn test_directory_size() {
    let scratch = Scratch::new();
    let fs = &scratch.fs;

    fs.mkdir(scratch.path("sized/sub"), true).unwrap();
    fs.write_bytes(scratch.path("sized/one"), &[0; 100], WriteOptions::new().create(true))
        .unwrap();
    fs.write_bytes(scratch.path("sized/sub/.two"), &[0; 28], WriteOptions::new().create(true))
        .unwrap();

    assert_eq!(fs.directory_size(scratch.path("sized")).unwrap(), 128);
}
