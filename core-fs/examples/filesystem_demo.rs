//! Walk through the filesystem façade on the in-memory adapter
//!
//! Run with:
//! ```bash
//! cargo run -p core-fs --example filesystem_demo
//! ```

use std::sync::Arc;

use bridge_memory::MemoryFileSystemDriver;
use bridge_traits::LogLevel;
use core_fs::{ContentEncoding, FileSystemConfig, FileSystemService, WriteOptions};
use core_runtime::logging::{init_logging, LoggingConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default().with_level(LogLevel::Debug))?;

    let driver = Arc::new(MemoryFileSystemDriver::new());
    let config = FileSystemConfig::builder()
        .driver(driver.clone())
        .locations(driver)
        .base64_line_width(Some(76))
        .redact_paths(false)
        .build()?;
    let fs = FileSystemService::new(config);

    let contents = fs.contents_directory()?;
    let notes = contents.by_appending("notes").ok_or("unresolvable path")?;
    fs.mkdir(&notes, false)?;

    let journal = notes.by_appending("journal.b64").ok_or("unresolvable path")?;
    let base64 = WriteOptions::new().encoding(ContentEncoding::Base64);
    fs.write_file(&journal, "monday; ", base64.create(true))?;
    fs.write_file(&journal, "tuesday", base64.append(true))?;
    println!(
        "journal: {:?}",
        fs.read_file(&journal, ContentEncoding::Base64)?
    );

    fs.touch(notes.by_appending(".index").ok_or("unresolvable path")?)?;

    for entry in fs.read_dir(&notes)? {
        println!(
            "{:<12} {:?} {:>4} bytes hidden={}",
            entry.name,
            entry.file_type,
            entry.size.unwrap_or_default(),
            entry.is_hidden()
        );
    }
    println!("total: {} bytes", fs.directory_size(&notes)?);

    let archive = contents.by_appending("archive").ok_or("unresolvable path")?;
    fs.copy_file(&notes, &archive)?;
    fs.remove(&notes)?;
    println!("notes exists after remove: {}", fs.exists(&notes));
    println!("archive exists: {}", fs.exists(&archive));

    Ok(())
}
