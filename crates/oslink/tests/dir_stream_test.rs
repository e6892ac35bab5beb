//! Directory stream behavior against a real filesystem.

use std::fs::File;
use std::path::Path;

use oslink::{DirStream, HandleError, HandleKind};

fn make_dir(names: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        File::create(dir.path().join(name)).unwrap();
    }
    dir
}

fn open(path: &Path) -> DirStream {
    DirStream::open(path.to_str().unwrap()).unwrap()
}

/// Collects the remaining entry names, skipping the dot entries.
fn remaining_names(stream: &mut DirStream) -> Vec<String> {
    let mut names = Vec::new();
    while let Some(entry) = stream.next().unwrap() {
        let name = entry.name.to_string_lossy().into_owned();
        if name != "." && name != ".." {
            names.push(name);
        }
    }
    names
}

#[test]
fn two_entry_scenario() {
    let dir = make_dir(&["a", "b"]);
    let mut stream = open(dir.path());

    let mut names = remaining_names(&mut stream);
    names.sort();
    assert_eq!(names, ["a", "b"]);

    // Past the end the stream yields the end marker forever.
    assert_eq!(stream.next().unwrap(), None);
    assert_eq!(stream.next().unwrap(), None);

    assert!(stream.close());
    assert_eq!(
        stream.next(),
        Err(HandleError::Closed(HandleKind::Directory))
    );
}

#[test]
fn close_is_idempotent() {
    let dir = make_dir(&[]);
    let mut stream = open(dir.path());
    assert!(stream.is_live());
    assert!(stream.close());
    assert!(!stream.is_live());
    assert!(!stream.close());
    assert!(!stream.close());
}

#[test]
fn every_operation_fails_closed_after_close() {
    let dir = make_dir(&["a"]);
    let mut stream = open(dir.path());
    stream.close();

    let closed = HandleError::Closed(HandleKind::Directory);
    assert_eq!(stream.next(), Err(closed));
    assert_eq!(stream.position(), Err(closed));
    assert_eq!(stream.seek(0), Err(closed));
    assert_eq!(stream.rewind(), Err(closed));
}

#[test]
fn rewind_reproduces_the_ordered_sequence() {
    let dir = make_dir(&["one", "two", "three", "four"]);
    let mut stream = open(dir.path());

    let first_pass = remaining_names(&mut stream);
    stream.rewind().unwrap();
    let second_pass = remaining_names(&mut stream);
    assert_eq!(first_pass, second_pass);
}

#[test]
fn seek_restores_position() {
    let dir = make_dir(&["one", "two", "three", "four"]);
    let mut stream = open(dir.path());

    // Consume a couple of entries, note the cursor, and read the tail.
    stream.next().unwrap().unwrap();
    stream.next().unwrap().unwrap();
    let cursor = stream.position().unwrap();
    let tail = remaining_names(&mut stream);

    stream.seek(cursor).unwrap();
    assert_eq!(stream.position().unwrap(), cursor);
    assert_eq!(remaining_names(&mut stream), tail);
}

#[test]
fn entries_carry_native_fields() {
    let dir = make_dir(&["plain"]);
    let mut stream = open(dir.path());
    let entry = loop {
        let entry = stream.next().unwrap().unwrap();
        if entry.name == "plain" {
            break entry;
        }
    };
    assert_ne!(entry.ino, 0);
    #[cfg(target_os = "linux")]
    assert!(entry.offset.is_some());
    #[cfg(not(target_os = "linux"))]
    assert!(entry.offset.is_none());
}

#[test]
fn open_failure_diagnostic_names_the_path() {
    let err = DirStream::open("/definitely/not/a/directory").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("/definitely/not/a/directory"), "got: {msg}");
    // The native error text follows the path.
    assert!(msg.len() > "/definitely/not/a/directory: ".len());
}

#[test]
fn open_rejects_interior_nul() {
    assert!(DirStream::open("/tmp/\0bad").is_err());
}

#[test]
fn drop_after_explicit_close_is_safe() {
    let dir = make_dir(&["a"]);
    let mut stream = open(dir.path());
    assert!(stream.close());
    drop(stream); // Drop releases again; must be a silent no-op.
}
