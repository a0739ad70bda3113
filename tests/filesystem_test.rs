//! Tests for the real FileSystem implementation

use std::fs;

use cardcat::infrastructure::traits::{FileSystem, RealFileSystem};
use tempfile::TempDir;

#[test]
fn given_existing_file_when_file_len_then_returns_size() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("cat.png");
    fs::write(&file, b"PNGDATA").unwrap();

    // Act
    let len = RealFileSystem.file_len(&file);

    // Assert
    assert_eq!(len, Some(7));
}

#[test]
fn given_missing_file_or_directory_when_file_len_then_none() {
    let temp = TempDir::new().unwrap();

    assert_eq!(RealFileSystem.file_len(&temp.path().join("missing.png")), None);
    assert_eq!(RealFileSystem.file_len(temp.path()), None);
}

#[test]
fn given_nested_dir_when_create_dir_all_and_write_bytes_then_file_written() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("img").join("Animals");
    let target = dir.join("Cat.png");
    let fs_impl = RealFileSystem;

    // Act
    fs_impl.create_dir_all(&dir).unwrap();
    fs_impl.create_dir_all(&dir).unwrap();
    fs_impl.write_bytes(&target, b"PNG").unwrap();

    // Assert
    assert_eq!(fs_impl.file_len(&target), Some(3));
    assert_eq!(fs::read(&target).unwrap(), b"PNG");
}

#[test]
fn given_existing_file_when_write_then_overwrites() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("cards.yaml");
    let fs_impl = RealFileSystem;
    fs_impl.write(&file, "old: content\n").unwrap();

    // Act
    fs_impl.write(&file, "new: content\n").unwrap();

    // Assert
    assert_eq!(fs_impl.read_to_string(&file).unwrap(), "new: content\n");
}
