use std::fs;

use spkpack::spk::SpkWriter;
use spkpack::{SpkExtractor, SpkParser};
use tempfile::TempDir;

#[test]
fn test_list_reports_sizes_and_offsets() {
    let tmp = TempDir::new().unwrap();
    let archive = tmp.path().join("l.spk");

    let file = fs::File::create(&archive).unwrap();
    let mut writer = SpkWriter::new(file, &archive).unwrap();
    writer.add_file("first.txt", b"aaaaaaaaaaaaaaaa").unwrap();
    writer.add_file("dir/second.txt", b"b").unwrap();
    writer.finish().unwrap();

    let extractor = SpkExtractor::open(&archive).unwrap();
    let entries = extractor.list_files().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].file_name, "first.txt");
    assert_eq!(entries[0].file_size(), 16);
    assert_eq!(entries[0].offset(), 16);
    assert_eq!(
        entries[1].offset(),
        entries[0].offset() + entries[0].compressed_size()
    );
    assert_eq!(extractor.extract_to_memory(&entries[1]).unwrap(), b"b");
}

#[test]
fn test_in_memory_archive_matches_file_archive() {
    let tmp = TempDir::new().unwrap();
    let archive = tmp.path().join("m.spk");

    let file = fs::File::create(&archive).unwrap();
    let mut writer = SpkWriter::new(file, &archive).unwrap();
    writer.add_file("x", b"xyz").unwrap();
    writer.finish().unwrap();

    let bytes = fs::read(&archive).unwrap();
    let from_memory = SpkParser::new(bytes, "memory").list_files().unwrap();
    let from_disk = SpkExtractor::open(&archive).unwrap().list_files().unwrap();
    assert_eq!(from_memory, from_disk);
}

#[test]
fn test_missing_archive_error_names_path() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.spk");
    let err = match SpkExtractor::open(&missing) {
        Ok(_) => panic!("opened a missing archive"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("nope.spk"), "{err}");
}
