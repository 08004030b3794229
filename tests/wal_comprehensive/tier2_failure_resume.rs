//! Tier 2: Failure injection and resume

use crate::test_utils::{parse_log, record, FaultyDest};
use stratawal::{RecordType, TruncateReason, WalReader, WalWriter, BLOCK_SIZE, HEADER_SIZE};

/// Failure on the second chunk of a three-chunk record: chunk 1 is on disk
/// and valid, chunk 3 is never attempted
#[test]
fn test_failure_on_second_of_three_chunks() {
    let rec = record(1, 2 * (BLOCK_SIZE - HEADER_SIZE) + 64);

    // Appends: header 1, payload 1, header 2 (fails)
    let mut writer = WalWriter::new(FaultyDest::failing_append(3));
    assert!(writer.add_record(&rec).is_err());

    let dest = writer.into_inner();
    assert_eq!(dest.appends, 3);
    assert_eq!(dest.flushes, 1);

    let image = parse_log(&dest.data);
    assert_eq!(image.chunks.len(), 1);
    assert_eq!(image.chunks[0].record_type(), RecordType::First);
    assert_eq!(image.chunks[0].header.masked_crc, image.chunks[0].expected_crc());

    // A reader sees no complete record
    let mut reader = WalReader::new(dest.data.as_slice());
    assert_eq!(reader.read_record().unwrap(), None);
    assert_eq!(
        reader.truncate_info().unwrap().reason,
        TruncateReason::IncompleteRecord
    );
}

/// A failed flush is reported and still advances the offset
#[test]
fn test_flush_failure() {
    let mut writer = WalWriter::new(FaultyDest::failing_flush(2));
    writer.add_record(b"ok").unwrap();
    assert!(writer.add_record(b"lost?").is_err());
    assert_eq!(writer.block_offset(), 2 * HEADER_SIZE + 2 + 5);

    // Nothing after the failed chunk was attempted
    let dest = writer.into_inner();
    assert_eq!(dest.appends, 4);
    assert_eq!(dest.flushes, 2);
}

/// After a failure the offset matches the layout a successful write produces
#[test]
fn test_offset_consistent_after_failure() {
    let mut faulty = WalWriter::new(FaultyDest::failing_append(2));
    let mut clean = WalWriter::new(Vec::<u8>::new());

    let rec = record(2, 40_000);
    assert!(faulty.add_record(&rec).is_err());

    // The clean writer emits just the first chunk's worth of layout
    clean.add_record(&record(2, BLOCK_SIZE - HEADER_SIZE)).unwrap();
    assert_eq!(faulty.block_offset(), clean.block_offset());
}

/// Writer attached at any length produces the same bytes as one that wrote
/// the prefix itself
#[test]
fn test_resume_from_every_prefix_boundary() {
    let records: Vec<Vec<u8>> = vec![
        record(3, 10),
        record(4, 32_740),
        record(5, 0),
        record(6, 70_000),
        record(7, 5),
    ];

    let mut continuous = WalWriter::new(Vec::<u8>::new());
    let mut lengths = Vec::new();
    for r in &records {
        continuous.add_record(r).unwrap();
        lengths.push(continuous.get_ref().len());
    }
    let expected = continuous.into_inner();

    for (i, len) in lengths.iter().enumerate() {
        let prefix = expected[..*len].to_vec();
        let mut resumed = WalWriter::with_offset(prefix, *len as u64);
        assert_eq!(resumed.block_offset(), len % BLOCK_SIZE);
        for r in &records[i + 1..] {
            resumed.add_record(r).unwrap();
        }
        assert_eq!(resumed.into_inner(), expected);
    }
}

/// Corrupted tail: reader returns the valid prefix and where it ends
#[test]
fn test_reader_reports_corruption_point() {
    let mut writer = WalWriter::new(Vec::<u8>::new());
    writer.add_record(&record(8, 100)).unwrap();
    writer.add_record(&record(9, 100)).unwrap();
    let mut buf = writer.into_inner();

    // Damage the stored CRC of the second chunk
    buf[HEADER_SIZE + 100] ^= 0x01;

    let mut reader = WalReader::new(buf.as_slice());
    assert_eq!(reader.read_record().unwrap(), Some(record(8, 100)));
    assert_eq!(reader.read_record().unwrap(), None);

    let info = reader.truncate_info().unwrap();
    assert_eq!(info.reason, TruncateReason::ChecksumMismatch);
    assert_eq!(info.valid_end, (HEADER_SIZE + 100) as u64);
    assert_eq!(reader.valid_end(), info.valid_end);
}
