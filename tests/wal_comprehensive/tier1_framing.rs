//! Tier 1: Chunk framing scenarios
//!
//! Exact block arithmetic with BLOCK_SIZE = 32768 and HEADER_SIZE = 7.

use crate::test_utils::{parse_log, record, records_by_type};
use stratawal::{RecordType, WalReader, WalWriter, BLOCK_SIZE, HEADER_SIZE};

fn write_all(records: &[Vec<u8>]) -> (Vec<u8>, usize) {
    let mut writer = WalWriter::new(Vec::<u8>::new());
    for r in records {
        writer.add_record(r).unwrap();
    }
    let offset = writer.block_offset();
    (writer.into_inner(), offset)
}

#[test]
fn test_sizes_are_fixed() {
    assert_eq!(BLOCK_SIZE, 32768);
    assert_eq!(HEADER_SIZE, 7);
}

/// Length 0 → one FULL chunk with length 0; offset advances by 7
#[test]
fn test_zero_length_record() {
    let (buf, offset) = write_all(&[Vec::new()]);
    assert_eq!(offset, 7);

    let image = parse_log(&buf);
    assert_eq!(image.chunks.len(), 1);
    let chunk = &image.chunks[0];
    assert_eq!(chunk.record_type(), RecordType::Full);
    assert_eq!(chunk.header.length, 0);
    assert!(chunk.payload.is_empty());
    assert_eq!(chunk.header.masked_crc, chunk.expected_crc());
}

/// Length 32761 fills block 1 exactly; the next record needs no padding
#[test]
fn test_exact_block_fill() {
    let (buf, offset) = write_all(&[record(1, 32761)]);
    assert_eq!(offset, 32768);
    assert_eq!(buf.len(), 32768);

    let (buf, offset) = write_all(&[record(1, 32761), record(2, 10)]);
    assert_eq!(offset, HEADER_SIZE + 10);

    let image = parse_log(&buf);
    assert!(image.trailers.is_empty());
    assert_eq!(image.chunks[1].offset, 32768);
    assert_eq!(records_by_type(&image.chunks).len(), 2);
}

/// Length 32762 → FIRST(32761) + LAST(1) at the start of block 2
#[test]
fn test_one_byte_over_block() {
    let rec = record(3, 32762);
    let (buf, _) = write_all(&[rec.clone()]);

    let image = parse_log(&buf);
    assert_eq!(
        records_by_type(&image.chunks),
        vec![vec![RecordType::First, RecordType::Last]]
    );
    assert_eq!(image.chunks[0].header.length, 32761);
    assert_eq!(image.chunks[1].header.length, 1);
    assert_eq!(image.chunks[1].offset, BLOCK_SIZE);
    assert_eq!(image.chunks[1].payload, vec![rec[32761]]);
}

/// Writer attached at length 32770 starts at offset 2
#[test]
fn test_offset_from_length() {
    let writer = WalWriter::with_offset(Vec::<u8>::new(), 32770);
    assert_eq!(writer.block_offset(), 2);
}

/// Every trailer shorter than a header is zero-filled with exactly the
/// remaining space
#[test]
fn test_padding_for_each_small_trailer() {
    for leftover in 1..HEADER_SIZE {
        let first = record(4, BLOCK_SIZE - HEADER_SIZE - leftover);
        let (buf, _) = write_all(&[first, b"next".to_vec()]);

        let image = parse_log(&buf);
        assert_eq!(image.trailers, vec![(BLOCK_SIZE - leftover, leftover)]);
        assert_eq!(image.chunks[1].offset, BLOCK_SIZE);
    }
}

/// A record spanning many blocks is FIRST, MIDDLE..., LAST with full blocks
#[test]
fn test_three_plus_blocks() {
    let rec = record(5, 3 * BLOCK_SIZE + 500);
    let (buf, _) = write_all(&[rec.clone()]);

    let image = parse_log(&buf);
    let types = records_by_type(&image.chunks);
    assert_eq!(types.len(), 1);
    assert_eq!(
        types[0],
        vec![
            RecordType::First,
            RecordType::Middle,
            RecordType::Middle,
            RecordType::Last,
        ]
    );
    for (i, chunk) in image.chunks.iter().enumerate() {
        assert_eq!(chunk.offset, i * BLOCK_SIZE);
        assert_eq!(chunk.header.masked_crc, chunk.expected_crc());
    }

    let mut reader = WalReader::new(buf.as_slice());
    assert_eq!(reader.read_record().unwrap(), Some(rec));
}

/// Several small records share one block back to back
#[test]
fn test_small_records_pack_into_one_block() {
    let records: Vec<Vec<u8>> = (0..100).map(|i| record(i, 50)).collect();
    let (buf, offset) = write_all(&records);
    assert_eq!(buf.len(), 100 * (HEADER_SIZE + 50));
    assert_eq!(offset, buf.len());

    let image = parse_log(&buf);
    assert!(image
        .chunks
        .iter()
        .all(|c| c.record_type() == RecordType::Full));
}
