use mdf4_blocks::blocks::{
    BlockHeader, BlockId, BlockParse, ChannelGroupBlock, DataGroupBlock, HeaderBlock, Link,
    RawBlock, TextBasedBlock, TextBlock,
};
use mdf4_blocks::{Error, ErrorKind, FormatVersion, Result, SliceSource};
use proptest::prelude::*;

fn header_bytes(id: BlockId, length: u64, links: &[u64]) -> Vec<u8> {
    BlockHeader {
        id,
        length,
        links: links.to_vec(),
    }
    .to_bytes()
}

#[test]
fn data_group_scenario() -> Result<()> {
    let mut bytes = header_bytes(BlockId::DG, 57, &[100, 200, 0, 300]);
    bytes.push(0x01);

    let header = BlockHeader::parse(BlockId::DG, &mut SliceSource::new(&bytes))?;
    assert_eq!(header.data_length(), 1);

    let dg = DataGroupBlock::parse(&mut SliceSource::new(&bytes))?;
    assert_eq!(dg.next_data_group, Link::new(100));
    assert_eq!(dg.first_channel_group, Link::new(200));
    assert!(dg.data.is_nil());
    assert_eq!(dg.comment, Link::new(300));
    assert_eq!(dg.record_id_size, 1);
    Ok(())
}

#[test]
fn every_kind_rejects_foreign_tags() {
    let ids = [BlockId::HD, BlockId::DG, BlockId::CG, BlockId::TX, BlockId::MD];
    for actual in ids {
        // Big enough for every kind's minimum so only the tag can fail.
        let mut bytes = header_bytes(actual, 24 + 48 + 32, &[0; 6]);
        bytes.extend_from_slice(&[0u8; 32]);

        for expected in ids.iter().copied().filter(|e| *e != actual) {
            let err = BlockHeader::parse(expected, &mut SliceSource::new(&bytes)).unwrap_err();
            assert!(matches!(err, Error::BlockIDError { .. }), "{actual} as {expected}");
        }

        let src = || SliceSource::new(&bytes);
        let rejected = [
            actual == BlockId::HD || HeaderBlock::parse(&mut src()).is_err(),
            actual == BlockId::DG || DataGroupBlock::parse(&mut src()).is_err(),
            actual == BlockId::CG || ChannelGroupBlock::parse(&mut src()).is_err(),
            actual == BlockId::TX || TextBlock::parse(&mut src()).is_err(),
        ];
        assert!(rejected.iter().all(|r| *r), "{actual}");
    }
}

#[test]
fn link_to_wrong_kind_is_format_error() -> Result<()> {
    let mut bytes = vec![0u8; 8];
    bytes.extend(header_bytes(BlockId::TX, 32, &[]));
    bytes.extend_from_slice(b"abc\0\0\0\0\0");
    let mut src = SliceSource::new(&bytes);

    let err = Link::<DataGroupBlock>::new(8).resolve(&mut src).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    let text = Link::<TextBlock>::new(8).resolve(&mut src)?;
    assert_eq!(text.map(|t| t.text).as_deref(), Some("abc"));

    let any = Link::<RawBlock>::new(8).resolve(&mut src)?.unwrap();
    assert_eq!(any.header.id, BlockId::TX);
    assert_eq!(any.read_payload(&mut src)?, b"abc\0\0\0\0\0");
    Ok(())
}

#[test]
fn link_past_end_of_file_is_io_error() {
    let bytes = header_bytes(BlockId::TX, 24, &[]);
    let err = Link::<TextBasedBlock>::new(4096)
        .resolve(&mut SliceSource::new(&bytes))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn version_markers() -> Result<()> {
    let v = FormatVersion::from_bytes(b"4.10    ")?;
    assert_eq!((v.major, v.minor, v.as_int()), (4, 10, 410));
    assert!(FormatVersion::from_bytes(b"MDF400  ").unwrap_err().is_format_error());
    Ok(())
}

proptest! {
    #[test]
    fn data_length_matches_framing(
        links in proptest::collection::vec(any::<u64>(), 0..16),
        data_length in 0u64..4096,
    ) {
        let header = BlockHeader::new(BlockId::SD, links.clone(), data_length);
        let bytes = header.to_bytes();
        let parsed = BlockHeader::parse(BlockId::SD, &mut SliceSource::new(&bytes)).unwrap();
        prop_assert_eq!(&parsed.links, &links);
        prop_assert_eq!(parsed.data_length(), data_length);
        prop_assert_eq!(parsed.length, 24 + 8 * links.len() as u64 + data_length);
    }

    #[test]
    fn short_length_is_rejected(link_count in 1usize..16, deficit in 1u64..24) {
        let min = 24 + 8 * link_count as u64;
        let length = min.saturating_sub(deficit);
        let bytes = header_bytes(BlockId::SD, length, &vec![0; link_count]);
        let err = BlockHeader::parse(BlockId::SD, &mut SliceSource::new(&bytes)).unwrap_err();
        let is_invalid_length = matches!(err, Error::InvalidBlockLength { .. });
        prop_assert!(is_invalid_length);
    }

    #[test]
    fn expecting_accepts_exact_minimum(link_count in 0usize..8, data_length in 0u64..64) {
        let mut bytes = header_bytes(
            BlockId::SD,
            24 + 8 * link_count as u64 + data_length,
            &vec![0; link_count],
        );
        bytes.resize(bytes.len() + data_length as usize, 0);
        let ok = BlockHeader::parse_expecting(
            BlockId::SD,
            &mut SliceSource::new(&bytes),
            link_count,
            data_length,
        );
        prop_assert!(ok.is_ok());
        let too_many_links = BlockHeader::parse_expecting(
            BlockId::SD,
            &mut SliceSource::new(&bytes),
            link_count + 1,
            data_length,
        );
        prop_assert!(too_many_links.is_err());
        let too_much_data = BlockHeader::parse_expecting(
            BlockId::SD,
            &mut SliceSource::new(&bytes),
            link_count,
            data_length + 1,
        );
        prop_assert!(too_much_data.is_err());
    }
}
