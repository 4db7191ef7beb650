//! Property tests for incremental parsing
//!
//! The records produced must not depend on how the input is split into reads.

use proptest::prelude::*;
use seqxml::prelude::*;
use seqxml::record::MOLECULE_TYPE;

const MOLECULE_TYPES: [&str; 4] = ["DNA", "genomic DNA", "mRNA", "protein"];

fn document(entries: &[(String, String, usize, Option<String>)]) -> Vec<u8> {
    let records: Vec<SeqRecord> = entries
        .iter()
        .enumerate()
        .map(|(i, (seq, gene, kind, description))| {
            let mut record = SeqRecord::new(format!("entry{}", i), seq.as_str())
                .with_annotation(MOLECULE_TYPE, MOLECULE_TYPES[*kind])
                .with_annotation("gene", gene.as_str())
                .with_dbxref(format!("db:{}", i));
            record.description = description.clone();
            record
        })
        .collect();

    let config = WriterConfig::default()
        .with_source("proptest")
        .with_species("Homo sapiens")
        .with_ncbi_tax_id(9606);
    let mut writer = SeqXmlWriter::new(Vec::new(), config);
    writer.write_file(&records).unwrap();
    writer.into_inner()
}

fn read_all(xml: &[u8], block_size: usize) -> Vec<SeqRecord> {
    let reader = SeqXmlReader::from_read(xml, ReaderConfig::default().with_block_size(block_size))
        .unwrap();
    reader.records().collect::<Result<_, _>>().unwrap()
}

fn entry_strategy() -> impl Strategy<Value = (String, String, usize, Option<String>)> {
    (
        "[ACGT]{1,40}",
        "[a-z&<>\"' ]{0,12}",
        0..MOLECULE_TYPES.len(),
        proptest::option::of("[A-Za-z0-9 &<>]{1,30}"),
    )
}

proptest! {
    #[test]
    fn block_size_does_not_change_records(
        entries in proptest::collection::vec(entry_strategy(), 0..12),
        block_size in 1usize..256,
    ) {
        let xml = document(&entries);
        let whole = read_all(&xml, xml.len().max(1));
        let chunked = read_all(&xml, block_size);

        prop_assert_eq!(whole.len(), entries.len());
        prop_assert_eq!(&chunked, &whole);
    }

    #[test]
    fn sequences_survive_round_trip(
        entries in proptest::collection::vec(entry_strategy(), 1..8),
    ) {
        let xml = document(&entries);
        let records = read_all(&xml, 17);
        for (record, (seq, _, kind, _)) in records.iter().zip(&entries) {
            prop_assert_eq!(record.seq_str(), Some(seq.as_str()));
            prop_assert_eq!(record.molecule_type(), Some(MOLECULE_TYPES[*kind]));
        }
    }
}
