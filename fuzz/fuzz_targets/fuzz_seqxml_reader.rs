#![no_main]

use libfuzzer_sys::fuzz_target;
use seqxml::seqxml::{ReaderConfig, SeqXmlReader};

fuzz_target!(|data: &[u8]| {
    // Any input must either parse or fail with an error, never panic.
    // A small block size exercises records split across reads.
    let config = ReaderConfig::default().with_block_size(7);
    if let Ok(reader) = SeqXmlReader::from_read(data, config) {
        for record in reader.records().take(1000) {
            if record.is_err() {
                break;
            }
        }
    }
});
