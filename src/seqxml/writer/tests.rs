use super::*;
use crate::seqxml::{parse_str, ErrorCategory};
use serde_json::json;

fn dna(id: &str, seq: &str) -> SeqRecord {
    SeqRecord::new(id, seq).with_annotation(MOLECULE_TYPE, "DNA")
}

fn write_all(config: WriterConfig, records: &[SeqRecord]) -> Result<String, SeqXmlError> {
    let mut writer = SeqXmlWriter::new(Vec::new(), config);
    writer.write_file(records)?;
    Ok(String::from_utf8(writer.into_inner()).unwrap())
}

fn write_err(record: SeqRecord) -> SeqXmlError {
    write_all(WriterConfig::default(), &[record]).unwrap_err()
}

#[test]
fn test_header_attributes() {
    let config = WriterConfig::default()
        .with_source("Ensembl")
        .with_source_version("89")
        .with_species("Homo sapiens")
        .with_ncbi_tax_id(9606);
    let xml = write_all(config, &[]).unwrap();

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    assert!(xml.contains(
        r#"<seqXML xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="http://www.seqxml.org/0.4/seqxml.xsd" seqXMLversion="0.4" source="Ensembl" sourceVersion="89" speciesName="Homo sapiens" ncbiTaxID="9606">"#
    ));
    assert!(xml.trim_end().ends_with("</seqXML>"));
}

#[test]
fn test_header_rejects_non_integer_taxid() {
    let mut writer = SeqXmlWriter::new(
        Vec::new(),
        WriterConfig::default().with_ncbi_tax_id(json!(96.06)),
    );
    let err = writer.write_header().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Type);
    assert_eq!(writer.phase(), WriterPhase::Created);
}

#[test]
fn test_header_rejects_malformed_taxid_text() {
    let mut writer = SeqXmlWriter::new(
        Vec::new(),
        WriterConfig::default().with_ncbi_tax_id("abc"),
    );
    assert!(matches!(
        writer.write_header(),
        Err(SeqXmlError::InvalidTaxId(ref v)) if v == "abc"
    ));
    assert_eq!(writer.phase(), WriterPhase::Created);
    assert!(writer.into_inner().is_empty());
}

#[test]
fn test_large_taxid_text_is_written() {
    let config = WriterConfig::default().with_ncbi_tax_id("99999999999999999999");
    let xml = write_all(config, &[]).unwrap();
    assert!(xml.contains(r#"ncbiTaxID="99999999999999999999""#));
    assert!(parse_str(&xml).is_ok());
}

#[test]
fn test_phase_order_enforced() {
    let mut writer = SeqXmlWriter::new(Vec::new(), WriterConfig::default());
    assert!(matches!(
        writer.write_record(&dna("a", "AC")),
        Err(SeqXmlError::InvalidState(_))
    ));
    assert!(matches!(
        writer.write_footer(),
        Err(SeqXmlError::InvalidState(_))
    ));

    writer.write_header().unwrap();
    assert!(matches!(
        writer.write_header(),
        Err(SeqXmlError::InvalidState(_))
    ));
    writer.write_footer().unwrap();
    assert_eq!(writer.phase(), WriterPhase::Finished);
    assert!(matches!(
        writer.write_record(&dna("a", "AC")),
        Err(SeqXmlError::InvalidState(_))
    ));
}

#[test]
fn test_unknown_id_rejected_before_entry() {
    let mut writer = SeqXmlWriter::new(Vec::new(), WriterConfig::default());
    writer.write_header().unwrap();
    let err = writer.write_record(&dna(UNKNOWN_ID, "ACGT")).unwrap_err();
    assert!(matches!(err, SeqXmlError::MissingIdentifier));
    assert_eq!(err.category(), ErrorCategory::Content);
    assert_eq!(writer.records_written(), 0);

    let xml = String::from_utf8(writer.into_inner()).unwrap();
    assert!(!xml.contains("<entry"));
}

#[test]
fn test_entry_layout() {
    let record = dna("seq1", "ACGT")
        .with_description("a & b < c")
        .with_dbxref("EMBL:X1")
        .with_annotation(ORGANISM, "Mus musculus")
        .with_annotation(NCBI_TAXID, "10090")
        .with_annotation("gene", "Abc1");
    let xml = write_all(WriterConfig::default(), &[record]).unwrap();

    let entry = &xml[xml.find("<entry").unwrap()..];
    assert_eq!(
        entry.trim_end(),
        concat!(
            r#"<entry id="seq1">"#,
            r#"<species name="Mus musculus" ncbiTaxID="10090"/>"#,
            "<description>a &amp; b &lt; c</description>",
            "<DNAseq>ACGT</DNAseq>",
            r#"<DBRef source="EMBL" id="X1"/>"#,
            r#"<property name="molecule_type" value="DNA"/>"#,
            r#"<property name="gene" value="Abc1"/>"#,
            "</entry></seqXML>"
        )
    );
}

#[test]
fn test_document_defaults_not_repeated() {
    let config = WriterConfig::default()
        .with_source("Ensembl")
        .with_species("Homo sapiens")
        .with_ncbi_tax_id(9606);
    let same = dna("a", "AC")
        .with_annotation(SOURCE, "Ensembl")
        .with_annotation(ORGANISM, "Homo sapiens")
        .with_annotation(NCBI_TAXID, json!(["9606"]));
    let other = dna("b", "AC")
        .with_annotation(SOURCE, "RefSeq")
        .with_annotation(ORGANISM, "Homo sapiens")
        .with_annotation(NCBI_TAXID, 9605);
    let xml = write_all(config, &[same, other]).unwrap();

    assert!(xml.contains(r#"<entry id="a"><DNAseq>"#));
    assert!(xml.contains(r#"<entry id="b" source="RefSeq"><species name="Homo sapiens" ncbiTaxID="9605"/>"#));
}

#[test]
fn test_species_needs_organism_and_taxid() {
    let only_organism = dna("a", "AC").with_annotation(ORGANISM, "Homo sapiens");
    let empty_taxids = dna("b", "AC")
        .with_annotation(ORGANISM, "Homo sapiens")
        .with_annotation(NCBI_TAXID, json!([]));
    let xml = write_all(WriterConfig::default(), &[only_organism, empty_taxids]).unwrap();
    assert!(!xml.contains("<species"));
}

#[test]
fn test_multiple_taxids_rejected() {
    let record = dna("a", "AC")
        .with_annotation(ORGANISM, "Homo sapiens")
        .with_annotation(NCBI_TAXID, json!(["9606", "9605"]));
    assert!(matches!(write_err(record), SeqXmlError::MultipleTaxIds(_)));
}

#[test]
fn test_species_rejects_malformed_taxid_text() {
    let record = dna("a", "AC")
        .with_annotation(ORGANISM, "Homo sapiens")
        .with_annotation(NCBI_TAXID, "x1");
    assert!(matches!(
        write_err(record),
        SeqXmlError::InvalidTaxId(ref v) if v == "x1"
    ));
}

#[test]
fn test_type_mismatches() {
    let organism = dna("a", "AC")
        .with_annotation(ORGANISM, 42)
        .with_annotation(NCBI_TAXID, 9606);
    assert!(matches!(
        write_err(organism),
        SeqXmlError::TypeMismatch { ref field, .. } if field == ORGANISM
    ));

    let source = dna("a", "AC").with_annotation(SOURCE, json!(["x"]));
    assert_eq!(write_err(source).category(), ErrorCategory::Type);

    let nested = dna("a", "AC").with_annotation("gene", json!({"name": "x"}));
    assert_eq!(write_err(nested).category(), ErrorCategory::Type);

    let molecule = SeqRecord::new("a", "AC").with_annotation(MOLECULE_TYPE, 3);
    assert_eq!(write_err(molecule).category(), ErrorCategory::Type);
}

#[test]
fn test_description_placeholders_omitted() {
    let empty = dna("a", "AC").with_description("");
    let unknown = dna("b", "AC").with_description(UNKNOWN_DESCRIPTION);
    let xml = write_all(WriterConfig::default(), &[empty, unknown]).unwrap();
    assert!(!xml.contains("<description"));
}

#[test]
fn test_sequence_requirements() {
    assert!(matches!(
        write_err(dna("a", "")),
        SeqXmlError::EmptySequence(ref id) if id == "a"
    ));
    assert!(matches!(
        write_err(SeqRecord::new("a", "AC")),
        SeqXmlError::InvalidMoleculeType(_)
    ));
    assert!(matches!(
        write_err(SeqRecord::new("a", "AC").with_annotation(MOLECULE_TYPE, "lipid")),
        SeqXmlError::InvalidMoleculeType(_)
    ));
    assert!(matches!(
        write_err(SeqRecord::new("a", vec![0xff, 0xfe]).with_annotation(MOLECULE_TYPE, "DNA")),
        SeqXmlError::Utf8Error(_)
    ));
}

#[test]
fn test_sequence_element_follows_molecule_type() {
    let records = [
        SeqRecord::new("d", "AC").with_annotation(MOLECULE_TYPE, "genomic DNA"),
        SeqRecord::new("r", "AC").with_annotation(MOLECULE_TYPE, "mRNA"),
        SeqRecord::new("p", "MK").with_annotation(MOLECULE_TYPE, "protein"),
    ];
    let xml = write_all(WriterConfig::default(), &records).unwrap();
    assert!(xml.contains("<DNAseq>AC</DNAseq>"));
    assert!(xml.contains("<RNAseq>AC</RNAseq>"));
    assert!(xml.contains("<AAseq>MK</AAseq>"));
}

#[test]
fn test_invalid_dbxref() {
    assert!(matches!(
        write_err(dna("a", "AC").with_dbxref("nocolon")),
        SeqXmlError::InvalidDbxref(_)
    ));
    assert!(matches!(
        write_err(dna("a", "AC").with_dbxref(":123")),
        SeqXmlError::InvalidDbxref(_)
    ));
}

#[test]
fn test_property_values() {
    let record = dna("a", "AC")
        .with_annotation("flag", json!(null))
        .with_annotation("score", 1.5)
        .with_annotation("reviewed", true)
        .with_annotation("obsolete", false)
        .with_annotation("tags", json!(["x", null, 7]));
    let xml = write_all(WriterConfig::default(), &[record]).unwrap();
    assert!(xml.contains(r#"<property name="flag"/>"#));
    assert!(xml.contains(r#"<property name="score" value="1.5"/>"#));
    assert!(xml.contains(r#"<property name="reviewed" value="True"/>"#));
    assert!(xml.contains(r#"<property name="obsolete" value="False"/>"#));
    assert!(xml.contains(concat!(
        r#"<property name="tags" value="x"/>"#,
        r#"<property name="tags"/>"#,
        r#"<property name="tags" value="7"/>"#
    )));
}

#[test]
fn test_written_document_parses_back() {
    let config = WriterConfig::default()
        .with_source("Ensembl")
        .with_species("Homo sapiens")
        .with_ncbi_tax_id("9606")
        .with_indent(2);
    let records = vec![
        dna("a", "ACGT")
            .with_description("first")
            .with_dbxref("db:123")
            .with_annotation("gene", json!(["g1", "g2"])),
        SeqRecord::new("b", "MKV&")
            .with_annotation(MOLECULE_TYPE, "protein")
            .with_annotation(ORGANISM, "Mus musculus")
            .with_annotation(NCBI_TAXID, "10090"),
    ];
    let xml = write_all(config, &records).unwrap();

    let (document, parsed) = parse_str(&xml).unwrap();
    assert_eq!(document.version, SeqXmlVersion::V0_4);
    assert_eq!(document.source.as_deref(), Some("Ensembl"));
    assert_eq!(document.ncbi_taxid.as_deref(), Some("9606"));
    assert_eq!(parsed.len(), 2);

    assert_eq!(parsed[0].seq, b"ACGT");
    assert_eq!(parsed[0].description.as_deref(), Some("first"));
    assert_eq!(parsed[0].dbxrefs, vec!["db:123".to_string()]);
    assert_eq!(parsed[0].organism(), Some("Homo sapiens"));
    assert_eq!(parsed[0].annotations["gene"], json!(["g1", "g2"]));

    assert_eq!(parsed[1].seq, b"MKV&");
    assert_eq!(parsed[1].molecule_type(), Some("protein"));
    assert_eq!(parsed[1].organism(), Some("Mus musculus"));
    assert_eq!(parsed[1].ncbi_taxid(), Some("10090"));
}

#[test]
fn test_config_from_document() {
    let xml = write_all(
        WriterConfig::default().with_source("UniProt").with_ncbi_tax_id(9606),
        &[],
    )
    .unwrap();
    let (document, _) = parse_str(&xml).unwrap();
    let config = WriterConfig::from_document(&document);
    assert_eq!(config.source.as_deref(), Some("UniProt"));
    assert_eq!(config.ncbi_tax_id, Some(json!("9606")));
    assert_eq!(config.species, None);
}
