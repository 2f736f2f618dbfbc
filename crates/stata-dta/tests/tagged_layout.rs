//! Integration tests for the tagged (117/118) file layout.

use chrono::NaiveDate;
use stata_dta::{
    ByteOrder, DtaDataset, DtaValue, DtaVariable, DtaWriter, DtaWriterOptions, LabelSet, Phase,
};

const MAP_TAGS: [&[u8]; 13] = [
    b"<stata_dta>",
    b"<map>",
    b"<variable_types>",
    b"<varnames>",
    b"<sortlist>",
    b"<formats>",
    b"<value_label_names>",
    b"<variable_labels>",
    b"<characteristics>",
    b"<data>",
    b"<strls>",
    b"<value_labels>",
    b"</stata_dta>",
];

fn options(version: u16, order: ByteOrder) -> DtaWriterOptions {
    let dt = NaiveDate::from_ymd_opt(2023, 11, 30)
        .unwrap()
        .and_hms_opt(8, 45, 0)
        .unwrap();
    DtaWriterOptions::new()
        .with_version(version)
        .with_byte_order(order)
        .with_timestamp(dt)
}

fn dataset() -> DtaDataset {
    let mut dataset = DtaDataset::with_variables(vec![
        DtaVariable::int32("id"),
        DtaVariable::byte("smoker").with_label_set("yesno"),
        DtaVariable::float("bmi").with_label("Body mass index"),
        DtaVariable::string("note", 0),
    ])
    .with_label("Cohort")
    .with_label_set(LabelSet::new("yesno").with_label(0, "no").with_label(1, "yes"))
    .with_label_set(LabelSet::new("unused"));

    dataset.add_row(vec![
        DtaValue::Int32(1),
        DtaValue::Byte(0),
        DtaValue::Float(22.5),
        DtaValue::string("first"),
    ]);
    dataset.add_row(vec![
        DtaValue::Int32(2),
        DtaValue::tagged_missing('r'),
        DtaValue::missing(),
        DtaValue::String(None),
    ]);
    dataset.add_row(vec![
        DtaValue::Int32(3),
        DtaValue::Byte(1),
        DtaValue::Float(f32::NAN),
        DtaValue::string(""),
    ]);
    dataset
}

fn find(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
        .unwrap()
}

fn read_map(out: &[u8], order: ByteOrder) -> Vec<u64> {
    let start = find(out, b"<map>") + 5;
    (0..14)
        .map(|i| order.read_u64(&out[start + i * 8..start + i * 8 + 8]))
        .collect()
}

#[test]
fn test_map_offsets_point_at_sections() {
    for version in [117u16, 118] {
        for order in [ByteOrder::Lsf, ByteOrder::Msf] {
            let out = DtaWriter::with_options(Vec::new(), options(version, order))
                .unwrap()
                .write_dataset(&dataset())
                .unwrap();

            let offsets = read_map(&out, order);
            for (offset, tag) in offsets.iter().zip(MAP_TAGS) {
                let start = *offset as usize;
                assert_eq!(
                    &out[start..start + tag.len()],
                    tag,
                    "version {version} {order}"
                );
            }
            assert_eq!(offsets[13], out.len() as u64);
            assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_tagged_header_fields() {
    let out = DtaWriter::with_options(Vec::new(), options(117, ByteOrder::Lsf))
        .unwrap()
        .write_dataset(&dataset())
        .unwrap();

    assert!(out.starts_with(b"<stata_dta><header><release>117</release><byteorder>LSF</byteorder>"));
    let k = find(&out, b"<K>") + 3;
    assert_eq!(&out[k..k + 2], &4u16.to_le_bytes());
    let n = find(&out, b"<N>") + 3;
    assert_eq!(&out[n..n + 4], &3u32.to_le_bytes());
    assert_eq!(&out[n + 4..n + 8], b"</N>");

    let label = find(&out, b"<label>") + 7;
    assert_eq!(&out[label..label + 7], b"\x06Cohort");
    let stamp = find(&out, b"<timestamp>") + 11;
    assert_eq!(&out[stamp..stamp + 18], b"\x1130 Nov 2023 08:45");
    assert!(out.ends_with(b"</value_labels></stata_dta>"));
}

#[test]
fn test_tagged_descriptors() {
    let out = DtaWriter::with_options(Vec::new(), options(118, ByteOrder::Msf))
        .unwrap()
        .write_dataset(&dataset())
        .unwrap();

    let types = find(&out, b"<variable_types>") + 16;
    let expected: Vec<u8> = [0xFFF8u16, 0xFFFA, 0xFFF7, 2045]
        .iter()
        .flat_map(|code| code.to_be_bytes())
        .collect();
    assert_eq!(&out[types..types + 8], expected.as_slice());
    assert_eq!(&out[types + 8..types + 25], b"</variable_types>");

    let names = find(&out, b"<varnames>") + 10;
    assert_eq!(&out[names..names + 3], b"id\0");
    assert_eq!(&out[names + 129..names + 136], b"smoker\0");
    assert_eq!(&out[names + 4 * 129..names + 4 * 129 + 11], b"</varnames>");

    let formats = find(&out, b"<formats>") + 9;
    assert_eq!(&out[formats..formats + 7], b"%12.0g\0");
    assert_eq!(&out[formats + 57..formats + 63], b"%8.0g\0");
    assert_eq!(&out[formats + 114..formats + 120], b"%9.0g\0");

    let lbl = find(&out, b"<value_label_names>") + 19;
    assert_eq!(&out[lbl..lbl + 129], &[0u8; 129]);
    assert_eq!(&out[lbl + 129..lbl + 135], b"yesno\0");
}

#[test]
fn test_tagged_data_section() {
    let out = DtaWriter::with_options(Vec::new(), options(118, ByteOrder::Lsf))
        .unwrap()
        .write_dataset(&dataset())
        .unwrap();

    let row_width = 4 + 1 + 4 + 2045;
    let data = find(&out, b"<data>") + 6;
    assert_eq!(&out[data + 3 * row_width..data + 3 * row_width + 7], b"</data>");
    assert_eq!(
        &out[data + 3 * row_width + 7..data + 3 * row_width + 22],
        b"<strls></strls>"
    );

    let row = &out[data..data + row_width];
    assert_eq!(&row[..4], &1i32.to_le_bytes());
    assert_eq!(row[4], 0);
    assert_eq!(&row[5..9], &22.5f32.to_le_bytes());
    assert_eq!(&row[9..15], b"first\0");

    let row = &out[data + row_width..data + 2 * row_width];
    // .r on a byte is 101 + 1 + 17
    assert_eq!(row[4], 119);
    assert_eq!(&row[5..9], &0x7F00_0000u32.to_le_bytes());
    assert!(row[9..].iter().all(|&b| b == 0));

    let row = &out[data + 2 * row_width..data + 3 * row_width];
    assert_eq!(&row[5..9], &0x7F00_0000u32.to_le_bytes());
    assert!(row[9..].iter().all(|&b| b == 0));
}

#[test]
fn test_tagged_value_labels() {
    let out = DtaWriter::with_options(Vec::new(), options(117, ByteOrder::Lsf))
        .unwrap()
        .write_dataset(&dataset())
        .unwrap();

    let start = find(&out, b"<value_labels>") + 14;
    assert_eq!(&out[start..start + 5], b"<lbl>");
    let table = start + 5;
    let len = i32::from_le_bytes(out[table..table + 4].try_into().unwrap());
    assert_eq!(len, 8 + 8 * 2 + 7);
    assert_eq!(&out[table + 4..table + 10], b"yesno\0");

    // second (empty) set
    let second = table + 4 + 36 + len as usize + 6;
    assert_eq!(&out[second..second + 5], b"<lbl>");
    let len = i32::from_le_bytes(out[second + 5..second + 9].try_into().unwrap());
    assert_eq!(len, 8);
}

#[test]
fn test_short_write_keeps_map_declared() {
    let ds = DtaDataset::with_variables(vec![DtaVariable::double("x")]);
    let mut writer = DtaWriter::with_options(Vec::new(), options(118, ByteOrder::Lsf)).unwrap();
    writer.begin_data(&ds, 3).unwrap();
    let declared = writer.section_map().unwrap();
    writer.write_row(&[DtaValue::Double(1.0)]).unwrap();
    writer.end_data().unwrap();
    assert_eq!(writer.phase(), Phase::Finalized);

    let out = writer.into_inner().unwrap();
    // two rows short of what the map promised
    assert_eq!(declared.file_len(), out.len() as u64 + 16);
}
