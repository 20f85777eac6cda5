//! Builders for synthetic containers.

use byteorder::{LittleEndian, WriteBytesExt};

pub struct FixtureFile<'a> {
    pub name: &'a str,
    pub class_name: &'a str,
    pub payload: Vec<u8>,
}

impl<'a> FixtureFile<'a> {
    pub fn new(name: &'a str, class_name: &'a str, payload: Vec<u8>) -> Self {
        Self {
            name,
            class_name,
            payload,
        }
    }
}

pub struct Fixture {
    pub bytes: Vec<u8>,
    pub aux_table_offset: u32,
    pub page_offsets: Vec<u32>,
    /// Page-relative file header offsets.
    pub file_offsets: Vec<Vec<u32>>,
}

const HEADER_SIZE: u32 = 44;
const AUX_PADDING: u32 = 4;

pub fn build(pages: &[Vec<FixtureFile<'_>>], aux_count: u32, side_data: &[u8]) -> Fixture {
    let page_table_offset = HEADER_SIZE;
    let aux_table_offset = page_table_offset + 12 * pages.len() as u32;
    let records_offset = aux_table_offset + 12 + AUX_PADDING;
    let mut cursor = records_offset + 8 * aux_count;

    let mut page_blobs = Vec::new();
    let mut page_offsets = Vec::new();
    let mut file_offsets = Vec::new();

    for files in pages {
        let mut local = 20 + 16 * files.len() as u32;
        let mut offsets = Vec::new();
        for file in files {
            offsets.push(local);
            local += 32 + file.payload.len() as u32;
        }

        let mut strings = Vec::new();
        let mut name_offsets = Vec::new();
        for file in files {
            let name = local + strings.len() as u32;
            strings.extend_from_slice(file.name.as_bytes());
            strings.push(0);
            let class_name = local + strings.len() as u32;
            strings.extend_from_slice(file.class_name.as_bytes());
            strings.push(0);
            name_offsets.push((name, class_name));
        }
        let page_size = local + strings.len() as u32;

        let mut blob = Vec::new();
        blob.write_u32::<LittleEndian>(0xDEAD_BEEF).unwrap();
        blob.write_u32::<LittleEndian>(0xDEAD_BEEF).unwrap();
        blob.write_u32::<LittleEndian>(0).unwrap();
        blob.write_u32::<LittleEndian>(page_size).unwrap();
        blob.write_u16::<LittleEndian>(0).unwrap();
        blob.write_u16::<LittleEndian>(files.len() as u16).unwrap();

        for (i, _) in files.iter().enumerate() {
            blob.write_u32::<LittleEndian>(name_offsets[i].0).unwrap();
            blob.write_u32::<LittleEndian>(0).unwrap();
            blob.write_u32::<LittleEndian>(offsets[i]).unwrap();
            blob.write_u32::<LittleEndian>(0).unwrap();
        }

        for (i, file) in files.iter().enumerate() {
            blob.write_u32::<LittleEndian>(name_offsets[i].0).unwrap();
            blob.write_u32::<LittleEndian>(0).unwrap();
            blob.write_u32::<LittleEndian>(name_offsets[i].1).unwrap();
            blob.write_u32::<LittleEndian>(0).unwrap();
            blob.write_u32::<LittleEndian>(file.payload.len() as u32).unwrap();
            for _ in 0..3 {
                blob.write_u32::<LittleEndian>(0x12345).unwrap();
            }
            blob.extend_from_slice(&file.payload);
        }
        blob.extend_from_slice(&strings);
        assert_eq!(blob.len() as u32, page_size);

        page_offsets.push(cursor);
        file_offsets.push(offsets);
        cursor += page_size;
        page_blobs.push(blob);
    }

    let mut out = Vec::new();
    out.write_u16::<LittleEndian>(0x4B50).unwrap();
    out.write_u16::<LittleEndian>(1).unwrap();
    out.write_u32::<LittleEndian>(records_offset + 8 * aux_count).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(pages.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(page_table_offset).unwrap();
    out.write_u32::<LittleEndian>(8).unwrap();
    out.write_u32::<LittleEndian>(aux_table_offset).unwrap();
    out.write_u32::<LittleEndian>(side_data.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();

    for (i, blob) in page_blobs.iter().enumerate() {
        out.write_u32::<LittleEndian>(page_offsets[i]).unwrap();
        out.write_u32::<LittleEndian>(blob.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(i as u32).unwrap();
    }

    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(records_offset).unwrap();
    out.write_u32::<LittleEndian>(aux_count).unwrap();
    out.extend(std::iter::repeat(0u8).take(AUX_PADDING as usize));
    for i in 0..aux_count {
        out.write_u16::<LittleEndian>(i as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(i * 10).unwrap();
    }

    for blob in &page_blobs {
        out.extend_from_slice(blob);
    }
    out.extend_from_slice(side_data);

    Fixture {
        bytes: out,
        aux_table_offset,
        page_offsets,
        file_offsets,
    }
}
