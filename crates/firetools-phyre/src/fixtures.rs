//! Builders for synthetic archives.

use byteorder::{LittleEndian, WriteBytesExt};

/// A 72-byte base header.
pub fn base_header(size: u32, platform: [u8; 4], instance_list_count: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"RYHP");
    out.write_u32::<LittleEndian>(size).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.extend_from_slice(&platform);
    out.write_u32::<LittleEndian>(instance_list_count).unwrap();
    for _ in 0..13 {
        out.write_u32::<LittleEndian>(0).unwrap();
    }
    out
}

/// Objects table builder. Members get 4-byte sizes at consecutive offsets.
#[derive(Default)]
pub struct TableBuilder {
    strings: Vec<u8>,
    types: Vec<u32>,
    classes: Vec<[u32; 9]>,
    members: Vec<[u32; 6]>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, name: &str) -> u32 {
        let offset = self.strings.len() as u32;
        self.strings.extend_from_slice(name.as_bytes());
        self.strings.push(0);
        offset
    }

    pub fn ty(mut self, name: &str) -> Self {
        let offset = self.intern(name);
        self.types.push(offset);
        self
    }

    /// Add a class; `members` are `(name, type_id)` pairs.
    pub fn class(mut self, name: &str, base_class_id: i32, members: &[(&str, u32)]) -> Self {
        let name_offset = self.intern(name);
        for (i, (member, type_id)) in members.iter().enumerate() {
            let member_offset = self.intern(member);
            self.members.push([member_offset, *type_id, i as u32 * 4, 4, 0, 0]);
        }
        self.classes.push([
            base_class_id as u32,
            (2 << 28) | (members.len() as u32 * 4),
            name_offset,
            members.len() as u32,
            0,
            0,
            0,
            0,
            0,
        ]);
        self
    }

    /// Add a member descriptor that no class claims.
    pub fn stray_member(mut self, name: &str, type_id: u32) -> Self {
        let member_offset = self.intern(name);
        self.members.push([member_offset, type_id, 0, 4, 0, 0]);
        self
    }

    /// Override the member count of the last class.
    pub fn with_member_count(mut self, count: u32) -> Self {
        if let Some(class) = self.classes.last_mut() {
            class[3] = count;
        }
        self
    }

    pub fn computed_size(&self) -> usize {
        32 + 4 * self.types.len() + 36 * self.classes.len() + 24 * self.members.len() + self.strings.len()
    }

    /// Encode with `size = computed + padding`; positive padding is appended as zeros.
    pub fn encode(&self, padding: i64) -> Vec<u8> {
        let size = self.computed_size() as i64 + padding;

        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(0x0001_0000).unwrap();
        out.write_u32::<LittleEndian>(size as u32).unwrap();
        out.write_u32::<LittleEndian>(self.types.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(self.classes.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(self.members.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(self.strings.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();

        for ty in &self.types {
            out.write_u32::<LittleEndian>(*ty).unwrap();
        }
        for class in &self.classes {
            for field in class {
                out.write_u32::<LittleEndian>(*field).unwrap();
            }
        }
        for member in &self.members {
            for field in member {
                out.write_u32::<LittleEndian>(*field).unwrap();
            }
        }
        out.extend_from_slice(&self.strings);
        if padding > 0 {
            out.extend(std::iter::repeat(0u8).take(padding as usize));
        }
        out
    }
}

/// A DX11 archive: header, objects table, then `(class_id, count)` instance lists.
pub fn archive(table: &TableBuilder, instance_lists: &[(u32, u32)]) -> Vec<u8> {
    let mut out = base_header(84, *b"11XD", instance_lists.len() as u32);
    for _ in 0..3 {
        out.write_u32::<LittleEndian>(0).unwrap();
    }
    out.extend_from_slice(&table.encode(0));
    for (class_id, count) in instance_lists {
        out.write_u32::<LittleEndian>(*class_id).unwrap();
        out.write_u32::<LittleEndian>(*count).unwrap();
        out.write_u32::<LittleEndian>(count * 16).unwrap();
        out.write_u32::<LittleEndian>(count * 16).unwrap();
        for _ in 0..5 {
            out.write_u32::<LittleEndian>(0).unwrap();
        }
    }
    out
}
