//! The class/type graph rebuilt from the objects table.
//!
//! Descriptors reference each other by index. The graph keeps that shape:
//! types and classes live in two arenas and every reference is a
//! [`TypeId`] or [`ClassId`] into them. Resolution happens once, after all
//! slots exist, so forward references to later classes are fine.

use firetools_common::StringTable;
use rustc_hash::FxHashMap;

use crate::objects::{ClassDescriptor, ClassMemberDescriptor, TypeDescriptor};
use crate::{Error, ReferenceKind, Result};

/// Placeholder name for base classes defined outside the archive.
pub const EXTERNAL_CLASS_NAME: &str = "ExternalClass";

/// Index into [`TypeGraph::types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeId(pub usize);

/// Index into [`TypeGraph::classes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClassId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BaseClass {
    None,
    Local(ClassId),
    /// Declared by another archive; only known to exist.
    External,
}

/// What a member's type resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldType {
    Type(TypeId),
    Class(ClassId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Type {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClassMember {
    pub name: String,
    pub field_type: FieldType,
    pub offset: u32,
    pub size: u32,
    pub flags: u32,
    /// Zero unless the member is a fixed-size array.
    pub fixed_array_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Class {
    pub name: String,
    pub base: BaseClass,
    pub members: Vec<ClassMember>,
    pub size: u32,
    pub alignment: u32,
    pub flags: u32,
    pub offset_from_parent: u32,
    pub offset_to_base: u32,
    pub offset_to_base_in_allocated_block: u32,
    pub default_buffer_offset: u32,
}

/// Arena of types and classes with index-based references.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeGraph {
    types: Vec<Type>,
    classes: Vec<Class>,
    #[cfg_attr(feature = "serde", serde(skip))]
    class_index: FxHashMap<String, ClassId>,
}

impl TypeGraph {
    /// Resolve descriptors into a graph.
    ///
    /// Members are handed out to classes in declaration order; each class
    /// takes the next `member_count` descriptors. The returned graph has no
    /// inheritance cycles.
    pub fn build(
        types: &[TypeDescriptor],
        classes: &[ClassDescriptor],
        members: &[ClassMemberDescriptor],
        strings: &StringTable,
    ) -> Result<Self> {
        let types = types
            .iter()
            .map(|t| -> Result<Type> {
                Ok(Type {
                    name: strings.get(t.name_offset.get())?.into_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Every class slot exists (with its name) before any reference is resolved.
        let names = classes
            .iter()
            .map(|c| -> Result<String> { Ok(strings.get(c.name_offset.get())?.into_owned()) })
            .collect::<Result<Vec<_>>>()?;

        let type_count = types.len();
        let class_count = classes.len();
        let mut cursor = 0usize;
        let mut resolved = Vec::with_capacity(class_count);

        for (descriptor, name) in classes.iter().zip(names) {
            let base = match descriptor.base_class_id.get() {
                0 => BaseClass::None,
                id if id < 0 => BaseClass::External,
                id => {
                    let index = id as usize - 1;
                    if index >= class_count {
                        return Err(Error::UnresolvedReference {
                            kind: ReferenceKind::BaseClass,
                            index: id as i64,
                            class: name,
                        });
                    }
                    BaseClass::Local(ClassId(index))
                }
            };

            let member_count = descriptor.member_count.get() as usize;
            let Some(run) = members.get(cursor..cursor + member_count) else {
                return Err(Error::UnresolvedReference {
                    kind: ReferenceKind::Member,
                    index: (cursor + member_count) as i64,
                    class: name,
                });
            };
            cursor += member_count;

            let mut class_members = Vec::with_capacity(member_count);
            for member in run {
                let type_id = member.type_id.get() as usize;
                let field_type = if type_id < type_count {
                    FieldType::Type(TypeId(type_id))
                } else {
                    // Class references start one past the type count.
                    match (type_id - type_count).checked_sub(1) {
                        Some(index) if index < class_count => FieldType::Class(ClassId(index)),
                        _ => {
                            return Err(Error::UnresolvedReference {
                                kind: ReferenceKind::MemberType,
                                index: type_id as i64,
                                class: name,
                            })
                        }
                    }
                };

                class_members.push(ClassMember {
                    name: strings.get(member.name_offset.get())?.into_owned(),
                    field_type,
                    offset: member.value_offset.get(),
                    size: member.size.get(),
                    flags: member.flags.get(),
                    fixed_array_size: member.fixed_array_size.get(),
                });
            }

            resolved.push(Class {
                name,
                base,
                members: class_members,
                size: descriptor.size(),
                alignment: descriptor.alignment(),
                flags: descriptor.flags.get(),
                offset_from_parent: descriptor.offset_from_parent.get(),
                offset_to_base: descriptor.offset_to_base.get(),
                offset_to_base_in_allocated_block: descriptor.offset_to_base_in_allocated_block.get(),
                default_buffer_offset: descriptor.default_buffer_offset.get(),
            });
        }

        let mut class_index = FxHashMap::default();
        for (i, class) in resolved.iter().enumerate() {
            class_index.entry(class.name.clone()).or_insert(ClassId(i));
        }

        let graph = Self {
            types,
            classes: resolved,
            class_index,
        };
        graph.check_acyclic()?;
        Ok(graph)
    }

    #[inline]
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    #[inline]
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    #[inline]
    pub fn get_type(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0)
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id.0)
    }

    /// Find a class by exact name. With duplicates, the first wins.
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.class_index.get(name).copied()
    }

    /// Name of a member's type or class.
    pub fn field_type_name(&self, field_type: FieldType) -> Option<&str> {
        match field_type {
            FieldType::Type(id) => self.get_type(id).map(|t| t.name.as_str()),
            FieldType::Class(id) => self.class(id).map(|c| c.name.as_str()),
        }
    }

    /// Walk the local base chain of `id`, nearest base first.
    ///
    /// Well-formed tables only reference earlier classes, so indices decrease
    /// along the chain. Forward references are tolerated as long as they do
    /// not form a cycle.
    pub fn ancestors(&self, id: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        std::iter::successors(self.local_base(id), move |&current| self.local_base(current))
    }

    /// Sum of the sizes of the class's own members (inherited ones excluded).
    pub fn local_members_size(&self, id: ClassId) -> u64 {
        self.class(id)
            .map(|c| c.members.iter().map(|m| m.size as u64).sum())
            .unwrap_or(0)
    }

    fn local_base(&self, id: ClassId) -> Option<ClassId> {
        match self.class(id)?.base {
            BaseClass::Local(base) => Some(base),
            BaseClass::None | BaseClass::External => None,
        }
    }

    /// A chain longer than the class count must revisit a class.
    fn check_acyclic(&self) -> Result<()> {
        let limit = self.classes.len();
        for (i, class) in self.classes.iter().enumerate() {
            let mut steps = 0;
            let mut current = self.local_base(ClassId(i));
            while let Some(next) = current {
                steps += 1;
                if steps > limit {
                    return Err(Error::InheritanceCycle {
                        class: class.name.clone(),
                    });
                }
                current = self.local_base(next);
            }
        }
        Ok(())
    }
}
