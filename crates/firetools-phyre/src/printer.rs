//! C++-style class declarations for a [`TypeGraph`].
//!
//! Each class is printed once, after its local base chain. Members are
//! listed in declaration order as `<type> <name>;`.
//!
//! # Example
//!
//! ```no_run
//! use firetools_phyre::{ClassDeclarationWriter, PhyreArchive};
//!
//! let archive = PhyreArchive::open("texture.dds.phyre")?;
//! let writer = ClassDeclarationWriter::new(archive.type_graph());
//! print!("{}", writer.write_all());
//! # Ok::<(), firetools_phyre::Error>(())
//! ```

use std::fmt::Write;

use crate::graph::EXTERNAL_CLASS_NAME;
use crate::{BaseClass, ClassId, FieldType, TypeGraph};

const INDENT: &str = "    ";

/// Renders classes of a graph as declarations.
pub struct ClassDeclarationWriter<'a> {
    graph: &'a TypeGraph,
}

impl<'a> ClassDeclarationWriter<'a> {
    pub fn new(graph: &'a TypeGraph) -> Self {
        Self { graph }
    }

    /// Declarations for every class in the graph.
    pub fn write_all(&self) -> String {
        let roots: Vec<ClassId> = (0..self.graph.classes().len()).map(ClassId).collect();
        self.write_classes(&roots)
    }

    /// Declarations for the given classes and their base classes.
    pub fn write_classes(&self, roots: &[ClassId]) -> String {
        let mut out = String::new();
        let mut printed = vec![false; self.graph.classes().len()];

        for &id in roots {
            self.visit(id, &mut printed, &mut out);
        }

        out
    }

    fn visit(&self, id: ClassId, printed: &mut [bool], out: &mut String) {
        let Some(class) = self.graph.class(id) else {
            return;
        };
        if printed[id.0] {
            return;
        }

        // Base classes come first; the graph guarantees the chain ends.
        if let BaseClass::Local(base) = class.base {
            self.visit(base, printed, out);
        }

        let _ = writeln!(out, "/*");
        let _ = writeln!(out, " * class_index : {}", id.0);
        let _ = writeln!(out, " * size        : {} (align {})", class.size, class.alignment);
        let _ = writeln!(out, " */");

        let base_name = match class.base {
            BaseClass::None => None,
            BaseClass::Local(base) => self.graph.class(base).map(|b| b.name.as_str()),
            BaseClass::External => Some(EXTERNAL_CLASS_NAME),
        };
        match base_name {
            Some(base) => {
                let _ = writeln!(out, "class {} : {} {{", class.name, base);
            }
            None => {
                let _ = writeln!(out, "class {} {{", class.name);
            }
        }
        let _ = writeln!(out, "public:");

        for member in &class.members {
            let type_name = self.graph.field_type_name(member.field_type).unwrap_or("?");
            let _ = write!(out, "{INDENT}{} {}", type_name, member.name);
            if member.fixed_array_size != 0 {
                let _ = write!(out, "[{}]", member.fixed_array_size);
            }
            out.push(';');
            if let FieldType::Class(_) = member.field_type {
                out.push_str(" // class");
            }
            out.push('\n');
        }

        let _ = writeln!(out, "}};");
        out.push('\n');

        printed[id.0] = true;
    }
}
