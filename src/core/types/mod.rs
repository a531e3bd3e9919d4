//! Resolved Go types.
//!
//! Types live in a [`TypeTable`] arena and are referred to by [`TypeId`].
//! The table only models what keying needs: struct field names, and enough
//! structure (pointers, slices, arrays, maps) to find the element type of an
//! elided composite literal. Everything else is [`Type::Opaque`].

mod resolver;

use std::collections::HashMap;

pub use resolver::resolve;

use crate::core::ast::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Unresolvable: unknown names, cycles, non-type entities.
    Invalid,
    Basic(&'static str),
    /// A defined type. `definition` is filled in once its type expression
    /// has been resolved, and may itself be another named type.
    Named {
        name: String,
        definition: Option<TypeId>,
    },
    /// Field names in declaration order; embedded fields go by their type
    /// name.
    Struct(Vec<String>),
    Pointer(TypeId),
    Slice(TypeId),
    Array(TypeId),
    Map { key: TypeId, value: TypeId },
    /// Functions, channels, interfaces and type parameters.
    Opaque,
}

#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    const INVALID: TypeId = TypeId(0);
    const OPAQUE: TypeId = TypeId(1);

    pub fn new() -> Self {
        Self {
            types: vec![Type::Invalid, Type::Opaque],
        }
    }

    pub fn invalid(&self) -> TypeId {
        Self::INVALID
    }

    pub fn opaque(&self) -> TypeId {
        Self::OPAQUE
    }

    pub fn add(&mut self, ty: Type) -> TypeId {
        match ty {
            Type::Invalid => Self::INVALID,
            Type::Opaque => Self::OPAQUE,
            ty => {
                let id = TypeId(self.types.len() as u32);
                self.types.push(ty);
                id
            }
        }
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn is_invalid(&self, id: TypeId) -> bool {
        id == Self::INVALID
    }

    /// Set the definition of a named type created by [`TypeTable::add`].
    pub fn define(&mut self, named: TypeId, definition: TypeId) {
        if let Type::Named {
            definition: slot, ..
        } = &mut self.types[named.0 as usize]
        {
            *slot = Some(definition);
        }
    }

    /// Follow named types to the type they are ultimately defined as.
    ///
    /// Undefined names and definition cycles yield the invalid type.
    pub fn underlying(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..=self.types.len() {
            match self.get(current) {
                Type::Named {
                    definition: Some(next),
                    ..
                } => current = *next,
                Type::Named {
                    definition: None, ..
                } => return Self::INVALID,
                _ => return current,
            }
        }
        Self::INVALID
    }

    /// Strip one pointer, if `id` is a pointer type.
    pub fn deref(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            Type::Pointer(elem) => *elem,
            _ => id,
        }
    }

    /// Fields of the struct reached from `id` through at most one pointer
    /// and then named types.
    pub fn struct_fields(&self, id: TypeId) -> Option<&[String]> {
        match self.get(self.underlying(self.deref(id))) {
            Type::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Go-like spelling of a type, for diagnostics.
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            Type::Invalid => "invalid type".to_string(),
            Type::Basic(name) => name.to_string(),
            Type::Named { name, .. } => name.clone(),
            Type::Struct(fields) => format!("struct{{{}}}", fields.join("; ")),
            Type::Pointer(elem) => format!("*{}", self.display(*elem)),
            Type::Slice(elem) => format!("[]{}", self.display(*elem)),
            Type::Array(elem) => format!("[N]{}", self.display(*elem)),
            Type::Map { key, value } => {
                format!("map[{}]{}", self.display(*key), self.display(*value))
            }
            Type::Opaque => "opaque type".to_string(),
        }
    }
}

/// Resolver output: the type of every composite literal of a unit whose
/// type could be determined.
#[derive(Debug, Default)]
pub struct TypeInfo {
    pub table: TypeTable,
    literals: HashMap<NodeId, TypeId>,
}

impl TypeInfo {
    pub fn literal_type(&self, id: NodeId) -> Option<TypeId> {
        self.literals.get(&id).copied()
    }
}
