use cobol_anonymize_core::Role;

/// The role assigned to an identifier occurrence. Wraps [`Role`] with the
/// one case the role catalog has no slot for: a reference that could not
/// be tied to any seen definition.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum IdentifierRole {
    Known(Role),
    Unknown,
}

impl IdentifierRole {
    pub fn role(self) -> Option<Role> {
        match self {
            IdentifierRole::Known(r) => Some(r),
            IdentifierRole::Unknown => None,
        }
    }
}

/// One classified occurrence of an identifier: either its defining
/// occurrence (`PROGRAM-ID`, a data-item level line, a section/paragraph
/// header, `INDEXED BY`...) or a later reference to it.
#[derive(Clone, Debug)]
pub struct ClassifiedIdentifier {
    pub name: String,
    pub role: IdentifierRole,
    pub line_number: usize,
    pub is_definition: bool,
    pub is_external: bool,
    pub level_number: Option<u32>,
    pub parent_name: Option<String>,
}

impl ClassifiedIdentifier {
    pub fn definition(
        name: impl Into<String>,
        role: Role,
        line_number: usize,
        level_number: Option<u32>,
        parent_name: Option<String>,
        is_external: bool,
    ) -> Self {
        Self {
            name: name.into(),
            role: IdentifierRole::Known(role),
            line_number,
            is_definition: true,
            is_external,
            level_number,
            parent_name,
        }
    }

    pub fn reference(name: impl Into<String>, role: IdentifierRole, line_number: usize) -> Self {
        Self {
            name: name.into(),
            role,
            line_number,
            is_definition: false,
            is_external: false,
            level_number: None,
            parent_name: None,
        }
    }
}
