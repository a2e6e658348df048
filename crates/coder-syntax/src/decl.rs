//! Declarations
//!
//! The host registers every property and method it finds so the target
//! locator can find the value to edit without walking host syntax.

use crate::node::{NodeId, Span};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// `public` (also the default when no modifier is written)
    #[default]
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
}

impl Visibility {
    /// Keyword text
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = UnknownVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "protected" => Ok(Visibility::Protected),
            "private" => Ok(Visibility::Private),
            _ => Err(UnknownVisibility(s.to_string())),
        }
    }
}

/// Visibility keyword was not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visibility: '{0}'")]
pub struct UnknownVisibility(pub String);

/// Where the text of a slot's value lives in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// The value occupies `span`
    Replace(Span),
    /// No value yet; a created value goes at `offset`, preceded by `prefix`
    Insert {
        /// Byte offset in the source
        offset: usize,
        /// Text printed between the offset and the value (e.g. `" = "`)
        prefix: String,
    },
    /// Slot is not backed by source text
    Detached,
}

/// A place holding one value expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSlot {
    /// Current value, if any
    pub value: Option<NodeId>,
    /// Source anchor for printing
    pub anchor: Anchor,
}

impl ValueSlot {
    /// Slot with a value and no source backing
    #[inline]
    #[must_use]
    pub fn detached(value: Option<NodeId>) -> Self {
        Self {
            value,
            anchor: Anchor::Detached,
        }
    }
}

/// Method name and the parts of its signature a matcher may check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Method name
    pub name: String,
    /// Visibility
    pub visibility: Visibility,
    /// Declared `static`
    pub is_static: bool,
    /// Parameter names without `$`
    pub parameters: Vec<String>,
}

impl MethodSignature {
    /// Public, non-static method without parameters
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            parameters: Vec::new(),
        }
    }
}

/// Property declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    /// Enclosing class, if named
    pub class: Option<String>,
    /// Property name without `$`
    pub name: String,
    /// Initializer
    pub slot: ValueSlot,
}

/// Method declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Enclosing class, if named
    pub class: Option<String>,
    /// Signature
    pub signature: MethodSignature,
    /// Return statements of the body, in source order
    pub returns: Vec<ValueSlot>,
}

/// Member declaration registered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// Property
    Property(PropertyDecl),
    /// Method
    Method(MethodDecl),
}

impl Declaration {
    /// Declared name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Declaration::Property(p) => &p.name,
            Declaration::Method(m) => &m.signature.name,
        }
    }

    /// All value slots of the declaration
    pub fn slots(&self) -> impl Iterator<Item = &ValueSlot> {
        let (single, many): (Option<&ValueSlot>, &[ValueSlot]) = match self {
            Declaration::Property(p) => (Some(&p.slot), &[]),
            Declaration::Method(m) => (None, &m.returns),
        };
        single.into_iter().chain(many.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_parse_case_insensitive() {
        assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!("protected".parse::<Visibility>().unwrap(), Visibility::Protected);
        assert!("internal".parse::<Visibility>().is_err());
    }

    #[test]
    fn visibility_display() {
        assert_eq!(Visibility::Private.to_string(), "private");
    }

    #[test]
    fn declaration_slots() {
        let method = Declaration::Method(MethodDecl {
            class: None,
            signature: MethodSignature::new("rules"),
            returns: vec![ValueSlot::detached(None), ValueSlot::detached(None)],
        });
        assert_eq!(method.slots().count(), 2);
        assert_eq!(method.name(), "rules");

        let property = Declaration::Property(PropertyDecl {
            class: Some("Foo".into()),
            name: "items".into(),
            slot: ValueSlot::detached(None),
        });
        assert_eq!(property.slots().count(), 1);
    }
}
