//! Ordering policy
//!
//! Cross-kind order used to place new elements:
//!
//! `Null < False < True < Int < Float < String < ClassRef < ConstRef < Opaque`
//!
//! Within a kind, payloads compare numerically (ints, floats via
//! [`f64::total_cmp`]) or byte-wise (strings, class names, then constant
//! names). Two opaque values are unordered and unequal.

use crate::classify::ValueKind;
use std::cmp::Ordering;

/// Rank of a [`ValueKind`] in the cross-kind order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderClass {
    Null,
    False,
    True,
    Int,
    Float,
    String,
    ClassRef,
    ConstRef,
    Opaque,
}

impl ValueKind<'_> {
    /// Rank of this kind
    #[must_use]
    pub fn order_class(&self) -> OrderClass {
        match self {
            ValueKind::Null => OrderClass::Null,
            ValueKind::False => OrderClass::False,
            ValueKind::True => OrderClass::True,
            ValueKind::Int(_) => OrderClass::Int,
            ValueKind::Float(_) => OrderClass::Float,
            ValueKind::String(_) => OrderClass::String,
            ValueKind::ClassRef(_) => OrderClass::ClassRef,
            ValueKind::ConstRef { .. } => OrderClass::ConstRef,
            ValueKind::Opaque => OrderClass::Opaque,
        }
    }
}

/// Compare two classified values
///
/// Returns `None` only when both are opaque.
#[must_use]
pub fn compare(a: &ValueKind<'_>, b: &ValueKind<'_>) -> Option<Ordering> {
    let by_class = a.order_class().cmp(&b.order_class());
    if by_class != Ordering::Equal {
        return Some(by_class);
    }
    Some(match (a, b) {
        (ValueKind::Int(x), ValueKind::Int(y)) => x.cmp(y),
        (ValueKind::Float(x), ValueKind::Float(y)) => x.total_cmp(y),
        (ValueKind::String(x), ValueKind::String(y)) | (ValueKind::ClassRef(x), ValueKind::ClassRef(y)) => {
            x.as_bytes().cmp(y.as_bytes())
        }
        (
            ValueKind::ConstRef { class: c1, constant: k1 },
            ValueKind::ConstRef { class: c2, constant: k2 },
        ) => (c1.as_bytes(), k1.as_bytes()).cmp(&(c2.as_bytes(), k2.as_bytes())),
        (ValueKind::Opaque, ValueKind::Opaque) => return None,
        // Same class and no payload: Null, False, True
        _ => Ordering::Equal,
    })
}

impl PartialEq for ValueKind<'_> {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for ValueKind<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare(self, other)
    }
}
