//! Observed-versus-desired property diff.

use std::fmt;

use crate::property::{Property, PropertySet, PropertyValue};

/// One property change to apply to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub property: Property,
    /// Desired value, or the observed value when `removed` is set (the
    /// negation command needs it).
    pub value: PropertyValue,
    pub removed: bool,
}

impl Change {
    pub fn set(property: Property, value: PropertyValue) -> Self {
        Self {
            property,
            value,
            removed: false,
        }
    }

    pub fn remove(property: Property, value: PropertyValue) -> Self {
        Self {
            property,
            value,
            removed: true,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.removed {
            write!(f, "-{} ({})", self.property, self.value)
        } else {
            write!(f, "{} = {}", self.property, self.value)
        }
    }
}

/// Changes in application order.
pub type ChangeSet = Vec<Change>;

/// Computes the changes that turn `current` into `desired`.
///
/// Changes follow [`Property::priority_order`], never the iteration order
/// of either map. An [`PropertyValue::Absent`] entry counts as missing.
pub fn diff(current: &PropertySet, desired: &PropertySet) -> ChangeSet {
    Property::priority_order()
        .into_iter()
        .filter_map(|property| {
            let is = present(current, property);
            let should = present(desired, property);
            match (is, should) {
                (is, Some(should)) if is != Some(should) => {
                    Some(Change::set(property, should.clone()))
                }
                (Some(is), None) => Some(Change::remove(property, is.clone())),
                _ => None,
            }
        })
        .collect()
}

fn present(set: &PropertySet, property: Property) -> Option<&PropertyValue> {
    set.get(&property).filter(|v| !v.is_absent())
}
