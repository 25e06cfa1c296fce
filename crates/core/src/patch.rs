//! Tri-state field for partial updates of nullable columns.
//!
//! A PATCH body can leave a field out, send `null`, or send a value. Those
//! mean "keep", "clear to NULL", and "store this (possibly empty) value"
//! respectively, so they cannot share a plain `Option`.

use serde::{Deserialize, Deserializer};

/// One nullable field of a partial update.
///
/// Fields of this type must be annotated with `#[serde(default)]` so that an
/// absent key deserializes as [`Patch::Missing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key absent from the request; keep the stored value.
    Missing,
    /// Explicit `null`; store SQL `NULL`.
    Null,
    /// Explicit value, including an empty string.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<T> Patch<T> {
    /// Apply this patch to a stored nullable value.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Missing => {}
            Patch::Null => *target = None,
            Patch::Value(value) => *target = Some(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}
