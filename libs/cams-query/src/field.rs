//! Field identifiers for document records.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// The set of queryable fields of a document record.
///
/// Implemented by a plain enum per record type, usually through [`document_fields!`].
/// Names are the stored (camelCase) attribute names and are matched case-sensitively.
///
/// [`document_fields!`]: crate::document_fields
pub trait DocumentField: Copy + Eq + std::hash::Hash + fmt::Debug + Send + Sync + 'static {
    /// All fields of the record.
    const FIELDS: &'static [Self];

    /// Stored attribute name.
    fn name(&self) -> &'static str;

    /// Resolve a field by its stored name.
    fn from_name(name: &str) -> Option<Self> {
        Self::FIELDS.iter().copied().find(|f| f.name() == name)
    }
}

/// Binds a record type to its field enum.
pub trait Schema {
    type Field: DocumentField;
}

/// Declare a field enum and its [`DocumentField`] implementation.
///
/// ```rust,ignore
/// cams_query::document_fields! {
///     pub enum OrderField {
///         Id => "id",
///         CaseId => "caseId",
///     }
/// }
/// ```
#[macro_export]
macro_rules! document_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $field:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::DocumentField for $name {
            const FIELDS: &'static [Self] = &[$(Self::$variant),+];

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $field),+
                }
            }
        }
    };
}

/// A field used as an operand, serialized as `{ "name": "<field>" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field<F: DocumentField>(pub F);

impl<F: DocumentField> Field<F> {
    #[must_use]
    pub const fn new(field: F) -> Self {
        Self(field)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    #[must_use]
    pub const fn field(&self) -> F {
        self.0
    }
}

impl<F: DocumentField> From<F> for Field<F> {
    fn from(field: F) -> Self {
        Self(field)
    }
}

impl<F: DocumentField> Serialize for Field<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Field", 1)?;
        state.serialize_field("name", self.name())?;
        state.end()
    }
}

impl<'de, F: DocumentField> Deserialize<'de> for Field<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldVisitor<F>(PhantomData<F>);

        impl<'de, F: DocumentField> Visitor<'de> for FieldVisitor<F> {
            type Value = Field<F>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with a `name` naming a known field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut name: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "name" {
                        name = Some(map.next_value()?);
                    } else {
                        map.next_value::<de::IgnoredAny>()?;
                    }
                }
                let name = name.ok_or_else(|| de::Error::missing_field("name"))?;
                F::from_name(&name)
                    .map(Field)
                    .ok_or_else(|| de::Error::custom(format!("unknown field `{name}`")))
            }
        }

        deserializer.deserialize_map(FieldVisitor(PhantomData))
    }
}
