use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_ENTITY_ID_LEN: usize = 64;

/// Stable identifier of a priced entity: a ticker or a company name.
///
/// Surrounding whitespace is trimmed, case is preserved. Ordering is the
/// lexical order of the trimmed string, which is the total order used to
/// canonicalize entity pairs. Clones share one allocation, so ids can key
/// caches and sets freely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(Arc<str>);

impl EntityId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyEntityId);
        }

        let len = trimmed.chars().count();
        if len > MAX_ENTITY_ID_LEN {
            return Err(ValidationError::EntityIdTooLong {
                len,
                max: MAX_ENTITY_ID_LEN,
            });
        }

        for (index, ch) in trimmed.chars().enumerate() {
            if ch.is_control() {
                return Err(ValidationError::InvalidEntityIdChar { ch, index });
            }
        }

        Ok(Self(Arc::from(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for EntityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0.as_ref().to_owned()
    }
}
