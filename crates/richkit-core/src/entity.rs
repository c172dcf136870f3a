//! Entity registry
//!
//! Entities hold out-of-band data (link targets, image sources) referenced by
//! character ranges. The registry is append-only: keys are handed out in
//! increasing order and never reused within one document lineage, even when
//! the last reference to an entity disappears.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{DocumentError, ParseError, ParseResult, Result};

/// Largest entity key accepted from an external document
///
/// Matches the largest integer a JSON number can carry exactly in JavaScript,
/// which leaves the registry room to keep allocating.
pub const MAX_ENTITY_KEY: u64 = (1 << 53) - 1;

/// Key of an entity inside a document's registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(pub u64);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityKey {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(EntityKey)
            .map_err(|_| ParseError::InvalidEntityKey(s.to_string()))
    }
}

/// Entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    /// Hyperlink, data `{url}`
    Link,
    /// Embedded image, data `{src}`
    Image,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "LINK",
            Self::Image => "IMAGE",
        }
    }
}

impl FromStr for EntityType {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "LINK" => Ok(Self::Link),
            "IMAGE" => Ok(Self::Image),
            other => Err(ParseError::UnknownEntityType(other.to_string())),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the editing surface treats text covered by an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mutability {
    /// Text may be edited freely; the entity stays attached
    Mutable,
    /// Text is a single unit; editing it removes the entity
    Immutable,
    /// Text may be removed word by word
    Segmented,
}

impl Mutability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mutable => "MUTABLE",
            Self::Immutable => "IMMUTABLE",
            Self::Segmented => "SEGMENTED",
        }
    }
}

impl FromStr for Mutability {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MUTABLE" => Ok(Self::Mutable),
            "IMMUTABLE" => Ok(Self::Immutable),
            "SEGMENTED" => Ok(Self::Segmented),
            other => Err(ParseError::UnknownMutability(other.to_string())),
        }
    }
}

/// A registered entity
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub entity_type: EntityType,
    pub mutability: Mutability,
    pub data: Map<String, Value>,
}

impl Entity {
    pub fn new(entity_type: EntityType, mutability: Mutability, data: Map<String, Value>) -> Self {
        Self {
            entity_type,
            mutability,
            data,
        }
    }

    /// Mutable link entity pointing at `url`
    pub fn link(url: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("url".to_string(), Value::String(url.into()));
        Self::new(EntityType::Link, Mutability::Mutable, data)
    }

    /// Immutable image entity with source `src`
    pub fn image(src: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("src".to_string(), Value::String(src.into()));
        Self::new(EntityType::Image, Mutability::Immutable, data)
    }

    /// Link target, when present
    pub fn url(&self) -> Option<&str> {
        self.data.get("url").and_then(Value::as_str)
    }

    /// Image source, when present
    pub fn src(&self) -> Option<&str> {
        self.data.get("src").and_then(Value::as_str)
    }
}

/// Append-only map from entity keys to entities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMap {
    entities: BTreeMap<EntityKey, Entity>,
    next_key: u64,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity and return its freshly allocated key
    pub fn add(&mut self, entity: Entity) -> EntityKey {
        let key = EntityKey(self.next_key);
        // next_key starts at most at MAX_ENTITY_KEY + 1, far below u64::MAX
        self.next_key = self.next_key.checked_add(1).unwrap_or(u64::MAX);
        self.entities.insert(key, entity);
        key
    }

    /// Register an entity under a key read from an external document
    pub(crate) fn insert_with_key(&mut self, key: EntityKey, entity: Entity) -> ParseResult<()> {
        if key.0 > MAX_ENTITY_KEY {
            return Err(ParseError::InvalidEntityKey(key.to_string()));
        }
        if self.entities.contains_key(&key) {
            return Err(ParseError::DuplicateEntityKey(key.0));
        }
        let after = key
            .0
            .checked_add(1)
            .ok_or_else(|| ParseError::InvalidEntityKey(key.to_string()))?;
        self.next_key = self.next_key.max(after);
        self.entities.insert(key, entity);
        Ok(())
    }

    pub fn get(&self, key: EntityKey) -> Result<&Entity> {
        self.entities
            .get(&key)
            .ok_or(DocumentError::EntityNotFound { key: key.0 })
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(&key)
    }

    /// Key the next call to [`EntityMap::add`] will return
    pub fn next_key(&self) -> EntityKey {
        EntityKey(self.next_key)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter().map(|(key, entity)| (*key, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_monotonic() {
        let mut map = EntityMap::new();
        let a = map.add(Entity::link("https://a.example"));
        let b = map.add(Entity::image("data:image/png;base64,AAA"));
        assert_eq!(a, EntityKey(0));
        assert_eq!(b, EntityKey(1));
        assert_eq!(map.next_key(), EntityKey(2));
    }

    #[test]
    fn test_external_keys_advance_counter() {
        let mut map = EntityMap::new();
        map.insert_with_key(EntityKey(9), Entity::link("https://x.example"))
            .unwrap();
        assert_eq!(map.add(Entity::link("https://y.example")), EntityKey(10));
    }

    #[test]
    fn test_external_keys_are_bounded_and_unique() {
        let mut map = EntityMap::new();
        assert!(matches!(
            map.insert_with_key(EntityKey(u64::MAX), Entity::link("a")),
            Err(ParseError::InvalidEntityKey(_))
        ));
        map.insert_with_key(EntityKey(MAX_ENTITY_KEY), Entity::link("b"))
            .unwrap();
        assert_eq!(map.next_key(), EntityKey(MAX_ENTITY_KEY + 1));
        assert!(matches!(
            map.insert_with_key(EntityKey(MAX_ENTITY_KEY), Entity::link("c")),
            Err(ParseError::DuplicateEntityKey(MAX_ENTITY_KEY))
        ));
        assert_eq!(map.add(Entity::link("d")), EntityKey(MAX_ENTITY_KEY + 1));
    }

    #[test]
    fn test_get_missing_entity() {
        let map = EntityMap::new();
        assert_eq!(
            map.get(EntityKey(3)).unwrap_err(),
            DocumentError::EntityNotFound { key: 3 }
        );
    }

    #[test]
    fn test_typed_payload_accessors() {
        let link = Entity::link("https://rust-lang.org");
        assert_eq!(link.url(), Some("https://rust-lang.org"));
        assert_eq!(link.src(), None);
        assert_eq!(link.mutability, Mutability::Mutable);

        let image = Entity::image("data:image/gif;base64,R0lG");
        assert_eq!(image.src(), Some("data:image/gif;base64,R0lG"));
        assert_eq!(image.mutability, Mutability::Immutable);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("LINK".parse::<EntityType>().unwrap(), EntityType::Link);
        assert!("MENTION".parse::<EntityType>().is_err());
        assert_eq!(
            "SEGMENTED".parse::<Mutability>().unwrap(),
            Mutability::Segmented
        );
        assert!("-1".parse::<EntityKey>().is_err());
    }
}
