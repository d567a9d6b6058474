use serde::{Deserialize, Serialize};

use super::model::{AreaId, Location, RoomId};
use crate::error::{Result, WorldError};

pub const MAX_KEYWORDS: usize = 8;
pub const MAX_KEYWORD_LEN: usize = 32;
pub const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Rarity {
    #[default]
    Common,
    Limited,
    Rare,
    Elite,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Limited,
        Rarity::Rare,
        Rarity::Elite,
        Rarity::Legendary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Limited => "limited",
            Rarity::Rare => "rare",
            Rarity::Elite => "elite",
            Rarity::Legendary => "legendary",
        }
    }

    /// Presentation-tier tag handed to the colorizer.
    pub fn color_code(self) -> &'static str {
        match self {
            Rarity::Common => "&w",
            Rarity::Limited => "&g",
            Rarity::Rare => "&b",
            Rarity::Elite => "&m",
            Rarity::Legendary => "&y",
        }
    }

    fn from_tag(tag: &Tag) -> Result<Rarity> {
        let found = match tag {
            Tag::Code(code) => usize::try_from(*code)
                .ok()
                .and_then(|i| Self::ALL.get(i).copied()),
            Tag::Name(name) => Self::ALL
                .into_iter()
                .find(|r| r.name().eq_ignore_ascii_case(name.trim())),
        };
        found.ok_or_else(|| WorldError::Parse(format!("unknown rarity {}", tag)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectKind {
    #[default]
    Misc,
    Key {
        opens_area_id: AreaId,
        opens_room_id: RoomId,
    },
    Armor {
        wear_location: u8,
    },
    Weapon,
}

impl ObjectKind {
    const NAMES: [&'static str; 4] = ["misc", "key", "armor", "weapon"];

    pub fn name(&self) -> &'static str {
        Self::NAMES[self.code()]
    }

    fn code(&self) -> usize {
        match self {
            ObjectKind::Misc => 0,
            ObjectKind::Key { .. } => 1,
            ObjectKind::Armor { .. } => 2,
            ObjectKind::Weapon => 3,
        }
    }
}

/// An item template instance. Lives in exactly one container at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameObject {
    pub name: String,
    keywords: Vec<String>,
    pub rarity: Rarity,
    pub kind: ObjectKind,
    pub armor: i32,
    pub damage: i32,
    pub is_static: bool,
}

impl GameObject {
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;
        check_keywords(&keywords)?;
        Ok(GameObject {
            name,
            keywords,
            rarity: Rarity::Common,
            kind: ObjectKind::Misc,
            armor: 0,
            damage: 0,
            is_static: false,
        })
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// Keywords in declared order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True if `key` is a case-insensitive prefix of any keyword.
    pub fn matches_keyword(&self, key: &str) -> bool {
        self.matching_keyword(key).is_some()
    }

    /// First keyword, in declared order, that `key` is a prefix of. The
    /// empty key is a prefix of every keyword.
    pub fn matching_keyword(&self, key: &str) -> Option<&str> {
        let key = key.as_bytes();
        self.keywords
            .iter()
            .find(|kw| {
                let kw = kw.as_bytes();
                kw.len() >= key.len() && kw[..key.len()].eq_ignore_ascii_case(key)
            })
            .map(String::as_str)
    }

    /// Whether this is a key for the room at `location`.
    pub fn opens(&self, location: Location) -> bool {
        match self.kind {
            ObjectKind::Key {
                opens_area_id,
                opens_room_id,
            } => location == Location::new(opens_area_id, opens_room_id),
            _ => false,
        }
    }

    pub fn to_document(&self) -> ObjectDocument {
        let mut doc = ObjectDocument {
            name: self.name.clone(),
            keywords: self.keywords.clone(),
            is_static: Flag::Bool(self.is_static),
            rarity: Tag::Name(self.rarity.name().to_string()),
            kind: Tag::Name(self.kind.name().to_string()),
            armor: self.armor,
            damage: self.damage,
            opens_area_id: None,
            opens_room_id: None,
            wear_location: None,
        };

        match self.kind {
            ObjectKind::Key {
                opens_area_id,
                opens_room_id,
            } => {
                doc.opens_area_id = Some(opens_area_id);
                doc.opens_room_id = Some(opens_room_id);
            }
            ObjectKind::Armor { wear_location } => doc.wear_location = Some(wear_location),
            ObjectKind::Misc | ObjectKind::Weapon => {}
        }

        doc
    }

    pub fn from_document(doc: ObjectDocument) -> Result<Self> {
        check_name(&doc.name)?;
        check_keywords(&doc.keywords)?;

        let rarity = Rarity::from_tag(&doc.rarity)?;
        let kind = parse_kind(&doc)?;

        Ok(GameObject {
            name: doc.name,
            keywords: doc.keywords,
            rarity,
            kind,
            armor: doc.armor,
            damage: doc.damage,
            is_static: doc.is_static.as_bool(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let doc: ObjectDocument = serde_json::from_str(s)?;
        Self::from_document(doc)
    }
}

////////////////////////
/// DOCUMENT STRUCTS ///
////////////////////////

/// Integer code or name; older documents store enums as integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Code(i64),
    Name(String),
}

impl Default for Tag {
    fn default() -> Self {
        Tag::Code(0)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Code(c) => write!(f, "{}", c),
            Tag::Name(n) => write!(f, "'{}'", n),
        }
    }
}

/// Boolean stored either as `true`/`false` or as `0`/`1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    pub fn as_bool(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Bool(false)
    }
}

/// Persisted shape of a game object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDocument {
    pub name: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub is_static: Flag,

    #[serde(default)]
    pub rarity: Tag,

    #[serde(rename = "type", default)]
    pub kind: Tag,

    #[serde(default)]
    pub armor: i32,

    #[serde(default)]
    pub damage: i32,

    // Key only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opens_area_id: Option<AreaId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opens_room_id: Option<RoomId>,

    // Armor only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wear_location: Option<u8>,
}

fn parse_kind(doc: &ObjectDocument) -> Result<ObjectKind> {
    let code = match &doc.kind {
        Tag::Code(code) => usize::try_from(*code).ok(),
        Tag::Name(name) => ObjectKind::NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name.trim())),
    };

    let missing = |field: &str| {
        WorldError::Parse(format!(
            "object '{}' of type {} is missing '{}'",
            doc.name, doc.kind, field
        ))
    };

    match code {
        Some(0) => Ok(ObjectKind::Misc),
        Some(1) => Ok(ObjectKind::Key {
            opens_area_id: doc.opens_area_id.ok_or_else(|| missing("opens_area_id"))?,
            opens_room_id: doc.opens_room_id.ok_or_else(|| missing("opens_room_id"))?,
        }),
        Some(2) => Ok(ObjectKind::Armor {
            wear_location: doc.wear_location.ok_or_else(|| missing("wear_location"))?,
        }),
        Some(3) => Ok(ObjectKind::Weapon),
        _ => Err(WorldError::Parse(format!(
            "object '{}' has unknown type {}",
            doc.name, doc.kind
        ))),
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(WorldError::validation("name", "object name may not be empty"));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(WorldError::validation(
            "name",
            format!("'{}' is {} characters (max: {})", name, len, MAX_NAME_LEN),
        ));
    }
    Ok(())
}

fn check_keywords(keywords: &[String]) -> Result<()> {
    if keywords.len() > MAX_KEYWORDS {
        return Err(WorldError::validation(
            "keywords",
            format!("{} keywords (max: {})", keywords.len(), MAX_KEYWORDS),
        ));
    }
    for kw in keywords {
        let len = kw.chars().count();
        if len == 0 {
            return Err(WorldError::validation("keywords", "empty keyword"));
        }
        if len > MAX_KEYWORD_LEN {
            return Err(WorldError::validation(
                "keywords",
                format!("'{}' is {} characters (max: {})", kw, len, MAX_KEYWORD_LEN),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefix_match_follows_declared_order() {
        let obj = GameObject::new("a sword and shield", words(&["sword", "shield"])).unwrap();

        assert!(obj.matches_keyword("sw"));
        assert!(obj.matches_keyword("SHI"));
        assert_eq!(obj.matching_keyword("s"), Some("sword"));
        assert!(!obj.matches_keyword("swords"));
        assert!(!obj.matches_keyword(" sw"));
    }

    #[test]
    fn test_empty_key_matches_first_keyword() {
        let obj = GameObject::new("a sword and shield", words(&["sword", "shield"])).unwrap();
        assert_eq!(obj.matching_keyword(""), Some("sword"));

        let bare = GameObject::new("a pebble", Vec::new()).unwrap();
        assert!(!bare.matches_keyword(""));
    }

    #[test]
    fn test_key_round_trip() {
        let key = GameObject::new("an iron key", words(&["key", "iron"]))
            .unwrap()
            .with_rarity(Rarity::Rare)
            .with_kind(ObjectKind::Key {
                opens_area_id: 2,
                opens_room_id: 14,
            });

        let doc = key.to_document();
        assert_eq!(doc.opens_area_id, Some(2));
        assert_eq!(doc.wear_location, None);
        assert_eq!(GameObject::from_document(doc).unwrap(), key);
    }

    #[test]
    fn test_armor_round_trip_through_json() {
        let mut helm = GameObject::new("a dented helm", words(&["helm"]))
            .unwrap()
            .with_rarity(Rarity::Legendary)
            .with_kind(ObjectKind::Armor { wear_location: 3 });
        helm.armor = 5;
        helm.is_static = true;

        let json = helm.to_json().unwrap();
        assert!(json.contains("\"wear_location\":3"));
        assert!(!json.contains("opens_area_id"));
        assert_eq!(GameObject::from_json(&json).unwrap(), helm);
    }

    #[test]
    fn test_integer_codes_accepted() {
        let json = r#"{"name":"a coin","keywords":["coin"],"is_static":0,
            "rarity":1,"type":3,"armor":0,"damage":2,"wear_location":0}"#;
        let obj = GameObject::from_json(json).unwrap();
        assert_eq!(obj.rarity, Rarity::Limited);
        assert_eq!(obj.kind, ObjectKind::Weapon);
        assert!(!obj.is_static);
        assert_eq!(obj.damage, 2);
    }

    #[test]
    fn test_too_many_keywords_rejected() {
        let doc = ObjectDocument {
            name: "junk".to_string(),
            keywords: (0..=MAX_KEYWORDS).map(|i| format!("k{}", i)).collect(),
            is_static: Flag::default(),
            rarity: Tag::default(),
            kind: Tag::default(),
            armor: 0,
            damage: 0,
            opens_area_id: None,
            opens_room_id: None,
            wear_location: None,
        };
        assert!(matches!(
            GameObject::from_document(doc),
            Err(WorldError::Validation { .. })
        ));
    }

    #[test]
    fn test_long_keyword_rejected() {
        let long = "x".repeat(MAX_KEYWORD_LEN + 1);
        assert!(matches!(
            GameObject::new("junk", vec![long]),
            Err(WorldError::Validation { .. })
        ));
    }

    #[test]
    fn test_key_missing_target_is_parse_error() {
        let json = r#"{"name":"a key","keywords":["key"],"type":"key","opens_area_id":1}"#;
        assert!(matches!(
            GameObject::from_json(json),
            Err(WorldError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_rarity_is_parse_error() {
        let json = r#"{"name":"a rock","rarity":"mythic"}"#;
        assert!(matches!(
            GameObject::from_json(json),
            Err(WorldError::Parse(_))
        ));
    }

    fn bare_document(name: &str) -> ObjectDocument {
        ObjectDocument {
            name: name.to_string(),
            keywords: words(&["thing"]),
            is_static: Flag::default(),
            rarity: Tag::default(),
            kind: Tag::default(),
            armor: 0,
            damage: 0,
            opens_area_id: None,
            opens_room_id: None,
            wear_location: None,
        }
    }

    #[test]
    fn test_name_length_bound() {
        let longest = "n".repeat(MAX_NAME_LEN);
        assert!(GameObject::from_document(bare_document(&longest)).is_ok());

        let too_long = "n".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            GameObject::from_document(bare_document(&too_long)),
            Err(WorldError::Validation { ref field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_empty_name_and_keyword_rejected() {
        assert!(matches!(
            GameObject::new("", words(&["thing"])),
            Err(WorldError::Validation { .. })
        ));
        assert!(matches!(
            GameObject::new("a thing", words(&["thing", ""])),
            Err(WorldError::Validation { .. })
        ));
    }

    #[test]
    fn test_armor_missing_wear_location_is_parse_error() {
        let json = r#"{"name":"a cap","keywords":["cap"],"type":"armor","armor":2}"#;
        assert!(matches!(
            GameObject::from_json(json),
            Err(WorldError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        for kind in [r#""potion""#, "7", "-1"] {
            let json = format!(r#"{{"name":"a vial","keywords":["vial"],"type":{}}}"#, kind);
            assert!(
                matches!(GameObject::from_json(&json), Err(WorldError::Parse(_))),
                "type {} should not parse",
                kind
            );
        }
    }

    #[test]
    fn test_key_opens_location() {
        let key = GameObject::new("a key", words(&["key"]))
            .unwrap()
            .with_kind(ObjectKind::Key {
                opens_area_id: 1,
                opens_room_id: 4,
            });
        assert!(key.opens(Location::new(1, 4)));
        assert!(!key.opens(Location::new(1, 3)));
    }
}
