//! Normalized model tree.
//!
//! Deserialization accepts every input shorthand the YAML surface allows and
//! normalizes it on the way in:
//!
//! - `entities` is a mapping; names are injected from the keys and document
//!   order is preserved.
//! - states, attributes, invariants, and computed properties may be bare
//!   strings or full mappings.
//! - a transition's `from` may be a single state name or a list.
//! - relationships may be written long-form (`{type, target}`), as shorthand
//!   entries inside the `relationships` list (`{has_many: Post}`), or as
//!   shorthand keys directly on the entity (`has_many: [Post, Comment]`).
//! - `system_invariants` entries are forced to system scope.
//!
//! Serialization omits empty collections, which keeps the YAML rendering used
//! by the semantic reviewer free of noise.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Relationship kinds between entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelKind {
    /// Containment: the source belongs to the target.
    BelongsTo,
    /// Ownership of a single target.
    HasOne,
    /// Ownership of many targets.
    HasMany,
    /// A non-owning dependency.
    DependsOn,
}

/// Shorthand relationship keys, in the order they are probed during
/// normalization.
const REL_SHORTHAND_KEYS: [RelKind; 4] = [
    RelKind::BelongsTo,
    RelKind::HasMany,
    RelKind::HasOne,
    RelKind::DependsOn,
];

impl RelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BelongsTo => "belongs_to",
            Self::HasOne => "has_one",
            Self::HasMany => "has_many",
            Self::DependsOn => "depends_on",
        }
    }

    /// Parse a relationship-type string, downgrading unrecognized values to
    /// [`RelKind::DependsOn`].
    ///
    /// The schema layer rejects unknown types at parse time, so this fallback
    /// is only reachable through direct graph construction. It is a deliberate
    /// policy: an unknown type still produces an edge instead of failing the
    /// whole build.
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "belongs_to" => Self::BelongsTo,
            "has_one" => Self::HasOne,
            "has_many" => Self::HasMany,
            "depends_on" => Self::DependsOn,
            other => {
                tracing::warn!(
                    "unrecognized relationship type '{other}', treating as depends_on"
                );
                Self::DependsOn
            }
        }
    }
}

impl fmt::Display for RelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope of an invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Holds for every instance of one entity.
    #[default]
    Entity,
    /// Holds for the model as a whole.
    System,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity => f.write_str("entity"),
            Self::System => f.write_str("system"),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// An attribute of an entity. Consumed as metadata only; types and bounds are
/// never interpreted by the analyzers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AttributeDe")]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: String,
    #[serde(skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_yaml::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttributeDe {
    /// Bare string shorthand: `- email` becomes a string attribute.
    Name(String),
    Full {
        name: String,
        #[serde(rename = "type")]
        attr_type: String,
        #[serde(default)]
        unique: bool,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        default: Option<serde_yaml::Value>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl From<AttributeDe> for Attribute {
    fn from(de: AttributeDe) -> Self {
        match de {
            AttributeDe::Name(name) => Attribute {
                name,
                attr_type: "string".to_string(),
                unique: false,
                optional: false,
                min: None,
                max: None,
                default: None,
                description: None,
            },
            AttributeDe::Full {
                name,
                attr_type,
                unique,
                optional,
                min,
                max,
                default,
                description,
            } => Attribute {
                name,
                attr_type,
                unique,
                optional,
                min,
                max,
                default,
                description,
            },
        }
    }
}

/// A state in an entity's state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StateDe")]
pub struct State {
    pub name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub initial: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub terminal: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StateDe {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        initial: bool,
        #[serde(default)]
        terminal: bool,
    },
}

impl From<StateDe> for State {
    fn from(de: StateDe) -> Self {
        match de {
            StateDe::Name(name) => State {
                name,
                initial: false,
                terminal: false,
            },
            StateDe::Full {
                name,
                initial,
                terminal,
            } => State {
                name,
                initial,
                terminal,
            },
        }
    }
}

/// A transition between states. `from` may name several source states; each
/// source becomes its own edge in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    #[serde(rename = "from", deserialize_with = "de_one_or_many")]
    pub from_states: Vec<String>,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
}

fn de_one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// A typed, directed relationship to another entity.
#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub kind: RelKind,
    pub target: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelationshipDe {
    Full {
        #[serde(rename = "type")]
        kind: RelKind,
        target: String,
        #[serde(default)]
        conditions: Vec<String>,
    },
    /// Shorthand entry like `{has_many: Post}`.
    Short(ShortRel),
}

#[derive(Deserialize, Default)]
struct ShortRel {
    #[serde(default)]
    belongs_to: Option<String>,
    #[serde(default)]
    has_many: Option<String>,
    #[serde(default)]
    has_one: Option<String>,
    #[serde(default)]
    depends_on: Option<String>,
}

impl ShortRel {
    fn target_for(&self, kind: RelKind) -> Option<&String> {
        match kind {
            RelKind::BelongsTo => self.belongs_to.as_ref(),
            RelKind::HasMany => self.has_many.as_ref(),
            RelKind::HasOne => self.has_one.as_ref(),
            RelKind::DependsOn => self.depends_on.as_ref(),
        }
    }
}

impl RelationshipDe {
    /// Normalize to a [`Relationship`]. Shorthand entries with no recognized
    /// key are dropped, matching the loader's lenient treatment of unknown
    /// list entries.
    fn normalize(self) -> Option<Relationship> {
        match self {
            RelationshipDe::Full {
                kind,
                target,
                conditions,
            } => Some(Relationship {
                kind,
                target,
                conditions,
            }),
            RelationshipDe::Short(short) => {
                for kind in REL_SHORTHAND_KEYS {
                    if let Some(target) = short.target_for(kind) {
                        return Some(Relationship {
                            kind,
                            target: target.clone(),
                            conditions: Vec::new(),
                        });
                    }
                }
                None
            }
        }
    }
}

/// A computed property. Metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ComputedDe")]
pub struct Computed {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub formula: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ComputedDe {
    Name(String),
    Full { name: String, formula: String },
}

impl From<ComputedDe> for Computed {
    fn from(de: ComputedDe) -> Self {
        match de {
            ComputedDe::Name(name) => Computed {
                name,
                formula: String::new(),
            },
            ComputedDe::Full { name, formula } => Computed { name, formula },
        }
    }
}

/// A constraint that must hold, scoped to one entity or the whole model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "InvariantDe")]
pub struct Invariant {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formal: Option<String>,
    pub scope: Scope,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InvariantDe {
    Text(String),
    Full {
        description: String,
        #[serde(default)]
        formal: Option<String>,
        #[serde(default)]
        scope: Scope,
    },
}

impl From<InvariantDe> for Invariant {
    fn from(de: InvariantDe) -> Self {
        match de {
            InvariantDe::Text(description) => Invariant {
                description,
                formal: None,
                scope: Scope::Entity,
            },
            InvariantDe::Full {
                description,
                formal,
                scope,
            } => Invariant {
                description,
                formal,
                scope,
            },
        }
    }
}

/// An entity in the model. The name is injected from the `entities` mapping
/// key during deserialization.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    #[serde(skip)]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<State>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<Transition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub computed: Vec<Computed>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invariants: Vec<Invariant>,
    /// Free-text notes the author flagged as ambiguous. Surfaced to the
    /// semantic reviewer only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unclear: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct EntityDe {
    attributes: Vec<Attribute>,
    states: Vec<State>,
    transitions: Vec<Transition>,
    relationships: Vec<RelationshipDe>,
    computed: Vec<Computed>,
    invariants: Vec<Invariant>,
    unclear: Vec<String>,
    // Entity-level relationship shorthand: `has_many: Post` or
    // `has_many: [Post, Comment]` directly under the entity.
    belongs_to: Option<StringOrList>,
    has_many: Option<StringOrList>,
    has_one: Option<StringOrList>,
    depends_on: Option<StringOrList>,
    // A redundant inline `name` key is accepted and ignored; the mapping key
    // wins.
    #[allow(dead_code)]
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::One(s) => vec![s],
            StringOrList::Many(v) => v,
        }
    }
}

impl EntityDe {
    fn into_entity(self, name: String) -> Entity {
        let mut relationships: Vec<Relationship> = self
            .relationships
            .into_iter()
            .filter_map(RelationshipDe::normalize)
            .collect();

        let shorthand = [
            (RelKind::BelongsTo, self.belongs_to),
            (RelKind::HasMany, self.has_many),
            (RelKind::HasOne, self.has_one),
            (RelKind::DependsOn, self.depends_on),
        ];
        for (kind, targets) in shorthand {
            if let Some(targets) = targets {
                for target in targets.into_vec() {
                    relationships.push(Relationship {
                        kind,
                        target,
                        conditions: Vec::new(),
                    });
                }
            }
        }

        Entity {
            name,
            attributes: self.attributes,
            states: self.states,
            transitions: self.transitions,
            relationships,
            computed: self.computed,
            invariants: self.invariants,
            unclear: self.unclear,
        }
    }
}

/// Root of a parsed model document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    /// Entities in document order. Iteration order drives every downstream
    /// ordering (issues, test cases, files), so this is a `Vec`, not a map.
    #[serde(
        default,
        deserialize_with = "de_entities",
        serialize_with = "ser_entities",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub entities: Vec<Entity>,
    #[serde(
        default,
        deserialize_with = "de_system_invariants",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub system_invariants: Vec<Invariant>,
    /// Temporal rules are carried through as opaque metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temporal_rules: Vec<String>,
}

impl Model {
    /// Look up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// All entity names in declaration order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }
}

fn de_entities<'de, D>(deserializer: D) -> Result<Vec<Entity>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntitiesVisitor;

    impl<'de> Visitor<'de> for EntitiesVisitor {
        type Value = Vec<Entity>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of entity name to entity definition")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entities: Vec<Entity> = Vec::new();
            while let Some((name, de)) = map.next_entry::<String, EntityDe>()? {
                let entity = de.into_entity(name);
                // A duplicate key replaces the earlier definition in place,
                // keeping the first declaration's position.
                match entities.iter_mut().find(|e| e.name == entity.name) {
                    Some(slot) => *slot = entity,
                    None => entities.push(entity),
                }
            }
            Ok(entities)
        }
    }

    deserializer.deserialize_map(EntitiesVisitor)
}

fn ser_entities<S>(entities: &[Entity], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(entities.len()))?;
    for entity in entities {
        map.serialize_entry(&entity.name, entity)?;
    }
    map.end()
}

fn de_system_invariants<'de, D>(deserializer: D) -> Result<Vec<Invariant>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut invariants = Vec::<Invariant>::deserialize(deserializer)?;
    for invariant in &mut invariants {
        invariant.scope = Scope::System;
    }
    Ok(invariants)
}
