//! The model graph arena and its query surface.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use super::types::{
    AttributeNode, Direction, Edge, EdgeKind, EntityNode, InvariantNode, Node, NodeId, RelKind,
    RelationshipEdge, RelationshipInfo, StateNode, TransitionEdge, TransitionInfo,
};
use crate::schema::Scope;

/// A directed graph over the nodes of one model.
///
/// Nodes live in an arena indexed by [`NodeId`]; edges live in a parallel
/// list with per-node outgoing/incoming adjacency. Name lookups go through
/// index tables built as nodes are added, so queries never concatenate or
/// re-hash composite string keys.
///
/// At most one edge exists per ordered node pair; re-adding an edge replaces
/// its payload in place, keeping the original insertion position. All queries
/// are total: unknown names yield empty results, never errors.
#[derive(Debug, Default)]
pub struct ModelGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Outgoing edge indices per node, in insertion order.
    outgoing: Vec<Vec<usize>>,
    /// Incoming edge indices per node, in insertion order.
    incoming: Vec<Vec<usize>>,
    /// Entity name -> node.
    entity_index: FxHashMap<String, NodeId>,
    /// Entity name -> state name -> node.
    state_index: FxHashMap<String, FxHashMap<String, NodeId>>,
    /// Entity name -> attribute name -> node.
    attr_index: FxHashMap<String, FxHashMap<String, NodeId>>,
    /// Edge lookup for the one-edge-per-pair rule.
    edge_index: FxHashMap<(NodeId, NodeId), usize>,
    /// Declared entity nodes in insertion order.
    entity_order: Vec<NodeId>,
}

impl ModelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) {
        if let Some(&i) = self.edge_index.get(&(from, to)) {
            self.edges[i].kind = kind;
            return;
        }
        let index = self.edges.len();
        self.edges.push(Edge { from, to, kind });
        self.outgoing[from.0].push(index);
        self.incoming[to.0].push(index);
        self.edge_index.insert((from, to), index);
    }

    /// Entity node for `name`, creating an undeclared placeholder if needed.
    fn ensure_entity(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.entity_index.get(name) {
            return id;
        }
        let id = self.alloc(Node::Entity(EntityNode {
            name: name.to_string(),
            has_states: false,
            has_transitions: false,
            declared: false,
        }));
        self.entity_index.insert(name.to_string(), id);
        id
    }

    /// State node for `(entity, name)`, creating an undeclared placeholder if
    /// needed.
    fn ensure_state(&mut self, entity: &str, name: &str) -> NodeId {
        if let Some(&id) = self
            .state_index
            .get(entity)
            .and_then(|states| states.get(name))
        {
            return id;
        }
        let id = self.alloc(Node::State(StateNode {
            entity: entity.to_string(),
            name: name.to_string(),
            initial: false,
            terminal: false,
            declared: false,
        }));
        self.state_index
            .entry(entity.to_string())
            .or_default()
            .insert(name.to_string(), id);
        id
    }

    /// Add an entity node. Idempotent per name within a build: re-adding
    /// updates the metadata in place.
    pub fn add_entity(&mut self, name: &str, has_states: bool, has_transitions: bool) -> NodeId {
        let id = self.ensure_entity(name);
        if let Node::Entity(entity) = &mut self.nodes[id.0] {
            if !entity.declared {
                entity.declared = true;
                self.entity_order.push(id);
            }
            entity.has_states = has_states;
            entity.has_transitions = has_transitions;
        }
        id
    }

    /// Add a state node owned by `entity`, with an ownership edge when the
    /// entity node exists. Idempotent per `(entity, name)`.
    pub fn add_state(&mut self, entity: &str, name: &str, initial: bool, terminal: bool) -> NodeId {
        let id = self.ensure_state(entity, name);
        if let Node::State(state) = &mut self.nodes[id.0] {
            state.declared = true;
            state.initial = initial;
            state.terminal = terminal;
        }
        if let Some(&owner) = self.entity_index.get(entity) {
            self.add_edge(owner, id, EdgeKind::HasState);
        }
        id
    }

    /// Add an attribute node owned by `entity`, with an ownership edge when
    /// the entity node exists. Idempotent per `(entity, name)`.
    pub fn add_attribute(
        &mut self,
        entity: &str,
        name: &str,
        attr_type: &str,
        unique: bool,
        optional: bool,
    ) -> NodeId {
        let id = if let Some(&id) = self
            .attr_index
            .get(entity)
            .and_then(|attrs| attrs.get(name))
        {
            if let Node::Attribute(attr) = &mut self.nodes[id.0] {
                attr.attr_type = attr_type.to_string();
                attr.unique = unique;
                attr.optional = optional;
            }
            id
        } else {
            let id = self.alloc(Node::Attribute(AttributeNode {
                entity: entity.to_string(),
                name: name.to_string(),
                attr_type: attr_type.to_string(),
                unique,
                optional,
            }));
            self.attr_index
                .entry(entity.to_string())
                .or_default()
                .insert(name.to_string(), id);
            id
        };
        if let Some(&owner) = self.entity_index.get(entity) {
            self.add_edge(owner, id, EdgeKind::HasAttribute);
        }
        id
    }

    /// Add an invariant node. `entity = None` marks a system-scope invariant
    /// with no ownership edge. Every call allocates a fresh node.
    pub fn add_invariant(
        &mut self,
        entity: Option<&str>,
        description: &str,
        formal: Option<&str>,
    ) -> NodeId {
        let scope = if entity.is_none() {
            Scope::System
        } else {
            Scope::Entity
        };
        let id = self.alloc(Node::Invariant(InvariantNode {
            entity: entity.map(str::to_string),
            description: description.to_string(),
            formal: formal.map(str::to_string),
            scope,
        }));
        if let Some(owner_name) = entity {
            if let Some(&owner) = self.entity_index.get(owner_name) {
                self.add_edge(owner, id, EdgeKind::HasInvariant);
            }
        }
        id
    }

    /// Add one transition edge between the `(entity, state)`-identified
    /// nodes. Endpoint states that were never declared are created as
    /// placeholders so the edge still exists; the reference integrity
    /// validator reports them.
    pub fn add_transition(
        &mut self,
        entity: &str,
        from_state: &str,
        to_state: &str,
        trigger: Option<&str>,
        guards: &[String],
        effects: &[String],
    ) {
        let from = self.ensure_state(entity, from_state);
        let to = self.ensure_state(entity, to_state);
        self.add_edge(
            from,
            to,
            EdgeKind::Transition(TransitionEdge {
                trigger: trigger.map(str::to_string),
                guards: guards.to_vec(),
                effects: effects.to_vec(),
            }),
        );
    }

    /// Add one relationship edge between two entities. Unknown entity names
    /// get placeholder nodes; unrecognized `rel_type` strings fall back to
    /// `depends_on` (see [`RelKind::parse_lenient`]).
    pub fn add_relationship(
        &mut self,
        from_entity: &str,
        to_entity: &str,
        rel_type: &str,
        conditions: &[String],
    ) {
        let kind = RelKind::parse_lenient(rel_type);
        let from = self.ensure_entity(from_entity);
        let to = self.ensure_entity(to_entity);
        self.add_edge(
            from,
            to,
            EdgeKind::Relationship(RelationshipEdge {
                kind,
                conditions: conditions.to_vec(),
            }),
        );
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// All declared entity names, in insertion order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entity_order
            .iter()
            .filter_map(|&id| match &self.nodes[id.0] {
                Node::Entity(e) => Some(e.name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Metadata for a declared entity.
    pub fn entity_meta(&self, name: &str) -> Option<&EntityNode> {
        let id = self.entity_index.get(name)?;
        match &self.nodes[id.0] {
            Node::Entity(e) if e.declared => Some(e),
            _ => None,
        }
    }

    /// Declared states of an entity, in declaration order.
    pub fn states_for(&self, entity: &str) -> Vec<&StateNode> {
        let Some(&id) = self.entity_index.get(entity) else {
            return Vec::new();
        };
        self.outgoing[id.0]
            .iter()
            .filter_map(|&edge| {
                let edge = &self.edges[edge];
                match edge.kind {
                    EdgeKind::HasState => match &self.nodes[edge.to.0] {
                        Node::State(s) => Some(s),
                        _ => None,
                    },
                    _ => None,
                }
            })
            .collect()
    }

    /// Name of the state marked initial. With several marked, the first in
    /// declaration order wins (the model is not rejected; see the validators
    /// for the policy discussion).
    pub fn initial_state(&self, entity: &str) -> Option<&str> {
        self.states_for(entity)
            .into_iter()
            .find(|s| s.initial)
            .map(|s| s.name.as_str())
    }

    /// Names of states marked terminal, in declaration order.
    pub fn terminal_states(&self, entity: &str) -> Vec<&str> {
        self.states_for(entity)
            .into_iter()
            .filter(|s| s.terminal)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Outgoing transitions from `(entity, state)`, in declaration order.
    pub fn transitions_from(&self, entity: &str, state: &str) -> Vec<TransitionInfo> {
        let Some(&id) = self
            .state_index
            .get(entity)
            .and_then(|states| states.get(state))
        else {
            return Vec::new();
        };
        self.outgoing[id.0]
            .iter()
            .filter_map(|&edge| {
                let edge = &self.edges[edge];
                let EdgeKind::Transition(t) = &edge.kind else {
                    return None;
                };
                let to = match &self.nodes[edge.to.0] {
                    Node::State(s) => s.name.clone(),
                    _ => return None,
                };
                Some(TransitionInfo {
                    from: state.to_string(),
                    to,
                    trigger: t.trigger.clone(),
                    guards: t.guards.clone(),
                    effects: t.effects.clone(),
                })
            })
            .collect()
    }

    /// Whether an entity participates in any relationship edge, incoming or
    /// outgoing.
    pub fn has_any_relationships(&self, entity: &str) -> bool {
        let Some(&id) = self.entity_index.get(entity) else {
            return false;
        };
        self.outgoing[id.0]
            .iter()
            .chain(self.incoming[id.0].iter())
            .any(|&edge| matches!(self.edges[edge].kind, EdgeKind::Relationship(_)))
    }

    /// All relationship edges touching an entity, outgoing first, each tagged
    /// with its direction.
    pub fn relationships_for(&self, entity: &str) -> Vec<RelationshipInfo> {
        let Some(&id) = self.entity_index.get(entity) else {
            return Vec::new();
        };
        let mut result = Vec::new();
        for &edge in &self.outgoing[id.0] {
            let edge = &self.edges[edge];
            if let EdgeKind::Relationship(rel) = &edge.kind {
                result.push(RelationshipInfo {
                    kind: rel.kind,
                    other: self.entity_name_of(edge.to),
                    direction: Direction::Outgoing,
                });
            }
        }
        for &edge in &self.incoming[id.0] {
            let edge = &self.edges[edge];
            if let EdgeKind::Relationship(rel) = &edge.kind {
                result.push(RelationshipInfo {
                    kind: rel.kind,
                    other: self.entity_name_of(edge.from),
                    direction: Direction::Incoming,
                });
            }
        }
        result
    }

    /// All relationship edges in the graph as `(from, to, kind)` triples, in
    /// edge insertion order.
    pub fn iter_relationships(&self) -> impl Iterator<Item = (&str, &str, RelKind)> + '_ {
        self.edges.iter().filter_map(|edge| {
            let EdgeKind::Relationship(rel) = &edge.kind else {
                return None;
            };
            let from = match &self.nodes[edge.from.0] {
                Node::Entity(e) => e.name.as_str(),
                _ => return None,
            };
            let to = match &self.nodes[edge.to.0] {
                Node::Entity(e) => e.name.as_str(),
                _ => return None,
            };
            Some((from, to, rel.kind))
        })
    }

    /// Set of declared state names reachable from the initial state by
    /// following transition edges only. Empty when no initial state exists.
    ///
    /// Breadth-first traversal with a FIFO queue; ownership and relationship
    /// edges are never followed, and traversal passes through placeholder
    /// states without counting them.
    pub fn reachable_states(&self, entity: &str) -> FxHashSet<String> {
        let mut reachable = FxHashSet::default();
        let Some(initial) = self.initial_state(entity) else {
            return reachable;
        };
        let Some(&start) = self
            .state_index
            .get(entity)
            .and_then(|states| states.get(initial))
        else {
            return reachable;
        };

        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if let Node::State(state) = &self.nodes[current.0] {
                if state.declared {
                    reachable.insert(state.name.clone());
                }
            }
            for &edge in &self.outgoing[current.0] {
                let edge = &self.edges[edge];
                if matches!(edge.kind, EdgeKind::Transition(_)) && visited.insert(edge.to) {
                    queue.push_back(edge.to);
                }
            }
        }

        reachable
    }

    /// Declared states with zero outgoing transition edges, in declaration
    /// order.
    pub fn states_without_outgoing(&self, entity: &str) -> Vec<&str> {
        let Some(&entity_id) = self.entity_index.get(entity) else {
            return Vec::new();
        };
        self.outgoing[entity_id.0]
            .iter()
            .filter_map(|&edge| {
                let edge = &self.edges[edge];
                if !matches!(edge.kind, EdgeKind::HasState) {
                    return None;
                }
                let Node::State(state) = &self.nodes[edge.to.0] else {
                    return None;
                };
                let has_outgoing = self.outgoing[edge.to.0]
                    .iter()
                    .any(|&e| matches!(self.edges[e].kind, EdgeKind::Transition(_)));
                if has_outgoing {
                    None
                } else {
                    Some(state.name.as_str())
                }
            })
            .collect()
    }

    fn entity_name_of(&self, id: NodeId) -> String {
        match &self.nodes[id.0] {
            Node::Entity(e) => e.name.clone(),
            _ => String::new(),
        }
    }
}
