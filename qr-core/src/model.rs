//! The declarative model schema: entities, quantities, and relations.
//!
//! Quantities and relations are stored in flat, index-addressed tables
//! rather than as an owning graph of pointers — a quantity's incoming and
//! outgoing relation lists hold `(RelationId, QuantityId)` pairs into the
//! model's relation table, so the model owns everything and nothing is
//! self-referential.

use crate::error::{QrError, Result};
use crate::value::{Landmark, Sign};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Index of a quantity within a [`Model`]'s quantity table.
pub type QuantityId = usize;

/// Index of a relation within a [`Model`]'s relation table.
pub type RelationId = usize;

/// A named, otherwise opaque object that exists only to carry
/// [`EntityRelation`]s. Entities and entity relations are never read by the
/// solver; they document structural context for the model's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// The entity's name.
    pub name: Arc<str>,
}

impl Entity {
    /// Create a new entity.
    pub fn new(name: impl Into<String>) -> Self {
        Entity {
            name: Arc::from(name.into().into_boxed_str()),
        }
    }
}

/// A named directed relation between two entities, carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRelation {
    /// The relation's name (e.g. `"Above of"`).
    pub name: Arc<str>,
    /// Source entity name.
    pub from: Arc<str>,
    /// Target entity name.
    pub to: Arc<str>,
}

/// The kind of a [`Relation`] between two quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    /// The source's magnitude contributes to the target's derivative.
    Influence,
    /// The source's derivative contributes to the target's derivative.
    Proportional,
    /// The target's magnitude must equal the source's magnitude.
    ValueConstraint,
}

/// A signed, directed relation between two quantities.
///
/// `Influence` and `Proportional` feed the admissibility filter's
/// derivative-consistency rule (§4.1(4)); `ValueConstraint` feeds its
/// magnitude-equality rule (§4.1(3)). See [`crate::admissibility`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// What kind of relation this is.
    pub kind: RelationKind,
    /// The relation's sign.
    pub sign: Sign,
    /// Source quantity.
    pub from: QuantityId,
    /// Target quantity.
    pub to: QuantityId,
}

/// A named variable ranging over a subset of the landmark set, with an
/// ordered tuple of possible derivatives and an optional exogenous
/// ("randomized") flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantity {
    /// The quantity's name.
    pub name: Arc<str>,
    /// Ordered tuple of possible magnitudes (landmark order preserved).
    pub possible_magnitudes: Vec<Landmark>,
    /// Ordered tuple of possible derivatives. Defaults to `(-1, 0, +1)`.
    pub possible_derivatives: Vec<crate::value::Derivative>,
    /// Whether this quantity's derivative may change spontaneously by ±1
    /// per transition, independent of relation propagation.
    pub randomized: bool,
    /// `(RelationId, QuantityId)` pairs for relations where this quantity
    /// is the target, paired with the relation's source quantity.
    pub incoming: Vec<(RelationId, QuantityId)>,
    /// `(RelationId, QuantityId)` pairs for relations where this quantity
    /// is the source, paired with the relation's target quantity.
    pub outgoing: Vec<(RelationId, QuantityId)>,
}

impl Quantity {
    /// The index, within `possible_magnitudes`, of this quantity's lowest
    /// landmark — the magnitude below which it cannot decrease.
    pub fn min_magnitude_index(&self) -> usize {
        0
    }
}

/// The full declarative model: entities, quantities, and relations.
///
/// Quantities and relations live in flat `Vec`s addressed by
/// [`QuantityId`]/[`RelationId`]; quantities reference relations (and vice
/// versa) only through those indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Entities declared by the model (opaque to the solver).
    pub entities: Vec<Entity>,
    /// Entity relations declared by the model (opaque to the solver).
    pub entity_relations: Vec<EntityRelation>,
    /// Quantities, in declaration order. This order fixes the key order
    /// used by every [`crate::state::State`].
    pub quantities: Vec<Quantity>,
    /// All relations (influences, proportionals, value constraints).
    pub relations: Vec<Relation>,
}

impl Model {
    /// Build a model from entities, quantities, and relations, resolving
    /// quantity name references and populating each quantity's
    /// incoming/outgoing index lists.
    ///
    /// `quantity_specs` is `(name, possible_magnitudes, possible_derivatives, randomized)`.
    /// `relation_specs` is `(kind, sign, from_name, to_name)`.
    pub fn build(
        entities: Vec<Entity>,
        entity_relations: Vec<EntityRelation>,
        quantity_specs: Vec<(String, Vec<Landmark>, Vec<crate::value::Derivative>, bool)>,
        relation_specs: Vec<(RelationKind, Sign, String, String)>,
    ) -> Result<Model> {
        let mut name_to_id: HashMap<String, QuantityId> = HashMap::new();
        let mut quantities: Vec<Quantity> = Vec::with_capacity(quantity_specs.len());

        for (id, (name, magnitudes, derivatives, randomized)) in
            quantity_specs.into_iter().enumerate()
        {
            if magnitudes.is_empty() {
                return Err(QrError::ConfigError(format!(
                    "quantity '{name}' declares no possible magnitudes"
                )));
            }
            if name_to_id.insert(name.clone(), id).is_some() {
                return Err(QrError::ConfigError(format!(
                    "quantity '{name}' declared more than once"
                )));
            }
            quantities.push(Quantity {
                name: Arc::from(name.into_boxed_str()),
                possible_magnitudes: magnitudes,
                possible_derivatives: derivatives,
                randomized,
                incoming: Vec::new(),
                outgoing: Vec::new(),
            });
        }

        let mut relations = Vec::with_capacity(relation_specs.len());
        for (kind, sign, from_name, to_name) in relation_specs {
            let from = *name_to_id.get(&from_name).ok_or_else(|| {
                QrError::ConfigError(format!("relation references undeclared quantity '{from_name}'"))
            })?;
            let to = *name_to_id.get(&to_name).ok_or_else(|| {
                QrError::ConfigError(format!("relation references undeclared quantity '{to_name}'"))
            })?;

            let relation_id = relations.len();
            relations.push(Relation { kind, sign, from, to });

            quantities[to].incoming.push((relation_id, from));
            quantities[from].outgoing.push((relation_id, to));
        }

        Ok(Model {
            entities,
            entity_relations,
            quantities,
            relations,
        })
    }

    /// Number of quantities in the model.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Whether the model declares zero quantities (Scenario S2).
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Look up a quantity's index by name.
    pub fn quantity_id(&self, name: &str) -> Option<QuantityId> {
        self.quantities.iter().position(|q| q.name.as_ref() == name)
    }

    /// Relations of kind [`RelationKind::ValueConstraint`].
    pub fn value_constraints(&self) -> impl Iterator<Item = &Relation> {
        self.relations
            .iter()
            .filter(|r| r.kind == RelationKind::ValueConstraint)
    }

    /// Whether any quantity is flagged as randomized (exogenous).
    pub fn has_randomized_quantities(&self) -> bool {
        self.quantities.iter().any(|q| q.randomized)
    }

    /// Indices of all randomized quantities.
    pub fn randomized_quantities(&self) -> impl Iterator<Item = QuantityId> + '_ {
        self.quantities
            .iter()
            .enumerate()
            .filter(|(_, q)| q.randomized)
            .map(|(id, _)| id)
    }
}
