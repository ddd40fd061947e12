//! Parses model, start, and target documents (JSON) into a [`Model`] and
//! [`State`]s.
//!
//! Deserialization produces intermediate "raw" structs that mirror the
//! document shape; [`load_model`] then resolves them into the model's
//! index-addressed tables via [`Model::build`], surfacing every
//! unresolvable reference as a [`QrError::ConfigError`] rather than a
//! panic.

use crate::error::{QrError, Result};
use crate::model::{Entity, EntityRelation, Model, RelationKind};
use crate::state::State;
use crate::value::{Derivative, Landmark, Sign};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct RawEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawEntityRelation {
    name: String,
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct RawQuantity {
    name: String,
    possible_magnitudes: Vec<String>,
    #[serde(default)]
    random_allowed: bool,
}

#[derive(Debug, Deserialize)]
struct RawValueConstraint {
    sign: String,
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct RawRelation {
    #[serde(rename = "type")]
    kind: String,
    sign: String,
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(default)]
    entities: Vec<RawEntity>,
    #[serde(default)]
    entity_relations: Vec<RawEntityRelation>,
    quantities: Vec<RawQuantity>,
    #[serde(default)]
    value_constraints: Vec<RawValueConstraint>,
    #[serde(default)]
    relations: Vec<RawRelation>,
}

fn parse_sign(raw: &str) -> Result<Sign> {
    match raw {
        "+" => Ok(Sign::Positive),
        "-" => Ok(Sign::Negative),
        other => Err(QrError::ConfigError(format!("unknown sign '{other}'"))),
    }
}

fn parse_relation_kind(raw: &str) -> Result<RelationKind> {
    match raw {
        "Influence" => Ok(RelationKind::Influence),
        "Proportion" => Ok(RelationKind::Proportional),
        other => Err(QrError::ConfigError(format!("unknown relation type '{other}'"))),
    }
}

fn parse_landmark_list(names: &[String], quantity_name: &str) -> Result<Vec<Landmark>> {
    names
        .iter()
        .map(|name| {
            Landmark::from_name(name).ok_or_else(|| {
                QrError::ConfigError(format!(
                    "quantity '{quantity_name}' names unknown landmark '{name}'"
                ))
            })
        })
        .collect()
}

/// Parse a model document's JSON text into a [`Model`].
pub fn load_model(json: &str) -> Result<Model> {
    let raw: RawModel = serde_json::from_str(json)?;

    let entity_names: std::collections::HashSet<&str> =
        raw.entities.iter().map(|e| e.name.as_str()).collect();
    let mut entity_relations = Vec::with_capacity(raw.entity_relations.len());
    for r in &raw.entity_relations {
        if !entity_names.contains(r.from.as_str()) {
            return Err(QrError::ConfigError(format!(
                "entity relation '{}' references undeclared entity '{}'",
                r.name, r.from
            )));
        }
        if !entity_names.contains(r.to.as_str()) {
            return Err(QrError::ConfigError(format!(
                "entity relation '{}' references undeclared entity '{}'",
                r.name, r.to
            )));
        }
        entity_relations.push(EntityRelation {
            name: r.name.clone().into(),
            from: r.from.clone().into(),
            to: r.to.clone().into(),
        });
    }

    let entities = raw.entities.into_iter().map(|e| Entity::new(e.name)).collect();

    let mut quantity_specs = Vec::with_capacity(raw.quantities.len());
    for q in &raw.quantities {
        let magnitudes = parse_landmark_list(&q.possible_magnitudes, &q.name)?;
        quantity_specs.push((q.name.clone(), magnitudes, Derivative::ALL.to_vec(), q.random_allowed));
    }

    let mut relation_specs = Vec::with_capacity(raw.relations.len() + raw.value_constraints.len());
    for r in &raw.relations {
        let kind = parse_relation_kind(&r.kind)?;
        let sign = parse_sign(&r.sign)?;
        relation_specs.push((kind, sign, r.from.clone(), r.to.clone()));
    }
    for vc in &raw.value_constraints {
        let sign = parse_sign(&vc.sign)?;
        relation_specs.push((RelationKind::ValueConstraint, sign, vc.from.clone(), vc.to.clone()));
    }

    Model::build(entities, entity_relations, quantity_specs, relation_specs)
}

/// Parse a start/target document's JSON text — a mapping from quantity
/// name to a `[magnitude_code, derivative_code]` pair — into a [`State`]
/// ordered to match `model`'s declared quantity order.
pub fn load_state(model: &Model, json: &str) -> Result<State> {
    let raw: HashMap<String, [i8; 2]> = serde_json::from_str(json)?;

    let mut values = Vec::with_capacity(model.len());
    for quantity in &model.quantities {
        let [magnitude_code, derivative_code] = raw.get(quantity.name.as_ref()).ok_or_else(|| {
            QrError::ConfigError(format!(
                "start/target document missing quantity '{}'",
                quantity.name
            ))
        })?;
        let magnitude = Landmark::from_code(*magnitude_code).ok_or_else(|| {
            QrError::ConfigError(format!(
                "quantity '{}' has unknown magnitude code {magnitude_code}",
                quantity.name
            ))
        })?;
        let derivative = Derivative::from_code(*derivative_code).ok_or_else(|| {
            QrError::ConfigError(format!(
                "quantity '{}' has unknown derivative code {derivative_code}",
                quantity.name
            ))
        })?;
        values.push((magnitude, derivative));
    }

    Ok(State::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINK_MODEL_JSON: &str = r#"
    {
        "entities": [{"name": "container"}],
        "entity_relations": [],
        "quantities": [
            {"name": "inflow", "possible_magnitudes": ["NULL", "POS"], "random_allowed": true},
            {"name": "volume", "possible_magnitudes": ["NULL", "POS", "MAX"]},
            {"name": "outflow", "possible_magnitudes": ["NULL", "POS", "MAX"]}
        ],
        "value_constraints": [
            {"sign": "+", "from": "volume", "to": "outflow"}
        ],
        "relations": [
            {"type": "Influence", "sign": "+", "from": "inflow", "to": "volume"},
            {"type": "Influence", "sign": "-", "from": "outflow", "to": "volume"},
            {"type": "Proportion", "sign": "+", "from": "volume", "to": "outflow"}
        ]
    }
    "#;

    #[test]
    fn loads_sink_model_with_value_constraints_and_relations() {
        let model = load_model(SINK_MODEL_JSON).unwrap();
        assert_eq!(model.len(), 3);
        assert_eq!(model.value_constraints().count(), 1);
        assert!(model.has_randomized_quantities());
    }

    #[test]
    fn rejects_unknown_relation_type() {
        let json = r#"{"quantities": [{"name":"a","possible_magnitudes":["NULL"]}], "relations": [{"type":"Bogus","sign":"+","from":"a","to":"a"}]}"#;
        let err = load_model(json).unwrap_err();
        assert!(matches!(err, QrError::ConfigError(_)));
    }

    #[test]
    fn rejects_entity_relation_referencing_undeclared_entity() {
        let json = r#"
        {
            "entities": [{"name": "container"}],
            "entity_relations": [{"name": "Above of", "from": "container", "to": "ghost"}],
            "quantities": [{"name": "a", "possible_magnitudes": ["NULL"]}]
        }
        "#;
        let err = load_model(json).unwrap_err();
        assert!(matches!(err, QrError::ConfigError(_)));
    }

    #[test]
    fn loads_start_state_in_quantity_order() {
        let model = load_model(SINK_MODEL_JSON).unwrap();
        let state_json = r#"{"inflow": [0, 0], "volume": [0, 0], "outflow": [0, 0]}"#;
        let state = load_state(&model, state_json).unwrap();
        assert_eq!(state.len(), 3);
        assert_eq!(state.magnitude(0), Landmark::Null);
    }

    #[test]
    fn missing_quantity_in_state_document_is_config_error() {
        let model = load_model(SINK_MODEL_JSON).unwrap();
        let state_json = r#"{"inflow": [0, 0], "volume": [0, 0]}"#;
        let err = load_state(&model, state_json).unwrap_err();
        assert!(matches!(err, QrError::ConfigError(_)));
    }
}
