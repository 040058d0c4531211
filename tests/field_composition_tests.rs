
use std::collections::{HashMap, HashSet};

use pretty_assertions::assert_eq;
use test_case::test_case;

use composition_support::{init_tracing, pair, price_catalog, price_request, provenance};
use dataset_composition::{
    CandidateField, Composition, CompositionError, CompositionRequest, CompositionSummary,
    ConceptId, Field, FieldCompositionEngine, FieldId, FieldRole, JoinSpec, Model, ModelCatalog,
    ModelId,
};

#[test]
fn candidates_follow_primary_then_join_order() {
    init_tracing();
    let engine = FieldCompositionEngine::default();

    let candidates = engine
        .generate_candidate_fields(&price_catalog(), &price_request())
        .expect("generate");

    assert_eq!(
        provenance(&candidates),
        vec![
            pair("dm_sales", "sku"),
            pair("dm_sales", "store"),
            pair("dm_sales", "price"),
            pair("dm_sales", "revenue"),
            pair("dm_competitor", "sku"),
            pair("dm_competitor", "comp_price"),
            pair("dm_competitor", "source"),
            pair("dm_store", "store_id"),
            pair("dm_store", "city"),
        ]
    );
    assert_eq!(candidates[5].origin_model_name, "Competitor Prices");
    assert_eq!(candidates[5].default_alias, "Competitor Price");
}

#[test]
fn five_field_order_example() {
    let catalog = ModelCatalog::from_models([
        Model::new("primary", "Primary").with_fields(
            ["A", "B", "C"]
                .map(|id| Field::physical(id, id, id, FieldRole::Descriptive)),
        ),
        Model::new("secondary", "Secondary").with_fields(
            ["D", "E"].map(|id| Field::physical(id, id, id, FieldRole::Descriptive)),
        ),
    ])
    .expect("catalog");
    let request = CompositionRequest::new("primary").with_join(JoinSpec::left("secondary", "A = D"));

    let candidates = FieldCompositionEngine::default()
        .generate_candidate_fields(&catalog, &request)
        .expect("generate");

    assert_eq!(
        provenance(&candidates),
        vec![
            pair("primary", "A"),
            pair("primary", "B"),
            pair("primary", "C"),
            pair("secondary", "D"),
            pair("secondary", "E"),
        ]
    );
}

#[test]
fn generation_is_idempotent() {
    let engine = FieldCompositionEngine::default();
    let catalog = price_catalog();
    let request = price_request();

    let first = engine.generate_candidate_fields(&catalog, &request).unwrap();
    let second = engine.generate_candidate_fields(&catalog, &request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unused_fields_never_appear() {
    let candidates = FieldCompositionEngine::default()
        .generate_candidate_fields(&price_catalog(), &price_request())
        .unwrap();

    assert!(candidates.iter().all(|c| c.role() != FieldRole::Unused));
    assert!(!candidates.iter().any(|c| c.field_id().as_str() == "etl_ts"));
    assert!(!candidates.iter().any(|c| c.field_id().as_str() == "legacy"));
}

#[test]
fn collisions_are_detected_in_first_encounter_order() {
    let engine = FieldCompositionEngine::default();
    let composition = engine.compose(&price_catalog(), &price_request()).unwrap();

    let concepts: Vec<&str> = composition
        .collisions
        .iter()
        .map(|c| c.concept_id().as_str())
        .collect();
    assert_eq!(concepts, vec!["dim_product", "dim_store", "metric_unit_price"]);

    for collision in &composition.collisions {
        assert!(collision.members().len() >= 2);
        assert_eq!(collision.dominant().origin_model_id, ModelId::from("dm_sales"));
    }

    let unit_price = &composition.collisions[2];
    assert_eq!(
        provenance(unit_price.members()),
        vec![pair("dm_sales", "price"), pair("dm_competitor", "comp_price")]
    );
}

#[test]
fn collision_grouping_example() {
    let model = Model::new("m", "M");
    let candidates: Vec<CandidateField> = [("1", "P"), ("2", "Q"), ("3", "P")]
        .iter()
        .map(|(id, concept)| {
            let field =
                Field::physical(*id, *id, *id, FieldRole::MetricValue).with_concept(*concept);
            CandidateField::from_field(&model, &field)
        })
        .collect();

    let collisions = FieldCompositionEngine::default()
        .detect_concept_collisions(&candidates, &ModelId::from("m"));

    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].concept_id(), &ConceptId::from("P"));
    assert_eq!(
        collisions[0].members(),
        &[candidates[0].clone(), candidates[2].clone()]
    );
}

#[test]
fn dominant_default_is_primary_member_wherever_it_sits() {
    let secondary = Model::new("secondary", "Secondary");
    let primary = Model::new("primary", "Primary");
    let field = |id: &str| Field::physical(id, id, id, FieldRole::MetricValue).with_concept("P");

    let candidates = vec![
        CandidateField::from_field(&secondary, &field("s1")),
        CandidateField::from_field(&primary, &field("p1")),
        CandidateField::from_field(&secondary, &field("s2")),
    ];

    let collisions = FieldCompositionEngine::default()
        .detect_concept_collisions(&candidates, &ModelId::from("primary"));
    assert_eq!(collisions[0].dominant_field_id(), &FieldId::from("p1"));
}

#[test]
fn resolve_changes_only_dominant_field() {
    let engine = FieldCompositionEngine::default();
    let composition = engine.compose(&price_catalog(), &price_request()).unwrap();
    let collision = &composition.collisions[2];

    let resolved = engine
        .resolve_collision(collision, &FieldId::from("comp_price"))
        .expect("member id");

    assert_eq!(resolved.dominant_field_id(), &FieldId::from("comp_price"));
    assert_eq!(resolved.concept_id(), collision.concept_id());
    assert_eq!(resolved.members(), collision.members());

    // Serialized forms differ only in the dominant field id
    let mut before = serde_json::to_value(collision).unwrap();
    let after = serde_json::to_value(&resolved).unwrap();
    before["dominantFieldId"] = serde_json::json!("comp_price");
    assert_eq!(before, after);
}

#[test]
fn resolve_rejects_non_member() {
    let engine = FieldCompositionEngine::default();
    let composition = engine.compose(&price_catalog(), &price_request()).unwrap();

    let err = engine
        .resolve_collision(&composition.collisions[0], &FieldId::from("not-a-member-id"))
        .unwrap_err();
    assert_eq!(
        err,
        CompositionError::InvalidSelection(FieldId::from("not-a-member-id"))
    );
}

#[test]
fn shared_field_id_resolves_only_to_current_dominant() {
    let engine = FieldCompositionEngine::default();
    let composition = engine.compose(&price_catalog(), &price_request()).unwrap();
    let product = &composition.collisions[0];
    assert_eq!(
        provenance(product.members()),
        vec![pair("dm_sales", "sku"), pair("dm_competitor", "sku")]
    );

    // Keeping the current dominant is accepted and changes nothing
    let same = engine
        .resolve_collision(product, &FieldId::from("sku"))
        .unwrap();
    assert_eq!(&same, product);
    assert_eq!(same.dominant().origin_model_id, ModelId::from("dm_sales"));

    // Collapsing drops the competitor's sku, not the primary's
    let collapsed = engine.collapse_collisions(&composition.candidates, &[same]);
    assert!(collapsed.iter().any(|c| c.qualified_label() == "Sales.SKU"));
    assert!(!collapsed.iter().any(|c| c.qualified_label() == "Competitor Prices.Product"));
}

#[test]
fn composition_json_round_trips_and_rejects_broken_collisions() {
    let engine = FieldCompositionEngine::default();
    let composition = engine.compose(&price_catalog(), &price_request()).unwrap();

    let json = serde_json::to_value(&composition).unwrap();
    let back: Composition = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(back, composition);

    let mut stray_dominant = json.clone();
    stray_dominant["collisions"][2]["dominantFieldId"] = serde_json::json!("city");
    let err = serde_json::from_value::<Composition>(stray_dominant).unwrap_err();
    assert!(err.to_string().contains("field city is not a member"));

    let mut emptied = json;
    emptied["collisions"][1]["members"] = serde_json::json!([]);
    assert!(serde_json::from_value::<Composition>(emptied).is_err());
}

#[test]
fn selection_filtering_example() {
    let model = Model::new("m", "M");
    let candidates: Vec<CandidateField> = ["1", "2", "3", "4"]
        .iter()
        .map(|id| {
            let field = Field::physical(*id, *id, format!("Field {id}"), FieldRole::Descriptive);
            CandidateField::from_field(&model, &field)
        })
        .collect();

    let selected: HashSet<FieldId> = HashSet::from([FieldId::from("2"), FieldId::from("3")]);
    let overrides = HashMap::from([(FieldId::from("3"), "Custom Alias".to_string())]);

    let out = FieldCompositionEngine::default().apply_field_selection(
        &candidates,
        &selected,
        &overrides,
    );

    let got: Vec<(&str, &str)> = out
        .iter()
        .map(|s| (s.field_id().as_str(), s.alias.as_str()))
        .collect();
    assert_eq!(got, vec![("2", "Field 2"), ("3", "Custom Alias")]);
}

#[test_case(
    CompositionRequest::new("ghost"),
    CompositionError::UnknownModel(ModelId::from("ghost"));
    "unknown primary"
)]
#[test_case(
    CompositionRequest::new("dm_sales").with_join(JoinSpec::left("dm_missing", "x = y")),
    CompositionError::UnknownModel(ModelId::from("dm_missing"));
    "unknown secondary"
)]
#[test_case(
    CompositionRequest::new("dm_sales").with_join(JoinSpec::left("dm_sales", "x = y")),
    CompositionError::invalid_join("model dm_sales cannot be joined to itself as a secondary");
    "self join"
)]
#[test_case(
    CompositionRequest::new("dm_sales")
        .with_join(JoinSpec::left("dm_store", "a = b"))
        .with_join(JoinSpec::inner("dm_store", "a = b")),
    CompositionError::invalid_join("model dm_store is joined more than once");
    "repeated secondary"
)]
fn invalid_requests_are_rejected(request: CompositionRequest, expected: CompositionError) {
    let err = FieldCompositionEngine::default()
        .generate_candidate_fields(&price_catalog(), &request)
        .unwrap_err();
    assert_eq!(err, expected);
    assert!(err.is_validation_error());
}

#[test]
fn first_failing_join_wins() {
    let request = CompositionRequest::new("dm_sales")
        .with_join(JoinSpec::left("dm_missing", "x = y"))
        .with_join(JoinSpec::left("dm_sales", "x = y"));

    let err = FieldCompositionEngine::default()
        .generate_candidate_fields(&price_catalog(), &request)
        .unwrap_err();
    assert!(err.is_unknown_model());
}

#[test]
fn collapsed_view_keeps_one_field_per_concept() {
    let engine = FieldCompositionEngine::default();
    let composition = engine.compose(&price_catalog(), &price_request()).unwrap();

    let collapsed = engine.collapse_collisions(&composition.candidates, &composition.collisions);
    assert_eq!(
        provenance(&collapsed),
        vec![
            pair("dm_sales", "sku"),
            pair("dm_sales", "store"),
            pair("dm_sales", "price"),
            pair("dm_sales", "revenue"),
            pair("dm_competitor", "source"),
            pair("dm_store", "city"),
        ]
    );

    let mut per_concept: HashMap<&str, usize> = HashMap::new();
    for candidate in &collapsed {
        if let Some(concept) = candidate.concept_id() {
            *per_concept.entry(concept.as_str()).or_default() += 1;
        }
    }
    assert!(per_concept.values().all(|n| *n == 1));
}

#[test]
fn summary_reflects_composition() {
    let engine = FieldCompositionEngine::default();
    let composition = engine.compose(&price_catalog(), &price_request()).unwrap();

    let summary = CompositionSummary::of(&composition.candidates, &composition.collisions);
    assert_eq!(summary.total, 9);
    assert_eq!(summary.collisions, 3);
    assert_eq!(summary.derived, 1);
    assert_eq!(summary.role_count(FieldRole::DimensionKey), 4);
    assert_eq!(summary.role_count(FieldRole::MetricValue), 3);
    assert_eq!(summary.role_count(FieldRole::Descriptive), 2);
    assert_eq!(summary.role_count(FieldRole::Unused), 0);
}
