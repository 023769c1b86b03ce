use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use ontograph::ontology::{
    ConceptGraph, DocumentSource, ExportDocument, GraphBuilder, OntologyService, RdfXmlDocument,
    RelationType, SourceError,
};
use rstest::{fixture, rstest};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/instruments.owl")
}

#[fixture]
fn graph() -> ConceptGraph {
    let store = RdfXmlDocument::new(fixture_path())
        .load()
        .expect("fixture parses after markup cleaning");
    GraphBuilder::default().build(&store)
}

#[rstest]
fn declared_classes_come_first_then_stubs(graph: ConceptGraph) {
    let ids: Vec<_> = graph.nodes().iter().map(|node| node.id()).collect();
    assert_eq!(
        ids,
        vec![
            "MS:1000031",
            "MS:1000463",
            "MS:1000458",
            "MS:1000008",
            "MS:1000443",
            "UO_0000000",
        ]
    );
}

#[rstest]
fn bilingual_text_is_extracted(graph: ConceptGraph) {
    let model = graph.get("MS:1000031").expect("instrument model");
    assert_eq!(model.label(), Some("instrument model"));
    assert_eq!(model.label_zh(), Some("仪器型号"));
    assert_eq!(
        model.definition(),
        Some("Instrument model name not including the vendor's name.")
    );
    assert_eq!(model.definition_zh(), Some("不包括供应商名称的仪器型号名称。"));
    assert_eq!(
        model.iri(),
        Some("http://purl.obolibrary.org/obo/MS_1000031")
    );

    let instrument = graph.get("MS:1000463").expect("instrument");
    assert_eq!(instrument.label_zh(), Some("仪器 & 设备"));
    let source = graph.get("MS:1000458").expect("source");
    assert_eq!(source.definition(), Some("m/z < 10 的离子产生区域。"));
    assert_eq!(source.definition_zh(), Some("m/z < 10 的离子产生区域。"));
}

#[rstest]
fn restriction_yields_part_of_edge(graph: ConceptGraph) {
    let source = graph.get("MS:1000458").expect("source");
    assert_eq!(source.parents().len(), 1);
    assert_eq!(source.parents()[0].parent_id, "MS:1000463");
    assert_eq!(source.parents()[0].relation_type, RelationType::PartOf);

    let instrument = graph.get("MS:1000463").expect("instrument");
    assert!(instrument
        .children()
        .iter()
        .any(|c| c.child_id == "MS:1000458" && c.relation_type == RelationType::PartOf));
    assert!(!instrument.is_leaf());
}

#[rstest]
fn undeclared_parent_is_a_queryable_stub(graph: ConceptGraph) {
    let stub = graph.get("UO_0000000").expect("stub");
    assert!(stub.is_stub());
    assert_eq!(stub.count(), 1);
    assert_eq!(stub.children()[0].child_id, "MS:1000443");
}

#[rstest]
fn graph_invariants_hold(graph: ConceptGraph) {
    for node in graph.nodes() {
        assert_eq!(node.count(), node.children().len());
        assert_eq!(node.is_leaf(), node.count() == 0);
        for parent in node.parents() {
            let owner = graph.get(&parent.parent_id).expect("parent is a node");
            assert!(owner
                .children()
                .iter()
                .any(|c| c.child_id == node.id() && c.relation_type == parent.relation_type));
        }
        for child in node.children() {
            let owner = graph.get(&child.child_id).expect("child is a node");
            assert!(owner
                .parents()
                .iter()
                .any(|p| p.parent_id == node.id() && p.relation_type == child.relation_type));
        }
    }
}

#[rstest]
fn statistics_match_the_fixture(graph: ConceptGraph) {
    let stats = graph.statistics();
    assert_eq!(stats.total_terms, 6);
    assert_eq!(stats.total_classes, 6);
    assert_eq!(stats.sub_class_of_relations, 3);
    assert_eq!(stats.part_of_relations, 1);
    assert_eq!(stats.total_relations, 4);
    assert_eq!(stats.leaf_nodes, 2);
    assert_eq!(stats.max_depth, 1);
}

#[rstest]
#[case("", 6)]
#[case("仪器", 2)]
#[case("SOURCE", 1)]
#[case("analyzer", 1)]
#[case("chromatography", 0)]
fn search_counts(graph: ConceptGraph, #[case] query: &str, #[case] expected: usize) {
    assert_eq!(graph.search(query).count(), expected);
}

#[test]
fn service_exports_what_it_serves() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = OntologyService::new(
        Arc::new(RdfXmlDocument::new(fixture_path())),
        GraphBuilder::default(),
        Duration::from_secs(60),
    )
    .with_export_dir(dir.path());

    let stats = service.statistics().expect("statistics");
    let path = service.export_snapshot(None).expect("export");
    let document = ExportDocument::read(&path).expect("read export");

    assert_eq!(document.metadata.total_nodes, stats.total_terms);
    for node in service.get_all().expect("all") {
        assert_eq!(document.nodes.get(node.id()), Some(&node));
    }
    assert_eq!(service.build_count(), 1);
}

#[test]
fn missing_document_surfaces_as_unavailable() {
    let service = OntologyService::new(
        Arc::new(RdfXmlDocument::new("tests/fixtures/missing.owl")),
        GraphBuilder::default(),
        Duration::from_secs(60),
    );
    let err = service.get_all().expect_err("missing document");
    assert!(matches!(
        err,
        ontograph::ontology::OntologyServiceError::SourceUnavailable(SourceError::Io { .. })
    ));
}
