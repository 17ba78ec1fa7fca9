use std::{collections::BTreeSet, path::PathBuf};

use ontosim::{
    config::Config,
    ontology::{ClassId, EntityId, ImportanceFilter, Ontology, TsvRepository},
};
use rstest::{fixture, rstest};

fn class(text: &str) -> ClassId {
    ClassId::new(text).expect("valid class id")
}

fn entity(text: &str) -> EntityId {
    EntityId::new(text).expect("valid entity id")
}

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn simple_repository() -> TsvRepository {
    let dir = fixture_dir().join("simple");
    TsvRepository::new(
        dir.join("class_labels.tsv"),
        dir.join("class_edges.tsv"),
        dir.join("annotations.tsv"),
        dir.join("entity_labels.tsv"),
    )
}

#[fixture]
fn simple() -> Ontology {
    Ontology::build(&simple_repository(), &Config::default()).expect("fixture builds")
}

#[rstest]
#[case("HMC:0042", "AAAAAAAAAAA!!!")]
#[case("HMC:3141", "BBBBBBBBBBB!!!")]
#[case("HMC:1111", "CCCCCCCCCCC!!!")]
#[case("HMC:2222", "DDDDDDDDDDD!!!")]
#[case("HMC:3333", "EEEEEEEEEEE!!!")]
fn class_names_are_loaded(simple: Ontology, #[case] id: &str, #[case] name: &str) {
    assert_eq!(simple.class_name(&class(id)), Some(name));
}

#[rstest]
#[case("PI:1", "Spam Deficiency")]
#[case("PI:2", "Sleep Deprivation")]
#[case("PI:3", "Pyromania")]
#[case("PI:4", "Social Anxiety")]
#[case("PI:5", "Other")]
fn entity_names_are_loaded(simple: Ontology, #[case] id: &str, #[case] name: &str) {
    assert_eq!(simple.entity_name(&entity(id)), Some(name));
}

#[rstest]
fn annotations_are_direct_only(simple: Ontology) {
    let classes = simple.annotations().classes_of(&entity("PI:3"));
    assert!(classes.contains(&class("HMC:2222")));
    assert!(classes.contains(&class("HMC:3333")));
    assert!(!classes.contains(&class("HMC:3141")));
}

#[rstest]
fn root_is_the_top_class(simple: Ontology) {
    assert_eq!(simple.root(), Some(&class("HMC:0042")));
}

#[rstest]
#[case("HMC:2222", "HMC:3333", "HMC:3141")]
#[case("HMC:1111", "HMC:3333", "HMC:3333")]
#[case("HMC:1111", "HMC:2222", "HMC:3141")]
#[case("HMC:0042", "HMC:1111", "HMC:0042")]
fn computes_least_common_subsumer(
    simple: Ontology,
    #[case] first: &str,
    #[case] second: &str,
    #[case] expected: &str,
) {
    assert_eq!(
        simple.compute_lcs(&class(first), &class(second)),
        Some(class(expected))
    );
}

#[rstest]
fn lcs_is_symmetric_reflexive_and_a_common_ancestor(simple: Ontology) {
    let graph = simple.graph();
    let classes: Vec<ClassId> = graph.nodes().map(|node| node.id().clone()).collect();

    for a in &classes {
        assert_eq!(simple.compute_lcs(a, a).as_ref(), Some(a));
        for b in &classes {
            let forward = simple.compute_lcs(a, b);
            assert_eq!(forward, simple.compute_lcs(b, a));

            let common: BTreeSet<ClassId> = graph
                .ancestors(a)
                .intersection(&graph.ancestors(b))
                .cloned()
                .collect();
            let lcs = forward.expect("single-rooted fixture always has an LCS");
            assert!(common.contains(&lcs));
        }
    }
}

#[rstest]
fn cached_results_are_stable(simple: Ontology) {
    let first = simple.compute_lcs(&class("HMC:2222"), &class("HMC:1111"));
    simple.compute_lcs(&class("HMC:3333"), &class("HMC:0042"));
    simple.compute_lcs(&class("HMC:2222"), &class("HMC:3333"));
    let again = simple.compute_lcs(&class("HMC:1111"), &class("HMC:2222"));

    assert_eq!(first, again);
    assert_eq!(simple.cache_stats().hits, 1);
}

#[rstest]
fn derived_annotations_grow_towards_the_root(simple: Ontology) {
    let graph = simple.graph();
    let derived = |id: &ClassId| -> BTreeSet<EntityId> {
        graph
            .descendants(id)
            .iter()
            .filter_map(|descendant| graph.node(descendant))
            .flat_map(|node| node.given_annotations().iter().cloned())
            .collect()
    };

    for node in graph.nodes() {
        let own = derived(node.id());
        for child in graph.children(node.id()) {
            assert!(own.is_superset(&derived(&child)));
        }
        for parent in graph.parents(node.id()) {
            let parent_ic = simple.ic_score(&parent).expect("scored");
            assert!(parent_ic <= node.ic_score());
        }
    }
}

#[test]
fn small_tree_scenario() {
    let ontology = Ontology::builder()
        .edge("A", "R")
        .edge("B", "R")
        .edge("C", "A")
        .annotation("e1", "C")
        .annotation("e2", "B")
        .build()
        .expect("valid records");
    let graph = ontology.graph();

    assert_eq!(
        graph.ancestors(&class("C")),
        BTreeSet::from([class("C"), class("A"), class("R")])
    );
    assert_eq!(
        graph.ancestors(&class("B")),
        BTreeSet::from([class("B"), class("R")])
    );
    assert_eq!(ontology.compute_lcs(&class("C"), &class("B")), Some(class("R")));
}

#[test]
fn class_without_annotations_gets_capped_score() {
    let ontology = Ontology::builder()
        .edge("A", "R")
        .edge("B", "R")
        .edge("C", "A")
        .edge("D", "R")
        .annotation("e1", "C")
        .annotation("e2", "B")
        .annotation("e3", "A")
        .annotation("e4", "B")
        .build()
        .expect("valid records");

    let summary = ontology.ic_summary();
    assert_eq!(summary.degenerate, 1);
    assert_eq!(ontology.ic_score(&class("D")), Some(3.0));
    assert!(ontology
        .graph()
        .nodes()
        .all(|node| node.ic_score().is_finite() && node.is_scored()));

    // D only shares the root with everything else
    assert_eq!(ontology.compute_lcs(&class("D"), &class("C")), Some(class("R")));
    assert_eq!(ontology.compute_lcs(&class("D"), &class("D")), Some(class("D")));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
#[case(10)]
fn importance_filter_respects_budget(simple: Ontology, #[case] k: usize) {
    let important = ImportanceFilter::select(simple.graph(), k);
    let expected = k.min(simple.graph().node_count());

    if important.excluded_ties() == 0 {
        assert_eq!(important.len(), expected);
    } else {
        assert!(important.len() < expected);
        assert!(important.len() + important.excluded_ties() >= k);
    }
}

#[test]
fn thresholding_from_legacy_options_file() {
    let config = Config::from_file(&fixture_dir().join("ontology.config")).expect("options load");
    assert!(config.thresholding.enable);
    assert_eq!(config.thresholding.max_important_nodes, 3);

    let ontology = Ontology::build(&simple_repository(), &config).expect("fixture builds");
    let important = ontology.important_nodes().expect("thresholding enabled");
    assert_eq!(important.len(), 3);
    for id in ["HMC:1111", "HMC:2222", "HMC:3333"] {
        assert!(important.contains(&class(id)));
    }

    assert_eq!(
        ontology.compute_lcs(&class("HMC:2222"), &class("HMC:3333")),
        Some(class("HMC:3141"))
    );
    assert_eq!(
        ontology.compute_lcs(&class("HMC:2222"), &class("HMC:3141")),
        Some(class("HMC:0042"))
    );
}

#[test]
fn missing_files_build_a_partial_ontology() {
    let dir = fixture_dir().join("simple");
    let repository = TsvRepository::new(
        dir.join("class_labels.tsv"),
        dir.join("class_edges.tsv"),
        dir.join("does_not_exist.tsv"),
        dir.join("entity_labels.tsv"),
    );

    let ontology = Ontology::build(&repository, &Config::default()).expect("partial build");
    assert_eq!(ontology.graph().node_count(), 5);
    assert_eq!(ontology.annotations().annotated_entity_count(), 0);
    assert_eq!(ontology.entities().len(), 5);
    assert_eq!(
        ontology.score_entity_pair(&entity("PI:1"), &entity("PI:2")).lcs,
        None
    );
}

#[test]
fn undecodable_annotation_row_only_drops_that_row() {
    let dir = fixture_dir().join("simple");
    let scratch = tempfile::tempdir().expect("temp dir");
    let annotations = scratch.path().join("annotations.tsv");
    std::fs::write(
        &annotations,
        b"PI:1\tHMC:1111\nPI:2\tHMC:2222\nPI:\xff3\tHMC:2222\nPI:5\tHMC:0042\n",
    )
    .expect("write annotations");
    let repository = TsvRepository::new(
        dir.join("class_labels.tsv"),
        dir.join("class_edges.tsv"),
        &annotations,
        scratch.path().join("entity_labels.tsv"),
    );

    let ontology = Ontology::build(&repository, &Config::default()).expect("build survives");
    assert_eq!(ontology.annotations().annotated_entity_count(), 3);
    assert_eq!(
        ontology.score_entity_pair(&entity("PI:1"), &entity("PI:2")).lcs,
        Some(class("HMC:3141"))
    );
}
