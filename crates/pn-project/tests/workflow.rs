//! Assign, catalog and authority steps chained the way callers use them.

use pn_branch::assign_branch_ids;
use pn_graph::{EdgeRecord, NodeRecord};
use pn_project::{AuthorityResponse, BranchUpdate, GraphSnapshot, apply_authority_response, sync_catalog};
use proptest::prelude::*;

fn network() -> GraphSnapshot {
    GraphSnapshot::new(
        vec![
            NodeRecord::new("G", "GENERAL"),
            NodeRecord::new("J", "JONCTION"),
            NodeRecord::new("A", ""),
            NodeRecord::new("B", ""),
            NodeRecord::new("C", ""),
        ],
        vec![
            EdgeRecord::new("E0", "J", "G"),
            EdgeRecord::new("E1", "A", "J").with_diameter(160.0),
            EdgeRecord::new("E2", "B", "J").with_diameter(90.0),
            EdgeRecord::new("E3", "C", "J").with_diameter(63.0),
        ],
    )
}

fn assigned() -> (GraphSnapshot, pn_branch::BranchReport) {
    let mut snapshot = network();
    let report = assign_branch_ids(&mut snapshot.nodes, &mut snapshot.edges);
    (snapshot, report)
}

#[test]
fn catalog_follows_assignment() {
    let (mut snapshot, report) = assigned();
    snapshot
        .style_meta
        .branch_names_by_id
        .insert("GENERAL-G:002".into(), "Annex".into());

    assert!(sync_catalog(&mut snapshot, &report));

    let ids: Vec<&str> = snapshot.branches.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["GENERAL-G:002", "GENERAL-G", "GENERAL-G:001"]);
    assert_eq!(snapshot.branches[0].name, "Annex");
    assert!(snapshot.branches[1].is_trunk);
    assert_eq!(snapshot.branches[2].parent_id.as_deref(), Some("GENERAL-G"));

    assert!(!sync_catalog(&mut snapshot, &report));
    assert!(snapshot.names().orphaned(&snapshot.used_branch_ids()).is_empty());
}

#[test]
fn renamed_registry_keys_show_up_as_orphans() {
    let (mut snapshot, _) = assigned();
    snapshot
        .style_meta
        .branch_names_by_id
        .insert("GENERAL-G:009".into(), "Stale".into());
    let used = snapshot.used_branch_ids();
    assert_eq!(snapshot.names().orphaned(&used), vec!["GENERAL-G:009"]);
}

fn update() -> impl Strategy<Value = BranchUpdate> {
    let ids = prop::sample::select(vec!["G", "J", "A", "B", "C", "E0", "E1", "E2", "E3", "X", ""]);
    let branch = prop::option::of(prop::sample::select(vec!["", "  ", "S", "S:001", "T"]));
    (ids, branch).prop_map(|(id, branch)| BranchUpdate {
        id: id.to_string(),
        branch_id: branch.map(str::to_string),
    })
}

fn response() -> impl Strategy<Value = AuthorityResponse> {
    (
        prop::option::of(prop::collection::vec(update(), 0..8)),
        prop::option::of(prop::collection::vec(update(), 0..8)),
    )
        .prop_map(|(nodes, edges)| AuthorityResponse {
            nodes,
            edges,
            ..AuthorityResponse::default()
        })
}

proptest! {
    #[test]
    fn any_response_sequence_keeps_everything_labeled(responses in prop::collection::vec(response(), 0..6)) {
        let (mut snapshot, _) = assigned();
        for response in responses {
            apply_authority_response(&mut snapshot, response);
            prop_assert!(snapshot.fully_labeled());
        }
    }
}
