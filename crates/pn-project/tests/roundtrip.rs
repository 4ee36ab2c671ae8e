use pn_graph::{EdgeRecord, NodeRecord};
use pn_project::{GraphSnapshot, ProjectError, load_json, load_path, load_yaml, save_json, save_path, save_yaml};

fn sample() -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::new(
        vec![
            NodeRecord::new("G1", "GENERAL").at(0.0, 0.0),
            NodeRecord::new("J1", "JONCTION").at(0.0, 10.0),
            NodeRecord::new("A", "").at(0.0, 20.0),
        ],
        vec![
            EdgeRecord::new("E0", "J1", "G1").with_diameter(200.0),
            EdgeRecord::new("E1", "A", "J1")
                .with_diameter(160.0)
                .with_created_at("2024-01-01T08:00:00Z")
                .with_geometry(&[(0.0, 20.0), (2.0, 15.0), (0.0, 10.0)]),
        ],
    );
    snapshot.site_id = Some("SITE-7".into());
    snapshot
        .style_meta
        .branch_names_by_id
        .insert("GENERAL-G1".into(), "Main".into());
    snapshot
}

#[test]
fn roundtrip_json() {
    let snapshot = sample();
    let path = std::env::temp_dir().join("pn_project_roundtrip.json");

    save_json(&path, &snapshot).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(snapshot, loaded);
}

#[test]
fn roundtrip_yaml() {
    let snapshot = sample();
    let path = std::env::temp_dir().join("pn_project_roundtrip.yaml");

    save_yaml(&path, &snapshot).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(snapshot.nodes.len(), loaded.nodes.len());
    assert_eq!(loaded.edges[1].created_at.as_deref(), Some("2024-01-01T08:00:00Z"));
    assert_eq!(loaded.style_meta.branch_names_by_id["GENERAL-G1"], "Main");
    assert_eq!(
        loaded.network().edges()[1].geometry.len(),
        snapshot.network().edges()[1].geometry.len()
    );
}

#[test]
fn path_helpers_dispatch_on_extension() {
    let snapshot = sample();
    let dir = std::env::temp_dir();

    let yml = dir.join("pn_project_dispatch.yml");
    save_path(&yml, &snapshot).unwrap();
    let text = std::fs::read_to_string(&yml).unwrap();
    assert!(text.contains("site_id: SITE-7"));
    assert_eq!(load_path(&yml).unwrap().site_id.as_deref(), Some("SITE-7"));

    let txt = dir.join("pn_project_dispatch.txt");
    assert!(matches!(
        save_path(&txt, &snapshot),
        Err(ProjectError::UnsupportedFormat { .. })
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("pn_project_does_not_exist.json");
    assert!(matches!(load_json(&path), Err(ProjectError::Io(_))));
}
