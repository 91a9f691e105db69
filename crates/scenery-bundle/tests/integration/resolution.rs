//! Integration tests for reference resolution across bundle chains.

use std::sync::Arc;

use scenery_bundle::{Bundle, Locator, Resource, ResourceType};

use scenery_core::add_base_url;

use crate::common::extracted_members;

#[test]
fn test_root_scene_scenario() {
    let root = Bundle::new(Locator::from("http://host/a/root.yaml"), None, None);

    assert_eq!(root.base_path(), "http://host/a/");
    assert_eq!(root.url_for("b.yaml").unwrap(), "http://host/a/b.yaml");
    assert_eq!(
        root.url_for("global.sources.osm").unwrap(),
        "global.sources.osm"
    );
}

#[test]
fn test_archive_child_scenario() {
    let root = Bundle::archive(
        Locator::from("http://host/root.zip"),
        None,
        None,
        Arc::new(extracted_members("blob:", &[])),
    );
    let child = Bundle::new(
        Locator::from("folder/child.yaml"),
        Some("folder/"),
        Some(root.clone()),
    );

    assert_eq!(child.path_for_parent(), "folder/");
    assert_eq!(
        child.url_for("style.yaml").unwrap(),
        root.url_for("folder/style.yaml").unwrap()
    );
}

#[test]
fn test_scene_tree_inside_archive() {
    // root.zip
    // ├── root.yaml           imports folder/child.yaml
    // ├── folder/child.yaml   imports sub/detail.yaml, ../images/pin.png
    // ├── folder/sub/detail.yaml
    // └── images/pin.png
    let root = Bundle::archive(
        Locator::from("https://maps.example.com/pack/root.zip"),
        None,
        None,
        Arc::new(extracted_members(
            "blob:https://maps.example.com/",
            &[
                "root.yaml",
                "folder/child.yaml",
                "folder/sub/detail.yaml",
                "images/pin.png",
            ],
        )),
    );

    let scene = root.resolve("root.yaml").unwrap();
    assert_eq!(scene.url, "blob:https://maps.example.com/root.yaml");
    assert_eq!(scene.path, "");
    let scene = Bundle::dependency(&root, &scene);
    assert!(Arc::ptr_eq(scene.container().unwrap(), &root));

    let child = scene.resolve("folder/child.yaml").unwrap();
    assert_eq!(
        child,
        Resource {
            url: "blob:https://maps.example.com/folder/child.yaml".to_string(),
            path: "folder/".to_string(),
            kind: ResourceType::Scene,
        }
    );

    let child = Bundle::dependency(&scene, &child);
    let detail = child.resolve("sub/detail.yaml").unwrap();
    assert_eq!(detail.url, "blob:https://maps.example.com/folder/sub/detail.yaml");

    let detail = Bundle::dependency(&child, &detail);
    assert_eq!(detail.path_for_parent(), "sub/");
    assert!(Arc::ptr_eq(detail.container().unwrap(), &root));

    assert_eq!(
        child.url_for("../images/pin.png").unwrap(),
        "blob:https://maps.example.com/images/pin.png"
    );
    assert_eq!(
        detail.url_for("../../images/pin.png").unwrap(),
        "blob:https://maps.example.com/images/pin.png"
    );
}

#[test]
fn test_unknown_archive_member_falls_back_to_archive_base() {
    let root = Bundle::archive(
        Locator::from("https://maps.example.com/pack/root.zip"),
        None,
        None,
        Arc::new(extracted_members("blob:", &["root.yaml"])),
    );
    let child = Bundle::new(Locator::from("folder/child.yaml"), Some("folder/"), Some(root));

    assert_eq!(
        child.url_for("missing.yaml").unwrap(),
        "https://maps.example.com/pack/folder/missing.yaml"
    );
}

#[test]
fn test_remote_references_inside_archive_untouched() {
    let root = Bundle::archive(
        Locator::from("https://maps.example.com/pack/root.zip"),
        None,
        None,
        Arc::new(extracted_members("blob:", &[])),
    );
    let child = Bundle::new(Locator::from("folder/child.yaml"), Some("folder/"), Some(root));

    let tiles = child
        .resolve("https://tiles.example.com/v1/{z}/{x}/{y}.mvt?api_key=abc")
        .unwrap();
    assert_eq!(
        tiles.url,
        "https://tiles.example.com/v1/{z}/{x}/{y}.mvt?api_key=abc"
    );
    assert_eq!(tiles.path, "https://tiles.example.com/v1/{z}/{x}/");
    assert_eq!(tiles.kind, ResourceType::Other("mvt".to_string()));

    // scheme-relative references join at this bundle instead of climbing
    let scheme_relative = child.url_for("//cdn.example.com/x.yaml").unwrap();
    assert_eq!(
        scheme_relative,
        add_base_url("//cdn.example.com/x.yaml", child.base_path())
    );
    assert!(!scheme_relative.contains("folder/"));

    let hosted = Bundle::new(
        Locator::from("https://maps.example.com/pack/folder/child.yaml"),
        Some("folder/"),
        Some(child.clone()),
    );
    assert_eq!(
        hosted.url_for("//cdn.example.com/x.yaml").unwrap(),
        "https://cdn.example.com/x.yaml"
    );
}

#[test]
fn test_plain_scene_tree_over_http() {
    let root = Bundle::new(Locator::from("https://host/scenes/main.yaml"), None, None);

    let roads = root.resolve("styles/roads.yaml").unwrap();
    let roads = Bundle::dependency(&root, &roads);
    assert!(roads.container().is_none());
    assert_eq!(roads.base_path(), "https://host/scenes/styles/");

    let icons = roads.resolve("icons/sprite.png").unwrap();
    assert_eq!(icons.url, "https://host/scenes/styles/icons/sprite.png");

    let shared = roads.resolve("/shared/fonts.yaml").unwrap();
    assert_eq!(shared.url, "https://host/shared/fonts.yaml");
}

#[test]
fn test_archive_reference_type() {
    let root = Bundle::new(Locator::from("https://host/scenes/main.yaml"), None, None);
    let pack = root.resolve("packs/extra.zip").unwrap();

    assert!(pack.kind.is_archive());
    assert_eq!(pack.url, "https://host/scenes/packs/extra.zip");
}

#[test]
fn test_inline_root_resolves_relative_to_supplied_base() {
    let root = Bundle::new(
        Locator::Inline(scenery_bundle::parse_document("import: base.yaml").unwrap()),
        Some("https://host/scenes/"),
        None,
    );
    assert_eq!(root.url_for("base.yaml").unwrap(), "https://host/scenes/base.yaml");
}
