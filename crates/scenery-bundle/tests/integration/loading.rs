//! Integration tests for loading scene documents through a fetcher.

use serde_yaml::Value;

use scenery_bundle::{Bundle, Document, Locator, parse_document};
use scenery_core::Error;

use crate::common::MockFetcher;

const ROOT_SCENE: &str = "\
import:
  - styles/roads.yaml
  - styles/water.yaml
sources:
  osm:
    type: MVT
    url: tiles/{z}/{x}/{y}.mvt
";

#[tokio::test]
async fn test_load_fetches_resolved_locator() {
    let fetcher = MockFetcher::new().with_document("https://host/scenes/main.yaml", ROOT_SCENE);
    let root = Bundle::new(Locator::from("https://host/scenes/main.yaml"), None, None);

    let doc = root.load(&fetcher).await.expect("root scene should load");

    let imports = doc.get("import").and_then(Value::as_sequence).unwrap();
    assert_eq!(imports.len(), 2);
    assert_eq!(fetcher.calls(), vec!["https://host/scenes/main.yaml"]);
}

#[tokio::test]
async fn test_load_import_tree() {
    let fetcher = MockFetcher::new()
        .with_document("https://host/scenes/main.yaml", ROOT_SCENE)
        .with_document("https://host/scenes/styles/roads.yaml", "layers: {roads: {}}")
        .with_document("https://host/scenes/styles/water.yaml", "layers: {water: {}}");
    let root = Bundle::new(Locator::from("https://host/scenes/main.yaml"), None, None);

    let doc = root.load(&fetcher).await.unwrap();
    let imports = doc.get("import").and_then(Value::as_sequence).unwrap();

    let mut layers = Vec::new();
    for import in imports {
        let resource = root.resolve(import.as_str().unwrap()).unwrap();
        let bundle = Bundle::dependency(&root, &resource);
        let imported = bundle.load(&fetcher).await.unwrap();
        let names = imported.get("layers").and_then(Value::as_mapping).unwrap();
        layers.extend(names.keys().filter_map(Value::as_str).map(str::to_string));
    }

    assert_eq!(layers, vec!["roads", "water"]);
    assert_eq!(
        fetcher.calls(),
        vec![
            "https://host/scenes/main.yaml",
            "https://host/scenes/styles/roads.yaml",
            "https://host/scenes/styles/water.yaml",
        ]
    );
}

#[tokio::test]
async fn test_load_tolerates_duplicate_keys() {
    let fetcher = MockFetcher::new().with_document(
        "scene.yaml",
        "cameras:\n  main: {type: flat}\ncameras:\n  main: {type: isometric}",
    );
    let bundle = Bundle::new(Locator::from("scene.yaml"), None, None);

    let doc = bundle.load(&fetcher).await.unwrap();
    let camera = doc
        .get("cameras")
        .and_then(|c| c.get("main"))
        .and_then(|m| m.get("type"))
        .and_then(Value::as_str);
    assert_eq!(camera, Some("isometric"));
}

#[tokio::test]
async fn test_malformed_document_is_parse_error() {
    let fetcher = MockFetcher::new().with_document("scene.yaml", "layers: [unclosed");
    let bundle = Bundle::new(Locator::from("scene.yaml"), None, None);

    let err = bundle.load(&fetcher).await.unwrap_err();
    assert!(err.is_parse(), "expected parse error, got {err}");
    assert!(!err.is_transport());
    let Error::Parse { locator, .. } = err else {
        unreachable!("Expected Parse error variant");
    };
    assert_eq!(locator, "scene.yaml");
}

#[tokio::test]
async fn test_fetch_failure_is_transport_error() {
    let fetcher = MockFetcher::new().with_failure("https://host/scene.yaml", "connection reset");
    let bundle = Bundle::new(Locator::from("https://host/scene.yaml"), None, None);

    let err = bundle.load(&fetcher).await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {err}");
    assert!(!err.is_parse());

    let source = std::error::Error::source(&err).expect("transport error keeps its source");
    assert_eq!(source.to_string(), "connection reset");
}

#[tokio::test]
async fn test_missing_document_is_transport_error() {
    let fetcher = MockFetcher::new();
    let bundle = Bundle::new(Locator::from("https://host/missing.yaml"), None, None);

    let err = bundle.load(&fetcher).await.unwrap_err();
    assert!(matches!(err, Error::Transport { status: Some(404), .. }));
}

#[tokio::test]
async fn test_inline_load_returns_independent_copies() {
    let source: Document = parse_document("sources: {osm: {type: MVT}}\nlayers: {}").unwrap();
    let bundle = Bundle::new(Locator::Inline(source.clone()), None, None);
    let fetcher = MockFetcher::new();

    let mut first = bundle.load(&fetcher).await.unwrap();
    let second = bundle.load(&fetcher).await.unwrap();
    assert_eq!(first, second);

    first
        .as_mapping_mut()
        .unwrap()
        .insert(Value::from("scene"), Value::from("mutated"));
    first
        .as_mapping_mut()
        .unwrap()
        .remove(&Value::from("layers"));
    first
        .get_mut("sources")
        .and_then(|sources| sources.get_mut("osm"))
        .and_then(Value::as_mapping_mut)
        .unwrap()
        .insert(Value::from("type"), Value::from("GeoJSON"));

    let third = bundle.load(&fetcher).await.unwrap();
    assert_eq!(second, third);
    assert_eq!(third, source);
    assert!(third.get("scene").is_none());
    assert!(third.get("layers").is_some());
    let nested = third
        .get("sources")
        .and_then(|sources| sources.get("osm"))
        .and_then(|osm| osm.get("type"))
        .and_then(Value::as_str);
    assert_eq!(nested, Some("MVT"));

    assert!(fetcher.calls().is_empty(), "inline documents are never fetched");
}

#[tokio::test]
async fn test_concurrent_loads_are_independent() {
    let fetcher = MockFetcher::new().with_document("scene.yaml", "a: 1");
    let bundle = Bundle::new(Locator::from("scene.yaml"), None, None);

    let (first, second) = tokio::join!(bundle.load(&fetcher), bundle.load(&fetcher));
    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(fetcher.calls().len(), 2);
}
