//! Integration test: manifest resolution and manifest-driven downloads over HTTP.

mod common;

use common::image_server::ImageServer;
use iiif_dl_core::retry::RetryPolicy;
use iiif_dl_core::{Downloader, ImageRequestOptions, ManifestError};
use tempfile::tempdir;

fn downloader() -> Downloader {
    Downloader::default().with_retry(RetryPolicy::none())
}

/// Registers a Presentation 2.x manifest at `/manifest.json` whose canvases
/// point back at `server`, plus the images it references.
fn serve_v2_manifest(server: &ImageServer, pages: usize) -> String {
    let canvases: Vec<String> = (1..=pages)
        .map(|i| {
            format!(
                r#"{{"label": "f. {i}", "images": [{{"resource": {{
                    "@id": "{direct}",
                    "service": {{"@id": "{service}/info.json"}}}}}}]}}"#,
                i = i,
                direct = server.url(&format!("/direct/{}.png", i)),
                service = server.url(&format!("/iiif/{}", i)),
            )
        })
        .collect();
    let manifest = format!(r#"{{"sequences": [{{"canvases": [{}]}}]}}"#, canvases.join(","));
    server.route("/manifest.json", manifest);
    for i in 1..=pages {
        server
            .route(&format!("/direct/{}.png", i), format!("direct {}", i))
            .route(&format!("/iiif/{}/full/max/0/default.jpg", i), format!("templated {}", i));
    }
    server.url("/manifest.json")
}

#[test]
fn lists_direct_urls_in_manifest_order() {
    let server = common::image_server::start();
    let manifest = serve_v2_manifest(&server, 3);
    let urls = downloader().resolve_image_list(&manifest, false, None).unwrap();
    assert_eq!(
        urls,
        vec![
            server.url("/direct/1.png"),
            server.url("/direct/2.png"),
            server.url("/direct/3.png"),
        ]
    );
    let reversed = downloader().resolve_image_list(&manifest, true, None).unwrap();
    assert_eq!(reversed.first(), urls.last());
}

#[test]
fn templated_urls_use_the_image_service() {
    let server = common::image_server::start();
    let manifest = serve_v2_manifest(&server, 2);
    let options = ImageRequestOptions {
        size: Some("max".to_string()),
        ..ImageRequestOptions::default()
    };
    let urls = downloader()
        .resolve_image_list(&manifest, false, Some(&options))
        .unwrap();
    assert_eq!(urls[1], server.url("/iiif/2/full/max/0/default.jpg"));
}

#[test]
fn manifest_download_numbers_files() {
    let server = common::image_server::start();
    let manifest = serve_v2_manifest(&server, 12);
    let dir = tempdir().unwrap();
    let options = ImageRequestOptions {
        size: Some("max".to_string()),
        ..ImageRequestOptions::default()
    };

    let report = downloader()
        .download_from_manifest(&manifest, dir.path(), 4, true, Some(&options))
        .unwrap();
    assert!(report.is_complete_success(), "{:?}", report.failures());
    assert_eq!(report.len(), 12);
    assert_eq!(std::fs::read(dir.path().join("01.jpg")).unwrap(), b"templated 12");
    assert_eq!(std::fs::read(dir.path().join("12.jpg")).unwrap(), b"templated 1");
}

#[test]
fn manifest_404_fails_before_any_download() {
    let server = common::image_server::start();
    let dir = tempdir().unwrap();
    let err = downloader()
        .download_from_manifest(&server.url("/missing.json"), dir.path(), 4, false, None)
        .unwrap_err();
    match err {
        ManifestError::Fetch { source, .. } => assert_eq!(source.status(), Some(404)),
        other => panic!("expected Fetch, got {:?}", other),
    }
    assert_eq!(server.requests(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn malformed_manifest_is_a_parse_error() {
    let server = common::image_server::start();
    server.route("/m.json", r#"{"label": "no canvases here"}"#);
    let err = downloader()
        .resolve_image_list(&server.url("/m.json"), false, None)
        .unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }), "{:?}", err);
}
