//! The blocking `HttpFetcher` against a local mock server
//!
//! The fetcher is blocking, so every call runs inside `spawn_blocking`.

use flate2::write::GzEncoder;
use flate2::Compression;
use idmap_mapping::config::Endpoints;
use idmap_mapping::reader::uniprot_list::run_job;
use idmap_mapping::reader::ReadContext;
use idmap_mapping::reference::ReferenceLists;
use idmap_mapping::{Fetcher, HttpFetcher, MapperConfig, MappingError};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(10)).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gzip_body_is_inflated() {
    let server = MockServer::start().await;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"TP53\tP04637\n").unwrap();
    let body = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/map.tsv.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;

    let url = format!("{}/map.tsv.gz", server.uri());
    let text = tokio::task::spawn_blocking(move || fetcher().get_text(&url, &[]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text, "TP53\tP04637\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = tokio::task::spawn_blocking(move || fetcher().get(&url))
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, MappingError::Network { status: 503, .. }));
    assert!(err.is_unavailable());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_id_mapping_job_protocol() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("POST"))
        .and(path("/idmapping/run"))
        .and(body_string_contains("from=UniProtKB_AC-ID"))
        .and(body_string_contains("to=GeneID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobId": "job42" })))
        .mount(&server)
        .await;

    // first poll still running, then finished
    Mock::given(method("GET"))
        .and(path("/idmapping/status/job42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobStatus": "RUNNING" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/idmapping/status/job42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobStatus": "FINISHED" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/idmapping/details/job42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "redirectURL": format!("{}/idmapping/results/job42", base) })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/idmapping/results/stream/job42"))
        .and(query_param("format", "tsv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("From\tTo\nP04637\t7157\nP38398\t672\n"))
        .mount(&server)
        .await;

    let mut config = MapperConfig::default()
        .with_use_cache(false)
        .with_endpoints(Endpoints::all_at(&base));
    config.uniprot_list.poll_interval_ms = 10;

    let mut pairs = tokio::task::spawn_blocking(move || {
        let http = fetcher();
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&http, &config, None, &refs);
        let ids = vec!["P04637".to_string(), "P38398".to_string()];
        run_job("UniProtKB_AC-ID", "GeneID", &ids, &ctx)
    })
    .await
    .unwrap()
    .unwrap();

    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("P04637".to_string(), "7157".to_string()),
            ("P38398".to_string(), "672".to_string()),
        ]
    );
}
