mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use fleet_portal::types::BlobAccess;

fn descriptor() -> Value {
    json!({
        "url": "https://store.example.com/report.pdf",
        "downloadUrl": "https://store.example.com/report.pdf?download=1",
        "pathname": "report.pdf",
        "contentType": "application/pdf",
        "contentDisposition": "inline; filename=\"report.pdf\""
    })
}

#[tokio::test]
async fn upload_returns_descriptor_verbatim() -> Result<()> {
    let gateway = common::FakeGateway::new().with_blob(descriptor()).into_arc();
    let server = common::spawn_server(gateway.clone(), common::test_config()).await?;

    let res = common::client()
        .post(format!("{}/api/upload?filename=report.pdf", server.base_url))
        .header(header::CONTENT_TYPE, "application/pdf")
        .body("%PDF-1.4 test document")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, descriptor());

    assert_eq!(gateway.calls.blob(), 1);
    let stored = gateway.last_blob.lock().unwrap().take().expect("blob recorded");
    assert_eq!(stored.pathname, "report.pdf");
    assert_eq!(&stored.body[..], b"%PDF-1.4 test document");
    assert_eq!(stored.options.access, BlobAccess::Public);
    assert_eq!(stored.options.content_type.as_deref(), Some("application/pdf"));

    Ok(())
}

#[tokio::test]
async fn missing_filename_is_rejected_without_upstream_call() -> Result<()> {
    let gateway = common::FakeGateway::new().with_blob(descriptor()).into_arc();
    let server = common::spawn_server(gateway.clone(), common::test_config()).await?;

    let res = common::client()
        .post(format!("{}/api/upload", server.base_url))
        .body("some bytes")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Filename and body required"}));
    assert_eq!(gateway.calls.blob(), 0);

    Ok(())
}

#[tokio::test]
async fn missing_body_or_both_are_rejected() -> Result<()> {
    let gateway = common::FakeGateway::new().with_blob(descriptor()).into_arc();
    let server = common::spawn_server(gateway.clone(), common::test_config()).await?;
    let client = common::client();

    let cases = [
        format!("{}/api/upload?filename=report.pdf", server.base_url),
        format!("{}/api/upload", server.base_url),
        format!("{}/api/upload?filename=", server.base_url),
    ];

    for url in cases {
        let res = client.post(&url).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", url);
        assert_eq!(
            res.json::<Value>().await?,
            json!({"error": "Filename and body required"}),
            "{}",
            url
        );
    }
    assert_eq!(gateway.calls.blob(), 0);

    Ok(())
}

#[tokio::test]
async fn repeated_filename_uses_the_first_value() -> Result<()> {
    let gateway = common::FakeGateway::new().with_blob(descriptor()).into_arc();
    let server = common::spawn_server(gateway.clone(), common::test_config()).await?;

    let res = common::client()
        .post(format!("{}/api/upload?filename=a.pdf&filename=b.pdf", server.base_url))
        .body("bytes")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, descriptor());
    assert_eq!(gateway.calls.blob(), 1);
    let stored = gateway.last_blob.lock().unwrap().take().expect("blob recorded");
    assert_eq!(stored.pathname, "a.pdf");

    Ok(())
}

#[tokio::test]
async fn store_failure_hides_upstream_detail() -> Result<()> {
    let gateway = common::FakeGateway::new().into_arc();
    let server = common::spawn_server(gateway.clone(), common::test_config()).await?;

    let res = common::client()
        .post(format!("{}/api/upload?filename=report.pdf", server.base_url))
        .body("payload")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = res.text().await?;
    assert!(!text.contains("quota"), "leaked upstream detail: {}", text);
    assert_eq!(serde_json::from_str::<Value>(&text)?, json!({"error": "Upload failed"}));
    assert_eq!(gateway.calls.blob(), 1);

    Ok(())
}

#[tokio::test]
async fn oversized_body_is_refused_before_the_handler() -> Result<()> {
    let mut config = common::test_config();
    config.api.max_request_size_bytes = 16;

    let gateway = common::FakeGateway::new().with_blob(descriptor()).into_arc();
    let server = common::spawn_server(gateway.clone(), config).await?;

    let res = common::client()
        .post(format!("{}/api/upload?filename=big.bin", server.base_url))
        .body(vec![0u8; 1024])
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(gateway.calls.blob(), 0);

    Ok(())
}
