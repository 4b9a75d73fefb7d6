use std::time::Duration;

use bytes::Bytes;
use classifier_engine::{
    ClassifyError, Classifier, ClientSettings, FailureKind, ReqwestClassifier, UploadFile,
    DEFAULT_CONFIDENCE_PERCENT,
};
use pretty_assertions::assert_eq;
use url::Url;
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn upload(name: &str) -> UploadFile {
    UploadFile {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: Bytes::from_static(b"\x89PNG\r\n\x1a\nfake-image"),
    }
}

fn classifier_for(server: &MockServer) -> ReqwestClassifier {
    let base_url = Url::parse(&server.uri()).expect("mock server uri");
    ReqwestClassifier::new(ClientSettings::new(base_url))
}

async fn mount_predict(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn classify(server: &MockServer) -> Result<classifier_engine::Prediction, ClassifyError> {
    classifier_for(server).classify(&upload("cat.png")).await
}

#[tokio::test]
async fn success_response_is_scaled_to_percent() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200).set_body_raw(
            r#"{"class_it":"gatto","class_en":"Cat","confidence":0.952}"#,
            "application/json",
        ),
    )
    .await;

    let prediction = classify(&server).await.expect("prediction");

    assert_eq!(prediction.label, "Cat");
    assert_eq!(prediction.source_label.as_deref(), Some("gatto"));
    assert!((prediction.confidence_percent - 95.2).abs() < 1e-9);
    assert!(prediction.confidence_reported);
}

#[tokio::test]
async fn missing_confidence_defaults_to_ninety() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200).set_body_raw(r#"{"class_en":"dog"}"#, "application/json"),
    )
    .await;

    let prediction = classify(&server).await.expect("prediction");

    assert_eq!(prediction.label, "dog");
    assert_eq!(prediction.confidence_percent, DEFAULT_CONFIDENCE_PERCENT);
    assert!(!prediction.confidence_reported);
}

#[tokio::test]
async fn upload_is_a_single_file_part() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200)
            .set_body_raw(r#"{"class_en":"cat","confidence":0.5}"#, "application/json"),
    )
    .await;

    classify(&server).await.expect("prediction");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="file""#), "body: {body}");
    assert!(body.contains(r#"filename="cat.png""#), "body: {body}");
    assert!(body.to_ascii_lowercase().contains("content-type: image/png"), "body: {body}");
    assert!(body.contains("fake-image"));
    assert_eq!(body.matches("Content-Disposition").count(), 1);
}

#[tokio::test]
async fn non_success_status_is_a_failure() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(500)
            .set_body_raw(r#"{"class_en":"cat","confidence":0.9}"#, "application/json"),
    )
    .await;

    let err = classify(&server).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn unparsable_body_is_malformed() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"),
    )
    .await;

    let err = classify(&server).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::MalformedResponse);
    assert!(err.kind.is_malformed_response());
}

#[tokio::test]
async fn missing_label_is_malformed() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200).set_body_raw(r#"{"confidence":0.8}"#, "application/json"),
    )
    .await;

    let err = classify(&server).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200).set_body_raw(
            format!(r#"{{"class_en":"{}"}}"#, "x".repeat(64)),
            "application/json",
        ),
    )
    .await;

    let base_url = Url::parse(&server.uri()).unwrap();
    let settings = ClientSettings {
        max_response_bytes: 16,
        ..ClientSettings::new(base_url)
    };
    let err = ReqwestClassifier::new(settings)
        .classify(&upload("cat.png"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 16, .. }));
}

#[tokio::test]
async fn slow_response_times_out_only_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(r#"{"class_en":"cat"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let base_url = Url::parse(&server.uri()).unwrap();
    let settings = ClientSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::new(base_url.clone())
    };
    let err = ReqwestClassifier::new(settings)
        .classify(&upload("cat.png"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);

    let prediction = ReqwestClassifier::new(ClientSettings::new(base_url))
        .classify(&upload("cat.png"))
        .await
        .expect("no timeout by default");
    assert_eq!(prediction.label, "cat");
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_failure() {
    let base_url = Url::parse("http://127.0.0.1:1").unwrap();
    let err = ReqwestClassifier::new(ClientSettings::new(base_url))
        .classify(&upload("cat.png"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Network);
    assert!(!err.message.is_empty());
}

#[tokio::test]
async fn invalid_content_type_is_rejected_before_sending() {
    let server = MockServer::start().await;
    let mut file = upload("cat.png");
    file.content_type = "not a mime".to_string();

    let err = classifier_for(&server).classify(&file).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::InvalidUpload);
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}
