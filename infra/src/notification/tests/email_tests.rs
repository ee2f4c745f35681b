//! Tests for the email notifier

use otp_core::domain::entities::TransactionId;
use otp_core::errors::DomainError;
use otp_core::services::otp::{CodeNotifier, OtpDelivery};
use tokio_test::assert_err;

use crate::build_http_client;
use crate::notification::HttpEmailNotifier;
use crate::test_server::serve_once;

fn delivery() -> OtpDelivery {
    OtpDelivery {
        transaction_id: TransactionId::new(21).unwrap(),
        to: "alice@bank.com".to_string(),
        customer_name: "Alice".to_string(),
        otp_code: "048213".to_string(),
        expires_in_seconds: 300,
    }
}

fn notifier(base_url: &str) -> HttpEmailNotifier {
    HttpEmailNotifier::new(build_http_client(5).unwrap(), base_url)
}

#[test]
fn test_endpoint() {
    assert_eq!(
        notifier("http://127.0.0.1:8003/").endpoint(),
        "http://127.0.0.1:8003/email/otp"
    );
}

#[tokio::test]
async fn test_send_code_posts_delivery_payload() {
    let (base_url, server) = serve_once(200, r#"{"message_id":"msg-123"}"#).await;

    let message_id = notifier(&base_url).send_code(&delivery()).await.unwrap();
    assert_eq!(message_id, "msg-123");

    let request = server.await.unwrap();
    assert!(request.head.starts_with("POST /email/otp HTTP/1.1"));

    let payload: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(payload["to"], "alice@bank.com");
    assert_eq!(payload["customer_name"], "Alice");
    assert_eq!(payload["otp_code"], "048213");
    assert_eq!(payload["transaction_id"], 21);
    assert_eq!(payload["expires_in_seconds"], 300);
}

#[tokio::test]
async fn test_send_code_without_message_id() {
    let (base_url, _server) = serve_once(202, "").await;

    let message_id = notifier(&base_url).send_code(&delivery()).await.unwrap();
    assert!(message_id.starts_with("email-"));
}

#[tokio::test]
async fn test_send_code_rejected_is_delivery_error() {
    let (base_url, _server) = serve_once(503, r#"{"detail":"smtp down"}"#).await;

    let err = assert_err!(notifier(&base_url).send_code(&delivery()).await);
    match err {
        DomainError::Delivery { message } => assert!(message.contains("503")),
        other => panic!("Expected Delivery, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_code_unreachable_is_delivery_error() {
    let err = assert_err!(notifier("http://127.0.0.1:1").send_code(&delivery()).await);
    assert!(matches!(err, DomainError::Delivery { .. }));
}
