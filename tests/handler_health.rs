mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::create_test_app();
    let server = common::test_server(&app);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert!(json.get("version").is_some());
}
