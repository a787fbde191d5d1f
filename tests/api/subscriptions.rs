use crate::helpers::spawn_app;

#[tokio::test]
async fn subscribe_returns_a_200_for_valid_json_data() {
    let app = spawn_app().await;
    let body = serde_json::json!({ "email": "a@x.com", "location": "Paris" });

    let response = app.post_subscriptions(&body).await;

    assert_eq!(200, response.status().as_u16());
    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        response_body,
        serde_json::json!({ "message": "Subscription successful." })
    );
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    let app = spawn_app().await;
    let body = serde_json::json!({ "email": "a@x.com", "location": "Paris" });

    app.post_subscriptions(&body).await;

    let saved = app.saved_subscriptions().await;
    assert_eq!(saved, vec![("a@x.com".to_string(), "Paris".to_string())]);
}

#[tokio::test]
async fn subscribe_overwrites_the_location_of_an_existing_email() {
    let app = spawn_app().await;

    app.create_subscriber("a@x.com", "Paris").await;
    app.create_subscriber("a@x.com", "Lyon").await;

    let saved = app.saved_subscriptions().await;
    assert_eq!(saved, vec![("a@x.com".to_string(), "Lyon".to_string())]);
}

#[tokio::test]
async fn subscribe_returns_a_400_when_data_is_missing() {
    let app = spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({ "location": "Paris" }), "missing the email"),
        (serde_json::json!({ "email": "a@x.com" }), "missing the location"),
        (serde_json::json!({}), "missing both email and location"),
        (
            serde_json::json!({ "email": "", "location": "Paris" }),
            "empty email",
        ),
        (
            serde_json::json!({ "email": "a@x.com", "location": "" }),
            "empty location",
        ),
        (
            serde_json::json!({ "email": null, "location": "Paris" }),
            "null email",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_subscriptions(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
        let response_body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            response_body,
            serde_json::json!({ "message": "Email and location are required." }),
            "Unexpected body when the payload was {}.",
            error_message
        );
    }

    assert!(app.saved_subscriptions().await.is_empty());
}

#[tokio::test]
async fn subscribe_returns_a_400_for_a_malformed_body() {
    let app = spawn_app().await;

    let response = app.post_raw_subscriptions("{\"email\": \"a@x.com\",").await;

    assert_eq!(400, response.status().as_u16());
    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(response_body["message"], "Email and location are required.");
    assert!(app.saved_subscriptions().await.is_empty());
}

#[tokio::test]
async fn subscribe_returns_a_500_if_the_store_write_fails() {
    let app = spawn_app().await;
    app.break_subscription_store().await;
    let body = serde_json::json!({ "email": "a@x.com", "location": "Paris" });

    let response = app.post_subscriptions(&body).await;

    assert_eq!(500, response.status().as_u16());
    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(response_body["message"], "Failed to subscribe.");
    let error = response_body["error"].as_str().unwrap();
    assert!(
        error.contains("no such table"),
        "Unexpected error message: {}",
        error
    );
}
