use wiremock::{
    Mock, ResponseTemplate,
    matchers::{any, method, path},
};

use crate::helpers::spawn_app;

#[tokio::test]
async fn notifications_are_sent_only_to_subscribers_with_known_weather() {
    let app = spawn_app().await;
    app.create_subscriber("a@x.com", "Paris").await;
    app.create_subscriber("b@x.com", "Atlantis").await;
    app.mock_weather("Paris", "light rain", 12.5).await;
    app.mock_unknown_location("Atlantis").await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_notifications().await;

    assert_eq!(200, response.status().as_u16());
    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        response_body,
        serde_json::json!({ "message": "Weather notifications sent." })
    );
    let emails = app.sent_emails().await;
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0]["To"], "a@x.com");
}

#[tokio::test]
async fn notification_email_contains_the_weather_summary() {
    let app = spawn_app().await;
    app.create_subscriber("a@x.com", "Paris").await;
    app.mock_weather("Paris", "light rain", 12.5).await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    app.post_notifications().await;

    let emails = app.sent_emails().await;
    assert_eq!(emails[0]["From"], "weather@example.com");
    assert_eq!(emails[0]["Subject"], "Daily Weather Update for Paris");
    assert_eq!(
        emails[0]["TextBody"],
        "Good morning!\n\nToday's weather in Paris:\n- light rain\n- Temperature: 12.5°C\n\nHave a great day!"
    );
}

#[tokio::test]
async fn notifications_return_200_when_every_weather_fetch_fails() {
    let app = spawn_app().await;
    app.create_subscriber("a@x.com", "Atlantis").await;
    app.create_subscriber("b@x.com", "Lemuria").await;
    app.mock_unknown_location("Atlantis").await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.weather_server)
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_notifications().await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn notifications_skip_malformed_weather_responses() {
    let app = spawn_app().await;
    app.create_subscriber("a@x.com", "Paris").await;
    app.create_subscriber("b@x.com", "Oslo").await;
    app.mock_weather("Paris", "clear sky", 20.0).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "weather": [] })))
        .mount(&app.weather_server)
        .await;

    Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_notifications().await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(app.sent_emails().await[0]["To"], "a@x.com");
}

#[tokio::test]
async fn notifications_return_200_when_mail_dispatch_fails() {
    let app = spawn_app().await;
    app.create_subscriber("a@x.com", "Paris").await;
    app.create_subscriber("b@x.com", "Lyon").await;
    app.mock_weather("Paris", "clear sky", 20.0).await;
    app.mock_weather("Lyon", "few clouds", 18.0).await;

    // every subscriber gets exactly one attempt, without retries
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app.post_notifications().await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn notifications_return_500_if_subscriptions_cannot_be_fetched() {
    let app = spawn_app().await;
    app.create_subscriber("a@x.com", "Paris").await;
    app.mock_weather("Paris", "clear sky", 20.0).await;
    app.break_subscription_store().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_notifications().await;

    assert_eq!(500, response.status().as_u16());
    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(response_body["message"], "Failed to fetch subscriptions.");
    assert!(response_body["error"].as_str().is_some());
}

#[tokio::test]
async fn notifications_with_no_subscribers_succeed() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_notifications().await;

    assert_eq!(200, response.status().as_u16());
}
