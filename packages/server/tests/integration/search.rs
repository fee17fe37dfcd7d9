use common::Category;

use crate::support::{TestApp, routes};

#[tokio::test]
async fn query_matching_nothing_returns_an_empty_result() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;

    let res = app.get_with_token(&routes::search("nothing"), &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["count"], 0);
    assert_eq!(res.body["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn finds_records_by_exact_filename() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    let id = app
        .ingest("alice@example.com", Category::Images, "sunset.jpg", &["beach"])
        .await;

    let res = app.get_with_token(&routes::search("sunset.jpg"), &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["count"], 1);
    let hit = &res.body["results"][0];
    assert_eq!(hit["id"], id.as_str());
    assert_eq!(hit["category"], "images");
    assert_eq!(hit["enrichedMetadata"]["userId"], "alice@example.com");
    assert_eq!(hit["enrichedMetadata"]["originalFileName"], "sunset.jpg");
    assert_eq!(hit["enrichedMetadata"]["summaryContent"][0], "beach");
    assert_eq!(
        hit["publicUrl"],
        app.public_url("alice@example.com/images/sunset.jpg")
    );
}

#[tokio::test]
async fn finds_records_by_keyword_across_categories() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    app.ingest("alice@example.com", Category::Images, "a.png", &["dog", "park"])
        .await;
    app.ingest("alice@example.com", Category::Videos, "b.mp4", &["dog"])
        .await;
    app.ingest("alice@example.com", Category::Others, "c.pdf", &["cat"])
        .await;

    let res = app.get_with_token(&routes::search("dog"), &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["count"], 2);
    let categories: Vec<&str> = res.body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, ["images", "videos"]);
}

#[tokio::test]
async fn query_is_trimmed_and_lowercased() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    app.ingest("alice@example.com", Category::Audios, "song.mp3", &["jazz"])
        .await;

    let res = app
        .get_with_token(&routes::search("%20%20JAZZ%20"), &token)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["count"], 1);
}

#[tokio::test]
async fn stored_names_are_compared_as_written() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    app.ingest("alice@example.com", Category::Images, "Photo.JPG", &[])
        .await;

    let res = app.get_with_token(&routes::search("Photo.JPG"), &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["count"], 0);
}

#[tokio::test]
async fn record_matching_by_name_and_keyword_appears_once() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    app.ingest("alice@example.com", Category::Others, "report", &["report"])
        .await;

    let res = app.get_with_token(&routes::search("report"), &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["count"], 1);
}

#[tokio::test]
async fn other_users_records_are_never_returned() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    app.ingest("bob@example.com", Category::Images, "sunset.jpg", &["sunset"])
        .await;

    let res = app.get_with_token(&routes::search("sunset"), &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["count"], 0);
}

#[tokio::test]
async fn partial_matches_are_not_returned() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    app.ingest("alice@example.com", Category::Images, "sunset.jpg", &["sunsets"])
        .await;

    let res = app.get_with_token(&routes::search("sunset"), &token).await;

    assert_eq!(res.body["count"], 0);
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;

    let blank = app.get_with_token(&routes::search("%20%20"), &token).await;
    let missing = app.get_with_token("/search_files", &token).await;

    assert_eq!(blank.status, 400);
    assert_eq!(blank.body["code"], "VALIDATION_ERROR");
    assert_eq!(missing.status, 400);
}
