use crate::support::{INDEX_HTML, TestApp};

#[tokio::test]
async fn root_serves_the_entry_page() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.text, INDEX_HTML);
    assert!(res.header("content-type").starts_with("text/html"));
}

#[tokio::test]
async fn existing_asset_is_served_with_its_type() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/static/app.js").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.text, "console.log(1);");
    assert!(res.header("content-type").contains("javascript"));
}

#[tokio::test]
async fn unknown_path_falls_back_to_the_entry_page() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/gallery/some/client/route").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.text, INDEX_HTML);
}

#[tokio::test]
async fn openapi_document_is_published() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    assert!(res.body["paths"]["/upload_files"].is_object());
    assert!(res.body["paths"]["/auth/email_login"].is_object());
}
