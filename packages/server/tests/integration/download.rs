use std::io::{Cursor, Read};

use serde_json::json;

use crate::support::{TestApp, routes};

async fn user_with_files(app: &TestApp, email: &str) -> String {
    let token = app.create_authenticated_user(email, "securepass").await;
    let res = app
        .upload_with_token(
            &[
                ("cat.png", "image/png", b"cat-bytes"),
                ("notes.txt", "text/plain", b"some notes"),
            ],
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "upload failed: {}", res.text);
    token
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

mod single {
    use super::*;

    #[tokio::test]
    async fn returns_the_file_as_a_named_attachment() {
        let app = TestApp::spawn().await;
        let token = user_with_files(&app, "alice@example.com").await;

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SINGLE,
                &json!({
                    "fileUrl": app.public_url("alice@example.com/images/cat.png"),
                    "originalFileName": "my cat.png",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.bytes, b"cat-bytes");
        assert_eq!(res.header("content-type"), "image/png");
        assert!(
            res.header("content-disposition")
                .starts_with("attachment; filename=\"my cat.png\""),
            "{}",
            res.header("content-disposition")
        );
    }

    #[tokio::test]
    async fn url_outside_the_bucket_is_rejected() {
        let app = TestApp::spawn().await;
        let token = user_with_files(&app, "alice@example.com").await;

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SINGLE,
                &json!({
                    "fileUrl": "https://evil.test/test-bucket/alice@example.com/images/cat.png",
                    "originalFileName": "cat.png",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn another_users_file_is_rejected() {
        let app = TestApp::spawn().await;
        user_with_files(&app, "bob@example.com").await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SINGLE,
                &json!({
                    "fileUrl": app.public_url("bob@example.com/images/cat.png"),
                    "originalFileName": "cat.png",
                }),
                &alice,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn traversal_out_of_the_namespace_is_rejected() {
        let app = TestApp::spawn().await;
        user_with_files(&app, "bob@example.com").await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SINGLE,
                &json!({
                    "fileUrl": app.public_url("alice@example.com/../bob@example.com/images/cat.png"),
                    "originalFileName": "cat.png",
                }),
                &alice,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let app = TestApp::spawn().await;
        let token = user_with_files(&app, "alice@example.com").await;

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SINGLE,
                &json!({
                    "fileUrl": app.public_url("alice@example.com/images/gone.png"),
                    "originalFileName": "gone.png",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_url_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = user_with_files(&app, "alice@example.com").await;

        let res = app
            .post_with_token(routes::DOWNLOAD_SINGLE, &json!({}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "File URL and filename are required.");
    }

    #[tokio::test]
    async fn missing_filename_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = user_with_files(&app, "alice@example.com").await;

        for body in [
            json!({"fileUrl": app.public_url("alice@example.com/images/cat.png")}),
            json!({
                "fileUrl": app.public_url("alice@example.com/images/cat.png"),
                "originalFileName": "   ",
            }),
        ] {
            let res = app
                .post_with_token(routes::DOWNLOAD_SINGLE, &body, &token)
                .await;

            assert_eq!(res.status, 400, "{}", res.text);
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
            assert_eq!(res.body["error"], "File URL and filename are required.");
        }
    }

    #[tokio::test]
    async fn declared_content_type_is_returned() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let upload = app
            .upload_with_token(&[("scan.bin", "image/png", b"not-really-a-png")], &token)
            .await;
        assert_eq!(upload.status, 200, "{}", upload.text);

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SINGLE,
                &json!({
                    "fileUrl": app.public_url("alice@example.com/images/scan.bin"),
                    "originalFileName": "scan.bin",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.header("content-type"), "image/png");
        assert_eq!(res.bytes, b"not-really-a-png");
    }
}

mod selected {
    use super::*;

    #[tokio::test]
    async fn archive_holds_exactly_the_valid_entries() {
        let app = TestApp::spawn().await;
        let token = user_with_files(&app, "alice@example.com").await;

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SELECTED,
                &json!({
                    "fileUrls": [
                        app.public_url("alice@example.com/images/cat.png"),
                        app.public_url("alice@example.com/others/notes.txt"),
                        "https://evil.test/elsewhere/file.bin",
                    ]
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.header("content-type"), "application/zip");
        assert!(res.header("content-disposition").contains("search_results.zip"));

        let entries = zip_entries(&res.bytes);
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&("cat.png".to_string(), b"cat-bytes".to_vec())));
        assert!(entries.contains(&("notes.txt".to_string(), b"some notes".to_vec())));
    }

    #[tokio::test]
    async fn missing_objects_are_skipped() {
        let app = TestApp::spawn().await;
        let token = user_with_files(&app, "alice@example.com").await;

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SELECTED,
                &json!({
                    "fileUrls": [
                        app.public_url("alice@example.com/images/cat.png"),
                        app.public_url("alice@example.com/images/gone.png"),
                    ]
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(zip_entries(&res.bytes).len(), 1);
    }

    #[tokio::test]
    async fn clashing_base_names_are_numbered() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.upload_with_token(&[("same.bin", "image/png", b"image")], &token)
            .await;
        app.upload_with_token(&[("same.bin", "application/octet-stream", b"other")], &token)
            .await;

        let res = app
            .post_with_token(
                routes::DOWNLOAD_SELECTED,
                &json!({
                    "fileUrls": [
                        app.public_url("alice@example.com/images/same.bin"),
                        app.public_url("alice@example.com/others/same.bin"),
                    ]
                }),
                &token,
            )
            .await;

        let names: Vec<String> = zip_entries(&res.bytes)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["same.bin", "same(1).bin"]);
    }

    #[tokio::test]
    async fn empty_list_is_rejected() {
        let app = TestApp::spawn().await;
        let token = user_with_files(&app, "alice@example.com").await;

        let res = app
            .post_with_token(routes::DOWNLOAD_SELECTED, &json!({"fileUrls": []}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
