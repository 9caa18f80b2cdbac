use crate::common::{TestApp, jpeg_bytes};

#[tokio::test]
async fn serves_content_length_and_type() {
    let app = TestApp::spawn().await;
    let body = app.upload_ok(jpeg_bytes(9), Some("cam1")).await;

    let res = app.get_bytes(body["url"].as_str().unwrap()).await;

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.headers()["content-type"], "image/jpeg");
    assert_eq!(
        res.headers()["content-length"],
        jpeg_bytes(9).len().to_string().as_str()
    );
}

#[tokio::test]
async fn unknown_key_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get("/media/photos/2024/01/01/nothing.jpg").await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn spool_directory_is_not_exposed() {
    let app = TestApp::spawn().await;

    let res = app.get("/media/.tmp/anything").await;
    assert_eq!(res.status, 400);
}
