use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::common::{TestApp, jpeg_bytes, routes};

/// Upload `n` photos sequentially and return their IDs in upload order.
async fn seed(app: &TestApp, n: usize, device_id: &str) -> Vec<i64> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let body = app.upload_ok(jpeg_bytes(i as u8), Some(device_id)).await;
        ids.push(body["id"].as_i64().unwrap());
    }
    ids
}

fn newest_first(mut ids: Vec<i64>) -> Vec<i64> {
    ids.reverse();
    ids
}

mod recent {
    use super::*;

    #[tokio::test]
    async fn empty_gallery_returns_empty_array() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::PHOTOS).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn lists_newest_first_with_iso_timestamps() {
        let app = TestApp::spawn().await;
        let ids = seed(&app, 3, "cam1").await;

        let res = app.get(routes::PHOTOS).await;
        let items = res.body.as_array().unwrap();
        let listed: Vec<i64> = items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
        assert_eq!(listed, newest_first(ids));

        let timestamps: Vec<DateTime<Utc>> = items
            .iter()
            .map(|i| i["created_at"].as_str().unwrap().parse().unwrap())
            .collect();
        assert!(timestamps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn capped_at_configured_recent_limit() {
        let app = TestApp::spawn_with_config(|config| {
            config.gallery.recent_limit = 2;
        })
        .await;
        let ids = seed(&app, 3, "cam1").await;

        assert_eq!(app.list_ids(routes::PHOTOS).await, vec![ids[2], ids[1]]);
        assert_eq!(
            app.list_ids("/api/photos/?limit=3").await,
            newest_first(ids)
        );
    }

    #[tokio::test]
    async fn path_without_trailing_slash() {
        let app = TestApp::spawn().await;
        seed(&app, 1, "cam1").await;

        assert_eq!(app.list_ids("/api/photos").await.len(), 1);
    }
}

mod paginated {
    use super::*;

    #[tokio::test]
    async fn consecutive_pages_partition_without_gaps() {
        let app = TestApp::spawn().await;
        let ids = seed(&app, 5, "cam1").await;

        let mut paged = Vec::new();
        for offset in [0, 2, 4, 6] {
            paged.extend(
                app.list_ids(&routes::photos_page(&offset.to_string(), "2"))
                    .await,
            );
        }

        let unique: HashSet<i64> = paged.iter().copied().collect();
        assert_eq!(unique.len(), paged.len(), "pages overlap");
        assert_eq!(paged, newest_first(ids));
    }

    #[tokio::test]
    async fn offset_only_uses_default_page_size() {
        let app = TestApp::spawn().await;
        let ids = seed(&app, 3, "cam1").await;

        assert_eq!(app.list_ids("/api/photos/?offset=1").await, vec![ids[1], ids[0]]);
    }

    #[tokio::test]
    async fn invalid_numbers_fall_back_to_first_page() {
        let app = TestApp::spawn().await;
        seed(&app, 22, "cam1").await;

        let expected = app.list_ids(&routes::photos_page("0", "20")).await;
        assert_eq!(expected.len(), 20);

        for (offset, limit) in [("abc", "xyz"), ("5", "ten"), ("-3", "2"), ("", "")] {
            assert_eq!(
                app.list_ids(&routes::photos_page(offset, limit)).await,
                expected,
                "offset={offset:?} limit={limit:?}"
            );
        }
    }

    #[tokio::test]
    async fn offset_past_end_is_empty_not_an_error() {
        let app = TestApp::spawn().await;
        seed(&app, 2, "cam1").await;

        assert!(app.list_ids(&routes::photos_page("10", "5")).await.is_empty());
    }

    #[tokio::test]
    async fn repeated_parameter_keeps_last_value() {
        let app = TestApp::spawn().await;
        let ids = seed(&app, 4, "cam1").await;

        let res = app.get("/api/photos/?offset=1&offset=2&limit=5&limit=1").await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            app.list_ids("/api/photos/?offset=1&offset=2&limit=5&limit=1").await,
            vec![ids[1]]
        );
    }

    #[tokio::test]
    async fn requested_limit_is_honoured_beyond_one_hundred() {
        let app = TestApp::spawn().await;
        let ids = seed(&app, 101, "cam1").await;

        assert_eq!(
            app.list_ids(&routes::photos_page("0", "101")).await,
            newest_first(ids)
        );
    }

    #[tokio::test]
    async fn configured_cap_bounds_page_size() {
        let app = TestApp::spawn_with_config(|config| {
            config.gallery.max_page_limit = Some(2);
        })
        .await;
        let ids = seed(&app, 3, "cam1").await;

        assert_eq!(
            app.list_ids(&routes::photos_page("0", "3")).await,
            vec![ids[2], ids[1]]
        );
    }

    #[tokio::test]
    async fn offset_beyond_signed_range_falls_back_to_first_page() {
        let app = TestApp::spawn().await;
        let ids = seed(&app, 2, "cam1").await;

        let too_big = (i64::MAX as u64 + 1).to_string();
        let res = app.get(&routes::photos_page(&too_big, "1")).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            app.list_ids(&routes::photos_page(&too_big, "1")).await,
            newest_first(ids)
        );
    }

    #[tokio::test]
    async fn filters_by_device() {
        let app = TestApp::spawn().await;
        let front = seed(&app, 2, "front").await;
        seed(&app, 2, "back").await;

        assert_eq!(
            app.list_ids("/api/photos/?device_id=front&offset=0&limit=10")
                .await,
            newest_first(front)
        );
    }
}
