//! Real HTTP round trips against an in-process upstream.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use vortex_core::config::DEFAULT_USER_AGENT;
use vortex_core::{
    CatalogError, CatalogSearch, Category, DetailResolver, HttpClientFactory, SearchQuery,
    SourceConfig, SourceKind, SourceRegistry, StaticSourceProvider,
};

async fn vod(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if let Some(ids) = params.get("ids") {
        if ids == "42" {
            return Json(json!({
                "code": 1,
                "list": [{
                    "vod_id": 42,
                    "vod_name": "The Matrix",
                    "type_id": 1,
                    "vod_year": "1999",
                    "vod_content": "<p>Wake up, Neo.</p>",
                    "vod_actor": "Keanu Reeves,Carrie-Anne Moss",
                    "vod_play_from": "m3u8",
                    "vod_play_url": "HD$https://v.example/matrix.m3u8"
                }]
            }));
        }
        return Json(json!({"code": 1, "list": []}));
    }

    let wd = params.get("wd").cloned().unwrap_or_default();
    let type_id = params.get("type").cloned().unwrap_or_else(|| "1".into());
    Json(json!({
        "code": 1,
        "total": 2,
        "list": [
            {
                "vod_id": "42",
                "vod_name": format!("{} (HD)", wd),
                "type_id": type_id,
                "vod_play_url": "1$https://v.example/a.m3u8#2$https://v.example/b.m3u8"
            },
            {
                "vod_id": "43",
                "vod_name": format!("{} trailer", wd),
                "vod_play_url": "1$https://share.example/page"
            }
        ]
    }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "db down")
}

async fn bgm_search(Path(keyword): Path<String>) -> Json<Value> {
    Json(json!({
        "results": 1,
        "list": [{
            "id": 253,
            "name": keyword,
            "name_cn": "星际牛仔",
            "air_date": "1998-10-23",
            "images": {"common": "https://lain.bgm.tv/c/253.jpg"}
        }]
    }))
}

async fn bgm_subject(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if id != "253" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "id": 253,
        "name": "カウボーイビバップ",
        "name_cn": "星际牛仔",
        "summary": "Space western.",
        "date": "1998-04-03",
        "total_episodes": 26
    })))
}

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/api.php/provide/vod/", get(vod))
        .route("/broken/", get(broken))
        .route("/bgm/search/subject/:keyword", get(bgm_search))
        .route("/bgm/v0/subjects/:id", get(bgm_subject));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn registry(addr: SocketAddr) -> SourceRegistry {
    let sources = vec![
        SourceConfig::new("cms", "CMS", format!("http://{}/api.php/provide/vod", addr))
            .with_priority(1),
        SourceConfig::new("down", "Down", format!("http://{}/broken", addr)).with_priority(2),
        SourceConfig::new("bgm", "Bangumi", format!("http://{}/bgm", addr))
            .with_priority(3)
            .with_kind(SourceKind::Bangumi),
    ];
    SourceRegistry::new(
        Arc::new(StaticSourceProvider::new(sources)),
        Arc::new(HttpClientFactory::new(DEFAULT_USER_AGENT).unwrap()),
    )
}

#[tokio::test]
async fn test_search_round_trip() {
    let addr = spawn_upstream().await;
    let search = CatalogSearch::new(registry(addr));

    let query = SearchQuery::new("cowboy bebop")
        .unwrap()
        .with_type(Some("3".to_string()));
    let results = search.search_all(&query, None).await.unwrap();

    // The trailer has no HLS episode and is dropped
    assert_eq!(results.total, 2);
    assert_eq!(results.items[0].id, "cms-42");
    assert_eq!(results.items[0].title, "cowboy bebop (HD)");
    assert_eq!(results.items[0].category, Some(Category::Anime));
    assert_eq!(results.items[1].id, "bgm-253");
    assert_eq!(results.items[1].title, "星际牛仔");
    assert_eq!(
        results.items[1].poster.as_deref(),
        Some("https://lain.bgm.tv/c/253.jpg")
    );

    assert_eq!(results.completed, vec!["cms".to_string(), "bgm".to_string()]);
    assert!(results.partial);
}

#[tokio::test]
async fn test_bangumi_honours_query_filters() {
    let addr = spawn_upstream().await;
    let search = CatalogSearch::new(registry(addr));

    let movies_2021 = SearchQuery::new("bebop")
        .unwrap()
        .with_year(Some("2021".to_string()))
        .with_type(Some("1".to_string()));
    let results = search.search_all(&movies_2021, None).await.unwrap();
    assert!(results.items.iter().all(|i| i.source != "bgm"));
    assert!(results.completed.contains(&"bgm".to_string()));

    let anime_2021 = SearchQuery::new("bebop")
        .unwrap()
        .with_year(Some("2021".to_string()))
        .with_type(Some("3".to_string()));
    let results = search.search_all(&anime_2021, None).await.unwrap();
    assert!(results.items.iter().all(|i| i.source != "bgm"));

    let anime_1998 = SearchQuery::new("bebop")
        .unwrap()
        .with_year(Some("1998".to_string()))
        .with_type(Some("3".to_string()));
    let results = search.search_all(&anime_1998, None).await.unwrap();
    let bgm: Vec<_> = results.items.iter().filter(|i| i.source == "bgm").collect();
    assert_eq!(bgm.len(), 1);
    assert_eq!(bgm[0].year.as_deref(), Some("1998"));
}

#[tokio::test]
async fn test_detail_round_trip() {
    let addr = spawn_upstream().await;
    let resolver = DetailResolver::new(registry(addr));

    let detail = resolver.get_detail("cms-42", None).await.unwrap();
    assert_eq!(detail.title, "The Matrix");
    assert_eq!(detail.description.as_deref(), Some("Wake up, Neo."));
    assert_eq!(detail.actors.len(), 2);
    assert_eq!(detail.play_sources[0].episodes[0].url, "https://v.example/matrix.m3u8");

    let anime = resolver.get_detail("bgm-253", None).await.unwrap();
    assert_eq!(anime.year.as_deref(), Some("1998"));
    assert_eq!(anime.category, Some(Category::Anime));

    assert!(matches!(
        resolver.get_detail("cms-999", None).await,
        Err(CatalogError::NotFound)
    ));
    assert!(matches!(
        resolver.get_detail("bgm-1", None).await,
        Err(CatalogError::NotFound)
    ));
    assert!(matches!(
        resolver.get_detail("down-1", None).await,
        Err(CatalogError::LookupFailed)
    ));
}
