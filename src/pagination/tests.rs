//! Tests for pagination module

use super::*;
use crate::auth::AuthConfig;
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use futures::future::{ready, Ready};
use futures::{StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, Default, PartialEq)]
struct TestQuery {
    params: PageParams,
    name: Option<String>,
}

impl TestQuery {
    fn sized(per_page: u32) -> Self {
        Self {
            params: PageParams::page(1, per_page),
            name: None,
        }
    }
}

impl ListQuery for TestQuery {
    fn page_params(&self) -> &PageParams {
        &self.params
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.params
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        self.name
            .iter()
            .map(|n| ("name".to_string(), n.clone()))
            .collect()
    }
}

fn offset_page(items: Vec<u32>, page: u32, per_page: u32) -> PageEnvelope<u32> {
    let count = items.len() as u32;
    PageEnvelope::new(
        items,
        Some(PageMeta::Offset(PageInfo {
            page,
            per_page,
            count,
            total_count: 0,
            total_pages: 0,
        })),
    )
}

fn cursor_page(items: Vec<u32>, cursor: Option<&str>) -> PageEnvelope<u32> {
    PageEnvelope::new(
        items,
        Some(PageMeta::Cursor(CursorInfo::new(cursor.map(String::from)))),
    )
}

type Calls = Arc<Mutex<Vec<TestQuery>>>;

/// Fetcher that serves pre-built pages in order and records each query
fn scripted(
    pages: Vec<Result<PageEnvelope<u32>>>,
    calls: Calls,
) -> impl FnMut(TestQuery) -> Ready<Result<PageEnvelope<u32>>> {
    let mut pages = pages.into_iter();
    move |query| {
        calls.lock().unwrap().push(query);
        ready(
            pages
                .next()
                .unwrap_or_else(|| Err(Error::Other("no more scripted pages".into()))),
        )
    }
}

// ============================================================================
// extract_json_path
// ============================================================================

#[test]
fn test_extract_json_path_nested() {
    let body = json!({"result_info": {"cursors": {"after": "abc"}}});
    assert_eq!(
        extract_json_path(&body, "result_info.cursors.after"),
        Some(&json!("abc"))
    );
    assert_eq!(
        extract_json_path(&body, "$.result_info.cursors.after"),
        Some(&json!("abc"))
    );
    assert_eq!(extract_json_path(&body, "result_info.missing"), None);
    assert_eq!(extract_json_path(&body, ""), Some(&body));
}

#[test]
fn test_extract_json_path_through_scalar() {
    let body = json!({"result_info": "flat"});
    assert_eq!(extract_json_path(&body, "result_info.cursor"), None);
}

// ============================================================================
// ListQuery
// ============================================================================

#[test]
fn test_with_page_returns_new_value() {
    let original = TestQuery::sized(2);
    let next = original.with_page(3);

    assert_eq!(original.page(), Some(1));
    assert_eq!(next.page(), Some(3));
    assert_eq!(next.per_page(), Some(2));
}

#[test]
fn test_with_cursor_returns_new_value() {
    let original = TestQuery::default();
    let next = original.with_cursor("c1");

    assert_eq!(original.cursor(), None);
    assert_eq!(next.cursor(), Some("c1"));
}

#[test]
fn test_to_query_filters_then_paging() {
    let query = TestQuery {
        params: PageParams {
            page: Some(2),
            per_page: Some(50),
            cursor: Some("xyz".into()),
        },
        name: Some("prod".into()),
    };

    assert_eq!(
        query.to_query(),
        vec![
            ("name".to_string(), "prod".to_string()),
            ("page".to_string(), "2".to_string()),
            ("per_page".to_string(), "50".to_string()),
            ("cursor".to_string(), "xyz".to_string()),
        ]
    );
}

#[test]
fn test_to_query_empty() {
    assert!(TestQuery::default().to_query().is_empty());
}

// ============================================================================
// Extractors
// ============================================================================

#[test]
fn test_offset_extractor_reads_result_info() {
    let body = json!({
        "result": [1, 2],
        "result_info": {"page": 3, "per_page": 2, "count": 2, "total_count": 9, "total_pages": 5}
    });

    let meta = OffsetExtractor::default().extract(&body).unwrap();
    assert_eq!(
        meta,
        Some(PageMeta::Offset(PageInfo {
            page: 3,
            per_page: 2,
            count: 2,
            total_count: 9,
            total_pages: 5,
        }))
    );
}

#[test]
fn test_offset_extractor_count_defaults_to_result_len() {
    let body = json!({"result": [1, 2, 3], "result_info": {"page": 1, "per_page": 20}});

    let Some(PageMeta::Offset(info)) = OffsetExtractor::default().extract(&body).unwrap() else {
        panic!("expected offset metadata");
    };
    assert_eq!(info.count, 3);
    assert_eq!(info.total_pages, 0);
}

#[test]
fn test_offset_extractor_missing_info() {
    let body = json!({"result": []});
    assert_eq!(OffsetExtractor::default().extract(&body).unwrap(), None);

    let body = json!({"result": [], "result_info": null});
    assert_eq!(OffsetExtractor::default().extract(&body).unwrap(), None);
}

#[test]
fn test_offset_extractor_rejects_non_object() {
    let body = json!({"result": [], "result_info": [1]});
    let err = OffsetExtractor::default().extract(&body).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_cursor_extractor_custom_path() {
    let body = json!({"result": [], "result_info": {"cursors": {"after": "next-1"}}});

    let meta = CursorExtractor::new("result_info.cursors.after")
        .extract(&body)
        .unwrap();
    assert_eq!(
        meta,
        Some(PageMeta::Cursor(CursorInfo::new(Some("next-1".into()))))
    );
}

#[test]
fn test_cursor_extractor_missing_cursor() {
    let body = json!({"result": [], "result_info": {"per_page": 20}});

    let meta = CursorExtractor::default().extract(&body).unwrap();
    assert_eq!(meta, Some(PageMeta::Cursor(CursorInfo::new(None))));
}

#[test]
fn test_cursor_extractor_rejects_non_string() {
    let body = json!({"result_info": {"cursor": 42}});
    assert!(CursorExtractor::default().extract(&body).is_err());
}

#[test]
fn test_no_extractor() {
    let body = json!({"result": [1], "result_info": {"page": 1}});
    assert_eq!(NoExtractor.extract(&body).unwrap(), None);
}

#[test]
fn test_cursor_info_empty_is_terminal() {
    assert_eq!(CursorInfo::new(Some(String::new())).next(), None);
    assert_eq!(CursorInfo::new(None).next(), None);
    assert_eq!(CursorInfo::new(Some("c".into())).next(), Some("c"));
}

// ============================================================================
// parse_page
// ============================================================================

#[test]
fn test_parse_page_keeps_order_and_duplicates() {
    let body = json!({"result": [3, 1, 3], "result_info": {"page": 1, "per_page": 5, "count": 3}});

    let page: PageEnvelope<u32> = parse_page(&body, &OffsetExtractor::default()).unwrap();
    assert_eq!(page.items, vec![3, 1, 3]);
    assert_eq!(page.offset_info().unwrap().count, 3);
}

#[test]
fn test_parse_page_null_result_is_empty() {
    let body = json!({"result": null});
    let page: PageEnvelope<Value> = parse_page(&body, &NoExtractor).unwrap();
    assert!(page.is_empty());
    assert!(page.page_info.is_none());
}

#[test]
fn test_parse_page_object_result_is_error() {
    let body = json!({"result": {"id": 1}});
    let err = parse_page::<Value>(&body, &NoExtractor).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

// ============================================================================
// next_query
// ============================================================================

#[test]
fn test_next_query_full_page_continues() {
    let query = TestQuery::sized(2);
    let next = next_query(&query, &offset_page(vec![1, 2], 1, 2)).unwrap();
    assert_eq!(next, NextPage::Continue(query.with_page(2)));
}

#[test]
fn test_next_query_short_page_stops() {
    let query = TestQuery::sized(2);
    let next = next_query(&query, &offset_page(vec![1], 3, 2)).unwrap();
    assert!(next.is_done());
}

#[test]
fn test_next_query_ignores_total_pages() {
    let query = TestQuery::sized(2);
    let mut page = offset_page(vec![1, 2], 1, 2);
    if let Some(PageMeta::Offset(info)) = page.page_info.as_mut() {
        info.total_pages = 1;
        info.total_count = 2;
    }
    assert!(next_query(&query, &page).unwrap().is_continue());
}

#[test]
fn test_next_query_uses_server_per_page_when_unrequested() {
    let query = TestQuery::default();
    let next = next_query(&query, &offset_page(vec![1, 2, 3], 1, 3)).unwrap();
    assert_eq!(next, NextPage::Continue(query.with_page(2)));

    let next = next_query(&query, &offset_page(vec![1, 2], 1, 3)).unwrap();
    assert!(next.is_done());
}

#[test]
fn test_next_query_server_capped_per_page_continues() {
    let query = TestQuery::sized(100);
    let items: Vec<u32> = (0..50).collect();
    let next = next_query(&query, &offset_page(items, 1, 50)).unwrap();
    assert_eq!(next, NextPage::Continue(query.with_page(2)));
}

#[test]
fn test_next_query_count_mismatch_is_integrity_error() {
    let query = TestQuery::sized(2);
    let mut page = offset_page(vec![1, 2], 1, 2);
    if let Some(PageMeta::Offset(info)) = page.page_info.as_mut() {
        info.count = 5;
    }
    let err = next_query(&query, &page).unwrap_err();
    assert!(matches!(err, Error::PaginationIntegrity { .. }));
}

#[test]
fn test_next_query_oversized_page_is_integrity_error() {
    let query = TestQuery::sized(2);
    let err = next_query(&query, &offset_page(vec![1, 2, 3], 1, 2)).unwrap_err();
    assert!(matches!(err, Error::PaginationIntegrity { .. }));
}

#[test]
fn test_next_query_empty_cursor_stops_on_full_page() {
    let query = TestQuery::sized(2);
    let next = next_query(&query, &cursor_page(vec![1, 2], Some(""))).unwrap();
    assert!(next.is_done());
}

#[test]
fn test_next_query_cursor_continues() {
    let query = TestQuery::default();
    let next = next_query(&query, &cursor_page(vec![1], Some("c2"))).unwrap();
    assert_eq!(next, NextPage::Continue(query.with_cursor("c2")));
}

#[test]
fn test_next_query_stuck_cursor_is_integrity_error() {
    let query = TestQuery::default().with_cursor("same");
    let err = next_query(&query, &cursor_page(vec![1], Some("same"))).unwrap_err();
    assert!(matches!(err, Error::PaginationIntegrity { .. }));
}

#[test]
fn test_next_query_unpaginated_stops() {
    let query = TestQuery::default();
    let page = PageEnvelope::new(vec![1u32, 2, 3], None);
    assert!(next_query(&query, &page).unwrap().is_done());
}

// ============================================================================
// Paginator (scripted fetcher)
// ============================================================================

#[tokio::test]
async fn test_paginator_five_items_two_per_page() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(offset_page(vec![1, 2], 1, 2)),
            Ok(offset_page(vec![3, 4], 2, 2)),
            Ok(offset_page(vec![5], 3, 2)),
        ],
        calls.clone(),
    );

    let items = Paginator::new(TestQuery::sized(2), fetcher)
        .collect_all()
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2, 3, 4, 5]);
    let pages: Vec<_> = calls.lock().unwrap().iter().map(ListQuery::page).collect();
    assert_eq!(pages, vec![Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn test_paginator_server_caps_page_size() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(offset_page((0..50).collect(), 1, 50)),
            Ok(offset_page((50..100).collect(), 2, 50)),
            Ok(offset_page((100..120).collect(), 3, 50)),
        ],
        calls.clone(),
    );

    let items = Paginator::new(TestQuery::sized(100), fetcher)
        .collect_all()
        .await
        .unwrap();

    assert_eq!(items, (0..120).collect::<Vec<u32>>());
    assert_eq!(calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_paginator_stops_on_empty_page() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(offset_page(vec![1, 2], 1, 2)),
            Ok(offset_page(vec![], 2, 2)),
        ],
        calls.clone(),
    );

    let items = Paginator::new(TestQuery::sized(2), fetcher)
        .collect_all()
        .await
        .unwrap();

    assert_eq!(items, vec![1, 2]);
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_paginator_cursor_pages() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(cursor_page(vec![10, 11], Some("c1"))),
            Ok(cursor_page(vec![12], Some("c2"))),
            Ok(cursor_page(vec![13], None)),
        ],
        calls.clone(),
    );

    let items = Paginator::new(TestQuery::default(), fetcher)
        .collect_all()
        .await
        .unwrap();

    assert_eq!(items, vec![10, 11, 12, 13]);
    let cursors: Vec<_> = calls
        .lock()
        .unwrap()
        .iter()
        .map(|q| q.cursor().map(String::from))
        .collect();
    assert_eq!(cursors, vec![None, Some("c1".into()), Some("c2".into())]);
}

#[tokio::test]
async fn test_paginator_error_keeps_yielded_items() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(offset_page(vec![1, 2], 1, 2)),
            Err(Error::api(503, vec![])),
        ],
        calls.clone(),
    );

    let mut stream = Paginator::new(TestQuery::sized(2), fetcher);
    assert_eq!(stream.next().await.unwrap().unwrap(), 1);
    assert_eq!(stream.next().await.unwrap().unwrap(), 2);

    let err = stream.next().await.unwrap().unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(stream.next().await.is_none());
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_paginator_integrity_error_after_items() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(cursor_page(vec![1], Some("loop"))),
            Ok(cursor_page(vec![2], Some("loop"))),
        ],
        calls.clone(),
    );

    let results: Vec<Result<u32>> = Paginator::new(TestQuery::default(), fetcher)
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(*results[0].as_ref().unwrap(), 1);
    assert_eq!(*results[1].as_ref().unwrap(), 2);
    assert!(matches!(
        results[2],
        Err(Error::PaginationIntegrity { .. })
    ));
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_paginator_is_lazy() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(offset_page(vec![1, 2], 1, 2)),
            Ok(offset_page(vec![3], 2, 2)),
        ],
        calls.clone(),
    );

    let stream = Paginator::new(TestQuery::sized(2), fetcher);
    assert_eq!(calls.lock().unwrap().len(), 0);

    let first: Vec<u32> = stream.take(2).try_collect().await.unwrap();
    assert_eq!(first, vec![1, 2]);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_paginator_cancelled_before_next_fetch() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(offset_page(vec![1, 2], 1, 2)),
            Ok(offset_page(vec![3], 2, 2)),
        ],
        calls.clone(),
    );
    let token = CancellationToken::new();

    let mut stream =
        Paginator::new(TestQuery::sized(2), fetcher).with_cancel(Some(token.clone()));
    assert_eq!(stream.next().await.unwrap().unwrap(), 1);
    token.cancel();
    assert_eq!(stream.next().await.unwrap().unwrap(), 2);

    let err = stream.next().await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    assert!(stream.next().await.is_none());
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_pages_yields_envelopes() {
    let calls = Calls::default();
    let fetcher = scripted(
        vec![
            Ok(offset_page(vec![1, 2], 1, 2)),
            Ok(offset_page(vec![3], 2, 2)),
        ],
        calls.clone(),
    );

    let pages: Vec<PageEnvelope<u32>> = Paginator::new(TestQuery::sized(2), fetcher)
        .pages()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].items, vec![1, 2]);
    assert_eq!(pages[1].offset_info().unwrap().page, 2);
}

// ============================================================================
// fetch_page + Paginator against a mock server
// ============================================================================

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    HttpClient::with_auth(config, AuthConfig::bearer("t")).unwrap()
}

fn d1_body(ids: &[&str], page: u32) -> Value {
    let result: Vec<Value> = ids.iter().map(|id| json!({"uuid": id})).collect();
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
        "result_info": {
            "page": page,
            "per_page": 2,
            "count": ids.len(),
            "total_count": 0,
            "total_pages": 0
        }
    })
}

#[tokio::test]
async fn test_fetch_page_sends_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/a/d1/database"))
        .and(query_param("name", "prod"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(d1_body(&["d1", "d2"], 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = TestQuery {
        name: Some("prod".into()),
        ..TestQuery::sized(2)
    };

    let page: PageEnvelope<Value> = fetch_page(
        &client,
        "/accounts/a/d1/database",
        &query,
        &OffsetExtractor::default(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.items[0]["uuid"], "d1");
}

#[tokio::test]
async fn test_paginator_over_http_ignores_zero_total_pages() {
    let mock_server = MockServer::start().await;

    for (page, ids) in [(1, vec!["a", "b"]), (2, vec!["c", "d"]), (3, vec!["e"])] {
        Mock::given(method("GET"))
            .and(path("/accounts/a/d1/database"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(d1_body(&ids, page)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let extractor = OffsetExtractor::default();
    let client_ref = &client;
    let extractor_ref = &extractor;

    let items: Vec<Value> = Paginator::new(TestQuery::sized(2), |q| async move {
        fetch_page(client_ref, "/accounts/a/d1/database", &q, extractor_ref, None).await
    })
    .collect_all()
    .await
    .unwrap();

    let ids: Vec<&str> = items.iter().filter_map(|v| v["uuid"].as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_paginator_over_http_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/a/r2/buckets"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [{"name": "b1"}, {"name": "b2"}],
            "result_info": {"cursor": "b2", "per_page": 2}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/accounts/a/r2/buckets"))
        .and(query_param("cursor", "b2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [{"name": "b3"}],
            "result_info": {"cursor": "", "per_page": 2}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let extractor = CursorExtractor::default();
    let client_ref = &client;
    let extractor_ref = &extractor;

    let items: Vec<Value> = Paginator::new(TestQuery::default(), |q| async move {
        fetch_page(client_ref, "/accounts/a/r2/buckets", &q, extractor_ref, None).await
    })
    .collect_all()
    .await
    .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[2]["name"], "b3");
}

#[tokio::test]
async fn test_paginator_over_http_propagates_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/a/d1/database"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{"code": 10000, "message": "Authentication error"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let extractor = OffsetExtractor::default();
    let client_ref = &client;
    let extractor_ref = &extractor;

    let err = Paginator::new(TestQuery::sized(2), |q| async move {
        fetch_page::<Value, _>(client_ref, "/accounts/a/d1/database", &q, extractor_ref, None)
            .await
    })
    .collect_all()
    .await
    .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(err.has_error_code(10000));
}
