use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::comment::{Comment, NewComment};
use super::error::StoreError;
use super::event::{Event, NewEvent, DATE_FORMAT};
use super::wire::{
    ApiResponse, BackendEvent, EventPatch, EventPayload, ListResponse, Pagination,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Parameters of `GET /events`. Unset (and zero) values are left off the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ListQuery {
    /// First page of `limit` events ordered by date.
    pub fn first_page(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            skip: None,
            category: None,
            sort_by: Some("eventDate".to_string()),
            sort_order: Some(SortOrder::Asc),
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip.filter(|s| *s > 0) {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sortBy", sort_by.to_string()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder", order.as_str().to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// CRUD façade over wherever events live.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<Event>, StoreError>;
    async fn get(&self, id: &str) -> Result<Event, StoreError>;
    async fn create(&self, event: &NewEvent) -> Result<Event, StoreError>;
    async fn update(&self, id: &str, patch: &EventPatch) -> Result<Event, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn upcoming(&self) -> Result<Vec<Event>, StoreError>;
    async fn range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Vec<Event>, StoreError>;
    async fn comments(&self, event_id: &str, limit: u32) -> Result<Vec<Comment>, StoreError>;
    async fn add_comment(&self, comment: &NewComment) -> Result<Comment, StoreError>;
}

/// [`EventStore`] backed by the REST service.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: Client,
    base: Url,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let mut base = Url::parse(base_url).map_err(|e| StoreError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical url".to_string(),
            });
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::Client)?;

        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base can always carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|source| StoreError::Network { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(operation, %status, "backend returned an error status");
            return Err(StoreError::Status { operation, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| StoreError::Decode { operation, source })
    }

    async fn send_one(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Event, StoreError> {
        let body: ApiResponse<BackendEvent> = self.send(operation, request).await?;
        check_success(operation, body.success, body.message)?;
        Ok(body.data.into())
    }

    async fn send_list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<(Vec<T>, Option<Pagination>), StoreError> {
        let body: ListResponse<T> = self.send(operation, request).await?;
        check_success(operation, body.success, body.message)?;
        Ok((body.data, body.pagination))
    }
}

fn check_success(
    operation: &'static str,
    success: bool,
    message: Option<String>,
) -> Result<(), StoreError> {
    if success {
        return Ok(());
    }
    let message = message.unwrap_or_else(|| "no reason given".to_string());
    warn!(operation, %message, "backend reported failure");
    Err(StoreError::Rejected { operation, message })
}

#[async_trait]
impl EventStore for HttpStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<Event>, StoreError> {
        let url = self.endpoint(&["events"]);
        debug!(%url, ?query, "listing events");
        let (data, pagination) = self
            .send_list::<BackendEvent>("list events", self.http.get(url).query(&query.to_pairs()))
            .await?;

        let items: Vec<Event> = data.into_iter().map(Event::from).collect();
        let pagination = pagination.unwrap_or(Pagination {
            total: items.len() as u64,
            limit: query.limit.map(u64::from).unwrap_or(items.len() as u64),
            skip: query.skip.map(u64::from).unwrap_or(0),
            has_more: false,
        });
        Ok(Page { items, pagination })
    }

    async fn get(&self, id: &str) -> Result<Event, StoreError> {
        let url = self.endpoint(&["events", id]);
        self.send_one("fetch event", self.http.get(url)).await
    }

    async fn create(&self, event: &NewEvent) -> Result<Event, StoreError> {
        let url = self.endpoint(&["events"]);
        debug!(title = %event.title, "creating event");
        self.send_one(
            "create event",
            self.http.post(url).json(&EventPayload::from(event)),
        )
        .await
    }

    async fn update(&self, id: &str, patch: &EventPatch) -> Result<Event, StoreError> {
        let url = self.endpoint(&["events", id]);
        debug!(id, "updating event");
        self.send_one("update event", self.http.put(url).json(patch))
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let operation = "delete event";
        let url = self.endpoint(&["events", id]);
        debug!(id, "deleting event");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|source| StoreError::Network { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(operation, %status, "backend returned an error status");
            return Err(StoreError::Status { operation, status });
        }
        Ok(())
    }

    async fn upcoming(&self) -> Result<Vec<Event>, StoreError> {
        let url = self.endpoint(&["events", "upcoming"]);
        let (data, _) = self
            .send_list::<BackendEvent>("fetch upcoming events", self.http.get(url))
            .await?;
        Ok(data.into_iter().map(Event::from).collect())
    }

    async fn range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Vec<Event>, StoreError> {
        let url = self.endpoint(&["events", "range"]);
        let mut pairs = vec![
            ("startDate", start.format(DATE_FORMAT).to_string()),
            ("endDate", end.format(DATE_FORMAT).to_string()),
        ];
        if let Some(limit) = limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(skip) = skip.filter(|s| *s > 0) {
            pairs.push(("skip", skip.to_string()));
        }

        let (data, _) = self
            .send_list::<BackendEvent>("fetch events in range", self.http.get(url).query(&pairs))
            .await?;
        Ok(data.into_iter().map(Event::from).collect())
    }

    async fn comments(&self, event_id: &str, limit: u32) -> Result<Vec<Comment>, StoreError> {
        let url = self.endpoint(&["comments"]);
        let pairs = [
            ("eventId", event_id.to_string()),
            ("limit", limit.to_string()),
            ("sortBy", "createdAt".to_string()),
            ("sortOrder", SortOrder::Desc.as_str().to_string()),
        ];
        let (data, _) = self
            .send_list::<Comment>("fetch comments", self.http.get(url).query(&pairs))
            .await?;
        Ok(data)
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let operation = "post comment";
        let url = self.endpoint(&["comments"]);
        let body: ApiResponse<Comment> = self
            .send(operation, self.http.post(url).json(comment))
            .await?;
        check_success(operation, body.success, body.message)?;
        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;
    use crate::journal::event::{EventUpdate, LabelSet};

    #[derive(Clone, Default)]
    struct Recorded {
        queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
        bodies: Arc<Mutex<Vec<Value>>>,
    }

    fn backend_event(id: &str, title: &str, date: &str) -> Value {
        json!({
            "_id": id,
            "title": title,
            "description": "",
            "eventDate": date,
            "category": "general",
            "metadata": { "labels": ["x"], "comments": "", "reaction": null },
            "createdAt": "2026-10-01T00:00:00.000Z",
            "updatedAt": "2026-10-01T00:00:00.000Z"
        })
    }

    async fn list_events(
        State(rec): State<Recorded>,
        Query(q): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        rec.queries.lock().unwrap().push(q);
        Json(json!({
            "success": true,
            "data": [backend_event("e1", "Trip", "2026-11-02"), backend_event("e2", "Party", "2026-12-24")],
            "pagination": { "total": 7, "limit": 2, "skip": 0, "hasMore": true }
        }))
    }

    async fn create_event(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
        rec.bodies.lock().unwrap().push(body.clone());
        let mut created = body;
        created["_id"] = json!("new-id");
        Json(json!({ "success": true, "data": created }))
    }

    async fn update_event(
        State(rec): State<Recorded>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        rec.bodies.lock().unwrap().push(body.clone());
        let mut updated = backend_event(&id, "Trip", "2026-11-02");
        updated["metadata"] = body["metadata"].clone();
        Json(json!({ "success": true, "data": updated }))
    }

    async fn delete_event(Path(id): Path<String>) -> StatusCode {
        if id == "missing" {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::NO_CONTENT
        }
    }

    async fn get_event(Path(id): Path<String>) -> Json<Value> {
        Json(json!({ "success": true, "data": backend_event(&id, "Trip", "2026-11-02") }))
    }

    async fn upcoming() -> Json<Value> {
        Json(json!({ "success": true, "data": [backend_event("u1", "Soon", "2026-10-20")] }))
    }

    async fn range(
        State(rec): State<Recorded>,
        Query(q): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        rec.queries.lock().unwrap().push(q);
        Json(json!({ "success": true, "count": 0, "data": [] }))
    }

    async fn list_comments(
        State(rec): State<Recorded>,
        Query(q): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        rec.queries.lock().unwrap().push(q);
        Json(json!({
            "success": true,
            "data": [{
                "_id": "c1", "eventId": "e1", "author": "Sam",
                "content": "can't wait", "createdAt": "2026-10-18T09:15:00.000Z"
            }]
        }))
    }

    async fn post_comment(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
        rec.bodies.lock().unwrap().push(body.clone());
        Json(json!({
            "success": true,
            "data": {
                "_id": "c2", "eventId": body["eventId"], "author": body["author"],
                "content": body["content"], "createdAt": "2026-10-19T10:00:00.000Z"
            }
        }))
    }

    async fn spawn_backend() -> (HttpStore, Recorded) {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let rec = Recorded::default();
        let app = Router::new()
            .route("/api/events", get(list_events).post(create_event))
            .route("/api/events/upcoming", get(upcoming))
            .route("/api/events/range", get(range))
            .route(
                "/api/events/{id}",
                get(get_event).put(update_event).delete(delete_event),
            )
            .route("/api/comments", get(list_comments).post(post_comment))
            .with_state(rec.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let store = HttpStore::new(&format!("http://{addr}/api"), Duration::from_secs(5))
            .expect("store");
        (store, rec)
    }

    async fn spawn_failing_backend(status: StatusCode, body: Value) -> HttpStore {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let app = Router::new().route(
            "/api/events",
            get(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        HttpStore::new(&format!("http://{addr}/api/"), Duration::from_secs(5)).expect("store")
    }

    #[test]
    fn query_pairs_skip_unset_and_zero_values() {
        let query = ListQuery {
            limit: Some(0),
            skip: Some(0),
            category: Some(String::new()),
            sort_by: None,
            sort_order: None,
        };
        assert!(query.to_pairs().is_empty());

        let pairs = ListQuery::first_page(100).to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit", "100".to_string()),
                ("sortBy", "eventDate".to_string()),
                ("sortOrder", "asc".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_non_hierarchical_base_url() {
        let err = HttpStore::new("mailto:someone@example.com", Duration::from_secs(1))
            .expect_err("must fail");
        assert!(matches!(err, StoreError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn endpoints_keep_base_path_and_escape_ids() {
        let store = HttpStore::new("http://localhost:5000/api", Duration::from_secs(1)).unwrap();
        assert_eq!(
            store.endpoint(&["events", "a b"]).as_str(),
            "http://localhost:5000/api/events/a%20b"
        );
    }

    #[tokio::test]
    async fn list_maps_events_and_pagination() {
        let (store, rec) = spawn_backend().await;
        let page = store.list(&ListQuery::first_page(2)).await.expect("list");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "e1");
        assert_eq!(page.items[0].labels.to_vec(), vec!["x"]);
        assert_eq!(page.pagination.total, 7);
        assert!(page.pagination.has_more);

        let queries = rec.queries.lock().unwrap();
        assert_eq!(queries[0].get("limit").map(String::as_str), Some("2"));
        assert_eq!(queries[0].get("sortBy").map(String::as_str), Some("eventDate"));
        assert_eq!(queries[0].get("sortOrder").map(String::as_str), Some("asc"));
        assert!(!queries[0].contains_key("skip"));
    }

    #[tokio::test]
    async fn create_sends_mapped_payload_and_returns_assigned_id() {
        let (store, rec) = spawn_backend().await;
        let new_event = NewEvent {
            title: "Wedding".into(),
            date: "2027-05-01".into(),
            labels: ["family"].into_iter().collect(),
            comments: "bring gift".into(),
            reaction: None,
        };

        let created = store.create(&new_event).await.expect("create");
        assert_eq!(created.id, "new-id");
        assert_eq!(created.title, "Wedding");
        assert_eq!(created.comments, "bring gift");

        let bodies = rec.bodies.lock().unwrap();
        assert_eq!(bodies[0]["description"], "bring gift");
        assert_eq!(bodies[0]["category"], "general");
        assert_eq!(bodies[0]["metadata"]["labels"], json!(["family"]));
    }

    #[tokio::test]
    async fn update_puts_patch_to_event_path() {
        let (store, rec) = spawn_backend().await;
        let current = store.get("e9").await.expect("get");
        let patch = EventPatch::for_update(
            &current,
            &EventUpdate::Labels(["a", "b"].into_iter().collect::<LabelSet>()),
        );

        let updated = store.update("e9", &patch).await.expect("update");
        assert_eq!(updated.id, "e9");
        assert_eq!(updated.labels.to_vec(), vec!["a", "b"]);
        assert!(rec.bodies.lock().unwrap()[0].get("title").is_none());
    }

    #[tokio::test]
    async fn delete_reports_status_errors() {
        let (store, _) = spawn_backend().await;
        store.delete("e1").await.expect("delete");

        let err = store.delete("missing").await.expect_err("must fail");
        assert!(matches!(
            err,
            StoreError::Status { status, .. } if status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn upcoming_and_range_decode_plain_lists() {
        let (store, rec) = spawn_backend().await;
        let soon = store.upcoming().await.expect("upcoming");
        assert_eq!(soon[0].title, "Soon");

        let start = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();
        let events = store.range(start, end, Some(10), None).await.expect("range");
        assert!(events.is_empty());

        let queries = rec.queries.lock().unwrap();
        assert_eq!(queries[0].get("startDate").map(String::as_str), Some("2026-10-01"));
        assert_eq!(queries[0].get("endDate").map(String::as_str), Some("2026-10-31"));
        assert_eq!(queries[0].get("limit").map(String::as_str), Some("10"));
    }

    #[tokio::test]
    async fn comments_are_listed_newest_first_and_posted() {
        let (store, rec) = spawn_backend().await;
        let comments = store.comments("e1", 20).await.expect("comments");
        assert_eq!(comments[0].author, "Sam");

        let posted = store
            .add_comment(&NewComment::new("e1", "hello", ""))
            .await
            .expect("post");
        assert_eq!(posted.author, "Anonymous");

        let queries = rec.queries.lock().unwrap();
        assert_eq!(queries[0].get("eventId").map(String::as_str), Some("e1"));
        assert_eq!(queries[0].get("sortOrder").map(String::as_str), Some("desc"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let store = spawn_failing_backend(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "success": false, "message": "boom" }),
        )
        .await;
        let err = store.list(&ListQuery::default()).await.expect_err("must fail");
        assert!(matches!(err, StoreError::Status { .. }));
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_rejected() {
        let store = spawn_failing_backend(
            StatusCode::OK,
            json!({ "success": false, "message": "database offline", "data": [] }),
        )
        .await;
        let err = store.list(&ListQuery::default()).await.expect_err("must fail");
        match err {
            StoreError::Rejected { message, .. } => assert_eq!(message, "database offline"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let store = HttpStore::new(&format!("http://{addr}/api"), Duration::from_secs(2)).unwrap();
        let err = store.list(&ListQuery::default()).await.expect_err("must fail");
        assert!(matches!(err, StoreError::Network { .. }));
    }
}
