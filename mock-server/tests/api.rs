use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Item};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

const NIL: &str = "00000000-0000-0000-0000-000000000000";

#[tokio::test]
async fn list_items_empty() {
    let resp = app().oneshot(empty_request("GET", "/items")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn create_item_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/items", r#"{"name":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item.name, "x");
    assert!(!item.done);
}

#[tokio::test]
async fn create_item_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/items", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_item_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", &format!("/items/{NIL}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_item_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/items/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_item_not_found() {
    let resp = app()
        .oneshot(json_request("PATCH", &format!("/items/{NIL}"), r#"{"done":true}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_item_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", &format!("/items/{NIL}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fail_returns_500_with_text_body() {
    let resp = app().oneshot(empty_request("GET", "/fail")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body_bytes(resp).await[..], b"Internal");
}

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/items", r#"{"name":"Walk dog"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Item = body_json(resp).await;
    let id = created.id;

    // put replaces every field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/items/{id}"),
            r#"{"name":"Walk cat","done":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: Item = body_json(resp).await;
    assert_eq!(replaced.name, "Walk cat");
    assert!(replaced.done);

    // patch touches only the given field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PATCH", &format!("/items/{id}"), r#"{"done":false}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Item = body_json(resp).await;
    assert_eq!(patched.name, "Walk cat");
    assert!(!patched.done);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/items/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Item = body_json(resp).await;
    assert_eq!(fetched, patched);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/items/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // list after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/items"))
        .await
        .unwrap();
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}
