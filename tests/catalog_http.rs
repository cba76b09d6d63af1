use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use serde_json::json;
use storefront::api::{CatalogService, ReqwestTransport, RetryPolicy, TokioSleeper};
use storefront::{CatalogWorker, ErrorCode, WorkerMessage, WorkerResponse};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product(id: u64, title: &str, category: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "price": 9.99,
        "description": "",
        "category": category,
        "image": "https://fakestoreapi.com/img/1.jpg",
        "rating": { "rate": 4.1, "count": 259 }
    })
}

fn service(server: &MockServer, timeout: Duration) -> CatalogService {
    let transport = ReqwestTransport::new(timeout).unwrap();
    CatalogService::new(Arc::new(transport), Url::parse(&server.uri()).unwrap())
}

fn worker(server: &MockServer) -> CatalogWorker {
    CatalogWorker::new(
        service(server, Duration::from_secs(5)),
        Duration::from_secs(300),
        RetryPolicy::new(3, Duration::ZERO),
        Arc::new(TokioSleeper),
        Arc::new(DefaultClock),
    )
}

#[tokio::test]
async fn fetches_products_with_json_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product(1, "Backpack", "men's clothing"),
            product(2, "Gold Ring", "jewelery"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let products = service(&server, Duration::from_secs(5)).fetch_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[1].title, "Gold Ring");
    assert_eq!(products[0].rating.count, 259);
}

#[tokio::test]
async fn category_path_is_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/category/men's%20clothing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(1, "Backpack", "men's clothing")])))
        .expect(1)
        .mount(&server)
        .await;

    let products = service(&server, Duration::from_secs(5))
        .fetch_products_by_category("men's clothing")
        .await
        .unwrap();

    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn not_found_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = service(&server, Duration::from_secs(5))
        .fetch_product_by_id(999)
        .await
        .unwrap_err();

    assert_eq!(error.status, Some(404));
    assert_eq!(error.message, "The requested resource was not found.");
    assert_eq!(error.code, ErrorCode::Native("ERR_BAD_REQUEST".to_string()));
    assert!(error.is_not_found_error());
}

#[tokio::test]
async fn undecodable_body_is_unknown_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let error = service(&server, Duration::from_secs(5))
        .fetch_categories()
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::Unknown);
    assert!(error.status.is_none());
}

#[tokio::test]
async fn slow_response_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let error = service(&server, Duration::from_millis(100))
        .fetch_products()
        .await
        .unwrap_err();

    assert!(error.is_network_error());
    assert!(!error.is_timeout_error());
    assert_eq!(error.message, "Network error. Please check your internet connection.");
}

#[tokio::test]
async fn worker_retries_server_errors_then_serves_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(1, "Backpack", "men's clothing")])))
        .expect(1)
        .mount(&server)
        .await;

    let worker = worker(&server);

    let first = worker.handle_message(WorkerMessage::load_products(false)).await;
    assert!(matches!(&first, WorkerResponse::ProductsLoaded { products } if products.len() == 1));

    let second = worker.handle_message(WorkerMessage::load_products(false)).await;
    assert!(matches!(second, WorkerResponse::ProductsLoaded { .. }));
}

#[tokio::test]
async fn worker_does_not_retry_client_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/7"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let response = worker(&server).handle_message(WorkerMessage::load_product(7)).await;

    let WorkerResponse::Error(error) = response else {
        panic!("expected an error, got {response:?}");
    };
    assert!(error.is_auth_error());
}
