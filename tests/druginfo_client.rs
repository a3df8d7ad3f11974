mod common;
use common::{body_text, received, settings_for, settings_with, target};

use druginfo_mcp::druginfo::{endpoint_by_operation, DrugInfoClient, Endpoint};
use druginfo_mcp::errors::DrugInfoError;
use druginfo_mcp::services::logger::Logger;
use druginfo_mcp::services::settings::Settings;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, body_string, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(operation: &str) -> &'static Endpoint {
    endpoint_by_operation(operation).expect("known endpoint")
}

fn client(settings: Arc<Settings>) -> DrugInfoClient {
    DrugInfoClient::new(Logger::new("test"), settings).expect("client")
}

fn mapping(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object")
}

async fn respond_any(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn legacy_aliases_fill_canonical_query_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/druginfo/main-ingredient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let out = client(settings_for(&server.uri()))
        .execute(
            endpoint("list_main_ingredient"),
            &json!({"q": "aspirin", "page": 2, "size": 10}),
        )
        .await
        .expect("ok");

    assert_eq!(out, mapping(json!({"items": []})));
    let requests = received(&server).await;
    assert_eq!(
        target(&requests[0]),
        "/v1/druginfo/main-ingredient?ingredientNameKor=aspirin&Page=2&PageSize=10"
    );
}

#[tokio::test]
async fn canonical_argument_beats_alias() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    client(settings_for(&server.uri()))
        .execute(
            endpoint("list_product"),
            &json!({"pillName": "tylenol", "q": "advil", "Page": 1, "page": 9}),
        )
        .await
        .expect("ok");

    assert_eq!(
        target(&received(&server).await[0]),
        "/v1/druginfo/product?pillName=tylenol&Page=1"
    );
}

#[tokio::test]
async fn unset_parameters_are_omitted_and_booleans_are_lowercase() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    client(settings_for(&server.uri()))
        .execute(
            endpoint("list_product"),
            &json!({"crop": true, "watermark": "FALSE", "vendor": null, "minCount": "3"}),
        )
        .await
        .expect("ok");

    assert_eq!(
        received(&server).await[0].url.query(),
        Some("crop=true&watermark=false&minCount=3")
    );
}

#[tokio::test]
async fn no_arguments_means_no_query_string() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    client(settings_for(&server.uri()))
        .execute(endpoint("list_main_ingredient_picto"), &Value::Null)
        .await
        .expect("ok");

    assert_eq!(
        target(&received(&server).await[0]),
        "/v1/druginfo/main-ingredient/picto"
    );
}

#[tokio::test]
async fn camel_case_paging_is_renamed_on_the_wire() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    client(settings_for(&server.uri()))
        .execute(
            endpoint("list_main_ingredient_guide_a5"),
            &json!({"edit": "y", "pageSize": 20, "page": 1, "sortBy": "id"}),
        )
        .await
        .expect("ok");

    assert_eq!(
        target(&received(&server).await[0]),
        "/v1/druginfo/main-ingredient/guide-A5?edit=y&PageSize=20&Page=1&SortBy=id"
    );
}

#[tokio::test]
async fn empty_code_fails_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    let client = client(settings_for(&server.uri()));

    for args in [json!({"code": ""}), json!({"code": null}), json!({})] {
        let err = client
            .execute(endpoint("get_main_ingredient_by_code"), &args)
            .await
            .expect_err("caller error");
        assert!(matches!(err, DrugInfoError::InvalidArgument(_)), "{:?}", err);
    }
    let err = client
        .execute(endpoint("get_main_ingredient_drug_effect_by_id"), &json!({"effectId": "abc"}))
        .await
        .expect_err("caller error");
    assert!(matches!(err, DrugInfoError::InvalidArgument(_)));
    assert!(received(&server).await.is_empty());
}

#[tokio::test]
async fn whitespace_code_is_sent_as_given() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(404).set_body_string("no such product")).await;

    let err = client(settings_for(&server.uri()))
        .execute(endpoint("get_product_by_code"), &json!({"code": " "}))
        .await
        .expect_err("404");

    assert!(matches!(err, DrugInfoError::Http { status: 404, .. }));
    assert_eq!(target(&received(&server).await[0]), "/v1/druginfo/product/%20");
}

#[tokio::test]
async fn path_identifiers_are_percent_encoded() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(200).set_body_json(json!({"code": "A 1/2"}))).await;

    client(settings_for(&server.uri()))
        .execute(endpoint("get_product_by_code"), &json!({"code": "A 1/2"}))
        .await
        .expect("ok");

    assert_eq!(
        target(&received(&server).await[0]),
        "/v1/druginfo/product/A%201%2F2"
    );
}

#[tokio::test]
async fn numeric_ids_accept_strings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/druginfo/main-ingredient/drug-effect/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let out = client(settings_for(&server.uri()))
        .execute(endpoint("get_main_ingredient_drug_effect_by_id"), &json!({"effectId": "42"}))
        .await
        .expect("ok");

    assert_eq!(out, mapping(json!({"id": 42})));
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(500).set_body_json(json!({"error": "x"}))).await;

    let err = client(settings_for(&server.uri()))
        .execute(endpoint("list_product"), &json!({}))
        .await
        .expect_err("500");

    match &err {
        DrugInfoError::Http { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, &json!({"error": "x"}));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains("500"), "{}", message);
    assert!(message.contains("x"), "{}", message);
}

#[tokio::test]
async fn non_json_error_body_is_wrapped_as_text() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(404).set_body_string("no such product")).await;

    let err = client(settings_for(&server.uri()))
        .execute(endpoint("get_product_by_code"), &json!({"code": "P1"}))
        .await
        .expect_err("404");

    assert!(matches!(
        err,
        DrugInfoError::Http { status: 404, ref body } if body == &json!({"text": "no such product"})
    ));
}

#[tokio::test]
async fn unauthorized_is_distinguished() {
    let server = MockServer::start().await;
    respond_any(&server, ResponseTemplate::new(401).set_body_json(json!({"message": "expired"}))).await;

    let err = client(settings_for(&server.uri()))
        .execute(endpoint("list_product"), &json!({}))
        .await
        .expect_err("401");

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn success_bodies_are_normalized_to_mappings() {
    let server = MockServer::start().await;
    for template in [
        ResponseTemplate::new(200).set_body_string("[1,2,3]"),
        ResponseTemplate::new(200).set_body_string("not json"),
        ResponseTemplate::new(200).set_body_json(json!({"a": 1})),
        ResponseTemplate::new(200),
    ] {
        Mock::given(method("GET"))
            .respond_with(template)
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
    }
    let client = client(settings_for(&server.uri()));
    let list = endpoint("list_product_edicode");

    let outs = [
        client.execute(list, &json!({})).await.expect("array"),
        client.execute(list, &json!({})).await.expect("text"),
        client.execute(list, &json!({})).await.expect("object"),
        client.execute(list, &json!({})).await.expect("empty"),
    ];
    assert_eq!(outs[0], mapping(json!({"data": [1, 2, 3]})));
    assert_eq!(outs[1], mapping(json!({"text": "not json"})));
    assert_eq!(outs[2], mapping(json!({"a": 1})));
    assert_eq!(outs[3], mapping(json!({"text": ""})));
}

#[tokio::test]
async fn requests_carry_accept_and_bearer_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("accept", "application/json"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(settings_for(&server.uri()))
        .execute(endpoint("list_product"), &json!({}))
        .await
        .expect("ok");
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(settings_with(&[("EDB_BASE_URL", server.uri().as_str())]))
        .execute(endpoint("list_product"), &json!({}))
        .await
        .expect("ok");
}

#[tokio::test]
async fn base_url_path_and_trailing_slash_are_respected() {
    let server = MockServer::start().await;
    Mock::given(path("/gateway/v1/druginfo/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/gateway/", server.uri());
    client(settings_for(&base))
        .execute(endpoint("list_product"), &json!({}))
        .await
        .expect("ok");
}

#[tokio::test]
async fn origin_falls_back_to_login_url() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/druginfo/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let login = format!("{}/auth/login", server.uri());
    client(settings_with(&[("EDB_LOGIN_URL", login.as_str())]))
        .execute(endpoint("list_product"), &json!({}))
        .await
        .expect("ok");
}

#[tokio::test]
async fn missing_origin_is_a_config_error() {
    let err = client(settings_with(&[]))
        .execute(endpoint("list_product"), &json!({}))
        .await
        .expect_err("no origin");

    assert!(matches!(err, DrugInfoError::Config(_)));
}

#[tokio::test]
async fn json_write_sends_body_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/druginfo/product"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"pillName": "x"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let out = client(settings_for(&server.uri()))
        .execute(endpoint("create_product"), &json!({"body": {"pillName": "x"}}))
        .await
        .expect("ok");

    assert_eq!(out, mapping(json!({"id": 7})));
}

#[tokio::test]
async fn form_write_is_urlencoded() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/druginfo/main-ingredient/picto"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(settings_for(&server.uri()))
        .execute(
            endpoint("update_main_ingredient_picto"),
            &json!({
                "body": {"Title": "a b", "IsDeleted": false, "skip": null},
                "contentType": "application/x-www-form-urlencoded"
            }),
        )
        .await
        .expect("ok");

    assert_eq!(body_text(&received(&server).await[0]), "IsDeleted=false&Title=a+b");
}

#[tokio::test]
async fn delete_and_nested_write_paths() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/druginfo/main-ingredient/drug-kind/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/druginfo/main-ingredient/M01/cache"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/druginfo/main-ingredient/M01/bulk"))
        .and(body_string(r#"[{"a":1}]"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(settings_for(&server.uri()));
    client
        .execute(endpoint("delete_drug_kind"), &json!({"id": 5}))
        .await
        .expect("delete");
    client
        .execute(endpoint("delete_main_ingredient_cache"), &json!({"code": "M01"}))
        .await
        .expect("cache");
    client
        .execute(endpoint("bulk_main_ingredient"), &json!({"code": "M01", "body": [{"a": 1}]}))
        .await
        .expect("bulk");
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let err = client(settings_for("http://127.0.0.1:9"))
        .execute(endpoint("list_product"), &json!({}))
        .await
        .expect_err("refused");

    assert!(!err.is_unauthorized());
    assert!(
        matches!(err, DrugInfoError::Transport { timeout: false, .. }),
        "{:?}",
        err
    );
    assert!(err.to_string().starts_with("request failed: "), "{}", err);
}

#[tokio::test]
async fn silent_server_times_out_with_original_message() {
    let server = MockServer::start().await;
    respond_any(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let started = Instant::now();
    let err = client(settings_for(&server.uri()))
        .execute(endpoint("list_product"), &json!({"timeout": 1}))
        .await
        .expect_err("timeout");

    assert!(started.elapsed() < Duration::from_millis(2500), "{:?}", started.elapsed());
    match &err {
        DrugInfoError::Transport { timeout, message } => {
            assert!(*timeout);
            assert!(message.contains("/v1/druginfo/product"), "{}", message);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
