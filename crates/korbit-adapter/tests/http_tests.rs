/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for private request dispatch and classification
[POS]:    Integration tests - HTTP endpoints
[UPDATE]: When HTTP endpoints or classification rules change
*/

mod common;

use common::{
    ACCESS_TOKEN, mount_token_endpoint, setup_mock_server, test_client, test_client_with,
};
use korbit_adapter::{
    CancelOrderRequest, CancelWithdrawalRequest, Credentials, CurrencyPairQuery, ErrorKind,
    KorbitError, Nonce, OpenOrdersQuery, OrderRequest,
};
use reqwest::Method;
use tokio_test::assert_ok;
use wiremock::matchers::{
    bearer_token, body_string_contains, header, header_exists, method, path, query_param,
    query_param_is_missing,
};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_missing_credentials_make_no_requests() {
    let server = setup_mock_server().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client_with(&server, Credentials::new("", "secret", "user", "pw"));
    let err = client.user_info().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialsMissing);

    let client = test_client_with(&server, Credentials::empty());
    let order = OrderRequest::market_buy("btc_krw", "10000".parse().unwrap());
    let err = client.bid_order(&order).await.unwrap_err();
    assert!(matches!(err, KorbitError::CredentialsMissing));
}

#[tokio::test]
async fn test_private_get_authorizes_once_then_reuses_token() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/user/info"))
        .and(bearer_token(ACCESS_TOKEN))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "email": "trader@example.com",
            "nameCheckedAt": "2014-01-01T00:00:00.000Z",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let first = assert_ok!(client.user_info().await);
    let second = assert_ok!(client.user_info().await);

    assert_eq!(first["email"], "trader@example.com");
    assert_eq!(first, second);
    assert_eq!(client.tokens().access_token().as_deref(), Some(ACCESS_TOKEN));
}

#[tokio::test]
async fn test_failed_authorization_stops_private_call() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/access_token"))
        .respond_with(ResponseTemplate::new(401).insert_header("warning", "invalid_grant"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/user/info"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.user_info().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthorizationFailed);
    assert_eq!(err.message(), "invalid_grant");
    assert!(client.tokens().access_token().is_none());
}

#[tokio::test]
async fn test_private_success_status() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    let body = serde_json::json!({"orderId": "58738", "status": "success", "currency_pair": "btc_krw"});
    Mock::given(method("POST"))
        .and(path("/v1/user/orders/buy"))
        .and(bearer_token(ACCESS_TOKEN))
        .and(body_string_contains("type=limit"))
        .and(body_string_contains("price=500000"))
        .and(body_string_contains("coin_amount=0.01"))
        .and(body_string_contains("nonce="))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let order = OrderRequest::limit("btc_krw", "500000".parse().unwrap(), "0.01".parse().unwrap());
    let response = assert_ok!(client.bid_order(&order).await);
    assert_eq!(response, body);
}

#[tokio::test]
async fn test_private_business_failure() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/user/orders/sell"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "message": "insufficient balance",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let order = OrderRequest::market_sell("btc_krw", "3".parse().unwrap());
    let err = client.ask_order(&order).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ApplicationError);
    assert_eq!(err.message(), "error");
    match err {
        KorbitError::Application { body, .. } => {
            assert_eq!(body["message"], "insufficient balance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_private_503_is_transport_error_regardless_of_body() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/user/orders/cancel"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("warning", "Service temporarily unavailable")
                .set_body_json(serde_json::json!({"status": "success"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let req = CancelOrderRequest {
        currency_pair: "btc_krw".to_string(),
        id: "58738".to_string(),
    };
    let err = client.cancel_order(&req).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert_eq!(err.status_code(), Some(503));
    assert_eq!(err.message(), "Service temporarily unavailable");
}

#[tokio::test]
async fn test_private_non_json_body_is_transport_error() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/user/wallet"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .wallet_status(&CurrencyPairQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
}

#[tokio::test]
async fn test_get_params_and_nonce_go_in_query() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/user/orders/open"))
        .and(query_param("currency_pair", "eth_krw"))
        .and(query_param("limit", "10"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = OpenOrdersQuery {
        currency_pair: Some("eth_krw".to_string()),
        offset: None,
        limit: Some(10),
    };
    let response = assert_ok!(client.open_orders(&query).await);
    assert_eq!(response, serde_json::json!([]));
}

#[tokio::test]
async fn test_post_nonce_goes_in_body() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/user/coins/out/cancel"))
        .and(header_exists("authorization"))
        .and(query_param_is_missing("nonce"))
        .and(body_string_contains("id=42"))
        .and(body_string_contains("currency=btc"))
        .and(body_string_contains("nonce="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let req = CancelWithdrawalRequest {
        id: "42".to_string(),
        currency: Some("btc".to_string()),
    };
    assert_ok!(client.cancel_coin_withdrawal(&req).await);
}

#[tokio::test]
async fn test_sequential_private_calls_use_increasing_nonces() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/user/fiats/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(5)
        .mount(&server)
        .await;

    let client = test_client(&server);
    for _ in 0..5 {
        assert_ok!(client.fiat_withdrawal_status().await);
    }

    let requests = server.received_requests().await.expect("recording enabled");
    let nonces: Vec<Nonce> = requests
        .iter()
        .filter(|request| request.url.path() == "/v1/user/fiats/status")
        .map(|request| {
            let (_, value) = request
                .url
                .query_pairs()
                .find(|(key, _)| key == "nonce")
                .expect("nonce in query");
            value.parse().expect("well-formed nonce")
        })
        .collect();

    assert_eq!(nonces.len(), 5);
    assert!(nonces.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_concurrent_private_calls_authorize_once() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::token_response())
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/user/wallet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"balance": []})))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = CurrencyPairQuery::default();
    let (a, b, c) = tokio::join!(
        client.wallet_status(&query),
        client.wallet_status(&query),
        client.wallet_status(&query)
    );
    assert_ok!(a);
    assert_ok!(b);
    assert_ok!(c);
}

#[tokio::test]
async fn test_private_request_custom_method() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/user/custom"))
        .and(body_string_contains("nonce="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert_ok!(
        client
            .private_request(Method::DELETE, "/user/custom", &serde_json::json!({}))
            .await
    );
}

#[tokio::test]
async fn test_concurrent_private_calls_share_failed_authorization() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/access_token"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("warning", "invalid_grant")
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/user/wallet"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = CurrencyPairQuery::default();
    let (a, b, c) = tokio::join!(
        client.wallet_status(&query),
        client.wallet_status(&query),
        client.wallet_status(&query)
    );

    for outcome in [a, b, c] {
        let err = outcome.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthorizationFailed);
        assert_eq!(err.message(), "invalid_grant");
    }

    let grants = server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .filter(|request| request.url.path() == "/v1/oauth2/access_token")
        .count();
    assert_eq!(grants, 1);
}

#[tokio::test]
async fn test_caller_nonce_is_replaced() {
    let server = setup_mock_server().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/user/orders/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let params = serde_json::json!({"currency_pair": "btc_krw", "id": "7", "nonce": "1"});
    assert_ok!(
        client
            .private_request(Method::POST, "/user/orders/cancel", &params)
            .await
    );

    let requests = server.received_requests().await.expect("recording enabled");
    let cancel = requests
        .iter()
        .find(|request| request.url.path() == "/v1/user/orders/cancel")
        .expect("cancel request sent");
    let nonces: Vec<String> = url::form_urlencoded::parse(&cancel.body)
        .filter(|(key, _)| key == "nonce")
        .map(|(_, value)| value.into_owned())
        .collect();

    assert_eq!(nonces.len(), 1);
    assert_ne!(nonces[0], "1");
    assert_ok!(nonces[0].parse::<Nonce>());
}
