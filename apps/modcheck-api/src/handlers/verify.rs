//! Bank account verification endpoint.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use modcheck_core::domain::BankAccount;
use modcheck_shared::dto::{ValidityResponse, VerifyRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::responses;
use crate::state::AppState;

/// Tell in JSON whether a bank account is valid.
///
/// POST /verify
pub async fn verify(state: web::Data<AppState>, body: web::Bytes) -> AppResult<HttpResponse> {
    // Decode the JSON payload.
    let request: VerifyRequest =
        serde_json::from_slice(&body).map_err(|_| AppError::InvalidJson)?;

    let account = BankAccount::new(request.sort_code, request.account_number);

    // Check that we got the expected shape before asking the resolver.
    if !account.has_expected_format() {
        return Err(AppError::InvalidBankAccount);
    }

    let is_valid = state.resolver.is_valid(&account);

    Ok(responses::json_response(
        StatusCode::OK,
        &ValidityResponse {
            sort_code: account.sort_code,
            account_number: account.account_number,
            is_valid,
        },
    ))
}

#[cfg(test)]
mod tests {
    use actix_web::http::header;
    use actix_web::{App, test, web};
    use std::sync::Arc;

    use modcheck_core::ports::CounterStore;
    use modcheck_infra::{ModulusResolver, StaticApiKeyRegistry};
    use modcheck_shared::ApiMessage;
    use modcheck_shared::dto::ValidityResponse;

    use crate::handlers::configure_routes;
    use crate::middleware::admission::AdmissionPipeline;
    use crate::middleware::auth::AuthorizationGate;
    use crate::middleware::rate_limit::RateLimitStage;
    use crate::responses::APPLICATION_JSON_UTF8;
    use crate::state::AppState;
    use crate::test_support::{CountingStore, DownStore, wide_window_limiter};

    fn pipeline_over(store: Arc<dyn CounterStore>) -> Arc<AdmissionPipeline> {
        let registry = StaticApiKeyRegistry::new(["foo".to_string(), "bar".to_string()]);
        Arc::new(AdmissionPipeline::new(vec![
            Arc::new(AuthorizationGate::with_registry(Arc::new(registry))),
            Arc::new(RateLimitStage::new(Arc::new(wide_window_limiter(store)))),
        ]))
    }

    fn state() -> AppState {
        AppState {
            resolver: Arc::new(ModulusResolver::from_embedded()),
        }
    }

    fn verify_request(api_key: Option<&str>, payload: Option<&str>) -> test::TestRequest {
        let mut request = test::TestRequest::post().uri("/verify");
        if let Some(api_key) = api_key {
            request = request.insert_header(("Api-Key", api_key));
        }
        if let Some(payload) = payload {
            request = request.set_payload(payload.to_string());
        }
        request
    }

    fn account_payload(sort_code: &str, account_number: &str) -> String {
        format!(r#"{{"sort_code":"{sort_code}","account_number":"{account_number}"}}"#)
    }

    macro_rules! test_app {
        ($store:expr) => {{
            let pipeline = pipeline_over($store);
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state()))
                    .configure(move |cfg| configure_routes(cfg, pipeline)),
            )
            .await
        }};
    }

    async fn assert_message(
        response: actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        code: u16,
        status: &str,
        message: &str,
    ) {
        assert_eq!(response.status().as_u16(), code);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some(APPLICATION_JSON_UTF8)
        );

        let body: ApiMessage = test::read_body_json(response).await;
        assert_eq!(body.status, status);
        assert_eq!(body.message, message);
    }

    #[actix_web::test]
    async fn test_requires_api_key() {
        let store = Arc::new(CountingStore::new());
        let app = test_app!(store.clone());

        let response = test::call_service(&app, verify_request(None, None).to_request()).await;

        assert_message(
            response,
            401,
            "authorization_required",
            "Please provide a HTTP header called Api-Key.",
        )
        .await;
        // Rejected before the rate limiter: the store was never touched.
        assert_eq!(store.operations(), 0);
    }

    #[actix_web::test]
    async fn test_unrecognized_api_key_gets_the_same_response() {
        let store = Arc::new(CountingStore::new());
        let app = test_app!(store.clone());

        let response = test::call_service(&app, verify_request(Some("ab"), None).to_request()).await;

        assert_message(
            response,
            401,
            "authorization_required",
            "Please provide a HTTP header called Api-Key.",
        )
        .await;
        assert_eq!(store.operations(), 0);
    }

    #[actix_web::test]
    async fn test_warns_if_cannot_decode_json() {
        let app = test_app!(Arc::new(CountingStore::new()));

        let response =
            test::call_service(&app, verify_request(Some("foo"), Some("not json")).to_request()).await;

        assert_message(
            response,
            422,
            "invalid_json",
            "Cannot decode the given JSON payload.",
        )
        .await;
    }

    #[actix_web::test]
    async fn test_empty_body_cannot_be_decoded() {
        let app = test_app!(Arc::new(CountingStore::new()));

        let response = test::call_service(&app, verify_request(Some("foo"), None).to_request()).await;

        assert_message(
            response,
            422,
            "invalid_json",
            "Cannot decode the given JSON payload.",
        )
        .await;
    }

    #[actix_web::test]
    async fn test_warns_if_bank_account_details_are_not_valid() {
        let app = test_app!(Arc::new(CountingStore::new()));

        let payload = account_payload("123456", "11225");
        let response = test::call_service(&app, verify_request(Some("foo"), Some(&payload)).to_request()).await;

        assert_message(
            response,
            400,
            "invalid_bank_account",
            "Expected a 6 digits sort code and an account number between 6 and 10 digits.",
        )
        .await;
    }

    #[actix_web::test]
    async fn test_can_check_if_a_bank_account_is_actually_valid() {
        let app = test_app!(Arc::new(CountingStore::new()));

        // A valid bank account.
        let payload = account_payload("308037", "49743860");
        let response = test::call_service(&app, verify_request(Some("foo"), Some(&payload)).to_request()).await;
        assert_eq!(response.status().as_u16(), 200);
        let body: ValidityResponse = test::read_body_json(response).await;
        assert_eq!(body.sort_code, "308037");
        assert_eq!(body.account_number, "49743860");
        assert!(body.is_valid);

        // A non valid bank account.
        let payload = account_payload("308037", "49743861");
        let response = test::call_service(&app, verify_request(Some("foo"), Some(&payload)).to_request()).await;
        assert_eq!(response.status().as_u16(), 200);
        let body: ValidityResponse = test::read_body_json(response).await;
        assert!(!body.is_valid);
    }

    #[actix_web::test]
    async fn test_rate_limit_is_in_place() {
        let app = test_app!(Arc::new(CountingStore::new()));
        let payload = account_payload("308037", "49743860");

        // Five admitted requests count the remaining quota down to zero.
        for expected_remaining in ["4", "3", "2", "1", "0"] {
            let response =
                test::call_service(&app, verify_request(Some("foo"), Some(&payload)).to_request()).await;
            assert_eq!(response.status().as_u16(), 200);
            assert_eq!(
                response
                    .headers()
                    .get("Api-Remaining")
                    .and_then(|v| v.to_str().ok()),
                Some(expected_remaining)
            );
        }

        // The sixth and every further request in the window are denied.
        for _ in 0..2 {
            let response =
                test::call_service(&app, verify_request(Some("foo"), Some(&payload)).to_request()).await;
            assert_message(
                response,
                429,
                "rate_exceeded",
                "API rate exceeded. Too many requests.",
            )
            .await;
        }
    }

    #[actix_web::test]
    async fn test_distinct_api_keys_have_isolated_quotas() {
        let app = test_app!(Arc::new(CountingStore::new()));
        let payload = account_payload("308037", "49743860");

        // Exhaust the first caller's quota.
        for _ in 0..6 {
            test::call_service(&app, verify_request(Some("foo"), Some(&payload)).to_request()).await;
        }

        // The second caller still has a full window.
        let response = test::call_service(&app, verify_request(Some("bar"), Some(&payload)).to_request()).await;
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response
                .headers()
                .get("Api-Remaining")
                .and_then(|v| v.to_str().ok()),
            Some("4")
        );
    }

    #[actix_web::test]
    async fn test_unreachable_store_fails_closed() {
        let app = test_app!(Arc::new(DownStore));

        let payload = account_payload("308037", "49743860");
        let response = test::call_service(&app, verify_request(Some("foo"), Some(&payload)).to_request()).await;

        assert_message(
            response,
            500,
            "server_error",
            "Trouble contacting Redis. Aborting.",
        )
        .await;
    }
}
