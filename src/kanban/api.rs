//! Client side of the HTTP surface. The controller only talks to
//! [`BoardApi`]; [`HttpBoardApi`] is the reqwest adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::{
    kanban::protocol::{
        paths, ApplicationDetails, DeleteResponse, FormResponse, KanbanResponse,
        StatusUpdateRequest, StatusUpdateResponse,
    },
    pipeline::ApplicationStatus,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a usable answer.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("undecodable response: {0}")]
    Decode(String),

    /// Non-2xx answer to a read request.
    #[error("server answered {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }
}

/// Write endpoints answer `{success, message?}` with any status code. A
/// non-2xx status always counts as a failure, whatever the body says.
pub trait Outcome: DeserializeOwned {
    fn mark_failed(&mut self);
}

impl Outcome for StatusUpdateResponse {
    fn mark_failed(&mut self) {
        self.success = false;
    }
}

impl Outcome for FormResponse {
    fn mark_failed(&mut self) {
        self.success = false;
    }
}

impl Outcome for DeleteResponse {
    fn mark_failed(&mut self) {
        self.success = false;
    }
}

#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn load_board(&self, board_id: Uuid) -> Result<KanbanResponse, ClientError>;
    async fn update_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<StatusUpdateResponse, ClientError>;
    async fn application_details(&self, id: Uuid) -> Result<ApplicationDetails, ClientError>;
    /// Pre-rendered HTML for a modal body.
    async fn fetch_fragment(&self, path: &str) -> Result<String, ClientError>;
    async fn submit_form(
        &self,
        path: &str,
        fields: &[(String, String)],
    ) -> Result<FormResponse, ClientError>;
    async fn delete(&self, path: &str) -> Result<DeleteResponse, ClientError>;
}

/// Bearer-authenticated client rooted at the server's base URL.
pub struct HttpBoardApi {
    client: Client,
    base: Url,
    access_token: String,
}

impl HttpBoardApi {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, access_token: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            access_token,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ClientError::Transport(format!("bad url {path}: {e}")))?;
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ClientError> {
        builder.send().await.map_err(map_transport_error)
    }

    async fn read<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::send(builder).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn write<T: Outcome>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::send(builder).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        let mut outcome: T =
            serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        if !status.is_success() {
            outcome.mark_failed();
        }
        Ok(outcome)
    }
}

fn map_transport_error(error: reqwest::Error) -> ClientError {
    ClientError::Transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
    ClientError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn load_board(&self, board_id: Uuid) -> Result<KanbanResponse, ClientError> {
        Self::read(self.request(Method::GET, &paths::kanban(board_id))?).await
    }

    async fn update_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<StatusUpdateResponse, ClientError> {
        let body = StatusUpdateRequest {
            status: status.as_str().to_string(),
        };
        let builder = self
            .request(Method::PATCH, &paths::application_status(application_id))?
            .json(&body);
        Self::write(builder).await
    }

    async fn application_details(&self, id: Uuid) -> Result<ApplicationDetails, ClientError> {
        Self::read(self.request(Method::GET, &paths::application_details(id))?).await
    }

    async fn fetch_fragment(&self, path: &str) -> Result<String, ClientError> {
        let response = Self::send(self.request(Method::GET, path)?).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        String::from_utf8(body.to_vec()).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn submit_form(
        &self,
        path: &str,
        fields: &[(String, String)],
    ) -> Result<FormResponse, ClientError> {
        Self::write(self.request(Method::POST, path)?.form(fields)).await
    }

    async fn delete(&self, path: &str) -> Result<DeleteResponse, ClientError> {
        Self::write(self.request(Method::DELETE, path)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::spawn;
    use axum::{
        http::StatusCode as ServerStatus,
        routing::{delete, get, patch, post},
        Json, Router,
    };
    use serde_json::json;

    /// A server that answers every endpoint with a canned, mostly unhappy reply.
    async fn canned_api() -> HttpBoardApi {
        let app = Router::new()
            .route(
                "/api/v1/applications/:id/status",
                patch(|| async {
                    (
                        ServerStatus::BAD_REQUEST,
                        Json(json!({ "success": true, "message": "Invalid status" })),
                    )
                }),
            )
            .route(
                "/api/v1/job-boards/:id/applications",
                post(|| async {
                    (
                        ServerStatus::UNPROCESSABLE_ENTITY,
                        Json(json!({
                            "success": false,
                            "message": "Please correct the errors below.",
                            "modal": "<form>retry</form>"
                        })),
                    )
                }),
            )
            .route(
                "/api/v1/applications/:id",
                delete(|| async { (ServerStatus::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
            )
            .route(
                "/api/v1/applications/:id/details",
                get(|| async { "not json" }),
            )
            .route(
                "/api/v1/job-boards/:id/kanban",
                get(|| async {
                    (
                        ServerStatus::NOT_FOUND,
                        Json(json!({ "success": false, "message": "Board not found" })),
                    )
                }),
            )
            .route(
                "/api/v1/applications/:id/_fragment/edit-modal",
                get(|| async { "<form>edit</form>" }),
            );
        let base = spawn(app).await;
        HttpBoardApi::new(base, "token".into(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn status_error_prefers_server_message() {
        let err = map_status_error(
            StatusCode::NOT_FOUND,
            br#"{"success":false,"message":"Application not found"}"#,
        );
        assert_eq!(
            err,
            ClientError::Rejected {
                status: 404,
                message: "Application not found".into()
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn status_error_falls_back_to_reason_phrase() {
        let err = map_status_error(StatusCode::BAD_GATEWAY, b"<html>");
        assert_eq!(
            err,
            ClientError::Rejected {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }

    #[test]
    fn outcome_can_be_forced_to_fail() {
        let mut res: StatusUpdateResponse =
            serde_json::from_str(r#"{"success":true}"#).unwrap();
        res.mark_failed();
        assert!(!res.success);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_failure() {
        let api = HttpBoardApi::new(
            Url::parse("http://127.0.0.1:1/").unwrap(),
            "token".into(),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = api
            .update_status(Uuid::nil(), ApplicationStatus::Applied)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn non_2xx_write_is_a_failure_whatever_the_body_says() {
        let api = canned_api().await;
        let res = api
            .update_status(Uuid::new_v4(), ApplicationStatus::Applied)
            .await
            .unwrap();
        assert!(!res.success);
        assert_eq!(res.message.as_deref(), Some("Invalid status"));
    }

    #[tokio::test]
    async fn rejected_form_keeps_its_modal() {
        let api = canned_api().await;
        let fields = vec![("company".to_string(), String::new())];
        let res = api
            .submit_form(&paths::create_application(Uuid::new_v4()), &fields)
            .await
            .unwrap();
        assert!(!res.success);
        assert_eq!(res.modal.as_deref(), Some("<form>retry</form>"));
    }

    #[tokio::test]
    async fn plain_text_error_body_is_a_decode_failure() {
        let api = canned_api().await;
        let err = api
            .delete(&paths::delete_application(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn reads_decode_or_reject() {
        let api = canned_api().await;

        let err = api.application_details(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));

        let err = api.load_board(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err,
            ClientError::Rejected {
                status: 404,
                message: "Board not found".into()
            }
        );
    }

    #[tokio::test]
    async fn fragment_is_returned_as_html() {
        let api = canned_api().await;
        let html = api
            .fetch_fragment(&paths::edit_application_modal(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(html, "<form>edit</form>");

        let err = api.fetch_fragment("/api/v1/missing").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
