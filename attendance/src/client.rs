//! reqwest-backed [`AttendanceServer`].

use crate::error::AttendanceError;
use crate::traits::server::AttendanceServer;
use crate::types::{
    AttendanceResult, AttendanceSubmission, LocationUpdate, RotatingToken, TokenResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const LOCATION_UPDATE_PATH: &str = "/api/update-location";
pub const TOKEN_PATH: &str = "/api/get-qr";
pub const MARK_ATTENDANCE_PATH: &str = "/api/mark-attendance";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct HttpAttendanceServer {
    client: Client,
    base_url: String,
    bus_no: Option<String>,
}

impl HttpAttendanceServer {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AttendanceError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            bus_no: None,
        })
    }

    /// Ask for tokens minted for `bus_no` rather than the server's default bus.
    pub fn with_bus(mut self, bus_no: impl Into<String>) -> Self {
        self.bus_no = Some(bus_no.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AttendanceServer for HttpAttendanceServer {
    async fn update_location(&self, update: &LocationUpdate) -> Result<(), AttendanceError> {
        self.client
            .post(self.url(LOCATION_UPDATE_PATH))
            .json(update)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn fetch_token(&self) -> Result<RotatingToken, AttendanceError> {
        let mut request = self.client.get(self.url(TOKEN_PATH));
        if let Some(bus_no) = &self.bus_no {
            request = request.query(&[("bus_no", bus_no)]);
        }
        let body: TokenResponse = request.send().await?.error_for_status()?.json().await?;
        Ok(RotatingToken::new(body.qr_data))
    }

    async fn mark_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<AttendanceResult, AttendanceError> {
        let response = self
            .client
            .post(self.url(MARK_ATTENDANCE_PATH))
            .json(submission)
            .send()
            .await?;

        // Rejections may arrive with a 4xx status and still carry a JSON verdict.
        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<AttendanceResult>(&text) {
            Ok(result) => Ok(result),
            Err(_) if !status.is_success() => Err(AttendanceError::NetworkFailure(format!(
                "server responded with {status}"
            ))),
            Err(e) => Err(AttendanceError::NetworkFailure(format!(
                "error decoding response body: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let server = HttpAttendanceServer::new("http://localhost:5000/").unwrap();
        assert_eq!(
            server.url(TOKEN_PATH),
            "http://localhost:5000/api/get-qr"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_failure() {
        // Port 9 (discard) is practically never bound on loopback.
        let server = HttpAttendanceServer::new("http://127.0.0.1:9").unwrap();
        let err = server.fetch_token().await.unwrap_err();
        assert!(matches!(err, AttendanceError::NetworkFailure(_)), "{err:?}");
    }
}
