//! HTTP client for the Orzu lending service and the OTP service

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use super::models::{
    decode_envelope, decode_tranche_result, ClientLookup, Condition, Otp, PingStatus, Service,
};
use super::{GatewayError, PaymentGateway};
use crate::config::OrzuConfig;
use crate::domain::{GatewayTrancheRequest, TrancheResult};

/// Header carrying the static Orzu token
const TOKEN_HEADER: &str = "token";

/// reqwest-backed gateway. One attempt per call, bounded by the client timeout.
#[derive(Clone)]
pub struct OrzuGateway {
    client: Client,
    orzu: OrzuConfig,
    otp_url: String,
}

impl OrzuGateway {
    /// Creates a gateway client with the given per-request timeout
    pub fn new(
        orzu: OrzuConfig,
        otp_url: String,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            orzu,
            otp_url,
        })
    }

    fn orzu_url(&self, path: &str) -> String {
        format!("{}{}", self.orzu.url.trim_end_matches('/'), path)
    }

    fn otp_base(&self) -> &str {
        self.otp_url.trim_end_matches('/')
    }
}

/// Read the body, failing on any status other than `expected`
async fn expect_status(response: Response, expected: StatusCode) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected {
        return Err(GatewayError::status(status.as_u16(), body));
    }
    Ok(body)
}

#[async_trait]
impl PaymentGateway for OrzuGateway {
    async fn ping(&self) -> Result<PingStatus, GatewayError> {
        let url = self.orzu_url("/ping");
        tracing::info!(operation = "PING", url = %url, "Sending request to Orzu");

        let response = self.client.get(&url).send().await?;
        let status = response.json::<PingStatus>().await?;
        tracing::debug!(code = status.code, message = %status.message, "Orzu ping answered");
        Ok(status)
    }

    async fn client_by_inn(&self, inn: &str) -> Result<ClientLookup, GatewayError> {
        let url = self.orzu_url(&format!("/getClientByInnNew/{}", inn));
        tracing::info!(operation = "GET_CLIENT_BY_INN", url = %url, "Sending request to Orzu");

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.orzu.token)
            .send()
            .await?;
        let body = response.text().await?;
        tracing::debug!(body = %body, "Response from Orzu");
        decode_envelope(&body)
    }

    async fn send_otp(&self, otp: &Otp) -> Result<Otp, GatewayError> {
        let url = self.otp_base().to_string();
        tracing::info!(
            operation = "SEND_OTP",
            url = %url,
            account = %otp.account,
            "Sending request to OTP service"
        );

        let response = self.client.post(&url).json(otp).send().await?;
        let body = expect_status(response, StatusCode::CREATED).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn confirm_otp(&self, otp: &Otp) -> Result<(), GatewayError> {
        let url = format!("{}/{}", self.otp_base(), otp.id);
        tracing::info!(operation = "CONFIRM_OTP", url = %url, "Sending request to OTP service");

        let response = self.client.patch(&url).json(otp).send().await?;
        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError> {
        let url = self.orzu_url(&format!("/getServices/{}", self.orzu.terminal_token));
        tracing::info!(operation = "GET_SERVICES", "Sending request to Orzu");

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.orzu.token)
            .send()
            .await?;
        let body = expect_status(response, StatusCode::OK).await?;
        Ok(decode_envelope::<Vec<Service>>(&body)?.payload)
    }

    async fn list_conditions(
        &self,
        service_id: i64,
        orzu_id: i64,
    ) -> Result<Vec<Condition>, GatewayError> {
        let url = self.orzu_url("/getServiceConditions");
        tracing::info!(
            operation = "GET_SERVICE_CONDITIONS",
            url = %url,
            service_id,
            orzu_id,
            "Sending request to Orzu"
        );

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.orzu.token)
            .query(&[
                ("service_id", service_id.to_string()),
                ("orzu_id", orzu_id.to_string()),
                ("token", self.orzu.terminal_token.clone()),
            ])
            .send()
            .await?;
        let body = response.text().await?;
        tracing::debug!(body = %body, "Response from Orzu");
        Ok(decode_envelope::<Vec<Condition>>(&body)?.payload)
    }

    async fn create_tranche(
        &self,
        request: &GatewayTrancheRequest,
    ) -> Result<TrancheResult, GatewayError> {
        let url = self.orzu_url("/orzupay/pay");
        tracing::info!(
            operation = "CREATE_TRANCHE",
            url = %url,
            orzu_id = request.orzu_id,
            terminal_id = request.terminal_id,
            "Sending request to Orzu"
        );

        let response = self
            .client
            .post(&url)
            .header(TOKEN_HEADER, &self.orzu.token)
            .json(request)
            .send()
            .await?;
        let body = response.text().await?;
        tracing::debug!(body = %body, "Response from Orzu");
        decode_tranche_result(&body)
    }

    async fn precheck_card(&self, orzu_id: i64, pan: &str) -> Result<(), GatewayError> {
        let url = self.orzu_url("/preCheckCard");
        tracing::info!(operation = "CHECK_CARD", url = %url, orzu_id, "Sending request to Orzu");

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.orzu.token)
            .query(&[("pan", pan.to_string()), ("orzu_id", orzu_id.to_string())])
            .send()
            .await?;
        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }
}
