use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::kernel::{BasePushDelivery, PushDispatch, PushPayload, TokenOutcome};

/// Expo Push Notification Client
/// Sends multicast push notifications to Expo mobile app users
pub struct ExpoClient {
    client: Client,
    access_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExpoMessage {
    to: String,
    title: String,
    body: String,
    data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpoResponse {
    data: Vec<ExpoTicket>,
}

#[derive(Debug, Deserialize)]
struct ExpoTicket {
    status: String,
    message: Option<String>,
}

impl ExpoClient {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            access_token,
        }
    }
}

#[async_trait]
impl BasePushDelivery for ExpoClient {
    /// Send one payload to many tokens in a single batched call (Expo accepts
    /// up to 100 messages per request). Tickets come back in request order,
    /// so outcomes are zipped against the token list by index.
    async fn send_multicast(
        &self,
        tokens: &[String],
        payload: &PushPayload,
    ) -> Result<PushDispatch> {
        if tokens.is_empty() {
            return Ok(PushDispatch::default());
        }

        let messages: Vec<ExpoMessage> = tokens
            .iter()
            .map(|token| ExpoMessage {
                to: token.clone(),
                title: payload.title.clone(),
                body: payload.body.clone(),
                data: payload.data.clone(),
                sound: Some("default".to_string()),
            })
            .collect();

        let mut request = self
            .client
            .post("https://exp.host/--/api/v2/push/send")
            .json(&messages);

        // Add access token if provided (for higher rate limits)
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        info!(count = messages.len(), "Sending Expo push multicast");

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            error!("Expo push failed {}: {}", status, body);
            anyhow::bail!("Expo push API error {}: {}", status, body);
        }

        let expo_response: ExpoResponse = response.json().await?;

        let mut dispatch = PushDispatch::default();
        for (idx, token) in tokens.iter().enumerate() {
            let ticket = expo_response.data.get(idx);
            let delivered = ticket.map(|t| t.status == "ok").unwrap_or(false);
            let error = match ticket {
                Some(t) if t.status != "ok" => {
                    Some(t.message.clone().unwrap_or_else(|| t.status.clone()))
                }
                None => Some("no ticket returned".to_string()),
                _ => None,
            };
            if delivered {
                dispatch.success_count += 1;
            } else {
                dispatch.failure_count += 1;
                error!(token = %token, ?error, "Expo ticket error");
            }
            dispatch.outcomes.push(TokenOutcome {
                token: token.clone(),
                delivered,
                error,
            });
        }

        info!(
            success = dispatch.success_count,
            failed = dispatch.failure_count,
            "Expo multicast complete"
        );

        Ok(dispatch)
    }
}
