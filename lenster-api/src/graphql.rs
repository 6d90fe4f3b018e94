use lenster_core::{ServiceError, ServiceResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{instrument, trace};
use url::Url;

use crate::LensApiError;

/// Minimal GraphQL-over-HTTP client.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    url: Url,
    access_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V> {
    operation_name: &'a str,
    query: &'a str,
    variables: &'a V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GraphQlClient {
    /// A client for the endpoint at `url`.
    pub fn new(http: reqwest::Client, url: Url) -> Self {
        Self {
            http,
            url,
            access_token: None,
        }
    }

    /// Authenticate requests with the session's access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Run `query` and decode its `data`.
    #[instrument(skip(self, query, variables), fields(url = %self.url))]
    pub async fn execute<V, T>(
        &self,
        operation_name: &str,
        query: &str,
        variables: &V,
    ) -> ServiceResult<T>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest {
            operation_name,
            query,
            variables,
        };
        let mut req = self.http.post(self.url.clone()).json(&body);
        if let Some(token) = &self.access_token {
            req = req.header("x-access-token", format!("Bearer {token}"));
        }
        let res = req.send().await.map_err(LensApiError::from)?;
        let status = res.status();
        let text = res.text().await.map_err(LensApiError::from)?;
        trace!(%status, body = %text, "GraphQL response");

        match serde_json::from_str::<GraphQlResponse<T>>(&text) {
            Ok(response) => parse_response(response),
            Err(_) if !status.is_success() => Err(LensApiError::Status {
                service: "GraphQL backend",
                status,
            }
            .into()),
            Err(err) => Err(ServiceError::UnexpectedResponse(format!(
                "{operation_name}: {err}"
            ))),
        }
    }
}

fn parse_response<T>(response: GraphQlResponse<T>) -> ServiceResult<T> {
    if !response.errors.is_empty() {
        return Err(ServiceError::Api(
            response.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    response
        .data
        .ok_or_else(|| ServiceError::UnexpectedResponse("response without data".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ping: String,
    }

    fn parse(json: &str) -> ServiceResult<Ping> {
        parse_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn data_is_returned() {
        let ping = parse(r#"{ "data": { "ping": "pong" } }"#).unwrap();
        assert_eq!(ping.ping, "pong");
    }

    #[test]
    fn errors_win_over_partial_data() {
        let err = parse(
            r#"{
                "data": null,
                "errors": [
                    { "message": "Authentication required", "path": ["createPostTypedData"] },
                    { "message": "Token expired" }
                ]
            }"#,
        )
        .unwrap_err();
        match err {
            ServiceError::Api(messages) => {
                assert_eq!(messages, vec!["Authentication required", "Token expired"])
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_data_is_unexpected() {
        assert!(matches!(
            parse(r#"{ "data": null }"#),
            Err(ServiceError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn request_body_shape() {
        let variables = serde_json::json!({ "request": { "txHash": "0x01" } });
        let body = GraphQlRequest {
            operation_name: "Publication",
            query: "query Publication { id }",
            variables: &variables,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "Publication");
        assert_eq!(json["variables"]["request"]["txHash"], "0x01");
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let client = GraphQlClient::new(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9/graphql").unwrap(),
        );
        let res: ServiceResult<Ping> = client.execute("Ping", "query Ping { ping }", &()).await;
        assert!(matches!(res, Err(ServiceError::Other(_))));
    }
}
