//! Request orchestration shared by all resource APIs.
//!
//! Every operation is described by a static [`Operation`] and runs through
//! [`BaseSdk::execute`], which builds the request, threads it through the hook
//! pipeline and the retry policy, and maps the response onto either the
//! operation's result type or one of the typed [`Error`] variants.

use crate::{
    config::SdkConfiguration,
    hooks::HookContext,
    matcher::{content_type, match_response, match_status_codes},
    models::{ErrorResponseData, HttpValidationErrorData},
    request::{build_request, CallOptions, RequestDescriptor},
    response::{read_body_preview, BODY_PREVIEW_LIMIT},
    retry::{retry_async, Retries, DEFAULT_RETRY_STATUS_CODES},
    Error, Response, Result,
};
use http::Method;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Status patterns treated as errors by every operation.
pub const ERROR_STATUS_CODES: &[&str] = &["4XX", "5XX"];

/// Static description of one API operation.
#[derive(Debug, Clone)]
pub(crate) struct Operation {
    pub id: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub body_required: bool,
}

impl Operation {
    pub const fn get(id: &'static str, path: &'static str) -> Self {
        Self {
            id,
            method: Method::GET,
            path,
            body_required: false,
        }
    }

    pub const fn post_with_body(id: &'static str, path: &'static str) -> Self {
        Self {
            id,
            method: Method::POST,
            path,
            body_required: true,
        }
    }

    /// A fresh descriptor for this operation.
    pub fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::new(self.method.clone(), self.path).body_required(self.body_required)
    }
}

/// Transport-facing core shared by every resource API.
#[derive(Debug, Clone)]
pub struct BaseSdk {
    config: Arc<SdkConfiguration>,
}

impl BaseSdk {
    pub(crate) fn new(config: Arc<SdkConfiguration>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<SdkConfiguration> {
        &self.config
    }

    /// Sends `request` through the hook pipeline, retrying per `retries`.
    ///
    /// A response whose status matches `error_status_codes` is handed to the
    /// `after_error` hooks, which may raise an error or supply the response to
    /// continue with. Any other response goes through `after_success`.
    /// `after_all` runs once, after retrying has finished.
    ///
    /// # Errors
    ///
    /// Returns the error raised by a hook, [`Error::NoResponse`] when the
    /// transport failed and no hook supplied a response, or
    /// [`Error::Default`] when an error response was swallowed by a hook.
    ///
    /// In the swallowed case the hook has consumed the response, so the
    /// error keeps its status, content type and headers but its `body` is
    /// always empty.
    pub async fn do_request(
        &self,
        ctx: &HookContext,
        request: reqwest::Request,
        error_status_codes: &[&str],
        retries: Option<&Retries>,
    ) -> Result<reqwest::Response> {
        let result = match retries {
            Some(retries) => {
                let attempts = AtomicU32::new(0);
                retry_async(
                    || {
                        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
                        let request = request.try_clone();
                        async move {
                            let request = request.ok_or_else(|| {
                                Error::Configuration("request body cannot be replayed".to_string())
                            })?;
                            self.attempt(ctx, request, error_status_codes, Some(retries), attempt)
                                .await
                        }
                    },
                    retries,
                )
                .await
            }
            None => {
                self.attempt(ctx, request, error_status_codes, None, 1)
                    .await
            }
        };

        let result = match result {
            Err(Error::RetryableStatus { response, .. }) => Ok(*response),
            other => other,
        };

        self.config.hooks.after_all(ctx, result.as_ref())?;
        result
    }

    async fn attempt(
        &self,
        ctx: &HookContext,
        request: reqwest::Request,
        error_status_codes: &[&str],
        retries: Option<&Retries>,
        attempt: u32,
    ) -> Result<reqwest::Response> {
        let hooks = &self.config.hooks;
        let request = hooks.before_request(ctx, request)?;

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            operation = ctx.operation_id(),
            attempt = attempt,
            "Executing HTTP request"
        );

        let started = Instant::now();
        let response = match self.config.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = Error::from_transport(e);
                tracing::warn!(
                    error = %err,
                    operation = ctx.operation_id(),
                    attempt = attempt,
                    "Request failed"
                );

                match hooks.after_error(ctx, None, Some(err)) {
                    (_, Some(err)) => return Err(err),
                    (Some(response), None) => response,
                    (None, None) => {
                        return Err(Error::NoResponse("No response received".to_string()))
                    }
                }
            }
        };

        let status = response.status();
        tracing::info!(
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis(),
            operation = ctx.operation_id(),
            attempt = attempt,
            "Received HTTP response"
        );

        let response = if match_status_codes(error_status_codes, status.as_u16()) {
            let headers = response.headers().clone();
            match hooks.after_error(ctx, Some(response), None) {
                (_, Some(err)) => return Err(err),
                (Some(response), None) => response,
                // The body went with the response into the hook.
                (None, None) => {
                    return Err(Error::Default {
                        message: "Unexpected error occurred".to_string(),
                        status,
                        content_type: content_type(&headers).unwrap_or_default().to_string(),
                        body: String::new(),
                        headers,
                    })
                }
            }
        } else {
            hooks.after_success(ctx, response)?
        };

        if let Some(retries) = retries {
            let status = response.status();
            if retries.is_retryable_status(status.as_u16()) {
                return Err(Error::RetryableStatus {
                    status,
                    response: Box::new(response),
                });
            }
        }

        Ok(response)
    }

    /// Resolves configuration, builds the request and sends it.
    ///
    /// Returns the final response and the time spent, retries included.
    pub(crate) async fn send(
        &self,
        op: &Operation,
        descriptor: RequestDescriptor,
        options: Option<CallOptions>,
    ) -> Result<(reqwest::Response, Duration)> {
        let options = options.unwrap_or_default();

        let base_url = match options.server_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => url.strip_suffix('/').unwrap_or(url).to_string(),
            None => self.config.get_server_details()?,
        };

        let descriptor = descriptor
            .timeout(options.timeout.or(self.config.timeout))
            .header_overlay(options.headers);

        let security = self.config.security.as_ref().filter(|s| !s.is_empty());
        let request = build_request(
            &self.config.client,
            &base_url,
            &descriptor,
            security,
            &self.config.user_agent,
        )?;

        let ctx = HookContext::new(
            self.config.clone(),
            base_url,
            op.id,
            Vec::new(),
            self.config.security.clone(),
        )?;

        let retries = options
            .retries
            .or_else(|| self.config.retry_config.clone())
            .map(|config| Retries::new(config, DEFAULT_RETRY_STATUS_CODES.iter().copied()));

        let started = Instant::now();
        let response = self
            .do_request(&ctx, request, ERROR_STATUS_CODES, retries.as_ref())
            .await?;
        Ok((response, started.elapsed()))
    }

    /// Runs `op` and parses a `200 application/json` response into `T`.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        op: &Operation,
        descriptor: RequestDescriptor,
        options: Option<CallOptions>,
    ) -> Result<Response<T>> {
        let (response, latency) = self.send(op, descriptor, options).await?;

        let status = response.status();
        let headers = response.headers().clone();
        if !match_response(status, &headers, "200", "application/json") {
            return Err(error_from_response(response).await);
        }

        let raw_body = response.text().await.map_err(Error::from_transport)?;
        let data = parse_json::<T>(status, &raw_body)?;
        Ok(Response::new(data, raw_body, status, headers, latency))
    }

    /// Runs `op` and hands back any `200` response unread.
    pub(crate) async fn execute_stream(
        &self,
        op: &Operation,
        descriptor: RequestDescriptor,
        options: Option<CallOptions>,
    ) -> Result<reqwest::Response> {
        let (response, _) = self.send(op, descriptor, options).await?;

        if match_response(response.status(), response.headers(), "200", "*") {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }
}

fn parse_json<T: DeserializeOwned>(status: http::StatusCode, raw: &str) -> Result<T> {
    serde_json::from_str::<T>(raw).map_err(|source| {
        tracing::error!(
            error = %source,
            status = status.as_u16(),
            raw_response = %raw,
            "Failed to deserialize response"
        );
        Error::ResponseValidation {
            message: "Response validation failed".to_string(),
            status,
            raw_response: raw.to_string(),
            source,
        }
    })
}

/// Maps a response outside an operation's success branch onto an error.
async fn error_from_response(response: reqwest::Response) -> Error {
    let status = response.status();
    let headers = response.headers().clone();

    if match_response(status, &headers, "422", "application/json") {
        let raw_response = match response.text().await {
            Ok(raw) => raw,
            Err(e) => return Error::from_transport(e),
        };
        return match parse_json::<HttpValidationErrorData>(status, &raw_response) {
            Ok(data) => Error::Validation {
                status,
                data,
                raw_response,
                headers,
            },
            Err(e) => e,
        };
    }

    if match_response(status, &headers, ERROR_STATUS_CODES, "application/json") {
        let raw_response = match response.text().await {
            Ok(raw) => raw,
            Err(e) => return Error::from_transport(e),
        };
        return match parse_json::<ErrorResponseData>(status, &raw_response) {
            Ok(data) => Error::Api {
                status,
                data,
                raw_response,
                headers,
            },
            Err(e) => e,
        };
    }

    let message = if match_status_codes(ERROR_STATUS_CODES, status.as_u16()) {
        "API error occurred"
    } else {
        "Unexpected response received"
    };
    let content_type = content_type(&headers).unwrap_or_default().to_string();
    let body = match read_body_preview(response, BODY_PREVIEW_LIMIT).await {
        Ok(body) => body,
        Err(e) => return e,
    };

    Error::Default {
        message: message.to_string(),
        status,
        content_type,
        body,
        headers,
    }
}
