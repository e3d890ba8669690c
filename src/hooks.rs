//! Lifecycle hooks invoked around every call.
//!
//! A [`Hook`] may rewrite the outgoing request, rewrite the response, or
//! substitute the error of a failed call. Hooks run in registration order and
//! each one sees the output of the previous one. Every method has a
//! pass-through default, so an implementation only overrides what it needs.
//!
//! # Examples
//!
//! ```
//! use dateno::hooks::{Hook, HookContext};
//!
//! struct TraceId;
//!
//! impl Hook for TraceId {
//!     fn before_request(
//!         &self,
//!         _ctx: &HookContext,
//!         mut request: reqwest::Request,
//!     ) -> dateno::Result<reqwest::Request> {
//!         request
//!             .headers_mut()
//!             .insert("x-trace-id", http::HeaderValue::from_static("abc"));
//!         Ok(request)
//!     }
//! }
//! ```

use crate::{config::SdkConfiguration, security::Security, Error, Result};
use http::{HeaderName, HeaderValue};
use std::fmt;
use std::sync::Arc;

/// Header identifying the SDK to the Dateno backend.
pub const DATENO_CLIENT_HEADER: &str = "dateno-client";

/// Per-call view of the configuration and operation, passed to every hook.
#[derive(Debug, Clone)]
pub struct HookContext {
    config: Arc<SdkConfiguration>,
    base_url: String,
    operation_id: String,
    oauth2_scopes: Vec<String>,
    security_source: Option<Security>,
}

impl HookContext {
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `operation_id` is empty.
    pub fn new(
        config: Arc<SdkConfiguration>,
        base_url: impl Into<String>,
        operation_id: impl Into<String>,
        oauth2_scopes: Vec<String>,
        security_source: Option<Security>,
    ) -> Result<Self> {
        let operation_id = operation_id.into();
        if operation_id.is_empty() {
            return Err(Error::Configuration(
                "hook context requires an operation id".to_string(),
            ));
        }

        Ok(Self {
            config,
            base_url: base_url.into(),
            operation_id,
            oauth2_scopes,
            security_source,
        })
    }

    pub fn config(&self) -> &SdkConfiguration {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn oauth2_scopes(&self) -> &[String] {
        &self.oauth2_scopes
    }

    pub fn security_source(&self) -> Option<&Security> {
        self.security_source.as_ref()
    }
}

/// Callbacks around a single call.
pub trait Hook: Send + Sync {
    /// Runs before the request is sent; the returned request is the one sent.
    fn before_request(
        &self,
        _ctx: &HookContext,
        request: reqwest::Request,
    ) -> Result<reqwest::Request> {
        Ok(request)
    }

    /// Runs when the response status matches none of the error patterns.
    fn after_success(
        &self,
        _ctx: &HookContext,
        response: reqwest::Response,
    ) -> Result<reqwest::Response> {
        Ok(response)
    }

    /// Runs when the status matches an error pattern or the transport failed.
    ///
    /// Returning an error raises it. Returning only a response lets the call
    /// continue with that response. The default hands both back unchanged.
    fn after_error(
        &self,
        _ctx: &HookContext,
        response: Option<reqwest::Response>,
        error: Option<Error>,
    ) -> (Option<reqwest::Response>, Option<Error>) {
        (response, error)
    }

    /// Runs last, whatever the outcome.
    fn after_all(
        &self,
        _ctx: &HookContext,
        _outcome: std::result::Result<&reqwest::Response, &Error>,
    ) -> Result<()> {
        Ok(())
    }
}

/// Ordered hook registry.
#[derive(Clone, Default)]
pub struct Hooks {
    hooks: Vec<Arc<dyn Hook>>,
}

impl Hooks {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the SDK's default hooks installed.
    pub fn with_defaults() -> Self {
        let mut hooks = Self::new();
        init_hooks(&mut hooks);
        hooks
    }

    pub fn register(&mut self, hook: impl Hook + 'static) {
        self.hooks.push(Arc::new(hook));
    }

    pub fn register_shared(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn before_request(
        &self,
        ctx: &HookContext,
        mut request: reqwest::Request,
    ) -> Result<reqwest::Request> {
        for hook in &self.hooks {
            request = hook.before_request(ctx, request)?;
        }
        Ok(request)
    }

    pub fn after_success(
        &self,
        ctx: &HookContext,
        mut response: reqwest::Response,
    ) -> Result<reqwest::Response> {
        for hook in &self.hooks {
            response = hook.after_success(ctx, response)?;
        }
        Ok(response)
    }

    pub fn after_error(
        &self,
        ctx: &HookContext,
        mut response: Option<reqwest::Response>,
        mut error: Option<Error>,
    ) -> (Option<reqwest::Response>, Option<Error>) {
        for hook in &self.hooks {
            (response, error) = hook.after_error(ctx, response, error);
        }
        (response, error)
    }

    pub fn after_all(
        &self,
        ctx: &HookContext,
        outcome: std::result::Result<&reqwest::Response, &Error>,
    ) -> Result<()> {
        for hook in &self.hooks {
            hook.after_all(ctx, outcome)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("len", &self.hooks.len())
            .finish()
    }
}

/// Adds `Dateno-Client: sdk-rust/<version>` unless the caller already set it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatenoClientHeaderHook;

impl Hook for DatenoClientHeaderHook {
    fn before_request(
        &self,
        ctx: &HookContext,
        mut request: reqwest::Request,
    ) -> Result<reqwest::Request> {
        if request.headers().contains_key(DATENO_CLIENT_HEADER) {
            return Ok(request);
        }

        let version = match ctx.config().sdk_version.as_str() {
            "" => "unknown",
            v => v,
        };
        let value = HeaderValue::try_from(format!("sdk-rust/{}", version))
            .map_err(|e| Error::Configuration(format!("Invalid SDK version: {}", e)))?;
        request
            .headers_mut()
            .insert(HeaderName::from_static(DATENO_CLIENT_HEADER), value);
        Ok(request)
    }
}

/// Registers the default hooks. Runs once per SDK instance.
pub fn init_hooks(hooks: &mut Hooks) {
    hooks.register(DatenoClientHeaderHook);
}
