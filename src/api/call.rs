//! Fetch-state container for a single asynchronous call.
//!
//! [`ApiCall`] tracks whether a call is in flight and what it last produced.
//! One core operation, [`ApiCall::execute_with`], does the work; the two
//! failure disciplines are selected with [`OnFailure`]:
//!
//! - [`OnFailure::Raise`]: the error is recorded *and* returned
//! - [`OnFailure::Capture`]: the error is recorded and folded into a
//!   [`CallOutcome`]; the call itself never fails
//!
//! After every execution exactly one of `data` / `error` is populated and
//! `loading` is false.

use crate::domain::ApiError;
use serde::Serialize;
use std::future::Future;

/// How [`ApiCall::execute_with`] reports a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Raise,
    Capture,
}

/// Result of one execution, shaped for direct display.
#[derive(Debug, Clone, Serialize)]
pub struct CallOutcome<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub is_success: bool,
}

impl<T> CallOutcome<T> {
    const fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_success: true,
        }
    }

    const fn failure(error: ApiError) -> Self {
        Self {
            data: None,
            error: Some(error),
            is_success: false,
        }
    }
}

/// Observable state of a call: in flight, last data, last error.
#[derive(Debug, Clone)]
pub struct ApiCall<T> {
    loading: bool,
    data: Option<T>,
    error: Option<ApiError>,
}

impl<T> Default for ApiCall<T> {
    fn default() -> Self {
        Self {
            loading: false,
            data: None,
            error: None,
        }
    }
}

impl<T: Clone> ApiCall<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Clears data, error and the loading flag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Resets state, runs `call`, and records its outcome.
    ///
    /// # Errors
    ///
    /// With [`OnFailure::Raise`], returns the call's error after recording it.
    /// With [`OnFailure::Capture`] this never fails.
    pub async fn execute_with<F, Fut>(&mut self, call: F, on_failure: OnFailure) -> Result<CallOutcome<T>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.data = None;
        self.error = None;
        self.loading = true;

        let result = call().await;
        self.loading = false;

        match result {
            Ok(data) => {
                self.data = Some(data.clone());
                Ok(CallOutcome::success(data))
            }
            Err(error) => {
                self.error = Some(error.clone());
                match on_failure {
                    OnFailure::Raise => Err(error),
                    OnFailure::Capture => Ok(CallOutcome::failure(error)),
                }
            }
        }
    }

    /// Runs `call` and returns its data, or its error.
    ///
    /// # Errors
    ///
    /// Returns the call's error after recording it.
    pub async fn execute<F, Fut>(&mut self, call: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let outcome = self.execute_with(call, OnFailure::Raise).await?;
        outcome
            .data
            .ok_or_else(|| ApiError::validation("call completed without data"))
    }

    /// Runs `call` and folds any failure into the returned outcome.
    pub async fn execute_safe<F, Fut>(&mut self, call: F) -> CallOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match self.execute_with(call, OnFailure::Capture).await {
            Ok(outcome) => outcome,
            Err(error) => CallOutcome::failure(error),
        }
    }
}
