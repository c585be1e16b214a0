//! Scripted validation and commit clients for controller tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::ClientError;
use crate::models::{RedemptionContext, RedemptionInfo, RedemptionReceipt, Token};
use crate::traits::{CommitClient, ValidationClient};

/// A recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub token: String,
    pub context: RedemptionContext,
}

#[derive(Debug, Clone)]
struct Script<T> {
    result: Result<T, ClientError>,
    delay: Option<Duration>,
}

/// Mock implementing both [`ValidationClient`] and [`CommitClient`].
///
/// Unscripted tokens validate and commit successfully. Delays use tokio
/// time, so tests with a paused clock stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct MockRedemptionClient {
    validations: Arc<Mutex<HashMap<String, Script<RedemptionInfo>>>>,
    commits: Arc<Mutex<HashMap<String, Script<RedemptionReceipt>>>>,
    validate_calls: Arc<Mutex<Vec<RecordedCall>>>,
    commit_calls: Arc<Mutex<Vec<RecordedCall>>>,
    requires_secondary: bool,
}

impl MockRedemptionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the context incomplete without a secondary id.
    pub fn requiring_secondary_id(mut self) -> Self {
        self.requires_secondary = true;
        self
    }

    pub fn set_validation(&self, token: &str, result: Result<RedemptionInfo, ClientError>) {
        self.set_validation_delayed(token, result, None);
    }

    pub fn set_validation_delayed(
        &self,
        token: &str,
        result: Result<RedemptionInfo, ClientError>,
        delay: Option<Duration>,
    ) {
        self.validations
            .lock()
            .unwrap()
            .insert(token.to_string(), Script { result, delay });
    }

    pub fn set_commit(&self, token: &str, result: Result<RedemptionReceipt, ClientError>) {
        self.set_commit_delayed(token, result, None);
    }

    pub fn set_commit_delayed(
        &self,
        token: &str,
        result: Result<RedemptionReceipt, ClientError>,
        delay: Option<Duration>,
    ) {
        self.commits
            .lock()
            .unwrap()
            .insert(token.to_string(), Script { result, delay });
    }

    pub fn validate_calls(&self) -> Vec<RecordedCall> {
        self.validate_calls.lock().unwrap().clone()
    }

    pub fn commit_calls(&self) -> Vec<RecordedCall> {
        self.commit_calls.lock().unwrap().clone()
    }

    fn record(calls: &Mutex<Vec<RecordedCall>>, token: &Token, context: &RedemptionContext) {
        calls.lock().unwrap().push(RecordedCall {
            token: token.as_str().to_string(),
            context: context.clone(),
        });
    }
}

#[async_trait]
impl ValidationClient for MockRedemptionClient {
    async fn validate(
        &self,
        token: &Token,
        context: &RedemptionContext,
    ) -> Result<RedemptionInfo, ClientError> {
        Self::record(&self.validate_calls, token, context);
        let script = self.validations.lock().unwrap().get(token.as_str()).cloned();
        match script {
            Some(script) => {
                if let Some(delay) = script.delay {
                    tokio::time::sleep(delay).await;
                }
                script.result
            }
            None => Ok(RedemptionInfo::new("Test Holder", context.resource_id.clone())),
        }
    }

    fn requires_secondary_id(&self) -> bool {
        self.requires_secondary
    }
}

#[async_trait]
impl CommitClient for MockRedemptionClient {
    async fn commit(
        &self,
        context: &RedemptionContext,
        token: &Token,
    ) -> Result<RedemptionReceipt, ClientError> {
        Self::record(&self.commit_calls, token, context);
        let script = self.commits.lock().unwrap().get(token.as_str()).cloned();
        match script {
            Some(script) => {
                if let Some(delay) = script.delay {
                    tokio::time::sleep(delay).await;
                }
                script.result
            }
            None => Ok(RedemptionReceipt::new(Utc::now())),
        }
    }
}
