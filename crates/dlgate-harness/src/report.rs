//! Load report: one record per CLI run.
//!
//! Serialized as a single JSON line (`--json`) or rendered as a short human
//! line. Optional fields are omitted when empty.

use serde::{Deserialize, Serialize};

use dlgate_core::{LoadError, LoadMode, LoadRoute, TargetKind};

/// Pass/fail outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// Operation the run performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    LoadPath,
    LoadName,
    Probe,
}

/// Canonical load report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub operation: Operation,
    /// Identifier exactly as given on the command line.
    pub target: String,
    pub kind: String,
    pub mode: String,
    pub outcome: Outcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_level: Option<u32>,
    /// `primary` or `fallback` when the load succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the load failed after entering the fallback route.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback_attempted: bool,
}

impl LoadReport {
    pub fn new(operation: Operation, target: &str, kind: TargetKind, mode: LoadMode) -> Self {
        Self {
            operation,
            target: target.to_owned(),
            kind: kind.as_str().to_owned(),
            mode: mode.as_str().to_owned(),
            outcome: Outcome::Fail,
            api_level: None,
            route: None,
            symbol: None,
            error_kind: None,
            error: None,
            fallback_attempted: false,
        }
    }

    #[must_use]
    pub fn with_api_level(mut self, api_level: Option<u32>) -> Self {
        self.api_level = api_level;
        self
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = Some(symbol.to_owned());
        self
    }

    /// Record the result of a load attempt.
    #[must_use]
    pub fn with_result(mut self, result: &Result<LoadRoute, LoadError>) -> Self {
        match result {
            Ok(route) => {
                self.outcome = Outcome::Pass;
                self.route = Some(route.as_str().to_owned());
            }
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Record the result of a symbol lookup.
    #[must_use]
    pub fn with_lookup(mut self, result: &Result<bool, LoadError>) -> Self {
        match result {
            Ok(found) => {
                self.outcome = if *found { Outcome::Pass } else { Outcome::Fail };
            }
            Err(err) => self.record_error(err),
        }
        self
    }

    fn record_error(&mut self, err: &LoadError) {
        self.outcome = Outcome::Fail;
        self.error_kind = Some(err.kind().to_owned());
        self.error = Some(err.to_string());
        self.fallback_attempted = err.fallback_attempted();
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// One-line human rendering.
    pub fn render(&self) -> String {
        let status = if self.passed() { "ok" } else { "failed" };
        let mut line = format!("{} {} ({}): {status}", self.kind, self.target, self.mode);
        if let Some(symbol) = &self.symbol {
            line.push_str(&format!(", symbol {symbol}"));
        }
        if let Some(route) = &self.route {
            line.push_str(&format!(" via {route}"));
        }
        if let Some(error) = &self.error {
            line.push_str(&format!(": {error}"));
        }
        line
    }
}
