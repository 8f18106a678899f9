// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Formatting of probe results for the console

use crate::probe::{ProbeFailure, ProbeOutcome};
use serde_json::Value as JsonValue;

/// Printed after any error raised by the daemon or its bindings
pub const MISCONFIGURATION_HINT: &str =
    "This might indicate the keyring is not properly configured";

/// Status glyphs prefixed to report lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Ok,
    Error,
}

impl StatusLevel {
    pub fn emoji(&self) -> &'static str {
        match self {
            StatusLevel::Ok => "✅",
            StatusLevel::Error => "❌",
        }
    }
}

/// A finished probe together with the backend it ran against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub backend: &'static str,
    pub outcome: ProbeOutcome,
}

impl ProbeReport {
    pub fn new(backend: &'static str, outcome: ProbeOutcome) -> Self {
        Self { backend, outcome }
    }

    pub fn exit_code(&self) -> u8 {
        self.outcome.exit_code()
    }
}

/// Trait for formatting a probe report in different output formats
pub trait ReportFormatter {
    fn format(&self, report: &ProbeReport) -> String;
}

/// Human-readable formatter for console output
pub struct HumanReadableFormatter;

impl ReportFormatter for HumanReadableFormatter {
    fn format(&self, report: &ProbeReport) -> String {
        let mut output = String::new();
        let ok = StatusLevel::Ok.emoji();
        let error = StatusLevel::Error.emoji();

        match &report.outcome {
            ProbeOutcome::Healthy { collections } => {
                output.push_str(&format!("{} GNOME Keyring is working correctly!\n", ok));
                output.push_str(&format!("{} Secret service is accessible\n", ok));
                output.push_str(&format!("{} Found {} keyring collections\n", ok, collections));
            }
            ProbeOutcome::Unreachable(ProbeFailure::ConnectionFailure) => {
                output.push_str(&format!("{} Could not connect to secret service\n", error));
            }
            ProbeOutcome::Unreachable(failure) => {
                let detail = failure.detail().unwrap_or_default();
                output.push_str(&format!("{} Error accessing keyring: {}\n", error, detail));
                output.push_str(MISCONFIGURATION_HINT);
                output.push('\n');
            }
        }

        output
    }
}

/// JSON formatter for structured output
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn to_json(&self, report: &ProbeReport) -> JsonValue {
        match &report.outcome {
            ProbeOutcome::Healthy { collections } => serde_json::json!({
                "healthy": true,
                "backend": report.backend,
                "collections": collections,
                "error": JsonValue::Null,
                "hint": JsonValue::Null,
            }),
            ProbeOutcome::Unreachable(failure) => {
                let hint = match failure {
                    ProbeFailure::ConnectionFailure => JsonValue::Null,
                    _ => JsonValue::String(MISCONFIGURATION_HINT.to_string()),
                };
                serde_json::json!({
                    "healthy": false,
                    "backend": report.backend,
                    "collections": JsonValue::Null,
                    "error": {
                        "kind": failure.kind(),
                        "detail": failure.detail(),
                    },
                    "hint": hint,
                })
            }
        }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ProbeReport) -> String {
        let mut rendered = serde_json::to_string_pretty(&self.to_json(report))
            .unwrap_or_else(|_| "{}".to_string());
        rendered.push('\n');
        rendered
    }
}
