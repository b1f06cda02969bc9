use crate::config::{ConfigError, Platform, Settings};
use crate::console::command::{build_args, masked_args, AdminOp};
use crate::console::records::{parse_records, parse_single};
use crate::console::runner::{execute_tool, TIMEOUT_MESSAGE};
use crate::console::{ConnectionSpec, Envelope, Verb};
use crate::encoding::{repair_decoded, resolve_bytes, EncodingPrefs};
use std::time::Duration;
use tracing::{debug, trace};

/// Read-only per-process configuration for the adapter. Safe to share
/// across concurrent callers; every operation is an independent subprocess.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub tool_path: String,
    pub timeout: Duration,
    pub platform: Platform,
    pub prefs: EncodingPrefs,
}

impl ConsoleConfig {
    pub fn from_settings(settings: &Settings, platform: Platform) -> Result<Self, ConfigError> {
        Ok(Self {
            tool_path: settings.tool_path.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            platform,
            prefs: settings.encoding_prefs(platform)?,
        })
    }
}

/// Run one administrative operation end to end: build the vector, execute
/// the tool, recover text, parse records for list/info verbs. Every outcome
/// is an [`Envelope`]; nothing panics or escapes as an error type.
pub fn run_operation(config: &ConsoleConfig, conn: &ConnectionSpec, op: &AdminOp) -> Envelope {
    let args = build_args(op, conn);
    debug!(
        tool = %config.tool_path,
        args = ?masked_args(&args),
        "running administration command"
    );
    trace!(args = ?args, "unmasked administration command");

    let output = match execute_tool(&config.tool_path, &args, config.timeout, config.platform) {
        Ok(output) => output,
        Err(err) => return Envelope::fail(err.to_string()),
    };

    if output.timed_out {
        return Envelope::fail(TIMEOUT_MESSAGE);
    }

    if !output.success() {
        let raw = if output.stderr.is_empty() {
            &output.stdout
        } else {
            &output.stderr
        };
        let decoded = resolve_bytes(raw, &config.prefs);
        return Envelope::fail(repair_decoded(decoded.text.trim()));
    }

    let decoded = resolve_bytes(&output.stdout, &config.prefs);
    match op.verb {
        Verb::List => {
            let records = parse_records(&decoded.text, op.family.introducer());
            Envelope::ok_with_records(decoded.text, records)
        }
        Verb::Info => {
            let records = parse_single(&decoded.text, op.family.introducer())
                .into_iter()
                .collect();
            Envelope::ok_with_records(decoded.text, records)
        }
        _ => Envelope::ok(decoded.text),
    }
}
