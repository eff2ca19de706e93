//! Human-readable error descriptions and structured JSON error formatting.

use std::io::ErrorKind;

/// Context attached to every config load/validation failure.
pub const CONFIG_CONTEXT: &str = "invalid configuration";
/// Context attached to command server bind failures.
pub const BIND_CONTEXT: &str = "command server bind failed";

/// Everything below the outermost context, joined into one line.
fn causes(err: &eyre::Report) -> String {
    err.chain()
        .skip(1)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

fn io_kind(err: &eyre::Report) -> Option<ErrorKind> {
    err.chain()
        .find_map(|e| e.downcast_ref::<std::io::Error>())
        .map(std::io::Error::kind)
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use tilt_core::error::{BuildError, CoreError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingChannels => {
                "What happened: No output channels were provided to the rig.\nLikely causes: Hardware assembly was skipped.\nHow to fix: Report this as a bug; channels are always assembled by `tiltrig run`.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid tuning ({msg}).\nLikely causes: Out-of-range values in [power] or [tuning].\nHow to fix: Edit the config file, then rerun `tiltrig self-check`."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<CoreError>() {
        return format!(
            "What happened: {ce}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains(CONFIG_CONTEXT) {
        return format!(
            "What happened: Configuration is invalid ({}).\nLikely causes: A TOML syntax error or an out-of-range value.\nHow to fix: Edit the config file, or run `tiltrig print-config` to see the defaults.",
            causes(err)
        );
    }

    if lower.contains(BIND_CONTEXT) {
        let hint = match io_kind(err) {
            Some(ErrorKind::AddrInUse) => "Another process is already listening on that port.",
            Some(ErrorKind::PermissionDenied) => "Ports below 1024 need elevated privileges.",
            _ => "The bind address is not available on this host.",
        };
        return format!(
            "What happened: Could not start the command server ({}).\nLikely causes: {hint}\nHow to fix: Pick another port with --port or [server] port.",
            causes(err)
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 for configuration problems, 3 for bind failures, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    let lower = err.to_string().to_ascii_lowercase();
    if lower.contains(CONFIG_CONTEXT)
        || err.downcast_ref::<tilt_core::error::BuildError>().is_some()
    {
        return 2;
    }
    if lower.contains(BIND_CONTEXT) {
        return 3;
    }
    1
}

fn reason_name(code: i32) -> &'static str {
    match code {
        2 => "InvalidConfig",
        3 => "BindFailed",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(exit_code_for_error(err)),
        "message": humanize(err),
    })
    .to_string()
}
