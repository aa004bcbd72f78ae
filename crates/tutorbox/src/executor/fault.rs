//! Fault classification from interpreter diagnostics
//!
//! Maps the final line of a traceback to the failure taxonomy shown to
//! learners. The full stderr text is still returned alongside; the
//! classification only decides the kind and the one-line message.

use std::process::ExitStatus;

use crate::types::{FaultInfo, FaultKind};

/// Classify an abnormal exit from its stderr text and exit status
pub(crate) fn classify(stderr: &str, status: &ExitStatus) -> FaultInfo {
    if let Some(line) = last_diagnostic_line(stderr)
        && let Some(fault) = classify_line(line)
    {
        return fault;
    }

    // No recognizable diagnostic; report how the process died
    let message = match status.code() {
        Some(code) => format!("interpreter exited with code {code}"),
        None => "interpreter was killed by a signal".to_string(),
    };
    FaultInfo::new(FaultKind::Runtime, message)
}

/// Classify a single diagnostic line like `ZeroDivisionError: division by zero`
///
/// Returns `None` when the line does not look like an exception report, so
/// learner text printed to stderr is never mistaken for a diagnostic.
pub(crate) fn classify_line(line: &str) -> Option<FaultInfo> {
    let head = line.split(':').next().unwrap_or(line).trim();
    if !is_exception_name(head) {
        return None;
    }
    // Dotted names like json.decoder.JSONDecodeError classify by last segment
    let name = head.rsplit('.').next().unwrap_or(head);

    let kind = match name {
        "SyntaxError" | "IndentationError" | "TabError" => FaultKind::Syntax,
        "NameError" | "UnboundLocalError" => FaultKind::MissingName,
        "TypeError" | "AttributeError" => FaultKind::TypeMismatch,
        "ZeroDivisionError" => FaultKind::ZeroDivision,
        "KeyError" | "IndexError" => FaultKind::MissingKey,
        "SandboxViolation" => FaultKind::SandboxViolation,
        "KeyboardInterrupt" | "StopIteration" | "SystemExit" => FaultKind::Runtime,
        n if n.ends_with("Error") || n.ends_with("Exception") => FaultKind::Runtime,
        _ => return None,
    };

    Some(FaultInfo::new(kind, line.trim().to_string()))
}

fn last_diagnostic_line(stderr: &str) -> Option<&str> {
    stderr.lines().rev().map(str::trim).find(|l| !l.is_empty())
}

/// Heuristic: dotted CamelCase identifier, e.g. `urllib.error.URLError`
fn is_exception_name(head: &str) -> bool {
    if head.is_empty()
        || !head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return false;
    }
    head.rsplit('.')
        .next()
        .and_then(|last| last.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}
