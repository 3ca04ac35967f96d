//! Compliance scoring and reporting over batches of access validations.

use std::fmt::Write as _;

use crate::validator::AccessControlValidation;

/// Percentage of valid entries, rounded to the nearest integer.
///
/// An empty batch scores 0 rather than dividing by zero.
#[must_use]
pub fn calculate_access_control_score(validations: &[AccessControlValidation]) -> u8 {
    if validations.is_empty() {
        return 0;
    }
    let valid = validations.iter().filter(|v| v.valid).count();
    ((valid as f64 / validations.len() as f64) * 100.0).round() as u8
}

/// Render a human-readable compliance report over a batch of validations.
///
/// One line per validation, glyph-prefixed, with the denial reason appended
/// on failures.
#[must_use]
pub fn generate_access_control_report(validations: &[AccessControlValidation]) -> String {
    let score = calculate_access_control_score(validations);
    let valid = validations.iter().filter(|v| v.valid).count();

    let mut report = String::new();
    let _ = writeln!(report, "Access Control Report");
    let _ = writeln!(report, "=====================");
    let _ = writeln!(report, "Overall Score: {score}/100");
    let _ = writeln!(report, "Valid Rules: {valid}/{}", validations.len());
    let _ = writeln!(report);

    for validation in validations {
        let rule = &validation.rule;
        if validation.valid {
            let _ = writeln!(report, "✓ {} may {} on {}", rule.role, rule.action, rule.resource);
        } else {
            let reason = validation.reason.as_deref().unwrap_or("no reason recorded");
            let _ = writeln!(
                report,
                "✗ {} may not {} on {}: {}",
                rule.role, rule.action, rule.resource, reason
            );
        }
    }

    report
}
