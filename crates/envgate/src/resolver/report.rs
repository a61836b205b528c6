//! Human-readable validation failure report.

use crate::constants::VALIDATION_REPORT_HEADER;
use crate::validation::FieldIssue;

/// Render issues as one multi-line message, one issue per line.
pub(crate) fn format_issues(issues: &[FieldIssue]) -> String {
    let mut report = String::from(VALIDATION_REPORT_HEADER);
    for issue in issues {
        report.push_str("\n  - ");
        report.push_str(&issue.to_string());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_every_issue() {
        let report = format_issues(&[
            FieldIssue::at_key("API_URL", "Required"),
            FieldIssue::at_key("SECRET_KEY", "String must contain at least 10 character(s)"),
        ]);

        assert_eq!(
            report,
            "Invalid environment variables:\n  - API_URL: Required\n  - SECRET_KEY: String must contain at least 10 character(s)"
        );
    }
}
