//! Fixed prompt templates for the review kinds.
//!
//! Each template carries a `{diff}` placeholder; [`render`] substitutes the
//! diff text verbatim. Comprehensive reviews are composed in the dispatcher
//! from the four building blocks, one independent request each.

use super::ReviewKind;

const BASIC_TEMPLATE: &str = "\
You are a senior code reviewer. Review the following code changes and reply \
with a structured report.

Focus on:
1. Code quality and readability
2. Potential bugs and logic errors
3. Security risks
4. Performance concerns
5. Adherence to common best practices

For each finding, name the file, describe the problem, and suggest a concrete \
fix. Finish with a short overall assessment.

Code changes:
{diff}";

const SECURITY_TEMPLATE: &str = "\
You are a security auditor. Audit the following code changes for \
vulnerabilities.

Check for:
1. Injection (SQL, command, template)
2. Cross-site scripting (XSS)
3. Broken access control and privilege escalation
4. Leaked secrets, keys, or credentials
5. Missing or insufficient input validation

Flag severe findings with [SEVERE]. For each finding, name the file, explain \
the attack vector, and suggest a mitigation. If nothing is found, say so \
explicitly.

Code changes:
{diff}";

const PERFORMANCE_TEMPLATE: &str = "\
You are a performance engineer. Analyze the following code changes for \
optimization opportunities.

Check for:
1. Algorithmic complexity problems
2. Unnecessary allocations or memory growth
3. Inefficient queries or repeated I/O
4. Concurrency issues (blocking calls, contention)
5. Missing caching opportunities

For each finding, name the file, estimate the impact, and suggest an \
improvement.

Code changes:
{diff}";

const SUMMARY_TEMPLATE: &str = "\
Summarize the following code changes in a few short paragraphs: what was \
changed, why it appears to have been changed, and anything reviewers should \
pay attention to. Keep it factual and concise.

Code changes:
{diff}";

/// Renders the prompt for a single-template review kind.
///
/// `Comprehensive` has no template of its own; the dispatcher requests its
/// four parts independently. Rendering it here falls back to the basic
/// template.
pub fn render(kind: ReviewKind, diff: &str) -> String {
    let template = match kind {
        ReviewKind::Basic | ReviewKind::Comprehensive => BASIC_TEMPLATE,
        ReviewKind::Security => SECURITY_TEMPLATE,
        ReviewKind::Performance => PERFORMANCE_TEMPLATE,
        ReviewKind::Summary => SUMMARY_TEMPLATE,
    };
    template.replace("{diff}", diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_is_substituted_verbatim() {
        let diff = "+let x = 1;\n-let x = 2;";
        for kind in [
            ReviewKind::Basic,
            ReviewKind::Security,
            ReviewKind::Performance,
            ReviewKind::Summary,
        ] {
            let prompt = render(kind, diff);
            assert!(prompt.contains(diff), "{kind:?}");
            assert!(!prompt.contains("{diff}"), "{kind:?}");
        }
    }

    #[test]
    fn kinds_select_distinct_templates() {
        let basic = render(ReviewKind::Basic, "d");
        let security = render(ReviewKind::Security, "d");
        let performance = render(ReviewKind::Performance, "d");
        let summary = render(ReviewKind::Summary, "d");

        assert!(security.contains("security auditor"));
        assert!(performance.contains("performance engineer"));
        assert!(summary.contains("Summarize"));
        assert_ne!(basic, security);
        assert_ne!(performance, summary);
    }
}
