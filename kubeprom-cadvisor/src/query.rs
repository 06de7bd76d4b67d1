use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Tail of a simple query: an optional range selector, then an optional
/// closing paren, then end of line.
static QUERY_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?<range>\[.+\])?(?<close>\))?$").expect("valid query tail regex")
});

/// Adds a label selector to a simple query.
///
/// ```text
/// "cpu_usage"           => "cpu_usage{labels...}"
/// "sum(cpu_usage)"      => "sum(cpu_usage{labels...})"
/// "rate(cpu_usage[5m])" => "rate(cpu_usage{labels...}[5m])"
/// ```
///
/// Only these three shapes are supported. Anything else is rewritten by the
/// same rule at its leftmost match, which may not be what the caller wants.
/// `labels` is the rendered selector body without braces and is inserted as is.
pub fn update_query(query: &str, labels: &str) -> String {
    QUERY_TAIL
        .replace(query, |caps: &Captures| {
            format!(
                "{{{}}}{}{}",
                labels,
                caps.name("range").map_or("", |m| m.as_str()),
                caps.name("close").map_or("", |m| m.as_str()),
            )
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &str = r#"job="kubernetes-cadvisor",instance="node-1""#;

    #[test]
    fn test_bare_metric() {
        assert_eq!(
            update_query("container_memory_usage_bytes", LABELS),
            r#"container_memory_usage_bytes{job="kubernetes-cadvisor",instance="node-1"}"#
        );
    }

    #[test]
    fn test_sum() {
        assert_eq!(
            update_query("sum(container_memory_usage_bytes)", LABELS),
            r#"sum(container_memory_usage_bytes{job="kubernetes-cadvisor",instance="node-1"})"#
        );
    }

    #[test]
    fn test_rate_with_range() {
        assert_eq!(
            update_query("rate(container_cpu_usage_seconds_total[5m])", LABELS),
            r#"rate(container_cpu_usage_seconds_total{job="kubernetes-cadvisor",instance="node-1"}[5m])"#
        );
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(update_query("", "a=\"b\""), "{a=\"b\"}");
    }

    #[test]
    fn test_labels_are_literal() {
        // `$` must not be read as a capture group reference
        assert_eq!(
            update_query("up", r#"pod_name="web-$1""#),
            r#"up{pod_name="web-$1"}"#
        );
    }

    #[test]
    fn test_only_first_match_is_rewritten() {
        // greedy range capture runs to the last bracket
        assert_eq!(
            update_query("rate(a[5m]) + rate(b[5m])", "x=\"1\""),
            r#"rate(a{x="1"}[5m]) + rate(b[5m])"#
        );
    }

    #[test]
    fn test_nested_functions_attach_to_last_paren() {
        assert_eq!(
            update_query("sum(rate(a[5m]))", "x=\"1\""),
            r#"sum(rate(a[5m]){x="1"})"#
        );
    }

    #[test]
    fn test_trailing_newline() {
        // queries read from files or heredocs keep their final newline
        assert_eq!(
            update_query("sum(container_memory_usage_bytes)\n", "x=\"1\""),
            "sum(container_memory_usage_bytes{x=\"1\"})\n"
        );
        assert_eq!(
            update_query("rate(a[5m])\n", "x=\"1\""),
            "rate(a{x=\"1\"}[5m])\n"
        );
        assert_eq!(update_query("up\n", "x=\"1\""), "up{x=\"1\"}\n");
    }

    #[test]
    fn test_multiline_rewrites_first_line_end() {
        assert_eq!(
            update_query("sum(a)\n+ sum(b)", "x=\"1\""),
            "sum(a{x=\"1\"})\n+ sum(b)"
        );
    }
}
