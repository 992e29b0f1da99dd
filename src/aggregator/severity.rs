//! Severity ordering and per-violation counting.

use serde_json::Value;

/// Rank assigned to severity values outside the fixed order. Worse than
/// every recognized value, so an unrecognized severity can never displace
/// the `NONE` starting point of a worst-severity scan.
const UNRANKED: usize = 999;

/// Severity classes recognized in scanner findings, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
    Warning,
    None,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CRITICAL" => Some(Severity::Critical),
            "HIGH" => Some(Severity::High),
            "MEDIUM" => Some(Severity::Medium),
            "LOW" => Some(Severity::Low),
            "UNKNOWN" => Some(Severity::Unknown),
            "WARNING" => Some(Severity::Warning),
            "NONE" => Some(Severity::None),
            _ => Option::None,
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Unknown => 4,
            Severity::Warning => 5,
            Severity::None => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
            Severity::Warning => "WARNING",
            Severity::None => "NONE",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rank used for ordering; unrecognized values rank worse than all.
pub fn severity_rank(value: &str) -> usize {
    Severity::parse(value).map_or(UNRANKED, |s| s.rank())
}

/// Severity string carried by a violation. An absent key defaults to
/// UNKNOWN; a non-string value is unrecognized.
fn violation_severity(violation: &Value) -> &str {
    match violation.get("severity") {
        None => "UNKNOWN",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => "",
    }
}

/// Worst (highest priority) severity across findings, NONE when empty.
pub fn worst_severity<'a, I>(violations: I) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut worst = Severity::None.as_str().to_string();
    let mut worst_rank = severity_rank(&worst);

    for violation in violations {
        let severity = violation_severity(violation);
        let rank = severity_rank(severity);
        if rank < worst_rank {
            worst = severity.to_string();
            worst_rank = rank;
        }
    }

    worst
}

/// Counts restricted to the four actionable severity classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_violations<'a, I>(violations: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut counts = Self::default();
        for violation in violations {
            match Severity::parse(violation_severity(violation)) {
                Some(Severity::Critical) => counts.critical += 1,
                Some(Severity::High) => counts.high += 1,
                Some(Severity::Medium) => counts.medium += 1,
                Some(Severity::Low) => counts.low += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Violations carrying a truthy `fixed_version`.
pub fn count_fixable<'a, I>(violations: I) -> usize
where
    I: IntoIterator<Item = &'a Value>,
{
    violations
        .into_iter()
        .filter(|v| v.get("fixed_version").is_some_and(is_truthy))
        .count()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Status emoji for a repository's worst severity.
pub fn status_emoji(severity: &str) -> &'static str {
    match Severity::parse(severity) {
        Some(Severity::Critical) | Some(Severity::High) => "\u{1F534}", // 🔴
        Some(Severity::Medium)
        | Some(Severity::Low)
        | Some(Severity::Unknown)
        | Some(Severity::Warning) => "\u{1F7E1}", // 🟡
        Some(Severity::None) => "\u{1F7E2}", // 🟢
        None => "\u{26AA}",                  // ⚪
    }
}
