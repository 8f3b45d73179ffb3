use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// The document is wider than its viewport.
    Overflow,
    /// Text clipped with an ellipsis.
    Truncation,
    /// Elements whose right edge lies past the viewport width.
    Offscreen,
}

impl IssueKind {
    pub fn token(self) -> ThemeToken {
        match self {
            IssueKind::Overflow => ThemeToken::IssueOverflow,
            IssueKind::Truncation => ThemeToken::IssueTruncation,
            IssueKind::Offscreen => ThemeToken::IssueOffscreen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of one detection pass over a loaded surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "issues", rename_all = "kebab-case")]
pub enum Findings {
    /// Nothing qualified as a layout defect.
    Clean,
    /// One or more defects. Never empty.
    Issues(Vec<Issue>),
}

impl Findings {
    pub const CLEAN_MESSAGE: &'static str = "No layout issues detected";

    /// Builds findings from a list of issues, collapsing an empty list into `Clean`.
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        if issues.is_empty() {
            Findings::Clean
        } else {
            Findings::Issues(issues)
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Findings::Clean)
    }

    pub fn issues(&self) -> &[Issue] {
        match self {
            Findings::Clean => &[],
            Findings::Issues(issues) => issues,
        }
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues().iter().any(|issue| issue.kind == kind)
    }

    /// One line per finding, suitable for a surface footer.
    pub fn summary_lines(&self) -> Vec<String> {
        match self {
            Findings::Clean => vec![Self::CLEAN_MESSAGE.to_string()],
            Findings::Issues(issues) => issues.iter().map(|i| i.message.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_issue_list_is_clean() {
        let findings = Findings::from_issues(Vec::new());
        assert!(findings.is_clean());
        assert_eq!(findings.summary_lines(), vec![Findings::CLEAN_MESSAGE]);
    }

    #[test]
    fn serializes_with_status_tag() {
        let findings = Findings::from_issues(vec![Issue::new(IssueKind::Overflow, "too wide")]);
        let json = serde_json::to_value(&findings).unwrap();
        assert_eq!(json["status"], "issues");
        assert_eq!(json["issues"][0]["kind"], "overflow");

        let clean = serde_json::to_value(Findings::Clean).unwrap();
        assert_eq!(clean["status"], "clean");
    }
}
