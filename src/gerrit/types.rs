//! Entities shared by several Gerrit REST resources

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gerrit timestamps are UTC, formatted `yyyy-mm-dd hh:mm:ss.fffffffff`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A link to an external site, e.g. a repository browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebLinkInfo {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Identity of a Git author, committer or tagger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitPersonInfo {
    pub name: String,
    pub email: String,
    pub date: String,
    /// Offset from UTC in minutes
    pub tz: i32,
}

impl GitPersonInfo {
    /// Parse `date`; `None` when absent or malformed
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.date, TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// A REST action the caller may perform on a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_timestamp_parses_gerrit_format() {
        let person = GitPersonInfo {
            date: "2013-03-01 10:14:59.000000000".to_string(),
            ..Default::default()
        };
        let ts = person.timestamp().unwrap();
        assert_eq!(ts.year(), 2013);
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.second(), 59);
    }

    #[test]
    fn test_timestamp_missing_date() {
        assert!(GitPersonInfo::default().timestamp().is_none());
    }

    #[test]
    fn test_action_info_decodes_partial_json() {
        let action: ActionInfo = serde_json::from_str(r#"{"method":"POST"}"#).unwrap();
        assert_eq!(action.method.as_deref(), Some("POST"));
        assert!(!action.enabled);
        assert!(action.label.is_none());
    }
}
