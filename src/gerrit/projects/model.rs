//! Request and response entities of the projects REST resource
//!
//! Info records mirror the server's JSON. Absent fields decode to their zero
//! value; nothing else is filled in client-side.

use crate::gerrit::types::{ActionInfo, GitPersonInfo, WebLinkInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plugin name -> parameter name -> value
pub type PluginConfigValues = BTreeMap<String, BTreeMap<String, String>>;

/// Information about a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    /// Branch name -> revision, only filled when listing with a branch filter
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub branches: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

/// Tri-state policy value: explicitly on, explicitly off, or inherited from the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InheritableBoolean {
    True,
    False,
    Inherit,
}

/// How changes are merged on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitType {
    Inherit,
    MergeIfNecessary,
    FastForwardOnly,
    RebaseIfNecessary,
    RebaseAlways,
    MergeAlways,
    CherryPick,
}

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectState {
    Active,
    ReadOnly,
    Hidden,
}

/// Input for creating a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub permissions_only: bool,
    pub create_empty_commit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_type: Option<SubmitType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_contributor_agreements: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_signed_off_by: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_new_change_for_all_not_in_target: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_content_merge: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_change_id: Option<InheritableBoolean>,
    /// Size with optional unit suffix, e.g. `10m`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub max_object_size_limit: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin_config_values: PluginConfigValues,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptionInput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub commit_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectParentInput {
    pub parent: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub commit_message: String,
}

/// Input for pointing HEAD at another branch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadInput {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// Options for a Git garbage collection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GcInput {
    pub show_progress: bool,
    pub aggressive: bool,
}

/// Commits to ban from a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BanInput {
    pub commits: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanResultInfo {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub newly_banned: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub already_banned: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
}

/// Counts and sizes of the objects in a project's repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryStatisticsInfo {
    pub number_of_loose_objects: u64,
    pub number_of_loose_refs: u64,
    pub number_of_pack_files: u64,
    pub number_of_packed_objects: u64,
    pub number_of_packed_refs: u64,
    pub size_of_loose_objects: u64,
    pub size_of_packed_objects: u64,
}

/// Information about a branch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchInfo {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub revision: String,
    pub can_delete: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

/// Input for creating a branch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchInput {
    #[serde(rename = "ref", skip_serializing_if = "String::is_empty")]
    pub ref_name: String,
    /// Commit, branch or tag the new branch starts from
    #[serde(skip_serializing_if = "String::is_empty")]
    pub revision: String,
}

/// Branches to delete in one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteBranchesInput {
    pub branches: Vec<String>,
}

/// Information about a tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagInfo {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub revision: String,
    /// Only set for annotated tags
    #[serde(skip_serializing_if = "String::is_empty")]
    pub object: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagger: Option<GitPersonInfo>,
    pub can_delete: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

/// One update of a branch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflogEntryInfo {
    pub old_id: String,
    pub new_id: String,
    pub who: GitPersonInfo,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSectionInfo {
    pub name: String,
    pub query: String,
}

/// A project dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardInfo {
    /// `<ref>:<path>`, e.g. `main:closed`
    pub id: String,
    pub project: String,
    pub defining_project: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub foreach: String,
    pub url: String,
    #[serde(rename = "default")]
    pub is_default: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub sections: Vec<DashboardSectionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardInput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub commit_message: String,
}

/// A boolean setting that may be inherited from the parent project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InheritedBooleanInfo {
    /// Effective value
    pub value: bool,
    /// `TRUE`, `FALSE` or `INHERIT`
    pub configured_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_value: Option<bool>,
}

/// Max object size limit; string-valued because of unit suffixes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxObjectSizeLimitInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub configured_value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub inherited_value: String,
}

/// Pattern used to turn text in commit messages into links
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentLinkInfo {
    #[serde(rename = "match")]
    pub pattern: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub css: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub header: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub footer: String,
}

/// Descriptor of a plugin-defined project configuration parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigParameterInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub warning: String,
    /// `STRING`, `INT`, `LONG`, `BOOLEAN`, `LIST` or `ARRAY`
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    pub editable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permitted_values: Vec<String>,
    pub inheritable: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub configured_value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub inherited_value: String,
}

/// Effective (post-inheritance) configuration of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub use_contributor_agreements: InheritedBooleanInfo,
    pub use_content_merge: InheritedBooleanInfo,
    pub use_signed_off_by: InheritedBooleanInfo,
    pub create_new_change_for_all_not_in_target: InheritedBooleanInfo,
    pub require_change_id: InheritedBooleanInfo,
    pub enable_signed_push: InheritedBooleanInfo,
    pub require_signed_push: InheritedBooleanInfo,
    pub reject_implicit_merges: InheritedBooleanInfo,
    pub max_object_size_limit: MaxObjectSizeLimitInfo,
    pub submit_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    pub commentlinks: BTreeMap<String, CommentLinkInfo>,
    pub theme: ThemeInfo,
    /// Plugin name -> parameter name -> descriptor
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin_config: BTreeMap<String, BTreeMap<String, ConfigParameterInfo>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionInfo>,
}

/// New values for a project's configuration; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigInput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_contributor_agreements: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_content_merge: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_signed_off_by: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_new_change_for_all_not_in_target: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_change_id: Option<InheritableBoolean>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub max_object_size_limit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_type: Option<SubmitType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ProjectState>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin_config_values: PluginConfigValues,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_info_missing_fields_are_zero() {
        let project: ProjectInfo =
            serde_json::from_value(json!({"id": "plugins%2Freplication", "name": "plugins/replication"}))
                .unwrap();
        assert_eq!(project.name, "plugins/replication");
        assert!(project.parent.is_empty());
        assert!(project.description.is_empty());
        assert!(project.branches.is_empty());
        assert!(project.web_links.is_empty());
    }

    #[test]
    fn test_project_info_decodes_branches_and_links() {
        let project: ProjectInfo = serde_json::from_value(json!({
            "id": "demo",
            "name": "demo",
            "parent": "All-Projects",
            "state": "ACTIVE",
            "branches": {"master": "49976b089d2a0c4b7ab6d1f19b6e8c10eab3e8da"},
            "web_links": [{"name": "gitiles", "url": "https://git.example.com/demo"}]
        }))
        .unwrap();
        assert_eq!(project.parent, "All-Projects");
        assert_eq!(project.branches["master"], "49976b089d2a0c4b7ab6d1f19b6e8c10eab3e8da");
        assert_eq!(project.web_links[0].name, "gitiles");
        assert!(project.web_links[0].image_url.is_none());
    }

    #[test]
    fn test_project_input_always_sends_flags() {
        let input = ProjectInput {
            name: "demo".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(
            body,
            json!({"name": "demo", "permissions_only": false, "create_empty_commit": false})
        );
    }

    #[test]
    fn test_project_input_enums_and_plugin_values() {
        let mut plugin = BTreeMap::new();
        plugin.insert("reviewers".to_string(), BTreeMap::from([("enabled".to_string(), "true".to_string())]));
        let input = ProjectInput {
            submit_type: Some(SubmitType::RebaseIfNecessary),
            require_change_id: Some(InheritableBoolean::Inherit),
            plugin_config_values: plugin,
            ..Default::default()
        };
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["submit_type"], "REBASE_IF_NECESSARY");
        assert_eq!(body["require_change_id"], "INHERIT");
        assert_eq!(body["plugin_config_values"]["reviewers"]["enabled"], "true");
        assert!(body.get("use_signed_off_by").is_none());
    }

    #[test]
    fn test_delete_branches_input_key() {
        let input = DeleteBranchesInput {
            branches: vec!["stable-1.0".to_string()],
        };
        assert_eq!(serde_json::to_value(&input).unwrap(), json!({"branches": ["stable-1.0"]}));
    }

    #[test]
    fn test_tag_info_lightweight_has_no_tagger() {
        let tag: TagInfo = serde_json::from_value(json!({
            "ref": "refs/tags/v1.0",
            "revision": "49ce77fdcfd3398dc0dedbe016d1a425fd52d666"
        }))
        .unwrap();
        assert_eq!(tag.ref_name, "refs/tags/v1.0");
        assert!(tag.tagger.is_none());
        assert!(tag.object.is_empty());
    }

    #[test]
    fn test_dashboard_default_flag() {
        let dashboard: DashboardInfo = serde_json::from_value(json!({
            "id": "main:closed",
            "ref": "main",
            "path": "closed",
            "default": true,
            "sections": [{"name": "Merged", "query": "status:merged"}]
        }))
        .unwrap();
        assert!(dashboard.is_default);
        assert_eq!(dashboard.ref_name, "main");
        assert_eq!(dashboard.sections[0].query, "status:merged");
    }

    #[test]
    fn test_config_info_decodes_nested_settings() {
        let config: ConfigInfo = serde_json::from_value(json!({
            "description": "demo project",
            "use_contributor_agreements": {"value": true, "configured_value": "TRUE"},
            "use_content_merge": {"value": true, "configured_value": "INHERIT", "inherited_value": true},
            "max_object_size_limit": {"value": "15m", "configured_value": "15m", "inherited_value": "20m"},
            "submit_type": "MERGE_IF_NECESSARY",
            "state": "ACTIVE",
            "commentlinks": {"bug": {"match": "(bug\\s+#?)(\\d+)", "link": "https://bugs.example.com/$2"}},
            "plugin_config": {"helloworld": {"language": {"display_name": "Preferred Language", "type": "STRING", "value": "en"}}},
            "actions": {"cherrypick": {"method": "POST", "label": "Cherry Pick", "enabled": true}}
        }))
        .unwrap();
        assert!(config.use_contributor_agreements.value);
        assert_eq!(config.use_content_merge.inherited_value, Some(true));
        assert_eq!(config.max_object_size_limit.inherited_value, "20m");
        assert_eq!(config.commentlinks["bug"].link, "https://bugs.example.com/$2");
        assert_eq!(config.plugin_config["helloworld"]["language"].param_type, "STRING");
        assert!(config.actions["cherrypick"].enabled);
        assert!(!config.require_change_id.value);
        assert!(config.theme.css.is_empty());
    }

    #[test]
    fn test_statistics_missing_fields_are_zero() {
        let stats: RepositoryStatisticsInfo =
            serde_json::from_value(json!({"number_of_loose_objects": 127})).unwrap();
        assert_eq!(stats.number_of_loose_objects, 127);
        assert_eq!(stats.size_of_packed_objects, 0);
    }
}
