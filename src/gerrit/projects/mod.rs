//! Gerrit Projects
//!
//! Typed access to the `projects/` REST resource: projects, branches, tags,
//! child projects, dashboards and project configuration.
//!
//! Every method formats a path, optionally appends query options or a JSON
//! body, sends the request and decodes the response. Errors from the
//! transport are returned as-is; nothing is retried.

pub mod model;
pub mod options;

pub use model::*;
pub use options::{BranchOptions, ChildProjectOptions, ProjectOptions, ProjectType};

use super::client::GerritClient;
use super::query::add_options;
use anyhow::{anyhow, Result};
use reqwest::Method;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Encode an identifier as a single path segment (`refs/heads/main` -> `refs%2Fheads%2Fmain`).
///
/// `.` and `..` survive percent-encoding as dot segments, so URL resolution
/// would silently retarget the request; they are rejected, as is the empty id.
fn segment(id: &str) -> Result<Cow<'_, str>> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(anyhow!("Invalid identifier: {:?}", id));
    }
    Ok(urlencoding::encode(id))
}

/// `projects/{name}`
fn project_path(name: &str) -> Result<String> {
    Ok(format!("projects/{}", segment(name)?))
}

/// Projects REST endpoints
#[derive(Clone, Copy, Debug)]
pub struct ProjectsService<'a> {
    client: &'a GerritClient,
}

impl<'a> ProjectsService<'a> {
    pub fn new(client: &'a GerritClient) -> Self {
        Self { client }
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// List the projects visible to the caller, keyed by project name
    pub async fn list_projects(
        &self,
        options: Option<&ProjectOptions>,
    ) -> Result<BTreeMap<String, ProjectInfo>> {
        let path = add_options("projects/", options);
        self.client.get(&path).await
    }

    pub async fn get_project(&self, name: &str) -> Result<ProjectInfo> {
        self.client.get(&project_path(name)?).await
    }

    /// Create a project; all validation happens server-side
    pub async fn create_project(&self, name: &str, input: &ProjectInput) -> Result<ProjectInfo> {
        let path = format!("{}/", project_path(name)?);
        self.client.send_json(Method::PUT, &path, input).await
    }

    pub async fn get_project_description(&self, name: &str) -> Result<String> {
        self.get_string(&format!("{}/description", project_path(name)?))
            .await
    }

    /// Set the description; returns the new description
    pub async fn set_project_description(
        &self,
        name: &str,
        input: &ProjectDescriptionInput,
    ) -> Result<String> {
        let path = format!("{}/description", project_path(name)?);
        self.client.send_json(Method::PUT, &path, input).await
    }

    pub async fn delete_project_description(&self, name: &str) -> Result<()> {
        self.client
            .delete(&format!("{}/description", project_path(name)?))
            .await
    }

    /// Name of the parent project; empty for `All-Projects`
    pub async fn get_project_parent(&self, name: &str) -> Result<String> {
        self.get_string(&format!("{}/parent", project_path(name)?))
            .await
    }

    pub async fn set_project_parent(
        &self,
        name: &str,
        input: &ProjectParentInput,
    ) -> Result<String> {
        let path = format!("{}/parent", project_path(name)?);
        self.client.send_json(Method::PUT, &path, input).await
    }

    /// Ref HEAD points to, e.g. `refs/heads/master`
    pub async fn get_head(&self, name: &str) -> Result<String> {
        self.get_string(&format!("{}/HEAD", project_path(name)?)).await
    }

    pub async fn set_head(&self, name: &str, input: &HeadInput) -> Result<String> {
        let path = format!("{}/HEAD", project_path(name)?);
        self.client.send_json(Method::PUT, &path, input).await
    }

    pub async fn get_repository_statistics(&self, name: &str) -> Result<RepositoryStatisticsInfo> {
        self.client
            .get(&format!("{}/statistics.git", project_path(name)?))
            .await
    }

    /// Effective configuration, including values inherited from parent projects
    pub async fn get_config(&self, name: &str) -> Result<ConfigInfo> {
        self.client
            .get(&format!("{}/config", project_path(name)?))
            .await
    }

    pub async fn set_config(&self, name: &str, input: &ConfigInput) -> Result<ConfigInfo> {
        let path = format!("{}/config", project_path(name)?);
        self.client.send_json(Method::PUT, &path, input).await
    }

    /// Run Git garbage collection; returns the server's plain-text progress output
    pub async fn run_gc(&self, name: &str, input: &GcInput) -> Result<String> {
        let path = format!("{}/gc", project_path(name)?);
        let request = self.client.new_request(Method::POST, &path, Some(input))?;
        self.client.execute_text(request).await
    }

    pub async fn ban_commits(&self, name: &str, input: &BanInput) -> Result<BanResultInfo> {
        let path = format!("{}/ban", project_path(name)?);
        self.client.send_json(Method::PUT, &path, input).await
    }

    // =========================================================================
    // Branches
    // =========================================================================

    pub async fn list_branches(
        &self,
        name: &str,
        options: Option<&BranchOptions>,
    ) -> Result<Vec<BranchInfo>> {
        let path = add_options(&format!("{}/branches/", project_path(name)?), options);
        self.client.get(&path).await
    }

    pub async fn get_branch(&self, name: &str, branch: &str) -> Result<BranchInfo> {
        self.client.get(&branch_path(name, branch)?).await
    }

    pub async fn create_branch(
        &self,
        name: &str,
        branch: &str,
        input: &BranchInput,
    ) -> Result<BranchInfo> {
        self.client
            .send_json(Method::PUT, &branch_path(name, branch)?, input)
            .await
    }

    pub async fn delete_branch(&self, name: &str, branch: &str) -> Result<()> {
        self.client.delete(&branch_path(name, branch)?).await
    }

    pub async fn delete_branches(&self, name: &str, input: &DeleteBranchesInput) -> Result<()> {
        let path = format!("{}/branches:delete", project_path(name)?);
        let request = self.client.new_request(Method::POST, &path, Some(input))?;
        self.client.execute_empty(request).await
    }

    /// Content of `file` at the tip of `branch`, base64-encoded as sent by the server
    pub async fn get_branch_content(&self, name: &str, branch: &str, file: &str) -> Result<String> {
        let path = format!("{}/files/{}/content", branch_path(name, branch)?, segment(file)?);
        let request = self.client.new_request::<()>(Method::GET, &path, None)?;
        self.client.execute_text(request).await
    }

    /// Reflog of a branch; the caller must own the project
    pub async fn get_reflog(&self, name: &str, branch: &str) -> Result<Vec<ReflogEntryInfo>> {
        self.client
            .get(&format!("{}/reflog", branch_path(name, branch)?))
            .await
    }

    // =========================================================================
    // Child projects
    // =========================================================================

    pub async fn list_child_projects(
        &self,
        name: &str,
        options: Option<&ChildProjectOptions>,
    ) -> Result<Vec<ProjectInfo>> {
        let path = add_options(&format!("{}/children/", project_path(name)?), options);
        self.client.get(&path).await
    }

    /// A non-direct child is only found with `recursive` set
    pub async fn get_child_project(
        &self,
        name: &str,
        child: &str,
        options: Option<&ChildProjectOptions>,
    ) -> Result<ProjectInfo> {
        let path = add_options(
            &format!("{}/children/{}", project_path(name)?, segment(child)?),
            options,
        );
        self.client.get(&path).await
    }

    // =========================================================================
    // Tags
    // =========================================================================

    pub async fn list_tags(&self, name: &str) -> Result<Vec<TagInfo>> {
        self.client
            .get(&format!("{}/tags/", project_path(name)?))
            .await
    }

    pub async fn get_tag(&self, name: &str, tag: &str) -> Result<TagInfo> {
        self.client
            .get(&format!("{}/tags/{}", project_path(name)?, segment(tag)?))
            .await
    }

    // =========================================================================
    // Dashboards
    // =========================================================================

    pub async fn list_dashboards(&self, name: &str) -> Result<Vec<DashboardInfo>> {
        self.client
            .get(&format!("{}/dashboards/", project_path(name)?))
            .await
    }

    pub async fn get_dashboard(&self, name: &str, dashboard: &str) -> Result<DashboardInfo> {
        self.client.get(&dashboard_path(name, dashboard)?).await
    }

    pub async fn set_dashboard(
        &self,
        name: &str,
        dashboard: &str,
        input: &DashboardInput,
    ) -> Result<DashboardInfo> {
        self.client
            .send_json(Method::PUT, &dashboard_path(name, dashboard)?, input)
            .await
    }

    pub async fn delete_dashboard(&self, name: &str, dashboard: &str) -> Result<()> {
        self.client.delete(&dashboard_path(name, dashboard)?).await
    }

    /// GET an endpoint whose body is a bare JSON string
    async fn get_string(&self, path: &str) -> Result<String> {
        self.client.get::<String>(path).await
    }
}

fn branch_path(name: &str, branch: &str) -> Result<String> {
    Ok(format!("{}/branches/{}", project_path(name)?, segment(branch)?))
}

fn dashboard_path(name: &str, dashboard: &str) -> Result<String> {
    Ok(format!("{}/dashboards/{}", project_path(name)?, segment(dashboard)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_path_escapes_nested_names() {
        assert_eq!(project_path("demo").unwrap(), "projects/demo");
        assert_eq!(
            project_path("plugins/replication").unwrap(),
            "projects/plugins%2Freplication"
        );
    }

    #[test]
    fn test_branch_path_escapes_ref() {
        assert_eq!(
            branch_path("foo", "refs/heads/main").unwrap(),
            "projects/foo/branches/refs%2Fheads%2Fmain"
        );
    }

    #[test]
    fn test_dashboard_path_escapes_colon() {
        assert_eq!(
            dashboard_path("demo", "main:closed").unwrap(),
            "projects/demo/dashboards/main%3Aclosed"
        );
    }

    #[test]
    fn test_dot_and_empty_identifiers_are_rejected() {
        for id in ["", ".", ".."] {
            assert!(project_path(id).is_err(), "{:?} accepted", id);
            assert!(branch_path("demo", id).is_err(), "{:?} accepted", id);
            assert!(dashboard_path("demo", id).is_err(), "{:?} accepted", id);
        }
        // Dots inside a name are ordinary characters
        assert_eq!(project_path("...").unwrap(), "projects/...");
        assert_eq!(project_path("a/..").unwrap(), "projects/a%2F..");
    }
}
