//! Query options for the list and child-project endpoints

use crate::gerrit::query::{push_flag, push_opt, QueryOptions};
use std::fmt;

/// Project type filter for [`ProjectOptions::project_type`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    All,
    Code,
    Permissions,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectType::All => "ALL",
            ProjectType::Code => "CODE",
            ProjectType::Permissions => "PERMISSIONS",
        };
        f.write_str(name)
    }
}

/// Options for listing projects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Only projects having this branch; its revision is included in the results (`b`)
    pub branch: Option<String>,
    /// Include descriptions (`d`)
    pub description: bool,
    /// Maximum number of projects (`n`)
    pub limit: Option<u32>,
    /// Name prefix (`p`)
    pub prefix: Option<String>,
    /// Name regex; `^` and `$` are implicit (`r`)
    pub regex: Option<String>,
    /// Number of projects to skip (`S`)
    pub skip: Option<u32>,
    /// Name substring (`m`)
    pub substring: Option<String>,
    /// Inheritance tree format; does not combine with `branch` (`t`)
    pub tree: bool,
    /// `type`
    pub project_type: Option<ProjectType>,
}

impl QueryOptions for ProjectOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "b", self.branch.as_ref());
        push_flag(&mut pairs, "d", self.description);
        push_opt(&mut pairs, "n", self.limit.as_ref());
        push_opt(&mut pairs, "p", self.prefix.as_ref());
        push_opt(&mut pairs, "r", self.regex.as_ref());
        push_opt(&mut pairs, "S", self.skip.as_ref());
        push_opt(&mut pairs, "m", self.substring.as_ref());
        push_flag(&mut pairs, "t", self.tree);
        push_opt(&mut pairs, "type", self.project_type.as_ref());
        pairs
    }
}

/// Options for listing branches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchOptions {
    /// `n`
    pub limit: Option<u32>,
    /// `s`
    pub skip: Option<u32>,
    /// `m`
    pub substring: Option<String>,
    /// `r`
    pub regex: Option<String>,
}

impl QueryOptions for BranchOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "n", self.limit.as_ref());
        push_opt(&mut pairs, "s", self.skip.as_ref());
        push_opt(&mut pairs, "m", self.substring.as_ref());
        push_opt(&mut pairs, "r", self.regex.as_ref());
        pairs
    }
}

/// Options for the child-project endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildProjectOptions {
    /// Resolve children recursively; invisible children are not descended into
    pub recursive: bool,
}

impl QueryOptions for ChildProjectOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_flag(&mut pairs, "recursive", self.recursive);
        pairs
    }
}
