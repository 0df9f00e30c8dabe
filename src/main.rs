use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use gerrit_projects::config::Config;
use gerrit_projects::gerrit::client::GerritClient;
use gerrit_projects::gerrit::http::format_gerrit_error;
use gerrit_projects::gerrit::projects::{
    BranchInput, BranchOptions, ChildProjectOptions, GcInput, HeadInput, ProjectDescriptionInput,
    ProjectInput, ProjectOptions, ProjectParentInput, ProjectType, ProjectsService,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Command-line client for the Gerrit projects REST API
#[derive(Parser, Debug)]
#[command(name = "gerrit-projects", version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    server: ServerArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for debugging; RUST_LOG takes precedence when set
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Write logs here instead of the config directory
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// How to reach the server
#[derive(ClapArgs, Debug)]
struct ServerArgs {
    /// Gerrit server URL (falls back to config, then GERRIT_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Account name; the password is read from GERRIT_HTTP_PASSWORD
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive for this level; `None` disables logging
    fn directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProjectTypeArg {
    All,
    Code,
    Permissions,
}

impl From<ProjectTypeArg> for ProjectType {
    fn from(value: ProjectTypeArg) -> Self {
        match value {
            ProjectTypeArg::All => ProjectType::All,
            ProjectTypeArg::Code => ProjectType::Code,
            ProjectTypeArg::Permissions => ProjectType::Permissions,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save server URL and username to the config file
    Configure {
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    #[command(flatten)]
    Api(ApiCommand),
}

/// Commands that talk to the server
#[derive(Subcommand, Debug)]
enum ApiCommand {
    /// List projects visible to the caller
    List(ListArgs),
    /// Show a project
    Get { project: String },
    /// Create a project
    Create(CreateArgs),
    /// Show a project's description
    Description { project: String },
    /// Set a project's description (empty removes it)
    SetDescription {
        project: String,
        description: String,
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Show a project's parent
    Parent { project: String },
    /// Change a project's parent
    SetParent {
        project: String,
        parent: String,
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Show the ref HEAD points to
    Head { project: String },
    /// Point HEAD at another ref
    SetHead { project: String, reference: String },
    /// Show repository statistics
    Statistics { project: String },
    /// Show the effective project configuration
    Config { project: String },
    /// Run Git garbage collection
    Gc {
        project: String,
        #[arg(long)]
        aggressive: bool,
    },
    /// List branches
    Branches {
        project: String,
        #[command(flatten)]
        filter: RefFilterArgs,
    },
    /// Show a branch
    Branch { project: String, branch: String },
    /// Create a branch
    CreateBranch {
        project: String,
        branch: String,
        /// Commit, branch or tag to start from
        #[arg(short, long)]
        revision: Option<String>,
    },
    /// Delete a branch
    DeleteBranch { project: String, branch: String },
    /// Show a branch's reflog
    Reflog { project: String, branch: String },
    /// List child projects
    Children {
        project: String,
        #[arg(short, long)]
        recursive: bool,
    },
    /// Show a child project
    Child {
        project: String,
        child: String,
        #[arg(short, long)]
        recursive: bool,
    },
    /// List tags
    Tags { project: String },
    /// Show a tag
    Tag { project: String, tag: String },
    /// List dashboards
    Dashboards { project: String },
    /// Show a dashboard
    Dashboard { project: String, dashboard: String },
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    /// Only projects with this branch
    #[arg(short, long)]
    branch: Option<String>,
    /// Include descriptions
    #[arg(short, long)]
    description: bool,
    #[arg(short = 'n', long)]
    limit: Option<u32>,
    #[arg(short, long)]
    prefix: Option<String>,
    #[arg(short, long)]
    regex: Option<String>,
    #[arg(short = 'S', long)]
    skip: Option<u32>,
    #[arg(short = 'm', long)]
    substring: Option<String>,
    /// Show the inheritance tree
    #[arg(short, long)]
    tree: bool,
    #[arg(long = "type", value_enum)]
    project_type: Option<ProjectTypeArg>,
}

impl From<ListArgs> for ProjectOptions {
    fn from(args: ListArgs) -> Self {
        Self {
            branch: args.branch,
            description: args.description,
            limit: args.limit,
            prefix: args.prefix,
            regex: args.regex,
            skip: args.skip,
            substring: args.substring,
            tree: args.tree,
            project_type: args.project_type.map(ProjectType::from),
        }
    }
}

#[derive(ClapArgs, Debug)]
struct RefFilterArgs {
    #[arg(short = 'n', long)]
    limit: Option<u32>,
    #[arg(short, long)]
    skip: Option<u32>,
    #[arg(short = 'm', long)]
    substring: Option<String>,
    #[arg(short, long)]
    regex: Option<String>,
}

impl From<RefFilterArgs> for BranchOptions {
    fn from(args: RefFilterArgs) -> Self {
        Self {
            limit: args.limit,
            skip: args.skip,
            substring: args.substring,
            regex: args.regex,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct CreateArgs {
    project: String,
    #[arg(long)]
    parent: Option<String>,
    #[arg(short, long)]
    description: Option<String>,
    /// Create a permissions-only project
    #[arg(long)]
    permissions_only: bool,
    /// Create an initial empty commit
    #[arg(long)]
    empty_commit: bool,
    /// Initial branches
    #[arg(long = "branch")]
    branches: Vec<String>,
    /// Owner groups
    #[arg(long = "owner")]
    owners: Vec<String>,
}

impl From<CreateArgs> for ProjectInput {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.project,
            parent: args.parent.unwrap_or_default(),
            description: args.description.unwrap_or_default(),
            permissions_only: args.permissions_only,
            create_empty_commit: args.empty_commit,
            branches: args.branches,
            owners: args.owners,
            ..Default::default()
        }
    }
}

/// Filter from RUST_LOG when it parses, otherwise from `--log-level`
fn log_filter(level: LogLevel) -> Option<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Some(filter);
    }
    level.directive().map(EnvFilter::new)
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<PathBuf>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = log_filter(level)?;

    let log_path = log_file.unwrap_or_else(default_log_path);

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Logging to {:?}", log_path);

    Some(guard)
}

fn default_log_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("gerrit-projects"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".gerrit-projects")))
        .unwrap_or_default()
        .join("gerrit-projects.log")
}

fn print_output<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn build_client(args: &ServerArgs, config: &Config) -> Result<GerritClient> {
    let url = config.effective_url(args.url.as_deref()).context(
        "No Gerrit URL configured. Set GERRIT_URL, use --url or run 'gerrit-projects configure'",
    )?;
    tracing::info!("Using server: {}", url);

    let mut builder = GerritClient::builder(&url)
        .credentials(config.credentials(args.username.as_deref()))
        .accept_invalid_certs(args.insecure);
    if let Some(secs) = args.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

async fn run(args: Args, config: &mut Config) -> Result<()> {
    let Args {
        server,
        output,
        command,
        ..
    } = args;

    match command {
        Command::Configure { server: url, user } => {
            config.set_server(url.as_deref(), user.as_deref())
        }
        Command::Api(command) => {
            tracing::debug!("Running {:?}", command);
            let client = build_client(&server, config)?;
            dispatch(client.projects(), command, output).await
        }
    }
}

async fn dispatch(
    projects: ProjectsService<'_>,
    command: ApiCommand,
    output: OutputFormat,
) -> Result<()> {
    match command {
        ApiCommand::List(list) => {
            let options = ProjectOptions::from(list);
            print_output(output, &projects.list_projects(Some(&options)).await?)
        }
        ApiCommand::Get { project } => print_output(output, &projects.get_project(&project).await?),
        ApiCommand::Create(create) => {
            let name = create.project.clone();
            let input = ProjectInput::from(create);
            print_output(output, &projects.create_project(&name, &input).await?)
        }
        ApiCommand::Description { project } => {
            print_output(output, &projects.get_project_description(&project).await?)
        }
        ApiCommand::SetDescription {
            project,
            description,
            message,
        } => {
            if description.is_empty() {
                projects.delete_project_description(&project).await?;
                return Ok(());
            }
            let input = ProjectDescriptionInput {
                description,
                commit_message: message.unwrap_or_default(),
            };
            print_output(output, &projects.set_project_description(&project, &input).await?)
        }
        ApiCommand::Parent { project } => {
            print_output(output, &projects.get_project_parent(&project).await?)
        }
        ApiCommand::SetParent {
            project,
            parent,
            message,
        } => {
            let input = ProjectParentInput {
                parent,
                commit_message: message.unwrap_or_default(),
            };
            print_output(output, &projects.set_project_parent(&project, &input).await?)
        }
        ApiCommand::Head { project } => print_output(output, &projects.get_head(&project).await?),
        ApiCommand::SetHead { project, reference } => {
            let input = HeadInput { ref_name: reference };
            print_output(output, &projects.set_head(&project, &input).await?)
        }
        ApiCommand::Statistics { project } => {
            print_output(output, &projects.get_repository_statistics(&project).await?)
        }
        ApiCommand::Config { project } => print_output(output, &projects.get_config(&project).await?),
        ApiCommand::Gc {
            project,
            aggressive,
        } => {
            let input = GcInput {
                show_progress: false,
                aggressive,
            };
            println!("{}", projects.run_gc(&project, &input).await?.trim_end());
            Ok(())
        }
        ApiCommand::Branches { project, filter } => {
            let options = BranchOptions::from(filter);
            print_output(output, &projects.list_branches(&project, Some(&options)).await?)
        }
        ApiCommand::Branch { project, branch } => {
            print_output(output, &projects.get_branch(&project, &branch).await?)
        }
        ApiCommand::CreateBranch {
            project,
            branch,
            revision,
        } => {
            let input = BranchInput {
                ref_name: String::new(),
                revision: revision.unwrap_or_default(),
            };
            print_output(output, &projects.create_branch(&project, &branch, &input).await?)
        }
        ApiCommand::DeleteBranch { project, branch } => {
            projects.delete_branch(&project, &branch).await
        }
        ApiCommand::Reflog { project, branch } => {
            print_output(output, &projects.get_reflog(&project, &branch).await?)
        }
        ApiCommand::Children { project, recursive } => {
            let options = ChildProjectOptions { recursive };
            print_output(output, &projects.list_child_projects(&project, Some(&options)).await?)
        }
        ApiCommand::Child {
            project,
            child,
            recursive,
        } => {
            let options = ChildProjectOptions { recursive };
            print_output(
                output,
                &projects.get_child_project(&project, &child, Some(&options)).await?,
            )
        }
        ApiCommand::Tags { project } => print_output(output, &projects.list_tags(&project).await?),
        ApiCommand::Tag { project, tag } => {
            print_output(output, &projects.get_tag(&project, &tag).await?)
        }
        ApiCommand::Dashboards { project } => {
            print_output(output, &projects.list_dashboards(&project).await?)
        }
        ApiCommand::Dashboard { project, dashboard } => {
            print_output(output, &projects.get_dashboard(&project, &dashboard).await?)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.clone());

    let mut config = Config::load();

    match run(args, &mut config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {:?}", err);
            eprintln!("Error: {}", format_gerrit_error(&err));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_configure_is_parsed_apart_from_api_commands() {
        let args = Args::try_parse_from([
            "gerrit-projects",
            "configure",
            "--server",
            "https://review.example.com",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Command::Configure { server: Some(ref url), user: None } if url == "https://review.example.com"
        ));

        let args = Args::try_parse_from(["gerrit-projects", "head", "demo"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Api(ApiCommand::Head { ref project }) if project == "demo"
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "gerrit-projects",
            "branches",
            "demo",
            "--url",
            "https://review.example.com",
            "-u",
            "jdoe",
            "--timeout",
            "5",
            "--log-level",
            "debug",
            "--log-file",
            "/tmp/gerrit.log",
        ])
        .unwrap();
        assert_eq!(args.server.url.as_deref(), Some("https://review.example.com"));
        assert_eq!(args.server.username.as_deref(), Some("jdoe"));
        assert_eq!(args.server.timeout, Some(5));
        assert_eq!(args.log_level.directive(), Some("debug"));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/gerrit.log")));
    }

    #[test]
    fn test_log_level_off_has_no_directive() {
        assert_eq!(LogLevel::Off.directive(), None);
        assert_eq!(LogLevel::Trace.directive(), Some("trace"));
    }

    #[test]
    fn test_default_log_path_file_name() {
        assert_eq!(
            default_log_path().file_name().and_then(|name| name.to_str()),
            Some("gerrit-projects.log")
        );
    }
}
