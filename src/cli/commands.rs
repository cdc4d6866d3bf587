use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::models::{Priority, Role, TaskStatus};

const VERSION: &str = env!("OBRA_VERSION");

#[derive(Parser)]
#[command(
    name = "obra",
    version = VERSION,
    about = "Construction project console: tasks, Gantt, documents and budget control",
    after_help = "\
NOTE:
  Talks to the obra REST backend. Run `obra login <email>` first.
  Settings and session live in $OBRA_HOME (default ~/.obra).

EXIT CODES:
  0  Success
  1  Error (validation, rejected by backend, network, not found, cancelled)
  2  Session expired or not logged in (run `obra login` again)

STATUS RULES:
  A pending task whose start date has passed is shown as `delayed`.
  Setting progress to 100 marks the task `completed`.
  Setting an actual start date on a non-completed task marks it `in_progress`.
  `task list` only displays derived statuses; `task sync-status` saves them.

BEHAVIOR NOTES:
  Durations count weekdays between start and end, both inclusive.
  Every write re-reads the list from the backend afterwards.
  Deletes ask for confirmation on stderr unless --yes is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL
    #[arg(long, global = true, env = "OBRA_API_URL")]
    pub api_url: Option<String>,

    /// Project ID (defaults to the one set with `project use`)
    #[arg(long, global = true)]
    pub project: Option<i64>,

    /// Evaluate date rules as of this day
    #[arg(long, global = true, hide = true)]
    pub today: Option<NaiveDate>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long, env = "OBRA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,

    /// Client settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Task tree of the active project
    #[command(subcommand)]
    Task(TaskCommands),

    /// Gantt chart of the active project
    #[command(after_help = "\
NOTE:
  Text mode draws one column per day: █ workday, ░ weekend inside a task,
  · weekend, | today. --json prints {data, links, warnings}.
  Dependency links come from each task's comma-separated `dependencies`.")]
    Gantt,

    /// Contractor catalogue
    #[command(subcommand)]
    Contractor(ContractorCommands),

    /// Work items (budget lines) of the active project
    #[command(subcommand)]
    WorkItem(WorkItemCommands),

    /// Contracts of the active project
    #[command(subcommand)]
    Contract(ContractCommands),

    /// Estimates of the active project
    #[command(subcommand)]
    Estimate(EstimateCommands),

    /// Budget summary of the active project
    Budget,

    /// Document folders of the active project
    #[command(subcommand)]
    Folder(FolderCommands),

    /// Documents and versions
    #[command(subcommand)]
    Document(DocumentCommands),

    /// Companies, users and non-working days
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Store the backend URL
    SetUrl { url: String },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List,
    /// Show project details
    Show { id: i64 },
    /// Create a project in your company
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a project
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Set the active project
    Use { id: i64 },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks as a tree
    List {
        /// Flat list without indentation
        #[arg(long)]
        flat: bool,
    },
    /// Show task details
    Show { id: i64 },
    /// Add a task
    Add {
        name: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        description: Option<String>,
        /// Parent task ID
        #[arg(long)]
        parent: Option<i64>,
        #[arg(long, value_enum, default_value = "medium")]
        priority: Priority,
        /// Responsible user ID
        #[arg(long)]
        responsible: Option<i64>,
        /// Comma-separated IDs of tasks this one waits on
        #[arg(long)]
        depends_on: Option<String>,
    },
    /// Update task fields
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// New parent task ID
        #[arg(long, conflicts_with = "root")]
        parent: Option<i64>,
        /// Move to the top level
        #[arg(long)]
        root: bool,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        responsible: Option<i64>,
        #[arg(long)]
        depends_on: Option<String>,
    },
    /// Set progress (100 completes the task)
    Progress {
        id: i64,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },
    /// Record the actual start (moves to in_progress)
    Start {
        id: i64,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Record the actual end and complete the task
    Finish {
        id: i64,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Set the status explicitly
    Status {
        id: i64,
        #[arg(value_enum)]
        status: TaskStatus,
    },
    /// Delete a task
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Save derived `delayed` statuses to the backend
    SyncStatus,
}

#[derive(Subcommand)]
pub enum ContractorCommands {
    /// List contractors
    List,
    /// Create a contractor
    Create {
        /// Legal name (razón social)
        legal_name: String,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Update a contractor
    Update {
        id: i64,
        #[arg(long)]
        legal_name: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a contractor
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Import contractors from a spreadsheet
    Import { file: PathBuf },
}

#[derive(Subcommand)]
pub enum WorkItemCommands {
    /// List work items with weights
    List,
    /// Create a work item
    Create {
        code: String,
        description: String,
        #[arg(long, default_value_t = 0.0)]
        base_budget: f64,
    },
    /// Update a work item
    Update {
        id: i64,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        base_budget: Option<f64>,
    },
    /// Delete a work item
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ContractCommands {
    /// List contracts with totals
    List {
        #[arg(long)]
        contractor: Option<i64>,
        #[arg(long)]
        contract: Option<i64>,
    },
    /// Create a contract
    Create {
        #[arg(long)]
        contractor: i64,
        #[arg(long)]
        work_item: i64,
        #[arg(long)]
        number: String,
        #[arg(long, default_value = "")]
        works: String,
        #[arg(long, default_value_t = 0.0)]
        contracted: f64,
        #[arg(long, default_value_t = 0.0)]
        additive: f64,
        #[arg(long, default_value_t = 0.0)]
        deductive: f64,
        #[arg(long, default_value_t = 0.0)]
        advance: f64,
        /// Contract without VAT
        #[arg(long)]
        no_vat: bool,
    },
    /// Update a contract
    Update {
        id: i64,
        #[arg(long)]
        contractor: Option<i64>,
        #[arg(long)]
        work_item: Option<i64>,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        works: Option<String>,
        #[arg(long)]
        contracted: Option<f64>,
        #[arg(long)]
        additive: Option<f64>,
        #[arg(long)]
        deductive: Option<f64>,
        #[arg(long)]
        advance: Option<f64>,
        #[arg(long)]
        applies_vat: Option<bool>,
    },
    /// Delete a contract
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Import contracts from a spreadsheet
    Import { file: PathBuf },
    /// Export contracts to a spreadsheet
    Export {
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(clap::Args, Clone, Copy, Default)]
pub struct EstimateAmounts {
    #[arg(long, default_value_t = 0.0)]
    pub estimated: f64,
    #[arg(long, default_value_t = 0.0)]
    pub deductions: f64,
    #[arg(long, default_value_t = 0.0)]
    pub amortized: f64,
    #[arg(long, default_value_t = 0.0)]
    pub guarantee_fund: f64,
    #[arg(long, default_value_t = 0.0)]
    pub retentions: f64,
}

#[derive(Subcommand)]
pub enum EstimateCommands {
    /// List estimates with totals
    #[command(after_help = "\
NOTE:
  --contract takes precedence over --contractor.")]
    List {
        #[arg(long)]
        contractor: Option<i64>,
        #[arg(long)]
        contract: Option<i64>,
    },
    /// Create an estimate
    Create {
        #[arg(long)]
        contract: i64,
        #[arg(long, default_value = "")]
        number: String,
        #[command(flatten)]
        amounts: EstimateAmounts,
    },
    /// Update an estimate
    Update {
        id: i64,
        #[arg(long)]
        contract: Option<i64>,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        estimated: Option<f64>,
        #[arg(long)]
        deductions: Option<f64>,
        #[arg(long)]
        amortized: Option<f64>,
        #[arg(long)]
        guarantee_fund: Option<f64>,
        #[arg(long)]
        retentions: Option<f64>,
    },
    /// Delete an estimate
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Import estimates from a spreadsheet
    Import { file: PathBuf },
    /// Export estimates to a spreadsheet
    Export {
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Preview subtotal, VAT and total before creating
    Preview {
        #[arg(long)]
        contract: i64,
        #[command(flatten)]
        amounts: EstimateAmounts,
    },
}

#[derive(Subcommand)]
pub enum FolderCommands {
    /// Show the folder tree
    Tree,
    /// List a folder's subfolders and documents
    Show { id: i64 },
    /// Create a folder
    Create {
        name: String,
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Rename a folder
    Rename { id: i64, name: String },
    /// Delete a folder
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Create a document and upload its first version
    Create {
        #[arg(long)]
        folder: i64,
        /// Document name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
        file: PathBuf,
    },
    /// Upload a new version of a document
    Upload { id: i64, file: PathBuf },
    /// Download a document version
    Download {
        version_id: i64,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Fetch the latest IFC model of a document
    Model {
        #[arg(long)]
        folder: i64,
        #[arg(long)]
        document: i64,
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Companies
    #[command(subcommand)]
    Company(CompanyCommands),
    /// Users
    #[command(subcommand)]
    User(UserCommands),
    /// Non-working days (stored only, not used in durations)
    #[command(subcommand)]
    Holidays(HolidayCommands),
}

#[derive(Subcommand)]
pub enum CompanyCommands {
    List,
    Create { name: String },
}

#[derive(Subcommand)]
pub enum UserCommands {
    List,
    Create {
        email: String,
        #[arg(long, env = "OBRA_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        company: Option<i64>,
        #[arg(long, value_enum, default_value = "user")]
        role: Role,
    },
}

#[derive(Subcommand)]
pub enum HolidayCommands {
    List,
    Add {
        date: NaiveDate,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_progress_bounds() {
        let ok = Cli::try_parse_from(["obra", "task", "progress", "4", "100"]);
        assert!(ok.is_ok());
        let too_high = Cli::try_parse_from(["obra", "task", "progress", "4", "101"]);
        assert!(too_high.is_err());
    }
}
