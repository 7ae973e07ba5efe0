use clap::{Parser, Subcommand};

/// Command-line interface definition for clubhours
/// CLI application to track volunteer hours with SQLite
#[derive(Parser)]
#[command(
    name = "clubhours",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track club-member volunteer hours through a submission/approval workflow",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Acting user id (required for workflow commands)
    #[arg(global = true, long = "user")]
    pub user: Option<i64>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Manage club members
    User {
        #[arg(long = "add", help = "Add a new user")]
        add: bool,

        #[arg(long = "list", help = "List users")]
        list: bool,

        #[arg(long = "name", help = "Full name (with --add)")]
        name: Option<String>,

        #[arg(long = "email", help = "Email address (with --add)")]
        email: Option<String>,

        #[arg(
            long = "caps",
            help = "Comma-separated capabilities: member,reviewer,administrator",
            default_value = "member"
        )]
        caps: String,
    },

    /// Create a new draft work entry
    Add {
        /// Work date (YYYY-MM-DD)
        date: String,

        /// Hours worked (0.25 steps, max 24)
        hours: f64,

        #[arg(long = "for", help = "Owner user id when entering on someone's behalf")]
        owner: Option<i64>,

        #[arg(long = "category", help = "Work category")]
        category: Option<String>,

        #[arg(long = "from", help = "Start time (HH:MM)")]
        time_from: Option<String>,

        #[arg(long = "to", help = "End time (HH:MM)")]
        time_to: Option<String>,

        #[arg(long = "project", help = "Project name", default_value = "")]
        project: String,

        #[arg(long = "desc", help = "Description", default_value = "")]
        description: String,
    },

    /// Edit a draft entry
    Edit {
        /// Entry id
        id: i64,

        #[arg(long = "date", help = "Work date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "hours", help = "Hours worked")]
        hours: Option<f64>,

        #[arg(long = "category")]
        category: Option<String>,

        #[arg(long = "from", help = "Start time (HH:MM)")]
        time_from: Option<String>,

        #[arg(long = "to", help = "End time (HH:MM)")]
        time_to: Option<String>,

        #[arg(long = "project")]
        project: Option<String>,

        #[arg(long = "desc")]
        description: Option<String>,
    },

    /// Delete a draft entry (soft delete)
    Del {
        /// Entry id
        id: i64,
    },

    /// Submit a draft entry for review
    Submit { id: i64 },

    /// Withdraw a pending entry back to draft
    Withdraw { id: i64 },

    /// Cancel a pending entry
    Cancel { id: i64 },

    /// Reactivate a cancelled entry back to draft
    Reactivate { id: i64 },

    /// Approve a pending entry
    Approve { id: i64 },

    /// Reject a pending entry
    Reject {
        id: i64,

        #[arg(long = "reason", help = "Rejection reason (required)")]
        reason: String,
    },

    /// Return a submitted entry for clarification
    Return {
        id: i64,

        #[arg(long = "reason", help = "What needs clarifying (required)")]
        reason: String,
    },

    /// Correct the hours of an approved entry
    Correct {
        id: i64,

        #[arg(long = "hours", help = "Corrected hours")]
        hours: f64,

        #[arg(long = "reason", help = "Correction reason (required)")]
        reason: String,
    },

    /// Add a comment to an entry's conversation log
    Message {
        id: i64,

        #[arg(long = "body", help = "Message text")]
        body: String,
    },

    /// List work entries
    List {
        #[arg(long, short, help = "Filter by year, month or day (YYYY[-MM[-DD]])")]
        period: Option<String>,

        #[arg(long, help = "Filter by status")]
        status: Option<String>,

        #[arg(long = "pending", help = "Show only entries waiting for review")]
        pending: bool,

        #[arg(long = "messages", help = "Show the conversation log of each entry")]
        messages: bool,
    },

    /// Print the audit trail
    Audit {
        #[arg(long = "entry", help = "Restrict to one entry number")]
        entry: Option<String>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },
}
