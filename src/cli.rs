use clap::{Parser, Subcommand};

use todo_desk::criteria::{Criteria, SortCriteria};
use todo_desk::library::BookSortKey;
use todo_desk::todo::{Complexity, Priority};

#[derive(Parser, Debug)]
#[command(name = "tododesk")]
#[command(about = "Terminal client for the todo and library service", long_about = None)]
pub struct Cli {
    /// Base URL of the service (overrides config and TODO_DESK_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the filtered and sorted todo list (default command)
    List {
        /// all, completed, not-completed, high-priority, high-priority-open,
        /// today, yesterday, no-estimation, tag:NAME, project:NAME; join with +
        #[arg(short, long)]
        filter: Option<Criteria>,
        /// default, recent-changes or complexity; remembered for later runs
        #[arg(short, long)]
        sort: Option<SortCriteria>,
        /// Only todos whose title contains this text; remembered for later runs
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the filter groups with their counts
    Sidebar,
    /// Create a todo
    Add {
        title: String,
        #[command(flatten)]
        fields: TodoFields,
    },
    /// Change fields of an existing todo
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TodoFields,
    },
    /// Flip the completed flag of a todo
    Toggle { id: i64 },
    /// Delete a todo
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Start working on a todo
    Start { id: i64 },
    /// Stop working and book the elapsed time
    Stop,
    /// Follow the running working session
    Watch,
    /// List or create authors
    Authors {
        #[arg(long)]
        search: Option<String>,
        /// Create an author with this full name
        #[arg(long)]
        add: Option<String>,
    },
    /// List books
    Books {
        #[arg(long)]
        search: Option<String>,
        /// title, authors, publisher, pages, rating or tags
        #[arg(long, default_value_t = BookSortKey::Title)]
        sort: BookSortKey,
        #[arg(long)]
        desc: bool,
    },
}

/// Todo fields shared by `add` and `edit`; absent flags leave a field as is.
#[derive(clap::Args, Debug, Default)]
pub struct TodoFields {
    #[arg(short, long)]
    pub description: Option<String>,
    /// A to F
    #[arg(short, long)]
    pub priority: Option<Priority>,
    /// XS, S, M, L or XL
    #[arg(short, long)]
    pub complexity: Option<Complexity>,
    /// Time already spent, like 1h30m
    #[arg(long)]
    pub working_time: Option<String>,
    /// Estimated time, like 2d4h
    #[arg(short, long)]
    pub estimate: Option<String>,
    /// Replace the tags (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    /// Replace the projects (repeatable)
    #[arg(long = "project")]
    pub projects: Vec<String>,
}
