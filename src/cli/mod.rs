//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::model::{Category, Role};

pub mod commands;

pub use commands::run;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "docdesk.toml";

#[derive(Parser, Debug)]
#[command(name = "docdesk", version, about = "Document desk administration console")]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Close the current device session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change the logged-in user's password
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Manage users (admin)
    #[command(subcommand)]
    Users(UsersCommand),
    /// Manage folders
    #[command(subcommand)]
    Folders(FoldersCommand),
    /// Manage files
    #[command(subcommand)]
    Files(FilesCommand),
    /// Manage session groups (admin)
    #[command(subcommand)]
    Groups(GroupsCommand),
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    List {
        /// Filter by company name, contact name or email
        #[arg(short, long)]
        search: Option<String>,
    },
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        max_sessions: Option<u32>,
        /// Initial password; the backend generates one when omitted
        #[arg(long)]
        password: Option<String>,
        /// Folder ids granted on creation
        #[arg(long = "folder")]
        folders: Vec<String>,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        max_sessions: Option<u32>,
        /// Replace the user's folders
        #[arg(long = "folder")]
        folders: Vec<String>,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    ResetPassword {
        #[arg(long)]
        id: String,
        /// New password; the backend generates one when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FoldersCommand {
    /// List every folder with file totals
    List,
    /// File totals for the logged-in user's folders
    Mine,
    /// Print a folder tree (every root when no id is given)
    Tree {
        #[arg(long)]
        id: Option<String>,
    },
    /// Create a folder, optionally with nested subfolders
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        /// Nested subfolders as a slash path, e.g. "2024/Enero"
        #[arg(long = "sub")]
        subs: Vec<String>,
    },
    /// Rename a folder and reconcile its direct subfolders
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long = "sub")]
        subs: Vec<String>,
    },
    /// Rename the subfolder at a tree path
    Rename {
        #[arg(long)]
        id: String,
        /// Tree path such as "0-1"
        #[arg(long)]
        path: String,
        #[arg(long)]
        name: String,
    },
    /// Add a subfolder under a tree path (the folder itself by default)
    AddSub {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        path: String,
        #[arg(long)]
        name: String,
    },
    /// Remove the subfolder at a tree path
    RemoveSub {
        #[arg(long)]
        id: String,
        #[arg(long)]
        path: String,
    },
    /// Delete a folder or some of its subfolders
    Delete {
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        mode: DeleteMode,
        /// Subfolder ids for `--mode selected`
        #[arg(long = "select")]
        selected: Vec<String>,
    },
    /// Replace the users assigned to a folder
    Assign {
        #[arg(long)]
        id: String,
        #[arg(long = "user")]
        users: Vec<String>,
    },
    /// List the folders of one category
    ByCategory {
        #[arg(long)]
        category: Category,
    },
    /// Print the backend's folder diagnostics
    Debug,
    /// Create the backend's sample folders
    Seed,
    /// Delete every folder on the backend
    Purge {
        /// Confirm the purge
        #[arg(long)]
        yes: bool,
    },
}

/// Deletion mode as typed on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteMode {
    /// The folder and every subfolder
    All,
    /// Only the subfolders passed with --select
    Selected,
    /// Only the folder record
    Parent,
}

#[derive(Subcommand, Debug)]
pub enum FilesCommand {
    List {
        #[arg(long)]
        folder: String,
    },
    Upload {
        #[arg(long)]
        folder: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Download {
        #[arg(long)]
        id: String,
        #[arg(short, long)]
        out: PathBuf,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Print the inline view URL
    Url {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupsCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "user")]
        users: Vec<String>,
    },
    AddUser {
        #[arg(long)]
        id: String,
        #[arg(long)]
        user: String,
    },
    RemoveUser {
        #[arg(long)]
        id: String,
        #[arg(long)]
        user: String,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}
