//! Command-line interface for mymedialist.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::{
    cmd_add_media, cmd_create_user, cmd_init, cmd_list_media, cmd_relate, cmd_show_media,
};

/// mymedialist - track the films, series and books you watch and read
#[derive(Parser)]
#[command(name = "mymedialist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web API server
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create a user account
    CreateUser {
        username: String,
        /// Password (at least `security.min_password_length` characters)
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Add a film, series or book
    #[command(alias = "add")]
    AddMedia {
        /// film, series or book
        kind: String,
        #[arg(long)]
        title: String,
        /// Extra field as key=value, e.g. --set release_status=released
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// List media, most popular first
    #[command(alias = "ls")]
    ListMedia {
        /// Restrict to film, series or book
        #[arg(long = "type")]
        kind: Option<String>,
        /// Title substring
        #[arg(long)]
        query: Option<String>,
    },

    /// Link two media: `relate 1 2 sequel` records 2 as a sequel of 1
    Relate {
        subject: i32,
        other: i32,
        /// sequel, prequel or related
        #[arg(default_value = "related")]
        kind: String,
        /// Remove the existing link instead
        #[arg(long)]
        remove: bool,
    },

    /// Show a media item with its sequels, prequels and relatives
    #[command(alias = "info")]
    ShowMedia { id: i32 },
}
