use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Git hosting provider operations for CKli stacks", long_about = None)]
struct Cli {
    /// Provider type (github, gitlab, gitea, filesystem); detected from the
    /// remote URL when omitted
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Explicit API base URL (Gitea mostly; must end with '/')
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the hosting provider behind a remote URL
    Detect {
        /// Remote URL in any common Git dialect
        remote_url: String,
    },

    /// Parse a remote URL into host, owner and repository name
    Parse {
        /// Remote URL in any common Git dialect
        remote_url: String,
    },

    /// Show repository metadata
    Info {
        /// Remote URL of the repository
        remote_url: String,

        /// Treat a missing repository as an error
        #[arg(long)]
        must_exist: bool,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a repository on the hosting provider
    Create {
        /// Remote URL of the repository to create
        remote_url: String,

        /// Repository description
        #[arg(long)]
        description: Option<String>,

        /// Create the repository private regardless of the provider default
        #[arg(long)]
        private: bool,

        /// Initialize with a first commit
        #[arg(long)]
        auto_init: bool,
    },

    /// Archive a repository (or restore it with --restore)
    Archive {
        /// Remote URL of the repository
        remote_url: String,

        /// Unarchive instead of archive
        #[arg(long)]
        restore: bool,
    },

    /// Delete a repository permanently
    Delete {
        /// Remote URL of the repository
        remote_url: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let provider = cli.provider.as_deref();
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Commands::Detect { remote_url } => {
            commands::detect::execute(&remote_url, provider, api_url)?;
        }
        Commands::Parse { remote_url } => {
            commands::parse::execute(&remote_url)?;
        }
        Commands::Info {
            remote_url,
            must_exist,
            json,
        } => {
            commands::info::execute(&remote_url, provider, api_url, must_exist, json)?;
        }
        Commands::Create {
            remote_url,
            description,
            private,
            auto_init,
        } => {
            commands::create::execute(
                &remote_url,
                provider,
                api_url,
                description,
                private,
                auto_init,
            )?;
        }
        Commands::Archive {
            remote_url,
            restore,
        } => {
            commands::archive::execute(&remote_url, provider, api_url, restore)?;
        }
        Commands::Delete { remote_url, yes } => {
            commands::delete::execute(&remote_url, provider, api_url, yes)?;
        }
    }

    Ok(())
}
