use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "reqres")]
#[command(about = "A CLI for the reqres user directory API", version)]
#[command(after_help = "EXAMPLES:
    reqres user 2                 Show a single user
    reqres users --page 2         List every user from page 2 onwards
    reqres users --json           List all users as JSON")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Show debug logs and the full error chain
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a single user
    #[command(after_help = "EXAMPLES:
    reqres user 2
    reqres user 2 --json")]
    User {
        /// User identifier
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },
    /// List all users, following pagination
    #[command(after_help = "EXAMPLES:
    reqres users
    reqres users --page 2")]
    Users {
        /// Page to start from
        #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    reqres completions bash > ~/.bash_completion.d/reqres
    reqres completions zsh > ~/.zfunc/_reqres
    reqres completions fish > ~/.config/fish/completions/reqres.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    reqres init")]
    Init,
}
