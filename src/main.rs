use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use mediumctl::commands::{self, Context};
use mediumctl::config::settings::Config;

#[derive(Parser)]
#[command(name = "mediumctl")]
#[command(
    about = "Interact with the Medium publishing platform through the command line",
    long_about = r#"
        mediumctl publishes Markdown files with YAML front matter to Medium.
        It supports:
        • Storing an integration token in ~/.mediumctl
        • Showing the account that owns the token
        • Creating draft posts and opening them in the browser
    "#,
    disable_version_flag = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an integration token to be used by this application
    #[command(visible_alias = "st")]
    SetToken { token: String },
    /// Get the information for the owner of the access token
    Info,
    /// Publish a markdown file to Medium as a draft and open the post in the browser
    #[command(visible_alias = "p")]
    Publish { path: PathBuf },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let ctx = Context::new(config);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to build tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = io::stdout();
    let result = rt.block_on(async {
        match cli.command {
            Commands::SetToken { token } => commands::set_token::run(&ctx.tokens, &token, &mut stdout),
            Commands::Info => commands::info::run(&ctx, &mut stdout).await,
            Commands::Publish { path } => commands::publish::run(&ctx, &path, &mut stdout).await,
        }
    });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
