pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "gleaner")]
#[command(about = "Collects posts matching search keywords from a social feed", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/gleaner/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database holding scraped posts
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in, search every keyword and store the posts found
    Run(RunArgs),
    /// Print stored posts
    List {
        /// Only posts found for this keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Write stored posts to stdout as JSON lines
    Export {
        /// Only posts found for this keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Run Chrome without a visible window
    #[arg(long)]
    pub headless: bool,

    /// Proxy server for Chrome, e.g. http://127.0.0.1:8080
    #[arg(long)]
    pub proxy: Option<String>,

    /// Maximum posts per keyword
    #[arg(short = 'n', long)]
    pub max_posts: Option<usize>,

    /// Newline-delimited keyword file
    #[arg(short, long)]
    pub keywords: Option<PathBuf>,

    /// Newline-delimited file of link substrings to skip
    #[arg(long)]
    pub denylist: Option<PathBuf>,

    /// JSON cookie file used to log in
    #[arg(long)]
    pub cookies: Option<PathBuf>,
}

impl RunArgs {
    /// Command-line values take precedence over the config file
    pub fn apply(&self, config: &mut Config) {
        if self.headless {
            config.session.headless = true;
        }
        if let Some(proxy) = &self.proxy {
            config.session.proxy = Some(proxy.clone());
        }
        if let Some(max_posts) = self.max_posts {
            config.collect.max_posts = max_posts;
        }
        if let Some(path) = &self.keywords {
            config.files.keywords = path.clone();
        }
        if let Some(path) = &self.denylist {
            config.files.denylist = path.clone();
        }
        if let Some(path) = &self.cookies {
            config.files.cookies = path.clone();
        }
    }
}
