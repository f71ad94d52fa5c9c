//! lyceum: command-line client for the institute content API.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lyceum::cache::Params;
use lyceum::config::{Config, Secrets};
use lyceum::{Enquiry, Lyceum, LyceumError};
use tracing::debug;

/// Lyceum content API client
#[derive(Parser)]
#[command(name = "lyceum")]
#[command(version = lyceum::PKG_VERSION)]
#[command(about = "Browse and submit to the institute content API")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL (overrides the config file).
    #[arg(long, env = "LYCEUM_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List courses
    Courses,

    /// Show one course
    Course {
        /// Course id
        id: String,
    },

    /// List placement records
    Placements,

    /// List blog posts
    Blogs {
        /// Page number
        #[arg(long)]
        page: Option<u32>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one blog post
    Blog {
        /// Post slug
        slug: String,
    },

    /// Show navbar configuration
    Navbar,

    /// Show footer configuration
    Footer,

    /// Show about page content
    About,

    /// Show home page content
    Home,

    /// Submit an enquiry
    Enquire {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        /// Course the enquiry is about
        #[arg(long)]
        course: Option<String>,
        #[arg(long, default_value = "")]
        message: String,
    },

    /// List received enquiries (logs in as admin)
    Enquiries,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    debug!(version = lyceum::version_string(), "lyceum starting");

    let config = Config::load_or_default(args.config.as_deref())?;
    let mut builder = Lyceum::builder().config(&config);
    if let Some(url) = args.api_url {
        builder = builder.base_url(url);
    }
    let client = builder.build()?;

    let output = match args.command {
        Command::Courses => client.courses().await?,
        Command::Course { id } => client.course(&id).await?,
        Command::Placements => client.placements().await?,
        Command::Blogs { page, category } => {
            let mut params = Params::new();
            if let Some(page) = page {
                params.insert("page", page);
            }
            if let Some(category) = category {
                params.insert("category", category);
            }
            client.blog_posts(&params).await?
        }
        Command::Blog { slug } => client.blog_post(&slug).await?,
        Command::Navbar => client.navbar().await?,
        Command::Footer => client.footer().await?,
        Command::About => client.about().await?,
        Command::Home => client.home().await?,
        Command::Enquire {
            name,
            email,
            phone,
            course,
            message,
        } => {
            let mut enquiry = Enquiry::new(name, email).message(message);
            enquiry.phone = phone;
            enquiry.course = course;
            client.submit_enquiry(&enquiry).await?
        }
        Command::Enquiries => {
            let credentials = Secrets::load()?.admin_credentials().ok_or_else(|| {
                LyceumError::Configuration(
                    "admin credentials not found in secrets.toml or LYCEUM_ADMIN_EMAIL/LYCEUM_ADMIN_PASSWORD"
                        .to_string(),
                )
            })?;
            client.login(&credentials).await?;
            let enquiries = client.enquiries().await;
            client.logout();
            enquiries?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
