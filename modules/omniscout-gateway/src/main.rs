use std::path::PathBuf;
use std::process::ExitCode;

use ai_client::Gemini;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use omniscout_common::{Category, Config, FileConfig, GenerationRequest, Platform};
use omniscout_gateway::export;
use omniscout_gateway::platform_syntax::syntax_rules;
use omniscout_gateway::report::{render_queries, render_report};
use omniscout_gateway::{render_prompt, response_schema, ExportFormat, QueryGateway};

#[derive(Parser)]
#[command(name = "omniscout", about = "Generate platform-specific OSINT search queries with Gemini")]
struct Cli {
    /// Path to config TOML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate dorks for a target (or a natural-language intent with --smart)
    Generate {
        #[command(flatten)]
        selection: Selection,

        /// Write results to a file in this format (repeatable)
        #[arg(long = "export", value_name = "FORMAT")]
        exports: Vec<ExportFormat>,

        /// Directory for exported files
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print only the queries, one per line
        #[arg(long)]
        queries_only: bool,

        /// Show a search link for every query
        #[arg(long)]
        links: bool,
    },
    /// Print the prompt that would be sent, without calling the model
    Prompt {
        #[command(flatten)]
        selection: Selection,

        /// Also print the response schema
        #[arg(long)]
        schema: bool,
    },
    /// List scan categories
    Categories,
    /// List platforms and their query syntax
    Platforms,
}

#[derive(Args)]
struct Selection {
    /// Domain, IP or keyword; a natural-language intent in smart mode
    #[arg(long)]
    target: String,

    #[arg(long, default_value = "google")]
    platform: Platform,

    /// Category slug or name (repeatable, defaults to all)
    #[arg(long = "category", value_name = "CATEGORY")]
    categories: Vec<Category>,

    /// Treat the target as a natural-language intent; the model picks categories
    #[arg(long)]
    smart: bool,
}

impl Selection {
    fn into_request(self) -> Result<GenerationRequest> {
        Ok(GenerationRequest::from_selection(
            self.target,
            self.categories,
            self.platform,
            self.smart,
        )?)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("omniscout=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!(config = %path.display(), "Loading config");
            FileConfig::load(path)?
        }
        None => FileConfig::default(),
    };

    match cli.command {
        Command::Generate {
            selection,
            exports,
            out_dir,
            queries_only,
            links,
        } => {
            let request = selection.into_request()?;
            let config = Config::from_env()?;

            let mut gemini = Gemini::new(config.gemini_api_key, file_config.model.name.clone());
            if let Some(base_url) = config.gemini_base_url {
                gemini = gemini.with_base_url(base_url);
            }

            let gateway = QueryGateway::new(gemini).with_sampling(file_config.model.sampling());
            let result = match gateway.generate(&request).await {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            };

            if queries_only {
                print!("{}", render_queries(&result));
            } else {
                print!("{}", render_report(&request, &result, links));
            }

            let dir = export::resolve_dir(out_dir, file_config.export.dir);
            let today = chrono::Utc::now().date_naive();
            for format in exports {
                export::write_to(&dir, &request, &result, format, today)?;
            }
        }
        Command::Prompt { selection, schema } => {
            let request = selection.into_request()?;
            println!("{}", render_prompt(&request));
            if schema {
                println!("{}", serde_json::to_string_pretty(&response_schema())?);
            }
        }
        Command::Categories => {
            for category in Category::ALL {
                println!("{:<12} {}", category.slug(), category.display_name());
            }
        }
        Command::Platforms => {
            for platform in Platform::ALL {
                println!("{:<12} {}", platform.slug(), platform.name());
                println!("             {}", syntax_rules(platform));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
