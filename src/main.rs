use clap::{Parser, Subcommand};
use dotenv::dotenv;
use plain_folio::{audit, config, content, github, output, render, server};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "plain-folio")]
#[command(about = "Blog/portfolio site kit: build, serve, and audit from local JSON")]
#[command(long_about = "\
Blog/portfolio site kit: build, serve, and audit from local JSON

Your content is two JSON files. Posts and projects are sanitized,
rendered to a single accessible HTML page with inline CSS, and the same
binary serves and audits the result.

Source structure:

  content/
  ├── config.toml      # Site config (optional, stock defaults apply)
  ├── posts.json       # { \"posts\": [ { id, title, date, excerpt, content, readTime } ] }
  ├── projects.json    # { \"projects\": [ { id, title, description, content,
  │                    #   category, technologies, thumbnail?, links? } ] }
  └── assets/          # Static assets → copied to the output root

Content fields marked as HTML subsets pass through an allow-list
sanitizer (p, h1-h6, br, b, i, strong, em, a, pre, code, ul, ol, li);
everything else is reduced to plain text.

Run 'plain-folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: load content, render, write output
    Build,
    /// Validate config and content without writing anything
    Check,
    /// Serve the output directory over HTTP
    Serve,
    /// Print GitHub repo stats for every project source link
    Stats,
    /// Run structural accessibility checks over the generated HTML
    Audit,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!("==> Building {}", cli.source.display());
            render::build(&cli.source, &cli.output)?;
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let set = content::load_set(
                &cli.source.join(&config.content.posts),
                &cli.source.join(&config.content.projects),
            )?;
            output::print_check_output(&config, &set);
            println!("==> Content is valid");
        }
        Command::Serve => {
            let config = config::load_config(&cli.source)?;
            let port = server::effective_port(config.server.port);
            server::serve(cli.output, port)?;
        }
        Command::Stats => {
            let config = config::load_config(&cli.source)?;
            let set = content::load_set(
                &cli.source.join(&config.content.posts),
                &cli.source.join(&config.content.projects),
            )?;
            let mut client =
                github::StatsClient::new(config.github.api_base, github::HttpTransport::new()?);
            for (i, project) in set.projects.iter().enumerate() {
                let repo = project
                    .links
                    .source
                    .as_deref()
                    .and_then(github::extract_repo_path);
                let stats = repo.as_deref().and_then(|r| client.fetch(r));
                for line in output::format_stats_entry(
                    i + 1,
                    &project.title,
                    repo.as_deref(),
                    stats.as_ref(),
                ) {
                    println!("{}", line);
                }
            }
        }
        Command::Audit => {
            println!("==> Auditing {}", cli.output.display());
            let findings = audit::audit_dir(&cli.output)?;
            output::print_audit_output(&findings);
            if !findings.is_empty() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
