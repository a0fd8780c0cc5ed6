use clap::{Parser, Subcommand};
use justcarlson::site::Site;
use justcarlson::{config, output, render, server};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "justcarlson")]
#[command(about = "Blog and portfolio server for justcarlson.com")]
#[command(long_about = "\
Blog and portfolio server for justcarlson.com

Serves the home page and its markdown rendition from a single site
configuration:

  GET /            home page (HTML)
  GET /index.md    markdown version of the home page

Configuration is read from site.toml when present; every key is optional
and defaults to the production values. Run 'justcarlson gen-config' for a
documented starting point.")]
#[command(version = render::REVISION)]
struct Cli {
    /// Site configuration file
    #[arg(long, default_value = "site.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site over HTTP
    Serve {
        /// Listen address, overriding server.addr
        #[arg(long)]
        addr: Option<String>,
    },
    /// Write the rendered pages to a directory
    Render {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Validate the configuration and print a summary
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { addr } => {
            let mut site_config = config::load_config(&cli.config)?;
            if let Some(addr) = addr {
                site_config.server.addr = addr;
            }
            let site = Arc::new(Site::from_config(site_config)?);
            server::serve(site)?;
        }
        Command::Render { output: out_dir } => {
            let site = Site::load(&cli.config)?;
            println!("==> Rendering {}", site.title());
            let written = render::write_pages(&site, &out_dir)?;
            output::print_render_output(&written, &out_dir);
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let site = Site::load(&cli.config)?;
            output::print_site_summary(&site);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
