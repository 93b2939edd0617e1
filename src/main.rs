use clap::{Parser, Subcommand};
use cloud_gal::config::{self, MediaEnv};
use cloud_gal::media::CloudinaryClient;
use cloud_gal::{generate, output, pipeline};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let described = env!("GIT_DESCRIBE");
    if described.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        described
    }
}

#[derive(Parser)]
#[command(name = "cloud-gal")]
#[command(about = "Static photo gallery generator for Cloudinary folders")]
#[command(long_about = "\
Static photo gallery generator for Cloudinary folders

Lists every image in a Cloudinary folder, inlines a tiny blur preview for
each one, and renders a single-page masonry gallery with a modal viewer
(open with /?photoId=<id>) plus one standalone page per photo.

Environment:

  CLOUDINARY_CLOUD_NAME    Account (or NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME)
  CLOUDINARY_API_KEY       Search API key
  CLOUDINARY_API_SECRET    Search API secret
  CLOUDINARY_FOLDER        Folder to publish
  RUST_LOG                 Log level (default: warn)

Site metadata and layout live in <source>/config.toml.
Run 'cloud-gal gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for the intermediate manifest
    #[arg(long, default_value = ".cloud-gal-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the folder and fetch placeholders into a manifest
    List,
    /// Produce the HTML site from a previously written manifest
    Generate,
    /// Run the full pipeline: list → placeholders → generate
    Build,
    /// Validate environment and config.toml without any network call
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let manifest_path = cli.temp_dir.join("manifest.json");

    match cli.command {
        Command::List => {
            let manifest = fetch(&cli.source).await?;
            pipeline::write_manifest(&manifest_path, &manifest)?;
            output::print_list_output(&manifest);
        }
        Command::Generate => {
            let manifest = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&manifest);
        }
        Command::Build => {
            println!("==> Stage 1: Listing images");
            let manifest = fetch(&cli.source).await?;
            pipeline::write_manifest(&manifest_path, &manifest)?;
            output::print_list_output(&manifest);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            generate::generate_site(&manifest, &cli.output)?;
            output::print_generate_output(&manifest);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            let env = MediaEnv::from_env()?;
            output::print_check_output(&env, &site_config);
            println!("==> Configuration is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and environment, then run the fetch pipeline.
///
/// Configuration is fully validated before the client is built.
async fn fetch(source: &Path) -> Result<pipeline::GalleryManifest, Box<dyn std::error::Error>> {
    let site_config =
        config::load_config(source).map_err(pipeline::BuildError::Configuration)?;
    let env = MediaEnv::from_env().map_err(pipeline::BuildError::Configuration)?;
    let client = CloudinaryClient::new(&env)?;
    Ok(pipeline::fetch_gallery(&client, &env, &site_config).await?)
}
