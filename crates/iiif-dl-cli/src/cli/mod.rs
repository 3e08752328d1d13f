//! CLI for the iiif-dl image downloader.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use iiif_dl_core::config::{self, IiifDlConfig};
use iiif_dl_core::ImageRequestOptions;
use std::path::PathBuf;

use commands::{run_batch, run_list, run_manifest};

/// Top-level CLI for iiif-dl.
#[derive(Debug, Parser)]
#[command(name = "iiif-dl")]
#[command(about = "Download the images of a IIIF manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// IIIF Image API parameters. Setting any of them switches to templated
/// image-service URLs; unset ones fall back to config, then built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ImageArgs {
    /// Region, e.g. `full`, `square`, `0,0,500,500`.
    #[arg(long)]
    pub region: Option<String>,
    /// Size, e.g. `max`, `1000,`, `!800,800`.
    #[arg(long)]
    pub size: Option<String>,
    /// Rotation in degrees, `!` prefix mirrors.
    #[arg(long)]
    pub rotation: Option<String>,
    /// `default`, `color`, `gray` or `bitonal`.
    #[arg(long)]
    pub quality: Option<String>,
    /// Output format, e.g. `jpg`, `png`, `webp`.
    #[arg(long)]
    pub format: Option<String>,
}

impl ImageArgs {
    fn to_options(&self) -> ImageRequestOptions {
        ImageRequestOptions {
            region: self.region.clone(),
            size: self.size.clone(),
            rotation: self.rotation.clone(),
            quality: self.quality.clone(),
            format: self.format.clone(),
        }
    }

    /// Options to template with, or `None` to use direct image URLs.
    /// Flags are layered over the config's `[image]` section.
    pub fn resolve(&self, cfg: &IiifDlConfig) -> Option<ImageRequestOptions> {
        let flags = self.to_options();
        match &cfg.image {
            Some(base) => Some(base.overlay(&flags)),
            None if flags.is_empty() => None,
            None => Some(flags),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every image of a manifest as 001.jpg, 002.jpg, ...
    Manifest {
        /// Manifest URL.
        url: String,
        /// Output directory (default from config, `./disc`).
        #[arg(short = 'o', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Concurrent downloads (default from config, 10).
        #[arg(short = 'j', long, value_name = "N")]
        jobs: Option<usize>,
        /// Number images from the last canvas backwards.
        #[arg(long)]
        reverse: bool,
        #[command(flatten)]
        image: ImageArgs,
    },

    /// Print the image URLs of a manifest, one per line.
    List {
        /// Manifest URL.
        url: String,
        #[arg(long)]
        reverse: bool,
        #[command(flatten)]
        image: ImageArgs,
    },

    /// Download a list of image URLs read from a file (`-` for stdin).
    Batch {
        /// File with one URL per line; blank lines and `#` comments are ignored.
        input: String,
        #[arg(short = 'o', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        #[arg(short = 'j', long, value_name = "N")]
        jobs: Option<usize>,
        /// Name files by position instead of by source name.
        #[arg(long)]
        rename: bool,
        /// Reverse the list before numbering.
        #[arg(long)]
        reverse: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Manifest {
                url,
                output_dir,
                jobs,
                reverse,
                image,
            } => {
                let output_dir = output_dir.unwrap_or_else(|| cfg.output_dir.clone());
                let jobs = jobs.unwrap_or_else(|| cfg.effective_concurrency());
                let options = image.resolve(&cfg);
                run_manifest(&cfg, &url, output_dir, jobs, reverse, options).await?;
            }
            CliCommand::List { url, reverse, image } => {
                let options = image.resolve(&cfg);
                run_list(&cfg, &url, reverse, options).await?;
            }
            CliCommand::Batch {
                input,
                output_dir,
                jobs,
                rename,
                reverse,
            } => {
                let batch = iiif_dl_core::BatchConfig {
                    output_dir: output_dir.unwrap_or_else(|| cfg.output_dir.clone()),
                    concurrency: jobs.unwrap_or_else(|| cfg.effective_concurrency()),
                    rename_sequentially: rename,
                    reverse_order: reverse,
                };
                run_batch(&cfg, &input, batch).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
