use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use version_resolution::config::{LogFormat, LoggingConfig, ResolutionConfig};
use version_resolution::problems::TracingProblemReporter;
use version_resolution::services::ResolutionServices;
use version_resolution::version::candidates::select_best_candidate;
use version_resolution::version::metadata::{ComponentMetadataSupplier, UniformMetadataSupplier};
use version_resolution::version::{Version, VersionSelectorScheme};

#[derive(Parser)]
#[command(name = "version-resolution")]
#[command(version, about = "Compare versions and match them against version selectors")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct StatusArgs {
    /// Status given to every candidate, for `latest.<status>` selectors
    #[arg(long, default_value = "integration")]
    status: String,

    /// Comma separated status scheme, least to most mature
    #[arg(long, value_delimiter = ',')]
    status_scheme: Vec<String>,
}

impl StatusArgs {
    fn supplier(&self) -> UniformMetadataSupplier {
        let supplier = UniformMetadataSupplier::new(&self.status);
        if self.status_scheme.is_empty() {
            supplier
        } else {
            supplier.with_status_scheme(self.status_scheme.clone())
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compare two versions
    Compare { left: String, right: String },

    /// Sort versions in ascending order
    Sort {
        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// Print the candidates accepted by a selector
    Match {
        selector: String,
        candidates: Vec<String>,

        /// Accept the Maven RELEASE and LATEST keywords
        #[arg(long)]
        maven: bool,

        #[command(flatten)]
        status: StatusArgs,
    },

    /// Print the latest candidate accepted by a selector
    Latest {
        selector: String,
        candidates: Vec<String>,

        #[arg(long)]
        maven: bool,

        /// Selector for versions that must not be chosen; may be repeated
        #[arg(long)]
        reject: Vec<String>,

        #[command(flatten)]
        status: StatusArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ResolutionConfig::load_or_default(cli.config.as_deref())?;
    let _guard = init_logging(&config.logging)?;
    debug!(?config, "Loaded configuration");

    let services = ResolutionServices::from_config(&config, Arc::new(TracingProblemReporter));
    let scheme = |maven: bool| -> Box<dyn VersionSelectorScheme> {
        if maven {
            services.maven_version_selector_scheme()
        } else {
            services.version_selector_scheme()
        }
    };

    match cli.command {
        Command::Compare { left, right } => {
            let symbol = match services.comparator().compare_str(&left, &right) {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            println!("{symbol}");
        }
        Command::Sort { versions } => {
            let mut versions: Vec<Version> = versions.iter().map(|v| Version::parse(v)).collect();
            services.comparator().sort(&mut versions);
            for version in versions {
                println!("{version}");
            }
        }
        Command::Match {
            selector,
            candidates,
            maven,
            status,
        } => {
            let selector = scheme(maven)
                .parse_selector(&selector)
                .with_context(|| format!("Invalid selector '{selector}'"))?;
            let supplier = status.supplier();
            for candidate in candidates {
                let accepted = if selector.requires_metadata() {
                    let metadata = supplier
                        .metadata_for(&candidate)
                        .ok_or_else(|| anyhow!("No metadata for {candidate}"))?;
                    selector.accept_metadata(&metadata)
                } else {
                    selector.accept_str(&candidate)?
                };
                if accepted {
                    println!("{candidate}");
                }
            }
        }
        Command::Latest {
            selector,
            candidates,
            maven,
            reject,
            status,
        } => {
            let scheme = scheme(maven);
            let parsed = scheme
                .parse_selector(&selector)
                .with_context(|| format!("Invalid selector '{selector}'"))?;
            let reject = if reject.is_empty() {
                None
            } else {
                let rejects: Vec<&str> = reject.iter().map(String::as_str).collect();
                Some(scheme.parse_union(&rejects).context("Invalid reject selector")?)
            };

            let selection = select_best_candidate(
                services.comparator(),
                &parsed,
                reject.as_ref(),
                &candidates,
                &status.supplier(),
            );
            match selection.selected {
                Some(selected) => println!("{selected}"),
                None if !selection.rejected.is_empty() => bail!(
                    "No candidate matches '{}'; rejected: {}",
                    selector,
                    selection.rejected.join(", ")
                ),
                None => bail!("No candidate matches '{selector}'"),
            }
        }
    }

    Ok(())
}

/// Install the global subscriber. Keep the returned guard alive so buffered
/// file output is flushed on exit.
fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let Some(path) = &config.file else {
        let builder = builder.with_writer(std::io::stderr);
        match config.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Text => builder.try_init(),
        }
        .map_err(|e| anyhow!(e))?;
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path {} has no file name", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    let builder = builder.with_writer(writer).with_ansi(false);
    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow!(e))?;
    Ok(Some(guard))
}
