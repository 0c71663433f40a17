use anyhow::Context;
use clap::{Parser, Subcommand};
use sg_graph::graph::OpsSummary;
use sg_graph::{Config, GraphOp, Result, build_ops, source};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sg-graph")]
#[command(about = "Security group reachability graph builder", long_about = None)]
struct Cli {
    /// Log level (RUST_LOG takes precedence).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph op script for a set of security groups.
    Ops {
        /// Security groups JSON ("-" for stdin).
        #[arg(long)]
        groups: String,

        /// YAML config with `exclude` patterns and `groups` CIDR mapping.
        #[arg(short, long)]
        config: Option<String>,

        /// Extra exclude pattern (repeatable).
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Only graph groups in this VPC.
        #[arg(long)]
        vpc: Option<String>,

        /// Output file (defaults to stdout).
        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long)]
        pretty: bool,
    },
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Write the op script as JSON to `out`, or stdout when unset.
fn write_ops(ops: &[GraphOp], out: Option<&str>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(ops)?
    } else {
        serde_json::to_string(ops)?
    };
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("write graph ops to {}", path))?
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.cmd {
        Commands::Ops {
            groups,
            config,
            exclude,
            vpc,
            out,
            pretty,
        } => {
            // 1) Config: file first, then CLI excludes.
            let config = match &config {
                Some(path) => Config::load(path)?,
                None => Config::default(),
            }
            .with_excludes(exclude);
            let filter = config.exclusion_filter()?;
            let resolver = config.peer_resolver();
            if resolver.is_empty() {
                debug!("no cidr mapping configured, cidr blocks are drawn as-is");
            }

            // 2) Load groups.
            let security_groups = source::load_groups(&groups, vpc.as_deref())?;

            // 3) Build.
            let ops = build_ops(&security_groups, &resolver, &filter);
            let summary = OpsSummary::of(&ops);

            // 4) Hand off.
            write_ops(&ops, out.as_deref(), pretty)?;

            info!(
                groups = security_groups.len(),
                excludes = filter.patterns().len(),
                mappings = resolver.len(),
                nodes = summary.nodes,
                edges = summary.edges,
                out = out.as_deref().unwrap_or("<stdout>"),
                "wrote graph ops"
            );
        }
    }

    Ok(())
}
