use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::Path;

mod dataset;
mod log;
mod model;
mod overview;
mod render;
mod stats;

pub type Result<T> = anyhow::Result<T>;

use log::Variant;

#[derive(Parser)]
#[command(name = "nullnet-stats")]
#[command(about = "NullNet experiment latency/reliability statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze unicast experiment logs (one sender, many receivers).
    Unicast(AnalyzeArgs),

    /// Analyze broadcast experiment logs (many senders, one collector).
    Broadcast(AnalyzeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Experiment sizes (node counts) to process, in order.
    #[arg(long, value_delimiter = ',', required = true)]
    sizes: Vec<u32>,

    /// Log path template; `{n}` is replaced with the experiment size.
    #[arg(long)]
    logs: String,

    /// Directory for the generated HTML reports.
    #[arg(short = 'o', long, default_value = ".")]
    out_dir: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (variant, args) = match cli.cmd {
        Commands::Unicast(args) => (Variant::Unicast, args),
        Commands::Broadcast(args) => (Variant::Broadcast, args),
    };

    let overview = overview::run_overview(variant, &args.sizes, &args.logs)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output directory {}", args.out_dir))?;
    let out_dir = Path::new(&args.out_dir);

    for report in &overview.runs {
        let html = render::render_run_chart(variant, report)?;
        let path = out_dir.join(format!("{}_n{}.html", variant.name(), report.size));
        std::fs::write(&path, html).with_context(|| format!("write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    let html = render::render_overview_chart(&overview)?;
    let path = out_dir.join(format!("{}_overview.html", variant.name()));
    std::fs::write(&path, html).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());

    Ok(())
}
