use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nd_core::Tensor;
use nd_ops::{Block, OpError, OpRegistry, RunConfig, Status};

#[derive(Parser)]
#[command(
    name = "nd",
    about = "Run nd declarable operations",
    long_about = "Inspect the registered operations and run them on tensors described in JSON.\n\nData problems are reported as status codes; tripped validation guards exit non-zero.",
    version
)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. `debug` or `nd_ops=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List registered operations and their arity
    Ops {
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },
    /// Execute one operation from a JSON run file
    Run {
        /// Path to the run description
        #[arg(long)]
        config: PathBuf,
        /// Print output tensors as well as the status
        #[arg(long)]
        show_outputs: bool,
    },
    /// List every status code
    Codes,
    /// Time execute() for a registered operation on square inputs
    Bench {
        /// Operation to time
        #[arg(long, default_value = "add")]
        op: String,
        /// Side lengths to time (comma-separated)
        #[arg(long, default_value = "64,256,1024")]
        sizes: String,
    },
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Ops { json } => cmd_ops(json),
        Commands::Run { config, show_outputs } => cmd_run(&config, show_outputs),
        Commands::Codes => {
            cmd_codes();
            Ok(())
        }
        Commands::Bench { op, sizes } => cmd_bench(&op, &sizes),
    }
}

fn cmd_ops(json: bool) -> anyhow::Result<()> {
    let descriptors = OpRegistry::global().descriptors();
    if json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    println!("{:<12} {:>7} {:>8}", "Op", "Inputs", "Outputs");
    println!("{}", "-".repeat(29));
    for d in &descriptors {
        println!("{:<12} {:>7} {:>8}", d.name(), d.num_inputs(), d.num_outputs());
    }
    Ok(())
}

fn cmd_codes() {
    println!("{:<16} {:>5}", "Status", "Code");
    println!("{}", "-".repeat(22));
    for code in 0..=50 {
        if let Some(status) = Status::from_code(code) {
            println!("{:<16} {:>5}", status.name(), status.code());
        }
    }
}

fn cmd_run(path: &Path, show_outputs: bool) -> anyhow::Result<()> {
    let config = RunConfig::from_file(path)
        .with_context(|| format!("loading run config {}", path.display()))?;
    let mut block = config.to_block()?;
    tracing::info!(op = %config.op, inputs = block.len(), "running");

    let status = match OpRegistry::global().execute(&config.op, &mut block) {
        Ok(status) => status,
        Err(OpError::Guard(fault)) => bail!("{} aborted: {fault}", config.op),
        Err(e) => return Err(e.into()),
    };

    println!("{}: {} ({})", config.op, status, status.code());
    if show_outputs {
        print_outputs(&block);
    }
    if !status.is_ok() {
        std::process::exit(status.code());
    }
    Ok(())
}

fn print_outputs(block: &Block) {
    for i in 0..block.num_outputs() {
        match block.output(i) {
            Some(t) => println!("  out[{i}] = {t}"),
            None => println!("  out[{i}] = <empty>"),
        }
    }
}

fn cmd_bench(op_name: &str, sizes: &str) -> anyhow::Result<()> {
    let registry = OpRegistry::global();
    let Some(op) = registry.get(op_name) else {
        bail!("unknown operation '{op_name}' (try `nd ops`)");
    };
    let arity = op.descriptor().num_inputs().max(1);

    let sizes = parse_sizes(sizes)?;

    println!("=== {} execute() ===", op_name);
    println!("{:<12} {:>10} {:>12}", "Size", "Iters", "Time (us)");
    println!("{}", "-".repeat(36));

    for &sz in &sizes {
        let data: Vec<f32> = (0..sz * sz).map(|i| ((i * 7 + 3) % 13) as f32 * 0.1).collect();
        let mut block = Block::from_tensors(
            0,
            (0..arity).map(|_| Tensor::from_f32(&data, &[sz, sz])),
        );
        let iters = if sz <= 128 { 200 } else if sz <= 512 { 20 } else { 3 };

        registry.execute(op_name, &mut block)?;
        let secs = time_it(iters, || {
            let _ = registry.execute(op_name, &mut block);
        });
        println!("{:<12} {:>10} {:>12.1}", format!("{sz}x{sz}"), iters, secs * 1e6);
    }
    Ok(())
}

/// Parse a comma-separated list of side lengths such as `64,256,1024`.
fn parse_sizes(sizes: &str) -> anyhow::Result<Vec<usize>> {
    let parsed = sizes
        .split(',')
        .map(|s| {
            let s = s.trim();
            s.parse::<usize>()
                .with_context(|| format!("invalid size '{s}' in --sizes"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if parsed.iter().any(|&sz| sz == 0) {
        bail!("--sizes must be positive, got '{sizes}'");
    }
    Ok(parsed)
}

fn time_it(iters: usize, mut f: impl FnMut()) -> f64 {
    let start = Instant::now();
    for _ in 0..iters {
        f();
    }
    start.elapsed().as_secs_f64() / iters as f64
}
