// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};
use structopt::StructOpt;
use study_alloc_model::{
    generator::{InstanceGenConfigBuilder, InstanceGenerator},
    prelude::*,
};
use study_alloc_solver::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

#[derive(StructOpt, Debug)]
#[structopt(name = "study-alloc", about = "Allocates study time slots for scheduled plans.")]
struct Opt {
    /// Emit span enter/exit events in the log output.
    #[structopt(long, global = true)]
    trace_spans: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Allocates the plans of an `allocateTime` request read from a JSON file.
    Allocate {
        #[structopt(name = "INPUT", parse(from_os_str))]
        input: PathBuf,

        /// Where to write the response JSON; stdout when omitted.
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,

        /// TOML file with allocator settings.
        #[structopt(short, long, parse(from_os_str))]
        config: Option<PathBuf>,

        /// best-fit, first-fit or spread.
        #[structopt(short, long)]
        strategy: Option<PlacementStrategy>,

        #[structopt(short, long)]
        parallel: bool,
    },

    /// Writes a random `allocateTime` request.
    Generate {
        #[structopt(long, default_value = "42")]
        seed: u64,

        #[structopt(long, default_value = "7")]
        days: usize,

        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },

    /// Runs every placement strategy over generated instances and reports the outcome.
    Compare {
        #[structopt(long, default_value = "10")]
        instances: usize,

        #[structopt(long, default_value = "42")]
        seed: u64,

        #[structopt(short, long, parse(from_os_str), default_value = "compare_results.json")]
        output: PathBuf,
    },
}

fn enable_tracing(spans: bool) {
    let span_events = if spans {
        FmtSpan::ENTER | FmtSpan::EXIT | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(span_events)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AllocatorConfig> {
    let Some(path) = path else {
        return Ok(AllocatorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, value)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn run_allocate(
    input: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    strategy: Option<PlacementStrategy>,
    parallel: bool,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(strategy) = strategy {
        config = config.with_strategy(strategy);
    }
    if parallel {
        config = config.with_parallel(true);
    }
    info!(%config, "allocator configured");

    let text =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let request: AllocateTimeRequest = serde_json::from_str(&text)
        .with_context(|| format!("parsing request {}", input.display()))?;

    let normalized = normalize(&request, &config);
    for rejected in normalized.rejected() {
        warn!(%rejected, "input rejected");
    }
    let start = Instant::now();
    let result = TimeAllocator::new(config).allocate(&normalized);
    let elapsed = start.elapsed();
    info!(
        stats = %result.stats(),
        elapsed_us = elapsed.as_micros() as u64,
        "allocation finished"
    );
    for plan in result.unallocated() {
        warn!(plan = %plan.id(), reason = %plan.reason(), "plan left unallocated");
    }

    write_json(&result.to_response(), output)
}

fn run_generate(seed: u64, days: usize, output: Option<&Path>) -> Result<()> {
    let config = InstanceGenConfigBuilder::new()
        .days(days)
        .seed(seed)
        .build()
        .context("building generator config")?;
    info!(%config, "generating instance");
    let request = InstanceGenerator::new(config).generate();
    write_json(&request, output)
}

#[derive(Serialize)]
struct InstanceInfo {
    index: usize,
    seed: u64,
    days: usize,
    plans: usize,
}

#[derive(Serialize)]
struct StrategyRun {
    strategy: PlacementStrategy,
    placed: usize,
    pinned: usize,
    unallocated: usize,
    placed_minutes: i32,
    utilization: f64,
    elapsed_us: u128,
}

#[derive(Serialize)]
struct InstanceResult {
    instance: InstanceInfo,
    runs: Vec<StrategyRun>,
}

#[derive(Serialize)]
struct CompareReport {
    description: String,
    instances: Vec<InstanceResult>,
}

fn run_compare(instances: usize, seed: u64, output: &Path) -> Result<()> {
    let mut results = Vec::with_capacity(instances);

    for index in 0..instances {
        // Grow the horizon from one week up to roughly a semester.
        let days = 7 + index * 14;
        let instance_seed = seed.wrapping_add(index as u64);
        let gen_config = InstanceGenConfigBuilder::new()
            .days(days)
            .seed(instance_seed)
            .build()
            .context("building generator config")?;
        let request = InstanceGenerator::new(gen_config).generate();
        let info = InstanceInfo {
            index,
            seed: instance_seed,
            days,
            plans: request.scheduled_plans.len(),
        };
        info!(index, days, plans = info.plans, "instance generated");

        let mut runs = Vec::with_capacity(PlacementStrategy::ALL.len());
        for strategy in PlacementStrategy::ALL {
            let config = AllocatorConfig::default().with_strategy(strategy);
            let input = normalize(&request, &config);

            let start = Instant::now();
            let result = TimeAllocator::new(config).allocate(&input);
            let elapsed = start.elapsed();

            let stats = result.stats();
            info!(%strategy, %stats, elapsed_us = elapsed.as_micros() as u64, "strategy run");
            runs.push(StrategyRun {
                strategy,
                placed: stats.placed(),
                pinned: stats.pinned(),
                unallocated: stats.unallocated(),
                placed_minutes: stats.placed_minutes().value(),
                utilization: stats.utilization(),
                elapsed_us: elapsed.as_micros(),
            });
        }

        results.push(InstanceResult {
            instance: info,
            runs,
        });
    }

    let report = CompareReport {
        description: format!(
            "Placement strategy comparison over {instances} generated instances (base seed {seed})."
        ),
        instances: results,
    };
    write_json(&report, Some(output))?;
    info!(output = %output.display(), "wrote comparison report");
    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    enable_tracing(opt.trace_spans);

    match opt.cmd {
        Command::Allocate {
            input,
            output,
            config,
            strategy,
            parallel,
        } => run_allocate(
            &input,
            output.as_deref(),
            config.as_deref(),
            strategy,
            parallel,
        ),
        Command::Generate { seed, days, output } => run_generate(seed, days, output.as_deref()),
        Command::Compare {
            instances,
            seed,
            output,
        } => run_compare(instances, seed, &output),
    }
}
