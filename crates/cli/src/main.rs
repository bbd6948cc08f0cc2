//! Prefetch engine trace-replay CLI.
//!
//! This binary replays a memory-access trace through the prediction
//! engine against a simple cache model. It performs:
//! 1. **Configuration:** Load a JSON config file, then apply predictor,
//!    controller, and degree overrides from the command line.
//! 2. **Replay:** Feed every trace record to the engine; issued
//!    prefetches complete before the next access.
//! 3. **Report:** Print lifetime hit-rate statistics on completion.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use prefetch_core::config::{Config, ControllerKind, PredictorKind};
use prefetch_core::stats::AccessStats;
use prefetch_core::{Access, MemorySystem, PrefetchEngine};

#[derive(Parser, Debug)]
#[command(
    name = "pfsim",
    author,
    version,
    about = "Prefetch prediction engine trace replay",
    long_about = "Replay a memory-access trace through the prefetch engine.\n\n\
        The trace is a text file with one access per line: the referencing\n\
        instruction address and the accessed address, both hexadecimal.\n\
        Lines starting with '#' are ignored.\n\nExamples:\n  \
        pfsim traces/stream.trace\n  \
        pfsim traces/stream.trace --predictor dcpt --degree 4\n  \
        pfsim traces/stream.trace --config engine.json --controller hill-climb"
)]
struct Cli {
    /// Trace file to replay.
    trace: PathBuf,

    /// JSON configuration file (defaults apply when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prediction strategy, overriding the configuration file.
    #[arg(short, long, value_enum)]
    predictor: Option<PredictorArg>,

    /// Degree controller, overriding the configuration file.
    #[arg(long, value_enum)]
    controller: Option<ControllerArg>,

    /// Initial prefetch degree, overriding the configuration file.
    #[arg(short, long)]
    degree: Option<usize>,

    /// Cache capacity of the replay model, in 64-byte blocks.
    #[arg(long, default_value_t = 8192)]
    cache_blocks: usize,
}

/// Prediction strategies selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PredictorArg {
    /// Global-history delta correlation.
    DeltaCorrelation,
    /// Delta-correlating prediction tables.
    Dcpt,
    /// Generalized pattern table.
    PatternTable,
}

impl From<PredictorArg> for PredictorKind {
    fn from(arg: PredictorArg) -> Self {
        match arg {
            PredictorArg::DeltaCorrelation => Self::DeltaCorrelation,
            PredictorArg::Dcpt => Self::Dcpt,
            PredictorArg::PatternTable => Self::PatternTable,
        }
    }
}

/// Degree controllers selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerArg {
    /// Constant degree.
    Fixed,
    /// Hysteretic hill climbing.
    HillClimb,
    /// Three-probe exploration.
    Probe,
}

impl From<ControllerArg> for ControllerKind {
    fn from(arg: ControllerArg) -> Self {
        match arg {
            ControllerArg::Fixed => Self::Fixed,
            ControllerArg::HillClimb => Self::HillClimb,
            ControllerArg::Probe => Self::Probe,
        }
    }
}

/// A FIFO cache model backing the replay.
///
/// Residency is block-granular; prefetches land in an in-flight set and
/// complete when the replay loop drains them after each access.
#[derive(Debug)]
struct ReplayMemory {
    resident: HashSet<u64>,
    order: VecDeque<u64>,
    in_flight: Vec<u64>,
    capacity: usize,
    max_address: u64,
    max_outstanding: usize,
}

const BLOCK_BYTES: u64 = 64;

impl ReplayMemory {
    fn new(capacity: usize) -> Self {
        Self {
            resident: HashSet::new(),
            order: VecDeque::new(),
            in_flight: Vec::new(),
            capacity: capacity.max(1),
            max_address: 1 << 48,
            max_outstanding: 64,
        }
    }

    fn block_tag(address: u64) -> u64 {
        address & !(BLOCK_BYTES - 1)
    }

    /// Installs a block, evicting the oldest resident block when full.
    fn fill(&mut self, tag: u64) {
        if self.resident.insert(tag) {
            self.order.push_back(tag);
            if self.order.len() > self.capacity {
                if let Some(victim) = self.order.pop_front() {
                    self.resident.remove(&victim);
                }
            }
        }
    }

    /// Looks a demand access up, filling on miss.
    ///
    /// # Returns
    ///
    /// `true` on a miss.
    fn demand(&mut self, address: u64) -> bool {
        let tag = Self::block_tag(address);
        let miss = !self.resident.contains(&tag);
        if miss {
            self.fill(tag);
        }
        miss
    }

    /// Completes all outstanding prefetches, returning their addresses.
    fn drain(&mut self) -> Vec<u64> {
        let completed = std::mem::take(&mut self.in_flight);
        for &address in &completed {
            self.fill(Self::block_tag(address));
        }
        completed
    }
}

impl MemorySystem for ReplayMemory {
    fn is_cached(&self, address: u64) -> bool {
        self.resident.contains(&Self::block_tag(address))
    }

    fn is_in_flight(&self, address: u64) -> bool {
        self.in_flight
            .iter()
            .any(|&a| Self::block_tag(a) == Self::block_tag(address))
    }

    fn outstanding_requests(&self) -> usize {
        self.in_flight.len()
    }

    fn max_outstanding_requests(&self) -> usize {
        self.max_outstanding
    }

    fn max_physical_address(&self) -> u64 {
        self.max_address
    }

    fn issue_prefetch(&mut self, address: u64) {
        self.in_flight.push(address);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(predictor) = cli.predictor {
        config.predictor = predictor.into();
    }
    if let Some(controller) = cli.controller {
        config.controller = controller.into();
    }
    if let Some(degree) = cli.degree {
        config.initial_degree = degree;
    }

    let mut engine = match PrefetchEngine::new(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: invalid configuration: {e}");
            process::exit(1);
        }
    };

    let text = match std::fs::read_to_string(&cli.trace) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading trace {}: {}", cli.trace.display(), e);
            process::exit(1);
        }
    };

    let mut memory = ReplayMemory::new(cli.cache_blocks);
    let mut lifetime = AccessStats::new();
    let mut prefetched: HashSet<u64> = HashSet::new();
    let mut line_no = 0_u64;
    for line in text.lines() {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(access) = parse_record(line, &mut memory) else {
            eprintln!("Error: malformed trace record at line {line_no}: {line}");
            process::exit(1);
        };

        lifetime.reads += 1;
        let was_prefetched = prefetched.remove(&ReplayMemory::block_tag(access.addr));
        if !access.miss {
            lifetime.read_hits += 1;
            if was_prefetched {
                lifetime.issued_hits += 1;
            }
        }
        engine.on_access(&access, &mut memory);
        for address in memory.drain() {
            lifetime.issued += 1;
            prefetched.insert(ReplayMemory::block_tag(address));
            engine.on_prefetch_completed(address);
        }
    }

    println!("Replayed {} accesses at final degree {}.", lifetime.reads - 1, engine.degree());
    lifetime.print();
}

/// Parses one `pc addr` trace record and resolves it against the cache
/// model.
fn parse_record(line: &str, memory: &mut ReplayMemory) -> Option<Access> {
    let mut fields = line.split_whitespace();
    let pc = parse_hex(fields.next()?)?;
    let addr = parse_hex(fields.next()?)?;
    let miss = memory.demand(addr);
    Some(Access::new(pc, addr, miss))
}

fn parse_hex(field: &str) -> Option<u64> {
    let trimmed = field.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(trimmed, 16).ok()
}
