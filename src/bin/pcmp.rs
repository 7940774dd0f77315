//! `pcmp` — verify PCMP proof files and report the result.
//!
//! `pcmp [--info|--json] [-v...] file1 [file2 ...]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcmp::VerifyInfo;

#[derive(Parser, Debug)]
#[command(
    name = "pcmp",
    about = "Bit-exact verifier for the PCMP permuted compressed monotone proof container format"
)]
struct Opt {
    /// Print a key/value dump of every diagnostic field, instead of a one-line summary.
    #[arg(long)]
    info: bool,

    /// Print one pretty-printed JSON object per file, instead of a one-line summary.
    #[arg(long)]
    json: bool,

    /// Raise logging verbosity; repeatable.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// PCMP files to verify.
    files: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug)]
enum OutputMode {
    Summary,
    Info,
    Json,
}

impl Opt {
    fn mode(&self) -> OutputMode {
        // `--json` takes precedence when both flags are given, matching
        // the reference verifier's own flag-handling order.
        if self.json {
            OutputMode::Json
        } else if self.info {
            OutputMode::Info
        } else {
            OutputMode::Summary
        }
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_summary(info: &VerifyInfo) {
    let status = if info.valid { "OK" } else { "FAIL" };
    println!(
        "[{}] {} n={} order={}",
        status,
        info.file,
        info.n.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string()),
        info.order.map(|o| o.to_string()).unwrap_or_else(|| "?".to_string()),
    );
}

fn print_info(info: &VerifyInfo) {
    println!("\n=== {} ===", info.file);
    // Printed in `VerifyInfo`'s own field order rather than through a
    // `serde_json::Value::Object` (a `BTreeMap` without the
    // `preserve_order` feature, which would alphabetize the dump).
    for (key, val) in info.fields() {
        println!("{:28}: {}", key, val);
    }
}

fn print_json(info: &VerifyInfo) {
    println!("{}", serde_json::to_string_pretty(info).expect("VerifyInfo always serializes"));
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    init_logging(opt.verbose);

    if opt.files.is_empty() {
        eprintln!("usage: pcmp [--info|--json] file1 [file2 ...]");
        return ExitCode::from(1);
    }

    let mode = opt.mode();

    for path in &opt.files {
        tracing::info!(file = %path.display(), "verifying");
        let info = pcmp::verify_path(path);
        match mode {
            OutputMode::Summary => print_summary(&info),
            OutputMode::Info => print_info(&info),
            OutputMode::Json => print_json(&info),
        }
    }

    ExitCode::from(0)
}
