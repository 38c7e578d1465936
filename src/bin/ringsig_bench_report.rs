use clap::{Parser, Subcommand};
use colored::Colorize;
use ringsig_bench_report::parse::LineParser;
use ringsig_bench_report::report;
use ringsig_bench_report::runner::{self, HarnessConfig};
use ringsig_bench_report::table::BenchTable;
use ringsig_bench_report::{Error, ReportMode};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse captured benchmark output piped on stdin and print the report.
    Stdin,

    /// Run the Go benchmark harness for both backends, then print the report.
    ///
    /// The candidate backend's invocation sets CGO_ENABLED=1 so the
    /// libsecp256k1-accelerated path is compiled in.
    Run {
        /// Directory containing the Go package with the benchmarks.
        #[arg(long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Minimum run duration per benchmark, passed through as -benchtime.
        #[arg(long, default_value = "1s")]
        benchtime: String,

        /// Per-backend timeout in seconds for the harness invocation.
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },
}

#[derive(Parser, Debug)]
#[command(name = "ringsig-bench-report")]
#[command(about = "Ring-signature benchmark comparison reporter (baseline vs. accelerated backend)")]
struct Args {
    /// Report layout.
    #[arg(long, value_enum, default_value_t = ReportMode::Compare, global = true)]
    mode: ReportMode,

    /// Baseline backend for the comparison layout.
    #[arg(long, default_value = "Decred", global = true)]
    baseline: String,

    /// Candidate (accelerated) backend for the comparison layout.
    #[arg(long, default_value = "Ethereum", global = true)]
    candidate: String,

    #[command(subcommand)]
    cmd: Command,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::NoData) => {
            eprintln!("{}", "❌ No benchmark data found. Check that:".red().bold());
            eprintln!("   • the benchmarks are running correctly");
            eprintln!("   • benchmark names match the Benchmark<Op><N>_<Backend> pattern");
            eprintln!("   • CGO dependencies are available if the native backend is enabled");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let mut table = BenchTable::new();

    match &args.cmd {
        Command::Stdin => {
            let mut parser = LineParser::new();
            for line in io::stdin().lock().lines() {
                let line = line?;
                if let Some(record) = parser.feed(&line) {
                    table.insert(record);
                }
            }
        }
        Command::Run {
            dir,
            benchtime,
            timeout,
        } => {
            // Baseline runs pure-Go; the candidate gets the native build.
            let backends = [(args.baseline.as_str(), false), (args.candidate.as_str(), true)];
            for (backend, native) in backends {
                let cfg = HarnessConfig {
                    dir: dir.clone(),
                    benchtime: benchtime.clone(),
                    timeout: Duration::from_secs(*timeout),
                    native,
                };
                match runner::run_backend(&cfg, backend) {
                    Ok(output) => {
                        if !output.success {
                            eprintln!(
                                "{} harness exited non-zero for backend {backend}; parsing its output anyway",
                                "warning:".yellow().bold()
                            );
                        }
                        // Seed the tracked backend in case the harness emits
                        // unlabeled benchmark names.
                        let mut parser = LineParser::with_backend(backend);
                        for line in output.stdout.lines() {
                            if let Some(record) = parser.feed(line) {
                                table.insert(record);
                            }
                        }
                    }
                    Err(err @ Error::HarnessTimeout { .. }) => {
                        eprintln!(
                            "{} {err}; continuing without that backend",
                            "warning:".yellow().bold()
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
        }
    }

    if table.is_empty() {
        return Err(Error::NoData);
    }

    print!(
        "{}",
        report::render(&table, args.mode, &args.baseline, &args.candidate)
    );
    Ok(())
}
