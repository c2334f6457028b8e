use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use synguard::automaton::PacketLabel;
use synguard::cli::{Cli, OutputFormat};
use synguard::csv_output::CsvOutput;
use synguard::json_output;
use synguard::runner::{self, SessionTrace};
use synguard::scenario::ScenarioCatalogue;
use synguard::text_output::TextReport;
use tracing_subscriber::EnvFilter;

/// Exit status when `--strict` is set and a scenario was rejected
const EXIT_REJECTED: u8 = 2;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Built-in catalogue, or the one in --scenarios-file
fn load_catalogue(args: &Cli) -> Result<ScenarioCatalogue> {
    match &args.scenarios_file {
        Some(path) => ScenarioCatalogue::from_file(path),
        None => Ok(ScenarioCatalogue::builtin()),
    }
}

/// Print the catalogue as an indexed listing
fn print_catalogue(catalogue: &ScenarioCatalogue) {
    for (i, scenario) in catalogue.scenarios().iter().enumerate() {
        println!(
            "{:>2}. {:<35} [{}]",
            i + 1,
            scenario.name,
            scenario.packet_summary()
        );
    }
}

/// Resolve the CLI selection into traces
fn collect_traces(args: &Cli, catalogue: &ScenarioCatalogue) -> Result<Vec<SessionTrace>> {
    if let Some(list) = &args.packets {
        let packets = PacketLabel::parse_list(list);
        return Ok(vec![runner::run(&args.name, &packets)]);
    }

    if let Some(selector) = &args.scenario {
        let scenario = catalogue.select(selector)?;
        return Ok(vec![scenario.run()]);
    }

    Ok(catalogue.run_all())
}

/// Write traces in the requested format
fn write_output(args: &Cli, traces: &[SessionTrace]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.format {
        OutputFormat::Text => {
            let report = TextReport::new(!args.no_analysis);
            out.write_all(report.render_all(traces).as_bytes())?;
        }
        OutputFormat::Json => {
            for trace in traces {
                json_output::write_trace(&mut out, trace)
                    .context("Failed to write JSON event stream")?;
            }
        }
        OutputFormat::Csv => {
            let mut csv = CsvOutput::new(!args.no_analysis);
            for trace in traces {
                csv.add_trace(trace);
            }
            out.write_all(csv.to_csv().as_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let catalogue = load_catalogue(&args)?;

    if args.list {
        print_catalogue(&catalogue);
        return Ok(ExitCode::SUCCESS);
    }

    let traces = collect_traces(&args, &catalogue)?;
    write_output(&args, &traces)?;

    let rejected = traces.iter().filter(|t| t.verdict().is_rejected()).count();
    tracing::info!(scenarios = traces.len(), rejected, "validation complete");

    if args.strict && rejected > 0 {
        return Ok(ExitCode::from(EXIT_REJECTED));
    }
    Ok(ExitCode::SUCCESS)
}
