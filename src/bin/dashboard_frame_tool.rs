use chrono::{DateTime, Utc};
use progress_charts::api::{DashboardConfig, DashboardFrame, DashboardSnapshot};
use progress_charts::model::parse_payload_json;
use progress_charts::telemetry;
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "usage: dashboard-frame-tool --input <payload.json> --output <frame.json> [--config <config.json>] [--now <rfc3339>] [--snapshot]";

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    now: Option<DateTime<Utc>>,
    snapshot_only: bool,
}

fn main() {
    let _ = telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => DashboardConfig::from_json_str(&read_file(path)?)
            .map_err(|err| format!("invalid config `{}`: {err}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let input = parse_payload_json(&read_file(&args.input)?)
        .map_err(|err| format!("invalid payload `{}`: {err}", args.input.display()))?;
    let now = args.now.unwrap_or_else(Utc::now);
    let snapshot = DashboardSnapshot::build(&input, &config, now);

    let encoded = if args.snapshot_only {
        snapshot.to_json_contract_v1_pretty()
    } else {
        DashboardFrame::build(&snapshot, &config)
            .and_then(|frame| frame.to_json_contract_v1_pretty())
    };
    let payload = encoded.map_err(|err| err.to_string())?;

    fs::write(&args.output, payload)
        .map_err(|err| format!("failed to write `{}`: {err}", args.output.display()))
}

fn read_file(path: &PathBuf) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("failed to read `{}`: {err}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);

    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut config = None::<PathBuf>;
    let mut now = None::<DateTime<Utc>>;
    let mut snapshot_only = false;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config = Some(PathBuf::from(value));
            }
            "--now" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --now".to_owned())?;
                let parsed = DateTime::parse_from_rfc3339(&value)
                    .map_err(|err| format!("invalid --now `{value}`: {err}"))?;
                now = Some(parsed.with_timezone(&Utc));
            }
            "--snapshot" => snapshot_only = true,
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    let input = input.ok_or_else(|| format!("missing --input\n{USAGE}"))?;
    let output = output.ok_or_else(|| format!("missing --output\n{USAGE}"))?;
    Ok(CliArgs {
        input,
        output,
        config,
        now,
        snapshot_only,
    })
}
