mod client;
mod reports;
mod sweep;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use roadshock_core::constants::{INTENSITY_DEFAULT_PERCENT, SAMPLE_PAIRS_DEFAULT};
use roadshock_core::{
    CityRef, Scenario, SessionController, SessionDriver, SessionSettings, preset_cities,
};

use client::HttpSimulationService;
use sweep::{SweepPlan, run_sweep};

#[derive(Debug, Parser)]
#[command(name = "roadshock", version)]
#[command(about = "Stress-test city road networks against disruption scenarios")]
struct Args {
    /// City to test (repeat for a multi-city sweep), e.g. "Pittsburgh, PA"
    #[arg(long = "city")]
    cities: Vec<String>,

    /// Scenarios to run (comma-separated names, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// Disruption intensity in percent (5-80)
    #[arg(long, default_value_t = INTENSITY_DEFAULT_PERCENT)]
    #[arg(value_parser = clap::value_parser!(i32).range(5..=80))]
    intensity: i32,

    /// Origin-destination pairs sampled per run (10-200)
    #[arg(long, default_value_t = SAMPLE_PAIRS_DEFAULT)]
    #[arg(value_parser = clap::value_parser!(u32).range(10..=200))]
    pairs: u32,

    /// Use USGS flood data where the scenario supports it
    #[arg(long)]
    flood_data: bool,

    /// Base URL of the simulation service
    #[arg(long)]
    api_base: Option<String>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// List scenarios offered by the service and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = load_settings(&args)?;
    let service = HttpSimulationService::new(settings.clone())
        .context("failed to build HTTP client")?;
    let driver = SessionDriver::new(service, SessionController::new(settings));

    if args.list_scenarios {
        return list_scenarios(&args, &driver).await;
    }

    let plan = build_plan(&args)?;
    if args.report == "console" {
        announce_banner(&driver.controller().settings().api_base);
    }
    let start_time = Instant::now();
    let report = run_sweep(&driver, &plan).await;
    write_report(&args, &report, start_time)?;

    if report.failures() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_settings(args: &Args) -> Result<SessionSettings> {
    let settings = match &args.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SessionSettings::from_json(&text)
                .with_context(|| format!("invalid settings in {}", path.display()))?
        }
        None => SessionSettings::default(),
    };
    Ok(match &args.api_base {
        Some(base) => settings.with_api_base(base.as_str()),
        None => settings,
    })
}

/// Service listing when reachable, otherwise the built-in scenarios.
async fn list_scenarios(
    args: &Args,
    driver: &SessionDriver<HttpSimulationService>,
) -> Result<()> {
    let scenarios = match driver.load_scenarios().await {
        Ok(scenarios) => scenarios,
        Err(err) => {
            log::warn!("using built-in scenario list: {err}");
            Scenario::ALL.to_vec()
        }
    };
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for scenario in scenarios {
        writeln!(
            output_target.writer(),
            "  {:25} - {}",
            scenario.wire_name(),
            scenario.info().short
        )?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn build_plan(args: &Args) -> Result<SweepPlan> {
    let cities = args
        .cities
        .iter()
        .map(|text| resolve_city(text))
        .collect::<Result<Vec<_>>>()?;
    if cities.is_empty() {
        bail!("Select a city first (use --city).");
    }
    Ok(SweepPlan {
        cities,
        scenarios: parse_scenarios(&args.scenarios)?,
        intensity_percent: args.intensity,
        sample_pairs: args.pairs,
        flood_data: args.flood_data,
    })
}

/// Preset label ("Dallas, TX") or free text passed through to the service.
fn resolve_city(text: &str) -> Result<CityRef> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        bail!("Select a city first (blank --city).");
    }
    Ok(preset_cities()
        .into_iter()
        .find(|city| city.label().eq_ignore_ascii_case(trimmed))
        .unwrap_or_else(|| CityRef::free_text(trimmed)))
}

fn parse_scenarios(list: &str) -> Result<Vec<Scenario>> {
    let mut scenarios = Vec::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.eq_ignore_ascii_case("all") {
            return Ok(Scenario::ALL.to_vec());
        }
        let scenario = parse_scenario(token)?;
        if !scenarios.contains(&scenario) {
            scenarios.push(scenario);
        }
    }
    if scenarios.is_empty() {
        bail!("Choose a disruption type (--scenarios).");
    }
    Ok(scenarios)
}

/// Accepts service names ("Bridge Collapse"), kebab-case ("bridge-collapse")
/// and unambiguous prefixes ("tun").
fn parse_scenario(token: &str) -> Result<Scenario> {
    let spaced = token.replace(['-', '_'], " ").to_ascii_lowercase();
    if let Ok(scenario) = spaced.parse::<Scenario>() {
        return Ok(scenario);
    }
    let matches: Vec<Scenario> = Scenario::ALL
        .into_iter()
        .filter(|scenario| scenario.wire_name().to_ascii_lowercase().starts_with(&spaced))
        .collect();
    match matches.as_slice() {
        [scenario] => Ok(*scenario),
        [] => bail!("unknown scenario: {token}"),
        _ => {
            let names: Vec<&str> = matches.iter().map(|s| s.wire_name()).collect();
            bail!("ambiguous scenario {token:?}: matches {}", names.join(", "))
        }
    }
}

fn announce_banner(api_base: &str) {
    println!("{}", "🛣️  Roadshock".bright_cyan().bold());
    println!("{}", "=============".cyan());
    println!("Service: {api_base}");
}

fn write_report(args: &Args, report: &sweep::SweepReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, report)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, report)?,
        _ => reports::generate_console_report(&mut output_target, report, start_time.elapsed())?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            cities: vec!["Dallas, TX".to_string()],
            scenarios: "all".to_string(),
            intensity: INTENSITY_DEFAULT_PERCENT,
            pairs: SAMPLE_PAIRS_DEFAULT,
            flood_data: false,
            api_base: None,
            settings: None,
            list_scenarios: false,
            report: "json".to_string(),
            output: None,
            verbose: false,
        }
    }

    #[test]
    fn parses_service_and_kebab_scenario_names() {
        assert_eq!(
            parse_scenarios("Bridge Collapse, highway-flood").unwrap(),
            vec![Scenario::BridgeCollapse, Scenario::HighwayFlood]
        );
        assert_eq!(parse_scenario("targeted-attack").unwrap(), Scenario::TargetedAttack);
        assert_eq!(parse_scenarios("all").unwrap(), Scenario::ALL.to_vec());
        assert!(parse_scenario("meteor").is_err());
        assert!(parse_scenarios(" , ").is_err());
    }

    #[test]
    fn scenario_prefix_must_be_unambiguous() {
        let err = parse_scenario("t").unwrap_err().to_string();
        assert!(err.contains("ambiguous"), "{err}");
        assert!(err.contains("Tunnel Closure") && err.contains("Targeted Attack"), "{err}");
        assert_eq!(parse_scenario("tu").unwrap(), Scenario::TunnelClosure);
        assert_eq!(parse_scenario("ta").unwrap(), Scenario::TargetedAttack);
        assert_eq!(parse_scenario("bridge").unwrap(), Scenario::BridgeCollapse);
        assert!(parse_scenarios("t,bridge").is_err());
    }

    #[test]
    fn resolves_presets_and_free_text_cities() {
        let dallas = resolve_city("dallas, tx").unwrap();
        assert_eq!(dallas.query(), "Dallas, Texas, USA");
        let leeds = resolve_city("  Leeds, UK ").unwrap();
        assert_eq!(leeds.query(), "Leeds, UK");
        assert!(resolve_city("   ").is_err());
    }

    #[test]
    fn plan_requires_a_city() {
        let mut args = base_args();
        args.cities.clear();
        assert!(build_plan(&args).is_err());
        let plan = build_plan(&base_args()).unwrap();
        assert_eq!(plan.scenarios.len(), Scenario::ALL.len());
    }

    #[test]
    fn api_base_flag_overrides_settings() {
        let mut args = base_args();
        args.api_base = Some("http://sim.local:9000/".to_string());
        let settings = load_settings(&args).unwrap();
        assert_eq!(
            settings.endpoint("/scenarios"),
            "http://sim.local:9000/scenarios"
        );
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        writeln!(target, "ok").unwrap();
        target.flush_inner().unwrap();
    }
}
