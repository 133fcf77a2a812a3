// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

// Use library instead of local modules
use bazi_naming::{BirthMoment, NamingConfig, NamingEngine, NamingReport, NamingRequest};

/// Parsed command line: positional arguments plus flags
#[derive(Debug, Default)]
struct CliArgs {
    positional: Vec<String>,
    seed: Option<u64>,
    json: bool,
    config: Option<PathBuf>,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cli = CliArgs::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--json" => cli.json = true,
                "--seed" => {
                    let value = iter.next().context("--seed needs a value")?;
                    cli.seed = Some(value.parse().with_context(|| format!("Bad seed: {}", value))?);
                }
                "--config" => {
                    let value = iter.next().context("--config needs a path")?;
                    cli.config = Some(PathBuf::from(value));
                }
                _ => cli.positional.push(arg.clone()),
            }
        }

        Ok(cli)
    }
}

fn main() -> Result<()> {
    bazi_naming::init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "generate" => run_generate(CliArgs::parse(&args[1..])?),
        "chart" => run_chart(CliArgs::parse(&args[1..])?),
        "ui" => run_ui_mode(CliArgs::parse(&args[1..])?),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        // UI mode (default): `bazi-naming 王 1990-02-04 10`
        _ => run_ui_mode(CliArgs::parse(&args)?),
    }
}

fn print_usage() {
    println!("bazi-naming {}", bazi_naming::VERSION);
    println!();
    println!("Usage:");
    println!("  bazi-naming generate <surname> <YYYY-MM-DD> <hour> [--seed N] [--json] [--config PATH]");
    println!("  bazi-naming chart <YYYY-MM-DD> <hour> [--json]");
    println!("  bazi-naming ui <surname> <YYYY-MM-DD> <hour> [--seed N] [--config PATH]");
    println!("  bazi-naming <surname> <YYYY-MM-DD> <hour>      (same as ui)");
}

/// `YYYY-MM-DD` plus an hour; negative years are allowed (`-200-03-01`)
fn parse_birth(date: &str, hour: &str) -> Result<BirthMoment> {
    let mut parts = date.rsplitn(3, '-');
    let day = parts.next().context("Missing day")?;
    let month = parts.next().context("Missing month")?;
    let year = parts.next().context("Missing year")?;

    let birth = BirthMoment::new(
        year.parse().with_context(|| format!("Bad year: {}", year))?,
        month.parse().with_context(|| format!("Bad month: {}", month))?,
        day.parse().with_context(|| format!("Bad day: {}", day))?,
        hour.parse().with_context(|| format!("Bad hour: {}", hour))?,
    )?;
    Ok(birth)
}

fn naming_inputs(cli: &CliArgs) -> Result<(NamingConfig, NamingRequest)> {
    let [surname, date, hour] = cli.positional.as_slice() else {
        bail!("Expected <surname> <YYYY-MM-DD> <hour>, got {:?}", cli.positional);
    };

    let mut config = NamingConfig::load(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let request = NamingRequest::new(surname, parse_birth(date, hour)?);
    Ok((config, request))
}

fn generate(engine: &NamingEngine, request: &NamingRequest, seed: Option<u64>) -> Result<NamingReport> {
    let report = match seed {
        Some(seed) => engine.generate_seeded(request, seed)?,
        None => engine.generate_random(request)?,
    };
    Ok(report)
}

fn run_generate(cli: CliArgs) -> Result<()> {
    let (config, request) = naming_inputs(&cli)?;
    let engine = config.build_engine()?;
    let report = generate(&engine, &request, config.seed)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("🀄 八字: {}  (生肖: {})", report.chart_text, report.zodiac);
    println!("⚖️  五行: {}", report.analysis.tally);
    println!("   {}", report.analysis.deficiency.describe());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (i, candidate) in report.candidates.iter().enumerate() {
        println!();
        println!("{}. {}  [{}]", i + 1, candidate.full_name, candidate.elements);
        println!("   {}", candidate.meaning);
        println!(
            "   {} {} · {}",
            candidate.hexagram.symbol, candidate.hexagram.name, candidate.hexagram.judgement
        );
    }

    Ok(())
}

fn run_chart(cli: CliArgs) -> Result<()> {
    let [date, hour] = cli.positional.as_slice() else {
        bail!("Expected <YYYY-MM-DD> <hour>, got {:?}", cli.positional);
    };

    let birth = parse_birth(date, hour)?;
    let chart = bazi_naming::calculate_chart(&birth);
    let analysis = bazi_naming::analyze(&chart);

    if cli.json {
        let body = serde_json::json!({
            "chart": chart,
            "chart_text": chart.to_string(),
            "zodiac": chart.zodiac(),
            "analysis": analysis,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("年柱 {}  月柱 {}  日柱 {}  时柱 {}", chart.year, chart.month, chart.day, chart.hour);
    println!("生肖: {}", chart.zodiac());
    println!("五行: {}", analysis.tally);
    println!("{}", analysis.deficiency.describe());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(cli: CliArgs) -> Result<()> {
    let (config, request) = naming_inputs(&cli)?;
    let engine = config.build_engine()?;
    let report = generate(&engine, &request, config.seed)?;

    let mut app = ui::App::new(engine, request, config.seed, report);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_cli: CliArgs) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: bazi-naming generate <surname> <YYYY-MM-DD> <hour>");
    std::process::exit(1);
}
