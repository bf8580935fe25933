use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info};

use eco_ledger::{
    audit_rows, from_json, to_csv, to_json, AuditRow, DigestFormat, ValidationReport,
};
use eco_rewards::{
    RewardEngine, RewardError, SensorReading, SensorSource, Session, SessionConfig, UserProfile,
};

use crate::cli::*;
use crate::points::COLLECTION_POINTS;
use crate::simulator::SimulatedSensor;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Demo(args) => cmd_demo(&config, cli.format, cli.seed, args),
        Command::Shell => cmd_shell(&config, cli.format, cli.seed),
        Command::Catalog => cmd_catalog(&config, cli.format),
        Command::Points => cmd_points(cli.format),
        Command::Audit(args) => cmd_audit(args, cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading session config");
            SessionConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))
        }
        None => Ok(SessionConfig::default()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct StatusView<'a> {
    profile: &'a UserProfile,
    tier_title: &'static str,
    next_threshold: Option<u64>,
    progress: f64,
    ledger_entries: usize,
    ledger_valid: bool,
}

/// One running session plus the pieces the screens need.
struct Front {
    engine: RewardEngine,
    session: Session,
    sensor: SimulatedSensor,
    format: OutputFormat,
}

impl Front {
    fn open(config: &SessionConfig, format: OutputFormat, seed: Option<u64>) -> anyhow::Result<Self> {
        let engine = RewardEngine::from_config(config)?;
        let session = engine.open_session(&config.profile)?;
        Ok(Self {
            engine,
            session,
            sensor: SimulatedSensor::new(seed),
            format,
        })
    }

    fn status(&self) -> anyhow::Result<()> {
        let profile = self.session.profile();
        let tier = self.engine.tier_for(profile.bottle_count());
        let ledger = self.session.ledger();

        if self.format == OutputFormat::Json {
            return print_json(&StatusView {
                profile,
                tier_title: profile.tier().title(),
                next_threshold: tier.next_threshold,
                progress: tier.progress(profile.bottle_count()),
                ledger_entries: ledger.len(),
                ledger_valid: ledger.is_valid(),
            });
        }

        println!("Hello, {}", profile.name().bold());
        println!("  Balance: {} ECOG", profile.token_balance().to_string().green().bold());
        println!("  Tier: {} ({})", profile.tier().title().cyan(), profile.tier());
        match tier.next_threshold {
            Some(next) => println!(
                "  Progress: {}/{} bottles ({:.0}%), {} to go",
                profile.bottle_count(),
                next,
                tier.progress(profile.bottle_count()) * 100.0,
                tier.remaining(profile.bottle_count()).unwrap_or(0)
            ),
            None => println!("  Progress: {} bottles, top tier reached", profile.bottle_count()),
        }
        println!("  CO2 avoided: {:.2} kg", profile.co2_saved_grams() as f64 / 1_000.0);
        println!("  Ledger: {} entries, integrity {}", ledger.len(), integrity_mark(ledger.is_valid()));
        Ok(())
    }

    fn scan(&mut self, reading: Option<SensorReading>) -> anyhow::Result<()> {
        let reading = match reading {
            Some(r) => r,
            None => self.sensor.read()?,
        };
        match self.engine.record_deposit(&mut self.session, &reading) {
            Ok(outcome) => {
                if self.format == OutputFormat::Json {
                    return print_json(&outcome.entry);
                }
                println!(
                    "{} Deposit accepted: {} bottles ({:.2} kg)",
                    "✓".green().bold(),
                    reading.quantity,
                    reading.weight_kg
                );
                println!("  Earned: {} ECOG", outcome.tokens_awarded.to_string().green());
                println!("  Entry: #{} {}", outcome.entry.index, outcome.entry.digest.short_hex().yellow());
                if let Some(tier) = outcome.promoted_to {
                    println!("  {} New tier: {}", "★".yellow(), tier.title().cyan().bold());
                }
                Ok(())
            }
            Err(e) if e.is_user_error() => report_rejection(&e),
            Err(e) => Err(e.into()),
        }
    }

    fn redeem(&mut self, item_id: &str) -> anyhow::Result<()> {
        match self.engine.redeem_by_id(&mut self.session, item_id) {
            Ok(entry) => {
                if self.format == OutputFormat::Json {
                    return print_json(&entry);
                }
                println!("{} Redeemed {}", "✓".green().bold(), item_id.bold());
                println!(
                    "  Balance: {} ECOG",
                    self.session.profile().token_balance().to_string().green()
                );
                println!("  Entry: #{} {}", entry.index, entry.digest.short_hex().yellow());
                Ok(())
            }
            Err(e) if e.is_user_error() => report_rejection(&e),
            Err(e) => Err(e.into()),
        }
    }

    fn ledger(&self, full: bool) -> anyhow::Result<()> {
        let format = if full { DigestFormat::Full } else { DigestFormat::Short };
        print_rows(&audit_rows(self.session.ledger(), format), self.format)
    }

    fn verify(&self) -> anyhow::Result<()> {
        print_report(self.session.ledger().validate(), self.format)
    }

    fn export(&self, kind: &str, path: Option<PathBuf>) -> anyhow::Result<()> {
        let ledger = self.session.ledger();
        let text = match kind {
            "csv" => to_csv(&audit_rows(ledger, DigestFormat::Full)),
            "json" => to_json(ledger)?,
            other => anyhow::bail!("unknown export format {other:?}; use csv or json"),
        };
        match path {
            Some(path) => {
                std::fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), kind, entries = ledger.len(), "ledger exported");
                println!("{} Exported {} entries to {}", "✓".green(), ledger.len(), path.display());
            }
            None => print!("{text}"),
        }
        Ok(())
    }
}

fn integrity_mark(valid: bool) -> colored::ColoredString {
    if valid {
        "✓ secure".green()
    } else {
        "✗ compromised".red().bold()
    }
}

fn report_rejection(err: &RewardError) -> anyhow::Result<()> {
    eprintln!("{} {}", "✗".red().bold(), err.to_string().red());
    Ok(())
}

fn print_rows(rows: &[AuditRow], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(rows);
    }
    println!(
        "{:>5}  {:<19}  {:<8}  {:>10}  {}",
        "Index".bold(),
        "Time".bold(),
        "Action".bold(),
        "Amount".bold(),
        "Digest".bold()
    );
    for row in rows {
        let amount = if row.amount.is_negative() {
            format!("{:>10}", row.amount.to_string()).red()
        } else {
            format!("{:>10}", row.amount.to_string()).green()
        };
        println!(
            "{:>5}  {:<19}  {:<8}  {}  {}",
            row.index,
            row.timestamp.to_string(),
            row.action,
            amount,
            row.digest.yellow()
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportView {
    entries: u64,
    valid: bool,
    violations: Vec<String>,
}

fn print_report(report: ValidationReport, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&ReportView {
            entries: report.entry_count,
            valid: report.is_valid(),
            violations: report.violations.iter().map(|v| v.description.clone()).collect(),
        });
    }
    if report.is_valid() {
        println!("{} Ledger integrity verified", "✓".green().bold());
        println!("  Entries: {}", report.entry_count.to_string().bold());
        println!("  Digests: {}", "recomputed, all match".green());
        println!("  Links: {}", "unbroken".green());
    } else {
        println!("{} Ledger integrity check failed", "✗".red().bold());
        for v in &report.violations {
            println!("  {:?}: {}", v.kind, v.description.red());
        }
    }
    Ok(())
}

fn cmd_demo(
    config: &SessionConfig,
    format: OutputFormat,
    seed: Option<u64>,
    args: DemoArgs,
) -> anyhow::Result<()> {
    let mut front = Front::open(config, format, seed)?;
    front.status()?;
    for _ in 0..args.scans {
        front.scan(None)?;
    }
    for item in &args.redeem {
        front.redeem(item)?;
    }
    front.ledger(false)?;
    front.verify()?;
    if let Some(path) = args.export {
        front.export("json", Some(path))?;
    }
    Ok(())
}

const SHELL_HELP: &str = "\
commands:
  status                  show balance, tier and ledger health
  scan [bottles [kg]]     deposit; without arguments the simulated sensor reads
  redeem <item-id>        spend tokens on a catalog item
  catalog                 list rewards
  points                  list collection points
  ledger [--full]         show the ledger
  verify                  check ledger integrity
  export <csv|json> [path]
  help | quit";

fn cmd_shell(config: &SessionConfig, format: OutputFormat, seed: Option<u64>) -> anyhow::Result<()> {
    let mut front = Front::open(config, format, seed)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", "eco>".green().bold());
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, rest)) = words.split_first() else {
            continue;
        };
        let result = match cmd {
            "status" => front.status(),
            "scan" => parse_reading(rest).and_then(|r| front.scan(r)),
            "redeem" => match rest.first() {
                Some(id) => front.redeem(id),
                None => Err(anyhow::anyhow!("usage: redeem <item-id>")),
            },
            "catalog" => cmd_catalog(config, format),
            "points" => cmd_points(format),
            "ledger" => front.ledger(rest.contains(&"--full")),
            "verify" => front.verify(),
            "export" => match rest.first() {
                Some(kind) => front.export(kind, rest.get(1).map(|p| PathBuf::from(*p))),
                None => Err(anyhow::anyhow!("usage: export <csv|json> [path]")),
            },
            "help" => {
                println!("{SHELL_HELP}");
                Ok(())
            }
            "quit" | "exit" => break,
            other => Err(anyhow::anyhow!("unknown command {other:?}; try help")),
        };
        if let Err(e) = result {
            eprintln!("{} {e:#}", "error:".red().bold());
        }
    }
    Ok(())
}

fn parse_reading(args: &[&str]) -> anyhow::Result<Option<SensorReading>> {
    match args {
        [] => Ok(None),
        [qty] => Ok(Some(SensorReading::bottles(qty.parse().context("bottle count")?))),
        [qty, kg, ..] => Ok(Some(SensorReading::new(
            qty.parse().context("bottle count")?,
            kg.parse().context("weight in kg")?,
        ))),
    }
}

fn cmd_catalog(config: &SessionConfig, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&config.catalog);
    }
    println!("{}", "Rewards".bold());
    for item in &config.catalog {
        println!(
            "  {:<14} {:<26} {} ECOG",
            item.id.cyan(),
            item.name,
            item.cost.to_string().green()
        );
    }
    Ok(())
}

fn cmd_points(format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&COLLECTION_POINTS);
    }
    println!("{}", "Collection points in Guayaquil".bold());
    for p in &COLLECTION_POINTS {
        println!("  {:<16} {:>9.4}, {:>9.4}", p.name, p.lat, p.lon);
    }
    Ok(())
}

fn cmd_audit(args: AuditArgs, format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let ledger = from_json(&text)?;
    let digests = if args.full { DigestFormat::Full } else { DigestFormat::Short };
    print_rows(&audit_rows(&ledger, digests), format)?;
    let report = ledger.validate();
    let valid = report.is_valid();
    print_report(report, format)?;
    if !valid {
        anyhow::bail!("ledger in {} is compromised", args.file.display());
    }
    Ok(())
}
