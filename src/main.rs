use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use anyhow::{
    Context,
    Result,
};
use clap::{
    Args,
    Parser,
    Subcommand,
};
use dotenv_diff::loader::{
    read_text,
    resolve_env_file,
};
use dotenv_diff::{
    CompareOptions,
    CompareReport,
    Config,
    KeyFilter,
    ProjectLoader,
    ScanOptions,
    ScanReport,
    Severity,
    detect_project,
    parse_t3_env_schema,
};

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Env file to check
    #[arg(long)]
    env: Option<PathBuf>,
    /// Example (template) env file
    #[arg(long)]
    example: Option<PathBuf>,
    /// Also compare values of shared keys
    #[arg(long)]
    check_values: bool,
    /// Keys to ignore (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ignore: Vec<String>,
    /// Regexes of keys to ignore (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ignore_regex: Vec<String>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Exit with an error on any warning
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Compare an env file against its example
    Compare {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Scan a codebase for environment variable usage
    Scan {
        /// Project directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
        /// Directory names to skip (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Lowest severity of reported source secrets
        #[arg(long)]
        min_severity: Option<Severity>,
        /// t3-env schema file
        #[arg(long)]
        t3_schema: Option<PathBuf>,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dotenv-diff",
    version,
    about = "Cross-check .env files and their usage in code"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Config file (default: ./dotenv-diff.config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn init_logging(&self) {
        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => {
                Config::load(path).with_context(|| format!("Failed to load {}", path.display()))
            }
            None => Ok(Config::discover(Path::new("."))
                .context("Failed to load config")?
                .unwrap_or_default()),
        }
    }
}

/// Settings shared by both commands after merging flags over the config.
struct Resolved {
    filter: KeyFilter,
    check_values: bool,
    strict: bool,
    json: bool,
}

fn resolve_common(common: &CommonArgs, config: &Config) -> Result<Resolved> {
    let ignore = if common.ignore.is_empty() {
        &config.ignore
    } else {
        &common.ignore
    };
    let ignore_regex = if common.ignore_regex.is_empty() {
        &config.ignore_regex
    } else {
        &common.ignore_regex
    };
    let filter = KeyFilter::new(ignore.as_slice(), ignore_regex.as_slice())
        .context("Invalid --ignore-regex")?;
    Ok(Resolved {
        filter,
        check_values: common.check_values || config.check_values.unwrap_or(false),
        strict: common.strict || config.strict.unwrap_or(false),
        json: common.json,
    })
}

fn main() -> Result<ExitCode> {
    let cli = <Cli as clap::Parser>::parse();
    cli.init_logging();
    let config = cli.load_config()?;
    let failed = match &cli.command {
        Commands::Compare { common } => compare(common, &config)?,
        Commands::Scan {
            dir,
            common,
            exclude,
            min_severity,
            t3_schema,
        } => scan(dir, common, exclude, *min_severity, t3_schema.as_deref(), &config)?,
    };
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

fn print_list(marker: &str, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{} {} ({}):", marker, title, items.len());
    for item in items {
        println!("    - {}", item);
    }
}

fn compare(common: &CommonArgs, config: &Config) -> Result<bool> {
    let resolved = resolve_common(common, config)?;
    let env_path = common
        .env
        .clone()
        .or_else(|| config.env.clone())
        .unwrap_or_else(|| PathBuf::from(".env"));
    let example_path = common
        .example
        .clone()
        .or_else(|| config.example.clone())
        .unwrap_or_else(|| PathBuf::from(".env.example"));
    let env_path = resolve_env_file(&env_path);
    let example_path = resolve_env_file(&example_path);

    let opts = CompareOptions {
        check_values: resolved.check_values,
        filter: resolved.filter,
        weights: config.health_weights.clone().unwrap_or_default(),
        ..Default::default()
    };
    let report = dotenv_diff::compare_env_files(
        &read_text(&env_path),
        &read_text(&example_path),
        &opts,
    );

    if resolved.json {
        print_json(&report)?;
    } else {
        print_compare_report(&report, &env_path, &example_path);
    }
    Ok(report.has_errors() || (resolved.strict && report.has_warnings()))
}

fn print_compare_report(report: &CompareReport, env: &Path, example: &Path) {
    println!("Comparing {} with {}\n", env.display(), example.display());
    if report.diff.is_clean() {
        println!("✓ All keys match");
    }
    print_list("✗", "Missing keys", &report.diff.missing);
    print_list("⚠", "Extra keys", &report.diff.extra);
    if !report.diff.value_mismatches.is_empty() {
        println!("⚠ Value mismatches ({}):", report.diff.value_mismatches.len());
        for m in &report.diff.value_mismatches {
            println!("    - {}: expected '{}', got '{}'", m.key, m.expected, m.actual);
        }
    }
    for (label, dups) in [
        ("env", &report.env_duplicates),
        ("example", &report.example_duplicates),
    ] {
        for d in dups {
            println!("⚠ {} appears {} times in the {} file", d.key, d.count, label);
        }
    }
    print_list("⚠", "Empty values", &report.empty_keys);
    for w in &report.uppercase_warnings {
        println!("⚠ {} should be {}", w.key, w.suggestion);
    }
    for w in &report.inconsistent_naming {
        println!("⚠ {} and {} look alike; use {}", w.key1, w.key2, w.suggestion);
    }
    for s in &report.example_secrets {
        println!(
            "✗ [{}] {} in example: {}",
            s.severity,
            s.key.as_deref().unwrap_or("?"),
            s.reason
        );
    }
    for e in &report.expirations {
        print_expiration(&e.key, &e.date, e.days_left);
    }
    println!("\nHealth score: {}/100", report.health_score);
}

fn print_expiration(key: &str, date: &str, days_left: i64) {
    if days_left < 0 {
        println!("✗ {} expired on {} ({} days ago)", key, date, -days_left);
    } else {
        println!("⚠ {} expires on {} ({} days left)", key, date, days_left);
    }
}

fn scan(
    dir: &Path,
    common: &CommonArgs,
    exclude: &[String],
    min_severity: Option<Severity>,
    t3_schema: Option<&Path>,
    config: &Config,
) -> Result<bool> {
    let resolved = resolve_common(common, config)?;
    let loader = ProjectLoader::new(dir)
        .with_exclude(config.exclude.iter().cloned())
        .with_exclude(exclude.iter().cloned())
        .with_extensions(config.extensions.iter().cloned());
    let files = loader
        .collect_source_files()
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    let env_path = common
        .env
        .clone()
        .or_else(|| config.env.clone())
        .unwrap_or_else(|| dir.join(".env"));
    let env_text = read_text(&resolve_env_file(&env_path));
    let example_path = common
        .example
        .clone()
        .or_else(|| config.example.clone())
        .or_else(|| Some(dir.join(".env.example")).filter(|p| p.is_file()));
    let example_text = example_path.map(|p| read_text(&resolve_env_file(&p)));

    let min_severity = match (min_severity, &config.min_severity) {
        (Some(severity), _) => severity,
        (None, Some(name)) => name.parse().context("Invalid minSeverity in config")?,
        (None, None) => Severity::Low,
    };

    let project = detect_project(&loader.read_package_json());
    let explicit_schema = t3_schema.or(config.t3_schema.as_deref());
    let schema = if explicit_schema.is_some() || project.uses_t3_env {
        loader
            .read_t3_schema(explicit_schema)
            .map(|text| parse_t3_env_schema(&text))
    } else {
        None
    };
    log::info!(
        "Scanning {} files (framework: {}, t3-env: {})",
        files.len(),
        project.framework,
        schema.is_some()
    );

    let opts = ScanOptions {
        check_values: resolved.check_values,
        filter: resolved.filter,
        min_severity,
        t3_schema: schema,
        weights: config.health_weights.clone().unwrap_or_default(),
        ..Default::default()
    }
    .with_project(&project);
    let report = dotenv_diff::analyze_codebase(&files, &env_text, example_text.as_deref(), &opts);

    if resolved.json {
        print_json(&report)?;
    } else {
        print_scan_report(&report, dir);
    }
    Ok(report.has_errors() || (resolved.strict && report.has_warnings()))
}

fn print_scan_report(report: &ScanReport, dir: &Path) {
    println!(
        "Scanned {} files in {}, {} usages of {} variables\n",
        report.stats.files_scanned.unwrap_or_default(),
        dir.display(),
        report.stats.usage_count.unwrap_or_default(),
        report.stats.unique_variable_count.unwrap_or_default(),
    );
    if report.missing.is_empty() {
        println!("✓ Every used variable is declared");
    }
    print_list("✗", "Used but not declared", &report.missing);
    print_list("⚠", "Declared but not used", &report.unused);
    for s in &report.secrets {
        println!(
            "{} [{}] {}:{} {}",
            if s.severity == Severity::High { "✗" } else { "⚠" },
            s.severity,
            s.file.as_deref().unwrap_or("?"),
            s.line.unwrap_or_default(),
            s.reason
        );
        if let Some(snippet) = &s.snippet {
            println!("      {}", snippet);
        }
    }
    for u in &report.logged {
        println!("⚠ {} is logged at {}:{}", u.variable, u.file, u.line);
    }
    for w in &report.uppercase_warnings {
        println!("⚠ {} should be {}", w.key, w.suggestion);
    }
    for w in report.framework_warnings.iter().chain(&report.t3_env_warnings) {
        println!("⚠ [{}] {} at {}:{}: {}", w.framework, w.variable, w.file, w.line, w.reason);
    }
    for s in &report.example_secrets {
        println!(
            "✗ [{}] {} in example: {}",
            s.severity,
            s.key.as_deref().unwrap_or("?"),
            s.reason
        );
    }
    for e in &report.expirations {
        print_expiration(&e.key, &e.date, e.days_left);
    }
    for d in &report.duplicates {
        println!("⚠ {} appears {} times in the env file", d.key, d.count);
    }
    for w in &report.inconsistent_naming {
        println!("⚠ {} and {} look alike; use {}", w.key1, w.key2, w.suggestion);
    }
    if let Some(diff) = &report.example_diff {
        print_list("✗", "Missing from env (declared in example)", &diff.missing);
        print_list("⚠", "Not in example", &diff.extra);
    }
    println!("\nHealth score: {}/100", report.health_score);
}
