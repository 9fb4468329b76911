use anyhow::{bail, Context, Result};
use std::env;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Use library instead of local modules
use skill_tagger::{
    aggregate_profiles, detect_tools, skill_label, tag_courses, write_csv, ClassificationReport,
    CourseProfile, RawCourseRow, Settings,
};

const USAGE: &str = "\
Usage:
  skill-tagger taxonomy
  skill-tagger classify <file|-> [threshold] [--json]
  skill-tagger profiles <raw_courses.json> <course_profiles.json>
  skill-tagger batch <course_profiles.json> <out.csv> [threshold]";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.rust_log)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (command.as_str(), rest),
        None => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    match command {
        "taxonomy" => run_taxonomy(&settings),
        "classify" => run_classify(&settings, rest),
        "profiles" => run_profiles(rest),
        "batch" => run_batch(&settings, rest),
        _ => {
            eprintln!("{}", USAGE);
            bail!("Unknown command: {}", command)
        }
    }
}

fn run_taxonomy(settings: &Settings) -> Result<()> {
    let registry = settings.load_registry()?;

    println!("📚 Skill Taxonomy");
    println!("{}", RULE);

    for group in registry.groups() {
        println!("\n{}", group.display_label());
        for category in registry.categories_in_group(&group.id) {
            println!("  {} ({} triggers)", category.display_name(), category.trigger_count());
        }
    }

    println!("\n{}", RULE);
    println!("✓ {} categories, fingerprint {}", registry.count(), &registry.fingerprint()[..12]);

    Ok(())
}

fn run_classify(settings: &Settings, args: &[String]) -> Result<()> {
    let json = args.iter().any(|a| a == "--json");
    let positional: Vec<&String> = args.iter().filter(|a| *a != "--json").collect();

    let Some(source) = positional.first() else {
        bail!("classify needs a file path or '-' for stdin\n{}", USAGE);
    };
    let threshold = parse_threshold(positional.get(1).map(|s| s.as_str()), settings.threshold)?;

    let text = read_document(source)?;
    let registry = settings.load_registry()?;
    let classifier = settings.classifier()?;

    let matches = classifier.classify(&text, &registry, threshold)?;
    let report = ClassificationReport::new(&registry, threshold, matches);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("🏷️  Classification (threshold {:.2})", threshold);
    println!("{}", RULE);

    if report.matches.is_empty() {
        println!("No category matched.");
        return Ok(());
    }

    for m in &report.matches {
        let category = registry.get_category(&m.category_id)?;
        println!(
            "  {:<45} score {:.3}  [{}]",
            skill_label(category, m.tier),
            m.score,
            m.matched_triggers.join(", ")
        );
    }

    let tools = detect_tools(&text);
    if !tools.is_empty() {
        println!("  🧰 Tools: {}", tools.join(", "));
    }

    println!("{}", RULE);
    println!("✓ {} matches ({} primary)", report.matches.len(), report.primary_count());

    Ok(())
}

fn run_profiles(args: &[String]) -> Result<()> {
    let [raw_path, out_path] = args else {
        bail!("profiles needs <raw_courses.json> <course_profiles.json>\n{}", USAGE);
    };

    let content = fs::read_to_string(raw_path)
        .with_context(|| format!("Failed to read raw courses: {}", raw_path))?;
    let rows: Vec<RawCourseRow> =
        serde_json::from_str(&content).context("Failed to parse raw courses JSON")?;
    let row_count = rows.len();

    let profiles = aggregate_profiles(rows);
    let file = File::create(out_path).with_context(|| format!("Failed to create {}", out_path))?;
    serde_json::to_writer_pretty(file, &profiles).context("Failed to write course profiles")?;

    info!(rows = row_count, profiles = profiles.len(), "Aggregated course profiles");
    println!("✓ Generated {} course profiles → {}", profiles.len(), out_path);

    Ok(())
}

fn run_batch(settings: &Settings, args: &[String]) -> Result<()> {
    let (profiles_path, out_path) = match args {
        [profiles_path, out_path, ..] => (profiles_path, out_path),
        _ => bail!("batch needs <course_profiles.json> <out.csv>\n{}", USAGE),
    };
    let threshold = parse_threshold(args.get(2).map(|s| s.as_str()), settings.threshold)?;

    let content = fs::read_to_string(profiles_path)
        .with_context(|| format!("Failed to read course profiles: {}", profiles_path))?;
    let profiles: Vec<CourseProfile> =
        serde_json::from_str(&content).context("Failed to parse course profiles JSON")?;

    let registry = settings.load_registry()?;
    let classifier = settings.classifier()?;

    println!("📂 Tagging {} courses...", profiles.len());
    let taggings = tag_courses(&profiles, &registry, &classifier, threshold)?;

    let file = File::create(out_path).with_context(|| format!("Failed to create {}", out_path))?;
    let written = write_csv(file, &taggings, &profiles, &registry)?;

    let untagged = taggings.iter().filter(|t| t.matches.is_empty()).count();
    println!("{}", RULE);
    println!("✓ Generated CSV with {} courses → {}", written, out_path);
    if untagged > 0 {
        println!("  {} courses matched no category", untagged);
    }

    Ok(())
}

fn parse_threshold(raw: Option<&str>, default: f64) -> Result<f64> {
    match raw {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("Threshold must be a number, got '{}'", raw)),
        None => Ok(default),
    }
}

fn read_document(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read document from stdin")?;
        return Ok(text);
    }

    fs::read_to_string(Path::new(source)).with_context(|| format!("Failed to read document: {}", source))
}
