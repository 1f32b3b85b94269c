use std::env;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use drops_core::ClassTag;
use drops_core::core_api::{
    Catalog, Engine, NormalizedActivity, NormalizedItem, NormalizedResult, OwnedItemSet,
    ReferencePolicy,
};
use drops_core::variation::Variation;
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum VariationArg {
    Raid,
    Strike,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    FailBatch,
    DropActivity,
    SkipItem,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "CATALOG.json")]
    catalog: PathBuf,
    /// JSON array of owned item hashes, or a profile document.
    #[arg(long, value_name = "FILE")]
    owned: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = VariationArg::Raid)]
    variation: VariationArg,
    #[arg(long, value_enum, default_value_t = PolicyArg::FailBatch)]
    policy: PolicyArg,
    #[arg(long)]
    json: bool,
    /// Include activities without a drop list and same-named duplicates.
    #[arg(long)]
    all: bool,
    /// Only list items that have not been obtained yet.
    #[arg(long, conflicts_with = "json")]
    missing: bool,
    /// Only list items for these classes (repeatable).
    #[arg(long = "class", value_name = "CLASS", value_parser = parse_class_tag, conflicts_with = "json")]
    classes: Vec<ClassTag>,
}

#[derive(Debug, Default, Clone)]
struct ItemFilter {
    missing_only: bool,
    classes: Vec<ClassTag>,
}

impl ItemFilter {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            missing_only: cli.missing,
            classes: cli.classes.clone(),
        }
    }

    fn accepts(&self, item: &NormalizedItem) -> bool {
        if self.missing_only && item.obtained {
            return false;
        }
        self.classes.is_empty() || self.classes.contains(&item.character_class)
    }
}

fn parse_class_tag(raw: &str) -> Result<ClassTag, String> {
    ClassTag::parse(raw).ok_or_else(|| {
        format!("unknown class '{raw}' (expected warlock, titan, hunter or noclass)")
    })
}

fn to_core_variation(arg: VariationArg) -> Variation {
    match arg {
        VariationArg::Raid => Variation::Raid,
        VariationArg::Strike => Variation::Strike,
    }
}

fn to_core_policy(arg: PolicyArg) -> ReferencePolicy {
    match arg {
        PolicyArg::FailBatch => ReferencePolicy::FailBatch,
        PolicyArg::DropActivity => ReferencePolicy::DropActivity,
        PolicyArg::SkipItem => ReferencePolicy::SkipItem,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RAID_DROPS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let format = env::var("RAID_DROPS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let variation = to_core_variation(cli.variation);
    let engine = Engine::with_policy(to_core_policy(cli.policy));

    let catalog = Catalog::load_from_path(&cli.catalog).unwrap_or_else(|e| {
        eprintln!("Error loading catalog: {}", cli.catalog.display());
        eprintln!("  {}", e);
        process::exit(1);
    });

    let owned = cli.owned.as_ref().map(|path| {
        let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        });
        OwnedItemSet::from_json_str(&text).unwrap_or_else(|e| {
            eprintln!("Error parsing ownership file: {}", path.display());
            eprintln!("  {}", e);
            process::exit(1);
        })
    });
    tracing::debug!(
        activities = catalog.activities.len(),
        items = catalog.items.len(),
        owned = owned.as_ref().map(OwnedItemSet::len),
        "inputs loaded"
    );

    let result = engine.normalize(&catalog, owned.as_ref()).unwrap_or_else(|e| {
        eprintln!("Error building drop lists from {}", cli.catalog.display());
        eprintln!("  {}", e);
        process::exit(1);
    });

    if cli.json {
        let rendered = render_json(&result, variation, owned.is_some(), cli.all)
            .and_then(|value| serde_json::to_string_pretty(&value));
        match rendered {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error serializing JSON output: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let filter = ItemFilter::from_cli(&cli);
    print!("{}", render_text(&result, variation, &filter, cli.all));
}

fn render_json(
    result: &NormalizedResult,
    variation: Variation,
    signed_in: bool,
    all: bool,
) -> Result<JsonValue, serde_json::Error> {
    let mut out = JsonMap::new();
    out.insert("variation".to_string(), JsonValue::from(variation.as_str()));
    out.insert("title".to_string(), JsonValue::from(variation.title()));
    out.insert(
        "dataUrl".to_string(),
        variation.data_url().map_or(JsonValue::Null, JsonValue::from),
    );
    out.insert("signedIn".to_string(), JsonValue::Bool(signed_in));
    out.insert(
        "displayList".to_string(),
        serde_json::to_value(result.display_list())?,
    );
    if all {
        out.insert(
            "activities".to_string(),
            serde_json::to_value(&result.activities)?,
        );
    }
    Ok(JsonValue::Object(out))
}

fn render_text(
    result: &NormalizedResult,
    variation: Variation,
    filter: &ItemFilter,
    all: bool,
) -> String {
    let mut out = String::new();
    let title = variation.title();
    writeln!(&mut out, "{title}").expect("writing to String cannot fail");
    writeln!(&mut out, "{}", "=".repeat(title.len())).expect("writing to String cannot fail");

    let activities: Vec<&NormalizedActivity> = if all {
        result.activities.values().collect()
    } else {
        result.display_list().iter().collect()
    };

    for activity in activities {
        writeln!(&mut out).expect("writing to String cannot fail");
        write_activity(&mut out, activity, filter);
    }
    out
}

fn write_activity(out: &mut String, activity: &NormalizedActivity, filter: &ItemFilter) {
    let Some(drops) = activity.drops.as_ref() else {
        writeln!(out, "{} (no drop list)", activity.name())
            .expect("writing to String cannot fail");
        return;
    };

    let total = activity.items().count();
    let obtained = activity.items().filter(|item| item.obtained).count();
    writeln!(out, "{}  [{obtained}/{total} obtained]", activity.name())
        .expect("writing to String cannot fail");

    for item in drops.iter().filter(|item| filter.accepts(item)) {
        write_item(out, item, "  ");
    }
    for section in activity.sections.iter().flatten() {
        let items: Vec<&NormalizedItem> =
            section.items.iter().filter(|item| filter.accepts(item)).collect();
        if items.is_empty() {
            continue;
        }
        writeln!(out, "  {}", section.name.as_deref().unwrap_or("Other"))
            .expect("writing to String cannot fail");
        for item in items {
            write_item(out, item, "    ");
        }
    }
}

fn write_item(out: &mut String, item: &NormalizedItem, indent: &str) {
    let mark = if item.obtained { "x" } else { " " };
    let name = match item.display_name() {
        "" => format!("#{}", item.hash),
        name => name.to_string(),
    };
    writeln!(out, "{indent}[{mark}] {name} ({})", item.character_class)
        .expect("writing to String cannot fail");
}
