//! # Moldsheet CLI Application
//!
//! Terminal front end for the molding engine: standalone calculators,
//! catalog browsing, cascading machine selection and full process sheets
//! with a quotation.
//!
//! ```bash
//! moldsheet calc clamping_force 100 1000
//! moldsheet machines --manufacturer Arburg --min-force 800
//! moldsheet options --manufacturer Arburg --model "Allrounder 470 A"
//! moldsheet quote --material ABS --set part_volume=20 --set cavities=2 \
//!     --manufacturer Arburg --model "Allrounder 470 A" --clamp 1000 --unit 400 --screw 40
//! ```

mod render;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mold_core::catalog::{Catalog, MachineFilter, SelectionLevel, SelectionState, SelectionValue, DEFAULT_PAGE_SIZE};
use mold_core::config::EngineConfig;
use mold_core::engine::Session;
use mold_core::formulas::Formula;
use mold_core::process::{InputField, ProcessInputs};
use mold_core::report::{JobInfo, QuotationReport};

#[derive(Parser)]
#[command(name = "moldsheet")]
#[command(about = "Injection molding process sheet and quotation calculator")]
#[command(version)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace), ignored when RUST_LOG is set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one formula with positional arguments
    Calc {
        /// Formula id (see `formulas`)
        formula: String,

        /// Arguments in the order listed by `formulas`
        #[arg(allow_negative_numbers = true)]
        args: Vec<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every formula with its arguments
    Formulas,

    /// Browse the machine catalog
    Machines {
        /// Exact manufacturer
        #[arg(long)]
        manufacturer: Option<String>,

        /// Substring of the model (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,

        /// Minimum clamping force (kN)
        #[arg(long)]
        min_force: Option<f64>,

        /// Maximum clamping force (kN)
        #[arg(long)]
        max_force: Option<f64>,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        per_page: usize,
    },

    /// Search the material catalog
    Materials {
        /// Matches name, id, category, description and trade names
        search: Option<String>,
    },

    /// Show the selector options for a partial machine selection
    Options {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Compute a full process sheet and quotation
    Quote {
        /// Start from an input record (JSON) instead of the session defaults
        #[arg(long)]
        inputs: Option<PathBuf>,

        /// Prefill the material section from a catalog material id
        #[arg(short, long)]
        material: Option<String>,

        /// Set an input, e.g. --set part_volume=20 (repeatable)
        #[arg(short = 's', long = "set", value_parser = parse_assignment)]
        assignments: Vec<(InputField, String)>,

        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(long, default_value = "")]
        customer: String,

        #[arg(long, default_value = "")]
        part_number: String,

        #[arg(long, default_value = "")]
        engineer: String,

        /// Print the quotation report as JSON
        #[arg(long)]
        json: bool,

        /// Also write the quotation report (JSON) to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

/// Machine selection, applied top-down
#[derive(Args, Default)]
struct SelectionArgs {
    #[arg(long)]
    manufacturer: Option<String>,

    #[arg(long)]
    model: Option<String>,

    /// Clamping force (kN)
    #[arg(long)]
    clamp: Option<String>,

    /// Injection unit
    #[arg(long)]
    unit: Option<String>,

    /// Screw diameter (mm)
    #[arg(long)]
    screw: Option<String>,
}

impl SelectionArgs {
    /// Given levels in selector order, each parsed to the value kind its level expects
    fn values(&self) -> Result<Vec<(SelectionLevel, SelectionValue)>> {
        let given = [
            (SelectionLevel::Manufacturer, &self.manufacturer),
            (SelectionLevel::Model, &self.model),
            (SelectionLevel::ClampingForce, &self.clamp),
            (SelectionLevel::InjectionUnit, &self.unit),
            (SelectionLevel::ScrewDiameter, &self.screw),
        ];
        let mut values = Vec::new();
        for (level, text) in given {
            if let Some(text) = text {
                match SelectionValue::parse_for(level, text) {
                    Some(value) => values.push((level, value)),
                    None => bail!("invalid {} '{}'", level.display_name(), text),
                }
            }
        }
        Ok(values)
    }

    /// Apply each given level in order through the session selector
    fn apply(&self, session: &mut Session<'_>) -> Result<()> {
        for (level, value) in self.values()? {
            let (accepted, _) = session.select(level, value.clone());
            if !accepted {
                bail!("cannot select {} = {}: choose the levels above it first", level.display_name(), value);
            }
        }
        Ok(())
    }

    fn to_state(&self) -> Result<SelectionState> {
        let mut state = SelectionState::default();
        for (level, value) in self.values()? {
            if !state.set(level, value.clone()) {
                bail!("cannot select {} = {}: choose the levels above it first", level.display_name(), value);
            }
        }
        Ok(state)
    }
}

fn parse_assignment(s: &str) -> Result<(InputField, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;
    let field: InputField = name.parse().map_err(|e| format!("{}", e))?;
    Ok((field, value.to_string()))
}

/// `RUST_LOG` (or `var`) wins when set; otherwise the `-v` count picks the level
fn log_filter(verbose: u8, var: &str) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(level))
}

fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, EnvFilter::DEFAULT_ENV))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let catalog = Catalog::load(&config.catalog).context("loading catalog")?;
    debug!(machines = catalog.machines.len(), materials = catalog.materials.len(), "ready");

    match cli.command {
        Commands::Calc { formula, args, json } => {
            let formula = Formula::from_id(&formula)?;
            let value = formula.evaluate(&args)?;
            if json {
                let out = serde_json::json!({ "formula": formula.id(), "args": args, "result": value });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                render::formula_result(formula, &args, value);
            }
        }

        Commands::Formulas => render::formula_list(),

        Commands::Machines {
            manufacturer,
            query,
            min_force,
            max_force,
            page,
            per_page,
        } => {
            let filter = MachineFilter {
                manufacturer,
                query,
                min_clamping_force_kn: min_force,
                max_clamping_force_kn: max_force,
            };
            render::machine_page(&filter.page(&catalog.machines, page, per_page));
        }

        Commands::Materials { search } => {
            let groups = match search.as_deref() {
                Some(term) => {
                    let mut groups: BTreeMap<&str, Vec<_>> = BTreeMap::new();
                    for m in catalog.search_materials(term) {
                        groups.entry(m.category.as_str()).or_default().push(m);
                    }
                    groups
                }
                None => catalog.materials_by_category(),
            };
            render::material_list(&groups);
        }

        Commands::Options { selection } => {
            let state = selection.to_state()?;
            render::selection_options(&state, &catalog);
        }

        Commands::Quote {
            inputs,
            material,
            assignments,
            selection,
            customer,
            part_number,
            engineer,
            json,
            out,
        } => {
            let mut session = Session::new(&catalog, config.constants);
            if let Some(path) = inputs {
                let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
                session.inputs = serde_json::from_str::<ProcessInputs>(&text)
                    .with_context(|| format!("parsing {}", path.display()))?;
            }
            if let Some(id) = material {
                session.select_material(&id)?;
            }
            for (field, value) in &assignments {
                session.set_input(*field, value);
            }
            selection.apply(&mut session)?;

            let recalc = session.recalculate();
            let report = QuotationReport::new(
                JobInfo::new(customer, part_number, engineer),
                session.inputs.clone(),
                recalc,
            );

            if let Some(path) = out {
                fs::write(&path, report.to_json()?).with_context(|| format!("writing {}", path.display()))?;
                eprintln!("Report written to {}", path.display());
            }

            if json {
                println!("{}", report.to_json()?);
            } else {
                render::process_sheet(&report);
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
