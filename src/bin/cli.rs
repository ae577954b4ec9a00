use anyhow::Context;
use chrono::Utc;
use floor_split::persistence::{self, ConfigSlot, KeyValueStore};
use floor_split::report::{
    config_dataframe, deviation_status, render_text_table, report_dataframe, summary_text,
};
use floor_split::validation::parse_integer;
use floor_split::{
    CalculationMethod, CalculationSession, ConfigWizard, DisplayOrder, DistributionConfig,
    ValidationError, WizardOutcome, WizardStep, export_report_to_csv,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const STORE_ENV: &str = "FLOOR_SPLIT_STORE";
const DEFAULT_STORE: &str = "split_bill_data.json";

fn print_help() {
    println!(
        "Commands:\n  help                         Show this help\n  show                         Show the current floors\n  setup                        Start the setup wizard (pre-filled from the saved setup)\n  floors <1-10>                Wizard step 1: number of floors\n  people <n>                   Wizard step 1: total people\n  assign <floor> <n>           Wizard step 2: people on a floor\n  auto                         Wizard step 2: spread people evenly\n  next                         Go to the next wizard step / finish and save\n  back                         Return to wizard step 1\n  amount <value>               Bill total (max 2 decimals)\n  method <per_person|equal>    How to split the bill\n  split [reversed]             Show the split table\n  summary                      Show a plain-text summary\n  export <csv_path>            Write the split to a CSV file\n  step <floor> <delta>         Try a different head count (min 1, not saved)\n  new                          Clear the amount\n  clear                        Delete the saved setup\n  quit|exit                    Exit"
    );
}

fn print_field_error(err: &ValidationError) {
    println!("Invalid {}: {}", err.field(), err);
}

fn print_config(config: &DistributionConfig) {
    match config_dataframe(config) {
        Ok(df) => print!("{}", render_text_table(&df)),
        Err(e) => println!("Error rendering floors: {e}"),
    }
    println!(
        "Total people: {} | Assigned: {} | {}",
        config.total_people(),
        config.assigned_people(),
        deviation_status(config)
    );
}

fn print_wizard(wizard: &ConfigWizard) {
    println!(
        "Setup step {} of 2 ({}%)",
        wizard.step().number(),
        wizard.progress_percent()
    );
    match wizard.step() {
        WizardStep::Totals => println!(
            "Floors: {} | Total people: {}",
            wizard.draft().group_count(),
            wizard.draft().total_people()
        ),
        WizardStep::Groups => print_config(wizard.draft()),
    }
}

fn print_split(session: &CalculationSession, order: DisplayOrder) {
    let Some(report) = session.report() else {
        println!("Enter an amount to see the split.");
        return;
    };
    match report_dataframe(&report, order) {
        Ok(df) => print!("{}", render_text_table(&df)),
        Err(e) => println!("Error rendering split: {e}"),
    }
    println!("Split ({})", report.summary.to_cli_summary());
}

struct Repl<S: KeyValueStore> {
    slot: ConfigSlot<S>,
    wizard: Option<ConfigWizard>,
    session: Option<CalculationSession>,
}

impl<S: KeyValueStore> Repl<S> {
    fn start(slot: ConfigSlot<S>) -> Self {
        match slot.load() {
            Some(config) => {
                println!(
                    "Loaded setup with {} floors and {} people.",
                    config.group_count(),
                    config.total_people()
                );
                Self {
                    slot,
                    wizard: None,
                    session: Some(CalculationSession::new(config)),
                }
            }
            None => {
                println!("No saved setup found. Starting the setup wizard.");
                let wizard = ConfigWizard::new();
                print_wizard(&wizard);
                Self {
                    slot,
                    wizard: Some(wizard),
                    session: None,
                }
            }
        }
    }

    fn update_wizard<F>(&mut self, action: F)
    where
        F: FnOnce(ConfigWizard) -> Result<ConfigWizard, ValidationError>,
    {
        let Some(wizard) = self.wizard.clone() else {
            println!("No setup in progress. Type 'setup' to start one.");
            return;
        };
        match action(wizard) {
            Ok(next) => {
                print_wizard(&next);
                self.wizard = Some(next);
            }
            Err(e) => print_field_error(&e),
        }
    }

    fn wizard_on(&self, step: WizardStep) -> bool {
        match &self.wizard {
            Some(wizard) if wizard.step() == step => true,
            Some(_) => {
                println!("That command belongs to setup step {}.", step.number());
                false
            }
            None => {
                println!("No setup in progress. Type 'setup' to start one.");
                false
            }
        }
    }

    fn advance_wizard(&mut self) {
        let Some(wizard) = self.wizard.clone() else {
            println!("No setup in progress. Type 'setup' to start one.");
            return;
        };
        match wizard.next(Utc::now()) {
            Ok(WizardOutcome::InProgress(next)) => {
                print_wizard(&next);
                self.wizard = Some(next);
            }
            Ok(WizardOutcome::Finished(config)) => {
                if let Err(e) = self.slot.save(&config) {
                    println!("Error saving setup: {e}");
                    return;
                }
                println!("Setup saved.");
                let method = self
                    .session
                    .as_ref()
                    .map(CalculationSession::method)
                    .unwrap_or_default();
                self.session = Some(CalculationSession::new(config).with_method(method));
                self.wizard = None;
            }
            Err(e) => print_field_error(&e),
        }
    }

    fn update_session<F>(&mut self, action: F)
    where
        F: FnOnce(CalculationSession) -> Result<CalculationSession, ValidationError>,
    {
        let Some(session) = self.session.clone() else {
            println!("No saved setup. Finish the setup wizard first.");
            return;
        };
        match action(session) {
            Ok(next) => {
                print_split(&next, DisplayOrder::Creation);
                self.session = Some(next);
            }
            Err(e) => print_field_error(&e),
        }
    }

    /// Returns `false` when the loop should stop.
    fn handle(&mut self, input: &str) -> bool {
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => return false,
            "show" => match (&self.wizard, &self.session) {
                (Some(wizard), _) => print_wizard(wizard),
                (None, Some(session)) => print_config(session.config()),
                (None, None) => println!("Nothing configured yet."),
            },
            "setup" => {
                let wizard = match self.slot.load() {
                    Some(saved) => ConfigWizard::resume(saved),
                    None => ConfigWizard::new(),
                };
                print_wizard(&wizard);
                self.wizard = Some(wizard);
            }
            "floors" | "people" => {
                if !self.wizard_on(WizardStep::Totals) {
                    return true;
                }
                let Some(value) = parts.next() else {
                    println!("Usage: {cmd} <n>");
                    return true;
                };
                let field = if cmd == "floors" { "floors" } else { "totalPeople" };
                self.update_wizard(|wizard| {
                    let n = parse_integer(field, value)?;
                    if cmd == "floors" {
                        wizard.with_group_count(n)
                    } else {
                        wizard.with_total_people(n)
                    }
                });
            }
            "assign" => {
                if !self.wizard_on(WizardStep::Groups) {
                    return true;
                }
                match (parts.next(), parts.next()) {
                    (Some(floor), Some(value)) => self.update_wizard(|wizard| {
                        let id = parse_floor_id(floor)?;
                        let n = parse_integer(&format!("floor{id}"), value)?;
                        wizard.with_group_people(id, n)
                    }),
                    _ => println!("Usage: assign <floor> <n>"),
                }
            }
            "auto" => {
                if self.wizard_on(WizardStep::Groups) {
                    self.update_wizard(|wizard| Ok(wizard.auto_distributed()));
                }
            }
            "next" => self.advance_wizard(),
            "back" => {
                if let Some(wizard) = self.wizard.take() {
                    let wizard = wizard.back();
                    print_wizard(&wizard);
                    self.wizard = Some(wizard);
                } else {
                    println!("No setup in progress.");
                }
            }
            "amount" => {
                let value = parts.next().unwrap_or("");
                self.update_session(|session| session.with_amount(value));
            }
            "method" => match parts.next() {
                Some(value) => self.update_session(|session| {
                    let method = value.parse::<CalculationMethod>()?;
                    Ok(session.with_method(method))
                }),
                None => {
                    let names = CalculationMethod::variants()
                        .iter()
                        .map(|m| m.as_str())
                        .collect::<Vec<_>>()
                        .join("|");
                    println!("Usage: method <{names}>");
                }
            },
            "split" => match &self.session {
                Some(session) => {
                    let order = match parts.next() {
                        Some("reversed") => DisplayOrder::Reversed,
                        _ => DisplayOrder::Creation,
                    };
                    print_split(session, order);
                }
                None => println!("No saved setup. Finish the setup wizard first."),
            },
            "summary" => match self.session.as_ref().and_then(CalculationSession::report) {
                Some(report) => println!("{}", summary_text(&report, DisplayOrder::Creation)),
                None => println!("Enter an amount to see the split."),
            },
            "export" => {
                let Some(path) = parts.next() else {
                    println!("Usage: export <csv_path>");
                    return true;
                };
                match self.session.as_ref().and_then(CalculationSession::report) {
                    Some(report) => match export_report_to_csv(&report, path) {
                        Ok(()) => println!("Split exported to {path}"),
                        Err(e) => println!("Error exporting split: {e}"),
                    },
                    None => println!("Enter an amount to see the split."),
                }
            }
            "step" => match (parts.next(), parts.next()) {
                (Some(floor), Some(delta)) => self.update_session(|session| {
                    let id = parse_floor_id(floor)?;
                    let delta = parse_integer("delta", delta)?;
                    let config = session.config().clone().step_group_people(id, delta)?;
                    Ok(session.with_config(config))
                }),
                _ => println!("Usage: step <floor> <delta>"),
            },
            "new" => {
                if let Some(session) = self.session.take() {
                    self.session = Some(session.reset());
                    println!("Amount cleared.");
                }
            }
            "clear" => match self.slot.clear() {
                Ok(()) => {
                    self.session = None;
                    let wizard = ConfigWizard::new();
                    println!("Saved setup deleted. Starting the setup wizard.");
                    print_wizard(&wizard);
                    self.wizard = Some(wizard);
                }
                Err(e) => println!("Error clearing setup: {e}"),
            },
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }
        true
    }
}

fn parse_floor_id(input: &str) -> Result<u32, ValidationError> {
    let id = parse_integer("floor", input)?;
    u32::try_from(id).map_err(|_| ValidationError::NotAnInteger {
        field: "floor".to_string(),
        input: input.to_string(),
    })
}

fn store_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(STORE_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let path = store_path();
    let store = persistence::open_store(&path)
        .with_context(|| format!("opening store {}", path.display()))?;
    let slot = ConfigSlot::new(store);

    println!("Floor Split (CLI) - type 'help' for commands\n");
    let mut repl = Repl::start(slot);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if !repl.handle(input) {
            break;
        }
    }
    Ok(())
}
