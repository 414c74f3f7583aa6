//! Command handlers

use crate::cli::{
    ArchiveAction, Cli, ColumnAction, Commands, Direction, ExportTarget, NameAction,
    ShiftAction, StatusAction, VehicleAction,
};
use crate::output::{
    output_archive, output_archive_list, output_columns, output_names, output_shift,
    output_summary, output_taxonomy, output_vehicles,
};
use manifest_app::{AssumeYes, Confirm, Config, ManifestService};
use manifest_domain::model::MoveDirection;
use manifest_domain::service::RolloverOutcome;
use manifest_types::{
    ColumnType, OutputFormat, Result, SelectionSource, Shift, StatusPath, ValidationError,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Asks on stdin; anything but "y" declines
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        std::io::stdout().flush().ok();
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        input.trim().eq_ignore_ascii_case("y")
    }
}

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.store_dir {
        config.store_dir = Some(dir.clone());
    }
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    crate::init_tracing(level);

    let output_format = cli.format.unwrap_or(config.output_format);
    let confirm: &dyn Confirm = if cli.yes { &AssumeYes } else { &StdinConfirm };

    match cli.command {
        Commands::Column { action } => {
            cmd_column(&mut open_service(&config)?, action, output_format, confirm)
        }
        Commands::Vehicle { action } => {
            cmd_vehicle(&mut open_service(&config)?, action, output_format, confirm)
        }
        Commands::Driver { action } => {
            cmd_driver(&mut open_service(&config)?, action, output_format, confirm)
        }
        Commands::Destination { action } => {
            cmd_destination(&mut open_service(&config)?, action, output_format, confirm)
        }
        Commands::Status { action } => {
            cmd_status(&mut open_service(&config)?, action, output_format, confirm)
        }
        Commands::Shift { action } => cmd_shift(&mut open_service(&config)?, action, output_format),
        Commands::Summary => {
            let service = open_service(&config)?;
            output_summary(
                output_format,
                service.state().schema.columns(),
                &service.summary(),
                service.placeholder(),
            )
        }
        Commands::Archives { action } => {
            cmd_archives(&open_service(&config)?, action, output_format)
        }
        Commands::Export { target } => cmd_export(&open_service(&config)?, target),
        Commands::Config {
            show,
            set_store_dir,
            set_output,
            set_log_level,
            set_placeholder,
            set_background_save,
            reset,
        } => cmd_config(
            show,
            set_store_dir,
            set_output,
            set_log_level,
            set_placeholder,
            set_background_save,
            reset,
        ),
        Commands::Reset => {
            let done = open_service(&config)?.reset_all(confirm)?;
            report_done(done, "All data reset.");
            Ok(())
        }
    }
}

/// Open the stores and tell the user if the startup check rolled the day
fn open_service(config: &Config) -> Result<ManifestService> {
    let service = ManifestService::open(config)?;
    report_rollover(service.rollover());
    Ok(service)
}

fn report_rollover(outcome: &RolloverOutcome) {
    match outcome {
        RolloverOutcome::Archived(archive) => {
            eprintln!("New day: archived {} and cleared the manifest.", archive.date)
        }
        RolloverOutcome::Cleared { previous } => {
            eprintln!("New day: cleared the manifest of {}.", previous)
        }
        RolloverOutcome::FirstRun | RolloverOutcome::SameDay => {}
    }
}

fn report_done(done: bool, message: &str) {
    if done {
        println!("{}", message);
    } else {
        println!("Cancelled.");
    }
}

fn cmd_column(
    service: &mut ManifestService,
    action: ColumnAction,
    output_format: OutputFormat,
    confirm: &dyn Confirm,
) -> Result<()> {
    match action {
        ColumnAction::List => output_columns(output_format, service.state().schema.columns()),
        ColumnAction::Add { label, column_type } => {
            let column = service.add_column(&label, column_type)?;
            println!("Added column {} ({})", column.label, column.id);
            Ok(())
        }
        ColumnAction::Rename { index, label } => {
            service.rename_column(index, &label)?;
            println!("Renamed column {}", index);
            Ok(())
        }
        ColumnAction::Move { index, direction } => {
            let direction = match direction {
                Direction::Up => MoveDirection::Up,
                Direction::Down => MoveDirection::Down,
            };
            if !service.move_column(index, direction)? {
                println!("Column {} is already at the edge", index);
            }
            output_columns(output_format, service.state().schema.columns())
        }
        ColumnAction::Delete { index } => {
            let done = service.delete_column(index, confirm)?;
            report_done(done, "Column deleted.");
            Ok(())
        }
    }
}

fn cmd_vehicle(
    service: &mut ManifestService,
    action: VehicleAction,
    output_format: OutputFormat,
    confirm: &dyn Confirm,
) -> Result<()> {
    match action {
        VehicleAction::List => output_vehicles(output_format, service.state().roster.fleet()),
        VehicleAction::Add { plate } => {
            let vehicle = service.add_vehicle(&plate)?;
            println!("Added truck {}", vehicle.plate);
            Ok(())
        }
        VehicleAction::Delete { plate } => {
            let index = service
                .state()
                .roster
                .vehicle_index(&plate)
                .ok_or_else(|| ValidationError::UnknownPlate(plate.clone()))?;
            let done = service.delete_vehicle(index, confirm)?;
            report_done(done, "Truck deleted.");
            Ok(())
        }
        VehicleAction::AssignDriver { plate, driver } => {
            let driver = driver.unwrap_or_default();
            service.assign_driver(&plate, &driver)?;
            if driver.trim().is_empty() {
                println!("Unassigned driver from {}", plate);
            } else {
                println!("Assigned {} to {}", driver.trim(), plate);
            }
            Ok(())
        }
    }
}

fn cmd_driver(
    service: &mut ManifestService,
    action: NameAction,
    output_format: OutputFormat,
    confirm: &dyn Confirm,
) -> Result<()> {
    match action {
        NameAction::List => output_names(output_format, "Drivers", service.state().roster.drivers()),
        NameAction::Add { name } => {
            if !service.add_driver(&name)? {
                println!("Driver {} already exists", name.trim());
            }
            Ok(())
        }
        NameAction::Delete { name } => {
            let done = service.delete_driver(&name, confirm)?;
            report_done(done, "Driver deleted.");
            Ok(())
        }
    }
}

fn cmd_destination(
    service: &mut ManifestService,
    action: NameAction,
    output_format: OutputFormat,
    confirm: &dyn Confirm,
) -> Result<()> {
    match action {
        NameAction::List => output_names(
            output_format,
            "Destinations",
            service.state().roster.destinations(),
        ),
        NameAction::Add { name } => {
            if !service.add_destination(&name)? {
                println!("Destination {} already exists", name.trim());
            }
            Ok(())
        }
        NameAction::Delete { name } => {
            let done = service.delete_destination(&name, confirm)?;
            report_done(done, "Destination deleted.");
            Ok(())
        }
    }
}

fn cmd_status(
    service: &mut ManifestService,
    action: StatusAction,
    output_format: OutputFormat,
    confirm: &dyn Confirm,
) -> Result<()> {
    match action {
        StatusAction::List => output_taxonomy(output_format, &service.state().taxonomy),
        StatusAction::Add { main, sub, sub_sub } => {
            let added = match (sub, sub_sub) {
                (None, _) => service.add_main_status(&main)?,
                (Some(sub), None) => service.add_sub_status(&main, &sub)?,
                (Some(sub), Some(sub_sub)) => service.add_sub_sub_status(&main, &sub, &sub_sub)?,
            };
            if !added {
                println!("Status already exists");
            }
            Ok(())
        }
        StatusAction::Delete { main, sub, sub_sub } => {
            let done = service.delete_status(&main, sub.as_deref(), sub_sub.as_deref(), confirm)?;
            report_done(done, "Status deleted.");
            Ok(())
        }
    }
}

fn cmd_shift(
    service: &mut ManifestService,
    action: ShiftAction,
    output_format: OutputFormat,
) -> Result<()> {
    match action {
        ShiftAction::Show { shift } => output_shift(
            output_format,
            shift,
            service.state().schema.columns(),
            &service.merged_shift(shift),
            service.placeholder(),
        ),
        ShiftAction::Save {
            shift,
            set,
            status,
            clear_status,
        } => cmd_shift_save(service, shift, set, status, clear_status, output_format),
    }
}

fn cmd_shift_save(
    service: &mut ManifestService,
    shift: Shift,
    set: Vec<String>,
    status: Vec<String>,
    clear_status: Vec<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let mut draft = service.begin_shift(shift);
    let mut chooser = service.status_chooser();

    for edit in &set {
        let (plate, column, value) = parse_set(edit)?;
        let column_id = resolve_column(service, column)?;
        check_selection(service, &column_id, value)?;
        draft.set_value(&service.state().schema, plate, &column_id, value)?;
    }
    for edit in &status {
        let (plate, path) = edit
            .split_once('=')
            .ok_or_else(|| bad_edit(edit, "PLATE=Main|Sub|SubSub"))?;
        let label = service.choose_status(
            &mut draft,
            &mut chooser,
            plate.trim(),
            &StatusPath::parse(path),
        )?;
        info!(plate = plate.trim(), %label, "Status chosen");
    }
    for plate in &clear_status {
        service.clear_status(&mut draft, &mut chooser, plate.trim())?;
    }

    let saved = service.save_shift(&draft);
    println!("Saved {} row(s) to the {} shift", saved, shift);
    output_shift(
        output_format,
        shift,
        service.state().schema.columns(),
        &service.merged_shift(shift),
        service.placeholder(),
    )
}

fn bad_edit(edit: &str, expected: &'static str) -> ValidationError {
    ValidationError::InvalidEdit(edit.to_string(), expected)
}

/// `PLATE:COLUMN=VALUE`
fn parse_set(edit: &str) -> std::result::Result<(&str, &str, &str), ValidationError> {
    let (target, value) = edit
        .split_once('=')
        .ok_or_else(|| bad_edit(edit, "PLATE:COLUMN=VALUE"))?;
    let (plate, column) = target
        .split_once(':')
        .ok_or_else(|| bad_edit(edit, "PLATE:COLUMN=VALUE"))?;
    Ok((plate.trim(), column.trim(), value))
}

/// Match a column by id, falling back to a case-insensitive label match
fn resolve_column(service: &ManifestService, key: &str) -> Result<String> {
    let columns = service.state().schema.columns();
    columns
        .iter()
        .find(|c| c.id == key)
        .or_else(|| columns.iter().find(|c| c.label.eq_ignore_ascii_case(key)))
        .map(|c| c.id.clone())
        .ok_or_else(|| ValidationError::UnknownColumn(key.to_string()).into())
}

/// Selection columns only take names from their roster list
fn check_selection(service: &ManifestService, column_id: &str, value: &str) -> Result<()> {
    let state = service.state();
    let value = value.trim();
    let Some(column) = state.schema.find(column_id) else {
        return Ok(());
    };
    if value.is_empty() {
        return Ok(());
    }
    match column.column_type {
        ColumnType::Selection(SelectionSource::Driver)
            if !state.roster.drivers().iter().any(|d| d == value) =>
        {
            Err(ValidationError::UnknownDriver(value.to_string()).into())
        }
        ColumnType::Selection(SelectionSource::Destination)
            if !state.roster.destinations().iter().any(|d| d == value) =>
        {
            Err(ValidationError::UnknownDestination(value.to_string()).into())
        }
        _ => Ok(()),
    }
}

fn cmd_archives(
    service: &ManifestService,
    action: ArchiveAction,
    output_format: OutputFormat,
) -> Result<()> {
    match action {
        ArchiveAction::List => output_archive_list(output_format, &service.archives()),
        ArchiveAction::Show { date } => {
            let archive = service.archive(date)?;
            output_archive(
                output_format,
                archive,
                service.archive_columns(archive),
                service.placeholder(),
            )
        }
    }
}

fn cmd_export(service: &ManifestService, target: ExportTarget) -> Result<()> {
    match target {
        ExportTarget::Summary { output } => {
            service.export_summary(&output)?;
            println!("Exported to: {}", output.display());
        }
        ExportTarget::Archives { dates, output } => {
            let count = service.export_archives(&dates, &output)?;
            println!("Exported {} archive(s) to: {}", count, output.display());
        }
    }
    Ok(())
}

fn cmd_config(
    show: bool,
    set_store_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    set_log_level: Option<String>,
    set_placeholder: Option<String>,
    set_background_save: Option<bool>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_store_dir {
        config.store_dir = Some(dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(level) = set_log_level {
        config.log_level = level;
        modified = true;
    }

    if let Some(placeholder) = set_placeholder {
        config.status_placeholder = placeholder;
        modified = true;
    }

    if let Some(background_save) = set_background_save {
        config.background_save = background_save;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_set("ABC-1:destination=Port=2").unwrap(),
            ("ABC-1", "destination", "Port=2")
        );
        assert_eq!(parse_set("ABC-1:note=").unwrap(), ("ABC-1", "note", ""));
        assert!(parse_set("ABC-1=Port").is_err());
        assert!(parse_set("ABC-1:note").is_err());
    }
}
