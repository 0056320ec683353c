//! One-shot device commands.
//!
//! Each command opens a fresh session, drives it through the same
//! transitions the interactive form uses, and exits.

use netprint_core::error::SessionError;
use netprint_core::session::{CommitOutcome, DeleteOutcome, EditSession, FieldEdit};
use netprint_core::settings::Settings;
use netprint_core::store::DeviceStore;
use netprint_core::AddressKind;

use crate::cli::{AddArgs, AddressArgs, EditArgs, RemoveArgs};
use crate::commands::open_session;
use crate::error::CliError;
use crate::output::get_formatter;
use crate::prompt::TerminalPrompt;

/// Edits that switch the address to whatever was given on the command line.
pub fn address_edits(args: &AddressArgs) -> Vec<FieldEdit> {
    if let Some(ip) = args.ip {
        vec![FieldEdit::AddressKind(AddressKind::Ip), FieldEdit::Ip(ip)]
    } else if let Some(node) = &args.node {
        vec![
            FieldEdit::AddressKind(AddressKind::Node),
            FieldEdit::NodeName(node.clone()),
        ]
    } else {
        Vec::new()
    }
}

fn select_device<S: DeviceStore>(
    session: &mut EditSession<S>,
    name: &str,
    prompt: &mut TerminalPrompt,
) -> Result<(), CliError> {
    session.select_name(name, prompt).map_err(|e| match e {
        SessionError::UnknownRecord => CliError::DeviceNotFound(name.to_string()),
        other => other.into(),
    })
}

/// Run the list command
pub fn run_list(settings: &Settings, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let session = open_session(settings)?;

    let devices: Vec<_> = session.registry().records().cloned().collect();
    println!("{}", formatter.format_devices(&devices));
    Ok(())
}

/// Run the models command
pub fn run_models(settings: &Settings, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let session = open_session(settings)?;

    println!("{}", formatter.format_models(session.models()));
    Ok(())
}

/// Run the add command
pub fn run_add(args: AddArgs, settings: &Settings, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let address = address_edits(&args.address);
    if address.is_empty() {
        return Err(CliError::InvalidArgument(
            "Must specify --ip or --node".to_string(),
        ));
    }

    let mut session = open_session(settings)?;
    let mut prompt = TerminalPrompt::new(false);

    session.add_new(&mut prompt)?;
    session.edit(FieldEdit::Name(args.name))?;
    session.edit(FieldEdit::Model(args.model))?;
    for edit in address {
        session.edit(edit)?;
    }
    session.commit()?;

    if let Some(record) = session.current_record() {
        println!("{}", formatter.format_device(record));
    }
    Ok(())
}

/// Run the edit command
pub fn run_edit(args: EditArgs, settings: &Settings, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let mut edits = Vec::new();
    if let Some(name) = args.name {
        edits.push(FieldEdit::Name(name));
    }
    if let Some(model) = args.model {
        edits.push(FieldEdit::Model(model));
    }
    edits.extend(address_edits(&args.address));

    if edits.is_empty() {
        return Err(CliError::InvalidArgument(
            "Nothing to change: pass --name, --model, --ip or --node".to_string(),
        ));
    }

    let mut session = open_session(settings)?;
    let mut prompt = TerminalPrompt::new(false);
    select_device(&mut session, &args.target, &mut prompt)?;

    for edit in edits {
        session.edit(edit)?;
    }

    match session.commit()? {
        CommitOutcome::Unchanged => {
            println!(
                "{}",
                formatter.format_message(&format!("Device '{}' unchanged", args.target))
            );
        }
        CommitOutcome::Saved => {
            if let Some(record) = session.current_record() {
                println!("{}", formatter.format_device(record));
            }
        }
    }
    Ok(())
}

/// Run the remove command
pub fn run_remove(args: RemoveArgs, settings: &Settings, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let mut session = open_session(settings)?;
    let mut prompt = TerminalPrompt::new(args.yes);
    select_device(&mut session, &args.name, &mut prompt)?;

    let message = match session.delete(&mut prompt)? {
        DeleteOutcome::Deleted(record) => format!("Device '{}' removed", record.name),
        DeleteOutcome::Cancelled => "Removal cancelled".to_string(),
        DeleteOutcome::Discarded => "Unsaved device discarded".to_string(),
    };
    println!("{}", formatter.format_message(&message));
    Ok(())
}
