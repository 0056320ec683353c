//! Interactive device form.
//!
//! A menu-driven stand-in for a desktop form: the device list on top, the
//! selected record's working copy below it, and one action per turn.

use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use dialoguer::{Input, Select};

use netprint_core::error::SessionError;
use netprint_core::session::{CommitOutcome, DeleteOutcome, EditSession, FieldEdit, SessionStatus};
use netprint_core::settings::Settings;
use netprint_core::store::DeviceStore;
use netprint_core::AddressKind;

use crate::commands::open_session;
use crate::error::CliError;
use crate::output::{OutputFormatter, TableOutput};
use crate::prompt::TerminalPrompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Select,
    EditName,
    EditModel,
    ToggleKind,
    EditAddress,
    Save,
    Revert,
    Add,
    Delete,
    Refresh,
    Quit,
}

impl Action {
    const ALL: [Action; 11] = [
        Action::Select,
        Action::EditName,
        Action::EditModel,
        Action::ToggleKind,
        Action::EditAddress,
        Action::Save,
        Action::Revert,
        Action::Add,
        Action::Delete,
        Action::Refresh,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::Select => "Select device",
            Action::EditName => "Edit name",
            Action::EditModel => "Edit model",
            Action::ToggleKind => "Switch address kind",
            Action::EditAddress => "Edit address",
            Action::Save => "Save",
            Action::Revert => "Revert changes",
            Action::Add => "Add device",
            Action::Delete => "Delete device",
            Action::Refresh => "Refresh from store",
            Action::Quit => "Quit",
        }
    }

    /// Actions that need a selected record.
    fn needs_selection(&self) -> bool {
        matches!(
            self,
            Action::EditName
                | Action::EditModel
                | Action::ToggleKind
                | Action::EditAddress
                | Action::Save
                | Action::Revert
                | Action::Delete
        )
    }
}

/// Run the interactive form
pub fn run_form(settings: &Settings) -> Result<(), CliError> {
    let mut session = open_session(settings)?;
    let mut prompt = TerminalPrompt::new(false);
    let output = TableOutput::new();

    loop {
        println!("\n{}", render(&session));

        let actions: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|a| session.current_key().is_some() || !a.needs_selection())
            .collect();
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();

        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;
        let action = actions[choice];

        if action == Action::Quit {
            match session.resolve_unsaved(&mut prompt) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    report(&output, e.into())?;
                    continue;
                }
            }
        }

        if let Err(e) = perform(&mut session, action, &mut prompt, &output) {
            report(&output, e)?;
        }
    }
}

/// Show a recoverable error; hand fatal ones back to the caller.
fn report(output: &TableOutput, error: CliError) -> Result<(), CliError> {
    if error.is_fatal() {
        return Err(error);
    }

    println!("{}", output.format_failure(&error));
    Ok(())
}

fn perform<S: DeviceStore>(
    session: &mut EditSession<S>,
    action: Action,
    prompt: &mut TerminalPrompt,
    output: &TableOutput,
) -> Result<(), CliError> {
    match action {
        Action::Select => {
            let entries: Vec<_> = session
                .registry()
                .entries()
                .iter()
                .map(|e| (e.key, display_label(&e.record.name)))
                .collect();
            if entries.is_empty() {
                println!("{}", output.format_message("No devices to select"));
                return Ok(());
            }

            let labels: Vec<&str> = entries.iter().map(|(_, l)| l.as_str()).collect();
            let current = session
                .current_key()
                .and_then(|k| session.registry().position(k))
                .unwrap_or(0);
            let idx = Select::new()
                .with_prompt("Device")
                .items(&labels)
                .default(current)
                .interact()?;
            session.select(entries[idx].0, prompt)?;
        }
        Action::EditName => {
            let current = working_name(session);
            let name: String = Input::new()
                .with_prompt("Name")
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            session.edit(FieldEdit::Name(name.trim().to_string()))?;
        }
        Action::EditModel => {
            let models = session.models().to_vec();
            if models.is_empty() {
                let model: String = Input::new()
                    .with_prompt("Model")
                    .allow_empty(true)
                    .interact_text()?;
                session.edit(FieldEdit::Model(model.trim().to_string()))?;
            } else {
                let current = session
                    .working_copy()
                    .and_then(|w| models.iter().position(|m| *m == w.model))
                    .unwrap_or(0);
                let idx = Select::new()
                    .with_prompt("Model")
                    .items(&models)
                    .default(current)
                    .interact()?;
                session.edit(FieldEdit::Model(models[idx].clone()))?;
            }
        }
        Action::ToggleKind => {
            let next = match session.working_copy().map(|w| w.address_kind) {
                Some(AddressKind::Ip) => AddressKind::Node,
                _ => AddressKind::Ip,
            };
            session.edit(FieldEdit::AddressKind(next))?;
        }
        Action::EditAddress => edit_address(session)?,
        Action::Save => match session.commit()? {
            CommitOutcome::Saved => println!("{}", output.format_message("Saved")),
            CommitOutcome::Unchanged => println!("{}", output.format_message("No changes to save")),
        },
        Action::Revert => session.revert()?,
        Action::Add => {
            session.add_new(prompt)?;
        }
        Action::Delete => {
            let message = match session.delete(prompt)? {
                DeleteOutcome::Deleted(record) => format!("Device '{}' deleted", record.name),
                DeleteOutcome::Discarded => "Unsaved device discarded".to_string(),
                DeleteOutcome::Cancelled => "Delete cancelled".to_string(),
            };
            println!("{}", output.format_message(&message));
        }
        Action::Refresh => session.refresh(prompt)?,
        Action::Quit => {}
    }
    Ok(())
}

fn edit_address<S: DeviceStore>(session: &mut EditSession<S>) -> Result<(), CliError> {
    let Some(working) = session.working_copy() else {
        return Err(SessionError::NoSelection.into());
    };

    match working.address_kind {
        AddressKind::Ip => {
            let text: String = Input::new()
                .with_prompt("IP address (blank segments allowed)")
                .with_initial_text(working.ip_text())
                .allow_empty(true)
                .interact_text()?;
            let segments = parse_segments(&text)?;
            for (idx, segment) in segments.into_iter().enumerate() {
                session.edit(FieldEdit::IpSegment(idx, segment))?;
            }
        }
        AddressKind::Node => {
            let node: String = Input::new()
                .with_prompt("Node name")
                .with_initial_text(working.node.clone())
                .allow_empty(true)
                .interact_text()?;
            session.edit(FieldEdit::NodeName(node.trim().to_string()))?;
        }
    }
    Ok(())
}

/// Split `a.b.c.d` into four optional segments; blank segments stay `None`.
pub fn parse_segments(text: &str) -> Result<[Option<u8>; 4], CliError> {
    let text = text.trim();
    let mut segments = [None; 4];
    if text.is_empty() {
        return Ok(segments);
    }

    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 4 {
        return Err(CliError::InvalidArgument(format!(
            "'{}' must have four dot-separated segments",
            text
        )));
    }

    for (slot, part) in segments.iter_mut().zip(parts) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let value = part
            .parse::<u8>()
            .ok()
            .filter(|_| part.len() <= 3 && part.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| {
                CliError::InvalidArgument(format!("'{}' is not a value from 0 to 255", part))
            })?;
        *slot = Some(value);
    }

    Ok(segments)
}

fn working_name<S: DeviceStore>(session: &EditSession<S>) -> String {
    session
        .working_copy()
        .map(|w| w.name.clone())
        .unwrap_or_default()
}

fn display_label(name: &str) -> String {
    if name.is_empty() {
        "(new device)".to_string()
    } else {
        name.to_string()
    }
}

fn render<S: DeviceStore>(session: &EditSession<S>) -> String {
    let registry = session.registry();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Name", "Model", "Address"]);

    for entry in registry.entries() {
        let selected = session.current_key() == Some(entry.key);
        let marker = if selected { ">" } else { "" };
        let mut name = Cell::new(display_label(&entry.record.name));
        if entry.record.is_new {
            name = name.fg(Color::Yellow);
        }
        table.add_row(vec![
            Cell::new(marker),
            name,
            Cell::new(&entry.record.model),
            Cell::new(entry.record.address.to_string()),
        ]);
    }

    let mut lines = vec![table.to_string()];

    let status = match session.status() {
        SessionStatus::Empty => "no devices".dimmed(),
        SessionStatus::Clean => "saved".green(),
        SessionStatus::Dirty => "unsaved changes".yellow(),
        SessionStatus::DirtyBlocked => "unsaved changes (invalid)".red(),
    };

    if let Some(working) = session.working_copy() {
        let overrides = session.overrides();
        let flag = |set: bool| if set { " *" } else { "" };
        lines.push(String::new());
        lines.push(format!("  Name:     {}{}", working.name, flag(overrides.name)));
        lines.push(format!("  Model:    {}{}", working.model, flag(overrides.model)));
        lines.push(format!("  Kind:     {}", working.address_kind.display_name()));
        let address = match working.address_kind {
            AddressKind::Ip => working.ip_text(),
            AddressKind::Node => working.node.clone(),
        };
        lines.push(format!("  Address:  {}{}", address, flag(overrides.address)));
    }
    lines.push(format!("  Status:   {}", status));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        assert_eq!(
            parse_segments("192.168.001.10").unwrap(),
            [Some(192), Some(168), Some(1), Some(10)]
        );
        assert_eq!(
            parse_segments("192..1.").unwrap(),
            [Some(192), None, Some(1), None]
        );
        assert_eq!(parse_segments("  ").unwrap(), [None; 4]);
        assert!(parse_segments("1.2.3").is_err());
        assert!(parse_segments("1.2.3.256").is_err());
        assert!(parse_segments("1.2.x.4").is_err());
    }

    #[test]
    fn test_quit_is_always_available() {
        assert!(!Action::Quit.needs_selection());
        assert!(!Action::Add.needs_selection());
        assert!(Action::Save.needs_selection());
    }
}
