use std::path::Path;

use dialoguer::{Confirm, Editor, Input, Select};
use helpdesk::{
    Config, PdfRenderer, Priority, Step, Wizard,
    handoff::save_document,
    render::badge_label,
    wizard::{
        Draft, Form, IssueDraft, IssueField, RequesterDraft, RequesterField, SubmitError,
    },
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Recipient of the email hand-off, overriding the configured address
    #[arg(long, value_name = "ADDRESS")]
    to: Option<String>,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(config)?;
        let renderer = PdfRenderer::from_config(&config);
        let mut wizard = Wizard::new(config.domains());

        loop {
            print_progress(wizard.step());
            match wizard.step() {
                Step::Requester => requester_step(&mut wizard)?,
                Step::Issue => issue_step(&mut wizard)?,
                Step::Review => review_step(&mut wizard)?,
                Step::Render => self.render_step(&mut wizard, &renderer, &config)?,
                Step::Confirmation => {
                    if !confirmation_step(&mut wizard)? {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn render_step(
        &self,
        wizard: &mut Wizard,
        renderer: &PdfRenderer,
        config: &Config,
    ) -> anyhow::Result<()> {
        if !wizard.is_rendered() {
            let ticket = wizard.begin_render()?;
            let outcome = renderer.generate(ticket.record());
            match wizard.finish_render(ticket, outcome) {
                Ok(document) => {
                    let path = save_document(document, &config.output_dir)?;
                    println!(
                        "{}",
                        format!("Saved {}", path.display()).success()
                    );
                }
                Err(e) => {
                    eprintln!("{}", format!("Could not generate the document: {e}").error());
                    return navigate(wizard, &["Try again", "Back to review"]);
                }
            }
        }

        let to = match self.to.as_ref().or(config.support_address.as_ref()) {
            Some(address) => address.clone(),
            None => Input::<String>::new()
                .with_prompt("IT support email address")
                .allow_empty(true)
                .interact_text()?,
        };

        let mut draft = wizard.email_draft(&to)?;
        let edit = Confirm::new()
            .with_prompt("Edit the subject and message?")
            .default(false)
            .interact()?;
        if edit {
            let subject = Input::<String>::new()
                .with_prompt("Subject")
                .with_initial_text(&draft.subject)
                .interact_text()?;
            let body = Editor::new()
                .edit(&draft.body)?
                .unwrap_or_else(|| draft.body.clone());
            draft.edit(subject, body);
        }

        match draft.mailto() {
            Ok(link) => {
                println!();
                println!("Open this link to email the request, then attach the saved document:");
                println!("  {link}");
            }
            Err(e) => eprintln!("{}", format!("Cannot prepare the email: {e}").warning()),
        }
        println!();

        let choice = Select::new()
            .items(&["Complete request", "Back to review"])
            .default(0)
            .interact()?;
        if choice == 0 {
            wizard.advance()?;
        } else {
            wizard.retreat();
        }
        Ok(())
    }
}

fn print_progress(step: Step) {
    println!();
    println!(
        "{}",
        format!(
            "Step {}/{}: {}",
            step.number(),
            Step::ALL.len(),
            step.title()
        )
        .heading()
    );
}

fn requester_step(wizard: &mut Wizard) -> anyhow::Result<()> {
    let mut form = Form::<RequesterDraft>::open(wizard);
    let departments = wizard.domains().departments().to_vec();

    fill(&mut form, wizard, &RequesterField::ALL, |form, field| {
        let current = form.get(field);
        match field {
            RequesterField::Department => choose(field.label(), &departments, current),
            _ => ask(field.label(), current),
        }
    })
}

fn issue_step(wizard: &mut Wizard) -> anyhow::Result<()> {
    let mut form = Form::<IssueDraft>::open(wizard);
    let categories = wizard.domains().categories().to_vec();
    let priorities: Vec<String> = Priority::ALL.iter().map(ToString::to_string).collect();

    fill(&mut form, wizard, &IssueField::ALL, |form, field| {
        let current = form.get(field);
        match field {
            IssueField::Category => choose(field.label(), &categories, current),
            IssueField::Priority => choose(field.label(), &priorities, current),
            _ => ask(field.label(), current),
        }
    })
}

/// Prompt for every field, then re-prompt the invalid ones until the form
/// submits.
fn fill<D: Draft>(
    form: &mut Form<D>,
    wizard: &mut Wizard,
    fields: &[D::Field],
    mut prompt: impl FnMut(&Form<D>, D::Field) -> anyhow::Result<String>,
) -> anyhow::Result<()> {
    let mut pending = fields.to_vec();
    loop {
        for field in pending {
            if let Some(message) = form.errors().get(field) {
                eprintln!("{}", message.error());
            }
            let value = prompt(form, field)?;
            form.set(field, value);
        }

        match form.submit(wizard) {
            Ok(_) => return Ok(()),
            Err(SubmitError::Invalid(errors)) => {
                eprintln!(
                    "{}",
                    format!("Please correct {} field(s)", errors.len()).warning()
                );
                pending = errors.fields().collect();
            }
            Err(e) => return Err(anyhow::anyhow!("{e}")),
        }
    }
}

fn ask(label: &str, current: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?)
}

fn choose(label: &str, options: &[String], current: &str) -> anyhow::Result<String> {
    let default = options
        .iter()
        .position(|option| option == current)
        .unwrap_or_default();
    let index = Select::new()
        .with_prompt(label)
        .items(options)
        .default(default)
        .interact()?;
    Ok(options[index].clone())
}

fn review_step(wizard: &mut Wizard) -> anyhow::Result<()> {
    let record = wizard.record();
    let requester = record.requester();
    let issue = record.issue();

    println!("{}", format!("Request #{}", record.id().prefix()).muted());
    println!();
    println!("Requester");
    for (label, value) in [
        (RequesterField::Name.label(), &requester.name),
        (RequesterField::EmployeeId.label(), &requester.employee_id),
        (RequesterField::Email.label(), &requester.email),
        (RequesterField::Department.label(), &requester.department),
        (RequesterField::Phone.label(), &requester.phone),
    ] {
        println!("  {label}: {value}");
    }
    println!();
    println!("Issue");
    println!("  {}: {}", IssueField::Category.label(), issue.category);
    println!(
        "  {}: {} ({})",
        IssueField::Priority.label(),
        issue.priority,
        badge_label(issue.priority)
    );
    println!(
        "  Location: floor {}, office {}",
        issue.location.floor, issue.location.office_number
    );
    println!("  {}:", IssueField::Description.label());
    for line in issue.description.lines() {
        println!("    {line}");
    }
    println!();

    navigate(wizard, &["Generate document", "Back to issue details"])
}

/// Offer to continue or go back a step.
fn navigate(wizard: &mut Wizard, options: &[&str; 2]) -> anyhow::Result<()> {
    let choice = Select::new().items(options).default(0).interact()?;
    if choice == 0 {
        if wizard.step() == Step::Review {
            wizard.advance()?;
        }
    } else {
        wizard.retreat();
    }
    Ok(())
}

fn confirmation_step(wizard: &mut Wizard) -> anyhow::Result<bool> {
    println!(
        "{}",
        format!(
            "Request #{} has been prepared for IT support.",
            wizard.record().id().prefix()
        )
        .success()
    );

    let again = Confirm::new()
        .with_prompt("Submit another request?")
        .default(false)
        .interact()?;
    if again {
        wizard.reset();
    }
    Ok(again)
}
