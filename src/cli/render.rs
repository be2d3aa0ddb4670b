use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use helpdesk::{
    Config, PdfRenderer, RequestId, RequestRecord, Wizard,
    handoff::save_document,
    wizard::{IssueDraft, RequesterDraft},
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// A TOML file with `[requester]` and `[issue]` tables
    input: PathBuf,

    /// Directory to save the document to, overriding the configured one
    #[arg(long, short)]
    out: Option<PathBuf>,
}

/// A request described in a file instead of interactively.
#[derive(Debug, Deserialize)]
struct RecordFile {
    id: Option<Uuid>,
    request_date: Option<NaiveDate>,
    requester: RequesterDraft,
    issue: IssueDraft,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(config)?;

        let content = std::fs::read_to_string(&self.input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", self.input.display()))?;
        let file: RecordFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", self.input.display()))?;

        let record = RequestRecord::with_id(
            file.id.map_or_else(RequestId::new, RequestId::from_uuid),
            file.request_date
                .unwrap_or_else(|| Local::now().date_naive()),
        );
        let mut wizard = Wizard::with_record(record, config.domains());

        wizard
            .submit(&file.requester)
            .map_err(|e| anyhow::anyhow!("Invalid requester: {e}"))?;
        wizard
            .submit(&file.issue)
            .map_err(|e| anyhow::anyhow!("Invalid issue: {e}"))?;
        wizard.advance()?;

        let renderer = PdfRenderer::from_config(&config);
        let ticket = wizard.begin_render()?;
        let outcome = renderer.generate(ticket.record());
        let document = wizard.finish_render(ticket, outcome)?;

        let dir = self.out.as_deref().unwrap_or(&config.output_dir);
        let path = save_document(document, dir)?;
        println!("{}", format!("Saved {}", path.display()).success());

        Ok(())
    }
}
