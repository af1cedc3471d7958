use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use snapdiff_driver::{config, Driver, RunOptions, RunSummary, TableDescriptor};
use snapdiff_report::{ConsoleRenderer, JsonRenderer, ReportRenderer};
use snapdiff_source::SqliteSource;

use crate::cli::{Cli, ColorChoice, OutputFormat};

/// How a run ended, as seen by the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every table was compared. Divergences, if any, were reported.
    Completed,
    /// `--fail-fast` stopped the run at a divergent table.
    Diverged,
    /// A fatal error ended the run.
    Failed,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Completed => ExitCode::SUCCESS,
            Self::Diverged => ExitCode::from(1),
            Self::Failed => ExitCode::from(2),
        }
    }
}

impl From<&RunSummary> for Outcome {
    fn from(summary: &RunSummary) -> Self {
        if summary.is_halted() {
            Self::Diverged
        } else {
            Self::Completed
        }
    }
}

pub async fn run_command(cli: Cli) -> anyhow::Result<Outcome> {
    let err_color = use_color(cli.color, std::io::stderr().is_terminal());
    let out_color = use_color(cli.color, std::io::stdout().is_terminal());
    colored::control::set_override(err_color || out_color);

    let mut renderer: Box<dyn ReportRenderer> = match cli.format {
        OutputFormat::Text => {
            Box::new(ConsoleRenderer::stdio(err_color).with_out_color(out_color))
        }
        OutputFormat::Json => Box::new(JsonRenderer::stdout()),
    };
    compare_snapshots(&cli, renderer.as_mut()).await
}

/// Whether a stream gets colour. `auto` follows the stream itself, so a
/// redirected stdout stays plain while stderr on a terminal is coloured.
fn use_color(choice: ColorChoice, is_terminal: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => is_terminal,
    }
}

/// Open both snapshots and run the descriptor list against them.
pub async fn compare_snapshots(
    cli: &Cli,
    renderer: &mut dyn ReportRenderer,
) -> anyhow::Result<Outcome> {
    let descriptors = load_descriptors(cli)?;

    let left = SqliteSource::open(&cli.left).context("cannot open left snapshot")?;
    let right = SqliteSource::open(&cli.right).context("cannot open right snapshot")?;
    tracing::info!(
        left = %cli.left.display(),
        right = %cli.right.display(),
        tables = descriptors.len(),
        "comparing snapshots"
    );

    let driver = Driver::new(
        Arc::new(left),
        Arc::new(right),
        RunOptions {
            stop_on_first_difference: cli.fail_fast,
        },
    );
    let summary = driver.run(&descriptors, renderer).await?;
    Ok(Outcome::from(&summary))
}

fn load_descriptors(cli: &Cli) -> anyhow::Result<Vec<TableDescriptor>> {
    match &cli.descriptors {
        Some(path) => config::load_descriptors(path)
            .with_context(|| format!("loading descriptors from {}", path.display())),
        None => Ok(config::default_descriptors()),
    }
}
