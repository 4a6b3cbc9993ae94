//! Batch identification: directory traversal with progress and streaming output.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use leafwise_core::{BatchResult, DiscoveredFile, Outcome, OutputWriter};

use super::setup::{open_output, IdentifyContext};
use crate::cli::render;

/// Where batch results go as they complete.
enum Sink {
    Text {
        target: Box<dyn Write + Send>,
        styled: bool,
        first: bool,
    },
    Json(OutputWriter<Box<dyn Write + Send>>),
}

impl Sink {
    fn write(&mut self, outcome: &Outcome) -> std::io::Result<()> {
        match self {
            Sink::Text {
                target,
                styled,
                first,
            } => {
                if !*first {
                    target.write_all(b"\n")?;
                }
                *first = false;
                target.write_all(render::render_outcome(outcome, *styled).as_bytes())?;
                target.flush()
            }
            Sink::Json(writer) => writer.write_element(outcome),
        }
    }

    fn finish(&mut self) -> std::io::Result<()> {
        match self {
            Sink::Text { target, .. } => target.flush(),
            Sink::Json(writer) => writer.finish(),
        }
    }
}

/// Identify every discovered image, streaming results as they complete.
pub async fn identify_batch(
    ctx: IdentifyContext,
    output: Option<&Path>,
    files: Vec<DiscoveredFile>,
) -> anyhow::Result<()> {
    let target = open_output(output)?;
    let mut sink = match ctx.format.core() {
        None => Sink::Text {
            target,
            styled: output.is_none() && console::Term::stdout().is_term(),
            first: true,
        },
        Some(format) => Sink::Json(OutputWriter::new(target, format, ctx.pretty)),
    };

    let progress = create_progress_bar(files.len() as u64);
    let start_time = Instant::now();

    // Results arrive on a channel so output is written from this task only
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<BatchResult>();
    let identifier = ctx.leafwise.identifier().clone();
    let paths: Vec<_> = files.into_iter().map(|f| f.path).collect();
    let handle = tokio::spawn(async move {
        identifier
            .identify_batch(&paths, move |result| {
                let _ = tx.send(result);
            })
            .await
    });

    let mut completed = 0u64;
    while let Some(result) = rx.recv().await {
        let outcome = match result {
            BatchResult::Success(report) => Some(Outcome::Report(*report)),
            BatchResult::NotAPlant(path) => {
                progress.println(format!("  No plant found in {}", path.display()));
                Some(Outcome::NotAPlant { source: Some(path) })
            }
            BatchResult::Failure(path, message) => {
                tracing::error!("Failed: {:?} - {}", path, message);
                None
            }
        };
        if let Some(outcome) = outcome {
            progress.suspend(|| sink.write(&outcome))?;
        }

        completed += 1;
        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            progress.set_message(format!("{:.2} img/sec", completed as f64 / elapsed));
        }
    }

    let (succeeded, not_plants, failed) = handle.await?;
    sink.finish()?;
    progress.finish_and_clear();

    if let Some(path) = output {
        tracing::info!("Output written to {:?}", path);
    }
    print_summary(succeeded, not_plants, failed, start_time.elapsed());

    if succeeded == 0 && failed > 0 {
        render::print_notice(&render::failure_notice());
        anyhow::bail!("All {failed} image(s) failed to identify");
    }
    Ok(())
}

/// Create a progress bar for batch identification.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after a batch.
fn print_summary(succeeded: usize, not_plants: usize, failed: usize, elapsed: Duration) {
    let total = succeeded + not_plants + failed;
    let rate = if elapsed.as_secs_f64() > 0.0 {
        total as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Identified:   {:>8}", succeeded);
    if not_plants > 0 {
        eprintln!("    Not a plant:  {:>8}", not_plants);
    }
    if failed > 0 {
        eprintln!("    Failed:       {:>8}", failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.2} img/sec", rate);
    eprintln!("  ====================================");
}
