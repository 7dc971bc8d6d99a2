//! `corral report [export]`

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::Local;
use corral_business::screens::{ExportFile, ReportsScreen};
use tracing::{info, instrument};

use super::{Reported, print_table};
use crate::cli::{ReportAction, ReportArgs};
use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "report")]
pub async fn run_report(ctx: &AppContext, args: ReportArgs) -> Result<()> {
    ctx.ensure_authenticated().await?;

    let mut screen = ReportsScreen::new(ctx.services().clone(), Local::now().date_naive());
    let range = screen.range_mut();
    if args.from.is_some() {
        range.start = args.from;
    }
    if args.to.is_some() {
        range.end = args.to;
    }

    let generated = screen.generate().await;
    ctx.flush_notifications();
    if generated.is_err() {
        return Err(shown(&screen).into());
    }

    match args.action {
        None => print_report(ctx, &mut screen, &args),
        Some(ReportAction::Export { format, output }) => {
            let exported = screen.export(format.into()).await;
            ctx.flush_notifications();
            match exported {
                Ok(file) => {
                    let path = write_export(&output, &file)?;
                    Output::new().success(format!("Reporte guardado en {}", path.display()));
                    Ok(())
                }
                Err(_) => Err(shown(&screen).into()),
            }
        }
    }
}

/// Prints the screen's error banner and marks the failure as shown.
fn shown(screen: &ReportsScreen) -> Reported {
    if let Some(message) = screen.error_message() {
        Output::stderr().error(message);
    }
    Reported
}

fn print_report(ctx: &AppContext, screen: &mut ReportsScreen, args: &ReportArgs) -> Result<()> {
    let out = Output::new();
    if let Some(message) = screen.error_message() {
        out.warning(message);
        return Ok(());
    }

    let locale = ctx.services().locale.clone();
    out.header("Reporte de gastos");
    for report in screen.reports() {
        out.labeled_indent(
            screen.month_label(report),
            format!(
                "{} ({} movimientos)",
                locale.format_currency(report.total),
                report.entries.len()
            ),
            2,
        );
    }
    out.labeled_indent(
        "Total general",
        format!(
            "{} ({} movimientos)",
            locale.format_currency(screen.total_general()),
            screen.total_entries()
        ),
        2,
    );
    out.newline();
    print_table(
        screen.table_mut(),
        &args.table,
        &locale,
        "No hay movimientos en el período",
    )
}

/// Writes `file` into `dir`, creating the directory when needed.
fn write_export(dir: &Path, file: &ExportFile) -> Result<std::path::PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join(&file.filename);
    fs::write(&path, &file.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = file.bytes.len(), "report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_export_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reportes");
        let file = ExportFile {
            filename: "reporte_gastos_2025-03-01_2025-03-31.pdf".to_owned(),
            bytes: b"%PDF-1.4".to_vec(),
        };
        let path = write_export(&target, &file).unwrap();
        assert_eq!(path, target.join(&file.filename));
        assert_eq!(fs::read(path).unwrap(), b"%PDF-1.4");
    }
}
