//! `corral dashboard`

use anyhow::{Result, bail};
use chrono::Local;
use corral_business::screens::{DashboardScreen, MONTH_WINDOW, TrendChange};
use rust_decimal::prelude::ToPrimitive as _;
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;

const BAR_WIDTH: usize = 30;

fn trend_line(change: Option<TrendChange>, against: &str) -> String {
    match change {
        Some(change) => {
            let arrow = if change.is_positive { "▲" } else { "▼" };
            format!("{arrow} {}% vs {against}", change.label())
        }
        None => format!("Sin datos de {against}"),
    }
}

#[instrument(skip_all, name = "dashboard", fields(months_back = months_back))]
pub async fn run_dashboard(ctx: &AppContext, months_back: usize) -> Result<()> {
    if months_back >= MONTH_WINDOW {
        bail!(
            "--months-back must be below {MONTH_WINDOW}, got {months_back}"
        );
    }
    ctx.ensure_authenticated().await?;

    let mut screen = DashboardScreen::new(ctx.services().clone(), Local::now().date_naive());
    let loaded = screen.select_month(months_back).await.unwrap_or(Ok(()));
    ctx.flush_notifications();

    let locale = &ctx.services().locale;
    let stats = screen.stats();
    let out = Output::new();

    out.header(format!(
        "Resumen de {}",
        screen.selected_month().label(locale)
    ));
    out.labeled_indent("Total del mes", locale.format_currency(stats.total_month), 2);
    out.labeled_indent(
        "Variación",
        trend_line(stats.comparison, &screen.comparison_month().label(locale)),
        2,
    );
    out.labeled_indent("Total del año", locale.format_currency(stats.total_year), 2);
    out.labeled_indent("Categorías activas", stats.categories_active, 2);
    out.labeled_indent("Costos registrados", stats.costs_count, 2);
    out.labeled_indent("Costo promedio", locale.format_currency(stats.average_cost), 2);

    out.newline();
    out.subheader("Gastos por categoría");
    if screen.category_totals().is_empty() {
        out.dim("No hay gastos registrados este mes");
    }
    for row in screen.category_totals() {
        let percent = screen.percentage_width(row.total).to_f64().unwrap_or(0.0);
        out.bar(
            percent,
            BAR_WIDTH,
            format!("{} {}", row.category, locale.format_currency(row.total)),
        );
    }

    Ok(loaded?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_trend_line() {
        let up = TrendChange::between(Decimal::from(125), Decimal::from(100));
        assert_eq!(trend_line(up, "febrero de 2025"), "▲ 25.0% vs febrero de 2025");

        let down = TrendChange::between(Decimal::from(50), Decimal::from(100));
        assert_eq!(trend_line(down, "enero"), "▼ 50.0% vs enero");

        assert_eq!(trend_line(None, "enero"), "Sin datos de enero");
    }
}
