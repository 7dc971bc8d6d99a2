//! `corral costs ...`

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use corral_business::Locale;
use corral_business::forms::CostForm;
use corral_business::models::{Cost, CostFilters};
use corral_business::screens::CostListScreen;
use tracing::instrument;

use super::{confirm, notify_failure, prompt_if_empty};
use crate::cli::{CostCommand, CostFields, TableArgs};
use crate::context::AppContext;
use crate::output::Output;
use crate::render::{apply_args, render_page};

#[instrument(skip_all, name = "costs")]
pub async fn run_costs(ctx: &AppContext, command: CostCommand) -> Result<()> {
    ctx.ensure_authenticated().await?;
    let mut screen = CostListScreen::new(ctx.services().clone());
    let today = Local::now().date_naive();

    match command {
        CostCommand::List {
            table,
            category,
            from,
            to,
        } => list(ctx, &mut screen, &table, filters(&table, category, from, to)).await,
        CostCommand::Show { id } => {
            let cost = notify_failure(ctx, ctx.api().get_cost(id).await)?;
            print_cost(&cost, &ctx.services().locale);
            Ok(())
        }
        CostCommand::Create(fields) => {
            let categories = notify_failure(ctx, ctx.api().list_categories().await)?;
            let mut form = CostForm::new(categories, today);
            apply_fields(&mut form, &fields);
            if form.amount().is_empty() {
                let mut raw = String::new();
                prompt_if_empty(&mut raw, "Monto:")?;
                form.set_amount(&raw);
            }
            prompt_if_empty(&mut form.description, "Descripción:")?;
            let saved = screen.save(&mut form).await?;
            ctx.flush_notifications();
            print_cost(&saved, &ctx.services().locale);
            Ok(())
        }
        CostCommand::Update { id, fields } => {
            let cost = notify_failure(ctx, ctx.api().get_cost(id).await)?;
            let categories = notify_failure(ctx, ctx.api().list_categories().await)?;
            let mut form = CostForm::edit(&cost, categories, today);
            apply_fields(&mut form, &fields);
            let saved = screen.save(&mut form).await?;
            ctx.flush_notifications();
            print_cost(&saved, &ctx.services().locale);
            Ok(())
        }
        CostCommand::Delete { id, yes } => {
            if confirm(&format!("¿Eliminar el costo {id}?"), yes)? {
                screen.delete(id).await?;
            } else {
                Output::new().dim("Cancelado");
            }
            Ok(())
        }
    }
}

/// Server-side filters; search and paging are done by the backend for costs.
fn filters(
    table: &TableArgs,
    category: Option<u64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> CostFilters {
    CostFilters {
        page_size: u32::try_from(table.page_size.max(1)).ok(),
        category,
        date_from: from,
        date_to: to,
        search: table.search.clone(),
        ..CostFilters::default()
    }
}

async fn list(
    ctx: &AppContext,
    screen: &mut CostListScreen,
    table: &TableArgs,
    filters: CostFilters,
) -> Result<()> {
    if filters
        .date_from
        .zip(filters.date_to)
        .is_some_and(|(from, to)| from > to)
    {
        bail!("--from must not be after --to");
    }
    screen.set_filters(filters);
    let page = u32::try_from(table.page.max(1)).unwrap_or(u32::MAX);
    screen.load_page(page).await?;

    // The loaded page is sorted locally; search already happened on the server.
    let local = TableArgs {
        search: None,
        page: 1,
        ..table.clone()
    };
    apply_args(screen.table_mut(), &local)?;

    let out = Output::new();
    match render_page(screen.table(), &ctx.services().locale) {
        Some(rendered) => out.print(rendered),
        None => out.dim("No hay costos registrados"),
    }
    if let Some(summary) = screen.summary() {
        out.dim(summary);
    }
    if let Some(label) = screen.page_label() {
        out.dim(label);
    }
    Ok(())
}

fn apply_fields(form: &mut CostForm, fields: &CostFields) {
    if let Some(category) = fields.category {
        form.category = Some(category);
    }
    if let Some(date) = fields.date {
        form.date_incurred = Some(date);
    }
    if let Some(amount) = &fields.amount {
        form.set_amount(amount);
    }
    if let Some(description) = &fields.description {
        form.description.clone_from(description);
    }
    if let Some(notes) = &fields.notes {
        form.notes.clone_from(notes);
    }
}

fn print_cost(cost: &Cost, locale: &Locale) {
    let out = Output::new();
    out.header(format!(
        "{} · {}",
        locale.format_date(cost.date_incurred),
        locale.format_currency(cost.amount)
    ));
    out.labeled_indent("ID", cost.id, 2);
    out.labeled_indent(
        "Categoría",
        format!("{} ({})", cost.category_name, cost.category),
        2,
    );
    out.labeled_indent("Descripción", &cost.description, 2);
    if let Some(notes) = cost.notes.as_deref().filter(|n| !n.is_empty()) {
        out.labeled_indent("Notas", notes, 2);
    }
}
