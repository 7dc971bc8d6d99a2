//! `corral categories ...`

use anyhow::{Result, bail};
use corral_business::forms::CategoryForm;
use corral_business::models::Category;
use corral_business::screens::CategoryListScreen;
use tracing::instrument;

use super::{confirm, notify_failure, print_table, prompt_if_empty};
use crate::cli::{CategoryCommand, CategoryFields};
use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "categories")]
pub async fn run_categories(ctx: &AppContext, command: CategoryCommand) -> Result<()> {
    ctx.ensure_authenticated().await?;
    let mut screen = CategoryListScreen::new(ctx.services().clone());

    match command {
        CategoryCommand::List(args) => {
            screen.load().await?;
            let locale = ctx.services().locale.clone();
            print_table(screen.table_mut(), &args, &locale, "No hay categorías registradas")
        }
        CategoryCommand::Tree => tree(&mut screen).await,
        CategoryCommand::Show { id } => {
            let category = notify_failure(ctx, ctx.api().get_category(id).await)?;
            print_category(&category);
            Ok(())
        }
        CategoryCommand::Create(fields) => {
            screen.load().await?;
            let mut form = screen.new_form();
            apply_fields(&mut form, &fields)?;
            prompt_if_empty(&mut form.code, "Código:")?;
            prompt_if_empty(&mut form.name, "Nombre:")?;
            let saved = screen.save(&mut form).await?;
            ctx.flush_notifications();
            print_category(&saved);
            Ok(())
        }
        CategoryCommand::Update { id, fields } => {
            screen.load().await?;
            let Some(mut form) = screen.edit_form(id) else {
                bail!("Category {id} not found");
            };
            apply_fields(&mut form, &fields)?;
            let saved = screen.save(&mut form).await?;
            ctx.flush_notifications();
            print_category(&saved);
            Ok(())
        }
        CategoryCommand::Delete { id, yes } => {
            if confirm(&format!("¿Eliminar la categoría {id}?"), yes)? {
                screen.delete(id).await?;
            } else {
                Output::new().dim("Cancelado");
            }
            Ok(())
        }
    }
}

async fn tree(screen: &mut CategoryListScreen) -> Result<()> {
    screen.load_tree().await?;
    let out = Output::new();
    let lines = screen.tree_lines();
    if lines.is_empty() {
        out.dim("No hay categorías registradas");
        return Ok(());
    }
    for (depth, category) in lines {
        let marker = if category.is_movement { "•" } else { "▸" };
        out.print(format!(
            "{}{marker} {} {}",
            "  ".repeat(depth),
            category.code,
            category.name
        ));
    }
    Ok(())
}

/// Copies the flags that were given onto `form`; the rest keep their current value.
fn apply_fields(form: &mut CategoryForm, fields: &CategoryFields) -> Result<()> {
    if let Some(code) = &fields.code {
        form.code.clone_from(code);
    }
    if let Some(name) = &fields.name {
        form.name.clone_from(name);
    }
    if let Some(description) = &fields.description {
        form.description.clone_from(description);
    }
    if let Some(movement) = fields.movement {
        form.is_movement = movement;
    }
    if fields.root {
        form.set_parent(None);
    } else if let Some(parent) = fields.parent {
        if !form.available_parents().iter().any(|c| c.id == parent) {
            bail!("Category {parent} cannot be used as parent");
        }
        form.set_parent(Some(parent));
    }
    Ok(())
}

fn print_category(category: &Category) {
    let out = Output::new();
    out.header(format!("{} {}", category.code, category.name));
    out.labeled_indent("ID", category.id, 2);
    out.labeled_indent("Nivel", category.level, 2);
    out.labeled_indent(
        "Padre",
        category
            .parent
            .map_or_else(|| "-".to_owned(), |p| p.to_string()),
        2,
    );
    out.labeled_indent(
        "Permite Movimiento",
        if category.is_movement { "Sí" } else { "No" },
        2,
    );
    if let Some(description) = category.description.as_deref().filter(|d| !d.is_empty()) {
        out.labeled_indent("Descripción", description, 2);
    }
}
