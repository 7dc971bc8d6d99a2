//! Drives a [`DataTable`] from command-line flags and renders its current page.

use anyhow::{Result, bail};
use corral_business::table::{Align, SortDirection};
use corral_business::{DataTable, Locale, TableConfig, TableRow};
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tracing::debug;

use crate::cli::TableArgs;

/// Parsed `--sort` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub descending: bool,
}

impl SortSpec {
    /// Accepts `key`, `key:asc` and `key:desc`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (key, direction) = raw.split_once(':').unwrap_or((raw, "asc"));
        let descending = match direction.to_ascii_lowercase().as_str() {
            "asc" => false,
            "desc" => true,
            other => bail!("Unknown sort direction `{other}`, use `asc` or `desc`"),
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Sort key cannot be empty");
        }
        Ok(Self {
            key: key.to_owned(),
            descending,
        })
    }
}

/// Applies search, sort, page size and page to `table`.
///
/// Returns `false` when the requested page does not exist; the table then stays on page 1.
pub fn apply_args<R: TableRow + Clone>(table: &mut DataTable<R>, args: &TableArgs) -> Result<bool> {
    let config = TableConfig {
        page_size: args.page_size.max(1),
        ..table.config().clone()
    };
    table.set_config(config);

    if let Some(term) = args.search.as_deref() {
        table.search(term);
    }

    if let Some(raw) = args.sort.as_deref() {
        let spec = SortSpec::parse(raw)?;
        let Some(column) = table.columns().iter().find(|c| c.key.as_str() == spec.key) else {
            let keys: Vec<&str> = table.columns().iter().map(|c| c.key.as_str()).collect();
            bail!("Unknown column `{}`; columns: {}", spec.key, keys.join(", "));
        };
        if !column.sortable {
            bail!("Column `{}` cannot be sorted", spec.key);
        }
        let clicks = if spec.descending { 2 } else { 1 };
        for _ in 0..clicks {
            table.sort_by_column(&spec.key);
        }
        debug!(sort = ?table.sort(), "sorted");
    }

    if args.page <= 1 {
        return Ok(true);
    }
    Ok(table.go_to_page(args.page).is_some())
}

/// The current page as a rounded table, or `None` when there is nothing to show.
pub fn render_page<R: TableRow + Clone>(table: &DataTable<R>, locale: &Locale) -> Option<String> {
    let rows = table.page_rows();
    if rows.is_empty() {
        return None;
    }

    let columns = table.columns();
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| header_label(c.label.as_str(), table, c.key.as_str())));
    for row in rows {
        builder.push_record(columns.iter().map(|c| table.format_cell(row, c, locale)));
    }

    let mut rendered = builder.build();
    rendered.with(Style::rounded());
    for (index, column) in columns.iter().enumerate() {
        let alignment = match column.align {
            Align::Left => continue,
            Align::Center => Alignment::center(),
            Align::Right => Alignment::right(),
        };
        rendered.modify(Columns::new(index..=index), alignment);
    }
    Some(rendered.to_string())
}

fn header_label<R: TableRow + Clone>(label: &str, table: &DataTable<R>, key: &str) -> String {
    let sort = table.sort();
    if sort.column().is_some_and(|c| c.as_str() == key) {
        match sort.direction() {
            SortDirection::Ascending => return format!("{label} ↑"),
            SortDirection::Descending => return format!("{label} ↓"),
            SortDirection::None => {}
        }
    }
    label.to_owned()
}

/// "Página 2 de 3 · 11-20 de 25"
pub fn page_footer<R: TableRow + Clone>(table: &DataTable<R>) -> String {
    let range = table
        .visible_range()
        .map(|(first, last)| format!("{first}-{last}"))
        .unwrap_or_else(|| "0".to_owned());
    format!(
        "Página {} de {} · {} de {}",
        table.current_page(),
        table.total_pages().max(1),
        range,
        table.filtered_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_business::ColumnDescriptor;
    use corral_business::table::{ColumnType, Record};

    fn table(count: usize) -> DataTable<Record> {
        let columns = vec![
            ColumnDescriptor::new("name", "Nombre").sortable(),
            ColumnDescriptor::new("amount", "Monto")
                .sortable()
                .kind(ColumnType::Number)
                .align(Align::Right),
            ColumnDescriptor::new("notes", "Notas"),
        ];
        let mut table = DataTable::new(columns);
        table.set_rows(
            (1..=count)
                .map(|i| {
                    Record::new(i.to_string())
                        .with("name", format!("Gasto {i:02}"))
                        .with("amount", i as u64 * 1000)
                })
                .collect(),
        );
        table
    }

    fn args() -> TableArgs {
        TableArgs {
            page: 1,
            page_size: 10,
            ..TableArgs::default()
        }
    }

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!(
            SortSpec::parse("amount:desc").unwrap(),
            SortSpec {
                key: "amount".to_owned(),
                descending: true
            }
        );
        assert!(!SortSpec::parse("amount").unwrap().descending);
        assert!(SortSpec::parse("amount:sideways").is_err());
        assert!(SortSpec::parse(":desc").is_err());
    }

    #[test]
    fn test_apply_args_sorts_and_pages() {
        let mut table = table(25);
        let args = TableArgs {
            sort: Some("amount:desc".to_owned()),
            page: 3,
            ..args()
        };
        assert!(apply_args(&mut table, &args).unwrap());
        assert_eq!(table.current_page(), 3);
        let ids: Vec<String> = table.page_rows().iter().map(|r| r.row_id().to_string()).collect();
        assert_eq!(ids, vec!["5", "4", "3", "2", "1"]);
        assert_eq!(page_footer(&table), "Página 3 de 3 · 21-25 de 25");
    }

    #[test]
    fn test_apply_args_rejects_bad_sort_and_page() {
        let mut table = table(5);
        let unsortable = TableArgs {
            sort: Some("notes".to_owned()),
            ..args()
        };
        assert!(apply_args(&mut table, &unsortable).is_err());

        let unknown = TableArgs {
            sort: Some("missing".to_owned()),
            ..args()
        };
        assert!(apply_args(&mut table, &unknown).is_err());

        let far = TableArgs { page: 9, ..args() };
        assert!(!apply_args(&mut table, &far).unwrap());
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_render_page_formats_cells() {
        let mut table = table(2);
        table.search("02");
        let rendered = render_page(&table, &Locale::es_co()).unwrap();
        assert!(rendered.contains("Gasto 02"));
        assert!(rendered.contains("2.000"));
        assert!(!rendered.contains("Gasto 01"));

        table.search("nada");
        assert!(render_page(&table, &Locale::es_co()).is_none());
        assert_eq!(page_footer(&table), "Página 1 de 1 · 0 de 0");
    }
}
