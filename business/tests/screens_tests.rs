//! Screen controllers driven against a mock backend.

mod common;

use chrono::NaiveDate;
use common::{TestContext, auth_json, categories_json, cost_json, ok};
use corral_business::forms::CostForm;
use corral_business::screens::{
    CategoryListScreen, CostListScreen, DashboardScreen, LOGIN_SUCCESS, LoginScreen,
    MONTH_WINDOW, MSG_NO_DATA, MSG_NO_DOWNLOAD, MSG_REPORT_FAILED, MonthOption, ReportsScreen,
    SubmitError,
};
use corral_business::{ExportFormat, Level};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =========================================================================
// Login
// =========================================================================

#[tokio::test]
async fn test_login_success_notifies_and_clears_password() {
    let ctx = TestContext::new().await;
    ctx.mock_status("POST", "/api/auth/login/", 200, ok(auth_json()))
        .await;

    let mut screen = LoginScreen::new(ctx.services.clone());
    screen.form_mut().identifier = "mvelez".to_owned();
    screen.form_mut().password = "secreto123".to_owned();

    let user = screen.submit().await.unwrap();
    assert_eq!(user.display_name(), "María Vélez");
    assert!(screen.form().password.is_empty());
    assert!(!screen.is_loading());

    let notifications = ctx.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, Level::Success);
    assert_eq!(notifications[0].message, LOGIN_SUCCESS);
}

#[tokio::test]
async fn test_login_failure_shows_backend_message() {
    let ctx = TestContext::new().await;
    ctx.mock_status(
        "POST",
        "/api/auth/login/",
        400,
        json!({"message": "Credenciales inválidas"}),
    )
    .await;

    let mut screen = LoginScreen::new(ctx.services.clone());
    screen.form_mut().identifier = "mvelez".to_owned();
    screen.form_mut().password = "equivocada".to_owned();

    let err = screen.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Api(_)));
    assert!(screen.form().password.is_empty());
    assert!(!ctx.api().session().is_authenticated());
    assert_eq!(ctx.messages(), vec!["Credenciales inválidas".to_owned()]);
}

#[tokio::test]
async fn test_login_invalid_form_sends_nothing() {
    let ctx = TestContext::new().await;
    let mut screen = LoginScreen::new(ctx.services.clone());

    let err = screen.submit().await.unwrap_err();
    let SubmitError::Invalid(errors) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.len(), 2);
    assert!(ctx.mock_server.received_requests().await.unwrap().is_empty());
    assert!(ctx.notifications().is_empty());
}

// =========================================================================
// Categories
// =========================================================================

#[tokio::test]
async fn test_category_create_reloads_list() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    ctx.mock_categories().await;
    Mock::given(method("POST"))
        .and(path("/api/costs/categories/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(ok(json!({
            "id": 4, "code": "2.1", "name": "Vacunas", "description": "",
            "parent": 3, "level": 2, "is_movement": true
        }))))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let mut screen = CategoryListScreen::new(ctx.services.clone());
    screen.load().await.unwrap();
    assert_eq!(screen.categories().len(), 3);

    let mut form = screen.new_form();
    form.code = "2.1".to_owned();
    form.name = "Vacunas".to_owned();
    form.is_movement = true;
    form.set_parent(Some(3));
    assert_eq!(form.level(), 2);

    let saved = screen.save(&mut form).await.unwrap();
    assert_eq!(saved.id, 4);
    assert_eq!(ctx.messages(), vec!["Categoría creada exitosamente".to_owned()]);
    assert!(!screen.is_loading());
}

#[tokio::test]
async fn test_category_edit_sends_update() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    ctx.mock_categories().await;
    Mock::given(method("PUT"))
        .and(path("/api/costs/categories/2/"))
        .and(body_partial_json(json!({"name": "Concentrado premium", "parent": 1, "level": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": 2, "code": "1.1", "name": "Concentrado premium", "description": "Bultos",
            "parent": 1, "level": 2, "is_movement": true
        }))))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let mut screen = CategoryListScreen::new(ctx.services.clone());
    screen.load().await.unwrap();
    assert!(screen.edit_form(99).is_none());

    let mut form = screen.edit_form(2).unwrap();
    assert_eq!(form.editing_id(), Some(2));
    form.name = "Concentrado premium".to_owned();

    let saved = screen.save(&mut form).await.unwrap();
    assert_eq!(saved.name, "Concentrado premium");
    assert_eq!(
        ctx.messages(),
        vec!["Categoría actualizada exitosamente".to_owned()]
    );
}

#[tokio::test]
async fn test_category_load_failure_keeps_rows() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");

    let mut screen = CategoryListScreen::new(ctx.services.clone());
    Mock::given(method("GET"))
        .and(path("/api/costs/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(categories_json())))
        .up_to_n_times(1)
        .mount(&ctx.mock_server)
        .await;
    screen.load().await.unwrap();

    ctx.mock_status("GET", "/api/costs/categories/", 500, json!({}))
        .await;
    assert!(screen.load().await.is_err());

    assert_eq!(screen.categories().len(), 3);
    assert!(!screen.table().is_loading());
    assert_eq!(ctx.messages(), vec!["Error interno del servidor.".to_owned()]);
}

#[tokio::test]
async fn test_category_tree_lines_are_indented_by_depth() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    ctx.mock_get(
        "/api/costs/categories/tree/",
        ok(json!([{
            "id": 1, "code": "1", "name": "Alimentación", "parent": null, "level": 1,
            "is_movement": false,
            "subcategories": [{"id": 2, "code": "1.1", "name": "Concentrado", "parent": 1,
                               "level": 2, "is_movement": true, "subcategories": []}]
        }])),
    )
    .await;

    let mut screen = CategoryListScreen::new(ctx.services.clone());
    screen.load_tree().await.unwrap();
    let lines: Vec<(usize, &str)> = screen
        .tree_lines()
        .into_iter()
        .map(|(depth, c)| (depth, c.name.as_str()))
        .collect();
    assert_eq!(lines, vec![(0, "Alimentación"), (1, "Concentrado")]);
}

// =========================================================================
// Costs
// =========================================================================

#[tokio::test]
async fn test_cost_list_pages_through_backend() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    Mock::given(method("GET"))
        .and(path("/api/costs/costs/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [cost_json(1, 2, "1000.00"), cost_json(2, 3, "2000.00")],
            "pagination": {"count": 3, "total_pages": 2, "current_page": 1,
                           "next": "?page=2", "previous": null}
        })))
        .mount(&ctx.mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/costs/costs/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [cost_json(3, 4, "3000.00")],
            "pagination": {"count": 3, "total_pages": 2, "current_page": 2,
                           "next": null, "previous": "?page=1"}
        })))
        .mount(&ctx.mock_server)
        .await;

    let mut screen = CostListScreen::new(ctx.services.clone());
    screen.load().await.unwrap();
    assert_eq!(screen.costs().len(), 2);
    assert_eq!(screen.summary().as_deref(), Some("Mostrando 2 de 3 registros"));
    assert_eq!(screen.page_label().as_deref(), Some("Página 1 de 2"));
    assert!(screen.previous_page().await.is_none());

    screen.next_page().await.unwrap().unwrap();
    assert_eq!(screen.costs().len(), 1);
    assert_eq!(screen.filters().page, Some(2));
    assert_eq!(screen.page_label().as_deref(), Some("Página 2 de 2"));
    assert!(screen.next_page().await.is_none());
}

#[tokio::test]
async fn test_cost_form_rejects_future_date_without_request() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    let today = day(2025, 3, 20);

    let mut screen = CostListScreen::new(ctx.services.clone());
    let categories = serde_json::from_value(categories_json()).unwrap();
    let mut form = CostForm::new(categories, today);
    form.category = Some(2);
    form.date_incurred = Some(day(2025, 3, 21));
    form.set_amount("5000");
    form.description = "Bulto".to_owned();

    let err = screen.save(&mut form).await.unwrap_err();
    let SubmitError::Invalid(errors) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(
        errors.get("date_incurred").map(ToString::to_string).as_deref(),
        Some("La fecha no puede ser posterior a hoy")
    );
    assert!(ctx.mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cost_edit_sends_update() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    ctx.mock_get(
        "/api/costs/costs/",
        json!({"success": true, "data": [cost_json(1, 2, "1000.00")], "pagination": null}),
    )
    .await;
    let mut updated = cost_json(1, 2, "1500.00");
    updated["description"] = json!("Bulto de sal");
    Mock::given(method("PUT"))
        .and(path("/api/costs/costs/1/"))
        .and(body_partial_json(json!({"category": 2, "date_incurred": "2025-03-02",
                                      "description": "Bulto de sal"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(updated)))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let mut screen = CostListScreen::new(ctx.services.clone());
    screen.load().await.unwrap();
    let categories = serde_json::from_value(categories_json()).unwrap();
    let mut form = screen.edit_form(1, categories, day(2025, 3, 20)).unwrap();
    assert_eq!(form.editing_id(), Some(1));
    form.description = "Bulto de sal".to_owned();
    form.set_amount("1500");

    let saved = screen.save(&mut form).await.unwrap();
    assert_eq!(saved.amount, Decimal::from(1500));
    assert_eq!(ctx.messages(), vec!["Costo actualizado exitosamente".to_owned()]);
    assert!(!screen.is_loading());
}

#[tokio::test]
async fn test_cost_delete_notifies_and_reloads() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    Mock::given(method("DELETE"))
        .and(path("/api/costs/costs/1/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/costs/costs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "data": [], "pagination": null
        })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let mut screen = CostListScreen::new(ctx.services.clone());
    screen.delete(1).await.unwrap();
    assert_eq!(ctx.messages(), vec!["Costo eliminado exitosamente".to_owned()]);
    assert!(screen.costs().is_empty());
}

// =========================================================================
// Dashboard
// =========================================================================

async fn mock_month(ctx: &TestContext, month: &str, total: &str, count: u64) {
    Mock::given(method("GET"))
        .and(path("/api/costs/costs/total_month/"))
        .and(query_param("month", month))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!({"total": total, "count": count}))),
        )
        .mount(&ctx.mock_server)
        .await;
}

#[tokio::test]
async fn test_dashboard_computes_stats() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    mock_month(&ctx, "3", "300000", 4).await;
    mock_month(&ctx, "2", "240000", 3).await;
    ctx.mock_get(
        "/api/costs/costs/monthly_report/",
        ok(json!([
            {"category": "Sanidad", "total": "100000"},
            {"category": "Concentrado", "total": "200000"}
        ])),
    )
    .await;
    ctx.mock_get(
        "/api/costs/costs/year-to-date/",
        ok(json!({"total": "900000", "count": 12})),
    )
    .await;
    ctx.mock_categories().await;

    let mut screen = DashboardScreen::new(ctx.services.clone(), day(2025, 3, 20));
    screen.load().await.unwrap();

    let stats = screen.stats();
    assert_eq!(stats.total_month, Decimal::from(300_000));
    assert_eq!(stats.costs_count, 4);
    assert_eq!(stats.average_cost, Decimal::from(75_000));
    assert_eq!(stats.total_year, Decimal::from(900_000));
    assert_eq!(stats.categories_active, 2);
    assert_eq!(stats.max_cost, Decimal::from(200_000));
    let comparison = stats.comparison.unwrap();
    assert!(comparison.is_positive);
    assert_eq!(comparison.label(), "25.0");

    assert_eq!(screen.category_totals()[0].category, "Concentrado");
    assert_eq!(
        screen.percentage_width(Decimal::from(100_000)),
        Decimal::from(50)
    );
    assert!(ctx.notifications().is_empty());
}

#[tokio::test]
async fn test_dashboard_partial_failure_still_loads_the_rest() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    mock_month(&ctx, "3", "300000", 4).await;
    mock_month(&ctx, "2", "0", 0).await;
    ctx.mock_status("GET", "/api/costs/costs/monthly_report/", 500, json!({}))
        .await;
    ctx.mock_get(
        "/api/costs/costs/year-to-date/",
        ok(json!({"total": "900000", "count": 12})),
    )
    .await;
    ctx.mock_categories().await;

    let mut screen = DashboardScreen::new(ctx.services.clone(), day(2025, 3, 20));
    assert!(screen.load().await.is_err());

    let stats = screen.stats();
    assert_eq!(stats.total_month, Decimal::from(300_000));
    assert_eq!(stats.total_year, Decimal::from(900_000));
    assert_eq!(stats.comparison, None);
    assert!(screen.category_totals().is_empty());
    assert_eq!(ctx.messages(), vec!["Error interno del servidor.".to_owned()]);
}

#[tokio::test]
async fn test_dashboard_month_navigation() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    Mock::given(method("GET"))
        .and(path("/api/costs/costs/total_month/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok(json!({"total": "1000", "count": 1}))),
        )
        .mount(&ctx.mock_server)
        .await;
    ctx.mock_get("/api/costs/costs/monthly_report/", ok(json!([])))
        .await;
    ctx.mock_get(
        "/api/costs/costs/year-to-date/",
        ok(json!({"total": "1000", "count": 1})),
    )
    .await;
    ctx.mock_categories().await;

    let mut screen = DashboardScreen::new(ctx.services.clone(), day(2025, 3, 20));
    assert_eq!(screen.months().len(), MONTH_WINDOW);
    assert_eq!(screen.month_labels()[0], "marzo de 2025");
    assert!(!screen.has_next());
    assert!(screen.show_next_month().await.is_none());

    screen.show_previous_month().await.unwrap().unwrap();
    assert_eq!(screen.selected_index(), 1);
    assert_eq!(screen.selected_month(), MonthOption { year: 2025, month: 2 });
    assert_eq!(screen.comparison_month(), MonthOption { year: 2025, month: 1 });
    let requested: Vec<String> = ctx
        .mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/costs/costs/total_month/")
        .filter_map(|r| r.url.query().map(ToOwned::to_owned))
        .collect();
    assert_eq!(requested, vec!["year=2025&month=2", "year=2025&month=1"]);

    screen.show_next_month().await.unwrap().unwrap();
    assert_eq!(screen.selected_index(), 0);

    assert!(screen.select_month(12).await.is_none());
    assert_eq!(screen.selected_index(), 0);

    screen.select_month(11).await.unwrap().unwrap();
    assert_eq!(screen.selected_month(), MonthOption { year: 2024, month: 4 });
    assert!(!screen.has_previous());
    assert!(screen.show_previous_month().await.is_none());
    assert_eq!(screen.selected_index(), 11);
    assert!(ctx.notifications().is_empty());
}

// =========================================================================
// Reports
// =========================================================================

fn march_report() -> serde_json::Value {
    ok(json!([{
        "month": "2025-03",
        "total": "285000.00",
        "entries": [
            {"date": "2025-03-04", "description": "Bulto", "amount": "185000.00",
             "category": "Alimentación", "total": "185000.00"},
            {"date": "2025-03-12", "description": "Vacuna", "amount": "100000.00",
             "category": "Sanidad", "total": "285000.00"}
        ]
    }]))
}

#[tokio::test]
async fn test_report_generate_and_export() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    ctx.mock_get("/api/costs/reports/monthly-report/", march_report())
        .await;
    ctx.mock_get("/api/costs/reports/export-pdf/", json!("pdf"))
        .await;

    let mut screen = ReportsScreen::new(ctx.services.clone(), day(2025, 3, 20));
    screen.generate().await.unwrap();

    assert_eq!(screen.error_message(), None);
    assert_eq!(screen.total_entries(), 2);
    assert_eq!(screen.total_general(), Decimal::new(285_000, 0));
    assert_eq!(screen.month_label(&screen.reports()[0]), "marzo de 2025");
    assert_eq!(screen.table().filtered_count(), 2);

    let file = screen.export(ExportFormat::Pdf).await.unwrap();
    assert_eq!(file.filename, "reporte_gastos_2025-03-01_2025-03-31.pdf");
    assert_eq!(file.bytes, b"\"pdf\"");
}

#[tokio::test]
async fn test_report_without_data() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    ctx.mock_get("/api/costs/reports/monthly-report/", ok(json!([])))
        .await;

    let mut screen = ReportsScreen::new(ctx.services.clone(), day(2025, 3, 20));
    screen.generate().await.unwrap();
    assert_eq!(screen.error_message(), Some(MSG_NO_DATA));

    let err = screen.export(ExportFormat::Excel).await.unwrap_err();
    assert!(matches!(err, SubmitError::Unavailable(MSG_NO_DOWNLOAD)));
    assert_eq!(screen.error_message(), Some(MSG_NO_DOWNLOAD));
}

#[tokio::test]
async fn test_report_failure_keeps_previous_results() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    Mock::given(method("GET"))
        .and(path("/api/costs/reports/monthly-report/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(march_report()))
        .up_to_n_times(1)
        .mount(&ctx.mock_server)
        .await;

    let mut screen = ReportsScreen::new(ctx.services.clone(), day(2025, 3, 20));
    screen.generate().await.unwrap();

    ctx.mock_status("GET", "/api/costs/reports/monthly-report/", 500, json!({}))
        .await;
    assert!(screen.generate().await.is_err());
    assert_eq!(screen.error_message(), Some(MSG_REPORT_FAILED));
    assert_eq!(screen.total_entries(), 2);

    screen.clear();
    assert!(screen.reports().is_empty());
    assert_eq!(screen.error_message(), None);
}

#[tokio::test]
async fn test_report_export_failure_names_format() {
    let ctx = TestContext::new().await;
    ctx.set_authenticated("test_token");
    ctx.mock_get("/api/costs/reports/monthly-report/", march_report())
        .await;
    ctx.mock_status("GET", "/api/costs/reports/export-excel/", 502, json!({}))
        .await;

    let mut screen = ReportsScreen::new(ctx.services.clone(), day(2025, 3, 20));
    screen.generate().await.unwrap();
    assert!(screen.export(ExportFormat::Excel).await.is_err());
    assert_eq!(
        screen.error_message(),
        Some("Error al descargar el Excel. Por favor intenta de nuevo.")
    );
}
