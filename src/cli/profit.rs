use super::ui;
use crate::core::{ProfitBreakdown, ProfitCalculator, ProfitError, ProfitRequest};
use comfy_table::Cell;
use futures::future::join_all;
use tracing::info;

pub struct ProfitRow {
    pub scheme_code: String,
    pub result: Result<ProfitBreakdown, ProfitError>,
}

/// Computes the profit for each scheme concurrently and prints a table.
pub async fn run(
    calculator: &ProfitCalculator,
    scheme_codes: &[String],
    start_date: &str,
    end_date: &str,
    capital: f64,
) -> anyhow::Result<()> {
    if scheme_codes.is_empty() {
        println!("No schemes given.");
        return Ok(());
    }
    info!(
        schemes = scheme_codes.len(),
        start_date, end_date, capital, "Calculating profit"
    );

    let rows = compute_rows(calculator, scheme_codes, start_date, end_date, capital).await;

    println!(
        "\n{}",
        ui::style_text(
            &format!("Profit from {start_date} to {end_date} on {capital:.2}"),
            ui::StyleType::Title
        )
    );
    println!("{}", render_table(&rows));

    for row in &rows {
        if let Err(e) = &row.result {
            println!(
                "{} {}",
                ui::style_text(&row.scheme_code, ui::StyleType::Subtle),
                ui::style_text(&e.to_string(), ui::StyleType::Error)
            );
        }
    }

    Ok(())
}

pub async fn compute_rows(
    calculator: &ProfitCalculator,
    scheme_codes: &[String],
    start_date: &str,
    end_date: &str,
    capital: f64,
) -> Vec<ProfitRow> {
    let pb = ui::new_progress_bar(scheme_codes.len() as u64);

    let futures = scheme_codes.iter().map(|scheme_code| {
        let pb_clone = pb.clone();
        async move {
            let request = ProfitRequest::new(scheme_code.as_str(), start_date, end_date, capital);
            let result = calculator.compute(&request).await;
            pb_clone.inc(1);
            ProfitRow {
                scheme_code: scheme_code.clone(),
                result,
            }
        }
    });

    let rows = join_all(futures).await;
    pb.finish_and_clear();
    rows
}

pub fn render_table(rows: &[ProfitRow]) -> String {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Scheme"),
        ui::header_cell("Buy Date"),
        ui::header_cell("Buy NAV"),
        ui::header_cell("Sell Date"),
        ui::header_cell("Sell NAV"),
        ui::header_cell("Units"),
        ui::header_cell("Value"),
        ui::header_cell("Net Profit"),
    ]);

    for row in rows {
        match &row.result {
            Ok(b) => {
                table.add_row(vec![
                    Cell::new(&row.scheme_code),
                    Cell::new(b.start_date.format("%d-%m-%Y")),
                    ui::number_cell(b.start_nav, 4),
                    Cell::new(b.end_date.format("%d-%m-%Y")),
                    ui::number_cell(b.end_nav, 4),
                    ui::number_cell(b.units, 4),
                    ui::number_cell(b.redemption_value, 2),
                    ui::profit_cell(b.net_profit),
                ]);
            }
            Err(_) => {
                let mut cells = vec![Cell::new(&row.scheme_code)];
                cells.extend((0..7).map(|_| ui::na_cell()));
                table.add_row(cells);
            }
        }
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NavProvider, RawNavRecord};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct SingleSchemeProvider;

    #[async_trait]
    impl NavProvider for SingleSchemeProvider {
        async fn fetch_nav_history(
            &self,
            scheme_code: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Vec<RawNavRecord> {
            if scheme_code == "119551" {
                vec![
                    RawNavRecord::new("03-04-2006", "10.00000"),
                    RawNavRecord::new("04-04-2006", "12.50000"),
                ]
            } else {
                Vec::new()
            }
        }
    }

    #[tokio::test]
    async fn test_compute_rows_keeps_order_and_errors() {
        let calculator = ProfitCalculator::new(Arc::new(SingleSchemeProvider), 10);
        let schemes = vec!["000000".to_string(), "119551".to_string()];

        let rows = compute_rows(&calculator, &schemes, "03-04-2006", "04-04-2006", 1000.0).await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].scheme_code, "000000");
        assert!(matches!(rows[0].result, Err(ProfitError::NoNavData(_))));
        assert_eq!(rows[1].scheme_code, "119551");
        assert_eq!(rows[1].result.as_ref().unwrap().net_profit, 250.0);
    }

    #[tokio::test]
    async fn test_render_table() {
        let calculator = ProfitCalculator::new(Arc::new(SingleSchemeProvider), 10);
        let schemes = vec!["119551".to_string(), "000000".to_string()];

        let rows = compute_rows(&calculator, &schemes, "03-04-2006", "04-04-2006", 1000.0).await;
        let table = render_table(&rows);

        assert!(table.contains("Net Profit"));
        assert!(table.contains("03-04-2006"));
        assert!(table.contains("250.00"));
        assert!(table.contains("N/A"));
    }
}
