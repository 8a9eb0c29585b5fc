use super::ui;
use crate::core::ExchangeRateProvider;
use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use std::collections::BTreeMap;

pub async fn run(provider: &dyn ExchangeRateProvider) -> Result<()> {
    let pb = ui::new_spinner("Fetching currency list...");
    let result = provider.currencies().await;
    pb.finish_and_clear();

    let currencies = result.context("Unable to retrieve currency list from Frankfurter API")?;
    if currencies.is_empty() {
        println!("No currencies available.");
        return Ok(());
    }

    println!(
        "\n{}",
        ui::style_text("Supported Currencies", ui::StyleType::Title)
    );
    println!("{}", currency_table(&currencies));
    Ok(())
}

fn currency_table(currencies: &BTreeMap<String, String>) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Name")]);
    for (code, name) in currencies {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }
    table
}
