use clap::Subcommand;

use crate::cli::utils::{format_row, output_empty_collection, output_json};
use crate::cli::{CliContext, OutputFormat};
use crate::handlers::drivers::driver_listing_query;
use crate::types::{Driver, DriverId};

#[derive(Subcommand)]
pub enum DriverCommands {
    #[command(about = "List drivers ordered by name (same read as GET /api/drivers)")]
    List,
}

pub async fn handle(cmd: DriverCommands, context: &CliContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DriverCommands::List => {
            // Unlike the HTTP endpoint, the CLI reports failures instead of printing nothing.
            let rows = context.gateway.query(&context.session, &driver_listing_query()).await?;
            let drivers = rows
                .into_iter()
                .map(serde_json::from_value::<Driver>)
                .collect::<Result<Vec<_>, _>>()?;

            if drivers.is_empty() {
                return output_empty_collection(&output_format, "drivers", "No drivers found");
            }

            match output_format {
                OutputFormat::Json => output_json(&drivers),
                OutputFormat::Text => {
                    print_table(&drivers);
                    Ok(())
                }
            }
        }
    }
}

fn print_table(drivers: &[Driver]) {
    let ids: Vec<String> = drivers.iter().map(|d| id_text(&d.id)).collect();
    let id_width = ids.iter().map(String::len).max().unwrap_or(0).max(2);
    let name_width = drivers.iter().map(|d| name_text(d).len()).max().unwrap_or(0).max(4);
    let widths = [id_width, name_width, 0];

    println!("{}", format_row(&["ID", "NAME", "PHONE"], &widths));
    for (driver, id) in drivers.iter().zip(&ids) {
        let phone = driver.phone.as_deref().unwrap_or("-");
        println!("{}", format_row(&[id.as_str(), name_text(driver), phone], &widths));
    }
}

fn name_text(driver: &Driver) -> &str {
    driver.full_name.as_deref().unwrap_or("-")
}

fn id_text(id: &DriverId) -> String {
    match id {
        DriverId::Int(n) => n.to_string(),
        DriverId::Text(s) => s.clone(),
    }
}
