use std::str::FromStr;

use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::cli::utils::{output_empty_collection, output_json};
use crate::cli::{CliContext, OutputFormat};
use crate::gateway::{Gateway, Session};
use crate::query::{QueryOrder, SortDirection, TableQuery};

pub const TABLE: &str = "transactions";
/// Rows per request; kept under the backend's default response cap
pub const DEFAULT_PAGE_SIZE: usize = 1000;
/// Paging needs a stable order; used when the caller gives none
const FALLBACK_ORDER_COLUMN: &str = "id";

#[derive(Subcommand)]
pub enum TransactionCommands {
    #[command(about = "Count, total and preview transactions of one type")]
    Summary {
        #[arg(long = "type", help = "Transaction type to filter on (matches the `type` column)")]
        kind: String,
        #[arg(long, default_value = "amount", help = "Numeric column to total")]
        column: String,
        #[arg(long, default_value_t = 10, help = "Number of rows to print")]
        preview: usize,
        #[arg(long, help = "Order rows, e.g. \"created_at desc\" (default: id asc)")]
        order: Option<String>,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, help = "Rows fetched per request")]
        page_size: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub kind: String,
    pub column: String,
    pub count: usize,
    pub total: Decimal,
    /// Rows whose column held something that is not a number
    pub skipped: usize,
    pub preview: Vec<Value>,
}

/// Fold rows into a summary. Null or missing values count as zero; other
/// non-numeric values are skipped and counted.
pub fn summarize(kind: &str, column: &str, rows: Vec<Value>, preview: usize) -> TransactionSummary {
    let mut total = Decimal::ZERO;
    let mut skipped = 0;

    for row in &rows {
        match row.get(column) {
            None | Some(Value::Null) => {}
            Some(value) => match to_decimal(value) {
                Some(amount) => total += amount,
                None => skipped += 1,
            },
        }
    }

    let count = rows.len();
    TransactionSummary {
        kind: kind.to_string(),
        column: column.to_string(),
        count,
        total,
        skipped,
        preview: rows.into_iter().take(preview).collect(),
    }
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Read every transaction of `kind`, page by page, and summarize it.
///
/// Pages are requested with `limit`/`offset` until one comes back short, so the
/// backend's per-response row cap never truncates the count or the total.
pub async fn fetch_summary(
    gateway: &dyn Gateway,
    session: &Session,
    kind: &str,
    column: &str,
    preview: usize,
    order: Option<&str>,
    page_size: usize,
) -> anyhow::Result<TransactionSummary> {
    let mut query = TableQuery::from(TABLE).eq("type", kind);
    query = match order {
        Some(order) => query.with_order(QueryOrder::parse(order)?),
        None => query.order_by(FALLBACK_ORDER_COLUMN, SortDirection::Asc),
    };

    let page_size = page_size.max(1);
    let mut rows = Vec::new();
    loop {
        let page = query.clone().limit(page_size).offset(rows.len());
        let batch = gateway.query(session, &page).await?;
        let fetched = batch.len();
        rows.extend(batch);
        tracing::debug!("Fetched {} {} rows of type {} ({} so far)", fetched, TABLE, kind, rows.len());
        if fetched < page_size {
            break;
        }
    }

    Ok(summarize(kind, column, rows, preview))
}

pub async fn handle(
    cmd: TransactionCommands,
    context: &CliContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        TransactionCommands::Summary { kind, column, preview, order, page_size } => {
            let summary = fetch_summary(
                context.gateway.as_ref(),
                &context.session,
                &kind,
                &column,
                preview,
                order.as_deref(),
                page_size,
            )
            .await?;

            match output_format {
                OutputFormat::Json => output_json(&summary),
                OutputFormat::Text => {
                    println!("Transactions of type '{}': {}", summary.kind, summary.count);
                    println!("Sum of {}: {}", summary.column, summary.total);
                    if summary.skipped > 0 {
                        println!("Skipped {} rows with non-numeric {}", summary.skipped, summary.column);
                    }
                    if summary.preview.is_empty() {
                        return output_empty_collection(&output_format, TABLE, "No rows to show");
                    }
                    println!("First {} rows:", summary.preview.len());
                    for row in &summary.preview {
                        println!("{}", serde_json::to_string(row)?);
                    }
                    Ok(())
                }
            }
        }
    }
}
