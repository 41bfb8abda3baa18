//! Rates CLI
//!
//! Command-line interface for the exchange rates API.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rust_decimal::Decimal;

use rates_client::{BoardRow, LoadTicket, RateBoard, RatesClient};
use rates_types::{CurrencyCode, CurrencyRate, DateWindow, Operation, format_date};

#[derive(Parser)]
#[command(name = "rates")]
#[command(author, version, about = "Exchange rates API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the exchange rates API
    #[arg(long, env = "RATES_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Show the rate table for a date
    Table {
        /// Date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<String>,
        /// Only show currency codes containing this text
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Convert an amount at today's rate into another currency
    Convert {
        /// Currency to convert from (EUR, USD, CZK, IDR, BRL)
        #[arg(long)]
        from: CurrencyCode,
        /// Currency to convert into
        #[arg(long, default_value = "PLN")]
        to: CurrencyCode,
        /// buy or sell
        #[arg(long, default_value = "sell")]
        operation: Operation,
        #[arg(long)]
        amount: String,
        /// Date whose rates price the target currency
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = RatesClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Table { date, filter } => {
            let mut board = new_board();
            let ticket = select(&mut board, date.as_deref())?;
            load(&mut board, &client, ticket).await?;
            board.set_filter(filter);
            print_table(&board);
        }

        Commands::Convert {
            from,
            to,
            operation,
            amount,
            date,
        } => {
            let mut board = new_board();
            let ticket = select(&mut board, date.as_deref())?;
            load(&mut board, &client, ticket).await?;

            let ctx = board.open_conversion(from)?;
            ctx.set_operation(operation);
            ctx.set_target(to)?;
            ctx.set_amount(amount);

            println!("{} {} -> {}", operation, from, to);
            println!("Multiplier: {}", ctx.multiplier_text());
            let result = ctx.result_text();
            if result.is_empty() {
                println!("Result:     -");
            } else {
                println!("Result:     {} {}", result, to);
            }
        }
    }

    Ok(())
}

fn new_board() -> RateBoard {
    let today = Utc::now().date_naive();
    RateBoard::new(DateWindow::new(DateWindow::default_floor(), today))
}

fn select(board: &mut RateBoard, date: Option<&str>) -> Result<LoadTicket> {
    let ticket = match date {
        Some(raw) => board.select_date_str(raw)?,
        None => {
            let today = board.window().as_of();
            board.select_date(today)?
        }
    };
    Ok(ticket)
}

async fn load(board: &mut RateBoard, client: &RatesClient, ticket: LoadTicket) -> Result<()> {
    match ticket.fetch(client).await {
        Ok(loaded) => {
            board.complete(&ticket, loaded);
        }
        Err(err) => {
            board.fail(&ticket, &err);
        }
    }
    if let Some(err) = board.error() {
        anyhow::bail!("Failed to load rates: {}", err);
    }
    Ok(())
}

fn print_table(board: &RateBoard) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec!["Code", "Currency", "NBP", "Purchase", "Selling"];
    if board.shows_today() {
        header.extend(["NBP today", "Purchase today", "Selling today"]);
    }
    table.set_header(header.into_iter().map(header_cell).collect::<Vec<_>>());

    for row in board.rows() {
        table.add_row(row_cells(&row, board.shows_today()));
    }

    println!("Rates for {}", format_date(board.date()));
    println!("{table}");

    if let Some(reference) = board.reference() {
        for code in reference.failed() {
            println!("{}", failed_line(code));
        }
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn row_cells(row: &BoardRow<'_>, with_today: bool) -> Vec<Cell> {
    let mut cells = vec![Cell::new(row.rate.code), Cell::new(&row.rate.currency)];
    cells.extend(quote_cells(Some(row.rate)));
    if with_today {
        cells.extend(quote_cells(row.today));
    }
    cells
}

fn quote_cells(rate: Option<&CurrencyRate>) -> [Cell; 3] {
    [
        rate_cell(rate.map(|r| r.mid())),
        rate_cell(rate.and_then(|r| r.purchase())),
        rate_cell(rate.map(|r| r.selling())),
    ]
}

fn rate_cell(value: Option<Decimal>) -> Cell {
    match value {
        Some(v) => Cell::new(fmt_rate(v)).set_alignment(CellAlignment::Right),
        None => Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
    }
}

fn fmt_rate(value: Decimal) -> String {
    value.normalize().to_string()
}

fn failed_line(code: CurrencyCode) -> String {
    format!("! Failed to fetch data for {}", code)
}
