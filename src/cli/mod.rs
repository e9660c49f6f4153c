use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::application::{EntryForm, Ledger};
use crate::domain::{format_amount, Transaction, TransactionId};
use crate::io::Exporter;
use crate::storage::{JsonFileStore, SqliteStore, Store};

/// Pocketbook - Expense Tracker
#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(about = "A local-first tracker for everyday expenses and income")]
#[command(version)]
pub struct Cli {
    /// Directory holding the ledger data
    #[arg(long, env = "POCKETBOOK_DATA", default_value = ".pocketbook", global = true)]
    pub data_dir: PathBuf,

    /// Storage backend
    #[arg(long, env = "POCKETBOOK_BACKEND", value_enum, default_value_t = Backend::File, global = true)]
    pub backend: Backend,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON file per key
    File,
    /// A single SQLite database
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an expense or income
    Add {
        /// Amount (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Transaction type: expense, income
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Category: Food, Transport, Health, Entertainment, Other
        #[arg(short, long, default_value = "Food")]
        category: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction by id
    Remove {
        /// Transaction ID
        id: TransactionId,
    },

    /// List all transactions
    List,

    /// Show the running balance
    Balance,

    /// Export transactions to CSV or JSON
    Export {
        /// Output format
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive entry session reading commands from stdin
    Session,
}

impl Cli {
    fn open_ledger(&self) -> Result<Ledger<Box<dyn Store>>> {
        let store: Box<dyn Store> = match self.backend {
            Backend::File => Box::new(
                JsonFileStore::open(&self.data_dir)
                    .with_context(|| format!("Failed to open {}", self.data_dir.display()))?,
            ),
            Backend::Sqlite => {
                std::fs::create_dir_all(&self.data_dir)
                    .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;
                let path = self.data_dir.join("pocketbook.db");
                Box::new(
                    SqliteStore::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?,
                )
            }
        };
        tracing::debug!(backend = ?self.backend, dir = %self.data_dir.display(), "opening ledger");
        Ok(Ledger::open(store))
    }

    pub fn run(self) -> Result<()> {
        let mut ledger = self.open_ledger()?;

        match self.command {
            Commands::Add {
                amount,
                kind,
                category,
                description,
                date,
            } => {
                let mut form = EntryForm::default();
                form.set_kind(&kind)?;
                form.set_category(&category)?;
                if let Some(date) = date {
                    form.set_date(&date)?;
                }
                form.amount = amount;
                form.description = description.unwrap_or_default();

                let id = form.submit(&mut ledger)?;
                ensure_saved(&ledger)?;

                if let Some(tx) = ledger.get(id) {
                    println!("Recorded transaction {}", tx.id);
                    println!("{}", render_entry(tx));
                }
            }

            Commands::Remove { id } => match ledger.remove_transaction(id) {
                Some(tx) => {
                    ensure_saved(&ledger)?;
                    println!("Removed transaction {}", tx.id);
                }
                None => println!("No transaction with id {}", id),
            },

            Commands::List => {
                let stdout = std::io::stdout();
                write_list(&ledger, &mut stdout.lock())?;
            }

            Commands::Balance => {
                let totals = ledger.totals();
                println!("{}", render_balance(totals.balance()));
                println!("  Income:   ${}", format_amount(totals.income));
                println!("  Expenses: ${}", format_amount(totals.expense));
            }

            Commands::Export { format, output } => {
                run_export_command(&ledger, format, output)?;
            }

            Commands::Session => {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                let mut form = EntryForm::default();
                run_session(&mut ledger, &mut form, stdin.lock(), &mut stdout.lock())?;
                ensure_saved(&ledger)?;
            }
        }

        Ok(())
    }
}

fn ensure_saved<S: Store>(ledger: &Ledger<S>) -> Result<()> {
    if let Some(err) = ledger.last_write_error() {
        anyhow::bail!("Change applied but could not be saved: {}", err);
    }
    Ok(())
}

fn run_export_command<S: Store>(
    ledger: &Ledger<S>,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let exporter = Exporter::new(ledger);

    let count = match output {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let count = match format {
                ExportFormat::Csv => exporter.export_csv(file)?,
                ExportFormat::Json => exporter.export_json(file)?,
            };
            eprintln!("Exported {} transaction(s) to {}", count, path.display());
            count
        }
        None => {
            let stdout = std::io::stdout();
            match format {
                ExportFormat::Csv => exporter.export_csv(stdout.lock())?,
                ExportFormat::Json => exporter.export_json(stdout.lock())?,
            }
        }
    };

    tracing::debug!(count, ?format, "export finished");
    Ok(())
}

/// Two display lines for one entry, e.g.
/// `-$120.50 — Food` and `Groceries | 2024-01-02`.
pub fn render_entry(tx: &Transaction) -> String {
    format!(
        "{}${} — {}\n{} | {}",
        tx.kind.sign(),
        tx.amount,
        tx.category,
        tx.display_description(),
        tx.date.format("%Y-%m-%d")
    )
}

pub fn render_balance(balance: Decimal) -> String {
    format!("Balance: ${}", format_amount(balance))
}

fn write_list<S: Store, W: Write>(ledger: &Ledger<S>, out: &mut W) -> Result<()> {
    writeln!(out, "{}", render_balance(ledger.balance()))?;
    if ledger.is_empty() {
        writeln!(out, "No transactions yet.")?;
        return Ok(());
    }

    writeln!(out, "{}", "-".repeat(44))?;
    for tx in ledger.entries() {
        let rendered = render_entry(tx);
        let mut lines = rendered.lines();
        if let Some(first) = lines.next() {
            writeln!(out, "[{}] {}", tx.id, first)?;
        }
        for line in lines {
            writeln!(out, "    {}", line)?;
        }
    }
    Ok(())
}

const SESSION_HELP: &str = "\
Commands:
  kind <expense|income>     set the transaction type
  category <name>           Food, Transport, Health, Entertainment, Other
  date <YYYY-MM-DD>         set the date
  desc [text]               set (or clear) the description
  amount <value>            set the amount
  add [amount]              submit the form
  rm <id>                   delete a transaction
  list                      show all transactions and the balance
  balance                   show the balance
  form                      show the current form
  quit                      leave the session";

/// Drive `ledger` from line commands. Each command runs to completion before
/// the next line is read; bad input is reported and the session continues.
pub fn run_session<S, R, W>(
    ledger: &mut Ledger<S>,
    form: &mut EntryForm,
    input: R,
    out: &mut W,
) -> Result<()>
where
    S: Store,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", render_balance(ledger.balance()))?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let outcome: Result<bool> = match command {
            "quit" | "exit" => break,
            "help" => writeln!(out, "{}", SESSION_HELP).map(|_| true).map_err(Into::into),
            "kind" => form.set_kind(arg).map(|_| true).map_err(Into::into),
            "category" => form.set_category(arg).map(|_| true).map_err(Into::into),
            "date" => form.set_date(arg).map(|_| true).map_err(Into::into),
            "desc" => {
                form.description = arg.to_string();
                Ok(true)
            }
            "amount" => {
                form.amount = arg.to_string();
                Ok(true)
            }
            "add" => {
                if !arg.is_empty() {
                    form.amount = arg.to_string();
                }
                match form.submit(ledger) {
                    Ok(id) => {
                        if let Some(tx) = ledger.get(id) {
                            writeln!(out, "[{}] {}", tx.id, render_entry(tx).replace('\n', " | "))?;
                        }
                        writeln!(out, "{}", render_balance(ledger.balance()))?;
                        Ok(true)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            "rm" => match arg.parse::<TransactionId>() {
                Ok(id) => {
                    match ledger.remove_transaction(id) {
                        Some(_) => writeln!(out, "Removed {}", id)?,
                        None => writeln!(out, "No transaction with id {}", id)?,
                    }
                    writeln!(out, "{}", render_balance(ledger.balance()))?;
                    Ok(true)
                }
                Err(_) => Err(anyhow::anyhow!("Invalid id: {}", arg)),
            },
            "list" => write_list(ledger, out).map(|_| true),
            "balance" => writeln!(out, "{}", render_balance(ledger.balance()))
                .map(|_| true)
                .map_err(Into::into),
            "form" => writeln!(out, "{}", render_form(form)).map(|_| true).map_err(Into::into),
            _ => Ok(false),
        };

        match outcome {
            Ok(true) => {}
            Ok(false) => writeln!(out, "Unknown command '{}', try 'help'", command)?,
            Err(e) => writeln!(out, "error: {}", e)?,
        }
        if let Some(err) = ledger.last_write_error() {
            writeln!(out, "warning: not saved: {}", err)?;
        }
    }

    Ok(())
}

fn render_form(form: &EntryForm) -> String {
    let description = if form.description.is_empty() {
        "-"
    } else {
        form.description.as_str()
    };
    let amount = if form.amount.is_empty() {
        "-"
    } else {
        form.amount.as_str()
    };
    format!(
        "{} {} in {} on {} ({})",
        form.kind,
        amount,
        form.category,
        form.date.format("%Y-%m-%d"),
        description
    )
}
