use std::{
    error::Error,
    path::PathBuf,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::{OffsetDateTime, UtcOffset};

use expensify_rs::{
    Expense, ExpenseFields, ExpenseId, ExpenseUpdate, SqliteDatabase, Store, UserId,
    init_logging, initialize_db, select_expense, start_add_expense, start_edit_expense,
    start_remove_expense, start_set_expenses,
};

/// Keep track of your expenses from the command line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// The ID of the user whose expenses are managed.
    #[arg(long, env = "EXPENSES_UID")]
    uid: String,

    /// File path to append debug logs to.
    #[arg(long)]
    log_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every expense.
    List,
    /// Add a new expense.
    Add {
        /// What the money was spent on.
        #[arg(long, default_value = "")]
        description: String,
        /// Free-form notes.
        #[arg(long, default_value = "")]
        note: String,
        /// The amount spent, in cents.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        amount: i64,
        /// When the money was spent, in milliseconds since the Unix epoch.
        /// Defaults to now.
        #[arg(long, allow_negative_numbers = true)]
        created_at: Option<i64>,
    },
    /// Change some fields of an existing expense.
    Edit {
        /// The ID of the expense to change.
        id: String,
        /// The new description.
        #[arg(long)]
        description: Option<String>,
        /// The new note.
        #[arg(long)]
        note: Option<String>,
        /// The new amount, in cents.
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<i64>,
        /// The new timestamp, in milliseconds since the Unix epoch.
        #[arg(long, allow_negative_numbers = true)]
        created_at: Option<i64>,
    },
    /// Remove an expense.
    Remove {
        /// The ID of the expense to remove.
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    init_logging(args.log_path.as_deref())?;

    let uid = UserId::new(&args.uid)?;

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;
    let database = SqliteDatabase::new(Arc::new(Mutex::new(connection)));

    let store = Store::new();
    start_set_expenses(&store, &database, &uid).await?;

    match args.command {
        Command::List => {}
        Command::Add {
            description,
            note,
            amount,
            created_at,
        } => {
            let fields = ExpenseFields {
                description,
                note,
                amount,
                created_at: created_at.unwrap_or_else(now_millis),
            };

            let expense = start_add_expense(&store, &database, &uid, fields).await?;
            println!("Added expense {}", expense.id);
        }
        Command::Edit {
            id,
            description,
            note,
            amount,
            created_at,
        } => {
            let id = ExpenseId::new(id);
            exit_if_missing(&store, &id);

            let updates = ExpenseUpdate {
                description,
                note,
                amount,
                created_at,
            };

            if updates.is_empty() {
                eprintln!("Nothing to change, pass at least one of the field options.");
                exit(1);
            }

            start_edit_expense(&store, &database, &uid, id.clone(), updates).await?;
            println!("Updated expense {id}");
        }
        Command::Remove { id } => {
            let id = ExpenseId::new(id);
            exit_if_missing(&store, &id);

            start_remove_expense(&store, &database, &uid, id.clone()).await?;
            println!("Removed expense {id}");
        }
    }

    print_expenses(&store.state());

    Ok(())
}

fn exit_if_missing(store: &Store, id: &ExpenseId) {
    if select_expense(&store.state(), id).is_none() {
        eprintln!("There is no expense with the ID {id}.");
        exit(1);
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

fn print_expenses(expenses: &[Expense]) {
    if expenses.is_empty() {
        println!("No expenses.");
        return;
    }

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let total: i128 = expenses.iter().map(|expense| i128::from(expense.amount)).sum();

    for expense in expenses {
        println!(
            "{}  {}  {:>12}  {}{}",
            expense.id,
            format_date(expense.created_at, offset),
            format_amount(expense.amount.into()),
            expense.description,
            if expense.note.is_empty() {
                String::new()
            } else {
                format!(" ({})", expense.note)
            }
        );
    }

    println!(
        "{} expense{} totalling {}",
        expenses.len(),
        if expenses.len() == 1 { "" } else { "s" },
        format_amount(total)
    );
}

/// Format `cents` as dollars, e.g. 109500 becomes "$1095.00".
fn format_amount(cents: i128) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}

fn format_date(millis: i64, offset: UtcOffset) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|date_time| date_time.checked_to_offset(offset))
        .map_or_else(|| millis.to_string(), |date_time| date_time.date().to_string())
}

#[cfg(test)]
mod tests {
    use time::UtcOffset;

    use super::{format_amount, format_date};

    #[test]
    fn formats_amounts_as_dollars() {
        assert_eq!(format_amount(0), "$0.00");
        assert_eq!(format_amount(195), "$1.95");
        assert_eq!(format_amount(109500), "$1095.00");
        assert_eq!(format_amount(-4505), "-$45.05");
    }

    #[test]
    fn totals_near_the_amount_limit_do_not_overflow() {
        let total: i128 = [i64::MAX, i64::MAX, 1]
            .into_iter()
            .map(i128::from)
            .sum();

        assert_eq!(format_amount(total), "$184467440737095516.15");
        assert_eq!(format_amount(i64::MIN.into()), "-$92233720368547758.08");
    }

    #[test]
    fn formats_timestamps_as_dates() {
        assert_eq!(format_date(0, UtcOffset::UTC), "1970-01-01");
        assert_eq!(format_date(345_600_000, UtcOffset::UTC), "1970-01-05");
    }

    #[test]
    fn timestamps_outside_the_calendar_fall_back_to_milliseconds() {
        let last_moment = 253_402_300_799_999;
        let offset = UtcOffset::from_hms(1, 0, 0).unwrap();

        assert_eq!(format_date(last_moment, offset), last_moment.to_string());
        assert_eq!(format_date(i64::MAX, UtcOffset::UTC), i64::MAX.to_string());
        assert_eq!(format_date(last_moment, UtcOffset::UTC), "9999-12-31");
    }
}
