use anyhow::Result;
use clap::{Parser, Subcommand};
use nanro_statement::StatementFormat;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod app;
mod auth_cmd;
mod banking;
mod config;
mod notify;
mod prompt;
mod state;
mod statement_cmd;

use app::App;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("NANRO_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "nanro", version = VERSION, about = "Nanro Bank command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ~/.nanro/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Sign in, register, sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Show the available balance
    Balance,

    /// List accounts on this profile
    Accounts,

    /// Transaction history
    Transactions {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        per_page: u32,

        /// Fetch every remaining page
        #[arg(long)]
        all: bool,
    },

    /// Send money
    Transfer {
        #[command(subcommand)]
        command: TransferCommand,
    },

    /// Airtime, data, electricity and other bills
    Bills {
        #[command(subcommand)]
        command: BillsCommand,
    },

    /// Inbox
    Notifications {
        #[command(subcommand)]
        command: NotificationsCommand,
    },

    /// Generate an account statement (pdf source, csv or excel)
    Statement {
        /// Start date, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// End date, YYYY-MM-DD (default: today)
        #[arg(long)]
        to: Option<String>,

        /// Length of the period when --from is not given
        #[arg(long, default_value_t = 30)]
        last_days: u32,

        /// pdf, csv or excel
        #[arg(long, default_value = "pdf")]
        format: StatementFormat,

        /// Output directory (default: statement.output_dir or ~/.nanro/statements)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write default config.toml if missing
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    Register,
    Logout,
    /// Show who is signed in
    Status,
}

#[derive(Subcommand, Debug)]
enum TransferCommand {
    /// Look up the name on a destination account
    Resolve {
        account_number: String,
        #[arg(long)]
        bank_code: Option<String>,
    },
    /// List saved beneficiaries
    Beneficiaries,
    Send {
        account_number: String,
        amount: f64,
        #[arg(long)]
        bank_code: Option<String>,
        #[arg(long)]
        narration: Option<String>,
        #[arg(long)]
        save_beneficiary: bool,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BillsCommand {
    Categories,
    Billers {
        category: String,
    },
    Pay {
        biller_id: String,
        customer_id: String,
        amount: f64,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum NotificationsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Read {
        id: String,
    },
    ReadAll,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nanro=info,nanro_client=info,nanro_statement=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let command = match cli.command {
        Command::Config { command } => {
            return match command {
                ConfigCommand::Init => config::init_config(),
                ConfigCommand::Show => config::show_config(),
            };
        }
        other => other,
    };

    let mut app = App::new(config::load_config()?)?;
    let mut events = app.client.subscribe();
    let result = run(&mut app, command).await;
    app.drain_session_events(&mut events);
    result
}

async fn run(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Config { .. } => Ok(()),

        Command::Auth { command } => match command {
            AuthCommand::Login { email } => auth_cmd::login(app, email).await,
            AuthCommand::Register => auth_cmd::register(app).await,
            AuthCommand::Logout => auth_cmd::logout(app).await,
            AuthCommand::Status => auth_cmd::status(app).await,
        },

        Command::Balance => banking::balance(app).await,
        Command::Accounts => banking::accounts(app).await,
        Command::Transactions {
            page,
            per_page,
            all,
        } => banking::transactions(app, page, per_page, all).await,

        Command::Transfer { command } => match command {
            TransferCommand::Resolve {
                account_number,
                bank_code,
            } => banking::resolve(app, &account_number, bank_code.as_deref()).await,
            TransferCommand::Beneficiaries => banking::beneficiaries(app).await,
            TransferCommand::Send {
                account_number,
                amount,
                bank_code,
                narration,
                save_beneficiary,
                yes,
            } => {
                banking::send(
                    app,
                    banking::SendArgs {
                        account_number,
                        amount,
                        bank_code,
                        narration,
                        save_beneficiary,
                        yes,
                    },
                )
                .await
            }
        },

        Command::Bills { command } => match command {
            BillsCommand::Categories => banking::bill_categories(app).await,
            BillsCommand::Billers { category } => banking::billers(app, &category).await,
            BillsCommand::Pay {
                biller_id,
                customer_id,
                amount,
                phone,
            } => banking::pay_bill(app, biller_id, customer_id, amount, phone).await,
        },

        Command::Notifications { command } => match command {
            NotificationsCommand::List { page } => banking::notifications(app, page).await,
            NotificationsCommand::Read { id } => banking::mark_read(app, &id).await,
            NotificationsCommand::ReadAll => banking::mark_all_read(app).await,
        },

        Command::Statement {
            from,
            to,
            last_days,
            format,
            out,
        } => {
            statement_cmd::statement(
                app,
                statement_cmd::StatementArgs {
                    from,
                    to,
                    last_days,
                    format,
                    out,
                },
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_statement_format_flag() {
        let cli = Cli::try_parse_from([
            "nanro", "statement", "--from", "2026-01-01", "--to", "2026-01-31", "--format", "excel",
        ])
        .unwrap();
        match cli.command {
            Command::Statement { format, .. } => assert_eq!(format, StatementFormat::Excel),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["nanro", "statement", "--format", "docx"]).is_err());
    }
}
