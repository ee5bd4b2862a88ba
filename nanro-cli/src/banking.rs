//! Balance, history, transfers, bills and notifications.

use anyhow::{Result, bail};
use nanro_core::state::{
    AccountAction, BillsAction, NotificationAction, TransactionAction, TransferAction,
};
use nanro_client::MAX_PAGES;
use nanro_core::state::TransactionState;
use nanro_core::{BillPaymentRequest, Transaction, TransferRequest};
use nanro_statement::format_money;

use crate::app::App;
use crate::prompt::{confirm, prompt_secret};

fn money(app: &App, amount: f64) -> String {
    format_money(&app.config.statement.currency_symbol, amount)
}

pub async fn balance(app: &mut App) -> Result<()> {
    let id = app.request_id();
    app.state.dispatch(AccountAction::BalanceRequested(id));
    match app.client.balance().await {
        Ok(balance) => app.state.dispatch(AccountAction::BalanceLoaded(id, balance)),
        Err(err) => {
            app.state.dispatch(AccountAction::BalanceFailed(id, err.to_string()));
            return Err(err.into());
        }
    }

    if let Some(balance) = &app.state.account.balance {
        if let Some(number) = &balance.account_number {
            println!("Account:   {number}");
        }
        println!("Available: {}", money(app, balance.available_balance));
        if let Some(ledger) = balance.ledger_balance {
            println!("Ledger:    {}", money(app, ledger));
        }
    }
    Ok(())
}

pub async fn accounts(app: &mut App) -> Result<()> {
    let id = app.request_id();
    app.state.dispatch(AccountAction::AccountsRequested(id));
    match app.client.accounts().await {
        Ok(list) => app.state.dispatch(AccountAction::AccountsLoaded(id, list)),
        Err(err) => {
            app.state.dispatch(AccountAction::AccountsFailed(id, err.to_string()));
            return Err(err.into());
        }
    }

    if app.state.account.accounts.is_empty() {
        println!("No accounts.");
    }
    for acct in &app.state.account.accounts {
        println!(
            "{}  {:<24} {:<10} {}",
            acct.account_number,
            acct.account_name,
            acct.account_type.as_deref().unwrap_or("-"),
            money(app, acct.balance)
        );
    }
    Ok(())
}

/// Fetch history pages into the transaction store. With `all`, keep going
/// until the server reports no more pages, stops advancing, or
/// [`MAX_PAGES`] have been fetched.
pub async fn transactions(app: &mut App, page: u32, per_page: u32, all: bool) -> Result<()> {
    let mut page = page.max(1);
    let mut fetched = 0;
    loop {
        let id = app.request_id();
        app.state.dispatch(TransactionAction::PageRequested(id));
        match app.client.transactions(page, per_page).await {
            Ok(loaded) => app.state.dispatch(TransactionAction::PageLoaded(id, loaded)),
            Err(err) => {
                app.state.dispatch(TransactionAction::PageFailed(id, err.to_string()));
                return Err(err.into());
            }
        }
        fetched += 1;
        if !all || !keep_paging(&app.state.transactions, page, fetched) {
            break;
        }
        page = app.state.transactions.next_page();
    }

    let txns = &app.state.transactions;
    if txns.items.is_empty() {
        println!("No transactions.");
        return Ok(());
    }
    for t in &txns.items {
        print_transaction(app, t);
    }
    if txns.has_more {
        println!(
            "\nMore available: nanro transactions --page {}",
            txns.next_page()
        );
    }
    Ok(())
}

fn keep_paging(state: &TransactionState, requested: u32, fetched: u32) -> bool {
    state.has_more && fetched < MAX_PAGES && state.next_page() > requested
}

fn print_transaction(app: &App, t: &Transaction) {
    let sign = if t.kind.counts_as_credit() {
        "+"
    } else if t.kind.counts_as_debit() {
        "-"
    } else {
        " "
    };
    println!(
        "{:<20} {:<9} {}{:>14}  {:<14} {}",
        t.created_at,
        t.kind.label(),
        sign,
        money(app, t.amount),
        t.reference,
        t.description
    );
}

pub async fn resolve(app: &mut App, account_number: &str, bank_code: Option<&str>) -> Result<()> {
    app.state.dispatch(TransferAction::ResolveStarted);
    match app.client.resolve_account(account_number, bank_code).await {
        Ok(account) => {
            println!(
                "{} ({}{})",
                account.account_name,
                account.account_number,
                account
                    .bank_name
                    .as_deref()
                    .map(|b| format!(", {b}"))
                    .unwrap_or_default()
            );
            app.state.dispatch(TransferAction::Resolved(account));
            Ok(())
        }
        Err(err) => {
            app.state.dispatch(TransferAction::ResolveFailed(err.to_string()));
            Err(err.into())
        }
    }
}

pub async fn beneficiaries(app: &mut App) -> Result<()> {
    let list = app.client.beneficiaries().await?;
    app.state.dispatch(TransferAction::BeneficiariesLoaded(list));
    if app.state.transfer.beneficiaries.is_empty() {
        println!("No saved beneficiaries.");
    }
    for b in &app.state.transfer.beneficiaries {
        println!(
            "{}  {:<24} {}",
            b.account_number,
            b.account_name,
            b.bank_name.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

pub struct SendArgs {
    pub account_number: String,
    pub amount: f64,
    pub bank_code: Option<String>,
    pub narration: Option<String>,
    pub save_beneficiary: bool,
    pub yes: bool,
}

pub async fn send(app: &mut App, args: SendArgs) -> Result<()> {
    if !(args.amount.is_finite() && args.amount > 0.0) {
        bail!("amount must be greater than zero");
    }

    resolve(app, &args.account_number, args.bank_code.as_deref()).await?;
    let recipient = app
        .state
        .transfer
        .recipient
        .as_ref()
        .map(|r| r.account_name.clone())
        .unwrap_or_default();

    if !args.yes
        && !confirm(&format!("Send {} to {}?", money(app, args.amount), recipient))?
    {
        app.state.dispatch(TransferAction::Reset);
        println!("Cancelled.");
        return Ok(());
    }

    let pin = prompt_secret("Transaction PIN")?;
    let request = TransferRequest {
        recipient_account_number: args.account_number,
        bank_code: args.bank_code,
        amount: args.amount,
        narration: args.narration,
        pin,
        save_beneficiary: args.save_beneficiary,
    };

    app.state.dispatch(TransferAction::SubmitStarted);
    match app.client.transfer(&request).await {
        Ok(receipt) => {
            println!("Sent {} to {}", money(app, receipt.amount), recipient);
            println!("Reference: {}", receipt.reference);
            if receipt.fee > 0.0 {
                println!("Fee: {}", money(app, receipt.fee));
            }
            if let Some(balance) = receipt.balance_after {
                println!("New balance: {}", money(app, balance));
            }
            app.state.dispatch(TransferAction::Succeeded(receipt));
            Ok(())
        }
        Err(err) => {
            app.state.dispatch(TransferAction::Failed(err.to_string()));
            Err(err.into())
        }
    }
}

pub async fn bill_categories(app: &mut App) -> Result<()> {
    match app.client.bill_categories().await {
        Ok(categories) => app.state.dispatch(BillsAction::CategoriesLoaded(categories)),
        Err(err) => {
            app.state.dispatch(BillsAction::LoadFailed(err.to_string()));
            return Err(err.into());
        }
    }
    for c in &app.state.bills.categories {
        println!("{:<12} {}", c.id, c.name);
    }
    Ok(())
}

pub async fn billers(app: &mut App, category: &str) -> Result<()> {
    match app.client.billers(category).await {
        Ok(billers) => app.state.dispatch(BillsAction::BillersLoaded {
            category: category.to_string(),
            billers,
        }),
        Err(err) => {
            app.state.dispatch(BillsAction::LoadFailed(err.to_string()));
            return Err(err.into());
        }
    }
    let list = app.state.bills.billers_for(category);
    if list.is_empty() {
        println!("No billers in {category}.");
    }
    for b in list {
        let fee = if b.fee > 0.0 {
            format!(" (fee {})", money(app, b.fee))
        } else {
            String::new()
        };
        println!("{:<12} {}{}", b.id, b.name, fee);
    }
    Ok(())
}

pub async fn pay_bill(
    app: &mut App,
    biller_id: String,
    customer_id: String,
    amount: f64,
    phone: Option<String>,
) -> Result<()> {
    if !(amount.is_finite() && amount > 0.0) {
        bail!("amount must be greater than zero");
    }
    let pin = prompt_secret("Transaction PIN")?;
    let request = BillPaymentRequest {
        biller_id,
        customer_id,
        amount,
        pin,
        phone,
    };

    app.state.dispatch(BillsAction::PaymentStarted);
    match app.client.pay_bill(&request).await {
        Ok(receipt) => {
            println!("Paid {}. Reference: {}", money(app, receipt.amount), receipt.reference);
            if let Some(token) = &receipt.token {
                println!("Token: {token}");
            }
            app.state.dispatch(BillsAction::PaymentSucceeded(receipt));
            Ok(())
        }
        Err(err) => {
            app.state.dispatch(BillsAction::PaymentFailed(err.to_string()));
            Err(err.into())
        }
    }
}

pub async fn notifications(app: &mut App, page: u32) -> Result<()> {
    app.state.dispatch(NotificationAction::FetchStarted);
    match app.client.notifications(page.max(1)).await {
        Ok(loaded) => app.state.dispatch(NotificationAction::Loaded(loaded.items)),
        Err(err) => {
            app.state.dispatch(NotificationAction::FetchFailed(err.to_string()));
            return Err(err.into());
        }
    }

    let state = &app.state.notifications;
    println!("{} unread\n", state.unread_count);
    for n in &state.items {
        let marker = if n.read { " " } else { "*" };
        println!(
            "{marker} [{}] {}  {}",
            n.id,
            n.title,
            n.created_at.as_deref().unwrap_or("")
        );
        if !n.body.is_empty() {
            println!("      {}", n.body);
        }
    }
    Ok(())
}

pub async fn mark_read(app: &mut App, id: &str) -> Result<()> {
    app.client.mark_notification_read(id).await?;
    app.state.dispatch(NotificationAction::MarkedRead(id.to_string()));
    println!("Marked {id} as read.");
    Ok(())
}

pub async fn mark_all_read(app: &mut App) -> Result<()> {
    app.client.mark_all_notifications_read().await?;
    app.state.dispatch(NotificationAction::MarkedAllRead);
    println!("All notifications marked as read.");
    Ok(())
}
