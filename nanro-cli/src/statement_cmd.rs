use anyhow::{Context, Result};
use chrono::Utc;
use nanro_statement::{
    AccountInfo, StatementFormat, StatementOutcome, StatementPeriod, StatementService,
};
use std::path::PathBuf;

use crate::app::App;

pub struct StatementArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub last_days: u32,
    pub format: StatementFormat,
    pub out: Option<PathBuf>,
}

fn resolve_period(args: &StatementArgs) -> Result<StatementPeriod> {
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    match (&args.from, &args.to) {
        (Some(from), to) => Ok(StatementPeriod::parse(from, to.as_deref().unwrap_or(&today))?),
        (None, Some(to)) => {
            let end = StatementPeriod::parse(to, to)?.end;
            Ok(StatementPeriod::last_days(args.last_days, end)?)
        }
        (None, None) => Ok(StatementPeriod::last_days(
            args.last_days,
            Utc::now().date_naive(),
        )?),
    }
}

async fn account_info(app: &App) -> Result<AccountInfo> {
    let user = match app.client.store().user().await? {
        Some(user) => user,
        None => app.client.profile().await.context("load profile for statement header")?,
    };
    let mut info = AccountInfo::from_user(&user)
        .with_currency_symbol(app.config.statement.currency_symbol.clone())
        .with_timezone(app.config.timezone()?);
    if info.account_number.is_empty() {
        if let Ok(balance) = app.client.balance().await {
            info.account_number = balance.account_number.unwrap_or_default();
        }
    }
    Ok(info)
}

pub async fn statement(app: &mut App, args: StatementArgs) -> Result<()> {
    let period = resolve_period(&args)?;
    let info = account_info(app).await?;
    let out_dir = match &args.out {
        Some(dir) => dir.clone(),
        None => app.config.output_dir()?,
    };

    let service = StatementService::new(app.client.clone(), info);
    match service.generate(&period, args.format).await? {
        StatementOutcome::NoTransactions(period) => {
            println!("No transactions between {}.", period.label());
        }
        StatementOutcome::Ready(statement) => {
            let path = statement
                .save(&out_dir)
                .await
                .context("save statement")?;
            let s = &statement.summary;
            let symbol = &app.config.statement.currency_symbol;
            println!("Statement for {}", period.label());
            println!("  Transactions:  {}", s.transaction_count);
            println!("  Total credits: {}", nanro_statement::format_money(symbol, s.total_credits));
            println!("  Total debits:  {}", nanro_statement::format_money(symbol, s.total_debits));
            println!("  Net change:    {}", nanro_statement::format_money(symbol, s.net_change));
            println!("Saved {} ({})", path.display(), statement.format.mime_type());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn args(from: Option<&str>, to: Option<&str>) -> StatementArgs {
        StatementArgs {
            from: from.map(String::from),
            to: to.map(String::from),
            last_days: 30,
            format: StatementFormat::Pdf,
            out: None,
        }
    }

    #[test]
    fn test_explicit_range() {
        let p = resolve_period(&args(Some("2026-01-01"), Some("2026-01-31"))).unwrap();
        assert_eq!(p.start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(p.days(), 31);
    }

    #[test]
    fn test_to_only_counts_back() {
        let p = resolve_period(&args(None, Some("2026-03-30"))).unwrap();
        assert_eq!(p.start, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn test_huge_last_days_is_an_error() {
        let mut a = args(None, Some("2026-03-30"));
        a.last_days = u32::MAX;
        assert!(resolve_period(&a).is_err());
    }

    #[test]
    fn test_reversed_range_is_an_error() {
        assert!(resolve_period(&args(Some("2026-02-01"), Some("2026-01-01"))).is_err());
    }
}
