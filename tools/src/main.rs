//! arrears-runner: headless runner for the ArrearsFlow engine.
//!
//! Usage:
//!   arrears-runner --seed 12345 --accounts 24
//!   arrears-runner --seed 12345 --rules buckets.json --json
//!   arrears-runner --ipc-mode
//!
//! IPC mode reads newline-delimited JSON commands on stdin and writes
//! one JSON response per line on stdout, so a UI process can drive the
//! engine without linking it.

use anyhow::Result;
use arrears_core::{
    generator::generate_raw_accounts,
    notice::{self, DraftError, NoticeDrafter, NoticePayload},
    portfolio::Portfolio,
    reporting::PortfolioStats,
    rules::BucketTable,
    types::BucketId,
};
use chrono::Utc;
use std::env;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Summarize,
    Override {
        account_id: String,
        bucket: BucketId,
        #[serde(default = "default_performer")]
        performer: String,
    },
    Draft {
        account_id: String,
    },
    Quit,
}

fn default_performer() -> String {
    "operator".to_string()
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    account_count: usize,
    accounts: &'a [arrears_core::portfolio::Account],
    stats: PortfolioStats,
}

/// No drafting service is wired into the headless runner, so every
/// draft request exercises the fallback contract.
struct OfflineDrafter;

impl NoticeDrafter for OfflineDrafter {
    fn draft(&self, _payload: &NoticePayload) -> std::result::Result<String, DraftError> {
        Err(DraftError::Service("no drafting service configured".into()))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let accounts = parse_arg(&args, "--accounts", 24usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");
    let rules_path = args
        .windows(2)
        .find(|w| w[0] == "--rules")
        .map(|w| w[1].as_str());

    if !ipc_mode && !json_out {
        println!("ArrearsFlow — arrears-runner");
        println!("  seed:     {seed}");
        println!("  accounts: {accounts}");
        println!("  rules:    {}", rules_path.unwrap_or("standard"));
        println!();
    }

    let table = match rules_path {
        Some(path) => BucketTable::load(path)?,
        None => BucketTable::standard(),
    };

    let mut portfolio = Portfolio::new(table);
    portfolio.ingest(generate_raw_accounts(seed, accounts, Utc::now()))?;
    log::info!("seeded portfolio with {} accounts (seed={seed})", portfolio.list().len());

    if ipc_mode {
        run_ipc_loop(&mut portfolio)?;
    } else if json_out {
        println!("{}", serde_json::to_string_pretty(&portfolio.summarize())?);
    } else {
        print_summary(&portfolio);
    }

    Ok(())
}

fn run_ipc_loop(portfolio: &mut Portfolio) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                respond(&mut stdout, &serde_json::json!({ "error": e.to_string() }))?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                let state = UiState {
                    account_count: portfolio.list().len(),
                    accounts: portfolio.list(),
                    stats: portfolio.summarize(),
                };
                respond(&mut stdout, &serde_json::to_value(&state)?)?;
            }
            IpcCommand::Summarize => {
                respond(&mut stdout, &serde_json::to_value(portfolio.summarize())?)?;
            }
            IpcCommand::Override {
                account_id,
                bucket,
                performer,
            } => match portfolio.override_bucket(&account_id, bucket, &performer) {
                Ok(account) => respond(&mut stdout, &serde_json::to_value(&account)?)?,
                Err(e) => respond(&mut stdout, &serde_json::json!({ "error": e.to_string() }))?,
            },
            IpcCommand::Draft { account_id } => match portfolio.get(&account_id) {
                Ok(account) => {
                    let payload = NoticePayload::for_account(portfolio.table(), account)?;
                    let draft = notice::draft_or_fallback(&OfflineDrafter, &payload);
                    respond(
                        &mut stdout,
                        &serde_json::json!({ "payload": payload, "draft": draft }),
                    )?;
                }
                Err(e) => respond(&mut stdout, &serde_json::json!({ "error": e.to_string() }))?,
            },
        }
    }

    Ok(())
}

fn respond(stdout: &mut io::Stdout, value: &serde_json::Value) -> Result<()> {
    writeln!(stdout, "{value}")?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(portfolio: &Portfolio) {
    let stats = portfolio.summarize();

    println!("Portfolio summary");
    println!("  accounts in arrears: {}", stats.account_count);
    println!("  total arrears:       ${:.2}", stats.total_arrears);
    println!(
        "  critical exposure:   ${:.2} ({:.1}% of total)",
        stats.critical_arrears,
        stats.critical_fraction * 100.0
    );
    println!("  average DPD:         {} days", stats.average_dpd);
    println!();

    println!("Ageing histogram");
    for slice in &stats.buckets {
        let marker = if slice.is_critical { " <- default trigger" } else { "" };
        println!(
            "  {:<9} {:>3} accounts  ${:>12.2}{marker}",
            slice.name, slice.count, slice.arrears
        );
    }
    println!();

    if stats.regulatory_alerts.is_empty() {
        println!("No urgent regulatory triggers pending.");
    } else {
        println!("Regulatory alerts ({}):", stats.regulatory_alerts.len());
        for account in &stats.regulatory_alerts {
            println!(
                "  {}  {}  triggered default @ {} DPD  (${:.2} in arrears)",
                account.id, account.customer_name, account.dpd, account.arrears_amount
            );
        }
    }
}

fn parse_arg<T: FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
