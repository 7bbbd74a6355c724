use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use proforma::host::HostKind;
use proforma::logging::{log, obj, v_str, Domain, Level};
use proforma::panel::{Panel, PanelCommand};
use proforma::settings::SettingsStore;
use proforma::state::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    if cfg.floating {
        log(
            Level::Info,
            Domain::System,
            "floating_placeholder",
            obj(&[("view", v_str("The floating panel"))]),
        );
        return Ok(());
    }

    let store = SettingsStore::open(&cfg.db_path)?;
    let host = HostKind::from_config(&cfg).build(&cfg)?;
    let panel = Panel::new(cfg, host, store);

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(read_commands(tx));
    panel.run(rx).await;
    Ok(())
}

/// Maps stdin lines to panel commands:
/// `cost <id> <value>`, `revenue <id> <value>`, `soft <pct>`,
/// `contingency <pct>`, `currency [symbol]`, `land <value>`,
/// `earthwork <value>`, `quit`.
async fn read_commands(tx: mpsc::Sender<PanelCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Some(cmd) = parse_command(&line) else {
            log(
                Level::Warn,
                Domain::Panel,
                "unknown_command",
                obj(&[("line", v_str(line.trim()))]),
            );
            continue;
        };
        let stop = cmd == PanelCommand::Shutdown;
        if tx.send(cmd).await.is_err() || stop {
            break;
        }
    }
}

fn parse_command(line: &str) -> Option<PanelCommand> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "cost" => Some(PanelCommand::SetCostRate {
            function_id: parts.next()?.to_string(),
            input: parts.next()?.to_string(),
        }),
        "revenue" => Some(PanelCommand::SetRevenueRate {
            function_id: parts.next()?.to_string(),
            input: parts.next()?.to_string(),
        }),
        "soft" => Some(PanelCommand::SetSoftCostPercent(parts.next()?.parse().ok()?)),
        "contingency" => Some(PanelCommand::SetContingencyPercent(parts.next()?.parse().ok()?)),
        "currency" => Some(PanelCommand::SetCurrencySymbol(
            parts.next().unwrap_or("").to_string(),
        )),
        "land" => Some(PanelCommand::SetLandCost(parts.next()?.parse().ok()?)),
        "earthwork" => Some(PanelCommand::SetEarthworkCost(parts.next()?.parse().ok()?)),
        "quit" | "exit" => Some(PanelCommand::Shutdown),
        _ => None,
    }
}
