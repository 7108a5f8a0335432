use std::path::PathBuf;

use anyhow::Result;
use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use safeecho::{
    config::SettingsStore,
    events::UiEvent,
    ShieldApp,
};

const SAFE_SMS: &str = "Hi Grandma, are you coming to dinner on Sunday? Love, Sarah.";
const SPAM_SMS: &str =
    "URGENT: Your bank account has been compromised. Click here to reset password: http://bit.ly/scam";
const SAFE_CALLER: &str = "Sarah (Granddaughter)";
const SAFE_CALL: &str = "Hey grandma, just checking in! Are we still on for lunch?";
const SCAM_CALLER: &str = "Unknown Number";
const SCAM_CALL: &str = "Grandma, I'm in jail! Please send money now! I was in an accident.";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("SafeEcho shield starting up...");

    let settings_path = std::env::var("SAFEECHO_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("safeecho-settings.json"));
    let store = SettingsStore::new(settings_path)?;
    let settings = store.settings();
    info!("Analysis service at {}", settings.api_base_url);

    let app = ShieldApp::new(&settings);

    // Render UI events as console lines; a real frontend would paint screens
    let mut events = app.bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => render_event(&event),
                // A starved renderer skips ahead; the bus retains the newest
                // events, so keep receiving instead of going dark
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event renderer lagged; skipped {skipped} events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    app.dashboard.start_polling().await;

    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let outcome = match command {
            "" => Ok(()),
            "sms-safe" => app.messages.ingest(SAFE_SMS).await.map(|_| ()),
            "sms-scam" => app.messages.ingest(SPAM_SMS).await.map(|_| ()),
            "sms" => app.messages.ingest(rest).await.map(|_| ()),
            "sms-reset" => {
                app.messages.reset().await;
                Ok(())
            }
            "call-safe" => app.calls.start(SAFE_CALLER, SAFE_CALL, true).await.map(|_| ()),
            "call-scam" => app.calls.start(SCAM_CALLER, SCAM_CALL, false).await.map(|_| ()),
            "call" => app.calls.start(SCAM_CALLER, rest, false).await.map(|_| ()),
            "accept" => app.calls.accept().await.map(|_| ()),
            "end" => app.calls.end().await,
            "dashboard" => {
                app.dashboard.refresh().await;
                Ok(())
            }
            "clear" => app.dashboard.clear().await,
            "help" => {
                print_help();
                Ok(())
            }
            "quit" | "exit" => break,
            other => {
                println!("Unknown command '{other}' (try 'help')");
                Ok(())
            }
        };

        if let Err(e) = outcome {
            error!("{e:#}");
        }
    }

    app.calls.end().await?;
    app.dashboard.stop_polling().await;
    info!("SafeEcho shield shutting down");
    Ok(())
}

fn render_event(event: &UiEvent) {
    match event {
        UiEvent::CallStateChanged(snapshot) => {
            println!(
                "[call] {:?} {} ({})",
                snapshot.state.status, snapshot.display, snapshot.state.caller
            );
        }
        UiEvent::CallTick { display, .. } => println!("[call] {display}"),
        UiEvent::CallAnalyzing => println!("[call] analyzing caller audio..."),
        UiEvent::CallThreat { headline, .. } => {
            println!("[call] !! THREAT DETECTED: {headline}");
        }
        UiEvent::MessageReceived(bubble) => println!("[sms] {}", bubble.text),
        UiEvent::MessageFlagged { reason, .. } => {
            println!("[sms] !! flagged as scam: {reason}");
        }
        UiEvent::DashboardUpdated {
            threat_count,
            alerts,
            empty,
        } => {
            if *empty {
                println!("[caregiver] No active threats detected.");
            } else {
                println!("[caregiver] {threat_count} active threat(s):");
                for alert in alerts {
                    println!(
                        "[caregiver]   {} THREAT at {} - {}",
                        alert.alert_type.to_uppercase(),
                        alert.timestamp,
                        alert.reason
                    );
                }
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  sms-safe | sms-scam | sms <text>   simulate an incoming message");
    println!("  sms-reset                          leave the message screen (drop bubbles)");
    println!("  call-safe | call-scam | call <transcript>   simulate an incoming call");
    println!("  accept | end                       answer / hang up the current call");
    println!("  dashboard | clear                  caregiver view: refresh / clear alerts");
    println!("  help | quit");
}
