use rx_core::{Event, EventPayload};
use rx_monitor::{MonitorClient, MonitorConfig};

use clap::Parser;

#[derive(Parser)]
#[command(name = "rx-monitor", about = "Tail a tenant's live inventory monitor stream")]
struct Cli {
    /// Server URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Tenant subdomain
    #[arg(long)]
    tenant: String,

    /// Print raw event JSON instead of summaries
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = MonitorConfig::new(&cli.server, &cli.tenant);
    let json = cli.json;

    let mut client =
        MonitorClient::new(config).with_callback(move |event| print_event(event, json));
    client.connect();

    tokio::signal::ctrl_c().await.ok();
    client.disconnect().await;
}

fn print_event(event: &Event, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
        return;
    }

    match &event.payload {
        EventPayload::ConnectionEstablished(info) => {
            println!("connected: {}", info.connection_id);
        }
        EventPayload::Heartbeat(heartbeat) => {
            println!(
                "heartbeat: {} connection(s), {} medicine(s)",
                heartbeat.active_connections.unwrap_or(0),
                heartbeat.medicine_count.unwrap_or(0),
            );
        }
        EventPayload::StockAlert(alert) => {
            println!(
                "stock alert: {} item(s) at or below minimum",
                alert.medicines.len()
            );
            for item in &alert.medicines {
                println!("  - {} ({}/{})", item.name, item.stock, item.min_stock);
            }
        }
        EventPayload::ExpiryAlert(alert) => {
            println!("expiry alert: {} item(s) expiring", alert.medicines.len());
            for item in &alert.medicines {
                println!("  - {} in {} day(s)", item.name, item.days_until_expiry);
            }
        }
        EventPayload::MedicineCreated(notice) => println!("medicine created: {}", notice.name),
        EventPayload::MedicineUpdated(notice) => println!("medicine updated: {}", notice.name),
        EventPayload::MedicineDeleted(notice) => println!("medicine deleted: {}", notice.name),
    }
}
