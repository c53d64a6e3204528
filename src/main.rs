use chrono::{Days, Local};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{error, info, Instrument};

use arrival_board::app_system::{setup_tracing, BoardSystem};
use arrival_board::backend::{Backend, MemoryBackend, RestBackend};
use arrival_board::board::display::{admin_status_label, arrival_label, count_label, public_status_label};
use arrival_board::board::{BoardSnapshot, FormField, Notice, QrCard};
use arrival_board::clients::Dashboard;
use arrival_board::config::Config;
use arrival_board::domain::{Customer, OrderInsert};
use arrival_board::error::BoardError;
use arrival_board::filter::{normalize_query, OrderFilter};

const DEMO_EMAIL: &str = "admin@example.com";
const DEMO_PASSWORD: &str = "admin";

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::load().map_err(|e| e.to_string())?;
    let query = std::env::args().nth(1);

    match config.backend {
        Some(backend_config) => {
            info!(url = %backend_config.url, "Starting board against hosted backend");
            let backend = RestBackend::new(&backend_config)
                .await
                .map_err(|e| e.to_string())?;
            let system = BoardSystem::new(backend);
            show_public_board(&system, query.as_deref()).await;
            system.shutdown().await.map_err(|e| e.to_string())
        }
        None => {
            info!("Starting board against seeded in-memory backend");
            let system = BoardSystem::in_memory(|backend| backend.with_account(DEMO_EMAIL, DEMO_PASSWORD));
            seed(system.dashboard.backend()).await?;
            show_public_board(&system, query.as_deref()).await;
            run_admin_demo(&system).await;
            system.shutdown().await.map_err(|e| e.to_string())
        }
    }
}

async fn seed(backend: &MemoryBackend) -> Result<(), String> {
    let today = Local::now().date_naive();
    let rows = [
        ("NAT-1001", Customer::Natura, 1, 4, 12),
        ("AVN-2001", Customer::Avon, 2, 1, 3),
        ("NAT-1002", Customer::Natura, 5, 2, 7),
    ];
    let count = rows.len();
    for (identifier, customer, days_out, order_count, volume_count) in rows {
        let row = OrderInsert {
            identifier: identifier.to_string(),
            customer,
            expected_arrival: today + Days::new(days_out),
            order_count,
            volume_count,
            arrived: None,
        };
        backend.insert_order(row).await.map_err(|e| e.to_string())?;
    }
    info!(rows = count, "Seeded demo orders");
    Ok(())
}

async fn show_public_board<B: Backend>(system: &BoardSystem<B>, query: Option<&str>) {
    let dashboard = &system.dashboard;
    let span = tracing::info_span!("public_board");
    async {
        match dashboard.start().await {
            Ok(view) => info!(?view, "Board ready"),
            Err(e) => error!(error = %e, "Board started with errors"),
        }
        if let Some(query) = query {
            println!("Search: {}", normalize_query(query));
            if let Err(e) = dashboard.search(query).await {
                error!(error = %e, "Search failed");
            }
        }
        match dashboard.snapshot().await {
            Ok(snapshot) => print_public(&snapshot),
            Err(e) => error!(error = %e, "Snapshot failed"),
        }
        if let Some(order) = dashboard.snapshot().await.ok().and_then(|s| s.visible().first().cloned()) {
            match dashboard.show_qr(&order.id).await {
                Ok(card) => println!("QR for {}: {}px, level {:?}", card.payload, card.size, card.level),
                Err(e) => error!(error = %e, "QR failed"),
            }
            if let Err(e) = dashboard.close_qr().await {
                error!(error = %e, "Closing QR failed");
            }
        }
    }
    .instrument(span)
    .await;
}

/// Sign in, toggle one order, add one through the form, delete it again,
/// then sign out.
async fn run_admin_demo<B: Backend>(system: &BoardSystem<B>) {
    let dashboard = &system.dashboard;
    let mut notices = dashboard.subscribe();
    let span = tracing::info_span!("admin_demo");
    async {
        if let Err(e) = admin_steps(dashboard).await {
            error!(error = %e, "Admin demo stopped");
        }
        if let Err(e) = dashboard.logout().await {
            error!(error = %e, "Logout failed");
        }
    }
    .instrument(span)
    .await;

    loop {
        match notices.try_recv() {
            Ok(Notice { level, message }) => println!("[{level:?}] {message}"),
            Err(TryRecvError::Lagged(skipped)) => println!("({skipped} notices dropped)"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

async fn admin_steps<B: Backend>(dashboard: &Dashboard<B>) -> Result<(), BoardError> {
    dashboard.show_login().await?;
    dashboard.login(DEMO_EMAIL, DEMO_PASSWORD).await?;

    if let Some(id) = dashboard.snapshot().await?.orders.first().map(|o| o.id.clone()) {
        dashboard.toggle_arrival(&id).await?;
        info!(order_id = %id, "Toggled arrival");
    }

    dashboard.open_new_form().await?;
    let arrival = (Local::now().date_naive() + Days::new(3)).format("%Y-%m-%d").to_string();
    for (field, value) in [
        (FormField::Identifier, "AVN-2002"),
        (FormField::Customer, "Avon"),
        (FormField::ExpectedArrival, arrival.as_str()),
        (FormField::OrderCount, "2"),
        (FormField::VolumeCount, "5"),
    ] {
        dashboard.set_form_field(field, value).await?;
    }
    dashboard.submit_form().await?;

    let arrived = dashboard
        .apply_filter(OrderFilter::default().arrived(true))
        .await?;
    println!("{} order(s) already at base", arrived.len());
    dashboard.reset_filter().await?;

    let snapshot = dashboard.snapshot().await?;
    print_admin(&snapshot);

    let added = snapshot
        .orders
        .iter()
        .find(|o| o.identifier == "AVN-2002")
        .map(|o| o.id.clone())
        .ok_or_else(|| BoardError::OrderNotFound("AVN-2002".to_string()))?;
    dashboard.edit_order(&added).await?;
    dashboard.set_form_field(FormField::VolumeCount, "6").await?;
    dashboard.submit_form().await?;

    dashboard.request_delete(&added).await?;
    dashboard.confirm_delete().await?;
    Ok(())
}

fn print_public(snapshot: &BoardSnapshot) {
    println!("{} order(s)", snapshot.visible().len());
    for order in snapshot.visible() {
        let qr = QrCard::thumbnail(order);
        println!(
            "  [{}] {} ({}) arriving {} | {} | {} | qr {}px",
            order.id,
            order.identifier,
            order.customer,
            arrival_label(order.expected_arrival),
            count_label(order),
            public_status_label(order),
            qr.size,
        );
    }
}

fn print_admin(snapshot: &BoardSnapshot) {
    println!("Admin table:");
    for order in snapshot.visible() {
        println!(
            "  {:<10} {:<7} {} {:>3} {:>3}  {}",
            order.identifier,
            order.customer.as_str(),
            order.expected_arrival.format("%Y-%m-%d"),
            order.order_count,
            order.volume_count,
            admin_status_label(order),
        );
    }
}
