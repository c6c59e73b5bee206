//! # Flight & Launch Dashboards Server
//!
//! Binary entry point: serves both dashboards over HTTP, or renders a
//! one-off report to stdout.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dash_analytics::dashboards::Dashboard;
use dash_analytics::DashboardReport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dash_server::context::{load_airline, load_launches};
use dash_server::routes::{AirlineChartQuery, LaunchChartQuery};
use dash_server::{build_router, AppContext, Config};

#[derive(Parser, Debug)]
#[command(name = "dash-server", about = "Airline performance and SpaceX launch dashboards", version)]
struct Cli {
    /// Human-readable debug logging instead of JSON
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboards over HTTP
    Serve {
        /// Bind address (overrides SERVER_ADDR)
        #[arg(long)]
        addr: Option<SocketAddr>,

        /// Airline flight records CSV (overrides AIRLINE_DATA)
        #[arg(long)]
        airline_data: Option<PathBuf>,

        /// Launch records CSV (overrides LAUNCH_DATA)
        #[arg(long)]
        launch_data: Option<PathBuf>,
    },

    /// Compute one dashboard view and print it
    Report {
        #[command(subcommand)]
        target: ReportTarget,
    },
}

#[derive(Subcommand, Debug)]
enum ReportTarget {
    /// Airline performance or delay report
    Airline {
        #[arg(long)]
        data: PathBuf,

        /// OPT1 (performance) or OPT2 (delay)
        #[arg(long)]
        report: String,

        /// Year between 2005 and 2019, or "all"
        #[arg(long, default_value = "all")]
        year: String,

        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
    },

    /// Launch outcome report
    Launches {
        #[arg(long)]
        data: PathBuf,

        /// Launch site, or "All Sites"
        #[arg(long)]
        site: Option<String>,

        #[arg(long)]
        payload_low: Option<String>,

        #[arg(long)]
        payload_high: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    init_tracing(&config.log_level, cli.debug);

    match cli.command {
        Command::Serve {
            addr,
            airline_data,
            launch_data,
        } => {
            if let Some(addr) = addr {
                config.server_addr = addr;
            }
            if airline_data.is_some() {
                config.airline_data = airline_data;
            }
            if launch_data.is_some() {
                config.launch_data = launch_data;
            }
            serve(config).await
        }
        Command::Report { target } => report(target),
    }
}

fn init_tracing(log_level: &str, debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(log_level)
        }
    });
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so reports can be piped.
    if debug {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        version = dash_server::VERSION,
        "Starting flight & launch dashboards"
    );

    let ctx = AppContext::load(&config)?;
    let app = build_router(ctx, &config.cors_origins);

    let addr = config.server_addr;
    tracing::info!(%addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Dashboards available at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn report(target: ReportTarget) -> anyhow::Result<()> {
    let (report, format) = match target {
        ReportTarget::Airline {
            data,
            report,
            year,
            format,
        } => {
            let selection = AirlineChartQuery {
                report: Some(report),
                year: Some(year),
            }
            .into_selection()?;
            let dashboard = load_airline(&data)?;
            (dashboard.report(&selection)?, format)
        }
        ReportTarget::Launches {
            data,
            site,
            payload_low,
            payload_high,
            format,
        } => {
            let dashboard = load_launches(&data)?;
            let selection = LaunchChartQuery {
                site,
                payload_low,
                payload_high,
            }
            .into_selection(dashboard.payload_bounds())?;
            (dashboard.report(&selection)?, format)
        }
    };

    print_report(&report, format)
}

fn print_report(report: &DashboardReport, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", report.to_json()?),
        Format::Markdown => print!("{}", report.to_markdown()),
    }
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
