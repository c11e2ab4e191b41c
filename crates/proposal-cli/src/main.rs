mod config;
mod logger;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::ProposalConfig;
use logger::CliLogger;
use proposal_export::{
    BuildRecord, EnvCredential, HttpExportBackend, MarkerStore, export_build, folder_name,
    format_timestamp, plan_exports,
};
use proposal_layout::{
    CellValue, Selection, load_orders, load_selection, render_selected, rows_to_csv,
    save_layout_csv, save_layout_formatting, save_selection, select_client_orders,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kpt", about = "Commercial proposal builder", version)]
struct Cli {
    /// Config file with layout and export settings
    #[arg(short, long, global = true, default_value = "kpt.json")]
    config: PathBuf,

    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy every order of one client onto a new selection sheet
    Select {
        /// Orders sheet snapshot (CSV)
        #[arg(long)]
        orders: PathBuf,

        /// Client name as written in column C
        #[arg(long)]
        client: String,

        /// Yuan exchange rate shown in the proposal header
        #[arg(long)]
        rate: String,

        /// Selection sheet to write (CSV)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render the ticked orders of a selection into the output sheet
    Build {
        /// Selection sheet (CSV)
        #[arg(short, long)]
        selection: PathBuf,

        /// Output sheet to write (CSV)
        #[arg(short, long)]
        layout: PathBuf,

        /// Also write the preview log (CSV)
        #[arg(long)]
        preview: Option<PathBuf>,
    },

    /// Show the export requests of a build
    Segments {
        /// Build id, the latest build when omitted
        #[arg(long)]
        build: Option<String>,
    },

    /// Fetch, merge and save the artifacts of a build
    Export {
        /// Build id, the latest build when omitted
        #[arg(long)]
        build: Option<String>,

        /// Root folder for the per-build output folders
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Also zip the build folder
        #[arg(long)]
        archive: bool,
    },

    /// Write a config file with default settings
    InitConfig {
        /// Where to write it (defaults to --config)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(cli.verbose).init()?;

    let config_path = cli.config;

    match cli.command {
        Commands::InitConfig { path } => {
            let path = path.unwrap_or(config_path);
            ProposalConfig::default().save(&path).await?;
            println!("Wrote default config → {}", path.display());
        }

        Commands::Select {
            orders,
            client,
            rate,
            output,
        } => {
            let config = ProposalConfig::load_or_default(&config_path).await?;
            config.layout.validate()?;
            let all = load_orders(&orders, config.layout.orders_start_row).await?;
            let records = select_client_orders(&all, &client)?;
            let selection = Selection {
                client_name: client.trim().to_string(),
                exchange_rate: CellValue::from_raw(&rate),
                records,
            };
            save_selection(&selection, &output).await?;
            println!(
                "Selected {} orders for {} → {}",
                selection.records.len(),
                selection.client_name,
                output.display()
            );
        }

        Commands::Build {
            selection,
            layout,
            preview,
        } => {
            let config = ProposalConfig::load_or_default(&config_path).await?;
            let selection = load_selection(&selection).await?;
            let proposal = render_selected(&selection, &config.layout)?;

            save_layout_csv(&proposal.layout, &layout).await?;
            let formatting = layout.with_extension("json");
            save_layout_formatting(&proposal.layout, &formatting).await?;
            if let Some(preview) = preview {
                tokio::fs::write(&preview, rows_to_csv(&proposal.preview)?).await?;
            }

            let created_at = format_timestamp(chrono::Utc::now());
            let build_id = folder_name(&created_at, &proposal.client_name);
            let mut store = MarkerStore::open(&config.export.state_file).await?;
            store
                .put(BuildRecord::new(
                    &build_id,
                    &proposal.client_name,
                    &created_at,
                    proposal.layout.last_column(),
                    &proposal.markers,
                ))
                .await?;

            println!("Proposal for {}:", proposal.client_name);
            println!("  Orders: {}", proposal.orders.len());
            println!("  Purchase (+5%): {:.2}", proposal.totals.purchase_with_margin());
            println!("  Fast delivery: {:.2}", proposal.totals.fast_delivery);
            println!("  Slow delivery: {:.2}", proposal.totals.slow_delivery);
            println!("  Pages: {}", proposal.markers.page_count());
            println!("  Page markers: {}", proposal.markers);
            println!("  Merges and borders: {}", formatting.display());
            println!("Built {} → {}", build_id, layout.display());
            println!("Recorded in {}", store.path().display());
        }

        Commands::Segments { build } => {
            let config = ProposalConfig::load_or_default(&config_path).await?;
            let store = MarkerStore::open(&config.export.state_file).await?;
            let record = store.resolve(build.as_deref())?;
            let plan = plan_exports(&config.export, &record.segments()?)?;

            println!("Build {} ({}):", record.build_id, record.client_name);
            println!("  {}: {}", plan.tabular.label(), plan.tabular.url);
            for request in &plan.pages {
                println!("  {}: {}", request.label(), request.url);
            }
        }

        Commands::Export {
            build,
            output_dir,
            archive,
        } => {
            let mut options = ProposalConfig::load_or_default(&config_path).await?.export;
            if let Some(dir) = output_dir {
                options.output_dir = dir;
            }
            options.archive |= archive;

            let mut store = MarkerStore::open(&options.state_file).await?;
            let backend = HttpExportBackend::new(EnvCredential::new(&options.token_env));
            let outcome = export_build(&backend, &mut store, &options, build.as_deref()).await?;

            println!(
                "Exported {} pages → {}",
                outcome.page_count,
                outcome.written.folder.display()
            );
            if let Some(zip) = outcome.archive {
                println!("Archived → {}", zip.display());
            }
        }
    }

    Ok(())
}
