//! Trafdesk CLI - Traffic offense management from command line
//!
//! Every command that changes data acts as a registered user, named
//! with `--as <email>`:
//! ```bash
//! trafdesk init
//! trafdesk user create --name "Hodan Ali" --email hodan@police.gov --role officer
//! trafdesk --as hodan@police.gov offense record --driver asha@example.com \
//!     --vehicle KAA-123 --type speeding --location "Main St" --fine 100
//! trafdesk --as hodan@police.gov deletion request OFFENSE_ID --reason "duplicate entry"
//! trafdesk --as root@trafdesk.local deletion resolve REQUEST_ID approved
//! trafdesk --as asha@example.com pay OFFENSE_ID --method card
//! trafdesk --as root@trafdesk.local stats --format json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod commands;
mod db;

use commands::{audit, deletion, offense, payment, stats, user};

/// Trafdesk - traffic offense records, payments and audited deletion
#[derive(Parser)]
#[command(name = "trafdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/trafdesk.db", global = true)]
    pub db: PathBuf,

    /// Email of the acting user
    #[arg(long = "as", value_name = "EMAIL", global = true)]
    pub acting_as: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// User management
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Offense recording and maintenance
    Offense {
        #[command(subcommand)]
        action: OffenseAction,
    },

    /// Deletion request workflow
    Deletion {
        #[command(subcommand)]
        action: DeletionAction,
    },

    /// Pay the fine for an offense
    Pay {
        /// Offense ID
        offense_id: String,
        /// Payment method
        #[arg(long)]
        method: MethodArg,
    },

    /// List payments visible to the acting user
    Payments,

    /// Dashboard statistics
    Stats {
        /// Output format
        #[arg(long, default_value = "table")]
        format: StatsFormat,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },

    /// Initialize database with schema and a superadmin account
    Init {
        /// Force re-initialization (drops existing data)
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a user
    Create {
        #[arg(long, short)]
        name: String,
        #[arg(long, short)]
        email: String,
        #[arg(long, short)]
        role: RoleArg,
    },
    /// List all users
    List,
}

#[derive(Subcommand)]
pub enum OffenseAction {
    /// Record a new offense
    Record {
        /// Driver email
        #[arg(long)]
        driver: String,
        /// Vehicle registration number
        #[arg(long)]
        vehicle: String,
        /// Offence type
        #[arg(long = "type", short = 't')]
        offence_type: OffenceTypeArg,
        #[arg(long)]
        location: String,
        /// Fine amount
        #[arg(long)]
        fine: Decimal,
        /// Offense date (RFC 3339), defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// List offenses visible to the acting user
    List,
    /// Show one offense
    Show {
        /// Offense ID
        offense_id: String,
    },
    /// Edit an offense's fields
    Edit {
        /// Offense ID
        offense_id: String,
        #[arg(long)]
        vehicle: Option<String>,
        #[arg(long = "type", short = 't')]
        offence_type: Option<OffenceTypeArg>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        fine: Option<Decimal>,
    },
    /// Change an offense's payment status
    SetStatus {
        /// Offense ID
        offense_id: String,
        status: StatusArg,
    },
}

#[derive(Subcommand)]
pub enum DeletionAction {
    /// Request deletion of an offense
    Request {
        /// Offense ID
        offense_id: String,
        /// Why the offense should be removed
        #[arg(long)]
        reason: String,
    },
    /// Approve or reject a pending request (superadmin)
    Resolve {
        /// Request ID
        request_id: String,
        /// approved or rejected
        decision: String,
    },
    /// List deletion requests (superadmin)
    List,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Driver,
    Officer,
    Superadmin,
}

impl RoleArg {
    pub fn to_core(self) -> trafdesk_core::Role {
        match self {
            RoleArg::Driver => trafdesk_core::Role::Driver,
            RoleArg::Officer => trafdesk_core::Role::Officer,
            RoleArg::Superadmin => trafdesk_core::Role::Superadmin,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OffenceTypeArg {
    Speeding,
    Parking,
    NoLicense,
    RedLight,
    DrunkDriving,
    Other,
}

impl OffenceTypeArg {
    pub fn to_core(self) -> trafdesk_core::OffenceType {
        match self {
            OffenceTypeArg::Speeding => trafdesk_core::OffenceType::Speeding,
            OffenceTypeArg::Parking => trafdesk_core::OffenceType::Parking,
            OffenceTypeArg::NoLicense => trafdesk_core::OffenceType::NoLicense,
            OffenceTypeArg::RedLight => trafdesk_core::OffenceType::RedLight,
            OffenceTypeArg::DrunkDriving => trafdesk_core::OffenceType::DrunkDriving,
            OffenceTypeArg::Other => trafdesk_core::OffenceType::Other,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Paid,
    Unpaid,
}

impl StatusArg {
    pub fn to_core(self) -> trafdesk_core::OffenseStatus {
        match self {
            StatusArg::Pending => trafdesk_core::OffenseStatus::Pending,
            StatusArg::Paid => trafdesk_core::OffenseStatus::Paid,
            StatusArg::Unpaid => trafdesk_core::OffenseStatus::Unpaid,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Cash,
    Card,
    MobileMoney,
}

impl MethodArg {
    pub fn to_core(self) -> trafdesk_core::PaymentMethod {
        match self {
            MethodArg::Cash => trafdesk_core::PaymentMethod::Cash,
            MethodArg::Card => trafdesk_core::PaymentMethod::Card,
            MethodArg::MobileMoney => trafdesk_core::PaymentMethod::MobileMoney,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatsFormat {
    Table,
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Some(parent) = cli.db.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    match cli.command {
        Commands::Init { force } => {
            db::init(&cli.db, force).await?;
            println!("✅ Database initialized at {:?}", cli.db);
        }

        Commands::Status => {
            db::show_status(&cli.db).await?;
        }

        Commands::User { action } => {
            user::handle(&cli.db, action).await?;
        }

        Commands::Offense { action } => {
            offense::handle(&cli.db, cli.acting_as.as_deref(), action).await?;
        }

        Commands::Deletion { action } => {
            deletion::handle(&cli.db, cli.acting_as.as_deref(), action).await?;
        }

        Commands::Pay { offense_id, method } => {
            payment::pay(&cli.db, cli.acting_as.as_deref(), &offense_id, method).await?;
        }

        Commands::Payments => {
            payment::list(&cli.db, cli.acting_as.as_deref()).await?;
        }

        Commands::Stats { format, output } => {
            stats::show(&cli.db, cli.acting_as.as_deref(), format, output).await?;
        }

        Commands::Audit { limit } => {
            audit::show(&cli.db, cli.acting_as.as_deref(), limit).await?;
        }
    }

    Ok(())
}
