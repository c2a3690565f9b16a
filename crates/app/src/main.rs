use clap::{Args, Parser, Subcommand};
use engine::{Engine, EntryFilter, TransactionFilter, TransferCmd};
use migration::MigratorTrait;
use sea_orm::Database;

mod responses;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "orafo")]
#[command(about = "Metal accounting and transfer engine for the goldsmith back office")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL` or
    /// `settings.toml`).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run pending schema migrations.
    Migrate,
    /// Seed the stock metal registry for a tenant.
    SeedMetals(TenantArgs),
    /// Metal registry management.
    Metal(MetalArgs),
    /// Print the ledger summary grouped by metal.
    Summary(SummaryArgs),
    /// Print ledger entries.
    Entries(EntriesArgs),
    /// Print the safe supply buckets.
    Safe(TenantArgs),
    /// Print a company's trust balances.
    CompanyBalances(CompanyBalancesArgs),
    /// Print the metal transaction audit trail.
    Transactions(TenantArgs),
    /// Print the remaining transferable stock of a step.
    Remaining(RemainingArgs),
    /// Transfer part of a step's stock into a new child step.
    Transfer(TransferArgs),
    /// Process casting consumption for an order.
    Consume(ConsumeArgs),
}

#[derive(Args, Debug)]
struct CompanyBalancesArgs {
    #[arg(long)]
    tenant: i32,
    #[arg(long)]
    company: i32,
}

#[derive(Args, Debug)]
struct RemainingArgs {
    #[arg(long)]
    tenant: i32,
    #[arg(long)]
    step: i32,
}

#[derive(Args, Debug)]
struct TransferArgs {
    #[arg(long)]
    tenant: i32,
    #[arg(long)]
    step: i32,
    #[arg(long)]
    quantity: f64,
    #[arg(long)]
    weight: f64,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    received_by: Option<String>,
    #[arg(long)]
    next_step_type: Option<String>,
}

#[derive(Args, Debug)]
struct ConsumeArgs {
    #[arg(long)]
    tenant: i32,
    #[arg(long)]
    order: i32,
    #[arg(long)]
    user: i32,
}

#[derive(Args, Debug)]
struct TenantArgs {
    #[arg(long)]
    tenant: i32,
}

#[derive(Args, Debug)]
struct MetalArgs {
    #[command(subcommand)]
    command: MetalCommand,
}

#[derive(Subcommand, Debug)]
enum MetalCommand {
    List {
        #[arg(long)]
        tenant: i32,
        #[arg(long)]
        include_inactive: bool,
    },
    Add {
        #[arg(long)]
        tenant: i32,
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        fine_percentage: f64,
        #[arg(long)]
        cost_per_gram: Option<f64>,
    },
    Deactivate {
        #[arg(long)]
        tenant: i32,
        #[arg(long)]
        id: i32,
    },
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[arg(long)]
    tenant: i32,
    #[arg(long)]
    department: Option<i32>,
}

#[derive(Args, Debug)]
struct EntriesArgs {
    #[arg(long)]
    tenant: i32,
    #[arg(long)]
    department: Option<i32>,
    #[arg(long)]
    order: Option<i32>,
    #[arg(long)]
    include_archived: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let cli = Cli::parse();

    let level = settings.level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(format!("orafo={level},engine={level}"))
        .init();

    let database_url = cli
        .database_url
        .or(settings.database)
        .unwrap_or_else(|| "sqlite:./orafo.db?mode=rwc".to_string());

    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;
    let engine = Engine::builder().database(db).build();

    match cli.command {
        Command::Migrate => {
            // Migrations already ran above; this subcommand just makes the
            // intent explicit for provisioning scripts.
            tracing::info!("migrations applied");
        }
        Command::SeedMetals(args) => {
            let created = engine.seed_default_metals(args.tenant).await?;
            tracing::info!(tenant = args.tenant, created, "seeded default metals");
        }
        Command::Metal(args) => match args.command {
            MetalCommand::List {
                tenant,
                include_inactive,
            } => {
                let metals = engine.list_metals(tenant, include_inactive).await?;
                let responses: Vec<_> =
                    metals.into_iter().map(responses::metal_response).collect();
                println!("{}", serde_json::to_string_pretty(&responses)?);
            }
            MetalCommand::Add {
                tenant,
                code,
                name,
                fine_percentage,
                cost_per_gram,
            } => {
                let metal = engine
                    .register_metal(tenant, &code, &name, fine_percentage, cost_per_gram)
                    .await?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&responses::metal_response(metal))?
                );
            }
            MetalCommand::Deactivate { tenant, id } => {
                let metal = engine.deactivate_metal(tenant, id).await?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&responses::metal_response(metal))?
                );
            }
        },
        Command::Summary(args) => {
            let summary = engine.ledger_summary(args.tenant, args.department).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&responses::summary_response(summary))?
            );
        }
        Command::Entries(args) => {
            let filter = EntryFilter {
                department_id: args.department,
                order_id: args.order,
                include_archived: args.include_archived,
                ..Default::default()
            };
            let entries = engine.list_entries(args.tenant, filter).await?;
            let responses: Vec<_> = entries.into_iter().map(responses::entry_response).collect();
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        Command::Safe(args) => {
            let supplies = engine.safe_supplies(args.tenant).await?;
            let responses: Vec<_> = supplies
                .into_iter()
                .map(responses::safe_supply_response)
                .collect();
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        Command::CompanyBalances(args) => {
            let balances = engine.company_balances(args.tenant, args.company).await?;
            let responses: Vec<_> = balances
                .into_iter()
                .map(responses::company_balance_response)
                .collect();
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        Command::Transactions(args) => {
            let rows = engine
                .metal_transactions(args.tenant, TransactionFilter::default())
                .await?;
            let responses: Vec<_> = rows
                .into_iter()
                .map(responses::transaction_response)
                .collect();
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        Command::Remaining(args) => {
            let remaining = engine.remaining(args.tenant, args.step).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&responses::remaining_response(args.step, remaining))?
            );
        }
        Command::Transfer(args) => {
            let mut cmd = TransferCmd::new(args.tenant, args.step, args.quantity, args.weight);
            cmd.department = args.department;
            cmd.received_by = args.received_by;
            cmd.next_step_type = args.next_step_type;
            let outcome = engine.transfer(cmd).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&responses::transfer_response(outcome))?
            );
        }
        Command::Consume(args) => {
            match engine
                .process_casting_consumption(args.tenant, args.order, args.user)
                .await?
            {
                Some(result) => println!(
                    "{}",
                    serde_json::to_string_pretty(&responses::consumption_response(result))?
                ),
                None => tracing::warn!(order = args.order, "order skipped, nothing consumed"),
            }
        }
    }

    Ok(())
}
