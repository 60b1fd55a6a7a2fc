use clap::{
    Parser,
    Subcommand,
};
use serde::Serialize;
use thrivcore::{
    ac::{
        Agent,
        Role,
    },
    search::{
        Filter,
        SearchRequest,
    },
};
use thrivctrl::{
    config::Config,
    platform::Committed,
    Platform,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    config: Config,
    /// Email of the registered user to act as; anonymous when unset.
    #[clap(long, value_name = "EMAIL")]
    user: Option<String>,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(arg_required_else_help = true)]
    Category {
        #[command(subcommand)]
        cmd: CategoryCmd,
    },
    #[command(arg_required_else_help = true)]
    Institution {
        #[command(subcommand)]
        cmd: InstitutionCmd,
    },
    /// Reconcile the search index with the relational store.
    Reindex {
        #[clap(long)]
        id: Option<i64>,
    },
    #[command(arg_required_else_help = true)]
    Resource {
        #[command(subcommand)]
        cmd: ResourceCmd,
    },
    Search {
        #[clap(default_value = "")]
        query: String,
        #[clap(short = 'f', long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<Filter>,
        #[clap(long)]
        start: Option<usize>,
        #[clap(long)]
        size: Option<usize>,
    },
    #[command(arg_required_else_help = true)]
    Segment {
        #[command(subcommand)]
        cmd: SegmentCmd,
    },
    #[command(arg_required_else_help = true)]
    Type {
        #[command(subcommand)]
        cmd: TypeCmd,
    },
    #[command(arg_required_else_help = true)]
    User {
        #[command(subcommand)]
        cmd: UserCmd,
    },
}

#[derive(Debug, Subcommand)]
enum CategoryCmd {
    #[command(arg_required_else_help = true)]
    Get {
        id: i64,
    },
    List,
    #[command(arg_required_else_help = true)]
    Resources {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum InstitutionCmd {
    #[command(arg_required_else_help = true)]
    Add {
        name: String,
        #[clap(long)]
        domain: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        hide_availability: bool,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum ResourceCmd {
    #[command(arg_required_else_help = true)]
    Delete {
        id: i64,
    },
    #[command(arg_required_else_help = true)]
    Get {
        id: i64,
    },
    List {
        #[clap(short = 'f', long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<Filter>,
        #[clap(long)]
        limit: Option<usize>,
        #[clap(long, default_value_t = 0)]
        offset: usize,
    },
    Owned,
    #[command(arg_required_else_help = true)]
    RequestApproval {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum SegmentCmd {
    #[command(arg_required_else_help = true)]
    Add {
        name: String,
        #[clap(long)]
        description: Option<String>,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum TypeCmd {
    #[command(arg_required_else_help = true)]
    Add {
        name: String,
        #[clap(long)]
        description: Option<String>,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum UserCmd {
    #[command(arg_required_else_help = true)]
    Add {
        email: String,
        display_name: String,
        #[clap(long)]
        admin: bool,
    },
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_committed<T: Serialize>(committed: Committed<T>) -> anyhow::Result<()> {
    for degraded in committed.degraded.iter() {
        log::warn!("{degraded}");
    }
    print(&committed.value)
}

#[async_std::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("thrivdb_sqlite")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let platform = args.config.build().await?;
    let agent = match args.user {
        Some(email) => platform.user_by_email(&email).await?
            .map(Agent::from)
            .ok_or_else(|| anyhow::anyhow!("no user registered as {email:?}"))?,
        None => Agent::Anonymous,
    };

    match args.command {
        Commands::Category { cmd } => {
            parse_category(&platform, &agent, cmd).await?;
        },
        Commands::Institution { cmd } => {
            parse_institution(&platform, &agent, cmd).await?;
        },
        Commands::Reindex { id: Some(id) } => {
            platform.reindex_resource(id).await?;
        },
        Commands::Reindex { id: None } => {
            print(&platform.reindex_all().await?)?;
        },
        Commands::Resource { cmd } => {
            parse_resource(&platform, &agent, cmd).await?;
        },
        Commands::Search { query, filters, start, size } => {
            let request = SearchRequest { query, filters, start, size };
            print(&platform.search(&request, &agent).await?)?;
        },
        Commands::Segment { cmd } => {
            parse_segment(&platform, &agent, cmd).await?;
        },
        Commands::Type { cmd } => {
            parse_type(&platform, &agent, cmd).await?;
        },
        Commands::User { cmd } => {
            parse_user(&platform, cmd).await?;
        },
    }

    Ok(())
}

async fn parse_category(
    platform: &Platform,
    agent: &Agent,
    arg: CategoryCmd,
) -> anyhow::Result<()> {
    match arg {
        CategoryCmd::Get { id } => print(&platform.get_category(id).await?)?,
        CategoryCmd::List => print(&platform.list_categories().await?)?,
        CategoryCmd::Resources { id } => print(&platform.category_resources(id, agent).await?)?,
    }
    Ok(())
}

async fn parse_institution(
    platform: &Platform,
    agent: &Agent,
    arg: InstitutionCmd,
) -> anyhow::Result<()> {
    match arg {
        InstitutionCmd::Add { name, domain, description, hide_availability } => {
            let institution = platform.add_institution(
                &name,
                domain.as_deref(),
                description.as_deref(),
                hide_availability,
                agent,
            ).await?;
            print(&institution)?;
        },
        InstitutionCmd::List => print(&platform.list_institutions().await?)?,
    }
    Ok(())
}

async fn parse_resource(
    platform: &Platform,
    agent: &Agent,
    arg: ResourceCmd,
) -> anyhow::Result<()> {
    match arg {
        ResourceCmd::Delete { id } => {
            print_committed(platform.delete_resource(id, agent).await?)?;
        },
        ResourceCmd::Get { id } => print(&platform.get_resource(id, agent).await?)?,
        ResourceCmd::List { filters, limit, offset } => {
            print(&platform.list_resources(agent, &filters, limit, offset).await?)?;
        },
        ResourceCmd::Owned => print(&platform.list_owned_resources(agent).await?)?,
        ResourceCmd::RequestApproval { id } => {
            print(&platform.request_approval(id, agent).await?)?;
        },
    }
    Ok(())
}

async fn parse_segment(
    platform: &Platform,
    agent: &Agent,
    arg: SegmentCmd,
) -> anyhow::Result<()> {
    match arg {
        SegmentCmd::Add { name, description } => {
            print(&platform.add_segment(&name, description.as_deref(), agent).await?)?;
        },
        SegmentCmd::List => print(&platform.list_segments().await?)?,
    }
    Ok(())
}

async fn parse_type(
    platform: &Platform,
    agent: &Agent,
    arg: TypeCmd,
) -> anyhow::Result<()> {
    match arg {
        TypeCmd::Add { name, description } => {
            print(&platform.add_type(&name, description.as_deref(), agent).await?)?;
        },
        TypeCmd::List => print(&platform.list_types().await?)?,
    }
    Ok(())
}

async fn parse_user(
    platform: &Platform,
    arg: UserCmd,
) -> anyhow::Result<()> {
    match arg {
        UserCmd::Add { email, display_name, admin } => {
            let role = if admin { Role::Admin } else { Role::User };
            print(&platform.create_user(&email, &display_name, role).await?)?;
        },
    }
    Ok(())
}
