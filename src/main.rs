use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use finrepo_authz::config::{AppConfig, ConfigArgs};
use finrepo_authz::context::{AuthzContext, RequestContext};
use finrepo_authz::error::AuthzError;
use finrepo_authz::gate;
use finrepo_authz::inspect::Object;
use finrepo_authz::path::FieldPath;
use finrepo_authz::types::principal::Principal;
use log::{debug, warn};

#[derive(Parser)]
#[command(author, version, about)]
struct App {
    /// Print configuration data (JSON) and exit.
    #[arg(long)]
    print_config: bool,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a user passes an authorization gate, prints `allow` or
    /// `deny`.
    #[command(subcommand)]
    Check(CheckCommand),
}

#[derive(Subcommand)]
enum CheckCommand {
    /// Only admins pass.
    Admin(UserArgs),

    /// Admins and the owner of the object pass.
    Owner(OwnerArgs),

    /// Users granted the permission on the object pass.
    Permission(PermissionArgs),
}

#[derive(Args)]
struct UserArgs {
    /// ID of the acting user. Unknown users are treated as unauthenticated.
    #[arg(long)]
    user: i64,
}

#[derive(Args)]
struct ObjectArgs {
    /// Model of the object, e.g. Package.
    #[arg(long)]
    model: String,

    /// Primary key of the object.
    #[arg(long)]
    id: i64,
}

#[derive(Args)]
struct OwnerArgs {
    #[command(flatten)]
    user: UserArgs,

    #[command(flatten)]
    object: ObjectArgs,

    /// Owning field path, e.g. `ownerID` or `package.owner.id`.
    #[arg(long)]
    path: String,
}

#[derive(Args)]
struct PermissionArgs {
    #[command(flatten)]
    user: UserArgs,

    #[command(flatten)]
    object: ObjectArgs,

    /// Permission name, e.g. `edit`.
    #[arg(long)]
    permission: String,
}

async fn run(app: App) -> Result<()> {
    let cfg: AppConfig = app.config.load("finrepo")?;

    if app.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    cfg.logs.init()?;

    let command = match app.command {
        Some(command) => command,
        None => bail!("no command given, see --help"),
    };
    let shared = cfg.build_ctx()?;

    let result = match command {
        Commands::Check(CheckCommand::Admin(args)) => {
            let ctx = request_context(&shared, &args);
            gate::admin_only(&ctx, || async { Ok(()) }).await
        }
        Commands::Check(CheckCommand::Owner(args)) => {
            let ctx = request_context(&shared, &args.user);
            let object = load_object(&shared, &args.object)?;
            let path = FieldPath::parse(&args.path)?;
            gate::owner_or_admin(&ctx, &object, &path, || async { Ok(()) }).await
        }
        Commands::Check(CheckCommand::Permission(args)) => {
            let ctx = request_context(&shared, &args.user);
            let object = load_object(&shared, &args.object)?;
            gate::check_permission(&ctx, &object, &args.permission, || async { Ok(()) }).await
        }
    };

    print_verdict(result)
}

fn request_context(shared: &Arc<AuthzContext>, args: &UserArgs) -> RequestContext {
    let user = shared.db().with_transaction(|tx| tx.get_user(args.user));
    match user {
        Ok(user) => {
            debug!("Check as user {} ({})", user.name, user.id);
            RequestContext::with_principal(shared.clone(), Principal::from(&user))
        }
        Err(err) => {
            warn!("Load user {} failed, checking unauthenticated: {err:#}", args.user);
            RequestContext::anonymous(shared.clone())
        }
    }
}

fn load_object(shared: &AuthzContext, args: &ObjectArgs) -> Result<Object> {
    shared
        .db()
        .with_transaction(|tx| shared.registry().load(tx, &args.model, args.id))
        .context("load object to check")
}

fn print_verdict(result: Result<(), AuthzError>) -> Result<()> {
    match result {
        Ok(()) => println!("allow"),
        Err(err) if err.is_denied() => println!("deny"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let app = App::parse();
    match run(app).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
