//! PCAB - Porta-Cabin session CLI
//!
//! Drives the session core from a terminal. The persisted session lives in
//! the storage file named by pcab.yaml, so it survives between runs the way
//! a browser session survives reloads.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pcab_core::auth::{AppContext, AuthService};
use pcab_core::config::{AuthConfig, CONFIG_FILE_NAME};
use pcab_core::errors::AuthError;
use pcab_core::forms::LoginForm;
use pcab_core::guard::{GuardDecision, RouteGuard};
use pcab_core::rbac::navigation_for;
use pcab_core::session::{Action, Role, User};
use pcab_core::storage::FileStorage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pcab")]
#[command(version)]
#[command(about = "Porta-Cabin session and permission CLI", long_about = None)]
struct Cli {
    /// Path to pcab.yaml (defaults to ./pcab.yaml, built-in defaults if absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default pcab.yaml to the current directory
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Location that sent you to login
        #[arg(long)]
        return_to: Option<String>,
    },
    /// Forget the persisted session
    Logout,
    /// Show the current session
    Whoami,
    /// Check a (module, action) grant for the current user
    Can {
        /// Module name (e.g., quotations)
        module: String,
        /// Action (create, read, update, delete)
        action: String,
    },
    /// List the navigation entries visible to the current user
    Modules,
    /// Ask the route guard about a location
    Visit {
        /// Location (e.g., /work-orders/WO-1/edit)
        location: String,
    },
    /// Replace the current user's record
    UpdateUser {
        /// JSON file with a complete user record
        #[arg(long, conflicts_with = "role")]
        file: Option<PathBuf>,
        /// Switch role and reset permissions to its defaults
        #[arg(long)]
        role: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PCAB_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load config and the directory relative storage paths resolve against
fn load_config(path: Option<&Path>) -> anyhow::Result<(AuthConfig, PathBuf)> {
    match path {
        Some(p) => {
            let config = AuthConfig::load(p)
                .with_context(|| format!("loading {}", p.display()))?;
            let base = p
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((config, base))
        }
        None => {
            let cwd = std::env::current_dir()?;
            Ok((AuthConfig::load_from_dir(&cwd)?, cwd))
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::InitConfig { force } = cli.command {
        let path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        if path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }
        AuthConfig::default().save(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let (config, base) = load_config(cli.config.as_deref())?;
    let storage = Arc::new(FileStorage::new(config.storage_path_in(&base)));
    let service = Arc::new(AuthService::from_config(&config, storage));
    let ctx = AppContext::mount(service).await;
    let auth = ctx.auth()?;
    let guard = RouteGuard::from_config(&config)?;

    match cli.command {
        // Written before mount
        Commands::InitConfig { .. } => {}
        Commands::Login { email, password, return_to } => {
            let form = LoginForm::new(email, password);
            match auth.submit_login(&form).await {
                Ok(()) => {
                    let redirect = return_to.map(|from| GuardDecision::RedirectToLogin {
                        to: guard.login_route().to_string(),
                        from,
                    });
                    let user = auth.user().context("session has no user after login")?;
                    println!("Signed in as {} <{}> ({})", user.full_name(), user.email, user.role);
                    println!("Continue to {}", guard.post_login_target(redirect.as_ref()));
                }
                Err(AuthError::InvalidForm(_)) => {
                    for err in form.validate().errors {
                        eprintln!("{}: {}", err.field, err.message);
                    }
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Logout => {
            auth.logout();
            println!("Signed out");
        }
        Commands::Whoami => match auth.user() {
            Some(user) if auth.is_authenticated() => print_json(&user)?,
            _ => println!("Not signed in"),
        },
        Commands::Can { module, action } => {
            let action: Action = action.parse()?;
            let allowed = auth.has_permission(&module, action);
            println!("{}", if allowed { "allowed" } else { "denied" });
            if !allowed {
                std::process::exit(2);
            }
        }
        Commands::Modules => {
            for item in navigation_for(auth.user().as_ref()) {
                println!("{:<14} {}", item.label, item.path);
            }
        }
        Commands::Visit { location } => {
            print_json(&guard.check(&ctx, &location)?)?;
        }
        Commands::UpdateUser { file, role } => {
            let Some(current) = auth.user().filter(|_| auth.is_authenticated()) else {
                bail!("not signed in");
            };

            let updated: User = match (file, role) {
                (Some(path), _) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str(&raw)
                        .with_context(|| format!("parsing user record in {}", path.display()))?
                }
                (None, Some(role)) => {
                    let role: Role = role.parse()?;
                    User {
                        role,
                        permissions: role.default_permissions(),
                        ..current
                    }
                }
                (None, None) => bail!("pass --file or --role"),
            };

            auth.update_user(updated);
            println!("Profile updated");
        }
    }

    Ok(())
}
