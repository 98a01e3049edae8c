use crate::cli::Commands;
use crate::client::{CREDENTIALS_TABLE, Session};
use crate::config::Config;
use crate::error::CredwatchError;
use crate::realtime::{CREDENTIALS_CHANNEL, Listener, log_change};
use crate::types::Credential;
use tracing::info;

/// Dispatch one parsed subcommand. Each data command is a fresh session and
/// a single round trip; `realtime` holds its session until interrupted.
pub async fn run(command: Commands, cfg: &Config) -> Result<(), CredwatchError> {
    let session = Session::connect(cfg).await?;

    match command {
        Commands::List => list(&session).await,
        Commands::Create { email, password } => create(&session, email, password).await,
        Commands::Update { email, password } => update(&session, &email, &password).await,
        Commands::Delete { email } => delete(&session, &email).await,
        Commands::Realtime => realtime(&session).await,
    }
}

async fn list(session: &Session) -> Result<(), CredwatchError> {
    let rows = session.list().await?;
    println!("retrieved {} credential record(s)", rows.len());
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

async fn create(session: &Session, email: String, password: String) -> Result<(), CredwatchError> {
    let inserted = session.create(&Credential { email, password }).await?;
    for row in &inserted {
        println!("inserted credential for {}", row.email);
    }
    println!("{}", serde_json::to_string_pretty(&inserted)?);
    Ok(())
}

async fn update(session: &Session, email: &str, password: &str) -> Result<(), CredwatchError> {
    let affected = session.update_password(email, password).await?;
    println!("updated {} credential record(s) for {}", affected.len(), email);
    println!("{}", serde_json::to_string_pretty(&affected)?);
    Ok(())
}

async fn delete(session: &Session, email: &str) -> Result<(), CredwatchError> {
    let removed = session.delete(email).await?;
    println!("deleted {} credential record(s) for {}", removed.len(), email);
    println!("{}", serde_json::to_string_pretty(&removed)?);
    Ok(())
}

/// Block streaming change events until the process is interrupted. The wait
/// is a genuine suspension on the interrupt signal; there is no polling.
async fn realtime(session: &Session) -> Result<(), CredwatchError> {
    let mut listener = Listener::new();
    listener.attach(
        session
            .subscribe(CREDENTIALS_CHANNEL, CREDENTIALS_TABLE, log_change)
            .await?,
    );

    println!("listening for changes on the credentials table; press Ctrl+C to exit");
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install interrupt handler; shutting down");
    }

    info!("interrupt received; shutting down");
    listener.shutdown(session).await;
    Ok(())
}
