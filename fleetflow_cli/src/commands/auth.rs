use std::io::BufRead;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use fleetflow_lib::{AuthSession, Client};
use serde_json::json;

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Password; read from the first line of stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn login(args: &LoginArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => read_password()?,
    };
    let session = AuthSession::new(client);
    let response = session.login(&args.email, &password).await?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "email": args.email,
            "token_type": response.token_type,
            "expires_at": response.expires_at,
        })),
        _ => {
            println!("Logged in as {}", args.email);
            if let Some(expires_at) = &response.expires_at {
                println!("Session expires at {}", expires_at);
            }
        }
    }
    Ok(())
}

pub fn logout(client: Arc<Client>) -> Result<()> {
    AuthSession::new(client).logout()?;
    println!("Logged out");
    Ok(())
}

pub async fn whoami(client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let session = AuthSession::new(client);
    match session.current_user().await? {
        Some(user) => match format {
            OutputFormat::Json => print_json(&user),
            _ => println!("{} <{}>", user.name, user.email),
        },
        None => bail!("Not logged in. Run `fleetflow login` first."),
    }
    Ok(())
}

fn read_password() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("A password is required.");
    }
    Ok(password)
}
