use std::io::BufRead;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use fleetflow_lib::types::User;
use fleetflow_lib::{AuthSession, Client};

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub action: AccountAction,
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Change the signed-in user's name or email
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the password; both values are read from stdin when omitted
    Password {
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
}

pub async fn run(args: &AccountArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let session = AuthSession::new(client);
    let Some(user) = session.current_user().await? else {
        bail!("Not logged in. Run `fleetflow login` first.");
    };

    match &args.action {
        AccountAction::Profile { name, email } => {
            let name = name.as_deref().unwrap_or(&user.name);
            let email = email.as_deref().unwrap_or(&user.email);
            match session.update_profile(&user, name, email).await? {
                Some(updated) => print_user(&updated, format),
                None => bail!("Profile saved but the session could not be reloaded."),
            }
        }
        AccountAction::Password { password, confirm } => {
            let (password, confirm) = {
                let mut stdin = std::io::stdin().lock();
                let password = match password {
                    Some(p) => p.clone(),
                    None => read_line(&mut stdin)?,
                };
                let confirm = match confirm {
                    Some(c) => c.clone(),
                    None => read_line(&mut stdin)?,
                };
                (password, confirm)
            };
            session.change_password(&user, &password, &confirm).await?;
            println!("Password updated successfully. Please log in again.");
        }
    }
    Ok(())
}

fn print_user(user: &User, format: &OutputFormat) {
    match format {
        OutputFormat::Json => print_json(user),
        _ => println!("Profile updated: {} <{}>", user.name, user.email),
    }
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_password_pair_line_by_line() {
        let mut input = std::io::Cursor::new("s3cret\r\ns3cret\n");
        assert_eq!(read_line(&mut input).unwrap(), "s3cret");
        assert_eq!(read_line(&mut input).unwrap(), "s3cret");
        assert_eq!(read_line(&mut input).unwrap(), "");
    }
}
