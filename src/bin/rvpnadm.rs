//! rvpnadm CLI
//!
//! A command-line driver for the admin client: loads a TOML config, runs one
//! operation against the server, and prints the result as JSON.

use log::{debug, error, info};
use rvpnadm::{AdminClient, Config, CreateUserRequest, Result};
use std::env;
use std::process;

const USAGE: &str = "\
Usage: rvpnadm [--config <path>] <operation> [args]

Operations:
  status                                 server status
  sessions                               list sessions in the hub
  session <name>                         one session's detail
  disconnect <name>                      disconnect a session
  users                                  list users in the hub
  user <name>                            one user's detail
  create-user <name> <realname> [note]   create a user
  update-user <name> <realname> [note]   update a user
  set-password <name> <password>         set a user's password
  delete-user <name>                     delete a user
  enable-user <name>                     clear a user's expiration
  disable-user <name>                    expire a user (now - 1 day)
  set-psk <key>                          set the IPsec pre-shared key
";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let mut args: Vec<String> = env::args().skip(1).collect();
    let config_path = if args.len() >= 2 && args[0] == "--config" {
        args.remove(0);
        args.remove(0)
    } else {
        "config.toml".to_string()
    };

    if args.is_empty() {
        eprintln!("{USAGE}");
        process::exit(2);
    }

    // Load configuration
    let config = Config::from_file(&config_path)?;
    info!("Loaded configuration from: {}", config_path);
    debug!("Server: {}", config.endpoint());
    debug!("Hub: {:?}", config.server.hub);

    let client = AdminClient::new(config)?;

    let operation = args[0].as_str();
    let result = dispatch(&client, operation, &args[1..]).await;

    if let Err(e) = result {
        error!("{operation} failed: {e}");
        process::exit(1);
    }
    Ok(())
}

async fn dispatch(client: &AdminClient, operation: &str, args: &[String]) -> Result<()> {
    match operation {
        "status" => {
            let status = client.server_status().await?;
            print_json(&status);
        }
        "sessions" => {
            let sessions = client.session_list().await?;
            info!("{} session(s)", sessions.len());
            print_json(&sessions);
        }
        "session" => {
            let detail = client.session_info(required(args, 0)?).await?;
            print_json(&detail);
        }
        "disconnect" => {
            client.disconnect_session(required(args, 0)?).await?;
            info!("session disconnected");
        }
        "users" => {
            let users = client.user_list().await?;
            info!("{} user(s)", users.len());
            print_json(&users);
        }
        "user" => {
            let detail = client.user_info(required(args, 0)?).await?;
            print_json(&detail);
        }
        "create-user" => {
            let mut request =
                CreateUserRequest::new(required(args, 0)?, required(args, 1)?);
            if let Some(note) = args.get(2) {
                request = request.note(note);
            }
            client.create_user(&request).await?;
            info!("user created");
        }
        "update-user" => {
            let note = args.get(2).map(String::as_str).unwrap_or("");
            client
                .update_user(required(args, 0)?, required(args, 1)?, note)
                .await?;
            info!("user updated");
        }
        "set-password" => {
            client
                .set_user_password(required(args, 0)?, required(args, 1)?)
                .await?;
            info!("password set");
        }
        "delete-user" => {
            client.delete_user(required(args, 0)?).await?;
            info!("user deleted");
        }
        "enable-user" => {
            client.set_user_enabled(required(args, 0)?, true).await?;
            info!("user enabled");
        }
        "disable-user" => {
            client.set_user_enabled(required(args, 0)?, false).await?;
            info!("user disabled");
        }
        "set-psk" => {
            client.set_pre_shared_key(required(args, 0)?).await?;
            info!("pre-shared key set");
        }
        _ => {
            eprintln!("{USAGE}");
            process::exit(2);
        }
    }
    Ok(())
}

fn required(args: &[String], index: usize) -> Result<&str> {
    args.get(index).map(String::as_str).ok_or_else(|| {
        rvpnadm::AdminError::InvalidParameters(format!("missing argument {}", index + 1))
    })
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("failed to serialize output: {e}"),
    }
}
