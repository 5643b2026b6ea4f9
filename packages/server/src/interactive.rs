//! Interactive startup for the API server.

use dialoguer::{Confirm, Input};

/// Prompts for the bind address and port, then starts the server.
///
/// The answers are exported as `BIND_ADDR` and `PORT` so that
/// [`super::run_server`] picks them up. Missing Precisely credentials are
/// reported up front since every lookup would fail without them.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Lot Measure Server");
    println!();

    if lot_measure_precisely::credentials_from_env().is_none() {
        println!("Warning: PRECISELY_API_KEY / PRECISELY_API_SECRET are not set.");
        println!("Parcel lookups will return 500 until they are.");
        println!();
    }

    let default_bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let default_port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(default_bind.clone())
        .interact_text()
        .unwrap_or(default_bind);

    let port: String = Input::new()
        .with_prompt("Port")
        .default(default_port.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            input
                .parse::<u16>()
                .map(|_| ())
                .map_err(|_| "Port must be a number between 0 and 65535")
        })
        .interact_text()
        .unwrap_or(default_port);

    // SAFETY: no other threads exist yet; the server reads these once at
    // startup.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port);
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
