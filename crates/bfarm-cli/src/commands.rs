//! CLI command implementations.

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use bfarm_auth::{AuthError, AuthStatus, AuthedClient, SessionManager};
use bfarm_config::{Config, Paths};
use bfarm_storage::CredentialStore;
use bfarm_transport::Dispatcher;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

struct App {
    config: Config,
    store: Arc<CredentialStore>,
    dispatcher: Arc<Dispatcher>,
}

impl App {
    fn init() -> Result<Self> {
        let paths = Paths::new();
        let config = Config::load(&paths).context("Failed to load configuration")?;
        let store = Arc::new(
            bfarm_storage::create_credential_store(&paths.credentials_dir())
                .context("Failed to open credential store")?,
        );
        let dispatcher = Arc::new(Dispatcher::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )?);
        Ok(Self {
            config,
            store,
            dispatcher,
        })
    }

    fn session(&self) -> SessionManager {
        SessionManager::new(Arc::clone(&self.dispatcher), Arc::clone(&self.store))
    }

    fn client(&self) -> AuthedClient {
        AuthedClient::new(
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.store),
            Duration::from_secs(self.config.refresh_timeout_secs),
        )
    }
}

/// Login with email and password.
pub async fn login(email: Option<&str>, format: &OutputFormat) -> Result<i32> {
    let app = App::init()?;

    let email = match email {
        Some(email) => email.to_string(),
        None => {
            print!("Email: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            line.trim().to_string()
        }
    };

    if email.is_empty() {
        output::print_error("Email is required", format);
        return Ok(1);
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(1);
    }

    match app.session().login(&email, &password).await {
        Ok(AuthStatus::LoggedIn { role }) => {
            let suffix = role.map(|r| format!(" ({})", r)).unwrap_or_default();
            output::print_success(&format!("Logged in as {}{}", email, suffix), format);
            Ok(0)
        }
        Ok(AuthStatus::NotLoggedIn) => {
            output::print_error("Login did not produce a session", format);
            Ok(1)
        }
        Err(AuthError::InvalidCredentials(_)) => {
            output::print_error("Invalid email or password", format);
            Ok(1)
        }
        Err(error) => {
            output::print_error(&format!("Login failed: {}", error), format);
            Ok(1)
        }
    }
}

/// Logout and clear the stored credential.
pub fn logout(format: &OutputFormat) -> Result<i32> {
    let app = App::init()?;
    app.session().logout()?;
    output::print_success("Logged out", format);
    Ok(0)
}

/// Print authentication status.
pub fn status(format: &OutputFormat) -> Result<i32> {
    let app = App::init()?;
    match app.session().status()? {
        AuthStatus::LoggedIn { role } => {
            output::print_success("Logged in", format);
            if let Some(role) = role {
                output::print_row("Role", &role);
            }
            Ok(0)
        }
        AuthStatus::NotLoggedIn => {
            output::print_success("Not logged in", format);
            Ok(1)
        }
    }
}

/// Print the identity decoded from the stored access token.
pub fn whoami(format: &OutputFormat) -> Result<i32> {
    let app = App::init()?;
    match app.session().identity()? {
        Some(claims) => {
            output::print_row("User ID", &claims.id);
            if let Some(name) = &claims.name {
                output::print_row("Name", name);
            }
            if let Some(email) = &claims.email {
                output::print_row("Email", email);
            }
            if let Some(role) = &claims.role {
                output::print_row("Role", role);
            }
            Ok(0)
        }
        None => {
            output::print_error("Not logged in", format);
            Ok(1)
        }
    }
}

/// Issue an authenticated GET request and print the JSON response.
pub async fn get(path: &str, format: &OutputFormat) -> Result<i32> {
    let app = App::init()?;
    let client = app.client();

    match client.get_json::<serde_json::Value>(path).await {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(0)
        }
        Err(AuthError::SessionExpired) => {
            output::print_error(
                "Session expired. Run 'bfarm login' to re-authenticate",
                format,
            );
            Ok(1)
        }
        Err(error) => {
            output::print_error(&format!("Request failed: {}", error), format);
            Ok(1)
        }
    }
}
