use anyhow::Result;
use nanro_client::{LoginRequest, RegisterRequest};
use nanro_core::state::AuthAction;

use crate::app::App;
use crate::prompt::{or_prompt, prompt_required, prompt_secret};

pub async fn login(app: &mut App, email: Option<String>) -> Result<()> {
    let email = or_prompt(email, "Email")?;
    let password = prompt_secret("Password")?;

    app.state.dispatch(AuthAction::LoginStarted);
    match app.client.login(&LoginRequest { email, password }).await {
        Ok(session) => {
            let user = session.user.unwrap_or_default();
            println!("Signed in as {}", user.display_name());
            app.state.dispatch(AuthAction::LoggedIn { user });
            Ok(())
        }
        Err(err) => {
            app.state.dispatch(AuthAction::LoginFailed(err.to_string()));
            Err(err.into())
        }
    }
}

pub async fn register(app: &mut App) -> Result<()> {
    let request = RegisterRequest {
        first_name: prompt_required("First name")?,
        last_name: prompt_required("Last name")?,
        email: prompt_required("Email")?,
        phone: prompt_required("Phone")?,
        password: prompt_secret("Password")?,
        password_confirmation: prompt_secret("Confirm password")?,
    };

    app.state.dispatch(AuthAction::LoginStarted);
    let session = match app.client.register(&request).await {
        Ok(session) => session,
        Err(err) => {
            app.state.dispatch(AuthAction::LoginFailed(err.to_string()));
            return Err(err.into());
        }
    };
    let user = session.user.unwrap_or_default();
    println!("Account created. Signed in as {}", user.display_name());
    if let Some(number) = &user.account_number {
        println!("Account number: {number}");
    }
    app.state.dispatch(AuthAction::LoggedIn { user });
    Ok(())
}

pub async fn logout(app: &mut App) -> Result<()> {
    app.client.logout().await?;
    app.state.dispatch(AuthAction::LoggedOut);
    println!("Signed out.");
    Ok(())
}

/// Show the cached session, then confirm it against the server.
pub async fn status(app: &mut App) -> Result<()> {
    let store = app.client.store();
    if store.token().await?.is_none() {
        println!("Not signed in. Run `nanro auth login`.");
        return Ok(());
    }
    if let Some(user) = store.user().await? {
        println!("Cached user: {}", user.display_name());
    }

    let user = app.client.profile().await?;
    println!("Signed in as {}", user.display_name());
    if let Some(email) = &user.email {
        println!("Email: {email}");
    }
    if let Some(number) = &user.account_number {
        println!("Account number: {number}");
    }
    if let Some(kyc) = &user.kyc_status {
        println!("KYC status: {kyc}");
    }
    println!("Biometric login: {}", if user.biometric_enabled { "on" } else { "off" });
    app.state.dispatch(AuthAction::ProfileLoaded(user));
    Ok(())
}
