use color_eyre::eyre::{Context, Result};
use pledge_board::{
    app_state::AppState,
    configure_ledger_store, seed_starter_members,
    utils::{
        constants::{ALLOWED_ORIGINS, APP_ADDRESS},
        tracing::init_tracing,
    },
    Application,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let ledger_store = configure_ledger_store()
        .await
        .wrap_err("Failed to configure ledger store")?;
    seed_starter_members(&ledger_store)
        .await
        .wrap_err("Failed to seed starter members")?;

    let app_state = AppState::new(ledger_store);

    let app =
        Application::build(app_state, APP_ADDRESS.as_str(), &ALLOWED_ORIGINS)
            .await
            .wrap_err("Failed to build app")?;

    app.run().await.wrap_err("Failed to run app")?;
    Ok(())
}
