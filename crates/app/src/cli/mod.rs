use std::sync::Arc;

use buckery::routes::Route;
use buckery_app::{
    config::{ClientConfig, LoggingConfig},
    context::AppContext,
    navigation::{History, Navigator},
};
use clap::{Parser, Subcommand};

mod account;
mod admin;
mod cart;
mod checkout;
mod menu;
mod orders;
mod table;

#[derive(Debug, Parser)]
#[command(name = "buckery", about = "Buckery storefront client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in to the storefront or the back office
    Login(account::LoginArgs),

    /// Create a customer account
    Register(account::RegisterArgs),

    /// Sign out and forget the cart
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Update phone, address or notes
    Profile(account::ProfileArgs),

    /// Browse the menu
    Menu(menu::MenuArgs),

    /// Inspect and change the cart
    Cart(cart::CartCommand),

    /// Fill in order data and upload the payment
    Checkout(checkout::CheckoutCommand),

    /// List your orders
    Orders(orders::OrdersArgs),

    /// Back-office tools
    Admin(admin::AdminCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.config.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let history = Arc::new(History::new(Route::Home));

        let context = AppContext::from_config(&self.config, history.clone())
            .map_err(|error| format!("failed to start client: {error}"))?;

        context
            .sessions
            .check_auth()
            .await
            .map_err(|error| format!("failed to restore session: {error}"))?;

        let result = match self.command {
            Commands::Login(args) => account::login(&context, args).await,
            Commands::Register(args) => account::register(&context, args).await,
            Commands::Logout => account::logout(&context).await,
            Commands::Whoami => account::whoami(&context).await,
            Commands::Profile(args) => account::profile(&context, args).await,
            Commands::Menu(args) => menu::run(&context, args).await,
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Checkout(command) => checkout::run(&context, command).await,
            Commands::Orders(args) => orders::run(&context, args).await,
            Commands::Admin(command) => admin::run(&context, command).await,
        };

        if let Some(path) = history.redirects().last() {
            println!("next page: {path}");
        }

        result
    }
}

/// Error text for a page action that did not go through: the page's banner,
/// or where the page sent the visitor instead.
fn failed(error: Option<String>, navigator: &dyn Navigator) -> String {
    error.unwrap_or_else(|| format!("redirected to {}", navigator.current_path()))
}
