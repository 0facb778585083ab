// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line driver over the data-access layer.
//!
//! Thin by design: each subcommand wires a service call or a [`PagedQuery`]
//! and prints the result. No state of its own.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::api::auth::{AuthApi, Credentials, OtpVerification, Registration};
use crate::api::cart::CartApi;
use crate::api::categories::CategoryApi;
use crate::api::products::{self, ProductApi};
use crate::config::Config;
use crate::http::ApiClient;
use crate::query::{PagedQuery, QueryDescriptor, QuerySnapshot};
use crate::session::SessionStore;

/// Storefront backend client.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with email and password.
    Login { email: String, password: String },
    /// Register a new account.
    Register { email: String, password: String, confirm_password: String },
    /// Log out and clear the stored session.
    Logout,
    /// Show the current session.
    Whoami,
    /// Request a password-reset code.
    ForgotPassword { email: String },
    /// Complete a password reset with the emailed code.
    VerifyOtp { email: String, code: String, new_password: String },
    /// Browse products.
    Products {
        /// Filter by name.
        #[arg(long)]
        name: Option<String>,
        /// Filter by category id.
        #[arg(long)]
        category: Option<u64>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        /// Featured products only.
        #[arg(long)]
        featured: bool,
        /// Page number (1-based).
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one product.
    Product { id: u64 },
    /// List categories.
    Categories,
    /// Cart operations.
    #[command(subcommand)]
    Cart(CartCommand),
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart contents.
    Show,
    /// Add a product.
    Add {
        product_id: u64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Change a line's quantity.
    SetQuantity { item_id: u64, quantity: u32 },
    /// Remove a line.
    Remove { item_id: u64 },
    /// Empty the cart.
    Clear,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let session = Arc::new(SessionStore::load(cli.config.session_path()));
    let client = Arc::new(ApiClient::with_timeout(
        cli.config.api_url.clone(),
        Arc::clone(&session),
        cli.config.timeout(),
    ));

    match cli.command {
        Command::Login { email, password } => {
            let auth = AuthApi::new(client);
            let payload = auth.login(&Credentials { email, password }).await?;
            println!("logged in with roles: {}", payload.roles.join(", "));
        }
        Command::Register { email, password, confirm_password } => {
            let auth = AuthApi::new(client);
            let payload =
                auth.register(&Registration { email, password, confirm_password }).await?;
            println!("registered with roles: {}", payload.roles.join(", "));
        }
        Command::Logout => {
            AuthApi::new(client).logout().await;
            println!("logged out");
        }
        Command::Whoami => {
            let current = session.snapshot().await;
            if current.is_authenticated() {
                println!("authenticated, roles: {}", current.roles.join(", "));
            } else {
                println!("not authenticated");
            }
        }
        Command::ForgotPassword { email } => {
            let message = AuthApi::new(client).forgot_password(&email).await?;
            println!("{}", message.unwrap_or_else(|| "reset code sent".to_owned()));
        }
        Command::VerifyOtp { email, code, new_password } => {
            let request = OtpVerification { email, otp_code: code, new_password };
            let message = AuthApi::new(client).verify_otp(&request).await?;
            println!("{}", message.unwrap_or_else(|| "password changed".to_owned()));
        }
        Command::Products { name, category, min_price, max_price, featured, page } => {
            let mut descriptor = QueryDescriptor::new(cli.config.page_size);
            if let Some(name) = name {
                descriptor.filters.insert(products::filters::NAME.to_owned(), name);
            }
            if let Some(category) = category {
                descriptor
                    .filters
                    .insert(products::filters::CATEGORY.to_owned(), category.to_string());
            }
            if let Some(min) = min_price {
                descriptor.filters.insert(products::filters::MIN_PRICE.to_owned(), min.to_string());
            }
            if let Some(max) = max_price {
                descriptor.filters.insert(products::filters::MAX_PRICE.to_owned(), max.to_string());
            }
            if featured {
                descriptor.filters.insert(products::filters::FEATURED.to_owned(), "true".to_owned());
            }
            descriptor.page = page.saturating_sub(1);

            let query = PagedQuery::start(ProductApi::new(client), descriptor).await;
            let snapshot = query.snapshot().await;
            fail_on_error(&snapshot)?;
            for product in &snapshot.page.items {
                println!("{:>6}  {:<40}  {:>10.2}", product.id, product.product_name, product.price);
            }
            print_page_footer(&snapshot);
        }
        Command::Product { id } => {
            let product = ProductApi::new(client).get(id).await?;
            println!("{:#?}", product);
        }
        Command::Categories => {
            let query =
                PagedQuery::start(CategoryApi::new(client), QueryDescriptor::default()).await;
            let snapshot = query.snapshot().await;
            fail_on_error(&snapshot)?;
            for category in &snapshot.page.items {
                println!("{:>6}  {}", category.id, category.category_name);
            }
        }
        Command::Cart(cart_command) => {
            let cart = CartApi::new(client);
            match cart_command {
                CartCommand::Show => {
                    let contents = cart.get().await?;
                    for item in &contents.items {
                        println!(
                            "{:>6}  {:<40}  x{:<4}  {:>10.2}",
                            item.product_id, item.product_name, item.quantity, item.price
                        );
                    }
                    println!("total: {:.2}", contents.total_price);
                }
                CartCommand::Add { product_id, quantity } => {
                    cart.add_item(product_id, quantity).await?;
                    println!("added product {product_id} x{quantity}");
                }
                CartCommand::SetQuantity { item_id, quantity } => {
                    cart.update_quantity(item_id, quantity).await?;
                    println!("updated item {item_id} to x{quantity}");
                }
                CartCommand::Remove { item_id } => {
                    cart.remove_item(item_id).await?;
                    println!("removed item {item_id}");
                }
                CartCommand::Clear => {
                    cart.clear().await?;
                    println!("cart cleared");
                }
            }
        }
    }

    Ok(())
}

fn fail_on_error<T>(snapshot: &QuerySnapshot<T>) -> anyhow::Result<()> {
    match snapshot.error {
        Some(ref message) => anyhow::bail!("{message}"),
        None => Ok(()),
    }
}

fn print_page_footer<T>(snapshot: &QuerySnapshot<T>) {
    println!(
        "page {}/{} ({} items)",
        snapshot.page.page_index + 1,
        snapshot.page.total_pages,
        snapshot.page.total_items,
    );
}
