//! VERSE CLI - browse the catalog, manage the cart, ask the AI advisor,
//! check out and try garments on from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse products
//! verse products list --limit 10
//!
//! # Add a shirt in size M to the cart
//! verse cart add oxford-white -q 1 -s M
//!
//! # Get a size recommendation (remembers your measurements)
//! verse size --height 178 --weight 72 --fit regular
//!
//! # Place a cash-on-delivery order
//! verse checkout cod --full-name "Asha Rao" --email asha@example.com \
//!     --phone 9876543210 --address "12 MG Road" --city Bengaluru \
//!     --state Karnataka --pincode 560001
//!
//! # Virtual try-on with a catalog product
//! verse try-on --person me.jpg --product oxford-white --out ./looks
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE` / `SHOPIFY_ADMIN_API_TOKEN` - catalog access
//! - `VERSE_API_BASE_URL` - AI and order backend
//! - `VERSE_DATA_DIR` - where the cart and size profile are kept
//! - `SENTRY_DSN` - error reporting (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use verse_storefront::advisor::{BodyType, FitPreference};
use verse_storefront::checkout::CustomerDetails;
use verse_storefront::config::StorefrontConfig;
use verse_storefront::error::AppError;
use verse_storefront::telemetry;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "verse")]
#[command(author, version, about = "VERSE storefront from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Show and edit the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Get a size recommendation
    Size(SizeArgs),
    /// Ask the AI stylist a question
    Style {
        /// What to ask
        question: String,

        /// Handle of the product the question is about
        #[arg(long)]
        product: Option<String>,
    },
    /// Track an order by ID or phone number
    Track {
        /// Order ID
        #[arg(long, default_value = "")]
        order_id: String,

        /// Phone number the order was placed with
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Free-form chat with the assistant
    Chat {
        /// Prompt to send
        prompt: String,
    },
    /// Check out the current cart
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Virtual try-on
    TryOn(TryOnArgs),
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Maximum number of products (1-250)
        #[arg(short, long, default_value_t = verse_storefront::shopify::DEFAULT_PRODUCT_LIMIT)]
        limit: u32,
    },
    /// Show one product
    Show {
        /// Product handle
        handle: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product by handle
    Add {
        /// Product handle
        handle: String,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Size, e.g. M
        #[arg(short, long)]
        size: Option<String>,
    },
    /// Set the quantity of a line (0 or less removes it)
    Set {
        /// Product ID as shown by `cart show`
        product_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Size of the line
        #[arg(short, long)]
        size: Option<String>,
    },
    /// Remove a line
    Remove {
        /// Product ID as shown by `cart show`
        product_id: String,

        /// Size of the line
        #[arg(short, long)]
        size: Option<String>,
    },
    /// Empty the cart
    Clear,
}

/// Measurements for a size recommendation. Missing values come from the
/// saved size profile.
#[derive(Args)]
struct SizeArgs {
    /// Height in centimetres
    #[arg(long)]
    height: Option<f64>,

    /// Weight in kilograms
    #[arg(long)]
    weight: Option<f64>,

    /// Body type (slim, regular, broad)
    #[arg(long)]
    body_type: Option<BodyType>,

    /// Fit preference (slim, regular, relaxed)
    #[arg(long)]
    fit: Option<FitPreference>,

    /// Forget the saved size profile instead
    #[arg(long, conflicts_with_all = ["height", "weight", "body_type", "fit"])]
    forget: bool,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Place a cash-on-delivery order
    Cod(DetailsArgs),
    /// Create a payment gateway order
    Online(DetailsArgs),
    /// Confirm a gateway payment and clear the cart
    Confirm {
        /// Gateway order ID
        #[arg(long)]
        order_id: String,

        /// Gateway payment ID
        #[arg(long)]
        payment_id: String,

        /// Gateway signature
        #[arg(long)]
        signature: String,
    },
}

/// Shipping and contact details.
#[derive(Args)]
struct DetailsArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    pincode: String,
}

impl From<DetailsArgs> for CustomerDetails {
    fn from(args: DetailsArgs) -> Self {
        Self {
            full_name: args.full_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            state: args.state,
            pincode: args.pincode,
        }
    }
}

#[derive(Args)]
struct TryOnArgs {
    /// Photo of the person
    #[arg(long)]
    person: PathBuf,

    /// Photo of the garment
    #[arg(long, conflicts_with = "product", required_unless_present = "product")]
    garment: Option<PathBuf>,

    /// Handle of a catalog product to try on
    #[arg(long)]
    product: Option<String>,

    /// Garment description passed to the model
    #[arg(long)]
    description: Option<String>,

    /// Also generate a short video
    #[arg(long)]
    video: bool,

    /// Directory to write the results to
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = telemetry::init_sentry(&config.sentry);
    telemetry::init_tracing("verse_storefront=info,verse_cli=info");

    let ctx = Context::new(config);
    match run(cli, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.capture();
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, ctx: &Context) -> Result<(), AppError> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { limit } => commands::products::list(ctx, limit).await,
            ProductsAction::Show { handle } => commands::products::show(ctx, &handle).await,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx),
            CartAction::Add {
                handle,
                quantity,
                size,
            } => commands::cart::add(ctx, &handle, quantity, size.as_deref()).await,
            CartAction::Set {
                product_id,
                quantity,
                size,
            } => commands::cart::set(ctx, &product_id, quantity, size.as_deref()),
            CartAction::Remove { product_id, size } => {
                commands::cart::remove(ctx, &product_id, size.as_deref())
            }
            CartAction::Clear => commands::cart::clear(ctx),
        },
        Commands::Size(args) => {
            if args.forget {
                return commands::advisor::forget_size(ctx);
            }
            commands::advisor::size(
                ctx,
                commands::advisor::SizeInput {
                    height: args.height,
                    weight: args.weight,
                    body_type: args.body_type,
                    fit: args.fit,
                },
            )
            .await
        }
        Commands::Style { question, product } => {
            commands::advisor::style(ctx, &question, product.as_deref()).await
        }
        Commands::Track { order_id, phone } => {
            commands::advisor::track(ctx, &order_id, &phone).await
        }
        Commands::Chat { prompt } => commands::advisor::chat(ctx, &prompt).await,
        Commands::Checkout { action } => match action {
            CheckoutAction::Cod(details) => commands::checkout::cod(ctx, details.into()).await,
            CheckoutAction::Online(details) => {
                commands::checkout::online(ctx, details.into()).await
            }
            CheckoutAction::Confirm {
                order_id,
                payment_id,
                signature,
            } => commands::checkout::confirm(ctx, order_id, payment_id, signature).await,
        },
        Commands::TryOn(args) => {
            commands::try_on::run(
                ctx,
                commands::try_on::TryOnInput {
                    person: args.person,
                    garment: args.garment,
                    product: args.product,
                    description: args.description,
                    video: args.video,
                    out: args.out,
                },
            )
            .await
        }
    }
}
