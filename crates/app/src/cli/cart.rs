use buckery::{ids::ProductId, money::format_rupiah};
use buckery_app::{
    context::AppContext,
    pages::{CartPage, MenuPage},
};
use clap::{Args, Subcommand};

use super::{failed, table};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// List the cart
    Show,

    /// Add a product from the menu
    Add(AddArgs),

    /// Set a line's quantity
    Set(SetArgs),

    /// Take one unit off a line
    Decrement(ProductArgs),

    /// Drop a line
    Remove(ProductArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id from `buckery menu`
    product: ProductId,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Product id
    product: ProductId,

    /// New quantity, zero keeps the line
    quantity: u32,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id
    product: ProductId,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    let page = CartPage::new(context);

    let done = match command.command {
        CartSubcommand::Show => true,
        CartSubcommand::Add(args) => add(context, args).await?,
        CartSubcommand::Set(args) => page.set_quantity(args.product, args.quantity),
        CartSubcommand::Decrement(args) => page.decrement(args.product),
        CartSubcommand::Remove(args) => page.remove(args.product),
        CartSubcommand::Clear => {
            context
                .cart
                .clear_cart()
                .map_err(|error| format!("failed to clear cart: {error}"))?;
            true
        }
    };

    if !done {
        return Err(page
            .error()
            .unwrap_or_else(|| "product is not in the cart".to_string()));
    }

    show(&page);

    Ok(())
}

async fn add(context: &AppContext, args: AddArgs) -> Result<bool, String> {
    if args.quantity == 0 {
        return Err("quantity must be at least 1".to_string());
    }

    let menu = MenuPage::new(context);

    if !menu.mount().await {
        return Err(failed(menu.error(), context.navigator.as_ref()));
    }

    for _ in 0..args.quantity {
        if !menu.add_to_cart(args.product) {
            return Err(menu
                .error()
                .unwrap_or_else(|| format!("product {} is not on the menu", args.product)));
        }
    }

    Ok(true)
}

fn show(page: &CartPage) {
    let lines = page.lines();

    if lines.is_empty() {
        println!("Keranjang belanja kosong");
        return;
    }

    println!(
        "{}",
        table::render(
            ["ID", "Produk", "Harga", "Jumlah", "Total"],
            lines.iter().map(|line| {
                [
                    line.product_id.to_string(),
                    line.name.clone(),
                    format_rupiah(line.unit_price),
                    line.quantity.to_string(),
                    format_rupiah(line.line_total()),
                ]
            }),
            &[0, 2, 3, 4],
        )
    );
    println!("Subtotal: {}", format_rupiah(page.subtotal()));
}
