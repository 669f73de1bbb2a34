use std::path::PathBuf;

use buckery::{
    checkout::DeliveryMethod,
    money::format_rupiah,
    payments::PaymentMethod,
};
use buckery_app::{
    context::AppContext,
    pages::{CartPage, OrderDataPage, PaymentPage},
};
use clap::{Args, Subcommand};

use super::{failed, table};

#[derive(Debug, Args)]
pub(crate) struct CheckoutCommand {
    #[command(subcommand)]
    command: CheckoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutSubcommand {
    /// Save the recipient and delivery details
    OrderData(OrderDataArgs),

    /// Show the order summary with shipping
    Summary,

    /// Upload the payment proof and place the order
    Pay(PayArgs),
}

#[derive(Debug, Args)]
struct OrderDataArgs {
    /// Recipient name; defaults to the saved draft or your profile
    #[arg(long)]
    name: Option<String>,

    /// Contact phone
    #[arg(long)]
    phone: Option<String>,

    /// Contact email
    #[arg(long)]
    email: Option<String>,

    /// Delivery address
    #[arg(long)]
    address: Option<String>,

    /// Notes for the bakery
    #[arg(long)]
    notes: Option<String>,

    /// Delivery method (pickup, local, gojek, courier)
    #[arg(long)]
    delivery: Option<DeliveryMethod>,
}

#[derive(Debug, Args)]
struct PayArgs {
    /// Payment method (bank, qris)
    #[arg(long, default_value_t = PaymentMethod::Bank)]
    method: PaymentMethod,

    /// JPG or PNG transfer receipt, at most 5MB
    #[arg(long)]
    proof: PathBuf,
}

pub(crate) async fn run(context: &AppContext, command: CheckoutCommand) -> Result<(), String> {
    match command.command {
        CheckoutSubcommand::OrderData(args) => order_data(context, args).await,
        CheckoutSubcommand::Summary => summary(context),
        CheckoutSubcommand::Pay(args) => pay(context, args).await,
    }
}

async fn order_data(context: &AppContext, args: OrderDataArgs) -> Result<(), String> {
    let cart = CartPage::new(context);

    if !cart.proceed() {
        return Err(failed(cart.error(), context.navigator.as_ref()));
    }

    let page = OrderDataPage::new(context);
    page.mount().await;

    page.edit(|form| {
        let fields = [
            (&mut form.name, args.name),
            (&mut form.phone, args.phone),
            (&mut form.email, args.email),
            (&mut form.address, args.address),
            (&mut form.notes, args.notes),
        ];

        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }

        if args.delivery.is_some() {
            form.delivery_method = args.delivery;
        }
    });

    if !page.submit() {
        let options = OrderDataPage::delivery_options()
            .iter()
            .map(|method| format!("  {method}: {}", method.label()))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(format!(
            "{}\ndelivery methods:\n{options}",
            failed(page.error(), context.navigator.as_ref())
        ));
    }

    summary(context)
}

fn summary(context: &AppContext) -> Result<(), String> {
    let page = PaymentPage::new(context);

    if !page.mount() {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    let (Some(draft), Some(totals)) = (page.draft(), page.totals()) else {
        return Err("order data is missing".to_string());
    };

    println!("Nama: {}", draft.name);
    println!("Telepon: {}", draft.phone);
    println!("Email: {}", draft.email);
    println!("Alamat: {}", draft.address);
    println!("Pengiriman: {}", draft.delivery_method.label());

    let mut rows: Vec<[String; 2]> = page
        .lines()
        .iter()
        .map(|line| {
            [
                format!("{} x{}", line.name, line.quantity),
                format_rupiah(line.line_total()),
            ]
        })
        .collect();

    rows.push(["Subtotal".to_string(), format_rupiah(totals.subtotal)]);
    rows.push(["Ongkir".to_string(), format_rupiah(totals.shipping)]);
    rows.push(["Total".to_string(), format_rupiah(totals.total)]);

    println!("{}", table::render(["Pesanan", "Jumlah"], rows, &[1]));

    Ok(())
}

async fn pay(context: &AppContext, args: PayArgs) -> Result<(), String> {
    let page = PaymentPage::new(context);

    if !page.mount() || !page.open_modal() {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    page.choose_method(args.method);

    let modal_error = || {
        page.modal()
            .and_then(|modal| modal.error)
            .or_else(|| page.error())
    };

    if !page.attach_proof_file(&args.proof) {
        return Err(failed(modal_error(), context.navigator.as_ref()));
    }

    if !page.submit().await {
        return Err(failed(modal_error(), context.navigator.as_ref()));
    }

    if let Some(notification) = page.notification() {
        println!("{} {}", notification.order, notification.message);
    }

    page.dismiss_notification();
    page.await_redirect().await;

    Ok(())
}
