use buckery::money::format_rupiah;
use buckery_app::{
    admin::{CrudPage, PaymentMonitorPage, StaffPage, StatusFilter},
    catalog::Product,
    context::AppContext,
    pages::MenuPage,
    payments::PaymentId,
    staff::{NewStaff, StaffId},
};
use clap::{Args, Subcommand};
use zeroize::Zeroizing;

use super::{failed, orders::print_payment, table};

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// List payments awaiting or past review
    Payments(PaymentsArgs),

    /// Accept a pending payment
    Confirm(PaymentArgs),

    /// Refuse a pending payment
    Reject(PaymentArgs),

    /// List products, including ones taken off sale
    Products,

    /// Put a product on or off sale
    ToggleProduct(RecordArgs),

    /// Delete a product
    DeleteProduct(RecordArgs),

    /// List staff accounts
    Staff,

    /// Create a staff account
    AddStaff(AddStaffArgs),

    /// Enable or disable a staff account
    ToggleStaff(StaffArgs),
}

#[derive(Debug, Args)]
struct PaymentsArgs {
    /// Status to list (all, pending, confirmed, rejected)
    #[arg(long, default_value_t = StatusFilter::All)]
    status: StatusFilter,

    /// Show one payment in detail
    #[arg(long)]
    id: Option<PaymentId>,
}

#[derive(Debug, Args)]
struct PaymentArgs {
    /// Payment id
    id: PaymentId,
}

#[derive(Debug, Args)]
struct RecordArgs {
    /// Record id
    id: i64,
}

#[derive(Debug, Args)]
struct StaffArgs {
    /// Staff account id
    id: StaffId,
}

#[derive(Debug, Args)]
struct AddStaffArgs {
    /// Username
    #[arg(long)]
    username: String,

    /// Initial password
    #[arg(long, env = "BUCKERY_STAFF_PASSWORD", hide_env_values = true)]
    password: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Full name
    #[arg(long)]
    name: String,
}

pub(crate) async fn run(context: &AppContext, command: AdminCommand) -> Result<(), String> {
    match command.command {
        AdminSubcommand::Payments(args) => payments(context, args).await,
        AdminSubcommand::Confirm(args) => review(context, args.id, true).await,
        AdminSubcommand::Reject(args) => review(context, args.id, false).await,
        AdminSubcommand::Products => products(context).await,
        AdminSubcommand::ToggleProduct(args) => toggle_product(context, args.id).await,
        AdminSubcommand::DeleteProduct(args) => delete_product(context, args.id).await,
        AdminSubcommand::Staff => staff(context).await,
        AdminSubcommand::AddStaff(args) => add_staff(context, args).await,
        AdminSubcommand::ToggleStaff(args) => toggle_staff(context, args.id).await,
    }
}

fn monitor(context: &AppContext) -> PaymentMonitorPage {
    PaymentMonitorPage::new(
        context.payments.clone(),
        context.api.clone(),
        context.session.clone(),
        context.navigator.clone(),
    )
}

async fn payments(context: &AppContext, args: PaymentsArgs) -> Result<(), String> {
    let page = monitor(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    if let Some(id) = args.id {
        let payment = page.select(id).ok_or_else(|| format!("payment {id} not found"))?;
        print_payment(&payment, page.proof_url(&payment));
        return Ok(());
    }

    page.set_filter(args.status);

    let payments = page.visible();

    if payments.is_empty() {
        println!("no {} payments", page.filter());
        return Ok(());
    }

    println!(
        "{}",
        table::render(
            ["ID", "Pesanan", "Pelanggan", "Metode", "Total", "Status"],
            payments.iter().map(|payment| {
                [
                    payment.id.to_string(),
                    payment.display_number(),
                    payment.customer_name.clone(),
                    payment.payment_method.label().to_string(),
                    format_rupiah(payment.total),
                    payment.status.badge().to_string(),
                ]
            }),
            &[0, 4],
        )
    );

    Ok(())
}

async fn review(context: &AppContext, id: PaymentId, confirm: bool) -> Result<(), String> {
    let page = monitor(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    let reviewed = if confirm {
        page.confirm(id).await
    } else {
        page.reject(id).await
    };

    if !reviewed {
        return Err(page
            .error()
            .unwrap_or_else(|| format!("payment {id} cannot be reviewed")));
    }

    if let Some(payment) = page.visible().iter().find(|payment| payment.id == id) {
        println!("{} {}", payment.display_number(), payment.status.badge());
    }

    Ok(())
}

fn product_page(context: &AppContext) -> CrudPage<Product> {
    CrudPage::new(
        context.api.clone(),
        context.session.clone(),
        context.navigator.clone(),
    )
}

async fn products(context: &AppContext) -> Result<(), String> {
    let page = product_page(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    println!(
        "{}",
        table::render(
            ["ID", "Produk", "Harga", "Stok", "Aktif"],
            page.records().iter().map(|product| {
                [
                    product.id.to_string(),
                    product.name.clone(),
                    MenuPage::price_label(product),
                    product.stock.to_string(),
                    if product.is_active { "ya" } else { "tidak" }.to_string(),
                ]
            }),
            &[0, 2, 3],
        )
    );

    Ok(())
}

async fn toggle_product(context: &AppContext, id: i64) -> Result<(), String> {
    let page = product_page(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    if !page.toggle_active(id).await {
        return Err(page
            .error()
            .unwrap_or_else(|| format!("product {id} not found")));
    }

    if let Some(product) = page.record(id) {
        let state = if product.is_active { "on sale" } else { "off sale" };
        println!("{} is {state}", product.name);
    }

    Ok(())
}

async fn delete_product(context: &AppContext, id: i64) -> Result<(), String> {
    let page = product_page(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    if !page.delete(id).await {
        return Err(page
            .error()
            .unwrap_or_else(|| format!("product {id} not found")));
    }

    println!("product {id} deleted");

    Ok(())
}

fn staff_page(context: &AppContext) -> StaffPage {
    StaffPage::new(
        context.staff.clone(),
        context.session.clone(),
        context.navigator.clone(),
    )
}

async fn staff(context: &AppContext) -> Result<(), String> {
    let page = staff_page(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    println!(
        "{}",
        table::render(
            ["ID", "Username", "Nama", "Email", "Aktif"],
            page.members().into_iter().map(|member| {
                [
                    member.id.to_string(),
                    member.username,
                    member.nama_lengkap,
                    member.email,
                    if member.is_active { "ya" } else { "tidak" }.to_string(),
                ]
            }),
            &[0],
        )
    );

    Ok(())
}

async fn add_staff(context: &AppContext, args: AddStaffArgs) -> Result<(), String> {
    let page = staff_page(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    let created = page
        .create(NewStaff {
            username: args.username,
            password: Zeroizing::new(args.password),
            email: args.email,
            nama_lengkap: args.name,
        })
        .await;

    if !created {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    println!("staff account created");

    Ok(())
}

async fn toggle_staff(context: &AppContext, id: StaffId) -> Result<(), String> {
    let page = staff_page(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    if !page.toggle_active(id).await {
        return Err(page
            .error()
            .unwrap_or_else(|| format!("staff account {id} not found")));
    }

    if let Some(member) = page.members().into_iter().find(|member| member.id == id) {
        let state = if member.is_active { "enabled" } else { "disabled" };
        println!("{} is {state}", member.username);
    }

    Ok(())
}
