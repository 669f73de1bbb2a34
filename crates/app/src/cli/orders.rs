use buckery::money::format_rupiah;
use buckery_app::{
    context::AppContext,
    pages::OrdersPage,
    payments::{Payment, PaymentId},
};
use clap::Args;

use super::{failed, table};

#[derive(Debug, Args)]
pub(crate) struct OrdersArgs {
    /// Show one order in detail
    #[arg(long)]
    id: Option<PaymentId>,
}

pub(crate) async fn run(context: &AppContext, args: OrdersArgs) -> Result<(), String> {
    let page = OrdersPage::new(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    if let Some(id) = args.id {
        let payment = page.select(id).ok_or_else(|| format!("order {id} not found"))?;
        print_payment(&payment, page.proof_url(&payment));
        return Ok(());
    }

    let entries = page.entries();

    if entries.is_empty() {
        println!("Belum ada pesanan");
        return Ok(());
    }

    println!(
        "{}",
        table::render(
            ["ID", "Pesanan", "Total", "Status"],
            entries.into_iter().map(|entry| {
                [
                    entry.id.to_string(),
                    entry.number,
                    entry.total,
                    entry.badge.to_string(),
                ]
            }),
            &[0, 2],
        )
    );

    Ok(())
}

/// Order detail shared by the customer and back-office views.
pub(super) fn print_payment(payment: &Payment, proof_url: Option<String>) {
    println!("Pesanan: {}", payment.display_number());
    println!("Status: {}", payment.status.badge());
    println!("Nama: {}", payment.customer_name);
    println!("Telepon: {}", payment.phone);
    println!("Email: {}", payment.email);
    println!("Alamat: {}", payment.address);
    println!("Metode: {}", payment.payment_method.label());

    if let Some(created_at) = payment.created_at {
        println!("Tanggal: {created_at}");
    }

    println!(
        "{}",
        table::render(
            ["Produk", "Harga", "Jumlah"],
            payment.items.items.iter().map(|item| {
                [
                    item.name.clone(),
                    format_rupiah(item.price),
                    item.quantity.to_string(),
                ]
            }),
            &[1, 2],
        )
    );
    println!("Total: {}", format_rupiah(payment.total));

    if let Some(url) = proof_url {
        println!("Bukti pembayaran: {url}");
    }
}
