use buckery_app::{catalog::CategoryId, context::AppContext, pages::MenuPage};
use clap::Args;

use super::{failed, table};

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    /// Only list products in this category
    #[arg(long)]
    category: Option<CategoryId>,
}

pub(crate) async fn run(context: &AppContext, args: MenuArgs) -> Result<(), String> {
    let page = MenuPage::new(context);

    let loaded = match args.category {
        Some(category) => page.mount().await && page.select_category(Some(category)).await,
        None => page.mount().await,
    };

    if !loaded {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    let categories = page.categories();

    println!(
        "{}",
        table::render(
            ["ID", "Kategori"],
            categories
                .iter()
                .map(|category| [category.id.to_string(), category.name.clone()]),
            &[0],
        )
    );

    let products = page.products();

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    println!(
        "{}",
        table::render(
            ["ID", "Produk", "Kategori", "Harga", "Stok", "Status"],
            products.iter().map(|product| {
                let category = categories
                    .iter()
                    .find(|category| category.id == product.category)
                    .map_or_else(|| product.category.to_string(), |category| category.name.clone());

                [
                    product.id.to_string(),
                    product.name.clone(),
                    category,
                    MenuPage::price_label(product),
                    product.stock.to_string(),
                    if product.is_active { "tersedia" } else { "habis" }.to_string(),
                ]
            }),
            &[0, 3, 4],
        )
    );

    Ok(())
}
