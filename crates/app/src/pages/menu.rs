//! Menu.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use buckery::{cart::CartStore, ids::ProductId, money::format_rupiah};
use tracing::{debug, info};

use crate::{
    api::ApiClient,
    catalog::{CatalogService, Category, CategoryId, Product},
    context::AppContext,
    pages::ErrorBanner,
};

#[derive(Debug, Default)]
struct MenuState {
    categories: Vec<Category>,
    products: Vec<Product>,
    category: Option<CategoryId>,
    loading: bool,
}

/// Product catalog with a category filter and add-to-cart buttons.
pub struct MenuPage {
    catalog: Arc<dyn CatalogService>,
    api: Arc<ApiClient>,
    cart: Arc<CartStore>,
    banner: ErrorBanner,
    state: Mutex<MenuState>,
}

impl Debug for MenuPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MenuPage")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl MenuPage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            catalog: context.catalog.clone(),
            api: context.api.clone(),
            cart: context.cart.clone(),
            banner: ErrorBanner::new(),
            state: Mutex::new(MenuState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MenuState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load categories and the products of the selected category.
    pub async fn mount(&self) -> bool {
        let category = {
            let mut state = self.state();
            state.loading = true;
            state.category
        };

        let (categories, products) = tokio::join!(
            self.catalog.categories(),
            self.catalog.products(category)
        );

        let mut state = self.state();
        state.loading = false;

        match (categories, products) {
            (Ok(categories), Ok(products)) => {
                debug!(
                    categories = categories.len(),
                    products = products.len(),
                    "menu loaded"
                );

                state.categories = categories;
                state.products = products;
                true
            }
            (Err(error), _) | (_, Err(error)) => {
                drop(state);
                self.banner.report(&error);
                false
            }
        }
    }

    /// Show one category, or every product with `None`.
    pub async fn select_category(&self, category: Option<CategoryId>) -> bool {
        self.state().category = category;

        match self.catalog.products(category).await {
            Ok(products) => {
                self.state().products = products;
                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Selected category.
    pub fn category(&self) -> Option<CategoryId> {
        self.state().category
    }

    /// Categories for the filter.
    pub fn categories(&self) -> Vec<Category> {
        self.state().categories.clone()
    }

    /// Listed products.
    pub fn products(&self) -> Vec<Product> {
        self.state().products.clone()
    }

    /// Whether the menu is loading.
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Price as shown on the card.
    pub fn price_label(product: &Product) -> String {
        format_rupiah(product.price)
    }

    /// Absolute URL of a product's picture.
    pub fn image_url(&self, product: &Product) -> Option<String> {
        product
            .image
            .as_deref()
            .filter(|reference| !reference.is_empty())
            .map(|reference| self.api.media_url(reference))
    }

    /// Put one unit of a listed product in the cart.
    pub fn add_to_cart(&self, id: ProductId) -> bool {
        let product = self
            .state()
            .products
            .iter()
            .find(|product| product.id == id)
            .cloned();

        let Some(product) = product else {
            return false;
        };

        if !product.is_active {
            self.banner.show("Produk tidak tersedia");
            return false;
        }

        match self.cart.add_item(product.to_cart_line()) {
            Ok(()) => {
                info!(product = %product.id, name = %product.name, "added to cart");
                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }
}

#[cfg(test)]
mod tests {
    use buckery::routes::Route;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{catalog::MockCatalogService, test::context::memory_context};

    use super::*;

    fn product(id: i64, name: &str, active: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::from(15_000),
            description: String::new(),
            stock: 10,
            image: Some("/media/products/roti.png".to_string()),
            category: CategoryId::new(1),
            is_active: active,
            created_at: None,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            description: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn adding_twice_merges_into_one_line() -> TestResult {
        let (mut context, _) = memory_context(Route::Menu)?;

        let mut catalog = MockCatalogService::new();
        catalog
            .expect_categories()
            .once()
            .return_once(|| Ok(vec![category(1, "Roti")]));
        catalog
            .expect_products()
            .once()
            .withf(Option::is_none)
            .return_once(|_| Ok(vec![product(1, "Roti Sobek", true)]));
        context.catalog = Arc::new(catalog);

        let page = MenuPage::new(&context);

        assert!(page.mount().await);
        assert!(page.add_to_cart(ProductId::new(1)));
        assert!(page.add_to_cart(ProductId::new(1)));

        assert_eq!(context.cart.lines().len(), 1);
        assert_eq!(context.cart.item_count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn inactive_products_stay_out_of_the_cart() -> TestResult {
        let (mut context, _) = memory_context(Route::Menu)?;

        let mut catalog = MockCatalogService::new();
        catalog.expect_categories().once().return_once(|| Ok(vec![]));
        catalog
            .expect_products()
            .once()
            .return_once(|_| Ok(vec![product(2, "Bolu", false)]));
        context.catalog = Arc::new(catalog);

        let page = MenuPage::new(&context);
        page.mount().await;

        assert!(!page.add_to_cart(ProductId::new(2)));
        assert_eq!(page.error().as_deref(), Some("Produk tidak tersedia"));
        assert!(context.cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn category_filter_is_sent_to_the_backend() -> TestResult {
        let (mut context, _) = memory_context(Route::Menu)?;

        let mut catalog = MockCatalogService::new();
        catalog
            .expect_products()
            .once()
            .withf(|category| *category == Some(CategoryId::new(3)))
            .return_once(|_| Ok(vec![product(4, "Kue Lapis", true)]));
        context.catalog = Arc::new(catalog);

        let page = MenuPage::new(&context);

        assert!(page.select_category(Some(CategoryId::new(3))).await);
        assert_eq!(page.category(), Some(CategoryId::new(3)));
        assert_eq!(page.products().len(), 1);

        let listed = page.products();
        let image = listed.first().and_then(|product| page.image_url(product));
        assert_eq!(
            image.as_deref(),
            Some("http://127.0.0.1:9/media/products/roti.png")
        );
        assert_eq!(MenuPage::price_label(&listed[0]), "Rp 15.000");

        Ok(())
    }
}
