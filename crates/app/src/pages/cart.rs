//! Cart.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use buckery::{
    cart::{CartError, CartLine, CartStore},
    checkout::ValidationError,
    ids::ProductId,
    money::Amount,
    routes::Route,
};

use crate::{context::AppContext, navigation::Navigator, pages::ErrorBanner};

/// Line items with quantity steppers and the proceed button.
pub struct CartPage {
    cart: Arc<CartStore>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
}

impl Debug for CartPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartPage")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartPage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            cart: context.cart.clone(),
            navigator: context.navigator.clone(),
            banner: ErrorBanner::new(),
        }
    }

    /// Every line, including lines stepped down to zero.
    pub fn lines(&self) -> Vec<CartLine> {
        self.cart.lines()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Amount {
        self.cart.subtotal()
    }

    /// Add one unit.
    pub fn increment(&self, product: ProductId) -> bool {
        self.apply(self.cart.increment(product))
    }

    /// Take one unit away, stopping at zero.
    pub fn decrement(&self, product: ProductId) -> bool {
        self.apply(self.cart.decrement(product))
    }

    /// Type a quantity in.
    pub fn set_quantity(&self, product: ProductId, quantity: u32) -> bool {
        self.apply(self.cart.update_quantity(product, quantity))
    }

    /// Drop a line.
    pub fn remove(&self, product: ProductId) -> bool {
        self.apply(self.cart.remove_item(product))
    }

    fn apply(&self, result: Result<bool, CartError>) -> bool {
        result.unwrap_or_else(|error| {
            self.banner.report(&error);
            false
        })
    }

    /// Continue to the order-data form when something can be ordered.
    pub fn proceed(&self) -> bool {
        if self.cart.purchasable_lines().is_empty() {
            self.banner.report(&ValidationError::EmptyCart);
            return false;
        }

        self.navigator.navigate(Route::OrderData);

        true
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{navigation::Navigator, test::context::memory_context};

    use super::*;

    #[test]
    fn zero_quantity_lines_cannot_be_ordered() -> TestResult {
        let (context, history) = memory_context(Route::Cart)?;
        let page = CartPage::new(&context);

        context
            .cart
            .add_item(CartLine::single(ProductId::new(1), "Roti", Decimal::from(10_000), ""))?;

        assert!(page.decrement(ProductId::new(1)));
        assert!(page.decrement(ProductId::new(1)));
        assert_eq!(page.lines()[0].quantity, 0);

        assert!(!page.proceed());
        assert_eq!(page.error().as_deref(), Some("Keranjang belanja kosong"));
        assert_eq!(history.current_path(), "/keranjang");

        assert!(page.increment(ProductId::new(1)));
        assert!(page.proceed());
        assert_eq!(history.current_path(), "/datapemesanan");

        Ok(())
    }

    #[test]
    fn removed_lines_start_fresh() -> TestResult {
        let (context, _) = memory_context(Route::Cart)?;
        let page = CartPage::new(&context);
        let roti = CartLine::single(ProductId::new(1), "Roti", Decimal::from(10_000), "");

        context.cart.add_item(roti.clone().with_quantity(4))?;
        assert!(page.remove(ProductId::new(1)));

        context.cart.add_item(roti)?;

        assert_eq!(page.lines()[0].quantity, 1);
        assert_eq!(page.subtotal(), Decimal::from(10_000));

        Ok(())
    }
}
