//! Order data.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use buckery::{
    checkout::{CheckoutFlow, DeliveryMethod, OrderDraftForm},
    routes::Route,
    session::SessionStore,
};
use tracing::debug;

use crate::{auth::AuthService, context::AppContext, navigation::Navigator, pages::ErrorBanner};

/// Customer details and delivery method, saved before payment.
pub struct OrderDataPage {
    checkout: Arc<CheckoutFlow>,
    auth: Arc<dyn AuthService>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
    form: Mutex<OrderDraftForm>,
}

impl Debug for OrderDataPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OrderDataPage")
            .field("form", &*self.form())
            .finish_non_exhaustive()
    }
}

impl OrderDataPage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            checkout: context.checkout.clone(),
            auth: context.auth.clone(),
            session: context.session.clone(),
            navigator: context.navigator.clone(),
            banner: ErrorBanner::new(),
            form: Mutex::new(OrderDraftForm::default()),
        }
    }

    fn form(&self) -> MutexGuard<'_, OrderDraftForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fill the form from saved order data, or from the profile of a
    /// signed-in customer. A profile that cannot be fetched leaves the form
    /// blank.
    pub async fn mount(&self) {
        if let Some(draft) = self.checkout.draft() {
            *self.form() = OrderDraftForm::from_draft(&draft);
            return;
        }

        if !self.session.is_authenticated() {
            return;
        }

        match self.auth.profile().await {
            Ok(profile) => {
                let mut form = self.form();

                form.name = profile.nama_lengkap;
                form.phone = profile.phone;
                form.email = profile.email;
                form.address = profile.address;
                form.notes = profile.notes;
            }
            Err(error) => debug!(%error, "order data not prefilled"),
        }
    }

    /// Current form values.
    pub fn values(&self) -> OrderDraftForm {
        self.form().clone()
    }

    /// Change the form.
    pub fn edit(&self, change: impl FnOnce(&mut OrderDraftForm)) {
        change(&mut self.form());
    }

    /// Delivery options with their labels.
    pub fn delivery_options() -> [DeliveryMethod; 4] {
        DeliveryMethod::ALL
    }

    /// Save the order data and continue to payment.
    pub fn submit(&self) -> bool {
        let form = self.values();

        match self.checkout.save_draft(&form) {
            Ok(_) => {
                self.banner.dismiss();
                self.navigator.navigate(Route::Payment);
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
    use buckery::{
        session::{Credentials, Role},
        storage::{LocalStorage, keys},
    };
    use testresult::TestResult;

    use crate::{
        auth::{MockAuthService, UserProfile},
        test::context::memory_context,
    };

    use super::*;

    #[tokio::test]
    async fn signed_in_customers_start_from_their_profile() -> TestResult {
        let (mut context, _) = memory_context(Route::OrderData)?;
        context
            .session
            .synchronize(Credentials::new("t0k3n", "sari", Role::User))?;

        let mut auth = MockAuthService::new();
        auth.expect_profile().once().return_once(|| {
            Ok(UserProfile {
                username: "sari".to_string(),
                nama_lengkap: "Sari Wulandari".to_string(),
                email: "sari@example.com".to_string(),
                phone: "081234567890".to_string(),
                address: "Jl. Tuparev No. 5, Karawang".to_string(),
                notes: "Tanpa kacang".to_string(),
                ..UserProfile::default()
            })
        });
        context.auth = Arc::new(auth);

        let page = OrderDataPage::new(&context);
        page.mount().await;

        let form = page.values();
        assert_eq!(form.name, "Sari Wulandari");
        assert_eq!(form.phone, "081234567890");
        assert_eq!(form.address, "Jl. Tuparev No. 5, Karawang");
        assert_eq!(form.notes, "Tanpa kacang");
        assert!(form.delivery_method.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn incomplete_forms_are_not_saved() -> TestResult {
        let (mut context, history) = memory_context(Route::OrderData)?;

        let mut auth = MockAuthService::new();
        auth.expect_profile().never();
        context.auth = Arc::new(auth);

        let page = OrderDataPage::new(&context);
        page.mount().await;

        page.edit(|form| form.name = "Sari".to_string());

        assert!(!page.submit());
        assert_eq!(
            page.error().as_deref(),
            Some("Mohon lengkapi semua data yang diperlukan")
        );
        assert!(context.storage.get_item(keys::ORDER_DATA).is_none());
        assert_eq!(history.current_path(), "/datapemesanan");

        page.edit(|form| {
            form.phone = "0812".to_string();
            form.email = "sari@example.com".to_string();
            form.address = "Jl. Tuparev 10, Karawang".to_string();
            form.delivery_method = Some(DeliveryMethod::Local);
        });

        assert!(page.submit());
        assert!(context.storage.get_item(keys::ORDER_DATA).is_some());
        assert_eq!(history.current_path(), "/pembayaran");

        Ok(())
    }
}
