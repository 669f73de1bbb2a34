//! Staff account management.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, PoisonError},
};

use buckery::{
    checkout::ValidationError,
    routes::{GuardDecision, guard_admin_layout},
    session::SessionStore,
};
use tracing::info;

use crate::{
    navigation::Navigator,
    pages::ErrorBanner,
    staff::{NewStaff, StaffId, StaffMember, StaffService},
};

#[derive(Debug, Default)]
struct StaffState {
    members: Vec<StaffMember>,
    submitting: bool,
}

/// Staff list with a create form and activation switches.
pub struct StaffPage {
    staff: Arc<dyn StaffService>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
    state: Mutex<StaffState>,
}

impl Debug for StaffPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StaffPage").finish_non_exhaustive()
    }
}

impl StaffPage {
    #[must_use]
    pub fn new(
        staff: Arc<dyn StaffService>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            staff,
            session,
            navigator,
            banner: ErrorBanner::new(),
            state: Mutex::new(StaffState::default()),
        }
    }

    /// Enforce the role gate, then load the list.
    pub async fn mount(&self) -> bool {
        if let GuardDecision::Redirect(route) = guard_admin_layout(&self.session.current()) {
            self.navigator.navigate(route);
            return false;
        }

        self.load().await
    }

    /// Fetch the list.
    pub async fn load(&self) -> bool {
        match self.staff.list_staff().await {
            Ok(members) => {
                self.state.lock().unwrap_or_else(PoisonError::into_inner).members = members;
                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Staff from the last fetch.
    pub fn members(&self) -> Vec<StaffMember> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .members
            .clone()
    }

    /// Create an account, then reload the list.
    pub async fn create(&self, staff: NewStaff) -> bool {
        let missing = staff.missing_fields();
        if !missing.is_empty() {
            self.banner
                .report(&ValidationError::MissingFields(missing));
            return false;
        }

        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.submitting {
                return false;
            }
            state.submitting = true;
        }

        let result = self.staff.create_staff(staff).await;

        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .submitting = false;

        match result {
            Ok(member) => {
                info!(username = %member.username, "staff account created");

                self.banner.dismiss();
                self.load().await
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Flip an account's `is_active` flag.
    pub async fn toggle_active(&self, id: StaffId) -> bool {
        let Some(current) = self
            .members()
            .into_iter()
            .find(|member| member.id == id)
            .map(|member| member.is_active)
        else {
            return false;
        };

        match self.staff.set_active(id, !current).await {
            Ok(updated) => {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

                if let Some(member) = state.members.iter_mut().find(|member| member.id == id) {
                    *member = updated;
                }

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
        routes::Route,
        session::{Credentials, Role},
        storage::{MemoryCookieJar, MemoryStorage},
    };
    use testresult::TestResult;
    use zeroize::Zeroizing;

    use crate::{navigation::History, staff::MockStaffService};

    use super::*;

    fn member(id: i64, active: bool) -> StaffMember {
        StaffMember {
            id: StaffId::new(id),
            username: format!("staf{id}"),
            email: format!("staf{id}@buckery.id"),
            nama_lengkap: "Staf Toko".to_string(),
            is_active: active,
        }
    }

    fn session(role: Option<Role>) -> TestResult<Arc<SessionStore>> {
        let store = Arc::new(SessionStore::new(
            Arc::new(MemoryCookieJar::new()),
            Arc::new(MemoryStorage::new()),
        ));

        if let Some(role) = role {
            store.synchronize(Credentials::new("t0k3n", "bos", role))?;
        }

        Ok(store)
    }

    #[tokio::test]
    async fn customers_are_sent_to_admin_login() -> TestResult {
        let mut staff = MockStaffService::new();
        staff.expect_list_staff().never();

        let history = Arc::new(History::new(Route::AdminStaff));
        let page = StaffPage::new(Arc::new(staff), session(Some(Role::User))?, history.clone());

        assert!(!page.mount().await);
        assert_eq!(history.current_path(), "/admin/login");

        Ok(())
    }

    #[tokio::test]
    async fn toggling_flips_the_flag() -> TestResult {
        let mut staff = MockStaffService::new();
        staff
            .expect_list_staff()
            .once()
            .return_once(|| Ok(vec![member(4, true)]));
        staff
            .expect_set_active()
            .once()
            .withf(|id, active| id.get() == 4 && !*active)
            .return_once(|_, _| Ok(member(4, false)));

        let page = StaffPage::new(
            Arc::new(staff),
            session(Some(Role::Admin))?,
            Arc::new(History::new(Route::AdminStaff)),
        );

        assert!(page.mount().await);
        assert!(page.toggle_active(StaffId::new(4)).await);
        assert_eq!(page.members().first().map(|member| member.is_active), Some(false));

        Ok(())
    }

    #[tokio::test]
    async fn incomplete_accounts_never_reach_the_server() -> TestResult {
        let mut staff = MockStaffService::new();
        staff.expect_create_staff().never();

        let page = StaffPage::new(
            Arc::new(staff),
            session(Some(Role::Admin))?,
            Arc::new(History::new(Route::AdminStaff)),
        );

        let created = page
            .create(NewStaff {
                username: "staf9".to_string(),
                password: Zeroizing::new(String::new()),
                ..NewStaff::default()
            })
            .await;

        assert!(!created);
        assert_eq!(
            page.error().as_deref(),
            Some("Mohon lengkapi semua data yang diperlukan")
        );

        Ok(())
    }
}
