//! Contact.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use buckery::checkout::ValidationError;
use tracing::debug;
use url::Url;

use crate::{
    content::{ContactInfo, ContentService},
    context::AppContext,
    pages::ErrorBanner,
};

/// Message composed on the contact page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Sender name
    pub name: String,

    /// Sender email
    pub email: String,

    /// Sender phone
    pub phone: String,

    /// Message body
    pub message: String,
}

impl ContactForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<_> = [("name", &self.name), ("message", &self.message)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    /// WhatsApp text for this message.
    pub fn whatsapp_text(&self) -> String {
        format!(
            "*Pesan dari Website*\n*Nama:* {}\n*Email:* {}\n*No. Telp:* {}\n\n*Pesan:*\n{}",
            self.name.trim(),
            self.email.trim(),
            self.phone.trim(),
            self.message.trim(),
        )
    }
}

/// `https://wa.me/<number>?text=<message>` for a phone number in any
/// punctuation. Returns `None` when the number has no digits.
pub(crate) fn whatsapp_link(number: &str, text: &str) -> Option<Url> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return None;
    }

    let mut url = Url::parse("https://wa.me/").ok()?.join(&digits).ok()?;
    url.query_pairs_mut().append_pair("text", text);

    Some(url)
}

/// Shop details plus a message form that opens WhatsApp.
pub struct ContactPage {
    content: Arc<dyn ContentService>,
    fallback_number: String,
    banner: ErrorBanner,
    info: Mutex<Option<ContactInfo>>,
}

impl Debug for ContactPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ContactPage")
            .field("info", &*self.info())
            .finish_non_exhaustive()
    }
}

impl ContactPage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            content: context.content.clone(),
            fallback_number: context.whatsapp_number.clone(),
            banner: ErrorBanner::new(),
            info: Mutex::new(None),
        }
    }

    fn info(&self) -> MutexGuard<'_, Option<ContactInfo>> {
        self.info.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the shop details. The page still works with the configured
    /// number when they are missing.
    pub async fn mount(&self) -> bool {
        match self.content.contact_info().await {
            Ok(info) => {
                *self.info() = info;
                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Shop details, if the backend has any.
    pub fn contact_info(&self) -> Option<ContactInfo> {
        self.info().clone()
    }

    /// Number messages are sent to.
    pub fn whatsapp_number(&self) -> String {
        self.info()
            .as_ref()
            .map(|info| info.whatsapp_number.trim().to_string())
            .filter(|number| !number.is_empty())
            .unwrap_or_else(|| self.fallback_number.clone())
    }

    /// Link that opens WhatsApp with the message filled in.
    pub fn send(&self, form: &ContactForm) -> Option<Url> {
        if let Err(error) = form.validate() {
            self.banner.report(&error);
            return None;
        }

        let link = whatsapp_link(&self.whatsapp_number(), &form.whatsapp_text());

        match &link {
            Some(link) => debug!(path = link.path(), "whatsapp link built"),
            None => self.banner.show("Nomor WhatsApp belum tersedia"),
        }

        link
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }
}

#[cfg(test)]
mod tests {
    use buckery::routes::Route;
    use testresult::TestResult;

    use crate::{content::MockContentService, test::context::memory_context};

    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Sari".to_string(),
            email: "sari@example.com".to_string(),
            phone: "0812".to_string(),
            message: "Pesan kue ulang tahun & lilin".to_string(),
        }
    }

    #[test]
    fn links_carry_the_encoded_message() -> TestResult {
        let link = whatsapp_link("+62 812-3456-7890", "Halo & selamat pagi")
            .ok_or("no link built")?;

        assert_eq!(link.path(), "/6281234567890");
        assert_eq!(
            link.query_pairs().next().map(|(_, value)| value.into_owned()).as_deref(),
            Some("Halo & selamat pagi")
        );
        assert!(whatsapp_link("-", "Halo").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn backend_number_wins_over_configuration() -> TestResult {
        let (mut context, _) = memory_context(Route::Contact)?;

        let info: ContactInfo = serde_json::from_str(
            r#"{"id": 1, "location": "Karawang", "whatsapp_number": "6281111111111", "email": "info@buckery.id"}"#,
        )?;

        let mut content = MockContentService::new();
        content
            .expect_contact_info()
            .once()
            .return_once(move || Ok(Some(info)));
        context.content = Arc::new(content);

        let page = ContactPage::new(&context);
        page.mount().await;

        let link = page.send(&form()).ok_or("no link built")?;
        assert_eq!(link.path(), "/6281111111111");

        Ok(())
    }

    #[tokio::test]
    async fn configured_number_is_the_fallback() -> TestResult {
        let (mut context, _) = memory_context(Route::Contact)?;

        let mut content = MockContentService::new();
        content.expect_contact_info().once().return_once(|| Ok(None));
        context.content = Arc::new(content);

        let page = ContactPage::new(&context);
        page.mount().await;

        assert_eq!(page.whatsapp_number(), context.whatsapp_number);
        assert!(page.send(&ContactForm::default()).is_none());
        assert!(page.error().is_some());

        assert!(page.send(&form()).is_some());

        Ok(())
    }
}
