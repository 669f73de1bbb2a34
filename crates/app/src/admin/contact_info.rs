//! Contact details form.

use std::sync::Arc;

use buckery::{checkout::ValidationError, session::SessionStore};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    admin::{
        CrudPage, Resource,
        resource::{finish, optional, required},
    },
    api::ApiClient,
    content::ContactInfo,
    navigation::Navigator,
};

/// Contact details form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfoForm {
    /// Street address
    pub location: String,

    /// WhatsApp number
    pub whatsapp_number: String,

    /// Secondary phone number
    pub phone_number2: String,

    /// Email address
    pub email: String,

    /// Instagram handle
    pub instagram: String,

    /// Monday to Friday opening hours
    pub weekday_hours: String,

    /// Saturday opening hours
    pub saturday_hours: String,

    /// Sunday opening hours
    pub sunday_hours: String,

    /// Map latitude as typed
    pub latitude: String,

    /// Map longitude as typed
    pub longitude: String,
}

fn coordinate(field: &'static str, value: &str) -> Result<Value, ValidationError> {
    match value.trim() {
        "" => Ok(Value::Null),
        value => value
            .parse::<Decimal>()
            .map(|value| Value::String(value.to_string()))
            .map_err(|_| ValidationError::Invalid { field }),
    }
}

impl Resource for ContactInfo {
    type Form = ContactInfoForm;

    const PATH: &'static str = "/contact-info/";
    const NAME: &'static str = "contact info";

    fn id(&self) -> i64 {
        self.id.get()
    }

    fn to_form(&self) -> ContactInfoForm {
        ContactInfoForm {
            location: self.location.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
            phone_number2: self.phone_number2.clone().unwrap_or_default(),
            email: self.email.clone(),
            instagram: self.instagram.clone(),
            weekday_hours: self.weekday_hours.clone(),
            saturday_hours: self.saturday_hours.clone(),
            sunday_hours: self.sunday_hours.clone(),
            latitude: self.latitude.map(|value| value.to_string()).unwrap_or_default(),
            longitude: self.longitude.map(|value| value.to_string()).unwrap_or_default(),
        }
    }

    fn fields(form: &ContactInfoForm) -> Result<Vec<(&'static str, Value)>, ValidationError> {
        let mut missing = Vec::new();

        let location = required(&mut missing, "location", &form.location);
        let whatsapp_number = required(&mut missing, "whatsapp_number", &form.whatsapp_number);
        let email = required(&mut missing, "email", &form.email);
        let instagram = required(&mut missing, "instagram", &form.instagram);
        let weekday_hours = required(&mut missing, "weekday_hours", &form.weekday_hours);
        let saturday_hours = required(&mut missing, "saturday_hours", &form.saturday_hours);
        let sunday_hours = required(&mut missing, "sunday_hours", &form.sunday_hours);

        finish(
            missing,
            vec![
                ("location", location),
                ("whatsapp_number", whatsapp_number),
                ("phone_number2", optional(&form.phone_number2)),
                ("email", email),
                ("instagram", instagram),
                ("weekday_hours", weekday_hours),
                ("saturday_hours", saturday_hours),
                ("sunday_hours", sunday_hours),
                ("latitude", coordinate("latitude", &form.latitude)?),
                ("longitude", coordinate("longitude", &form.longitude)?),
            ],
        )
    }
}

/// The single contact record, always shown as an open form.
#[derive(Debug)]
pub struct ContactInfoPage {
    page: CrudPage<ContactInfo>,
}

impl ContactInfoPage {
    #[must_use]
    pub fn new(
        api: Arc<ApiClient>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            page: CrudPage::new(api, session, navigator),
        }
    }

    /// Load the record and open it for editing, or open an empty form when
    /// none exists yet.
    pub async fn mount(&self) -> bool {
        if !self.page.mount().await {
            return false;
        }

        self.open_form();

        true
    }

    fn open_form(&self) {
        match self.page.records().first() {
            Some(record) => {
                self.page.open_edit(record.id.get());
            }
            None => self.page.open_create(),
        }
    }

    /// Underlying form and list state.
    pub fn page(&self) -> &CrudPage<ContactInfo> {
        &self.page
    }

    /// Save the form and reopen it with the stored values.
    pub async fn save(&self) -> bool {
        if !self.page.submit().await {
            return false;
        }

        self.open_form();

        true
    }
}

