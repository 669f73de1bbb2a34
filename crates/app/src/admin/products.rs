//! Product and category management.

use buckery::checkout::ValidationError;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    admin::{
        Activatable, ImageUpload, Resource,
        resource::{finish, integer, optional, required},
    },
    catalog::{Category, CategoryId, Product},
};

/// Product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    /// Display name
    pub name: String,

    /// Price as typed
    pub price: String,

    /// Description
    pub description: String,

    /// Stock as typed
    pub stock: String,

    /// Selected category
    pub category: Option<CategoryId>,

    /// On sale
    pub is_active: bool,

    /// Newly chosen image
    pub image: Option<ImageUpload>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            description: String::new(),
            stock: String::new(),
            category: None,
            is_active: true,
            image: None,
        }
    }
}

impl Resource for Product {
    type Form = ProductForm;

    const PATH: &'static str = "/products/";
    const NAME: &'static str = "product";

    fn id(&self) -> i64 {
        self.id.get()
    }

    fn to_form(&self) -> ProductForm {
        ProductForm {
            name: self.name.clone(),
            price: self.price.normalize().to_string(),
            description: self.description.clone(),
            stock: self.stock.to_string(),
            category: Some(self.category),
            is_active: self.is_active,
            image: None,
        }
    }

    fn fields(form: &ProductForm) -> Result<Vec<(&'static str, Value)>, ValidationError> {
        let mut missing = Vec::new();

        let name = required(&mut missing, "name", &form.name);
        let description = required(&mut missing, "description", &form.description);
        let price = match form.price.trim() {
            "" => {
                missing.push("price");
                Value::Null
            }
            price => match price.parse::<Decimal>() {
                Ok(price) if !price.is_sign_negative() => Value::String(price.normalize().to_string()),
                _ => return Err(ValidationError::Invalid { field: "price" }),
            },
        };
        let category = match form.category {
            Some(category) => Value::from(category.get()),
            None => {
                missing.push("category");
                Value::Null
            }
        };

        finish(
            missing,
            vec![
                ("name", name),
                ("price", price),
                ("description", description),
                ("stock", integer("stock", &form.stock)?),
                ("category", category),
                ("is_active", Self::active_value(form.is_active)),
            ],
        )
    }

    fn image(form: &ProductForm) -> Option<&ImageUpload> {
        form.image.as_ref()
    }
}

impl Activatable for Product {
    fn is_active(&self) -> bool {
        self.is_active
    }

    /// The product endpoints expect the flag as text.
    fn active_value(active: bool) -> Value {
        Value::String(active.to_string())
    }
}

/// Category form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    /// Display name
    pub name: String,

    /// Description
    pub description: String,
}

impl Resource for Category {
    type Form = CategoryForm;

    const PATH: &'static str = "/categories/";
    const NAME: &'static str = "category";

    fn id(&self) -> i64 {
        self.id.get()
    }

    fn to_form(&self) -> CategoryForm {
        CategoryForm {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
        }
    }

    fn fields(form: &CategoryForm) -> Result<Vec<(&'static str, Value)>, ValidationError> {
        let mut missing = Vec::new();
        let name = required(&mut missing, "name", &form.name);

        finish(
            missing,
            vec![("name", name), ("description", optional(&form.description))],
        )
    }
}
