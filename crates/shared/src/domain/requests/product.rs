use crate::errors::{FieldError, FieldErrorKind, FormErrors};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const NAME_MAX_LEN: usize = 100;
pub const SKU_LEN: usize = 8;
// validator length bounds take u64; these mirror the usize constants above.
const NAME_MAX_LEN_U64: u64 = NAME_MAX_LEN as u64;
const SKU_LEN_U64: u64 = SKU_LEN as u64;
// Prices are f64 here and DOUBLE PRECISION in Postgres. A submitted "9999.99"
// parses to the same nearest f64 as this literal, so the bounds hold exactly
// for cent amounts.
pub const MIN_PRICE: f64 = 0.0;
pub const MAX_PRICE: f64 = 9999.99;
pub const MAX_IMAGES: usize = 3;

/// Product fields as posted by the create/edit forms.
///
/// Every field is optional. An empty string is treated the same as an absent
/// field, so a blank input never passes the required checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct ProductForm {
    #[validate(
        required(message = "This field is required."),
        length(
            max = NAME_MAX_LEN_U64,
            code = "length_violation",
            message = "Name can't be longer than 100 characters."
        )
    )]
    #[schema(example = "Widget")]
    pub name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        length(
            equal = SKU_LEN_U64,
            code = "format_violation",
            message = "SKU must contain 8 alphanumeric characters."
        )
    )]
    #[schema(example = "ABCD1234")]
    pub sku: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_price")
    )]
    #[schema(example = "19.99")]
    pub price: Option<String>,

    #[schema(example = "Tools")]
    pub category: Option<String>,

    pub description: Option<String>,

    #[schema(example = "http://x/1.png")]
    pub image_1: Option<String>,
    pub image_2: Option<String>,
    pub image_3: Option<String>,
}

impl ProductForm {
    /// Copy of the form with empty strings turned into `None`.
    pub fn normalized(&self) -> Self {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|v| !v.is_empty()).cloned()
        }

        Self {
            name: non_empty(&self.name),
            sku: non_empty(&self.sku),
            price: non_empty(&self.price),
            category: non_empty(&self.category),
            description: non_empty(&self.description),
            image_1: non_empty(&self.image_1),
            image_2: non_empty(&self.image_2),
            image_3: non_empty(&self.image_3),
        }
    }

    /// Image URLs in slot order, empty slots omitted. A URL repeated in a
    /// later slot is dropped.
    pub fn image_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::with_capacity(MAX_IMAGES);

        for url in [&self.image_1, &self.image_2, &self.image_3]
            .into_iter()
            .flatten()
            .filter(|url| !url.is_empty())
        {
            if urls.len() < MAX_IMAGES && !urls.contains(url) {
                urls.push(url.clone());
            }
        }

        urls
    }
}

/// Values of a form that passed validation, coerced to their real types.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProduct {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
}

/// Parses a submitted price. Surrounding whitespace is ignored; NaN and
/// infinities are rejected.
pub fn parse_price(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

fn validate_price(value: &str) -> Result<(), ValidationError> {
    let Some(price) = parse_price(value) else {
        let mut err = ValidationError::new(FieldErrorKind::ParseError.code());
        err.message = Some(Cow::Borrowed("Price must be a valid number."));
        return Err(err);
    };

    if !(MIN_PRICE..=MAX_PRICE).contains(&price) {
        let mut err = ValidationError::new(FieldErrorKind::RangeViolation.code());
        err.message = Some(Cow::Borrowed(
            "Price can't be negative or greater than $9999.99",
        ));
        return Err(err);
    }

    Ok(())
}

/// Runs every field check and accumulates the failures.
///
/// Required checks come first; the length, format and range checks of a field
/// only run when that field is present.
pub fn validate_product_fields(form: &ProductForm) -> Result<ValidatedProduct, FormErrors> {
    let form = form.normalized();

    form.validate().map_err(|errors| FormErrors::from(&errors))?;

    let image_urls = form.image_urls();

    let name = form
        .name
        .ok_or_else(|| FormErrors::single("name", FieldError::missing()))?;
    let sku = form
        .sku
        .ok_or_else(|| FormErrors::single("sku", FieldError::missing()))?;
    let price = form
        .price
        .as_deref()
        .and_then(parse_price)
        .ok_or_else(|| FormErrors::single("price", FieldError::missing()))?;

    Ok(ValidatedProduct {
        name,
        sku,
        price,
        category: form.category,
        description: form.description,
        image_urls,
    })
}

/// Row values for inserting a product.
#[derive(Debug, Clone)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub description: Option<String>,
    pub category_id: i32,
    pub featured: bool,
    pub active: bool,
}

impl CreateProductRequest {
    pub fn new(product: &ValidatedProduct, category_id: i32) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price,
            description: product.description.clone(),
            category_id,
            featured: false,
            active: true,
        }
    }
}

/// Row values for editing a product in place.
#[derive(Debug, Clone)]
pub struct UpdateProductRequest {
    pub id: i32,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub description: Option<String>,
    pub category_id: i32,
}

impl UpdateProductRequest {
    pub fn new(id: i32, product: &ValidatedProduct, category_id: i32) -> Self {
        Self {
            id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price,
            description: product.description.clone(),
            category_id,
        }
    }
}
