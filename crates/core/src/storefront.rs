//! Storefront
//!
//! Business profile printed on every invoice: package list, issuer contact blocks,
//! terms and file naming. Defaults describe the Doruken × Juliana Shafira campaign;
//! a YAML file can replace any part of it.

use std::{fs, path::Path};

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;

/// Storefront loading errors.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// IO error reading the storefront file
    #[error("failed to read storefront file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse storefront YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The catalog has no packages
    #[error("storefront catalog has no packages")]
    EmptyCatalog,
}

/// Postal address block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// City or full street address.
    pub city: String,

    /// Country, usually left blank.
    pub country: String,
}

/// Contact block for the business issuing the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issuer {
    /// Company name.
    pub company_name: String,

    /// Contact first name.
    pub first_name: String,

    /// Contact last name.
    pub last_name: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Address block.
    pub address: Address,

    /// Discord handle for customer questions.
    pub discord_username: String,
}

/// Business profile used when building invoice documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storefront {
    /// Invoice heading.
    pub title: String,

    /// Packages on sale.
    pub catalog: Catalog,

    /// Issuer block on standard invoices.
    pub issuer: Issuer,

    /// Sender block on shipping labels.
    pub sender: Issuer,

    /// Payment terms printed at the bottom of standard invoices.
    pub terms: Vec<String>,

    /// Label of the upsize line item.
    pub upsize_label: String,

    /// Label of the shipping line item.
    pub shipping_label: String,

    /// File name prefix for standard invoices.
    pub invoice_file_prefix: String,

    /// File name prefix for shipping labels.
    pub shipping_file_prefix: String,

    /// IANA zone used to turn the order timestamp into an issue date.
    pub time_zone: Option<String>,
}

impl Storefront {
    /// Load a storefront from a YAML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or lists no packages.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StorefrontError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a storefront from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or lists no packages.
    pub fn from_yaml(contents: &str) -> Result<Self, StorefrontError> {
        let storefront: Storefront = serde_norway::from_str(contents)?;

        if storefront.catalog.packages().is_empty() {
            return Err(StorefrontError::EmptyCatalog);
        }

        Ok(storefront)
    }

    /// Zone for issue dates, falling back to the system zone.
    pub fn time_zone(&self) -> TimeZone {
        self.time_zone
            .as_deref()
            .and_then(|name| TimeZone::get(name).ok())
            .unwrap_or_else(TimeZone::system)
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            title: "Doruken x Juliana Shafira Invoice".to_string(),
            catalog: Catalog::default(),
            issuer: Issuer {
                company_name: "Doruken Apparel".to_string(),
                first_name: "Doruken".to_string(),
                last_name: String::new(),
                phone_number: String::new(),
                address: Address {
                    city: "Depok".to_string(),
                    country: String::new(),
                },
                discord_username: "shandytp".to_string(),
            },
            sender: Issuer {
                company_name: String::new(),
                first_name: "Doruken".to_string(),
                last_name: "Apparel".to_string(),
                phone_number: "081235240506".to_string(),
                address: Address {
                    city: "Jl. Lap. Koni I No.27 002Pancoran, RW.2, Pancoran MAS, Kec. Pancoran Mas, Kota Depok, Jawa Barat 16436".to_string(),
                    country: String::new(),
                },
                discord_username: String::new(),
            },
            terms: vec![
                "Untuk pembayaran merch bisa menggunakan Bank BCA / Gopay / Dana / ShopeePay".to_string(),
                "Jika ada pertanyaan lebih lanjut, bisa langsung tanyakan Contact Person di atas atau menghubungi sosmed Doruken @doruken_".to_string(),
            ],
            upsize_label: "Upsize".to_string(),
            shipping_label: "Shipping Cost (JNE CTC / REG)".to_string(),
            invoice_file_prefix: "invoice-pira".to_string(),
            shipping_file_prefix: "invoice-shipping-pira".to_string(),
            time_zone: Some("Asia/Jakarta".to_string()),
        }
    }
}
