use crate::core::notification::Notification;
use crate::core::pricing::PricingConfig;
use crate::domain::{OrganizationSettings, PaymentLink, TicketPrice};

use super::{read_json, ApiClient, ApiError};

pub const SETTINGS_WARNING: &str =
    "Could not load organization settings; showing default pricing and contact details.";
pub const TICKET_PRICE_WARNING: &str =
    "Could not load the current ticket price; using the default price.";
pub const PAYMENT_LINKS_WARNING: &str =
    "Could not load payment links; refresh before paying.";

/// Configuration the public form is parameterized with.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    pub settings: OrganizationSettings,
    pub pricing: PricingConfig,
    pub links: Vec<PaymentLink>,
    pub warnings: Vec<Notification>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        let settings = OrganizationSettings::default();
        Self {
            pricing: PricingConfig::from(&settings),
            settings,
            links: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ReferenceData {
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Fetches settings, the public ticket price and the active payment links
/// concurrently. Each slice falls back on its own.
#[derive(Debug, Clone)]
pub struct ReferenceDataLoader {
    api: ApiClient,
}

impl ReferenceDataLoader {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn load(&self) -> ReferenceData {
        let (settings, ticket_price, links) = tokio::join!(
            self.fetch_settings(),
            self.fetch_ticket_price(),
            self.fetch_active_links()
        );

        let mut warnings = Vec::new();
        let settings = settings.unwrap_or_else(|err| {
            err.log("load settings");
            warnings.push(Notification::warning(SETTINGS_WARNING));
            OrganizationSettings::default()
        });
        let mut pricing = PricingConfig::from(&settings);
        match ticket_price {
            Ok(price) => pricing = pricing.with_ticket_price(price.ticket_price),
            Err(err) => {
                err.log("load ticket price");
                warnings.push(Notification::warning(TICKET_PRICE_WARNING));
            }
        }
        let links: Vec<PaymentLink> = links
            .map(|links| links.into_iter().filter(|link| link.is_active).collect())
            .unwrap_or_else(|err| {
                err.log("load payment links");
                warnings.push(Notification::warning(PAYMENT_LINKS_WARNING));
                Vec::new()
            });

        tracing::debug!(
            links = links.len(),
            warnings = warnings.len(),
            "reference data loaded"
        );
        ReferenceData {
            settings,
            pricing,
            links,
            warnings,
        }
    }

    async fn fetch_settings(&self) -> Result<OrganizationSettings, ApiError> {
        // A fresh backend answers `null` until settings are first saved.
        let settings: Option<OrganizationSettings> = self.get("admin/settings").await?;
        Ok(settings.unwrap_or_default())
    }

    async fn fetch_ticket_price(&self) -> Result<TicketPrice, ApiError> {
        self.get("donations/ticket-price").await
    }

    async fn fetch_active_links(&self) -> Result<Vec<PaymentLink>, ApiError> {
        self.get("payment-links/active").await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.api.endpoint(path)?;
        tracing::debug!(url = %url, "fetching reference data");
        let response = self
            .api
            .http()
            .get(url)
            .timeout(self.api.reference_timeout())
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        read_json(response).await
    }
}
