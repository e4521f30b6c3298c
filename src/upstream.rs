//! Client for the upstream content/payment API.
//!
//! Fetches are fire-and-await: a failure is reported, never retried here
//! (the caller decides whether to keep serving the previous snapshot).

use crate::api::{Envelope, MenuItem, Offer, PaymentReceipt};
use crate::errors::{Error, Result};
use crate::http::HttpClient;
use tracing::info;

/// Trait hiding the upstream API so endpoint handlers can be tested
/// without a network
pub trait Upstream {
    /// Full menu snapshot from `GET /menu-items`
    fn fetch_menu_items(&self) -> Result<Vec<MenuItem>>;

    /// All offers from `GET /offers`
    fn fetch_offers(&self) -> Result<Vec<Offer>>;

    /// Forward an order body to `POST /v1/payments` and hand back the
    /// receipt. The body is passed through verbatim: payment protocol
    /// details belong to the gateway, not to us.
    fn initiate_payment(&self, order_body: &str) -> Result<PaymentReceipt>;
}

/// The real thing, speaking HTTP to the configured upstream address.
///
/// One connection per call: the upstream does not keep connections alive
/// and neither does our client.
pub struct HttpUpstream {
    address: String,
}

impl HttpUpstream {
    pub fn new(address: &str) -> HttpUpstream {
        HttpUpstream {
            address: address.to_string(),
        }
    }

    fn get(&self, endpoint: &str) -> Result<String> {
        let mut client = HttpClient::new(&self.address)?;
        let response = client.send("GET", endpoint, "")?;
        match response.status {
            Some(200) => Ok(response.body),
            Some(code) => {
                Err(Error::Upstream(format!("GET {} answered {}", endpoint, code)).into())
            }
            None => Err(Error::NoResponse.into()),
        }
    }
}

impl Upstream for HttpUpstream {
    fn fetch_menu_items(&self) -> Result<Vec<MenuItem>> {
        let body = self.get("/menu-items")?;
        let envelope: Envelope<Vec<MenuItem>> = serde_json::from_str(&body)
            .map_err(|err| Error::Upstream(format!("bad menu payload: {}", err)))?;
        info!(count = envelope.data.len(), "fetched menu snapshot");
        Ok(envelope.data)
    }

    fn fetch_offers(&self) -> Result<Vec<Offer>> {
        let body = self.get("/offers")?;
        let envelope: Envelope<Vec<Offer>> = serde_json::from_str(&body)
            .map_err(|err| Error::Upstream(format!("bad offers payload: {}", err)))?;
        info!(count = envelope.data.len(), "fetched offers snapshot");
        Ok(envelope.data)
    }

    fn initiate_payment(&self, order_body: &str) -> Result<PaymentReceipt> {
        let mut client = HttpClient::new(&self.address)?;
        let response = client.send("POST", "/v1/payments", order_body)?;
        match response.status {
            Some(200) | Some(201) => serde_json::from_str(&response.body)
                .map_err(|err| Error::Upstream(format!("bad payment receipt: {}", err)).into()),
            Some(code) => {
                Err(Error::Upstream(format!("payment initiation answered {}", code)).into())
            }
            None => Err(Error::NoResponse.into()),
        }
    }
}

pub mod mock {
    use super::*;
    use crate::api::PaymentReceiptData;

    /// Canned upstream for endpoint tests
    #[derive(Default)]
    pub struct MockUpstream {
        pub items: Vec<MenuItem>,
        pub offers: Vec<Offer>,
        /// When set, every call fails with an Upstream error
        pub unreachable: bool,
    }

    impl Upstream for MockUpstream {
        fn fetch_menu_items(&self) -> Result<Vec<MenuItem>> {
            if self.unreachable {
                return Err(Error::Upstream("mock is unreachable".to_string()).into());
            }
            Ok(self.items.clone())
        }

        fn fetch_offers(&self) -> Result<Vec<Offer>> {
            if self.unreachable {
                return Err(Error::Upstream("mock is unreachable".to_string()).into());
            }
            Ok(self.offers.clone())
        }

        fn initiate_payment(&self, order_body: &str) -> Result<PaymentReceipt> {
            if self.unreachable {
                return Err(Error::Upstream("mock is unreachable".to_string()).into());
            }
            // Echo the body length into the id so tests can tell requests apart
            Ok(PaymentReceipt {
                data: PaymentReceiptData {
                    order_id: format!("order-{}", order_body.len()),
                    unique_id: "unique-1".to_string(),
                },
                message: "Payment initiated".to_string(),
            })
        }
    }
}
