use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::TibberError;

/// Default GraphQL endpoint of the Tibber API.
pub const TIBBER_API_URL: &str = "https://api.tibber.com/v1-beta/gql";

const PRICE_QUERY: &str = r#"
{
  viewer {
    homes {
      currentSubscription {
        priceInfo {
          current {
            total
            level
          }
          today {
            total
            startsAt
          }
          tomorrow {
            total
            startsAt
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    /// Start of the hour this price applies to, as sent by the API
    pub starts_at: String,
    /// Total price including taxes, in currency per kWh
    pub total: f64,
}

impl From<PriceItem> for PricePoint {
    fn from(item: PriceItem) -> Self {
        Self {
            starts_at: item.starts_at,
            total: item.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPrice {
    pub total: f64,
    /// Price level such as `normal` or `cheap`, always lowercase
    pub level: String,
}

impl CurrentPrice {
    /// Current price in cents, rounded to two decimals before scaling.
    ///
    /// Rounding goes through the exact decimal expansion of `total`, so ties
    /// round to the even digit.
    pub fn cents(&self) -> i64 {
        let rounded = format!("{:.2}", self.total)
            .parse::<f64>()
            .unwrap_or(self.total);
        (rounded * 100.0).round() as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceInfo {
    pub today: Vec<PricePoint>,
    /// Empty until tomorrow's prices are published
    pub tomorrow: Vec<PricePoint>,
    pub current: CurrentPrice,
}

impl TryFrom<GraphQlResponse> for PriceInfo {
    type Error = TibberError;

    fn try_from(response: GraphQlResponse) -> Result<Self, Self::Error> {
        let data = match response.data {
            Some(data) => data,
            None if !response.errors.is_empty() => {
                return Err(TibberError::Api(
                    response.errors.into_iter().map(|e| e.message).collect(),
                ))
            }
            None => return Err(TibberError::MissingField("data")),
        };

        let home = data
            .viewer
            .homes
            .into_iter()
            .next()
            .ok_or(TibberError::MissingField("viewer.homes[0]"))?;
        let price_info = home
            .current_subscription
            .ok_or(TibberError::MissingField("currentSubscription"))?
            .price_info;
        let current = price_info
            .current
            .ok_or(TibberError::MissingField("priceInfo.current"))?;

        Ok(Self {
            today: price_info.today.into_iter().map(PricePoint::from).collect(),
            tomorrow: price_info
                .tomorrow
                .into_iter()
                .map(PricePoint::from)
                .collect(),
            current: CurrentPrice {
                total: current.total,
                level: current.level.to_lowercase(),
            },
        })
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<ViewerData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ViewerData {
    viewer: Viewer,
}

#[derive(Deserialize)]
struct Viewer {
    #[serde(default)]
    homes: Vec<Home>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Home {
    current_subscription: Option<Subscription>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Subscription {
    price_info: PriceInfoItem,
}

#[derive(Deserialize)]
struct PriceInfoItem {
    current: Option<CurrentItem>,
    #[serde(default)]
    today: Vec<PriceItem>,
    #[serde(default)]
    tomorrow: Vec<PriceItem>,
}

#[derive(Deserialize)]
struct CurrentItem {
    total: f64,
    level: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceItem {
    total: f64,
    starts_at: String,
}

/// Client for the price info query of the Tibber API.
#[derive(Debug, Clone)]
pub struct TibberClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl TibberClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_endpoint(TIBBER_API_URL, access_token)
    }

    /// Creates a client talking to `endpoint` instead of the public API.
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query current, today's and tomorrow's prices of the first home on the account.
    ///
    /// Fails on any non-success status, on a body that doesn't decode and when the
    /// account has no home with an active subscription. Nothing is retried.
    pub async fn fetch_price_info(&self) -> Result<PriceInfo, TibberError> {
        debug!(endpoint = %self.endpoint(), "querying price info");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&GraphQlRequest { query: PRICE_QUERY })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TibberError::Status(status));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "received price info");

        let info = PriceInfo::try_from(serde_json::from_str::<GraphQlResponse>(&body)?)?;
        if info.tomorrow.is_empty() {
            warn!("tomorrow's prices are not published yet");
        }

        Ok(info)
    }
}
