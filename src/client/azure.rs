//! Commerce API client: rate card and paginated usage aggregates
//!
//! Fetches are blocking with a fixed timeout and no retries. The usage
//! endpoint's reported window is padded (one day before `from`, two days
//! after `to`, clamped to today) so late-reported rows for the requested
//! days are still fetched; the pipeline filters back down to the window.

use crate::client::AccessToken;
use crate::types::{DateWindow, RateCard, Result, UsageRecord};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;

const MANAGEMENT_BASE: &str = "https://management.azure.com";
const API_VERSION: &str = "2015-06-01-preview";
const CURRENCY: &str = "USD";
const LOCALE: &str = "en-US";
const REGION: &str = "US";

/// HTTP request timeout in seconds; the rate card endpoint can take minutes
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// One page of the UsageAggregates response
#[derive(Debug, Deserialize)]
struct UsagePage {
    value: Vec<UsageRow>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageRow {
    name: String,
    properties: UsageProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageProperties {
    meter_id: String,
    #[serde(default)]
    meter_category: String,
    #[serde(default)]
    meter_sub_category: Option<String>,
    #[serde(default)]
    meter_name: String,
    quantity: f64,
    unit: String,
    usage_start_time: DateTime<Utc>,
}

impl UsageRow {
    fn into_record(self) -> UsageRecord {
        let p = self.properties;
        UsageRecord {
            name: self.name,
            meter_id: p.meter_id,
            meter_category: p.meter_category,
            // the provider sends "" for rows with no sub-category
            meter_sub_category: p.meter_sub_category.filter(|s| !s.is_empty()),
            meter_name: p.meter_name,
            quantity: p.quantity,
            unit: p.unit,
            usage_start: p.usage_start_time,
        }
    }
}

/// Reported-time bounds for the usage query: [from - 1 day, to + 2 days],
/// end clamped to today. Both rendered as UTC midnight RFC3339.
fn reported_window(window: &DateWindow, today: NaiveDate) -> (String, String) {
    let start = window.from - Duration::days(1);
    let mut end = window.to + Duration::days(2);
    if end > today {
        end = today;
    }
    let fmt = |d: NaiveDate| format!("{}T00:00:00Z", d);
    (fmt(start), fmt(end))
}

/// Blocking client for the Commerce endpoints of one subscription
pub struct AzureClient {
    http: reqwest::blocking::Client,
    token: String,
    subscription: String,
}

impl AzureClient {
    pub fn new(token: &AccessToken) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            token: token.access_token.clone(),
            subscription: token.subscription.clone(),
        })
    }

    /// Fetch the rate card for an offer (USD / en-US / US)
    pub fn fetch_rate_card(&self, offer: &str) -> Result<RateCard> {
        let url = format!(
            "{}/subscriptions/{}/providers/Microsoft.Commerce/RateCard",
            MANAGEMENT_BASE, self.subscription
        );
        let filter = format!(
            "OfferDurableId eq '{}' and Currency eq '{}' and Locale eq '{}' and RegionInfo eq '{}'",
            offer, CURRENCY, LOCALE, REGION
        );

        let card = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("api-version", API_VERSION), ("$filter", &filter)])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(card)
    }

    /// Fetch all usage aggregates overlapping the (padded) window, following
    /// `nextLink` pagination into one flat sequence
    pub fn fetch_usage(&self, window: &DateWindow) -> Result<Vec<UsageRecord>> {
        let (reported_start, reported_end) = reported_window(window, Utc::now().date_naive());
        let first_url = format!(
            "{}/subscriptions/{}/providers/Microsoft.Commerce/UsageAggregates",
            MANAGEMENT_BASE, self.subscription
        );

        let mut records = Vec::new();
        let mut next: Option<String> = None;

        loop {
            let request = match &next {
                // nextLink is a complete URL, query string included
                Some(link) => self.http.get(link),
                None => self.http.get(&first_url).query(&[
                    ("api-version", API_VERSION),
                    ("reportedStartTime", reported_start.as_str()),
                    ("reportedEndTime", reported_end.as_str()),
                    ("aggregationGranularity", "Daily"),
                    ("showDetails", "false"),
                ]),
            };

            let page: UsagePage = request
                .bearer_auth(&self.token)
                .send()?
                .error_for_status()?
                .json()?;

            records.extend(page.value.into_iter().map(UsageRow::into_record));

            match page.next_link {
                Some(link) if !link.is_empty() => next = Some(link),
                _ => break,
            }
        }

        Ok(records)
    }
}
