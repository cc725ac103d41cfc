//! Food database lookup
//!
//! Barcode and text search against Open Food Facts. Every product is
//! normalized to a [`NutritionRecord`] with per-100g values before it reaches
//! the engine. Failures are never fatal: the caller offers manual entry.

use crate::config::FoodLookupConfig;
use async_trait::async_trait;
use macro_tracker_shared::validation::{validate_barcode, validate_search_query};
use macro_tracker_shared::{NutritionError, NutritionRecord, NutritionResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// kJ per kcal, for products that only report energy in kJ
const KJ_PER_KCAL: f64 = 4.184;

/// Barcode results are stable, so they are kept for a day
const BARCODE_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Source of nutrition records for scanned or searched foods
#[async_trait]
pub trait FoodLookup: Send + Sync {
    /// Product for a barcode; `NotFound` when the database has no match
    async fn lookup_barcode(&self, barcode: &str) -> NutritionResult<NutritionRecord>;

    /// Products matching a free-text query, at most `limit`
    async fn search(&self, query: &str, limit: u32) -> NutritionResult<Vec<NutritionRecord>>;

    /// `External` when the database cannot be reached at all
    async fn ping(&self) -> NutritionResult<()>;
}

// ============================================================================
// Open Food Facts wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    product: Option<Product>,
}

/// Products stay raw so one malformed product only drops itself
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default)]
    nutriments: Nutriments,
}

#[derive(Debug, Default, Deserialize)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g", default, deserialize_with = "lenient_number")]
    energy_kcal_100g: Option<f64>,
    #[serde(rename = "energy_100g", default, deserialize_with = "lenient_number")]
    energy_kj_100g: Option<f64>,
    #[serde(rename = "proteins_100g", default, deserialize_with = "lenient_number")]
    proteins_100g: Option<f64>,
    #[serde(rename = "carbohydrates_100g", default, deserialize_with = "lenient_number")]
    carbohydrates_100g: Option<f64>,
    #[serde(rename = "fat_100g", default, deserialize_with = "lenient_number")]
    fat_100g: Option<f64>,
    #[serde(rename = "fiber_100g", default, deserialize_with = "lenient_number")]
    fiber_100g: Option<f64>,
    #[serde(rename = "sugars_100g", default, deserialize_with = "lenient_number")]
    sugars_100g: Option<f64>,
}

/// Open Food Facts sends nutriments as numbers, numeric strings or `""`
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    })
}

impl Nutriments {
    fn calories(&self) -> Option<f64> {
        self.energy_kcal_100g
            .or_else(|| self.energy_kj_100g.map(|kj| kj / KJ_PER_KCAL))
    }
}

impl Product {
    /// Normalize into a record; `None` when there is no name or no energy value
    fn into_record(self) -> Option<NutritionRecord> {
        let name = self.product_name.filter(|n| !n.trim().is_empty())?;
        let calories = self.nutriments.calories()?;
        let n = &self.nutriments;
        let brand = self
            .brands
            .and_then(|b| b.split(',').next().map(str::to_string));

        Some(
            NutritionRecord {
                name,
                brand,
                barcode: self.code,
                calories_per_100g: calories,
                protein_per_100g: n.proteins_100g.unwrap_or(0.0),
                carbs_per_100g: n.carbohydrates_100g.unwrap_or(0.0),
                fat_per_100g: n.fat_100g.unwrap_or(0.0),
                fiber_per_100g: n.fiber_100g.unwrap_or(0.0),
                sugar_per_100g: n.sugars_100g.unwrap_or(0.0),
            }
            .normalized(),
        )
    }
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// Open Food Facts API client
pub struct OpenFoodFactsClient {
    base_url: String,
    http_client: reqwest::Client,
    barcode_cache: RwLock<HashMap<String, CacheEntry<NutritionRecord>>>,
}

impl OpenFoodFactsClient {
    pub fn new(config: &FoodLookupConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            barcode_cache: RwLock::new(HashMap::new()),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> NutritionResult<Option<T>> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| NutritionError::External(format!("Open Food Facts: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(NutritionError::External(format!(
                "Open Food Facts: HTTP {}",
                status
            )));
        }

        let body = response.json::<T>().await.map_err(|e| {
            NutritionError::External(format!("Open Food Facts: JSON parse error: {e}"))
        })?;
        Ok(Some(body))
    }

    /// Store a lookup result, dropping entries that have expired
    async fn cache_barcode(&self, barcode: &str, record: NutritionRecord) {
        let now = Instant::now();
        let mut cache = self.barcode_cache.write().await;
        cache.retain(|_, entry| entry.expires_at > now);
        cache.insert(
            barcode.to_string(),
            CacheEntry {
                data: record,
                expires_at: now + BARCODE_CACHE_TTL,
            },
        );
    }

    /// Number of cached barcode lookups
    pub async fn cached_barcodes(&self) -> usize {
        self.barcode_cache.read().await.len()
    }
}

#[async_trait]
impl FoodLookup for OpenFoodFactsClient {
    async fn lookup_barcode(&self, barcode: &str) -> NutritionResult<NutritionRecord> {
        let barcode = validate_barcode(barcode)?;

        // Check cache first
        {
            let cache = self.barcode_cache.read().await;
            if let Some(entry) = cache.get(barcode) {
                if Instant::now() < entry.expires_at {
                    debug!(barcode, "Barcode cache hit");
                    return Ok(entry.data.clone());
                }
            }
        }

        let url = format!("{}/api/v2/product/{}.json", self.base_url, barcode);
        let body = self.get_json::<ProductResponse>(&url, &[]).await.map_err(|e| {
            warn!(barcode, error = %e, "Barcode lookup failed");
            e
        })?;

        let record = body
            .filter(|r| r.status == 1)
            .and_then(|r| r.product)
            .and_then(Product::into_record)
            .map(|mut record| {
                record.barcode.get_or_insert_with(|| barcode.to_string());
                record
            })
            .ok_or_else(|| NutritionError::NotFound(format!("No product for barcode {barcode}")))?;

        self.cache_barcode(barcode, record.clone()).await;
        Ok(record)
    }

    async fn search(&self, query: &str, limit: u32) -> NutritionResult<Vec<NutritionRecord>> {
        let query = validate_search_query(query)?;
        let page_size = limit.to_string();

        let url = format!("{}/cgi/search.pl", self.base_url);
        let body = self
            .get_json::<SearchResponse>(
                &url,
                &[
                    ("search_terms", query),
                    ("search_simple", "1"),
                    ("action", "process"),
                    ("json", "1"),
                    ("page_size", &page_size),
                ],
            )
            .await
            .map_err(|e| {
                warn!(query, error = %e, "Food search failed");
                e
            })?;

        let records: Vec<NutritionRecord> = body
            .map(|r| r.products)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| serde_json::from_value::<Product>(raw).ok())
            .filter_map(Product::into_record)
            .take(limit as usize)
            .collect();

        debug!(query, results = records.len(), "Food search complete");
        Ok(records)
    }

    async fn ping(&self) -> NutritionResult<()> {
        // Any HTTP answer means the host is up
        self.http_client
            .get(&self.base_url)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| NutritionError::External(format!("Open Food Facts: {e}")))
    }
}
