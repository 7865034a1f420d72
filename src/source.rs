//! Providers of the full employer dataset.
//!
//! The repository treats a source as a black box that either yields the
//! complete collection or fails with [`Error::SourceError`]. Two sources ship
//! with the crate:
//!
//! - [`StaticEmployerSource`]: the built-in dataset behind a simulated
//!   network delay
//! - [`JsonEmployerSource`]: decodes a JSON payload in the external API's
//!   wire shape

use crate::employer::{Employer, EmployerId};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::time::Duration;

/// Default simulated latency of [`StaticEmployerSource`].
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Asynchronous provider of the complete employer collection.
///
/// Each call yields the full set exactly once, or fails.
#[allow(async_fn_in_trait)]
pub trait EmployerSource: Send + Sync {
    /// Fetch every employer.
    ///
    /// # Errors
    /// Returns `Error::SourceError` on transport failure.
    async fn fetch_all(&self) -> Result<Vec<Employer>>;
}

/// Built-in dataset served after a simulated delay.
///
/// # Example
///
/// ```no_run
/// use employer_search::source::{EmployerSource, StaticEmployerSource};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> employer_search::Result<()> {
///     let source = StaticEmployerSource::new().with_latency(Duration::ZERO);
///     let employers = source.fetch_all().await?;
///     assert!(!employers.is_empty());
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct StaticEmployerSource {
    employers: Vec<Employer>,
    latency: Duration,
}

impl StaticEmployerSource {
    /// Source serving [`default_employers`] after [`DEFAULT_LATENCY`].
    pub fn new() -> Self {
        StaticEmployerSource {
            employers: default_employers(),
            latency: DEFAULT_LATENCY,
        }
    }

    /// Source serving `employers` instead of the built-in dataset.
    pub fn with_employers(employers: Vec<Employer>) -> Self {
        StaticEmployerSource {
            employers,
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for StaticEmployerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployerSource for StaticEmployerSource {
    async fn fetch_all(&self) -> Result<Vec<Employer>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        debug!("» Static source returned {} employers", self.employers.len());
        Ok(self.employers.clone())
    }
}

/// Source decoding a JSON array of employer records.
///
/// Expects the external API's field names:
///
/// ```json
/// [{"EmployerID": 14116, "Name": "Achmea Zeist", "Place": "ZEIST", "DiscountPercentage": 17}]
/// ```
#[derive(Clone, Debug)]
pub struct JsonEmployerSource {
    payload: Vec<u8>,
}

impl JsonEmployerSource {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        JsonEmployerSource {
            payload: payload.into(),
        }
    }
}

impl EmployerSource for JsonEmployerSource {
    async fn fetch_all(&self) -> Result<Vec<Employer>> {
        decode_employers(&self.payload)
    }
}

/// Decode and validate a JSON employer payload.
///
/// # Errors
///
/// Returns `Error::SourceError` if the JSON is malformed, a record fails
/// [`Employer::validate`], or two records share an id.
pub fn decode_employers(payload: &[u8]) -> Result<Vec<Employer>> {
    let employers: Vec<Employer> = serde_json::from_slice(payload)
        .map_err(|e| Error::SourceError(format!("malformed employer payload: {}", e)))?;

    let mut seen: HashSet<EmployerId> = HashSet::with_capacity(employers.len());
    for employer in &employers {
        employer
            .validate()
            .map_err(|e| Error::SourceError(e.to_string()))?;
        if !seen.insert(employer.id) {
            return Err(Error::SourceError(format!(
                "duplicate employer id {}",
                employer.id
            )));
        }
    }

    Ok(employers)
}

const DEFAULT_DATASET: &[(EmployerId, &str, &str, u8)] = &[
    (14116, "Achmea Zeist", "ZEIST", 17),
    (50832, "Achmea Vitaliteit b.v. Leusden", "LEUSDEN", 8),
    (10234, "Rabobank Nederland", "UTRECHT", 12),
    (20456, "ABN AMRO Bank N.V.", "AMSTERDAM", 15),
    (30789, "ING Groep N.V.", "AMSTERDAM", 10),
    (40123, "Philips Nederland B.V.", "EINDHOVEN", 5),
    (50456, "ASML Netherlands B.V.", "VELDHOVEN", 18),
    (60789, "Shell Nederland B.V.", "DEN HAAG", 7),
    (70234, "Unilever Nederland B.V.", "ROTTERDAM", 14),
    (80567, "KLM Royal Dutch Airlines", "SCHIPHOL", 9),
    (90890, "Heineken Nederland B.V.", "AMSTERDAM", 11),
    (11123, "Albert Heijn B.V.", "ZAANDAM", 6),
    (12456, "Ahold Delhaize", "ZAANDAM", 13),
    (13789, "PostNL N.V.", "DEN HAAG", 16),
    (14234, "NS Nederlandse Spoorwegen", "UTRECHT", 4),
    (15567, "ProRail B.V.", "UTRECHT", 19),
    (16890, "Gemeente Amsterdam", "AMSTERDAM", 8),
    (17123, "Gemeente Rotterdam", "ROTTERDAM", 12),
    (18456, "Gemeente Utrecht", "UTRECHT", 10),
    (19789, "Gemeente Den Haag", "DEN HAAG", 15),
    (21234, "Rijkswaterstaat", "UTRECHT", 7),
    (22567, "Belastingdienst", "APELDOORN", 11),
    (23890, "UWV Werkbedrijf", "AMSTERDAM", 9),
    (24123, "Politie Nederland", "DEN HAAG", 14),
    (25456, "Defensie", "DEN HAAG", 6),
    (26789, "Erasmus MC Rotterdam", "ROTTERDAM", 17),
    (27234, "AMC Amsterdam", "AMSTERDAM", 13),
    (28567, "UMCG Groningen", "GRONINGEN", 8),
    (29890, "Radboudumc Nijmegen", "NIJMEGEN", 10),
    (31123, "LUMC Leiden", "LEIDEN", 5),
    (32456, "TU Delft", "DELFT", 12),
    (33789, "TU Eindhoven", "EINDHOVEN", 16),
    (34234, "Universiteit Utrecht", "UTRECHT", 9),
    (35567, "Universiteit van Amsterdam", "AMSTERDAM", 11),
    (36890, "Vrije Universiteit Amsterdam", "AMSTERDAM", 7),
    (37123, "Rijksuniversiteit Groningen", "GRONINGEN", 14),
    (38456, "Universiteit Leiden", "LEIDEN", 18),
    (39789, "Wageningen University", "WAGENINGEN", 6),
    (41234, "Coolblue B.V.", "ROTTERDAM", 15),
    (42567, "Bol.com B.V.", "UTRECHT", 10),
    (43890, "Booking.com B.V.", "AMSTERDAM", 8),
    (44123, "TomTom N.V.", "AMSTERDAM", 13),
    (45456, "Adyen N.V.", "AMSTERDAM", 19),
    (46789, "Randstad Holding N.V.", "DIEMEN", 5),
    (47234, "Wolters Kluwer N.V.", "ALPHEN AAN DEN RIJN", 11),
    (48567, "DSM N.V.", "HEERLEN", 7),
    (49890, "AkzoNobel N.V.", "AMSTERDAM", 16),
    (51123, "NXP Semiconductors", "EINDHOVEN", 9),
    (52456, "VDL Groep B.V.", "EINDHOVEN", 12),
];

/// The built-in dataset of Dutch employers.
pub fn default_employers() -> Vec<Employer> {
    DEFAULT_DATASET
        .iter()
        .map(|&(id, name, place, discount)| Employer::new(id, name, place, discount))
        .collect()
}
