//! Package catalog: browsing, filtering and publishing.

use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};
use wayfare_protocol::{NewPackage, Package};

use super::{FlowError, FlowResult, require_field, require_token};
use crate::client::ApiClient;
use crate::session::Session;

/// Prices below this are in the low band.
pub const LOW_PRICE_CEILING: f64 = 1000.0;

/// Most packages featured on the home page.
pub const FEATURED_LIMIT: usize = 3;

/// Most search suggestions offered at once.
pub const MAX_SUGGESTIONS: usize = 5;

const SAMPLE_IMAGE: &str = "https://via.placeholder.com/300x200";

/// Price filter on the package list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceBand {
    #[default]
    All,
    /// Below [`LOW_PRICE_CEILING`].
    Low,
    /// At or above [`LOW_PRICE_CEILING`].
    High,
}

impl PriceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Low => "low",
            Self::High => "high",
        }
    }

    /// Whether `price` falls in this band.
    pub fn admits(&self, price: f64) -> bool {
        match self {
            Self::All => true,
            Self::Low => price < LOW_PRICE_CEILING,
            Self::High => price >= LOW_PRICE_CEILING,
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            other => Err(format!("unknown price band: {} (expected all, low or high)", other)),
        }
    }
}

/// Search and price filter applied to the package list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFilter {
    pub search: String,
    pub price: PriceBand,
}

impl PackageFilter {
    pub fn new(search: impl Into<String>, price: PriceBand) -> Self {
        Self {
            search: search.into(),
            price,
        }
    }

    pub fn matches(&self, package: &Package) -> bool {
        matches_term(package, &self.search.to_lowercase()) && self.price.admits(package.price)
    }

    /// Packages passing the filter, in their original order.
    pub fn apply<'a>(&self, packages: &'a [Package]) -> Vec<&'a Package> {
        packages.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Case-insensitive substring match on title or destination.
/// `term` must already be lowercased.
fn matches_term(package: &Package, term: &str) -> bool {
    term.is_empty()
        || package.title.to_lowercase().contains(term)
        || package.destination.to_lowercase().contains(term)
}

/// Up to [`MAX_SUGGESTIONS`] packages matching `term`. Empty for a blank term.
pub fn suggestions<'a>(packages: &'a [Package], term: &str) -> Vec<&'a Package> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }
    packages
        .iter()
        .filter(|p| matches_term(p, &term))
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn sample(id: &str, title: &str, destination: &str, price: f64, duration: Option<&str>) -> Package {
    Package {
        id: id.to_string(),
        title: title.to_string(),
        destination: destination.to_string(),
        price,
        duration: duration.map(str::to_string),
        description: None,
        image: Some(SAMPLE_IMAGE.to_string()),
    }
}

/// Catalog shown when the package list cannot be fetched.
pub fn sample_packages() -> Vec<Package> {
    vec![
        sample("1", "Beach Getaway", "Maldives", 1200.0, Some("5 Days / 4 Nights")),
        sample("2", "Mountain Retreat", "Himalayas", 800.0, Some("4 Days / 3 Nights")),
    ]
}

/// Featured packages shown when the home page fetch fails.
pub fn sample_featured() -> Vec<Package> {
    vec![
        sample("1", "Beach Getaway", "Maldives", 1200.0, None),
        sample("2", "Mountain Retreat", "Himalayas", 800.0, None),
        sample("3", "City Adventure", "New York", 1500.0, None),
    ]
}

/// A package list and whether it is placeholder data.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub packages: Vec<Package>,
    pub sample: bool,
}

fn fall_back(
    what: &str,
    result: Result<Vec<Package>, crate::client::ClientError>,
    sample_on_error: bool,
    sample: fn() -> Vec<Package>,
) -> FlowResult<Catalog> {
    match result {
        Ok(packages) => Ok(Catalog {
            packages,
            sample: false,
        }),
        Err(e) if sample_on_error => {
            warn!(error = %e, "failed to fetch {}; showing sample data", what);
            Ok(Catalog {
                packages: sample(),
                sample: true,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Full package list, or the sample catalog when the fetch fails and
/// `sample_on_error` is set.
pub async fn load_catalog(client: &ApiClient, sample_on_error: bool) -> FlowResult<Catalog> {
    fall_back(
        "packages",
        client.list_packages().await,
        sample_on_error,
        sample_packages,
    )
}

/// Featured packages for the home page, at most [`FEATURED_LIMIT`] of them.
pub async fn load_featured(client: &ApiClient, sample_on_error: bool) -> FlowResult<Catalog> {
    let mut featured = fall_back(
        "featured packages",
        client.featured_packages().await,
        sample_on_error,
        sample_featured,
    )?;
    featured.packages.truncate(FEATURED_LIMIT);
    Ok(featured)
}

/// Add-package form contents. Price is kept as typed.
#[derive(Debug, Clone, Default)]
pub struct PackageForm {
    pub title: String,
    pub destination: String,
    pub price: String,
    pub duration: String,
    pub description: String,
    pub image: String,
}

impl PackageForm {
    /// Validate and convert. A blank price submits as `0`.
    pub fn into_new_package(self) -> FlowResult<NewPackage> {
        require_field(&self.title, "Title is required")?;
        require_field(&self.destination, "Destination is required")?;

        let price = match self.price.trim() {
            "" => 0.0,
            raw => raw
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or_else(|| FlowError::Invalid(format!("Invalid price: {}", raw)))?,
        };

        Ok(NewPackage {
            title: self.title,
            destination: self.destination,
            price,
            duration: self.duration,
            description: self.description,
            image: self.image,
        })
    }
}

/// Publish a package. Returns the confirmation message.
pub async fn add_package(
    client: &ApiClient,
    session: &Session,
    form: PackageForm,
) -> FlowResult<&'static str> {
    let token = require_token(session)?;
    let package = form.into_new_package()?;
    client
        .create_package(token, &package)
        .await
        .map_err(|e| {
            warn!(title = %package.title, error = %e, "failed to add package");
            FlowError::rejected("Failed to add package", e)
        })?;

    info!(title = %package.title, price = package.price, "package added");
    Ok("Package added successfully!")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Package> {
        let mut packages = sample_featured();
        packages.push(sample("4", "Lake Cabin", "Lake Tahoe", 999.99, None));
        packages
    }

    #[test]
    fn test_price_band_boundary() {
        assert!(PriceBand::Low.admits(999.99));
        assert!(!PriceBand::Low.admits(1000.0));
        assert!(PriceBand::High.admits(1000.0));
        assert!(PriceBand::All.admits(0.0));
    }

    #[test]
    fn test_price_band_parse() {
        assert_eq!("HIGH".parse::<PriceBand>().unwrap(), PriceBand::High);
        assert_eq!("".parse::<PriceBand>().unwrap(), PriceBand::All);
        assert!("cheap".parse::<PriceBand>().is_err());
    }

    #[test]
    fn test_filter_matches_title_or_destination() {
        let packages = catalog();
        let by_destination = PackageFilter::new("new york", PriceBand::All).apply(&packages);
        assert_eq!(by_destination.len(), 1);
        assert_eq!(by_destination[0].title, "City Adventure");

        let by_title = PackageFilter::new("RETREAT", PriceBand::All).apply(&packages);
        assert_eq!(by_title[0].destination, "Himalayas");
    }

    #[test]
    fn test_filter_combines_search_and_price() {
        let packages = catalog();
        let filter = PackageFilter::new("a", PriceBand::Low);
        let titles: Vec<_> = filter.apply(&packages).iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Mountain Retreat", "Lake Cabin"]);
    }

    #[test]
    fn test_suggestions_capped_and_blank() {
        let mut packages = Vec::new();
        for i in 0..8 {
            packages.push(sample(&i.to_string(), &format!("Island {}", i), "Fiji", 500.0, None));
        }
        assert_eq!(suggestions(&packages, "island").len(), MAX_SUGGESTIONS);
        assert!(suggestions(&packages, "   ").is_empty());
        assert!(suggestions(&packages, "paris").is_empty());
    }

    #[test]
    fn test_package_form_blank_price_is_zero() {
        let form = PackageForm {
            title: "Desert Camp".to_string(),
            destination: "Sahara".to_string(),
            ..Default::default()
        };
        assert_eq!(form.into_new_package().unwrap().price, 0.0);
    }

    #[test]
    fn test_package_form_rejects_bad_price() {
        let form = PackageForm {
            title: "Desert Camp".to_string(),
            destination: "Sahara".to_string(),
            price: "lots".to_string(),
            ..Default::default()
        };
        let err = form.into_new_package().unwrap_err();
        assert_eq!(err.to_string(), "Invalid price: lots");
    }
}
