//! City name to [`Location`] resolution.

use tracing::{debug, info, warn};

use crate::{error::ClimaError, model::Location, provider::OpenMeteoApi};

/// Resolve a free-text city name to its best geocoding match.
///
/// An empty result list and a failed request both come back as
/// [`ClimaError::NotFound`]; the cause of a failed request is only logged.
pub async fn resolve(api: &dyn OpenMeteoApi, city: &str) -> Result<Location, ClimaError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(ClimaError::invalid_input("Por favor, insira o nome de uma cidade."));
    }

    debug!(city, "Geocoding city");

    let response = match api.geocode(city).await {
        Ok(response) => response,
        Err(err) => {
            let cause = format!("{err:#}");
            warn!(city, error = %cause, "Geocoding request failed");
            return Err(ClimaError::not_found(city));
        }
    };

    let Some(best) = response.results.and_then(|r| r.into_iter().next()) else {
        info!(city, "No geocoding match");
        return Err(ClimaError::not_found(city));
    };

    let location = Location {
        latitude: best.latitude,
        longitude: best.longitude,
        display_name: best.name,
        region: best.admin1.unwrap_or_default(),
    };

    info!(
        "Resolved {city} to {} ({:.4}, {:.4})",
        location.label(),
        location.latitude,
        location.longitude
    );

    Ok(location)
}
