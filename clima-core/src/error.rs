//! Error taxonomy shared by every dashboard view.
//!
//! None of these are fatal: the search controller hands them back to the
//! renderer, which shows [`ClimaError::user_message`] in place of the view.

use thiserror::Error;

/// Which upstream feed a request was talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Weather,
    AirQuality,
    Historical,
}

impl Feed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feed::Weather => "weather",
            Feed::AirQuality => "air-quality",
            Feed::Historical => "historical",
        }
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A well-formed response that lacks the slice a view needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataGap {
    /// No hourly bucket matches the current clock hour.
    CurrentHour,
    /// Neither `current` nor `current_weather` was present.
    CurrentConditions,
    /// The archive returned no daily row for the requested date.
    HistoricalDate,
}

#[derive(Error, Debug)]
pub enum ClimaError {
    #[error("city not found: {city}")]
    NotFound { city: String },

    #[error("{feed} request failed: {message}")]
    NetworkFailure { feed: Feed, message: String },

    #[error("data unavailable: {0:?}")]
    DataUnavailable(DataGap),

    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl ClimaError {
    pub fn not_found<S: Into<String>>(city: S) -> Self {
        Self::NotFound { city: city.into() }
    }

    /// Wrap a transport or decode failure, keeping the whole context chain.
    pub fn network(feed: Feed, err: &anyhow::Error) -> Self {
        Self::NetworkFailure {
            feed,
            message: format!("{err:#}"),
        }
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Placeholder text shown to the user instead of the view.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimaError::NotFound { .. } => "Cidade não encontrada".to_string(),
            ClimaError::NetworkFailure { feed, .. } => match feed {
                Feed::Weather => "Ocorreu um erro ao buscar os dados do clima.".to_string(),
                Feed::AirQuality => {
                    "Ocorreu um erro ao buscar os dados de qualidade do ar.".to_string()
                }
                Feed::Historical => {
                    "Ocorreu um erro ao buscar os dados históricos.".to_string()
                }
            },
            ClimaError::DataUnavailable(gap) => match gap {
                DataGap::CurrentHour => "Dados indisponíveis para a hora atual.".to_string(),
                DataGap::CurrentConditions => {
                    "A resposta da API não contém os dados do clima atual.".to_string()
                }
                DataGap::HistoricalDate => {
                    "Não foram encontrados dados históricos para a data selecionada.".to_string()
                }
            },
            ClimaError::InvalidInput { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surfaces_have_distinct_messages() {
        let not_found = ClimaError::not_found("Xyzzyville").user_message();
        let network = ClimaError::network(Feed::Weather, &anyhow::anyhow!("timeout")).user_message();
        let gap = ClimaError::DataUnavailable(DataGap::CurrentHour).user_message();

        assert_eq!(not_found, "Cidade não encontrada");
        assert_eq!(network, "Ocorreu um erro ao buscar os dados do clima.");
        assert_eq!(gap, "Dados indisponíveis para a hora atual.");
    }

    #[test]
    fn network_failure_keeps_context_chain() {
        let err = anyhow::anyhow!("connection reset").context("Failed to send request");
        let wrapped = ClimaError::network(Feed::AirQuality, &err);

        let text = wrapped.to_string();
        assert!(text.contains("air-quality"));
        assert!(text.contains("connection reset"));
        assert!(wrapped.user_message().contains("qualidade do ar"));
    }

    #[test]
    fn invalid_input_shows_its_own_message() {
        let err = ClimaError::invalid_input("Por favor, selecione uma data.");
        assert_eq!(err.user_message(), "Por favor, selecione uma data.");
    }
}
