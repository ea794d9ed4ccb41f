use serde::Serialize;

/// One season as presented by the site's season dropdown.
///
/// `id` is the opaque token used in result-listing URLs (`se=363`), `label`
/// the human-readable year span ("2021/2022"). Identity is
/// `(competition_id, id)`; seasons are immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    pub id: String,
    pub label: String,
    pub competition_id: String,
}

impl Season {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        competition_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            competition_id: competition_id.into(),
        }
    }
}
