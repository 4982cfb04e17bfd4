use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<&'static str>,
}

/// Canned questions the UI can offer, one per supported view.
pub fn suggestions() -> SuggestionsResponse {
    SuggestionsResponse {
        suggestions: vec![
            "Répartition des cas de test par statut",
            "Répartition des cas de test par projet",
            "Répartition des cas de test par périmètre",
            "Répartition des cas de test par profil",
            "Priorité des cas de test",
            "Criticité des cas de test",
            "Matrice priorité / criticité",
            "Évolution des cas de test sur 6 mois",
        ],
    }
}
