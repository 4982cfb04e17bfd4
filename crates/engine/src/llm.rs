use async_trait::async_trait;

use chartbot_common::error::ChartbotResult;

/// A language model that can turn a free-form question into the JSON chart
/// spec described by [`analysis_prompt`]. The engine only sees raw text
/// back; parsing and validation stay on this side.
#[async_trait]
pub trait LlmResolver: Send + Sync {
    async fn invoke(&self, prompt: &str) -> ChartbotResult<String>;
}

/// Build the extraction prompt for a user question. French, because the
/// questions are; the model is told to answer with JSON only.
pub fn analysis_prompt(user_text: &str) -> String {
    format!(
        r#"Tu es un assistant d'analyse de données pour des cas de test logiciels.
Analyse la demande de l'utilisateur et réponds UNIQUEMENT avec un objet JSON, sans aucun texte autour.

Le JSON doit avoir cette forme:
{{
  "chart_type": "bar" | "line" | "pie" | "doughnut" | "radar" | "heatmap",
  "data_source": "demandes" | "applications" | "audits" | "satisfaction" | "transferts",
  "groupby": "statut" | "projet" | "périmètre" | "profil" | "priorité" | "criticité" | null,
  "metric": "count" | "average" | "sum",
  "time_period": "1_month" | "3_months" | "6_months" | "1_year" | "all",
  "title": "titre court du graphique",
  "description": "une phrase de description",
  "filters": {{ "projet": "valeur" }}
}}

Attributs disponibles sur les cas de test: statut, projet, périmètre, profil, priorité, criticité.
Si la demande porte sur la matrice priorité/criticité, utilise "chart_type": "heatmap".
Si aucune période n'est mentionnée, utilise "6_months".
Omets "filters" si la demande ne restreint rien.

Exemples:
"répartition des tests par projet" ->
{{"chart_type": "pie", "data_source": "demandes", "groupby": "projet", "metric": "count", "time_period": "6_months", "title": "Répartition par Projets", "description": "Répartition des cas de test par projet"}}
"évolution des demandes sur un an" ->
{{"chart_type": "line", "data_source": "demandes", "groupby": null, "metric": "count", "time_period": "1_year", "title": "Évolution mensuelle des cas de test", "description": "Nombre de cas de test créés par mois"}}

Demande de l'utilisateur: {user_text}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_question() {
        let p = analysis_prompt("combien de tests par projet ?");
        assert!(p.contains("combien de tests par projet ?"));
        assert!(p.contains("chart_type"));
        assert!(p.contains("heatmap"));
    }
}
