use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One candidate recipe as returned by the recipe service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeDetail {
    pub cuisine: String,
    pub course: String,
    pub diet: String,
    pub estimated_calories: f64,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// Recipes in the order the service listed them.
pub type RecipeList = Vec<(String, RecipeDetail)>;

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeResult {
    /// Typed dish name for text lookups, classifier label for image lookups.
    pub label: String,
    pub recipes: RecipeList,
}

/// Request body for `POST /recipe`.
#[derive(Debug, Clone, Serialize)]
pub struct DishRequest<'a> {
    pub dish_name: &'a str,
}

/// Success body of `POST /recipe`.
#[derive(Debug, Deserialize)]
pub struct RecipeResponse {
    #[serde(deserialize_with = "ordered_recipes")]
    pub results: RecipeList,
}

/// Success body of `POST /predict_and_recipe/`.
#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    pub predicted_label: String,
    #[serde(deserialize_with = "ordered_recipes")]
    pub results: RecipeList,
}

/// Failure body shared by both endpoints. `detail` is left untyped because
/// validation failures carry a list there instead of a string.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.as_str())
    }
}

/// Read a JSON object of `name -> RecipeDetail` keeping document order. A
/// repeated name keeps its first position and takes the last value.
fn ordered_recipes<'de, D>(deserializer: D) -> Result<RecipeList, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedRecipes;

    impl<'de> Visitor<'de> for OrderedRecipes {
        type Value = RecipeList;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of recipe name to recipe detail")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut recipes = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, detail)) = access.next_entry::<String, RecipeDetail>()? {
                match recipes.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(entry) => entry.1 = detail,
                    None => recipes.push((name, detail)),
                }
            }
            Ok(recipes)
        }
    }

    deserializer.deserialize_map(OrderedRecipes)
}

#[cfg(test)]
pub(crate) fn sample_detail(cuisine: &str) -> RecipeDetail {
    RecipeDetail {
        cuisine: cuisine.to_string(),
        course: "Main Course".to_string(),
        diet: "Vegetarian".to_string(),
        estimated_calories: 412.37,
        ingredients: vec!["spinach".to_string(), "paneer".to_string()],
        steps: vec!["Blanch the spinach.".to_string(), "Add paneer.".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"{
        "cuisine": "Indian", "course": "Main Course", "diet": "Vegetarian",
        "estimated_calories": 250, "ingredients": ["a"], "steps": ["b"]
    }"#;

    #[test]
    fn test_results_keep_service_order() {
        let body = format!(
            r#"{{"results": {{"Zucchini Curry": {d}, "Aloo Gobi": {d}, "Masala Karela": {d}}}}}"#,
            d = DETAIL
        );
        let parsed: RecipeResponse = serde_json::from_str(&body).unwrap();
        let names: Vec<&str> = parsed.results.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Zucchini Curry", "Aloo Gobi", "Masala Karela"]);
        assert_eq!(parsed.results[0].1.estimated_calories, 250.0);
    }

    #[test]
    fn test_repeated_name_keeps_first_position_and_last_value() {
        let body = r#"{"results": {
            "Idli": {"cuisine": "Tamil", "course": "Breakfast", "diet": "Vegetarian",
                     "estimated_calories": 100, "ingredients": [], "steps": []},
            "Dosa": {"cuisine": "Karnataka", "course": "Breakfast", "diet": "Vegetarian",
                     "estimated_calories": 200, "ingredients": [], "steps": []},
            "Idli": {"cuisine": "Kerala", "course": "Breakfast", "diet": "Vegetarian",
                     "estimated_calories": 150, "ingredients": [], "steps": []}
        }}"#;
        let parsed: RecipeResponse = serde_json::from_str(body).unwrap();
        let names: Vec<&str> = parsed.results.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Idli", "Dosa"]);
        assert_eq!(parsed.results[0].1.cuisine, "Kerala");
        assert_eq!(parsed.results[0].1.estimated_calories, 150.0);
    }

    #[test]
    fn test_prediction_response_parses_label() {
        let body = format!(r#"{{"predicted_label": "idli", "results": {{"Idli": {}}}}}"#, DETAIL);
        let parsed: PredictionResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.predicted_label, "idli");
        assert_eq!(parsed.results.len(), 1);
    }

    #[test]
    fn test_results_must_be_a_map() {
        let parsed = serde_json::from_str::<RecipeResponse>(r#"{"results": []}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_error_body_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "no match found"}"#).unwrap();
        assert_eq!(body.message(), Some("no match found"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message(), None);
    }

    #[test]
    fn test_dish_request_serializes_literal_name() {
        let json = serde_json::to_value(DishRequest { dish_name: "  masala karela " }).unwrap();
        assert_eq!(json, serde_json::json!({"dish_name": "  masala karela "}));
    }
}
