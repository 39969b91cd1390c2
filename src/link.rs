//! Shareable query-string encoding of a plan request.
//!
//! The same parameter set the web frontend carried between its form and
//! results pages: plain `key=value` pairs for scalars, the allergy set
//! JSON-stringified into a single `allergies` parameter. Decoding applies
//! a documented default for every absent parameter, so a bare string is a
//! valid (if generic) request.

use url::form_urlencoded;

use crate::plan::{Activity, Diet, Gender, Goal, PlanRequest};

/// Encode a request as a query string, without a leading `?`.
pub fn encode(request: &PlanRequest) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer
        .append_pair("name", &request.name)
        .append_pair("age", &request.age.to_string())
        .append_pair("weight", &format_number(request.weight))
        .append_pair("height", &format_number(request.height))
        .append_pair("gender", request.gender.wire_value())
        .append_pair("activity", request.activity.wire_value())
        .append_pair("goal", request.goal.wire_value())
        .append_pair("diet", request.diet.wire_value());

    // Always a JSON array, matching how the web form serialized the set.
    let allergies = serde_json::to_string(&request.allergies).unwrap_or_else(|_| "[]".into());
    serializer.append_pair("allergies", &allergies);

    if let Some(target) = request.target_weight {
        serializer.append_pair("targetWeight", &format_number(target));
    }

    serializer.finish()
}

/// Decode a query string into a request. Absent or unparseable parameters
/// take their defaults; a leading `?` is tolerated.
pub fn decode(query: &str) -> PlanRequest {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut request = PlanRequest::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "name" if !value.is_empty() => request.name = value.into_owned(),
            "age" => {
                if let Ok(age) = value.parse() {
                    request.age = age;
                }
            }
            "weight" => {
                if let Ok(weight) = value.parse() {
                    request.weight = weight;
                }
            }
            "height" => {
                if let Ok(height) = value.parse() {
                    request.height = height;
                }
            }
            "gender" => {
                if let Some(gender) = Gender::parse(&value) {
                    request.gender = gender;
                }
            }
            "activity" => {
                if let Some(activity) = Activity::parse(&value) {
                    request.activity = activity;
                }
            }
            "goal" => {
                if let Some(goal) = Goal::parse(&value) {
                    request.goal = goal;
                }
            }
            "diet" => request.diet = Diet::parse(&value),
            "allergies" => {
                if let Ok(allergies) = serde_json::from_str(&value) {
                    request.allergies = allergies;
                }
            }
            "targetWeight" => request.target_weight = value.parse().ok(),
            _ => {}
        }
    }

    request
}

/// Whole numbers print without a trailing `.0` so links stay readable.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_every_field() {
        let request = PlanRequest {
            name: "Kalle Svensson".to_string(),
            age: 30,
            weight: 80.5,
            height: 180.0,
            gender: Gender::Female,
            activity: Activity::Active,
            goal: Goal::Cut,
            diet: Diet::Vegan,
            allergies: vec!["gluten".to_string(), "nötter".to_string()],
            target_weight: Some(75.0),
        };

        assert_eq!(decode(&encode(&request)), request);
    }

    #[test]
    fn empty_query_yields_documented_defaults() {
        let request = decode("");
        assert_eq!(request.name, "Användare");
        assert_eq!(request.age, 25);
        assert_eq!(request.weight, 70.0);
        assert_eq!(request.height, 175.0);
        assert_eq!(request.gender, Gender::Male);
        assert_eq!(request.activity, Activity::Moderate);
        assert_eq!(request.goal, Goal::Maintain);
        assert_eq!(request.diet, Diet::None);
        assert!(request.allergies.is_empty());
        assert_eq!(request.target_weight, None);
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        let request = decode("age=abc&weight=&targetWeight=heavy");
        assert_eq!(request.age, 25);
        assert_eq!(request.weight, 70.0);
        assert_eq!(request.target_weight, None);
    }

    #[test]
    fn leading_question_mark_is_tolerated() {
        let request = decode("?age=40&goal=bulk");
        assert_eq!(request.age, 40);
        assert_eq!(request.goal, Goal::Bulk);
    }

    #[test]
    fn allergies_travel_as_one_json_parameter() {
        let request = PlanRequest {
            allergies: vec!["laktos".to_string()],
            ..PlanRequest::default()
        };
        let encoded = encode(&request);
        assert!(encoded.contains("allergies=%5B%22laktos%22%5D"));
        assert_eq!(decode(&encoded).allergies, vec!["laktos".to_string()]);
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let request = decode("age=33&utm_source=mail");
        assert_eq!(request.age, 33);
    }
}
