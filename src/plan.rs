use serde::{Deserialize, Serialize};

/// Biological sex as the backend's BMR formula expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn wire_value(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Man",
            Gender::Female => "Kvinna",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.wire_value() == s)
    }
}

/// Training level, multiplied into TDEE server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl Activity {
    pub const ALL: [Activity; 5] = [
        Activity::Sedentary,
        Activity::Light,
        Activity::Moderate,
        Activity::Active,
        Activity::VeryActive,
    ];

    pub fn wire_value(&self) -> &'static str {
        match self {
            Activity::Sedentary => "sedentary",
            Activity::Light => "light",
            Activity::Moderate => "moderate",
            Activity::Active => "active",
            Activity::VeryActive => "very_active",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Activity::Sedentary => "Stillastående (ingen träning, kontorsjobb)",
            Activity::Light => "Lätt aktiv (promenader, lätt träning 1-2 ggr/vecka)",
            Activity::Moderate => "Måttligt aktiv (träning 3-4 ggr/vecka)",
            Activity::Active => "Aktiv (träning 5-6 ggr/vecka)",
            Activity::VeryActive => "Väldigt aktiv (daglig hård träning, fysiskt jobb)",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.wire_value() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    #[default]
    Maintain,
    Bulk,
    Cut,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Maintain, Goal::Bulk, Goal::Cut];

    pub fn wire_value(&self) -> &'static str {
        match self {
            Goal::Maintain => "maintain",
            Goal::Bulk => "bulk",
            Goal::Cut => "cut",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Goal::Maintain => "Behålla vikt",
            Goal::Bulk => "Gå upp (bulk)",
            Goal::Cut => "Gå ner (cut)",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.wire_value() == s)
    }
}

/// Diet filter. `None` is sent as an empty string, which the backend
/// treats as "no restriction".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diet {
    #[serde(rename = "")]
    #[default]
    None,
    Vegetarian,
    Vegan,
    Pescetarian,
}

impl Diet {
    pub const ALL: [Diet; 4] = [Diet::None, Diet::Vegetarian, Diet::Vegan, Diet::Pescetarian];

    pub fn wire_value(&self) -> &'static str {
        match self {
            Diet::None => "",
            Diet::Vegetarian => "vegetarian",
            Diet::Vegan => "vegan",
            Diet::Pescetarian => "pescetarian",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Diet::None => "Ingen specifik",
            Diet::Vegetarian => "Vegetarian",
            Diet::Vegan => "Vegan",
            Diet::Pescetarian => "Pescetarian",
        }
    }

    /// Unknown values fall back to no restriction, same as the backend does.
    pub fn parse(s: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.wire_value() == s)
            .unwrap_or(Diet::None)
    }
}

/// Allergy choices the backend knows how to filter on.
pub const KNOWN_ALLERGIES: [&str; 3] = ["gluten", "laktos", "nötter"];

/// Request body for `POST /generate_plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub name: String,
    pub age: u32,
    #[serde(serialize_with = "serialize_number")]
    pub weight: f64,
    #[serde(serialize_with = "serialize_number")]
    pub height: f64,
    pub gender: Gender,
    pub activity: Activity,
    pub goal: Goal,
    pub diet: Diet,
    pub allergies: Vec<String>,
    #[serde(
        rename = "targetWeight",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_number"
    )]
    pub target_weight: Option<f64>,
}

/// Whole numbers go out without a decimal point. The backend declares
/// `targetWeight` as an integer, and the web form sent `80`, never `80.0`.
fn serialize_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn serialize_opt_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(v) => serialize_number(v, serializer),
        None => serializer.serialize_none(),
    }
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            name: "Användare".to_string(),
            age: 25,
            weight: 70.0,
            height: 175.0,
            gender: Gender::Male,
            activity: Activity::Moderate,
            goal: Goal::Maintain,
            diet: Diet::None,
            allergies: Vec::new(),
            target_weight: None,
        }
    }
}

/// One food row in a meal. Amounts refer to raw/uncooked weight;
/// macro fields are whole grams for the stated portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(rename = "mat")]
    pub name: String,
    #[serde(rename = "mangd_g")]
    pub grams: u32,
    pub kcal: u32,
    #[serde(rename = "protein")]
    pub protein_g: u32,
    #[serde(rename = "fett")]
    pub fat_g: u32,
    #[serde(rename = "kolhydrater")]
    pub carbs_g: u32,
}

/// Daily macro targets as computed by the backend. Not required to equal
/// the sum of per-item values in the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: u32,
    pub fat_g: u32,
    pub carbs_g: u32,
}

/// The five meal slots the backend always plans around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlot {
    Frukost,
    Mellanmal1,
    Lunch,
    PreWorkout,
    Middag,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Frukost,
        MealSlot::Mellanmal1,
        MealSlot::Lunch,
        MealSlot::PreWorkout,
        MealSlot::Middag,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            MealSlot::Frukost => "Frukost",
            MealSlot::Mellanmal1 => "Mellanmål 1",
            MealSlot::Lunch => "Lunch",
            MealSlot::PreWorkout => "Pre-workout",
            MealSlot::Middag => "Middag",
        }
    }
}

/// Menu keyed by the fixed slot set. Slots the backend leaves out
/// decode as empty lists rather than failing the whole response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub frukost: Vec<FoodItem>,
    #[serde(default)]
    pub mellanmal_1: Vec<FoodItem>,
    #[serde(default)]
    pub lunch: Vec<FoodItem>,
    #[serde(default)]
    pub pre_workout_meal: Vec<FoodItem>,
    #[serde(default)]
    pub middag: Vec<FoodItem>,
}

impl Menu {
    pub fn slot(&self, slot: MealSlot) -> &[FoodItem] {
        match slot {
            MealSlot::Frukost => &self.frukost,
            MealSlot::Mellanmal1 => &self.mellanmal_1,
            MealSlot::Lunch => &self.lunch,
            MealSlot::PreWorkout => &self.pre_workout_meal,
            MealSlot::Middag => &self.middag,
        }
    }

    /// All slots in serving order, for rendering.
    pub fn slots(&self) -> impl Iterator<Item = (MealSlot, &[FoodItem])> {
        MealSlot::ALL.iter().map(move |&s| (s, self.slot(s)))
    }
}

/// Response body from `POST /generate_plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub user: String,
    pub bmr: u32,
    pub tdee: u32,
    pub calories: u32,
    #[serde(rename = "targetWeight", default)]
    pub target_weight: Option<f64>,
    pub macros: Macros,
    pub menu: Menu,
}

/// Per-meal aggregate, folded from the item list at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacroTotals {
    pub protein_g: u32,
    pub fat_g: u32,
    pub carbs_g: u32,
}

/// Sum the macro fields of a meal's items. An empty meal sums to zero.
pub fn macro_totals(items: &[FoodItem]) -> MacroTotals {
    items.iter().fold(MacroTotals::default(), |acc, item| MacroTotals {
        protein_g: acc.protein_g + item.protein_g,
        fat_g: acc.fat_g + item.fat_g,
        carbs_g: acc.carbs_g + item.carbs_g,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lunch_item() -> FoodItem {
        FoodItem {
            name: "Kyckling".to_string(),
            grams: 150,
            kcal: 250,
            protein_g: 30,
            fat_g: 8,
            carbs_g: 0,
        }
    }

    #[test]
    fn request_serializes_exact_wire_fields() {
        let request = PlanRequest {
            name: "Test".to_string(),
            age: 30,
            weight: 80.0,
            height: 180.0,
            gender: Gender::Male,
            activity: Activity::Active,
            goal: Goal::Cut,
            diet: Diet::Vegan,
            allergies: vec!["gluten".to_string()],
            target_weight: Some(75.0),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Test",
                "age": 30,
                "weight": 80,
                "height": 180,
                "gender": "male",
                "activity": "active",
                "goal": "cut",
                "diet": "vegan",
                "allergies": ["gluten"],
                "targetWeight": 75,
            })
        );

        // Byte-exact: whole numbers carry no decimal point on the wire
        let body = serde_json::to_string(&request).unwrap();
        assert!(body.contains("\"weight\":80,"));
        assert!(body.contains("\"targetWeight\":75"));
        assert!(!body.contains("75.0"));
    }

    #[test]
    fn fractional_weights_keep_their_decimals() {
        let request = PlanRequest {
            weight: 80.5,
            target_weight: Some(74.5),
            ..PlanRequest::default()
        };
        let body = serde_json::to_string(&request).unwrap();
        assert!(body.contains("\"weight\":80.5"));
        assert!(body.contains("\"targetWeight\":74.5"));
    }

    #[test]
    fn target_weight_omitted_when_unset() {
        let request = PlanRequest::default();
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("targetWeight").is_none());
        assert_eq!(value["name"], "Användare");
        assert_eq!(value["diet"], "");
    }

    #[test]
    fn food_item_decodes_backend_field_names() {
        let item: FoodItem = serde_json::from_value(json!({
            "mat": "Kyckling",
            "mangd_g": 150,
            "kcal": 250,
            "protein": 30,
            "fett": 8,
            "kolhydrater": 0,
        }))
        .unwrap();
        assert_eq!(item, lunch_item());
    }

    #[test]
    fn response_decodes_with_missing_slots_and_target() {
        let response: PlanResponse = serde_json::from_value(json!({
            "user": "Anna",
            "bmr": 1400,
            "tdee": 2170,
            "calories": 2170,
            "macros": {"protein_g": 120, "fat_g": 54, "carbs_g": 300},
            "menu": {"lunch": [{
                "mat": "Kyckling", "mangd_g": 150, "kcal": 250,
                "protein": 30, "fett": 8, "kolhydrater": 0
            }]},
        }))
        .unwrap();

        assert_eq!(response.target_weight, None);
        assert_eq!(response.menu.lunch, vec![lunch_item()]);
        assert!(response.menu.frukost.is_empty());
        assert!(response.menu.middag.is_empty());
    }

    #[test]
    fn macro_totals_fold_matches_item_sums() {
        let items = vec![
            lunch_item(),
            FoodItem {
                name: "Ris".to_string(),
                grams: 200,
                kcal: 260,
                protein_g: 4,
                fat_g: 0,
                carbs_g: 56,
            },
        ];
        let totals = macro_totals(&items);
        assert_eq!(totals.protein_g, 34);
        assert_eq!(totals.fat_g, 8);
        assert_eq!(totals.carbs_g, 56);
    }

    #[test]
    fn macro_totals_of_empty_meal_is_zero() {
        assert_eq!(macro_totals(&[]), MacroTotals::default());
    }

    #[test]
    fn menu_slots_iterate_in_serving_order() {
        let menu = Menu::default();
        let order: Vec<MealSlot> = menu.slots().map(|(slot, _)| slot).collect();
        assert_eq!(order, MealSlot::ALL.to_vec());
    }

    #[test]
    fn enum_wire_values_round_trip() {
        for activity in Activity::ALL {
            assert_eq!(Activity::parse(activity.wire_value()), Some(activity));
        }
        for goal in Goal::ALL {
            assert_eq!(Goal::parse(goal.wire_value()), Some(goal));
        }
        assert_eq!(Diet::parse("vegan"), Diet::Vegan);
        assert_eq!(Diet::parse("paleo"), Diet::None);
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
    }
}
