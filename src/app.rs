use crate::api::{ApiError, PlanClient};
use crate::plan::{Activity, Diet, Gender, Goal, PlanRequest, PlanResponse, KNOWN_ALLERGIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Form fields in navigation order. The last entry is the submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
    Weight,
    Height,
    Gender,
    Activity,
    Goal,
    Diet,
    Allergies,
    TargetWeight,
    Submit,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Name,
        Field::Age,
        Field::Weight,
        Field::Height,
        Field::Gender,
        Field::Activity,
        Field::Goal,
        Field::Diet,
        Field::Allergies,
        Field::TargetWeight,
        Field::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Namn",
            Field::Age => "Ålder",
            Field::Weight => "Vikt (kg)",
            Field::Height => "Längd (cm)",
            Field::Gender => "Kön",
            Field::Activity => "Träningsnivå",
            Field::Goal => "Mål",
            Field::Diet => "Kosttyp",
            Field::Allergies => "Allergier",
            Field::TargetWeight => "Målvikt (kg)",
            Field::Submit => "Generera plan",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Field::Name | Field::Age | Field::Weight | Field::Height | Field::TargetWeight
        )
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    pub fn prev(&self) -> Field {
        let len = Field::ALL.len();
        Field::ALL[(self.index() + len - 1) % len]
    }
}

/// The single mutable record behind the form. Numeric fields stay raw
/// strings until submission, where they are coerced (empty -> 0).
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub name: String,
    pub age: String,
    pub weight: String,
    pub height: String,
    pub gender: Gender,
    pub activity: Activity,
    pub goal: Goal,
    pub diet: Diet,
    pub allergies: Vec<String>,
    pub target_weight: String,
}

impl FormState {
    /// Flip membership of one allergy: add if absent, remove if present.
    /// Toggling twice is the identity.
    pub fn toggle_allergy(&mut self, allergy: &str) {
        if let Some(pos) = self.allergies.iter().position(|a| a == allergy) {
            self.allergies.remove(pos);
        } else {
            self.allergies.push(allergy.to_string());
        }
    }

    pub fn has_allergy(&self, allergy: &str) -> bool {
        self.allergies.iter().any(|a| a == allergy)
    }

    /// Coerce the raw inputs into a wire request.
    pub fn to_request(&self) -> PlanRequest {
        PlanRequest {
            name: self.name.clone(),
            age: self.age.trim().parse().unwrap_or(0),
            weight: self.weight.trim().parse().unwrap_or(0.0),
            height: self.height.trim().parse().unwrap_or(0.0),
            gender: self.gender,
            activity: self.activity,
            goal: self.goal,
            diet: self.diet,
            allergies: self.allergies.clone(),
            target_weight: self.target_weight.trim().parse().ok(),
        }
    }

    /// Pre-fill the form from a decoded permalink.
    pub fn from_request(request: &PlanRequest) -> Self {
        Self {
            name: request.name.clone(),
            age: request.age.to_string(),
            weight: request.weight.to_string(),
            height: request.height.to_string(),
            gender: request.gender,
            activity: request.activity,
            goal: request.goal,
            diet: request.diet,
            allergies: request.allergies.clone(),
            target_weight: request
                .target_weight
                .map(|t| t.to_string())
                .unwrap_or_default(),
        }
    }

    /// Cycle an enum field one step in either direction.
    pub fn cycle(&mut self, field: Field, forward: bool) {
        fn step<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
            let idx = all.iter().position(|v| *v == current).unwrap_or(0);
            let len = all.len();
            let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
            all[next]
        }

        match field {
            Field::Gender => self.gender = step(&Gender::ALL, self.gender, forward),
            Field::Activity => self.activity = step(&Activity::ALL, self.activity, forward),
            Field::Goal => self.goal = step(&Goal::ALL, self.goal, forward),
            Field::Diet => self.diet = step(&Diet::ALL, self.diet, forward),
            _ => {}
        }
    }
}

/// Result-pane state machine. Loading and Failed are distinct so a dead
/// request never looks like one that is still running.
#[derive(Debug)]
pub enum PlanState {
    Idle,
    Loading,
    Ready(PlanResponse),
    Failed(String),
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focused_field: Field,
    pub allergy_cursor: usize,

    pub form: FormState,
    pub plan_state: PlanState,
    pub plan_task: Option<tokio::task::JoinHandle<Result<PlanResponse, ApiError>>>,

    pub result_scroll: u16,
    pub animation_frame: u8,

    pub client: PlanClient,
}

impl App {
    pub fn new(client: PlanClient) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focused_field: Field::Name,
            allergy_cursor: 0,
            form: FormState::default(),
            plan_state: PlanState::Idle,
            plan_task: None,
            result_scroll: 0,
            animation_frame: 0,
            client,
        }
    }

    pub fn with_form(client: PlanClient, form: FormState) -> Self {
        Self {
            form,
            ..Self::new(client)
        }
    }

    /// One request in flight at a time; a second submit while loading is a
    /// no-op rather than a race on the result slot.
    pub fn can_submit(&self) -> bool {
        self.plan_task.is_none()
    }

    pub fn submit(&mut self) {
        if !self.can_submit() {
            return;
        }

        let request = self.form.to_request();
        tracing::info!(backend = %self.client.base_url(), user = %request.name, "submitting plan request");

        self.plan_state = PlanState::Loading;
        self.result_scroll = 0;

        let client = self.client.clone();
        self.plan_task = Some(tokio::spawn(async move {
            client.generate_plan(&request).await
        }));
    }

    /// Harvest a finished request task, if any. Called from the tick event
    /// so the UI picks the result up within one animation frame.
    pub async fn check_plan_task(&mut self) {
        let finished = self
            .plan_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.plan_task.take() {
            match task.await {
                Ok(Ok(plan)) => {
                    tracing::info!(user = %plan.user, calories = plan.calories, "plan received");
                    self.plan_state = PlanState::Ready(plan);
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "plan request failed");
                    self.plan_state = PlanState::Failed(err.to_string());
                }
                Err(join_err) => {
                    tracing::warn!(error = %join_err, "plan task panicked");
                    self.plan_state = PlanState::Failed("internt fel i förfrågan".to_string());
                }
            }
        }
    }

    pub fn tick_animation(&mut self) {
        if matches!(self.plan_state, PlanState::Loading) {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn allergy_left(&mut self) {
        self.allergy_cursor = self.allergy_cursor.saturating_sub(1);
    }

    pub fn allergy_right(&mut self) {
        if self.allergy_cursor + 1 < KNOWN_ALLERGIES.len() {
            self.allergy_cursor += 1;
        }
    }

    pub fn toggle_focused_allergy(&mut self) {
        let allergy = KNOWN_ALLERGIES[self.allergy_cursor];
        self.form.toggle_allergy(allergy);
    }

    pub fn scroll_results_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(1);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Text buffer for the currently focused field, when it is editable.
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focused_field {
            Field::Name => Some(&mut self.form.name),
            Field::Age => Some(&mut self.form.age),
            Field::Weight => Some(&mut self.form.weight),
            Field::Height => Some(&mut self.form.height),
            Field::TargetWeight => Some(&mut self.form.target_weight),
            _ => None,
        }
    }

    pub fn focused_text(&self) -> Option<&str> {
        match self.focused_field {
            Field::Name => Some(&self.form.name),
            Field::Age => Some(&self.form.age),
            Field::Weight => Some(&self.form.weight),
            Field::Height => Some(&self.form.height),
            Field::TargetWeight => Some(&self.form.target_weight),
            _ => None,
        }
    }
}
