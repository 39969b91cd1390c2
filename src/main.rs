use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;

mod api;
mod app;
mod config;
mod handler;
mod link;
mod logging;
mod plan;
mod tui;
mod ui;

use api::PlanClient;
use app::{App, FormState};
use config::Config;
use plan::{macro_totals, Activity, Diet, Gender, Goal, PlanRequest, PlanResponse};

#[derive(Parser)]
#[command(name = "kostplan")]
#[command(about = "Generate a daily meal plan from the diet-planning backend")]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a plan without the TUI and print it
    Plan(RequestArgs),
    /// Print the shareable link for a request without calling the backend
    Link(RequestArgs),
    /// Start the TUI pre-filled from a shareable link
    Open {
        /// Query string as produced by `kostplan link`
        link: String,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Build the request from a shareable link instead of flags
    #[arg(long)]
    link: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<u32>,
    /// Weight in kg
    #[arg(long)]
    weight: Option<f64>,
    /// Height in cm
    #[arg(long)]
    height: Option<f64>,
    /// male or female
    #[arg(long)]
    gender: Option<String>,
    /// sedentary, light, moderate, active or very_active
    #[arg(long)]
    activity: Option<String>,
    /// maintain, bulk or cut
    #[arg(long)]
    goal: Option<String>,
    /// vegetarian, vegan or pescetarian; omit for no restriction
    #[arg(long)]
    diet: Option<String>,
    /// May be given multiple times (gluten, laktos, nötter)
    #[arg(long = "allergy")]
    allergies: Vec<String>,
    /// Target weight in kg
    #[arg(long)]
    target_weight: Option<f64>,
}

impl RequestArgs {
    /// Flags override the link (or the defaults, when no link is given).
    fn build(&self, config: &Config) -> Result<PlanRequest> {
        let mut request = match &self.link {
            Some(link) => link::decode(link),
            None => {
                let mut request = PlanRequest::default();
                if let Some(name) = &config.default_name {
                    request.name = name.clone();
                }
                request
            }
        };

        if let Some(name) = &self.name {
            request.name = name.clone();
        }
        if let Some(age) = self.age {
            request.age = age;
        }
        if let Some(weight) = self.weight {
            request.weight = weight;
        }
        if let Some(height) = self.height {
            request.height = height;
        }
        if let Some(gender) = &self.gender {
            request.gender =
                Gender::parse(gender).ok_or_else(|| anyhow!("okänt kön: {gender}"))?;
        }
        if let Some(activity) = &self.activity {
            request.activity = Activity::parse(activity)
                .ok_or_else(|| anyhow!("okänd träningsnivå: {activity}"))?;
        }
        if let Some(goal) = &self.goal {
            request.goal = Goal::parse(goal).ok_or_else(|| anyhow!("okänt mål: {goal}"))?;
        }
        if let Some(diet) = &self.diet {
            request.diet = Diet::parse(diet);
        }
        for allergy in &self.allergies {
            if !request.allergies.contains(allergy) {
                request.allergies.push(allergy.clone());
            }
        }
        if let Some(target) = self.target_weight {
            request.target_weight = Some(target);
        }

        Ok(request)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();
    let base_url = config.resolve_backend(cli.backend.as_deref());

    match cli.command {
        None => {
            let _guard = logging::init()?;
            let mut form = FormState::default();
            if let Some(name) = &config.default_name {
                form.name = name.clone();
            }
            run_tui(PlanClient::new(&base_url), form).await?;
        }
        Some(Commands::Open { link }) => {
            let _guard = logging::init()?;
            let form = FormState::from_request(&link::decode(&link));
            run_tui(PlanClient::new(&base_url), form).await?;
        }
        Some(Commands::Plan(args)) => {
            let _guard = logging::init()?;
            let request = args.build(&config)?;
            let client = PlanClient::new(&base_url);

            println!("🥦 Genererar kostplan för {}...", request.name.bold().cyan());
            match client.generate_plan(&request).await {
                Ok(plan) => print_plan(&plan),
                Err(err) => {
                    eprintln!("{}: {}", "Fel".red().bold(), err);
                    eprintln!("Kontrollera att backend körs på {}", base_url.bold());
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Link(args)) => {
            let request = args.build(&config)?;
            println!("{}", link::encode(&request));
        }
    }

    Ok(())
}

async fn run_tui(client: PlanClient, form: FormState) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::with_form(client, form);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;
        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, event).await?;
        }
    }

    tui::restore()?;
    Ok(())
}

fn print_plan(plan: &PlanResponse) {
    println!(
        "\n{}",
        format!("📋 Kostschema för {}", plan.user).bold().green()
    );
    println!("{}", "=".repeat(50).dimmed());

    println!("BMR: {} kcal", plan.bmr.to_string().bold());
    println!("TDEE: {} kcal", plan.tdee.to_string().bold());
    if let Some(target) = plan.target_weight {
        println!("Målvikt: {} kg", target.to_string().bold());
    }
    println!("Kalorier/dag: {} kcal", plan.calories.to_string().bold());

    for (slot, items) in plan.menu.slots() {
        println!("\n{}", slot.title().bold().cyan());

        if items.is_empty() {
            println!("  {}", "(inga livsmedel)".dimmed());
        } else {
            println!(
                "  {}",
                format!("{:<22} {:>7} {:>6}", "Mat", "Gram", "Kcal").dimmed()
            );
            for item in items {
                println!(
                    "  {:<22} {:>5} g {:>6}",
                    item.name, item.grams, item.kcal
                );
            }
        }

        let totals = macro_totals(items);
        println!(
            "  {}",
            format!(
                "Protein: {} g  Fett: {} g  Kolhydrater: {} g",
                totals.protein_g, totals.fat_g, totals.carbs_g
            )
            .dimmed()
        );
    }

    println!("\n{}", "📊 Totalt för dagen".bold().green());
    println!("Kalorier: {} kcal", plan.calories);
    println!(
        "Protein: {} g   Fett: {} g   Kolhydrater: {} g",
        plan.macros.protein_g, plan.macros.fat_g, plan.macros.carbs_g
    );
}
