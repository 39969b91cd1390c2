use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Field, InputMode, PlanState};
use crate::plan::{macro_totals, FoodItem, MealSlot, PlanResponse, KNOWN_ALLERGIES};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [form_area, result_area] =
        Layout::horizontal([Constraint::Length(46), Constraint::Min(30)]).areas(body_area);

    render_form(app, frame, form_area);
    render_results(app, frame, result_area);

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Kostplan ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            app.client.base_url().to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_form(app: &App, frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for field in Field::ALL {
        let focused = app.focused_field == field;
        let editing = focused && app.input_mode == InputMode::Editing;

        let label_style = if focused {
            Style::default().fg(Color::Green).bold()
        } else {
            Style::default().fg(Color::Gray)
        };

        match field {
            Field::Allergies => {
                lines.push(Line::from(Span::styled(
                    format!("{}:", field.label()),
                    label_style,
                )));
                lines.push(allergy_line(app, focused));
            }
            Field::Submit => {
                lines.push(Line::default());
                let style = if !app.can_submit() {
                    Style::default().fg(Color::DarkGray)
                } else if focused {
                    Style::default().fg(Color::Black).bg(Color::Green).bold()
                } else {
                    Style::default().fg(Color::Green)
                };
                lines.push(Line::from(Span::styled(
                    format!("[ {} ]", field.label()),
                    style,
                )));
            }
            field if field.is_text() => {
                let value = field_text(app, field);
                let value_style = if editing {
                    Style::default().fg(Color::Yellow)
                } else if focused {
                    Style::default().fg(Color::White).bold()
                } else {
                    Style::default()
                };
                let cursor = if editing { "▏" } else { "" };
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<14}", format!("{}:", field.label())), label_style),
                    Span::styled(format!("{value}{cursor}"), value_style),
                ]));
            }
            field => {
                // Enum fields cycle with h/l
                let value = match field {
                    Field::Gender => app.form.gender.label(),
                    Field::Activity => app.form.activity.label(),
                    Field::Goal => app.form.goal.label(),
                    Field::Diet => app.form.diet.label(),
                    _ => "",
                };
                let value_style = if focused {
                    Style::default().fg(Color::White).bold()
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<14}", format!("{}:", field.label())), label_style),
                    Span::styled(format!("‹ {value} ›"), value_style),
                ]));
            }
        }
    }

    let form = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Dina uppgifter "),
        );
    frame.render_widget(form, area);
}

fn allergy_line(app: &App, focused: bool) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = vec![Span::raw("  ")];

    for (idx, allergy) in KNOWN_ALLERGIES.iter().enumerate() {
        let checked = app.form.has_allergy(allergy);
        let marker = if checked { "[x]" } else { "[ ]" };
        let mut style = if checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        if focused && idx == app.allergy_cursor {
            style = style.add_modifier(Modifier::UNDERLINED).bold();
        }
        // Display with a capital first letter, wire value stays lowercase
        let mut label = allergy.to_string();
        if let Some(first) = label.get(0..1) {
            let upper = first.to_uppercase();
            label.replace_range(0..1, &upper);
        }
        spans.push(Span::styled(format!("{marker} {label}"), style));
        spans.push(Span::raw("  "));
    }

    Line::from(spans)
}

fn field_text(app: &App, field: Field) -> String {
    match field {
        Field::Name => app.form.name.clone(),
        Field::Age => app.form.age.clone(),
        Field::Weight => app.form.weight.clone(),
        Field::Height => app.form.height.clone(),
        Field::TargetWeight => app.form.target_weight.clone(),
        _ => String::new(),
    }
}

fn render_results(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Kostschema ");

    let paragraph = match &app.plan_state {
        PlanState::Idle => Paragraph::new(vec![
            Line::default(),
            Line::from("Fyll i formuläret och välj Generera plan."),
        ])
        .style(Style::default().fg(Color::DarkGray)),
        PlanState::Loading => {
            let dots = ".".repeat(app.animation_frame as usize + 1);
            Paragraph::new(vec![
                Line::default(),
                Line::from(format!("Laddar kostschema{dots}")),
            ])
            .style(Style::default().fg(Color::Yellow))
        }
        PlanState::Failed(message) => Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).bold(),
            )),
            Line::default(),
            Line::from("Tryck r för att försöka igen."),
        ]),
        PlanState::Ready(plan) => Paragraph::new(plan_lines(plan))
            .scroll((app.result_scroll, 0))
            .wrap(Wrap { trim: false }),
    };

    frame.render_widget(paragraph.block(block), area);
}

/// The full plan as styled lines. Pure over the response: the same plan
/// always produces the same lines and the response is never mutated.
pub fn plan_lines(plan: &PlanResponse) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    let heading = if plan.user.is_empty() {
        "Ditt kostschema".to_string()
    } else {
        format!("Kostschema för {}", plan.user)
    };
    lines.push(Line::from(Span::styled(
        heading,
        Style::default().fg(Color::Green).bold(),
    )));

    lines.push(Line::from(format!(
        "BMR: {} kcal   TDEE: {} kcal",
        plan.bmr, plan.tdee
    )));
    let target = plan
        .target_weight
        .map(|t| format!("{t}"))
        .unwrap_or_else(|| "-".to_string());
    lines.push(Line::from(format!("Målvikt: {target} kg")));
    lines.push(Line::from(format!("Kalorier/dag: {} kcal", plan.calories)));

    for (slot, items) in plan.menu.slots() {
        lines.push(Line::default());
        lines.extend(meal_section_lines(slot, items));
    }

    // Daily summary
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Totalt för dagen",
        Style::default().fg(Color::Green).bold(),
    )));
    lines.push(Line::from(format!("Kalorier: {} kcal", plan.calories)));
    lines.push(Line::from(format!(
        "Protein: {} g   Fett: {} g   Kolhydrater: {} g",
        plan.macros.protein_g, plan.macros.fat_g, plan.macros.carbs_g
    )));

    lines
}

/// One labeled meal section: a Mat/Gram/Kcal table followed by the three
/// macro totals folded from the item list.
pub fn meal_section_lines(slot: MealSlot, items: &[FoodItem]) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::from(Span::styled(
        slot.title().to_string(),
        Style::default().fg(Color::Cyan).bold(),
    )));

    if items.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (inga livsmedel)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("  {:<22} {:>7} {:>6}", "Mat", "Gram", "Kcal"),
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for item in items {
            lines.push(Line::from(format!(
                "  {:<22} {:>5} g {:>6}",
                item.name, item.grams, item.kcal
            )));
        }
    }

    let totals = macro_totals(items);
    lines.push(Line::from(Span::styled(
        format!(
            "  Protein: {} g  Fett: {} g  Kolhydrater: {} g",
            totals.protein_g, totals.fat_g, totals.carbs_g
        ),
        Style::default().fg(Color::Gray),
    )));

    lines
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints: Vec<Span> = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter/Esc ", key_style),
            Span::styled(" klar ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" nästa fält ", label_style),
        ],
        InputMode::Normal => {
            let mut hints = vec![
                Span::styled(" j/k ", key_style),
                Span::styled(" fält ", label_style),
            ];
            match app.focused_field {
                Field::Allergies => hints.extend(vec![
                    Span::styled(" h/l ", key_style),
                    Span::styled(" välj ", label_style),
                    Span::styled(" Space ", key_style),
                    Span::styled(" växla ", label_style),
                ]),
                Field::Submit => hints.extend(vec![
                    Span::styled(" Enter ", key_style),
                    Span::styled(" generera ", label_style),
                ]),
                field if field.is_text() => hints.extend(vec![
                    Span::styled(" Enter ", key_style),
                    Span::styled(" redigera ", label_style),
                ]),
                _ => hints.extend(vec![
                    Span::styled(" h/l ", key_style),
                    Span::styled(" ändra ", label_style),
                ]),
            }
            if matches!(app.plan_state, PlanState::Failed(_)) {
                hints.extend(vec![
                    Span::styled(" r ", key_style),
                    Span::styled(" försök igen ", label_style),
                ]);
            }
            if matches!(app.plan_state, PlanState::Ready(_)) {
                hints.extend(vec![
                    Span::styled(" J/K ", key_style),
                    Span::styled(" bläddra ", label_style),
                ]);
            }
            hints.extend(vec![
                Span::styled(" q ", key_style),
                Span::styled(" avsluta ", label_style),
            ]);
            hints
        }
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlanClient;
    use crate::plan::{Macros, Menu};
    use ratatui::{backend::TestBackend, Terminal};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn section_text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(line_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn lunch_section_shows_folded_totals() {
        let items = vec![FoodItem {
            name: "Kyckling".to_string(),
            grams: 150,
            kcal: 250,
            protein_g: 30,
            fat_g: 8,
            carbs_g: 0,
        }];

        let text = section_text(&meal_section_lines(MealSlot::Lunch, &items));
        assert!(text.contains("Lunch"));
        assert!(text.contains("Kyckling"));
        assert!(text.contains("150 g"));
        assert!(text.contains("Protein: 30 g"));
        assert!(text.contains("Fett: 8 g"));
        assert!(text.contains("Kolhydrater: 0 g"));
    }

    #[test]
    fn empty_meal_renders_zero_totals() {
        let text = section_text(&meal_section_lines(MealSlot::Frukost, &[]));
        assert!(text.contains("Protein: 0 g  Fett: 0 g  Kolhydrater: 0 g"));
    }

    #[test]
    fn plan_lines_render_all_slots_in_order() {
        let plan = PlanResponse {
            user: "Anna".to_string(),
            bmr: 1400,
            tdee: 2170,
            calories: 2170,
            target_weight: None,
            macros: Macros {
                protein_g: 120,
                fat_g: 54,
                carbs_g: 300,
            },
            menu: Menu::default(),
        };

        let text = section_text(&plan_lines(&plan));
        assert!(text.contains("Kostschema för Anna"));
        assert!(text.contains("Målvikt: - kg"));

        let frukost = text.find("Frukost").unwrap();
        let mellanmal = text.find("Mellanmål 1").unwrap();
        let lunch = text.find("Lunch").unwrap();
        let pre = text.find("Pre-workout").unwrap();
        let middag = text.find("Middag").unwrap();
        assert!(frukost < mellanmal && mellanmal < lunch && lunch < pre && pre < middag);
    }

    #[test]
    fn render_before_any_response_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = App::new(PlanClient::new("http://127.0.0.1:1"));

        // Idle, then loading: neither state has a response to read from
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        app.plan_state = PlanState::Loading;
        app.animation_frame = 2;
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        app.plan_state = PlanState::Failed("kunde inte nå backend".to_string());
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
    }

    #[test]
    fn plan_lines_do_not_mutate_the_response() {
        let plan = PlanResponse {
            user: String::new(),
            bmr: 1,
            tdee: 2,
            calories: 3,
            target_weight: Some(70.0),
            macros: Macros {
                protein_g: 1,
                fat_g: 2,
                carbs_g: 3,
            },
            menu: Menu::default(),
        };
        let before = plan.clone();
        let first = section_text(&plan_lines(&plan));
        let second = section_text(&plan_lines(&plan));
        assert_eq!(first, second);
        assert_eq!(plan, before);
    }
}
