use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Field, InputMode, PlanState};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.check_plan_task().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Works in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        // Field navigation
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
            app.focused_field = app.focused_field.next();
        }
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
            app.focused_field = app.focused_field.prev();
        }

        // Left/right: cycle enum choices, or move inside the allergy row
        KeyCode::Char('h') | KeyCode::Left => match app.focused_field {
            Field::Allergies => app.allergy_left(),
            field => app.form.cycle(field, false),
        },
        KeyCode::Char('l') | KeyCode::Right => match app.focused_field {
            Field::Allergies => app.allergy_right(),
            field => app.form.cycle(field, true),
        },

        KeyCode::Char(' ') => {
            if app.focused_field == Field::Allergies {
                app.toggle_focused_allergy();
            }
        }

        KeyCode::Enter => match app.focused_field {
            Field::Submit => app.submit(),
            Field::Allergies => app.toggle_focused_allergy(),
            field if field.is_text() => app.input_mode = InputMode::Editing,
            _ => {}
        },

        // vi-style edit shortcut
        KeyCode::Char('i') => {
            if app.focused_field.is_text() {
                app.input_mode = InputMode::Editing;
            }
        }

        // Retry after a failed request
        KeyCode::Char('r') => {
            if matches!(app.plan_state, PlanState::Failed(_)) {
                app.submit();
            }
        }

        // Result pane scrolling
        KeyCode::Char('J') | KeyCode::PageDown => app.scroll_results_down(),
        KeyCode::Char('K') | KeyCode::PageUp => app.scroll_results_up(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::Down => {
            // Confirm and move on, so the form can be filled without
            // leaving editing flow
            app.input_mode = InputMode::Normal;
            app.focused_field = app.focused_field.next();
        }
        KeyCode::Backspace => {
            if let Some(text) = app.focused_text_mut() {
                text.pop();
            }
        }
        KeyCode::Char(c) => {
            // No input validation here: numeric fields are coerced at
            // submission time, empty and garbage both become 0
            if let Some(text) = app.focused_text_mut() {
                text.push(c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlanClient;
    use crossterm::event::KeyEvent;

    fn test_app() -> App {
        App::new(PlanClient::new("http://127.0.0.1:1"))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::from(code));
    }

    #[test]
    fn tab_walks_the_field_order() {
        let mut app = test_app();
        assert_eq!(app.focused_field, Field::Name);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_field, Field::Age);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_field, Field::Submit);
    }

    #[test]
    fn enter_on_text_field_starts_editing() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Editing);

        press(&mut app, KeyCode::Char('A'));
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.name, "A");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn space_toggles_the_focused_allergy() {
        let mut app = test_app();
        app.focused_field = Field::Allergies;
        press(&mut app, KeyCode::Char(' '));
        assert!(app.form.has_allergy("gluten"));

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.form.has_allergy("laktos"));

        press(&mut app, KeyCode::Char(' '));
        assert!(!app.form.has_allergy("laktos"));
    }

    #[test]
    fn left_right_cycles_enum_fields() {
        let mut app = test_app();
        app.focused_field = Field::Goal;
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.goal, crate::plan::Goal::Bulk);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.form.goal, crate::plan::Goal::Maintain);
    }

    #[test]
    fn q_quits_only_in_normal_mode() {
        let mut app = test_app();
        app.input_mode = InputMode::Editing;
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.form.name, "q");

        app.input_mode = InputMode::Normal;
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
