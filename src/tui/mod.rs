pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use app::{App, InputField, InputMode};
use ui::ui;

pub fn run_tui() -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new();

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal. Leaving the loop also ends the gauge tick and
    // any pending search debounce.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Poll with a timeout so the gauge re-ticks every 60 seconds and
        // the search debounce fires without a keypress.
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        KeyCode::Char(' ') => app.complete_selected(),
                        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                        KeyCode::Char('y') => app.duplicate_selected(),
                        KeyCode::Char('a') => app.start_add(),
                        KeyCode::Char('n') => app.start_edit(InputField::Text),
                        KeyCode::Char('m') => app.start_edit(InputField::Memo),
                        KeyCode::Char('u') => app.start_edit(InputField::Duration),
                        KeyCode::Char('s') => app.start_edit(InputField::Start),
                        KeyCode::Char('o') => app.start_edit(InputField::End),
                        KeyCode::Char('p') => app.cycle_priority_selected(),
                        KeyCode::Char('E') => app.toggle_emergency_selected(),
                        KeyCode::Char('e') => app.toggle_emergency_filter(),
                        KeyCode::Char('c') => app.toggle_completed(),
                        KeyCode::Char('v') => app.cycle_view(),
                        KeyCode::Char('/') => app.start_search(),
                        KeyCode::Char('[') => app.calendar_previous_month(),
                        KeyCode::Char(']') => app.calendar_next_month(),
                        KeyCode::Char('t') => app.calendar_today(),
                        KeyCode::Enter => app.use_selected_blueprint(),
                        _ => {}
                    },
                    InputMode::Editing | InputMode::Adding => match key.code {
                        KeyCode::Enter => app.handle_input(),
                        KeyCode::Esc => {
                            app.input_mode = InputMode::Normal;
                            app.input_buffer.clear();
                        }
                        KeyCode::Char(c) => {
                            app.input_buffer.push(c);
                        }
                        KeyCode::Backspace => {
                            app.input_buffer.pop();
                        }
                        _ => {}
                    },
                    InputMode::Searching => match key.code {
                        KeyCode::Enter | KeyCode::Esc => app.finish_search(key.code == KeyCode::Esc),
                        KeyCode::Char(c) => {
                            app.input_buffer.push(c);
                            app.search_input_changed();
                        }
                        KeyCode::Backspace => {
                            app.input_buffer.pop();
                            app.search_input_changed();
                        }
                        _ => {}
                    },
                }
            }
        }

        app.tick();
    }
}
