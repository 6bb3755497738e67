//! Interactive terminal session

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use mail::{MailboxApi, ProfileApi};
use ratatui::DefaultTerminal;

use crate::app::{Flow, ReaderApp};
use crate::input::commands::Command;
use crate::input::keymap::{self, KeyAction};
use crate::views;

pub fn run<C: MailboxApi + ProfileApi>(app: &mut ReaderApp<C>) -> Result<()> {
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, app);
    ratatui::restore();
    result
}

fn event_loop<C: MailboxApi + ProfileApi>(
    terminal: &mut DefaultTerminal,
    app: &mut ReaderApp<C>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| views::draw(frame, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(command) = on_key(app, key) {
            if dispatch(terminal, app, command)? == Flow::Quit {
                return Ok(());
            }
        }
    }
}

/// Apply a key press
///
/// Selection and command-line editing happen here; anything that may touch
/// the network or end the session comes back as a command.
fn on_key<C: MailboxApi + ProfileApi>(app: &mut ReaderApp<C>, key: KeyEvent) -> Option<Command> {
    if app.input().is_some() {
        match key.code {
            KeyCode::Enter => return app.take_input_command(),
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.input_pop(),
            KeyCode::Char(c) => app.input_push(c),
            _ => {}
        }
        return None;
    }

    if app.show_help() {
        app.dismiss_help();
        return None;
    }

    match keymap::action_for(key) {
        KeyAction::Run(command) => Some(command),
        KeyAction::SelectNext => {
            app.select_next();
            None
        }
        KeyAction::SelectPrev => {
            app.select_prev();
            None
        }
        KeyAction::OpenSelected => {
            app.open_selected();
            None
        }
        KeyAction::CycleRows => Some(Command::Rows(app.next_page_size())),
        KeyAction::BeginInput(prefill) => {
            app.begin_input(prefill);
            None
        }
        KeyAction::None => None,
    }
}

fn dispatch<C: MailboxApi + ProfileApi>(
    terminal: &mut DefaultTerminal,
    app: &mut ReaderApp<C>,
    command: Command,
) -> Result<Flow> {
    match command {
        Command::Login => {
            // Sign-in prints instructions and may block on the browser
            ratatui::restore();
            app.handle(Command::Login);
            *terminal = ratatui::try_init()?;
            Ok(Flow::Continue)
        }
        Command::Search(query) => {
            app.set_status("Searching…");
            terminal.draw(|frame| views::draw(frame, app))?;
            Ok(app.handle(Command::Search(query)))
        }
        command => Ok(app.handle(command)),
    }
}
