use crossterm::event::Event as CtEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

pub enum Event {
    EngineEvent(EngineEvent),
    AppEvent(AppEvent),
}

pub enum EngineEvent {
    /// Pause or resume the simulation
    TogglePause,

    /// Advance the grid by one generation, even while paused
    Step,
}

pub enum AppEvent {
    CameraEvent(CameraEvent),

    /// Exit the application
    Exit,
}

pub enum CameraEvent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ResetView,
    Resize { cols: u16, rows: u16 },
}

/// Converts a crossterm event into a launcher event
pub fn convert_event(event: CtEvent) -> Option<Event> {
    match event {
        CtEvent::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => None,
        CtEvent::Key(key_event) => match key_event {
            KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(Event::AppEvent(AppEvent::Exit)),
            KeyEvent {
                code: KeyCode::Char(' '),
                ..
            } => Some(Event::EngineEvent(EngineEvent::TogglePause)),
            KeyEvent {
                code: KeyCode::Char('n'),
                ..
            } => Some(Event::EngineEvent(EngineEvent::Step)),
            KeyEvent {
                code: KeyCode::Char(c),
                ..
            } => camera_key(c).map(|e| Event::AppEvent(AppEvent::CameraEvent(e))),
            _ => None,
        },
        CtEvent::Resize(cols, rows) => Some(Event::AppEvent(AppEvent::CameraEvent(
            CameraEvent::Resize { cols, rows },
        ))),
        _ => None,
    }
}

fn camera_key(c: char) -> Option<CameraEvent> {
    match c {
        'h' => Some(CameraEvent::MoveLeft),
        'j' => Some(CameraEvent::MoveDown),
        'k' => Some(CameraEvent::MoveUp),
        'l' => Some(CameraEvent::MoveRight),
        '0' => Some(CameraEvent::ResetView),
        _ => None,
    }
}
