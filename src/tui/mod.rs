//! Live watch TUI.
//!
//! One cooperative event loop services everything, the way the original
//! dashboard page did: key events, the 1-second timer ticks, the poll
//! deadline, and drawing. The poll cycle and the timer ticks are
//! independent repeating tasks; neither reschedules the other.

mod app;
mod ui;

pub use app::{DashboardState, PageObserver};

use crate::bus::{ObserverBus, PollCycle};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::HttpFetcher;
use crate::render::{element_id, MemorySurface};
use crate::timer::TimerRegistry;
use crate::view::{
    BarObserver, BuildDetailObserver, ProfileObserver, ServiceBannerObserver, SharedSurface,
    StatisticsObserver, TimerObserver, TooltipObserver,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How long to wait for input before servicing the deadlines again.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Run the watch view until the user quits.
///
/// With `detail_project` set, the view narrows to that project's detail
/// header instead of the full table.
pub fn run_watch(config: &Config, detail_project: Option<String>) -> Result<()> {
    let server_url = config.require_server_url()?;
    let fetcher = HttpFetcher::new(server_url)?;

    let surface = Arc::new(Mutex::new(MemorySurface::new()));
    let state = Arc::new(Mutex::new(DashboardState::default()));
    let registry = Arc::new(Mutex::new(TimerRegistry::new()));

    {
        let mut page = surface.lock().unwrap();
        for id in [
            element_id::STATISTICS_PASSED,
            element_id::STATISTICS_FAILED,
            element_id::STATISTICS_BUILDING,
            element_id::STATISTICS_INACTIVE,
            element_id::STATISTICS_TOTAL,
            element_id::STATISTICS_RATE,
            element_id::SERVICE_BANNER,
        ] {
            page.create_element(id);
        }
        if detail_project.is_some() {
            page.create_element(element_id::DETAIL_SUMMARY);
            page.create_element(element_id::DETAIL_STATUS);
            page.create_element(element_id::DETAIL_LINK);
        }
    }

    let shared: SharedSurface = Arc::clone(&surface) as SharedSurface;
    let mut bus = ObserverBus::new(
        Box::new(fetcher),
        Duration::from_secs(config.poll_interval_secs),
    );
    // The page observer goes first so project elements exist before the
    // rendering observers write to them.
    bus.register(Box::new(PageObserver::new(
        Arc::clone(&surface),
        Arc::clone(&state),
    )));
    bus.register(Box::new(StatisticsObserver::new(Arc::clone(&shared))));
    bus.register(Box::new(ProfileObserver::new(
        Arc::clone(&shared),
        config.force_build_enabled,
    )));
    bus.register(Box::new(BarObserver::new(Arc::clone(&shared))));
    bus.register(Box::new(TooltipObserver::new(Arc::clone(&shared))));
    bus.register(Box::new(TimerObserver::new(
        Arc::clone(&registry),
        Arc::clone(&shared),
    )));
    bus.register(Box::new(ServiceBannerObserver::new(Arc::clone(&shared))));
    if let Some(project) = &detail_project {
        bus.register(Box::new(BuildDetailObserver::new(
            Arc::clone(&shared),
            project.clone(),
        )));
    }

    // Restore the terminal even if the loop panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    let result = event_loop(
        &mut terminal,
        &mut bus,
        &registry,
        &surface,
        &state,
        detail_project.as_deref(),
    );
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    bus: &mut ObserverBus,
    registry: &Arc<Mutex<TimerRegistry>>,
    surface: &Arc<Mutex<MemorySurface>>,
    state: &Arc<Mutex<DashboardState>>,
    detail_project: Option<&str>,
) -> Result<()> {
    bus.start(Instant::now());
    let mut next_tick = Instant::now() + Duration::from_secs(1);

    loop {
        if event::poll(INPUT_POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('r') => bus.poll_now(Instant::now()),
                        _ => {}
                    }
                }
            }
        }

        let now = Instant::now();
        while now >= next_tick {
            let mut registry = registry.lock().unwrap();
            let mut page = surface.lock().unwrap();
            registry.tick_all(&mut *page);
            next_tick += Duration::from_secs(1);
        }

        match bus.run_if_due(Instant::now()) {
            PollCycle::FetchFailed(message) => {
                // A single failed poll is not an error; surface it in the
                // footer and keep going.
                state.lock().unwrap().last_error = Some(message);
            }
            PollCycle::NotDue
            | PollCycle::Delivered(_)
            | PollCycle::ServiceDown(_) => {}
        }

        {
            let state = state.lock().unwrap();
            let page = surface.lock().unwrap();
            terminal.draw(|frame| ui::draw(frame, &state, &page, detail_project))?;
        }
    }
}
