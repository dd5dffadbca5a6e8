//! Error reports and panics.
//!
//! `color_eyre` formats every `Result` that reaches `main`. A panic can fire
//! while the form still owns the terminal in raw mode on the alternate
//! screen, so the panic hook first hands the terminal back through
//! [`crate::tui::restore`]. Then it writes the report to the log file and
//! prints it to the restored shell.

use std::panic::PanicHookInfo;
use std::sync::OnceLock;

use color_eyre::{Result, config::PanicHook};
use tracing::error;

static INIT: OnceLock<()> = OnceLock::new();

pub fn init() -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(format!(
            "This is a bug in {}. The form state was not saved.",
            env!("CARGO_PKG_NAME")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |info| {
        if let Err(err) = crate::tui::restore() {
            error!("Unable to restore terminal: {err:?}");
        }
        report(&panic_hook, info);
        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = INIT.set(());
    Ok(())
}

/// Log file first, then the user facing output for the build flavor.
fn report(panic_hook: &PanicHook, info: &PanicHookInfo<'_>) {
    let report = panic_hook.panic_report(info).to_string();
    error!("panic: {}", strip_ansi_escapes::strip_str(&report));

    #[cfg(not(debug_assertions))]
    {
        use human_panic::{handle_dump, metadata, print_msg};
        let metadata = metadata!();
        let dump = handle_dump(&metadata, info);
        if print_msg(dump, &metadata).is_err() {
            eprintln!("{report}");
        }
    }

    #[cfg(debug_assertions)]
    {
        better_panic::Settings::auto()
            .most_recent_first(false)
            .lineno_suffix(true)
            .verbosity(better_panic::Verbosity::Full)
            .create_panic_handler()(info);
    }
}
