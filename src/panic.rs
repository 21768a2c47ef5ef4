use anyhow::Result;
use tracing::error;

/// Installs a panic hook that logs the panic before reporting it.
///
/// Release builds print a human-panic report with a crash dump; debug builds
/// print a full better-panic backtrace. Either way the process exits with
/// `EXIT_FAILURE` so a caller waiting on `$EDITOR` sees the failure.
pub fn install() -> Result<()> {
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        let msg = strip_ansi_escapes::strip_str(panic_info.to_string());
        error!(%location, "Panicked: {}", msg);

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let metadata = metadata!();
            let file_path = handle_dump(&metadata, panic_info);
            if print_msg(file_path, &metadata).is_err() {
                eprintln!("{}", msg);
            }
            eprintln!("\nThis is a bug. Consider reporting it at {}", env!("CARGO_PKG_REPOSITORY"));
        }

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));
    Ok(())
}
